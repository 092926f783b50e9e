//! ProvisioningTrigger: compone fingerprint, identidad y permisos y registra
//! la acción gestionada en la deployment.
//!
//! La construcción va en dos fases explícitas:
//! 1. `resolve`: grupo de aislamiento dedicado, despliegue de la unidad y
//!    serialización del payload. Aquí se conoce la versión de la unidad.
//! 2. `derive`: digest, identidad física y alcance de permisos, calculados
//!    sólo a partir de lo resuelto.
//!
//! Después se concede el alcance al invocador del namespace (aditivo e
//! idempotente) y se registra la acción "on-update".

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::constants::{RESPONSE_FIELD, SECURITY_GROUP_SUFFIX, TRIGGER_TIMEOUT};
use crate::deployment::Deployment;
use crate::errors::InitializerError;
use crate::fingerprint::{PayloadDigest, PayloadFingerprinter};
use crate::identity::{validate_trigger_id, PhysicalIdentity, PhysicalIdentityComposer};
use crate::invoker::InvokerRegistry;
use crate::model::{ActionPolicy, InvocableUnit, InvocationPayload, InvokeRequest, LogRetention, ManagedAction, NetworkPlacement, SdkCall,
                   SecurityGroup, SecurityGroupSpec, Sizing, SubnetSelection, TriggerResult, UnitDeploySpec};
use crate::permission::{PermissionScope, PermissionScoper};
use crate::provider::{NetworkIsolation, UnitProvider};
use crate::repo::DeploymentState;

/// Parámetros de construcción (la única superficie de configuración).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerProps {
    pub network: String,
    #[serde(default)]
    pub subnets: SubnetSelection,
    /// Grupos adicionales; el dedicado se añade siempre primero.
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
    pub function_timeout: Duration,
    pub code: String,
    #[serde(default)]
    pub log_retention: LogRetention,
    #[serde(default)]
    pub memory_size: Option<u32>,
    /// Se reenvía tal cual al invocado.
    #[serde(default)]
    pub config: Value,
}

impl TriggerProps {
    pub fn new(network: impl Into<String>, code: impl Into<String>, function_timeout: Duration) -> Self {
        Self { network: network.into(),
               subnets: SubnetSelection::default(),
               security_groups: vec![],
               function_timeout,
               code: code.into(),
               log_retention: LogRetention::default(),
               memory_size: None,
               config: Value::Null }
    }

    /// Fija el config a partir de cualquier valor serializable.
    pub fn with_config<T: Serialize + ?Sized>(mut self, config: &T) -> Result<Self, InitializerError> {
        self.config = InvocationPayload::from_config(config)?.config;
        Ok(self)
    }

    pub fn with_subnets(mut self, subnets: SubnetSelection) -> Self {
        self.subnets = subnets;
        self
    }

    pub fn with_security_group(mut self, group: SecurityGroup) -> Self {
        self.security_groups.push(group);
        self
    }

    pub fn with_memory_size(mut self, memory_size: u32) -> Self {
        self.memory_size = Some(memory_size);
        self
    }

    pub fn with_log_retention(mut self, retention: LogRetention) -> Self {
        self.log_retention = retention;
        self
    }
}

/// Colaboradores inyectados en la construcción de un trigger.
pub struct TriggerContext<'a> {
    pub deployment: &'a mut Deployment,
    pub invokers: &'a mut InvokerRegistry,
    pub network: &'a mut dyn NetworkIsolation,
    pub units: &'a mut dyn UnitProvider,
    pub fingerprinter: PayloadFingerprinter,
    pub composer: PhysicalIdentityComposer,
}

impl<'a> TriggerContext<'a> {
    pub fn new(deployment: &'a mut Deployment,
               invokers: &'a mut InvokerRegistry,
               network: &'a mut dyn NetworkIsolation,
               units: &'a mut dyn UnitProvider)
               -> Self {
        Self { deployment,
               invokers,
               network,
               units,
               fingerprinter: PayloadFingerprinter::default(),
               composer: PhysicalIdentityComposer::default() }
    }

    pub fn with_fingerprinter(mut self, fingerprinter: PayloadFingerprinter) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    pub fn with_composer(mut self, composer: PhysicalIdentityComposer) -> Self {
        self.composer = composer;
        self
    }
}

/// Handle devuelto al caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerHandle {
    pub logical_id: String,
    pub unit: InvocableUnit,
    pub physical_id: PhysicalIdentity,
    pub digest: PayloadDigest,
    pub scope: PermissionScope,
    pub response_field: String,
}

impl TriggerHandle {
    /// Última respuesta registrada para la acción, sea cual sea la
    /// identidad que la produjo. `None` hasta la primera ejecución.
    pub fn result(&self, state: &DeploymentState) -> Option<TriggerResult> {
        let action = state.action(&self.logical_id)?;
        let physical_id = action.physical_id.clone()?;
        let value = action.response.as_ref()?.get(&self.response_field)?.clone();
        Some(TriggerResult { physical_id, value })
    }

    /// Respuesta sólo si corresponde a la identidad actual del handle.
    pub fn current_result(&self, state: &DeploymentState) -> Option<TriggerResult> {
        self.result(state).filter(|r| r.physical_id == self.physical_id.as_str())
    }
}

struct Resolved {
    function_name: String,
    dedicated: SecurityGroup,
    unit: InvocableUnit,
    payload: InvocationPayload,
}

struct Derived {
    digest: PayloadDigest,
    physical_id: PhysicalIdentity,
    scope: PermissionScope,
    request: InvokeRequest,
}

pub struct ProvisioningTrigger;

impl ProvisioningTrigger {
    pub fn create(ctx: &mut TriggerContext<'_>, id: &str, props: TriggerProps) -> Result<TriggerHandle, InitializerError> {
        validate_trigger_id(id)?;
        if ctx.deployment.contains_trigger(id) {
            return Err(InitializerError::DuplicateTrigger(id.to_string()));
        }
        let resolved = Self::resolve(ctx, id, props)?;
        let derived = Self::derive(ctx, id, &resolved)?;
        Self::register(ctx, id, resolved, derived)
    }

    fn resolve(ctx: &mut TriggerContext<'_>, id: &str, props: TriggerProps) -> Result<Resolved, InitializerError> {
        // Validaciones puras antes de cualquier efecto sobre el grafo.
        let function_name = ctx.deployment.env().function_name(id)?;
        let sizing = Sizing::new(props.memory_size, props.function_timeout)?;
        let payload = InvocationPayload { config: props.config };
        payload.canonical_bytes()?;
        let subnets = ctx.network.select_subnets(&props.network, &props.subnets)?;

        if let Some(g) = props.security_groups.iter().find(|g| g.network != props.network) {
            return Err(InitializerError::Network(format!("security group {} belongs to {}, not {}", g.id, g.network, props.network)));
        }

        // Resolve no toca la deployment; el grafo se muta sólo en `register`.
        let dedicated = ctx.network.allocate_group(&SecurityGroupSpec { name: format!("{id}{SECURITY_GROUP_SUFFIX}"),
                                                                        network: props.network.clone(),
                                                                        allow_all_outbound: true })?;
        let mut security_groups = vec![dedicated.clone()];
        for g in props.security_groups {
            if !security_groups.iter().any(|s| s.id == g.id) {
                security_groups.push(g);
            }
        }
        let placement = NetworkPlacement { network: props.network,
                                           subnets,
                                           security_groups };

        let unit = ctx.units.deploy(&UnitDeploySpec { function_name: function_name.clone(),
                                                      code: props.code,
                                                      placement,
                                                      sizing,
                                                      log_retention: props.log_retention })?;
        if unit.name != function_name {
            return Err(InitializerError::UnitProvider(format!("provider deployed {} instead of {}", unit.name, function_name)));
        }
        Ok(Resolved { function_name,
                      dedicated,
                      unit,
                      payload })
    }

    fn derive(ctx: &TriggerContext<'_>, id: &str, resolved: &Resolved) -> Result<Derived, InitializerError> {
        let bytes = resolved.payload.canonical_bytes()?;
        let digest = ctx.fingerprinter.fingerprint(&bytes);
        let physical_id = ctx.composer.compose(id, &resolved.unit.version, &digest.prefix())?;
        let scope = PermissionScoper::new(ctx.deployment.env()).scope()?;
        let payload = String::from_utf8(bytes).map_err(|e| InitializerError::Serialization(e.to_string()))?;
        debug!("trigger {id}: version={} digest={} physical_id={}", resolved.unit.version, digest, physical_id);
        Ok(Derived { digest,
                     physical_id,
                     scope,
                     request: InvokeRequest { function_name: resolved.function_name.clone(),
                                              payload } })
    }

    fn register(ctx: &mut TriggerContext<'_>,
                id: &str,
                resolved: Resolved,
                derived: Derived)
                -> Result<TriggerHandle, InitializerError> {
        let role = ctx.invokers.obtain(ctx.deployment.env())?.name.clone();
        let action = ManagedAction { logical_id: id.to_string(),
                                     physical_id: derived.physical_id.as_str().to_string(),
                                     on_update: SdkCall::lambda_invoke(derived.request),
                                     policy: ActionPolicy::AnyResource,
                                     role,
                                     timeout: TRIGGER_TIMEOUT,
                                     response_field: RESPONSE_FIELD.to_string() };
        ctx.deployment.commit_trigger(resolved.dedicated, resolved.unit.clone(), action)?;
        ctx.invokers.obtain(ctx.deployment.env())?.grant(derived.scope.clone());
        info!("trigger {id} registered in {} as {}", ctx.deployment.namespace(), derived.physical_id);
        Ok(TriggerHandle { logical_id: id.to_string(),
                           unit: resolved.unit,
                           physical_id: derived.physical_id,
                           digest: derived.digest,
                           scope: derived.scope,
                           response_field: RESPONSE_FIELD.to_string() })
    }
}
