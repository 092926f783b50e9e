//! Modelo en memoria de una deployment (un namespace).
//!
//! La construcción es síncrona y de un solo hilo: los triggers sólo mutan
//! este grafo, sin llamadas de red. El apply posterior lo consume el
//! `Orchestrator`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{FUNCTION_NAME_SUFFIX, MAX_FUNCTION_NAME_LEN, MAX_NAMESPACE_LEN};
use crate::errors::InitializerError;
use crate::model::{InvocableUnit, ManagedAction, SecurityGroup};

/// Cuenta, región y namespace de la deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEnv {
    pub namespace: String,
    pub account: String,
    pub region: String,
    #[serde(default = "default_partition")]
    pub partition: String,
}

fn default_partition() -> String { "aws".into() }

impl DeploymentEnv {
    pub fn new(namespace: impl Into<String>, account: impl Into<String>, region: impl Into<String>) -> Self {
        Self { namespace: namespace.into(),
               account: account.into(),
               region: region.into(),
               partition: default_partition() }
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }

    /// Reglas de nombre de stack: empieza por letra, sólo alfanuméricos y
    /// `-`, máximo 128 caracteres. Cuenta de 12 dígitos.
    pub fn validate(&self) -> Result<(), InitializerError> {
        let ns = &self.namespace;
        if ns.is_empty() {
            return Err(InitializerError::InvalidNamespace("empty".into()));
        }
        if ns.len() > MAX_NAMESPACE_LEN {
            return Err(InitializerError::InvalidNamespace(format!("{} characters (max {MAX_NAMESPACE_LEN})", ns.len())));
        }
        if !ns.starts_with(|c: char| c.is_ascii_alphabetic()) || !ns.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(InitializerError::InvalidNamespace(format!("{ns:?} must match [A-Za-z][A-Za-z0-9-]*")));
        }
        if self.account.len() != 12 || !self.account.chars().all(|c| c.is_ascii_digit()) {
            return Err(InitializerError::InvalidEnvironment(format!("account {:?} must be 12 digits", self.account)));
        }
        if self.region.is_empty() || self.partition.is_empty() {
            return Err(InitializerError::InvalidEnvironment("region and partition are required".into()));
        }
        Ok(())
    }

    /// `{trigger_id}-ResInit{namespace}`, validado contra el límite de
    /// longitud de nombres de función.
    pub fn function_name(&self, trigger_id: &str) -> Result<String, InitializerError> {
        let name = format!("{trigger_id}-{FUNCTION_NAME_SUFFIX}{}", self.namespace);
        if name.len() > MAX_FUNCTION_NAME_LEN {
            return Err(InitializerError::InvalidFunctionName(format!("{name:?} exceeds {MAX_FUNCTION_NAME_LEN} characters")));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(InitializerError::InvalidFunctionName(format!("{name:?} has characters outside [A-Za-z0-9-_]")));
        }
        Ok(name)
    }

    pub fn function_arn(&self, function_name: &str) -> String {
        format!("arn:{}:lambda:{}:{}:function:{}", self.partition, self.region, self.account, function_name)
    }
}

/// Grafo de la deployment: grupos, unidades y acciones en orden de
/// declaración.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    env: DeploymentEnv,
    security_groups: Vec<SecurityGroup>,
    units: IndexMap<String, InvocableUnit>,
    actions: IndexMap<String, ManagedAction>,
}

impl Deployment {
    pub fn new(env: DeploymentEnv) -> Result<Self, InitializerError> {
        env.validate()?;
        Ok(Self { env,
                  security_groups: vec![],
                  units: IndexMap::new(),
                  actions: IndexMap::new() })
    }

    pub fn env(&self) -> &DeploymentEnv { &self.env }

    pub fn namespace(&self) -> &str { &self.env.namespace }

    pub fn contains_trigger(&self, logical_id: &str) -> bool { self.actions.contains_key(logical_id) || self.units.contains_key(logical_id) }

    /// Inserta grupo dedicado, unidad y acción de un trigger en un solo paso;
    /// si el id ya existe no se modifica nada.
    pub(crate) fn commit_trigger(&mut self, group: SecurityGroup, unit: InvocableUnit, action: ManagedAction) -> Result<(), InitializerError> {
        if self.contains_trigger(&action.logical_id) {
            return Err(InitializerError::DuplicateTrigger(action.logical_id));
        }
        if !self.security_groups.iter().any(|g| g.id == group.id) {
            self.security_groups.push(group);
        }
        self.units.insert(action.logical_id.clone(), unit);
        self.actions.insert(action.logical_id.clone(), action);
        Ok(())
    }

    pub fn security_groups(&self) -> &[SecurityGroup] { &self.security_groups }

    pub fn unit(&self, logical_id: &str) -> Option<&InvocableUnit> { self.units.get(logical_id) }

    pub fn action(&self, logical_id: &str) -> Option<&ManagedAction> { self.actions.get(logical_id) }

    pub fn actions(&self) -> impl Iterator<Item = &ManagedAction> { self.actions.values() }

    pub fn len(&self) -> usize { self.actions.len() }

    pub fn is_empty(&self) -> bool { self.actions.is_empty() }
}
