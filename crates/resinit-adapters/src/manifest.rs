//! Manifest declarativo de una deployment.
//!
//! Formato JSON:
//! ```json
//! {
//!   "namespace": "Stack", "account": "123456789012", "region": "eu-west-1",
//!   "networks": { "vpc-1": [{ "id": "subnet-a", "kind": "private_with_egress" }] },
//!   "triggers": [{ "id": "Init", "network": "vpc-1", "timeout_secs": 60,
//!                  "code": "handler-v1", "config": { "foo": "bar" } }]
//! }
//! ```
//! Los campos de entorno ausentes se toman de `BuildOptions` (normalmente la
//! configuración por variables de entorno).

use indexmap::IndexMap;
use log::debug;
use resinit_core::hashing::DigestAlgorithm;
use resinit_core::model::{LogRetention, SecurityGroup, SubnetSelection};
use resinit_core::{Deployment, DeploymentEnv, IdentityTemplate, InitializerError, InvokerRegistry, PayloadFingerprinter,
                   PhysicalIdentityComposer, ProvisioningTrigger, TriggerContext, TriggerHandle, TriggerProps};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::network::{StaticNetwork, Subnet};
use crate::units::LocalUnitProvider;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentManifest {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub partition: Option<String>,
    #[serde(default)]
    pub networks: IndexMap<String, Vec<Subnet>>,
    #[serde(default)]
    pub triggers: Vec<TriggerManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerManifest {
    pub id: String,
    pub network: String,
    #[serde(default)]
    pub subnets: SubnetSelection,
    /// Ids de grupos existentes en la misma red.
    #[serde(default)]
    pub security_groups: Vec<String>,
    pub timeout_secs: u64,
    pub code: String,
    #[serde(default)]
    pub log_retention_days: Option<u32>,
    #[serde(default)]
    pub memory_size: Option<u32>,
    #[serde(default)]
    pub config: Value,
}

impl TriggerManifest {
    fn props(&self) -> TriggerProps {
        let mut props = TriggerProps::new(&self.network, &self.code, Duration::from_secs(self.timeout_secs)).with_subnets(self.subnets.clone());
        for id in &self.security_groups {
            props = props.with_security_group(SecurityGroup::existing(id, &self.network));
        }
        if let Some(mb) = self.memory_size {
            props = props.with_memory_size(mb);
        }
        if let Some(days) = self.log_retention_days {
            props = props.with_log_retention(LogRetention::from_days(days));
        }
        props.config = self.config.clone();
        props
    }
}

/// Valores por defecto del entorno y ajustes de derivación.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub namespace: Option<String>,
    pub account: Option<String>,
    pub region: Option<String>,
    pub partition: Option<String>,
    pub template: IdentityTemplate,
    pub digest: DigestAlgorithm,
}

/// Resultado de construir un manifest: grafo, invocadores y handles.
#[derive(Debug)]
pub struct BuiltDeployment {
    pub deployment: Deployment,
    pub invokers: InvokerRegistry,
    pub handles: Vec<TriggerHandle>,
    pub network: StaticNetwork,
}

impl BuiltDeployment {
    pub fn handle(&self, logical_id: &str) -> Option<&TriggerHandle> { self.handles.iter().find(|h| h.logical_id == logical_id) }
}

impl DeploymentManifest {
    pub fn from_json(text: &str) -> Result<Self, InitializerError> {
        serde_json::from_str(text).map_err(|e| InitializerError::Serialization(format!("manifest: {e}")))
    }

    /// Entorno efectivo: el manifest manda sobre las opciones.
    pub fn env(&self, opts: &BuildOptions) -> Result<DeploymentEnv, InitializerError> {
        fn pick(field: &str, own: &Option<String>, fallback: &Option<String>) -> Result<String, InitializerError> {
            own.clone()
               .or_else(|| fallback.clone())
               .ok_or_else(|| InitializerError::InvalidEnvironment(format!("missing {field}")))
        }
        let namespace = self.namespace
                            .clone()
                            .or_else(|| opts.namespace.clone())
                            .ok_or_else(|| InitializerError::InvalidNamespace("missing namespace".into()))?;
        let env = DeploymentEnv::new(namespace, pick("account", &self.account, &opts.account)?, pick("region", &self.region, &opts.region)?);
        let env = match self.partition.clone().or_else(|| opts.partition.clone()) {
            Some(p) => env.with_partition(p),
            None => env,
        };
        env.validate()?;
        Ok(env)
    }

    /// Construye la deployment con el catálogo de redes del manifest y un
    /// proveedor de unidades direccionado por contenido (versiones estables
    /// entre procesos).
    pub fn build(&self, opts: &BuildOptions) -> Result<BuiltDeployment, InitializerError> {
        let env = self.env(opts)?;
        let mut network = self.networks
                              .iter()
                              .fold(StaticNetwork::new(), |n, (name, subnets)| n.with_network(name.clone(), subnets.clone()));
        let mut units = LocalUnitProvider::content_addressed();
        let mut deployment = Deployment::new(env)?;
        let mut invokers = InvokerRegistry::new();

        let mut handles = Vec::with_capacity(self.triggers.len());
        {
            let mut ctx = TriggerContext::new(&mut deployment, &mut invokers, &mut network, &mut units)
                .with_fingerprinter(PayloadFingerprinter::new(opts.digest))
                .with_composer(PhysicalIdentityComposer::new(opts.template));
            for t in &self.triggers {
                handles.push(ProvisioningTrigger::create(&mut ctx, &t.id, t.props())?);
            }
        }
        debug!("manifest built: {} triggers in {}", handles.len(), deployment.namespace());
        Ok(BuiltDeployment { deployment,
                             invokers,
                             handles,
                             network })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(config: Value) -> DeploymentManifest {
        DeploymentManifest::from_json(&json!({
            "namespace": "Stack",
            "account": "123456789012",
            "region": "eu-west-1",
            "networks": { "vpc-1": [
                { "id": "subnet-a", "kind": "private_with_egress" },
                { "id": "subnet-p", "kind": "public" }
            ]},
            "triggers": [{ "id": "Init", "network": "vpc-1", "timeout_secs": 60,
                           "code": "handler-v1", "config": config }]
        }).to_string()).unwrap()
    }

    #[test]
    fn same_manifest_builds_same_identity() {
        let a = manifest(json!({"foo": "bar"})).build(&BuildOptions::default()).unwrap();
        let b = manifest(json!({"foo": "bar"})).build(&BuildOptions::default()).unwrap();
        let (ha, hb) = (a.handle("Init").unwrap(), b.handle("Init").unwrap());
        assert_eq!(ha.physical_id, hb.physical_id);
        assert!(ha.physical_id.as_str().ends_with("1d02e6"));
        assert_eq!(a.invokers.len(), 1);
    }

    #[test]
    fn config_change_moves_identity() {
        let a = manifest(json!({"foo": "bar"})).build(&BuildOptions::default()).unwrap();
        let b = manifest(json!({"foo": "baz"})).build(&BuildOptions::default()).unwrap();
        assert_ne!(a.handle("Init").unwrap().physical_id, b.handle("Init").unwrap().physical_id);
    }

    #[test]
    fn missing_environment_falls_back_to_options() {
        let mut m = manifest(json!({}));
        m.account = None;
        assert!(matches!(m.build(&BuildOptions::default()), Err(InitializerError::InvalidEnvironment(_))));
        let opts = BuildOptions { account: Some("210987654321".into()),
                                  ..BuildOptions::default() };
        let built = m.build(&opts).unwrap();
        assert_eq!(built.deployment.env().account, "210987654321");
    }

    #[test]
    fn delimited_template_is_honoured() {
        let opts = BuildOptions { template: IdentityTemplate::Delimited,
                                  ..BuildOptions::default() };
        let built = manifest(json!({"foo": "bar"})).build(&opts).unwrap();
        assert!(built.handle("Init").unwrap().physical_id.as_str().ends_with(".1d02e6"));
    }

    #[test]
    fn unknown_network_is_rejected() {
        let mut m = manifest(json!({}));
        m.triggers[0].network = "vpc-9".into();
        assert!(matches!(m.build(&BuildOptions::default()), Err(InitializerError::Network(_))));
    }
}
