//! Catálogo estático de redes.

use indexmap::IndexMap;
use resinit_core::model::{SecurityGroup, SecurityGroupSpec, SubnetKind, SubnetSelection};
use resinit_core::{InitializerError, NetworkIsolation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub kind: SubnetKind,
}

#[derive(Debug, Clone, Default)]
pub struct StaticNetwork {
    networks: IndexMap<String, Vec<Subnet>>,
    allocated: Vec<SecurityGroup>,
}

impl StaticNetwork {
    pub fn new() -> Self { Self::default() }

    pub fn with_network(mut self, name: impl Into<String>, subnets: Vec<Subnet>) -> Self {
        self.networks.insert(name.into(), subnets);
        self
    }

    pub fn allocated(&self) -> &[SecurityGroup] { &self.allocated }
}

impl NetworkIsolation for StaticNetwork {
    fn select_subnets(&self, network: &str, selection: &SubnetSelection) -> Result<Vec<String>, InitializerError> {
        let subnets = self.networks
                          .get(network)
                          .ok_or_else(|| InitializerError::Network(format!("unknown network {network}")))?;
        let selected: Vec<String> = if !selection.subnet_ids.is_empty() {
            for id in &selection.subnet_ids {
                if !subnets.iter().any(|s| &s.id == id) {
                    return Err(InitializerError::Network(format!("subnet {id} not in {network}")));
                }
            }
            selection.subnet_ids.clone()
        } else {
            let kind = selection.subnet_type.unwrap_or(SubnetKind::PrivateWithEgress);
            subnets.iter().filter(|s| s.kind == kind).map(|s| s.id.clone()).collect()
        };
        if selected.is_empty() {
            return Err(InitializerError::Network(format!("selection {selection:?} matched no subnet in {network}")));
        }
        Ok(selected)
    }

    fn allocate_group(&mut self, spec: &SecurityGroupSpec) -> Result<SecurityGroup, InitializerError> {
        if !self.networks.contains_key(&spec.network) {
            return Err(InitializerError::Network(format!("unknown network {}", spec.network)));
        }
        if let Some(existing) = self.allocated.iter().find(|g| g.name == spec.name && g.network == spec.network) {
            return Ok(existing.clone());
        }
        let group = SecurityGroup { id: format!("sg-{:08x}", self.allocated.len() + 1),
                                    name: spec.name.clone(),
                                    network: spec.network.clone(),
                                    allow_all_outbound: spec.allow_all_outbound };
        self.allocated.push(group.clone());
        Ok(group)
    }
}
