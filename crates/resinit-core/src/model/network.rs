//! Colocación de red. La topología en sí pertenece al proveedor externo; el
//! core sólo maneja referencias opacas (ids de red, subnets y grupos).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetKind {
    Public,
    PrivateWithEgress,
    PrivateIsolated,
}

/// Criterio de selección de subnets. Vacío = todas las privadas con salida.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetSelection {
    #[serde(default)]
    pub subnet_type: Option<SubnetKind>,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
}

impl SubnetSelection {
    pub fn of_type(kind: SubnetKind) -> Self {
        Self { subnet_type: Some(kind),
               subnet_ids: vec![] }
    }

    pub fn of_ids<I, S>(ids: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { subnet_type: None,
               subnet_ids: ids.into_iter().map(Into::into).collect() }
    }
}

/// Grupo de aislamiento de red (security group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    pub network: String,
    pub allow_all_outbound: bool,
}

impl SecurityGroup {
    /// Referencia a un grupo existente (suministrado por el caller).
    pub fn existing(id: impl Into<String>, network: impl Into<String>) -> Self {
        let id = id.into();
        Self { name: id.clone(),
               id,
               network: network.into(),
               allow_all_outbound: true }
    }
}

/// Petición de un grupo dedicado al proveedor de red.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupSpec {
    pub name: String,
    pub network: String,
    pub allow_all_outbound: bool,
}

/// Resultado de aislar una unidad: red, subnets resueltas y grupos
/// (el dedicado primero, luego los del caller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPlacement {
    pub network: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<SecurityGroup>,
}

impl NetworkPlacement {
    pub fn security_group_ids(&self) -> Vec<&str> {
        self.security_groups.iter().map(|g| g.id.as_str()).collect()
    }
}
