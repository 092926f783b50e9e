//! Contratos de los colaboradores externos.
//!
//! - `NetworkIsolation`: "aísla una unidad en la red N con los grupos {S}".
//! - `UnitProvider`: construye/despliega la unidad y publica su versión.
//! - `InvokeTransport`: llamada remota `invoke(nombre, payload)`; los
//!   reintentos y backoff pertenecen al transporte, no al core.

use async_trait::async_trait;
use thiserror::Error;

use crate::errors::InitializerError;
use crate::model::{InvocableUnit, InvokeRequest, InvokeResponse, SecurityGroup, SecurityGroupSpec, SubnetSelection, UnitDeploySpec};

pub trait NetworkIsolation {
    /// Resuelve la selección a ids de subnet concretos.
    fn select_subnets(&self, network: &str, selection: &SubnetSelection) -> Result<Vec<String>, InitializerError>;

    /// Crea un grupo de aislamiento dedicado.
    fn allocate_group(&mut self, spec: &SecurityGroupSpec) -> Result<SecurityGroup, InitializerError>;
}

pub trait UnitProvider {
    fn deploy(&mut self, spec: &UnitDeploySpec) -> Result<InvocableUnit, InitializerError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("function not found: {0}")]
    NotFound(String),
    #[error("access denied invoking {0}")]
    AccessDenied(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

#[async_trait]
pub trait InvokeTransport: Send + Sync {
    async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeResponse, TransportError>;
}
