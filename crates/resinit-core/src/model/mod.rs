//! Modelos neutrales (unidad invocable, payload, acción gestionada, resultado).

pub mod action;
pub mod network;
pub mod payload;
pub mod result;
pub mod unit;

pub use action::{ActionPolicy, InvokeRequest, InvokeResponse, Lifecycle, ManagedAction, SdkCall};
pub use network::{NetworkPlacement, SecurityGroup, SecurityGroupSpec, SubnetKind, SubnetSelection};
pub use payload::InvocationPayload;
pub use result::TriggerResult;
pub use unit::{InvocableUnit, LogRetention, Sizing, UnitDeploySpec};
