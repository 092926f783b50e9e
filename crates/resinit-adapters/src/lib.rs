//! resinit-adapters: colaboradores concretos para el core.
//!
//! Este crate provee:
//! - `StaticNetwork`: catálogo estático de redes/subnets que asigna grupos de
//!   aislamiento.
//! - `LocalUnitProvider`: publica una versión nueva cada vez que cambia el
//!   digest del código o de la configuración de la unidad.
//! - `LocalTransport`: transporte en proceso con handlers por función (o eco).
//! - `JsonlEventStore`: event log del orquestador persistido en JSON lines.
//! - `manifest`: descripción declarativa de una deployment.

pub mod file_store;
pub mod manifest;
pub mod network;
pub mod transport;
pub mod units;

pub use file_store::JsonlEventStore;
pub use manifest::{BuildOptions, BuiltDeployment, DeploymentManifest, TriggerManifest};
pub use network::{StaticNetwork, Subnet};
pub use transport::LocalTransport;
pub use units::{LocalUnitProvider, Versioning};
