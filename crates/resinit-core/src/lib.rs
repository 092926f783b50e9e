//! resinit-core: trigger de inicialización con re-invocación idempotente.
//!
//! Componentes (de hoja a raíz):
//! - `fingerprint`: digest estable del payload de invocación.
//! - `identity`: identidad física `{id}-AwsSdkCall-{version}{digest}`.
//! - `permission` + `invoker`: alcance reutilizable para el invocador
//!   compartido del namespace.
//! - `trigger`: compone todo y registra la acción en la `Deployment`.
//!
//! `orchestrator` aplica las acciones registradas y decide, por identidad,
//! entre saltar y ejecutar.
pub mod constants;
pub mod deployment;
pub mod errors;
pub mod event;
pub mod fingerprint;
pub mod hashing;
pub mod identity;
pub mod invoker;
pub mod model;
pub mod orchestrator;
pub mod permission;
pub mod provider;
pub mod repo;
pub mod trigger;

pub use deployment::{Deployment, DeploymentEnv};
pub use errors::InitializerError;
pub use event::{ActionEvent, ActionEventKind, EventStore, InMemoryEventStore};
pub use fingerprint::{DigestPrefix, PayloadDigest, PayloadFingerprinter};
pub use identity::{IdentityTemplate, PhysicalIdentity, PhysicalIdentityComposer};
pub use invoker::{InvokerIdentity, InvokerRegistry};
pub use orchestrator::{ApplyReport, Disposition, Orchestrator, PlannedAction};
pub use permission::{PermissionScope, PermissionScoper};
pub use provider::{InvokeTransport, NetworkIsolation, TransportError, UnitProvider};
pub use repo::{ActionRepository, DeploymentState, InMemoryActionRepository};
pub use trigger::{ProvisioningTrigger, TriggerContext, TriggerHandle, TriggerProps};
