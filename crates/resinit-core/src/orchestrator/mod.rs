//! Orquestador de acciones gestionadas.
//!
//! Semántica: si la identidad física no cambió desde el último éxito, la
//! acción es un no-op; si cambió, se ejecuta y, al terminar bien, la nueva
//! identidad pasa a ser la actual. Las llamadas se serializan por acción y
//! no se reintentan aquí.

pub mod core;
pub mod plan;

pub use self::core::Orchestrator;
pub use plan::{ActionOutcome, ApplyReport, Disposition, PlannedAction};
