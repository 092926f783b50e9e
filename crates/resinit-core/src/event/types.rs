//! Tipos de evento del orquestador y estructura `ActionEvent`.
//!
//! Rol:
//! - Cada apply emite eventos a un `EventStore` append-only, agrupados por
//!   namespace de deployment.
//! - El `ActionRepository` reconstruye desde ellos la identidad registrada de
//!   cada acción (replay), que decide entre "saltar" y "ejecutar".
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::InitializerError;
use crate::model::Lifecycle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionEventKind {
    /// Inicio de un apply sobre el namespace.
    ApplyStarted { apply_id: Uuid, action_count: usize },
    /// Identidad sin cambios: no-op.
    ActionSkipped { apply_id: Uuid, logical_id: String, physical_id: String },
    /// Se lanza la llamada remota. No implica éxito.
    ActionStarted {
        apply_id: Uuid,
        logical_id: String,
        physical_id: String,
        lifecycle: Lifecycle,
    },
    /// La llamada terminó bien. `physical_id` pasa a ser la identidad actual.
    ActionSucceeded {
        apply_id: Uuid,
        logical_id: String,
        physical_id: String,
        response: Value,
    },
    /// La llamada falló; la identidad actual no cambia y el apply se aborta.
    ActionFailed {
        apply_id: Uuid,
        logical_id: String,
        physical_id: String,
        error: InitializerError,
    },
    /// La acción ya no está declarada. El borrado no invoca nada.
    ActionRemoved { apply_id: Uuid, logical_id: String, physical_id: String },
    /// Cierre con fingerprint agregado de las identidades aplicadas.
    ApplyCompleted { apply_id: Uuid, fingerprint: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub seq: u64,
    pub namespace: String,
    pub kind: ActionEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}
