//! Estado reconstruido de las acciones de un namespace.
//!
//! Replay lineal: se consumen los eventos en orden. La identidad actual de una
//! acción es la del último `ActionSucceeded`; un `ActionFailed` no la mueve
//! (el siguiente apply vuelve a intentarlo) y `ActionRemoved` la borra.
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use crate::event::{ActionEvent, ActionEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Nunca ejecutada con éxito.
    Pending,
    /// Llamada lanzada sin resultado registrado (apply interrumpido).
    Running,
    Succeeded,
    Failed,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionState {
    pub logical_id: String,
    pub status: ActionStatus,
    /// Identidad del último éxito.
    pub physical_id: Option<String>,
    /// Campos de la respuesta del último éxito.
    pub response: Option<Value>,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ActionState {
    fn new(logical_id: &str) -> Self {
        Self { logical_id: logical_id.to_string(),
               status: ActionStatus::Pending,
               physical_id: None,
               response: None,
               attempts: 0,
               last_error: None,
               updated_at: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentState {
    pub namespace: String,
    pub actions: IndexMap<String, ActionState>,
    pub last_fingerprint: Option<String>,
}

impl DeploymentState {
    pub fn action(&self, logical_id: &str) -> Option<&ActionState> { self.actions.get(logical_id) }

    /// Identidad registrada (último éxito) de la acción, si existe.
    pub fn current_identity(&self, logical_id: &str) -> Option<&str> { self.action(logical_id)?.physical_id.as_deref() }

    /// Acciones con identidad registrada.
    pub fn live_actions(&self) -> impl Iterator<Item = &ActionState> { self.actions.values().filter(|a| a.physical_id.is_some()) }
}

/// Trait para reconstruir (`replay`) el estado a partir de eventos.
pub trait ActionRepository {
    fn load(&self, namespace: &str, events: &[ActionEvent]) -> DeploymentState;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryActionRepository;

impl InMemoryActionRepository {
    pub fn new() -> Self { Self }
}

impl ActionRepository for InMemoryActionRepository {
    fn load(&self, namespace: &str, events: &[ActionEvent]) -> DeploymentState {
        let mut state = DeploymentState { namespace: namespace.to_string(),
                                          ..Default::default() };
        for ev in events.iter().filter(|e| e.namespace == namespace) {
            match &ev.kind {
                ActionEventKind::ApplyStarted { .. } | ActionEventKind::ActionSkipped { .. } => {}
                ActionEventKind::ActionStarted { logical_id, .. } => {
                    let slot = state.actions.entry(logical_id.clone()).or_insert_with(|| ActionState::new(logical_id));
                    slot.status = ActionStatus::Running;
                    slot.attempts += 1;
                    slot.updated_at = Some(ev.ts);
                }
                ActionEventKind::ActionSucceeded { logical_id,
                                                   physical_id,
                                                   response,
                                                   .. } => {
                    let slot = state.actions.entry(logical_id.clone()).or_insert_with(|| ActionState::new(logical_id));
                    slot.status = ActionStatus::Succeeded;
                    slot.physical_id = Some(physical_id.clone());
                    slot.response = Some(response.clone());
                    slot.last_error = None;
                    slot.updated_at = Some(ev.ts);
                }
                ActionEventKind::ActionFailed { logical_id, error, .. } => {
                    let slot = state.actions.entry(logical_id.clone()).or_insert_with(|| ActionState::new(logical_id));
                    slot.status = ActionStatus::Failed;
                    slot.last_error = Some(error.to_string());
                    slot.updated_at = Some(ev.ts);
                }
                ActionEventKind::ActionRemoved { logical_id, .. } => {
                    if let Some(slot) = state.actions.get_mut(logical_id) {
                        slot.status = ActionStatus::Removed;
                        slot.physical_id = None;
                        slot.response = None;
                        slot.updated_at = Some(ev.ts);
                    }
                }
                ActionEventKind::ApplyCompleted { fingerprint, .. } => state.last_fingerprint = Some(fingerprint.clone()),
            }
        }
        state
    }
}
