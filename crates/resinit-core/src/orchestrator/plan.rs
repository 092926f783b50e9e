use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deployment::Deployment;
use crate::repo::DeploymentState;

/// Decisión del orquestador para una acción.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Sin identidad registrada: se ejecuta por primera vez.
    Create,
    /// La identidad cambió: se ejecuta de nuevo.
    Update { previous: String },
    /// Misma identidad que el último éxito.
    Skip,
    /// Registrada pero ya no declarada.
    Remove,
}

impl Disposition {
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Create => "create",
            Disposition::Update { .. } => "update",
            Disposition::Skip => "skip",
            Disposition::Remove => "remove",
        }
    }

    pub fn executes(&self) -> bool { matches!(self, Disposition::Create | Disposition::Update { .. }) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub logical_id: String,
    pub physical_id: String,
    pub disposition: Disposition,
}

/// Compara el grafo declarado con el estado registrado. Primero las
/// acciones declaradas (en orden), luego las eliminadas.
pub(crate) fn plan_against(state: &DeploymentState, deployment: &Deployment) -> Vec<PlannedAction> {
    let mut planned: Vec<PlannedAction> = deployment.actions()
                                                    .map(|a| {
                                                        let disposition = match state.current_identity(&a.logical_id) {
                                                            None => Disposition::Create,
                                                            Some(prev) if prev == a.physical_id => Disposition::Skip,
                                                            Some(prev) => Disposition::Update { previous: prev.to_string() },
                                                        };
                                                        PlannedAction { logical_id: a.logical_id.clone(),
                                                                        physical_id: a.physical_id.clone(),
                                                                        disposition }
                                                    })
                                                    .collect();
    for live in state.live_actions() {
        if deployment.action(&live.logical_id).is_none() {
            planned.push(PlannedAction { logical_id: live.logical_id.clone(),
                                         physical_id: live.physical_id.clone().unwrap_or_default(),
                                         disposition: Disposition::Remove });
        }
    }
    planned
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub logical_id: String,
    pub physical_id: String,
    pub disposition: Disposition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub apply_id: Uuid,
    pub outcomes: Vec<ActionOutcome>,
    pub fingerprint: String,
}

impl ApplyReport {
    pub fn executed(&self) -> usize { self.outcomes.iter().filter(|o| o.disposition.executes()).count() }

    pub fn skipped(&self) -> usize { self.outcomes.iter().filter(|o| o.disposition == Disposition::Skip).count() }
}
