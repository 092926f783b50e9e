//! Implementación del `Orchestrator`.

use log::{info, warn};
use serde_json::json;
use uuid::Uuid;

use super::plan::{plan_against, ActionOutcome, ApplyReport, Disposition, PlannedAction};
use crate::constants::INVOKE_ACTION;
use crate::deployment::Deployment;
use crate::errors::InitializerError;
use crate::event::{ActionEventKind, EventStore, InMemoryEventStore};
use crate::hashing::hash_value;
use crate::invoker::InvokerRegistry;
use crate::model::{Lifecycle, ManagedAction};
use crate::provider::InvokeTransport;
use crate::repo::{ActionRepository, DeploymentState, InMemoryActionRepository};

/// Motor de apply: decide por identidad física y registra cada paso en un
/// event log append-only.
#[derive(Debug)]
pub struct Orchestrator<E, R>
    where E: EventStore,
          R: ActionRepository
{
    event_store: E,
    repository: R,
}

impl Orchestrator<InMemoryEventStore, InMemoryActionRepository> {
    /// Orquestador con stores en memoria.
    pub fn in_memory() -> Self { Self::new_with_stores(InMemoryEventStore::default(), InMemoryActionRepository::new()) }
}

impl Default for Orchestrator<InMemoryEventStore, InMemoryActionRepository> {
    fn default() -> Self { Self::in_memory() }
}

impl<E, R> Orchestrator<E, R>
    where E: EventStore,
          R: ActionRepository
{
    pub fn new_with_stores(event_store: E, repository: R) -> Self { Self { event_store, repository } }

    pub fn event_store(&self) -> &E { &self.event_store }

    /// Estado reconstruido del namespace.
    pub fn state(&self, namespace: &str) -> Result<DeploymentState, InitializerError> {
        let events = self.event_store.list(namespace)?;
        Ok(self.repository.load(namespace, &events))
    }

    /// Qué haría `apply` sin invocar nada.
    pub fn plan(&self, deployment: &Deployment) -> Result<Vec<PlannedAction>, InitializerError> {
        let state = self.state(deployment.namespace())?;
        Ok(plan_against(&state, deployment))
    }

    /// Ejecuta las acciones cuya identidad cambió. Se detiene en el primer
    /// fallo (que queda registrado); las acciones anteriores conservan su
    /// nueva identidad.
    pub async fn apply<T>(&mut self,
                          deployment: &Deployment,
                          invokers: &InvokerRegistry,
                          transport: &T)
                          -> Result<ApplyReport, InitializerError>
        where T: InvokeTransport + ?Sized
    {
        let namespace = deployment.namespace().to_string();
        let planned = self.plan(deployment)?;
        let apply_id = Uuid::new_v4();
        self.event_store.append_kind(&namespace,
                                     ActionEventKind::ApplyStarted { apply_id,
                                                                     action_count: deployment.len() })?;

        let mut outcomes = Vec::with_capacity(planned.len());
        for p in planned {
            match &p.disposition {
                Disposition::Skip => {
                    info!("[{namespace}] {} unchanged ({}), skipping", p.logical_id, p.physical_id);
                    self.event_store.append_kind(&namespace,
                                                 ActionEventKind::ActionSkipped { apply_id,
                                                                                  logical_id: p.logical_id.clone(),
                                                                                  physical_id: p.physical_id.clone() })?;
                }
                Disposition::Remove => {
                    info!("[{namespace}] {} no longer declared, removing", p.logical_id);
                    self.event_store.append_kind(&namespace,
                                                 ActionEventKind::ActionRemoved { apply_id,
                                                                                  logical_id: p.logical_id.clone(),
                                                                                  physical_id: p.physical_id.clone() })?;
                }
                Disposition::Create | Disposition::Update { .. } => {
                    let action = deployment.action(&p.logical_id)
                                           .ok_or_else(|| InitializerError::ActionFailed { logical_id: p.logical_id.clone(),
                                                                                           message: "action vanished from deployment".into() })?;
                    let lifecycle = if p.disposition == Disposition::Create { Lifecycle::Create } else { Lifecycle::Update };
                    self.execute(&namespace, apply_id, deployment, invokers, action, lifecycle, transport).await?;
                }
            }
            outcomes.push(ActionOutcome { logical_id: p.logical_id,
                                          physical_id: p.physical_id,
                                          disposition: p.disposition });
        }

        let fingerprint = apply_fingerprint(deployment);
        self.event_store.append_kind(&namespace,
                                     ActionEventKind::ApplyCompleted { apply_id,
                                                                       fingerprint: fingerprint.clone() })?;
        Ok(ApplyReport { apply_id,
                         outcomes,
                         fingerprint })
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute<T>(&mut self,
                        namespace: &str,
                        apply_id: Uuid,
                        deployment: &Deployment,
                        invokers: &InvokerRegistry,
                        action: &ManagedAction,
                        lifecycle: Lifecycle,
                        transport: &T)
                        -> Result<(), InitializerError>
        where T: InvokeTransport + ?Sized
    {
        self.event_store.append_kind(namespace,
                                     ActionEventKind::ActionStarted { apply_id,
                                                                      logical_id: action.logical_id.clone(),
                                                                      physical_id: action.physical_id.clone(),
                                                                      lifecycle })?;
        info!("[{namespace}] {:?} {} -> invoke {}", lifecycle, action.physical_id, action.on_update.request.function_name);

        let outcome = match authorize(deployment, invokers, action) {
            Err(e) => Err(e),
            Ok(()) => match tokio::time::timeout(action.timeout, transport.invoke(&action.on_update.request)).await {
                Err(_) => Err(InitializerError::Timeout { logical_id: action.logical_id.clone(),
                                                          seconds: action.timeout.as_secs() }),
                Ok(Err(e)) => Err(InitializerError::ActionFailed { logical_id: action.logical_id.clone(),
                                                                   message: e.to_string() }),
                Ok(Ok(resp)) => match &resp.function_error {
                    Some(fe) => Err(InitializerError::ActionFailed { logical_id: action.logical_id.clone(),
                                                                     message: format!("function error: {fe}") }),
                    None => Ok(resp),
                },
            },
        };

        match outcome {
            Ok(resp) => {
                self.event_store.append_kind(namespace,
                                             ActionEventKind::ActionSucceeded { apply_id,
                                                                                logical_id: action.logical_id.clone(),
                                                                                physical_id: action.physical_id.clone(),
                                                                                response: resp.to_fields() })?;
                Ok(())
            }
            Err(error) => {
                warn!("[{namespace}] {} failed: {error}", action.logical_id);
                self.event_store.append_kind(namespace,
                                             ActionEventKind::ActionFailed { apply_id,
                                                                             logical_id: action.logical_id.clone(),
                                                                             physical_id: action.physical_id.clone(),
                                                                             error: error.clone() })?;
                Err(error)
            }
        }
    }
}

/// La identidad invocadora del namespace debe cubrir la función destino.
fn authorize(deployment: &Deployment, invokers: &InvokerRegistry, action: &ManagedAction) -> Result<(), InitializerError> {
    let arn = deployment.env().function_arn(&action.on_update.request.function_name);
    let allowed = invokers.get(deployment.namespace())
                          .filter(|inv| inv.name == action.role)
                          .is_some_and(|inv| inv.can_invoke(INVOKE_ACTION, &arn));
    if allowed {
        Ok(())
    } else {
        Err(InitializerError::ActionFailed { logical_id: action.logical_id.clone(),
                                             message: format!("{} is not allowed to invoke {arn}", action.role) })
    }
}

fn apply_fingerprint(deployment: &Deployment) -> String {
    let pairs: Vec<_> = deployment.actions().map(|a| json!([a.logical_id, a.physical_id])).collect();
    hash_value(&json!({ "namespace": deployment.namespace(), "actions": pairs }))
}
