use async_trait::async_trait;
use resinit_adapters::{DeploymentManifest, JsonlEventStore, LocalTransport};
use resinit_core::model::{InvokeRequest, InvokeResponse};
use resinit_core::repo::ActionStatus;
use resinit_core::{Disposition, InMemoryActionRepository, InvokeTransport, Orchestrator, TransportError};
use resinit_rust::{AppConfig, DomainError};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;

fn manifest(config: Value, code: &str) -> DeploymentManifest {
    DeploymentManifest::from_json(&json!({
        "networks": { "vpc-1": [{ "id": "subnet-a", "kind": "private_with_egress" }] },
        "triggers": [
            { "id": "Init", "network": "vpc-1", "timeout_secs": 60, "code": code, "config": config },
            { "id": "Seed", "network": "vpc-1", "timeout_secs": 30, "code": "seed-v1", "memory_size": 256 }
        ]
    }).to_string()).unwrap()
}

fn config(state: &Path) -> AppConfig {
    let state = state.display().to_string();
    AppConfig::from_lookup(move |key| match key {
        "RESINIT_NAMESPACE" => Some("Stack".into()),
        "RESINIT_ACCOUNT" => Some("123456789012".into()),
        "RESINIT_REGION" => Some("eu-west-1".into()),
        "RESINIT_STATE_PATH" => Some(state.clone()),
        _ => None,
    }).unwrap()
}

fn temp_state() -> PathBuf { std::env::temp_dir().join(format!("resinit-e2e-{}", Uuid::new_v4())).join("state.jsonl") }

fn orchestrator(cfg: &AppConfig) -> Orchestrator<JsonlEventStore, InMemoryActionRepository> {
    Orchestrator::new_with_stores(JsonlEventStore::new(&cfg.state_path), InMemoryActionRepository::new())
}

struct Unreachable;

#[async_trait]
impl InvokeTransport for Unreachable {
    async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeResponse, TransportError> {
        Err(TransportError::Transport(format!("{} unreachable", request.function_name)))
    }
}

#[tokio::test]
async fn persisted_state_drives_skip_and_update_across_processes() {
    let state = temp_state();
    let cfg = config(&state);
    let transport = LocalTransport::echo();

    let first = manifest(json!({"foo": "bar"}), "init-v1").build(&cfg.build_options()).unwrap();
    let report = orchestrator(&cfg).apply(&first.deployment, &first.invokers, &transport).await.unwrap();
    assert_eq!(report.executed(), 2);

    // "otro proceso": stores y deployment reconstruidos desde cero
    let second = manifest(json!({"foo": "bar"}), "init-v1").build(&cfg.build_options()).unwrap();
    let orch = orchestrator(&cfg);
    let plan = orch.plan(&second.deployment).unwrap();
    assert!(plan.iter().all(|p| p.disposition == Disposition::Skip));

    let third = manifest(json!({"foo": "baz"}), "init-v1").build(&cfg.build_options()).unwrap();
    let mut orch = orchestrator(&cfg);
    let report = orch.apply(&third.deployment, &third.invokers, &transport).await.unwrap();
    assert_eq!(report.executed(), 1);
    assert_eq!(report.skipped(), 1);

    let st = orch.state("Stack").unwrap();
    let result = third.handle("Init").unwrap().current_result(&st).unwrap();
    assert_eq!(result.value, json!({"echo": {"params": {"config": {"foo": "baz"}}}}));
    let _ = std::fs::remove_dir_all(state.parent().unwrap());
}

#[tokio::test]
async fn code_change_publishes_new_version_and_reexecutes() {
    let state = temp_state();
    let cfg = config(&state);
    let transport = LocalTransport::echo();

    let v1 = manifest(json!({}), "init-v1").build(&cfg.build_options()).unwrap();
    orchestrator(&cfg).apply(&v1.deployment, &v1.invokers, &transport).await.unwrap();

    let v2 = manifest(json!({}), "init-v2").build(&cfg.build_options()).unwrap();
    assert_ne!(v1.handle("Init").unwrap().unit.version, v2.handle("Init").unwrap().unit.version);
    let plan = orchestrator(&cfg).plan(&v2.deployment).unwrap();
    assert!(matches!(plan[0].disposition, Disposition::Update { .. }));
    assert_eq!(plan[1].disposition, Disposition::Skip);
    let _ = std::fs::remove_dir_all(state.parent().unwrap());
}

#[tokio::test]
async fn transport_failure_is_an_execution_error_and_is_retried_next_apply() {
    let state = temp_state();
    let cfg = config(&state);
    let built = manifest(json!({"foo": "bar"}), "init-v1").build(&cfg.build_options()).unwrap();

    let err = orchestrator(&cfg).apply(&built.deployment, &built.invokers, &Unreachable).await.unwrap_err();
    assert!(matches!(DomainError::from(err), DomainError::Execution(_)));
    let st = orchestrator(&cfg).state("Stack").unwrap();
    assert_eq!(st.action("Init").unwrap().status, ActionStatus::Failed);
    assert!(st.current_identity("Init").is_none());

    let report = orchestrator(&cfg).apply(&built.deployment, &built.invokers, &LocalTransport::echo()).await.unwrap();
    assert_eq!(report.executed(), 2);
    let _ = std::fs::remove_dir_all(state.parent().unwrap());
}

#[test]
fn invalid_manifest_is_a_validation_error() {
    let state = temp_state();
    let cfg = config(&state);
    let mut m = manifest(json!({}), "init-v1");
    m.triggers[1].memory_size = Some(64);
    let err = m.build(&cfg.build_options()).unwrap_err();
    assert!(matches!(DomainError::from(err), DomainError::Validation(_)));
}

#[test]
fn blocking_apply_with_tokio_test() {
    let state = temp_state();
    let cfg = config(&state);
    let built = manifest(json!({"foo": "bar"}), "init-v1").build(&cfg.build_options()).unwrap();
    let report = tokio_test::block_on(orchestrator(&cfg).apply(&built.deployment, &built.invokers, &LocalTransport::echo())).unwrap();
    assert!(report.outcomes.iter().any(|o| o.physical_id.ends_with("1d02e6")));
    let _ = std::fs::remove_dir_all(state.parent().unwrap());
}
