use resinit_adapters::{BuildOptions, DeploymentManifest, JsonlEventStore, LocalTransport};
use resinit_core::{InMemoryActionRepository, Orchestrator};
use serde_json::json;
use uuid::Uuid;

fn manifest() -> DeploymentManifest {
    DeploymentManifest::from_json(&json!({
        "namespace": "Orders",
        "account": "123456789012",
        "region": "eu-west-1",
        "networks": { "vpc-1": [
            { "id": "subnet-a", "kind": "private_with_egress" },
            { "id": "subnet-b", "kind": "private_with_egress" }
        ]},
        "triggers": [
            { "id": "Schema", "network": "vpc-1", "timeout_secs": 120, "code": "schema-v1",
              "security_groups": ["sg-db"], "log_retention_days": 7, "config": { "tables": ["orders"] } },
            { "id": "Seed", "network": "vpc-1", "timeout_secs": 30, "code": "seed-v1",
              "subnets": { "subnet_ids": ["subnet-b"] }, "config": { "rows": 10 } }
        ]
    }).to_string()).unwrap()
}

#[test]
fn triggers_share_one_scope_and_get_dedicated_groups() {
    let built = manifest().build(&BuildOptions::default()).unwrap();
    let invoker = built.invokers.get("Orders").unwrap();
    assert_eq!(invoker.name, "Orders-ResInitInvokerRole");
    assert_eq!(invoker.statements().len(), 1);
    for h in &built.handles {
        assert!(invoker.statements()[0].matches_function(built.deployment.env(), &h.unit.name));
    }
    let names: Vec<&str> = built.network.allocated().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["SchemaResourceInitializerFnSg", "SeedResourceInitializerFnSg"]);

    let schema = built.handle("Schema").unwrap();
    assert_eq!(schema.unit.placement.security_group_ids()[1], "sg-db");
    assert_eq!(built.handle("Seed").unwrap().unit.placement.subnets, vec!["subnet-b"]);
}

#[tokio::test]
async fn handler_results_are_exposed_through_handles() {
    let path = std::env::temp_dir().join(format!("resinit-adapters-{}", Uuid::new_v4())).join("state.jsonl");
    let built = manifest().build(&BuildOptions::default()).unwrap();
    let transport = LocalTransport::echo().with_handler("Seed-ResInitOrders", |p| Ok(json!(p["params"]["config"]["rows"])));
    let mut orch = Orchestrator::new_with_stores(JsonlEventStore::new(&path), InMemoryActionRepository::new());

    orch.apply(&built.deployment, &built.invokers, &transport).await.unwrap();
    let state = orch.state("Orders").unwrap();
    let seed = built.handle("Seed").unwrap().result(&state).unwrap();
    assert_eq!(seed.as_text(), "10");
    assert_eq!(transport.invocations().len(), 2);

    // segundo apply: nada que invocar
    let report = orch.apply(&built.deployment, &built.invokers, &transport).await.unwrap();
    assert_eq!(report.skipped(), 2);
    assert_eq!(transport.invocations().len(), 2);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
