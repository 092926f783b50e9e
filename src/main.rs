//! Demo: recorre los escenarios de extremo a extremo con colaboradores en
//! memoria (red estática, versiones fijadas y transporte en eco).
use resinit_adapters::{LocalTransport, StaticNetwork, Subnet};
use resinit_core::model::{InvocableUnit, SubnetKind, UnitDeploySpec};
use resinit_core::{Deployment, DeploymentEnv, InitializerError, InvokerRegistry, Orchestrator, ProvisioningTrigger, TriggerContext,
                   TriggerHandle, TriggerProps, UnitProvider};
use resinit_rust::errors::CoreError;
use serde_json::json;
use std::time::Duration;

const ACCOUNT: &str = "123456789012";
const REGION: &str = "eu-west-1";

/// Proveedor que publica siempre la misma versión.
struct PinnedVersion(&'static str);

impl UnitProvider for PinnedVersion {
    fn deploy(&mut self, spec: &UnitDeploySpec) -> Result<InvocableUnit, InitializerError> {
        Ok(InvocableUnit { name: spec.function_name.clone(),
                           version: self.0.to_string(),
                           placement: spec.placement.clone(),
                           sizing: spec.sizing,
                           log_retention: spec.log_retention })
    }
}

fn network() -> StaticNetwork {
    StaticNetwork::new().with_network("vpc-1",
                                      vec![Subnet { id: "subnet-a".into(),
                                                    kind: SubnetKind::PrivateWithEgress }])
}

fn check(cond: bool, what: &str) -> Result<(), CoreError> {
    if cond {
        println!("[main-core] ok: {what}");
        Ok(())
    } else {
        Err(CoreError::Internal(format!("escenario fallido: {what}")))
    }
}

/// Declara los triggers `ids` en `namespace` con la versión `version`.
fn declare(namespace: &str,
           version: &'static str,
           ids: &[&str],
           invokers: &mut InvokerRegistry)
           -> Result<(Deployment, Vec<TriggerHandle>), CoreError> {
    let mut deployment = Deployment::new(DeploymentEnv::new(namespace, ACCOUNT, REGION))?;
    let mut net = network();
    let mut units = PinnedVersion(version);
    let mut ctx = TriggerContext::new(&mut deployment, invokers, &mut net, &mut units);
    let mut handles = Vec::new();
    for id in ids {
        let props = TriggerProps::new("vpc-1", "handler", Duration::from_secs(60)).with_config(&json!({"foo": "bar"}))?;
        handles.push(ProvisioningTrigger::create(&mut ctx, id, props)?);
    }
    Ok((deployment, handles))
}

async fn run() -> Result<(), CoreError> {
    let transport = LocalTransport::echo();
    let mut orchestrator = Orchestrator::in_memory();

    // Versión "3": identidad fijada y primera ejecución.
    let mut invokers = InvokerRegistry::new();
    let (v3, handles) = declare("Stack", "3", &["Init"], &mut invokers)?;
    let init = &handles[0];
    check(init.physical_id.as_str() == "Init-AwsSdkCall-31d02e6", "identidad Init-AwsSdkCall-31d02e6")?;
    let report = orchestrator.apply(&v3, &invokers, &transport).await?;
    check(report.executed() == 1, "primer apply ejecuta")?;
    let state = orchestrator.state("Stack")?;
    check(init.result(&state).is_some(), "resultado disponible tras ejecutar")?;

    // Redeclaración idéntica: no-op.
    let mut again = InvokerRegistry::new();
    let (same, _) = declare("Stack", "3", &["Init"], &mut again)?;
    let report = orchestrator.apply(&same, &again, &transport).await?;
    check(report.executed() == 0 && report.skipped() == 1, "redeclaración idéntica se salta")?;

    // Versión "4": nueva identidad, se ejecuta de nuevo.
    let mut bumped = InvokerRegistry::new();
    let (v4, handles) = declare("Stack", "4", &["Init"], &mut bumped)?;
    check(handles[0].physical_id.as_str() == "Init-AwsSdkCall-41d02e6", "versión 4 cambia la identidad")?;
    for p in orchestrator.plan(&v4)? {
        println!("[main-core] plan {} {} {}", p.disposition.label(), p.logical_id, p.physical_id);
    }
    let report = orchestrator.apply(&v4, &bumped, &transport).await?;
    check(report.executed() == 1, "versión 4 se ejecuta")?;

    // Invocador compartido por namespace.
    let mut shared = InvokerRegistry::new();
    let (a, _) = declare("Alpha", "1", &["First", "Second"], &mut shared)?;
    let (b, _) = declare("Beta", "1", &["Third"], &mut shared)?;
    let alpha = shared.get("Alpha")
                      .ok_or_else(|| CoreError::Internal("sin invocador para Alpha".into()))?;
    check(alpha.statements().len() == 1, "un único alcance para dos triggers")?;
    let in_alpha = a.actions().all(|act| alpha.statements()[0].matches_function(a.env(), &act.on_update.request.function_name));
    check(in_alpha, "ambos triggers de Alpha están en alcance")?;
    let leaks = b.actions().any(|act| alpha.statements()[0].matches_function(b.env(), &act.on_update.request.function_name));
    check(!leaks, "el trigger de Beta queda fuera")?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    if let Err(e) = run().await {
        eprintln!("[main-core] {e}");
        std::process::exit(1);
    }
    println!("[main-core] escenarios completados");
}
