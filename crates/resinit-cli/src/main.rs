use resinit_adapters::{DeploymentManifest, JsonlEventStore, LocalTransport};
use resinit_core::hashing::DigestAlgorithm;
use resinit_core::model::InvocationPayload;
use resinit_core::{IdentityTemplate, InMemoryActionRepository, Orchestrator, PayloadFingerprinter, PhysicalIdentityComposer};
use resinit_rust::{read_manifest, recorded_action, AppConfig, DomainError};
use std::collections::HashMap;
use std::process::exit;

const USAGE: &str = "uso:
  resinit identity --id <ID> --version <V> [--config <JSON>] [--template compact|delimited] [--digest md5|blake3]
  resinit plan --manifest <FICHERO>
  resinit apply --manifest <FICHERO>
  resinit state [--namespace <NS>] [--id <ID>]";

/// `--clave valor` a partir de `args[2..]`. Un valor ausente o que empieza
/// por `--` es un error de uso.
fn parse_flags(args: &[String]) -> Result<HashMap<String, String>, String> {
    let mut flags = HashMap::new();
    let mut i = 2;
    while i < args.len() {
        let Some(key) = args[i].strip_prefix("--") else { return Err(format!("argumento inesperado: {}", args[i])) };
        match args.get(i + 1) {
            Some(value) if !value.starts_with("--") => {
                flags.insert(key.to_string(), value.clone());
            }
            _ => return Err(format!("--{key} requiere un valor")),
        }
        i += 2;
    }
    Ok(flags)
}

fn usage(msg: &str) -> ! {
    eprintln!("[resinit] {msg}\n{USAGE}");
    exit(2);
}

fn load_config(tag: &str) -> AppConfig {
    match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[resinit {tag}] {e}");
            exit(3);
        }
    }
}

fn load_manifest(tag: &str, flags: &HashMap<String, String>) -> DeploymentManifest {
    let Some(path) = flags.get("manifest") else { usage("falta --manifest") };
    match read_manifest(path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("[resinit {tag}] {e}");
            exit(3);
        }
    }
}

fn cmd_identity(flags: &HashMap<String, String>) {
    let cfg = load_config("identity");
    let (Some(id), Some(version)) = (flags.get("id"), flags.get("version")) else { usage("identity requiere --id y --version") };
    let template = match flags.get("template") {
        Some(t) => IdentityTemplate::parse(t).unwrap_or_else(|| usage(&format!("template desconocido: {t}"))),
        None => cfg.identity_template,
    };
    let digest = match flags.get("digest") {
        Some(d) => DigestAlgorithm::parse(d).unwrap_or_else(|| usage(&format!("digest desconocido: {d}"))),
        None => cfg.digest,
    };
    let config: serde_json::Value = match flags.get("config") {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| usage(&format!("--config no es JSON: {e}"))),
        None => serde_json::Value::Null,
    };
    let composed = InvocationPayload { config }.canonical_bytes()
                                               .map(|bytes| PayloadFingerprinter::new(digest).fingerprint(&bytes))
                                               .and_then(|d| PhysicalIdentityComposer::new(template).compose(id, version, &d.prefix()));
    match composed {
        Ok(identity) => println!("{identity}"),
        Err(e) => {
            eprintln!("[resinit identity] {e}");
            exit(3);
        }
    }
}

fn cmd_plan(flags: &HashMap<String, String>) {
    let cfg = load_config("plan");
    let manifest = load_manifest("plan", flags);
    let built = match manifest.build(&cfg.build_options()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("[resinit plan] {e}");
            exit(3);
        }
    };
    let orchestrator = Orchestrator::new_with_stores(JsonlEventStore::new(&cfg.state_path), InMemoryActionRepository::new());
    match orchestrator.plan(&built.deployment) {
        Ok(plan) => {
            for p in plan {
                println!("{} {} {}", p.disposition.label(), p.logical_id, p.physical_id);
            }
        }
        Err(e) => {
            eprintln!("[resinit plan] {e}");
            exit(5);
        }
    }
}

async fn cmd_apply(flags: &HashMap<String, String>) {
    let cfg = load_config("apply");
    let manifest = load_manifest("apply", flags);
    let built = match manifest.build(&cfg.build_options()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("[resinit apply] {e}");
            exit(3);
        }
    };
    let transport = LocalTransport::echo();
    let mut orchestrator = Orchestrator::new_with_stores(JsonlEventStore::new(&cfg.state_path), InMemoryActionRepository::new());
    match orchestrator.apply(&built.deployment, &built.invokers, &transport).await {
        Ok(report) => {
            for o in &report.outcomes {
                println!("{} {} {}", o.disposition.label(), o.logical_id, o.physical_id);
            }
            eprintln!("[resinit apply] {} ejecutadas, {} sin cambios, fingerprint={}",
                      report.executed(),
                      report.skipped(),
                      report.fingerprint);
        }
        Err(e) => {
            let code = match DomainError::from(e) {
                DomainError::Execution(msg) => {
                    eprintln!("[resinit apply] {msg}");
                    5
                }
                other => {
                    eprintln!("[resinit apply] {other}");
                    3
                }
            };
            exit(code);
        }
    }
}

fn cmd_state(flags: &HashMap<String, String>) {
    let cfg = load_config("state");
    let Some(namespace) = flags.get("namespace").cloned().or(cfg.namespace.clone()) else { usage("state requiere --namespace o RESINIT_NAMESPACE") };
    let orchestrator = Orchestrator::new_with_stores(JsonlEventStore::new(&cfg.state_path), InMemoryActionRepository::new());
    match orchestrator.state(&namespace) {
        Ok(state) => {
            if let Some(id) = flags.get("id") {
                match recorded_action(&state, id) {
                    Ok(a) => println!("{} {:?} {} intentos={}", a.logical_id, a.status, a.physical_id.as_deref().unwrap_or("-"), a.attempts),
                    Err(e) => {
                        eprintln!("[resinit state] {e}");
                        exit(4);
                    }
                }
                return;
            }
            for a in state.actions.values() {
                println!("{} {:?} {} intentos={}", a.logical_id, a.status, a.physical_id.as_deref().unwrap_or("-"), a.attempts);
            }
            if let Some(fp) = &state.last_fingerprint {
                eprintln!("[resinit state] último apply: {fp}");
            }
        }
        Err(e) => {
            eprintln!("[resinit state] {e}");
            exit(5);
        }
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage("falta subcomando");
    }
    let flags = parse_flags(&args).unwrap_or_else(|e| usage(&e));
    match args[1].as_str() {
        "identity" => cmd_identity(&flags),
        "plan" => cmd_plan(&flags),
        "apply" => cmd_apply(&flags).await,
        "state" => cmd_state(&flags),
        "-h" | "--help" => println!("{USAGE}"),
        other => usage(&format!("subcomando desconocido: {other}")),
    }
}
