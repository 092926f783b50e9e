#![allow(dead_code)]

use async_trait::async_trait;
use resinit_core::model::{InvocableUnit, InvokeRequest, InvokeResponse, SecurityGroup, SecurityGroupSpec, SubnetSelection, UnitDeploySpec};
use resinit_core::{Deployment, DeploymentEnv, InitializerError, InvokeTransport, NetworkIsolation, TransportError, UnitProvider};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "eu-west-1";

pub fn env(ns: &str) -> DeploymentEnv { DeploymentEnv::new(ns, ACCOUNT, REGION) }

pub fn deployment(ns: &str) -> Deployment { Deployment::new(env(ns)).expect("valid env") }

/// Red con una sola VPC `vpc-1` y dos subnets privadas.
#[derive(Default)]
pub struct FakeNetwork {
    pub allocated: Vec<SecurityGroupSpec>,
}

impl NetworkIsolation for FakeNetwork {
    fn select_subnets(&self, network: &str, _selection: &SubnetSelection) -> Result<Vec<String>, InitializerError> {
        if network == "vpc-1" {
            Ok(vec!["subnet-a".into(), "subnet-b".into()])
        } else {
            Err(InitializerError::Network(format!("unknown network {network}")))
        }
    }

    fn allocate_group(&mut self, spec: &SecurityGroupSpec) -> Result<SecurityGroup, InitializerError> {
        self.allocated.push(spec.clone());
        Ok(SecurityGroup { id: format!("sg-{:04}", self.allocated.len()),
                           name: spec.name.clone(),
                           network: spec.network.clone(),
                           allow_all_outbound: spec.allow_all_outbound })
    }
}

/// Versiones fijadas por referencia de código.
#[derive(Default)]
pub struct FakeUnits {
    pub versions: HashMap<String, String>,
    pub deployed: Vec<UnitDeploySpec>,
}

impl FakeUnits {
    pub fn with_versions(pairs: &[(&str, &str)]) -> Self {
        Self { versions: pairs.iter().map(|(c, v)| (c.to_string(), v.to_string())).collect(),
               deployed: vec![] }
    }
}

impl UnitProvider for FakeUnits {
    fn deploy(&mut self, spec: &UnitDeploySpec) -> Result<InvocableUnit, InitializerError> {
        let version = self.versions
                          .get(&spec.code)
                          .cloned()
                          .ok_or_else(|| InitializerError::UnitProvider(format!("no build for {}", spec.code)))?;
        self.deployed.push(spec.clone());
        Ok(InvocableUnit { name: spec.function_name.clone(),
                           version,
                           placement: spec.placement.clone(),
                           sizing: spec.sizing,
                           log_retention: spec.log_retention })
    }
}

#[derive(Clone)]
pub enum Behaviour {
    Echo,
    Fail(TransportError),
    FunctionError(String),
    Hang(Duration),
}

/// Transporte que registra cada llamada.
pub struct RecordingTransport {
    pub calls: Mutex<Vec<InvokeRequest>>,
    pub behaviour: Mutex<Behaviour>,
}

impl RecordingTransport {
    pub fn echo() -> Self { Self::with(Behaviour::Echo) }

    pub fn with(behaviour: Behaviour) -> Self {
        Self { calls: Mutex::new(vec![]),
               behaviour: Mutex::new(behaviour) }
    }

    pub fn set(&self, behaviour: Behaviour) { *self.behaviour.lock().unwrap() = behaviour; }

    pub fn call_count(&self) -> usize { self.calls.lock().unwrap().len() }

    pub fn last_payload(&self) -> Option<Value> {
        self.calls.lock().unwrap().last().map(|r| serde_json::from_str(&r.payload).unwrap())
    }
}

#[async_trait]
impl InvokeTransport for RecordingTransport {
    async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            Behaviour::Echo => {
                let payload: Value = serde_json::from_str(&request.payload).unwrap();
                Ok(InvokeResponse::ok(json!({ "initialized": request.function_name, "received": payload })))
            }
            Behaviour::Fail(e) => Err(e),
            Behaviour::FunctionError(message) => Ok(InvokeResponse { status_code: 200,
                                                                      payload: json!({"errorMessage": message}),
                                                                      function_error: Some("Unhandled".into()),
                                                                      executed_version: None }),
            Behaviour::Hang(d) => {
                tokio::time::sleep(d).await;
                Ok(InvokeResponse::ok(json!("late")))
            }
        }
    }
}
