//! Transporte de invocación en proceso.
//!
//! Cada función se resuelve a un handler registrado. Sin handler, el
//! transporte devuelve `NotFound`, salvo en modo eco, donde responde con el
//! payload recibido (útil para aplicar una deployment sin backend real).

use async_trait::async_trait;
use log::debug;
use resinit_core::model::{InvokeRequest, InvokeResponse};
use resinit_core::{InvokeTransport, TransportError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

type Handler = Box<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

#[derive(Default)]
pub struct LocalTransport {
    handlers: HashMap<String, Handler>,
    echo_unknown: bool,
    invocations: Mutex<Vec<InvokeRequest>>,
}

impl LocalTransport {
    pub fn new() -> Self { Self::default() }

    /// Responde a cualquier función desconocida con `{"echo": payload}`.
    pub fn echo() -> Self {
        Self { echo_unknown: true,
               ..Self::default() }
    }

    pub fn with_handler<F>(mut self, function_name: impl Into<String>, handler: F) -> Self
        where F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static
    {
        self.handlers.insert(function_name.into(), Box::new(handler));
        self
    }

    /// Peticiones recibidas, en orden.
    pub fn invocations(&self) -> Vec<InvokeRequest> {
        self.invocations.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl InvokeTransport for LocalTransport {
    async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeResponse, TransportError> {
        if let Ok(mut log) = self.invocations.lock() {
            log.push(request.clone());
        }
        let payload: Value = serde_json::from_str(&request.payload).map_err(|e| TransportError::Transport(format!("bad payload: {e}")))?;
        debug!("local invoke {} ({} bytes)", request.function_name, request.payload.len());
        match self.handlers.get(&request.function_name) {
            Some(handler) => match handler(&payload) {
                Ok(value) => Ok(InvokeResponse::ok(value)),
                Err(message) => Ok(InvokeResponse { status_code: 200,
                                                    payload: json!({ "errorMessage": message }),
                                                    function_error: Some("Unhandled".into()),
                                                    executed_version: None }),
            },
            None if self.echo_unknown => Ok(InvokeResponse::ok(json!({ "echo": payload }))),
            None => Err(TransportError::NotFound(request.function_name.clone())),
        }
    }
}
