//! Acción gestionada registrada ante el orquestador.
//!
//! Una `ManagedAction` describe una llamada `invoke` que el orquestador
//! ejecuta en la fase de apply, sólo cuando su `physical_id` difiere del
//! último registrado con éxito.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Petición síncrona al transporte de invocación remota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub function_name: String,
    /// Payload JSON serializado (bytes canónicos en UTF-8).
    pub payload: String,
}

/// Respuesta cruda del transporte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub status_code: u16,
    pub payload: Value,
    #[serde(default)]
    pub function_error: Option<String>,
    #[serde(default)]
    pub executed_version: Option<String>,
}

impl InvokeResponse {
    pub fn ok(payload: Value) -> Self {
        Self { status_code: 200,
               payload,
               function_error: None,
               executed_version: None }
    }

    /// Representación de campos tal como los consulta `TriggerHandle`.
    pub fn to_fields(&self) -> Value {
        serde_json::json!({
            "StatusCode": self.status_code,
            "Payload": self.payload,
            "FunctionError": self.function_error,
            "ExecutedVersion": self.executed_version,
        })
    }
}

/// Llamada SDK que ejecuta la acción.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkCall {
    pub service: String,
    pub action: String,
    pub request: InvokeRequest,
}

impl SdkCall {
    pub fn lambda_invoke(request: InvokeRequest) -> Self {
        Self { service: "Lambda".into(),
               action: "invoke".into(),
               request }
    }
}

/// Política del ejecutor de la acción. El acceso real a las unidades se
/// acota por el rol invocador, no por esta política.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPolicy {
    AnyResource,
    Resources(Vec<String>),
}

/// Fase del ciclo de vida en que se ejecuta una acción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedAction {
    pub logical_id: String,
    pub physical_id: String,
    pub on_update: SdkCall,
    pub policy: ActionPolicy,
    /// Nombre de la identidad invocadora que ejecuta la llamada.
    pub role: String,
    pub timeout: Duration,
    pub response_field: String,
}
