use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Respuesta cruda de la invocación remota expuesta por el handle del
/// trigger. Se crea tras la primera ejecución con éxito y no se muta después;
/// ejecuciones posteriores producen un nuevo `TriggerResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerResult {
    pub physical_id: String,
    pub value: Value,
}

impl TriggerResult {
    /// Valor como string (los payloads textuales se devuelven sin comillas).
    pub fn as_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
