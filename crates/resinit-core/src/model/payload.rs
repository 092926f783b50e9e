//! Payload de invocación.
//!
//! El invocado recibe el sobre `{"params": {"config": <config>}}`. El digest
//! se calcula sobre la serialización canónica de ese mismo sobre, de modo que
//! lo hasheado y lo enviado son exactamente los mismos bytes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::InitializerError;
use crate::hashing::canonical_bytes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationPayload {
    pub config: Value,
}

impl InvocationPayload {
    /// Construye el payload desde cualquier config serializable. Un config no
    /// representable como JSON falla aquí, en tiempo de definición.
    pub fn from_config<T: Serialize + ?Sized>(config: &T) -> Result<Self, InitializerError> {
        let config = serde_json::to_value(config).map_err(|e| InitializerError::Serialization(e.to_string()))?;
        Ok(Self { config })
    }

    /// Sobre tal como lo recibe la unidad invocada.
    pub fn to_wire(&self) -> Value {
        json!({ "params": { "config": self.config } })
    }

    pub fn canonical_bytes(&self) -> Result<Vec<u8>, InitializerError> {
        canonical_bytes(&self.to_wire())
    }

    pub fn canonical_string(&self) -> Result<String, InitializerError> {
        String::from_utf8(self.canonical_bytes()?).map_err(|e| InitializerError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_envelope_wraps_config() {
        let p = InvocationPayload::from_config(&json!({"foo": "bar"})).unwrap();
        assert_eq!(p.canonical_string().unwrap(), r#"{"params":{"config":{"foo":"bar"}}}"#);
    }

    #[test]
    fn typed_config_serializes() {
        #[derive(Serialize)]
        struct Cfg {
            schema: &'static str,
            replicas: u8,
        }
        let p = InvocationPayload::from_config(&Cfg { schema: "app", replicas: 2 }).unwrap();
        assert_eq!(p.config, json!({"schema": "app", "replicas": 2}));
    }
}
