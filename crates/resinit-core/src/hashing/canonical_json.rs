//! Canonical JSON: claves ordenadas lexicográficamente en todos los niveles,
//! sin espacios. Dos valores lógicamente iguales producen los mismos bytes,
//! condición necesaria para que el digest del payload sea estable.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::InitializerError;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Display de `Value::String` ya produce el literal escapado.
        Value::String(_) => value.to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut tree = BTreeMap::new();
            for (k, v) in map {
                tree.insert(k, to_canonical_json(v));
            }
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), v))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

/// Serializa cualquier valor a bytes canónicos. Falla en tiempo de
/// definición si el valor no es representable como JSON.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, InitializerError> {
    let v = serde_json::to_value(value).map_err(|e| InitializerError::Serialization(e.to_string()))?;
    Ok(to_canonical_json(&v).into_bytes())
}
