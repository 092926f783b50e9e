//! Hash helpers: abstracción para poder cambiar de algoritmo sin tocar el
//! resto del core.
//!
//! - `DigestAlgorithm::Md5` (por defecto) mantiene las identidades físicas
//!   compatibles byte a byte con las ya registradas por deployments
//!   existentes.
//! - `DigestAlgorithm::Blake3` es el hash interno del motor (fingerprints de
//!   apply) y puede elegirse para deployments nuevos.
//!
//! Ninguno se usa con fines de seguridad: sólo detección de cambios.

use blake3::Hasher;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::to_canonical_json;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Md5,
    Blake3,
}

impl DigestAlgorithm {
    /// Digest hex (minúsculas) de `bytes`.
    pub fn hex_digest(self, bytes: &[u8]) -> String {
        match self {
            DigestAlgorithm::Md5 => {
                let out = Md5::digest(bytes);
                out.iter().map(|b| format!("{b:02x}")).collect()
            }
            DigestAlgorithm::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        }
    }

    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Blake3 => 64,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "md5" => Some(DigestAlgorithm::Md5),
            "blake3" => Some(DigestAlgorithm::Blake3),
            _ => None,
        }
    }
}

/// Hashea un string con blake3 y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash blake3 de la forma canónica de un `Value`.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}
