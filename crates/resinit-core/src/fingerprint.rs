//! Fingerprint del payload de invocación.
//!
//! Función pura: recibe bytes ya canónicos (la canonicalización es
//! responsabilidad del caller, ver `InvocationPayload::canonical_bytes`) y
//! devuelve un digest hex de longitud fija. Para identificadores sólo se usa
//! un prefijo de `DIGEST_PREFIX_LEN` caracteres.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DIGEST_PREFIX_LEN;
use crate::errors::InitializerError;
use crate::hashing::DigestAlgorithm;

fn is_lower_hex(s: &str) -> bool { s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) }

/// Digest hex completo del payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct PayloadDigest(String);

impl TryFrom<String> for PayloadDigest {
    type Error = InitializerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() < DIGEST_PREFIX_LEN || !is_lower_hex(&value) {
            return Err(InitializerError::Serialization(format!("invalid payload digest {value:?}")));
        }
        Ok(Self(value))
    }
}

impl PayloadDigest {
    pub fn as_str(&self) -> &str { &self.0 }

    /// Prefijo de longitud fija usado en la identidad física.
    pub fn prefix(&self) -> DigestPrefix { DigestPrefix(self.0[..DIGEST_PREFIX_LEN].to_string()) }
}

impl fmt::Display for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Exactamente `DIGEST_PREFIX_LEN` caracteres hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct DigestPrefix(String);

impl TryFrom<String> for DigestPrefix {
    type Error = InitializerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() != DIGEST_PREFIX_LEN || !is_lower_hex(&value) {
            return Err(InitializerError::Serialization(format!("invalid digest prefix {value:?}")));
        }
        Ok(Self(value))
    }
}

impl DigestPrefix {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DigestPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadFingerprinter {
    algorithm: DigestAlgorithm,
}

impl PayloadFingerprinter {
    pub fn new(algorithm: DigestAlgorithm) -> Self { Self { algorithm } }

    pub fn algorithm(&self) -> DigestAlgorithm { self.algorithm }

    pub fn fingerprint(&self, canonical: &[u8]) -> PayloadDigest { PayloadDigest(self.algorithm.hex_digest(canonical)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_digest() {
        let f = PayloadFingerprinter::default();
        let a = f.fingerprint(br#"{"params":{"config":{"foo":"bar"}}}"#);
        let b = f.fingerprint(br#"{"params":{"config":{"foo":"bar"}}}"#);
        assert_eq!(a, b);
    }

    #[test]
    fn md5_prefix_is_pinned() {
        let d = PayloadFingerprinter::default().fingerprint(br#"{"params":{"config":{"foo":"bar"}}}"#);
        assert_eq!(d.as_str(), "1d02e685cd32cd07ee910b2c8d3ff737");
        assert_eq!(d.prefix().as_str(), "1d02e6");
    }

    #[test]
    fn prefix_has_fixed_length_for_every_algorithm() {
        for alg in [DigestAlgorithm::Md5, DigestAlgorithm::Blake3] {
            let d = PayloadFingerprinter::new(alg).fingerprint(b"{}");
            assert_eq!(d.prefix().as_str().len(), DIGEST_PREFIX_LEN);
            assert!(d.prefix().as_str().chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn different_payloads_differ() {
        let f = PayloadFingerprinter::default();
        let a = f.fingerprint(br#"{"params":{"config":{"foo":"bar"}}}"#);
        let b = f.fingerprint(br#"{"params":{"config":{"foo":"baz"}}}"#);
        assert_ne!(a, b);
        assert_eq!(b.prefix().as_str(), "9b7658");
    }

    #[test]
    fn deserialization_rejects_malformed_digests() {
        assert!(serde_json::from_str::<PayloadDigest>(r#""1d02""#).is_err());
        assert!(serde_json::from_str::<PayloadDigest>(r#""ñññññññ""#).is_err());
        assert!(serde_json::from_str::<DigestPrefix>(r#""1d02e6ff""#).is_err());
        let d: PayloadDigest = serde_json::from_str(r#""1d02e685cd32cd07ee910b2c8d3ff737""#).unwrap();
        assert_eq!(d.prefix().as_str(), "1d02e6");
    }
}
