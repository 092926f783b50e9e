//! Composición de la identidad física de la acción gestionada.
//!
//! Concatenación determinista, sin hashing. La identidad cambia si y sólo si
//! cambia la versión de la unidad o el prefijo del digest del payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::SDK_CALL_MARKER;
use crate::errors::InitializerError;
use crate::fingerprint::DigestPrefix;

/// Plantilla de composición.
///
/// `Compact` es el formato ya registrado por deployments existentes
/// (`{id}-AwsSdkCall-{version}{digest}`); sigue siendo inyectiva porque el
/// digest ocupa siempre los últimos `DIGEST_PREFIX_LEN` caracteres y el id no
/// puede contener el marcador. `Delimited` añade un `.` explícito entre
/// versión y digest; cambia todas las identidades, por lo que activarla
/// fuerza una re-invocación.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityTemplate {
    #[default]
    Compact,
    Delimited,
}

impl IdentityTemplate {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(IdentityTemplate::Compact),
            "delimited" => Some(IdentityTemplate::Delimited),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicalIdentity(String);

impl PhysicalIdentity {
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_string(self) -> String { self.0 }
}

impl fmt::Display for PhysicalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicalIdentityComposer {
    template: IdentityTemplate,
}

impl PhysicalIdentityComposer {
    pub fn new(template: IdentityTemplate) -> Self { Self { template } }

    pub fn template(&self) -> IdentityTemplate { self.template }

    pub fn compose(&self,
                   trigger_id: &str,
                   unit_version: &str,
                   digest: &DigestPrefix)
                   -> Result<PhysicalIdentity, InitializerError> {
        validate_trigger_id(trigger_id)?;
        if unit_version.is_empty() {
            return Err(InitializerError::InvalidUnitVersion("empty".into()));
        }
        if unit_version.chars().any(char::is_whitespace) {
            return Err(InitializerError::InvalidUnitVersion(format!("whitespace in {unit_version:?}")));
        }
        let id = match self.template {
            IdentityTemplate::Compact => format!("{trigger_id}{SDK_CALL_MARKER}{unit_version}{digest}"),
            IdentityTemplate::Delimited => format!("{trigger_id}{SDK_CALL_MARKER}{unit_version}.{digest}"),
        };
        Ok(PhysicalIdentity(id))
    }
}

/// Ids de trigger: no vacíos, sin espacios y sin el marcador de la plantilla.
pub fn validate_trigger_id(trigger_id: &str) -> Result<(), InitializerError> {
    if trigger_id.is_empty() {
        return Err(InitializerError::InvalidTriggerId("empty".into()));
    }
    if trigger_id.contains(SDK_CALL_MARKER) {
        return Err(InitializerError::InvalidTriggerId(format!("{trigger_id:?} contains {SDK_CALL_MARKER:?}")));
    }
    if trigger_id.chars().any(char::is_whitespace) {
        return Err(InitializerError::InvalidTriggerId(format!("whitespace in {trigger_id:?}")));
    }
    Ok(())
}
