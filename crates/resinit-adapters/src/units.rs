//! Proveedor local de unidades invocables.
//!
//! Dos modos de versionado, ambos guiados por el digest (sha256) del código
//! y la configuración de la unidad:
//! - `Sequential`: versiones numéricas crecientes por función que sólo
//!   avanzan cuando cambia el digest, como una publicación de versión.
//! - `ContentAddressed`: la versión es un prefijo del propio digest; no
//!   necesita estado previo, útil cuando el proveedor vive lo que un proceso.

use indexmap::IndexMap;
use log::debug;
use resinit_core::hashing::canonical_bytes;
use resinit_core::model::{InvocableUnit, UnitDeploySpec};
use resinit_core::{InitializerError, UnitProvider};
use serde_json::json;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Published {
    code_sha256: String,
    version: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Versioning {
    #[default]
    Sequential,
    ContentAddressed,
}

const CONTENT_VERSION_LEN: usize = 12;

#[derive(Debug, Clone, Default)]
pub struct LocalUnitProvider {
    versioning: Versioning,
    published: IndexMap<String, Published>,
}

impl LocalUnitProvider {
    pub fn new() -> Self { Self::default() }

    pub fn content_addressed() -> Self {
        Self { versioning: Versioning::ContentAddressed,
               published: IndexMap::new() }
    }

    /// Última versión publicada de la función.
    pub fn version_of(&self, function_name: &str) -> Option<u64> { self.published.get(function_name).map(|p| p.version) }

    fn code_sha256(spec: &UnitDeploySpec) -> Result<String, InitializerError> {
        let bytes = canonical_bytes(&json!({
            "code": spec.code,
            "memory_size": spec.sizing.memory_size,
            "timeout_secs": spec.sizing.timeout.as_secs(),
            "subnets": spec.placement.subnets,
            "security_groups": spec.placement.security_group_ids(),
        }))?;
        Ok(Sha256::digest(&bytes).iter().map(|b| format!("{b:02x}")).collect())
    }
}

impl UnitProvider for LocalUnitProvider {
    fn deploy(&mut self, spec: &UnitDeploySpec) -> Result<InvocableUnit, InitializerError> {
        if spec.code.trim().is_empty() {
            return Err(InitializerError::UnitProvider(format!("{}: empty code reference", spec.function_name)));
        }
        let sha = Self::code_sha256(spec)?;
        if self.versioning == Versioning::ContentAddressed {
            return Ok(InvocableUnit { name: spec.function_name.clone(),
                                      version: sha[..CONTENT_VERSION_LEN].to_string(),
                                      placement: spec.placement.clone(),
                                      sizing: spec.sizing,
                                      log_retention: spec.log_retention });
        }
        let entry = self.published
                        .entry(spec.function_name.clone())
                        .or_insert_with(|| Published { code_sha256: sha.clone(),
                                                       version: 1 });
        if entry.code_sha256 != sha {
            entry.code_sha256 = sha;
            entry.version += 1;
        }
        debug!("unit {} at version {}", spec.function_name, entry.version);
        Ok(InvocableUnit { name: spec.function_name.clone(),
                           version: entry.version.to_string(),
                           placement: spec.placement.clone(),
                           sizing: spec.sizing,
                           log_retention: spec.log_retention })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resinit_core::model::{LogRetention, NetworkPlacement, Sizing};
    use std::time::Duration;

    fn spec(code: &str, memory: Option<u32>) -> UnitDeploySpec {
        UnitDeploySpec { function_name: "Init-ResInitStackA".into(),
                         code: code.into(),
                         placement: NetworkPlacement { network: "vpc-1".into(),
                                                       subnets: vec!["subnet-a".into()],
                                                       security_groups: vec![] },
                         sizing: Sizing::new(memory, Duration::from_secs(30)).unwrap(),
                         log_retention: LogRetention::OneWeek }
    }

    #[test]
    fn version_moves_only_when_code_or_config_changes() {
        let mut p = LocalUnitProvider::new();
        assert_eq!(p.deploy(&spec("image:v1", None)).unwrap().version, "1");
        assert_eq!(p.deploy(&spec("image:v1", None)).unwrap().version, "1");
        assert_eq!(p.deploy(&spec("image:v2", None)).unwrap().version, "2");
        assert_eq!(p.deploy(&spec("image:v2", Some(256))).unwrap().version, "3");
        assert_eq!(p.version_of("Init-ResInitStackA"), Some(3));
    }

    #[test]
    fn content_addressed_versions_need_no_history() {
        let a = LocalUnitProvider::content_addressed().deploy(&spec("image:v1", None)).unwrap();
        let b = LocalUnitProvider::content_addressed().deploy(&spec("image:v1", None)).unwrap();
        let c = LocalUnitProvider::content_addressed().deploy(&spec("image:v2", None)).unwrap();
        assert_eq!(a.version, b.version);
        assert_ne!(a.version, c.version);
        assert_eq!(a.version.len(), 12);
    }

    #[test]
    fn empty_code_is_rejected() {
        let mut p = LocalUnitProvider::new();
        assert!(p.deploy(&spec("  ", None)).is_err());
    }
}
