//! Configuración central de la aplicación.
//! Carga variables de entorno (.env, una sola vez) y produce un `AppConfig`
//! con el entorno de la deployment y los ajustes de derivación.
use once_cell::sync::Lazy;
use resinit_adapters::{BuildOptions, DeploymentManifest};
use resinit_core::hashing::DigestAlgorithm;
use resinit_core::IdentityTemplate;
use std::env;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Ruta por defecto del event log persistido.
pub const DEFAULT_STATE_PATH: &str = ".resinit/state.jsonl";

/// `.env` se lee en el primer acceso; un fichero ausente no es error.
static DOTENV_LOADED: Lazy<bool> = Lazy::new(|| dotenvy::dotenv().is_ok());

/// Configuración de la aplicación. Los campos de entorno son opcionales: el
/// manifest puede aportarlos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub namespace: Option<String>,
    pub account: Option<String>,
    pub region: Option<String>,
    pub partition: String,
    /// Fichero JSON lines del event log.
    pub state_path: PathBuf,
    pub identity_template: IdentityTemplate,
    pub digest: DigestAlgorithm,
}

impl AppConfig {
    /// Lee `RESINIT_*` del proceso (tras cargar `.env`).
    pub fn from_env() -> Result<Self, CoreError> {
        let _ = *DOTENV_LOADED;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let identity_template = match get("RESINIT_IDENTITY_TEMPLATE") {
            Some(v) => IdentityTemplate::parse(&v).ok_or_else(|| CoreError::Config(format!("RESINIT_IDENTITY_TEMPLATE={v}")))?,
            None => IdentityTemplate::default(),
        };
        let digest = match get("RESINIT_DIGEST") {
            Some(v) => DigestAlgorithm::parse(&v).ok_or_else(|| CoreError::Config(format!("RESINIT_DIGEST={v}")))?,
            None => DigestAlgorithm::default(),
        };
        Ok(Self { namespace: get("RESINIT_NAMESPACE"),
                  account: get("RESINIT_ACCOUNT"),
                  region: get("RESINIT_REGION"),
                  partition: get("RESINIT_PARTITION").unwrap_or_else(|| "aws".into()),
                  state_path: get("RESINIT_STATE_PATH").map(PathBuf::from)
                                                       .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
                  identity_template,
                  digest })
    }

    /// Opciones de construcción para un manifest.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions { namespace: self.namespace.clone(),
                       account: self.account.clone(),
                       region: self.region.clone(),
                       partition: Some(self.partition.clone()),
                       template: self.identity_template,
                       digest: self.digest }
    }
}

/// Lee y parsea un manifest JSON.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<DeploymentManifest, CoreError> {
    let text = std::fs::read_to_string(path)?;
    Ok(DeploymentManifest::from_json(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.partition, "aws");
        assert_eq!(cfg.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert_eq!(cfg.identity_template, IdentityTemplate::Compact);
        assert_eq!(cfg.digest, DigestAlgorithm::Md5);
        assert!(cfg.namespace.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = AppConfig::from_lookup(lookup(&[("RESINIT_NAMESPACE", "Stack"),
                                                  ("RESINIT_ACCOUNT", "123456789012"),
                                                  ("RESINIT_REGION", "eu-west-1"),
                                                  ("RESINIT_PARTITION", "aws-cn"),
                                                  ("RESINIT_STATE_PATH", "/tmp/s.jsonl"),
                                                  ("RESINIT_IDENTITY_TEMPLATE", "Delimited"),
                                                  ("RESINIT_DIGEST", "blake3")])).unwrap();
        let opts = cfg.build_options();
        assert_eq!(opts.namespace.as_deref(), Some("Stack"));
        assert_eq!(opts.partition.as_deref(), Some("aws-cn"));
        assert_eq!(opts.template, IdentityTemplate::Delimited);
        assert_eq!(opts.digest, DigestAlgorithm::Blake3);
        assert_eq!(cfg.state_path, PathBuf::from("/tmp/s.jsonl"));
    }

    #[test]
    fn unknown_digest_is_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("RESINIT_DIGEST", "sha1")])).unwrap_err();
        assert_eq!(err.to_string(), "Error de configuración: RESINIT_DIGEST=sha1");
    }

    #[test]
    fn manifest_read_errors_are_io_and_parse_errors_are_initializer() {
        let dir = std::env::temp_dir().join(format!("resinit-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        assert!(matches!(read_manifest(dir.join("missing.json")), Err(CoreError::Io(_))));

        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{\"triggers\": 3}").unwrap();
        assert!(matches!(read_manifest(&bad), Err(CoreError::Initializer(_))));

        let ok = dir.join("ok.json");
        std::fs::write(&ok, "{\"namespace\": \"Stack\"}").unwrap();
        assert_eq!(read_manifest(&ok).unwrap().namespace.as_deref(), Some("Stack"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
