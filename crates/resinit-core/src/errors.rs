//! Errores del núcleo.
//!
//! Un único enum cubre fallos de definición (se devuelven de inmediato al
//! caller) y fallos de apply (se registran en el event log y abortan el
//! apply). Es `Clone + Serialize` para poder viajar dentro de los eventos.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum InitializerError {
    #[error("payload serialization failed: {0}")] Serialization(String),
    #[error("invalid deployment namespace: {0}")] InvalidNamespace(String),
    #[error("invalid deployment environment: {0}")] InvalidEnvironment(String),
    #[error("invalid trigger id: {0}")] InvalidTriggerId(String),
    #[error("invalid unit version: {0}")] InvalidUnitVersion(String),
    #[error("invalid function name: {0}")] InvalidFunctionName(String),
    #[error("invalid sizing: {0}")] InvalidSizing(String),
    #[error("invalid permission pattern: {0}")] InvalidPattern(String),
    #[error("trigger already declared in deployment: {0}")] DuplicateTrigger(String),
    #[error("deployment namespace mismatch: expected {expected}, found {found}")]
    NamespaceMismatch { expected: String, found: String },
    #[error("network provider: {0}")] Network(String),
    #[error("unit provider: {0}")] UnitProvider(String),
    #[error("event store: {0}")] Store(String),
    #[error("action {logical_id} failed: {message}")] ActionFailed { logical_id: String, message: String },
    #[error("action {logical_id} timed out after {seconds}s")] Timeout { logical_id: String, seconds: u64 },
}
