//! resinit Rust Library
//!
//! Fachada del workspace:
//! - Expone `errors` para manejar errores de núcleo y dominio.
//! - Expone `config` para leer el entorno de la deployment (.env incluido).
//! - Reexporta `resinit_core` y `resinit_adapters`.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes (la CLI).

pub mod config;
pub mod errors;

pub use resinit_adapters as adapters;
pub use resinit_core as core_api;

pub use config::{read_manifest, AppConfig};
pub use errors::{CoreError, DomainError};

use resinit_core::repo::{ActionState, DeploymentState};

/// Acción registrada en el estado, o `DomainError::NotFound`.
pub fn recorded_action<'a>(state: &'a DeploymentState, logical_id: &str) -> Result<&'a ActionState, DomainError> {
    state.action(logical_id)
         .ok_or_else(|| DomainError::NotFound(format!("{logical_id} en {}", state.namespace)))
}

#[cfg(test)]
mod tests {
	use super::errors::{core_error::CoreError, domain_error::DomainError};

	#[test]
	fn core_error_tests() {
		let i = CoreError::Internal("fallo".into()).to_string();
		assert_eq!(i, "Error interno: fallo");
	}

	#[test]
	fn unknown_action_is_not_found() {
		let state = resinit_core::DeploymentState { namespace: "Stack".into(),
		                                            ..Default::default() };
		let err = super::recorded_action(&state, "Init").unwrap_err();
		assert_eq!(err.to_string(), "Entidad no encontrada: Init en Stack");
	}

	#[test]
	fn domain_error_tests() {
		let d = DomainError::Validation("x".into()).to_string();
		assert_eq!(d, "Validación fallida: x");
	}
}
