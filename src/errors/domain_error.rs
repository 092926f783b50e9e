use resinit_core::InitializerError;
use thiserror::Error;

/// Errores del dominio de la aplicación
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entidad no encontrada: {0}")]
    NotFound(String),
    /// Error en tiempo de definición: la deployment no llega a construirse.
    #[error("Validación fallida: {0}")]
    Validation(String),
    /// Error en tiempo de apply: la acción quedó registrada como fallida.
    #[error("Ejecución fallida: {0}")]
    Execution(String),
}

impl From<InitializerError> for DomainError {
    fn from(err: InitializerError) -> Self {
        match err {
            InitializerError::ActionFailed { .. } | InitializerError::Timeout { .. } => DomainError::Execution(err.to_string()),
            // el store falla fuera de la definición, pero no es un fallo de la acción
            InitializerError::Store(_) => DomainError::Execution(err.to_string()),
            other => DomainError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variant_format() {
        let err = DomainError::NotFound("Init".into());
        assert_eq!(err.to_string(), "Entidad no encontrada: Init");
    }

    #[test]
    fn test_validation_variant_format() {
        let err = DomainError::Validation("inválido".into());
        assert_eq!(err.to_string(), "Validación fallida: inválido");
    }

    #[test]
    fn test_definition_errors_are_validation() {
        let err: DomainError = InitializerError::InvalidSizing("memory 64".into()).into();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_apply_errors_are_execution() {
        let err: DomainError = InitializerError::Timeout { logical_id: "Init".into(),
                                                          seconds: 600 }.into();
        assert_eq!(err.to_string(), "Ejecución fallida: action Init timed out after 600s");
    }
}
