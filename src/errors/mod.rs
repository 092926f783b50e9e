//! Errores de la fachada: `CoreError` (infraestructura y configuración) y
//! `DomainError` (clasificación de los errores del core).

pub mod core_error;
pub mod domain_error;

pub use core_error::CoreError;
pub use domain_error::DomainError;
