//! Constantes del núcleo de inicialización.
//!
//! Varias de estas constantes forman parte de identificadores que el
//! orquestador persiste (`PhysicalIdentity`, nombres de función, patrón de
//! permisos). Cambiarlas invalida las identidades registradas y fuerza una
//! nueva invocación de todos los triggers de la deployment.

use std::time::Duration;

/// Longitud fija (en caracteres hex) del prefijo de digest que entra en la
/// identidad física. Una colisión en estos 6 caracteres implica una
/// re-invocación perdida; es un riesgo aceptado, no un error.
pub const DIGEST_PREFIX_LEN: usize = 6;

/// Marcador entre el id del trigger y `version + digest` en la identidad.
pub const SDK_CALL_MARKER: &str = "-AwsSdkCall-";

/// Sufijo fijo que distingue las funciones de inicialización del resto de
/// funciones de la misma cuenta/región: `{id}-ResInit{namespace}`.
pub const FUNCTION_NAME_SUFFIX: &str = "ResInit";

/// Sufijo del grupo de aislamiento dedicado: `{id}ResourceInitializerFnSg`.
pub const SECURITY_GROUP_SUFFIX: &str = "ResourceInitializerFnSg";

/// Sufijo del invocador compartido por namespace.
pub const INVOKER_ROLE_SUFFIX: &str = "-ResInitInvokerRole";

/// Principal que asume la identidad invocadora.
pub const INVOKER_PRINCIPAL: &str = "lambda.amazonaws.com";

/// Acción concedida por el `PermissionScope`.
pub const INVOKE_ACTION: &str = "lambda:InvokeFunction";

/// Campo de la respuesta expuesto como `TriggerResult`.
pub const RESPONSE_FIELD: &str = "Payload";

/// Memoria por defecto (MB) cuando el caller no la especifica.
pub const DEFAULT_MEMORY_SIZE: u32 = 128;
pub const MIN_MEMORY_SIZE: u32 = 128;
pub const MAX_MEMORY_SIZE: u32 = 10_240;

/// Límite superior del timeout propio de la función.
pub const MAX_FUNCTION_TIMEOUT: Duration = Duration::from_secs(900);

/// Timeout de la acción gestionada. Independiente del timeout de la función:
/// cubre el overhead del orquestador más la ejecución remota.
pub const TRIGGER_TIMEOUT: Duration = Duration::from_secs(600);

/// Longitud máxima de un nombre de función.
pub const MAX_FUNCTION_NAME_LEN: usize = 64;

/// Longitud máxima de un namespace de deployment.
pub const MAX_NAMESPACE_LEN: usize = 128;
