//! Alcance de permisos de la identidad invocadora compartida.
//!
//! La identidad invocadora es un singleton por namespace que se crea una vez
//! y se reutiliza por todos los triggers de la deployment, incluidos los que
//! se declaran después de calcular el primer permiso. Por eso el recurso es
//! un comodín sobre el sufijo `-ResInit{namespace}` y no el nombre exacto de
//! una unidad: cubre cualquier unidad futura del mismo namespace y excluye
//! las de otros namespaces y otras categorías de función.

use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};

use crate::constants::{FUNCTION_NAME_SUFFIX, INVOKE_ACTION};
use crate::deployment::DeploymentEnv;
use crate::errors::InitializerError;

/// Par (patrón de recurso, acción). Los patrones siguen la semántica de
/// comodines de IAM: `*` cualquier secuencia, `?` un carácter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionScope {
    pub resource_pattern: String,
    pub action: String,
}

impl PermissionScope {
    pub fn new(resource_pattern: impl Into<String>, action: impl Into<String>) -> Result<Self, InitializerError> {
        let resource_pattern = resource_pattern.into();
        compile(&resource_pattern)?;
        Ok(Self { resource_pattern,
                  action: action.into() })
    }

    /// ¿El patrón cubre el ARN dado?
    pub fn matches(&self, resource_arn: &str) -> bool {
        compile(&self.resource_pattern).map(|m| m.is_match(resource_arn))
                                       .unwrap_or(false)
    }

    /// ¿El patrón cubre la función `function_name` del entorno dado?
    pub fn matches_function(&self, env: &DeploymentEnv, function_name: &str) -> bool {
        self.matches(&env.function_arn(function_name))
    }

    pub fn allows(&self, action: &str, resource_arn: &str) -> bool { self.action == action && self.matches(resource_arn) }
}

fn compile(pattern: &str) -> Result<GlobMatcher, InitializerError> {
    if pattern.is_empty() {
        return Err(InitializerError::InvalidPattern("empty".into()));
    }
    if pattern.contains(['[', ']', '{', '}', '\\']) {
        return Err(InitializerError::InvalidPattern(format!("unsupported characters in {pattern:?}")));
    }
    Glob::new(pattern).map(|g| g.compile_matcher())
                      .map_err(|e| InitializerError::InvalidPattern(e.to_string()))
}

/// Deriva el alcance mínimo reutilizable para un namespace.
#[derive(Debug, Clone)]
pub struct PermissionScoper<'a> {
    env: &'a DeploymentEnv,
}

impl<'a> PermissionScoper<'a> {
    pub fn new(env: &'a DeploymentEnv) -> Self { Self { env } }

    /// `arn:{partition}:lambda:{region}:{account}:function:*-ResInit{namespace}`
    pub fn scope(&self) -> Result<PermissionScope, InitializerError> {
        // Un namespace vacío produciría `*-ResInit`, válido para todas las
        // deployments de la cuenta.
        self.env.validate()?;
        let pattern = format!("arn:{}:lambda:{}:{}:function:*-{}{}",
                              self.env.partition, self.env.region, self.env.account, FUNCTION_NAME_SUFFIX, self.env.namespace);
        PermissionScope::new(pattern, INVOKE_ACTION)
    }
}
