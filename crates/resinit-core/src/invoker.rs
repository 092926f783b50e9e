//! Identidad invocadora compartida y su registro explícito por namespace.
//!
//! El registro se inyecta en cada construcción de trigger: la relación de
//! compartición queda visible (y testeable) en lugar de resolverse con un
//! singleton implícito.

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{INVOKER_PRINCIPAL, INVOKER_ROLE_SUFFIX};
use crate::deployment::DeploymentEnv;
use crate::errors::InitializerError;
use crate::permission::PermissionScope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokerIdentity {
    pub name: String,
    pub assumed_by: String,
    statements: Vec<PermissionScope>,
}

impl InvokerIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               assumed_by: INVOKER_PRINCIPAL.to_string(),
               statements: vec![] }
    }

    /// Añade el alcance si no estaba. Devuelve `false` cuando ya existía.
    /// Nunca elimina alcances concedidos.
    pub fn grant(&mut self, scope: PermissionScope) -> bool {
        if self.statements.contains(&scope) {
            debug!("invoker {} already holds {}", self.name, scope.resource_pattern);
            return false;
        }
        info!("invoker {} granted {} on {}", self.name, scope.action, scope.resource_pattern);
        self.statements.push(scope);
        true
    }

    pub fn statements(&self) -> &[PermissionScope] { &self.statements }

    pub fn can_invoke(&self, action: &str, resource_arn: &str) -> bool {
        self.statements.iter().any(|s| s.allows(action, resource_arn))
    }
}

/// Registro de identidades invocadoras, una por namespace, creadas en el
/// primer uso.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvokerRegistry {
    by_namespace: IndexMap<String, InvokerIdentity>,
}

impl InvokerRegistry {
    pub fn new() -> Self { Self::default() }

    /// Devuelve (creándola si hace falta) la identidad del namespace.
    pub fn obtain(&mut self, env: &DeploymentEnv) -> Result<&mut InvokerIdentity, InitializerError> {
        env.validate()?;
        Ok(self.by_namespace
               .entry(env.namespace.clone())
               .or_insert_with(|| InvokerIdentity::new(format!("{}{}", env.namespace, INVOKER_ROLE_SUFFIX))))
    }

    pub fn get(&self, namespace: &str) -> Option<&InvokerIdentity> { self.by_namespace.get(namespace) }

    pub fn len(&self) -> usize { self.by_namespace.len() }

    pub fn is_empty(&self) -> bool { self.by_namespace.is_empty() }
}
