//! Unidad invocable: referenciada por el trigger, propiedad del proveedor que
//! la construye y despliega.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::NetworkPlacement;
use crate::constants::{DEFAULT_MEMORY_SIZE, MAX_FUNCTION_TIMEOUT, MAX_MEMORY_SIZE, MIN_MEMORY_SIZE};
use crate::errors::InitializerError;

/// Retención de logs (passthrough, el core no la interpreta).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRetention {
    OneDay,
    ThreeDays,
    OneWeek,
    TwoWeeks,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    Infinite,
}

impl LogRetention {
    /// Días de retención; `None` para `Infinite`.
    pub fn days(self) -> Option<u32> {
        match self {
            LogRetention::OneDay => Some(1),
            LogRetention::ThreeDays => Some(3),
            LogRetention::OneWeek => Some(7),
            LogRetention::TwoWeeks => Some(14),
            LogRetention::OneMonth => Some(30),
            LogRetention::ThreeMonths => Some(90),
            LogRetention::SixMonths => Some(180),
            LogRetention::OneYear => Some(365),
            LogRetention::Infinite => None,
        }
    }

    /// Valor más cercano por arriba a `days`.
    pub fn from_days(days: u32) -> Self {
        [LogRetention::OneDay,
         LogRetention::ThreeDays,
         LogRetention::OneWeek,
         LogRetention::TwoWeeks,
         LogRetention::OneMonth,
         LogRetention::ThreeMonths,
         LogRetention::SixMonths,
         LogRetention::OneYear].into_iter()
                               .find(|r| r.days().is_some_and(|d| d >= days))
                               .unwrap_or(LogRetention::Infinite)
    }
}

/// Dimensionamiento de la unidad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizing {
    pub memory_size: u32,
    pub timeout: Duration,
}

impl Sizing {
    /// Aplica el default de memoria y valida rangos.
    pub fn new(memory_size: Option<u32>, timeout: Duration) -> Result<Self, InitializerError> {
        let memory_size = memory_size.unwrap_or(DEFAULT_MEMORY_SIZE);
        if !(MIN_MEMORY_SIZE..=MAX_MEMORY_SIZE).contains(&memory_size) {
            return Err(InitializerError::InvalidSizing(format!("memory size {memory_size} outside {MIN_MEMORY_SIZE}..={MAX_MEMORY_SIZE}")));
        }
        if timeout.is_zero() || timeout > MAX_FUNCTION_TIMEOUT {
            return Err(InitializerError::InvalidSizing(format!("function timeout {}s outside 1..={}s",
                                                               timeout.as_secs(),
                                                               MAX_FUNCTION_TIMEOUT.as_secs())));
        }
        Ok(Self { memory_size, timeout })
    }
}

/// Todo lo que el proveedor necesita para desplegar la unidad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDeploySpec {
    pub function_name: String,
    /// Referencia opaca al código (imagen, asset, ...).
    pub code: String,
    pub placement: NetworkPlacement,
    pub sizing: Sizing,
    pub log_retention: LogRetention,
}

/// Unidad desplegada. `version` cambia siempre que cambia el código.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocableUnit {
    pub name: String,
    pub version: String,
    pub placement: NetworkPlacement,
    pub sizing: Sizing,
    pub log_retention: LogRetention,
}
