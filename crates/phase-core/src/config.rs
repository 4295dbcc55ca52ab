//! Configuración del workflow desde variables de entorno.
//! Usa la convención `PHASEFLOW_*`; un archivo `.env` se carga una sola vez.

use std::env;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::constants::{ENV_CLEAR_ON_CLOSE, ENV_DEBUG};

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Fuerza la carga de .env; los binarios la llaman antes de leer el entorno.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

/// Qué limpiar después del barrido de recursos de `Workflow::close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearFlags(u8);

impl ClearFlags {
    pub const NONE: Self = Self(0);
    pub const PHASE_ERRORS: Self = Self(0b1);
    pub const EMITTED_VALUES: Self = Self(0b10);
    pub const STATE: Self = Self(0b100);
    pub const EXECUTION_ARTIFACTS: Self = Self(Self::PHASE_ERRORS.0 | Self::EMITTED_VALUES.0);
    pub const ALL: Self = Self(Self::EXECUTION_ARTIFACTS.0 | Self::STATE.0);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parsea una lista separada por comas (`errors,values,state,artifacts,all`).
    pub fn parse_list(raw: &str) -> Result<Self, ConfigError> {
        raw.split(',')
           .map(str::trim)
           .filter(|s| !s.is_empty())
           .try_fold(Self::NONE, |acc, item| {
               let flag = match item.to_ascii_lowercase().as_str() {
                   "errors" => Self::PHASE_ERRORS,
                   "values" => Self::EMITTED_VALUES,
                   "state" => Self::STATE,
                   "artifacts" => Self::EXECUTION_ARTIFACTS,
                   "all" => Self::ALL,
                   "none" => Self::NONE,
                   _ => {
                       return Err(ConfigError::Invalid { var: ENV_CLEAR_ON_CLOSE,
                                                         value: item.to_string() })
                   }
               };
               Ok(acc | flag)
           })
    }
}

impl BitOr for ClearFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ClearFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ClearFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.contains(Self::PHASE_ERRORS) {
            parts.push("errors");
        }
        if self.contains(Self::EMITTED_VALUES) {
            parts.push("values");
        }
        if self.contains(Self::STATE) {
            parts.push("state");
        }
        if parts.is_empty() {
            parts.push("none");
        }
        f.write_str(&parts.join(","))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowConfig {
    /// Registra la representación `Debug` completa de las causas de fallo.
    pub debug: bool,
    /// Limpiezas aplicadas al final de `close`.
    pub clear_on_close: ClearFlags,
}

impl WorkflowConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectada.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let debug = match lookup(ENV_DEBUG) {
            None => false,
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid { var: ENV_DEBUG,
                                                                   value: v })?,
        };
        let clear_on_close = match lookup(ENV_CLEAR_ON_CLOSE) {
            None => ClearFlags::NONE,
            Some(v) => ClearFlags::parse_list(&v)?,
        };
        Ok(Self { debug, clear_on_close })
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_clear_on_close(mut self, flags: ClearFlags) -> Self {
        self.clear_on_close = flags;
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = WorkflowConfig::from_lookup(|_| None).unwrap();
        assert!(!cfg.debug);
        assert!(cfg.clear_on_close.is_empty());
    }

    #[test]
    fn parses_debug_and_flag_list() {
        let cfg = WorkflowConfig::from_lookup(lookup_from(&[(ENV_DEBUG, "true"),
                                                            (ENV_CLEAR_ON_CLOSE, "errors, values")])).unwrap();
        assert!(cfg.debug);
        assert_eq!(cfg.clear_on_close, ClearFlags::EXECUTION_ARTIFACTS);
        assert!(!cfg.clear_on_close.contains(ClearFlags::STATE));
    }

    #[test]
    fn composite_flags_contain_their_parts() {
        assert!(ClearFlags::ALL.contains(ClearFlags::STATE));
        assert!(ClearFlags::ALL.contains(ClearFlags::EXECUTION_ARTIFACTS));
        assert_eq!(ClearFlags::parse_list("all").unwrap(), ClearFlags::ALL);
        assert_eq!(ClearFlags::ALL.to_string(), "errors,values,state");
    }

    #[test]
    fn rejects_unknown_values() {
        let err = WorkflowConfig::from_lookup(lookup_from(&[(ENV_CLEAR_ON_CLOSE, "errors,bogus")])).unwrap_err();
        assert_eq!(err,
                   ConfigError::Invalid { var: ENV_CLEAR_ON_CLOSE,
                                          value: "bogus".into() });
        assert!(WorkflowConfig::from_lookup(lookup_from(&[(ENV_DEBUG, "maybe")])).is_err());
    }
}
