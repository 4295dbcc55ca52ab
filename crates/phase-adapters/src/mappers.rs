//! Transformaciones de línea predefinidas para `MapLinesPhase`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("non-ASCII character {found:?} at column {column}")]
    NonAscii { found: char, column: usize },
    #[error("unknown line mode '{0}' (expected upper, lower or trim)")]
    UnknownMode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    #[default]
    Upper,
    Lower,
    Trim,
}

impl LineMode {
    pub fn apply(self, line: &str) -> String {
        match self {
            Self::Upper => line.to_uppercase(),
            Self::Lower => line.to_lowercase(),
            Self::Trim => line.trim().to_string(),
        }
    }

    /// Igual que `apply`, pero rechaza líneas con caracteres no ASCII.
    pub fn apply_ascii(self, line: &str) -> Result<String, LineError> {
        if let Some((idx, found)) = line.char_indices().find(|(_, c)| !c.is_ascii()) {
            let column = line[..idx].chars().count() + 1;
            return Err(LineError::NonAscii { found, column });
        }
        Ok(self.apply(line))
    }
}

impl FromStr for LineMode {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "trim" => Ok(Self::Trim),
            other => Err(LineError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for LineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Upper => "upper",
                        Self::Lower => "lower",
                        Self::Trim => "trim",
                    })
    }
}
