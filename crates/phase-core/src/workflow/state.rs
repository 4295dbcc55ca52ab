use std::fmt;

use serde::{Deserialize, Serialize};

/// Máquina de estados del workflow.
///
/// - `NotStarted` -> `Running` (primer `step`)
/// - `Running` -> `Completed` (cursor == número de fases)
/// - `Running` -> `Stalled` (error fatal; el cursor no avanza)
///
/// `clear_state` devuelve cualquier estado a `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    NotStarted,
    Running,
    Completed,
    Stalled,
}

/// Veredicto de una ejecución. Independiente de si el workflow terminó.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowOutcome {
    /// Ningún error registrado.
    FullSuccess,
    /// Hay errores registrados, ninguno fatal.
    PartialSuccess,
    /// Al menos un error registrado es fatal.
    FatalFailure,
}

impl fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FullSuccess => "full success",
            Self::PartialSuccess => "partial success",
            Self::FatalFailure => "fatal failure",
        };
        f.write_str(s)
    }
}

/// Resultado de un `step`: si el bucle de ejecución debe seguir.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    Continue,
    Halt,
}
