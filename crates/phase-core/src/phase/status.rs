use serde::{Deserialize, Serialize};

use crate::model::EmittedValue;

/// Estado de una fase dentro de un workflow.
///
/// Las transiciones válidas son:
/// - `Pending` -> `Finished` | `FinishedWithIssue` | `Failed`
///
/// Una fase se ejecuta como mucho una vez por posición; no hay reversiones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseStatus {
    /// Aún no ejecutada.
    Pending,
    /// Terminó sin error (incluye `NoOp`).
    Finished,
    /// Terminó con un error no fatal.
    FinishedWithIssue,
    /// Terminó con un error fatal; el workflow queda detenido en ella.
    Failed,
}

impl PhaseStatus {
    pub fn from_emitted<T>(emitted: &EmittedValue<T>) -> Self {
        match emitted.error() {
            None => Self::Finished,
            Some(e) if e.is_fatal() => Self::Failed,
            Some(_) => Self::FinishedWithIssue,
        }
    }
}
