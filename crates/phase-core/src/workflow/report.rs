//! Resumen serializable de una ejecución (salida `--json` del CLI).

use serde::Serialize;
use uuid::Uuid;

use super::state::{WorkflowOutcome, WorkflowState};
use crate::model::ExecutionErrorKind;
use crate::phase::PhaseStatus;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub run_id: Uuid,
    pub definition_hash: String,
    pub state: WorkflowState,
    pub outcome: WorkflowOutcome,
    pub progress_percent: f32,
    pub phases: Vec<PhaseReport>,
    /// En orden cronológico (primera inserción por fase).
    pub errors: Vec<ErrorSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    pub status: PhaseStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorSummary {
    pub phase_id: String,
    pub kind: ExecutionErrorKind,
    pub fatal: bool,
    pub message: String,
}
