//! Códigos de salida del CLI.

use phase_core::WorkflowOutcome;

pub const FULL_SUCCESS: i32 = 0;
pub const FATAL_FAILURE: i32 = 1;
pub const PARTIAL_SUCCESS: i32 = 2;
/// Configuración inválida o pipeline mal construido (no llegó a ejecutarse).
pub const SETUP_ERROR: i32 = 3;

pub fn for_outcome(outcome: WorkflowOutcome) -> i32 {
    match outcome {
        WorkflowOutcome::FullSuccess => FULL_SUCCESS,
        WorkflowOutcome::PartialSuccess => PARTIAL_SUCCESS,
        WorkflowOutcome::FatalFailure => FATAL_FAILURE,
    }
}
