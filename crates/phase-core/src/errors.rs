//! Errores de uso del orquestador.
//!
//! Estos errores describen llamadas ilegales sobre la máquina de estados del
//! `Workflow` (añadir fases tras arrancar, avanzar un flujo detenido, ...).
//! Los fallos de las propias fases nunca llegan aquí: se registran como
//! `ExecutionError` dentro del workflow.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum WorkflowError {
    #[error("no phases to execute")]
    NoPhases,
    #[error("duplicate phase '{0}'")]
    DuplicatePhase(String),
    #[error("workflow already started; phases can only be appended before the first step")]
    AlreadyStarted,
    #[error("workflow has already fully completed")]
    AlreadyCompleted,
    #[error("workflow stalled at phase '{phase_id}' (index {index}) after a fatal error")]
    Stalled { index: usize, phase_id: String },
}
