//! Tipos de evento del workflow y estructura `WorkflowEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución de un `Workflow` emite eventos a un `EventStore`
//!   append-only.
//! - Los eventos son el registro observable de la ejecución; el estado vivo
//!   (registros de valores y errores) sigue dentro del workflow.
//! - El enum `WorkflowEventKind` define el contrato observable y estable del
//!   motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ExecutionErrorKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkflowEventKind {
    /// Primer evento de un `run_id`: fija la `definition_hash` y la cantidad
    /// de fases. Se emite en el primer `step()`.
    WorkflowInitialized { definition_hash: String, phase_count: usize },
    /// Una fase comenzó su ejecución. No implica éxito.
    PhaseStarted { phase_index: usize, phase_id: String, input_type: String },
    /// Una fase terminó sin error fatal. `output_type` es el tipo concreto
    /// registrado (`None` si no emitió valor); `issue` el error no fatal.
    PhaseFinished {
        phase_index: usize,
        phase_id: String,
        output_type: Option<String>,
        issue: Option<String>,
    },
    /// Una fase terminó con error fatal. El workflow no continúa.
    PhaseFailed {
        phase_index: usize,
        phase_id: String,
        kind: ExecutionErrorKind,
        message: String,
    },
    /// Fallo dentro de un hook, manejado o escalado.
    HookFault {
        phase_index: usize,
        phase_id: String,
        stage: String,
        escalated: bool,
    },
    WorkflowCompleted { outcome: String },
    WorkflowStalled { phase_index: usize, phase_id: String },
    /// Barrido de `close`: artifacts cerrados y cierres fallidos (suprimidos).
    ResourcesClosed { closed: usize, failed: usize },
}

impl WorkflowEventKind {
    /// Código corto estable, útil para aserciones y logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WorkflowInitialized { .. } => "I",
            Self::PhaseStarted { .. } => "S",
            Self::PhaseFinished { .. } => "F",
            Self::PhaseFailed { .. } => "X",
            Self::HookFault { .. } => "H",
            Self::WorkflowCompleted { .. } => "C",
            Self::WorkflowStalled { .. } => "T",
            Self::ResourcesClosed { .. } => "R",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub seq: u64, // asignado por el EventStore (orden append)
    pub run_id: Uuid,
    pub kind: WorkflowEventKind,
    pub ts: DateTime<Utc>, // metadato
}
