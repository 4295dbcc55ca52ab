//! Orquestación de fases.
//!
//! `Workflow` mantiene la secuencia de fases, el registro de valores emitidos
//! (por tipo concreto) y el registro de errores (por identidad de fase), y
//! conduce la ejecución secuencial hasta completar o detenerse.

mod builder;
mod core;
pub mod registry;
mod report;
mod state;

pub use builder::WorkflowBuilder;
pub use core::{CloseSummary, Workflow};
pub use registry::{ErrorRecord, ErrorRegistry, ValueRegistry};
pub use report::{ErrorSummary, PhaseReport, WorkflowReport};
pub use state::{StepSignal, WorkflowOutcome, WorkflowState};
