//! phaseflow
//!
//! Fachada del workspace:
//! - `core`: motor de fases (`phase-core`): carrier, errores, hooks,
//!   `Workflow` y eventos.
//! - `adapters`: fases de archivo/texto (`phase-adapters`).
//! - `prelude`: lo necesario para declarar fases y ejecutar un workflow.

pub use phase_adapters as adapters;
pub use phase_core as core;

pub mod prelude {
	pub use phase_adapters::phases::{CloseFilePhase, EmitValuePhase, MapLinesPhase, OpenFilePhase, ReadContentsPhase,
	                                 SaveFilePhase};
	pub use phase_adapters::{AsBytes, FileContents, LineMode, OpenedFile, TextLines};
	pub use phase_core::{typed_artifact, typed_phase, view_as, Artifact, ArtifactRef, EmittedValue, ExecutionError,
	                     ExecutionErrorKind, ExecutionHook, FnPhase, PhaseDefinition, PhaseExt, PhaseFault, TypeTag,
	                     TypedPhase, Void, Workflow, WorkflowConfig, WorkflowOutcome, WorkflowState};
}
