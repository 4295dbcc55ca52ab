//! phase-core: motor de fases tipadas con contención de fallos
pub mod config;
pub mod constants;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod phase;
pub mod workflow;

pub use config::{ClearFlags, ConfigError, WorkflowConfig};
pub use errors::WorkflowError;
pub use event::{EventStore, InMemoryEventStore, WorkflowEvent, WorkflowEventKind};
pub use model::{capability_box, downcast_artifact, view_as, AnyArtifact, Artifact, ArtifactRef, EmittedValue, ErrorAggregate,
                ExecutionError, ExecutionErrorKind, PhaseFault, TypeTag, Void};
pub use phase::{ExecutionHook, FnPhase, GuardedPhase, HookStage, Hooked, PhaseDefinition, PhaseExt, PhaseStatus,
                TypedPhase};
pub use workflow::{CloseSummary, StepSignal, Workflow, WorkflowBuilder, WorkflowOutcome, WorkflowReport, WorkflowState};
