//! Modelos neutrales (TypeTag, Artifact, EmittedValue, ExecutionError).

pub mod artifact;
pub mod emitted;
pub mod error;
pub mod type_tag;

pub use artifact::{capability_box, downcast_artifact, satisfies, view_as, AnyArtifact, Artifact, ArtifactRef, Void};
pub use emitted::EmittedValue;
pub use error::{ErrorAggregate, ExecutionError, ExecutionErrorKind, PanicFault, PhaseFault};
pub use type_tag::TypeTag;
