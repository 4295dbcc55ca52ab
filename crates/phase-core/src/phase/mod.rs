//! Definiciones relacionadas a fases.
//!
//! Una fase es una unidad de trabajo tipada que consume a lo sumo un
//! artifact (resuelto por tipo) y un error entrante, y emite un
//! `EmittedValue`. Este módulo define:
//! - `PhaseDefinition`: interfaz neutral usada por el workflow.
//! - `TypedPhase`: interfaz de alto nivel con tipos fuertes.
//! - `GuardedPhase::run_guarded`: frontera de contención de fallos.
//! - `ExecutionHook`: callbacks antes/después de ejecutar.

pub mod definition;
pub mod func;
pub mod guard;
pub mod hook;
pub mod macros;
mod status;
pub mod typed;

pub use definition::PhaseDefinition;
pub use func::{FnPhase, Hooked, PhaseExt};
pub use guard::GuardedPhase;
pub use hook::{ExecutionHook, HookStage, HookVerdict};
pub use status::PhaseStatus;
pub use typed::TypedPhase;
