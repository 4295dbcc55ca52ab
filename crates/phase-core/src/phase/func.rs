//! Fases a partir de closures y envoltorio con hook.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::definition::PhaseDefinition;
use super::hook::ExecutionHook;
use super::typed::TypedPhase;
use crate::model::{Artifact, ArtifactRef, EmittedValue, ExecutionError, PhaseFault, TypeTag};

/// Fase tipada cuyo cuerpo es una closure. Cada closure tiene su propio tipo,
/// así que dos `FnPhase` distintas nunca comparten identidad de fase.
pub struct FnPhase<I, O, F> {
    id: String,
    f: F,
    _io: PhantomData<fn(I) -> O>,
}

impl<I, O, F> FnPhase<I, O, F>
    where I: Artifact,
          O: Artifact,
          F: Fn(Option<Rc<I>>, Option<ExecutionError>) -> Result<EmittedValue<O>, PhaseFault> + 'static
{
    pub fn new(id: impl Into<String>, f: F) -> Self {
        Self { id: id.into(),
               f,
               _io: PhantomData }
    }
}

impl<I, O, F> TypedPhase for FnPhase<I, O, F>
    where I: Artifact,
          O: Artifact,
          F: Fn(Option<Rc<I>>, Option<ExecutionError>) -> Result<EmittedValue<O>, PhaseFault> + 'static
{
    type Input = I;
    type Output = O;

    fn id(&self) -> &str {
        &self.id
    }

    fn run_typed(&self,
                 input: Option<Rc<I>>,
                 incoming_error: Option<ExecutionError>)
                 -> Result<EmittedValue<O>, PhaseFault> {
        (self.f)(input, incoming_error)
    }
}

impl<I, O, F> fmt::Debug for FnPhase<I, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPhase").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Fase con un `ExecutionHook` adjunto. Delega todo en la fase interna,
/// incluida su identidad (`phase_type`).
pub struct Hooked<P> {
    inner: P,
    hook: ExecutionHook,
}

impl<P: PhaseDefinition> PhaseDefinition for Hooked<P> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn phase_type(&self) -> TypeTag {
        self.inner.phase_type()
    }

    fn declared_input(&self) -> TypeTag {
        self.inner.declared_input()
    }

    fn output_type(&self) -> TypeTag {
        self.inner.output_type()
    }

    fn execute(&self,
               input: Option<ArtifactRef>,
               incoming_error: Option<ExecutionError>)
               -> Result<EmittedValue<ArtifactRef>, PhaseFault> {
        self.inner.execute(input, incoming_error)
    }

    fn hook(&self) -> Option<&ExecutionHook> {
        Some(&self.hook)
    }
}

pub trait PhaseExt: PhaseDefinition + Sized {
    /// Adjunta (o reemplaza) el hook de ejecución de la fase.
    fn with_hook(self, hook: ExecutionHook) -> Hooked<Self> {
        Hooked { inner: self, hook }
    }
}

impl<P: PhaseDefinition> PhaseExt for P {}
