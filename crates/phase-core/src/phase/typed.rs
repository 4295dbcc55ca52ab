use std::rc::Rc;

use super::hook::ExecutionHook;
use crate::model::{downcast_artifact, Artifact, ArtifactRef, EmittedValue, ExecutionError, PhaseFault, TypeTag};

/// Interfaz de alto nivel para definir fases con tipos fuertes
/// (Input / Output).
///
/// Implementadores escriben `run_typed` con tipos concretos; el adaptador de
/// abajo convierte esa ejecución a la interfaz neutra `PhaseDefinition`.
pub trait TypedPhase: 'static {
    /// Tipo concreto esperado como input. `Void` para productoras puras.
    type Input: Artifact;
    /// Tipo concreto producido.
    type Output: Artifact;

    fn id(&self) -> &str;

    fn name(&self) -> &str {
        self.id()
    }

    fn hook(&self) -> Option<&ExecutionHook> {
        None
    }

    /// Ejecución tipada. Con input `Void`, `input` siempre es `None` y
    /// `incoming_error` trae el "target not produced" de la resolución, que
    /// una productora simplemente ignora.
    fn run_typed(&self,
                 input: Option<Rc<Self::Input>>,
                 incoming_error: Option<ExecutionError>)
                 -> Result<EmittedValue<Self::Output>, PhaseFault>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedPhase` implementa `PhaseDefinition` neutro.
// -------------------------------------------------------------
impl<T> crate::phase::PhaseDefinition for T where T: TypedPhase
{
    fn id(&self) -> &str {
        <Self as TypedPhase>::id(self)
    }

    fn name(&self) -> &str {
        <Self as TypedPhase>::name(self)
    }

    fn phase_type(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn declared_input(&self) -> TypeTag {
        TypeTag::of::<T::Input>()
    }

    fn output_type(&self) -> TypeTag {
        TypeTag::of::<T::Output>()
    }

    fn execute(&self,
               input: Option<ArtifactRef>,
               incoming_error: Option<ExecutionError>)
               -> Result<EmittedValue<ArtifactRef>, PhaseFault> {
        let typed_in = match input {
            Some(value) => match downcast_artifact::<T::Input>(&value) {
                Some(v) => Some(v),
                None => {
                    return Ok(EmittedValue::Failed(ExecutionError::invalid_invocation(format!(
                        "phase '{}' cannot consume a value of type {} as {}",
                        <Self as TypedPhase>::id(self),
                        value.type_tag(),
                        TypeTag::of::<T::Input>()
                    ))))
                }
            },
            None => None,
        };

        let emitted = <Self as TypedPhase>::run_typed(self, typed_in, incoming_error)?;
        Ok(emitted.map(|v| Rc::new(v) as ArtifactRef))
    }

    fn hook(&self) -> Option<&ExecutionHook> {
        <Self as TypedPhase>::hook(self)
    }
}
