use std::any::Any;

use super::hook::ExecutionHook;
use crate::model::{ArtifactRef, EmittedValue, ExecutionError, PhaseFault, TypeTag};

/// Trait neutro que el `Workflow` usa para ejecutar fases.
///
/// La mayoría de las fases se escriben con `TypedPhase` (input/output
/// concretos) y obtienen esta interfaz por la implementación blanket.
/// Implementar `PhaseDefinition` directamente sólo es necesario para fases
/// que piden su input por una capacidad (`dyn Trait`) en lugar de por un tipo
/// concreto.
pub trait PhaseDefinition: Any {
    /// Identificador estable y único dentro del workflow.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Identidad de la fase para el registro de errores: su tipo concreto,
    /// no la instancia. Normalmente `TypeTag::of::<Self>()`.
    fn phase_type(&self) -> TypeTag;

    /// Tipo (o capacidad) que la fase requiere como input. `TypeTag::void()`
    /// para productoras puras. Sólo se usa para la comprobación de
    /// asignabilidad, no para despachar.
    fn declared_input(&self) -> TypeTag;

    /// Tipo emitido; informativo (describe, reportes).
    fn output_type(&self) -> TypeTag;

    /// Cuerpo de la fase. Puede fallar devolviendo `Err` o incluso entrar en
    /// pánico: `run_guarded` contiene ambos casos.
    fn execute(&self,
               input: Option<ArtifactRef>,
               incoming_error: Option<ExecutionError>)
               -> Result<EmittedValue<ArtifactRef>, PhaseFault>;

    fn hook(&self) -> Option<&ExecutionHook> {
        None
    }
}
