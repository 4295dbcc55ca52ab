//! Frontera de contención de fallos de una fase.
//!
//! `run_guarded` es el único punto por el que el `Workflow` invoca una fase.
//! Garantía: una fase puede corromper su propio output, pero nunca abortar
//! el bucle del orquestador desenrollando a través de él.

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, error};

use super::definition::PhaseDefinition;
use crate::model::{satisfies, ArtifactRef, EmittedValue, ExecutionError, PanicFault};

pub trait GuardedPhase {
    fn run_guarded(&self,
                   input: Option<ArtifactRef>,
                   incoming_error: Option<ExecutionError>)
                   -> EmittedValue<ArtifactRef>;
}

impl<P: PhaseDefinition + ?Sized> GuardedPhase for P {
    fn run_guarded(&self,
                   input: Option<ArtifactRef>,
                   incoming_error: Option<ExecutionError>)
                   -> EmittedValue<ArtifactRef> {
        if input.is_none() && incoming_error.is_none() {
            return EmittedValue::Failed(ExecutionError::invalid_invocation(
                "input and incoming error must not both be absent",
            ));
        }

        let declared = self.declared_input();
        if let Some(value) = &input {
            if !satisfies(value.as_ref(), declared) {
                return EmittedValue::Failed(ExecutionError::invalid_invocation(format!(
                    "invalid input type {} (expected {declared} or a value declaring it)",
                    value.type_tag()
                )));
            }
        }

        debug!("phase '{}' executing (input: {:?}, incoming error: {})",
               self.id(),
               input.as_ref().map(|v| v.type_tag()),
               incoming_error.is_some());

        match catch_unwind(AssertUnwindSafe(|| self.execute(input, incoming_error))) {
            Ok(Ok(emitted)) => emitted,
            Ok(Err(fault)) => {
                error!("phase '{}' failed with an unhandled fault: {fault}", self.id());
                EmittedValue::Failed(ExecutionError::internal_fault(fault))
            }
            Err(payload) => {
                let panic = PanicFault::from_payload(payload);
                error!("phase '{}' panicked: {}", self.id(), panic.message);
                EmittedValue::Failed(ExecutionError::internal_fault(Box::new(panic)))
            }
        }
    }
}
