use std::rc::Rc;

use phase_core::{Artifact, EmittedValue, ExecutionError, PhaseFault, TypedPhase, Void};

use crate::artifacts::OpenedFile;

/// Libera el handle de un `OpenedFile`. No emite nada.
#[derive(Debug, Clone)]
pub struct CloseFilePhase {
    id: String,
}

impl CloseFilePhase {
    pub fn new() -> Self {
        Self { id: "close_file".to_string() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Default for CloseFilePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedPhase for CloseFilePhase {
    type Input = OpenedFile;
    type Output = Void;

    fn id(&self) -> &str {
        &self.id
    }

    fn run_typed(&self,
                 input: Option<Rc<OpenedFile>>,
                 incoming_error: Option<ExecutionError>)
                 -> Result<EmittedValue<Void>, PhaseFault> {
        let Some(file) = input else {
            return Ok(EmittedValue::failed(ExecutionError::fatal("failed to close the target file").with_incoming(incoming_error)));
        };
        file.close()?;
        Ok(EmittedValue::NoOp)
    }
}
