use std::rc::Rc;

use phase_core::{EmittedValue, ExecutionError, PhaseFault, TypedPhase};

use crate::artifacts::{FileContents, OpenedFile};

/// Lee el contenido completo de un `OpenedFile`.
#[derive(Debug, Clone)]
pub struct ReadContentsPhase {
    id: String,
}

impl ReadContentsPhase {
    pub fn new() -> Self {
        Self { id: "read_contents".to_string() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Default for ReadContentsPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedPhase for ReadContentsPhase {
    type Input = OpenedFile;
    type Output = FileContents;

    fn id(&self) -> &str {
        &self.id
    }

    fn run_typed(&self,
                 input: Option<Rc<OpenedFile>>,
                 incoming_error: Option<ExecutionError>)
                 -> Result<EmittedValue<FileContents>, PhaseFault> {
        let Some(file) = input else {
            return Ok(EmittedValue::failed(ExecutionError::fatal("failed to read file contents").with_incoming(incoming_error)));
        };

        match file.read_all() {
            Ok(bytes) => {
                log::debug!("read {} byte(s) from {}", bytes.len(), file.path().display());
                Ok(EmittedValue::produced(FileContents { source: file.path().to_path_buf(),
                                                         bytes }))
            }
            Err(e) => Ok(EmittedValue::failed(ExecutionError::fatal(format!("failed to read {}",
                                                                            file.path().display())).caused_by(e))),
        }
    }
}
