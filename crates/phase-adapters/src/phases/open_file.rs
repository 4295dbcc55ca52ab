use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

use phase_core::{EmittedValue, ExecutionError, PhaseFault, TypedPhase, Void};

use crate::artifacts::OpenedFile;

/// Abre un archivo regular para lectura.
///
/// - No existe o no es un archivo regular: fatal.
/// - No se puede abrir: fatal, con el error de IO como causa.
/// - Sólo lectura: éxito parcial (error no fatal), ya que las fases
///   posteriores no podrán escribirlo en el sitio.
#[derive(Debug, Clone)]
pub struct OpenFilePhase {
    id: String,
    path: PathBuf,
}

impl OpenFilePhase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { id: "open_file".to_string(),
               path: path.into() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl TypedPhase for OpenFilePhase {
    type Input = Void;
    type Output = OpenedFile;

    fn id(&self) -> &str {
        &self.id
    }

    fn run_typed(&self, _: Option<Rc<Void>>, _: Option<ExecutionError>) -> Result<EmittedValue<OpenedFile>, PhaseFault> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) if m.is_file() => m,
            Ok(_) => {
                return Ok(EmittedValue::failed(ExecutionError::fatal(format!("target file does not exist or is a directory: {}",
                                                                             self.path.display()))))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(EmittedValue::failed(ExecutionError::fatal(format!("target file does not exist or is a directory: {}",
                                                                             self.path.display())).caused_by(e)))
            }
            Err(e) => {
                return Ok(EmittedValue::failed(ExecutionError::fatal(format!("target file cannot be inspected: {}",
                                                                             self.path.display())).caused_by(e)))
            }
        };

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                return Ok(EmittedValue::failed(ExecutionError::fatal(format!("target file cannot be read from: {}",
                                                                             self.path.display())).caused_by(e)))
            }
        };

        let read_only = metadata.permissions().readonly();
        let opened = OpenedFile::new(&self.path, file, read_only);
        if read_only {
            Ok(EmittedValue::with_issue(opened,
                                        ExecutionError::non_fatal(format!("target file cannot be written to: {}",
                                                                          self.path.display()))))
        } else {
            Ok(EmittedValue::produced(opened))
        }
    }
}
