use std::fs;
use std::path::PathBuf;

use phase_core::{view_as, Artifact, ArtifactRef, EmittedValue, ExecutionError, PhaseDefinition, PhaseFault, TypeTag};

use crate::artifacts::AsBytes;

/// Escribe un valor `AsBytes` en `path`.
///
/// El tipo pedido es configurable: un tipo concreto (`SaveFilePhase::of`) o
/// la capacidad misma (`SaveFilePhase::any`). Pedir la capacidad falla por
/// ambigüedad si más de un tipo `AsBytes` fue emitido.
#[derive(Debug, Clone)]
pub struct SaveFilePhase {
    id: String,
    path: PathBuf,
    overwrite: bool,
    target: TypeTag,
}

impl SaveFilePhase {
    pub fn of<T: Artifact + AsBytes>(path: impl Into<PathBuf>) -> Self {
        Self { id: "save_file".to_string(),
               path: path.into(),
               overwrite: false,
               target: TypeTag::of::<T>() }
    }

    pub fn any(path: impl Into<PathBuf>) -> Self {
        Self { id: "save_file".to_string(),
               path: path.into(),
               overwrite: false,
               target: TypeTag::of::<dyn AsBytes>() }
    }

    /// Necesario para guardar más de una vez en el mismo workflow: la
    /// identidad de una fase es su id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl PhaseDefinition for SaveFilePhase {
    fn id(&self) -> &str {
        &self.id
    }

    fn phase_type(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn declared_input(&self) -> TypeTag {
        self.target
    }

    fn output_type(&self) -> TypeTag {
        TypeTag::void()
    }

    fn execute(&self,
               input: Option<ArtifactRef>,
               incoming_error: Option<ExecutionError>)
               -> Result<EmittedValue<ArtifactRef>, PhaseFault> {
        let Some(value) = input else {
            return Ok(EmittedValue::failed(ExecutionError::fatal("failed to save file").with_incoming(incoming_error)));
        };
        let Some(bytes) = view_as::<dyn AsBytes>(&value) else {
            return Ok(EmittedValue::failed(ExecutionError::fatal(format!("value of type {} cannot be written as bytes",
                                                                         value.type_tag()))));
        };

        if self.path.exists() {
            if !self.overwrite {
                return Ok(EmittedValue::failed(ExecutionError::fatal(format!("output file already exists, and overwrite is set to false: {}",
                                                                             self.path.display()))));
            }
            if let Err(e) = fs::remove_file(&self.path) {
                return Ok(EmittedValue::failed(ExecutionError::fatal(format!("output file already exists, and cannot be overwritten (deleted): {}",
                                                                             self.path.display())).caused_by(e)));
            }
        }

        let data = bytes.to_bytes();
        fs::write(&self.path, &data)?;
        log::debug!("wrote {} byte(s) to {}", data.len(), self.path.display());
        Ok(EmittedValue::NoOp)
    }
}
