//! Composiciones listas para usar.

use std::path::PathBuf;

use phase_core::{Workflow, WorkflowConfig, WorkflowError};

use crate::artifacts::TextLines;
use crate::phases::{CloseFilePhase, MapLinesPhase, OpenFilePhase, ReadContentsPhase, SaveFilePhase};

/// Opciones de `text_transform`.
#[derive(Debug, Clone)]
pub struct TextTransform {
    pub input: PathBuf,
    pub output: PathBuf,
    pub overwrite: bool,
}

/// open → read → map → save → close.
///
/// El guardado pide `TextLines` por tipo concreto: `FileContents` también es
/// `AsBytes`, así que pedir la capacidad sería ambiguo.
pub fn text_transform(opts: &TextTransform,
                      mapper: MapLinesPhase,
                      config: WorkflowConfig)
                      -> Result<Workflow, WorkflowError> {
    Workflow::builder().config(config)
                       .phase(OpenFilePhase::new(&opts.input))
                       .phase(ReadContentsPhase::new())
                       .phase(mapper)
                       .phase(SaveFilePhase::of::<TextLines>(&opts.output).overwrite(opts.overwrite))
                       .phase(CloseFilePhase::new())
                       .build()
}
