use std::fmt;
use std::rc::Rc;

use phase_core::{EmittedValue, ErrorAggregate, ExecutionError, PhaseFault, TypedPhase};

use crate::artifacts::{FileContents, TextLines};
use crate::mappers::LineMode;

type LineMapper = Box<dyn Fn(&str) -> Result<String, PhaseFault>>;

const ERR_HEADER: &str = "the following errors occurred while mapping lines:";

/// Aplica una función falible a cada línea del contenido (UTF-8).
///
/// Los fallos por línea no detienen el recorrido: se acumulan como líneas de
/// sub-error y las líneas correctas se emiten igualmente. El error resultante
/// es fatal sólo si ninguna línea se pudo transformar.
pub struct MapLinesPhase {
    id: String,
    mapper: LineMapper,
}

impl MapLinesPhase {
    pub fn new<F>(mapper: F) -> Self
        where F: Fn(&str) -> Result<String, PhaseFault> + 'static
    {
        Self { id: "map_lines".to_string(),
               mapper: Box::new(mapper) }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_mode(mode: LineMode, ascii_only: bool) -> Self {
        if ascii_only {
            Self::new(move |line| mode.apply_ascii(line).map_err(PhaseFault::from))
        } else {
            Self::new(move |line| Ok(mode.apply(line)))
        }
    }
}

impl TypedPhase for MapLinesPhase {
    type Input = FileContents;
    type Output = TextLines;

    fn id(&self) -> &str {
        &self.id
    }

    fn run_typed(&self,
                 input: Option<Rc<FileContents>>,
                 incoming_error: Option<ExecutionError>)
                 -> Result<EmittedValue<TextLines>, PhaseFault> {
        let Some(contents) = input else {
            return Ok(EmittedValue::failed(ExecutionError::fatal("failed to map lines").with_incoming(incoming_error)));
        };
        let text = match std::str::from_utf8(&contents.bytes) {
            Ok(t) => t,
            Err(e) => {
                return Ok(EmittedValue::failed(ExecutionError::fatal(format!("{} is not valid UTF-8",
                                                                             contents.source.display())).caused_by(e)))
            }
        };

        let mut aggregate = ErrorAggregate::new(ERR_HEADER);
        let mut lines = Vec::new();
        for (n, line) in text.lines().enumerate() {
            match (self.mapper)(line) {
                Ok(mapped) => {
                    aggregate.record_success();
                    lines.push(mapped);
                }
                Err(e) => aggregate.record_failure(format_args!("line {}: {e}", n + 1)),
            }
        }

        let mapped = TextLines { lines };
        Ok(match aggregate.into_error() {
            None => EmittedValue::produced(mapped),
            Some(err) if err.is_fatal() => EmittedValue::failed(err),
            Some(err) => EmittedValue::with_issue(mapped, err),
        })
    }
}

impl fmt::Debug for MapLinesPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapLinesPhase").field("id", &self.id).finish_non_exhaustive()
    }
}
