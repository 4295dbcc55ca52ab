use std::fmt;
use std::rc::Rc;

use phase_core::{Artifact, EmittedValue, ExecutionError, PhaseFault, TypedPhase, Void};

/// Productora pura: emite el valor que devuelve `supplier`.
pub struct EmitValuePhase<T> {
    id: String,
    supplier: Box<dyn Fn() -> T>,
}

impl<T: Artifact> EmitValuePhase<T> {
    pub fn new(id: impl Into<String>, supplier: impl Fn() -> T + 'static) -> Self {
        Self { id: id.into(),
               supplier: Box::new(supplier) }
    }
}

impl<T: Artifact> TypedPhase for EmitValuePhase<T> {
    type Input = Void;
    type Output = T;

    fn id(&self) -> &str {
        &self.id
    }

    fn run_typed(&self, _: Option<Rc<Void>>, _: Option<ExecutionError>) -> Result<EmittedValue<T>, PhaseFault> {
        Ok(EmittedValue::produced((self.supplier)()))
    }
}

impl<T> fmt::Debug for EmitValuePhase<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitValuePhase").field("id", &self.id).finish_non_exhaustive()
    }
}
