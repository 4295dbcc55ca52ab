//! Builder para `Workflow`.
//!
//! Acumula fases y configuración y valida la secuencia al construir. A
//! diferencia de `append_phase`, un id duplicado no aborta en el acto: se
//! informa en `build`.
//!
//! ```ignore
//! let mut wf = Workflow::builder()
//!     .config(WorkflowConfig::from_env()?)
//!     .phase(OpenFilePhase::new(input))
//!     .phase(ReadContentsPhase::new())
//!     .build()?;
//! ```

use crate::config::WorkflowConfig;
use crate::errors::WorkflowError;
use crate::event::{EventStore, InMemoryEventStore};
use crate::phase::PhaseDefinition;
use crate::workflow::Workflow;

pub struct WorkflowBuilder<E: EventStore> {
    event_store: E,
    config: WorkflowConfig,
    phases: Vec<Box<dyn PhaseDefinition>>,
}

impl WorkflowBuilder<InMemoryEventStore> {
    pub fn new() -> Self {
        Self { event_store: InMemoryEventStore::default(),
               config: WorkflowConfig::default(),
               phases: Vec::new() }
    }
}

impl Default for WorkflowBuilder<InMemoryEventStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventStore> WorkflowBuilder<E> {
    /// Sustituye el store de eventos.
    pub fn event_store<E2: EventStore>(self, event_store: E2) -> WorkflowBuilder<E2> {
        WorkflowBuilder { event_store,
                          config: self.config,
                          phases: self.phases }
    }

    pub fn config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    pub fn phase<P: PhaseDefinition>(mut self, phase: P) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Construye el workflow. Falla si la secuencia está vacía o repite un id.
    pub fn build(self) -> Result<Workflow<E>, WorkflowError> {
        if self.phases.is_empty() {
            return Err(WorkflowError::NoPhases);
        }
        let mut workflow = Workflow::with_event_store(self.event_store, self.config);
        for phase in self.phases {
            workflow.append_boxed(phase)?;
        }
        Ok(workflow)
    }
}
