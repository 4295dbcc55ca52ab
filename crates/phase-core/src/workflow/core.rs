//! Core Workflow implementation

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use log::{debug, error, info, warn};
use serde_json::json;
use uuid::Uuid;

use super::builder::WorkflowBuilder;
use super::registry::{ErrorRegistry, ValueRegistry};
use super::report::{ErrorSummary, PhaseReport, WorkflowReport};
use super::state::{StepSignal, WorkflowOutcome, WorkflowState};
use crate::config::{ClearFlags, WorkflowConfig};
use crate::errors::WorkflowError;
use crate::event::{EventStore, InMemoryEventStore, WorkflowEvent, WorkflowEventKind};
use crate::hashing::hash_value;
use crate::model::{downcast_artifact, Artifact, ArtifactRef, EmittedValue, ExecutionError, PanicFault, TypeTag};
use crate::phase::{GuardedPhase, HookStage, HookVerdict, PhaseDefinition, PhaseStatus};

/// Resultado del barrido de recursos de `Workflow::close`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseSummary {
    pub closed: usize,
    pub failed: usize,
}

/// Orquestador secuencial de fases.
///
/// Responsable de resolver el input de cada fase por tipo, invocarla a
/// través de la frontera de contención, registrar valor y error, y decidir si
/// el cursor avanza. Un error fatal detiene el workflow en la fase que lo
/// produjo.
pub struct Workflow<E: EventStore = InMemoryEventStore> {
    run_id: Uuid,
    phases: Vec<Box<dyn PhaseDefinition>>,
    statuses: Vec<PhaseStatus>,
    values: ValueRegistry,
    errors: ErrorRegistry,
    cursor: usize,
    stalled: bool,
    initialized: bool,
    config: WorkflowConfig,
    event_store: E,
}

impl Workflow<InMemoryEventStore> {
    #[inline]
    pub fn new() -> Self {
        Self::with_config(WorkflowConfig::default())
    }

    pub fn with_config(config: WorkflowConfig) -> Self {
        Self::with_event_store(InMemoryEventStore::default(), config)
    }

    /// Crea un builder con store en memoria.
    #[inline]
    pub fn builder() -> WorkflowBuilder<InMemoryEventStore> {
        WorkflowBuilder::new()
    }
}

impl Default for Workflow<InMemoryEventStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventStore> Workflow<E> {
    pub fn with_event_store(event_store: E, config: WorkflowConfig) -> Self {
        Self { run_id: Uuid::new_v4(),
               phases: Vec::new(),
               statuses: Vec::new(),
               values: ValueRegistry::default(),
               errors: ErrorRegistry::default(),
               cursor: 0,
               stalled: false,
               initialized: false,
               config,
               event_store }
    }

    /// Añade una fase al final de la secuencia.
    ///
    /// Sólo es legal antes del primer `step`. La identidad de una fase es su
    /// `id()`: añadir dos fases con el mismo id se rechaza.
    pub fn append_phase<P: PhaseDefinition>(&mut self, phase: P) -> Result<&mut Self, WorkflowError> {
        self.append_boxed(Box::new(phase))
    }

    pub fn append_boxed(&mut self, phase: Box<dyn PhaseDefinition>) -> Result<&mut Self, WorkflowError> {
        if self.initialized {
            return Err(WorkflowError::AlreadyStarted);
        }
        if self.phases.iter().any(|p| p.id() == phase.id()) {
            return Err(WorkflowError::DuplicatePhase(phase.id().to_string()));
        }
        debug!("workflow {}: appended phase '{}' ({} -> {})",
               self.run_id,
               phase.id(),
               phase.declared_input(),
               phase.output_type());
        self.phases.push(phase);
        self.statuses.push(PhaseStatus::Pending);
        Ok(self)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `true` cuando el cursor alcanzó el final de una secuencia no vacía.
    pub fn is_complete(&self) -> bool {
        !self.phases.is_empty() && self.cursor >= self.phases.len()
    }

    /// Estado de la máquina de estados.
    ///
    /// Un workflow sin fases también reporta `NotStarted`: es el estado
    /// previo a encolar la primera fase. Ejecutarlo no es legal (`step` y
    /// `run_to_completion` devuelven `WorkflowError::NoPhases`), y
    /// `is_complete` es `false` aunque el cursor coincida con la longitud.
    pub fn state(&self) -> WorkflowState {
        if self.stalled {
            WorkflowState::Stalled
        } else if self.is_complete() {
            WorkflowState::Completed
        } else if self.initialized {
            WorkflowState::Running
        } else {
            WorkflowState::NotStarted
        }
    }

    pub fn status_of(&self, index: usize) -> Option<PhaseStatus> {
        self.statuses.get(index).copied()
    }

    /// Ejecuta la fase bajo el cursor.
    ///
    /// Devuelve `Continue` si el resultado no fue fatal (el cursor avanzó) y
    /// `Halt` si la fase dejó el workflow detenido.
    pub fn step(&mut self) -> Result<StepSignal, WorkflowError> {
        if self.phases.is_empty() {
            return Err(WorkflowError::NoPhases);
        }
        if self.stalled {
            return Err(WorkflowError::Stalled { index: self.cursor,
                                                phase_id: self.phases[self.cursor].id().to_string() });
        }
        if self.is_complete() {
            return Err(WorkflowError::AlreadyCompleted);
        }
        self.ensure_initialized();

        let index = self.cursor;
        let total = self.phases.len();
        let phase = self.phases[index].as_ref();
        let phase_id = phase.id().to_string();
        let requested = phase.declared_input();

        let target = self.values.resolve(requested);
        let (input, incoming) = target.into_parts();
        debug!("phase '{phase_id}' [{}/{total}] resolved {requested}: value={}, incoming error={}",
               index + 1,
               input.is_some(),
               incoming.is_some());
        self.event_store.append_kind(self.run_id,
                                     WorkflowEventKind::PhaseStarted { phase_index: index,
                                                                       phase_id: phase_id.clone(),
                                                                       input_type: requested.to_string() });

        let mut hook_faults: Vec<(HookStage, bool)> = Vec::new();
        let before = phase.hook()
                          .map(|h| h.fire(HookStage::BeforeExecution, input.as_ref(), incoming.as_ref()));
        let result = match before {
            Some(HookVerdict::Escalated(err)) => {
                hook_faults.push((HookStage::BeforeExecution, true));
                EmittedValue::Failed(err)
            }
            before => {
                if matches!(before, Some(HookVerdict::Handled)) {
                    hook_faults.push((HookStage::BeforeExecution, false));
                }
                let result = phase.run_guarded(input, incoming);
                let after = phase.hook()
                                 .map(|h| h.fire(HookStage::AfterExecution, result.value(), result.error()));
                match after {
                    Some(HookVerdict::Escalated(err)) => {
                        hook_faults.push((HookStage::AfterExecution, true));
                        // el valor ya emitido se conserva para que `close` lo alcance
                        match result.into_parts() {
                            (Some(value), _) => EmittedValue::ProducedWithIssue(value, err),
                            (None, _) => EmittedValue::Failed(err),
                        }
                    }
                    Some(HookVerdict::Handled) => {
                        hook_faults.push((HookStage::AfterExecution, false));
                        result
                    }
                    _ => result,
                }
            }
        };

        for (stage, escalated) in hook_faults {
            if escalated {
                error!("phase '{phase_id}': unhandled hook fault ({stage}), escalated to fatal");
            } else {
                warn!("phase '{phase_id}': hook fault ({stage}) forwarded to its fault handler");
            }
            self.event_store.append_kind(self.run_id,
                                         WorkflowEventKind::HookFault { phase_index: index,
                                                                        phase_id: phase_id.clone(),
                                                                        stage: stage.to_string(),
                                                                        escalated });
        }

        let stored_type = self.values.record(&result);
        if let Some(err) = result.error() {
            self.errors.record(phase.phase_type(), &phase_id, err.clone());
        }
        self.statuses[index] = PhaseStatus::from_emitted(&result);

        if result.is_fatal() {
            let err = result.error().cloned().unwrap_or_else(|| ExecutionError::fatal("fatal error"));
            if self.config.debug {
                error!("phase '{phase_id}' failed fatally: {err:?}");
            } else {
                error!("phase '{phase_id}' failed fatally: {err}");
            }
            self.stalled = true;
            self.event_store.append_kind(self.run_id,
                                         WorkflowEventKind::PhaseFailed { phase_index: index,
                                                                          phase_id: phase_id.clone(),
                                                                          kind: err.kind(),
                                                                          message: err.to_string() });
            self.event_store.append_kind(self.run_id,
                                         WorkflowEventKind::WorkflowStalled { phase_index: index,
                                                                              phase_id });
            return Ok(StepSignal::Halt);
        }

        let issue = result.error().map(|e| {
                                      if self.config.debug {
                                          warn!("phase '{phase_id}' finished with an issue: {e:?}");
                                      } else {
                                          warn!("phase '{phase_id}' finished with an issue: {e}");
                                      }
                                      e.to_string()
                                  });
        debug!("phase '{phase_id}' finished (stored: {})",
               stored_type.map_or_else(|| "nothing".to_string(), |t| t.to_string()));
        self.event_store.append_kind(self.run_id,
                                     WorkflowEventKind::PhaseFinished { phase_index: index,
                                                                        phase_id,
                                                                        output_type: stored_type.map(|t| t.to_string()),
                                                                        issue });
        self.cursor += 1;

        if self.cursor == total {
            let outcome = self.outcome();
            info!("workflow {} completed: {outcome}", self.run_id);
            self.event_store.append_kind(self.run_id,
                                         WorkflowEventKind::WorkflowCompleted { outcome: outcome.to_string() });
        }
        Ok(StepSignal::Continue)
    }

    /// Ejecuta fases hasta completar o detenerse y devuelve el veredicto.
    ///
    /// Sobre un workflow ya completado o detenido no ejecuta nada y devuelve
    /// el veredicto actual.
    pub fn run_to_completion(&mut self) -> Result<WorkflowOutcome, WorkflowError> {
        if self.phases.is_empty() {
            return Err(WorkflowError::NoPhases);
        }
        while !self.is_complete() && !self.stalled {
            if self.step()? == StepSignal::Halt {
                break;
            }
        }
        Ok(self.outcome())
    }

    /// Veredicto según los errores registrados, haya terminado o no.
    pub fn outcome(&self) -> WorkflowOutcome {
        if self.errors.is_empty() {
            WorkflowOutcome::FullSuccess
        } else if !self.errors.any_fatal() {
            WorkflowOutcome::PartialSuccess
        } else {
            WorkflowOutcome::FatalFailure
        }
    }

    /// cursor / total × 100; 0 para un workflow vacío.
    pub fn progress_percent(&self) -> f32 {
        if self.phases.is_empty() {
            0.0
        } else {
            self.cursor as f32 / self.phases.len() as f32 * 100.0
        }
    }

    /// Resolución por tipo sobre el registro de valores (ver
    /// `ValueRegistry::resolve`).
    pub fn resolve(&self, requested: TypeTag) -> EmittedValue<ArtifactRef> {
        self.values.resolve(requested)
    }

    /// Último valor emitido de tipo `T` (o que declara `T`), si la
    /// resolución es inequívoca y el valor es de tipo concreto `T`.
    pub fn last_emitted<T: Artifact>(&self) -> Option<Rc<T>> {
        self.values
            .resolve(TypeTag::of::<T>())
            .value()
            .and_then(downcast_artifact::<T>)
    }

    pub fn values(&self) -> &ValueRegistry {
        &self.values
    }

    /// Último error registrado por las fases de tipo `P`.
    pub fn last_error_of<P: PhaseDefinition>(&self) -> Option<&ExecutionError> {
        self.errors.get(TypeTag::of::<P>())
    }

    pub fn last_error_of_type(&self, phase_type: TypeTag) -> Option<&ExecutionError> {
        self.errors.get(phase_type)
    }

    /// Errores registrados, uno por identidad de fase, en orden de primera
    /// inserción.
    pub fn errors_chronological(&self) -> Vec<&ExecutionError> {
        self.errors.chronological()
    }

    pub fn clear_phase_errors(&mut self) -> &mut Self {
        self.errors.clear();
        self
    }

    pub fn clear_emitted_values(&mut self) -> &mut Self {
        self.values.clear();
        self
    }

    /// Vacía la secuencia de fases y vuelve a `NotStarted` con un `run_id`
    /// nuevo. Los registros de valores y errores no se tocan.
    pub fn clear_state(&mut self) -> &mut Self {
        self.phases.clear();
        self.statuses.clear();
        self.cursor = 0;
        self.stalled = false;
        self.initialized = false;
        self.run_id = Uuid::new_v4();
        self
    }

    pub fn clear_execution_artifacts(&mut self) -> &mut Self {
        self.clear_emitted_values().clear_phase_errors()
    }

    pub fn clear_all(&mut self) -> &mut Self {
        self.clear_execution_artifacts().clear_state()
    }

    /// Barrido best-effort: llama `Artifact::close` sobre cada valor
    /// registrado; los fallos (errores o panics) se cuentan y se suprimen.
    /// Después aplica los `ClearFlags` configurados.
    pub fn close(&mut self) -> CloseSummary {
        let mut summary = CloseSummary::default();
        for value in self.values.values() {
            match catch_unwind(AssertUnwindSafe(|| value.close())) {
                Ok(Ok(())) => summary.closed += 1,
                Ok(Err(fault)) => {
                    warn!("suppressed fault while closing {}: {fault}", value.type_tag());
                    summary.failed += 1;
                }
                Err(payload) => {
                    warn!("suppressed fault while closing {}: {}",
                          value.type_tag(),
                          PanicFault::from_payload(payload));
                    summary.failed += 1;
                }
            }
        }
        debug!("workflow {}: closed {} value(s), {} failure(s)",
               self.run_id,
               summary.closed,
               summary.failed);
        self.event_store.append_kind(self.run_id,
                                     WorkflowEventKind::ResourcesClosed { closed: summary.closed,
                                                                          failed: summary.failed });

        let flags = self.config.clear_on_close;
        if flags.contains(ClearFlags::PHASE_ERRORS) {
            self.clear_phase_errors();
        }
        if flags.contains(ClearFlags::EMITTED_VALUES) {
            self.clear_emitted_values();
        }
        if flags.contains(ClearFlags::STATE) {
            self.clear_state();
        }
        summary
    }

    /// Hash de la definición: versión del motor + ids de fase en orden.
    pub fn definition_hash(&self) -> String {
        let ids: Vec<&str> = self.phases.iter().map(|p| p.id()).collect();
        hash_value(&json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "phases": ids
        }))
    }

    /// Eventos de la ejecución actual.
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.event_store.list(self.run_id)
    }

    /// Variante compacta de eventos de la ejecución actual.
    pub fn event_codes(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.kind.code()).collect()
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn report(&self) -> WorkflowReport {
        let phases = self.phases
                         .iter()
                         .zip(&self.statuses)
                         .enumerate()
                         .map(|(index, (p, status))| PhaseReport { index,
                                                                   id: p.id().to_string(),
                                                                   name: p.name().to_string(),
                                                                   input_type: p.declared_input().to_string(),
                                                                   output_type: p.output_type().to_string(),
                                                                   status: *status })
                         .collect();
        let errors = self.errors
                         .records()
                         .map(|r| ErrorSummary { phase_id: r.phase_id.clone(),
                                                 kind: r.error.kind(),
                                                 fatal: r.error.is_fatal(),
                                                 message: r.error.to_string() })
                         .collect();
        WorkflowReport { run_id: self.run_id,
                         definition_hash: self.definition_hash(),
                         state: self.state(),
                         outcome: self.outcome(),
                         progress_percent: self.progress_percent(),
                         phases,
                         errors }
    }

    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        let definition_hash = self.definition_hash();
        info!("workflow {} started: {} phase(s), definition {}",
              self.run_id,
              self.phases.len(),
              definition_hash);
        self.event_store.append_kind(self.run_id,
                                     WorkflowEventKind::WorkflowInitialized { definition_hash,
                                                                              phase_count: self.phases.len() });
    }
}

impl<E: EventStore> std::fmt::Debug for Workflow<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.phases.iter().map(|p| p.id()).collect();
        f.debug_struct("Workflow")
         .field("run_id", &self.run_id)
         .field("phases", &ids)
         .field("cursor", &self.cursor)
         .field("state", &self.state())
         .field("values", &self.values.len())
         .field("errors", &self.errors.len())
         .finish()
    }
}
