//! `ExecutionHook`: callbacks opcionales antes y después de ejecutar una fase.
//!
//! Política de fallos de hook (única y consistente):
//! - Si el hook tiene un manejador de fallos registrado (`on_fault`), el fallo
//!   (error devuelto o panic) se le entrega y el resultado del paso no cambia.
//! - Si no lo tiene, el fallo se escala a un `ExecutionError` fatal de tipo
//!   `HookFault` para ese paso.
//!
//! Un fallo de hook nunca se pierde en silencio. Si el propio manejador entra
//! en pánico, también se escala.

use std::error::Error;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::model::{ArtifactRef, ExecutionError, PanicFault, PhaseFault};

/// Momento en el que se dispara un callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookStage {
    BeforeExecution,
    AfterExecution,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeExecution => f.write_str("before execution"),
            Self::AfterExecution => f.write_str("after execution"),
        }
    }
}

type HookFn = Box<dyn Fn(Option<&ArtifactRef>, Option<&ExecutionError>) -> Result<(), PhaseFault>>;
type FaultHandler = Box<dyn Fn(HookStage, &(dyn Error + Send + Sync + 'static))>;

/// Resultado de disparar un callback.
#[derive(Debug)]
pub enum HookVerdict {
    /// No había callback o terminó sin fallo.
    Passed,
    /// El callback falló y el manejador registrado recibió el fallo.
    Handled,
    /// El callback falló sin manejador: el paso debe terminar en fatal.
    Escalated(ExecutionError),
}

#[derive(Default)]
pub struct ExecutionHook {
    before: Option<HookFn>,
    after: Option<HookFn>,
    fault_handler: Option<FaultHandler>,
}

impl ExecutionHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recibe el input resuelto y el error entrante de la fase.
    pub fn before<F>(mut self, f: F) -> Self
        where F: Fn(Option<&ArtifactRef>, Option<&ExecutionError>) -> Result<(), PhaseFault> + 'static
    {
        self.before = Some(Box::new(f));
        self
    }

    /// Recibe el valor y el error emitidos por la fase (ambos `None` en `NoOp`).
    pub fn after<F>(mut self, f: F) -> Self
        where F: Fn(Option<&ArtifactRef>, Option<&ExecutionError>) -> Result<(), PhaseFault> + 'static
    {
        self.after = Some(Box::new(f));
        self
    }

    pub fn on_fault<F>(mut self, f: F) -> Self
        where F: Fn(HookStage, &(dyn Error + Send + Sync + 'static)) + 'static
    {
        self.fault_handler = Some(Box::new(f));
        self
    }

    pub fn fire(&self,
                stage: HookStage,
                value: Option<&ArtifactRef>,
                error: Option<&ExecutionError>)
                -> HookVerdict {
        let callback = match stage {
            HookStage::BeforeExecution => self.before.as_ref(),
            HookStage::AfterExecution => self.after.as_ref(),
        };
        let Some(callback) = callback else {
            return HookVerdict::Passed;
        };

        let fault: PhaseFault = match catch_unwind(AssertUnwindSafe(|| callback(value, error))) {
            Ok(Ok(())) => return HookVerdict::Passed,
            Ok(Err(fault)) => fault,
            Err(payload) => Box::new(PanicFault::from_payload(payload)),
        };

        match &self.fault_handler {
            Some(handler) => {
                let handled = catch_unwind(AssertUnwindSafe(|| handler(stage, fault.as_ref())));
                match handled {
                    Ok(()) => HookVerdict::Handled,
                    Err(payload) => {
                        let panic = PanicFault::from_payload(payload);
                        HookVerdict::Escalated(ExecutionError::hook_fault(stage, fault).with_details(vec![format!("fault handler {panic}")]))
                    }
                }
            }
            None => HookVerdict::Escalated(ExecutionError::hook_fault(stage, fault)),
        }
    }
}

impl fmt::Debug for ExecutionHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionHook")
         .field("before", &self.before.is_some())
         .field("after", &self.after.is_some())
         .field("fault_handler", &self.fault_handler.is_some())
         .finish()
    }
}
