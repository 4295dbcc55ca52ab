//! `ExecutionError`: fallo descrito de una fase.
//!
//! Es un registro de sólo escritura-una-vez: se construye con el flag fatal y
//! un mensaje, opcionalmente una causa y líneas de sub-error, y después sólo
//! se consulta. Es `Clone` porque el registro de valores lo devuelve tal cual
//! a cada fase que lo resuelve; la causa se comparte tras un `Arc`.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::type_tag::TypeTag;
use crate::constants::DETAIL_LINE_PREFIX;

/// Fallo arbitrario dentro del cuerpo de una fase o de un hook. Permite usar
/// `?` con cualquier error de la librería estándar o de terceros.
pub type PhaseFault = Box<dyn Error + Send + Sync + 'static>;

/// Taxonomía de errores de ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionErrorKind {
    /// Invocación inválida: ni input ni error entrante, o input de tipo no
    /// asignable al declarado. Siempre fatal.
    InvalidInvocation,
    /// Fallo no controlado dentro de la fase (error devuelto o panic).
    /// Siempre fatal.
    InternalFault,
    /// Fallo descriptivo e intencional del autor de la fase.
    Domain,
    /// Ningún tipo concreto asignable al solicitado fue emitido.
    TargetNotProduced,
    /// Más de un tipo concreto emitido satisface el tipo solicitado.
    AmbiguousTarget,
    /// Fallo de un hook escalado a la fase por falta de manejador.
    HookFault,
}

impl fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidInvocation => "invalid invocation",
            Self::InternalFault => "internal fault",
            Self::Domain => "domain",
            Self::TargetNotProduced => "target not produced",
            Self::AmbiguousTarget => "ambiguous target type",
            Self::HookFault => "hook fault",
        };
        f.write_str(s)
    }
}

/// Panic capturado en la frontera de contención.
#[derive(Debug, Error)]
#[error("panic: {message}")]
pub struct PanicFault {
    pub message: String,
}

impl PanicFault {
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

#[derive(Clone)]
pub struct ExecutionError {
    kind: ExecutionErrorKind,
    message: String,
    fatal: bool,
    cause: Option<Arc<dyn Error + Send + Sync + 'static>>,
    details: Vec<String>,
}

impl ExecutionError {
    /// Error de dominio con el flag fatal elegido por el autor.
    pub fn new(fatal: bool, message: impl Into<String>) -> Self {
        Self::of_kind(ExecutionErrorKind::Domain, fatal, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn non_fatal(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    pub(crate) fn of_kind(kind: ExecutionErrorKind, fatal: bool, message: impl Into<String>) -> Self {
        Self { kind,
               message: message.into(),
               fatal,
               cause: None,
               details: Vec::new() }
    }

    pub fn invalid_invocation(message: impl Into<String>) -> Self {
        Self::of_kind(ExecutionErrorKind::InvalidInvocation, true, message)
    }

    pub fn internal_fault(fault: PhaseFault) -> Self {
        Self::of_kind(ExecutionErrorKind::InternalFault,
                      true,
                      "unhandled fault during phase execution").caused_by(fault)
    }

    pub fn target_not_produced(requested: TypeTag) -> Self {
        Self::of_kind(ExecutionErrorKind::TargetNotProduced,
                      true,
                      format!("no value of type {requested} (or declaring it) has been emitted"))
    }

    pub fn ambiguous_target(requested: TypeTag, candidates: &[TypeTag]) -> Self {
        let names: Vec<&str> = candidates.iter().map(|t| t.name()).collect();
        Self::of_kind(ExecutionErrorKind::AmbiguousTarget,
                      true,
                      format!("multiple emitted value types match target type {requested}: {}, \
                               consider using a more concrete target type",
                              names.join(", ")))
    }

    pub(crate) fn hook_fault(stage: impl fmt::Display, fault: PhaseFault) -> Self {
        Self::of_kind(ExecutionErrorKind::HookFault,
                      true,
                      format!("unhandled fault in execution hook ({stage})")).caused_by(fault)
    }

    /// Añade la causa del fallo.
    pub fn caused_by(mut self, cause: impl Into<PhaseFault>) -> Self {
        self.cause = Some(Arc::from(cause.into()));
        self
    }

    /// Encadena, si existe, el error entrante que recibió la fase.
    pub fn with_incoming(self, incoming: Option<ExecutionError>) -> Self {
        match incoming {
            Some(err) => self.caused_by(err),
            None => self,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn kind(&self) -> ExecutionErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for line in &self.details {
            write!(f, "{DETAIL_LINE_PREFIX}{line}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {cause})")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionError")
         .field("kind", &self.kind)
         .field("fatal", &self.fatal)
         .field("message", &self.message)
         .field("details", &self.details)
         .field("cause", &self.cause)
         .finish()
    }
}

impl Error for ExecutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

/// Acumula fallos independientes (uno por ítem procesado) y los pliega en un
/// único `ExecutionError` con líneas de sub-error.
///
/// El error resultante es fatal si el procesamiento se abortó o si ningún
/// ítem tuvo éxito; en otro caso es no fatal (éxito parcial).
#[derive(Debug)]
pub struct ErrorAggregate {
    header: String,
    lines: Vec<String>,
    succeeded: usize,
    aborted: bool,
}

impl ErrorAggregate {
    pub fn new(header: impl Into<String>) -> Self {
        Self { header: header.into(),
               lines: Vec::new(),
               succeeded: 0,
               aborted: false }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, failure: impl fmt::Display) {
        self.lines.push(failure.to_string());
    }

    /// Fallo que impide seguir procesando ítems.
    pub fn abort(&mut self, failure: impl fmt::Display) {
        self.lines.push(failure.to_string());
        self.aborted = true;
    }

    pub fn is_clean(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn into_error(self) -> Option<ExecutionError> {
        if self.lines.is_empty() {
            return None;
        }
        let fatal = self.aborted || self.succeeded == 0;
        Some(ExecutionError::new(fatal, self.header).with_details(self.lines))
    }
}
