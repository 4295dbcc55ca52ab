//! `EmittedValue`: portador de resultado de una fase.
//!
//! Hace explícito el estado "valor, error o ambos" en lugar de lanzar:
//! - `Produced`: éxito limpio.
//! - `ProducedWithIssue`: éxito parcial; hay artifact pero también un
//!   problema (normalmente no fatal).
//! - `Failed`: fallo, no se produjo nada.
//! - `NoOp`: éxito sin nada que registrar aguas abajo.

use super::error::ExecutionError;

#[derive(Debug, Clone)]
pub enum EmittedValue<T> {
    Produced(T),
    ProducedWithIssue(T, ExecutionError),
    Failed(ExecutionError),
    NoOp,
}

impl<T> EmittedValue<T> {
    pub fn produced(value: T) -> Self {
        Self::Produced(value)
    }

    pub fn failed(error: ExecutionError) -> Self {
        Self::Failed(error)
    }

    pub fn with_issue(value: T, error: ExecutionError) -> Self {
        Self::ProducedWithIssue(value, error)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Produced(v) | Self::ProducedWithIssue(v, _) => Some(v),
            Self::Failed(_) | Self::NoOp => None,
        }
    }

    pub fn error(&self) -> Option<&ExecutionError> {
        match self {
            Self::ProducedWithIssue(_, e) | Self::Failed(e) => Some(e),
            Self::Produced(_) | Self::NoOp => None,
        }
    }

    /// `true` si el error portado (si hay) detiene el workflow.
    pub fn is_fatal(&self) -> bool {
        self.error().is_some_and(ExecutionError::is_fatal)
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    pub fn into_parts(self) -> (Option<T>, Option<ExecutionError>) {
        match self {
            Self::Produced(v) => (Some(v), None),
            Self::ProducedWithIssue(v, e) => (Some(v), Some(e)),
            Self::Failed(e) => (None, Some(e)),
            Self::NoOp => (None, None),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EmittedValue<U> {
        match self {
            Self::Produced(v) => EmittedValue::Produced(f(v)),
            Self::ProducedWithIssue(v, e) => EmittedValue::ProducedWithIssue(f(v), e),
            Self::Failed(e) => EmittedValue::Failed(e),
            Self::NoOp => EmittedValue::NoOp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_state() {
        let ok = EmittedValue::produced(1);
        assert_eq!(ok.value(), Some(&1));
        assert!(ok.error().is_none());
        assert!(!ok.is_fatal());

        let partial = EmittedValue::with_issue(2, ExecutionError::non_fatal("read-only"));
        assert_eq!(partial.value(), Some(&2));
        assert!(partial.error().is_some());
        assert!(!partial.is_fatal());

        let failed: EmittedValue<i32> = EmittedValue::failed(ExecutionError::fatal("nope"));
        assert!(failed.value().is_none());
        assert!(failed.is_fatal());

        let noop: EmittedValue<i32> = EmittedValue::NoOp;
        assert!(noop.is_noop());
        assert_eq!(noop.into_parts().0, None);
    }

    #[test]
    fn map_keeps_error() {
        let partial = EmittedValue::with_issue(2, ExecutionError::non_fatal("w")).map(|v| v * 10);
        let (v, e) = partial.into_parts();
        assert_eq!(v, Some(20));
        assert_eq!(e.expect("error").message(), "w");
    }
}
