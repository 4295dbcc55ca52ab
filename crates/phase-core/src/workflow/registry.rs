//! Registros del workflow.
//!
//! - `ValueRegistry`: tipo concreto del valor emitido -> último portador de
//!   ese tipo. Se consulta por tipo o por capacidad declarada.
//! - `ErrorRegistry`: identidad de fase -> último error registrado.
//!
//! Ambos conservan el orden de primera inserción: sobrescribir una clave no
//! la mueve al final.

use indexmap::IndexMap;

use crate::model::{satisfies, ArtifactRef, EmittedValue, ExecutionError, TypeTag};

#[derive(Debug, Default)]
pub struct ValueRegistry {
    entries: IndexMap<TypeTag, EmittedValue<ArtifactRef>>,
}

impl ValueRegistry {
    /// Guarda el portador bajo el tipo concreto de su valor, sobrescribiendo.
    /// Devuelve ese tipo, o `None` si el portador no lleva valor (no se
    /// guarda nada).
    pub fn record(&mut self, emitted: &EmittedValue<ArtifactRef>) -> Option<TypeTag> {
        let tag = emitted.value()?.type_tag();
        self.entries.insert(tag, emitted.clone());
        Some(tag)
    }

    /// Tipos concretos registrados que satisfacen `requested`, en orden de
    /// registro.
    pub fn candidates(&self, requested: TypeTag) -> Vec<TypeTag> {
        self.entries
            .iter()
            .filter(|(_, emitted)| emitted.value().is_some_and(|v| satisfies(v.as_ref(), requested)))
            .map(|(tag, _)| *tag)
            .collect()
    }

    /// Resolución dirigida por tipo:
    /// - ningún candidato: portador nuevo con error fatal "target not produced";
    /// - uno: la entrada tal cual (valor y error incluidos);
    /// - varios: portador nuevo con error fatal de ambigüedad que nombra a
    ///   todos los candidatos. Las entradas no se agregan.
    pub fn resolve(&self, requested: TypeTag) -> EmittedValue<ArtifactRef> {
        match self.candidates(requested).as_slice() {
            [] => EmittedValue::Failed(ExecutionError::target_not_produced(requested)),
            [only] => self.entries
                          .get(only)
                          .cloned()
                          .unwrap_or_else(|| EmittedValue::Failed(ExecutionError::target_not_produced(requested))),
            many => EmittedValue::Failed(ExecutionError::ambiguous_target(requested, many)),
        }
    }

    /// Valores registrados (uno por tipo concreto).
    pub fn values(&self) -> impl Iterator<Item = &ArtifactRef> {
        self.entries.values().filter_map(EmittedValue::value)
    }

    pub fn types(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Error registrado de una fase.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub phase_id: String,
    pub phase_type: TypeTag,
    pub error: ExecutionError,
}

#[derive(Debug, Default)]
pub struct ErrorRegistry {
    entries: IndexMap<TypeTag, ErrorRecord>,
}

impl ErrorRegistry {
    pub fn record(&mut self, phase_type: TypeTag, phase_id: &str, error: ExecutionError) {
        self.entries.insert(phase_type,
                            ErrorRecord { phase_id: phase_id.to_string(),
                                          phase_type,
                                          error });
    }

    pub fn get(&self, phase_type: TypeTag) -> Option<&ExecutionError> {
        self.entries.get(&phase_type).map(|r| &r.error)
    }

    pub fn records(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.entries.values()
    }

    pub fn chronological(&self) -> Vec<&ExecutionError> {
        self.entries.values().map(|r| &r.error).collect()
    }

    pub fn any_fatal(&self) -> bool {
        self.entries.values().any(|r| r.error.is_fatal())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
