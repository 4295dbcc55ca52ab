//! Descriptor de tipo en tiempo de ejecución.
//!
//! `TypeTag` combina el `TypeId` (identidad) con el nombre legible del tipo
//! (diagnóstico). Sirve tanto para tipos concretos (`TypeTag::of::<Foo>()`)
//! como para capacidades expresadas como trait objects
//! (`TypeTag::of::<dyn AsBytes>()`).

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use super::artifact::Void;

#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(),
               name: type_name::<T>() }
    }

    /// Tipo declarado por las fases que no consumen input (productoras puras).
    #[inline]
    pub fn void() -> Self {
        Self::of::<Void>()
    }

    pub fn is_void(&self) -> bool {
        self.id == TypeId::of::<Void>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}
