//! Artifact opaco del pipeline.
//!
//! Un `Artifact` es cualquier valor que una fase emite y que otras fases
//! pueden consumir. El motor no interpreta su contenido; sólo usa:
//! - su tipo concreto (`TypeTag`), que es la clave del registro de valores;
//! - sus capacidades declaradas (`capabilities`), que permiten pedirlo por un
//!   "supertipo" (`dyn Trait`) en la resolución;
//! - `close`, invocado en el barrido explícito de recursos del workflow.
//!
//! Los autores implementan `Artifact`; `AnyArtifact` se obtiene gratis por
//! la implementación blanket y es lo que el motor maneja (`ArtifactRef`).

use std::any::Any;
use std::fmt::Debug;
use std::rc::Rc;

use super::error::PhaseFault;
use super::type_tag::TypeTag;

pub trait Artifact: Any + Debug {
    /// Capacidades (`TypeTag::of::<dyn Trait>()`) que este artifact satisface
    /// además de su tipo concreto.
    fn capabilities(&self) -> Vec<TypeTag> {
        Vec::new()
    }

    /// Libera recursos externos (handles, conexiones). Debe ser idempotente:
    /// el barrido de `Workflow::close` puede llamarlo después de que una fase
    /// ya lo hiciera.
    fn close(&self) -> Result<(), PhaseFault> {
        Ok(())
    }

    /// Vista del artifact como una de sus capacidades: un `Rc<dyn Trait>`
    /// empaquetado con `capability_box`. Sin implementar, el artifact sólo
    /// es resoluble por la capacidad, no consumible a través de ella.
    fn capability_view(self: Rc<Self>, capability: TypeTag) -> Option<Box<dyn Any>> {
        let _ = capability;
        None
    }
}

/// Vista dinámica de un `Artifact`; implementada para todo `T: Artifact`.
pub trait AnyArtifact: Artifact {
    fn type_tag(&self) -> TypeTag;
    fn as_any(&self) -> &dyn Any;
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Artifact> AnyArtifact for T {
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Referencia compartida a un artifact emitido. La ejecución es
/// single-thread, por eso `Rc`.
pub type ArtifactRef = Rc<dyn AnyArtifact>;

/// Tipo de input de las fases productoras. No tiene valores: nunca se emite,
/// por lo que resolverlo siempre produce "target not produced".
#[derive(Debug)]
pub enum Void {}

impl Artifact for Void {}

impl Artifact for String {}

impl Artifact for Vec<u8> {}

/// `true` si `value` es del tipo `wanted` o declara esa capacidad.
pub fn satisfies(value: &dyn AnyArtifact, wanted: TypeTag) -> bool {
    value.type_tag() == wanted || value.capabilities().contains(&wanted)
}

/// Empaqueta una vista de capacidad para `Artifact::capability_view`.
pub fn capability_box<C: ?Sized + 'static>(view: Rc<C>) -> Box<dyn Any> {
    Box::new(view)
}

/// Vista de un artifact compartido como la capacidad `C` (`dyn Trait`).
pub fn view_as<C: ?Sized + 'static>(value: &ArtifactRef) -> Option<Rc<C>> {
    let boxed = Rc::clone(value).capability_view(TypeTag::of::<C>())?;
    boxed.downcast::<Rc<C>>().ok().map(|view| *view)
}

/// Intenta recuperar el tipo concreto de un artifact compartido.
pub fn downcast_artifact<T: Artifact>(value: &ArtifactRef) -> Option<Rc<T>> {
    Rc::clone(value).into_any_rc().downcast::<T>().ok()
}
