//! Macros utilitarias para reducir boilerplate al definir Artifacts y fases
//! tipadas.
//!
//! Exportadas en la raíz del crate para poder usarlas como:
//!   use phase_core::{typed_artifact, typed_phase};

/// Declara un Artifact con `Debug` + `Clone` e implementa `Artifact`.
///
/// Formas soportadas:
/// - typed_artifact!(Name { field1: Ty1, field2: Ty2 });
/// - typed_artifact!(Name { field1: Ty1 } capabilities: [dyn Trait1, dyn Trait2]);
///
/// Las capacidades sólo se declaran (resolución por `TypeTag`); para
/// exponer además la vista `Rc<dyn Trait>` implementa `Artifact` a mano.
#[macro_export]
macro_rules! typed_artifact {
    ($name:ident { $($fname:ident : $fty:ty),* $(,)? } capabilities: [$($cap:ty),+ $(,)?]) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name { $(pub $fname: $fty,)* }
        impl $crate::model::Artifact for $name {
            fn capabilities(&self) -> Vec<$crate::model::TypeTag> {
                vec![$($crate::model::TypeTag::of::<$cap>()),+]
            }
        }
    };
    ($name:ident { $($fname:ident : $fty:ty),* $(,)? }) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name { $(pub $fname: $fty,)* }
        impl $crate::model::Artifact for $name {}
    };
}

/// Declara una fase tipada (struct + `TypedPhase`).
///
/// El cuerpo de `run` devuelve `Result<EmittedValue<Output>, PhaseFault>`,
/// así que admite `?` con cualquier error.
///
/// - `producer`: input `Void`; el cuerpo sólo recibe `self`.
/// - `transform`: el cuerpo recibe `self`, el input (`Option<Rc<Input>>`) y el
///   error entrante (`Option<ExecutionError>`).
///
/// `fields { .. }` es opcional y genera un `new` con esos campos.
#[macro_export]
macro_rules! typed_phase {
    (
        producer $name:ident {
            id: $id:expr,
            output: $out:ty,
            $(fields { $($fname:ident : $fty:ty),* $(,)? },)?
            run($self_ident:ident) $body:block
        }
    ) => {
        #[derive(Debug, Clone)]
        pub struct $name { $($(pub $fname: $fty,)*)? }
        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new($($($fname: $fty),*)?) -> Self { Self { $($($fname),*)? } }
        }
        impl $crate::phase::TypedPhase for $name {
            type Input = $crate::model::Void;
            type Output = $out;
            fn id(&self) -> &str { $id }
            fn run_typed(&self,
                         _input: Option<std::rc::Rc<$crate::model::Void>>,
                         _incoming_error: Option<$crate::model::ExecutionError>)
                         -> Result<$crate::model::EmittedValue<$out>, $crate::model::PhaseFault> {
                let $self_ident = self;
                $body
            }
        }
    };
    (
        transform $name:ident {
            id: $id:expr,
            input: $inp:ty,
            output: $out:ty,
            $(fields { $($fname:ident : $fty:ty),* $(,)? },)?
            run($self_ident:ident, $inp_ident:ident, $err_ident:ident) $body:block
        }
    ) => {
        #[derive(Debug, Clone)]
        pub struct $name { $($(pub $fname: $fty,)*)? }
        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new($($($fname: $fty),*)?) -> Self { Self { $($($fname),*)? } }
        }
        impl $crate::phase::TypedPhase for $name {
            type Input = $inp;
            type Output = $out;
            fn id(&self) -> &str { $id }
            fn run_typed(&self,
                         $inp_ident: Option<std::rc::Rc<$inp>>,
                         $err_ident: Option<$crate::model::ExecutionError>)
                         -> Result<$crate::model::EmittedValue<$out>, $crate::model::PhaseFault> {
                let $self_ident = self;
                $body
            }
        }
    };
}
