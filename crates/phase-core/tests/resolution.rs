use std::any::Any;
use std::rc::Rc;

use phase_core::{capability_box, view_as, Artifact, ArtifactRef, EmittedValue, ExecutionError, ExecutionErrorKind,
                 FnPhase, PhaseDefinition, PhaseFault, TypeTag, Void, Workflow, WorkflowOutcome, WorkflowState};

trait Named {
    fn name(&self) -> String;
}

#[derive(Debug)]
struct Cat;

#[derive(Debug)]
struct Dog;

impl Named for Cat {
    fn name(&self) -> String {
        "cat".into()
    }
}

impl Named for Dog {
    fn name(&self) -> String {
        "dog".into()
    }
}

impl Artifact for Cat {
    fn capabilities(&self) -> Vec<TypeTag> {
        vec![TypeTag::of::<dyn Named>()]
    }

    fn capability_view(self: Rc<Self>, capability: TypeTag) -> Option<Box<dyn Any>> {
        (capability == TypeTag::of::<dyn Named>()).then(|| capability_box::<dyn Named>(self))
    }
}

impl Artifact for Dog {
    fn capabilities(&self) -> Vec<TypeTag> {
        vec![TypeTag::of::<dyn Named>()]
    }

    fn capability_view(self: Rc<Self>, capability: TypeTag) -> Option<Box<dyn Any>> {
        (capability == TypeTag::of::<dyn Named>()).then(|| capability_box::<dyn Named>(self))
    }
}

/// Consume cualquier `dyn Named` y emite su nombre.
struct Greet;

impl PhaseDefinition for Greet {
    fn id(&self) -> &str {
        "greet"
    }

    fn phase_type(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn declared_input(&self) -> TypeTag {
        TypeTag::of::<dyn Named>()
    }

    fn output_type(&self) -> TypeTag {
        TypeTag::of::<String>()
    }

    fn execute(&self,
               input: Option<ArtifactRef>,
               incoming_error: Option<ExecutionError>)
               -> Result<EmittedValue<ArtifactRef>, PhaseFault> {
        let Some(named) = input.as_ref().and_then(view_as::<dyn Named>) else {
            return Ok(EmittedValue::failed(ExecutionError::fatal("nobody to greet").with_incoming(incoming_error)));
        };
        Ok(EmittedValue::produced(Rc::new(format!("hello {}", named.name())) as ArtifactRef))
    }
}

fn emit<T: Artifact>(id: &str, make: fn() -> T) -> impl PhaseDefinition {
    FnPhase::new(id, move |_: Option<Rc<Void>>, _| Ok(EmittedValue::produced(make())))
}

#[test]
fn capability_request_resolves_single_candidate() {
    let mut wf = Workflow::new();
    wf.append_phase(emit("cat", || Cat)).unwrap()
      .append_phase(Greet)
      .unwrap();

    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FullSuccess);
    assert_eq!(wf.last_emitted::<String>().expect("greeting").as_str(), "hello cat");
}

#[test]
fn two_types_with_same_capability_are_ambiguous() {
    let mut wf = Workflow::new();
    wf.append_phase(emit("cat", || Cat)).unwrap()
      .append_phase(emit("dog", || Dog))
      .unwrap()
      .append_phase(Greet)
      .unwrap();

    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
    assert_eq!(wf.state(), WorkflowState::Stalled);
    assert_eq!(wf.cursor(), 2);

    // ambas emisiones fueron limpias; el fallo viene de la resolución
    let direct = wf.resolve(TypeTag::of::<dyn Named>());
    let err = direct.error().expect("ambiguity");
    assert_eq!(err.kind(), ExecutionErrorKind::AmbiguousTarget);
    assert!(err.is_fatal());
    assert!(err.message().contains("Cat") && err.message().contains("Dog"));

    // Greet recibió la ambigüedad como error entrante y la encadenó
    let greet_err = wf.last_error_of::<Greet>().expect("greet error");
    assert_eq!(greet_err.message(), "nobody to greet");
    assert!(greet_err.cause().expect("cause").to_string().contains("multiple emitted value types"));

    // por tipo concreto no hay ambigüedad
    assert!(wf.last_emitted::<Cat>().is_some());
    assert!(wf.last_emitted::<Dog>().is_some());
}

#[test]
fn never_emitted_type_is_not_produced() {
    let wf = Workflow::new();
    let missing = wf.resolve(TypeTag::of::<Cat>());
    assert!(missing.value().is_none());
    let err = missing.error().expect("error");
    assert_eq!(err.kind(), ExecutionErrorKind::TargetNotProduced);
    assert!(err.is_fatal());
    assert!(err.message().contains("Cat"));
}

#[test]
fn producers_ignore_the_void_resolution_error() {
    let seen = Rc::new(std::cell::RefCell::new(None));
    let sink = Rc::clone(&seen);
    let producer = FnPhase::new("probe", move |input: Option<Rc<Void>>, incoming: Option<ExecutionError>| {
        *sink.borrow_mut() = Some((input.is_some(), incoming.map(|e| e.kind())));
        Ok(EmittedValue::produced(Cat))
    });

    let mut wf = Workflow::new();
    wf.append_phase(producer).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FullSuccess);
    assert_eq!(*seen.borrow(), Some((false, Some(ExecutionErrorKind::TargetNotProduced))));
}

#[test]
fn latest_emission_of_a_type_wins() {
    let mut wf = Workflow::new();
    wf.append_phase(FnPhase::new("first", |_: Option<Rc<Void>>, _| Ok(EmittedValue::produced(String::from("one")))))
      .unwrap()
      .append_phase(FnPhase::new("second", |_: Option<Rc<Void>>, _| Ok(EmittedValue::produced(String::from("two")))))
      .unwrap();

    wf.run_to_completion().unwrap();
    assert_eq!(wf.values().len(), 1);
    assert_eq!(wf.last_emitted::<String>().expect("string").as_str(), "two");
}
