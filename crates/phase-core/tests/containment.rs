use std::rc::Rc;

use phase_core::{ArtifactRef, EmittedValue, ExecutionError, ExecutionErrorKind, FnPhase, GuardedPhase, PhaseStatus,
                 Void, Workflow, WorkflowOutcome, WorkflowState};

fn panicking() -> impl phase_core::PhaseDefinition {
    FnPhase::new("explode", |_: Option<Rc<Void>>, _| -> Result<EmittedValue<String>, phase_core::PhaseFault> {
        panic!("index out of range")
    })
}

#[test]
fn panicking_phase_stalls_the_run() {
    let mut wf = Workflow::new();
    wf.append_phase(panicking()).unwrap()
      .append_phase(FnPhase::new("after", |s: Option<Rc<String>>, _| Ok(EmittedValue::produced(s.is_some().to_string()))))
      .unwrap();

    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
    assert_eq!(wf.state(), WorkflowState::Stalled);
    assert_eq!(wf.cursor(), 0);
    assert_eq!(wf.status_of(1), Some(PhaseStatus::Pending));

    let errors = wf.errors_chronological();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind(), ExecutionErrorKind::InternalFault);
    assert!(errors[0].is_fatal());
    assert_eq!(errors[0].cause().expect("cause").to_string(), "panic: index out of range");
}

#[test]
fn returned_fault_becomes_internal_fault() {
    let phase = FnPhase::new("parse", |s: Option<Rc<String>>, _| {
        let n: u32 = s.ok_or("no input")?.parse()?;
        Ok(EmittedValue::produced(n.to_string()))
    });

    let out = phase.run_guarded(Some(Rc::new(String::from("not a number")) as ArtifactRef), None);
    let err = out.error().expect("error");
    assert_eq!(err.kind(), ExecutionErrorKind::InternalFault);
    assert!(out.is_fatal());
    assert!(err.to_string().contains("invalid digit"));
}

#[test]
fn absent_input_and_error_is_invalid_invocation() {
    let phase = FnPhase::new("any", |_: Option<Rc<String>>, _| Ok(EmittedValue::<String>::NoOp));
    let out = phase.run_guarded(None, None);
    let err = out.error().expect("error");
    assert_eq!(err.kind(), ExecutionErrorKind::InvalidInvocation);
    assert!(err.is_fatal());
}

#[test]
fn mismatched_input_type_is_invalid_invocation() {
    let phase = FnPhase::new("wants_string", |_: Option<Rc<String>>, _| Ok(EmittedValue::<String>::NoOp));
    let out = phase.run_guarded(Some(Rc::new(vec![1u8, 2, 3]) as ArtifactRef), None);
    let err = out.error().expect("error");
    assert_eq!(err.kind(), ExecutionErrorKind::InvalidInvocation);
    assert!(err.message().contains("alloc::vec::Vec<u8>"));
    assert!(err.message().contains("alloc::string::String"));
}

#[test]
fn domain_errors_keep_the_authors_fatal_flag() {
    let mut wf = Workflow::new();
    wf.append_phase(FnPhase::new("warn", |_: Option<Rc<Void>>, _| {
                      Ok(EmittedValue::with_issue(String::from("ok"), ExecutionError::non_fatal("minor")))
                  }))
      .unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::PartialSuccess);
    assert_eq!(wf.errors_chronological()[0].kind(), ExecutionErrorKind::Domain);
    assert_eq!(wf.state(), WorkflowState::Completed);
}
