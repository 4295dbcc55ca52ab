use phase_core::WorkflowReport;

pub fn print_json(report: &WorkflowReport) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_run(report: &WorkflowReport) {
    println!("run: {}", report.run_id);
    println!("outcome: {}", report.outcome);
    println!("progress: {:.0}%", report.progress_percent);
    if report.errors.is_empty() {
        return;
    }
    println!("errors:");
    for err in &report.errors {
        let severity = if err.fatal { "fatal" } else { "warning" };
        println!("  [{}] {severity}: {}", err.phase_id, err.message);
    }
}

pub fn print_definition(report: &WorkflowReport) {
    println!("definition: {}", report.definition_hash);
    for phase in &report.phases {
        println!("  {}. {} ({} -> {})",
                 phase.index + 1,
                 phase.id,
                 phase.input_type,
                 phase.output_type);
    }
}
