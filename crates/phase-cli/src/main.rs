use clap::Parser;
use log::{debug, error};
use phase_adapters::phases::MapLinesPhase;
use phase_adapters::pipelines::{text_transform, TextTransform};
use phase_core::{Workflow, WorkflowConfig};

mod commands;
mod exit_codes;
mod output;

use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "phaseflow", version, about = "Typed phase pipeline runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    phase_core::config::init_dotenv();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                  tracing_subscriber::EnvFilter::new("info")
                                              }))
                             .with_writer(std::io::stderr)
                             .init();

    let cli = Cli::parse();
    std::process::exit(run_command(cli.command));
}

fn run_command(command: Command) -> i32 {
    let config = match WorkflowConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::SETUP_ERROR;
        }
    };

    match command {
        Command::Transform { input,
                             output,
                             mode,
                             overwrite,
                             ascii_only,
                             json,
                             debug, } => {
            let config = if debug { config.with_debug(true) } else { config };
            let opts = TextTransform { input,
                                       output,
                                       overwrite };
            let mapper = MapLinesPhase::with_mode(mode.into(), ascii_only);
            match text_transform(&opts, mapper, config) {
                Ok(wf) => run_transform(wf, json),
                Err(e) => {
                    eprintln!("error: {e}");
                    exit_codes::SETUP_ERROR
                }
            }
        }
        Command::Describe { json } => {
            // las rutas no se tocan: sólo se inspecciona la definición
            let opts = TextTransform { input: "<input>".into(),
                                       output: "<output>".into(),
                                       overwrite: false };
            match text_transform(&opts, MapLinesPhase::with_mode(Default::default(), false), config) {
                Ok(wf) => {
                    let report = wf.report();
                    if json {
                        if let Err(e) = output::print_json(&report) {
                            eprintln!("error: {e}");
                            return exit_codes::SETUP_ERROR;
                        }
                    } else {
                        output::print_definition(&report);
                    }
                    exit_codes::FULL_SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    exit_codes::SETUP_ERROR
                }
            }
        }
    }
}

fn run_transform(mut wf: Workflow, json: bool) -> i32 {
    let outcome = match wf.run_to_completion() {
        Ok(o) => o,
        Err(e) => {
            error!("workflow could not run: {e}");
            return exit_codes::SETUP_ERROR;
        }
    };
    let report = wf.report();
    let summary = wf.close();
    debug!("closed {} value(s), {} failure(s)", summary.closed, summary.failed);

    if json {
        if let Err(e) = output::print_json(&report) {
            eprintln!("error: {e}");
        }
    } else {
        output::print_run(&report);
    }
    exit_codes::for_outcome(outcome)
}
