use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use phase_adapters::LineMode;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Upper,
    Lower,
    Trim,
}

impl From<ModeArg> for LineMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Upper => LineMode::Upper,
            ModeArg::Lower => LineMode::Lower,
            ModeArg::Trim => LineMode::Trim,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transforma las líneas de INPUT y escribe el resultado en OUTPUT
    Transform {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = ModeArg::Upper)]
        mode: ModeArg,
        /// Reemplaza OUTPUT si ya existe
        #[arg(long)]
        overwrite: bool,
        /// Las líneas con caracteres no ASCII fallan individualmente
        #[arg(long)]
        ascii_only: bool,
        /// Imprime el reporte completo como JSON
        #[arg(long)]
        json: bool,
        /// Fuerza el modo debug (equivale a PHASEFLOW_DEBUG=true)
        #[arg(long)]
        debug: bool,
    },
    /// Lista las fases del pipeline y el hash de su definición
    Describe {
        #[arg(long)]
        json: bool,
    },
}
