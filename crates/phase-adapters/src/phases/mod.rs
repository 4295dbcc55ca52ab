//! Fases de uso general.

mod close_file;
mod emit;
mod map_lines;
mod open_file;
mod read_contents;
mod save_file;

pub use close_file::CloseFilePhase;
pub use emit::EmitValuePhase;
pub use map_lines::MapLinesPhase;
pub use open_file::OpenFilePhase;
pub use read_contents::ReadContentsPhase;
pub use save_file::SaveFilePhase;
