//! phase-adapters: fases de uso general sobre archivos y texto
//!
//! Este crate provee:
//! - Artifacts de archivo (`OpenedFile`, `FileContents`, `TextLines`) y la
//!   capacidad `dyn AsBytes`, que declaran los artifacts serializables a
//!   bytes.
//! - Fases: emitir un valor arbitrario, abrir/leer/cerrar un archivo,
//!   transformar líneas de texto y guardar cualquier `AsBytes` a disco.
//! - `pipelines::text_transform`: la composición open → read → map → save →
//!   close usada por el CLI.
//!
//! Nota: el core no interpreta ningún contenido; todo el conocimiento de
//! formato vive aquí.

pub mod artifacts;
pub mod mappers;
pub mod phases;
pub mod pipelines;

pub use artifacts::{AsBytes, FileContents, OpenedFile, TextLines};
pub use mappers::{LineError, LineMode};
