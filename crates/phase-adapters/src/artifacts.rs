//! Artifacts de archivo y texto.
//!
//! `FileContents` y `TextLines` declaran la capacidad `dyn AsBytes`: una fase
//! que pida `dyn AsBytes` acepta cualquiera de los dos, siempre que sólo uno
//! haya sido emitido.

use std::any::Any;
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use phase_core::{capability_box, Artifact, PhaseFault, TypeTag};

/// Capacidad: el valor puede escribirse como bytes.
pub trait AsBytes {
    fn to_bytes(&self) -> Vec<u8>;
}

fn as_bytes_view<T: AsBytes + 'static>(value: Rc<T>, capability: TypeTag) -> Option<Box<dyn Any>> {
    (capability == TypeTag::of::<dyn AsBytes>()).then(|| capability_box::<dyn AsBytes>(value))
}

/// Archivo abierto para lectura. El handle se libera en `close` (idempotente).
#[derive(Debug)]
pub struct OpenedFile {
    path: PathBuf,
    handle: RefCell<Option<File>>,
    read_only: bool,
}

impl OpenedFile {
    pub fn new(path: impl Into<PathBuf>, file: File, read_only: bool) -> Self {
        Self { path: path.into(),
               handle: RefCell::new(Some(file)),
               read_only }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_open(&self) -> bool {
        self.handle.borrow().is_some()
    }

    /// Lee el resto del archivo desde la posición actual.
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        let mut handle = self.handle.borrow_mut();
        let file = handle.as_mut()
                         .ok_or_else(|| io::Error::other(format!("file handle already closed: {}", self.path.display())))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl Artifact for OpenedFile {
    fn close(&self) -> Result<(), PhaseFault> {
        if self.handle.borrow_mut().take().is_some() {
            log::debug!("closed {}", self.path.display());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    pub source: PathBuf,
    pub bytes: Vec<u8>,
}

impl AsBytes for FileContents {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl Artifact for FileContents {
    fn capabilities(&self) -> Vec<TypeTag> {
        vec![TypeTag::of::<dyn AsBytes>()]
    }

    fn capability_view(self: Rc<Self>, capability: TypeTag) -> Option<Box<dyn Any>> {
        as_bytes_view(self, capability)
    }
}

/// Líneas de texto; se escriben separadas por `\n` con salto final.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLines {
    pub lines: Vec<String>,
}

impl AsBytes for TextLines {
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.into_bytes()
    }
}

impl Artifact for TextLines {
    fn capabilities(&self) -> Vec<TypeTag> {
        vec![TypeTag::of::<dyn AsBytes>()]
    }

    fn capability_view(self: Rc<Self>, capability: TypeTag) -> Option<Box<dyn Any>> {
        as_bytes_view(self, capability)
    }
}
