use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::storage::papers::notes_path;

/// Result of writing a notes document. An existing file is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

impl NotesOutcome {
    pub fn path(&self) -> &Path {
        match self {
            NotesOutcome::Created(path) | NotesOutcome::AlreadyExists(path) => path,
        }
    }
}

/// Write `contents` to `{dir}/{filename}.rst` unless that file exists.
pub fn write_notes(dir: &Path, filename: &str, contents: &str) -> Result<NotesOutcome> {
    fs::create_dir_all(dir)?;
    let path = notes_path(dir, filename);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::warn!(path = %path.display(), "notes already exist");
            return Ok(NotesOutcome::AlreadyExists(path));
        }
        Err(e) => return Err(e.into()),
    };

    file.write_all(contents.as_bytes())?;
    Ok(NotesOutcome::Created(path))
}
