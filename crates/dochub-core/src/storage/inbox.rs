use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Read all queued references, skipping blank lines.
pub fn read_inbox(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect())
}

/// Append a reference to the inbox. Returns `false` if it was already queued.
pub fn append_to_inbox(path: &Path, reference: &str) -> Result<bool> {
    let reference = reference.trim();
    if read_inbox(path)?.iter().any(|queued| queued == reference) {
        tracing::info!(reference, "already in inbox");
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let needs_newline = fs::read(path)
        .map(|bytes| bytes.last().is_some_and(|b| *b != b'\n'))
        .unwrap_or(false);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        writeln!(file)?;
    }
    writeln!(file, "{reference}")?;
    Ok(true)
}

/// Remove and return the oldest queued reference.
pub fn pop_inbox(path: &Path) -> Result<Option<String>> {
    let mut queued = read_inbox(path)?;
    if queued.is_empty() {
        return Ok(None);
    }

    let head = queued.remove(0);
    let mut rest = queued.join("\n");
    if !rest.is_empty() {
        rest.push('\n');
    }
    fs::write(path, rest)?;
    Ok(Some(head))
}
