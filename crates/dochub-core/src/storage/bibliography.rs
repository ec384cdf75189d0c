use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Append a formatted entry to the bibliography file.
///
/// Returns `false` without writing when an entry with the same citation key
/// is already present.
pub fn append_entry(path: &Path, key: &str, entry: &str) -> Result<bool> {
    if contains_key(path, key)? {
        tracing::info!(key, path = %path.display(), "bibliography already has entry");
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "{}\n\n", entry.trim_end())?;
    Ok(true)
}

/// Whether an entry keyed `key` exists, e.g. `@article{vaswani2017,`.
pub fn contains_key(path: &Path, key: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let needle = format!("{{{key},");
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .any(|line| line.trim_start().starts_with('@') && line.contains(&needle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ENTRY: &str = "@article{vaswani2017,\n  year = {2017},\n}\n";

    #[test]
    fn test_append_entry_and_skip_duplicate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs").join("library.bib");

        assert!(append_entry(&path, "vaswani2017", ENTRY).unwrap());
        assert!(!append_entry(&path, "vaswani2017", ENTRY).unwrap());

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("@article{vaswani2017,").count(), 1);
        assert!(contents.ends_with("}\n\n"));
    }

    #[test]
    fn test_key_prefix_is_not_a_match() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.bib");
        append_entry(&path, "silver20161", "@article{silver20161,\n}").unwrap();

        assert!(!contains_key(&path, "silver2016").unwrap());
        assert!(append_entry(&path, "silver2016", "@article{silver2016,\n}").unwrap());
    }
}
