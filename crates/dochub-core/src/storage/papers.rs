use std::path::{Path, PathBuf};

/// Path of a paper's PDF: `{dir}/{filename}.pdf`.
pub fn paper_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(format!("{filename}.pdf"))
}

/// Path of a paper's notes document: `{dir}/{filename}.rst`.
pub fn notes_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(format!("{filename}.rst"))
}
