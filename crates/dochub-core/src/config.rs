use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocHubError, Result};

/// Root application configuration, loaded from `~/.config/dochub/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub sources: SourcesConfig,
}

/// Where the local library lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Default download directory for PDFs.
    pub literature_dir: String,
    /// Default directory for generated notes.
    pub notes_dir: String,
    /// Plain-text queue of references, one per line.
    pub inbox_file: String,
    /// BibTeX file new entries are appended to.
    pub bibliography_file: String,
}

/// Scholarly API endpoints and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub arxiv_api_url: String,
    pub semantic_scholar_api_url: String,
    pub crossref_api_url: String,
    /// Host of Semantic Scholar's cached PDFs, `{url}/{id[..4]}/{id[4..]}.pdf`.
    pub semantic_scholar_pdf_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polite_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_scholar_api_key: Option<String>,
    pub timeout_secs: u64,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for LibraryConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        let literature = home.join("Literature");

        Self {
            literature_dir: literature.to_string_lossy().to_string(),
            notes_dir: literature.join("notes").to_string_lossy().to_string(),
            inbox_file: literature.join("inbox.txt").to_string_lossy().to_string(),
            bibliography_file: literature.join("library.bib").to_string_lossy().to_string(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            arxiv_api_url: "https://export.arxiv.org/api/query".to_string(),
            semantic_scholar_api_url: "https://api.semanticscholar.org/v1".to_string(),
            crossref_api_url: "https://api.crossref.org".to_string(),
            semantic_scholar_pdf_url: "https://pdfs.semanticscholar.org".to_string(),
            polite_email: None,
            semantic_scholar_api_key: None,
            timeout_secs: 30,
        }
    }
}

// ─── Load ─────────────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/dochub/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("DOCHUB_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("dochub")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path, falling back to defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::read(path)
    }

    /// Load a config file the user named explicitly. A missing file is an error.
    pub fn load_required(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DocHubError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::read(path)
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    // ─── Derived paths ─────────────────────────────────────

    pub fn literature_dir(&self) -> PathBuf {
        expand_home(&self.library.literature_dir)
    }

    pub fn notes_dir(&self) -> PathBuf {
        expand_home(&self.library.notes_dir)
    }

    pub fn inbox_path(&self) -> PathBuf {
        expand_home(&self.library.inbox_file)
    }

    pub fn bibliography_path(&self) -> PathBuf {
        expand_home(&self.library.bibliography_file)
    }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}
