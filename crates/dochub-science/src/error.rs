use thiserror::Error;

use crate::sources::SourceFailure;

#[derive(Debug, Error)]
pub enum ScienceError {
    #[error("invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("invalid arXiv ID: {0}")]
    InvalidArxivId(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("query unsuccessful for {reference}: {}", describe_failures(.failures))]
    QueryFailed {
        reference: String,
        failures: Vec<SourceFailure>,
    },

    #[error("no PDF link known for {0}")]
    NoPdfSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScienceError {
    /// HTTP status behind this error, if there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScienceError::Status { status, .. } => Some(*status),
            ScienceError::Http(e) => e.status().map(|s| s.as_u16()),
            ScienceError::QueryFailed { failures, .. } => failures.iter().find_map(|f| f.status),
            _ => None,
        }
    }
}

fn describe_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ScienceError>;
