use std::fmt;

use async_trait::async_trait;
use dochub_core::MetadataSource;

use crate::error::{Result, ScienceError};
use crate::identifiers::Reference;

pub mod crossref;
pub mod semantic_scholar;

/// One metadata API the resolver can try.
#[async_trait]
pub trait RecordSource: Send + Sync {
    fn kind(&self) -> MetadataSource;

    async fn fetch_record(&self, reference: &Reference) -> Result<SourceRecord>;
}

/// Metadata as one source reported it, before citation key and filename
/// are derived. `year`, `title` and at least one author are required to
/// become a `Publication`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub source: MetadataSource,
    pub year: Option<String>,
    pub month: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub arxiv_id: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub url_pdf: Option<String>,
    pub keywords: Vec<String>,
    pub abstract_text: Option<String>,
    pub citation_count: Option<u32>,
}

impl SourceRecord {
    pub fn new(source: MetadataSource) -> Self {
        Self {
            source,
            year: None,
            month: None,
            title: None,
            authors: Vec::new(),
            arxiv_id: None,
            doi: None,
            url: None,
            url_pdf: None,
            keywords: Vec::new(),
            abstract_text: None,
            citation_count: None,
        }
    }

    /// Names of the required fields this record lacks.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.authors.is_empty() {
            missing.push("authors");
        }
        if self.year.as_deref().is_none_or(str::is_empty) {
            missing.push("year");
        }
        if self.title.as_deref().is_none_or(str::is_empty) {
            missing.push("title");
        }
        missing
    }
}

/// Why a single source attempt did not produce a record.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: MetadataSource,
    pub status: Option<u16>,
    pub reason: String,
}

impl SourceFailure {
    pub fn from_error(source: MetadataSource, err: &ScienceError) -> Self {
        Self {
            source,
            status: err.status(),
            reason: err.to_string(),
        }
    }

    pub fn missing_fields(source: MetadataSource, fields: &[&str]) -> Self {
        Self {
            source,
            status: None,
            reason: format!("missing expected fields: {}", fields.join(", ")),
        }
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} returned HTTP {status}", self.source),
            None => write!(f, "{}: {}", self.source, self.reason),
        }
    }
}

/// Collapse whitespace and title-case names given entirely in capitals.
pub fn normalize_author_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let shouting = collapsed.chars().any(char::is_uppercase)
        && !collapsed.chars().any(char::is_lowercase);
    if !shouting {
        return collapsed;
    }

    let mut out = String::with_capacity(collapsed.len());
    let mut word_start = true;
    for c in collapsed.chars() {
        if word_start {
            out.push(c);
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = !c.is_alphabetic();
    }
    out
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_required_gaps() {
        let mut record = SourceRecord::new(MetadataSource::CrossRef);
        assert_eq!(record.missing_fields(), vec!["authors", "year", "title"]);

        record.authors.push("Ashish Vaswani".to_string());
        record.year = Some("2017".to_string());
        record.title = Some(String::new());
        assert_eq!(record.missing_fields(), vec!["title"]);
    }

    #[test]
    fn failure_display_prefers_status() {
        let failure = SourceFailure {
            source: MetadataSource::SemanticScholar,
            status: Some(404),
            reason: "HTTP 404 from http://x".to_string(),
        };
        assert_eq!(failure.to_string(), "Semantic Scholar returned HTTP 404");

        let failure = SourceFailure::missing_fields(MetadataSource::CrossRef, &["year"]);
        assert_eq!(failure.to_string(), "CrossRef: missing expected fields: year");
    }

    #[test]
    fn author_names_are_normalized() {
        assert_eq!(normalize_author_name("  Ashish   Vaswani "), "Ashish Vaswani");
        assert_eq!(normalize_author_name("LINNÉA CLAESSON"), "Linnéa Claesson");
        assert_eq!(normalize_author_name("JEAN-PAUL O'NEIL"), "Jean-Paul O'Neil");
        assert_eq!(normalize_author_name("David McAllester"), "David McAllester");
    }
}
