use serde::{Deserialize, Serialize};

/// Rendered in place of an abstract no source could provide.
pub const UNAVAILABLE: &str = "(Unavailable)";

/// The API that supplied a record's primary fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    Arxiv,
    SemanticScholar,
    CrossRef,
}

impl std::fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use MetadataSource::*;
        let s = match self {
            Arxiv => "arXiv",
            SemanticScholar => "Semantic Scholar",
            CrossRef => "CrossRef",
        };
        write!(f, "{s}")
    }
}

/// Canonical, source-agnostic publication record.
///
/// `identifier` and `filename` are derived from the first author, the year
/// and the title; they are never taken from an API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub identifier: String,
    pub filename: String,
    pub year: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    pub title: String,
    pub authors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, rename = "urlPDF", skip_serializing_if = "Option::is_none")]
    pub url_pdf: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_count: Option<u32>,

    pub source: MetadataSource,
}

impl Publication {
    pub fn first_author(&self) -> &str {
        self.authors.first().map(String::as_str).unwrap_or_default()
    }

    pub fn abstract_or_unavailable(&self) -> &str {
        self.abstract_text
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNAVAILABLE)
    }

    /// The reference this record was resolved from: the arXiv ID when known,
    /// the DOI otherwise.
    pub fn reference_id(&self) -> Option<&str> {
        self.arxiv_id.as_deref().or(self.doi.as_deref())
    }
}
