use async_trait::async_trait;
use dochub_core::MetadataSource;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::identifiers::Reference;
use crate::identifiers::arxiv::ArxivId;
use crate::identifiers::doi::Doi;
use crate::sources::{RecordSource, SourceRecord, non_empty, normalize_author_name};

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Paper lookup against the Semantic Scholar v1 API, by DOI or `arXiv:` ID.
pub struct SemanticScholarSource {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
    pdf_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct S2Paper {
    pub paper_id: Option<String>,
    pub arxiv_id: Option<String>,
    pub doi: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub authors: Vec<String>,
    pub topics: Vec<String>,
    pub url: Option<String>,
    pub abstract_text: Option<String>,
    pub citation_count: Option<u32>,
}

impl SemanticScholarSource {
    pub fn new(client: HttpClient, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            pdf_base_url: None,
        }
    }

    /// Look for a cached PDF under `pdf_base_url` for papers not on arXiv.
    pub fn with_pdf_base(mut self, pdf_base_url: &str) -> Self {
        self.pdf_base_url = Some(pdf_base_url.trim_end_matches('/').to_string());
        self
    }

    pub async fn fetch_paper(&self, reference: &Reference) -> Result<S2Paper> {
        let url = format!("{}/paper/{}", self.base_url, paper_path(reference));
        let val: Value = self
            .client
            .get_json_with_headers(&url, self.auth_headers()?)
            .await?;
        S2Paper::from_json(&val)
    }

    /// Cached PDF URL for the paper, only if the host answers a HEAD for it.
    pub async fn cached_pdf(&self, paper: &S2Paper) -> Option<String> {
        let base = self.pdf_base_url.as_deref()?;
        let url = format!("{base}/{}", paper.pdf_path()?);
        if self.client.exists(&url).await {
            Some(url)
        } else {
            debug!(url, "no cached PDF");
            None
        }
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(key) = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let value =
                HeaderValue::from_str(key).map_err(|e| ScienceError::Parse(e.to_string()))?;
            headers.insert(API_KEY_HEADER, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl RecordSource for SemanticScholarSource {
    fn kind(&self) -> MetadataSource {
        MetadataSource::SemanticScholar
    }

    async fn fetch_record(&self, reference: &Reference) -> Result<SourceRecord> {
        let paper = self.fetch_paper(reference).await?;
        let cached_pdf = if paper.arxiv_id.is_some() {
            None
        } else {
            self.cached_pdf(&paper).await
        };

        let mut record = paper.into_record();
        if record.url_pdf.is_none() {
            record.url_pdf = cached_pdf;
        }
        Ok(record)
    }
}

fn paper_path(reference: &Reference) -> String {
    match reference {
        Reference::Arxiv(id) => format!("arXiv:{}", id.id),
        Reference::Doi(doi) => doi.id.clone(),
    }
}

impl S2Paper {
    pub fn from_json(v: &Value) -> Result<Self> {
        if !v.is_object() {
            return Err(ScienceError::Parse(
                "Semantic Scholar response is not an object".to_string(),
            ));
        }
        if let Some(error) = v.get("error").and_then(Value::as_str) {
            return Err(ScienceError::Parse(format!("Semantic Scholar: {error}")));
        }

        let str_field = |key: &str| non_empty(v.get(key).and_then(Value::as_str));

        let authors = v
            .get("authors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|author| author.get("name").and_then(Value::as_str))
                    .map(normalize_author_name)
                    .filter(|name| !name.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let topics = v
            .get("topics")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|topic| non_empty(topic.get("topic").and_then(Value::as_str)))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let citation_count = v
            .get("citations")
            .and_then(Value::as_array)
            .map(|items| items.len() as u64)
            .or_else(|| v.get("numCitedBy").and_then(Value::as_u64))
            .or_else(|| v.get("citationCount").and_then(Value::as_u64))
            .and_then(|n| u32::try_from(n).ok());

        Ok(Self {
            paper_id: str_field("paperId"),
            arxiv_id: str_field("arxivId"),
            doi: str_field("doi"),
            title: str_field("title"),
            year: v
                .get("year")
                .and_then(Value::as_i64)
                .and_then(|n| i32::try_from(n).ok()),
            authors,
            topics,
            url: str_field("url"),
            abstract_text: str_field("abstract"),
            citation_count,
        })
    }

    /// `846a/edd869….pdf`: the paper ID split after its first four characters.
    pub fn pdf_path(&self) -> Option<String> {
        let id = self.paper_id.as_deref()?;
        if id.len() <= 4 || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(format!("{}/{}.pdf", &id[..4], &id[4..]))
    }

    /// Papers also on arXiv link to arXiv; the rest to S2 or doi.org.
    /// A cached S2 PDF is attached separately by `fetch_record`.
    pub fn into_record(self) -> SourceRecord {
        let mut record = SourceRecord::new(MetadataSource::SemanticScholar);
        record.year = self.year.map(|y| y.to_string());
        record.title = self.title;
        record.authors = self.authors;
        record.keywords = self.topics;
        record.abstract_text = self.abstract_text;
        record.citation_count = self.citation_count;

        match self.arxiv_id.as_deref().map(|id| ArxivId::from_bare(id, id)) {
            Some(arxiv) => {
                record.url = Some(arxiv.abs_url);
                record.url_pdf = Some(arxiv.pdf_url);
                record.arxiv_id = Some(arxiv.id);
            }
            None => {
                record.url = self
                    .url
                    .or_else(|| self.doi.as_deref().map(|d| Doi::lenient(d).url));
            }
        }
        record.doi = self.doi;
        record
    }
}
