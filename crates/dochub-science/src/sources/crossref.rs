use async_trait::async_trait;
use dochub_core::MetadataSource;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::identifiers::Reference;
use crate::identifiers::doi::Doi;
use crate::sources::{RecordSource, SourceRecord, non_empty, normalize_author_name};

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());

/// CrossRef works API. Used as the DOI fallback and for citation counts.
pub struct CrossRefSource {
    client: HttpClient,
    base_url: String,
}

impl CrossRefSource {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_by_doi(&self, doi: &Doi) -> Result<CrossRefWork> {
        let url = format!("{}/works/{}", self.base_url, doi.id);
        let val: Value = self.client.get_json(&url).await?;

        CrossRefWork::from_json(&val["message"])
    }
}

#[async_trait]
impl RecordSource for CrossRefSource {
    fn kind(&self) -> MetadataSource {
        MetadataSource::CrossRef
    }

    async fn fetch_record(&self, reference: &Reference) -> Result<SourceRecord> {
        match reference {
            Reference::Doi(doi) => Ok(self.fetch_by_doi(doi).await?.into_record()),
            Reference::Arxiv(id) => Err(ScienceError::InvalidDoi(id.id.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossRefWork {
    pub doi: String,
    pub url: Option<String>,
    pub title: Vec<String>,
    pub author: Vec<CrossRefAuthor>,
    pub year: Option<String>,
    pub subject: Vec<String>,
    pub abstract_text: Option<String>,
    pub citation_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossRefAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
    pub name: Option<String>,
}

impl CrossRefWork {
    pub fn from_json(v: &Value) -> Result<Self> {
        let doi = v["DOI"]
            .as_str()
            .ok_or_else(|| ScienceError::Parse("Missing DOI in CrossRef response".to_string()))?
            .to_string();

        let title = strings(&v["title"]);
        let subject = strings(&v["subject"]);

        let author = v["author"]
            .as_array()
            .map(|a| a.iter().map(CrossRefAuthor::from_json).collect())
            .unwrap_or_default();

        let abstract_text = v["abstract"].as_str().and_then(|raw| {
            let plain = MARKUP_TAG.replace_all(raw, " ");
            non_empty(Some(plain.as_ref()))
        });

        Ok(Self {
            doi,
            url: non_empty(v["URL"].as_str()),
            title,
            author,
            year: parse_year(v),
            subject,
            abstract_text,
            citation_count: v["is-referenced-by-count"]
                .as_u64()
                .and_then(|n| u32::try_from(n).ok()),
        })
    }

    pub fn into_record(self) -> SourceRecord {
        let mut record = SourceRecord::new(MetadataSource::CrossRef);
        record.year = self.year;
        record.title = non_empty(self.title.first().map(String::as_str));
        record.authors = self
            .author
            .iter()
            .filter_map(CrossRefAuthor::display_name)
            .collect();
        record.url = self.url.or_else(|| Some(Doi::lenient(&self.doi).url));
        record.doi = Some(self.doi);
        record.keywords = self.subject;
        record.abstract_text = self.abstract_text;
        record.citation_count = self.citation_count;
        record
    }
}

impl CrossRefAuthor {
    fn from_json(v: &Value) -> Self {
        Self {
            given: non_empty(v["given"].as_str()),
            family: non_empty(v["family"].as_str()),
            name: non_empty(v["name"].as_str()),
        }
    }

    /// "Given Family", or the organization name for corporate authors.
    fn display_name(&self) -> Option<String> {
        let name = match (&self.given, &self.family) {
            (Some(g), Some(f)) => format!("{g} {f}"),
            (None, Some(f)) => f.clone(),
            (Some(g), None) => g.clone(),
            (None, None) => self.name.clone()?,
        };
        Some(normalize_author_name(&name))
    }
}

fn strings(v: &Value) -> Vec<String> {
    v.as_array()
        .map(|a| a.iter().filter_map(|s| non_empty(s.as_str())).collect())
        .unwrap_or_default()
}

fn parse_year(v: &Value) -> Option<String> {
    // "created": {"date-time": "2016-01-27T17:01:28Z", "date-parts": [[2016, 1, 27]]}
    v["created"]["date-time"]
        .as_str()
        .and_then(|s| s.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .map(ToOwned::to_owned)
        .or_else(|| {
            v["issued"]["date-parts"][0][0]
                .as_i64()
                .or_else(|| v["published-print"]["date-parts"][0][0].as_i64())
                .map(|n| n.to_string())
        })
}
