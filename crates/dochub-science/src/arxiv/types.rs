use chrono::{DateTime, Utc};
use dochub_core::MetadataSource;
use serde::{Deserialize, Serialize};

use crate::identifiers::arxiv::ArxivId;
use crate::sources::SourceRecord;

/// One entry of an arXiv Atom feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivEntry {
    pub arxiv_id: ArxivId,
    pub doi: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl ArxivEntry {
    pub fn year(&self) -> String {
        self.published.format("%Y").to_string()
    }

    pub fn month(&self) -> String {
        self.published.format("%m").to_string()
    }

    pub fn into_record(self) -> SourceRecord {
        let mut record = SourceRecord::new(MetadataSource::Arxiv);
        record.year = Some(self.year());
        record.month = Some(self.month());
        record.title = Some(self.title).filter(|t| !t.is_empty());
        record.authors = self.authors;
        record.doi = self.doi;
        record.url = Some(self.arxiv_id.abs_url.clone());
        record.url_pdf = Some(self.arxiv_id.pdf_url.clone());
        record.abstract_text = Some(self.abstract_text).filter(|a| !a.is_empty());
        record.arxiv_id = Some(self.arxiv_id.id);
        record
    }
}
