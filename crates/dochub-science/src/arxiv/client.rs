use async_trait::async_trait;
use dochub_core::MetadataSource;

use crate::arxiv::parser::parse_atom_response;
use crate::arxiv::types::ArxivEntry;
use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::identifiers::Reference;
use crate::identifiers::arxiv::ArxivId;
use crate::sources::{RecordSource, SourceRecord};

pub struct ArxivClient {
    client: HttpClient,
    base_url: String,
}

impl ArxivClient {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Query by a comma-joined ID list. Entries come back in request order.
    pub async fn fetch_entries(&self, ids: &[ArxivId]) -> Result<Vec<ArxivEntry>> {
        let id_list = ids
            .iter()
            .map(|id| id.id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{separator}id_list={id_list}", self.base_url);

        let xml = self.client.get(&url).await?;
        parse_atom_response(&xml)
    }

    /// Exactly one entry is expected; the first one wins if the feed has more.
    pub async fn fetch_entry(&self, id: &ArxivId) -> Result<ArxivEntry> {
        let entries = self.fetch_entries(std::slice::from_ref(id)).await?;
        if entries.len() > 1 {
            tracing::warn!(id = %id.id, count = entries.len(), "arXiv returned several entries");
        }
        entries
            .into_iter()
            .next()
            .ok_or_else(|| ScienceError::IdentifierNotFound(format!("arXiv:{}", id.id)))
    }
}

#[async_trait]
impl RecordSource for ArxivClient {
    fn kind(&self) -> MetadataSource {
        MetadataSource::Arxiv
    }

    async fn fetch_record(&self, reference: &Reference) -> Result<SourceRecord> {
        match reference {
            Reference::Arxiv(id) => Ok(self.fetch_entry(id).await?.into_record()),
            Reference::Doi(doi) => Err(ScienceError::InvalidArxivId(doi.id.clone())),
        }
    }
}
