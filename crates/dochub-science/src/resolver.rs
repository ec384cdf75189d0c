use dochub_core::{MetadataSource, Publication};
use tracing::{debug, info, warn};

use crate::arxiv::ArxivClient;
use crate::config::ScienceConfig;
use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::identifiers::Reference;
use crate::identifiers::arxiv::ArxivId;
use crate::naming;
use crate::sources::crossref::CrossRefSource;
use crate::sources::semantic_scholar::SemanticScholarSource;
use crate::sources::{RecordSource, SourceFailure, SourceRecord};

/// Resolves a classified reference into a `Publication`.
///
/// arXiv references have a single source. DOIs try Semantic Scholar, then
/// CrossRef once; nothing else is consulted. Each source is queried at most
/// once per resolution and calls run strictly one after another.
pub struct Resolver {
    arxiv: ArxivClient,
    semantic_scholar: SemanticScholarSource,
    crossref: CrossRefSource,
}

impl Resolver {
    pub fn new(config: &ScienceConfig) -> Result<Self> {
        let http = HttpClient::new(&config.user_agent(), config.timeout())?;
        Ok(Self {
            arxiv: ArxivClient::new(http.clone(), &config.arxiv_api_url),
            semantic_scholar: SemanticScholarSource::new(
                http.clone(),
                &config.semantic_scholar_api_url,
                config.semantic_scholar_api_key.clone(),
            )
            .with_pdf_base(&config.semantic_scholar_pdf_url),
            crossref: CrossRefSource::new(http, &config.crossref_api_url),
        })
    }

    /// Ordered sources to try for this kind of reference.
    pub fn strategies(&self, reference: &Reference) -> Vec<&dyn RecordSource> {
        match reference {
            Reference::Arxiv(_) => vec![&self.arxiv as &dyn RecordSource],
            Reference::Doi(_) => vec![
                &self.semantic_scholar as &dyn RecordSource,
                &self.crossref as &dyn RecordSource,
            ],
        }
    }

    pub async fn resolve_str(&self, raw: &str) -> Result<Publication> {
        self.resolve(&Reference::classify(raw)).await
    }

    pub async fn resolve(&self, reference: &Reference) -> Result<Publication> {
        let mut failures = Vec::new();

        for source in self.strategies(reference) {
            match self.attempt(source, reference).await {
                Ok(publication) => {
                    info!(
                        reference = %reference,
                        source = %publication.source,
                        identifier = %publication.identifier,
                        "resolved"
                    );
                    return Ok(publication);
                }
                Err(failure) => {
                    warn!(reference = %reference, %failure, "metadata source failed");
                    failures.push(failure);
                }
            }
        }

        Err(ScienceError::QueryFailed {
            reference: reference.id().to_string(),
            failures,
        })
    }

    async fn attempt(
        &self,
        source: &dyn RecordSource,
        reference: &Reference,
    ) -> std::result::Result<Publication, SourceFailure> {
        let kind = source.kind();
        let mut record = source
            .fetch_record(reference)
            .await
            .map_err(|e| SourceFailure::from_error(kind, &e))?;

        let missing = record.missing_fields();
        if !missing.is_empty() {
            return Err(SourceFailure::missing_fields(kind, &missing));
        }

        self.enrich(&mut record).await;
        naming::derive(record)
    }

    /// Best-effort secondary lookups. Failures leave the record as it was.
    async fn enrich(&self, record: &mut SourceRecord) {
        match record.source {
            MetadataSource::Arxiv => self.add_keywords(record).await,
            MetadataSource::SemanticScholar => self.add_arxiv_abstract(record).await,
            MetadataSource::CrossRef => {}
        }
    }

    async fn add_keywords(&self, record: &mut SourceRecord) {
        let Some(id) = record.arxiv_id.clone() else {
            return;
        };
        let reference = Reference::Arxiv(ArxivId::from_bare(&id, &id));

        match self.semantic_scholar.fetch_paper(&reference).await {
            Ok(paper) => {
                debug!(arxiv_id = %id, topics = paper.topics.len(), "keyword enrichment");
                record.keywords = paper.topics;
                record.citation_count = record.citation_count.or(paper.citation_count);
                if record.doi.is_none() {
                    record.doi = paper.doi;
                }
            }
            Err(e) => warn!(arxiv_id = %id, error = %e, "keyword enrichment failed"),
        }
    }

    async fn add_arxiv_abstract(&self, record: &mut SourceRecord) {
        if record.abstract_text.is_some() {
            return;
        }
        let Some(id) = record.arxiv_id.clone() else {
            return;
        };

        match self.arxiv.fetch_entry(&ArxivId::from_bare(&id, &id)).await {
            Ok(entry) => {
                if record.month.is_none() {
                    record.month = Some(entry.month());
                }
                record.abstract_text = Some(entry.abstract_text).filter(|a| !a.is_empty());
            }
            Err(e) => warn!(arxiv_id = %id, error = %e, "arXiv abstract lookup failed"),
        }
    }
}
