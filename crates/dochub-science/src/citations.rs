use serde::Serialize;
use tracing::warn;

use dochub_core::MetadataSource;

use crate::config::ScienceConfig;
use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::identifiers::Reference;
use crate::sources::SourceFailure;
use crate::sources::crossref::CrossRefSource;
use crate::sources::semantic_scholar::SemanticScholarSource;

/// Approximate citation counts, one per source that answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CitationReport {
    pub reference: String,
    pub semantic_scholar: Option<u32>,
    pub crossref: Option<u32>,
}

impl CitationReport {
    pub fn best(&self) -> Option<u32> {
        self.semantic_scholar.max(self.crossref)
    }
}

/// arXiv references are counted by Semantic Scholar only; DOIs by
/// Semantic Scholar and CrossRef.
pub struct CitationCounter {
    semantic_scholar: SemanticScholarSource,
    crossref: CrossRefSource,
}

impl CitationCounter {
    pub fn new(config: &ScienceConfig) -> Result<Self> {
        let http = HttpClient::new(&config.user_agent(), config.timeout())?;
        Ok(Self {
            semantic_scholar: SemanticScholarSource::new(
                http.clone(),
                &config.semantic_scholar_api_url,
                config.semantic_scholar_api_key.clone(),
            ),
            crossref: CrossRefSource::new(http, &config.crossref_api_url),
        })
    }

    pub async fn count(&self, reference: &Reference) -> Result<CitationReport> {
        let mut report = CitationReport {
            reference: reference.id().to_string(),
            ..CitationReport::default()
        };
        let mut failures = Vec::new();

        match self.semantic_scholar.fetch_paper(reference).await {
            Ok(paper) => report.semantic_scholar = paper.citation_count,
            Err(e) => {
                warn!(reference = %reference, error = %e, "Semantic Scholar citation count failed");
                failures.push(SourceFailure::from_error(MetadataSource::SemanticScholar, &e));
            }
        }

        if let Reference::Doi(doi) = reference {
            match self.crossref.fetch_by_doi(doi).await {
                Ok(work) => report.crossref = work.citation_count,
                Err(e) => {
                    warn!(reference = %reference, error = %e, "CrossRef citation count failed");
                    failures.push(SourceFailure::from_error(MetadataSource::CrossRef, &e));
                }
            }
        }

        let attempted = if reference.is_arxiv() { 1 } else { 2 };
        if failures.len() == attempted {
            return Err(ScienceError::QueryFailed {
                reference: report.reference,
                failures,
            });
        }
        Ok(report)
    }
}
