use std::time::Duration;

use dochub_core::SourcesConfig;
use serde::{Deserialize, Serialize};

/// Endpoints and credentials handed to the resolver at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScienceConfig {
    pub arxiv_api_url: String,
    pub semantic_scholar_api_url: String,
    pub crossref_api_url: String,
    pub semantic_scholar_pdf_url: String,
    pub polite_pool_email: Option<String>,
    pub semantic_scholar_api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ScienceConfig {
    fn default() -> Self {
        Self::from(&SourcesConfig::default())
    }
}

impl From<&SourcesConfig> for ScienceConfig {
    fn from(sources: &SourcesConfig) -> Self {
        Self {
            arxiv_api_url: sources.arxiv_api_url.clone(),
            semantic_scholar_api_url: sources.semantic_scholar_api_url.clone(),
            crossref_api_url: sources.crossref_api_url.clone(),
            semantic_scholar_pdf_url: sources.semantic_scholar_pdf_url.clone(),
            polite_pool_email: sources.polite_email.clone(),
            semantic_scholar_api_key: sources.semantic_scholar_api_key.clone(),
            timeout_secs: sources.timeout_secs,
        }
    }
}

impl ScienceConfig {
    /// Every endpoint pointed at one base URL, the way tests wire a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            arxiv_api_url: format!("{base_url}/api/query"),
            semantic_scholar_api_url: format!("{base_url}/v1"),
            crossref_api_url: base_url.to_string(),
            semantic_scholar_pdf_url: format!("{base_url}/pdfs"),
            polite_pool_email: None,
            semantic_scholar_api_key: None,
            timeout_secs: 5,
        }
    }

    /// Let `DOCHUB_POLITE_EMAIL` and `DOCHUB_SEMANTIC_SCHOLAR_API_KEY` fill in credentials.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(email) = env_non_empty("DOCHUB_POLITE_EMAIL") {
            self.polite_pool_email = Some(email);
        }
        if let Some(key) = env_non_empty("DOCHUB_SEMANTIC_SCHOLAR_API_KEY") {
            self.semantic_scholar_api_key = Some(key);
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn user_agent(&self) -> String {
        let version = env!("CARGO_PKG_VERSION");
        match self.polite_pool_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => format!("dochub/{version} (mailto:{email})"),
            _ => format!("dochub/{version}"),
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_carries_polite_email() {
        let mut config = ScienceConfig::default();
        assert!(config.user_agent().starts_with("dochub/"));
        assert!(!config.user_agent().contains("mailto"));

        config.polite_pool_email = Some("me@example.org".to_string());
        assert!(config.user_agent().ends_with("(mailto:me@example.org)"));
    }

    #[test]
    fn base_url_wiring() {
        let config = ScienceConfig::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.arxiv_api_url, "http://127.0.0.1:1234/api/query");
        assert_eq!(config.semantic_scholar_api_url, "http://127.0.0.1:1234/v1");
        assert_eq!(config.crossref_api_url, "http://127.0.0.1:1234");
        assert_eq!(config.semantic_scholar_pdf_url, "http://127.0.0.1:1234/pdfs");
    }

    #[test]
    fn converts_from_sources_section() {
        let sources = SourcesConfig {
            semantic_scholar_api_key: Some("key".to_string()),
            timeout_secs: 0,
            ..SourcesConfig::default()
        };
        let config = ScienceConfig::from(&sources);
        assert_eq!(config.semantic_scholar_api_key.as_deref(), Some("key"));
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
