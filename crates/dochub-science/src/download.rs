use std::path::{Path, PathBuf};

use dochub_core::Publication;
use dochub_core::storage::papers::paper_path;
use tracing::{info, warn};

use crate::config::ScienceConfig;
use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::identifiers::arxiv::ArxivId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub url: String,
    pub size_bytes: u64,
    /// A file already existed at `path` and was replaced.
    pub overwritten: bool,
}

/// Downloads a publication's PDF to `{dir}/{filename}.pdf`.
pub struct PaperFetcher {
    client: HttpClient,
}

impl PaperFetcher {
    pub fn new(config: &ScienceConfig) -> Result<Self> {
        Ok(Self::with_client(HttpClient::new(
            &config.user_agent(),
            config.timeout(),
        )?))
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// The record's PDF link, else the arXiv PDF for its arXiv ID.
    pub fn pdf_url(publication: &Publication) -> Result<String> {
        publication
            .url_pdf
            .clone()
            .or_else(|| {
                publication
                    .arxiv_id
                    .as_deref()
                    .map(|id| ArxivId::from_bare(id, id).pdf_url)
            })
            .ok_or_else(|| ScienceError::NoPdfSource(publication.identifier.clone()))
    }

    /// An existing file at the target path is overwritten, with a warning.
    /// The write is not atomic.
    pub async fn fetch(&self, publication: &Publication, dest_dir: &Path) -> Result<DownloadOutcome> {
        let url = Self::pdf_url(publication)?;
        let path = paper_path(dest_dir, &publication.filename);

        let bytes = self.client.get_bytes(&url).await?;

        tokio::fs::create_dir_all(dest_dir).await?;
        let overwritten = tokio::fs::try_exists(&path).await.unwrap_or(false);
        if overwritten {
            warn!(path = %path.display(), "PDF already exists, overwriting");
        }
        tokio::fs::write(&path, &bytes).await?;

        info!(path = %path.display(), bytes = bytes.len(), "downloaded PDF");
        Ok(DownloadOutcome {
            path,
            url,
            size_bytes: bytes.len() as u64,
            overwritten,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dochub_core::MetadataSource;
    use mockito::Server;
    use tempfile::TempDir;

    use super::*;

    fn publication(url_pdf: Option<String>) -> Publication {
        Publication {
            identifier: "vaswani2017".to_string(),
            filename: "vaswani2017--Attention_Is_All_You_Need".to_string(),
            year: "2017".to_string(),
            month: None,
            title: "Attention Is All You Need".to_string(),
            authors: vec!["Ashish Vaswani".to_string()],
            arxiv_id: Some("1706.03762".to_string()),
            doi: None,
            url: None,
            url_pdf,
            keywords: Vec::new(),
            abstract_text: None,
            citation_count: None,
            source: MetadataSource::Arxiv,
        }
    }

    fn fetcher() -> PaperFetcher {
        PaperFetcher::with_client(HttpClient::new("dochub-test", Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn downloads_and_then_overwrites_with_warning() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pdf/1706.03762")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(vec![0x25, 0x50, 0x44, 0x46]) // %PDF
            .expect(2)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("papers");
        let paper = publication(Some(format!("{}/pdf/1706.03762", server.url())));

        let first = fetcher().fetch(&paper, &dest).await.unwrap();
        assert_eq!(first.path, dest.join("vaswani2017--Attention_Is_All_You_Need.pdf"));
        assert_eq!(first.size_bytes, 4);
        assert!(!first.overwritten);

        std::fs::write(&first.path, b"stale").unwrap();
        let second = fetcher().fetch(&paper, &dest).await.unwrap();
        assert!(second.overwritten);
        assert_eq!(std::fs::read(&second.path).unwrap(), b"%PDF");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_download_leaves_existing_file() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/pdf/1706.03762")
            .with_status(403)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("vaswani2017--Attention_Is_All_You_Need.pdf");
        std::fs::write(&existing, b"keep").unwrap();

        let paper = publication(Some(format!("{}/pdf/1706.03762", server.url())));
        let err = fetcher().fetch(&paper, dir.path()).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(std::fs::read(&existing).unwrap(), b"keep");
    }

    #[test]
    fn pdf_url_falls_back_to_arxiv() {
        let paper = publication(None);
        assert_eq!(
            PaperFetcher::pdf_url(&paper).unwrap(),
            "https://arxiv.org/pdf/1706.03762"
        );

        let mut paper = publication(None);
        paper.arxiv_id = None;
        assert!(matches!(
            PaperFetcher::pdf_url(&paper),
            Err(ScienceError::NoPdfSource(_))
        ));
    }
}
