//! DocHub science: reference classification, metadata resolution against
//! arXiv, Semantic Scholar and CrossRef, citation keys, BibTeX and notes
//! formatting, PDF download.

pub mod arxiv;
pub mod citations;
pub mod config;
pub mod download;
pub mod error;
pub mod formats;
pub mod http;
pub mod identifiers;
pub mod naming;
pub mod resolver;
pub mod sources;

pub use citations::{CitationCounter, CitationReport};
pub use config::ScienceConfig;
pub use download::{DownloadOutcome, PaperFetcher};
pub use error::{Result, ScienceError};
pub use formats::Citable;
pub use identifiers::Reference;
pub use resolver::Resolver;
