//! DocHub core: the canonical publication record, configuration and the
//! plain files that make up a local literature library.

pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::{AppConfig, LibraryConfig, SourcesConfig};
pub use error::{DocHubError, ExitCode, Result};
pub use models::*;
