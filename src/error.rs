//! Typed failure kinds for the fetch and batch stages.
//!
//! Absent review fields are not errors: they are resolved to the `N/A` sentinel
//! during extraction and never surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    /// Bad or missing credentials, or the login call itself failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network or API-side failure while resolving the venue or listing submissions.
    #[error("remote query failed: {0}")]
    RemoteQuery(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EtlError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io { path: path.into(), source }
    }

    /// True for the failure kinds that originate at the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(self, EtlError::Auth(_) | EtlError::RemoteQuery(_))
    }
}
