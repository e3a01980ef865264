use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

use super::kind::DocumentKind;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document '{kind}' has not been written yet ({})", path.display())]
    NotFound { kind: DocumentKind, path: PathBuf },

    #[error("document '{kind}' on disk is not valid JSON: {source}")]
    Parse {
        kind: DocumentKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document '{kind}': {source}")]
    Encode {
        kind: DocumentKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Parse { .. } | Self::Encode { .. } | Self::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short message safe to hand back to the client
    pub const fn public_message(&self, writing: bool) -> &'static str {
        match self {
            Self::NotFound { .. } => "Data not found",
            _ if writing => "Error saving data",
            _ => "Error reading data",
        }
    }
}
