use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

pub type UploadResult<T> = Result<T, UploadError>;

/// Errors produced while accepting an uploaded media file.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only {media} files are allowed! (got {declared})")]
    UnsupportedMediaType { media: String, declared: String },

    #[error("File is too large. Maximum size is {} MB.", limit / (1024 * 1024))]
    PayloadTooLarge { limit: u64 },

    #[error("File was not uploaded")]
    MissingFile,

    #[error("Unexpected field: {0}")]
    UnexpectedField(String),

    #[error("Invalid file name: {0:?}")]
    InvalidFilename(String),

    #[error("Request is not multipart/form-data: {0}")]
    NotMultipart(#[source] multer::Error),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[source] multer::Error),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<multer::Error> for UploadError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::FieldSizeExceeded { limit, .. }
            | multer::Error::StreamSizeExceeded { limit } => Self::PayloadTooLarge { limit },
            other => Self::Multipart(other),
        }
    }
}

impl UploadError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message handed back to the client; filesystem details stay in the log
    pub fn public_message(&self) -> String {
        match self {
            Self::UnsupportedMediaType { media, .. } => format!("Only {media} files are allowed!"),
            Self::Io { .. } => "Error uploading file".to_string(),
            other => other.to_string(),
        }
    }
}
