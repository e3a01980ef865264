//! Media upload handling
//!
//! An [`UploadHandler`] takes one file part from a `multipart/form-data`
//! body, checks its declared media type and size, and stores it under a
//! sanitized name in its destination directory. Rejected uploads leave the
//! directory untouched: bytes are staged in a hidden temp file that is only
//! renamed into place once the whole part has been accepted.

mod error;
mod sanitize;

use multer::{Field, Multipart};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::UploadConfig;
use crate::store::atomic;

pub use error::{UploadError, UploadResult};
pub use sanitize::{is_storable, sanitize_filename};

/// Metadata describing a stored upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    pub filename: String,
    /// Public URL path of the stored file
    pub path: String,
    pub size: u64,
}

#[derive(Debug)]
pub struct UploadHandler {
    dir: PathBuf,
    field: String,
    mime_prefix: String,
    max_size: u64,
    public_prefix: String,
}

impl UploadHandler {
    pub fn from_config(root: &Path, config: &UploadConfig) -> Self {
        Self {
            dir: root.join(&config.dir),
            field: config.field.clone(),
            mime_prefix: config.mime_prefix.to_ascii_lowercase(),
            max_size: config.max_size,
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub const fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Create the destination directory. Idempotent.
    pub async fn ensure_dir(&self) -> UploadResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| UploadError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    /// Consume the multipart body and store the single expected file part.
    ///
    /// Parts without a filename are form fields and are skipped. A file part
    /// under any other field name, or a second file under the expected name,
    /// fails the whole upload.
    pub async fn accept(&self, mut multipart: Multipart<'_>) -> UploadResult<StoredUpload> {
        let mut stored: Option<StoredUpload> = None;

        while let Some(field) = multipart.next_field().await? {
            let Some(original_name) = field.file_name().map(ToString::to_string) else {
                continue;
            };

            let field_name = field.name().unwrap_or_default().to_string();
            if field_name != self.field || stored.is_some() {
                // A stored file from an earlier part stays on disk, like any
                // other completed upload.
                return Err(UploadError::UnexpectedField(field_name));
            }

            let declared = field
                .content_type()
                .map_or_else(|| "application/octet-stream".to_string(), |m| m.essence_str().to_string());
            self.check_media_type(&declared)?;

            stored = Some(self.store_field(field, &original_name).await?);
        }

        stored.ok_or(UploadError::MissingFile)
    }

    fn check_media_type(&self, declared: &str) -> UploadResult<()> {
        if declared.to_ascii_lowercase().starts_with(&self.mime_prefix) {
            Ok(())
        } else {
            Err(UploadError::UnsupportedMediaType {
                media: self.mime_prefix.trim_end_matches('/').to_string(),
                declared: declared.to_string(),
            })
        }
    }

    async fn store_field(
        &self,
        mut field: Field<'_>,
        original_name: &str,
    ) -> UploadResult<StoredUpload> {
        let filename = sanitize_filename(original_name);
        if !is_storable(&filename) {
            return Err(UploadError::InvalidFilename(original_name.to_string()));
        }

        self.ensure_dir().await?;
        let target = self.dir.join(&filename);
        let staging = atomic::temp_sibling(&target);

        let result = async {
            let size = self.stream_to(&mut field, &staging).await?;
            fs::rename(&staging, &target)
                .await
                .map_err(|source| UploadError::Io {
                    path: target.clone(),
                    source,
                })?;
            Ok(size)
        }
        .await;

        match result {
            Ok(size) => Ok(StoredUpload {
                path: format!("{}/{filename}", self.public_prefix),
                filename,
                size,
            }),
            Err(e) => {
                let _ = fs::remove_file(&staging).await;
                Err(e)
            }
        }
    }

    async fn stream_to(&self, field: &mut Field<'_>, staging: &Path) -> UploadResult<u64> {
        let io_err = |source| UploadError::Io {
            path: staging.to_path_buf(),
            source,
        };

        let mut file = fs::File::create(staging).await.map_err(io_err)?;
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await? {
            size = size.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
            if size > self.max_size {
                return Err(UploadError::PayloadTooLarge {
                    limit: self.max_size,
                });
            }
            file.write_all(&chunk).await.map_err(io_err)?;
        }

        file.sync_all().await.map_err(io_err)?;
        Ok(size)
    }
}
