// Application state module
// Everything a request handler needs, built once from the configuration

use std::path::PathBuf;

use super::types::Config;
use crate::logger::{self, AccessLogFormat};
use crate::store::DocumentRegistry;
use crate::upload::UploadHandler;

/// Application state
pub struct AppState {
    pub config: Config,
    pub documents: DocumentRegistry,
    pub video_uploads: UploadHandler,
    pub audio_uploads: UploadHandler,
    /// Directory served for paths no other route claims
    pub public_dir: PathBuf,
    /// (URL prefix, directory), longest prefix first
    pub static_mounts: Vec<(String, PathBuf)>,
    pub access_log_format: AccessLogFormat,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let root = config.storage_root();

        let mut static_mounts: Vec<(String, PathBuf)> = config
            .static_mounts
            .iter()
            .map(|(prefix, dir)| (prefix.trim_end_matches('/').to_string(), root.join(dir)))
            .filter(|(prefix, _)| !prefix.is_empty())
            .collect();
        static_mounts.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let access_log_format = config
            .logging
            .access_log_format
            .parse()
            .unwrap_or_else(|e| {
                logger::log_warning(&format!("{e}, falling back to combined"));
                AccessLogFormat::Combined
            });

        Self {
            documents: DocumentRegistry::new(&root),
            video_uploads: UploadHandler::from_config(&root, &config.uploads.video),
            audio_uploads: UploadHandler::from_config(&root, &config.uploads.audio),
            public_dir: root.join(&config.storage.public_dir),
            static_mounts,
            access_log_format,
            config: config.clone(),
        }
    }

    /// Create the storage layout and seed default documents.
    ///
    /// Idempotent; run once before the listener accepts connections.
    pub async fn ensure_storage_ready(&self) -> Result<(), Box<dyn std::error::Error>> {
        let root = self.config.storage_root();
        tokio::fs::create_dir_all(&root).await?;

        let seeded = self.documents.ensure_ready().await?;
        self.video_uploads.ensure_dir().await?;
        self.audio_uploads.ensure_dir().await?;

        logger::log_storage_ready(&root, &seeded);
        Ok(())
    }
}
