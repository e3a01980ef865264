// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub uploads: UploadsConfig,
    /// URL prefix -> directory (relative to the storage root)
    #[serde(default = "default_static_mounts")]
    pub static_mounts: BTreeMap<String, String>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_backlog")]
    pub backlog: u32,
}

const fn default_backlog() -> u32 {
    128
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds; the connection timeout is the larger of read/write, 0 disables it
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_json_body_size: u64,
}

/// On-disk layout
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding documents, uploads and static content
    pub root: String,
    /// Directory served at `/` (relative to root)
    pub public_dir: String,
    /// File inside `public_dir` answered for `GET /`
    pub landing_page: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub video: UploadConfig,
    pub audio: UploadConfig,
}

/// One media upload endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Destination directory (relative to root)
    pub dir: String,
    /// Multipart field carrying the file
    pub field: String,
    /// Accepted declared content-type prefix, e.g. `video/`
    pub mime_prefix: String,
    /// Maximum file size in bytes
    pub max_size: u64,
    /// URL prefix under which stored files are served
    pub public_prefix: String,
}

fn default_static_mounts() -> BTreeMap<String, String> {
    ["flags", "images", "videos", "style", "musics"]
        .into_iter()
        .map(|dir| (format!("/{dir}"), dir.to_string()))
        .collect()
}
