// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use config::builder::DefaultState;
use config::ConfigBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;

pub use state::AppState;
pub use types::{Config, UploadConfig};

/// Port used when neither the config file nor `PORT` sets one
pub const DEFAULT_PORT: u16 = 3002;

impl Config {
    /// Load configuration from specified file path (extension optional).
    ///
    /// Sources, lowest priority first: built-in defaults, the config file,
    /// `TOURNEY_*` environment variables (`__` separates sections), and the
    /// bare `PORT` variable.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("TOURNEY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        settings.try_deserialize()
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 300)?
            .set_default("performance.write_timeout", 300)?
            .set_default("http.server_name", "tourney-admin")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_json_body_size", 52_428_800)? // 50MB
            .set_default("storage.root", ".")?
            .set_default("storage.public_dir", "public")?
            .set_default("storage.landing_page", "buttons.html")?
            .set_default("uploads.video.dir", "videos")?
            .set_default("uploads.video.field", "video")?
            .set_default("uploads.video.mime_prefix", "video/")?
            .set_default("uploads.video.max_size", 524_288_000)? // 500MB
            .set_default("uploads.video.public_prefix", "/videos")?
            .set_default("uploads.audio.dir", "musics")?
            .set_default("uploads.audio.field", "audio")?
            .set_default("uploads.audio.mime_prefix", "audio/")?
            .set_default("uploads.audio.max_size", 52_428_800)? // 50MB
            .set_default("uploads.audio.public_prefix", "/musics")
    }

    /// Defaults only, rooted at `root`; no file or environment sources
    #[cfg(test)]
    pub fn for_root(root: &std::path::Path) -> Self {
        Self::with_defaults()
            .and_then(|b| b.set_override("storage.root", root.to_string_lossy().into_owned()))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .expect("default configuration must deserialize")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub fn storage_root(&self) -> PathBuf {
        PathBuf::from(&self.storage.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::for_root(std::path::Path::new("/srv/site"));
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.server.backlog, 128);
        assert_eq!(cfg.http.max_json_body_size, 50 * 1024 * 1024);
        assert_eq!(cfg.uploads.video.max_size, 500 * 1024 * 1024);
        assert_eq!(cfg.uploads.audio.max_size, 50 * 1024 * 1024);
        assert_eq!(cfg.uploads.video.field, "video");
        assert_eq!(cfg.uploads.audio.mime_prefix, "audio/");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.storage_root(), PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_default_static_mounts() {
        let cfg = Config::for_root(std::path::Path::new("."));
        let prefixes: Vec<&str> = cfg.static_mounts.keys().map(String::as_str).collect();
        assert_eq!(
            prefixes,
            vec!["/flags", "/images", "/musics", "/style", "/videos"]
        );
        assert_eq!(cfg.static_mounts["/musics"], "musics");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::for_root(std::path::Path::new("."));
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
        assert!(addr.ip().is_unspecified());
    }
}
