use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Five megabytes, the request-level cap on uploaded images.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Application configuration loaded from environment variables.
/// Every variable has a default, so a bare `cargo run` serves from `./static`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub static_dir: PathBuf,
    pub upload: UploadConfig,
}

/// Settings injected into the upload resolver.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded images are written to.
    pub dir: PathBuf,
    /// Public path the directory is reachable under, without trailing slash.
    pub public_prefix: String,
    pub max_bytes: usize,
    /// Lowercased extensions, without the leading dot.
    pub allowed_extensions: BTreeSet<String>,
}

impl UploadConfig {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: parse_extensions(&DEFAULT_ALLOWED_EXTENSIONS.join(",")),
        }
    }

    pub fn allows_extension(&self, ext: &str) -> bool {
        self.allowed_extensions.contains(&ext.to_ascii_lowercase())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let static_dir = PathBuf::from(env_or("STATIC_DIR", "static"));
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| static_dir.join("uploads"));

        let public_prefix = env_or("UPLOAD_URL_PREFIX", "/static/uploads");
        let mut upload = UploadConfig::new(upload_dir, &public_prefix);
        if let Ok(raw) = std::env::var("MAX_UPLOAD_BYTES") {
            upload.max_bytes = raw
                .trim()
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?;
        }
        if let Ok(raw) = std::env::var("ALLOWED_EXTENSIONS") {
            upload.allowed_extensions = parse_extensions(&raw);
            anyhow::ensure!(
                !upload.allowed_extensions.is_empty(),
                "ALLOWED_EXTENSIONS must list at least one extension"
            );
        }

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            static_dir,
            upload,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses a comma list such as `"PNG, .jpg,jpeg"` into lowercased bare extensions.
fn parse_extensions(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extensions_normalizes_case_and_dots() {
        let exts = parse_extensions("PNG, .jpg,,jpeg ");
        assert_eq!(
            exts.into_iter().collect::<Vec<_>>(),
            vec!["jpeg", "jpg", "png"]
        );
    }

    #[test]
    fn test_upload_config_defaults() {
        let cfg = UploadConfig::new("/tmp/uploads", "/static/uploads/");
        assert_eq!(cfg.public_prefix, "/static/uploads");
        assert_eq!(cfg.max_bytes, 5 * 1024 * 1024);
        assert!(cfg.allows_extension("WEBP"));
        assert!(cfg.allows_extension("gif"));
        assert!(!cfg.allows_extension("exe"));
    }
}
