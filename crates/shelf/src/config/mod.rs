use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cost::DEFAULT_CHARS_PER_TOKEN;
use crate::error::{Result, ShelfError};
use crate::shelf::{DEFAULT_CAPACITY, DEFAULT_PREVIEW_CHARS, Tier};

/// Main configuration structure for a shelf session
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Shelf capacity and size estimation
    #[serde(default)]
    pub shelf: ShelfConfig,
    /// Session-level recovery policy
    #[serde(default)]
    pub session: SessionConfig,
}

/// Shelf capacity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfConfig {
    /// Capacity in approximate tokens
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Characters kept per entry when a tier is compressed
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Characters per approximate token
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            preview_chars: default_preview_chars(),
            chars_per_token: default_chars_per_token(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

fn default_chars_per_token() -> usize {
    DEFAULT_CHARS_PER_TOKEN
}

/// Compression and retry policy for [`crate::session::ContextSession`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Utilization ratio at which the session compresses `auto_compress_tier`
    #[serde(default = "default_auto_compress_at")]
    pub auto_compress_at: f64,
    /// Tier compressed on auto-compress and before a store retry
    #[serde(default = "default_auto_compress_tier")]
    pub auto_compress_tier: Tier,
    /// Compress and retry once when a store hits the capacity limit
    #[serde(default = "default_retry_after_compress")]
    pub retry_after_compress: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_compress_at: default_auto_compress_at(),
            auto_compress_tier: default_auto_compress_tier(),
            retry_after_compress: default_retry_after_compress(),
        }
    }
}

fn default_auto_compress_at() -> f64 {
    0.85
}

fn default_auto_compress_tier() -> Tier {
    Tier::Cold
}

fn default_retry_after_compress() -> bool {
    true
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ShelfError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShelfError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if given, otherwise from the first default location
    /// that exists, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                tracing::info!("Loading config from: {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Default config locations, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::home_dir().map(|h| h.join(".shelf").join("config.toml")),
            dirs::config_dir().map(|c| c.join("shelf").join("config.toml")),
            Some(PathBuf::from("config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.shelf.capacity == 0 {
            return Err(ShelfError::Config(
                "shelf.capacity must be greater than 0".to_string(),
            ));
        }
        if self.shelf.chars_per_token == 0 {
            return Err(ShelfError::Config(
                "shelf.chars_per_token must be greater than 0".to_string(),
            ));
        }
        let at = self.session.auto_compress_at;
        if !(at > 0.0 && at <= 1.0) {
            return Err(ShelfError::Config(format!(
                "session.auto_compress_at must be in (0, 1], got {at}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.shelf.capacity, 200_000);
        assert_eq!(config.shelf.preview_chars, 200);
        assert_eq!(config.shelf.chars_per_token, 4);
        assert_eq!(config.session.auto_compress_at, 0.85);
        assert_eq!(config.session.auto_compress_tier, Tier::Cold);
        assert!(config.session.retry_after_compress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.shelf.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(
            r#"
            [shelf]
            capacity = 5000

            [session]
            auto_compress_tier = "warm"
            "#,
        )
        .unwrap();

        assert_eq!(config.shelf.capacity, 5000);
        assert_eq!(config.shelf.preview_chars, 200);
        assert_eq!(config.session.auto_compress_tier, Tier::Warm);
        assert_eq!(config.session.auto_compress_at, 0.85);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for doc in [
            "[shelf]\ncapacity = 0",
            "[shelf]\nchars_per_token = 0",
            "[session]\nauto_compress_at = 0.0",
            "[session]\nauto_compress_at = 1.5",
        ] {
            let err = Config::from_toml_str(doc).unwrap_err();
            assert!(matches!(err, ShelfError::Config(_)), "accepted: {doc}");
        }
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let err = Config::from_toml_str("[session]\nauto_compress_tier = \"tepid\"").unwrap_err();
        assert!(matches!(err, ShelfError::Config(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[shelf]\ncapacity = 1234").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.shelf.capacity, 1234);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ShelfError::Config(_)));
    }
}
