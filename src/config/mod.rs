//! Tracker configuration.
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. Environment variables (`REQTRACK_*`)
//! 2. Configuration file (TOML)
//! 3. Default values
//!
//! # Example
//!
//! ```rust
//! use reqtrack::config::TrackerConfig;
//!
//! // Load defaults
//! let config = TrackerConfig::default();
//! assert!(config.enabled);
//! assert_eq!(config.body_max_length, 8192);
//!
//! // Parse from TOML
//! let toml = r#"
//! exclude_url = "^/health"
//! body_max_length = 1024
//! "#;
//! let config: TrackerConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.exclude_url.as_deref(), Some("^/health"));
//! ```

pub mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default content-type gate: JSON and form-urlencoded payloads.
pub const DEFAULT_BODY_CONTENT_TYPE: &str = r".*?/(json|x-www-form-urlencoded)";

/// Tracker configuration, constructed once at process start and read-only
/// thereafter.
///
/// Pattern fields are kept as raw strings here; [`crate::RequestTracker`]
/// compiles each of them exactly once at construction. No pattern is ever
/// compiled per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Master on/off switch. When false, no request is ever tracked and no
    /// pattern is evaluated.
    pub enabled: bool,
    /// Truncation bound for logged header names.
    pub header_name_max_length: usize,
    /// Truncation bound for logged header values.
    pub header_value_max_length: usize,
    /// Truncation bound for the captured request body.
    pub body_max_length: usize,
    /// Truncation bound for the logged URL (scheme, host, path, query).
    pub url_max_length: usize,
    /// Path+query to not track (case-insensitive regex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_url: Option<String>,
    /// Path+query to track even when excluded (case-insensitive regex).
    ///
    /// To track only a specific path, set `exclude_url = "^/"` and
    /// `include_url = "^/path-to-track"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_url: Option<String>,
    /// HTTP method to not track (case-insensitive regex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_method: Option<String>,
    /// HTTP method to track even when excluded (case-insensitive regex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_method: Option<String>,
    /// Body capture is enabled only for content types matching this pattern.
    pub body_content_type: String,
    /// Paths for which body capture is disabled even when the content type
    /// matches (case-insensitive regex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_exclude_url: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            header_name_max_length: 256,
            header_value_max_length: 4096,
            body_max_length: 8192,
            url_max_length: 2083,
            exclude_url: None,
            include_url: None,
            exclude_method: None,
            include_method: None,
            body_content_type: DEFAULT_BODY_CONTENT_TYPE.to_string(),
            body_exclude_url: None,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file.
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supports REQTRACK_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(enabled) = std::env::var("REQTRACK_ENABLED") {
            if let Ok(value) = enabled.parse() {
                self.enabled = value;
            }
        }
        if let Ok(value) = std::env::var("REQTRACK_BODY_MAX_LENGTH") {
            if let Ok(length) = value.parse() {
                self.body_max_length = length;
            }
        }
        if let Ok(pattern) = std::env::var("REQTRACK_EXCLUDE_URL") {
            self.exclude_url = Some(pattern);
        }
        if let Ok(pattern) = std::env::var("REQTRACK_INCLUDE_URL") {
            self.include_url = Some(pattern);
        }
        if let Ok(pattern) = std::env::var("REQTRACK_EXCLUDE_METHOD") {
            self.exclude_method = Some(pattern);
        }
        if let Ok(pattern) = std::env::var("REQTRACK_INCLUDE_METHOD") {
            self.include_method = Some(pattern);
        }

        self
    }
}
