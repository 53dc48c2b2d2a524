//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
///
/// All of these surface at construction time; once a tracker exists its
/// configuration can no longer fail.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid pattern for '{field}': {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}
