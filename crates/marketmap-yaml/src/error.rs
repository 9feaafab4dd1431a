//! Error types for snapshot and settings loading.

use std::fmt;
use std::path::PathBuf;

/// Error type for loading snapshots and settings.
#[derive(Debug)]
pub enum ParseError {
    /// YAML parsing error
    Yaml(serde_yaml_ng::Error),
    /// JSON parsing error
    Json(serde_json::Error),
    /// File could not be read
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// File extension is not one we know how to parse
    UnsupportedFormat(String),
    /// Validation error
    Validation(String),
    /// Invalid value
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml(e) => write!(f, "YAML error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Io { path, source } => write!(f, "Cannot read {}: {source}", path.display()),
            Self::UnsupportedFormat(ext) => {
                write!(f, "Unsupported file format '{ext}' (expected .yaml, .yml or .json)")
            }
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Yaml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_yaml_ng::Error> for ParseError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
