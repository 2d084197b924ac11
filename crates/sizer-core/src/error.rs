//! Error types for loading policy and input documents.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sizer operations.
pub type SizingResult<T> = Result<T, SizingError>;

/// Errors raised outside the sizing core: unreadable files, malformed
/// documents and invalid policy values. The core itself never fails.
#[derive(Debug, Error)]
pub enum SizingError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to render policy config: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    #[error("invalid input document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("invalid policy value for {field}: {reason}")]
    InvalidPolicy { field: &'static str, reason: String },
}
