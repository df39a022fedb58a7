//! Errors raised while loading the inventory or configuration.
//!
//! Any of these aborts a run before the audit starts; the audit itself
//! reports problems as findings and never fails.

use thiserror::Error;

/// Result type alias for input loading.
pub type InputResult<T> = Result<T, InputError>;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid inventory snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("security group {0} is referenced but not present in the inventory")]
    UnknownSecurityGroup(String),
}
