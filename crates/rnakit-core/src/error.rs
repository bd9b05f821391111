use crate::core::io::config::ConfigError;
use crate::core::io::error::{CapabilityError, FormatError};
use crate::core::models::error::ValidationError;
use crate::db::FetchError;
use thiserror::Error;

/// Any failure surfaced by the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid model: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed input: {0}")]
    Format(#[from] FormatError),

    #[error("Unsupported output: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Retrieval failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
