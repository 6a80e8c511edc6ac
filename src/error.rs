//! Error types for schema loading and configuration

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while loading a schema document or configuration.
///
/// Resolution itself never fails: shapes outside the supported subset
/// produce empty fields rather than errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Bundled schema asset not found: {0}")]
    AssetMissing(String),

    #[error("Invalid schema document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
