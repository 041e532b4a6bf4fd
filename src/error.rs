//! Error types for authprobe

use thiserror::Error;

/// Main error type for authprobe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing local state: {0}")]
    MissingState(String),

    #[error("Unexpected API response: {0}")]
    Api(String),
}

/// Result type alias for authprobe operations
pub type Result<T> = std::result::Result<T, ProbeError>;
