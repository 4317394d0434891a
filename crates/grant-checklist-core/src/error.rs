//! Error types for backend calls and configuration

use reqwest::StatusCode;

/// Errors that can occur while talking to the grant backend
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body could not be decoded
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The chat response decoded but carried no reply text
    #[error("chat response did not include a reply")]
    MissingReply,

    /// A configured base URL or path could not be joined into a URL
    #[error("invalid endpoint URL '{0}'")]
    InvalidUrl(String),
}

/// Errors that can occur while loading or saving the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
