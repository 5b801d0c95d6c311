//! Error types for the Trello CLI
//!
//! Each concern has its own error enum. None of these ever reach standard
//! output directly: resource operations and the dispatcher turn them into
//! failure envelopes carrying a stable [`ErrorCode`](crate::app::ErrorCode).

use std::path::PathBuf;
use thiserror::Error;

/// Outcome of talking to the Trello API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, connect, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request URL could not be built from the configured base URL
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Local file access failed while preparing a request
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Builds a status error, falling back to the canonical reason when the
    /// body is empty
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown status")
                .to_string()
        } else {
            body.to_string()
        };
        Self::Status { status, message }
    }

    /// HTTP status of the failure, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        // The request URL carries the key and token as query parameters
        let error = error.without_url();
        match error.status() {
            Some(status) => ApiError::status(status.as_u16(), &error.to_string()),
            None => ApiError::Transport(error.to_string()),
        }
    }
}

/// Credential resolution and storage errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Neither the credential file nor the environment supplied a key and token
    #[error(
        "Missing Trello credentials. Run 'trello-cli set-auth <api-key> <token>' or set TRELLO_API_KEY and TRELLO_TOKEN"
    )]
    MissingCredentials,

    /// No home directory to anchor the credential file
    #[error("Could not determine the home directory for credential storage")]
    NoHomeDirectory,

    /// Reading, writing or deleting the credential file failed
    #[error("Credential file error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credential file could not be encoded or decoded
    #[error("Credential file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file exists but could not be read
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid settings format
    #[error("Invalid settings file {path}: {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting parsed but holds an unusable value
    #[error("Invalid setting for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    /// Trello API error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Credential error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Settings error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Api(_) => "api",
            AppError::Auth(_) => "authentication",
            AppError::Config(_) => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// API result type alias
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Settings result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
