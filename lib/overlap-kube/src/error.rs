use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of a single API call. None of these are retried by the client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Bad status code: {} ({})", .status.as_u16(), .body)]
    Api { status: StatusCode, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl ClientError {
    /// HTTP status of an `Api` error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Credential or trust material could not be turned into a working client
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CA certificate: {0}")]
    InvalidCaCertificate(String),

    #[error("Bearer token is empty")]
    EmptyToken,

    #[error("Bearer token is not a valid header value: {0}")]
    InvalidToken(String),

    #[error("Invalid API endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
