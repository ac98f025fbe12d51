//! Error Types
//!
//! Every failure an operation can report travels through [`OpenAiError`].

use thiserror::Error;

/// Boxed source error carried by [`OpenAiError::Generic`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for client operations
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// Failure before a response was obtained (DNS, connect, timeout, broken body stream)
    #[error("Request failed: {0}")]
    Generic(#[source] BoxError),

    /// A buffered response body did not match the expected response shape
    #[error("Failed to decode response: {source}. Body: {body}")]
    Decoding {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// Streaming request answered with a status other than 200
    #[error("Invalid status code: {}", describe_code(.code))]
    InvalidStatusCode { code: Option<u16> },

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_code(code: &Option<u16>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unavailable".to_string(),
    }
}

impl OpenAiError {
    /// Build a decoding error, keeping at most the first 500 chars of the body
    pub fn decoding(source: serde_json::Error, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body).chars().take(500).collect();
        OpenAiError::Decoding { source, body }
    }

    /// HTTP status carried by an [`OpenAiError::InvalidStatusCode`]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OpenAiError::InvalidStatusCode { code } => *code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OpenAiError {
    fn from(err: reqwest::Error) -> Self {
        OpenAiError::Generic(Box::new(err))
    }
}

impl From<std::io::Error> for OpenAiError {
    fn from(err: std::io::Error) -> Self {
        OpenAiError::Generic(Box::new(err))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, OpenAiError>;
