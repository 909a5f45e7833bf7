//! Connector error types.
//!
//! This module defines the error types that can occur while talking to an
//! OpenSearch cluster through the connector.

use thiserror::Error;

/// Errors that can occur during connector operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// The cluster could not be reached (refused, DNS, TLS, timeout).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Credentials were missing or rejected by the cluster.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// A required argument was missing or malformed. Raised before any request is sent.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The index or document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The cluster rejected the request.
    #[error("Request failed with status {status}: {message}")]
    RequestError { status: u16, message: String },

    /// Failed to parse a response from the cluster.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ConnectorError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a request error from a response status and body.
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::RequestError {
            status,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether this error means the cluster was unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }

    /// HTTP status behind this error, when the cluster answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestError { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}
