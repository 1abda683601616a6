//! Error types for the Skyward API client

use crate::types::FieldError;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of the client itself.
///
/// A response the server did send, whatever its status, is not a
/// `ClientError`: scenario operations hand it back as an
/// [`ApiResponse`](crate::ApiResponse). The one exception is login, where a
/// rejected attempt means there is no session to continue with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration is missing or invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Client certificate or private key could not be loaded
    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// Network or TLS failure while talking to the server
    #[error("Request failed: {0}")]
    Transport(String),

    /// A successful response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParse(String),

    /// Login was rejected by the server
    #[error("Authentication failed (status {status}): {message}")]
    Authentication {
        /// HTTP status code
        status: u16,
        /// Error message from the server
        message: String,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Classification of a non-2xx API response.
///
/// Produced by [`ApiResponse::into_result`](crate::ApiResponse::into_result).
/// Every variant keeps the server's payload verbatim so callers can assert
/// against the exact strings.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// 401: bad or expired credentials
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message from the server
        message: String,
    },

    /// 400: the request failed input validation
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// 409: the resource conflicts with an existing one (duplicate email)
    #[error("Conflict: {message}")]
    Conflict {
        /// Error message from the server
        message: String,
    },

    /// 404: the user or project does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Error message from the server
        message: String,
    },

    /// Any other status the contract does not name
    #[error("Unexpected response (status {status}): {body}")]
    Unexpected {
        /// HTTP status code
        status: u16,
        /// Parsed response body
        body: Value,
    },
}

impl ApiError {
    /// HTTP status code this error was classified from.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::Validation(_) => 400,
            Self::Conflict { .. } => 409,
            Self::NotFound { .. } => 404,
            Self::Unexpected { status, .. } => *status,
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_display_keeps_order() {
        let err = ApiError::Validation(vec![
            FieldError::new("createUser.newUser.email", "must be a well-formed email address"),
            FieldError::new("createUser.newUser.name", "must not be blank"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: createUser.newUser.email: must be a well-formed email address; \
             createUser.newUser.name: must not be blank"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound { message: "Not Found".into() }.status(), 404);
        assert_eq!(ApiError::Conflict { message: String::new() }.status(), 409);
        assert_eq!(
            ApiError::Unexpected { status: 417, body: json!("boom") }.status(),
            417
        );
    }

    #[test]
    fn test_authentication_display() {
        let err = ClientError::Authentication {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "Authentication failed (status 401): Unauthorized");
    }
}
