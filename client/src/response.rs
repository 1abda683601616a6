//! Raw HTTP outcomes returned by scenario operations

use crate::error::{ApiError, ClientError, Result};
use crate::types::FieldError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Status code plus parsed body of one API call
///
/// The body is `Value::Null` when the server sent nothing (e.g. 204), and a
/// JSON string when the server sent something that is not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Value,
}

impl ApiResponse {
    /// Build a response from its parts
    #[must_use]
    pub const fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Drain a `reqwest` response into an `ApiResponse`
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let text = response.text().await?;
        Ok(Self::new(status, parse_body(&text)))
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Parsed response body
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `error` field of an error object body, if any
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// The body decoded as a field-error list, order preserved
    ///
    /// Returns `None` if the body is not a list of field errors.
    #[must_use]
    pub fn field_errors(&self) -> Option<Vec<FieldError>> {
        if !self.body.is_array() {
            return None;
        }
        serde_json::from_value(self.body.clone()).ok()
    }

    /// Decode the body into a typed value
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ResponseParse` if the body does not match `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| ClientError::ResponseParse(format!("status {}: {e}", self.status)))
    }

    /// Classify the outcome
    ///
    /// A 2xx response is decoded into `T` (use `()` or `Value` when the body
    /// is empty or irrelevant). Anything else becomes an [`ApiError`] that
    /// carries the server's payload unchanged.
    ///
    /// # Errors
    ///
    /// The outer `ClientError` reports a 2xx body that cannot be decoded; the
    /// inner `ApiError` reports a non-2xx status.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<std::result::Result<T, ApiError>> {
        if self.is_success() {
            return self.json().map(Ok);
        }

        let message = self.error_message().unwrap_or_default().to_string();
        let err = match self.status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message },
            StatusCode::CONFLICT => ApiError::Conflict { message },
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            StatusCode::BAD_REQUEST => match self.field_errors() {
                Some(errors) => ApiError::Validation(errors),
                None => ApiError::Unexpected {
                    status: self.status.as_u16(),
                    body: self.body,
                },
            },
            status => ApiError::Unexpected {
                status: status.as_u16(),
                body: self.body,
            },
        };
        Ok(Err(err))
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
