//! Wire types for the Skyward user/project API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator-supplied login credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials from an email and password
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful `POST /auth/login`
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

/// Request body for `POST /users`
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewUser {
    /// Email address, unique across active users
    pub email: String,
    /// Account password
    pub password: String,
    /// Display name
    pub name: String,
}

impl NewUser {
    /// Create a new user request
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

/// Request body for `PUT /users/{id}`
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UpdateUser {
    /// New email address
    pub email: String,
    /// New password
    pub password: String,
    /// New display name
    pub name: String,
}

impl UpdateUser {
    /// Create an update request
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

/// A user record as returned by the server
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Server-assigned identifier
    pub id: i64,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for `POST /users/{id}/projects`
///
/// `id` is optional so that a request omitting it can be expressed; it is
/// left out of the JSON entirely when `None`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewExternalProject {
    /// Client-supplied UUID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project name, must not be empty
    pub name: String,
}

impl NewExternalProject {
    /// Create a project request with an explicit identifier
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    /// Create a project request without an identifier
    #[must_use]
    pub fn without_id(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// An external project as returned by the server
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProject {
    /// Client-supplied UUID
    pub id: String,
    /// Project name
    #[serde(default)]
    pub name: Option<String>,
    /// Owning user
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// One entry of a 400 response body
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Property path of the offending field, e.g. `createUser.newUser.email`
    pub field: String,
    /// Constraint message
    pub message: String,
    /// The rejected value, as rendered by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<String>,
}

impl FieldError {
    /// Create a field error without a rejected value
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rejected_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("user3@example.com", "secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("user3@example.com"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_project_without_id_omits_field() {
        let body = serde_json::to_value(NewExternalProject::without_id("")).unwrap();
        assert_eq!(body, json!({ "name": "" }));
    }

    #[test]
    fn test_field_error_accepts_rejected_value() {
        let err: FieldError = serde_json::from_value(json!({
            "field": "createUser.newUser.email",
            "message": "must be a well-formed email address",
            "rejectedValue": "newuser22example.com"
        }))
        .unwrap();
        assert_eq!(err.rejected_value.as_deref(), Some("newuser22example.com"));
    }

    #[test]
    fn test_project_ignores_unknown_fields() {
        let project: ExternalProject = serde_json::from_value(json!({
            "id": "5b0c",
            "name": "New ABC",
            "userId": 7,
            "createdAt": "2024-06-01"
        }))
        .unwrap();
        assert_eq!(project.user_id, Some(7));
    }
}
