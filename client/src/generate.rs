//! Generators for fresh request payloads
//!
//! Emails must be unique among active users and project identifiers are
//! client-chosen UUIDs, so every call produces new values.

use crate::types::NewExternalProject;
use uuid::Uuid;

/// `<prefix>_<uuid>@example.com`
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}_{}@example.com", Uuid::new_v4())
}

/// Project with a fresh UUID and a name like `New 3F2B8C1E6A4D...`
#[must_use]
pub fn random_project() -> NewExternalProject {
    let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
    NewExternalProject::new(Uuid::new_v4().to_string(), format!("New {suffix}"))
}
