//! Error types for the load driver

use skyward_client::ClientError;
use thiserror::Error;

/// Why a simulated user's task (or the driver itself) failed
#[derive(Debug, Error)]
pub enum LoadError {
    /// Load options are invalid
    #[error("Invalid load configuration: {0}")]
    Config(String),

    /// The client failed: transport, TLS, or a rejected login
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A task ran before the user logged in
    #[error("Simulated user has no session; login must succeed first")]
    NoSession,

    /// The server answered with a status the task does not accept
    #[error("{task}: expected status {expected}, got {actual}")]
    UnexpectedStatus {
        /// Task name
        task: &'static str,
        /// Status the task requires
        expected: u16,
        /// Status the server returned
        actual: u16,
    },

    /// A successful response lacked a field the task needs
    #[error("{task}: {detail}")]
    MissingField {
        /// Task name
        task: &'static str,
        /// What was missing
        detail: String,
    },

    /// The Prometheus exporter could not be installed
    #[error("Failed to install metrics exporter: {0}")]
    Metrics(String),
}
