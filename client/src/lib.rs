//! # Skyward API Client
//!
//! Rust client for the Skyward user/project management API, built for
//! black-box testing and load generation against a running server.
//!
//! ## Example
//!
//! ```no_run
//! use skyward_client::{ClientConfig, NewUser, SkywardClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let client = SkywardClient::new(&config)?;
//!
//!     // Log in as the configured admin
//!     let session = client.authenticate(&config.credentials).await?;
//!
//!     // Create a user and inspect the raw outcome
//!     let user = NewUser::new("newuser22@example.com", "newpassword123", "New User 2");
//!     let response = client.create_user(&session, &user).await?;
//!
//!     println!("{} {}", response.status(), response.body());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Login with bearer and anti-forgery tokens, refreshable per call
//! - User CRUD and external-project operations returning raw outcomes
//! - Classification of error responses (validation, conflict, not found)
//! - Client-certificate authentication and optional server verification

pub mod client;
pub mod config;
pub mod error;
pub mod generate;
pub mod response;
pub mod session;
pub mod types;
mod users;

// Re-export main types for convenience
pub use client::SkywardClient;
pub use config::{ClientConfig, Environment, TlsConfig};
pub use error::{ApiError, ClientError};
pub use response::ApiResponse;
pub use session::{Session, XSRF_HEADER};
pub use types::{
    Credentials, ExternalProject, FieldError, NewExternalProject, NewUser, UpdateUser, User,
};
