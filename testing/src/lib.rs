//! # Skyward Testing
//!
//! Fixtures and assertion helpers for black-box tests against a running
//! Skyward server.
//!
//! This crate provides:
//! - [`TestContext`]: an authenticated client that deletes the users a test
//!   created when the test is done
//! - Generators for fresh emails and projects
//! - Assertions on status codes, `error` messages and field-error lists
//!
//! ## Example
//!
//! ```ignore
//! use skyward_testing::{TestContext, assert_status, unique_email};
//!
//! #[tokio::test]
//! #[ignore = "requires a running Skyward server"]
//! async fn test_create_user() {
//!     let ctx = TestContext::from_env().await.unwrap();
//!     ctx.scope(|mut ctx| async move {
//!         let id = ctx.create_user(&unique_email("newuser")).await.unwrap();
//!
//!         let response = ctx.client().get_user(ctx.session(), id).await.unwrap();
//!         assert_status(&response, 200);
//!     })
//!     .await
//!     .unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use skyward_client::{ApiResponse, ClientConfig, ClientError, NewUser, Session, SkywardClient};

pub use skyward_client::generate::{random_project, unique_email};

/// Password given to users created through [`TestContext::create_user`]
pub const TEST_PASSWORD: &str = "newpassword123";

/// Display name given to users created through [`TestContext::create_user`]
pub const TEST_NAME: &str = "New User";

/// Authenticated client plus the users a test created.
///
/// Users created through [`create_user`](Self::create_user), or registered
/// with [`track`](Self::track), are deleted by [`cleanup`](Self::cleanup).
/// [`scope`](Self::scope) runs a test body and cleans up even when the body
/// panics.
#[derive(Debug)]
pub struct TestContext {
    client: SkywardClient,
    session: Session,
    created: Arc<Mutex<Vec<i64>>>,
}

impl TestContext {
    /// Load configuration from the environment and log in as the admin.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for missing variables,
    /// `ClientError::Tls` for unreadable certificates and
    /// `ClientError::Authentication` if the admin login is rejected.
    pub async fn from_env() -> Result<Self, ClientError> {
        init_tracing();
        let config = ClientConfig::from_env()?;
        Self::new(&config).await
    }

    /// Log in as the configured admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or the login fails.
    pub async fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = SkywardClient::new(config)?;
        Self::with_client(client, config).await
    }

    /// Log in through an existing client.
    ///
    /// # Errors
    ///
    /// Returns an error if the login fails.
    pub async fn with_client(
        client: SkywardClient,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let session = client.authenticate(&config.credentials).await?;
        Ok(Self {
            client,
            session,
            created: Arc::default(),
        })
    }

    /// Run `body` with this context, then delete every user it tracked.
    ///
    /// The body runs as its own task; if it panics, the tracked users are
    /// still deleted and the panic is resumed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if a cleanup request cannot be sent.
    ///
    /// # Panics
    ///
    /// Resumes the body's panic, and panics like [`cleanup`](Self::cleanup)
    /// on an unexpected delete status.
    pub async fn scope<F, Fut>(self, body: F) -> Result<(), ClientError>
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cleaner = Self {
            client: self.client.clone(),
            session: self.session.clone(),
            created: Arc::clone(&self.created),
        };
        let outcome = tokio::spawn(body(self)).await;
        let cleaned = cleaner.cleanup().await;
        match outcome {
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => tracing::warn!(error = %e, "Test body did not finish"),
            Ok(()) => {}
        }
        cleaned
    }

    /// The client
    #[must_use]
    pub const fn client(&self) -> &SkywardClient {
        &self.client
    }

    /// The current admin session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch a fresh anti-forgery token and return the updated session.
    ///
    /// # Errors
    ///
    /// Returns an error if the re-login fails.
    pub async fn refresh(&mut self) -> Result<Session, ClientError> {
        self.session = self.client.refresh(&self.session).await?;
        Ok(self.session.clone())
    }

    /// Create a user with `email`, expect 201, and track it for cleanup.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh or the request cannot be sent, and
    /// `ClientError::ResponseParse` if the body has no numeric `id`.
    ///
    /// # Panics
    ///
    /// Panics if the server does not answer 201.
    pub async fn create_user(&mut self, email: &str) -> Result<i64, ClientError> {
        let session = self.refresh().await?;
        let user = NewUser::new(email, TEST_PASSWORD, TEST_NAME);
        let response = self.client.create_user(&session, &user).await?;
        assert_status(&response, 201);

        let Some(id) = response.body()["id"].as_i64() else {
            return Err(ClientError::ResponseParse(format!(
                "created user has no numeric id: {}",
                response.body()
            )));
        };
        self.track(id);
        Ok(id)
    }

    /// Delete `id` during cleanup
    pub fn track(&mut self, id: i64) {
        let mut created = self.ids();
        if !created.contains(&id) {
            created.push(id);
        }
    }

    /// Stop tracking `id`, e.g. after the test deleted it itself
    pub fn forget(&mut self, id: i64) {
        self.ids().retain(|&tracked| tracked != id);
    }

    /// Users awaiting cleanup
    #[must_use]
    pub fn tracked(&self) -> Vec<i64> {
        self.ids().clone()
    }

    // A panicking test body must not keep its users from being deleted.
    fn ids(&self) -> MutexGuard<'_, Vec<i64>> {
        self.created.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delete every tracked user. A user that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a request cannot be sent.
    ///
    /// # Panics
    ///
    /// Panics if a delete answers anything other than 204 or 404.
    pub async fn cleanup(mut self) -> Result<(), ClientError> {
        let created = std::mem::take(&mut *self.ids());
        for id in created {
            let session = self.refresh().await?;
            let response = self.client.delete_user(&session, id).await?;
            let status = response.status().as_u16();
            assert!(
                status == 204 || status == 404,
                "cleanup of user {id} answered {status}: {}",
                response.body()
            );
            tracing::debug!(id, status, "Cleaned up test user");
        }
        Ok(())
    }
}

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyward_client=info".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Assert the response status.
///
/// # Panics
///
/// Panics with the response body if the status differs.
#[track_caller]
pub fn assert_status(response: &ApiResponse, expected: u16) {
    assert_eq!(
        response.status().as_u16(),
        expected,
        "unexpected status, body: {}",
        response.body()
    );
}

/// Assert the status and the `error` field of an error object body.
///
/// # Panics
///
/// Panics if either differs.
#[track_caller]
pub fn assert_error_message(response: &ApiResponse, expected_status: u16, expected_message: &str) {
    assert_status(response, expected_status);
    assert_eq!(
        response.error_message(),
        Some(expected_message),
        "unexpected error message, body: {}",
        response.body()
    );
}

/// Assert a 400 whose first field error matches `field` and `message`.
///
/// `field` may be the full property path or a suffix such as `.email`.
///
/// # Panics
///
/// Panics if the status is not 400, the body is not a field-error list, or
/// the first entry differs.
#[track_caller]
pub fn assert_first_field_error(response: &ApiResponse, field: &str, message: &str) {
    assert_status(response, 400);
    let errors = response.field_errors().unwrap_or_default();
    assert!(
        !errors.is_empty(),
        "expected a field-error list, body: {}",
        response.body()
    );
    if let Some(first) = errors.first() {
        assert!(
            first.field == field || first.field.ends_with(field),
            "first field error is on `{}`, expected `{field}`",
            first.field
        );
        assert_eq!(first.message, message);
    }
}
