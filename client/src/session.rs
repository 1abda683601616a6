//! Authenticated session manager
//!
//! Login yields a bearer token (JSON body) and an anti-forgery token
//! (`X-XSRF-TOKEN` response header). The server rotates the anti-forgery
//! token often, so callers refresh before mutating requests.

use crate::{
    client::SkywardClient,
    error::{ClientError, Result},
    types::{Credentials, LoginResponse},
};
use reqwest::{RequestBuilder, StatusCode, header::AUTHORIZATION};
use std::fmt;

/// Header carrying the anti-forgery token, both on login responses and on
/// outgoing requests.
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Tokens from the most recent successful login
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    csrf_token: Option<String>,
    credentials: Credentials,
}

impl Session {
    /// Assemble a session from its parts
    #[must_use]
    pub const fn new(token: String, csrf_token: Option<String>, credentials: Credentials) -> Self {
        Self {
            token,
            csrf_token,
            credentials,
        }
    }

    /// Bearer token
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Anti-forgery token, absent if the server did not send one
    #[must_use]
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Credentials this session was obtained with
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Attach `Authorization` and, if known, `X-XSRF-TOKEN` to a request
    #[must_use]
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(AUTHORIZATION, format!("Bearer {}", self.token));
        match &self.csrf_token {
            Some(csrf) => request.header(XSRF_HEADER, csrf),
            None => request,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.credentials.email)
            .field("has_csrf_token", &self.csrf_token.is_some())
            .finish_non_exhaustive()
    }
}

impl SkywardClient {
    /// Log in and open a session
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Authentication` with the server's status and
    /// `error` message if the login is rejected, `ClientError::Transport` on
    /// network failure
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let (token, csrf_token) = self.login(credentials).await?;
        tracing::info!(email = %credentials.email, "Authenticated");
        Ok(Session::new(token, csrf_token, credentials.clone()))
    }

    /// Obtain a fresh anti-forgery token for an existing session
    ///
    /// Logs in again with the session's credentials. The new anti-forgery
    /// token replaces the old one; the bearer token is kept.
    ///
    /// # Errors
    ///
    /// Same as [`authenticate`](Self::authenticate)
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let (_, csrf_token) = self.login(&session.credentials).await?;
        tracing::debug!(email = %session.credentials.email, "Anti-forgery token refreshed");
        Ok(Session::new(
            session.token.clone(),
            csrf_token,
            session.credentials.clone(),
        ))
    }

    async fn login(&self, credentials: &Credentials) -> Result<(String, Option<String>)> {
        let response = self
            .http()
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(status = status.as_u16(), "Auth response");

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(body = %body, "Auth rejected");
            return Err(ClientError::Authentication {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let csrf_token = response
            .headers()
            .get(XSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let login = response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ClientError::ResponseParse(e.to_string()))?;

        Ok((login.token, csrf_token))
    }
}

/// The server's `error` field, or the raw body if it is not an error object.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
