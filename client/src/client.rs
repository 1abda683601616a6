//! Skyward API client implementation

use crate::{
    config::{ClientConfig, TlsConfig},
    error::{ClientError, Result},
    response::ApiResponse,
};
use reqwest::{Client, Identity, RequestBuilder};
use std::path::Path;

/// Skyward API client
///
/// Cheap to clone: clones share the underlying connection pool. The client
/// holds no session state; sessions are values handed to each operation.
#[derive(Clone, Debug)]
pub struct SkywardClient {
    http: Client,
    base_url: String,
}

impl SkywardClient {
    /// Create a client for the configured deployment
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for an invalid configuration and
    /// `ClientError::Tls` if the client certificate cannot be loaded
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(&config.tls)?;
        Ok(Self::with_http_client(http, &config.base_url))
    }

    /// Create a client around an existing `reqwest::Client`
    #[must_use]
    pub fn with_http_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// API root this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) const fn http(&self) -> &Client {
        &self.http
    }

    /// Send a request and capture status and body.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request.send().await?;
        ApiResponse::read(response).await
    }
}

fn build_http_client(tls: &TlsConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .danger_accept_invalid_certs(!tls.verify_server);

    if let Some((cert, key)) = tls.identity_paths() {
        builder = builder.identity(load_identity(cert, key)?);
        tracing::debug!(cert = %cert.display(), "Client certificate loaded");
    }
    if !tls.verify_server {
        tracing::warn!("Server certificate verification is disabled");
    }

    builder
        .build()
        .map_err(|e| ClientError::Tls(format!("failed to build HTTP client: {e}")))
}

/// Combine a PEM certificate and a PEM private key into one identity.
///
/// DER input is rejected with `ClientError::Tls`.
fn load_identity(cert: &Path, key: &Path) -> Result<Identity> {
    let mut pem = std::fs::read(cert)
        .map_err(|e| ClientError::Tls(format!("cannot read {}: {e}", cert.display())))?;
    if !pem.ends_with(b"\n") {
        pem.push(b'\n');
    }
    let key_pem = std::fs::read(key)
        .map_err(|e| ClientError::Tls(format!("cannot read {}: {e}", key.display())))?;
    pem.extend_from_slice(&key_pem);

    Identity::from_pem(&pem).map_err(|e| ClientError::Tls(format!("invalid client identity: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::Environment;
    use crate::types::Credentials;
    use std::path::PathBuf;

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::new(Environment::Test, Credentials::new("a@b.c", "pw"));
        let client = SkywardClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/api");
        assert_eq!(client.url("/users/7"), "http://127.0.0.1:8080/api/users/7");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = SkywardClient::with_http_client(Client::new(), "http://localhost:8080/api/");
        assert_eq!(client.url("/auth/login"), "http://localhost:8080/api/auth/login");
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn production_config(cert: &str, key: &str) -> ClientConfig {
        let tls = TlsConfig {
            client_cert: Some(fixture(cert)),
            client_key: Some(fixture(key)),
            verify_server: false,
        };
        ClientConfig::new(Environment::Production, Credentials::new("a@b.c", "pw")).with_tls(tls)
    }

    #[test]
    fn test_pem_certificate_and_key_build_client() {
        let client = SkywardClient::new(&production_config("client.cer", "client.key")).unwrap();
        assert_eq!(client.base_url(), "https://127.0.0.1:8080");
    }

    #[test]
    fn test_der_certificate_is_tls_error() {
        let err = SkywardClient::new(&production_config("client.der", "client.key")).unwrap_err();
        assert!(matches!(err, ClientError::Tls(_)));
    }

    #[test]
    fn test_missing_certificate_file_is_tls_error() {
        let tls = TlsConfig {
            client_cert: Some(PathBuf::from("/nonexistent/client.cer")),
            client_key: Some(PathBuf::from("/nonexistent/client.key")),
            verify_server: false,
        };
        let config = ClientConfig::new(Environment::Production, Credentials::new("a@b.c", "pw"))
            .with_tls(tls);
        let err = SkywardClient::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::Tls(_)));
    }
}
