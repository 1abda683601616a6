//! Client configuration
//!
//! Settings come from environment variables (optionally seeded from a `.env`
//! file) with per-environment defaults:
//!
//! | variable                 | meaning                                   |
//! |--------------------------|-------------------------------------------|
//! | `SKYWARD_ENV`            | `test` (default) or `production`          |
//! | `SKYWARD_BASE_URL`       | API root, overrides the environment default |
//! | `SKYWARD_ADMIN_EMAIL`    | login email (required)                    |
//! | `SKYWARD_ADMIN_PASSWORD` | login password (required)                 |
//! | `SKYWARD_CLIENT_CERT`    | PEM client certificate                    |
//! | `SKYWARD_CLIENT_KEY`     | PEM private key for the certificate       |
//! | `SKYWARD_VERIFY_TLS`     | `true`/`false`, verify the server certificate |
//!
//! # Example
//!
//! ```no_run
//! use skyward_client::ClientConfig;
//!
//! # fn main() -> Result<(), skyward_client::ClientError> {
//! let config = ClientConfig::from_env()?;
//! println!("Target: {} ({})", config.base_url, config.environment);
//! # Ok(())
//! # }
//! ```

use crate::error::{ClientError, Result};
use crate::types::Credentials;
use std::fmt;
use std::path::PathBuf;

/// Target deployment the harness runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local plain-HTTP deployment used by the assertion suite
    Test,
    /// TLS deployment with client-certificate authentication
    Production,
}

impl Environment {
    /// Parse an environment name
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the name is not recognised
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "test" | "dev" | "development" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Production),
            other => Err(ClientError::Config(format!("invalid environment: {other}"))),
        }
    }

    /// Default API root for this environment
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Test => "http://127.0.0.1:8080/api",
            Self::Production => "https://127.0.0.1:8080",
        }
    }

    /// Check if this is the production-like environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Transport security settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Certificate presented to the server.
    ///
    /// Must be PEM even when the file is named `.cer`; convert a DER
    /// certificate with `openssl x509 -inform der -in client.cer -out client.pem`.
    pub client_cert: Option<PathBuf>,
    /// PEM private key matching `client_cert`
    pub client_key: Option<PathBuf>,
    /// Verify the server certificate chain
    pub verify_server: bool,
}

impl TlsConfig {
    /// Defaults for an environment: the test deployment verifies, the
    /// production-like one runs with a self-signed server certificate.
    #[must_use]
    pub const fn for_environment(environment: Environment) -> Self {
        Self {
            client_cert: None,
            client_key: None,
            verify_server: !environment.is_production(),
        }
    }

    /// Certificate and key paths, if client authentication is configured
    #[must_use]
    pub fn identity_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.client_cert.as_ref().zip(self.client_key.as_ref())
    }

    /// Validate TLS configuration
    ///
    /// # Errors
    ///
    /// Returns error if only one of certificate and key is set
    pub fn validate(&self) -> Result<()> {
        match (&self.client_cert, &self.client_key) {
            (Some(_), None) => Err(ClientError::Config(
                "client certificate configured without a private key".to_string(),
            )),
            (None, Some(_)) => Err(ClientError::Config(
                "private key configured without a client certificate".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Everything needed to build a [`SkywardClient`](crate::SkywardClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Target deployment
    pub environment: Environment,
    /// API root without trailing slash, e.g. `http://127.0.0.1:8080/api`
    pub base_url: String,
    /// Admin credentials used for login
    pub credentials: Credentials,
    /// Transport security
    pub tls: TlsConfig,
}

impl ClientConfig {
    /// Configuration with the environment's defaults
    #[must_use]
    pub fn new(environment: Environment, credentials: Credentials) -> Self {
        Self {
            environment,
            base_url: environment.default_base_url().to_string(),
            credentials,
            tls: TlsConfig::for_environment(environment),
        }
    }

    /// Override the API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override transport security
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("SKYWARD_ENV")
            .map(|s| Environment::parse(&s))
            .transpose()?
            .unwrap_or(Environment::Test);

        let required = |key: &str| {
            lookup(key).ok_or_else(|| ClientError::Config(format!("environment variable not set: {key}")))
        };
        let credentials = Credentials::new(
            required("SKYWARD_ADMIN_EMAIL")?,
            required("SKYWARD_ADMIN_PASSWORD")?,
        );

        let mut config = Self::new(environment, credentials);

        if let Some(url) = lookup("SKYWARD_BASE_URL") {
            config = config.with_base_url(url);
        }
        config.tls.client_cert = lookup("SKYWARD_CLIENT_CERT").map(PathBuf::from);
        config.tls.client_key = lookup("SKYWARD_CLIENT_KEY").map(PathBuf::from);
        if let Some(verify) = lookup("SKYWARD_VERIFY_TLS") {
            config.tls.verify_server = parse_bool("SKYWARD_VERIFY_TLS", &verify)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the whole configuration
    ///
    /// # Errors
    ///
    /// Returns error if any section is invalid
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        if self.credentials.email.is_empty() {
            return Err(ClientError::Config("admin email cannot be empty".to_string()));
        }
        self.tls.validate()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ClientError::Config(format!("{key} must be a boolean, got {other}"))),
    }
}
