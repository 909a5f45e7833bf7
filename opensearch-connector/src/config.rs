//! Configuration types for the OpenSearchClient.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::ConnectorError;

/// Default HTTPS port of managed OpenSearch domains.
pub const DEFAULT_PORT: u16 = 443;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of documents sent per bulk request.
pub const DEFAULT_BULK_CHUNK_SIZE: usize = 500;

/// Username and password for HTTP basic authentication.
///
/// The password is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials, rejecting blank usernames or passwords.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConnectorError> {
        let username = username.into();
        let password = password.into();

        if username.trim().is_empty() || password.is_empty() {
            return Err(ConnectorError::auth("Username and password are required"));
        }

        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings for an OpenSearch cluster.
///
/// Held unchanged by the client for its whole lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Bare host name of the cluster, without scheme or port.
    pub endpoint: String,
    pub port: u16,
    pub credentials: Credentials,
    /// Connect with `https` when true, `http` otherwise.
    pub use_ssl: bool,
    /// Validate the server certificate chain.
    pub verify_certs: bool,
    /// PEM bundle of CA certificates to validate against instead of the system roots.
    pub ca_certs: Option<PathBuf>,
    /// Per-request timeout forwarded to the transport.
    pub timeout: Duration,
    /// Maximum number of documents per bulk request.
    pub bulk_chunk_size: usize,
}

impl ClientConfig {
    /// Create a config with the default port, TLS settings and timeout.
    ///
    /// The endpoint is normalized: scheme, trailing slashes and a `:443`
    /// suffix are removed.
    pub fn new(
        endpoint: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConnectorError> {
        let endpoint = normalize_endpoint(endpoint);
        if endpoint.is_empty() {
            return Err(ConnectorError::validation("endpoint is required"));
        }

        Ok(Self {
            endpoint,
            port: DEFAULT_PORT,
            credentials: Credentials::new(username, password)?,
            use_ssl: true,
            verify_certs: true,
            ca_certs: None,
            timeout: DEFAULT_TIMEOUT,
            bulk_chunk_size: DEFAULT_BULK_CHUNK_SIZE,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn with_verify_certs(mut self, verify_certs: bool) -> Self {
        self.verify_certs = verify_certs;
        self
    }

    pub fn with_ca_certs(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_certs = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bulk chunk size. Zero is rejected when the client is built.
    pub fn with_bulk_chunk_size(mut self, bulk_chunk_size: usize) -> Self {
        self.bulk_chunk_size = bulk_chunk_size;
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_HOST`: cluster endpoint (required)
    /// - `OPENSEARCH_USERNAME`: basic auth username (default: admin)
    /// - `OPENSEARCH_PASSWORD`: basic auth password (required)
    /// - `OPENSEARCH_PORT`: port (default: 443)
    /// - `OPENSEARCH_USE_SSL`: connect over https (default: true)
    /// - `OPENSEARCH_VERIFY_CERTS`: validate certificates (default: true)
    /// - `OPENSEARCH_CA_CERTS`: path to a PEM CA bundle (optional)
    /// - `OPENSEARCH_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    /// - `OPENSEARCH_BULK_CHUNK_SIZE`: documents per bulk request (default: 500)
    pub fn from_env() -> Result<Self, ConnectorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConnectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("OPENSEARCH_HOST")
            .ok_or_else(|| ConnectorError::validation("OPENSEARCH_HOST is not set"))?;
        let username = lookup("OPENSEARCH_USERNAME").unwrap_or_else(|| "admin".to_string());
        let password = lookup("OPENSEARCH_PASSWORD")
            .ok_or_else(|| ConnectorError::auth("OPENSEARCH_PASSWORD is not set"))?;

        let mut config = Self::new(&endpoint, username, password)?;

        if let Some(port) = lookup("OPENSEARCH_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| ConnectorError::validation(format!("Invalid OPENSEARCH_PORT: {}", e)))?;
        }
        if let Some(use_ssl) = lookup("OPENSEARCH_USE_SSL") {
            config.use_ssl = parse_bool("OPENSEARCH_USE_SSL", &use_ssl)?;
        }
        if let Some(verify) = lookup("OPENSEARCH_VERIFY_CERTS") {
            config.verify_certs = parse_bool("OPENSEARCH_VERIFY_CERTS", &verify)?;
        }
        if let Some(ca_certs) = lookup("OPENSEARCH_CA_CERTS").filter(|p| !p.trim().is_empty()) {
            config.ca_certs = Some(PathBuf::from(ca_certs));
        }
        if let Some(timeout) = lookup("OPENSEARCH_TIMEOUT_SECS") {
            let secs: u64 = timeout.trim().parse().map_err(|e| {
                ConnectorError::validation(format!("Invalid OPENSEARCH_TIMEOUT_SECS: {}", e))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(chunk) = lookup("OPENSEARCH_BULK_CHUNK_SIZE") {
            config.bulk_chunk_size = chunk.trim().parse().map_err(|e| {
                ConnectorError::validation(format!("Invalid OPENSEARCH_BULK_CHUNK_SIZE: {}", e))
            })?;
        }

        Ok(config)
    }

    /// Check the settings that the builder methods cannot enforce.
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.endpoint.is_empty() {
            return Err(ConnectorError::validation("endpoint is required"));
        }
        if self.bulk_chunk_size == 0 {
            return Err(ConnectorError::validation("bulk_chunk_size must be positive"));
        }
        if self.timeout.is_zero() {
            return Err(ConnectorError::validation("timeout must be positive"));
        }
        Ok(())
    }

    /// URL of the single cluster node, e.g. `https://search-domain.es.amazonaws.com:443`.
    pub fn base_url(&self) -> Result<Url, ConnectorError> {
        let scheme = if self.use_ssl { "https" } else { "http" };
        let raw = format!("{}://{}:{}", scheme, self.endpoint, self.port);

        Url::parse(&raw).map_err(|e| ConnectorError::connection(format!("Invalid endpoint {}: {}", raw, e)))
    }
}

/// Strip scheme, trailing slashes and a trailing `:443` from an endpoint.
///
/// `https://search-domain.region.es.amazonaws.com:443/` becomes
/// `search-domain.region.es.amazonaws.com`.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    let endpoint = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);
    let endpoint = endpoint.trim_end_matches('/');
    let endpoint = endpoint.strip_suffix(":443").unwrap_or(endpoint);

    endpoint.to_string()
}

/// Parse a boolean setting. Accepts `true`/`1`/`yes` and `false`/`0`/`no`,
/// ignoring case and surrounding whitespace.
pub fn parse_bool_value(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConnectorError> {
    parse_bool_value(value).ok_or_else(|| {
        ConnectorError::validation(format!(
            "Invalid {}: expected true or false, got {:?}",
            key, value
        ))
    })
}
