//! Dependency initialization and wiring for the CLI.

use std::time::Duration;

use tracing::info;

use crate::cli::ConnectionArgs;
use crate::CliError;
use opensearch_connector::{ClientConfig, OpenSearchClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The connected client facade.
    pub client: OpenSearchClient,
}

impl Dependencies {
    /// Initialize the client from command-line arguments.
    ///
    /// Each argument falls back to its environment variable (see
    /// `ConnectionArgs`); `.env` files are loaded before parsing.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(CliError)` - If the host or password is missing, or the client cannot be built
    pub fn new(args: &ConnectionArgs) -> Result<Self, CliError> {
        let config = client_config(args)?;

        info!(
            endpoint = %config.endpoint,
            port = config.port,
            username = %config.credentials.username(),
            "Initializing dependencies"
        );

        let client = OpenSearchClient::new(config)?;

        Ok(Self { client })
    }
}

/// Translate connection arguments into a client configuration.
pub fn client_config(args: &ConnectionArgs) -> Result<ClientConfig, CliError> {
    let host = args
        .host
        .as_deref()
        .ok_or_else(|| CliError::config("--host or OPENSEARCH_HOST is required"))?;
    let password = args
        .password
        .as_deref()
        .ok_or_else(|| CliError::config("--password or OPENSEARCH_PASSWORD is required"))?;

    let mut config = ClientConfig::new(host, args.username.as_str(), password)?
        .with_port(args.port)
        .with_ssl(args.use_ssl)
        .with_verify_certs(args.verify_certs)
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_bulk_chunk_size(args.bulk_chunk_size);

    if let Some(ca_certs) = &args.ca_certs {
        config = config.with_ca_certs(ca_certs);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> ConnectionArgs {
        ConnectionArgs {
            host: Some("https://search-domain.us-east-1.es.amazonaws.com/".to_string()),
            port: 443,
            username: "admin".to_string(),
            password: Some("secret".to_string()),
            use_ssl: true,
            verify_certs: true,
            ca_certs: None,
            timeout_secs: 30,
            bulk_chunk_size: 500,
        }
    }

    #[test]
    fn test_client_config_from_args() {
        let mut args = args();
        args.ca_certs = Some(PathBuf::from("/etc/ssl/opensearch-ca.pem"));
        args.timeout_secs = 5;

        let config = client_config(&args).unwrap();

        assert_eq!(config.endpoint, "search-domain.us-east-1.es.amazonaws.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.ca_certs,
            Some(PathBuf::from("/etc/ssl/opensearch-ca.pem"))
        );
    }

    #[test]
    fn test_missing_host() {
        let mut args = args();
        args.host = None;

        assert!(matches!(client_config(&args), Err(CliError::ConfigError(_))));
    }

    #[test]
    fn test_missing_password() {
        let mut args = args();
        args.password = None;

        assert!(matches!(client_config(&args), Err(CliError::ConfigError(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut args = args();
        args.timeout_secs = 0;

        assert!(matches!(client_config(&args), Err(CliError::ConnectorError(_))));
    }
}
