//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust client.

use std::fs;

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cert::{Certificate, CertificateValidation},
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesRefreshParts},
    BulkParts, GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};

use crate::config::ClientConfig;
use crate::errors::ConnectorError;
use crate::interfaces::SearchBackend;

/// `SearchBackend` over a single OpenSearch node.
///
/// Transport, pooling, TLS and basic authentication are handled by the
/// `opensearch` crate; this type only builds the transport from a
/// `ClientConfig` and classifies responses.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::new("search-domain.us-east-1.es.amazonaws.com", "admin", password)?;
/// let backend = OpenSearchBackend::new(&config)?;
/// let info = backend.info().await?;
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Build a backend for the node described by `config`.
    ///
    /// No request is sent; an unreachable cluster only shows up on the
    /// first call.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(ConnectorError::ConnectionError)` - If the URL, CA bundle or transport is unusable
    pub fn new(config: &ClientConfig) -> Result<Self, ConnectorError> {
        config.validate()?;

        let url = config.base_url()?;
        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let credentials = Credentials::Basic(
            config.credentials.username().to_string(),
            config.credentials.password().to_string(),
        );

        let transport = TransportBuilder::new(conn_pool)
            .auth(credentials)
            .cert_validation(Self::cert_validation(config)?)
            .timeout(config.timeout)
            .disable_proxy()
            .build()
            .map_err(|e| {
                ConnectorError::connection(format!("Failed to initialize OpenSearch client: {}", e))
            })?;

        info!(
            url = %url,
            username = %config.credentials.username(),
            verify_certs = config.verify_certs,
            timeout_secs = config.timeout.as_secs(),
            "Created OpenSearch backend"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    fn cert_validation(config: &ClientConfig) -> Result<CertificateValidation, ConnectorError> {
        if !config.verify_certs {
            return Ok(CertificateValidation::None);
        }

        match &config.ca_certs {
            Some(path) => {
                let pem = fs::read(path).map_err(|e| {
                    ConnectorError::connection(format!(
                        "Failed to read CA bundle {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let certificate = Certificate::from_pem(&pem).map_err(|e| {
                    ConnectorError::connection(format!(
                        "Invalid CA bundle {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(CertificateValidation::Full(certificate))
            }
            None => Ok(CertificateValidation::Default),
        }
    }

    /// Classify the outcome of a request and decode its JSON body.
    async fn read_response(
        result: Result<Response, opensearch::Error>,
        operation: &str,
    ) -> Result<Value, ConnectorError> {
        let response = result.map_err(|e| Self::transport_error(e, operation))?;

        let status = response.status_code();
        if status.is_success() {
            return response.json::<Value>().await.map_err(|e| {
                ConnectorError::parse(format!("Failed to decode {} response: {}", operation, e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        error!(operation, status = %status, body = %body, "Request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ConnectorError::auth(format!("{} rejected with status {}: {}", operation, status, body))
            }
            StatusCode::NOT_FOUND => ConnectorError::not_found(body),
            _ => ConnectorError::request(status.as_u16(), body),
        })
    }

    fn transport_error(e: opensearch::Error, operation: &str) -> ConnectorError {
        if e.is_timeout() {
            ConnectorError::connection(format!("{} timed out: {}", operation, e))
        } else {
            ConnectorError::connection(format!("{} failed: {}", operation, e))
        }
    }
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    #[instrument(skip(self))]
    async fn ping(&self) -> Result<bool, ConnectorError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| Self::transport_error(e, "ping"))?;

        let status = response.status_code();
        debug!(status = %status, "Ping answered");
        Ok(status.is_success())
    }

    #[instrument(skip(self))]
    async fn info(&self) -> Result<Value, ConnectorError> {
        let result = self.client.info().send().await;
        Self::read_response(result, "info").await
    }

    #[instrument(skip(self, body))]
    async fn create_index(&self, name: &str, body: &Value) -> Result<Value, ConnectorError> {
        let result = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(body)
            .send()
            .await;

        let response = Self::read_response(result, "create_index").await?;
        debug!(index = %name, "Index created");
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, name: &str) -> Result<Value, ConnectorError> {
        let result = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await;

        let response = Self::read_response(result, "delete_index").await?;
        debug!(index = %name, "Index deleted");
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn refresh_index(&self, name: &str) -> Result<Value, ConnectorError> {
        let result = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[name]))
            .send()
            .await;

        Self::read_response(result, "refresh_index").await
    }

    #[instrument(skip(self, document))]
    async fn index_document(
        &self,
        index: &str,
        document: &Value,
        id: Option<&str>,
    ) -> Result<Value, ConnectorError> {
        let result = match id {
            Some(id) => {
                self.client
                    .index(IndexParts::IndexId(index, id))
                    .body(document)
                    .send()
                    .await
            }
            None => {
                self.client
                    .index(IndexParts::Index(index))
                    .body(document)
                    .send()
                    .await
            }
        };

        let response = Self::read_response(result, "index_document").await?;
        debug!(index = %index, doc_id = ?response.get("_id"), "Document indexed");
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn get_document(&self, index: &str, id: &str) -> Result<Value, ConnectorError> {
        let result = self.client.get(GetParts::IndexId(index, id)).send().await;

        Self::read_response(result, "get_document")
            .await
            .map_err(|e| match e {
                ConnectorError::NotFound(_) => {
                    ConnectorError::not_found(format!("index={}, id={}", index, id))
                }
                other => other,
            })
    }

    #[instrument(skip(self, query))]
    async fn search(&self, index: &str, query: &Value) -> Result<Value, ConnectorError> {
        let result = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(query)
            .send()
            .await;

        Self::read_response(result, "search").await
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_index(&self, index: &str, documents: &[&Value]) -> Result<Value, ConnectorError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(json!({ "index": { "_index": index } }).into());
            body.push((*document).clone().into());
        }

        let result = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await;

        let response = Self::read_response(result, "bulk_index").await?;
        debug!(
            index = %index,
            errors = ?response.get("errors"),
            "Bulk request completed"
        );
        Ok(response)
    }
}
