//! OpenSearch client facade.
//!
//! This module provides the main client for talking to an OpenSearch
//! cluster. Each method checks its arguments and hands the call to the
//! backend; responses come back unmodified.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::errors::ConnectorError;
use crate::interfaces::SearchBackend;
use crate::opensearch::OpenSearchBackend;
use crate::types::parse_bulk_response;
use opensearch_connector_shared::{BulkItemResult, BulkSummary};

/// The main client for interacting with an OpenSearch cluster.
///
/// Holds the connection configuration and a backend. No retries, no
/// caching: every call is one request (bulk calls one request per chunk),
/// and failures are returned as they happen.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::new("search-my-domain.us-east-1.es.amazonaws.com", "admin", password)?;
/// let client = OpenSearchClient::new(config)?;
///
/// if client.ping().await {
///     let info = client.get_cluster_info().await?;
///     println!("Cluster version: {}", info["version"]["number"]);
/// }
///
/// let response = client.index_document("articles", &json!({"title": "AWS Guide"}), None).await?;
/// let stored = client.get_document("articles", response["_id"].as_str().unwrap()).await?;
/// client.close();
/// ```
pub struct OpenSearchClient {
    backend: Box<dyn SearchBackend>,
    config: ClientConfig,
}

impl OpenSearchClient {
    /// Create a client backed by the `opensearch` transport.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(ConnectorError)` - If the configuration or transport is unusable
    pub fn new(config: ClientConfig) -> Result<Self, ConnectorError> {
        let backend = OpenSearchBackend::new(&config)?;
        Ok(Self::with_backend(Box::new(backend), config))
    }

    /// Create a client from `OPENSEARCH_*` environment variables.
    pub fn from_env() -> Result<Self, ConnectorError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over a custom backend.
    pub fn with_backend(backend: Box<dyn SearchBackend>, config: ClientConfig) -> Self {
        info!(
            endpoint = %config.endpoint,
            port = config.port,
            use_ssl = config.use_ssl,
            "OpenSearch client ready"
        );
        Self { backend, config }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn require(value: &str, name: &str) -> Result<(), ConnectorError> {
        if value.trim().is_empty() {
            return Err(ConnectorError::validation(format!("{} is required", name)));
        }
        Ok(())
    }

    fn require_object(value: &Value, name: &str) -> Result<(), ConnectorError> {
        if !value.is_object() {
            return Err(ConnectorError::validation(format!(
                "{} must be a JSON object",
                name
            )));
        }
        Ok(())
    }

    /// Test connection to the cluster.
    ///
    /// Returns true exactly when the cluster is reachable and accepts the
    /// credentials. Failures are logged, never returned.
    pub async fn ping(&self) -> bool {
        match self.backend.ping().await {
            Ok(true) => true,
            Ok(false) => {
                warn!(endpoint = %self.config.endpoint, "Cluster refused ping");
                false
            }
            Err(e) => {
                warn!(endpoint = %self.config.endpoint, error = %e, "Failed to ping cluster");
                false
            }
        }
    }

    /// Get cluster information (name, uuid, version).
    pub async fn get_cluster_info(&self) -> Result<Value, ConnectorError> {
        self.backend.info().await
    }

    /// Create an index.
    /// Input: index name, optional settings/mappings body (`{}` when absent)
    /// Output: Result<acknowledgment, ConnectorError>
    pub async fn create_index(&self, name: &str, body: Option<&Value>) -> Result<Value, ConnectorError> {
        Self::require(name, "index name")?;

        let empty = json!({});
        let body = body.unwrap_or(&empty);
        Self::require_object(body, "index body")?;

        self.backend.create_index(name, body).await
    }

    /// Delete an index.
    /// Input: index name
    /// Output: Result<acknowledgment, ConnectorError> (`NotFound` when absent)
    pub async fn delete_index(&self, name: &str) -> Result<Value, ConnectorError> {
        Self::require(name, "index name")?;

        self.backend.delete_index(name).await
    }

    /// Refresh an index so documents indexed so far become searchable.
    pub async fn refresh_index(&self, name: &str) -> Result<Value, ConnectorError> {
        Self::require(name, "index name")?;

        self.backend.refresh_index(name).await
    }

    /// Index a document.
    /// Input: index name, JSON object, optional id (assigned by the cluster when absent)
    /// Output: Result<response carrying `_id`, ConnectorError>
    pub async fn index_document(
        &self,
        index: &str,
        document: &Value,
        id: Option<&str>,
    ) -> Result<Value, ConnectorError> {
        Self::require(index, "index name")?;
        Self::require_object(document, "document")?;
        if let Some(id) = id {
            Self::require(id, "document id")?;
        }

        self.backend.index_document(index, document, id).await
    }

    /// Get a document by id.
    /// Input: index name, document id
    /// Output: Result<document response with `_source`, ConnectorError> (`NotFound` when absent)
    pub async fn get_document(&self, index: &str, id: &str) -> Result<Value, ConnectorError> {
        Self::require(index, "index name")?;
        Self::require(id, "document id")?;

        self.backend.get_document(index, id).await
    }

    /// Execute a search query.
    /// Input: index name, search body
    /// Output: Result<raw search response, ConnectorError>
    pub async fn search(&self, index: &str, query: &Value) -> Result<Value, ConnectorError> {
        Self::require(index, "index name")?;
        Self::require_object(query, "query")?;

        self.backend.search(index, query).await
    }

    /// Bulk index documents.
    /// Input: index name, documents
    /// Output: Result<BulkSummary, ConnectorError>
    ///
    /// Documents are sent in chunks of `bulk_chunk_size`. Each document gets
    /// one result, in input order. Documents that are not JSON objects fail
    /// locally and are not sent. Only a failed request fails the call.
    pub async fn bulk_index(&self, index: &str, documents: &[Value]) -> Result<BulkSummary, ConnectorError> {
        Self::require(index, "index name")?;

        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut results = Vec::with_capacity(documents.len());
        let mut to_send: Vec<(usize, &Value)> = Vec::with_capacity(documents.len());

        for (position, document) in documents.iter().enumerate() {
            if document.is_object() {
                to_send.push((position, document));
            } else {
                results.push(BulkItemResult::failed(
                    position,
                    None,
                    None,
                    "document must be a JSON object",
                ));
            }
        }

        for chunk in to_send.chunks(self.config.bulk_chunk_size.max(1)) {
            let positions: Vec<usize> = chunk.iter().map(|(position, _)| *position).collect();
            let batch: Vec<&Value> = chunk.iter().map(|(_, document)| *document).collect();

            let response = self.backend.bulk_index(index, &batch).await?;
            results.extend(parse_bulk_response(response, &positions)?);
        }

        let summary = BulkSummary::from_results(results);
        debug!(
            index = %index,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk index completed"
        );
        Ok(summary)
    }

    /// Close the client, releasing the transport and its pooled connections.
    pub fn close(self) {
        info!(endpoint = %self.config.endpoint, "Closing OpenSearch client");
        drop(self.backend);
    }
}
