//! Search backend trait definition.
//!
//! This module defines the capability set the client facade delegates to,
//! allowing the OpenSearch transport to be swapped for a mock in tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ConnectorError;

/// Abstracts the HTTP client that talks to the cluster.
///
/// Implementations are injected into `OpenSearchClient`. Responses are the
/// JSON bodies returned by the cluster, untouched. Arguments are validated by
/// the facade before they reach the backend.
///
/// All methods return `Result<T, ConnectorError>` so every backend reports
/// failures through the same taxonomy.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Send a HEAD request to the cluster root.
    ///
    /// * `Ok(true)` - The cluster answered with a success status
    /// * `Ok(false)` - The cluster answered, but refused (e.g. bad credentials)
    /// * `Err(ConnectorError::ConnectionError)` - The cluster could not be reached
    async fn ping(&self) -> Result<bool, ConnectorError>;

    /// Fetch cluster metadata (name, uuid, version).
    async fn info(&self) -> Result<Value, ConnectorError>;

    /// Create an index with the given settings and mappings.
    ///
    /// Fails when an index with the same name already exists.
    async fn create_index(&self, name: &str, body: &Value) -> Result<Value, ConnectorError>;

    /// Delete an index.
    ///
    /// * `Err(ConnectorError::NotFound)` - If the index doesn't exist
    async fn delete_index(&self, name: &str) -> Result<Value, ConnectorError>;

    /// Refresh an index so recent writes become searchable.
    async fn refresh_index(&self, name: &str) -> Result<Value, ConnectorError>;

    /// Index a single document.
    ///
    /// When `id` is `None` the cluster assigns one; it is returned as `_id`.
    /// A document with an existing id is replaced.
    async fn index_document(
        &self,
        index: &str,
        document: &Value,
        id: Option<&str>,
    ) -> Result<Value, ConnectorError>;

    /// Fetch a document by id.
    ///
    /// * `Err(ConnectorError::NotFound)` - If the document or index doesn't exist
    async fn get_document(&self, index: &str, id: &str) -> Result<Value, ConnectorError>;

    /// Execute a search request body against an index.
    async fn search(&self, index: &str, query: &Value) -> Result<Value, ConnectorError>;

    /// Index several documents in a single `_bulk` request.
    ///
    /// Returns the raw bulk response. Per-item failures are reported inside
    /// the response body; only failures of the request as a whole are errors.
    async fn bulk_index(&self, index: &str, documents: &[&Value]) -> Result<Value, ConnectorError>;
}
