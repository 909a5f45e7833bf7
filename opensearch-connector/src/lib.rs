//! # OpenSearch Connector
//!
//! This crate provides a thin client facade for OpenSearch clusters. It
//! includes the connection configuration, error taxonomy, the backend
//! interface the facade delegates to, and a concrete implementation over
//! the `opensearch` crate.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::OpenSearchClient;
pub use config::{ClientConfig, Credentials};
pub use errors::ConnectorError;
pub use interfaces::SearchBackend;
pub use self::opensearch::OpenSearchBackend;
pub use opensearch_connector_shared::{BulkItemResult, BulkSummary, Document, Query, SearchPage};
