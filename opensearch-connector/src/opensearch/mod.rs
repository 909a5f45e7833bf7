//! OpenSearch implementation of the search backend.
//!
//! This module provides a concrete implementation of `SearchBackend`
//! using the `opensearch` crate, plus the query builders and index mappings
//! used with it.

mod client;
pub mod index_config;
pub mod queries;

pub use client::OpenSearchBackend;
