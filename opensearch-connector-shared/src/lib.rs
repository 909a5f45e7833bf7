//! # OpenSearch Connector Shared
//!
//! Plain data types exchanged between the connector facade, its backends and
//! callers: documents, queries, bulk results, search pages and the trade
//! search parameters.

pub mod bulk;
pub mod document;
pub mod search_page;
pub mod trades;

pub use bulk::{BulkItemResult, BulkSummary};
pub use document::{Document, Query};
pub use search_page::SearchPage;
pub use trades::TradeSearchParams;
