//! A page of search results extracted from a raw search response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hits of one result page, with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total number of matching documents in the index.
    pub total: u64,
    /// `_source` of each hit on this page.
    pub results: Vec<Value>,
    /// 1-based page number.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Number of pages needed to cover `total`.
    pub total_pages: u64,
}

impl SearchPage {
    /// Extract a page from a search response.
    ///
    /// Accepts both forms of `hits.total`: a bare integer (OpenSearch 1.x)
    /// and an object with a `value` field (2.x). Missing pieces count as zero.
    pub fn from_response(response: &Value, page: usize, page_size: usize) -> Self {
        let total = total_hits(response);

        let results = response
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .map(|hits| {
                hits.iter()
                    .map(|hit| hit.get("_source").cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .unwrap_or_default();

        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size as u64)
        };

        Self {
            total,
            results,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Read `hits.total` from a search response in either the 1.x or 2.x form.
pub fn total_hits(response: &Value) -> u64 {
    match response.pointer("/hits/total") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::Object(total)) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
        _ => 0,
    }
}
