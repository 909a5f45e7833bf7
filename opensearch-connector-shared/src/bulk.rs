//! Per-document results of a bulk indexing call.

use serde::{Deserialize, Serialize};

/// Outcome of a single document within a bulk call.
///
/// `position` is the document's index in the caller's input, so results can
/// be matched back to the submitted documents even when some were rejected
/// before being sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItemResult {
    /// Position of the document in the submitted slice.
    pub position: usize,
    /// Identifier assigned by the cluster, when the item reached it.
    pub id: Option<String>,
    /// HTTP status reported for the item. `None` when rejected locally.
    pub status: Option<u16>,
    /// Whether the document was indexed.
    pub success: bool,
    /// Failure reason, `"<type>: <reason>"` for cluster-side errors.
    pub error: Option<String>,
}

impl BulkItemResult {
    /// A document indexed by the cluster.
    pub fn succeeded(position: usize, id: Option<String>, status: u16) -> Self {
        Self {
            position,
            id,
            status: Some(status),
            success: true,
            error: None,
        }
    }

    /// A document the cluster or the client refused.
    pub fn failed(
        position: usize,
        id: Option<String>,
        status: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            position,
            id,
            status,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Summary of a bulk call containing aggregate counts and individual results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkSummary {
    /// Total number of documents submitted.
    pub total: usize,
    /// Number of documents indexed.
    pub succeeded: usize,
    /// Number of documents that failed.
    pub failed: usize,
    /// One result per submitted document, ordered by position.
    pub results: Vec<BulkItemResult>,
}

impl BulkSummary {
    /// Build a summary from per-item results, sorting them by position.
    pub fn from_results(mut results: Vec<BulkItemResult>) -> Self {
        results.sort_by_key(|r| r.position);
        let succeeded = results.iter().filter(|r| r.success).count();

        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// True when every document was indexed.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    /// Results of the documents that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemResult> {
        self.results.iter().filter(|r| !r.success)
    }
}
