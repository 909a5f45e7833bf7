//! Wire types for responses the connector interprets.
//!
//! Everything else is returned to the caller as raw JSON; only the bulk
//! response is decoded, to build the per-document result contract.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::ConnectorError;
use opensearch_connector_shared::BulkItemResult;

/// Body of a `_bulk` response.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponse {
    /// Time taken in milliseconds.
    #[serde(default)]
    pub took: u64,
    /// Whether any item failed.
    #[serde(default)]
    pub errors: bool,
    /// One entry per action, in request order.
    #[serde(default)]
    pub items: Vec<BulkResponseItem>,
}

/// A bulk response entry, keyed by the action that produced it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkResponseItem {
    Index(BulkItemStatus),
    Create(BulkItemStatus),
    Update(BulkItemStatus),
    Delete(BulkItemStatus),
}

impl BulkResponseItem {
    pub fn status(&self) -> &BulkItemStatus {
        match self {
            Self::Index(s) | Self::Create(s) | Self::Update(s) | Self::Delete(s) => s,
        }
    }
}

/// Status of a single bulk action.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemStatus {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub status: u16,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<BulkItemError>,
}

impl BulkItemStatus {
    /// Check if the action succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

/// Error details of a failed bulk action.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BulkItemError {
    fn describe(&self) -> String {
        match &self.reason {
            Some(reason) => format!("{}: {}", self.error_type, reason),
            None => self.error_type.clone(),
        }
    }
}

/// Map a raw bulk response onto per-document results.
///
/// `positions[i]` is the caller-side position of the i-th document sent, so
/// the i-th response item is reported under that position.
pub fn parse_bulk_response(
    response: Value,
    positions: &[usize],
) -> Result<Vec<BulkItemResult>, ConnectorError> {
    let response: BulkResponse = serde_json::from_value(response)
        .map_err(|e| ConnectorError::parse(format!("Invalid bulk response: {}", e)))?;

    if response.items.len() != positions.len() {
        return Err(ConnectorError::parse(format!(
            "Bulk response has {} items for {} documents",
            response.items.len(),
            positions.len()
        )));
    }

    Ok(response
        .items
        .iter()
        .zip(positions)
        .map(|(item, &position)| {
            let status = item.status();
            if status.is_success() {
                BulkItemResult::succeeded(position, status.id.clone(), status.status)
            } else {
                let reason = status
                    .error
                    .as_ref()
                    .map(BulkItemError::describe)
                    .unwrap_or_else(|| format!("status {}", status.status));
                BulkItemResult::failed(position, status.id.clone(), Some(status.status), reason)
            }
        })
        .collect())
}
