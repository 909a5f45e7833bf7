//! Trade search parameters and display helpers.
//!
//! Trades are stored with `region`, `business_area` and `data_source` keyword
//! fields and a `tradeDate` held as epoch milliseconds.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default filter value for region, business area and data source.
pub const DEFAULT_FILTER: &str = "A";

/// Default number of trades per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Largest result window OpenSearch serves without scrolling.
pub const MAX_RESULT_WINDOW: u64 = 10_000;

/// Columns shown when listing trades.
pub const SUMMARY_COLUMNS: [&str; 5] = [
    "tradeID",
    "tradeIdInternal",
    "primaryAssetClass",
    "sourceSystemName",
    "tradeDate",
];

/// Field holding the trade date.
pub const TRADE_DATE_FIELD: &str = "tradeDate";

/// Filters and pagination for a trade search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSearchParams {
    pub region: String,
    pub business_area: String,
    pub data_source: String,
    /// First trade date, inclusive.
    pub trade_date_from: NaiveDate,
    /// Last trade date, inclusive.
    pub trade_date_to: NaiveDate,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl TradeSearchParams {
    /// Create parameters for a date range with default filters and pagination.
    pub fn new(trade_date_from: NaiveDate, trade_date_to: NaiveDate) -> Self {
        Self {
            region: DEFAULT_FILTER.to_string(),
            business_area: DEFAULT_FILTER.to_string(),
            data_source: DEFAULT_FILTER.to_string(),
            trade_date_from,
            trade_date_to,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_business_area(mut self, business_area: impl Into<String>) -> Self {
        self.business_area = business_area.into();
        self
    }

    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = data_source.into();
        self
    }

    /// Select a page. Page numbers below 1 are clamped to 1.
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page.max(1);
        self.page_size = page_size;
        self
    }

    /// Offset of the first hit on the selected page, or `None` when it
    /// does not fit in a `usize`.
    pub fn offset(&self) -> Option<usize> {
        self.page.saturating_sub(1).checked_mul(self.page_size)
    }

    /// Start of the first day (00:00:00.000 UTC) in epoch milliseconds.
    pub fn from_epoch_millis(&self) -> i64 {
        self.trade_date_from
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
    }

    /// End of the last day (23:59:59.999 UTC) in epoch milliseconds.
    pub fn to_epoch_millis(&self) -> i64 {
        self.trade_date_to
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
            + 86_400_000
            - 1
    }
}

/// Render an epoch timestamp as `DD-MON-YYYY UTC`.
///
/// Values above 10^10 are taken as milliseconds, anything smaller as
/// seconds. Values that are not numeric are returned as their text.
pub fn format_epoch_to_date(value: &Value) -> String {
    let timestamp = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let Some(mut timestamp) = timestamp else {
        return display_text(value);
    };

    if timestamp > 10_000_000_000.0 {
        timestamp /= 1000.0;
    }

    match DateTime::from_timestamp(timestamp.trunc() as i64, 0) {
        Some(dt) => dt.format("%d-%b-%Y UTC").to_string().to_uppercase(),
        None => display_text(value),
    }
}

/// Text of a JSON value without the quotes around strings.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
