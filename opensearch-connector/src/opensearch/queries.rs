//! OpenSearch query builders.
//!
//! This module provides functions to build search bodies for the common
//! lookups done through the connector: a single-field match and the
//! filtered, paginated trade search.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::errors::ConnectorError;
use opensearch_connector_shared::trades::TRADE_DATE_FIELD;
use opensearch_connector_shared::TradeSearchParams;

/// Parse a `YYYY-MM-DD` trade date.
pub fn parse_trade_date(date: &str) -> Result<NaiveDate, ConnectorError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        ConnectorError::validation(format!(
            "Invalid date format: {}. Expected YYYY-MM-DD",
            date
        ))
    })
}

/// Build a full-text `match` query on one field.
pub fn build_match_query(field: &str, value: impl Into<Value>) -> Value {
    let value: Value = value.into();
    json!({
        "query": {
            "match": {
                field: value
            }
        }
    })
}

/// Build the trade search body.
///
/// Every filter is a `must` clause:
/// - `match` on `region`, `business_area` and `data_source`
/// - inclusive `range` on `tradeDate` from the start of the first day to the
///   end of the last day, in epoch milliseconds
///
/// `from`/`size` select the requested page. A page whose offset overflows
/// is a `ValidationError`.
pub fn build_trade_query(params: &TradeSearchParams) -> Result<Value, ConnectorError> {
    let from = params.offset().ok_or_else(|| {
        ConnectorError::validation(format!(
            "page {} with page size {} is out of range",
            params.page, params.page_size
        ))
    })?;

    let must = vec![
        json!({ "match": { "region": params.region } }),
        json!({ "match": { "business_area": params.business_area } }),
        json!({ "match": { "data_source": params.data_source } }),
        json!({
            "range": {
                TRADE_DATE_FIELD: {
                    "gte": params.from_epoch_millis(),
                    "lte": params.to_epoch_millis()
                }
            }
        }),
    ];

    Ok(json!({
        "query": {
            "bool": {
                "must": must
            }
        },
        "from": from,
        "size": params.page_size
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TradeSearchParams {
        TradeSearchParams::new(
            parse_trade_date("2024-01-01").unwrap(),
            parse_trade_date("2024-01-31").unwrap(),
        )
    }

    #[test]
    fn test_parse_trade_date() {
        assert_eq!(
            parse_trade_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(
            parse_trade_date("29/02/2024"),
            Err(ConnectorError::ValidationError(_))
        ));
        assert!(parse_trade_date("2023-02-29").is_err());
    }

    #[test]
    fn test_build_match_query() {
        let query = build_match_query("content", "AWS");
        assert_eq!(query["query"]["match"]["content"], "AWS");
    }

    #[test]
    fn test_build_trade_query_filters() {
        let query = build_trade_query(&params().with_region("E").with_data_source("O")).unwrap();

        let must = query["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 4);
        assert_eq!(must[0]["match"]["region"], "E");
        assert_eq!(must[1]["match"]["business_area"], "A");
        assert_eq!(must[2]["match"]["data_source"], "O");

        let range = &must[3]["range"]["tradeDate"];
        assert_eq!(range["gte"], 1_704_067_200_000i64);
        assert_eq!(range["lte"], 1_706_745_599_999i64);
    }

    #[test]
    fn test_build_trade_query_pagination() {
        let query = build_trade_query(&params()).unwrap();
        assert_eq!(query["from"], 0);
        assert_eq!(query["size"], 100);

        let query = build_trade_query(&params().with_page(4, 50)).unwrap();
        assert_eq!(query["from"], 150);
        assert_eq!(query["size"], 50);
    }

    #[test]
    fn test_build_trade_query_rejects_overflowing_page() {
        let result = build_trade_query(&params().with_page(usize::MAX / 2 + 2, 4));
        assert!(matches!(result, Err(ConnectorError::ValidationError(_))));
    }
}
