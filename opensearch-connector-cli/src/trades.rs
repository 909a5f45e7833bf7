//! Trade search and CSV export.

use std::collections::BTreeSet;
use std::io::Write;

use serde_json::Value;
use tracing::{info, warn};

use crate::cli::TradeFilterArgs;
use crate::CliError;
use opensearch_connector::opensearch::queries::{build_trade_query, parse_trade_date};
use opensearch_connector::OpenSearchClient;
use opensearch_connector_shared::document::{flatten_document, get_nested_value};
use opensearch_connector_shared::search_page::total_hits;
use opensearch_connector_shared::trades::{
    display_text, format_epoch_to_date, MAX_RESULT_WINDOW, SUMMARY_COLUMNS, TRADE_DATE_FIELD,
};
use opensearch_connector_shared::{SearchPage, TradeSearchParams};

/// Build search parameters from the filter arguments.
pub fn trade_params(filters: &TradeFilterArgs) -> Result<TradeSearchParams, CliError> {
    let from = parse_trade_date(&filters.from)?;
    let to = parse_trade_date(&filters.to)?;
    if from > to {
        return Err(CliError::input(format!(
            "--from {} is after --to {}",
            filters.from, filters.to
        )));
    }

    Ok(TradeSearchParams::new(from, to)
        .with_region(filters.region.as_str())
        .with_business_area(filters.business_area.as_str())
        .with_data_source(filters.data_source.as_str()))
}

/// Print one page of trades as a tab-separated table of the summary columns.
pub async fn search_trades<W: Write>(
    client: &OpenSearchClient,
    filters: &TradeFilterArgs,
    page: usize,
    page_size: usize,
    out: &mut W,
) -> Result<(), CliError> {
    let params = trade_params(filters)?.with_page(page, page_size);
    let query = build_trade_query(&params)?;
    let response = client.search(&filters.index, &query).await?;
    let page = SearchPage::from_response(&response, params.page, params.page_size);

    write_summary(&page, out)
}

fn write_summary<W: Write>(page: &SearchPage, out: &mut W) -> Result<(), CliError> {
    writeln!(
        out,
        "Found {} trades (page {} of {})",
        page.total, page.page, page.total_pages
    )?;
    if page.results.is_empty() {
        return Ok(());
    }

    writeln!(out, "{}", SUMMARY_COLUMNS.join("\t"))?;
    for trade in &page.results {
        let row: Vec<String> = SUMMARY_COLUMNS
            .iter()
            .map(|column| {
                let value = get_nested_value(trade, column);
                if *column == TRADE_DATE_FIELD {
                    format_epoch_to_date(&value)
                } else {
                    display_text(&value)
                }
            })
            .collect();
        writeln!(out, "{}", row.join("\t"))?;
    }
    Ok(())
}

/// Export every matching trade, up to the result window, as CSV.
///
/// A first query with a page size of one counts the matches; the second
/// fetches them in one page. Returns the number of rows written.
pub async fn export_trades<W: Write>(
    client: &OpenSearchClient,
    filters: &TradeFilterArgs,
    writer: W,
) -> Result<usize, CliError> {
    let params = trade_params(filters)?;

    let count_query = build_trade_query(&params.clone().with_page(1, 1))?;
    let count = client.search(&filters.index, &count_query).await?;
    let total = total_hits(&count);
    if total == 0 {
        warn!(index = %filters.index, "No trades matched the filters");
        return Ok(0);
    }
    if total > MAX_RESULT_WINDOW {
        warn!(
            total,
            limit = MAX_RESULT_WINDOW,
            "Export truncated to the result window"
        );
    }

    let size = total.min(MAX_RESULT_WINDOW) as usize;
    let query = build_trade_query(&params.with_page(1, size))?;
    let response = client.search(&filters.index, &query).await?;
    let page = SearchPage::from_response(&response, 1, size);

    let written = write_csv(&page.results, writer)?;
    info!(rows = written, "Exported trades");
    Ok(written)
}

/// Write documents as CSV with one column per flattened key, sorted by name.
///
/// Documents lacking a key get an empty cell.
pub fn write_csv<W: Write>(documents: &[Value], writer: W) -> Result<usize, CliError> {
    if documents.is_empty() {
        return Ok(0);
    }

    let rows: Vec<_> = documents.iter().map(flatten_document).collect();
    let columns: BTreeSet<&String> = rows.iter().flat_map(|row| row.keys()).collect();

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&columns)?;
    for row in &rows {
        csv.write_record(
            columns
                .iter()
                .map(|column| row.get(*column).map(display_text).unwrap_or_default()),
        )?;
    }
    csv.flush()?;

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filters(from: &str, to: &str) -> TradeFilterArgs {
        TradeFilterArgs {
            index: "trades".to_string(),
            region: "EMEA".to_string(),
            business_area: "A".to_string(),
            data_source: "A".to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn test_trade_params() {
        let params = trade_params(&filters("2024-01-01", "2024-01-31")).unwrap();

        assert_eq!(params.region, "EMEA");
        assert_eq!(params.business_area, "A");
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_trade_params_rejects_bad_dates() {
        assert!(matches!(
            trade_params(&filters("01/01/2024", "2024-01-31")),
            Err(CliError::ConnectorError(_))
        ));
        assert!(matches!(
            trade_params(&filters("2024-02-01", "2024-01-31")),
            Err(CliError::InputError(_))
        ));
    }

    #[test]
    fn test_write_summary() {
        let response = json!({
            "hits": {
                "total": { "value": 250 },
                "hits": [{
                    "_source": {
                        "tradeID": "T-1",
                        "tradeIdInternal": 42,
                        "primaryAssetClass": "Rates",
                        "tradeDate": 1709596800000i64
                    }
                }]
            }
        });
        let page = SearchPage::from_response(&response, 2, 100);
        let mut out = Vec::new();

        write_summary(&page, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Found 250 trades (page 2 of 3)");
        assert_eq!(lines[1], SUMMARY_COLUMNS.join("\t"));
        assert_eq!(lines[2], "T-1\t42\tRates\t\t05-MAR-2024 UTC");
    }

    #[test]
    fn test_write_csv_unions_columns() {
        let documents = vec![
            json!({ "tradeID": "T-1", "counterparty": { "name": "Acme" } }),
            json!({ "tradeID": "T-2", "legs": [1, 2] }),
        ];
        let mut out = Vec::new();

        let written = write_csv(&documents, &mut out).unwrap();

        assert_eq!(written, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "counterparty.name,legs,tradeID");
        assert_eq!(lines[1], "Acme,,T-1");
        assert_eq!(lines[2], ",\"[1,2]\",T-2");
    }

    #[test]
    fn test_write_csv_empty() {
        let mut out = Vec::new();
        assert_eq!(write_csv(&[], &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
