//! Command implementations.
//!
//! Every command talks to the cluster through the client facade and writes
//! its result to the given output, JSON pretty-printed unless noted.

use std::io::Write;

use serde_json::Value;
use tracing::{info, warn};

use crate::cli::{Commands, TradesCommand};
use crate::payload::{parse_match, read_documents, read_json_arg};
use crate::trades::{export_trades, search_trades};
use crate::CliError;
use opensearch_connector::opensearch::index_config::{article_index_settings, sample_articles};
use opensearch_connector::opensearch::queries::build_match_query;
use opensearch_connector::{ConnectorError, OpenSearchClient};

/// Run one command and close the client afterwards.
pub async fn run<W: Write>(
    command: Commands,
    client: OpenSearchClient,
    out: &mut W,
) -> Result<(), CliError> {
    let result = dispatch(command, &client, out).await;
    client.close();
    result
}

async fn dispatch<W: Write>(
    command: Commands,
    client: &OpenSearchClient,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Commands::Ping => ping(client, out).await,
        Commands::Info => print_json(out, &client.get_cluster_info().await?),
        Commands::CreateIndex { name, body } => {
            let body = body.as_deref().map(read_json_arg).transpose()?;
            print_json(out, &client.create_index(&name, body.as_ref()).await?)
        }
        Commands::DeleteIndex { name } => print_json(out, &client.delete_index(&name).await?),
        Commands::Index {
            index,
            document,
            id,
        } => {
            let document = read_json_arg(&document)?;
            let response = client
                .index_document(&index, &document, id.as_deref())
                .await?;
            print_json(out, &response)
        }
        Commands::Get { index, id } => print_json(out, &client.get_document(&index, &id).await?),
        Commands::Search {
            index,
            query,
            match_field,
        } => {
            let query = match (query, match_field) {
                (Some(query), _) => read_json_arg(&query)?,
                (None, Some(clause)) => parse_match(&clause)?,
                (None, None) => serde_json::json!({ "query": { "match_all": {} } }),
            };
            print_json(out, &client.search(&index, &query).await?)
        }
        Commands::Bulk { index, file } => bulk(client, &index, &read_documents(&file)?, out).await,
        Commands::Trades { command } => match command {
            TradesCommand::Search {
                filters,
                page,
                page_size,
            } => {
                let page = usize::try_from(page)
                    .map_err(|_| CliError::input(format!("page {} is out of range", page)))?;
                search_trades(client, &filters, page, page_size, out).await
            }
            TradesCommand::Export { filters, output } => match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    let written = export_trades(client, &filters, file).await?;
                    writeln!(out, "Exported {} trades to {}", written, path.display())?;
                    Ok(())
                }
                None => export_trades(client, &filters, &mut *out).await.map(|_| ()),
            },
        },
        Commands::Demo { index, keep } => demo(client, &index, keep, out).await,
    }
}

async fn ping<W: Write>(client: &OpenSearchClient, out: &mut W) -> Result<(), CliError> {
    if !client.ping().await {
        return Err(ConnectorError::connection(format!(
            "{} did not answer the ping",
            client.config().endpoint
        ))
        .into());
    }
    writeln!(out, "Connected to {}", client.config().endpoint)?;
    Ok(())
}

async fn bulk<W: Write>(
    client: &OpenSearchClient,
    index: &str,
    documents: &[Value],
    out: &mut W,
) -> Result<(), CliError> {
    let summary = client.bulk_index(index, documents).await?;

    for failure in summary.failures() {
        warn!(
            position = failure.position,
            status = ?failure.status,
            error = ?failure.error,
            "Document was not indexed"
        );
    }

    print_json(out, &serde_json::to_value(&summary)?)
}

/// Walk through the basic operations against a scratch article index.
async fn demo<W: Write>(
    client: &OpenSearchClient,
    index: &str,
    keep: bool,
    out: &mut W,
) -> Result<(), CliError> {
    if !client.ping().await {
        return Err(ConnectorError::connection("cluster is not reachable").into());
    }
    writeln!(out, "Connected to {}", client.config().endpoint)?;

    let info = client.get_cluster_info().await?;
    writeln!(
        out,
        "Cluster version: {}",
        info.pointer("/version/number")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    )?;

    client
        .create_index(index, Some(&article_index_settings()))
        .await?;
    writeln!(out, "Created index {}", index)?;

    let result = index_and_search_articles(client, index, out).await;

    if keep {
        return result;
    }
    match client.delete_index(index).await {
        Ok(_) => {
            result?;
            writeln!(out, "Deleted index {}", index)?;
            Ok(())
        }
        Err(e) => {
            warn!(index = %index, error = %e, "Failed to delete demo index");
            result.and(Err(e.into()))
        }
    }
}

async fn index_and_search_articles<W: Write>(
    client: &OpenSearchClient,
    index: &str,
    out: &mut W,
) -> Result<(), CliError> {
    for article in sample_articles() {
        let response = client.index_document(index, &article, None).await?;
        info!(id = %response["_id"], "Indexed sample article");
    }
    client.refresh_index(index).await?;

    let results = client
        .search(index, &build_match_query("content", "AWS"))
        .await?;
    let hits = results
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    writeln!(out, "Found {} articles about AWS:", hits.len())?;
    for hit in &hits {
        writeln!(
            out,
            "  - {}",
            hit.pointer("/_source/title")
                .and_then(Value::as_str)
                .unwrap_or("(untitled)")
        )?;
    }
    Ok(())
}

fn print_json<W: Write>(out: &mut W, value: &Value) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
