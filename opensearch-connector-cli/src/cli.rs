//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use opensearch_connector::config::parse_bool_value;

#[derive(Parser, Debug)]
#[command(name = "osc")]
#[command(about = "Talk to an OpenSearch cluster through the connector facade", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Connection settings, each with an environment variable fallback.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// OpenSearch endpoint (e.g. search-domain.us-east-1.es.amazonaws.com)
    #[arg(long, env = "OPENSEARCH_HOST", global = true)]
    pub host: Option<String>,

    /// Port number
    #[arg(long, env = "OPENSEARCH_PORT", default_value_t = 443, global = true)]
    pub port: u16,

    /// Basic auth username
    #[arg(long, env = "OPENSEARCH_USERNAME", default_value = "admin", global = true)]
    pub username: String,

    /// Basic auth password
    #[arg(long, env = "OPENSEARCH_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Connect over https
    #[arg(long, env = "OPENSEARCH_USE_SSL", default_value_t = true, action = ArgAction::Set, value_parser = parse_flag, global = true)]
    pub use_ssl: bool,

    /// Validate the server certificate
    #[arg(long, env = "OPENSEARCH_VERIFY_CERTS", default_value_t = true, action = ArgAction::Set, value_parser = parse_flag, global = true)]
    pub verify_certs: bool,

    /// PEM bundle of CA certificates
    #[arg(long, env = "OPENSEARCH_CA_CERTS", global = true)]
    pub ca_certs: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "OPENSEARCH_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Documents per bulk request
    #[arg(long, env = "OPENSEARCH_BULK_CHUNK_SIZE", default_value_t = 500, global = true)]
    pub bulk_chunk_size: usize,
}

/// Boolean flag values, parsed the same way as the `OPENSEARCH_*` settings.
fn parse_flag(value: &str) -> Result<bool, String> {
    parse_bool_value(value)
        .ok_or_else(|| format!("expected true/false, 1/0 or yes/no, got {:?}", value))
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the cluster is reachable and accepts the credentials
    Ping,
    /// Print cluster information
    Info,
    /// Create an index
    CreateIndex {
        name: String,
        /// Settings and mappings as JSON, or @path to a JSON file
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete an index
    DeleteIndex { name: String },
    /// Index a single document
    Index {
        index: String,
        /// Document as JSON, or @path to a JSON file
        #[arg(long)]
        document: String,
        /// Document id (assigned by the cluster when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// Fetch a document by id
    Get { index: String, id: String },
    /// Run a search
    Search {
        index: String,
        /// Search body as JSON, or @path to a JSON file
        #[arg(long, conflicts_with = "match_field")]
        query: Option<String>,
        /// Shorthand for a match query, as field=value
        #[arg(long = "match")]
        match_field: Option<String>,
    },
    /// Index many documents from a JSON array or NDJSON file
    Bulk {
        index: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Search and export trades
    Trades {
        #[command(subcommand)]
        command: TradesCommand,
    },
    /// Create an index, index sample articles, search them and clean up
    Demo {
        #[arg(long, default_value = "articles")]
        index: String,
        /// Leave the index in place afterwards
        #[arg(long)]
        keep: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TradesCommand {
    /// Show one page of matching trades
    Search {
        #[command(flatten)]
        filters: TradeFilterArgs,
        /// 1-based page number
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,
        #[arg(long, default_value_t = 100)]
        page_size: usize,
    },
    /// Write all matching trades (up to 10000) as CSV
    Export {
        #[command(flatten)]
        filters: TradeFilterArgs,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TradeFilterArgs {
    /// Index holding the trades
    #[arg(long, env = "OPENSEARCH_INDEX", default_value = "trades")]
    pub index: String,
    #[arg(long, default_value = "A")]
    pub region: String,
    #[arg(long, default_value = "A")]
    pub business_area: String,
    #[arg(long, default_value = "A")]
    pub data_source: String,
    /// First trade date, YYYY-MM-DD
    #[arg(long)]
    pub from: String,
    /// Last trade date, YYYY-MM-DD
    #[arg(long)]
    pub to: String,
}
