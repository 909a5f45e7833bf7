use std::error::Error;
use std::io;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use opensearch_connector_cli::cli::Cli;
use opensearch_connector_cli::commands;
use opensearch_connector_cli::Dependencies;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match Dependencies::new(&cli.connection) {
        Ok(deps) => commands::run(cli.command, deps.client, &mut io::stdout().lock()).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {}", err);
            source = err.source();
        }

        std::process::exit(1);
    }
}
