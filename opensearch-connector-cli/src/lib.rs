//! # OpenSearch Connector CLI
//!
//! Command-line front end for the OpenSearch connector facade.
//!
//! This crate provides the argument definitions, connection wiring and the
//! command implementations behind the `osc` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod payload;
pub mod trades;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid command-line input.
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Error returned by the cluster or the connector.
    #[error(transparent)]
    ConnectorError(#[from] opensearch_connector::ConnectorError),

    /// JSON error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputError(msg.into())
    }
}
