//! Parsing of JSON payloads given on the command line.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::CliError;
use opensearch_connector::opensearch::queries::build_match_query;

/// Parse a JSON argument. A leading `@` names a file to read instead.
pub fn read_json_arg(arg: &str) -> Result<Value, CliError> {
    let text = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => arg.to_string(),
    };
    Ok(serde_json::from_str(&text)?)
}

/// Read documents from a file holding either a JSON array or one JSON document per line.
pub fn read_documents(path: &Path) -> Result<Vec<Value>, CliError> {
    parse_documents(&fs::read_to_string(path)?)
}

/// Parse a JSON array or NDJSON text into documents. Blank lines are skipped.
pub fn parse_documents(text: &str) -> Result<Vec<Value>, CliError> {
    if text.trim_start().starts_with('[') {
        return match serde_json::from_str(text)? {
            Value::Array(documents) => Ok(documents),
            _ => Err(CliError::input("expected a JSON array of documents")),
        };
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| CliError::input(format!("line {}: {}", n + 1, e)))
        })
        .collect()
}

/// Turn `field=value` into a match query.
pub fn parse_match(arg: &str) -> Result<Value, CliError> {
    match arg.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok(build_match_query(field.trim(), value))
        }
        _ => Err(CliError::input(format!(
            "expected field=value, got {:?}",
            arg
        ))),
    }
}
