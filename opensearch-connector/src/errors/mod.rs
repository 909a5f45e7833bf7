//! Error types for the OpenSearch connector.

mod connector_error;

pub use connector_error::ConnectorError;
