//! Index settings and mappings shipped with the connector.
//!
//! This module defines the mapping used by the article index that the demo
//! flow creates, searches and removes.

use serde_json::{json, Value};

/// The name of the demo article index.
pub const ARTICLES_INDEX: &str = "articles";

/// Get the settings and mappings for the article index.
///
/// - **text**: `title` and `content`, analyzed for full-text matching
/// - **date**: `timestamp`, for range filters
pub fn article_index_settings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "title": {
                    "type": "text"
                },
                "content": {
                    "type": "text"
                },
                "timestamp": {
                    "type": "date"
                }
            }
        }
    })
}

/// Sample articles indexed by the demo flow.
pub fn sample_articles() -> Vec<Value> {
    vec![
        json!({ "title": "Rust Tutorial", "content": "Learn Rust basics" }),
        json!({ "title": "AWS Guide", "content": "Getting started with AWS" }),
        json!({ "title": "OpenSearch Deep Dive", "content": "Advanced OpenSearch features" }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_index_settings_structure() {
        let settings = article_index_settings();
        let properties = &settings["mappings"]["properties"];

        assert_eq!(properties["title"]["type"], "text");
        assert_eq!(properties["content"]["type"], "text");
        assert_eq!(properties["timestamp"]["type"], "date");
    }

    #[test]
    fn test_sample_articles_are_objects() {
        let articles = sample_articles();
        assert_eq!(articles.len(), 3);
        assert!(articles.iter().all(Value::is_object));
    }
}
