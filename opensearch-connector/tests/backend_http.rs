//! HTTP-level tests for the OpenSearch backend.
//!
//! Uses wiremock to stand in for a cluster node and checks that the facade
//! sends the expected REST calls and classifies the answers.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use opensearch_connector::{ClientConfig, ConnectorError, OpenSearchClient};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `Basic base64("admin:secret")`
const AUTH_HEADER: &str = "Basic YWRtaW46c2VjcmV0";

fn config_for(server: &MockServer) -> ClientConfig {
    let address = server.address();
    ClientConfig::new(&address.ip().to_string(), "admin", "secret")
        .unwrap()
        .with_ssl(false)
        .with_port(address.port())
        .with_timeout(Duration::from_secs(2))
}

fn client_for(server: &MockServer) -> OpenSearchClient {
    OpenSearchClient::new(config_for(server)).unwrap()
}

fn unreachable_client() -> OpenSearchClient {
    let config = ClientConfig::new("127.0.0.1", "admin", "secret")
        .unwrap()
        .with_ssl(false)
        .with_port(1)
        .with_timeout(Duration::from_secs(2));
    OpenSearchClient::new(config).unwrap()
}

#[tokio::test]
async fn ping_is_true_with_valid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .and(header("authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.ping().await);
}

#[tokio::test]
async fn ping_is_false_when_credentials_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.ping().await);
}

#[tokio::test]
async fn ping_is_false_when_unreachable() {
    assert!(!unreachable_client().ping().await);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_connection_error() {
    let client = unreachable_client();

    let result = tokio::time::timeout(Duration::from_secs(10), client.get_cluster_info())
        .await
        .expect("call should not hang past the configured timeout");

    assert!(matches!(result, Err(ConnectorError::ConnectionError(_))));
}

#[tokio::test]
async fn slow_cluster_times_out_as_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "cluster_name": "slow" }))
                .set_delay(Duration::from_secs(8)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).with_timeout(Duration::from_secs(1));
    let client = OpenSearchClient::new(config).unwrap();

    let started = Instant::now();
    let result = client.get_cluster_info().await;

    assert!(matches!(result, Err(ConnectorError::ConnectionError(_))));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn cluster_info_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cluster_name": "search-my-domain",
            "version": { "distribution": "opensearch", "number": "2.13.0" }
        })))
        .mount(&server)
        .await;

    let info = client_for(&server).get_cluster_info().await.unwrap();
    assert_eq!(info["version"]["number"], "2.13.0");
}

#[tokio::test]
async fn rejected_credentials_are_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client_for(&server).get_cluster_info().await;
    assert!(matches!(result, Err(ConnectorError::AuthError(_))));
}

#[tokio::test]
async fn create_index_sends_body() {
    let server = MockServer::start().await;
    let body = json!({ "mappings": { "properties": { "title": { "type": "text" } } } });
    Mock::given(method("PUT"))
        .and(path("/articles"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "acknowledged": true,
            "shards_acknowledged": true,
            "index": "articles"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .create_index("articles", Some(&body))
        .await
        .unwrap();
    assert_eq!(ack["acknowledged"], true);
}

#[tokio::test]
async fn create_existing_index_is_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "resource_already_exists_exception" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_index("articles", None)
        .await
        .unwrap_err();

    match err {
        ConnectorError::RequestError { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("resource_already_exists_exception"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_missing_index_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "index_not_found_exception" },
            "status": 404
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).delete_index("missing").await;
    assert!(matches!(result, Err(ConnectorError::NotFound(_))));
}

#[tokio::test]
async fn refresh_index_calls_refresh_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/articles/_refresh"))
        .and(header("authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_shards": { "total": 2, "successful": 1, "failed": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).refresh_index("articles").await.unwrap();
    assert_eq!(response["_shards"]["failed"], 0);
}

#[tokio::test]
async fn refresh_missing_index_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing/_refresh"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "index_not_found_exception" },
            "status": 404
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).refresh_index("missing").await;
    assert!(matches!(result, Err(ConnectorError::NotFound(_))));
}

#[tokio::test]
async fn readable_ca_bundle_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let ca = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ca.pem");
    let config = config_for(&server).with_ca_certs(ca);

    let client = OpenSearchClient::new(config).unwrap();
    assert!(client.ping().await);
}

#[test]
fn malformed_ca_bundle_is_a_connection_error() {
    let ca = std::env::temp_dir().join(format!("osc-malformed-ca-{}.pem", std::process::id()));
    std::fs::write(
        &ca,
        "-----BEGIN CERTIFICATE-----\nnot a certificate\n-----END CERTIFICATE-----\n",
    )
    .unwrap();

    let config = ClientConfig::new("127.0.0.1", "admin", "secret")
        .unwrap()
        .with_ca_certs(&ca);
    let result = OpenSearchClient::new(config);
    std::fs::remove_file(&ca).ok();

    assert!(matches!(result, Err(ConnectorError::ConnectionError(_))));
}

#[tokio::test]
async fn index_document_without_id_lets_cluster_assign_one() {
    let server = MockServer::start().await;
    let document = json!({ "title": "AWS Guide", "content": "Getting started with AWS" });
    Mock::given(method("POST"))
        .and(path("/articles/_doc"))
        .and(body_json(&document))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": "articles",
            "_id": "k3Jx1YwBq",
            "result": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .index_document("articles", &document, None)
        .await
        .unwrap();
    assert_eq!(response["_id"], "k3Jx1YwBq");
}

#[tokio::test]
async fn index_then_get_document_by_id() {
    let server = MockServer::start().await;
    let document = json!({ "title": "Rust Tutorial" });
    Mock::given(method("PUT"))
        .and(path("/articles/_doc/article-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": "articles",
            "_id": "article-1",
            "result": "created"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles/_doc/article-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "articles",
            "_id": "article-1",
            "found": true,
            "_source": document
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .index_document("articles", &document, Some("article-1"))
        .await
        .unwrap();
    let id = response["_id"].as_str().unwrap();

    let stored = client.get_document("articles", id).await.unwrap();
    assert_eq!(stored["_source"], document);
}

#[tokio::test]
async fn get_missing_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/articles/_doc/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "articles",
            "_id": "nope",
            "found": false
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_document("articles", "nope")
        .await
        .unwrap_err();
    assert_eq!(err, ConnectorError::not_found("index=articles, id=nope"));
}

#[tokio::test]
async fn search_forwards_query_unmodified() {
    let server = MockServer::start().await;
    let query = json!({ "query": { "match": { "content": "AWS" } } });
    Mock::given(method("POST"))
        .and(path("/articles/_search"))
        .and(body_json(&query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 2,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [
                    { "_id": "a2", "_score": 0.9, "_source": { "title": "AWS Guide" } }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).search("articles", &query).await.unwrap();
    assert_eq!(response["hits"]["total"]["value"], 1);
    assert_eq!(response["hits"]["hits"][0]["_source"]["title"], "AWS Guide");
}

#[tokio::test]
async fn bulk_index_reports_per_document_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/articles/_bulk"))
        .and(body_string_contains(r#"{"index":{"_index":"articles"}}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 7,
            "errors": true,
            "items": [
                { "index": { "_index": "articles", "_id": "b1", "status": 201, "result": "created" } },
                { "index": {
                    "_index": "articles",
                    "_id": "b2",
                    "status": 400,
                    "error": {
                        "type": "mapper_parsing_exception",
                        "reason": "failed to parse field [timestamp] of type [date]"
                    }
                } },
                { "index": { "_index": "articles", "_id": "b3", "status": 201, "result": "created" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let documents = vec![
        json!({ "title": "one" }),
        json!({ "title": "two", "timestamp": "yesterday-ish" }),
        json!({ "title": "three" }),
    ];

    let summary = client_for(&server)
        .bulk_index("articles", &documents)
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.results[0].id.as_deref(), Some("b1"));
    assert!(!summary.results[1].success);
    assert_eq!(summary.results[1].status, Some(400));
}

#[tokio::test]
async fn bulk_request_failure_fails_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/articles/_bulk"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .bulk_index("articles", &[json!({ "title": "one" })])
        .await;

    assert!(matches!(
        result,
        Err(ConnectorError::RequestError { status: 500, .. })
    ));
}
