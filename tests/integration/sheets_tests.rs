//! Integration tests for the Google Sheets sink
//!
//! These tests point the sink at a wiremock server standing in for the
//! Sheets v4 REST API and check the exact requests it makes.

use listing_scout::config::{Config, SheetConfig, SheetCredentials};
use listing_scout::crawler::{harvest_with, Coordinator};
use listing_scout::output::{
    ensure_header, write_batch, ColumnSchema, HeaderAction, Record, SheetsSink,
};
use listing_scout::SinkError;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER_PATH: &str = "/v4/spreadsheets/sheet-1/values/Main!1:1";
const CLEAR_PATH: &str = "/v4/spreadsheets/sheet-1/values/Main!1:1:clear";
const APPEND_PATH: &str = "/v4/spreadsheets/sheet-1/values/Main!A1:A1:append";

/// Creates a sink talking to the mock server
fn create_test_sink(server: &MockServer) -> SheetsSink {
    let config = SheetConfig {
        spreadsheet_id: Some("sheet-1".to_string()),
        api_base: server.uri(),
        ..SheetConfig::default()
    };
    let credentials = SheetCredentials {
        spreadsheet_id: "sheet-1".to_string(),
        token: "secret".to_string(),
    };
    SheetsSink::new(&config, credentials).expect("Failed to build sink")
}

fn header_response(values: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "range": "Main!A1:AF1",
        "majorDimension": "ROWS",
        "values": values,
    }))
}

/// Mounts the update and clear endpoints with call-count expectations
async fn mount_header_writes(server: &MockServer, puts: u64, clears: u64) {
    Mock::given(method("PUT"))
        .and(path(HEADER_PATH))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(puts)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(CLEAR_PATH))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(clears)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(server)
        .await;
}

/// Returns the JSON body of the single request made with `verb`
async fn sole_body(server: &MockServer, verb: &str) -> Value {
    let requests = server.received_requests().await.expect("Recording disabled");
    let matching: Vec<_> = requests
        .iter()
        .filter(|r| r.method.to_string() == verb)
        .collect();
    assert_eq!(matching.len(), 1, "expected exactly one {} request", verb);
    serde_json::from_slice(&matching[0].body).expect("Body is not JSON")
}

#[tokio::test]
async fn test_empty_sheet_gets_header_written_once() {
    let server = MockServer::start().await;

    // An empty row comes back with no `values` key at all
    Mock::given(method("GET"))
        .and(path(HEADER_PATH))
        .and(query_param("majorDimension", "ROWS"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"range": "Main!1:1", "majorDimension": "ROWS"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_header_writes(&server, 1, 0).await;

    let sink = create_test_sink(&server);
    let schema = ColumnSchema::listing();

    let action = ensure_header(&sink, &schema).await.expect("ensure_header failed");
    assert_eq!(action, HeaderAction::Written);

    let body = sole_body(&server, "PUT").await;
    assert_eq!(body["range"], "Main!1:1");
    assert_eq!(body["majorDimension"], "ROWS");

    let row = body["values"][0].as_array().expect("values[0] is an array");
    assert_eq!(row.len(), 32);
    assert_eq!(row[0], "標題");
    assert_eq!(row[31], "其他配套");

    server.verify().await;
}

#[tokio::test]
async fn test_matching_header_is_left_alone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HEADER_PATH))
        .respond_with(header_response(json!([ColumnSchema::listing().to_vec()])))
        .expect(1)
        .mount(&server)
        .await;
    mount_header_writes(&server, 0, 0).await;

    let sink = create_test_sink(&server);
    let action = ensure_header(&sink, &ColumnSchema::listing())
        .await
        .expect("ensure_header failed");

    assert_eq!(action, HeaderAction::Kept);
    server.verify().await;
}

#[tokio::test]
async fn test_stale_header_is_cleared_and_rewritten() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HEADER_PATH))
        .respond_with(header_response(json!([["標題", "連結"]])))
        .expect(1)
        .mount(&server)
        .await;
    mount_header_writes(&server, 1, 1).await;

    let sink = create_test_sink(&server);
    let action = ensure_header(&sink, &ColumnSchema::listing())
        .await
        .expect("ensure_header failed");

    assert_eq!(action, HeaderAction::Replaced);
    server.verify().await;
}

#[tokio::test]
async fn test_batch_is_appended_in_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let sink = create_test_sink(&server);
    let batch = vec![
        Record::from(vec!["A".to_string(), "https://x.example/1".to_string()]),
        Record::from(vec![
            "B".to_string(),
            "https://x.example/2".to_string(),
            r#"=HYPERLINK("https://maps.example.com", "台中")"#.to_string(),
        ]),
    ];

    let written = write_batch(&sink, &batch).await.expect("write_batch failed");
    assert_eq!(written, 2);

    let body = sole_body(&server, "POST").await;
    assert_eq!(body["range"], "Main!A1:A1");
    assert_eq!(
        body["values"],
        json!([
            ["A", "https://x.example/1"],
            [
                "B",
                "https://x.example/2",
                "=HYPERLINK(\"https://maps.example.com\", \"台中\")"
            ]
        ])
    );

    server.verify().await;
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HEADER_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
        .mount(&server)
        .await;

    let sink = create_test_sink(&server);
    let result = ensure_header(&sink, &ColumnSchema::listing()).await;

    match result {
        Err(SinkError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("PERMISSION_DENIED"));
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_harvest_into_sheet_appends_once() {
    let sheets = MockServer::start().await;
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HEADER_PATH))
        .respond_with(header_response(json!([ColumnSchema::listing().to_vec()])))
        .mount(&sheets)
        .await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&sheets)
        .await;

    for id in ["1", "2", "3"] {
        Mock::given(method("GET"))
            .and(path(format!("/build/{}", id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!(
                        r#"<html><body><h1 class="build-name">Listing {}</h1></body></html>"#,
                        id
                    ))
                    .insert_header("content-type", "text/html; charset=utf-8"),
            )
            .mount(&site)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/build/{}/detail", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&site)
            .await;
    }

    let urls: Vec<String> = ["1", "2", "3"]
        .iter()
        .map(|id| format!("{}/build/{}", site.uri(), id))
        .collect();

    let config = Config::default();
    let client = listing_scout::crawler::build_http_client(&config.crawler).unwrap();
    let coordinator = Coordinator::with_client(client, Duration::from_millis(5), "/detail");
    let sink = create_test_sink(&sheets);

    let report = harvest_with(&coordinator, &config, &sink, &urls)
        .await
        .expect("Harvest failed");

    assert_eq!(report.header, HeaderAction::Kept);
    assert_eq!(report.rows_written, 3);

    let body = sole_body(&sheets, "POST").await;
    let rows = body["values"].as_array().expect("values is an array");
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert!(row[0].as_str().unwrap_or_default().starts_with("Listing "));
    }

    sheets.verify().await;
}
