//! Integration tests for the harvester
//!
//! These tests use wiremock to serve listing and detail pages and test the
//! full harvest cycle end-to-end against an in-memory sink.

use listing_scout::config::Config;
use listing_scout::crawler::{harvest, Coordinator};
use listing_scout::output::{ColumnSchema, HeaderAction, MemorySink, SinkCall};
use listing_scout::ScoutError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short launch delay
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.launch_delay_ms = 10;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn listing_page(name: &str, price: &str) -> ResponseTemplate {
    html(&format!(
        r#"<h1 class="build-name">{name}</h1>
           <div class="build-price"><span class="price">{price}</span></div>
           <div class="intro-info">
             <div class="info-item"><p><span class="label">格局</span><span class="value">3房</span></p></div>
             <div class="info-item"><a title="基地地址" href="//maps.example.com/{name}">台中市</a></div>
           </div>
           <ul class="community-plan-container">
             <li class="list-item"><p>公設比</p><div>32%</div></li>
           </ul>"#
    ))
}

fn detail_page(station: &str) -> ResponseTemplate {
    html(&format!(
        r#"<div class="sub-detail-item anchor-nav-item"><h3>交通出行</h3>
             <ul><li><p>{station}</p></li></ul></div>
           <div class="sub-detail-item anchor-nav-item"><h3>建材說明</h3>
             <ul><li><p>ignored</p></li></ul></div>"#
    ))
}

/// Mounts a listing page and its detail page under `/build/{id}`
async fn mount_listing(server: &MockServer, id: &str, name: &str, station: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/build/{}", id)))
        .respond_with(listing_page(name, "55"))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/build/{}/detail", id)))
        .respond_with(detail_page(station))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_two_listings() {
    let server = MockServer::start().await;
    mount_listing(&server, "1", "Alpha", "捷運A站").await;
    mount_listing(&server, "2", "Beta", "捷運B站").await;

    let base = server.uri();
    let urls = vec![
        format!("{}/build/1?utm_source=feed", base),
        format!("{}/build/2", base),
    ];

    let config = create_test_config();
    let sink = MemorySink::new();

    let report = harvest(&config, &sink, &urls).await.expect("Harvest failed");

    assert_eq!(report.header, HeaderAction::Written);
    assert_eq!(report.rows_written, 2);

    // Header written once, rows appended once, all together
    assert_eq!(
        sink.calls(),
        vec![
            SinkCall::ReadHeader,
            SinkCall::WriteHeader(32),
            SinkCall::AppendRows(2)
        ]
    );
    assert_eq!(sink.header(), ColumnSchema::listing().to_vec());

    // Completion order is not input order; look rows up by name
    let rows = sink.rows();
    assert_eq!(rows.len(), 2);

    let alpha = rows.iter().find(|r| r[0] == "Alpha").expect("Alpha row");
    assert_eq!(
        alpha,
        &vec![
            "Alpha".to_string(),
            format!("{}/build/1", base),
            "55".to_string(),
            "3房".to_string(),
            r#"=HYPERLINK("https://maps.example.com/Alpha", "台中市")"#.to_string(),
            "公設比".to_string(),
            "32%".to_string(),
            "捷運A站".to_string(),
        ]
    );

    let beta = rows.iter().find(|r| r[0] == "Beta").expect("Beta row");
    assert_eq!(beta[1], format!("{}/build/2", base));
    assert_eq!(beta.last().map(String::as_str), Some("捷運B站"));

    server.verify().await;
}

#[tokio::test]
async fn test_blank_urls_are_skipped() {
    let server = MockServer::start().await;
    mount_listing(&server, "3", "Gamma", "高鐵站").await;

    let urls = vec![
        "   ".to_string(),
        format!("{}/build/3", server.uri()),
        String::new(),
    ];

    let config = create_test_config();
    let sink = MemorySink::new();

    let report = harvest(&config, &sink, &urls).await.expect("Harvest failed");

    assert_eq!(report.rows_written, 1);
    assert_eq!(sink.rows().len(), 1);
    assert_eq!(sink.rows()[0][0], "Gamma");
}

#[tokio::test]
async fn test_existing_header_is_kept() {
    let server = MockServer::start().await;
    mount_listing(&server, "4", "Delta", "台鐵站").await;

    let config = create_test_config();
    let sink = MemorySink::with_header(ColumnSchema::listing().to_vec());

    let report = harvest(&config, &sink, &[format!("{}/build/4", server.uri())])
        .await
        .expect("Harvest failed");

    assert_eq!(report.header, HeaderAction::Kept);
    assert_eq!(
        sink.calls(),
        vec![SinkCall::ReadHeader, SinkCall::AppendRows(1)]
    );
}

#[tokio::test]
async fn test_unreachable_listing_aborts_without_append() {
    let server = MockServer::start().await;

    // No call-count expectations: the healthy worker may be aborted mid-way
    Mock::given(method("GET"))
        .and(path("/build/5"))
        .respond_with(listing_page("Epsilon", "55"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/build/5/detail"))
        .respond_with(detail_page("站"))
        .mount(&server)
        .await;

    // Nothing listens on port 1, so this listing cannot be fetched at all
    let urls = vec![
        format!("{}/build/5", server.uri()),
        "http://127.0.0.1:1/build/6".to_string(),
    ];

    let config = create_test_config();
    let sink = MemorySink::new();

    let result = harvest(&config, &sink, &urls).await;

    assert!(matches!(result, Err(ScoutError::Http { .. })));
    assert!(sink.rows().is_empty());
    assert!(!sink
        .calls()
        .iter()
        .any(|call| matches!(call, SinkCall::AppendRows(_))));
}

#[tokio::test]
async fn test_error_detail_page_still_appends_listing() {
    let server = MockServer::start().await;
    mount_listing(&server, "10", "Kappa", "捷運K站").await;

    Mock::given(method("GET"))
        .and(path("/build/11"))
        .respond_with(listing_page("Lambda", "61"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/build/11/detail"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html><body>gone</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/build/10", server.uri()),
        format!("{}/build/11", server.uri()),
    ];

    let config = create_test_config();
    let sink = MemorySink::new();

    let report = harvest(&config, &sink, &urls).await.expect("Harvest failed");

    assert_eq!(report.rows_written, 2);
    assert_eq!(
        sink.calls(),
        vec![
            SinkCall::ReadHeader,
            SinkCall::WriteHeader(32),
            SinkCall::AppendRows(2)
        ]
    );

    let rows = sink.rows();
    let lambda = rows.iter().find(|r| r[0] == "Lambda").expect("Lambda row");
    assert_eq!(lambda.last().map(String::as_str), Some("32%"));

    let kappa = rows.iter().find(|r| r[0] == "Kappa").expect("Kappa row");
    assert_eq!(kappa.last().map(String::as_str), Some("捷運K站"));

    server.verify().await;
}

#[tokio::test]
async fn test_workers_run_concurrently() {
    let server = MockServer::start().await;

    // Each page takes 300ms; three sequential listings would need 1.8s
    for id in ["7", "8", "9"] {
        Mock::given(method("GET"))
            .and(path(format!("/build/{}", id)))
            .respond_with(listing_page(id, "1").set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/build/{}/detail", id)))
            .respond_with(detail_page(id).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
    }

    let urls: Vec<String> = ["7", "8", "9"]
        .iter()
        .map(|id| format!("{}/build/{}", server.uri(), id))
        .collect();

    let client = listing_scout::crawler::build_http_client(&create_test_config().crawler).unwrap();
    let coordinator = Coordinator::with_client(client, Duration::from_millis(10), "/detail");

    let start = std::time::Instant::now();
    let batch = coordinator.run(&urls).await.expect("Crawl failed");

    assert_eq!(batch.len(), 3);
    assert!(
        start.elapsed() < Duration::from_millis(1500),
        "crawl took {:?}",
        start.elapsed()
    );
}
