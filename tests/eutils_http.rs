// tests/eutils_http.rs
// PubMedSource request shape and status handling against a mock E-utilities server.

use chrono::NaiveDate;
use literature_digest::ingest::providers::PubMedSource;
use literature_digest::{CandidateSource, DateWindow, RunConfig};
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn source(base: &str) -> PubMedSource {
    let cfg = RunConfig {
        email: "me@example.org".into(),
        api_key: Some("k123".into()),
        politeness_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
        ..RunConfig::default()
    };
    PubMedSource::from_config(&cfg)
        .unwrap()
        .with_base_url(format!("{base}/"))
}

#[tokio::test]
async fn search_sends_identity_and_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("term", "knee rehabilitation"))
        .and(query_param("sort", "date"))
        .and(query_param("retmode", "json"))
        .and(query_param("retmax", "60"))
        .and(query_param("datetype", "pdat"))
        .and(query_param("mindate", "2024/03/05"))
        .and(query_param("maxdate", "2026/03/05"))
        .and(query_param("api_key", "k123"))
        .and(query_param("email", "me@example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"esearchresult":{"idlist":["40100002","40100001"]}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let window = DateWindow::days_back_from(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(), 730);
    let ids = source(&server.uri())
        .search_ids("knee rehabilitation", window, 60)
        .await
        .unwrap();
    assert_eq!(ids, vec!["40100002", "40100001"]);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .and(query_param("id", "1,2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = source(&server.uri())
        .fetch_summaries(&["1".to_string(), "2".to_string()])
        .await
        .unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("esummary"), "{chain}");
    assert!(chain.contains("503"), "{chain}");
}
