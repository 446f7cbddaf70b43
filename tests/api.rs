use std::path::Path;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{json, Value};

use covid_dashboard::api::{self, App, AppEngine};
use covid_dashboard::model::RawRecord;
use covid_dashboard::service::source::{DataSource, SourceHandle, SourceState, StaticFeed};
use covid_dashboard::view::DateRange;

fn engine() -> AppEngine {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    api::load_templates(&dir).unwrap()
}

fn defaults() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
    )
}

fn feed() -> Vec<RawRecord> {
    vec![
        RawRecord::new("Germany", "03/01/2020", 500, 5),
        RawRecord::new("Germany", "02/01/2020", 500, 5),
        RawRecord::new("Germany", "01/01/2020", 500, 5),
        RawRecord::new("France", "03/01/2020", 300, 3),
        RawRecord::new("France", "02/01/2020", 200, 2),
        RawRecord::new("France", "01/01/2020", 100, 1),
    ]
}

async fn ready_server() -> TestServer {
    let (_task, source) = DataSource::spawn(StaticFeed::new(feed()));
    source.settled().await;

    TestServer::new(api::router(App::new(source, engine(), defaults()))).unwrap()
}

fn fixed_server(state: SourceState) -> TestServer {
    let app = App::new(SourceHandle::fixed(state), engine(), defaults());
    TestServer::new(api::router(app)).unwrap()
}

fn countries(page: &Value) -> Vec<&str> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["country"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn status_reports_the_loaded_dataset() {
    let server = ready_server().await;

    let response = server.get("/api/status").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "state": "ready", "countries": 2, "skipped": 0 }));
}

#[tokio::test]
async fn rows_cover_the_default_range() {
    let server = ready_server().await;

    let page: Value = server.get("/api/rows").await.json();

    assert_eq!(countries(&page), vec!["Germany", "France"]);
    assert_eq!(page["items"][0]["cases"], 1500);
    assert_eq!(page["items"][0]["casesOn1000"], 1.5);
    assert_eq!(page["page_size"], 20);
}

#[tokio::test]
async fn narrowed_range_diverges_from_all_time_totals() {
    let server = ready_server().await;

    let page: Value = server
        .get("/api/rows")
        .add_query_param("end", "2020-01-02")
        .await
        .json();

    assert_eq!(page["items"][0]["cases"], 1000);
    assert_eq!(page["items"][0]["totalCases"], 1500);
}

#[tokio::test]
async fn rows_apply_metric_and_country_filters() {
    let server = ready_server().await;

    let page: Value = server
        .get("/api/rows")
        .add_query_param("metric", "deaths")
        .add_query_param("min", "10")
        .add_query_param("max", "")
        .add_query_param("country", "GER")
        .await
        .json();

    assert_eq!(countries(&page), vec!["Germany"]);
}

#[tokio::test]
async fn empty_form_fields_pass_everything() {
    let server = ready_server().await;

    let mut request = server.get("/api/rows");
    for field in ["start", "end", "metric", "min", "max", "country", "page"] {
        request = request.add_query_param(field, "");
    }
    let page: Value = request.await.json();

    assert_eq!(page["total"], 2);
}

#[tokio::test]
async fn unknown_metric_is_a_bad_request() {
    let server = ready_server().await;

    let response = server.get("/api/rows").add_query_param("metric", "population").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn series_sums_shared_dates() {
    let server = ready_server().await;

    let series: Value = server.get("/api/series").await.json();

    assert_eq!(series["labels"], json!(["03/01/2020", "02/01/2020", "01/01/2020"]));
    assert_eq!(series["cases"], json!([800, 700, 600]));
    assert_eq!(series["deaths"], json!([8, 7, 6]));
}

#[tokio::test]
async fn series_for_one_country() {
    let server = ready_server().await;

    let series: Value = server
        .get("/api/series")
        .add_query_param("selected", "France")
        .add_query_param("start", "2020-01-02")
        .await
        .json();

    assert_eq!(series["cases"], json!([300, 200]));
}

#[tokio::test]
async fn groups_expose_all_time_totals() {
    let server = ready_server().await;

    let groups: Value = server.get("/api/groups").await.json();

    assert_eq!(groups[1]["country"], "France");
    assert_eq!(groups[1]["totalCases"], 600);
    assert_eq!(groups[1]["records"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn json_endpoints_wait_for_the_dataset() {
    let server = fixed_server(SourceState::Loading);

    let response = server.get("/api/rows").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    response.assert_json(&json!({ "error": "case records are still loading" }));
    server.get("/api/status").await.assert_json(&json!({ "state": "loading" }));
}

#[tokio::test]
async fn failed_fetch_is_visible() {
    let server = fixed_server(SourceState::Failed("connection refused".to_string()));

    server
        .get("/api/status")
        .await
        .assert_json(&json!({ "state": "failed", "error": "connection refused" }));
    server
        .get("/api/series")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn table_page_lists_countries() {
    let server = ready_server().await;

    let response = server.get("/").add_query_param("country", "fra").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<td>France</td>"));
    assert!(!html.contains("<td>Germany</td>"));
    assert!(html.contains("Page 1 of 1"));
}

#[tokio::test]
async fn largest_page_number_renders_an_empty_page() {
    let server = ready_server().await;

    let response = server
        .get("/")
        .add_query_param("page", usize::MAX.to_string())
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("No rows"));
    assert!(html.contains("Previous"));
    assert!(!html.contains("Next</a>"));

    let page: Value = server
        .get("/api/rows")
        .add_query_param("page", usize::MAX.to_string())
        .await
        .json();
    assert_eq!(page["items"], json!([]));
    assert_eq!(page["total"], 2);
}

#[tokio::test]
async fn table_page_shows_loading_banner() {
    let server = fixed_server(SourceState::Loading);

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("case records are still loading"));
    assert!(!html.contains("<table>"));
}

#[tokio::test]
async fn chart_page_draws_both_series() {
    let server = ready_server().await;

    let response = server.get("/chart").add_query_param("selected", "Germany").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<polyline class=\"cases\""));
    assert!(html.contains("<polyline class=\"deaths\""));
    assert!(html.contains("value=\"Germany\" selected"));
}
