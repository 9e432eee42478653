use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use creatorlens_core::{Environment, YoutubeCompetitors};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_config(apify_base_url: &str, youtube_base_url: &str) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("socket addr"),
        log_level: "info".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        competitors_path: PathBuf::from("./config/competitors.yaml"),
        http_timeout_secs: 5,
        user_agent: "creatorlens-tests".to_string(),
        apify_base_url: apify_base_url.to_string(),
        youtube_base_url: youtube_base_url.to_string(),
        scrape_poll_interval_secs: 0,
        scrape_max_polls: 2,
        scrape_results_limit: 10,
        competitor_batch_size: 10,
        competitor_batch_delay_ms: 0,
        competitor_reel_target: 100,
    }
}

fn test_app(config: AppConfig, competitors: CompetitorsFile) -> Router {
    build_app(AppState {
        config: Arc::new(config),
        competitors: Arc::new(competitors),
    })
}

fn offline_app() -> Router {
    test_app(
        test_config("http://127.0.0.1:9", "http://127.0.0.1:9"),
        CompetitorsFile::default(),
    )
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[test]
fn api_error_serializes_detail_only() {
    let json = serde_json::to_value(ApiError::bad_request("nope")).expect("serialize");
    assert_eq!(json, json!({ "detail": "nope" }));
}

#[test]
fn api_error_keeps_status() {
    let response = ApiError::internal("boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn required_rejects_missing_and_blank_values() {
    assert!(required(None, "x is required").is_err());
    assert!(required(Some("  ".to_string()), "x is required").is_err());
    assert_eq!(
        required(Some(" natgeo ".to_string()), "x is required").expect("present"),
        "natgeo"
    );
}

#[tokio::test]
async fn health_reports_running_and_environment() {
    let response = offline_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json parse");
    assert_eq!(
        json,
        json!({ "status": "Backend running", "environment": "test" })
    );
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let response = offline_app()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
}

#[tokio::test]
async fn instagram_requires_api_key() {
    let (status, json) = send(
        offline_app(),
        post_json("/instagram/analyze", &json!({ "username": "natgeo" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "api_key is required");
}

#[tokio::test]
async fn instagram_requires_username() {
    let (status, json) = send(
        offline_app(),
        post_json("/instagram/analyze", &json!({ "api_key": "k", "username": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "username is required");
}

#[tokio::test]
async fn youtube_requires_handle() {
    let (status, json) = send(
        offline_app(),
        post_json("/youtube/analyze", &json!({ "api_key": "k" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "channel handle is required");
}

#[tokio::test]
async fn youtube_checks_api_key_before_handle() {
    let (status, json) = send(offline_app(), post_json("/youtube/analyze", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "api_key is required");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/instagram/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let (status, json) = send(offline_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn failed_instagram_scrape_is_internal_error() {
    let apify = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/acts/apify~instagram-profile-scraper/runs"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": { "id": "r1", "status": "READY" } })),
        )
        .mount(&apify)
        .await;
    Mock::given(method("GET"))
        .and(path("/acts/apify~instagram-profile-scraper/runs/r1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "id": "r1", "status": "FAILED" } })),
        )
        .mount(&apify)
        .await;

    let app = test_app(
        test_config(&apify.uri(), "http://127.0.0.1:9"),
        CompetitorsFile::default(),
    );
    let (status, json) = send(
        app,
        post_json(
            "/instagram/analyze",
            &json!({ "api_key": "k", "username": "natgeo", "date_filter": "7days" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "detail": "Could not fetch Instagram profile" }));
}

#[tokio::test]
async fn youtube_without_competitors_is_internal_error() {
    let youtube = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "giant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "snippet": { "channelId": "UCgiant" } }]
        })))
        .mount(&youtube)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "UCgiant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "UCgiant",
                "snippet": { "title": "Giant" },
                "statistics": { "subscriberCount": "900000000" }
            }]
        })))
        .mount(&youtube)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "tiny"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&youtube)
        .await;

    let competitors = CompetitorsFile {
        youtube: YoutubeCompetitors {
            handles: vec!["@tiny".to_string()],
        },
        ..CompetitorsFile::default()
    };
    let app = test_app(
        test_config("http://127.0.0.1:9", &youtube.uri()),
        competitors,
    );
    let (status, json) = send(
        app,
        post_json(
            "/youtube/analyze",
            &json!({ "api_key": "k", "handle": "@giant" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "detail": "No competitors found" }));
}
