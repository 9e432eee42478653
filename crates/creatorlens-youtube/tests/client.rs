//! Integration tests for `YoutubeClient` and channel analysis using wiremock
//! HTTP mocks.

use std::time::Duration;

use creatorlens_core::{SkipReason, YoutubeCompetitors};
use creatorlens_youtube::{analyze_channel, YoutubeClient, YoutubeError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 30, base_url, "creatorlens-tests")
        .expect("client construction should not fail")
}

fn competitors(handles: &[&str]) -> YoutubeCompetitors {
    YoutubeCompetitors {
        handles: handles.iter().map(ToString::to_string).collect(),
    }
}

async fn mount_search(server: &MockServer, query: &str, channel_id: Option<&str>) {
    let items: Vec<serde_json::Value> = channel_id
        .map(|id| json!({ "snippet": { "channelId": id, "title": query } }))
        .into_iter()
        .collect();
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query))
        .and(query_param("type", "channel"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

async fn mount_channel(server: &MockServer, id: &str, subscribers: u64, video_ids: &[&str]) {
    let uploads = format!("UU{id}");
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": id,
                "snippet": { "title": format!("{id} channel") },
                "statistics": {
                    "subscriberCount": subscribers.to_string(),
                    "viewCount": "0",
                    "videoCount": video_ids.len().to_string()
                },
                "contentDetails": { "relatedPlaylists": { "uploads": uploads } }
            }]
        })))
        .mount(server)
        .await;

    let playlist_items: Vec<serde_json::Value> = video_ids
        .iter()
        .map(|v| json!({ "contentDetails": { "videoId": v } }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", uploads.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": playlist_items })),
        )
        .mount(server)
        .await;

    let videos: Vec<serde_json::Value> = video_ids
        .iter()
        .map(|v| {
            json!({
                "id": v,
                "snippet": {
                    "title": format!("Unboxing {v} #tech"),
                    "description": "",
                    "publishedAt": "2025-03-01T00:00:00Z"
                },
                "statistics": { "viewCount": "1000", "likeCount": "100", "commentCount": "10" }
            })
        })
        .collect();
    if !video_ids.is_empty() {
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", video_ids.join(",").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": videos })))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn find_channel_id_strips_at_sign() {
    let server = MockServer::start().await;
    mount_search(&server, "MKBHD", Some("UCmkbhd")).await;

    let client = test_client(&server.uri());
    let id = client
        .find_channel_id("@MKBHD")
        .await
        .expect("search should succeed");

    assert_eq!(id.as_deref(), Some("UCmkbhd"));
}

#[tokio::test]
async fn get_videos_with_no_ids_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client.get_videos(&[]).await.expect("no request needed");
    assert!(videos.is_empty());
}

#[tokio::test]
async fn google_error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid." }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_channel_id("@anyone").await.unwrap_err();

    match err {
        YoutubeError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_handle_is_channel_not_found() {
    let server = MockServer::start().await;
    mount_search(&server, "nobody", None).await;

    let client = test_client(&server.uri());
    let err = analyze_channel(&client, &competitors(&["@big"]), "@nobody")
        .await
        .unwrap_err();

    assert!(matches!(err, YoutubeError::ChannelNotFound));
    assert_eq!(err.to_string(), "Channel not found");
}

#[tokio::test]
async fn analyze_channel_compares_against_larger_channels() {
    let server = MockServer::start().await;
    mount_search(&server, "subject", Some("UCsub")).await;
    mount_channel(&server, "UCsub", 1_000, &["s1", "s2"]).await;
    mount_search(&server, "big", Some("UCbig")).await;
    mount_channel(&server, "UCbig", 1_000_000, &["b1"]).await;
    mount_search(&server, "small", Some("UCsmall")).await;
    mount_channel(&server, "UCsmall", 10, &[]).await;
    mount_search(&server, "ghost", None).await;

    let client = test_client(&server.uri());
    let report = analyze_channel(&client, &competitors(&["@big", "@small", "@ghost"]), "@subject")
        .await
        .expect("analysis should succeed");

    assert_eq!(report.channel.channel_id, "UCsub");
    assert_eq!(report.channel.subscribers, 1_000);
    assert_eq!(report.channel.videos.len(), 2);
    assert_eq!(report.channel.avg_views, 1_000.0);
    // (100 + 10) / 1000 * 100
    assert_eq!(report.channel.engagement, 11.0);
    assert_eq!(report.channel.view_engagement, 11.0);
    assert_eq!(
        report.channel.videos[0].url,
        "https://www.youtube.com/watch?v=s1"
    );

    assert_eq!(report.competitor_count, 1);
    assert_eq!(report.competitors_avg.avg_views, 1_000.0);
    assert_eq!(report.competitors_avg.avg_likes, 100.0);
    // (100 + 10) / 1_000_000 * 100 = 0.011 -> 0.01
    assert_eq!(report.competitors_avg.engagement, 0.01);
    assert_eq!(report.charts.engagement_pie.values, [11.0, 0.01]);
    assert_eq!(report.charts.views_bar.labels, ["You", "Competitors"]);

    let skipped: Vec<(&str, &SkipReason)> = report
        .skipped_competitors
        .iter()
        .map(|s| (s.handle.as_str(), &s.reason))
        .collect();
    assert_eq!(
        skipped,
        vec![
            (
                "@small",
                &SkipReason::NotLargerThanSubject {
                    audience: 10,
                    subject: 1_000
                }
            ),
            ("@ghost", &SkipReason::NotFound),
        ]
    );
}

#[tokio::test]
async fn all_competitors_filtered_out_is_no_competitors() {
    let server = MockServer::start().await;
    mount_search(&server, "giant", Some("UCgiant")).await;
    mount_channel(&server, "UCgiant", 500_000_000, &["g1"]).await;
    mount_search(&server, "small", Some("UCsmall")).await;
    mount_channel(&server, "UCsmall", 10, &[]).await;

    let client = test_client(&server.uri());
    let err = analyze_channel(&client, &competitors(&["@small"]), "@giant")
        .await
        .unwrap_err();

    assert!(matches!(err, YoutubeError::NoCompetitors));
    assert_eq!(err.to_string(), "No competitors found");
}

#[tokio::test]
async fn failing_competitor_is_recorded_as_upstream_skip() {
    let server = MockServer::start().await;
    mount_search(&server, "subject", Some("UCsub")).await;
    mount_channel(&server, "UCsub", 1_000, &[]).await;
    mount_search(&server, "big", Some("UCbig")).await;
    mount_channel(&server, "UCbig", 1_000_000, &[]).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let report = analyze_channel(&client, &competitors(&["@broken", "@big"]), "@subject")
        .await
        .expect("one failing competitor should not fail the analysis");

    assert_eq!(report.competitor_count, 1);
    assert_eq!(report.skipped_competitors.len(), 1);
    assert_eq!(report.skipped_competitors[0].handle, "@broken");
    assert!(matches!(
        report.skipped_competitors[0].reason,
        SkipReason::Upstream { .. }
    ));
}

#[tokio::test]
async fn transport_failure_detail_does_not_expose_api_key() {
    let server = MockServer::start().await;
    mount_search(&server, "subject", Some("UCsub")).await;
    mount_channel(&server, "UCsub", 1_000, &[]).await;
    mount_search(&server, "big", Some("UCbig")).await;
    mount_channel(&server, "UCbig", 1_000_000, &[]).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = YoutubeClient::with_base_url("test-key", 1, &server.uri(), "creatorlens-tests")
        .expect("client construction should not fail");
    let report = analyze_channel(&client, &competitors(&["@slow", "@big"]), "@subject")
        .await
        .expect("a timed-out competitor should not fail the analysis");

    assert_eq!(report.skipped_competitors.len(), 1);
    match &report.skipped_competitors[0].reason {
        SkipReason::Upstream { detail } => {
            assert!(detail.starts_with("HTTP error"), "unexpected detail: {detail}");
            assert!(!detail.contains("key="), "detail exposes the api key: {detail}");
            assert!(!detail.contains("test-key"), "detail exposes the api key: {detail}");
        }
        other => panic!("expected Upstream skip, got {other:?}"),
    }
}
