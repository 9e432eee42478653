use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use creatorlens_youtube::{analyze_channel, YoutubeClient, YoutubeReport};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{required, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    api_key: Option<String>,
    handle: Option<String>,
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<YoutubeReport>, ApiError> {
    let Json(body) = payload?;
    let api_key = required(body.api_key, "api_key is required")?;
    let handle = required(body.handle, "channel handle is required")?;

    let config = &state.config;
    let client = YoutubeClient::with_base_url(
        &api_key,
        config.http_timeout_secs,
        &config.youtube_base_url,
        &config.user_agent,
    )?;

    tracing::info!(request_id = %req_id.0, handle, "youtube analysis started");
    let report = analyze_channel(&client, &state.competitors.youtube, &handle)
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, handle, error = %e, "youtube analysis failed");
            ApiError::from(e)
        })?;

    tracing::info!(
        request_id = %req_id.0,
        handle,
        competitors = report.competitor_count,
        skipped = report.skipped_competitors.len(),
        "youtube analysis finished"
    );
    Ok(Json(report))
}
