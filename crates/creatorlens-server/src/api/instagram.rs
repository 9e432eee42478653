use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use creatorlens_core::DateFilter;
use creatorlens_instagram::{analyze_profile, AnalysisSettings, ApifyClient, InstagramReport};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{required, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    api_key: Option<String>,
    username: Option<String>,
    date_filter: Option<String>,
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<InstagramReport>, ApiError> {
    let Json(body) = payload?;
    let api_key = required(body.api_key, "api_key is required")?;
    let username = required(body.username, "username is required")?;

    let config = &state.config;
    let client = ApifyClient::with_base_url(
        &api_key,
        config.http_timeout_secs,
        &config.apify_base_url,
        &config.user_agent,
    )?;
    let filter = DateFilter::parse(body.date_filter.as_deref(), Utc::now().naive_utc());
    let settings = AnalysisSettings::from_config(config);

    tracing::info!(request_id = %req_id.0, username, "instagram analysis started");
    let report = analyze_profile(
        &client,
        &state.competitors.instagram,
        &settings,
        &username,
        &filter,
    )
    .await
    .map_err(|e| {
        tracing::error!(request_id = %req_id.0, username, error = %e, "instagram analysis failed");
        ApiError::from(e)
    })?;

    tracing::info!(
        request_id = %req_id.0,
        username,
        competitors = report.competitor_count,
        skipped = report.skipped_competitors.len(),
        "instagram analysis finished"
    );
    Ok(Json(report))
}
