//! Subject channel versus the configured competitor channels.

use creatorlens_core::metrics::mean;
use creatorlens_core::{SkipReason, SkippedCompetitor, YoutubeCompetitors};
use serde::Serialize;

use crate::channel::{fetch_channel, recent_videos, summarize_channel, ChannelSummary};
use crate::client::YoutubeClient;
use crate::error::YoutubeError;

const SUBJECT_VIDEOS: u32 = 15;
const COMPETITOR_VIDEOS: u32 = 10;
const CHART_LABELS: [&str; 2] = ["You", "Competitors"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorAverages {
    pub avg_views: f64,
    pub avg_likes: f64,
    pub engagement: f64,
}

/// Two-bar "you vs. competitors" series for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub labels: [&'static str; 2],
    pub values: [f64; 2],
}

impl Chart {
    fn versus(you: f64, competitors: f64) -> Self {
        Self {
            labels: CHART_LABELS,
            values: [you, competitors],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub engagement_pie: Chart,
    pub views_bar: Chart,
    pub likes_bar: Chart,
}

#[derive(Debug, Clone, Serialize)]
pub struct YoutubeReport {
    pub channel: ChannelSummary,
    pub competitors_avg: CompetitorAverages,
    pub charts: Charts,
    pub competitor_count: usize,
    pub skipped_competitors: Vec<SkippedCompetitor>,
}

/// Analyze the channel behind `handle` and compare it against every
/// configured competitor with more subscribers.
///
/// # Errors
///
/// - [`YoutubeError::ChannelNotFound`] if `handle` does not resolve.
/// - [`YoutubeError::ChannelUnsummarizable`] if the channel has no subscribers.
/// - [`YoutubeError::NoCompetitors`] if every competitor is skipped.
/// - Any client error raised while fetching the subject.
pub async fn analyze_channel(
    client: &YoutubeClient,
    competitors: &YoutubeCompetitors,
    handle: &str,
) -> Result<YoutubeReport, YoutubeError> {
    let subject = fetch_channel(client, handle)
        .await?
        .ok_or(YoutubeError::ChannelNotFound)?;
    let videos = recent_videos(client, &subject, SUBJECT_VIDEOS).await?;
    let channel = summarize_channel(&subject, &videos).map_err(|reason| {
        tracing::warn!(handle, %reason, "subject channel not summarizable");
        YoutubeError::ChannelUnsummarizable
    })?;
    tracing::info!(
        handle,
        channel_id = %channel.channel_id,
        subscribers = channel.subscribers,
        videos = channel.videos.len(),
        "subject channel summarized"
    );

    let mut included = Vec::new();
    let mut skipped = Vec::new();
    for competitor in &competitors.handles {
        match compare_competitor(client, competitor, channel.subscribers).await {
            Ok(summary) => included.push(summary),
            Err(reason) => {
                tracing::warn!(handle = %competitor, %reason, "competitor skipped");
                skipped.push(SkippedCompetitor {
                    handle: competitor.clone(),
                    reason,
                });
            }
        }
    }

    let competitors_avg = average_competitors(&included).ok_or(YoutubeError::NoCompetitors)?;
    let charts = Charts {
        engagement_pie: Chart::versus(channel.engagement, competitors_avg.engagement),
        views_bar: Chart::versus(channel.avg_views, competitors_avg.avg_views),
        likes_bar: Chart::versus(channel.avg_likes, competitors_avg.avg_likes),
    };

    Ok(YoutubeReport {
        channel,
        competitors_avg,
        charts,
        competitor_count: included.len(),
        skipped_competitors: skipped,
    })
}

async fn compare_competitor(
    client: &YoutubeClient,
    handle: &str,
    subject_subscribers: u64,
) -> Result<ChannelSummary, SkipReason> {
    let upstream = |e: YoutubeError| SkipReason::Upstream {
        detail: e.to_string(),
    };

    let channel = fetch_channel(client, handle)
        .await
        .map_err(upstream)?
        .ok_or(SkipReason::NotFound)?;

    let subscribers = channel.statistics.subscriber_count;
    if subscribers == 0 {
        return Err(SkipReason::NoAudience);
    }
    if subscribers <= subject_subscribers {
        return Err(SkipReason::NotLargerThanSubject {
            audience: subscribers,
            subject: subject_subscribers,
        });
    }

    let videos = recent_videos(client, &channel, COMPETITOR_VIDEOS)
        .await
        .map_err(upstream)?;
    summarize_channel(&channel, &videos)
}

/// Arithmetic means over the included competitors; `None` when there are none.
fn average_competitors(included: &[ChannelSummary]) -> Option<CompetitorAverages> {
    Some(CompetitorAverages {
        avg_views: mean(included.iter().map(|c| c.avg_views))?,
        avg_likes: mean(included.iter().map(|c| c.avg_likes))?,
        engagement: mean(included.iter().map(|c| c.engagement))?,
    })
}
