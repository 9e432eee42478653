//! Channel summaries built from channel statistics and recent uploads.

use creatorlens_core::metrics::{as_f64, engagement_rate, mean};
use creatorlens_core::{classify, extract_hashtags, SkipReason, Topic};
use serde::Serialize;

use crate::client::YoutubeClient;
use crate::error::YoutubeError;
use crate::types::{Channel, Video};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRecord {
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub hashtags: Vec<String>,
    pub topic: Topic,
    pub url: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub channel_id: String,
    pub channel_name: String,
    pub subscribers: u64,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    /// Interactions per subscriber, in percent.
    pub engagement: f64,
    /// Interactions per average view, in percent.
    pub view_engagement: f64,
    pub videos: Vec<VideoRecord>,
}

impl From<&Video> for VideoRecord {
    fn from(video: &Video) -> Self {
        let text = format!("{} {}", video.snippet.title, video.snippet.description);
        let hashtags = extract_hashtags(&text);
        let topic = classify(&video.snippet.title, &hashtags);
        Self {
            title: video.snippet.title.clone(),
            views: video.statistics.view_count,
            likes: video.statistics.like_count,
            comments: video.statistics.comment_count,
            hashtags,
            topic,
            url: format!("https://www.youtube.com/watch?v={}", video.id),
            published_at: video.snippet.published_at.clone(),
        }
    }
}

/// Summarize a channel over the given videos.
///
/// # Errors
///
/// Returns [`SkipReason::NoAudience`] when the channel reports no subscribers.
pub fn summarize_channel(
    channel: &Channel,
    videos: &[Video],
) -> Result<ChannelSummary, SkipReason> {
    let subscribers = channel.statistics.subscriber_count;
    if subscribers == 0 {
        return Err(SkipReason::NoAudience);
    }

    let records: Vec<VideoRecord> = videos.iter().map(VideoRecord::from).collect();
    let average = |f: fn(&VideoRecord) -> u64| {
        mean(records.iter().map(|r| as_f64(f(r)))).unwrap_or(0.0)
    };
    let avg_views = average(|r: &VideoRecord| r.views);
    let avg_likes = average(|r: &VideoRecord| r.likes);
    let avg_comments = average(|r: &VideoRecord| r.comments);

    Ok(ChannelSummary {
        channel_id: channel.id.clone(),
        channel_name: channel.snippet.title.clone(),
        subscribers,
        avg_views,
        avg_likes,
        avg_comments,
        engagement: engagement_rate(avg_likes, avg_comments, as_f64(subscribers)),
        view_engagement: engagement_rate(avg_likes, avg_comments, avg_views),
        videos: records,
    })
}

/// Recent uploads of `channel`, newest first. A channel without an uploads
/// playlist has no videos.
///
/// # Errors
///
/// Propagates any [`YoutubeError`] from the playlist or video lookups.
pub async fn recent_videos(
    client: &YoutubeClient,
    channel: &Channel,
    max_videos: u32,
) -> Result<Vec<Video>, YoutubeError> {
    let Some(playlist) = channel.uploads_playlist() else {
        tracing::debug!(channel_id = %channel.id, "channel exposes no uploads playlist");
        return Ok(Vec::new());
    };
    let ids = client.playlist_video_ids(playlist, max_videos).await?;
    client.get_videos(&ids).await
}

/// Resolve `handle` and fetch its channel record, or `None` when the handle
/// does not resolve.
///
/// # Errors
///
/// Propagates any [`YoutubeError`] from the search or channel lookups.
pub async fn fetch_channel(
    client: &YoutubeClient,
    handle: &str,
) -> Result<Option<Channel>, YoutubeError> {
    let Some(channel_id) = client.find_channel_id(handle).await? else {
        return Ok(None);
    };
    client.get_channel(&channel_id).await
}
