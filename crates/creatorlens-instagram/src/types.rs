//! Apify request/response shapes for the Instagram profile scraper.
//!
//! ## Observed shape of dataset items
//!
//! Each item is one profile. Fields we rely on are camelCase
//! (`followersCount`, `latestPosts`, ...). Counts can be `null`, and
//! `likesCount` is `-1` when the owner hides likes. Profiles that could not
//! be scraped come back as `{ "username": ..., "error": ... }` with no
//! counts at all, which is why nearly everything here is optional.
//!
//! Post timestamps are ISO-8601 strings in practice (`2025-03-01T18:04:05.000Z`)
//! but numeric epochs are accepted too.

use creatorlens_core::PostTimestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// `{ "data": ... }` wrapper used by every Apify v2 endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub data: T,
}

/// Lifecycle status of an actor run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Terminal statuses that will never produce a dataset.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Aborted | Self::TimedOut)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::TimingOut => "TIMING-OUT",
            Self::TimedOut => "TIMED-OUT",
            Self::Aborting => "ABORTING",
            Self::Aborted => "ABORTED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunData {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
}

/// Posts the actor scrapes per profile, independent of `results_limit`.
pub const MAX_POSTS: u32 = 100;

/// Input for `apify~instagram-profile-scraper`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileScraperInput {
    pub usernames: Vec<String>,
    pub results_limit: u32,
    pub max_posts: u32,
    pub add_parent_data: bool,
}

impl ProfileScraperInput {
    #[must_use]
    pub fn new(usernames: &[String], results_limit: u32) -> Self {
        Self {
            usernames: usernames.to_vec(),
            results_limit,
            max_posts: MAX_POSTS,
            add_parent_data: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub followers_count: Option<i64>,
    #[serde(default)]
    pub posts_count: Option<i64>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_posts: Vec<ScrapedPost>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPost {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub likes_count: Option<i64>,
    #[serde(default)]
    pub comments_count: Option<i64>,
    #[serde(default)]
    pub video_view_count: Option<i64>,
    #[serde(default)]
    pub video_play_count: Option<i64>,
    /// `"Image"`, `"Video"`, `"Sidecar"`, occasionally `"Reel"`.
    #[serde(default, rename = "type")]
    pub post_type: Option<String>,
    #[serde(default)]
    pub is_video: Option<bool>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub short_code: Option<String>,
    #[serde(default)]
    pub timestamp: Option<PostTimestamp>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
