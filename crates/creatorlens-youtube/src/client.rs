//! HTTP client for the YouTube Data API v3.
//!
//! Authenticates with the caller's API key as the `key` query parameter.
//! Non-2xx responses are unwrapped from Google's error envelope into
//! [`YoutubeError::Api`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::YoutubeError;
use crate::types::{Channel, ErrorResponse, ListResponse, PlaylistItem, SearchItem, Video};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_USER_AGENT: &str = "creatorlens/0.1 (social-analytics)";

/// Client for the YouTube Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production YouTube API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL, DEFAULT_USER_AGENT)
    }

    /// Creates a new client with a custom base URL and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolves a handle (with or without the leading `@`) to a channel ID
    /// via channel search. Returns `None` when the search has no hits.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::Api`] if Google answers with a non-2xx status.
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the body has an unexpected shape.
    pub async fn find_channel_id(&self, handle: &str) -> Result<Option<String>, YoutubeError> {
        let query = handle.replace('@', "");
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("q", &query),
                ("type", "channel"),
                ("maxResults", "1"),
            ],
        )?;
        let list: ListResponse<SearchItem> = self
            .request_json(&url, &format!("search(q={query})"))
            .await?;
        Ok(list.items.into_iter().next().map(|item| item.snippet.channel_id))
    }

    /// Fetches statistics, snippet and content details for one channel.
    ///
    /// # Errors
    ///
    /// Same as [`YoutubeClient::find_channel_id`].
    pub async fn get_channel(&self, channel_id: &str) -> Result<Option<Channel>, YoutubeError> {
        let url = self.build_url(
            "channels",
            &[
                ("part", "statistics,snippet,contentDetails"),
                ("id", channel_id),
            ],
        )?;
        let list: ListResponse<Channel> = self
            .request_json(&url, &format!("channels(id={channel_id})"))
            .await?;
        Ok(list.items.into_iter().next())
    }

    /// Lists up to `max_results` video IDs from a playlist, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`YoutubeClient::find_channel_id`].
    pub async fn playlist_video_ids(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<Vec<String>, YoutubeError> {
        let max = max_results.to_string();
        let url = self.build_url(
            "playlistItems",
            &[
                ("part", "contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", &max),
            ],
        )?;
        let list: ListResponse<PlaylistItem> = self
            .request_json(&url, &format!("playlistItems(playlistId={playlist_id})"))
            .await?;
        Ok(list
            .items
            .into_iter()
            .map(|item| item.content_details.video_id)
            .collect())
    }

    /// Fetches snippet and statistics for a batch of videos.
    ///
    /// An empty `video_ids` slice short-circuits without a request.
    ///
    /// # Errors
    ///
    /// Same as [`YoutubeClient::find_channel_id`].
    pub async fn get_videos(&self, video_ids: &[String]) -> Result<Vec<Video>, YoutubeError> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = video_ids.join(",");
        let url = self.build_url(
            "videos",
            &[("part", "snippet,statistics,contentDetails"), ("id", &ids)],
        )?;
        let list: ListResponse<Video> = self
            .request_json(&url, &format!("videos(count={})", video_ids.len()))
            .await?;
        Ok(list.items)
    }

    fn build_url(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(resource)
            .map_err(|e| YoutubeError::InvalidBaseUrl {
                url: format!("{}{resource}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
