use thiserror::Error;

/// Errors returned by the YouTube client and the channel analysis.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client. The request
    /// URL is stripped since it carries the API key.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Google answered with a non-2xx status.
    #[error("YouTube API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YouTube base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The subject handle did not resolve to a channel.
    #[error("Channel not found")]
    ChannelNotFound,

    /// The subject channel reports no subscribers.
    #[error("Could not parse YouTube channel")]
    ChannelUnsummarizable,

    /// Every competitor was skipped.
    #[error("No competitors found")]
    NoCompetitors,
}

impl From<reqwest::Error> for YoutubeError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.without_url())
    }
}
