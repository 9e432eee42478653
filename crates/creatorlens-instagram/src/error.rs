use thiserror::Error;

/// Errors returned by the Apify client and the profile analysis.
#[derive(Debug, Error)]
pub enum InstagramError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Apify answered with a non-2xx status.
    #[error("Apify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Apify base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("run {run_id} succeeded without a default dataset")]
    MissingDataset { run_id: String },

    /// The subject's scrape failed, timed out, or returned nothing.
    #[error("Could not fetch Instagram profile")]
    ProfileUnavailable,

    /// The subject's profile could not be summarized (e.g. zero followers).
    #[error("Could not parse Instagram profile")]
    ProfileUnsummarizable,
}
