//! HTTP client for the Apify v2 REST API.
//!
//! Only the three calls a profile scrape needs are exposed: start an actor
//! run, read a run's status, and fetch the items of its default dataset.
//! Every request authenticates with the caller-supplied token as a bearer
//! credential.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;

use crate::error::InstagramError;
use crate::types::{ApiEnvelope, ProfileScraperInput, RunData};

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";
const DEFAULT_USER_AGENT: &str = "creatorlens/0.1 (social-analytics)";

/// Actor slug for `apify/instagram-profile-scraper`.
const PROFILE_SCRAPER: &str = "apify~instagram-profile-scraper";

/// Client for the Apify REST API.
///
/// Use [`ApifyClient::new`] for production or [`ApifyClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl ApifyClient {
    /// Creates a new client pointed at the production Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`InstagramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, InstagramError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL, DEFAULT_USER_AGENT)
    }

    /// Creates a new client with a custom base URL and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`InstagramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`InstagramError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, InstagramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash makes `Url::join` append below `/v2` instead of
        // replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| InstagramError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
        })
    }

    /// Starts a profile-scraper run for `usernames`. Returns immediately
    /// with the run metadata.
    ///
    /// # Errors
    ///
    /// - [`InstagramError::Api`] if Apify answers with a non-2xx status.
    /// - [`InstagramError::Http`] on network failure.
    /// - [`InstagramError::Deserialize`] if the body is not a run envelope.
    pub async fn start_profile_run(
        &self,
        usernames: &[String],
        results_limit: u32,
    ) -> Result<RunData, InstagramError> {
        let input = ProfileScraperInput::new(usernames, results_limit);
        let url = self.endpoint(&format!("acts/{PROFILE_SCRAPER}/runs"))?;
        let envelope: ApiEnvelope<RunData> = self
            .request_json(Method::POST, url, Some(&input), "start profile run")
            .await?;
        Ok(envelope.data)
    }

    /// Reads the current state of a profile-scraper run.
    ///
    /// # Errors
    ///
    /// Same as [`ApifyClient::start_profile_run`].
    pub async fn get_profile_run(&self, run_id: &str) -> Result<RunData, InstagramError> {
        let url = self.endpoint(&format!("acts/{PROFILE_SCRAPER}/runs/{run_id}"))?;
        let envelope: ApiEnvelope<RunData> = self
            .request_json::<_, ()>(Method::GET, url, None, &format!("run {run_id}"))
            .await?;
        Ok(envelope.data)
    }

    /// Fetches the raw items of a dataset.
    ///
    /// Items are returned undecoded so one malformed record does not sink
    /// the whole batch.
    ///
    /// # Errors
    ///
    /// Same as [`ApifyClient::start_profile_run`].
    pub async fn dataset_items(
        &self,
        dataset_id: &str,
    ) -> Result<Vec<serde_json::Value>, InstagramError> {
        let mut url = self.endpoint(&format!("datasets/{dataset_id}/items"))?;
        url.query_pairs_mut().append_pair("format", "json");
        self.request_json::<_, ()>(Method::GET, url, None, &format!("dataset {dataset_id}"))
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, InstagramError> {
        self.base_url
            .join(path)
            .map_err(|e| InstagramError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn request_json<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        context: &str,
    ) -> Result<T, InstagramError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(InstagramError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| InstagramError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
