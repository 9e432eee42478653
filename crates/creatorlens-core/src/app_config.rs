use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings. Upstream credentials are not part of it; they
/// arrive with each request.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Allowed CORS origins; a single `*` entry allows any origin.
    pub cors_origins: Vec<String>,
    pub competitors_path: PathBuf,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub apify_base_url: String,
    pub youtube_base_url: String,
    pub scrape_poll_interval_secs: u64,
    pub scrape_max_polls: u32,
    pub scrape_results_limit: u32,
    pub competitor_batch_size: usize,
    pub competitor_batch_delay_ms: u64,
    pub competitor_reel_target: usize,
}

impl AppConfig {
    #[must_use]
    pub fn scrape_poll_interval(&self) -> Duration {
        Duration::from_secs(self.scrape_poll_interval_secs)
    }

    #[must_use]
    pub fn competitor_batch_delay(&self) -> Duration {
        Duration::from_millis(self.competitor_batch_delay_ms)
    }

    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}
