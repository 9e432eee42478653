//! Shared configuration and pure analytics helpers for creatorlens.

pub mod app_config;
pub mod competitors;
mod config;
pub mod date_filter;
pub mod metrics;
pub mod topic;

pub use app_config::{AppConfig, Environment};
pub use competitors::{
    load_competitors, load_competitors_or_default, CompetitorsFile, FollowerTier,
    InstagramCompetitors, SkipReason, SkippedCompetitor, YoutubeCompetitors,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use date_filter::{filter_posts, DateFilter, DateRange, Placement, PostTimestamp, Timestamped};
pub use topic::{classify, extract_hashtags, Topic};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read competitors file {path}: {source}")]
    CompetitorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse competitors file: {0}")]
    CompetitorsFileParse(#[from] serde_yaml::Error),

    #[error("competitors validation error: {0}")]
    Validation(String),
}
