use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Instagram handles compared against subjects with at least `min_followers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerTier {
    pub min_followers: u64,
    pub handles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramCompetitors {
    pub tiers: Vec<FollowerTier>,
}

impl InstagramCompetitors {
    /// Handles of the highest tier whose threshold `followers` reaches.
    #[must_use]
    pub fn for_followers(&self, followers: u64) -> &[String] {
        self.tiers
            .iter()
            .filter(|tier| followers >= tier.min_followers)
            .max_by_key(|tier| tier.min_followers)
            .map(|tier| tier.handles.as_slice())
            .unwrap_or_default()
    }
}

impl Default for InstagramCompetitors {
    fn default() -> Self {
        let tier = |min_followers: u64, handles: [&str; 3]| FollowerTier {
            min_followers,
            handles: handles.iter().map(ToString::to_string).collect(),
        };
        Self {
            tiers: vec![
                tier(1_000_000, ["leoniehanne", "aimeesong", "hudabeauty"]),
                tier(100_000, ["stylebook", "fashiongoalsz", "beautyblogger"]),
                tier(0, ["lifestyleblogger", "fashionista", "styleinspo"]),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoutubeCompetitors {
    pub handles: Vec<String>,
}

impl Default for YoutubeCompetitors {
    fn default() -> Self {
        Self {
            handles: [
                "@MrBeast",
                "@MKBHD",
                "@LinusTechTips",
                "@MrWhosetheboss",
                "@TechnicalGuruji",
                "@TrakinTech",
                "@Beebom",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorsFile {
    #[serde(default)]
    pub instagram: InstagramCompetitors,
    #[serde(default)]
    pub youtube: YoutubeCompetitors,
}

/// Why a competitor did not make it into a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The upstream had no account for the handle.
    NotFound,
    /// The account reports zero followers/subscribers.
    NoAudience,
    /// The account is not larger than the subject.
    NotLargerThanSubject { audience: u64, subject: u64 },
    /// The scrape job ended without results.
    ScrapeIncomplete { detail: String },
    /// The upstream call failed outright.
    Upstream { detail: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "not found"),
            SkipReason::NoAudience => write!(f, "no followers"),
            SkipReason::NotLargerThanSubject { audience, subject } => {
                write!(f, "audience {audience} does not exceed subject's {subject}")
            }
            SkipReason::ScrapeIncomplete { detail } => write!(f, "scrape incomplete: {detail}"),
            SkipReason::Upstream { detail } => write!(f, "upstream error: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCompetitor {
    pub handle: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Load and validate competitor lists from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_competitors(path: &Path) -> Result<CompetitorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CompetitorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let competitors: CompetitorsFile = serde_yaml::from_str(&content)?;
    validate_competitors(&competitors)?;

    Ok(competitors)
}

/// Like [`load_competitors`], but a missing file yields the built-in lists.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but is unreadable or invalid.
pub fn load_competitors_or_default(path: &Path) -> Result<CompetitorsFile, ConfigError> {
    if path.exists() {
        load_competitors(path)
    } else {
        Ok(CompetitorsFile::default())
    }
}

fn validate_competitors(competitors: &CompetitorsFile) -> Result<(), ConfigError> {
    let tiers = &competitors.instagram.tiers;
    if !tiers.iter().any(|t| t.min_followers == 0) {
        return Err(ConfigError::Validation(
            "instagram tiers must include a tier with min_followers: 0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for tier in tiers {
        if !seen.insert(tier.min_followers) {
            return Err(ConfigError::Validation(format!(
                "duplicate instagram tier for min_followers {}",
                tier.min_followers
            )));
        }
        validate_handles(&format!("instagram tier {}", tier.min_followers), &tier.handles)?;
    }

    validate_handles("youtube", &competitors.youtube.handles)
}

fn validate_handles(context: &str, handles: &[String]) -> Result<(), ConfigError> {
    if handles.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{context} must list at least one handle"
        )));
    }
    if handles.iter().any(|h| h.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{context} contains a blank handle"
        )));
    }
    Ok(())
}
