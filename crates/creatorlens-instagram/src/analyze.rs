//! Subject profile plus tiered competitor comparison.

use std::time::Duration;

use creatorlens_core::{
    AppConfig, DateFilter, DateRange, InstagramCompetitors, SkipReason, SkippedCompetitor,
};
use serde::Serialize;

use crate::client::ApifyClient;
use crate::error::InstagramError;
use crate::profile::{summarize_profile, ProfileSummary};
use crate::run::{scrape_profiles, PollPolicy, RunOutcome};
use crate::types::ScrapedProfile;

/// Knobs for one analysis; see [`AnalysisSettings::from_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub poll: PollPolicy,
    pub results_limit: u32,
    pub batch_size: usize,
    pub batch_delay: Duration,
    /// Stop scraping competitors once this many top reels are collected.
    pub reel_target: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            poll: PollPolicy::default(),
            results_limit: 100,
            batch_size: 10,
            batch_delay: Duration::from_secs(3),
            reel_target: 100,
        }
    }
}

impl AnalysisSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            poll: PollPolicy::from_config(config),
            results_limit: config.scrape_results_limit,
            batch_size: config.competitor_batch_size,
            batch_delay: config.competitor_batch_delay(),
            reel_target: config.competitor_reel_target,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InstagramReport {
    pub user_profile: ProfileSummary,
    pub competitors: Vec<ProfileSummary>,
    pub competitor_count: usize,
    pub total_reels_collected: usize,
    /// The window actually applied, `null` when nothing was filtered.
    pub date_range: Option<DateRange>,
    pub skipped_competitors: Vec<SkippedCompetitor>,
}

/// Analyze `username` and compare it against larger accounts from the
/// matching follower tier.
///
/// # Errors
///
/// - [`InstagramError::ProfileUnavailable`] if the subject's scrape does not
///   succeed or returns no profile.
/// - [`InstagramError::ProfileUnsummarizable`] if the subject has no followers.
/// - Any client error raised while scraping the subject.
///
/// Competitor failures never fail the analysis; they are reported in
/// `skipped_competitors`.
pub async fn analyze_profile(
    client: &ApifyClient,
    tiers: &InstagramCompetitors,
    settings: &AnalysisSettings,
    username: &str,
    filter: &DateFilter,
) -> Result<InstagramReport, InstagramError> {
    if let DateFilter::Unrecognized { input, reason } = filter {
        tracing::warn!(input, reason, "ignoring unrecognized date filter");
    }
    let range = filter.range();

    let subject = match scrape_profiles(
        client,
        &[username.to_string()],
        settings.results_limit,
        settings.poll,
    )
    .await?
    {
        RunOutcome::Succeeded(profiles) => profiles
            .into_iter()
            .next()
            .ok_or(InstagramError::ProfileUnavailable)?,
        other => {
            tracing::warn!(username, outcome = %other.describe(), "subject scrape did not succeed");
            return Err(InstagramError::ProfileUnavailable);
        }
    };

    let user_profile = summarize_profile(subject, range).map_err(|reason| {
        tracing::warn!(username, %reason, "subject profile not summarizable");
        InstagramError::ProfileUnsummarizable
    })?;

    let handles = tiers.for_followers(user_profile.followers);
    tracing::info!(
        username,
        followers = user_profile.followers,
        candidates = handles.len(),
        "comparing against competitor tier"
    );

    let mut competitors = Vec::new();
    let mut skipped = Vec::new();
    let mut total_reels_collected = 0;

    for (index, batch) in handles.chunks(settings.batch_size.max(1)).enumerate() {
        if index > 0 {
            tokio::time::sleep(settings.batch_delay).await;
        }

        let outcome =
            scrape_profiles(client, batch, settings.results_limit, settings.poll).await;
        let profiles = match outcome {
            Ok(RunOutcome::Succeeded(profiles)) => profiles,
            Ok(other) => {
                let detail = other.describe();
                tracing::warn!(batch = index, %detail, "competitor batch incomplete");
                skip_all(&mut skipped, batch, &SkipReason::ScrapeIncomplete { detail });
                continue;
            }
            Err(e) => {
                tracing::warn!(batch = index, error = %e, "competitor batch failed");
                let reason = SkipReason::Upstream {
                    detail: e.to_string(),
                };
                skip_all(&mut skipped, batch, &reason);
                continue;
            }
        };

        for (handle, result) in compare_batch(batch, profiles, user_profile.followers, range) {
            match result {
                Ok(summary) => {
                    total_reels_collected += summary.top_reels.len();
                    competitors.push(summary);
                }
                Err(reason) => {
                    tracing::debug!(handle, %reason, "competitor skipped");
                    skipped.push(SkippedCompetitor { handle, reason });
                }
            }
        }

        if total_reels_collected >= settings.reel_target {
            tracing::info!(total_reels_collected, "reel target reached");
            break;
        }
    }

    Ok(InstagramReport {
        competitor_count: competitors.len(),
        user_profile,
        competitors,
        total_reels_collected,
        date_range: range.copied(),
        skipped_competitors: skipped,
    })
}

/// Match each requested handle to its scraped profile and keep the ones
/// strictly larger than the subject.
fn compare_batch(
    handles: &[String],
    mut profiles: Vec<ScrapedProfile>,
    subject_followers: u64,
    range: Option<&DateRange>,
) -> Vec<(String, Result<ProfileSummary, SkipReason>)> {
    handles
        .iter()
        .map(|handle| {
            let found = profiles
                .iter()
                .position(|p| p.username.eq_ignore_ascii_case(handle))
                .map(|i| profiles.swap_remove(i));
            let result = match found {
                None => Err(SkipReason::NotFound),
                Some(profile) => summarize_profile(profile, range).and_then(|summary| {
                    if summary.followers > subject_followers {
                        Ok(summary)
                    } else {
                        Err(SkipReason::NotLargerThanSubject {
                            audience: summary.followers,
                            subject: subject_followers,
                        })
                    }
                }),
            };
            (handle.clone(), result)
        })
        .collect()
}

fn skip_all(skipped: &mut Vec<SkippedCompetitor>, handles: &[String], reason: &SkipReason) {
    skipped.extend(handles.iter().map(|handle| SkippedCompetitor {
        handle: handle.clone(),
        reason: reason.clone(),
    }));
}
