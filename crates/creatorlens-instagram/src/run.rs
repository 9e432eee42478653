//! Submit / poll / fetch cycle for a single profile-scraper run.

use std::time::Duration;

use creatorlens_core::AppConfig;

use crate::client::ApifyClient;
use crate::error::InstagramError;
use crate::types::{RunStatus, ScrapedProfile};

/// How often and how many times a run's status is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

impl PollPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: config.scrape_poll_interval(),
            max_attempts: config.scrape_max_polls,
        }
    }
}

/// Terminal result of a scrape run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The run succeeded; decodable dataset items are included.
    Succeeded(Vec<ScrapedProfile>),
    /// Apify reported a terminal failure status.
    Failed { run_id: String, status: RunStatus },
    /// The run was still going after every poll attempt.
    Exhausted { run_id: String, attempts: u32 },
}

impl RunOutcome {
    /// Human-readable reason for a non-success outcome.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            RunOutcome::Succeeded(items) => format!("succeeded with {} profiles", items.len()),
            RunOutcome::Failed { run_id, status } => format!("run {run_id} ended {status}"),
            RunOutcome::Exhausted { run_id, attempts } => {
                format!("run {run_id} still running after {attempts} polls")
            }
        }
    }
}

/// Scrape `usernames` and wait for the run to settle.
///
/// Polls at `policy.interval` up to `policy.max_attempts` times, without
/// sleeping after the last check. Dataset items that do not decode as a
/// profile are skipped with a warning.
///
/// # Errors
///
/// Returns [`InstagramError`] if any Apify call fails, or
/// [`InstagramError::MissingDataset`] when a run succeeds without a dataset.
pub async fn scrape_profiles(
    client: &ApifyClient,
    usernames: &[String],
    results_limit: u32,
    policy: PollPolicy,
) -> Result<RunOutcome, InstagramError> {
    let run = client.start_profile_run(usernames, results_limit).await?;
    tracing::info!(run_id = %run.id, profiles = usernames.len(), "Apify run started");

    for attempt in 1..=policy.max_attempts {
        let current = client.get_profile_run(&run.id).await?;

        if current.status == RunStatus::Succeeded {
            let dataset_id =
                current
                    .default_dataset_id
                    .ok_or_else(|| InstagramError::MissingDataset {
                        run_id: current.id.clone(),
                    })?;
            let items = client.dataset_items(&dataset_id).await?;
            let profiles = decode_profiles(items);
            tracing::info!(
                run_id = %current.id,
                attempt,
                profiles = profiles.len(),
                "Apify run succeeded"
            );
            return Ok(RunOutcome::Succeeded(profiles));
        }

        if current.status.is_failure() {
            tracing::warn!(run_id = %current.id, status = %current.status, "Apify run failed");
            return Ok(RunOutcome::Failed {
                run_id: current.id,
                status: current.status,
            });
        }

        tracing::debug!(run_id = %run.id, attempt, status = %current.status, "run in progress");
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    tracing::warn!(
        run_id = %run.id,
        attempts = policy.max_attempts,
        "Apify run did not finish in time"
    );
    Ok(RunOutcome::Exhausted {
        run_id: run.id,
        attempts: policy.max_attempts,
    })
}

fn decode_profiles(items: Vec<serde_json::Value>) -> Vec<ScrapedProfile> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed dataset item");
                None
            }
        })
        .collect()
}
