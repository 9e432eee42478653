//! Instagram profile analysis backed by the Apify profile-scraper actor.
//!
//! A scrape is a submit / poll / fetch-dataset triad (see [`run`]); the
//! resulting profiles are reduced to [`ProfileSummary`] records and compared
//! against follower-tiered competitors in [`analyze`].

pub mod analyze;
pub mod client;
pub mod error;
pub mod profile;
pub mod run;
pub mod types;

pub use analyze::{analyze_profile, AnalysisSettings, InstagramReport};
pub use client::ApifyClient;
pub use error::InstagramError;
pub use profile::{summarize_profile, PostRecord, ProfileSummary};
pub use run::{scrape_profiles, PollPolicy, RunOutcome};
pub use types::{RunData, RunStatus, ScrapedPost, ScrapedProfile};
