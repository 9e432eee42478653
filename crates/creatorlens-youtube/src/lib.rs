//! YouTube channel analysis backed by the YouTube Data API v3.
//!
//! [`client`] wraps the four read endpoints we need, [`channel`] turns a
//! channel and its recent uploads into a [`ChannelSummary`], and [`analyze`]
//! compares a subject channel against the configured competitor handles.

pub mod analyze;
pub mod channel;
pub mod client;
pub mod error;
pub mod types;

pub use analyze::{analyze_channel, Chart, Charts, CompetitorAverages, YoutubeReport};
pub use channel::{fetch_channel, recent_videos, summarize_channel, ChannelSummary, VideoRecord};
pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use types::{Channel, Video};
