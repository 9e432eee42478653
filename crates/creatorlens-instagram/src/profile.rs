//! Reduce a scraped profile to the summary returned to clients.

use creatorlens_core::metrics::{as_f64, engagement_rate, integer_average, non_negative};
use creatorlens_core::{
    classify, extract_hashtags, filter_posts, DateRange, PostTimestamp, SkipReason, Timestamped,
    Topic,
};
use serde::Serialize;

use crate::types::{ScrapedPost, ScrapedProfile};

/// Posts that feed the like/comment/view averages.
const AVERAGE_WINDOW: usize = 10;
const MAX_POSTS: usize = 50;
const MAX_TOP_REELS: usize = 10;
const MAX_CAPTION_CHARS: usize = 200;
const MAX_HASHTAGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub caption: String,
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
    pub hashtags: Vec<String>,
    pub topic: Topic,
    pub url: String,
    pub timestamp: Option<PostTimestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub username: String,
    pub name: String,
    pub followers: u64,
    pub posts_count: u64,
    pub engagement: f64,
    pub avg_likes: u64,
    pub avg_comments: u64,
    pub avg_views: u64,
    pub posts: Vec<PostRecord>,
    pub top_reels: Vec<PostRecord>,
    pub total_reels_count: usize,
    pub verified: bool,
}

impl Timestamped for ScrapedPost {
    fn timestamp(&self) -> Option<&PostTimestamp> {
        self.timestamp.as_ref()
    }
}

impl ScrapedPost {
    #[must_use]
    pub fn likes(&self) -> u64 {
        self.likes_count.map_or(0, non_negative)
    }

    #[must_use]
    pub fn comments(&self) -> u64 {
        self.comments_count.map_or(0, non_negative)
    }

    /// First positive of the view and play counters.
    #[must_use]
    pub fn views(&self) -> u64 {
        [self.video_view_count, self.video_play_count]
            .into_iter()
            .flatten()
            .map(non_negative)
            .find(|v| *v > 0)
            .unwrap_or(0)
    }

    /// Whether the post is a video/reel by any of the signals Apify exposes.
    #[must_use]
    pub fn is_reel(&self) -> bool {
        matches!(self.post_type.as_deref(), Some("Video" | "Reel"))
            || self.video_view_count.is_some_and(|v| v > 0)
            || self.video_play_count.is_some_and(|v| v > 0)
            || self.is_video == Some(true)
            || self
                .product_type
                .as_deref()
                .is_some_and(|p| p.contains("Video"))
    }

    fn to_record(&self) -> PostRecord {
        let caption = self.caption.as_deref().unwrap_or_default();
        let mut hashtags = extract_hashtags(caption);
        let topic = classify(caption, &hashtags);
        hashtags.truncate(MAX_HASHTAGS);

        PostRecord {
            caption: caption.chars().take(MAX_CAPTION_CHARS).collect(),
            likes: self.likes(),
            comments: self.comments(),
            views: self.views(),
            hashtags,
            topic,
            url: format!(
                "https://instagram.com/p/{}",
                self.short_code.as_deref().unwrap_or_default()
            ),
            timestamp: self.timestamp.clone(),
        }
    }
}

/// Summarize `profile`, keeping only posts inside `range`.
///
/// # Errors
///
/// Returns [`SkipReason::NoAudience`] when the profile reports no followers.
pub fn summarize_profile(
    profile: ScrapedProfile,
    range: Option<&DateRange>,
) -> Result<ProfileSummary, SkipReason> {
    let followers = profile.followers_count.map_or(0, non_negative);
    if followers == 0 {
        return Err(SkipReason::NoAudience);
    }

    let posts = filter_posts(profile.latest_posts, range);
    let window = &posts[..posts.len().min(AVERAGE_WINDOW)];

    let avg_likes = integer_average(window.iter().map(ScrapedPost::likes));
    let avg_comments = integer_average(window.iter().map(ScrapedPost::comments));
    let avg_views = integer_average(window.iter().map(ScrapedPost::views));
    let engagement = engagement_rate(as_f64(avg_likes), as_f64(avg_comments), as_f64(followers));

    let reels: Vec<&ScrapedPost> = posts.iter().filter(|p| p.is_reel()).collect();

    Ok(ProfileSummary {
        username: profile.username,
        name: profile.full_name.unwrap_or_default(),
        followers,
        posts_count: profile.posts_count.map_or(0, non_negative),
        engagement,
        avg_likes,
        avg_comments,
        avg_views,
        posts: posts.iter().take(MAX_POSTS).map(ScrapedPost::to_record).collect(),
        top_reels: reels
            .iter()
            .take(MAX_TOP_REELS)
            .map(|p| p.to_record())
            .collect(),
        total_reels_count: reels.len(),
        verified: profile.verified.unwrap_or(false),
    })
}
