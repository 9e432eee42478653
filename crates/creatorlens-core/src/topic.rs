//! Keyword topic classifier for post captions and video titles.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Fashion,
    Beauty,
    Fitness,
    Travel,
    Food,
    Lifestyle,
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::Fashion => write!(f, "fashion"),
            Topic::Beauty => write!(f, "beauty"),
            Topic::Fitness => write!(f, "fitness"),
            Topic::Travel => write!(f, "travel"),
            Topic::Food => write!(f, "food"),
            Topic::Lifestyle => write!(f, "lifestyle"),
        }
    }
}

/// Keyword sets in tie-break order: on equal scores the earlier topic wins.
///
/// Keywords match as lowercase substrings, so `"stylish"` also counts
/// towards `"style"`.
pub(crate) const KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Fashion,
        &[
            "fashion",
            "style",
            "outfit",
            "ootd",
            "dress",
            "wear",
            "clothing",
            "fashionista",
            "stylish",
            "lookbook",
        ],
    ),
    (
        Topic::Beauty,
        &[
            "beauty",
            "makeup",
            "skincare",
            "cosmetic",
            "glam",
            "makeupartist",
            "beautytips",
            "lipstick",
            "foundation",
        ],
    ),
    (
        Topic::Fitness,
        &[
            "fitness",
            "workout",
            "gym",
            "exercise",
            "fit",
            "training",
            "health",
            "muscle",
            "fitfam",
            "bodybuilding",
        ],
    ),
    (
        Topic::Travel,
        &[
            "travel",
            "trip",
            "vacation",
            "wanderlust",
            "explore",
            "adventure",
            "destination",
            "tourism",
            "traveling",
        ],
    ),
    (
        Topic::Food,
        &[
            "food",
            "foodie",
            "recipe",
            "cooking",
            "delicious",
            "yummy",
            "eat",
            "cuisine",
            "meal",
            "dish",
        ],
    ),
    (
        Topic::Lifestyle,
        &[
            "lifestyle",
            "life",
            "daily",
            "vlog",
            "blogger",
            "influencer",
            "content",
            "creator",
            "inspo",
        ],
    ),
];

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));

/// Return every `#tag` in `text`, in order of appearance.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Count how many of each topic's keywords appear in the caption and hashtags.
#[must_use]
pub fn topic_scores(caption: &str, hashtags: &[String]) -> Vec<(Topic, usize)> {
    let text = format!("{caption} {}", hashtags.join(" ")).to_lowercase();
    KEYWORDS
        .iter()
        .map(|(topic, words)| {
            let score = words.iter().filter(|w| text.contains(*w)).count();
            (*topic, score)
        })
        .collect()
}

/// Pick the best-scoring topic; [`Topic::Lifestyle`] when nothing matches.
#[must_use]
pub fn classify(caption: &str, hashtags: &[String]) -> Topic {
    let mut best: Option<(Topic, usize)> = None;
    for (topic, score) in topic_scores(caption, hashtags) {
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((topic, score));
        }
    }
    best.map_or(Topic::Lifestyle, |(topic, _)| topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(caption: &str) -> Vec<String> {
        extract_hashtags(caption)
    }

    #[test]
    fn extract_hashtags_finds_tags_in_order() {
        assert_eq!(
            extract_hashtags("sunset #travel vibes #goldenhour!"),
            vec!["#travel".to_string(), "#goldenhour".to_string()]
        );
    }

    #[test]
    fn extract_hashtags_ignores_bare_hash() {
        assert!(extract_hashtags("# not a tag").is_empty());
    }

    #[test]
    fn ootd_caption_is_fashion() {
        let caption = "Loving this new #ootd look, so #stylish!";
        assert_eq!(classify(caption, &tags(caption)), Topic::Fashion);
    }

    #[test]
    fn empty_text_is_lifestyle() {
        assert_eq!(classify("", &[]), Topic::Lifestyle);
    }

    #[test]
    fn no_keyword_text_is_lifestyle() {
        assert_eq!(classify("quiet morning by the window", &[]), Topic::Lifestyle);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("NEW RECIPE: YUMMY PASTA", &[]), Topic::Food);
    }

    #[test]
    fn tie_goes_to_earlier_topic() {
        // one fashion keyword ("outfit"), one travel keyword ("trip")
        assert_eq!(classify("outfit for the trip", &[]), Topic::Fashion);
    }

    #[test]
    fn higher_score_wins_over_order() {
        let caption = "leg day at the gym, great workout #fitfam";
        assert_eq!(classify(caption, &tags(caption)), Topic::Fitness);
    }

    #[test]
    fn classification_is_deterministic() {
        let caption = "Skincare routine + makeup #glam";
        let hashtags = tags(caption);
        let first = classify(caption, &hashtags);
        for _ in 0..5 {
            assert_eq!(classify(caption, &hashtags), first);
        }
        assert_eq!(first, Topic::Beauty);
    }

    #[test]
    fn scores_cover_every_topic() {
        let scores = topic_scores("", &[]);
        assert_eq!(scores.len(), 6);
        assert!(scores.iter().all(|(_, s)| *s == 0));
    }

    #[test]
    fn topic_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Topic::Travel).unwrap(),
            "\"travel\""
        );
    }
}
