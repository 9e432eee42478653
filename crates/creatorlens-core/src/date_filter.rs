//! Free-form date filters and timestamp-based post filtering.
//!
//! Filter strings come straight from the request body (`"7days"`,
//! `"yesterday"`, `"2025-01-01 to 2025-02-01"`, ...). Anything that does not
//! match the rule table parses to [`DateFilter::Unrecognized`], which filters
//! nothing but keeps the reason around for logging.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(t) => t,
    None => NaiveTime::MIN,
};

/// Inclusive `[start, end]` window over naive UTC timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFilter {
    /// No filtering requested (`all`, empty, or absent).
    All,
    Range(DateRange),
    /// Input did not match any supported form; treated as [`DateFilter::All`].
    Unrecognized { input: String, reason: String },
}

impl DateFilter {
    /// Parse a filter string relative to `now`.
    #[must_use]
    pub fn parse(input: Option<&str>, now: NaiveDateTime) -> Self {
        let Some(raw) = input else {
            return Self::All;
        };
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || normalized == "all" {
            return Self::All;
        }

        let unrecognized = |reason: &str| Self::Unrecognized {
            input: raw.to_string(),
            reason: reason.to_string(),
        };

        let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN);

        match normalized.as_str() {
            "today" => {
                return Self::Range(DateRange {
                    start: midnight(now.date()),
                    end: now,
                });
            }
            "yesterday" => {
                let day = now.date().pred_opt().unwrap_or(NaiveDate::MIN);
                return Self::Range(DateRange {
                    start: midnight(day),
                    end: day.and_time(END_OF_DAY),
                });
            }
            _ => {}
        }

        for (unit, days_per_unit) in [("days", 1), ("weeks", 7), ("months", 30)] {
            if let Some(count) = normalized.strip_suffix(unit) {
                return match count.trim().parse::<i64>() {
                    Ok(n) if n >= 0 => Duration::try_days(n.saturating_mul(days_per_unit))
                        .and_then(|window| now.checked_sub_signed(window))
                        .map_or_else(
                            || unrecognized("relative window is too large"),
                            |start| Self::Range(DateRange { start, end: now }),
                        ),
                    Ok(_) => unrecognized("relative window must not be negative"),
                    Err(_) => unrecognized("expected a whole number before the unit"),
                };
            }
        }

        if let Some((start, end)) = normalized.split_once(" to ") {
            let parse_day = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d");
            return match (parse_day(start), parse_day(end)) {
                (Ok(start), Ok(end)) if start <= end => Self::Range(DateRange {
                    start: midnight(start),
                    end: midnight(end),
                }),
                (Ok(_), Ok(_)) => unrecognized("range start is after range end"),
                _ => unrecognized("range bounds must be YYYY-MM-DD"),
            };
        }

        unrecognized("unsupported date filter")
    }

    #[must_use]
    pub fn range(&self) -> Option<&DateRange> {
        match self {
            Self::Range(range) => Some(range),
            Self::All | Self::Unrecognized { .. } => None,
        }
    }
}

/// A post timestamp as delivered upstream: either a string or a Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostTimestamp {
    Text(String),
    Epoch(f64),
}

impl PostTimestamp {
    /// Convert to a naive UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the value is not a
    /// recognizable date/time.
    pub fn to_naive_utc(&self) -> Result<NaiveDateTime, String> {
        match self {
            Self::Text(text) => parse_text_timestamp(text),
            Self::Epoch(secs) => {
                if !secs.is_finite() {
                    return Err(format!("epoch {secs} is not finite"));
                }
                #[allow(clippy::cast_possible_truncation)]
                let whole = secs.floor() as i64;
                DateTime::from_timestamp(whole, 0)
                    .map(|dt| dt.naive_utc())
                    .ok_or_else(|| format!("epoch {secs} is out of range"))
            }
        }
    }
}

fn parse_text_timestamp(text: &str) -> Result<NaiveDateTime, String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| format!("unrecognized timestamp '{text}'"))
}

/// Where a post's timestamp falls relative to a [`DateRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Within,
    Before,
    After,
    Missing,
    Unparsable(String),
}

impl Placement {
    /// Posts without a usable timestamp are kept.
    #[must_use]
    pub fn is_retained(&self) -> bool {
        matches!(self, Self::Within | Self::Missing | Self::Unparsable(_))
    }

    #[must_use]
    pub fn of(timestamp: Option<&PostTimestamp>, range: &DateRange) -> Self {
        let Some(timestamp) = timestamp else {
            return Self::Missing;
        };
        match timestamp.to_naive_utc() {
            Ok(at) if range.contains(at) => Self::Within,
            Ok(at) if at < range.start => Self::Before,
            Ok(_) => Self::After,
            Err(reason) => Self::Unparsable(reason),
        }
    }
}

/// Anything carrying an optional upstream timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> Option<&PostTimestamp>;
}

/// Keep the posts whose timestamps fall within `range`.
///
/// With no range the input is returned untouched.
#[must_use]
pub fn filter_posts<T: Timestamped>(posts: Vec<T>, range: Option<&DateRange>) -> Vec<T> {
    let Some(range) = range else {
        return posts;
    };
    posts
        .into_iter()
        .filter(|post| Placement::of(post.timestamp(), range).is_retained())
        .collect()
}

#[cfg(test)]
#[path = "date_filter_test.rs"]
mod tests;
