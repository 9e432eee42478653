//! Averages and engagement rates shared by the profile and channel summaries.

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(avg_likes + avg_comments) / audience × 100`, rounded to 2 decimals.
///
/// A zero (or negative) denominator yields `0.0` rather than an error.
#[must_use]
pub fn engagement_rate(avg_likes: f64, avg_comments: f64, audience: f64) -> f64 {
    if audience <= 0.0 {
        return 0.0;
    }
    round2((avg_likes + avg_comments) / audience * 100.0)
}

/// Floor-division average; `0` for an empty input.
#[must_use]
pub fn integer_average<I>(values: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum.saturating_add(v), count + 1));
    if count == 0 {
        0
    } else {
        sum / count
    }
}

/// Arithmetic mean; `None` for an empty input.
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

/// Convert a count for floating-point arithmetic.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn as_f64(count: u64) -> f64 {
    count as f64
}

/// Clamp a signed upstream count to a non-negative value.
///
/// Some upstreams report hidden counts as `-1`.
#[must_use]
pub fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
