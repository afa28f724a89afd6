use serde::Serialize;

/// Aggregate of the approved ratings of one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub total: u64,
    /// Mean rating rounded to two decimals, 0 when there are no ratings.
    pub average: f64,
    /// Count per star, one star first.
    pub breakdown: [u64; 5],
}

/// Ratings outside 1..=5 are ignored.
pub fn summarize(ratings: impl IntoIterator<Item = u8>) -> RatingSummary {
    let mut summary = RatingSummary::default();
    let mut sum = 0u64;

    for rating in ratings {
        if !(1..=5).contains(&rating) {
            continue;
        }

        summary.breakdown[usize::from(rating - 1)] += 1;
        summary.total += 1;
        sum += u64::from(rating);
    }

    if summary.total > 0 {
        summary.average = (sum as f64 / summary.total as f64 * 100.0).round() / 100.0;
    }

    summary
}
