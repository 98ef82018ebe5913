//! Fixed-width score ranges.

use crate::scoring::MAX_SCORE;

pub const BUCKET_WIDTH: u32 = 100;
pub const BUCKET_COUNT: usize = 10;

/// Wallet count for one score range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBucket {
    pub label: String,
    pub lower: u32,
    pub count: usize,
}

/// Range label for bucket `idx`, e.g. `"200-299"`
pub fn bucket_label(idx: usize) -> String {
    let lower = idx as u32 * BUCKET_WIDTH;
    format!("{}-{}", lower, lower + BUCKET_WIDTH - 1)
}

/// Ranges are `[lo, lo + 100)`, except the last one also takes the
/// top score so 1000 lands in `900-999`. Scores above the scale have no
/// bucket.
pub fn bucket_index(score: u32) -> Option<usize> {
    if score > MAX_SCORE {
        return None;
    }
    Some(((score / BUCKET_WIDTH) as usize).min(BUCKET_COUNT - 1))
}

/// Count scores per range; all ten ranges are returned, empty ones included
pub fn bucket_scores<I: IntoIterator<Item = u32>>(scores: I) -> Vec<ScoreBucket> {
    let mut buckets: Vec<ScoreBucket> = (0..BUCKET_COUNT)
        .map(|idx| ScoreBucket { label: bucket_label(idx), lower: idx as u32 * BUCKET_WIDTH, count: 0 })
        .collect();
    for score in scores {
        match bucket_index(score) {
            | Some(idx) => buckets[idx].count += 1,
            | None => log::warn!("score {} is outside 0-{}, not bucketed", score, MAX_SCORE),
        }
    }
    buckets
}
