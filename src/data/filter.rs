//! Per-platform view of a contest snapshot

use super::{Contest, ContestResult};

/// Returns a copy of `result` holding only contests hosted on `platform`
///
/// Matching is case-insensitive on both sides. Order and the snapshot
/// timestamp are preserved; an unknown platform yields empty sequences.
pub fn filter_by_platform(result: &ContestResult, platform: &str) -> ContestResult {
    let platform = platform.to_lowercase();
    let matches = |contests: &[Contest]| -> Vec<Contest> {
        contests
            .iter()
            .filter(|c| c.platform.to_lowercase() == platform)
            .cloned()
            .collect()
    };

    ContestResult {
        ongoing: matches(&result.ongoing),
        upcoming: matches(&result.upcoming),
        timestamp: result.timestamp,
    }
}
