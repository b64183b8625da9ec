//! Pure helpers behind the store operations: path flattening, count header
//! parsing and the recent-games aggregate.

use crate::store::error::StoreError;
use crate::store::models::{ScoreRow, StatsSummary};

/// Table path relative to the store endpoint.
pub const GAMES_TABLE: &str = "rest/v1/games";

/// Query string of the count-only request.
pub const COUNT_QUERY: &str = "select=count";

/// Query string of the recent-games request.
pub const RECENT_QUERY: &str =
    "select=score,player_length,optimal_length&order=completed_at.desc&limit=100";

/// Maximum number of rows sampled by the recent-games aggregate.
pub const RECENT_LIMIT: usize = 100;

/// Score that counts as a perfect game.
pub const PERFECT_SCORE: i64 = 100;

/// Joins a word path with commas. Empty and absent paths both give `""`.
pub fn flatten_path(path: Option<&[String]>) -> String {
    path.map(|words| words.join(",")).unwrap_or_default()
}

/// Extracts the total from a `content-range` value (`"0-9/42"`, `"*/0"`).
pub fn parse_content_range(value: &str) -> Result<u64, StoreError> {
    let (_, total) = value
        .rsplit_once('/')
        .ok_or_else(|| StoreError::Header(value.to_string()))?;
    total
        .trim()
        .parse::<u64>()
        .map_err(|_| StoreError::Header(value.to_string()))
}

/// Aggregates a sample of rows. An empty sample is a valid all-zero summary.
///
/// The mean is rounded half away from zero, so 62.5 becomes 63.
pub fn summarize(rows: &[ScoreRow]) -> StatsSummary {
    if rows.is_empty() {
        return StatsSummary::default();
    }

    let total = rows.len();
    let perfect = rows.iter().filter(|r| r.score == PERFECT_SCORE).count();
    let sum: i64 = rows.iter().map(|r| r.score).sum();
    let avg = sum as f64 / total as f64;

    StatsSummary {
        total: total as u32,
        perfect: perfect as u32,
        avg_score: avg.round() as i64,
    }
}
