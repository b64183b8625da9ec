//! Data structures exchanged with the remote `games` table.

use serde::{Deserialize, Serialize};

/// One finished (or abandoned) puzzle attempt, pending submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub start_word: String,
    pub end_word: String,
    #[serde(default)]
    pub player_path: Option<Vec<String>>,
    #[serde(default)]
    pub optimal_path: Option<Vec<String>>,
    pub player_length: u32,
    pub optimal_length: u32,
    pub score: u32,
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub hints_used: Option<u32>,
}

/// Store-shaped record: paths flattened, defaults applied.
///
/// `completed_at` is assigned by the store and never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedGame {
    pub start_word: String,
    pub end_word: String,
    pub player_path: String,
    pub optimal_path: String,
    pub player_length: u32,
    pub optimal_length: u32,
    pub score: u32,
    pub valid: bool,
    pub hints_used: u32,
}

impl From<&GameResult> for PersistedGame {
    fn from(result: &GameResult) -> Self {
        Self {
            start_word: result.start_word.clone(),
            end_word: result.end_word.clone(),
            player_path: super::query::flatten_path(result.player_path.as_deref()),
            optimal_path: super::query::flatten_path(result.optimal_path.as_deref()),
            player_length: result.player_length,
            optimal_length: result.optimal_length,
            score: result.score,
            valid: result.valid.unwrap_or(false),
            hints_used: result.hints_used.unwrap_or(0),
        }
    }
}

/// Row projection returned by the recent-games query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreRow {
    pub score: i64,
    #[serde(default)]
    pub player_length: Option<i64>,
    #[serde(default)]
    pub optimal_length: Option<i64>,
}

/// Aggregate over the most recent sample of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: u32,
    pub perfect: u32,
    #[serde(rename = "avgScore")]
    pub avg_score: i64,
}
