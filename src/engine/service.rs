//! Game rules on top of the semantic graph: puzzles, move and path
//! validation, scoring and hints.

use crate::config::EngineConfig;
use crate::engine::EngineError;
use crate::engine::embedding::{Embedder, HashEmbedder, VectorTable, normalize_word};
use crate::engine::graph::SemanticGraph;
use crate::engine::hint::Hint;
use crate::engine::words::WordList;
use crate::store::GameResult;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Score of a path that matches the optimal length.
pub const MAX_SCORE: u32 = 100;
/// Points lost per step beyond the optimal path.
pub const EXTRA_STEP_PENALTY: u32 = 20;
/// Lowest score a valid path can earn.
pub const MIN_VALID_SCORE: u32 = 10;

/// Why a complete path is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("Path must have at least 2 steps")]
    TooShort,

    #[error("Path exceeds maximum of {0} steps")]
    TooLong(usize),

    #[error("Path contains duplicate word '{}'", .0.to_uppercase())]
    Duplicate(String),

    #[error("Word '{}' is not in the database", .0.to_uppercase())]
    UnknownWord(String),

    #[error(
        "'{}' and '{}' are not semantically connected (similarity: {similarity:.2})",
        .from.to_uppercase(),
        .to.to_uppercase()
    )]
    NotConnected {
        from: String,
        to: String,
        similarity: f32,
    },
}

/// Why a single move is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveError {
    #[error("Word '{}' is not in the database", .0.to_uppercase())]
    UnknownWord(String),

    #[error("This word has already been used")]
    AlreadyUsed,

    #[error("Not connected to {} (similarity: {similarity:.2})", .current.to_uppercase())]
    NotConnected { current: String, similarity: f32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Puzzle {
    pub start_word: String,
    pub end_word: String,
    pub optimal_length: usize,
}

/// Outcome of scoring one attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score: u32,
    pub message: String,
    pub valid: bool,
    pub algorithm_path: Option<Vec<String>>,
    pub player_steps: usize,
    pub algorithm_steps: Option<usize>,
}

impl ScoreReport {
    /// Converts a scored attempt into the record submitted to the store.
    pub fn to_game_result(
        &self,
        start_word: &str,
        end_word: &str,
        player_path: &[String],
        hints_used: u32,
    ) -> GameResult {
        GameResult {
            start_word: normalize_word(start_word),
            end_word: normalize_word(end_word),
            player_path: Some(player_path.iter().map(|w| normalize_word(w)).collect()),
            optimal_path: self.algorithm_path.clone(),
            player_length: self.player_steps as u32,
            optimal_length: self.algorithm_steps.unwrap_or(0) as u32,
            score: self.score,
            valid: Some(self.valid),
            hints_used: Some(hints_used),
        }
    }
}

pub struct GameService {
    words: WordList,
    graph: SemanticGraph,
    max_steps: usize,
    min_puzzle_steps: usize,
    pair_attempts: usize,
}

impl GameService {
    /// Builds the graph over every embeddable word of `words`.
    pub fn new(words: WordList, embedder: Box<dyn Embedder>, config: &EngineConfig) -> Self {
        let mut graph = SemanticGraph::new(embedder, config.similarity_threshold);
        graph.add_words(words.words().iter().map(String::as_str));

        let playable = WordList::new(words.words().iter().filter(|w| graph.word_exists(w)));
        if playable.len() < words.len() {
            log::warn!(
                "ENGINE: {} words have no embedding and were dropped",
                words.len() - playable.len()
            );
        }
        log::info!(
            "ENGINE: Graph ready with {} words (threshold {:.2})",
            playable.len(),
            config.similarity_threshold
        );

        Self {
            words: playable,
            graph,
            max_steps: config.max_steps,
            min_puzzle_steps: config.min_puzzle_steps,
            pair_attempts: config.pair_attempts,
        }
    }

    /// Loads the word list and embeddings named by the configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let words = match &config.words_path {
            Some(path) => WordList::load(path)?,
            None => WordList::builtin(),
        };
        let embedder: Box<dyn Embedder> = match &config.embeddings_path {
            Some(path) => Box::new(VectorTable::load(path)?),
            None => {
                log::warn!("ENGINE: No embeddings file configured, using hash embeddings");
                Box::new(HashEmbedder::new(config.embedding_dim))
            }
        };
        Ok(Self::new(words, embedder, config))
    }

    pub fn graph(&self) -> &SemanticGraph {
        &self.graph
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn validate_word(&self, word: &str) -> bool {
        self.words.contains(word) && self.graph.word_exists(word)
    }

    pub fn word_similarity(&self, a: &str, b: &str) -> Option<f32> {
        self.graph.similarity(a, b)
    }

    pub fn are_words_connected(&self, a: &str, b: &str) -> bool {
        self.graph.are_connected(a, b)
    }

    pub fn find_optimal_path(&self, start: &str, target: &str, max_steps: usize) -> Option<Vec<String>> {
        if !self.validate_word(start) || !self.validate_word(target) {
            return None;
        }
        self.graph.shortest_path(start, target, max_steps)
    }

    /// Checks a full path: length, duplicates, vocabulary, then each link.
    pub fn validate_path(&self, path: &[String]) -> Result<(), PathError> {
        if path.len() < 3 {
            return Err(PathError::TooShort);
        }
        if path.len() - 1 > self.max_steps {
            return Err(PathError::TooLong(self.max_steps));
        }

        let mut seen = HashSet::new();
        for word in path {
            let word = normalize_word(word);
            if !seen.insert(word.clone()) {
                return Err(PathError::Duplicate(word));
            }
        }

        if let Some(unknown) = path.iter().find(|w| !self.validate_word(w)) {
            return Err(PathError::UnknownWord(normalize_word(unknown)));
        }

        for pair in path.windows(2) {
            if !self.graph.are_connected(&pair[0], &pair[1]) {
                return Err(PathError::NotConnected {
                    from: normalize_word(&pair[0]),
                    to: normalize_word(&pair[1]),
                    similarity: self.graph.similarity(&pair[0], &pair[1]).unwrap_or(0.0),
                });
            }
        }

        Ok(())
    }

    /// Validates one proposed word against the current position.
    pub fn check_move(&self, word: &str, current: &str, used: &[String]) -> Result<(), MoveError> {
        if !self.validate_word(word) {
            return Err(MoveError::UnknownWord(normalize_word(word)));
        }
        let word_key = normalize_word(word);
        if used.iter().any(|w| normalize_word(w) == word_key) {
            return Err(MoveError::AlreadyUsed);
        }
        if !self.graph.are_connected(current, word) {
            return Err(MoveError::NotConnected {
                current: normalize_word(current),
                similarity: self.graph.similarity(current, word).unwrap_or(0.0),
            });
        }
        Ok(())
    }

    pub fn calculate_score(&self, path: &[String], start: &str, target: &str) -> ScoreReport {
        let algorithm_path = self.find_optimal_path(start, target, self.max_steps);
        let algorithm_steps = algorithm_path.as_ref().map(|p| p.len() - 1);
        let player_steps = path.len().saturating_sub(1);

        let invalid = |message: String| ScoreReport {
            score: 0,
            message,
            valid: false,
            algorithm_path: algorithm_path.clone(),
            player_steps,
            algorithm_steps,
        };

        let starts_right = path
            .first()
            .is_some_and(|w| normalize_word(w) == normalize_word(start));
        if !starts_right {
            return invalid(format!("Path must start with '{}'", start.to_uppercase()));
        }
        let ends_right = path
            .last()
            .is_some_and(|w| normalize_word(w) == normalize_word(target));
        if !ends_right {
            return invalid(format!("Path must end with '{}'", target.to_uppercase()));
        }
        if let Err(e) = self.validate_path(path) {
            return invalid(e.to_string());
        }

        let (score, message) = score_steps(player_steps, algorithm_steps);
        ScoreReport {
            score,
            message,
            valid: true,
            algorithm_path,
            player_steps,
            algorithm_steps,
        }
    }

    /// Suggests the next word from the end of `current_path`.
    ///
    /// `current_path` holds the words played after `start`.
    pub fn hint(
        &self,
        start: &str,
        target: &str,
        current_path: &[String],
        level: usize,
    ) -> Result<Hint, EngineError> {
        let mut used: HashSet<String> = HashSet::new();
        used.insert(normalize_word(start));
        used.extend(current_path.iter().map(|w| normalize_word(w)));

        let position = match current_path.last() {
            None => normalize_word(start),
            Some(last) if normalize_word(last) == normalize_word(target) => {
                return Ok(Hint::reached_target(level));
            }
            Some(last) => normalize_word(last),
        };

        let optimal = self
            .find_optimal_path(&position, target, self.max_steps)
            .filter(|p| p.len() >= 2)
            .ok_or_else(|| EngineError::NoPath {
                from: position.clone(),
                to: normalize_word(target),
            })?;
        let steps_remaining = optimal.len() - 1;

        let next = optimal[1..]
            .iter()
            .find(|w| !used.contains(*w))
            .cloned()
            .or_else(|| self.closest_unused_neighbor(&position, target, &used));

        Ok(Hint::reveal(next, level, Some(steps_remaining)))
    }

    /// Picks a random pair whose optimal path length is in the playable range.
    pub fn new_puzzle<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Puzzle> {
        for _ in 0..self.pair_attempts {
            let (start, end) = self.words.random_pair(rng)?;
            let Some(path) = self.graph.shortest_path(&start, &end, self.max_steps) else {
                continue;
            };
            let steps = path.len() - 1;
            if (self.min_puzzle_steps..=self.max_steps).contains(&steps) {
                log::debug!("ENGINE: Puzzle {} -> {} ({} steps)", start, end, steps);
                return Some(Puzzle {
                    start_word: start,
                    end_word: end,
                    optimal_length: steps,
                });
            }
        }
        log::warn!(
            "ENGINE: No playable pair found after {} attempts",
            self.pair_attempts
        );
        None
    }

    fn closest_unused_neighbor(
        &self,
        position: &str,
        target: &str,
        used: &HashSet<String>,
    ) -> Option<String> {
        let mut best: Option<(String, f32)> = None;
        for neighbor in self.graph.neighbors(position) {
            if used.contains(&neighbor) {
                continue;
            }
            let sim = self.graph.similarity(&neighbor, target).unwrap_or(-1.0);
            if best.as_ref().is_none_or(|(_, s)| sim > *s) {
                best = Some((neighbor, sim));
            }
        }
        best.map(|(word, _)| word)
    }
}

/// Score for a valid path given the optimal step count, if known.
pub fn score_steps(player_steps: usize, optimal_steps: Option<usize>) -> (u32, String) {
    let Some(optimal) = optimal_steps else {
        return (MAX_SCORE, format!("Valid path in {} steps!", player_steps));
    };
    if player_steps <= optimal {
        return (
            MAX_SCORE,
            format!("🎯 Perfect! You matched the optimal {} steps", optimal),
        );
    }

    let extra = (player_steps - optimal) as u32;
    let score = MAX_SCORE
        .saturating_sub(extra.saturating_mul(EXTRA_STEP_PENALTY))
        .max(MIN_VALID_SCORE);
    let message = format!(
        "Solved in {} steps, {} more than the optimal {}",
        player_steps, extra, optimal
    );
    (score, message)
}
