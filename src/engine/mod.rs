//! Puzzle engine: word vectors, the semantic graph built from them and the
//! rules that score a player's path.

pub mod embedding;
pub mod graph;
pub mod hint;
pub mod service;
pub mod words;

use std::path::PathBuf;
use thiserror::Error;

pub use embedding::{Embedder, HashEmbedder, VectorTable};
pub use graph::SemanticGraph;
pub use hint::Hint;
pub use service::{GameService, MoveError, PathError, Puzzle, ScoreReport};
pub use words::WordList;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("vector for {word:?} has {found} dimensions, expected {expected}")]
    Dimension {
        word: String,
        expected: usize,
        found: usize,
    },

    #[error("No path found from {from} to {to}")]
    NoPath { from: String, to: String },
}
