pub mod client;
pub mod error;
pub mod models;
pub mod query;

pub use client::StoreClient;
pub use error::{StoreDiagnostic, StoreError, StoreErrorKind};
pub use models::{GameResult, PersistedGame, ScoreRow, StatsSummary};
