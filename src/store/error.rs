//! Structured failures of the remote store.
//!
//! Public store operations never return these to callers; they are logged and
//! published on the diagnostic channel instead.

use thiserror::Error;

/// Coarse classification used by operators to tell failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Network unreachable, DNS, TLS, timeout.
    Transport,
    /// The store answered with a non-success status.
    Status,
    /// The response body did not have the expected shape.
    Decode,
    /// The `content-range` header could not be parsed.
    Header,
    /// No endpoint configured.
    Disabled,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("store returned status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("unparsable content-range header: {0:?}")]
    Header(String),

    #[error("store endpoint is not configured")]
    Disabled,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Transport(_) => StoreErrorKind::Transport,
            StoreError::Status(_) => StoreErrorKind::Status,
            StoreError::Decode(_) => StoreErrorKind::Decode,
            StoreError::Header(_) => StoreErrorKind::Header,
            StoreError::Disabled => StoreErrorKind::Disabled,
        }
    }

    /// Splits a reqwest failure into transport vs. body decoding.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

/// One failed store operation, as published on the diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDiagnostic {
    /// Name of the failed operation (`submit`, `total_games`, `game_stats`).
    pub operation: &'static str,
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreDiagnostic {
    pub fn new(operation: &'static str, err: &StoreError) -> Self {
        Self {
            operation,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
