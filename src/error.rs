//! Errors raised by the search engine.

use thiserror::Error;

/// Errors that can occur while selecting a move.
///
/// Every variant signals a bug in the calling game code or a bad
/// configuration; none of them is retried.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Rollout policy returned a move outside the legal set: {0}")]
    IllegalRolloutMove(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
