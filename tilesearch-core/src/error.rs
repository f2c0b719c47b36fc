//! Error types for the search engine

use crate::moves::Direction;

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, SearchError>;

/// Everything that can go wrong between configuration and a finished search
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The blank sits on the edge the move would cross. Callers skip the
    /// direction; this never reaches the user.
    #[error("invalid move {direction} with blank at index {blank}")]
    InvalidMove { direction: Direction, blank: usize },

    /// Unknown heuristic, bad width, malformed or unsolvable initial board
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The frontier ran dry without reaching the goal
    #[error("frontier exhausted at bound {bound}")]
    FrontierExhausted { bound: u32 },
}
