//! Run configuration threaded through every engine call
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::heuristics::HeuristicKind;

/// Width used when none is given
pub const DEFAULT_WIDTH: usize = 3;

/// Number of IDA* bound increases before giving up
pub const DEFAULT_RETRY_LIMIT: u32 = 8;

/// Puzzle geometry and the active heuristic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Tiles per row (and per column)
    pub width: usize,
    /// Total cells, `width * width`
    pub size: usize,
    /// Estimator used to score every state
    pub heuristic: HeuristicKind,
}

impl PuzzleConfig {
    pub fn new(width: usize, heuristic: HeuristicKind) -> Result<Self> {
        if width < 2 {
            return Err(SearchError::InvalidConfiguration(format!(
                "width must be at least 2, got {}",
                width
            )));
        }
        // Tile labels are stored as u16
        if width.checked_mul(width).map_or(true, |size| size > u16::MAX as usize) {
            return Err(SearchError::InvalidConfiguration(format!(
                "width {} is too large",
                width
            )));
        }

        Ok(Self {
            width,
            size: width * width,
            heuristic,
        })
    }

    /// Same geometry, different estimator
    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Number of numbered tiles (everything but the blank)
    pub fn tile_count(&self) -> usize {
        self.size - 1
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            size: DEFAULT_WIDTH * DEFAULT_WIDTH,
            heuristic: HeuristicKind::default(),
        }
    }
}

/// Search algorithm, which only decides the frontier discipline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// Best-first over a priority frontier
    #[default]
    AStar,
    /// Depth-first over a stack frontier, retried with a growing bound
    IdaStar,
}

impl Algorithm {
    pub fn from_ida_flag(ida: bool) -> Self {
        if ida {
            Algorithm::IdaStar
        } else {
            Algorithm::AStar
        }
    }

    pub fn is_ida(self) -> bool {
        self == Algorithm::IdaStar
    }
}

/// Driver settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// IDA* retries after the first attempt
    pub retry_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::AStar,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }
}

impl SearchConfig {
    /// Config for plain A*
    pub fn a_star() -> Self {
        Self::default()
    }

    /// Config for IDA*
    pub fn ida_star() -> Self {
        Self {
            algorithm: Algorithm::IdaStar,
            ..Default::default()
        }
    }

    /// Set the IDA* retry limit
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }
}
