//! Tilesearch Core - Sliding-tile puzzle search engine
//!
//! This crate provides the engine behind the `tilesearch` CLI:
//! - Puzzle states with parent handles into a search arena
//! - Move generation and solvability checking
//! - Three admissible heuristics (misplaced tiles, Manhattan, linear conflict)
//! - Priority and stack frontiers
//! - One branch-and-bound driver shared by A* and IDA*

pub mod config;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod moves;
pub mod search;
pub mod state;

// Re-exports for convenient access
pub use config::{Algorithm, PuzzleConfig, SearchConfig, DEFAULT_RETRY_LIMIT, DEFAULT_WIDTH};
pub use error::{Result, SearchError};
pub use frontier::{Frontier, ASTAR_BOUND};
pub use heuristics::{score, HeuristicKind};
pub use moves::{
    apply_move, generate_initial_state, is_solvable, random_board, replay, successors, Direction,
};
pub use search::{
    prepare_initial, search, solve, solve_from, ClosedSet, SearchOutcome, Solution,
};
pub use state::{
    goal_board, goal_state, parse_board, render_board, PuzzleState, StateArena, StateId, Tile,
    BLANK, UNSCORED,
};
