//! Admissible distance estimators
//!
//! Every estimator looks at the board alone and ignores the blank. For any
//! board: misplaced-tiles <= manhattan <= manhattan+linear-conflict.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PuzzleConfig;
use crate::error::SearchError;
use crate::state::{PuzzleState, Tile, BLANK};

/// Which estimator scores states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeuristicKind {
    /// Number of tiles away from their goal cell
    #[serde(rename = "misplaced-tiles")]
    MisplacedTiles,
    /// Sum of row and column distances to the goal cell
    #[default]
    #[serde(rename = "manhattan")]
    Manhattan,
    /// Manhattan plus two moves per linear conflict
    #[serde(rename = "manhattan+linear-conflict")]
    LinearConflict,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 3] = [
        HeuristicKind::MisplacedTiles,
        HeuristicKind::Manhattan,
        HeuristicKind::LinearConflict,
    ];

    /// Canonical name, as written to the results log
    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::MisplacedTiles => "misplaced-tiles",
            HeuristicKind::Manhattan => "manhattan",
            HeuristicKind::LinearConflict => "manhattan+linear-conflict",
        }
    }

    /// Estimate moves-to-goal for `board`
    pub fn evaluate(self, board: &[Tile], config: &PuzzleConfig) -> u32 {
        match self {
            HeuristicKind::MisplacedTiles => misplaced_tiles(board),
            HeuristicKind::Manhattan => manhattan(board, config.width),
            HeuristicKind::LinearConflict => {
                manhattan(board, config.width) + linear_conflicts(board, config.width)
            }
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HeuristicKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "misplaced-tiles" | "number" => Ok(HeuristicKind::MisplacedTiles),
            "manhattan" => Ok(HeuristicKind::Manhattan),
            "manhattan+linear-conflict" | "linear" => Ok(HeuristicKind::LinearConflict),
            other => Err(SearchError::InvalidConfiguration(format!(
                "invalid heuristic chosen: '{}'",
                other
            ))),
        }
    }
}

/// Score a state with the configured heuristic
pub fn score(state: PuzzleState, config: &PuzzleConfig) -> PuzzleState {
    let h = config.heuristic.evaluate(state.board(), config);
    state.with_heuristic(h)
}

// ============================================================================
// ESTIMATORS
// ============================================================================

/// Goal cell of a non-blank tile
fn goal_index(tile: Tile) -> usize {
    tile as usize - 1
}

pub fn misplaced_tiles(board: &[Tile]) -> u32 {
    board
        .iter()
        .enumerate()
        .filter(|&(idx, &tile)| tile != BLANK && idx != goal_index(tile))
        .count() as u32
}

pub fn manhattan(board: &[Tile], width: usize) -> u32 {
    board
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(idx, &tile)| {
            let goal = goal_index(tile);
            let dx = (idx % width).abs_diff(goal % width);
            let dy = (idx / width).abs_diff(goal / width);
            (dx + dy) as u32
        })
        .sum()
}

/// Extra cost from linear conflicts: 2 per conflicting pair
///
/// `rows[r][c]` holds the goal column of the tile at row r, column c when
/// that tile already sits in its goal row; `cols` is the transpose.
pub fn linear_conflicts(board: &[Tile], width: usize) -> u32 {
    let mut rows: Vec<Vec<Option<usize>>> = vec![vec![None; width]; width];
    let mut cols: Vec<Vec<Option<usize>>> = vec![vec![None; width]; width];

    for (idx, &tile) in board.iter().enumerate() {
        if tile == BLANK {
            continue;
        }
        let goal = goal_index(tile);
        let (x, y) = (idx % width, idx / width);
        let (goal_x, goal_y) = (goal % width, goal / width);

        if y == goal_y {
            rows[y][x] = Some(goal_x);
        }
        if x == goal_x {
            cols[x][y] = Some(goal_y);
        }
    }

    rows.iter()
        .chain(cols.iter())
        .map(|line| line_conflicts(line))
        .sum()
}

/// For each keyed position, count later positions whose goal comes earlier
fn line_conflicts(line: &[Option<usize>]) -> u32 {
    let mut extra = 0;
    for (key, goal) in line.iter().enumerate() {
        let Some(goal) = goal else { continue };
        for later in line[key + 1..].iter().flatten() {
            if later < goal {
                extra += 2;
            }
        }
    }
    extra
}
