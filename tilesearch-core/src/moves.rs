//! Move generation, solvability and random instances

use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::PuzzleConfig;
use crate::error::{Result, SearchError};
use crate::state::{blank_index, PuzzleState, StateId, Tile, BLANK};

// ============================================================================
// DIRECTIONS
// ============================================================================

/// Direction the blank travels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Expansion order used by the driver
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub fn to_char(self) -> char {
        match self {
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Up => 'U',
        }
    }

    /// Index the blank moves to, or `None` when it would leave the board
    pub fn target(self, blank: usize, config: &PuzzleConfig) -> Option<usize> {
        let width = config.width;
        match self {
            Direction::Right => (blank % width != width - 1).then(|| blank + 1),
            Direction::Left => (blank % width != 0).then(|| blank - 1),
            Direction::Up => (blank >= width).then(|| blank - width),
            Direction::Down => (blank < config.size - width).then(|| blank + width),
        }
    }

    /// Which move takes the blank from `from` to `to`, if they are adjacent
    pub fn between(from: usize, to: usize, config: &PuzzleConfig) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.target(from, config) == Some(to))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Up => "up",
        };
        f.write_str(s)
    }
}

/// Compact move string such as `RDLU`
pub fn moves_str(moves: &[Direction]) -> String {
    moves.iter().map(|d| d.to_char()).collect()
}

// ============================================================================
// MOVE GENERATION
// ============================================================================

/// Slide the blank of `state` one cell, producing a child of `state_id`
pub fn apply_move(
    state: &PuzzleState,
    state_id: StateId,
    direction: Direction,
    config: &PuzzleConfig,
) -> Result<PuzzleState> {
    let blank = state.blank_index().ok_or_else(missing_blank)?;
    let target = direction
        .target(blank, config)
        .ok_or(SearchError::InvalidMove { direction, blank })?;

    let mut board = state.board().to_vec();
    board.swap(blank, target);
    Ok(PuzzleState::child(board, state_id, state))
}

pub fn move_right(state: &PuzzleState, id: StateId, config: &PuzzleConfig) -> Result<PuzzleState> {
    apply_move(state, id, Direction::Right, config)
}

pub fn move_left(state: &PuzzleState, id: StateId, config: &PuzzleConfig) -> Result<PuzzleState> {
    apply_move(state, id, Direction::Left, config)
}

pub fn move_up(state: &PuzzleState, id: StateId, config: &PuzzleConfig) -> Result<PuzzleState> {
    apply_move(state, id, Direction::Up, config)
}

pub fn move_down(state: &PuzzleState, id: StateId, config: &PuzzleConfig) -> Result<PuzzleState> {
    apply_move(state, id, Direction::Down, config)
}

fn missing_blank() -> SearchError {
    SearchError::InvalidConfiguration("board has no blank".to_string())
}

/// All valid children in expansion order; boundary moves are skipped
pub fn successors(state: &PuzzleState, id: StateId, config: &PuzzleConfig) -> Vec<PuzzleState> {
    Direction::ALL
        .into_iter()
        .filter_map(|dir| apply_move(state, id, dir, config).ok())
        .collect()
}

/// Apply a whole move sequence to a bare board
pub fn replay(board: &[Tile], moves: &[Direction], config: &PuzzleConfig) -> Result<Vec<Tile>> {
    let mut board = board.to_vec();
    for &direction in moves {
        let blank = blank_index(&board).ok_or_else(missing_blank)?;
        let target = direction
            .target(blank, config)
            .ok_or(SearchError::InvalidMove { direction, blank })?;
        board.swap(blank, target);
    }
    Ok(board)
}

// ============================================================================
// SOLVABILITY
// ============================================================================

/// Pairs of non-blank tiles out of goal order
pub fn count_inversions(board: &[Tile]) -> usize {
    board
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(i, &tile)| {
            board[i + 1..]
                .iter()
                .filter(|&&next| next != BLANK && next < tile)
                .count()
        })
        .sum()
}

/// Whether `board` can reach the goal
///
/// Odd width: inversions must be even. Even width: the parity of the
/// inversions must differ from the parity of the blank's row, counted from
/// the top starting at 0. A board without a blank is never solvable.
pub fn is_solvable(board: &[Tile], config: &PuzzleConfig) -> bool {
    let Some(blank) = blank_index(board) else {
        return false;
    };
    let inversions = count_inversions(board);

    if config.width % 2 == 1 {
        inversions % 2 == 0
    } else {
        let blank_row = blank / config.width;
        (inversions + blank_row) % 2 == 1
    }
}

// ============================================================================
// RANDOM INSTANCES
// ============================================================================

/// Shuffle until the board is solvable
pub fn random_board<R: Rng + ?Sized>(config: &PuzzleConfig, rng: &mut R) -> Vec<Tile> {
    let mut board: Vec<Tile> = (0..config.size as Tile).collect();
    loop {
        board.shuffle(rng);
        if is_solvable(&board, config) {
            return board;
        }
    }
}

/// Random solvable root state, reproducible when a seed is given
pub fn generate_initial_state(config: &PuzzleConfig, seed: Option<u64>) -> PuzzleState {
    let mut rng = create_rng(seed);
    PuzzleState::root(random_board(config, &mut rng))
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::HeuristicKind;
    use crate::state::goal_board;

    fn config(width: usize) -> PuzzleConfig {
        PuzzleConfig::new(width, HeuristicKind::Manhattan).unwrap()
    }

    #[test]
    fn test_move_right_from_scenario_a() {
        let cfg = config(2);
        let root = PuzzleState::root(vec![1, 2, 0, 3]);
        let child = move_right(&root, StateId(0), &cfg).unwrap();
        assert_eq!(child.board(), &[1, 2, 3, 0]);
        assert_eq!(child.parent(), Some(StateId(0)));
        assert_eq!(child.depth(), 1);
    }

    #[test]
    fn test_boundary_moves_are_invalid() {
        let cfg = config(3);
        // blank in the top-left corner
        let corner = PuzzleState::root(vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(
            move_left(&corner, StateId(0), &cfg),
            Err(SearchError::InvalidMove { direction: Direction::Left, blank: 0 })
        );
        assert!(move_up(&corner, StateId(0), &cfg).is_err());
        assert!(move_right(&corner, StateId(0), &cfg).is_ok());
        assert!(move_down(&corner, StateId(0), &cfg).is_ok());

        let goal = PuzzleState::root(goal_board(&cfg));
        assert!(move_right(&goal, StateId(0), &cfg).is_err());
        assert!(move_down(&goal, StateId(0), &cfg).is_err());
    }

    #[test]
    fn test_successor_counts() {
        let cfg = config(3);
        let centre = PuzzleState::root(vec![1, 2, 3, 4, 0, 5, 6, 7, 8]);
        assert_eq!(successors(&centre, StateId(0), &cfg).len(), 4);

        let edge = PuzzleState::root(vec![1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(successors(&edge, StateId(0), &cfg).len(), 3);

        let goal = PuzzleState::root(goal_board(&cfg));
        let children = successors(&goal, StateId(0), &cfg);
        assert_eq!(children.len(), 2);
        // left first, then up
        assert_eq!(children[0].blank_index(), Some(7));
        assert_eq!(children[1].blank_index(), Some(5));
    }

    #[test]
    fn test_board_without_blank_has_no_moves() {
        let cfg = config(2);
        let blankless = PuzzleState::root(vec![1, 2, 3, 4]);

        assert!(matches!(
            move_right(&blankless, StateId(0), &cfg),
            Err(SearchError::InvalidConfiguration(_))
        ));
        assert!(successors(&blankless, StateId(0), &cfg).is_empty());
        assert!(replay(&[1, 2, 3, 4], &[Direction::Left], &cfg).is_err());
        assert!(!is_solvable(&[1, 2, 3, 4], &cfg));
        assert!(!is_solvable(&[1, 2, 3, 4, 5, 6, 7, 8, 9], &config(3)));
    }

    #[test]
    fn test_direction_between() {
        let cfg = config(3);
        assert_eq!(Direction::between(4, 5, &cfg), Some(Direction::Right));
        assert_eq!(Direction::between(4, 1, &cfg), Some(Direction::Up));
        assert_eq!(Direction::between(2, 3, &cfg), None);
    }

    #[test]
    fn test_replay() {
        let cfg = config(2);
        let board = replay(&[1, 2, 0, 3], &[Direction::Right], &cfg).unwrap();
        assert_eq!(board, vec![1, 2, 3, 0]);
        assert!(replay(&[1, 2, 3, 0], &[Direction::Right], &cfg).is_err());
    }

    #[test]
    fn test_solvability_rules() {
        let two = config(2);
        assert!(is_solvable(&[1, 2, 3, 0], &two));
        assert!(is_solvable(&[1, 2, 0, 3], &two));
        assert!(!is_solvable(&[2, 1, 3, 0], &two));

        let three = config(3);
        assert!(is_solvable(&[1, 2, 3, 4, 5, 6, 7, 8, 0], &three));
        assert!(!is_solvable(&[2, 1, 3, 4, 5, 6, 7, 8, 0], &three));

        let four = config(4);
        let mut goal = goal_board(&four);
        assert!(is_solvable(&goal, &four));
        goal.swap(0, 1);
        assert!(!is_solvable(&goal, &four));
    }

    #[test]
    fn test_random_board_is_solvable_and_seeded() {
        let cfg = config(4);
        let a = generate_initial_state(&cfg, Some(7));
        let b = generate_initial_state(&cfg, Some(7));
        assert_eq!(a, b);
        assert!(is_solvable(a.board(), &cfg));

        let mut sorted = a.board().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<Tile>>());
    }
}
