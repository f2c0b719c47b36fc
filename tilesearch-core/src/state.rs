//! Puzzle states, the search arena and board parsing/rendering
//!
//! ## Architecture
//! - Level 2: Arena operations (insert, path reconstruction)
//! - Level 3: State construction and accessors
//! - Level 4: Board parsing, rendering, hashing

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet, FxHasher};

use crate::config::PuzzleConfig;
use crate::error::{Result, SearchError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Tile label; 0 is the blank
pub type Tile = u16;

/// The blank tile
pub const BLANK: Tile = 0;

/// Heuristic value of a state that has not been scored yet
pub const UNSCORED: u32 = 1000;

/// Token used for the blank when reading and printing boards
pub const BLANK_TOKEN: &str = "_";

// ============================================================================
// TYPES
// ============================================================================

/// Handle of a state inside a [`StateArena`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

/// One configuration of the puzzle plus search bookkeeping
///
/// Equality and hashing look at the board only; depth, parent and heuristic
/// are bookkeeping.
#[derive(Clone, Debug)]
pub struct PuzzleState {
    board: Rc<[Tile]>,
    parent: Option<StateId>,
    depth: u32,
    heuristic: u32,
    hash: OnceCell<u64>,
}

impl PuzzleState {
    /// Create a root state (no parent, depth 0)
    pub fn root(board: Vec<Tile>) -> Self {
        Self {
            board: board.into(),
            parent: None,
            depth: 0,
            heuristic: UNSCORED,
            hash: OnceCell::new(),
        }
    }

    /// Create the state one move below `parent`
    pub fn child(board: Vec<Tile>, parent_id: StateId, parent: &PuzzleState) -> Self {
        Self {
            board: board.into(),
            parent: Some(parent_id),
            depth: parent.depth + 1,
            heuristic: UNSCORED,
            hash: OnceCell::new(),
        }
    }

    /// Attach a heuristic estimate. Done before the state enters the arena.
    pub fn with_heuristic(mut self, heuristic: u32) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn board(&self) -> &[Tile] {
        &self.board
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Moves from the initial state (`c`)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Estimated moves to the goal (`h`)
    pub fn heuristic(&self) -> u32 {
        self.heuristic
    }

    /// Total estimated cost `c + h`
    pub fn cost(&self) -> u32 {
        self.depth + self.heuristic
    }

    pub fn is_scored(&self) -> bool {
        self.heuristic != UNSCORED
    }

    /// Index of the blank cell, `None` for a board without one
    pub fn blank_index(&self) -> Option<usize> {
        blank_index(&self.board)
    }

    /// Deterministic hash of the board, computed on first use
    pub fn stable_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = FxHasher::default();
            self.board.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Board identity usable as a closed-set key
    pub fn key(&self) -> BoardKey {
        BoardKey {
            board: Rc::clone(&self.board),
            hash: self.stable_hash(),
        }
    }

    /// Cells joined by spaces, blank as `_`
    pub fn board_string(&self) -> String {
        render_board(&self.board)
    }
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
    }
}

impl Eq for PuzzleState {}

impl Hash for PuzzleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.stable_hash());
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

/// Shared board plus its precomputed hash
#[derive(Clone, Debug)]
pub struct BoardKey {
    board: Rc<[Tile]>,
    hash: u64,
}

impl PartialEq for BoardKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.board == other.board
    }
}

impl Eq for BoardKey {}

impl Hash for BoardKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

// ============================================================================
// STATE ARENA (Level 2)
// ============================================================================

/// Owner of every state created during one search, one record per board
///
/// A record's depth and parent are rewritten in place when a shorter path to
/// its board turns up. Depths only shrink, so a parent always stays strictly
/// shallower than its child and parent chains cannot cycle.
#[derive(Debug, Default)]
pub struct StateArena {
    states: Vec<PuzzleState>,
    index: FxHashMap<BoardKey, StateId>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a state for a board not seen before and hand back its id
    pub fn insert(&mut self, state: PuzzleState) -> StateId {
        debug_assert!(self.find(&state).is_none(), "board {} stored twice", state);
        let id = StateId(self.states.len());
        self.index.insert(state.key(), id);
        self.states.push(state);
        id
    }

    /// Record holding the board of `state`
    pub fn find(&self, state: &PuzzleState) -> Option<StateId> {
        self.index.get(&state.key()).copied()
    }

    /// Take over depth and parent from `shorter`, a cheaper path to the
    /// same board
    pub fn relink(&mut self, id: StateId, shorter: &PuzzleState) {
        let record = &mut self.states[id.0];
        debug_assert!(*record == *shorter && shorter.depth < record.depth);
        record.depth = shorter.depth;
        record.parent = shorter.parent;
    }

    pub fn get(&self, id: StateId) -> &PuzzleState {
        &self.states[id.0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Ids from the root down to `id`, following parent handles
    pub fn path_to(&self, id: StateId) -> Vec<StateId> {
        let mut path = vec![id];
        let mut current = id;

        while let Some(parent) = self.get(current).parent() {
            path.push(parent);
            current = parent;
        }

        path.reverse();
        path
    }
}

impl Index<StateId> for StateArena {
    type Output = PuzzleState;

    fn index(&self, id: StateId) -> &PuzzleState {
        self.get(id)
    }
}

// ============================================================================
// BOARDS (Level 4)
// ============================================================================

/// `[1, 2, ..., N-1, 0]`
pub fn goal_board(config: &PuzzleConfig) -> Vec<Tile> {
    let mut board: Vec<Tile> = (1..config.size as Tile).collect();
    board.push(BLANK);
    board
}

/// The fixed goal state for a configuration
pub fn goal_state(config: &PuzzleConfig) -> PuzzleState {
    PuzzleState::root(goal_board(config)).with_heuristic(0)
}

pub fn blank_index(board: &[Tile]) -> Option<usize> {
    board.iter().position(|&t| t == BLANK)
}

/// Render a board as space separated cells with `_` for the blank
pub fn render_board(board: &[Tile]) -> String {
    board
        .iter()
        .map(|&t| {
            if t == BLANK {
                BLANK_TOKEN.to_string()
            } else {
                t.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse user tokens into a board. `_` and `0` both mean the blank.
pub fn parse_board<S: AsRef<str>>(tokens: &[S], config: &PuzzleConfig) -> Result<Vec<Tile>> {
    if tokens.len() != config.size {
        return Err(SearchError::InvalidConfiguration(format!(
            "invalid state for width {}: expected {} cells, got {}",
            config.width,
            config.size,
            tokens.len()
        )));
    }

    let mut board = Vec::with_capacity(config.size);
    for token in tokens {
        let token = token.as_ref().trim();
        let tile = if token == BLANK_TOKEN {
            BLANK
        } else {
            token.parse::<Tile>().map_err(|_| {
                SearchError::InvalidConfiguration(format!("invalid tile '{}'", token))
            })?
        };
        board.push(tile);
    }

    validate_board(&board, config)?;
    Ok(board)
}

/// Check that `board` is a permutation of `0..size`
pub fn validate_board(board: &[Tile], config: &PuzzleConfig) -> Result<()> {
    if board.len() != config.size {
        return Err(SearchError::InvalidConfiguration(format!(
            "board has {} cells, width {} needs {}",
            board.len(),
            config.width,
            config.size
        )));
    }

    let mut seen = FxHashSet::default();
    for &tile in board {
        if tile as usize >= config.size {
            return Err(SearchError::InvalidConfiguration(format!(
                "tile {} out of range for width {}",
                tile, config.width
            )));
        }
        if !seen.insert(tile) {
            return Err(SearchError::InvalidConfiguration(format!(
                "tile {} appears more than once",
                tile
            )));
        }
    }

    Ok(())
}
