//! Open lists: a priority frontier for A* and a stack frontier for IDA*

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::config::Algorithm;
use crate::error::{Result, SearchError};
use crate::state::{PuzzleState, StateId};

/// Depth bound that selects the priority frontier, which ignores bounds
pub const ASTAR_BOUND: u32 = 1000;

/// Heap entry ordered by cost, then heuristic, then insertion order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    cost: u32,
    heuristic: u32,
    seq: u64,
    id: StateId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.cost, self.heuristic, self.seq).cmp(&(other.cost, other.heuristic, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Discovered but not yet expanded states
#[derive(Debug)]
pub struct Frontier {
    open: Open,
}

#[derive(Debug)]
enum Open {
    /// Pops the minimal `depth + heuristic`
    Priority {
        heap: BinaryHeap<Reverse<Entry>>,
        next_seq: u64,
    },
    /// Pops the most recently added state
    Stack { stack: Vec<StateId>, bound: u32 },
}

impl Frontier {
    pub fn priority() -> Self {
        Self {
            open: Open::Priority {
                heap: BinaryHeap::new(),
                next_seq: 0,
            },
        }
    }

    pub fn stack(bound: u32) -> Self {
        Self {
            open: Open::Stack {
                stack: Vec::new(),
                bound,
            },
        }
    }

    /// Discipline picked by the depth bound: `ASTAR_BOUND` means the priority
    /// frontier, anything else a stack carrying that bound
    pub fn for_bound(bound: u32) -> Self {
        if bound == ASTAR_BOUND {
            Self::priority()
        } else {
            Self::stack(bound)
        }
    }

    /// Discipline for an algorithm. The bound is only carried for reporting.
    pub fn for_algorithm(algorithm: Algorithm, bound: u32) -> Self {
        match algorithm {
            Algorithm::AStar => Self::for_bound(ASTAR_BOUND),
            // an IDA* bound can grow past the A* flag on wide boards
            Algorithm::IdaStar => Self::stack(bound),
        }
    }

    /// Add a scored state already stored in the arena
    pub fn add(&mut self, id: StateId, state: &PuzzleState) {
        debug_assert!(state.is_scored(), "unscored state {} queued", state);
        match &mut self.open {
            Open::Priority { heap, next_seq } => {
                heap.push(Reverse(Entry {
                    cost: state.cost(),
                    heuristic: state.heuristic(),
                    seq: *next_seq,
                    id,
                }));
                *next_seq += 1;
            }
            Open::Stack { stack, .. } => stack.push(id),
        }
    }

    /// A queued state got shallower in place
    ///
    /// The heap gets a fresh entry under the lower cost and the caller skips
    /// the stale one when it surfaces. The stack already holds the id.
    pub fn reprioritize(&mut self, id: StateId, state: &PuzzleState) {
        if let Open::Priority { .. } = self.open {
            self.add(id, state);
        }
    }

    /// Next state to expand; `FrontierExhausted` when empty
    pub fn pop(&mut self) -> Result<StateId> {
        let next = match &mut self.open {
            Open::Priority { heap, .. } => heap.pop().map(|Reverse(entry)| entry.id),
            Open::Stack { stack, .. } => stack.pop(),
        };
        next.ok_or(SearchError::FrontierExhausted { bound: self.bound() })
    }

    pub fn len(&self) -> usize {
        match &self.open {
            Open::Priority { heap, .. } => heap.len(),
            Open::Stack { stack, .. } => stack.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_stack(&self) -> bool {
        matches!(self.open, Open::Stack { .. })
    }

    /// Bound reported on exhaustion
    pub fn bound(&self) -> u32 {
        match &self.open {
            Open::Priority { .. } => ASTAR_BOUND,
            Open::Stack { bound, .. } => *bound,
        }
    }
}
