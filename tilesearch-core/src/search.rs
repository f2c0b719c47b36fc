//! Unified A*/IDA* search driver
//!
//! Both algorithms run the same branch-and-bound loop; only the frontier
//! discipline differs. Goals are detected when generated and kept as the
//! incumbent, which then cuts off every state whose `depth + h` is not
//! strictly below it.
//!
//! ## Architecture
//! - Level 1: solve(), solve_from() - retry policy and path reconstruction
//! - Level 2: search() - the expansion loop
//! - Level 3: closed set, incumbent test, child scoring
//! - Level 4: utilities

use std::cmp::Reverse;

use rustc_hash::FxHashSet;

use crate::config::{Algorithm, PuzzleConfig, SearchConfig};
use crate::error::{Result, SearchError};
use crate::frontier::{Frontier, ASTAR_BOUND};
use crate::heuristics::score;
use crate::moves::{is_solvable, moves_str, successors, Direction};
use crate::state::{goal_state, validate_board, PuzzleState, StateArena, StateId, Tile};

// ============================================================================
// RESULTS
// ============================================================================

/// Everything one search call produced
#[derive(Debug)]
pub struct SearchOutcome {
    /// One record per board seen during the search
    pub arena: StateArena,
    /// Best goal state found, if any
    pub incumbent: Option<StateId>,
    /// Closed set at termination
    pub closed: ClosedSet,
    /// States still in the frontier at termination
    pub open_remaining: usize,
    /// Closed states evicted because a shorter path turned up
    pub reopened: usize,
}

impl SearchOutcome {
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Build the solution path, or `FrontierExhausted` when no goal was found
    pub fn into_solution(self, config: &PuzzleConfig, bound: u32) -> Result<Solution> {
        let incumbent = self
            .incumbent
            .ok_or(SearchError::FrontierExhausted { bound })?;

        let path: Vec<PuzzleState> = self
            .arena
            .path_to(incumbent)
            .into_iter()
            .map(|id| self.arena[id].clone())
            .collect();

        // Consecutive path states are always one move apart
        let moves = path
            .windows(2)
            .filter_map(|pair| match (pair[0].blank_index(), pair[1].blank_index()) {
                (Some(from), Some(to)) => Direction::between(from, to, config),
                _ => None,
            })
            .collect();

        Ok(Solution {
            depth: self.arena[incumbent].depth(),
            path,
            moves,
            closed: self.closed.len(),
            open_remaining: self.open_remaining,
            reopened: self.reopened,
            bound,
        })
    }
}

/// A solved instance
#[derive(Clone, Debug)]
pub struct Solution {
    /// States from the initial board to the goal, both included
    pub path: Vec<PuzzleState>,
    /// Moves of the blank, one per path step
    pub moves: Vec<Direction>,
    /// Number of moves
    pub depth: u32,
    /// Closed-set size at termination
    pub closed: usize,
    /// Frontier size at termination
    pub open_remaining: usize,
    /// Re-expansions during the successful attempt
    pub reopened: usize,
    /// Bound of the successful attempt
    pub bound: u32,
}

impl Solution {
    /// Board strings from initial to goal
    pub fn path_strings(&self) -> Vec<String> {
        self.path.iter().map(PuzzleState::board_string).collect()
    }

    pub fn moves_str(&self) -> String {
        moves_str(&self.moves)
    }

    pub fn initial(&self) -> &PuzzleState {
        &self.path[0]
    }
}

// ============================================================================
// LEVEL 1 - SOLVE WITH RETRY POLICY
// ============================================================================

/// Validate a user-supplied board and turn it into a root state
pub fn prepare_initial(board: Vec<Tile>, config: &PuzzleConfig) -> Result<PuzzleState> {
    validate_board(&board, config)?;
    let state = PuzzleState::root(board);
    if !is_solvable(state.board(), config) {
        return Err(SearchError::InvalidConfiguration(format!(
            "initial state {} is not solvable",
            state
        )));
    }
    Ok(state)
}

/// Reject unsolvable boards, then search with the retry policy
pub fn solve(
    initial: &PuzzleState,
    config: &PuzzleConfig,
    search_config: &SearchConfig,
) -> Result<Solution> {
    let root = prepare_initial(initial.board().to_vec(), config)?;
    solve_from(&root, config, search_config)
}

/// Search until a solution is found or the retry budget runs out
///
/// The board must be a permutation but need not be solvable. A search that
/// ends with an empty frontier and no incumbent counts as exhaustion. IDA*
/// starts its bound at `h(initial)` and raises it by one per exhaustion, up to
/// `retry_limit` retries; A* gives up at once.
pub fn solve_from(
    initial: &PuzzleState,
    config: &PuzzleConfig,
    search_config: &SearchConfig,
) -> Result<Solution> {
    let root = score(PuzzleState::root(initial.board().to_vec()), config);
    let goal = goal_state(config);

    let mut bound = match search_config.algorithm {
        Algorithm::AStar => ASTAR_BOUND,
        Algorithm::IdaStar => root.heuristic(),
    };
    let mut retries = 0;

    loop {
        let frontier = Frontier::for_algorithm(search_config.algorithm, bound);
        let result = search(&root, &goal, frontier, config)
            .and_then(|outcome| outcome.into_solution(config, bound));

        match result {
            Ok(solution) => return Ok(solution),
            Err(SearchError::FrontierExhausted { .. })
                if search_config.algorithm.is_ida() && retries < search_config.retry_limit =>
            {
                retries += 1;
                bound += 1;
                tracing::debug!("Frontier exhausted, retrying with bound {}", bound);
            }
            Err(e) => {
                tracing::warn!("Search gave up: {}", e);
                return Err(e);
            }
        }
    }
}

// ============================================================================
// LEVEL 2 - SEARCH LOOP
// ============================================================================

/// Run the branch-and-bound loop over the supplied frontier
///
/// Terminates when the frontier is empty. Every board has one arena record.
/// A child reaching a known board is dropped unless it is strictly
/// shallower, in which case the record is relinked in place: a closed record
/// is evicted and queued again, a queued one is reprioritized.
pub fn search(
    initial: &PuzzleState,
    goal: &PuzzleState,
    mut frontier: Frontier,
    config: &PuzzleConfig,
) -> Result<SearchOutcome> {
    validate_board(initial.board(), config)?;

    let mut arena = StateArena::new();
    let mut closed = ClosedSet::default();
    let mut queued: FxHashSet<StateId> = FxHashSet::default();
    let mut incumbent: Option<StateId> = None;
    let mut reopened = 0;

    let root_id = arena.insert(score(PuzzleState::root(initial.board().to_vec()), config));
    if arena[root_id] == *goal {
        incumbent = Some(root_id);
    }
    frontier.add(root_id, &arena[root_id]);
    queued.insert(root_id);

    while !frontier.is_empty() {
        let id = frontier.pop()?;
        queued.remove(&id);

        // Heap entries superseded by reprioritize surface after the record
        // was expanded
        if closed.contains(id) || !beats_incumbent(&arena, incumbent, arena[id].cost()) {
            continue;
        }
        closed.close(id);

        for child in scored_children(&arena[id], id, config) {
            if !beats_incumbent(&arena, incumbent, child.cost()) {
                continue;
            }

            let known = arena.find(&child);
            if known.is_some_and(|known| arena[known].depth() <= child.depth()) {
                continue;
            }

            let child_id = match known {
                Some(known) => {
                    arena.relink(known, &child);
                    if closed.evict(known) {
                        reopened += 1;
                    }
                    known
                }
                None => arena.insert(child),
            };

            if arena[child_id] == *goal {
                incumbent = Some(child_id);
            } else if queued.contains(&child_id) {
                frontier.reprioritize(child_id, &arena[child_id]);
            } else {
                frontier.add(child_id, &arena[child_id]);
                queued.insert(child_id);
            }
        }
    }

    tracing::debug!(
        "Search finished: {} closed, {} reopened, {} states, solution depth {:?}",
        closed.len(),
        reopened,
        arena.len(),
        incumbent.map(|id| arena[id].depth())
    );

    Ok(SearchOutcome {
        open_remaining: frontier.len(),
        arena,
        incumbent,
        closed,
        reopened,
    })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Expanded records
///
/// A record is closed at its current depth; relinking it to a shallower
/// path evicts it.
#[derive(Debug, Default)]
pub struct ClosedSet {
    ids: FxHashSet<StateId>,
}

impl ClosedSet {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns false if the record was already closed
    pub fn close(&mut self, id: StateId) -> bool {
        self.ids.insert(id)
    }

    /// Returns true if the record was closed
    pub fn evict(&mut self, id: StateId) -> bool {
        self.ids.remove(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.ids.iter().copied()
    }
}

/// A state may be expanded only while it can still beat the incumbent
fn beats_incumbent(arena: &StateArena, incumbent: Option<StateId>, cost: u32) -> bool {
    incumbent.map_or(true, |best| cost < arena[best].cost())
}

/// Children of `state`, scored, highest heuristic first
fn scored_children(state: &PuzzleState, id: StateId, config: &PuzzleConfig) -> Vec<PuzzleState> {
    let mut children: Vec<PuzzleState> = successors(state, id, config)
        .into_iter()
        .map(|child| score(child, config))
        .collect();
    // Descending, unlike an ascending sort, so the stack frontier pops the
    // lowest-h child next
    children.sort_by_key(|child| Reverse(child.heuristic()));
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::HeuristicKind;
    use crate::moves::replay;

    fn config(width: usize, heuristic: HeuristicKind) -> PuzzleConfig {
        PuzzleConfig::new(width, heuristic).unwrap()
    }

    #[test]
    fn test_closed_set_close_and_evict() {
        let mut closed = ClosedSet::default();
        assert!(closed.close(StateId(3)));
        assert!(!closed.close(StateId(3)));
        assert!(closed.contains(StateId(3)));
        assert_eq!(closed.len(), 1);

        assert!(closed.evict(StateId(3)));
        assert!(!closed.evict(StateId(3)));
        assert!(closed.is_empty());
    }

    #[test]
    fn test_scored_children_order() {
        let cfg = config(3, HeuristicKind::Manhattan);
        let state = score(PuzzleState::root(vec![1, 2, 3, 4, 5, 6, 7, 0, 8]), &cfg);
        let children = scored_children(&state, StateId(0), &cfg);

        assert_eq!(children.len(), 3);
        assert!(children.windows(2).all(|w| w[0].heuristic() >= w[1].heuristic()));
        assert_eq!(children.last().unwrap().heuristic(), 0);
    }

    #[test]
    fn test_initial_goal_returns_immediately() {
        let cfg = config(3, HeuristicKind::Manhattan);
        let goal = goal_state(&cfg);
        let solution = solve(&goal, &cfg, &SearchConfig::a_star()).unwrap();

        assert_eq!(solution.depth, 0);
        assert_eq!(solution.path.len(), 1);
        assert_eq!(solution.closed, 0);
        assert_eq!(solution.open_remaining, 0);
    }

    #[test]
    fn test_scenario_a_misplaced_tiles() {
        let cfg = config(2, HeuristicKind::MisplacedTiles);
        let initial = PuzzleState::root(vec![1, 2, 0, 3]);

        for search_config in [SearchConfig::a_star(), SearchConfig::ida_star()] {
            let solution = solve(&initial, &cfg, &search_config).unwrap();
            assert_eq!(solution.depth, 1);
            assert_eq!(solution.path_strings(), vec!["1 2 _ 3", "1 2 3 _"]);
            assert_eq!(solution.moves, vec![Direction::Right]);
            assert_eq!(solution.open_remaining, 0);
        }
    }

    #[test]
    fn test_search_reports_exhaustion_without_goal() {
        let cfg = config(2, HeuristicKind::Manhattan);
        let unsolvable = PuzzleState::root(vec![2, 1, 3, 0]);
        let goal = goal_state(&cfg);

        let outcome = search(&unsolvable, &goal, Frontier::priority(), &cfg).unwrap();
        assert!(outcome.incumbent.is_none());
        assert_eq!(outcome.open_remaining, 0);
        // the whole reachable half of the 2x2 state space
        assert_eq!(outcome.closed_len(), 12);

        assert_eq!(
            outcome.into_solution(&cfg, ASTAR_BOUND).unwrap_err(),
            SearchError::FrontierExhausted { bound: ASTAR_BOUND }
        );
    }

    #[test]
    fn test_solve_rejects_unsolvable() {
        let cfg = config(3, HeuristicKind::Manhattan);
        let initial = PuzzleState::root(vec![2, 1, 3, 4, 5, 6, 7, 8, 0]);
        assert!(matches!(
            solve(&initial, &cfg, &SearchConfig::ida_star()),
            Err(SearchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_ida_star_raises_bound_until_retry_limit() {
        let cfg = config(2, HeuristicKind::Manhattan);
        let unsolvable = PuzzleState::root(vec![2, 1, 3, 0]);
        let h = HeuristicKind::Manhattan.evaluate(unsolvable.board(), &cfg);
        assert_eq!(h, 2);

        for retry_limit in [0, 3] {
            let search_config = SearchConfig::ida_star().with_retry_limit(retry_limit);
            assert_eq!(
                solve_from(&unsolvable, &cfg, &search_config).unwrap_err(),
                SearchError::FrontierExhausted { bound: h + retry_limit }
            );
        }
    }

    #[test]
    fn test_a_star_exhaustion_is_terminal() {
        let cfg = config(2, HeuristicKind::Manhattan);
        let unsolvable = PuzzleState::root(vec![2, 1, 3, 0]);
        let search_config = SearchConfig::a_star().with_retry_limit(5);

        assert_eq!(
            solve_from(&unsolvable, &cfg, &search_config).unwrap_err(),
            SearchError::FrontierExhausted { bound: ASTAR_BOUND }
        );
    }

    #[test]
    fn test_search_rejects_board_without_blank() {
        let cfg = config(2, HeuristicKind::Manhattan);
        let blankless = PuzzleState::root(vec![1, 2, 3, 4]);
        let goal = goal_state(&cfg);

        assert!(matches!(
            search(&blankless, &goal, Frontier::stack(0), &cfg),
            Err(SearchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_a_star_finds_optimal_depth() {
        let cfg = config(3, HeuristicKind::LinearConflict);
        let goal = goal_state(&cfg);
        // blank once around the lower-right 2x2 block: manhattan is already 4
        let cycle = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        let initial = PuzzleState::root(replay(goal.board(), &cycle, &cfg).unwrap());
        assert_eq!(initial.board(), &[1, 2, 3, 4, 8, 5, 7, 6, 0]);

        let solution = solve(&initial, &cfg, &SearchConfig::a_star()).unwrap();
        assert_eq!(solution.depth, 4);
        assert_eq!(solution.moves.len(), 4);
        let replayed = replay(initial.board(), &solution.moves, &cfg).unwrap();
        assert_eq!(replayed, goal.board());
    }
}
