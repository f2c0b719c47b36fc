//! Property-based tests for heuristics and move generation.

use proptest::prelude::*;

use tilesearch_core::{
    apply_move, goal_board, is_solvable, random_board, Direction, HeuristicKind, PuzzleConfig,
    PuzzleState, StateId, Tile,
};

/// Generates a width in 2..=5 with an arbitrary (possibly unsolvable) board.
fn arb_board() -> impl Strategy<Value = (usize, Vec<Tile>)> {
    (2usize..=5).prop_flat_map(|width| {
        let tiles: Vec<Tile> = (0..(width * width) as Tile).collect();
        Just(tiles).prop_shuffle().prop_map(move |board| (width, board))
    })
}

fn config(width: usize) -> PuzzleConfig {
    PuzzleConfig::new(width, HeuristicKind::Manhattan).unwrap()
}

proptest! {
    /// misplaced-tiles <= manhattan <= manhattan+linear-conflict on every board
    #[test]
    fn prop_heuristic_dominance((width, board) in arb_board()) {
        let cfg = config(width);
        let misplaced = HeuristicKind::MisplacedTiles.evaluate(&board, &cfg);
        let manhattan = HeuristicKind::Manhattan.evaluate(&board, &cfg);
        let linear = HeuristicKind::LinearConflict.evaluate(&board, &cfg);

        prop_assert!(misplaced <= manhattan, "{} > {} on {:?}", misplaced, manhattan, board);
        prop_assert!(manhattan <= linear, "{} > {} on {:?}", manhattan, linear, board);
    }

    /// A single move changes Manhattan distance by exactly one
    #[test]
    fn prop_manhattan_is_consistent((width, board) in arb_board(), dir in 0usize..4) {
        let cfg = config(width);
        let state = PuzzleState::root(board);
        if let Ok(child) = apply_move(&state, StateId(0), Direction::ALL[dir], &cfg) {
            let before = HeuristicKind::Manhattan.evaluate(state.board(), &cfg);
            let after = HeuristicKind::Manhattan.evaluate(child.board(), &cfg);
            prop_assert_eq!(before.abs_diff(after), 1);
        }
    }

    /// Moves never change solvability
    #[test]
    fn prop_moves_preserve_solvability((width, board) in arb_board(), dir in 0usize..4) {
        let cfg = config(width);
        let state = PuzzleState::root(board);
        if let Ok(child) = apply_move(&state, StateId(0), Direction::ALL[dir], &cfg) {
            prop_assert_eq!(is_solvable(state.board(), &cfg), is_solvable(child.board(), &cfg));
            prop_assert_eq!(child.depth(), state.depth() + 1);
        }
    }

    /// Random instances are solvable permutations
    #[test]
    fn prop_random_board_solvable(width in 2usize..=5, seed in any::<u64>()) {
        use rand::SeedableRng;
        let cfg = config(width);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let board = random_board(&cfg, &mut rng);

        prop_assert!(is_solvable(&board, &cfg));
        let mut sorted = board.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..cfg.size as Tile).collect::<Vec<_>>());
    }
}

#[test]
fn test_goal_heuristic_zero_all_widths() {
    for width in 2..=6 {
        let cfg = config(width);
        let goal = goal_board(&cfg);
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.evaluate(&goal, &cfg), 0, "{} on width {}", kind, width);
        }
    }
}
