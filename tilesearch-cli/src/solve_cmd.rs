//! Solve command - run one search and report it
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_configs(), load_initial_state(), timed_solve(), report_results()
//! - Level 3: results_log::append()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use tilesearch_core::{
    generate_initial_state, parse_board, prepare_initial, solve, Algorithm, HeuristicKind,
    PuzzleConfig, PuzzleState, SearchConfig, Solution, DEFAULT_RETRY_LIMIT,
};

use crate::results_log::{self, RunRecord};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Width of the puzzle to solve
    #[arg(short, long, default_value = "3")]
    pub width: usize,

    /// Heuristic: misplaced-tiles (number), manhattan, manhattan+linear-conflict (linear)
    #[arg(long, default_value = "manhattan")]
    pub heuristic: String,

    /// Initial state, row-major, blank as `_` (default: random)
    #[arg(short, long, num_args = 1..)]
    pub state: Option<Vec<String>>,

    /// Use iterative deepening A*
    #[arg(short, long)]
    pub id: bool,

    /// Results log to append to
    #[arg(long, value_name = "FILE", default_value = "results.csv")]
    pub results: PathBuf,

    /// IDA* bound increases before giving up
    #[arg(long, default_value_t = DEFAULT_RETRY_LIMIT)]
    pub retry_limit: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of a timed search
struct RunResults {
    solution: Solution,
    seconds: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the solve command
///
/// 1. Parse configuration (unknown heuristic is fatal)
/// 2. Load or generate the initial state
/// 3. Solve, log and report
pub fn run(args: SolveArgs, seed: Option<u64>) -> Result<()> {
    let heuristic: HeuristicKind = args
        .heuristic
        .parse()
        .context("Failed to parse --heuristic")?;

    let Some((config, search_config)) = build_configs(&args, heuristic) else {
        return Ok(());
    };

    let Some(initial) = load_initial_state(&args, &config, seed) else {
        return Ok(());
    };

    tracing::info!(
        "Solving {} (width={}, heuristic={}, algorithm={:?})",
        initial,
        config.width,
        config.heuristic,
        search_config.algorithm
    );

    let results = timed_solve(&initial, &config, &search_config)?;

    tracing::info!(
        "Solved in {} moves ({} closed, {} reopened, {:.3}s)",
        results.solution.depth,
        results.solution.closed,
        results.solution.reopened,
        results.seconds
    );

    let record = RunRecord::from_solution(
        &results.solution,
        config.tile_count(),
        config.heuristic,
        search_config.algorithm.is_ida(),
        results.seconds,
    );
    results_log::append(&args.results, &record)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Puzzle and search configuration, or `None` after printing a diagnostic
fn build_configs(
    args: &SolveArgs,
    heuristic: HeuristicKind,
) -> Option<(PuzzleConfig, SearchConfig)> {
    let config = match PuzzleConfig::new(args.width, heuristic) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            return None;
        }
    };

    let search_config = SearchConfig {
        algorithm: Algorithm::from_ida_flag(args.id),
        retry_limit: args.retry_limit,
    };

    Some((config, search_config))
}

/// User-supplied or random initial state, or `None` after printing a diagnostic
fn load_initial_state(
    args: &SolveArgs,
    config: &PuzzleConfig,
    seed: Option<u64>,
) -> Option<PuzzleState> {
    let Some(tokens) = &args.state else {
        return Some(generate_initial_state(config, seed));
    };

    match parse_board(tokens, config).and_then(|board| prepare_initial(board, config)) {
        Ok(state) => Some(state),
        Err(e) => {
            println!("{:?}", tokens);
            println!("{}", e);
            None
        }
    }
}

/// Run the search and time it
fn timed_solve(
    initial: &PuzzleState,
    config: &PuzzleConfig,
    search_config: &SearchConfig,
) -> Result<RunResults> {
    let start = Instant::now();
    let solution = solve(initial, config, search_config)
        .with_context(|| format!("Search failed for initial state {}", initial))?;
    let seconds = start.elapsed().as_secs_f64();

    Ok(RunResults { solution, seconds })
}

/// Report the solution
fn report_results(results: &RunResults, args: &SolveArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(results: &RunResults) {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        closed: usize,
        open_remaining: usize,
        reopened: usize,
        depth: u32,
        bound: u32,
        seconds: f64,
        moves: String,
        path: Vec<String>,
    }

    let solution = &results.solution;
    let output = JsonOutput {
        closed: solution.closed,
        open_remaining: solution.open_remaining,
        reopened: solution.reopened,
        depth: solution.depth,
        bound: solution.bound,
        seconds: results.seconds,
        moves: solution.moves_str(),
        path: solution.path_strings(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &RunResults) {
    let solution = &results.solution;

    println!(
        "{} entries expanded. Queue still has {}",
        solution.closed, solution.open_remaining
    );
    println!("tilesearch: {} moves", solution.depth);
    println!("took {} secs", results.seconds);
    println!("{}", solution.moves_str());
    println!("{:?}", solution.path_strings());
}
