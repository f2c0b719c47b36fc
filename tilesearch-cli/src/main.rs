//! Tilesearch CLI - Command-line interface
//!
//! Solves one sliding-tile puzzle per run, appends a record to the results
//! log and prints a summary.

mod results_log;
mod solve_cmd;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use solve_cmd::SolveArgs;

#[derive(Parser)]
#[command(name = "tilesearch")]
#[command(about = "A program to solve sliding tile puzzles")]
#[command(
    after_help = "example: tilesearch -w 4 --heuristic manhattan+linear-conflict -s 1 2 3 4 5 6 7 8 9 10 11 _ 13 14 15 12 -i"
)]
struct Cli {
    #[command(flatten)]
    solve: SolveArgs,

    /// Random seed for the generated initial state
    #[arg(long)]
    seed: Option<u64>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    solve_cmd::run(cli.solve, cli.seed)
}

/// Log to stderr so stdout only carries the report
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
