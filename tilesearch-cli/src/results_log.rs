//! Append-only results log, one comma-separated line per solved puzzle

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use tilesearch_core::{HeuristicKind, Solution};

/// One line of the results log
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord {
    pub tile_count: usize,
    pub initial: String,
    pub depth: u32,
    pub heuristic: HeuristicKind,
    pub ida: bool,
    pub closed: usize,
    pub open_remaining: usize,
    pub seconds: f64,
}

impl RunRecord {
    pub fn from_solution(
        solution: &Solution,
        tile_count: usize,
        heuristic: HeuristicKind,
        ida: bool,
        seconds: f64,
    ) -> Self {
        Self {
            tile_count,
            initial: solution.initial().board_string(),
            depth: solution.depth,
            heuristic,
            ida,
            closed: solution.closed,
            open_remaining: solution.open_remaining,
            seconds,
        }
    }

    /// Fields joined by ", ", without trailing newline
    pub fn to_csv_line(&self) -> String {
        [
            self.tile_count.to_string(),
            self.initial.clone(),
            self.depth.to_string(),
            self.heuristic.name().to_string(),
            self.ida.to_string(),
            self.closed.to_string(),
            self.open_remaining.to_string(),
            self.seconds.to_string(),
        ]
        .join(", ")
    }
}

/// Append a record, creating the file if needed
pub fn append(path: &Path, record: &RunRecord) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open results log: {}", path.display()))?;

    writeln!(file, "{}", record.to_csv_line())
        .with_context(|| format!("Failed to write results log: {}", path.display()))?;

    Ok(())
}
