// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line driver for the Slitherlink solver.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use slither_search::state::statistics::Counters;
use slither_search::{parse_grid, render_solution, Solver};

#[derive(Parser)]
#[command(name = "slither-search")]
#[command(about = "Parallel constraint-propagation solver for Slitherlink puzzles")]
struct Cmd {
    /// Puzzle file: a 'rows cols' header, then one line of clue tokens per
    /// row ('0'..'3' or a placeholder such as '.')
    input: PathBuf,

    /// Find all solutions (default: stop at the first)
    #[arg(long)]
    all: bool,

    /// Use exactly N worker threads (default: all hardware threads)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Use this fraction of the hardware threads, in (0.0, 1.0]
    #[arg(long, value_name = "FRACTION", conflicts_with = "threads")]
    cpu: Option<f64>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();

    let text = std::fs::read_to_string(&cmd.input)
        .with_context(|| format!("could not open {}", cmd.input.display()))?;
    let grid = parse_grid(&text).with_context(|| format!("malformed puzzle in {}", cmd.input.display()))?;

    let threads = worker_count(cmd.threads, cmd.cpu)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("could not build the worker pool")?;

    let solver = Solver::new(grid, cmd.all);
    let mode = if cmd.all { "all solutions" } else { "first solution" };
    tracing::info!(
        rows = solver.grid().rows(),
        cols = solver.grid().cols(),
        threads,
        parallel_depth = solver.max_parallel_depth(),
        mode,
        "starting search"
    );

    let started = Instant::now();
    let solutions = pool.install(|| solver.solve());
    let seconds = started.elapsed().as_secs_f64();

    for (i, solution) in solutions.iter().enumerate() {
        println!("\n=== Solution {} ===", i + 1);
        print!(
            "{}",
            render_solution(solver.grid(), solver.lattice(), solution)
        );
    }
    if solutions.is_empty() {
        println!("\nNo solutions found.");
    } else {
        println!("\n=== SUMMARY ===");
        println!("Total solutions found: {}", solutions.len());
    }
    println!("Time: {} s", seconds);

    tracing::info!(
        nodes = solver.statistics().get(Counters::NodesExplored),
        branches = solver.statistics().get(Counters::BranchNodes),
        pruned = solver.statistics().failures(),
        solutions = solutions.len(),
        "search finished"
    );
    Ok(())
}

/// Resolve `--threads`/`--cpu` to a worker count.
fn worker_count(threads: Option<usize>, cpu: Option<f64>) -> Result<usize> {
    let hardware = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    if let Some(n) = threads {
        if n == 0 {
            bail!("--threads must be at least 1");
        }
        return Ok(n.min(hardware));
    }
    if let Some(fraction) = cpu {
        if !(fraction > 0.0 && fraction <= 1.0) {
            bail!("--cpu must be in (0.0, 1.0]");
        }
        return Ok(((hardware as f64 * fraction) as usize).max(1));
    }
    Ok(hardware)
}
