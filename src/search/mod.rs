// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Backtracking search driver.
//!
//! [`Solver`] runs depth-first search with constraint propagation at every
//! node. Each node propagates its state to a fixed point, asks the
//! heuristic for a branch edge, clones the state once per viable branch
//! value, and recurses OFF-before-ON. States are values: cloning at the
//! branch point is the whole undo story, so a subtree can be handed to
//! another worker without any shared mutable search state.
//!
//! # Parallelisation
//!
//! Shallow two-way branches fork via [`rayon::join`]: the OFF child runs on
//! the current worker, the ON child is available for stealing, and the
//! parent joins both before returning. Forking stops below a per-puzzle
//! depth limit (denser clued puzzles get shallower limits) and once a
//! subtree has few undecided edges left. Breadth is bounded by the ambient
//! rayon pool; a one-thread pool degenerates to the sequential
//! deterministic order (OFF before ON at every branch).
//!
//! # Cancellation
//!
//! In find-first mode the first accepted solution sets a shared atomic
//! flag. Every node polls it on entry; workers finish their current node
//! and unwind. The collector records under a lock and consults the flag
//! with a swap, so exactly one solution is kept even if two workers
//! validate simultaneously.

pub mod heuristic;
pub mod validation;

pub use validation::Solution;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::geometry::{Grid, Lattice};
use crate::propagation::propagate;
use crate::state::statistics::{Counters, Statistics};
use crate::state::{EdgeState, SearchState};
use heuristic::{possible_values, select_branch_edge};

/// Forking below this many undecided edges is all overhead.
const MIN_UNDECIDED_FOR_FORK: usize = 10;

/// Slitherlink solver for one puzzle.
pub struct Solver {
    grid: Grid,
    lattice: Lattice,
    find_all: bool,
    max_parallel_depth: usize,
    statistics: Statistics,
}

/// Shared per-solve collector state. Constructed per call, never global,
/// so concurrent solves stay independent.
struct SolveShared {
    first_found: AtomicBool,
    solutions: Mutex<Vec<Solution>>,
}

impl Solver {
    /// Prepare a solver: build the lattice and size the parallel schedule.
    pub fn new(grid: Grid, find_all: bool) -> Self {
        let lattice = Lattice::build(&grid);
        let max_parallel_depth = parallel_depth_limit(&grid);
        Self {
            grid,
            lattice,
            find_all,
            max_parallel_depth,
            statistics: Statistics::new(),
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Counters accumulated by the most recent [`solve`](Self::solve) call.
    #[inline]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Depth below which two-way branches stop forking.
    #[inline]
    pub fn max_parallel_depth(&self) -> usize {
        self.max_parallel_depth
    }

    /// Run the search and return every recorded solution.
    ///
    /// In find-first mode at most one solution is returned. Runs inside the
    /// ambient rayon pool; install the call into a dedicated pool to bound
    /// worker count, or into a one-thread pool for deterministic
    /// enumeration order.
    pub fn solve(&self) -> Vec<Solution> {
        let shared = SolveShared {
            first_found: AtomicBool::new(false),
            solutions: Mutex::new(Vec::new()),
        };
        self.search(SearchState::new(&self.lattice), 0, &shared);
        shared
            .solutions
            .into_inner()
            .expect("a search worker panicked while recording a solution")
    }

    fn search(&self, mut state: SearchState, depth: usize, shared: &SolveShared) {
        if !self.find_all && shared.first_found.load(Ordering::Relaxed) {
            return;
        }
        self.statistics.increment(Counters::NodesExplored);

        // Cheap pre-filter before the full worklist run.
        if !state.is_locally_consistent(&self.lattice) {
            return;
        }
        if let Err(failure) = propagate(&self.lattice, &mut state) {
            self.statistics.record_failure(&failure);
            return;
        }
        debug_assert!(state.counters_agree(&self.lattice));

        let Some(edge) = select_branch_edge(&self.lattice, &state) else {
            if let Some(solution) = validation::validate(&self.lattice, &state) {
                self.record(solution, shared);
            }
            return;
        };

        let (can_off, can_on) = possible_values(&self.lattice, &state, edge);
        let fork_worthy = depth < self.max_parallel_depth
            && rayon::current_num_threads() > 1
            && state.undecided_edges_capped(MIN_UNDECIDED_FOR_FORK + 1) > MIN_UNDECIDED_FOR_FORK;

        let off_child = can_off
            .then(|| {
                let mut child = state.clone();
                self.settle(&mut child, edge, EdgeState::Off).then_some(child)
            })
            .flatten();

        let on_child = can_on
            .then(|| {
                // The OFF attempt worked on a clone, so the original is
                // still intact; reuse it when it is no longer needed.
                let mut child = if off_child.is_some() {
                    state.clone()
                } else {
                    state
                };
                self.settle(&mut child, edge, EdgeState::On).then_some(child)
            })
            .flatten();

        match (off_child, on_child) {
            (None, None) => {}
            (Some(child), None) | (None, Some(child)) => {
                self.search(child, depth + 1, shared);
            }
            (Some(off), Some(on)) => {
                self.statistics.increment(Counters::BranchNodes);
                if fork_worthy {
                    rayon::join(
                        || self.search(off, depth + 1, shared),
                        || self.search(on, depth + 1, shared),
                    );
                } else {
                    self.search(off, depth + 1, shared);
                    if !self.find_all && shared.first_found.load(Ordering::Relaxed) {
                        return;
                    }
                    self.search(on, depth + 1, shared);
                }
            }
        }
    }

    /// Apply a branch decision to a child state and propagate it, returning
    /// whether the child survives.
    fn settle(&self, child: &mut SearchState, edge: usize, value: EdgeState) -> bool {
        if let Err(failure) = child.apply(&self.lattice, edge, value) {
            self.statistics.record_failure(&failure);
            return false;
        }
        if !child.is_locally_consistent(&self.lattice) {
            return false;
        }
        match propagate(&self.lattice, child) {
            Ok(()) => true,
            Err(failure) => {
                self.statistics.record_failure(&failure);
                false
            }
        }
    }

    fn record(&self, solution: Solution, shared: &SolveShared) {
        let mut solutions = shared
            .solutions
            .lock()
            .expect("a search worker panicked while recording a solution");
        if !self.find_all && shared.first_found.swap(true, Ordering::Relaxed) {
            // Another worker validated first; drop this one.
            return;
        }
        solutions.push(solution);
        self.statistics.increment(Counters::SolutionsFound);
    }
}

/// Per-puzzle fork-depth schedule.
///
/// Small dense puzzles fork only near the root; large or sparsely clued
/// puzzles keep forking much deeper to keep workers fed.
fn parallel_depth_limit(grid: &Grid) -> usize {
    let cells = grid.cell_count();
    let mut depth = match cells {
        0..=25 => 8,
        26..=49 => 12,
        50..=64 => 14,
        65..=100 => 32,
        101..=144 => 34,
        145..=225 => 36,
        _ => 38,
    };
    let density = grid.clue_count() as f64 / cells as f64;
    if density < 0.3 {
        depth += 6;
    }
    depth.clamp(10, 45)
}
