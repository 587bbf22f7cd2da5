// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

use slither_search::{parse_grid, EdgeState, Grid, Lattice, Solution, Solver};

/// Parse puzzle text, failing the test on malformed fixtures.
pub fn grid(text: &str) -> Grid {
    parse_grid(text).expect("test fixture must parse")
}

/// Solve on a pool of the given size; `threads == 1` gives the
/// deterministic sequential enumeration order (OFF before ON).
pub fn solve_with_threads(text: &str, find_all: bool, threads: usize) -> Vec<Solution> {
    let solver = Solver::new(grid(text), find_all);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .expect("test pool must build");
    pool.install(|| solver.solve())
}

/// Check the three solution-validity clauses directly against the raw edge
/// assignment, independently of the solver's own counters: exact clue
/// counts, vertex degrees 0 or 2, and one non-empty connected cycle.
pub fn assert_valid_solution(grid: &Grid, solution: &Solution) {
    let lattice = Lattice::build(grid);
    let on: Vec<usize> = (0..lattice.edge_count())
        .filter(|&e| solution.edge_states[e] == EdgeState::On)
        .collect();
    assert!(!on.is_empty(), "a solution loop cannot be empty");

    for cell in 0..grid.cell_count() {
        if let Some(clue) = grid.clue(cell) {
            let count = lattice
                .edges_of_cell(cell)
                .iter()
                .filter(|&&e| on.contains(&e))
                .count();
            assert_eq!(count, clue as usize, "clue missed at cell {}", cell);
        }
    }

    let mut degree = vec![0usize; lattice.vertex_count()];
    for &e in &on {
        for v in lattice.edge(e).endpoints {
            degree[v] += 1;
        }
    }
    assert!(
        degree.iter().all(|&d| d == 0 || d == 2),
        "every vertex must have ON-degree 0 or 2"
    );

    // The cycle must close, cover every ON edge exactly once, and step
    // along lattice neighbours.
    assert_eq!(solution.cycle.len(), on.len() + 1);
    assert_eq!(solution.cycle.first(), solution.cycle.last());
    for window in solution.cycle.windows(2) {
        let (a, b) = (window[0], window[1]);
        let distance = a.0.abs_diff(b.0) + a.1.abs_diff(b.1);
        assert_eq!(distance, 1, "cycle steps must join adjacent points");
    }
}
