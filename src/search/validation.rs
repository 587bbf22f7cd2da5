// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Final solution validation and cycle extraction.
//!
//! A complete assignment (no undecided edges) is only a solution if every
//! clue is met exactly, every vertex has ON-degree 0 or 2, and the ON edges
//! form one connected cycle. [`validate`] checks all of that and, on
//! acceptance, walks the loop into an ordered list of lattice coordinates.

use crate::geometry::{Lattice, VertexId};
use crate::state::{EdgeState, SearchState};

/// An accepted assignment: the full edge configuration and the loop as
/// lattice coordinates, closed by repeating the starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub edge_states: Vec<EdgeState>,
    pub cycle: Vec<(usize, usize)>,
}

impl Solution {
    /// Number of ON edges in the solution.
    pub fn on_edge_count(&self) -> usize {
        self.edge_states
            .iter()
            .filter(|&&s| s == EdgeState::On)
            .count()
    }
}

/// Validate a complete assignment, extracting the loop on acceptance.
///
/// Returns `None` if any clue is missed, any vertex has ON-degree other
/// than 0 or 2, there are no ON edges at all, or the ON edges split into
/// more than one cycle.
pub fn validate(lattice: &Lattice, state: &SearchState) -> Option<Solution> {
    for &cell in lattice.clue_cells() {
        if Some(state.cell_on(cell)) != lattice.clue(cell) {
            return None;
        }
    }

    // Adjacency over the ON-edge subgraph.
    let mut adj: Vec<Vec<VertexId>> = vec![Vec::new(); lattice.vertex_count()];
    let mut start = None;
    let mut on_edges = 0usize;
    for e in 0..lattice.edge_count() {
        if state.edge(e) == EdgeState::On {
            let [u, v] = lattice.edge(e).endpoints;
            adj[u].push(v);
            adj[v].push(u);
            start.get_or_insert(u);
            on_edges += 1;
        }
    }
    let start = start?; // the empty loop is not a solution

    for neighbours in &adj {
        if !matches!(neighbours.len(), 0 | 2) {
            return None;
        }
    }

    // One component must account for every ON edge.
    let mut visited = vec![false; lattice.vertex_count()];
    let mut stack = vec![start];
    visited[start] = true;
    let mut visited_half_edges = 0usize;
    while let Some(v) = stack.pop() {
        for &next in &adj[v] {
            visited_half_edges += 1;
            if !visited[next] {
                visited[next] = true;
                stack.push(next);
            }
        }
    }
    if visited_half_edges / 2 != on_edges {
        return None;
    }
    if (0..lattice.vertex_count()).any(|v| adj[v].len() == 2 && !visited[v]) {
        return None;
    }

    // Walk the loop, always stepping to the neighbour we did not come from.
    let mut cycle = Vec::with_capacity(on_edges + 1);
    let mut prev = start;
    let mut current = start;
    loop {
        cycle.push(lattice.vertex_coords(current));
        let next = if adj[current][0] != prev {
            adj[current][0]
        } else {
            adj[current][1]
        };
        prev = current;
        current = next;
        if current == start {
            break;
        }
    }
    cycle.push(lattice.vertex_coords(start));

    Some(Solution {
        edge_states: state.edge_states().to_vec(),
        cycle,
    })
}
