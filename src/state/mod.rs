// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable search state.
//!
//! A [`SearchState`] carries the per-edge decisions and the derived counters
//! the propagator and heuristic read. It is the mutable tier of the solver:
//! one value per search-tree node, cloned at branch points and mutated in
//! place on forced moves. Cloning is the undo mechanism: discarding a clone
//! restores the parent, so no undo log is kept.
//!
//! The counters are redundant views of the decisions and must stay in
//! agreement:
//! - `vertex_degree[v]` = ON edges incident to `v` (at most 2),
//! - `vertex_undecided[v]` = undecided edges incident to `v`,
//! - `cell_on[c]` = ON edges around `c` (at most the clue, if any),
//! - `cell_undecided[c]` = undecided edges around `c`.
//!
//! All updates flow through [`SearchState::apply`], which maintains the
//! counters and reports local violations as it goes.

pub mod statistics;

use crate::geometry::{CellId, EdgeId, Lattice, VertexId};
use crate::propagation::PropagationFailure;

/// Decision state of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum EdgeState {
    /// Not yet decided.
    #[default]
    Undecided,
    /// Part of the loop.
    On,
    /// Excluded from the loop.
    Off,
}

/// Per-node mutable state: edge decisions plus derived counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    edge_states: Vec<EdgeState>,
    vertex_degree: Vec<u8>,
    vertex_undecided: Vec<u8>,
    cell_on: Vec<u8>,
    cell_undecided: Vec<u8>,
}

impl SearchState {
    /// Initial state: every edge undecided, counters seeded from the
    /// incidence sizes.
    pub fn new(lattice: &Lattice) -> Self {
        let vertex_undecided = (0..lattice.vertex_count())
            .map(|v| lattice.edges_at_vertex(v).len() as u8)
            .collect();
        let cell_undecided = (0..lattice.cell_count())
            .map(|c| lattice.edges_of_cell(c).len() as u8)
            .collect();
        Self {
            edge_states: vec![EdgeState::Undecided; lattice.edge_count()],
            vertex_degree: vec![0; lattice.vertex_count()],
            vertex_undecided,
            cell_on: vec![0; lattice.cell_count()],
            cell_undecided,
        }
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> EdgeState {
        self.edge_states[e]
    }

    /// All edge decisions, in edge-id order.
    #[inline]
    pub fn edge_states(&self) -> &[EdgeState] {
        &self.edge_states
    }

    /// ON-degree of a vertex.
    #[inline]
    pub fn vertex_degree(&self, v: VertexId) -> u8 {
        self.vertex_degree[v]
    }

    /// Undecided incident edges of a vertex.
    #[inline]
    pub fn vertex_undecided(&self, v: VertexId) -> u8 {
        self.vertex_undecided[v]
    }

    /// ON edges around a cell.
    #[inline]
    pub fn cell_on(&self, c: CellId) -> u8 {
        self.cell_on[c]
    }

    /// Undecided edges around a cell.
    #[inline]
    pub fn cell_undecided(&self, c: CellId) -> u8 {
        self.cell_undecided[c]
    }

    /// Apply a decision to an edge, updating every affected counter.
    ///
    /// Deciding an edge to the value it already has is a no-op; deciding it
    /// to the opposite value is an [`PropagationFailure::EdgeConflict`].
    /// Turning an edge ON additionally checks the local violations visible
    /// from the edge: an endpoint exceeding ON-degree 2, or an adjacent
    /// clued cell exceeding its clue.
    ///
    /// On failure the state is dead: counters for the offending edge have
    /// already been updated and the caller must discard the state.
    pub fn apply(
        &mut self,
        lattice: &Lattice,
        e: EdgeId,
        value: EdgeState,
    ) -> Result<(), PropagationFailure> {
        debug_assert_ne!(value, EdgeState::Undecided);
        if self.edge_states[e] == value {
            return Ok(());
        }
        if self.edge_states[e] != EdgeState::Undecided {
            return Err(PropagationFailure::EdgeConflict { edge: e });
        }

        self.edge_states[e] = value;
        let edge = lattice.edge(e);
        for v in edge.endpoints {
            self.vertex_undecided[v] -= 1;
        }
        for cell in edge.cells.into_iter().flatten() {
            self.cell_undecided[cell] -= 1;
        }

        if value == EdgeState::On {
            for v in edge.endpoints {
                self.vertex_degree[v] += 1;
                if self.vertex_degree[v] > 2 {
                    return Err(PropagationFailure::VertexOverfull { vertex: v });
                }
            }
            for cell in edge.cells.into_iter().flatten() {
                self.cell_on[cell] += 1;
                if let Some(clue) = lattice.clue(cell) {
                    if self.cell_on[cell] > clue {
                        return Err(PropagationFailure::ClueExceeded { cell, clue });
                    }
                }
            }
        }
        Ok(())
    }

    /// Cheap local-impossibility pre-filter, run before propagating.
    ///
    /// Catches states the propagator would also reject, but without walking
    /// the worklists: overfull vertices, vertices that can no longer reach
    /// ON-degree 0 or 2, and clued cells outside their reachable range.
    pub fn is_locally_consistent(&self, lattice: &Lattice) -> bool {
        for v in 0..lattice.vertex_count() {
            let degree = self.vertex_degree[v];
            if degree > 2 {
                return false;
            }
            if degree > 0 && degree + self.vertex_undecided[v] < 2 {
                return false;
            }
        }
        for &cell in lattice.clue_cells() {
            let clue = lattice.clue(cell).unwrap_or(0);
            if self.cell_on[cell] > clue {
                return false;
            }
            if self.cell_on[cell] + self.cell_undecided[cell] < clue {
                return false;
            }
        }
        true
    }

    /// Number of undecided edges, counting no further than `cap`.
    ///
    /// The search only compares the count against a small threshold, so the
    /// scan stops as soon as the cap is reached.
    pub fn undecided_edges_capped(&self, cap: usize) -> usize {
        self.edge_states
            .iter()
            .filter(|&&s| s == EdgeState::Undecided)
            .take(cap)
            .count()
    }

    /// Full counter audit against the raw decisions.
    ///
    /// Recomputes every counter from `edge_states` and compares. Used by
    /// tests and debug assertions; quadratic in nothing, but touches the
    /// whole state, so it stays out of release hot paths.
    pub fn counters_agree(&self, lattice: &Lattice) -> bool {
        for v in 0..lattice.vertex_count() {
            let on = lattice
                .edges_at_vertex(v)
                .iter()
                .filter(|&&e| self.edge_states[e] == EdgeState::On)
                .count();
            let undecided = lattice
                .edges_at_vertex(v)
                .iter()
                .filter(|&&e| self.edge_states[e] == EdgeState::Undecided)
                .count();
            if self.vertex_degree[v] as usize != on || self.vertex_undecided[v] as usize != undecided
            {
                return false;
            }
        }
        for c in 0..lattice.cell_count() {
            let on = lattice
                .edges_of_cell(c)
                .iter()
                .filter(|&&e| self.edge_states[e] == EdgeState::On)
                .count();
            let undecided = lattice
                .edges_of_cell(c)
                .iter()
                .filter(|&&e| self.edge_states[e] == EdgeState::Undecided)
                .count();
            if self.cell_on[c] as usize != on || self.cell_undecided[c] as usize != undecided {
                return false;
            }
        }
        true
    }
}
