// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Branch-edge selection.
//!
//! Given a propagated state, pick the undecided edge whose exploration will
//! branch the search tree least. Scoring is two-phase: any edge whose local
//! constraints already force one value (branching factor 1) is returned
//! immediately; among genuinely two-way edges the score prefers endpoints at
//! ON-degree 1, then pristine degree-0 vertices down to their last two
//! undecided edges, then adjacent cells close to binary resolution. Ties go
//! to the lower edge id.
//!
//! The heuristic is observational: it never mutates state.

use crate::geometry::{CellId, EdgeId, Lattice};
use crate::state::{EdgeState, SearchState};

/// Which of OFF / ON remain locally possible for an undecided edge.
///
/// An endpoint sitting at ON-degree 1 with exactly one undecided edge left
/// must take this edge ON; an endpoint already at degree 2 forbids it.
#[inline]
pub fn possible_values(lattice: &Lattice, state: &SearchState, e: EdgeId) -> (bool, bool) {
    let [u, v] = lattice.edge(e).endpoints;
    let forced_on = (state.vertex_degree(u) == 1 && state.vertex_undecided(u) == 1)
        || (state.vertex_degree(v) == 1 && state.vertex_undecided(v) == 1);
    let forced_off = state.vertex_degree(u) >= 2 || state.vertex_degree(v) >= 2;
    (!forced_on, !forced_off)
}

/// Estimated branching factor of an edge: 1 if either value is locally
/// forced, 2 otherwise.
#[inline]
pub fn estimate_branching(lattice: &Lattice, state: &SearchState, e: EdgeId) -> u8 {
    match possible_values(lattice, state, e) {
        (true, true) => 2,
        _ => 1,
    }
}

/// Select the next edge to branch on, or `None` when no undecided edge
/// remains (triggering final validation).
pub fn select_branch_edge(lattice: &Lattice, state: &SearchState) -> Option<EdgeId> {
    let mut best = None;
    let mut best_score = i64::MIN;

    for e in 0..lattice.edge_count() {
        if state.edge(e) != EdgeState::Undecided {
            continue;
        }
        if estimate_branching(lattice, state, e) == 1 {
            return Some(e);
        }

        let [u, v] = lattice.edge(e).endpoints;
        let half_open = state.vertex_degree(u) == 1 || state.vertex_degree(v) == 1;
        let pristine = (state.vertex_degree(u) == 0 && state.vertex_undecided(u) == 2)
            || (state.vertex_degree(v) == 0 && state.vertex_undecided(v) == 2);

        let cells = lattice.edge(e).cells;
        let mut score = cell_score(lattice, state, cells[0]) + cell_score(lattice, state, cells[1]);
        if half_open {
            score += 10_000;
        }
        if pristine {
            score += 5_000;
        }

        if score > best_score {
            best_score = score;
            best = Some(e);
        }
    }
    best
}

/// Contribution of an adjacent clued cell to an edge's score.
///
/// Peaks when the cell is one decision away from binary resolution
/// (`need == und` or `need == 0`), degrades with remaining slack.
fn cell_score(lattice: &Lattice, state: &SearchState, cell: Option<CellId>) -> i64 {
    let Some(cell) = cell else { return 0 };
    let Some(clue) = lattice.clue(cell) else {
        return 0;
    };
    let und = i64::from(state.cell_undecided(cell));
    if und == 0 {
        return 0;
    }
    let need = i64::from(clue) - i64::from(state.cell_on(cell));
    if need == und || need == 0 {
        2_000
    } else if und == 1 {
        1_500
    } else if und <= 2 {
        1_000
    } else {
        (100 - (need * 2 - und).abs()).max(0)
    }
}
