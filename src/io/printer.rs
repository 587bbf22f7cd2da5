// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! ASCII solution renderer.
//!
//! Draws the solved lattice as `+`-separated rows with `-` and `|` for ON
//! edges and clue digits inside cells, followed by the extracted cycle as
//! `(row,col)` lattice coordinates.

use std::fmt::Write;

use crate::geometry::{Grid, Lattice};
use crate::search::Solution;
use crate::state::EdgeState;

/// Render a solution over its grid.
pub fn render_solution(grid: &Grid, lattice: &Lattice, solution: &Solution) -> String {
    let mut out = String::new();
    let on = |e: usize| solution.edge_states[e] == EdgeState::On;

    for r in 0..=grid.rows() {
        for c in 0..grid.cols() {
            out.push('+');
            out.push(if on(lattice.horizontal_edge(r, c)) {
                '-'
            } else {
                ' '
            });
        }
        out.push_str("+\n");

        if r == grid.rows() {
            break;
        }

        for c in 0..grid.cols() {
            out.push(if on(lattice.vertical_edge(r, c)) {
                '|'
            } else {
                ' '
            });
            out.push(match grid.clue_at(r, c) {
                Some(clue) => char::from(b'0' + clue),
                None => ' ',
            });
        }
        out.push(if on(lattice.vertical_edge(r, grid.cols())) {
            '|'
        } else {
            ' '
        });
        out.push('\n');
    }

    out.push_str("Cycle (point coordinates row,col):\n");
    let mut first = true;
    for &(r, c) in &solution.cycle {
        if !first {
            out.push_str(" -> ");
        }
        write!(out, "({},{})", r, c).expect("writing to a String cannot fail");
        first = false;
    }
    out.push('\n');
    out
}
