// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed-point constraint propagation.
//!
//! [`propagate`] computes the deductive closure of the current edge
//! decisions under two local rule families, or reports the first
//! contradiction it finds:
//!
//! **Cell rules**: for a cell with clue `k`, `on` ON edges and `und`
//! undecided edges:
//! - `on + und == k`: every undecided edge must be ON,
//! - `on == k`: every undecided edge must be OFF,
//! - `on > k` or `on + und < k`: contradiction.
//!
//! **Vertex rules**: for a vertex with ON-degree `deg` and `und`
//! undecided incident edges:
//! - `deg == 1, und == 1`: the last undecided edge must be ON,
//! - `deg == 2, und > 0`: every undecided edge must be OFF,
//! - `deg > 2`, or `deg == 1, und == 0`: contradiction.
//!
//! Scheduling is a worklist fixed point. Two queues (clued cells and
//! vertices) each carry an is-queued bitmap so nothing is enqueued twice.
//! Both start full; forcing an edge re-enqueues its two endpoints and its
//! adjacent clued cells, so each forced edge costs at most four enqueues
//! and the whole run stays linear in the work it discovers.

pub mod errors;

pub use errors::PropagationFailure;

use crate::geometry::{EdgeId, Lattice};
use crate::state::{EdgeState, SearchState};

/// Dedup work queue over ids in `0..len`.
///
/// Pops advance a cursor instead of shifting; the queued bitmap caps each id
/// at one pending entry.
struct Worklist {
    items: Vec<usize>,
    queued: Vec<bool>,
    head: usize,
}

impl Worklist {
    /// Queue seeded with `seed`, accepting ids in `0..len`.
    fn seeded(len: usize, seed: impl IntoIterator<Item = usize>) -> Self {
        let mut list = Self {
            items: Vec::with_capacity(len),
            queued: vec![false; len],
            head: 0,
        };
        for id in seed {
            list.push(id);
        }
        list
    }

    #[inline]
    fn push(&mut self, id: usize) {
        if !self.queued[id] {
            self.queued[id] = true;
            self.items.push(id);
        }
    }

    #[inline]
    fn pop(&mut self) -> Option<usize> {
        let id = *self.items.get(self.head)?;
        self.head += 1;
        self.queued[id] = false;
        Some(id)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.head >= self.items.len()
    }
}

/// Re-enqueue everything a freshly decided edge can affect.
#[inline]
fn enqueue_neighbours(lattice: &Lattice, e: EdgeId, cells: &mut Worklist, vertices: &mut Worklist) {
    let edge = lattice.edge(e);
    for cell in edge.cells.into_iter().flatten() {
        if lattice.clue(cell).is_some() {
            cells.push(cell);
        }
    }
    for v in edge.endpoints {
        vertices.push(v);
    }
}

/// Run the state to its deductive fixed point.
///
/// On success the state satisfies every counter invariant and no rule above
/// can fire. On failure the state is dead and must be discarded by the
/// caller.
pub fn propagate(lattice: &Lattice, state: &mut SearchState) -> Result<(), PropagationFailure> {
    let mut cells = Worklist::seeded(lattice.cell_count(), lattice.clue_cells().iter().copied());
    let mut vertices = Worklist::seeded(lattice.vertex_count(), 0..lattice.vertex_count());

    while !cells.is_empty() || !vertices.is_empty() {
        while let Some(cell) = cells.pop() {
            apply_cell_rule(lattice, state, cell, &mut cells, &mut vertices)?;
        }
        while let Some(v) = vertices.pop() {
            apply_vertex_rule(lattice, state, v, &mut cells, &mut vertices)?;
        }
    }
    Ok(())
}

fn apply_cell_rule(
    lattice: &Lattice,
    state: &mut SearchState,
    cell: usize,
    cells: &mut Worklist,
    vertices: &mut Worklist,
) -> Result<(), PropagationFailure> {
    let clue = match lattice.clue(cell) {
        Some(clue) => clue,
        None => return Ok(()),
    };
    let on = state.cell_on(cell);
    let und = state.cell_undecided(cell);

    if on > clue {
        return Err(PropagationFailure::ClueExceeded { cell, clue });
    }
    if on + und < clue {
        return Err(PropagationFailure::ClueUnreachable { cell, clue });
    }

    let force = if und > 0 && on + und == clue {
        EdgeState::On
    } else if und > 0 && on == clue {
        EdgeState::Off
    } else {
        return Ok(());
    };

    for &e in lattice.edges_of_cell(cell) {
        if state.edge(e) == EdgeState::Undecided {
            state.apply(lattice, e, force)?;
            enqueue_neighbours(lattice, e, cells, vertices);
        }
    }
    Ok(())
}

fn apply_vertex_rule(
    lattice: &Lattice,
    state: &mut SearchState,
    v: usize,
    cells: &mut Worklist,
    vertices: &mut Worklist,
) -> Result<(), PropagationFailure> {
    let degree = state.vertex_degree(v);
    let und = state.vertex_undecided(v);

    if degree > 2 {
        return Err(PropagationFailure::VertexOverfull { vertex: v });
    }
    if degree == 1 && und == 0 {
        return Err(PropagationFailure::VertexDeadEnd { vertex: v });
    }

    let force = if degree == 1 && und == 1 {
        EdgeState::On
    } else if degree == 2 && und > 0 {
        EdgeState::Off
    } else {
        return Ok(());
    };

    for &e in lattice.edges_at_vertex(v) {
        if state.edge(e) == EdgeState::Undecided {
            state.apply(lattice, e, force)?;
            enqueue_neighbours(lattice, e, cells, vertices);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Grid;

    fn propagated(grid: &Grid) -> Result<(Lattice, SearchState), PropagationFailure> {
        let lattice = Lattice::build(grid);
        let mut state = SearchState::new(&lattice);
        propagate(&lattice, &mut state).map(|()| (lattice, state))
    }

    #[test]
    fn test_no_clues_is_a_fixed_point() {
        let (lattice, state) = propagated(&Grid::new(2, 2, vec![None; 4])).unwrap();
        assert!(state
            .edge_states()
            .iter()
            .all(|&s| s == EdgeState::Undecided));
        assert!(state.counters_agree(&lattice));
    }

    #[test]
    fn test_zero_clue_forces_all_off() {
        let (lattice, state) = propagated(&Grid::new(1, 1, vec![Some(0)])).unwrap();
        for &e in lattice.edges_of_cell(0) {
            assert_eq!(state.edge(e), EdgeState::Off);
        }
    }

    #[test]
    fn test_single_cell_clue_3_contradicts() {
        // All four edges forced ON leaves every corner at degree 2 with a
        // neighbour conflict: clue 3 on a lone cell has no closure.
        let grid = Grid::new(1, 1, vec![Some(3)]);
        let lattice = Lattice::build(&grid);
        let mut state = SearchState::new(&lattice);
        // The clue rule alone cannot fire (0 + 4 != 3, 0 != 3), so the
        // fixed point is reached with everything undecided.
        propagate(&lattice, &mut state).unwrap();
        assert_eq!(state.undecided_edges_capped(8), 4);
        // Deciding one edge OFF forces the other three ON, exceeding the
        // pair constraint at the far corner.
        state.apply(&lattice, 0, EdgeState::Off).unwrap();
        assert!(propagate(&lattice, &mut state).is_err());
    }

    #[test]
    fn test_zero_ringed_by_threes_solves_by_propagation() {
        // . 3 .
        // 3 0 3
        // . 3 .
        let clues = vec![
            None,
            Some(3),
            None,
            Some(3),
            Some(0),
            Some(3),
            None,
            Some(3),
            None,
        ];
        let (lattice, state) = propagated(&Grid::new(3, 3, clues)).unwrap();

        let centre = 4;
        for &e in lattice.edges_of_cell(centre) {
            assert_eq!(state.edge(e), EdgeState::Off);
        }
        for &cell in &[1usize, 3, 5, 7] {
            for &e in lattice.edges_of_cell(cell) {
                let shared_with_centre = lattice.edges_of_cell(centre).contains(&e);
                let expected = if shared_with_centre {
                    EdgeState::Off
                } else {
                    EdgeState::On
                };
                assert_eq!(state.edge(e), expected, "cell {} edge {}", cell, e);
            }
        }
        assert!(state.counters_agree(&lattice));
    }

    #[test]
    fn test_degree_two_vertex_forces_remaining_off() {
        let grid = Grid::new(2, 2, vec![None; 4]);
        let lattice = Lattice::build(&grid);
        let mut state = SearchState::new(&lattice);
        // Interior vertex (1,1) has 4 incident edges; turn two ON.
        let v = 4;
        let incident: Vec<_> = lattice.edges_at_vertex(v).to_vec();
        state.apply(&lattice, incident[0], EdgeState::On).unwrap();
        state.apply(&lattice, incident[1], EdgeState::On).unwrap();
        propagate(&lattice, &mut state).unwrap();
        assert_eq!(state.edge(incident[2]), EdgeState::Off);
        assert_eq!(state.edge(incident[3]), EdgeState::Off);
    }

    #[test]
    fn test_dead_end_vertex_is_a_contradiction() {
        let grid = Grid::new(1, 1, vec![None]);
        let lattice = Lattice::build(&grid);
        let mut state = SearchState::new(&lattice);
        // Corner vertex 0 touches edges 0 (top) and 2 (left); ON + OFF
        // leaves it stuck at degree 1.
        state.apply(&lattice, 0, EdgeState::On).unwrap();
        state.apply(&lattice, 2, EdgeState::Off).unwrap();
        let result = propagate(&lattice, &mut state);
        assert!(result.is_err());
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let clues = vec![None, Some(3), None, Some(3), Some(0), Some(3), None, Some(3), None];
        let (lattice, state) = propagated(&Grid::new(3, 3, clues)).unwrap();
        let mut again = state.clone();
        propagate(&lattice, &mut again).unwrap();
        assert_eq!(state, again);
    }

    #[test]
    fn test_immediate_contradiction_detected_before_queueing() {
        // A clue-3 cell with all four edges pre-set OFF is unreachable.
        let grid = Grid::new(1, 1, vec![Some(3)]);
        let lattice = Lattice::build(&grid);
        let mut state = SearchState::new(&lattice);
        for e in 0..4 {
            state.apply(&lattice, e, EdgeState::Off).unwrap();
        }
        assert_eq!(
            propagate(&lattice, &mut state),
            Err(PropagationFailure::ClueUnreachable { cell: 0, clue: 3 })
        );
    }
}
