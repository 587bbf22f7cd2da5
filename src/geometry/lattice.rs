// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lattice graph derived from a [`Grid`].
//!
//! The lattice is the immutable, precomputed tier of the solver: the edge
//! table and every incidence relation the search consults, built once per
//! puzzle and thereafter shared read-only across workers.
//!
//! For an `n x m` grid there are `(n+1)*(m+1)` vertices, `n*m` cells and
//! `(n+1)*m + n*(m+1)` edges. Horizontal edges are numbered first in
//! row-major order (`r` over `0..=n`, `c` over `0..m`), then vertical edges
//! (`r` over `0..n`, `c` over `0..=m`). Clients may rely on this total order
//! being stable but not on any other property of the numbering.

use crate::geometry::grid::{CellId, Grid};

/// Index into the edge table.
pub type EdgeId = usize;

/// Index of a lattice vertex (`r * (cols + 1) + c`).
pub type VertexId = usize;

/// One unit segment of the lattice.
///
/// Boundary edges have a single adjacent cell; the missing side is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// The two endpoint vertices.
    pub endpoints: [VertexId; 2],
    /// The up-to-two adjacent cells.
    pub cells: [Option<CellId>; 2],
}

/// Immutable edge and incidence tables for one puzzle.
#[derive(Debug, Clone)]
pub struct Lattice {
    rows: usize,
    cols: usize,
    edges: Vec<Edge>,
    /// The four incident edges of each cell.
    cell_edges: Vec<Vec<EdgeId>>,
    /// The 2..=4 incident edges of each vertex.
    vertex_edges: Vec<Vec<EdgeId>>,
    /// Ids of clued cells, for skipping unclued cells in hot loops.
    clue_cells: Vec<CellId>,
    /// Clue values copied from the grid, indexed by cell id.
    clues: Vec<Option<u8>>,
    /// `(r, c) -> edge id` for horizontal edges, `r` in `0..=rows`.
    horizontal_index: Vec<EdgeId>,
    /// `(r, c) -> edge id` for vertical edges, `c` in `0..=cols`.
    vertical_index: Vec<EdgeId>,
}

impl Lattice {
    /// Build the edge table and all incidence tables for a grid.
    pub fn build(grid: &Grid) -> Self {
        let (n, m) = (grid.rows(), grid.cols());
        let vertex_count = (n + 1) * (m + 1);
        let edge_count = (n + 1) * m + n * (m + 1);

        let mut edges = Vec::with_capacity(edge_count);
        let mut cell_edges = vec![Vec::with_capacity(4); n * m];
        let mut vertex_edges = vec![Vec::with_capacity(4); vertex_count];
        let mut horizontal_index = vec![0; (n + 1) * m];
        let mut vertical_index = vec![0; n * (m + 1)];

        let vertex = |r: usize, c: usize| r * (m + 1) + c;

        fn record(
            edges: &mut Vec<Edge>,
            cell_edges: &mut [Vec<EdgeId>],
            vertex_edges: &mut [Vec<EdgeId>],
            edge: Edge,
        ) -> EdgeId {
            let id = edges.len();
            for cell in edge.cells.into_iter().flatten() {
                cell_edges[cell].push(id);
            }
            for v in edge.endpoints {
                vertex_edges[v].push(id);
            }
            edges.push(edge);
            id
        }

        // Horizontal edges first.
        for r in 0..=n {
            for c in 0..m {
                let edge = Edge {
                    endpoints: [vertex(r, c), vertex(r, c + 1)],
                    cells: [
                        (r > 0).then(|| grid.cell_index(r - 1, c)),
                        (r < n).then(|| grid.cell_index(r, c)),
                    ],
                };
                horizontal_index[r * m + c] =
                    record(&mut edges, &mut cell_edges, &mut vertex_edges, edge);
            }
        }

        // Then vertical edges.
        for r in 0..n {
            for c in 0..=m {
                let edge = Edge {
                    endpoints: [vertex(r, c), vertex(r + 1, c)],
                    cells: [
                        (c > 0).then(|| grid.cell_index(r, c - 1)),
                        (c < m).then(|| grid.cell_index(r, c)),
                    ],
                };
                vertical_index[r * (m + 1) + c] =
                    record(&mut edges, &mut cell_edges, &mut vertex_edges, edge);
            }
        }

        let clues: Vec<Option<u8>> = (0..n * m).map(|cell| grid.clue(cell)).collect();
        let clue_cells = (0..n * m).filter(|&cell| clues[cell].is_some()).collect();

        Self {
            rows: n,
            cols: m,
            edges,
            cell_edges,
            vertex_edges,
            clue_cells,
            clues,
            horizontal_index,
            vertical_index,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_edges.len()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_edges.len()
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e]
    }

    /// The four edges around a cell.
    #[inline]
    pub fn edges_of_cell(&self, cell: CellId) -> &[EdgeId] {
        &self.cell_edges[cell]
    }

    /// The incident edges of a vertex (2 at corners, 3 on borders, 4 inside).
    #[inline]
    pub fn edges_at_vertex(&self, v: VertexId) -> &[EdgeId] {
        &self.vertex_edges[v]
    }

    /// Ids of all clued cells.
    #[inline]
    pub fn clue_cells(&self) -> &[CellId] {
        &self.clue_cells
    }

    /// Clue of a cell, `None` if unclued.
    #[inline]
    pub fn clue(&self, cell: CellId) -> Option<u8> {
        self.clues[cell]
    }

    /// Lattice coordinates of a vertex.
    #[inline]
    pub fn vertex_coords(&self, v: VertexId) -> (usize, usize) {
        (v / (self.cols + 1), v % (self.cols + 1))
    }

    /// Id of the horizontal edge starting at lattice point `(r, c)`,
    /// `r` in `0..=rows`, `c` in `0..cols`.
    #[inline]
    pub fn horizontal_edge(&self, r: usize, c: usize) -> EdgeId {
        self.horizontal_index[r * self.cols + c]
    }

    /// Id of the vertical edge starting at lattice point `(r, c)`,
    /// `r` in `0..rows`, `c` in `0..=cols`.
    #[inline]
    pub fn vertical_edge(&self, r: usize, c: usize) -> EdgeId {
        self.vertical_index[r * (self.cols + 1) + c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unclued(rows: usize, cols: usize) -> Grid {
        Grid::new(rows, cols, vec![None; rows * cols])
    }

    #[test]
    fn test_counts_1x1() {
        let lattice = Lattice::build(&unclued(1, 1));
        assert_eq!(lattice.edge_count(), 4);
        assert_eq!(lattice.vertex_count(), 4);
        assert_eq!(lattice.cell_count(), 1);
        assert_eq!(lattice.edges_of_cell(0), &[0, 1, 2, 3]);
        for v in 0..4 {
            assert_eq!(lattice.edges_at_vertex(v).len(), 2);
        }
    }

    #[test]
    fn test_edge_ordering_contract() {
        // Horizontal edges fill first, then vertical, both row-major.
        let lattice = Lattice::build(&unclued(2, 3));
        assert_eq!(lattice.edge_count(), 3 * 3 + 2 * 4);
        assert_eq!(lattice.horizontal_edge(0, 0), 0);
        assert_eq!(lattice.horizontal_edge(2, 2), 8);
        assert_eq!(lattice.vertical_edge(0, 0), 9);
        assert_eq!(lattice.vertical_edge(1, 3), 16);

        // Horizontal edge (1, 2) spans vertices (1,2)-(1,3) and separates
        // cells (0,2) and (1,2).
        let e = lattice.edge(lattice.horizontal_edge(1, 2));
        assert_eq!(e.endpoints, [1 * 4 + 2, 1 * 4 + 3]);
        assert_eq!(e.cells, [Some(2), Some(5)]);
    }

    #[test]
    fn test_boundary_edges_have_one_cell() {
        let lattice = Lattice::build(&unclued(2, 2));
        let top = lattice.edge(lattice.horizontal_edge(0, 0));
        assert_eq!(top.cells, [None, Some(0)]);
        let bottom = lattice.edge(lattice.horizontal_edge(2, 1));
        assert_eq!(bottom.cells, [Some(3), None]);
        let left = lattice.edge(lattice.vertical_edge(1, 0));
        assert_eq!(left.cells, [None, Some(2)]);
        let right = lattice.edge(lattice.vertical_edge(0, 2));
        assert_eq!(right.cells, [Some(1), None]);
    }

    #[test]
    fn test_incidence_sizes() {
        let lattice = Lattice::build(&unclued(3, 4));
        for cell in 0..lattice.cell_count() {
            assert_eq!(lattice.edges_of_cell(cell).len(), 4);
        }
        let mut by_len = [0usize; 5];
        for v in 0..lattice.vertex_count() {
            by_len[lattice.edges_at_vertex(v).len()] += 1;
        }
        // 4 corners, 2*(3-1) + 2*(4-1) border vertices, the rest interior.
        assert_eq!(by_len[2], 4);
        assert_eq!(by_len[3], 10);
        assert_eq!(by_len[4], 6);
    }

    #[test]
    fn test_clue_cells_list() {
        let grid = Grid::new(2, 2, vec![None, Some(1), Some(2), None]);
        let lattice = Lattice::build(&grid);
        assert_eq!(lattice.clue_cells(), &[1, 2]);
        assert_eq!(lattice.clue(1), Some(1));
        assert_eq!(lattice.clue(0), None);
    }
}
