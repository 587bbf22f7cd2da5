// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Geometric types for Slitherlink puzzles.
//!
//! This module contains the immutable puzzle description and its derived
//! graph:
//! - [`Grid`]: dimensions and clue values
//! - [`Lattice`]: edge table and incidence tables built from a grid
//!
//! Everything here is built once per puzzle and read-only afterwards, so it
//! can be shared freely across search workers.

pub mod grid;
pub mod lattice;

pub use grid::{CellId, Grid};
pub use lattice::{Edge, EdgeId, Lattice, VertexId};
