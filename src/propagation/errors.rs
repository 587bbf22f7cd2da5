// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for constraint propagation.

use std::fmt;
use strum_macros::EnumCount as EnumCountMacro;

use crate::geometry::{CellId, EdgeId, VertexId};

/// Contradictions detected while applying decisions or propagating.
///
/// These are pruning signals, not program errors: the search discards the
/// offending state and backtracks. Variants carry no heap data so the
/// failure path never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCountMacro)]
pub enum PropagationFailure {
    /// An edge was decided to the opposite of an existing decision.
    EdgeConflict { edge: EdgeId },

    /// A vertex exceeded the maximum ON-degree of 2.
    VertexOverfull { vertex: VertexId },

    /// A vertex has ON-degree 1 but no undecided edge left to pair it.
    VertexDeadEnd { vertex: VertexId },

    /// A clued cell has more ON edges than its clue.
    ClueExceeded { cell: CellId, clue: u8 },

    /// A clued cell cannot reach its clue even if every undecided edge
    /// around it turns ON.
    ClueUnreachable { cell: CellId, clue: u8 },
}

impl fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationFailure::EdgeConflict { edge } => {
                write!(f, "Edge {} already decided to the opposite value", edge)
            }
            PropagationFailure::VertexOverfull { vertex } => {
                write!(f, "Vertex {} has more than 2 ON edges", vertex)
            }
            PropagationFailure::VertexDeadEnd { vertex } => {
                write!(f, "Vertex {} has ON-degree 1 and no undecided edge", vertex)
            }
            PropagationFailure::ClueExceeded { cell, clue } => {
                write!(f, "Cell {} exceeds its clue of {}", cell, clue)
            }
            PropagationFailure::ClueUnreachable { cell, clue } => {
                write!(f, "Cell {} can no longer reach its clue of {}", cell, clue)
            }
        }
    }
}

impl std::error::Error for PropagationFailure {}

impl PropagationFailure {
    /// Stable index of the variant, for statistics slots.
    pub(crate) fn slot(&self) -> usize {
        match self {
            PropagationFailure::EdgeConflict { .. } => 0,
            PropagationFailure::VertexOverfull { .. } => 1,
            PropagationFailure::VertexDeadEnd { .. } => 2,
            PropagationFailure::ClueExceeded { .. } => 3,
            PropagationFailure::ClueUnreachable { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn test_slots_cover_all_variants() {
        let failures = [
            PropagationFailure::EdgeConflict { edge: 0 },
            PropagationFailure::VertexOverfull { vertex: 0 },
            PropagationFailure::VertexDeadEnd { vertex: 0 },
            PropagationFailure::ClueExceeded { cell: 0, clue: 3 },
            PropagationFailure::ClueUnreachable { cell: 0, clue: 3 },
        ];
        assert_eq!(failures.len(), PropagationFailure::COUNT);
        for (i, failure) in failures.iter().enumerate() {
            assert_eq!(failure.slot(), i);
        }
    }
}
