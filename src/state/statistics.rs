// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters accumulated during a solve. The slots cover the named search
//! counters plus one slot per propagation-failure kind. Increments are
//! atomic because subtree workers share one `Statistics` value.

use std::sync::atomic::{AtomicU64, Ordering};

use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

use crate::propagation::PropagationFailure;

/// Named search counters.
#[derive(Debug, EnumCountMacro, Copy, Clone)]
#[repr(u8)]
pub enum Counters {
    /// Search-tree nodes entered.
    NodesExplored,
    /// Nodes where both branch values survived and the tree forked.
    BranchNodes,
    /// Solutions accepted by the final validator.
    SolutionsFound,
}

const COUNT: usize = Counters::COUNT + PropagationFailure::COUNT;

/// Atomic counter block for one solve.
#[derive(Debug)]
pub struct Statistics {
    stats: [AtomicU64; COUNT],
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    pub fn new() -> Self {
        Self {
            stats: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Increment the specified counter by 1.
    #[inline]
    pub fn increment(&self, counter: Counters) {
        self.stats[counter as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Record one propagation failure of the given kind.
    #[inline]
    pub fn record_failure(&self, failure: &PropagationFailure) {
        self.stats[Counters::COUNT + failure.slot()].fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize].load(Ordering::Relaxed)
    }

    /// Total propagation failures of every kind (pruned branches).
    pub fn failures(&self) -> u64 {
        self.stats[Counters::COUNT..]
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_roundtrip() {
        let stats = Statistics::new();
        assert_eq!(stats.get(Counters::NodesExplored), 0);
        stats.increment(Counters::NodesExplored);
        stats.increment(Counters::NodesExplored);
        stats.increment(Counters::SolutionsFound);
        assert_eq!(stats.get(Counters::NodesExplored), 2);
        assert_eq!(stats.get(Counters::SolutionsFound), 1);
        assert_eq!(stats.get(Counters::BranchNodes), 0);
    }

    #[test]
    fn test_failures_accumulate_by_kind() {
        let stats = Statistics::new();
        stats.record_failure(&PropagationFailure::VertexOverfull { vertex: 3 });
        stats.record_failure(&PropagationFailure::ClueExceeded { cell: 0, clue: 2 });
        stats.record_failure(&PropagationFailure::ClueExceeded { cell: 1, clue: 1 });
        assert_eq!(stats.failures(), 3);
        assert_eq!(stats.get(Counters::NodesExplored), 0);
    }
}
