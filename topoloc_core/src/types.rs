// topoloc_core/src/types.rs

use nalgebra::{DMatrix, DVector};
use std::fmt;

// --- Core Type Aliases ---
/// Probability mass over the map nodes, indexed `0..N` (node k lives at index k-1).
pub type Belief = DVector<f64>;
/// A `(rows, nodes)` matrix of conditional observation probabilities.
pub type LikelihoodTable = DMatrix<f64>;

// --- Core Identifier ---
/// A 1-indexed topological map node. Node ids are fixed by configuration and
/// never created at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Returns the 0-indexed position of this node in a belief or table column.
    ///
    /// Callers must have validated that the id is at least 1.
    pub fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }

    /// The node living at a 0-indexed belief position.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Whether this id names one of the `node_count` nodes of the map.
    pub fn is_valid(self, node_count: usize) -> bool {
        self.0 >= 1 && (self.0 as usize) <= node_count
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_one_indexed() {
        assert_eq!(NodeId(1).index(), 0);
        assert_eq!(NodeId(18).index(), 17);
        assert_eq!(NodeId::from_index(0), NodeId(1));
        assert_eq!(NodeId::from_index(17), NodeId(18));
    }

    #[test]
    fn validity_respects_node_count() {
        assert!(!NodeId(0).is_valid(18));
        assert!(NodeId(1).is_valid(18));
        assert!(NodeId(18).is_valid(18));
        assert!(!NodeId(19).is_valid(18));
    }
}
