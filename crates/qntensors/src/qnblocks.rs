//! Quantum-number block descriptors.
//!
//! A [`QnBlocks`] lists the symmetry sectors of one index: an ordered
//! sequence of `(charge, extent)` pairs whose extents sum to the index
//! dimension. Descriptors are built once and then shared immutably
//! (`Arc<QnBlocks>`), so copying an index never copies its sector list.

use std::sync::Arc;

use crate::qn::Qn;

/// Ordered sector list of a symmetry-aware index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QnBlocks {
    sectors: Vec<(Qn, usize)>,
}

impl QnBlocks {
    /// Build a descriptor from `(charge, extent)` pairs, in order.
    pub fn new(sectors: Vec<(Qn, usize)>) -> Arc<Self> {
        Arc::new(Self { sectors })
    }

    /// Number of blocks.
    pub fn size(&self) -> usize {
        self.sectors.len()
    }

    /// Quantum number of block `i` (1-based).
    pub fn qn(&self, i: usize) -> Qn {
        self.sectors[i - 1].0
    }

    /// Extent of block `i` (1-based).
    pub fn blocksize(&self, i: usize) -> usize {
        self.sectors[i - 1].1
    }

    /// Extent of block `i` (0-based).
    pub fn blocksize0(&self, i: usize) -> usize {
        self.sectors[i].1
    }

    /// Sum of all block extents.
    pub fn total_dim(&self) -> usize {
        self.sectors.iter().map(|&(_, n)| n).sum()
    }

    /// Iterate over `(charge, extent)` pairs in block order.
    pub fn iter(&self) -> impl Iterator<Item = &(Qn, usize)> {
        self.sectors.iter()
    }
}
