//! Ordered index sequences.

use std::fmt;
use std::ops::Index as StdIndex;

use crate::index::Index;

/// An ordered sequence of [`Index`] values; the shape of a tensor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexSet {
    indices: Vec<Index>,
}

impl IndexSet {
    pub fn new(indices: Vec<Index>) -> Self {
        Self { indices }
    }

    /// Number of indices (tensor rank).
    pub fn rank(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Index> {
        self.indices.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Index> {
        self.indices.iter()
    }

    /// Position of the first index equal to `index`, if any.
    pub fn position(&self, index: &Index) -> Option<usize> {
        self.indices.iter().position(|i| i == index)
    }
}

impl StdIndex<usize> for IndexSet {
    type Output = Index;

    fn index(&self, i: usize) -> &Index {
        &self.indices[i]
    }
}

impl From<Vec<Index>> for IndexSet {
    fn from(indices: Vec<Index>) -> Self {
        Self::new(indices)
    }
}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = &'a Index;
    type IntoIter = std::slice::Iter<'a, Index>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, i) in self.indices.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", i)?;
        }
        Ok(())
    }
}
