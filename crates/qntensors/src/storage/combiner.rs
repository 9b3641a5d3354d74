//! Index-merging combiner.
//!
//! A [`Combiner`] merges a run of leading indices into one composite index,
//! or splits that composite index back apart. The composite index enumerates
//! the merged sector products in composite block order (index 0 fastest),
//! so a combined tensor's composite block indices and intra-block
//! column-major layout are numerically identical to the uncombined ones and
//! the directory and buffer carry over unchanged.

use crate::id::IdGenerator;
use crate::index::Index;
use crate::index_set::IndexSet;
use crate::qn::Arrow;
use crate::storage::blocksparse::{block_div, block_size, BlockSparse};
use crate::tagset::TagSet;

/// Merges a run of indices into one composite index.
#[derive(Clone, Debug)]
pub struct Combiner {
    combined: Index,
    uncombined: IndexSet,
}

impl Combiner {
    /// Build a combiner over `indices`, minting the composite index with a
    /// fresh identifier and the given tags.
    pub fn new(gen: &mut IdGenerator, indices: Vec<Index>, tags: impl Into<TagSet>) -> Self {
        let uncombined = IndexSet::new(indices);
        let mut sectors = Vec::new();
        let r = uncombined.rank();
        let mut coords = vec![0usize; r];
        // sector products in composite block order, index 0 fastest
        'outer: loop {
            sectors.push((
                block_div(&coords, &uncombined),
                block_size(&coords, &uncombined),
            ));
            let mut i = 0;
            loop {
                if i == r {
                    break 'outer;
                }
                coords[i] += 1;
                if coords[i] < uncombined[i].nblock() {
                    break;
                }
                coords[i] = 0;
                i += 1;
            }
        }
        let combined = Index::with_blocks(gen, sectors, Arrow::Out, tags);
        Self {
            combined,
            uncombined,
        }
    }

    pub fn combined(&self) -> &Index {
        &self.combined
    }

    pub fn uncombined(&self) -> &IndexSet {
        &self.uncombined
    }
}

/// Contract a block-sparse tensor with a combiner.
///
/// If the tensor's first index is the combiner's composite index the
/// combiner splits it back apart; otherwise the combiner's indices must be
/// the tensor's leading run and are merged. Either way the directory and
/// buffer are reused unchanged.
pub fn contract_combiner(
    indices: &IndexSet,
    storage: &BlockSparse,
    combiner: &Combiner,
) -> (IndexSet, BlockSparse) {
    let mut result: Vec<Index> = Vec::new();
    if indices.rank() > 0 && indices[0] == *combiner.combined() {
        // uncombine
        result.extend(combiner.uncombined().iter().cloned());
        result.extend(indices.iter().skip(1).cloned());
    } else {
        let n = combiner.uncombined().rank();
        debug_assert!(
            indices.rank() >= n
                && combiner
                    .uncombined()
                    .iter()
                    .zip(indices.iter())
                    .all(|(c, t)| c == t),
            "combiner indices must be the tensor's leading run"
        );
        result.push(combiner.combined().clone());
        result.extend(indices.iter().skip(n).cloned());
    }
    (IndexSet::new(result), storage.clone())
}
