//! Block-sparse tensor storage.
//!
//! Stores only the quantum-number-conserving blocks of a tensor: a sparse
//! directory of `(composite block index, buffer offset)` pairs, strictly
//! ascending by block index, plus one contiguous `f64` buffer holding the
//! occupied blocks back to back in directory order. Elements within a block
//! are laid out column-major (index 0 fastest), and composite block indices
//! use the same radix order.

use std::fmt::Write as _;

use num_complex::Complex64;
use smallvec::SmallVec;

use crate::error::Error;
use crate::index_set::IndexSet;
use crate::qn::Qn;

/// Per-index block coordinates of one tensor block.
pub type Block = SmallVec<[usize; 8]>;

/// One directory entry: an occupied composite block and its buffer offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockOffset {
    pub block: usize,
    pub offset: usize,
}

/// Composite block index of per-index block coordinates (index 0 fastest).
///
/// Must match exactly between construction and lookup.
pub fn block_index(coords: &[usize], indices: &IndexSet) -> usize {
    let r = indices.rank();
    debug_assert_eq!(
        coords.len(),
        r,
        "rank mismatch: {} coordinates against rank {}",
        coords.len(),
        r
    );
    if r == 0 {
        return 0;
    }
    let mut ii = 0;
    for i in (1..r).rev() {
        ii += coords[i];
        ii *= indices[i - 1].nblock();
    }
    ii + coords[0]
}

/// Decompose a composite block index back into per-index block coordinates.
pub fn inverse_block_index(mut block: usize, indices: &IndexSet) -> Block {
    let mut coords = Block::new();
    for i in indices.iter() {
        let n = i.nblock();
        coords.push(block % n);
        block /= n;
    }
    debug_assert_eq!(block, 0, "composite block index out of range");
    coords
}

/// Number of elements in the block at the given block coordinates.
pub fn block_size(coords: &[usize], indices: &IndexSet) -> usize {
    coords
        .iter()
        .zip(indices.iter())
        .map(|(&b, i)| i.blocksize0(b))
        .product()
}

/// Net quantum number of the block at the given block coordinates.
pub fn block_div(coords: &[usize], indices: &IndexSet) -> Qn {
    let mut div = Qn::ZERO;
    for (&b, i) in coords.iter().zip(indices.iter()) {
        div += i.dir().apply(i.qn(b + 1));
    }
    div
}

/// Block-sparse storage: sparse directory plus contiguous buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockSparse {
    offsets: Vec<BlockOffset>,
    data: Vec<f64>,
}

impl BlockSparse {
    /// Build zero-filled storage holding exactly the blocks whose combined
    /// quantum number equals `div`.
    pub fn new(indices: &IndexSet, div: Qn) -> Self {
        let mut storage = Self {
            offsets: Vec::new(),
            data: Vec::new(),
        };
        let total = storage.update_offsets(indices, div);
        storage.data = vec![0.0; total];
        log::debug!(
            "block-sparse storage: rank {}, {} occupied blocks, {} elements, divergence {}",
            indices.rank(),
            storage.offsets.len(),
            total,
            div
        );
        storage
    }

    pub(crate) fn from_parts(offsets: Vec<BlockOffset>, data: Vec<f64>) -> Self {
        Self { offsets, data }
    }

    /// Recompute the directory for an index set and divergence; returns the
    /// total element count. The buffer is not touched.
    pub fn update_offsets(&mut self, indices: &IndexSet, div: Qn) -> usize {
        self.offsets.clear();
        if indices.is_empty() {
            // rank-0 tensor: one scalar block iff the divergence vanishes
            if div == Qn::ZERO {
                self.offsets.push(BlockOffset {
                    block: 0,
                    offset: 0,
                });
                return 1;
            }
            return 0;
        }
        debug_assert!(
            indices.iter().all(|i| i.nblock() > 0),
            "every index must carry a block descriptor"
        );
        let r = indices.rank();
        let mut coords: Block = SmallVec::from_elem(0, r);
        let mut block = 0;
        let mut total = 0;
        loop {
            // enumeration with index 0 fastest visits composite block
            // indices in ascending order
            if block_div(&coords, indices) == div {
                self.offsets.push(BlockOffset {
                    block,
                    offset: total,
                });
                total += block_size(&coords, indices);
            }
            block += 1;
            let mut i = 0;
            loop {
                coords[i] += 1;
                if coords[i] < indices[i].nblock() {
                    break;
                }
                coords[i] = 0;
                i += 1;
                if i == r {
                    return total;
                }
            }
        }
    }

    /// Buffer offset of a composite block, if occupied.
    pub fn offset_of(&self, block: usize) -> Option<usize> {
        self.offsets
            .binary_search_by_key(&block, |bo| bo.block)
            .ok()
            .map(|pos| self.offsets[pos].offset)
    }

    /// View of the block at the given block coordinates; `None` if the
    /// block is structurally zero. Rank 0 returns the whole buffer.
    pub fn get_block(&self, indices: &IndexSet, coords: &[usize]) -> Option<&[f64]> {
        if indices.is_empty() {
            return Some(&self.data);
        }
        let offset = self.offset_of(block_index(coords, indices))?;
        let size = block_size(coords, indices);
        debug_assert!(offset + size <= self.data.len(), "block exceeds buffer");
        Some(&self.data[offset..offset + size])
    }

    /// Mutable view of the block at the given block coordinates.
    pub fn get_block_mut(&mut self, indices: &IndexSet, coords: &[usize]) -> Option<&mut [f64]> {
        if indices.is_empty() {
            return Some(&mut self.data);
        }
        let offset = self.offset_of(block_index(coords, indices))?;
        let size = block_size(coords, indices);
        debug_assert!(offset + size <= self.data.len(), "block exceeds buffer");
        Some(&mut self.data[offset..offset + size])
    }

    /// Buffer position of one element, addressed by 0-based global
    /// coordinates; `None` if the containing block is structurally zero.
    pub fn elt_offset(&self, indices: &IndexSet, coords: &[usize]) -> Option<usize> {
        let r = indices.rank();
        debug_assert_eq!(
            coords.len(),
            r,
            "rank mismatch: {} coordinates against rank {}",
            coords.len(),
            r
        );
        let mut boff = 0; // composite block index
        let mut bdim = 1; // block radix so far
        let mut eoff = 0; // element offset within the block
        let mut edim = 1; // element stride: product of prior chosen extents
        for (n, index) in indices.iter().enumerate() {
            let mut block_subind = 0;
            let mut elt_subind = coords[n];
            while elt_subind >= index.blocksize0(block_subind) {
                elt_subind -= index.blocksize0(block_subind);
                block_subind += 1;
            }
            boff += block_subind * bdim;
            bdim *= index.nblock();
            eoff += elt_subind * edim;
            edim *= index.blocksize0(block_subind);
        }
        let base = self.offset_of(boff)?;
        debug_assert!(base + eoff < self.data.len(), "element exceeds buffer");
        Some(base + eoff)
    }

    /// Element at 0-based global coordinates; `None` when structurally zero.
    pub fn get_elt(&self, indices: &IndexSet, coords: &[usize]) -> Option<f64> {
        self.elt_offset(indices, coords).map(|o| self.data[o])
    }

    /// Mutable element reference at 0-based global coordinates.
    pub fn get_elt_mut(&mut self, indices: &IndexSet, coords: &[usize]) -> Option<&mut f64> {
        let offset = self.elt_offset(indices, coords)?;
        Some(&mut self.data[offset])
    }

    /// Net quantum number of the storage, read off the first occupied block.
    pub fn calc_div(&self, indices: &IndexSet) -> Qn {
        match self.offsets.first() {
            Some(bo) => block_div(&inverse_block_index(bo.block, indices), indices),
            None => Qn::ZERO,
        }
    }

    pub fn offsets(&self) -> &[BlockOffset] {
        &self.offsets
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Total stored element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Apply a unary function to every stored element in place.
    pub fn map(&mut self, mut f: impl FnMut(f64) -> f64) {
        for x in &mut self.data {
            *x = f(*x);
        }
    }

    /// Invoke `f` on every stored element pre-multiplied by `scale`.
    /// Read-only; used for reductions.
    pub fn visit(&self, scale: f64, mut f: impl FnMut(f64)) {
        for &x in &self.data {
            f(scale * x);
        }
    }

    /// Overwrite every stored element from a generator.
    pub fn generate(&mut self, mut f: impl FnMut() -> f64) {
        for x in &mut self.data {
            *x = f();
        }
    }

    /// Complex-valued generation against real storage is unsupported.
    pub fn generate_cplx(&mut self, _f: impl FnMut() -> Complex64) -> Result<(), Error> {
        Err(Error::ComplexUnsupported)
    }

    /// Multiply every stored element by `fac`.
    pub fn scale(&mut self, fac: f64) {
        for x in &mut self.data {
            *x *= fac;
        }
    }

    /// Add `fac` times another storage's elements into this one. The two
    /// storages must share block structure; the caller ensures this.
    pub fn accumulate(&mut self, fac: f64, other: &BlockSparse) {
        debug_assert_eq!(
            self.offsets, other.offsets,
            "accumulate requires matching block structure"
        );
        debug_assert_eq!(self.data.len(), other.data.len());
        for (x, &y) in self.data.iter_mut().zip(other.data.iter()) {
            *x += fac * y;
        }
    }

    /// Frobenius norm of the stored elements. Any externally tracked scale
    /// factor is deliberately not applied here.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Complex conjugation; a no-op for real storage, present for interface
    /// uniformity.
    pub fn conj(&mut self) {}

    /// Human-readable rendering of occupied blocks and values.
    pub fn render(&self, indices: &IndexSet) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "block-sparse: {} blocks, {} elements",
            self.offsets.len(),
            self.data.len()
        );
        for bo in &self.offsets {
            let coords = inverse_block_index(bo.block, indices);
            let size = block_size(&coords, indices);
            let _ = write!(out, "block {:?} (div {})", coords.as_slice(), block_div(&coords, indices));
            let _ = writeln!(out, " offset {}:", bo.offset);
            for &x in &self.data[bo.offset..bo.offset + size] {
                let _ = writeln!(out, "  {:.10}", x);
            }
        }
        out
    }
}
