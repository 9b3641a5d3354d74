//! Symmetry-aware tensor indices and quantum-number block-sparse storage.
//!
//! The index side: an [`Index`] carries a unique identifier, a prime-level
//! disambiguator, a [`TagSet`], and optionally an orientation plus a shared
//! list of quantum-number sectors. The storage side: a [`BlockSparse`]
//! tensor stores only the blocks whose combined quantum number equals the
//! tensor's divergence, contiguously, behind a sparse directory, and
//! supports addressing, elementwise transforms, and conserving
//! [`contraction`](contract::contract).
//!
//! ```
//! use qntensors::{Arrow, BlockSparse, IdGenerator, Index, IndexSet, Qn};
//!
//! let mut gen = IdGenerator::new();
//! let i = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 3)], Arrow::Out, "i");
//! let j = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 3)], Arrow::Out, "j");
//! let indices = IndexSet::new(vec![i, j]);
//! let tensor = BlockSparse::new(&indices, Qn(1));
//! assert_eq!(tensor.len(), 12);
//! ```

pub mod contract;
pub mod error;
pub mod id;
pub mod index;
pub mod index_set;
pub mod qn;
pub mod qnblocks;
pub mod readwrite;
pub mod storage;
pub mod tagset;

pub use contract::contract;
pub use error::Error;
pub use id::{Id, IdGenerator};
pub use index::{
    qn_block, qn_block_size, show_dim, sim, tags, FormatOptions, Index, IndexVal,
};
pub use index_set::IndexSet;
pub use qn::{Arrow, Qn};
pub use qnblocks::QnBlocks;
pub use readwrite::{read_index, write_index, StreamOptions};
pub use storage::{
    block_div, block_index, block_size, contract_combiner, inverse_block_index, Block,
    BlockOffset, BlockSparse, Combiner,
};
pub use tagset::TagSet;
