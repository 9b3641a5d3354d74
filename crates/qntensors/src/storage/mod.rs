//! Tensor storage kinds.
//!
//! One real storage kind, [`BlockSparse`], plus the [`Combiner`]
//! collaborator consumed during contraction.

pub mod blocksparse;
pub mod combiner;

pub use blocksparse::{
    block_div, block_index, block_size, inverse_block_index, Block, BlockOffset, BlockSparse,
};
pub use combiner::{contract_combiner, Combiner};
