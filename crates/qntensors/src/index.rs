//! Tensor indices.
//!
//! An [`Index`] is a labeled, dimensioned handle: a unique identifier, a
//! prime-level disambiguator, a [`TagSet`], and optionally an orientation
//! plus a shared quantum-number block descriptor. Equality compares
//! identifier, tags, and prime level; the descriptor contents never
//! participate. An [`IndexVal`] pairs an index with a 1-based coordinate.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::id::{Id, IdGenerator};
use crate::qn::{Arrow, Qn};
use crate::qnblocks::QnBlocks;
use crate::tagset::TagSet;

/// A tensor index.
#[derive(Clone, Debug)]
pub struct Index {
    id: Id,
    dim: usize,
    prime: i64,
    tags: TagSet,
    dir: Arrow,
    blocks: Option<Arc<QnBlocks>>,
}

impl Default for Index {
    /// The null index: dimension 1, identifier 0, no tags.
    fn default() -> Self {
        Self {
            id: 0,
            dim: 1,
            prime: 0,
            tags: TagSet::new(),
            dir: Arrow::Out,
            blocks: None,
        }
    }
}

impl Index {
    /// Construct a dense index with a fresh identifier.
    pub fn new(gen: &mut IdGenerator, dim: usize, tags: impl Into<TagSet>) -> Self {
        Self {
            id: gen.generate(),
            dim,
            prime: 0,
            tags: tags.into(),
            dir: Arrow::Out,
            blocks: None,
        }
    }

    /// Construct a symmetry-aware index from `(charge, extent)` sectors.
    ///
    /// The dimension is the sum of the sector extents.
    pub fn with_blocks(
        gen: &mut IdGenerator,
        sectors: Vec<(Qn, usize)>,
        dir: Arrow,
        tags: impl Into<TagSet>,
    ) -> Self {
        let blocks = QnBlocks::new(sectors);
        Self {
            id: gen.generate(),
            dim: blocks.total_dim(),
            prime: 0,
            tags: tags.into(),
            dir,
            blocks: Some(blocks),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn prime_level(&self) -> i64 {
        self.prime
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn dir(&self) -> Arrow {
        self.dir
    }

    pub fn blocks(&self) -> Option<&Arc<QnBlocks>> {
        self.blocks.as_ref()
    }

    /// True iff the identifier is unset. A null index tests false.
    pub fn is_null(&self) -> bool {
        self.id == 0
    }

    /// Set the prime level to `level`.
    pub fn set_prime(mut self, level: i64) -> Self {
        debug_assert!(level >= 0, "prime level must be non-negative, got {}", level);
        self.prime = level;
        self
    }

    /// Reset the prime level to 0.
    pub fn no_prime(mut self) -> Self {
        self.prime = 0;
        self
    }

    /// Add `inc` (possibly negative) to the prime level.
    pub fn prime(mut self, inc: i64) -> Self {
        self.prime += inc;
        debug_assert!(
            self.prime >= 0,
            "prime level must be non-negative, got {}",
            self.prime
        );
        self
    }

    /// Reverse the orientation.
    pub fn dag(mut self) -> Self {
        self.dir = self.dir.reversed();
        self
    }

    /// Pair this index with a 1-based coordinate.
    pub fn val(&self, val: usize) -> IndexVal {
        debug_assert!(
            val >= 1 && val <= self.dim,
            "value {} outside [1, {}]",
            val,
            self.dim
        );
        IndexVal {
            index: self.clone(),
            val,
        }
    }

    /// Equality ignoring the prime level.
    pub fn equals_ignore_prime(&self, other: &Index) -> bool {
        self.id == other.id && self.tags == other.tags
    }

    /// Number of quantum-number blocks; 0 without a descriptor.
    pub fn nblock(&self) -> usize {
        self.blocks.as_ref().map_or(0, |b| b.size())
    }

    /// Quantum number of block `i` (1-based).
    pub fn qn(&self, i: usize) -> Qn {
        debug_assert!(
            self.blocks.is_some(),
            "qn({}) requested on index without block descriptor",
            i
        );
        self.blocks.as_ref().map_or(Qn::ZERO, |b| b.qn(i))
    }

    /// Extent of block `i` (1-based).
    pub fn blocksize(&self, i: usize) -> usize {
        debug_assert!(
            self.blocks.is_some(),
            "blocksize({}) requested on index without block descriptor",
            i
        );
        self.blocks.as_ref().map_or(0, |b| b.blocksize(i))
    }

    /// Extent of block `i` (0-based).
    pub fn blocksize0(&self, i: usize) -> usize {
        debug_assert!(
            self.blocks.is_some(),
            "blocksize0({}) requested on index without block descriptor",
            i
        );
        self.blocks.as_ref().map_or(0, |b| b.blocksize0(i))
    }

    pub(crate) fn rewrite_tags(&mut self, old: &TagSet, new: &TagSet) {
        self.tags.replace_tags(old, new);
    }

    pub(crate) fn from_parts(
        id: Id,
        dim: usize,
        prime: i64,
        tags: TagSet,
        dir: Arrow,
        blocks: Option<Arc<QnBlocks>>,
    ) -> Self {
        Self {
            id,
            dim,
            prime,
            tags,
            dir,
            blocks,
        }
    }

    /// Render with explicit display options.
    pub fn render(&self, opts: FormatOptions) -> String {
        let mut out = format!("({}", self.dim);
        if opts.show_ids {
            out.push_str(&format!("|id={}", self.id % 1000));
        }
        if !self.tags.is_empty() {
            out.push_str(&format!("|{}", self.tags));
        }
        out.push(')');
        if self.prime > 0 {
            if self.prime <= 3 {
                for _ in 0..self.prime {
                    out.push('\'');
                }
            } else {
                out.push_str(&format!("'{}", self.prime));
            }
        }
        if let Some(blocks) = &self.blocks {
            out.push_str(&format!(" <{}>", self.dir));
            for (i, (qn, size)) in blocks.iter().enumerate() {
                out.push_str(&format!("\n  {}: {} {}", i + 1, size, qn));
            }
        }
        out
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.tags == other.tags && self.prime == other.prime
    }
}

impl Eq for Index {}

impl std::hash::Hash for Index {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.tags.hash(state);
        self.prime.hash(state);
    }
}

impl PartialOrd for Index {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Strict weak ordering by dimension, then identifier, then prime level.
///
/// Tags do not participate, so this ordering is coarser than `Eq`: two
/// indices differing only in tags compare `Equal` without being `==`.
impl Ord for Index {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dim
            .cmp(&other.dim)
            .then(self.id.cmp(&other.id))
            .then(self.prime.cmp(&other.prime))
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(FormatOptions::default()))
    }
}

/// Display options for index rendering.
#[derive(Clone, Copy, Debug)]
pub struct FormatOptions {
    /// Show `id=<identifier mod 1000>` in the rendered form.
    pub show_ids: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { show_ids: true }
    }
}

/// An index paired with a 1-based coordinate along it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexVal {
    pub index: Index,
    pub val: usize,
}

impl IndexVal {
    /// Quantum number of the sector containing this coordinate.
    pub fn qn(&self) -> Qn {
        debug_assert!(
            self.index.blocks().is_some(),
            "sector lookup on index without block descriptor"
        );
        let mut rem = self.val;
        if let Some(blocks) = self.index.blocks() {
            for &(qn, size) in blocks.iter() {
                if rem <= size {
                    return qn;
                }
                rem -= size;
            }
        }
        Qn::ZERO
    }

    /// Reverse the underlying index's orientation.
    pub fn dag(mut self) -> Self {
        self.index = self.index.dag();
        self
    }
}

impl fmt::Display for IndexVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.index, self.val)
    }
}

/// Rewrite an index's tags according to a small rule language.
///
/// Spaces are stripped first. `"old->new"` replaces `old` with `new` when
/// all of `old` is present (adds `new` when `old` is empty, otherwise
/// leaves the index unchanged). `"a<->b"` swaps whichever of the two tag
/// sets is present; if both or neither are present the index is returned
/// unchanged. A rule with neither separator is an error.
pub fn tags(index: Index, rule: &str) -> Result<Index, Error> {
    let rule: String = rule.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(pos) = rule.find("<->") {
        let a = TagSet::parse(&rule[..pos]);
        let b = TagSet::parse(&rule[pos + 3..]);
        let has_a = index.tags().has_tags(&a);
        let has_b = index.tags().has_tags(&b);
        let mut index = index;
        // both present: swap is the identity; neither: nothing to swap
        if has_a && !has_b {
            index.rewrite_tags(&a, &b);
        } else if has_b && !has_a {
            index.rewrite_tags(&b, &a);
        }
        Ok(index)
    } else if let Some(pos) = rule.find("->") {
        let old = TagSet::parse(&rule[..pos]);
        let new = TagSet::parse(&rule[pos + 2..]);
        let mut index = index;
        if old.is_empty() || index.tags().has_tags(&old) {
            index.rewrite_tags(&old, &new);
        }
        Ok(index)
    } else {
        Err(Error::TagRule { rule })
    }
}

/// Structural copy with a freshly generated identifier.
pub fn sim(gen: &mut IdGenerator, index: &Index) -> Index {
    Index {
        id: gen.generate(),
        dim: index.dim,
        prime: index.prime,
        tags: index.tags.clone(),
        dir: index.dir,
        blocks: index.blocks.clone(),
    }
}

/// 1-based position of the block carrying quantum number `qn`.
pub fn qn_block(index: &Index, qn: Qn) -> Result<usize, Error> {
    let blocks = index.blocks().ok_or_else(|| Error::NoQnBlocks {
        index: index.to_string(),
    })?;
    for i in 1..=blocks.size() {
        if blocks.qn(i) == qn {
            return Ok(i);
        }
    }
    Err(Error::QnBlockNotFound {
        index: index.to_string(),
        qn,
    })
}

/// Extent of the block carrying quantum number `qn`.
pub fn qn_block_size(index: &Index, qn: Qn) -> Result<usize, Error> {
    let i = qn_block(index, qn)?;
    Ok(index.blocksize(i))
}

/// Short dimension summary, `"dim=N"`.
pub fn show_dim(index: &Index) -> String {
    format!("dim={}", index.dim())
}
