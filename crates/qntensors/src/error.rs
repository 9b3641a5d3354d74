//! Error types for qntensors.

use thiserror::Error;

use crate::qn::Qn;

/// Errors that can occur in index and block-sparse storage operations.
///
/// Debug-only range and sign checks (negative prime levels, out-of-range
/// buffer access, rank mismatches on the hot addressing path) are
/// `debug_assert!`s and do not appear here; the variants below are the
/// contract violations that are reported in every build mode.
#[derive(Debug, Error)]
pub enum Error {
    /// Tag-rewrite rule without a `->` or `<->` separator.
    #[error("tag rule {rule:?} must contain '->' or '<->'")]
    TagRule { rule: String },

    /// Index carries no quantum-number block descriptor.
    #[error("index {index} carries no quantum number blocks")]
    NoQnBlocks { index: String },

    /// No block on the index has the requested quantum number.
    #[error("index {index} has no block with quantum number {qn}")]
    QnBlockNotFound { index: String, qn: Qn },

    /// Matching contraction indices carried with the same orientation.
    #[error("index {index} appears in both tensors with the same orientation")]
    SameOrientation { index: String },

    /// Complex-valued generation requested against real storage.
    #[error("complex generation is not supported for real block-sparse storage")]
    ComplexUnsupported,

    /// Attempt to serialize a default-initialized (null) index.
    #[error("cannot write a default-initialized index")]
    WriteNullIndex,

    /// Underlying stream failure (including short reads).
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream decoded but its contents are structurally inconsistent.
    #[error("corrupt stream: {message}")]
    CorruptStream { message: String },
}
