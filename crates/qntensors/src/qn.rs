//! Quantum numbers and index orientations.
//!
//! A [`Qn`] is the conserved-charge label attached to a symmetry sector: an
//! additive value with an inverse. An [`Arrow`] is the per-index orientation
//! that decides the sign a quantum number contributes when sectors are
//! combined across a tensor's indices.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Additive, invertible conserved-charge label.
///
/// The zero value (`Qn::default()`) is the identity of the composition law.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qn(pub i64);

impl Qn {
    /// The identity charge.
    pub const ZERO: Qn = Qn(0);
}

impl Add for Qn {
    type Output = Qn;

    fn add(self, rhs: Qn) -> Qn {
        Qn(self.0 + rhs.0)
    }
}

impl AddAssign for Qn {
    fn add_assign(&mut self, rhs: Qn) {
        self.0 += rhs.0;
    }
}

impl Sub for Qn {
    type Output = Qn;

    fn sub(self, rhs: Qn) -> Qn {
        Qn(self.0 - rhs.0)
    }
}

impl Neg for Qn {
    type Output = Qn;

    fn neg(self) -> Qn {
        Qn(-self.0)
    }
}

impl fmt::Display for Qn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QN({})", self.0)
    }
}

/// Orientation of an index: the sign its quantum numbers carry when
/// combined across a tensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Arrow {
    In,
    #[default]
    Out,
}

impl Arrow {
    /// Sign applied to a block's quantum number: `Out` = +1, `In` = -1.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Arrow::In => -1,
            Arrow::Out => 1,
        }
    }

    /// The opposite orientation.
    #[inline]
    pub fn reversed(self) -> Arrow {
        match self {
            Arrow::In => Arrow::Out,
            Arrow::Out => Arrow::In,
        }
    }

    /// Apply this orientation's sign to a quantum number.
    #[inline]
    pub fn apply(self, qn: Qn) -> Qn {
        match self {
            Arrow::In => -qn,
            Arrow::Out => qn,
        }
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arrow::In => write!(f, "In"),
            Arrow::Out => write!(f, "Out"),
        }
    }
}
