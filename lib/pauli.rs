//! Single-qubit Pauli operators and the quarter-turn phases they generate.
//!
//! See also: <https://en.wikipedia.org/wiki/Pauli_matrices>

use std::fmt;
use nalgebra as na;
use num_complex::Complex64 as C64;

/// The argument of a complex phase factor, limited to integer multiples of π/2.
///
/// These are the only phases that arise when Pauli strings act on
/// computational basis states.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 0
    Pi0,
    /// π/2
    Pi1h,
    /// π
    Pi,
    /// 3π/2
    Pi3h,
}

impl Phase {
    /// Convert from a bare multiple of π/2 (modulo 4).
    pub fn from_int(i: i32) -> Self {
        match i.rem_euclid(4) {
            0 => Self::Pi0,
            1 => Self::Pi1h,
            2 => Self::Pi,
            3 => Self::Pi3h,
            _ => unreachable!(),
        }
    }

    /// Return *i* raised to the power of `self`.
    pub fn as_complex(self) -> C64 {
        match self {
            Self::Pi0  => C64::new(1.0, 0.0),
            Self::Pi1h => C64::i(),
            Self::Pi   => C64::new(-1.0, 0.0),
            Self::Pi3h => -C64::i(),
        }
    }
}

/// A single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity
    I,
    /// σ<sub>*x*</sub>
    X,
    /// σ<sub>*y*</sub>
    Y,
    /// σ<sub>*z*</sub>
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::I => write!(f, "{}", if f.alternate() { "." } else { "I" }),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Pauli {
    /// Decode from a pair of tableau bits.
    ///
    /// | `x` | `z` | Pauli |
    /// | :-: | :-: | :---: |
    /// | 0   | 0   | *I*   |
    /// | 1   | 0   | *X*   |
    /// | 1   | 1   | *Y*   |
    /// | 0   | 1   | *Z*   |
    pub fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Self::I,
            (true,  false) => Self::X,
            (true,  true ) => Self::Y,
            (false, true ) => Self::Z,
        }
    }

    /// Encode as a pair of tableau bits `(x, z)`.
    pub fn to_bits(self) -> (bool, bool) {
        match self {
            Self::I => (false, false),
            Self::X => (true,  false),
            Self::Y => (true,  true ),
            Self::Z => (false, true ),
        }
    }

    /// Return the 2 × 2 matrix in the standard (Z) basis.
    pub fn matrix(self) -> na::Matrix2<C64> {
        let z0 = C64::new(0.0, 0.0);
        let z1 = C64::new(1.0, 0.0);
        let i = C64::i();
        match self {
            Self::I => na::Matrix2::new(z1, z0, z0,  z1),
            Self::X => na::Matrix2::new(z0, z1, z1,  z0),
            Self::Y => na::Matrix2::new(z0, -i, i,   z0),
            Self::Z => na::Matrix2::new(z1, z0, z0, -z1),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn phases_wrap_modulo_four() {
        assert_eq!(Phase::from_int(5), Phase::Pi1h);
        assert_eq!(Phase::from_int(-1), Phase::Pi3h);
        assert_eq!(Phase::from_int(2).as_complex(), C64::new(-1.0, 0.0));
        assert_eq!(Phase::Pi3h.as_complex(), -C64::i());
        for k in 0..4 {
            let a = Phase::from_int(k).as_complex();
            let b = Phase::from_int(k + 1).as_complex();
            assert!((a * C64::i() - b).norm() < 1e-15);
        }
    }

    #[test]
    fn bits_roundtrip() {
        for p in [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z] {
            let (x, z) = p.to_bits();
            assert_eq!(Pauli::from_bits(x, z), p);
        }
    }

    #[test]
    fn matrices_square_to_identity() {
        let id = na::Matrix2::<C64>::identity();
        for p in [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z] {
            let m = p.matrix();
            assert!((m * m - id).norm() < 1e-15);
            assert!((m.adjoint() - m).norm() < 1e-15);
        }
        // Y = i X Z
        let y = Pauli::X.matrix() * Pauli::Z.matrix() * C64::i();
        assert!((y - Pauli::Y.matrix()).norm() < 1e-15);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Pauli::I), "I");
        assert_eq!(format!("{:#}", Pauli::I), ".");
        assert_eq!(format!("{}", Pauli::Y), "Y");
    }
}
