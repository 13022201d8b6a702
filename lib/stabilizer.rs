//! *n*-qubit Pauli strings in the binary tableau representation.
//!
//! A Pauli string on *n* qubits is identified, up to phase, by two bit vectors
//! *x* and *z* of length *n*: the *j*-th bits encode the Pauli acting on the
//! *j*-th qubit as
//!
//! | *x<sub>j</sub>* | *z<sub>j</sub>* | Pauli |
//! | :-------------: | :-------------: | :---: |
//! | 0               | 0               | *I*   |
//! | 1               | 0               | *X*   |
//! | 1               | 1               | *Y*   |
//! | 0               | 1               | *Z*   |
//!
//! As in a stabilizer tableau, the bits are packed into `u32`s so that the
//! symplectic product determining whether two strings commute reduces to a
//! handful of bitwise operations per 32 qubits.

use std::fmt;
use crate::{
    error::{ ToricError, ToricResult },
    pauli::{ Pauli, Phase },
};

pub(crate) const PW: [u32; 32] = [ // PW[i] = 2^i
    1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768,
    65536, 131072, 262144, 524288, 1048576, 2097152, 4194304, 8388608, 16777216,
    33554432, 67108864, 134217728, 268435456, 536870912, 1073741824, 2147483648
];

/// A Pauli operator on `n` qubits in binary tableau form.
///
/// Stabilizers are immutable once built: the lattice constructs them, and the
/// simulators and commutation checks only ever read them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stabilizer {
    n: usize,
    x: Vec<u32>, // Pauli-X bits; size floor(n / 32) + 1
    z: Vec<u32>, // Pauli-Z bits; size floor(n / 32) + 1
}

impl Stabilizer {
    /// Create the identity string on `n` qubits.
    pub fn identity(n: usize) -> Self {
        let over32: usize = (n >> 5) + 1;
        Self { n, x: vec![0; over32], z: vec![0; over32] }
    }

    /// Create from explicit bit vectors.
    ///
    /// Fails if `x` and `z` have different lengths.
    pub fn from_bits(x: &[bool], z: &[bool]) -> ToricResult<Self> {
        if x.len() != z.len() {
            return Err(ToricError::SizeMismatch {
                expected: x.len(),
                actual: z.len(),
            });
        }
        let mut new = Self::identity(x.len());
        for (j, (&xj, &zj)) in x.iter().zip(z).enumerate() {
            new.set(j, Pauli::from_bits(xj, zj));
        }
        Ok(new)
    }

    /// Create from a sequence of single-qubit Paulis, one per qubit.
    pub fn from_paulis(ops: &[Pauli]) -> Self {
        let mut new = Self::identity(ops.len());
        ops.iter().enumerate().for_each(|(j, p)| { new.set(j, *p); });
        new
    }

    /// Create a string acting as `pauli` on every qubit in `support` and as
    /// the identity elsewhere.
    ///
    /// Repeated indices are allowed and have no further effect. Fails if any
    /// index is out of range.
    pub fn from_support<I>(n: usize, support: I, pauli: Pauli)
        -> ToricResult<Self>
    where I: IntoIterator<Item = usize>
    {
        let mut new = Self::identity(n);
        for k in support {
            if k >= n { return Err(ToricError::QubitOutOfRange { index: k, n }); }
            new.set(k, pauli);
        }
        Ok(new)
    }

    /// Create a single-qubit error `pauli` on qubit `k`.
    pub fn single(n: usize, k: usize, pauli: Pauli) -> ToricResult<Self> {
        Self::from_support(n, [k], pauli)
    }

    // `k` must be less than `n`
    pub(crate) fn set(&mut self, k: usize, pauli: Pauli) {
        let k5: usize = k >> 5;
        let pw: u32 = PW[k & 31];
        let (xb, zb) = pauli.to_bits();
        if xb { self.x[k5] |= pw; } else { self.x[k5] &= !pw; }
        if zb { self.z[k5] |= pw; } else { self.z[k5] &= !pw; }
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Return the X bit for the `k`-th qubit.
    pub fn x_bit(&self, k: usize) -> bool {
        k < self.n && self.x[k >> 5] & PW[k & 31] != 0
    }

    /// Return the Z bit for the `k`-th qubit.
    pub fn z_bit(&self, k: usize) -> bool {
        k < self.n && self.z[k >> 5] & PW[k & 31] != 0
    }

    /// Return the Pauli acting on the `k`-th qubit, if it exists.
    pub fn pauli(&self, k: usize) -> Option<Pauli> {
        (k < self.n).then(|| Pauli::from_bits(self.x_bit(k), self.z_bit(k)))
    }

    /// Iterate over the single-qubit Paulis in qubit order.
    pub fn paulis(&self) -> impl Iterator<Item = Pauli> + '_ {
        (0..self.n).map(|k| Pauli::from_bits(self.x_bit(k), self.z_bit(k)))
    }

    /// Return the indices of all qubits acted on non-trivially.
    pub fn support(&self) -> Vec<usize> {
        (0..self.n).filter(|k| self.x_bit(*k) || self.z_bit(*k)).collect()
    }

    /// Return the number of qubits acted on non-trivially.
    pub fn weight(&self) -> usize {
        self.x.iter().zip(&self.z)
            .map(|(xj, zj)| (xj | zj).count_ones() as usize)
            .sum()
    }

    /// Return the number of qubits acted on by *Y*.
    pub fn num_y(&self) -> usize {
        self.x.iter().zip(&self.z)
            .map(|(xj, zj)| (xj & zj).count_ones() as usize)
            .sum()
    }

    /// Return the phase *i*<sup>#Y</sup> picked up by the string relative to
    /// the bare product of its X and Z parts.
    pub fn y_phase(&self) -> Phase { Phase::from_int(self.num_y() as i32) }

    /// Return the concatenated `x ‖ z` tableau row as a vector of 0s and 1s.
    pub fn to_tableau(&self) -> Vec<u8> {
        (0..self.n).map(|k| u8::from(self.x_bit(k)))
            .chain((0..self.n).map(|k| u8::from(self.z_bit(k))))
            .collect()
    }

    /// Return `true` if `self` commutes with `other`, i.e. the symplectic
    /// product `self.x · other.z + self.z · other.x` vanishes mod 2.
    ///
    /// Strings of different sizes are compared as if the shorter one were
    /// padded with identities.
    pub fn commutes_with(&self, other: &Self) -> bool {
        let parity: u32
            = self.x.iter().zip(&self.z)
            .zip(other.x.iter().zip(&other.z))
            .map(|((ax, az), (bx, bz))| (ax & bz).count_ones() + (az & bx).count_ones())
            .sum();
        parity % 2 == 0
    }

    // packed X and Z masks over basis-state indices, with qubit 0 as the most
    // significant bit; callers guarantee n <= usize::BITS
    pub(crate) fn masks(&self) -> (usize, usize) {
        let mut xm: usize = 0;
        let mut zm: usize = 0;
        for k in 0..self.n {
            let b = 1_usize << (self.n - 1 - k);
            if self.x_bit(k) { xm |= b; }
            if self.z_bit(k) { zm |= b; }
        }
        (xm, zm)
    }
}

impl fmt::Display for Stabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.paulis().try_for_each(|p| write!(f, "{:#}", p))
        } else {
            self.paulis().try_for_each(|p| write!(f, "{}", p))
        }
    }
}

/// Return `true` if two stabilizers commute under the symplectic product.
pub fn stabilizer_commute(a: &Stabilizer, b: &Stabilizer) -> bool {
    a.commutes_with(b)
}

/// Return the syndrome of `error` with respect to `generators`: one entry per
/// generator, `true` where the generator anticommutes with the error.
pub fn syndrome(generators: &[Stabilizer], error: &Stabilizer) -> Vec<bool> {
    generators.iter().map(|g| !g.commutes_with(error)).collect()
}

/// Return the rank over GF(2) of a set of Pauli strings in tableau form, i.e.
/// the number of independent generators.
///
/// Phases are ignored.
pub fn gf2_rank(generators: &[Stabilizer]) -> usize {
    let Some(n) = generators.iter().map(|g| g.n).max() else { return 0; };
    let over32: usize = (n >> 5) + 1;
    // each row is x ‖ z, both zero-padded to `over32` words
    let mut rows: Vec<Vec<u32>>
        = generators.iter()
        .map(|g| {
            let mut row = vec![0_u32; 2 * over32];
            row[..g.x.len()].copy_from_slice(&g.x);
            row[over32..over32 + g.z.len()].copy_from_slice(&g.z);
            row
        })
        .collect();
    let mut rank: usize = 0;
    let mut w: usize;
    let mut pw: u32;
    for j in 0..2 * n {
        if rank == rows.len() { break; }
        if j < n {
            w = j >> 5;
            pw = PW[j & 31];
        } else {
            w = over32 + ((j - n) >> 5);
            pw = PW[(j - n) & 31];
        }
        let Some(p) = (rank..rows.len()).find(|i| rows[*i][w] & pw != 0)
            else { continue; };
        rows.swap(rank, p);
        let pivot = rows[rank].clone();
        for (i, row) in rows.iter_mut().enumerate() {
            if i != rank && row[w] & pw != 0 {
                row.iter_mut().zip(&pivot).for_each(|(r, q)| { *r ^= q; });
            }
        }
        rank += 1;
    }
    rank
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn build_and_read_back() {
        let s = Stabilizer::from_paulis(&[Pauli::X, Pauli::I, Pauli::Y, Pauli::Z]);
        assert_eq!(s.num_qubits(), 4);
        assert_eq!(s.pauli(0), Some(Pauli::X));
        assert_eq!(s.pauli(1), Some(Pauli::I));
        assert_eq!(s.pauli(2), Some(Pauli::Y));
        assert_eq!(s.pauli(3), Some(Pauli::Z));
        assert_eq!(s.pauli(4), None);
        assert_eq!(s.weight(), 3);
        assert_eq!(s.num_y(), 1);
        assert_eq!(s.support(), vec![0, 2, 3]);
        assert_eq!(s.to_tableau(), vec![1, 0, 1, 0, 0, 0, 1, 1]);
        assert_eq!(format!("{}", s), "XIYZ");
        assert_eq!(format!("{:#}", s), "X.YZ");
    }

    #[test]
    fn from_bits_checks_lengths() {
        assert!(Stabilizer::from_bits(&[true, false], &[false]).is_err());
        let s = Stabilizer::from_bits(&[true, true], &[false, true]).unwrap();
        assert_eq!(s, Stabilizer::from_paulis(&[Pauli::X, Pauli::Y]));
    }

    #[test]
    fn from_support_rejects_out_of_range() {
        assert_eq!(
            Stabilizer::from_support(4, [1, 4], Pauli::Z),
            Err(ToricError::QubitOutOfRange { index: 4, n: 4 }),
        );
        let s = Stabilizer::from_support(4, [1, 1, 3], Pauli::Z).unwrap();
        assert_eq!(s.weight(), 2);
    }

    #[test]
    fn packing_across_words() {
        let n = 70;
        let s = Stabilizer::from_support(n, [0, 31, 32, 69], Pauli::X).unwrap();
        assert_eq!(s.support(), vec![0, 31, 32, 69]);
        let e = Stabilizer::single(n, 69, Pauli::Z).unwrap();
        assert!(!s.commutes_with(&e));
        let e = Stabilizer::from_support(n, [31, 32], Pauli::Z).unwrap();
        assert!(s.commutes_with(&e));
    }

    #[test]
    fn symplectic_product() {
        let xx = Stabilizer::from_paulis(&[Pauli::X, Pauli::X]);
        let zz = Stabilizer::from_paulis(&[Pauli::Z, Pauli::Z]);
        let zi = Stabilizer::from_paulis(&[Pauli::Z, Pauli::I]);
        let yy = Stabilizer::from_paulis(&[Pauli::Y, Pauli::Y]);
        assert!(stabilizer_commute(&xx, &zz));
        assert!(!stabilizer_commute(&xx, &zi));
        assert!(stabilizer_commute(&yy, &xx));
        assert!(stabilizer_commute(&yy, &zz));
        assert!(stabilizer_commute(&zi, &zi));
        assert_eq!(syndrome(&[xx.clone(), zz.clone()], &zi), vec![true, false]);
    }

    #[test]
    fn masks_put_qubit_zero_first() {
        let s = Stabilizer::from_paulis(&[Pauli::X, Pauli::I, Pauli::Z]);
        assert_eq!(s.masks(), (0b100, 0b001));
        let s = Stabilizer::from_paulis(&[Pauli::I, Pauli::Y, Pauli::I]);
        assert_eq!(s.masks(), (0b010, 0b010));
    }

    #[test]
    fn rank_over_gf2() {
        let xx = Stabilizer::from_paulis(&[Pauli::X, Pauli::X, Pauli::I]);
        let ix = Stabilizer::from_paulis(&[Pauli::I, Pauli::X, Pauli::X]);
        let xi = Stabilizer::from_paulis(&[Pauli::X, Pauli::I, Pauli::X]);
        let zz = Stabilizer::from_paulis(&[Pauli::Z, Pauli::Z, Pauli::I]);
        assert_eq!(gf2_rank(&[]), 0);
        assert_eq!(gf2_rank(&[xx.clone()]), 1);
        assert_eq!(gf2_rank(&[xx.clone(), ix.clone()]), 2);
        // xi = xx * ix
        assert_eq!(gf2_rank(&[xx.clone(), ix.clone(), xi]), 2);
        assert_eq!(gf2_rank(&[xx, ix, zz]), 3);
        assert_eq!(gf2_rank(&[Stabilizer::identity(3)]), 0);
    }
}
