//! Toric-code generators on a periodic square lattice.
//!
//! Qubits live on the edges of an `lx × ly` square lattice with periodic
//! boundary conditions, for a total of `2 lx ly` qubits. Each vertex carries a
//! *star* operator (Pauli-X on the four incident edges) and each face carries
//! a *plaquette* operator (Pauli-Z on the four bounding edges). Every star
//! shares either zero or two edges with every plaquette, so all generators
//! commute; the product of all stars and the product of all plaquettes are
//! both the identity, leaving a four-fold degenerate code space on the torus.
//!
//! Edges are labeled by the vertex they start from and a [`Dir`]:
//! `(Horizontal, x, y)` joins vertex `(x, y)` to `(x + 1, y)` and
//! `(Vertical, x, y)` joins `(x, y)` to `(x, y + 1)`. Horizontal edges are
//! numbered first, row-major, followed by vertical edges in the same order.

use itertools::Itertools;
use tracing::debug;
use crate::{
    error::{ ToricError, ToricResult },
    pauli::Pauli,
    stabilizer::Stabilizer,
};

/// Orientation of a lattice edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    /// Edge from `(x, y)` to `(x + 1, y)`.
    Horizontal,
    /// Edge from `(x, y)` to `(x, y + 1)`.
    Vertical,
}

/// Geometry of a periodic `lx × ly` square lattice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lattice {
    lx: usize,
    ly: usize,
}

impl Lattice {
    /// Create a new lattice.
    ///
    /// Fails if either dimension is zero.
    pub fn new(lx: usize, ly: usize) -> ToricResult<Self> {
        if lx == 0 || ly == 0 {
            return Err(ToricError::InvalidLattice { lx, ly });
        }
        Ok(Self { lx, ly })
    }

    /// Return the lattice dimensions `(lx, ly)`.
    pub fn dims(&self) -> (usize, usize) { (self.lx, self.ly) }

    /// Return the number of sites, equal to the number of stars and to the
    /// number of plaquettes.
    pub fn num_sites(&self) -> usize { self.lx * self.ly }

    /// Return the number of edges, i.e. qubits.
    pub fn num_qubits(&self) -> usize { 2 * self.lx * self.ly }

    /// Return the qubit index of an edge. Coordinates are taken modulo the
    /// lattice size, so negative offsets can be passed as wrapped values.
    pub fn edge_index(&self, dir: Dir, x: usize, y: usize) -> usize {
        let x = x % self.lx;
        let y = y % self.ly;
        match dir {
            Dir::Horizontal => y * self.lx + x,
            Dir::Vertical => self.lx * self.ly + y * self.lx + x,
        }
    }

    /// Inverse of [`Self::edge_index`].
    pub fn edge_coords(&self, q: usize) -> Option<(Dir, usize, usize)> {
        let sites = self.num_sites();
        if q < sites {
            Some((Dir::Horizontal, q % self.lx, q / self.lx))
        } else if q < 2 * sites {
            let q = q - sites;
            Some((Dir::Vertical, q % self.lx, q / self.lx))
        } else {
            None
        }
    }

    // (x, y) pairs in row-major order
    fn sites(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.ly).cartesian_product(0..self.lx).map(|(y, x)| (x, y))
    }

    /// Return the edges incident to vertex `(x, y)`.
    pub fn star_edges(&self, x: usize, y: usize) -> [usize; 4] {
        let xm = (x + self.lx - 1) % self.lx;
        let ym = (y + self.ly - 1) % self.ly;
        [
            self.edge_index(Dir::Horizontal, x, y),
            self.edge_index(Dir::Horizontal, xm, y),
            self.edge_index(Dir::Vertical, x, y),
            self.edge_index(Dir::Vertical, x, ym),
        ]
    }

    /// Return the edges bounding the face whose lower-left corner is vertex
    /// `(x, y)`.
    pub fn plaquette_edges(&self, x: usize, y: usize) -> [usize; 4] {
        [
            self.edge_index(Dir::Vertical, x, y),
            self.edge_index(Dir::Vertical, x + 1, y),
            self.edge_index(Dir::Horizontal, x, y),
            self.edge_index(Dir::Horizontal, x, y + 1),
        ]
    }

    /// Build the star (Pauli-X) generators, one per vertex in row-major order.
    pub fn stars(&self) -> Vec<Stabilizer> {
        let n = self.num_qubits();
        self.sites()
            .map(|(x, y)| {
                let mut star = Stabilizer::identity(n);
                self.star_edges(x, y).into_iter()
                    .for_each(|q| { star.set(q, Pauli::X); });
                star
            })
            .collect()
    }

    /// Build the plaquette (Pauli-Z) generators, one per face in row-major
    /// order.
    pub fn plaquettes(&self) -> Vec<Stabilizer> {
        let n = self.num_qubits();
        self.sites()
            .map(|(x, y)| {
                let mut plaq = Stabilizer::identity(n);
                self.plaquette_edges(x, y).into_iter()
                    .for_each(|q| { plaq.set(q, Pauli::Z); });
                plaq
            })
            .collect()
    }

    /// Return the rank of the generator set assumed by
    /// [`Self::codespace_dimension`]: all generators, less one redundancy each
    /// for the product of all stars and the product of all plaquettes.
    pub fn generator_rank(&self) -> usize { 2 * self.num_sites() - 2 }

    /// Return the dimension of the code space, 2<sup>(*n* − rank)</sup>.
    pub fn codespace_dimension(&self) -> u64 {
        1_u64 << (self.num_qubits() - self.generator_rank())
    }

    /// Assemble the Hamiltonian term list: all stars followed by all
    /// plaquettes.
    ///
    /// If `hole` is `true`, the plaquette at the midpoint of the plaquette
    /// list (index `len / 2`) is left out, modeling a missing-plaquette
    /// defect.
    pub fn hamiltonian(&self, hole: bool) -> Vec<Stabilizer> {
        let stars = self.stars();
        let mut plaquettes = self.plaquettes();
        if hole && !plaquettes.is_empty() {
            let mid = plaquettes.len() / 2;
            plaquettes.remove(mid);
            debug!(mid, "punched hole at plaquette");
        }
        stars.into_iter().chain(plaquettes).collect()
    }
}

/// Construct the star and plaquette generators for a periodic `lx × ly`
/// lattice.
pub fn build_stabilizers(lx: usize, ly: usize)
    -> ToricResult<(Vec<Stabilizer>, Vec<Stabilizer>)>
{
    let lattice = Lattice::new(lx, ly)?;
    Ok((lattice.stars(), lattice.plaquettes()))
}

/// Return the ground-state degeneracy of the toric code on a periodic
/// `lx × ly` lattice.
pub fn codespace_dimension(lx: usize, ly: usize) -> ToricResult<u64> {
    Ok(Lattice::new(lx, ly)?.codespace_dimension())
}

/// Remove the generator at `index` from a Hamiltonian term list, returning it.
pub fn remove_term(terms: &mut Vec<Stabilizer>, index: usize)
    -> ToricResult<Stabilizer>
{
    if index >= terms.len() {
        return Err(ToricError::TermOutOfRange { index, len: terms.len() });
    }
    Ok(terms.remove(index))
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use crate::stabilizer::{ gf2_rank, stabilizer_commute, syndrome };
    use super::*;

    #[test]
    fn ground_state_degeneracy() {
        assert_eq!(codespace_dimension(2, 2), Ok(4));
        assert_eq!(codespace_dimension(3, 5), Ok(4));
    }

    #[test]
    fn rejects_empty_lattice() {
        assert_eq!(
            build_stabilizers(0, 3).map(|_| ()),
            Err(ToricError::InvalidLattice { lx: 0, ly: 3 }),
        );
        assert!(codespace_dimension(2, 0).is_err());
    }

    #[test]
    fn generator_counts_and_weights() {
        let (stars, plaquettes) = build_stabilizers(3, 2).unwrap();
        assert_eq!(stars.len(), 6);
        assert_eq!(plaquettes.len(), 6);
        for s in stars.iter() {
            assert_eq!(s.num_qubits(), 12);
            assert_eq!(s.weight(), 4);
            assert!(s.paulis().all(|p| p == Pauli::I || p == Pauli::X));
        }
        for p in plaquettes.iter() {
            assert_eq!(p.num_qubits(), 12);
            assert_eq!(p.weight(), 4);
            assert!(p.paulis().all(|q| q == Pauli::I || q == Pauli::Z));
        }
    }

    #[test]
    fn edge_indexing_is_a_bijection() {
        let lattice = Lattice::new(3, 4).unwrap();
        for q in 0..lattice.num_qubits() {
            let (dir, x, y) = lattice.edge_coords(q).unwrap();
            assert_eq!(lattice.edge_index(dir, x, y), q);
        }
        assert_eq!(lattice.edge_coords(24), None);
        assert_eq!(
            lattice.edge_index(Dir::Horizontal, 3, 4),
            lattice.edge_index(Dir::Horizontal, 0, 0),
        );
    }

    #[test]
    fn commutation() {
        let (stars, plaquettes) = build_stabilizers(2, 2).unwrap();
        let all: Vec<Stabilizer> = stars.into_iter().chain(plaquettes).collect();
        for a in all.iter() {
            for b in all.iter() {
                assert!(stabilizer_commute(a, b));
            }
        }
    }

    #[test]
    fn single_qubit_syndrome() {
        let (lx, ly) = (2, 2);
        let (stars, plaquettes) = build_stabilizers(lx, ly).unwrap();
        let n = 2 * lx * ly;
        let err_z = Stabilizer::single(n, 0, Pauli::Z).unwrap();
        let anti = syndrome(&stars, &err_z).into_iter().filter(|s| *s).count();
        assert_eq!(anti, 2);
        let err_x = Stabilizer::single(n, 0, Pauli::X).unwrap();
        let anti = syndrome(&plaquettes, &err_x).into_iter().filter(|s| *s).count();
        assert_eq!(anti, 2);
        // X errors are invisible to stars and Z errors to plaquettes
        assert!(syndrome(&stars, &err_x).into_iter().all(|s| !s));
        assert!(syndrome(&plaquettes, &err_z).into_iter().all(|s| !s));
    }

    #[test]
    fn rank_matches_redundancy_count() {
        for (lx, ly) in [(2, 2), (2, 3), (3, 3), (4, 2)] {
            let lattice = Lattice::new(lx, ly).unwrap();
            let terms = lattice.hamiltonian(false);
            assert_eq!(gf2_rank(&terms), lattice.generator_rank());
        }
    }

    #[test]
    fn hole_removes_middle_plaquette() {
        let lattice = Lattice::new(2, 2).unwrap();
        let full = lattice.hamiltonian(false);
        let holed = lattice.hamiltonian(true);
        assert_eq!(full.len(), 8);
        assert_eq!(holed.len(), 7);
        let plaquettes = lattice.plaquettes();
        assert!(!holed.contains(&plaquettes[2]));
        assert!(holed.contains(&plaquettes[1]));
        assert!(holed.contains(&plaquettes[3]));
    }

    #[test]
    fn remove_arbitrary_term() {
        let lattice = Lattice::new(2, 2).unwrap();
        let mut terms = lattice.hamiltonian(false);
        let stars = lattice.stars();
        assert_eq!(remove_term(&mut terms, 1), Ok(stars[1].clone()));
        assert_eq!(terms.len(), 7);
        assert_eq!(
            remove_term(&mut terms, 7),
            Err(ToricError::TermOutOfRange { index: 7, len: 7 }),
        );
    }

    proptest! {
        #[test]
        fn all_generators_commute(lx in 2_usize..6, ly in 2_usize..6) {
            let (stars, plaquettes) = build_stabilizers(lx, ly).unwrap();
            for s in stars.iter() {
                for p in plaquettes.iter() {
                    prop_assert!(stabilizer_commute(s, p));
                }
                for t in stars.iter() {
                    prop_assert!(stabilizer_commute(s, t));
                }
            }
            for p in plaquettes.iter() {
                for q in plaquettes.iter() {
                    prop_assert!(stabilizer_commute(p, q));
                }
            }
        }

        #[test]
        fn every_edge_in_two_stars_and_two_plaquettes(
            lx in 2_usize..6,
            ly in 2_usize..6,
            q_frac in 0.0_f64..1.0,
        ) {
            let lattice = Lattice::new(lx, ly).unwrap();
            let n = lattice.num_qubits();
            let q = ((q_frac * n as f64) as usize).min(n - 1);
            let err_z = Stabilizer::single(n, q, Pauli::Z).unwrap();
            let err_x = Stabilizer::single(n, q, Pauli::X).unwrap();
            let n_star = syndrome(&lattice.stars(), &err_z)
                .into_iter().filter(|s| *s).count();
            let n_plaq = syndrome(&lattice.plaquettes(), &err_x)
                .into_iter().filter(|s| *s).count();
            prop_assert_eq!(n_star, 2);
            prop_assert_eq!(n_plaq, 2);
        }
    }
}
