//! State-vector simulation of an *n*-qubit register under sums of Pauli
//! strings.
//!
//! The state is stored as a dense vector of 2<sup>*n*</sup> complex amplitudes,
//! with qubit 0 as the most significant bit of the basis-state index (i.e. the
//! first factor of the Kronecker product). Two implementations of the same
//! [`Backend`] contract are provided:
//!
//! - [`StateSimulator`] acts with Pauli strings directly on basis states as a
//!   bit flip and a sign, ∣*b*⟩ ↦ *i*<sup>#Y</sup> (−1)<sup>|*b* ∧
//!   *z*|</sup> ∣*b* ⊕ *x*⟩, and assembles Hamiltonians one nonzero per column
//!   per term.
//! - [`DenseSimulator`] builds every operator as a full 2<sup>*n*</sup> ×
//!   2<sup>*n*</sup> matrix from Kronecker products of single-qubit matrices.
//!   It is slow and memory-hungry, and serves as a reference.
//!
//! Time evolution always exponentiates the full Hamiltonian *H* = Σ *P*
//! in one go, *U* = exp(−*i* *dt* *H*), so no Trotter error is incurred.
//!
//! # Example
//! ```
//! use toric_page::{ lattice::Lattice, sim::{ Backend, StateSimulator } };
//! use toric_page::entropy::EntropySource;
//!
//! let lattice = Lattice::new(2, 2).unwrap();
//! let terms = lattice.hamiltonian(false);
//! let mut sim = StateSimulator::new(lattice.num_qubits()).unwrap();
//! sim.evolve(&terms, 0.1).unwrap();
//! let half: Vec<usize> = (0..lattice.num_qubits() / 2).collect();
//! println!("S = {:.6}", sim.entropy(&half).unwrap());
//! ```

use nalgebra as na;
use num_complex::Complex64 as C64;
use tracing::{ debug, trace };
use crate::{
    entropy::{ self, EntropySource, EIGEN_CUTOFF },
    error::{ ToricError, ToricResult },
    stabilizer::Stabilizer,
};

/// Method used to compute the propagator exp(−*i* *dt* *H*).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Propagator {
    /// Padé approximant with scaling and squaring.
    #[default]
    Pade,
    /// Diagonalize the (Hermitian) Hamiltonian and exponentiate its
    /// eigenvalues.
    Eigen,
}

/// Resource limits and numerical settings for a simulator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Largest register for which a state vector may be allocated.
    pub max_qubits: usize,
    /// Largest register for which a full 2<sup>*n*</sup> × 2<sup>*n*</sup>
    /// operator may be materialized. Also bounds the smaller side of any
    /// bipartition whose reduced density matrix is built for an entropy.
    pub max_dense_qubits: usize,
    /// Reduced-density-matrix eigenvalues at or below this value are dropped
    /// from entropy sums.
    pub eigen_cutoff: f64,
    /// How to exponentiate Hamiltonians.
    pub propagator: Propagator,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_qubits: 20,
            max_dense_qubits: 12,
            eigen_cutoff: EIGEN_CUTOFF,
            propagator: Propagator::Pade,
        }
    }
}

/// Common interface for state-vector simulators.
pub trait Backend: EntropySource + Sized {
    /// Create a new simulator for `n` qubits initialized to ∣0...0⟩.
    fn with_config(n: usize, config: SimConfig) -> ToricResult<Self>;

    /// Create a new simulator for `n` qubits initialized to ∣0...0⟩, with
    /// default settings.
    fn new(n: usize) -> ToricResult<Self> {
        Self::with_config(n, SimConfig::default())
    }

    /// Return a reference to the simulator's settings.
    fn config(&self) -> &SimConfig;

    /// Return a reference to the current state vector.
    fn state(&self) -> &na::DVector<C64>;

    /// Left-multiply the state by the Pauli string `st`.
    fn apply_stabilizer(&mut self, st: &Stabilizer) -> ToricResult<()>;

    /// Assemble Σ *P* over `terms` as a dense 2<sup>*n*</sup> ×
    /// 2<sup>*n*</sup> matrix.
    fn hamiltonian(&self, terms: &[Stabilizer])
        -> ToricResult<na::DMatrix<C64>>;

    /// Left-multiply the state by a precomputed 2<sup>*n*</sup> ×
    /// 2<sup>*n*</sup> matrix, usually one returned by
    /// [`propagator`][Self::propagator].
    fn apply_propagator(&mut self, u: &na::DMatrix<C64>) -> ToricResult<()>;

    /// Check that every term acts on exactly this register.
    fn check_terms(&self, terms: &[Stabilizer]) -> ToricResult<()> {
        terms.iter().try_for_each(|st| check_operator(self.num_qubits(), st))
    }

    /// Build the propagator exp(−*i* *dt* Σ *P*) for the Pauli strings *P*
    /// in `terms`, using the configured [`Propagator`] method.
    ///
    /// The result can be passed to [`apply_propagator`][Self::apply_propagator]
    /// any number of times.
    fn propagator(&self, terms: &[Stabilizer], dt: f64)
        -> ToricResult<na::DMatrix<C64>>
    {
        let h = self.hamiltonian(terms)?;
        debug!(
            terms = terms.len(), dt, propagator = ?self.config().propagator,
            "build propagator",
        );
        Ok(exponentiate(h, dt, self.config().propagator))
    }

    /// Evolve the state by `exp(−i dt Σ P)` for the Pauli strings `P` in
    /// `terms`.
    ///
    /// Terms are checked against the register size even when `dt == 0` or
    /// `terms` is empty, in which case the state is otherwise left untouched.
    fn evolve(&mut self, terms: &[Stabilizer], dt: f64) -> ToricResult<()> {
        self.check_terms(terms)?;
        if dt == 0.0 || terms.is_empty() {
            trace!(dt, terms = terms.len(), "trivial evolution");
            return Ok(());
        }
        let u = self.propagator(terms, dt)?;
        self.apply_propagator(&u)
    }

    /// Return the expectation value ⟨ψ∣*P*∣ψ⟩ of a Pauli string.
    fn expectation(&self, st: &Stabilizer) -> ToricResult<f64>;

    /// Reset the state to ∣0...0⟩.
    fn reset(&mut self);

    /// Return the 2-norm of the state.
    fn norm(&self) -> f64 { self.state().norm() }
}

// basis-state indices must fit in a usize
const HARD_MAX_QUBITS: usize = usize::BITS as usize - 2;

fn check_register(n: usize, max: usize, what: &'static str)
    -> ToricResult<()>
{
    let max = max.min(HARD_MAX_QUBITS);
    (n <= max).then_some(())
        .ok_or(ToricError::TooManyQubits { n, max, what })
}

fn check_operator(n: usize, st: &Stabilizer) -> ToricResult<()> {
    (st.num_qubits() == n).then_some(())
        .ok_or(ToricError::SizeMismatch { expected: n, actual: st.num_qubits() })
}

fn ground_state(n: usize) -> na::DVector<C64> {
    let mut state: na::DVector<C64> = na::DVector::zeros(1 << n);
    state[0] = C64::new(1.0, 0.0);
    state
}

fn check_propagator(n: usize, u: &na::DMatrix<C64>) -> ToricResult<()> {
    let dim: usize = 1 << n;
    (u.nrows() == dim && u.ncols() == dim).then_some(())
        .ok_or_else(|| {
            ToricError::invalid_parameter(
                "propagator",
                format!(
                    "expected a {} × {} matrix, got {} × {}",
                    dim, dim, u.nrows(), u.ncols(),
                ),
            )
        })
}

// exp(-i dt H) for Hermitian H
fn exponentiate(h: na::DMatrix<C64>, dt: f64, method: Propagator)
    -> na::DMatrix<C64>
{
    match method {
        Propagator::Pade => (h * C64::new(0.0, -dt)).exp(),
        Propagator::Eigen => {
            let eig = na::SymmetricEigen::new(h);
            let mut v_phase = eig.eigenvectors.clone();
            v_phase.column_iter_mut()
                .zip(eig.eigenvalues.iter())
                .for_each(|(mut col, lambda)| {
                    col *= C64::from_polar(1.0, -dt * lambda);
                });
            v_phase * eig.eigenvectors.adjoint()
        },
    }
}

/// State-vector simulator acting with Pauli strings as bit masks.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSimulator {
    n: usize,
    state: na::DVector<C64>,
    config: SimConfig,
}

// phase * (-1)^popcount(bits)
fn signed(ph: C64, bits: usize) -> C64 {
    if bits.count_ones() % 2 == 0 { ph } else { -ph }
}

impl EntropySource for StateSimulator {
    fn num_qubits(&self) -> usize { self.n }

    fn entropy(&self, subsystem: &[usize]) -> ToricResult<f64> {
        entropy::entanglement_entropy(
            &self.state,
            self.n,
            subsystem,
            self.config.eigen_cutoff,
            self.config.max_dense_qubits,
        )
    }
}

impl Backend for StateSimulator {
    fn with_config(n: usize, config: SimConfig) -> ToricResult<Self> {
        check_register(n, config.max_qubits, "state vectors")?;
        debug!(n, ?config, "new sparse-action simulator");
        Ok(Self { n, state: ground_state(n), config })
    }

    fn config(&self) -> &SimConfig { &self.config }

    fn state(&self) -> &na::DVector<C64> { &self.state }

    fn apply_stabilizer(&mut self, st: &Stabilizer) -> ToricResult<()> {
        check_operator(self.n, st)?;
        let (xm, zm) = st.masks();
        let ph = st.y_phase().as_complex();
        let mut new: na::DVector<C64> = na::DVector::zeros(self.state.len());
        self.state.iter().enumerate()
            .for_each(|(b, a)| { new[b ^ xm] = signed(ph, b & zm) * a; });
        self.state = new;
        Ok(())
    }

    // one nonzero per column per term
    fn hamiltonian(&self, terms: &[Stabilizer])
        -> ToricResult<na::DMatrix<C64>>
    {
        check_register(self.n, self.config.max_dense_qubits, "dense operators")?;
        self.check_terms(terms)?;
        let dim: usize = 1 << self.n;
        let mut h: na::DMatrix<C64> = na::DMatrix::zeros(dim, dim);
        for st in terms.iter() {
            let (xm, zm) = st.masks();
            let ph = st.y_phase().as_complex();
            for b in 0..dim {
                h[(b ^ xm, b)] += signed(ph, b & zm);
            }
        }
        Ok(h)
    }

    fn apply_propagator(&mut self, u: &na::DMatrix<C64>) -> ToricResult<()> {
        check_propagator(self.n, u)?;
        self.state = u * &self.state;
        Ok(())
    }

    fn expectation(&self, st: &Stabilizer) -> ToricResult<f64> {
        check_operator(self.n, st)?;
        let (xm, zm) = st.masks();
        let ph = st.y_phase().as_complex();
        let ev: C64
            = self.state.iter().enumerate()
            .map(|(b, a)| self.state[b ^ xm].conj() * signed(ph, b & zm) * a)
            .sum();
        Ok(ev.re)
    }

    fn reset(&mut self) { self.state = ground_state(self.n); }
}

/// Reference simulator that materializes every operator as a dense matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseSimulator {
    n: usize,
    state: na::DVector<C64>,
    config: SimConfig,
}

impl DenseSimulator {
    /// Return the full matrix of a Pauli string as the Kronecker product of
    /// its single-qubit factors, qubit 0 first.
    pub fn operator(&self, st: &Stabilizer) -> ToricResult<na::DMatrix<C64>> {
        check_operator(self.n, st)?;
        Ok(
            st.paulis()
                .fold(
                    na::DMatrix::identity(1, 1),
                    |acc: na::DMatrix<C64>, p| acc.kronecker(&p.matrix()),
                )
        )
    }
}

impl EntropySource for DenseSimulator {
    fn num_qubits(&self) -> usize { self.n }

    fn entropy(&self, subsystem: &[usize]) -> ToricResult<f64> {
        entropy::entanglement_entropy(
            &self.state,
            self.n,
            subsystem,
            self.config.eigen_cutoff,
            self.config.max_dense_qubits,
        )
    }
}

impl Backend for DenseSimulator {
    fn with_config(n: usize, config: SimConfig) -> ToricResult<Self> {
        check_register(n, config.max_qubits, "state vectors")?;
        check_register(n, config.max_dense_qubits, "dense operators")?;
        debug!(n, ?config, "new dense reference simulator");
        Ok(Self { n, state: ground_state(n), config })
    }

    fn config(&self) -> &SimConfig { &self.config }

    fn state(&self) -> &na::DVector<C64> { &self.state }

    fn apply_stabilizer(&mut self, st: &Stabilizer) -> ToricResult<()> {
        let op = self.operator(st)?;
        self.state = op * &self.state;
        Ok(())
    }

    // sum of dense Kronecker products
    fn hamiltonian(&self, terms: &[Stabilizer])
        -> ToricResult<na::DMatrix<C64>>
    {
        let dim: usize = 1 << self.n;
        terms.iter()
            .try_fold(
                na::DMatrix::zeros(dim, dim),
                |acc: na::DMatrix<C64>, st| Ok(acc + self.operator(st)?),
            )
    }

    fn apply_propagator(&mut self, u: &na::DMatrix<C64>) -> ToricResult<()> {
        check_propagator(self.n, u)?;
        self.state = u * &self.state;
        Ok(())
    }

    fn expectation(&self, st: &Stabilizer) -> ToricResult<f64> {
        let op = self.operator(st)?;
        Ok(self.state.dotc(&(op * &self.state)).re)
    }

    fn reset(&mut self) { self.state = ground_state(self.n); }
}
