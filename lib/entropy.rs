//! Von Neumann entanglement entropy of subsystems of a pure state vector.
//!
//! For a pure state ∣ψ⟩ on *n* qubits and a subsystem *A*, the amplitudes are
//! regarded as an *n*-index tensor with every index of dimension 2. Moving the
//! indices belonging to *A* to the front and flattening gives a
//! 2<sup>|*A*|</sup> × 2<sup>*n* − |*A*|</sup> matrix *ψ*, from which the
//! reduced density matrix is *ρ<sub>A</sub>* = *ψ ψ*<sup>†</sup>. The entropy
//! is then *S* = −Σ *λ* log<sub>2</sub> *λ* over the eigenvalues of
//! *ρ<sub>A</sub>*.
//!
//! Eigenvalues at or below a small cutoff carry no physical probability mass
//! and are dropped before taking logarithms.

use nalgebra as na;
use num_complex::Complex64 as C64;
use rustc_hash::FxHashSet;
use crate::error::{ ToricError, ToricResult };

/// Default eigenvalue cutoff below which reduced-density-matrix eigenvalues
/// are treated as zero.
pub const EIGEN_CUTOFF: f64 = 1e-12;

/// Anything that can report the entanglement entropy of a subset of its
/// qubits.
pub trait EntropySource {
    /// Return the number of qubits.
    fn num_qubits(&self) -> usize;

    /// Return the von Neumann entropy (in bits) of the subsystem formed by the
    /// qubits in `subsystem`.
    fn entropy(&self, subsystem: &[usize]) -> ToricResult<f64>;
}

/// Check that `subsystem` is a valid list of distinct qubit indices for a
/// register of `n` qubits.
pub fn validate_subsystem(n: usize, subsystem: &[usize]) -> ToricResult<()> {
    let mut seen: FxHashSet<usize> = FxHashSet::default();
    for &k in subsystem.iter() {
        if k >= n { return Err(ToricError::QubitOutOfRange { index: k, n }); }
        if !seen.insert(k) { return Err(ToricError::DuplicateQubit(k)); }
    }
    Ok(())
}

fn check_state_len(state: &na::DVector<C64>, n: usize) -> ToricResult<()> {
    if n >= usize::BITS as usize || state.len() != 1_usize << n {
        return Err(ToricError::SizeMismatch {
            expected: n,
            actual: state.len().max(1).ilog2() as usize,
        });
    }
    Ok(())
}

/// Rearrange the amplitudes of an `n`-qubit state into the matrix *ψ* whose
/// rows are indexed by the qubits in `subsystem` (in the given order, first
/// qubit most significant) and whose columns are indexed by the remaining
/// qubits in ascending order.
pub fn bipartite_matrix(
    state: &na::DVector<C64>,
    n: usize,
    subsystem: &[usize],
) -> ToricResult<na::DMatrix<C64>>
{
    check_state_len(state, n)?;
    validate_subsystem(n, subsystem)?;
    let complement: Vec<usize>
        = (0..n).filter(|k| !subsystem.contains(k)).collect();
    let na_: usize = subsystem.len();
    let nb: usize = complement.len();
    // qubit k sits at bit (n - 1 - k) of the basis-state index
    let shift_a: Vec<usize> = subsystem.iter().map(|k| n - 1 - k).collect();
    let shift_b: Vec<usize> = complement.iter().map(|k| n - 1 - k).collect();
    let mut psi: na::DMatrix<C64>
        = na::DMatrix::zeros(1_usize << na_, 1_usize << nb);
    let mut r: usize;
    let mut c: usize;
    for (b, amp) in state.iter().enumerate() {
        r = 0;
        for (j, s) in shift_a.iter().enumerate() {
            r |= ((b >> s) & 1) << (na_ - 1 - j);
        }
        c = 0;
        for (j, s) in shift_b.iter().enumerate() {
            c |= ((b >> s) & 1) << (nb - 1 - j);
        }
        psi[(r, c)] = *amp;
    }
    Ok(psi)
}

/// Compute the reduced density matrix of `subsystem`.
///
/// The result is 2<sup>|*A*|</sup> on a side regardless of the size of the
/// complement; [`entanglement_entropy`] avoids building it when the
/// complement is smaller.
pub fn reduced_density_matrix(
    state: &na::DVector<C64>,
    n: usize,
    subsystem: &[usize],
) -> ToricResult<na::DMatrix<C64>>
{
    let psi = bipartite_matrix(state, n, subsystem)?;
    Ok(&psi * psi.adjoint())
}

/// Compute −Σ *λ* log<sub>2</sub> *λ* over all eigenvalues above `cutoff`.
pub fn entropy_from_eigenvalues<'a, I>(eigenvalues: I, cutoff: f64) -> f64
where I: IntoIterator<Item = &'a f64>
{
    let s: f64
        = eigenvalues.into_iter()
        .filter(|lambda| **lambda > cutoff)
        .map(|lambda| -lambda * lambda.log2())
        .sum();
    s.max(0.0)
}

/// Compute the von Neumann entropy of a Hermitian density matrix.
pub fn von_neumann_entropy(rho: &na::DMatrix<C64>, cutoff: f64) -> f64 {
    let eigenvalues: na::DVector<f64> = rho.symmetric_eigenvalues();
    entropy_from_eigenvalues(eigenvalues.iter(), cutoff)
}

/// Compute the entanglement entropy of `subsystem` for the pure `n`-qubit
/// state `state`.
///
/// The empty subsystem and the full register both give exactly zero without
/// touching the state. Otherwise the spectrum is taken from whichever of *ψ
/// ψ*<sup>†</sup> and *ψ*<sup>†</sup> *ψ* is smaller, and that side may hold at
/// most `max_side` qubits.
pub fn entanglement_entropy(
    state: &na::DVector<C64>,
    n: usize,
    subsystem: &[usize],
    cutoff: f64,
    max_side: usize,
) -> ToricResult<f64>
{
    validate_subsystem(n, subsystem)?;
    if subsystem.is_empty() || subsystem.len() == n { return Ok(0.0); }
    let side: usize = subsystem.len().min(n - subsystem.len());
    if side > max_side {
        return Err(ToricError::TooManyQubits {
            n: side,
            max: max_side,
            what: "reduced density matrices",
        });
    }
    let psi = bipartite_matrix(state, n, subsystem)?;
    // ψψ† and ψ†ψ share their nonzero eigenvalues
    let rho: na::DMatrix<C64>
        = if subsystem.len() == side {
            &psi * psi.adjoint()
        } else {
            psi.adjoint() * &psi
        };
    Ok(von_neumann_entropy(&rho, cutoff))
}

#[cfg(test)]
mod test {
    use rand::{ rngs::StdRng, Rng, SeedableRng };
    use super::*;

    const MAX_SIDE: usize = 12;

    fn ket(n: usize, amps: &[(usize, C64)]) -> na::DVector<C64> {
        let mut state = na::DVector::zeros(1 << n);
        amps.iter().for_each(|(b, a)| { state[*b] = *a; });
        state
    }

    fn bell_pair_state() -> na::DVector<C64> {
        // (∣00⟩ + ∣11⟩) ⊗ ∣0⟩ / √2 on qubits 0, 1, 2
        let h = C64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        ket(3, &[(0b000, h), (0b110, h)])
    }

    #[test]
    fn validation() {
        assert_eq!(validate_subsystem(3, &[]), Ok(()));
        assert_eq!(validate_subsystem(3, &[2, 0]), Ok(()));
        assert_eq!(
            validate_subsystem(3, &[0, 3]),
            Err(ToricError::QubitOutOfRange { index: 3, n: 3 }),
        );
        assert_eq!(
            validate_subsystem(3, &[1, 0, 1]),
            Err(ToricError::DuplicateQubit(1)),
        );
    }

    #[test]
    fn bipartite_matrix_orders_axes() {
        // ∣011⟩ with subsystem [2, 0]: row bits (q2, q0) = (1, 0), column bit
        // q1 = 1
        let state = ket(3, &[(0b011, C64::new(1.0, 0.0))]);
        let psi = bipartite_matrix(&state, 3, &[2, 0]).unwrap();
        assert_eq!(psi.shape(), (4, 2));
        assert_eq!(psi[(0b10, 0b1)], C64::new(1.0, 0.0));
        assert_eq!(psi.iter().filter(|a| a.norm() > 0.0).count(), 1);
    }

    #[test]
    fn state_size_is_checked() {
        let state = ket(3, &[(0, C64::new(1.0, 0.0))]);
        assert!(bipartite_matrix(&state, 4, &[0]).is_err());
    }

    #[test]
    fn product_state_has_zero_entropy() {
        let state = ket(3, &[(0b010, C64::new(1.0, 0.0))]);
        for sub in [vec![0], vec![1], vec![2, 0], vec![1, 2]] {
            let s = entanglement_entropy(&state, 3, &sub, EIGEN_CUTOFF, MAX_SIDE).unwrap();
            assert!(s.abs() < 1e-12);
        }
    }

    #[test]
    fn empty_and_full_subsystems() {
        let state = bell_pair_state();
        assert_eq!(entanglement_entropy(&state, 3, &[], EIGEN_CUTOFF, MAX_SIDE), Ok(0.0));
        assert_eq!(
            entanglement_entropy(&state, 3, &[2, 0, 1], EIGEN_CUTOFF, MAX_SIDE),
            Ok(0.0),
        );
        assert!(entanglement_entropy(&state, 3, &[0, 0], EIGEN_CUTOFF, MAX_SIDE).is_err());
    }

    #[test]
    fn bell_pair_has_one_bit() {
        let state = bell_pair_state();
        let s0 = entanglement_entropy(&state, 3, &[0], EIGEN_CUTOFF, MAX_SIDE).unwrap();
        let s1 = entanglement_entropy(&state, 3, &[1], EIGEN_CUTOFF, MAX_SIDE).unwrap();
        let s2 = entanglement_entropy(&state, 3, &[2], EIGEN_CUTOFF, MAX_SIDE).unwrap();
        let s01 = entanglement_entropy(&state, 3, &[0, 1], EIGEN_CUTOFF, MAX_SIDE).unwrap();
        let s12 = entanglement_entropy(&state, 3, &[1, 2], EIGEN_CUTOFF, MAX_SIDE).unwrap();
        assert!((s0 - 1.0).abs() < 1e-12);
        assert!((s1 - 1.0).abs() < 1e-12);
        assert!(s2.abs() < 1e-12);
        assert!(s01.abs() < 1e-12);
        assert!((s12 - s0).abs() < 1e-12);
    }

    #[test]
    fn reduced_density_matrix_has_unit_trace() {
        let state = bell_pair_state();
        let rho = reduced_density_matrix(&state, 3, &[1, 2]).unwrap();
        assert!((rho.trace() - C64::new(1.0, 0.0)).norm() < 1e-12);
        assert!((rho.adjoint() - &rho).norm() < 1e-12);
    }

    #[test]
    fn cutoff_drops_noise() {
        assert_eq!(entropy_from_eigenvalues(&[1.0, 1e-13, 0.0, -1e-15], 1e-12), 0.0);
        let s = entropy_from_eigenvalues(&[0.5, 0.5], 1e-12);
        assert!((s - 1.0).abs() < 1e-15);
    }

    fn random_state(n: usize, seed: u64) -> na::DVector<C64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let state: na::DVector<C64>
            = na::DVector::from_fn(1 << n, |_, _| {
                C64::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5)
            });
        let norm = state.norm();
        state / C64::new(norm, 0.0)
    }

    #[test]
    fn large_subsystem_uses_smaller_side() {
        let n = 14;
        let state = random_state(n, 1234);
        let big: Vec<usize> = (0..n - 1).collect();
        let s_big = entanglement_entropy(&state, n, &big, EIGEN_CUTOFF, 1).unwrap();
        let s_one = entanglement_entropy(&state, n, &[n - 1], EIGEN_CUTOFF, 1).unwrap();
        assert!(s_one > 0.1);
        assert!((s_big - s_one).abs() < 1e-9);

        let big: Vec<usize> = (0..n - 2).rev().collect();
        let s_big = entanglement_entropy(&state, n, &big, EIGEN_CUTOFF, 2).unwrap();
        let s_two
            = entanglement_entropy(&state, n, &[n - 1, n - 2], EIGEN_CUTOFF, 2)
            .unwrap();
        assert!((s_big - s_two).abs() < 1e-9);
    }

    #[test]
    fn reduced_side_is_limited() {
        let n = 14;
        let state = random_state(n, 5);
        let half: Vec<usize> = (0..7).collect();
        assert_eq!(
            entanglement_entropy(&state, n, &half, EIGEN_CUTOFF, 6),
            Err(ToricError::TooManyQubits {
                n: 7, max: 6, what: "reduced density matrices" }),
        );
        assert!(entanglement_entropy(&state, n, &half, EIGEN_CUTOFF, 7).is_ok());
    }
}
