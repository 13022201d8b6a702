//! Entanglement geometry: mutual information between subsystems, the distance
//! it induces, and low-dimensional embeddings of that distance.
//!
//! Given subsystems *A*<sub>1</sub>, ..., *A*<sub>*k*</sub> of a register, the
//! mutual information
//!
//! *I*(*A*<sub>*i*</sub> : *A*<sub>*j*</sub>) = *S*(*A*<sub>*i*</sub>) +
//! *S*(*A*<sub>*j*</sub>) − *S*(*A*<sub>*i*</sub> ∪ *A*<sub>*j*</sub>)
//!
//! is turned into a dissimilarity *d*<sub>*ij*</sub> = 1 / *I*<sub>*ij*</sub>,
//! so that strongly correlated subsystems sit close together. Pairs sharing no
//! information would sit infinitely far apart; they are instead placed at a
//! finite [`Sentinel`] distance so that the matrix can be embedded.
//!
//! Embeddings are computed by metric multidimensional scaling using the SMACOF
//! stress-majorization algorithm[^1], with several random starts drawn from a
//! seeded generator. Classical (Torgerson) scaling is also available.
//!
//! [^1]: J. de Leeuw, "Applications of Convex Analysis to Multidimensional
//! Scaling" (1977).

use itertools::Itertools;
use nalgebra as na;
use rand::{ rngs::StdRng, Rng, SeedableRng };
use tracing::{ debug, trace, warn };
use crate::{
    entropy::EntropySource,
    error::{ ToricError, ToricResult },
};

/// Mutual information more negative than this is reported before being
/// clamped to the sentinel.
pub const NEGATIVE_MI_WARN: f64 = 1e-8;

/// Compute the (symmetric) matrix of mutual information between all pairs of
/// `subsystems`.
///
/// The diagonal is zero. Each single-subsystem entropy is computed once, and
/// each unordered pair once. Unions are taken as sets, so overlapping
/// subsystems are allowed.
pub fn mutual_information_matrix<S>(subsystems: &[Vec<usize>], source: &S)
    -> ToricResult<na::DMatrix<f64>>
where S: EntropySource + ?Sized
{
    let k: usize = subsystems.len();
    let entropies: Vec<f64>
        = subsystems.iter()
        .map(|sub| source.entropy(sub))
        .collect::<ToricResult<_>>()?;
    let mut mi: na::DMatrix<f64> = na::DMatrix::zeros(k, k);
    for (i, j) in (0..k).tuple_combinations() {
        let union: Vec<usize>
            = subsystems[i].iter().chain(subsystems[j].iter())
            .copied()
            .sorted_unstable()
            .dedup()
            .collect();
        let iij = entropies[i] + entropies[j] - source.entropy(&union)?;
        trace!(i, j, mi = iij, "mutual information");
        mi[(i, j)] = iij;
        mi[(j, i)] = iij;
    }
    Ok(mi)
}

/// Distance assigned to pairs of subsystems with vanishing mutual information.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sentinel {
    /// This multiple of the largest finite distance in the matrix, or `1.0` if
    /// there are none.
    ScaledMax(f64),
    /// A fixed value.
    Fixed(f64),
}

impl Default for Sentinel {
    fn default() -> Self { Self::ScaledMax(2.0) }
}

/// Controls the conversion from mutual information to distance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DistancePolicy {
    /// Mutual information at or below this value is treated as zero.
    pub zero_tolerance: f64,
    /// Distance for pairs treated as uncorrelated.
    pub sentinel: Sentinel,
}

impl Default for DistancePolicy {
    fn default() -> Self {
        Self { zero_tolerance: 1e-12, sentinel: Sentinel::default() }
    }
}

impl DistancePolicy {
    fn validate(&self) -> ToricResult<()> {
        if !self.zero_tolerance.is_finite() || self.zero_tolerance < 0.0 {
            return Err(ToricError::invalid_parameter(
                "zero_tolerance", "must be finite and non-negative"));
        }
        match self.sentinel {
            Sentinel::ScaledMax(f) if !f.is_finite() || f <= 0.0
                => Err(ToricError::invalid_parameter(
                    "sentinel", "scale factor must be finite and positive")),
            Sentinel::Fixed(d) if !d.is_finite() || d <= 0.0
                => Err(ToricError::invalid_parameter(
                    "sentinel", "fixed distance must be finite and positive")),
            _ => Ok(()),
        }
    }
}

fn check_square_finite(m: &na::DMatrix<f64>) -> ToricResult<()> {
    if !m.is_square() {
        return Err(ToricError::NotSquare { rows: m.nrows(), cols: m.ncols() });
    }
    for ((i, j), v) in (0..m.ncols())
        .flat_map(|j| (0..m.nrows()).map(move |i| (i, j)))
        .zip(m.iter())
    {
        if !v.is_finite() { return Err(ToricError::NonFinite(i, j)); }
    }
    Ok(())
}

/// Convert a mutual-information matrix to distances *d*<sub>*ij*</sub> = 1 /
/// *I*<sub>*ij*</sub>, with zero on the diagonal.
///
/// Entries at or below `policy.zero_tolerance` (including small negative
/// values from round-off) are assigned the sentinel distance.
pub fn entanglement_distance(mi: &na::DMatrix<f64>, policy: &DistancePolicy)
    -> ToricResult<na::DMatrix<f64>>
{
    check_square_finite(mi)?;
    policy.validate()?;
    let k: usize = mi.nrows();
    let mut dist: na::DMatrix<f64> = na::DMatrix::zeros(k, k);
    let mut uncorrelated: Vec<(usize, usize)> = Vec::new();
    let mut max_finite: Option<f64> = None;
    for i in 0..k {
        for j in (0..k).filter(|j| *j != i) {
            let iij = mi[(i, j)];
            if iij <= policy.zero_tolerance {
                if iij < -NEGATIVE_MI_WARN {
                    warn!(i, j, mi = iij, "negative mutual information; treating as zero");
                }
                uncorrelated.push((i, j));
            } else {
                let d = iij.recip();
                dist[(i, j)] = d;
                max_finite = Some(max_finite.map_or(d, |m: f64| m.max(d)));
            }
        }
    }
    let sentinel: f64
        = match policy.sentinel {
            Sentinel::ScaledMax(f) => max_finite.map_or(1.0, |m| f * m),
            Sentinel::Fixed(d) => d,
        };
    if !uncorrelated.is_empty() {
        debug!(pairs = uncorrelated.len() / 2, sentinel, "uncorrelated pairs");
    }
    uncorrelated.into_iter().for_each(|(i, j)| { dist[(i, j)] = sentinel; });
    Ok(dist)
}

/// Starting configuration for SMACOF.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MdsInit {
    /// `n_init` independent starts with coordinates drawn uniformly from [0,
    /// 1), keeping the one with lowest stress.
    #[default]
    Random,
    /// A single start from the classical scaling solution.
    Classical,
}

/// Settings for [`smacof`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MdsConfig {
    /// Dimension of the embedding space.
    pub dim: usize,
    /// Number of random starts.
    pub n_init: usize,
    /// Maximum number of iterations per start.
    pub max_iter: usize,
    /// Relative stress improvement below which iteration stops.
    pub eps: f64,
    /// Seed for the random starts.
    pub seed: u64,
    /// Initialization method.
    pub init: MdsInit,
}

impl Default for MdsConfig {
    fn default() -> Self {
        Self {
            dim: 2,
            n_init: 4,
            max_iter: 300,
            eps: 1e-3,
            seed: 0,
            init: MdsInit::Random,
        }
    }
}

impl MdsConfig {
    fn validate(&self) -> ToricResult<()> {
        if self.dim == 0 {
            return Err(ToricError::invalid_parameter("dim", "must be at least 1"));
        }
        if self.n_init == 0 {
            return Err(ToricError::invalid_parameter("n_init", "must be at least 1"));
        }
        if self.max_iter == 0 {
            return Err(ToricError::invalid_parameter("max_iter", "must be at least 1"));
        }
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(ToricError::invalid_parameter(
                "eps", "must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Output of [`smacof`].
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding {
    /// `k × dim` matrix of coordinates, one row per point.
    pub coords: na::DMatrix<f64>,
    /// Raw stress, ½ Σ<sub>*ij*</sub> (‖*x*<sub>*i*</sub> −
    /// *x*<sub>*j*</sub>‖ − *d*<sub>*ij*</sub>)<sup>2</sup>.
    pub stress: f64,
    /// Number of iterations taken by the best start.
    pub n_iter: usize,
}

const SYMMETRY_TOL: f64 = 1e-9;

fn check_dissimilarity(dist: &na::DMatrix<f64>) -> ToricResult<()> {
    check_square_finite(dist)?;
    for (i, j) in (0..dist.nrows()).tuple_combinations() {
        let a = dist[(i, j)];
        let b = dist[(j, i)];
        if (a - b).abs() > SYMMETRY_TOL * a.abs().max(b.abs()).max(1.0) {
            return Err(ToricError::NotSymmetric { i, j, a, b });
        }
    }
    Ok(())
}

/// Return the matrix of Euclidean distances between the rows of `x`.
pub fn pairwise_distances(x: &na::DMatrix<f64>) -> na::DMatrix<f64> {
    let k = x.nrows();
    na::DMatrix::from_fn(k, k, |i, j| (x.row(i) - x.row(j)).norm())
}

/// Classical (Torgerson) multidimensional scaling.
///
/// Double-centers the squared distances and projects onto the `dim` leading
/// eigenvectors. Exact for distances that come from points in
/// `dim`-dimensional Euclidean space; negative eigenvalues are clamped to
/// zero.
pub fn classical_mds(dist: &na::DMatrix<f64>, dim: usize)
    -> ToricResult<na::DMatrix<f64>>
{
    check_dissimilarity(dist)?;
    if dim == 0 {
        return Err(ToricError::invalid_parameter("dim", "must be at least 1"));
    }
    let k = dist.nrows();
    if k == 0 { return Ok(na::DMatrix::zeros(0, dim)); }
    let d2 = dist.map(|d| d * d);
    let center: na::DMatrix<f64>
        = na::DMatrix::identity(k, k)
        - na::DMatrix::from_element(k, k, 1.0 / k as f64);
    let b = (&center * d2 * &center) * -0.5;
    let eig = na::SymmetricEigen::new(b);
    let mut coords: na::DMatrix<f64> = na::DMatrix::zeros(k, dim);
    (0..k)
        .sorted_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]))
        .take(dim)
        .enumerate()
        .for_each(|(c, idx)| {
            let scale = eig.eigenvalues[idx].max(0.0).sqrt();
            coords.column_mut(c).copy_from(&(eig.eigenvectors.column(idx) * scale));
        });
    Ok(coords)
}

// a single SMACOF run from `x`; returns (coords, stress, iterations)
fn smacof_single(
    dist: &na::DMatrix<f64>,
    mut x: na::DMatrix<f64>,
    max_iter: usize,
    eps: f64,
) -> (na::DMatrix<f64>, f64, usize)
{
    let k = dist.nrows();
    let mut old_stress: Option<f64> = None;
    let mut stress: f64 = 0.0;
    let mut n_iter: usize = 0;
    for it in 0..max_iter {
        n_iter = it + 1;
        let mut dis = pairwise_distances(&x);
        stress
            = dis.iter().zip(dist.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / 2.0;
        dis.iter_mut().filter(|d| **d == 0.0).for_each(|d| { *d = 1e-5; });
        let ratio = dist.component_div(&dis);
        let mut b = -&ratio;
        for i in 0..k {
            b[(i, i)] += ratio.row(i).sum();
        }
        x = (b * &x) / k as f64;
        let size: f64 = x.row_iter().map(|r| r.norm()).sum();
        if size == 0.0 { break; }
        let scaled = stress / size;
        trace!(it, stress, "smacof");
        if old_stress.is_some_and(|old| old - scaled < eps) { break; }
        old_stress = Some(scaled);
    }
    (x, stress, n_iter)
}

/// Metric multidimensional scaling of a dissimilarity matrix by SMACOF.
///
/// Deterministic for a given input and configuration: random starts are drawn
/// in sequence from a single generator seeded with `config.seed`, and the
/// start with lowest final stress is kept.
pub fn smacof(dist: &na::DMatrix<f64>, config: &MdsConfig)
    -> ToricResult<Embedding>
{
    check_dissimilarity(dist)?;
    config.validate()?;
    let k = dist.nrows();
    if k == 0 {
        return Ok(Embedding {
            coords: na::DMatrix::zeros(0, config.dim),
            stress: 0.0,
            n_iter: 0,
        });
    }
    let starts: Vec<na::DMatrix<f64>>
        = match config.init {
            MdsInit::Random => {
                let mut rng = StdRng::seed_from_u64(config.seed);
                (0..config.n_init)
                    .map(|_| {
                        na::DMatrix::from_fn(k, config.dim, |_, _| rng.gen::<f64>())
                    })
                    .collect()
            },
            MdsInit::Classical => vec![classical_mds(dist, config.dim)?],
        };
    let mut best: Option<Embedding> = None;
    for (run, x0) in starts.into_iter().enumerate() {
        let (coords, stress, n_iter)
            = smacof_single(dist, x0, config.max_iter, config.eps);
        debug!(run, stress, n_iter, "smacof start finished");
        if best.as_ref().map_or(true, |b| stress < b.stress) {
            best = Some(Embedding { coords, stress, n_iter });
        }
    }
    best.ok_or_else(|| ToricError::invalid_parameter("n_init", "no starts were run"))
}

/// Embed a distance matrix in `dim` dimensions using SMACOF with default
/// settings (four random starts, seed 0).
///
/// Returns a `k × dim` matrix of coordinates.
pub fn mds_embedding(dist: &na::DMatrix<f64>, dim: usize)
    -> ToricResult<na::DMatrix<f64>>
{
    let config = MdsConfig { dim, ..MdsConfig::default() };
    Ok(smacof(dist, &config)?.coords)
}
