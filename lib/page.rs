//! Drivers for Page-curve experiments on the toric-code lattice.
//!
//! An experiment builds the star and plaquette terms of a periodic lattice,
//! optionally removes one plaquette to make a hole, and then repeatedly
//! evolves a state vector under the sum of all terms with a fixed time step,
//! recording the entanglement entropy of a chosen subsystem after every step.

use nalgebra as na;
use num_complex::Complex64 as C64;
use tracing::{ debug, info };
use crate::{
    analysis::{
        self,
        DistancePolicy,
        Embedding,
        MdsConfig,
    },
    entropy::{ self, EntropySource },
    error::{ ToricError, ToricResult },
    lattice::Lattice,
    sim::{ Backend, DenseSimulator, SimConfig, StateSimulator },
    stabilizer::Stabilizer,
};

/// Choice of simulator implementation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// [`StateSimulator`].
    #[default]
    Sparse,
    /// [`DenseSimulator`].
    Dense,
}

/// Subsystem whose entropy is tracked over the course of an experiment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EntropyCut {
    /// The first ⌊*n*/2⌋ qubits.
    #[default]
    Half,
    /// The first `k` qubits.
    Left(usize),
    /// An arbitrary set of qubits.
    Qubits(Vec<usize>),
}

impl EntropyCut {
    /// Resolve to a list of qubit indices for a register of `n` qubits.
    pub fn qubits(&self, n: usize) -> ToricResult<Vec<usize>> {
        let qubits: Vec<usize>
            = match self {
                Self::Half => (0..n / 2).collect(),
                Self::Left(k) if *k > n
                    => { return Err(ToricError::QubitOutOfRange { index: *k - 1, n }); },
                Self::Left(k) => (0..*k).collect(),
                Self::Qubits(q) => q.clone(),
            };
        entropy::validate_subsystem(n, &qubits)?;
        Ok(qubits)
    }
}

/// Parameters of a Page-curve run.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    /// Lattice width.
    pub lx: usize,
    /// Lattice height.
    pub ly: usize,
    /// Number of evolution steps.
    pub steps: usize,
    /// Time increment per step.
    pub dt: f64,
    /// Remove the middle plaquette before evolving.
    pub hole: bool,
    /// Subsystem whose entropy is recorded.
    pub subsystem: EntropyCut,
    /// Simulator implementation.
    pub backend: BackendKind,
    /// Simulator settings.
    pub sim: SimConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            lx: 2,
            ly: 2,
            steps: 1,
            dt: 0.1,
            hole: false,
            subsystem: EntropyCut::Half,
            backend: BackendKind::Sparse,
            sim: SimConfig::default(),
        }
    }
}

/// Entropy of a subsystem recorded after each evolution step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageCurve {
    /// Total evolution time after each step.
    pub time: Vec<f64>,
    /// Entropy (in bits) after each step.
    pub entropy: Vec<f64>,
}

impl PageCurve {
    /// Return the number of recorded points.
    pub fn len(&self) -> usize { self.time.len() }

    /// Return `true` if no points were recorded.
    pub fn is_empty(&self) -> bool { self.time.is_empty() }

    /// Iterate over `(time, entropy)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.entropy.iter().copied())
    }

    /// Return the point of largest entropy, if any.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter().max_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}

/// Evolve an existing simulator `steps` times under `terms`, recording the
/// entropy of `subsystem` after each step.
///
/// Recorded times are measured from the simulator's state on entry. The
/// propagator for `dt` is built once and applied at every step.
pub fn page_curve<B>(
    sim: &mut B,
    terms: &[Stabilizer],
    subsystem: &[usize],
    steps: usize,
    dt: f64,
) -> ToricResult<PageCurve>
where B: Backend
{
    if !dt.is_finite() {
        return Err(ToricError::invalid_parameter("dt", "must be finite"));
    }
    entropy::validate_subsystem(sim.num_qubits(), subsystem)?;
    sim.check_terms(terms)?;
    let u: Option<na::DMatrix<C64>>
        = (steps > 0 && dt != 0.0 && !terms.is_empty())
        .then(|| sim.propagator(terms, dt))
        .transpose()?;
    let mut curve = PageCurve {
        time: Vec::with_capacity(steps),
        entropy: Vec::with_capacity(steps),
    };
    for k in 0..steps {
        if let Some(u) = u.as_ref() { sim.apply_propagator(u)?; }
        let t = dt * (k + 1) as f64;
        let s = sim.entropy(subsystem)?;
        debug!(step = k, time = t, entropy = s, "page curve");
        curve.time.push(t);
        curve.entropy.push(s);
    }
    Ok(curve)
}

/// Run a complete Page-curve experiment.
pub fn run_page_curve(config: &ExperimentConfig) -> ToricResult<PageCurve> {
    let lattice = Lattice::new(config.lx, config.ly)?;
    let n = lattice.num_qubits();
    let terms = lattice.hamiltonian(config.hole);
    let subsystem = config.subsystem.qubits(n)?;
    info!(
        lx = config.lx, ly = config.ly, n, terms = terms.len(),
        steps = config.steps, dt = config.dt, hole = config.hole,
        backend = ?config.backend,
        "running page curve",
    );
    match config.backend {
        BackendKind::Sparse => {
            let mut sim = StateSimulator::with_config(n, config.sim)?;
            page_curve(&mut sim, &terms, &subsystem, config.steps, config.dt)
        },
        BackendKind::Dense => {
            let mut sim = DenseSimulator::with_config(n, config.sim)?;
            page_curve(&mut sim, &terms, &subsystem, config.steps, config.dt)
        },
    }
}

/// Mutual information, distances, and an embedding for a set of subsystems.
#[derive(Clone, Debug, PartialEq)]
pub struct EntanglementGeometry {
    /// Symmetric matrix of pairwise mutual information *I*(*A*:*B*), with a
    /// zero diagonal.
    pub mutual_information: na::DMatrix<f64>,
    /// Distances 1/*I* derived from `mutual_information`, with vanishing
    /// information mapped to a finite sentinel.
    pub distance: na::DMatrix<f64>,
    /// Low-dimensional embedding of `distance`.
    pub embedding: Embedding,
}

impl EntanglementGeometry {
    /// Compute the mutual information matrix of `subsystems`, convert it to
    /// distances, and embed them.
    pub fn analyze<S>(
        source: &S,
        subsystems: &[Vec<usize>],
        policy: &DistancePolicy,
        mds: &MdsConfig,
    ) -> ToricResult<Self>
    where S: EntropySource + ?Sized
    {
        let mutual_information
            = analysis::mutual_information_matrix(subsystems, source)?;
        let distance
            = analysis::entanglement_distance(&mutual_information, policy)?;
        let embedding = analysis::smacof(&distance, mds)?;
        Ok(Self { mutual_information, distance, embedding })
    }
}
