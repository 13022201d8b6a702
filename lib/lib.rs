//! Tools for simulating the time evolution of toric-code stabilizer lattices
//! as full state vectors, and for measuring the entanglement structure of the
//! result.
//!
//! The Hamiltonian of an *L*<sub>*x*</sub> × *L*<sub>*y*</sub> periodic
//! lattice is the sum of its star and plaquette operators, which act on the
//! 2 *L*<sub>*x*</sub> *L*<sub>*y*</sub> edge qubits. Since every quantity is
//! computed from a dense vector of 2<sup>*n*</sup> amplitudes, only small
//! lattices are tractable.
//!
//! - [`pauli`], [`stabilizer`]: Pauli strings in binary tableau form
//! - [`lattice`]: lattice geometry and the star/plaquette generators
//! - [`sim`]: state-vector simulators
//! - [`entropy`]: von Neumann entropy of reduced density matrices
//! - [`analysis`]: mutual information, entanglement distance, and embeddings
//! - [`page`]: Page-curve experiment drivers

pub mod error;
pub mod pauli;
pub mod stabilizer;
pub mod lattice;
pub mod entropy;
pub mod sim;
pub mod analysis;
pub mod page;

pub use error::{ ToricError, ToricResult };
pub use lattice::{ build_stabilizers, codespace_dimension, Lattice };
pub use stabilizer::{ stabilizer_commute, Stabilizer };
pub use entropy::EntropySource;
pub use sim::{ Backend, DenseSimulator, StateSimulator };
pub use analysis::{ entanglement_distance, mds_embedding, mutual_information_matrix };
pub use page::{ run_page_curve, ExperimentConfig, PageCurve };
