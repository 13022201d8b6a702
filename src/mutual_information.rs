use itertools::Itertools;
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use toric_page::{
    analysis::{ DistancePolicy, MdsConfig },
    lattice::Lattice,
    page::EntanglementGeometry,
    sim::{ Backend, StateSimulator },
    ToricResult,
};
use tracing_subscriber::EnvFilter;

const LX: usize = 2; // lattice width
const LY: usize = 2; // lattice height

// qubits of each star, one subsystem per vertex
fn star_subsystems(lattice: &Lattice) -> Vec<Vec<usize>> {
    let (lx, ly) = lattice.dims();
    (0..ly).cartesian_product(0..lx)
        .map(|(y, x)| {
            lattice.star_edges(x, y).into_iter().sorted_unstable().dedup().collect()
        })
        .collect()
}

fn geometry_at(lattice: &Lattice, time: f64) -> ToricResult<EntanglementGeometry> {
    let mut sim = StateSimulator::new(lattice.num_qubits())?;
    sim.evolve(&lattice.hamiltonian(false), time)?;
    EntanglementGeometry::analyze(
        &sim,
        &star_subsystems(lattice),
        &DistancePolicy::default(),
        &MdsConfig::default(),
    )
}

fn main() -> ToricResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    const TIMES: [f64; 4] = [0.1, 0.25, 0.5, 1.0];

    let lattice = Lattice::new(LX, LY)?;
    let geoms: Vec<EntanglementGeometry>
        = TIMES.into_par_iter()
        .map(|t| geometry_at(&lattice, t))
        .collect::<ToricResult<_>>()?;

    for (t, geom) in TIMES.iter().zip(&geoms) {
        println!("t = {:.3}", t);
        println!("mutual information:{:.6}", geom.mutual_information);
        println!("distance:{:.6}", geom.distance);
        println!(
            "embedding (stress = {:.3e}):{:.6}",
            geom.embedding.stress,
            geom.embedding.coords,
        );
    }
    Ok(())
}
