use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use toric_page::{
    page::{ run_page_curve, BackendKind, EntropyCut, ExperimentConfig, PageCurve },
    sim::SimConfig,
    ToricResult,
};
use tracing_subscriber::EnvFilter;

const LX: usize = 2; // lattice width
const LY: usize = 2; // lattice height

fn main() -> ToricResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    const STEPS: usize = 40;
    const DT: f64 = 0.1;

    let base = ExperimentConfig {
        lx: LX,
        ly: LY,
        steps: STEPS,
        dt: DT,
        hole: false,
        subsystem: EntropyCut::Half,
        backend: BackendKind::Sparse,
        sim: SimConfig::default(),
    };

    // with and without the missing plaquette
    let curves: Vec<PageCurve>
        = [false, true].into_par_iter()
        .map(|hole| run_page_curve(&ExperimentConfig { hole, ..base.clone() }))
        .collect::<ToricResult<_>>()?;

    println!("{:>8} {:>12} {:>12}", "time", "S", "S (hole)");
    curves[0].iter().zip(curves[1].iter())
        .for_each(|((t, s), (_, s_hole))| {
            println!("{:8.3} {:12.8} {:12.8}", t, s, s_hole);
        });
    if let Some((t, s)) = curves[0].peak() {
        println!("peak: S = {:.8} at t = {:.3}", s, t);
    }
    Ok(())
}
