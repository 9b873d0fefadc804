//! Convenience wrapper running a full evolution with per-generation
//! recording.

use std::path::PathBuf;

use log::info;
use ndarray::Array1;

use crate::recorder::EvolutionRecorder;
use crate::{Evolver, EvolverConfig, Termination};

/// Outcome of a completed evolution run.
#[derive(Debug, Clone)]
pub struct EvolveReport {
    /// Best agent found.
    pub x: Array1<f64>,
    /// Its fitness.
    pub fun: f64,
    /// Number of generations run.
    pub nit: usize,
    /// Which criterion stopped the run.
    pub termination: Termination,
}

/// Initialize, evolve until a termination criterion fires, record every
/// generation, and save the recording to `<out_dir>/<name>.csv`.
pub fn run_recorded_evolution<F>(
    name: &str,
    fitness: F,
    bounds: &[(f64, f64)],
    dim: usize,
    config: EvolverConfig,
    out_dir: &str,
) -> Result<(EvolveReport, PathBuf), Box<dyn std::error::Error>>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let mut evolver = Evolver::new(fitness, bounds, dim, config)?;
    evolver.initialize();

    let mut recorder = EvolutionRecorder::new(name);
    let termination = loop {
        if let Some(reason) = evolver.termination() {
            info!("evolution finished: {reason}");
            break reason;
        }
        evolver.evolve_one_generation()?;
        if let Some(best) = evolver.best_agent() {
            recorder.record(evolver.generation(), best, evolver.best_fitness());
        }
    };
    let csv_path = recorder.save_to_csv(out_dir)?;

    let x = evolver
        .best_agent()
        .cloned()
        .unwrap_or_else(|| Array1::zeros(evolver.search_space().dim()));
    let report =
        EvolveReport { x, fun: evolver.best_fitness(), nit: evolver.generation(), termination };
    Ok((report, csv_path))
}
