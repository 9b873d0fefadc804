//! Solve inverse kinematics for a 4-link arm with differential evolution.
//!
//! Writes the target plus one line of joint positions per generation so the
//! run can be animated by an external plotting script, and optionally a
//! per-generation convergence CSV and a JSON summary.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::info;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use ik_de::{
    distance_fitness, DhParameters, EvolutionRecorder, Evolver, EvolverConfigBuilder, Manipulator,
    Vector3,
};

#[derive(Parser)]
#[command(name = "solve_arm")]
#[command(about = "Solve inverse kinematics for a chained-link arm with differential evolution")]
struct Args {
    /// Target end-effector position as `x,y,z`; random in [-0.2, 0.2]^3 when omitted
    #[arg(short, long, value_parser = parse_target)]
    target: Option<Vector3>,

    /// Output file with the target and per-generation joint positions
    #[arg(short, long, default_value = "example_output.txt")]
    output: PathBuf,

    /// Directory for the per-generation convergence CSV
    #[arg(long)]
    records_dir: Option<String>,

    /// Optional JSON summary of the run
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Random seed for the engine and the random target
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of agents in the population
    #[arg(long, default_value = "15")]
    population_size: usize,

    /// Crossover rate in [0, 1]
    #[arg(long, default_value = "0.5")]
    crossover_rate: f64,

    /// Differential weighting factor
    #[arg(long, default_value = "0.5")]
    weighting_factor: f64,

    /// Generation budget (0 disables)
    #[arg(long, default_value = "2000")]
    max_generations: usize,

    /// Stop once the best fitness is at or below this (negative disables)
    #[arg(long, default_value = "0.0")]
    target_fitness: f64,

    /// Consecutive stalled generations before stopping (0 disables)
    #[arg(long, default_value = "50")]
    stall_period: usize,

    /// Relative improvement below which a generation counts as stalled, in [0, 1]
    #[arg(long, default_value = "0.1")]
    stall_factor: f64,
}

#[derive(Serialize)]
struct RunSummary {
    target: Vector3,
    best_thetas: Vec<f64>,
    best_position: Vector3,
    best_fitness: f64,
    generations: usize,
    termination: String,
}

/// The demo arm: a vertical shoulder link and three in-plane links.
/// Everything it can reach stays within roughly 0.41 of the base.
fn build_arm() -> Manipulator {
    let mut arm = Manipulator::new(Vector3::new(0.0, 0.0, 0.0));
    arm.add_link(DhParameters { theta: 0.0, d: 0.03, r: 0.0, alpha: PI / 2.0 }, (0.0, PI));
    arm.add_link(DhParameters { theta: 0.0, d: 0.0, r: 0.1, alpha: 0.0 }, (0.0, PI));
    arm.add_link(DhParameters { theta: 0.0, d: 0.0, r: 0.1, alpha: 0.0 }, (-PI, 0.0));
    arm.add_link(
        DhParameters { theta: 0.0, d: 0.0, r: 0.18, alpha: 0.0 },
        (-PI / 2.0, PI / 2.0),
    );
    arm
}

fn parse_target(s: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected `x,y,z`, got `{s}`"));
    }
    let coord = |p: &str| {
        p.trim().parse::<f64>().map_err(|e| format!("invalid coordinate `{p}`: {e}"))
    };
    Ok(Vector3::new(coord(parts[0])?, coord(parts[1])?, coord(parts[2])?))
}

fn format_agent(agent: &Array1<f64>) -> String {
    let items: Vec<String> = agent.iter().map(|v| format!("{v:.5}")).collect();
    format!("[{}]", items.join(", "))
}

/// First line: the target. Then one line per generation with the best
/// agent's joint positions, tab-separated, each formatted as `x,y,z`.
fn write_link_positions(
    path: &Path,
    target: Vector3,
    generations: &[Vec<Vector3>],
) -> std::io::Result<()> {
    let mut lines = Vec::with_capacity(generations.len() + 1);
    lines.push(target.to_string());
    for positions in generations {
        let cells: Vec<String> = positions.iter().map(|p| p.to_string()).collect();
        lines.push(cells.join("\t"));
    }
    fs::write(path, lines.join("\n"))
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let arm = build_arm();

    let target = match args.target {
        Some(t) => t,
        None => {
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => {
                    let mut thread_rng = rand::rng();
                    StdRng::from_rng(&mut thread_rng)
                }
            };
            Vector3::random_in(-0.2, 0.2, &mut rng)
        }
    };
    info!("target: {target}");

    let mut builder = EvolverConfigBuilder::new()
        .population_size(args.population_size)
        .crossover_rate(args.crossover_rate)
        .weighting_factor(args.weighting_factor)
        .max_generations(args.max_generations)
        .target_fitness(args.target_fitness)
        .stall_period(args.stall_period)
        .stall_factor(args.stall_factor);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let bounds = arm.theta_bounds();
    let mut evolver =
        Evolver::new(distance_fitness(arm.clone(), target), &bounds, arm.len(), builder.build())?;
    evolver.initialize();

    let mut recorder = EvolutionRecorder::new("solve_arm");
    let mut best_positions_per_generation: Vec<Vec<Vector3>> = Vec::new();
    let mut posed = arm.clone();

    while evolver.should_continue() {
        evolver.evolve_one_generation()?;
        let Some(best) = evolver.best_agent() else { continue };
        posed.set_thetas(best);
        best_positions_per_generation.push(posed.link_positions());
        recorder.record(evolver.generation(), best, evolver.best_fitness());
        info!("--- generation {} ---", evolver.generation());
        info!("best agent: {}", format_agent(best));
        info!("position: {}", posed.effector_position());
        info!("fitness: {:.3}", evolver.best_fitness());
    }

    write_link_positions(&args.output, target, &best_positions_per_generation)?;
    info!("joint positions written to {}", args.output.display());

    if let Some(dir) = &args.records_dir {
        let csv_path = recorder.save_to_csv(dir)?;
        info!("convergence records written to {}", csv_path.display());
    }

    if let Some(path) = &args.summary {
        let best = evolver
            .best_agent()
            .cloned()
            .unwrap_or_else(|| Array1::zeros(arm.len()));
        posed.set_thetas(&best);
        let summary = RunSummary {
            target,
            best_thetas: best.to_vec(),
            best_position: posed.effector_position(),
            best_fitness: evolver.best_fitness(),
            generations: evolver.generation(),
            termination: evolver.termination().map(|t| t.to_string()).unwrap_or_default(),
        };
        fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!("summary written to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("solve_arm: {err}");
            ExitCode::FAILURE
        }
    }
}
