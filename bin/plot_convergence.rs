//! Plot best fitness per generation from a recorder CSV as an HTML chart.

use std::path::PathBuf;

use clap::Parser;
use plotly::common::{Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};

#[derive(Parser)]
#[command(name = "plot_convergence")]
#[command(about = "Plot best fitness per generation from an evolution CSV")]
struct Args {
    /// Recorder CSV produced by solve_arm or run_recorded_evolution
    csv: PathBuf,

    /// Output HTML file (defaults to the CSV path with an .html extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plot title
    #[arg(long, default_value = "DE convergence")]
    title: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut reader = csv::Reader::from_path(&args.csv)?;
    let headers = reader.headers()?.clone();
    let fitness_col = headers
        .iter()
        .position(|h| h == "best_fitness")
        .ok_or("missing `best_fitness` column")?;

    let mut generations: Vec<usize> = Vec::new();
    let mut fitness: Vec<f64> = Vec::new();
    for record in reader.records() {
        let record = record?;
        generations.push(record[0].parse()?);
        fitness.push(record[fitness_col].parse()?);
    }
    if generations.is_empty() {
        return Err("CSV contains no data rows".into());
    }

    let trace = Scatter::new(generations, fitness).mode(Mode::Lines).name("best fitness");
    let layout = Layout::new()
        .title(Title::with_text(args.title.as_str()))
        .x_axis(Axis::new().title(Title::with_text("Generation")))
        .y_axis(Axis::new().title(Title::with_text("Best fitness")));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);

    let output = args.output.clone().unwrap_or_else(|| args.csv.with_extension("html"));
    plot.write_html(&output);
    println!("wrote {}", output.display());
    Ok(())
}
