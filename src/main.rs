use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parallel_perf_plots::{
    load_config, render_report_charts, ChartConfig, MeasurementTable, MetricsReport,
    PlottersRenderer, Result,
};

/// Render latency, speedup, efficiency and scalability charts from a CSV of
/// timings indexed by worker count.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// CSV file with an `nw` column and an `Ideal` column holding the sequential time at nw = 0
    filename: PathBuf,
    /// Existing directory the PNG charts are written into
    plots_directory: PathBuf,
    /// TOML file with chart presentation settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ChartConfig::default(),
    };

    let (t_seq, table) = MeasurementTable::from_path(&args.filename)?.split_baseline()?;
    let report = MetricsReport::compute(&table, t_seq)?;

    let renderer = PlottersRenderer::new(config);
    let written = render_report_charts(&report, &args.plots_directory, &renderer)?;

    println!("===========================================");
    println!("Parallel performance report: {}", args.filename.display());
    println!("===========================================");
    println!("{}", report);
    println!("===========================================");
    println!("Charts written: {}", written.len());
    for path in &written {
        println!("- {}", path.display());
    }
    Ok(())
}
