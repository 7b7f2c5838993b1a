//! dispgrid CLI - interpolate measured displacements onto a regular grid

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use dispgrid_algorithms::interpolation::{
    interpolate_displacements, resolve_node, DisplacementGridParams, InterpolationRun,
    ResolveParams,
};
use dispgrid_core::{
    prepare_samples, Grid, GridExtent, GridStatistics, InterpolationConfig, LogEntry, RunSummary,
    SamplePoint,
};

/// Postfix inserted before the extension of the default report path
const OUTPUT_POSTFIX: &str = "_CALC_";

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "dispgrid")]
#[command(author, version, about = "Interpolate measured displacements onto a regular grid", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every dataset of a sample file and write a JSON report
    Run {
        /// Input JSON: { "datasets": { "<name>": [[x, z, u], ...] } }
        input: PathBuf,
        /// Output report (default: input path with the _CALC_ postfix)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration JSON (step table, radii, tolerances)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Section length (default: derived from the samples)
        #[arg(long, requires = "depth")]
        length: Option<f64>,
        /// Section depth (default: deepest sample)
        #[arg(long, requires = "length", allow_hyphen_values = true)]
        depth: Option<f64>,
    },
    /// Show the grid that a length and depth produce
    Grid {
        #[arg(long)]
        length: f64,
        #[arg(long, allow_hyphen_values = true)]
        depth: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Resolve a single location and print its operation log
    Probe {
        /// Input JSON sample file
        input: PathBuf,
        /// Dataset name inside the input file
        #[arg(short, long)]
        dataset: String,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        z: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    DefaultConfig,
}

// ─── Input / report documents ───────────────────────────────────────────

#[derive(Deserialize)]
struct SampleDocument {
    datasets: BTreeMap<String, Vec<[f64; 3]>>,
}

#[derive(Serialize)]
struct NodeReport<'a> {
    row: usize,
    col: usize,
    x: f64,
    z: f64,
    displacement: Option<f64>,
    error: Option<String>,
    log: &'a [LogEntry],
}

#[derive(Serialize)]
struct DatasetReport<'a> {
    length: f64,
    depth: f64,
    step_x: f64,
    step_z: f64,
    grid_x: &'a [f64],
    grid_z: &'a [f64],
    summary: RunSummary,
    statistics: GridStatistics,
    nodes: Vec<NodeReport<'a>>,
}

impl<'a> DatasetReport<'a> {
    fn new(run: &'a InterpolationRun) -> Self {
        let grid = &run.grid;

        let nodes = grid
            .iter()
            .map(|((row, col), node)| {
                let log = &grid.logs()[(row, col)];
                NodeReport {
                    row,
                    col,
                    x: node.x,
                    z: node.z,
                    displacement: node.displacement,
                    error: log.failure().map(|e| e.to_string()),
                    log: log.entries(),
                }
            })
            .collect();

        Self {
            length: grid.extent().length,
            depth: grid.extent().depth,
            step_x: grid.step_x(),
            step_z: grid.step_z(),
            grid_x: grid.xs(),
            grid_z: grid.zs(),
            summary: run.summary,
            statistics: grid.statistics(),
            nodes,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: Option<&Path>) -> Result<InterpolationConfig> {
    match path {
        Some(path) => InterpolationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(InterpolationConfig::default()),
    }
}

fn load_samples(path: &Path) -> Result<SampleDocument> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let doc: SampleDocument = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    if doc.datasets.is_empty() {
        anyhow::bail!("No datasets in {}", path.display());
    }
    Ok(doc)
}

fn to_samples(rows: &[[f64; 3]]) -> Vec<SamplePoint> {
    rows.iter().copied().map(SamplePoint::from).collect()
}

/// `data/100x60x30.json` → `data/100x60x30_CALC_.json`
fn output_path(input: &Path, postfix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, postfix, ext.to_string_lossy()),
        None => format!("{}{}", stem, postfix),
    };
    input.with_file_name(name)
}

fn write_report(reports: &BTreeMap<&str, DatasetReport<'_>>, path: &Path) -> Result<()> {
    let pb = spinner("Writing report...");
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), reports).context("Failed to write report")?;
    pb.finish_and_clear();
    Ok(())
}

fn print_log(entries: &[LogEntry]) {
    for entry in entries {
        println!("  {}", entry.case);
        for p in &entry.points {
            println!("    x: {:.4}, z: {:.4}, u: {:.6}", p.x, p.z, p.displacement);
        }
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            output,
            config,
            length,
            depth,
        } => {
            let config = load_config(config.as_deref())?;
            let doc = load_samples(&input)?;
            let output = output.unwrap_or_else(|| output_path(&input, OUTPUT_POSTFIX));
            let extent = length.zip(depth).map(|(l, d)| GridExtent::new(l, d));

            let start = Instant::now();
            let mut runs: Vec<(&str, InterpolationRun)> = Vec::new();
            for (name, rows) in &doc.datasets {
                let pb = spinner(&format!("Resolving dataset '{}'...", name));
                let params = DisplacementGridParams {
                    config: config.clone(),
                    extent,
                };
                let run = interpolate_displacements(to_samples(rows), params)
                    .with_context(|| format!("Failed to resolve dataset '{}'", name))?;
                pb.finish_and_clear();

                info!("{}\tSheet: {}\t{}", input.display(), name, run.summary);
                if run.summary.resolved == 0 {
                    warn!("Dataset '{}': no node could be resolved", name);
                }
                runs.push((name.as_str(), run));
            }
            let elapsed = start.elapsed();

            let reports: BTreeMap<&str, DatasetReport<'_>> = runs
                .iter()
                .map(|(name, run)| (*name, DatasetReport::new(run)))
                .collect();
            write_report(&reports, &output)?;

            println!("Report saved to: {}", output.display());
            println!("  Processing time: {:.2?}", elapsed);
        }

        Commands::Grid {
            length,
            depth,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let grid = Grid::build(length, depth, &config).context("Failed to build grid")?;
            let (rows, cols) = grid.shape();

            println!("Dimensions: {} x {} ({} nodes)", cols, rows, grid.len());
            println!("Step x: {}", grid.step_x());
            println!("Step z: {}", grid.step_z());
            if let (Some(first), Some(last)) = (grid.xs().first(), grid.xs().last()) {
                println!("x: {} .. {}", first, last);
            }
            if let (Some(first), Some(last)) = (grid.zs().first(), grid.zs().last()) {
                println!("z: {} .. {}", first, last);
            }
        }

        Commands::Probe {
            input,
            dataset,
            x,
            z,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let doc = load_samples(&input)?;
            let rows = doc
                .datasets
                .get(&dataset)
                .with_context(|| format!("Dataset '{}' not found in {}", dataset, input.display()))?;

            let samples = prepare_samples(to_samples(rows))?;
            let extent = GridExtent::from_samples(&samples)?;
            let grid = Grid::from_extent(extent, &config).context("Failed to build grid")?;
            let params = ResolveParams::for_grid(&grid, &config);

            let outcome = resolve_node((x, z), &samples, &params);
            println!("Node ({}, {})", x, z);
            print_log(&outcome.log);
            match outcome.displacement {
                Ok(u) => println!("Displacement: {:.6}", u),
                Err(e) => println!("Unresolved: {}", e),
            }
        }

        Commands::DefaultConfig => {
            println!("{}", InterpolationConfig::default().to_json_string()?);
        }
    }

    Ok(())
}
