//! Empirical evaluation of the impact of k-means initialization.
//!
//! Runs the stability experiment for each requested initialization strategy,
//! prints the mean/std inertia table and writes the error-bar chart.
//!
//! Usage: `kmeans-stability [--runs 5] [--n-init 1,5,10,15] [--output inertia.png]`

use clap::Parser;
use kmeans_stability::report::{
    plot_cluster_assignment, plot_inertia_errorbars, summarize, write_inertia_npy,
};
use kmeans_stability::{
    generate, run_experiments, ExperimentConfig, FastKMeans, InitStrategy, KMeansConfig,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Evaluate k-means initialization strategies by the spread of inertia across runs.
#[derive(Parser, Debug)]
#[command(name = "kmeans-stability")]
#[command(about = "Mean and std deviation of k-means inertia for various init strategies")]
struct Args {
    /// Runs (fresh dataset + seed) per restart count.
    #[arg(long, default_value = "5")]
    runs: usize,

    /// Candidate restart counts.
    #[arg(long = "n-init", value_delimiter = ',', default_value = "1,5,10,15")]
    n_init: Vec<usize>,

    /// Points drawn around each grid centre.
    #[arg(long, default_value = "100")]
    samples_per_center: usize,

    /// Side of the centre grid.
    #[arg(long, default_value = "3")]
    grid_size: usize,

    /// Initialization strategies to compare.
    #[arg(long, value_delimiter = ',', default_value = "k-means++,random")]
    init: Vec<InitStrategy>,

    /// Error-bar chart path (.svg for SVG, otherwise PNG).
    #[arg(long, default_value = "inertia.png")]
    output: PathBuf,

    /// Also draw one single-init random clustering of a fresh dataset.
    #[arg(long)]
    scatter: Option<PathBuf>,

    /// Directory for `inertia_<init>.npy` matrices.
    #[arg(long)]
    npy_dir: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ExperimentConfig::default()
        .with_n_runs(args.runs)
        .with_n_init_range(args.n_init.clone())
        .with_n_samples_per_center(args.samples_per_center)
        .with_grid_size(args.grid_size);

    info!(
        n_runs = config.n_runs,
        n_init_range = ?config.n_init_range,
        n_samples = config.n_samples(),
        n_clusters = config.n_clusters(),
        "starting stability experiment"
    );

    let experiments = run_experiments(&args.init, &config)?;
    let summaries = summarize(&experiments)?;

    println!();
    println!("{:<28} {:>6} {:>12} {:>12} {:>9}", "strategy", "n_init", "mean", "std", "rel_std");
    for (label, summary) in &summaries {
        let relative = summary.relative_std();
        for (i, n_init) in summary.n_init.iter().enumerate() {
            println!(
                "{:<28} {:>6} {:>12.3} {:>12.3} {:>9.4}",
                label, n_init, summary.mean[i], summary.std[i], relative[i]
            );
        }
    }
    println!();

    plot_inertia_errorbars(&args.output, &summaries)?;
    println!("Chart written to {}", args.output.display());

    if let Some(dir) = &args.npy_dir {
        for path in write_inertia_npy(dir, &experiments)? {
            println!("Inertia matrix written to {}", path.display());
        }
    }

    if let Some(path) = &args.scatter {
        let data = generate(0, config.n_samples_per_center, config.grid_size);
        let km_config = KMeansConfig::new(config.n_clusters())
            .with_init(InitStrategy::Random)
            .with_n_init(1)
            .with_seed(0)
            .with_max_iters(100);

        let mut kmeans = FastKMeans::with_config(km_config);
        kmeans.fit(&data.points.view())?;

        let centroids = kmeans.centroids().ok_or("No centroids after training")?;
        let labels = kmeans.labels().ok_or("No labels after training")?;
        plot_cluster_assignment(path, &data.points.view(), labels, &centroids.view())?;
        println!("Cluster scatter written to {}", path.display());
    }

    Ok(())
}
