//! # kmeans-stability
//!
//! Empirical evaluation of how k-means centroid initialization affects
//! convergence robustness, measured by the spread of the final inertia over
//! repeated runs.
//!
//! ## Pipeline
//!
//! - **Dataset**: a 2D grid of isotropic Gaussian blobs (`grid_size²` true
//!   clusters, noise scale 0.1), generated deterministically from a seed
//! - **Estimator**: k-means with `k-means++` or `random` seeding and
//!   best-of-`n_init` restarts; assignment uses the double-chunked
//!   nearest-centroid search with rayon
//! - **Experiment**: for every run and every candidate restart count, record
//!   the inertia into a pre-sized `n_init × n_runs` matrix
//! - **Report**: per restart count mean and population std, drawn as one
//!   error-bar series per strategy
//!
//! ## Example
//!
//! ```rust
//! use kmeans_stability::{aggregate, run_experiment, ExperimentConfig, InitStrategy};
//!
//! let config = ExperimentConfig::default()
//!     .with_n_runs(2)
//!     .with_n_init_range(vec![1, 3])
//!     .with_n_samples_per_center(20);
//!
//! let inertia = run_experiment(InitStrategy::KMeansPlusPlus, &config).unwrap();
//! assert_eq!(inertia.shape(), (2, 2));
//!
//! let summary = aggregate(&inertia).unwrap();
//! assert_eq!(summary.mean.len(), 2);
//! ```
//!
//! ## BLAS Acceleration
//!
//! Matrix products in the assignment step can use a BLAS backend:
//!
//! ```toml
//! # macOS (uses Apple Accelerate)
//! kmeans-stability = { version = "0.1", features = ["accelerate"] }
//!
//! # Linux/Windows (requires OpenBLAS installed)
//! kmeans-stability = { version = "0.1", features = ["openblas"] }
//! ```

// Link BLAS libraries when features are enabled
#[cfg(feature = "accelerate")]
extern crate accelerate_src;

#[cfg(feature = "openblas")]
extern crate openblas_src;

mod algorithm;
mod config;
pub mod dataset;
mod distance;
mod error;
pub mod experiment;
mod init;
mod kmeans;
pub mod report;

pub use config::{ExperimentConfig, KMeansConfig};
pub use dataset::{generate, generate_with_rng, GridDataset};
pub use error::{KMeansError, ReportError};
pub use experiment::{run_experiment, run_experiments, run_named_experiment, Experiment, InertiaMatrix};
pub use init::InitStrategy;
pub use kmeans::FastKMeans;
pub use report::{aggregate, InertiaSummary};
