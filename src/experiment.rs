//! Repeated-trial stability experiment.
//!
//! For each run a fresh grid dataset is generated with the run index as
//! seed, then clustered once per candidate restart count with that same
//! seed. The resulting inertia values fill an `n_init × n_runs` matrix.

use crate::config::ExperimentConfig;
use crate::dataset;
use crate::error::KMeansError;
use crate::init::InitStrategy;
use crate::kmeans::FastKMeans;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use tracing::info;

/// Inertia of every (restart count, run) cell of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct InertiaMatrix {
    n_init_range: Vec<usize>,
    values: Array2<f64>,
}

impl InertiaMatrix {
    /// Pre-sized `n_init_range.len() × n_runs` matrix with every cell unset.
    pub fn new(n_init_range: Vec<usize>, n_runs: usize) -> Self {
        let values = Array2::from_elem((n_init_range.len(), n_runs), f64::NAN);
        Self {
            n_init_range,
            values,
        }
    }

    /// Wrap an already-filled matrix; rows must line up with `n_init_range`.
    pub fn from_values(n_init_range: Vec<usize>, values: Array2<f64>) -> Result<Self, KMeansError> {
        if values.nrows() != n_init_range.len() {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected {} rows (one per n_init), got {}",
                n_init_range.len(),
                values.nrows()
            )));
        }
        Ok(Self {
            n_init_range,
            values,
        })
    }

    pub fn set(&mut self, n_init_idx: usize, run_id: usize, inertia: f64) {
        self.values[[n_init_idx, run_id]] = inertia;
    }

    pub fn get(&self, n_init_idx: usize, run_id: usize) -> f64 {
        self.values[[n_init_idx, run_id]]
    }

    /// (restart counts, runs)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn n_init_range(&self) -> &[usize] {
        &self.n_init_range
    }

    pub fn n_runs(&self) -> usize {
        self.values.ncols()
    }

    /// Inertia across runs for the `n_init_idx`-th restart count.
    pub fn row(&self, n_init_idx: usize) -> ArrayView1<'_, f64> {
        self.values.index_axis(Axis(0), n_init_idx)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// First cell that was never written, as (row, col).
    pub fn first_unset(&self) -> Option<(usize, usize)> {
        self.values
            .indexed_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(idx, _)| idx)
    }

    pub fn is_complete(&self) -> bool {
        self.first_unset().is_none()
    }
}

/// Outcome of one strategy's experiment
#[derive(Debug, Clone)]
pub struct Experiment {
    pub init: InitStrategy,
    pub inertia: InertiaMatrix,
}

/// Run the experiment for one initialization strategy.
///
/// # Errors
///
/// Fails on an invalid configuration, and otherwise returns the first error
/// raised by the estimator unchanged. No partial matrix is returned.
pub fn run_experiment(
    init: InitStrategy,
    config: &ExperimentConfig,
) -> Result<InertiaMatrix, KMeansError> {
    config.validate()?;

    info!(%init, n_runs = config.n_runs, "Evaluation of batch k-means with {} init", init);

    let mut inertia = InertiaMatrix::new(config.n_init_range.clone(), config.n_runs);

    for run_id in 0..config.n_runs {
        let seed = run_id as u64;
        let data = dataset::generate(seed, config.n_samples_per_center, config.grid_size);

        for (i, &n_init) in config.n_init_range.iter().enumerate() {
            let mut kmeans = FastKMeans::with_config(config.kmeans_config(init, n_init, seed));
            kmeans.fit(&data.points.view())?;
            let value = kmeans.inertia().ok_or(KMeansError::NotFitted)?;

            inertia.set(i, run_id, value);
            info!(
                %init,
                n_init,
                run_id,
                inertia = value,
                "Inertia for n_init={:02}, run_id={}: {:.3}",
                n_init,
                run_id,
                value
            );
        }
    }

    Ok(inertia)
}

/// Like [`run_experiment`], with the strategy given by name.
///
/// An unknown name fails before any dataset is generated.
pub fn run_named_experiment(
    init: &str,
    config: &ExperimentConfig,
) -> Result<InertiaMatrix, KMeansError> {
    let init: InitStrategy = init.parse()?;
    run_experiment(init, config)
}

/// Run the experiment once per strategy, in the given order.
pub fn run_experiments(
    strategies: &[InitStrategy],
    config: &ExperimentConfig,
) -> Result<Vec<Experiment>, KMeansError> {
    strategies
        .iter()
        .map(|&init| {
            run_experiment(init, config).map(|inertia| Experiment { init, inertia })
        })
        .collect()
}
