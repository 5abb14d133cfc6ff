use crate::error::KMeansError;
use crate::init::InitStrategy;

/// Configuration for the k-means estimator
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Centroid seeding strategy
    pub init: InitStrategy,

    /// Number of restarts; the restart with the lowest inertia is kept
    pub n_init: usize,

    /// Maximum number of Lloyd iterations per restart
    pub max_iters: usize,

    /// Convergence tolerance. When centroid shift is below this threshold,
    /// the algorithm stops early. Set to negative value to disable early stopping.
    pub tol: f64,

    /// Random seed for centroid initialization
    pub seed: u64,

    /// Chunk size for data processing. Larger values use more memory but may be faster.
    pub chunk_size_data: usize,

    /// Chunk size for centroid processing. Larger values use more memory but may be faster.
    pub chunk_size_centroids: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            init: InitStrategy::KMeansPlusPlus,
            n_init: 1,
            max_iters: 300,
            tol: 1e-4,
            seed: 0,
            chunk_size_data: 51_200,
            chunk_size_centroids: 10_240,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the centroid seeding strategy
    pub fn with_init(mut self, init: InitStrategy) -> Self {
        self.init = init;
        self
    }

    /// Set the number of restarts
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the data chunk size
    pub fn with_chunk_size_data(mut self, chunk_size: usize) -> Self {
        self.chunk_size_data = chunk_size;
        self
    }

    /// Set the centroid chunk size
    pub fn with_chunk_size_centroids(mut self, chunk_size: usize) -> Self {
        self.chunk_size_centroids = chunk_size;
        self
    }
}

/// Parameters of one stability experiment.
///
/// Every run generates its own grid dataset and clusters it once per entry
/// of `n_init_range`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Independent runs (fresh dataset + seed) per restart count
    pub n_runs: usize,

    /// Candidate restart counts, in plotting order
    pub n_init_range: Vec<usize>,

    /// Points drawn around each grid centre
    pub n_samples_per_center: usize,

    /// Side of the centre grid; the dataset has `grid_size²` true clusters
    pub grid_size: usize,

    /// Lloyd iteration cap handed to the estimator
    pub max_iters: usize,

    /// Convergence tolerance handed to the estimator
    pub tol: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            n_runs: 5,
            n_init_range: vec![1, 5, 10, 15],
            n_samples_per_center: 100,
            grid_size: 3,
            max_iters: 300,
            tol: 1e-4,
        }
    }
}

impl ExperimentConfig {
    /// Set the number of independent runs
    pub fn with_n_runs(mut self, n_runs: usize) -> Self {
        self.n_runs = n_runs;
        self
    }

    /// Set the candidate restart counts
    pub fn with_n_init_range(mut self, n_init_range: Vec<usize>) -> Self {
        self.n_init_range = n_init_range;
        self
    }

    /// Set the number of points per grid centre
    pub fn with_n_samples_per_center(mut self, n_samples_per_center: usize) -> Self {
        self.n_samples_per_center = n_samples_per_center;
        self
    }

    /// Set the side of the centre grid
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the iteration cap handed to the estimator
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance handed to the estimator
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Number of true clusters, which is also the `k` requested from k-means.
    pub fn n_clusters(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Points per generated dataset.
    pub fn n_samples(&self) -> usize {
        self.n_samples_per_center * self.n_clusters()
    }

    /// Estimator configuration for one cell of the experiment.
    pub fn kmeans_config(&self, init: InitStrategy, n_init: usize, seed: u64) -> KMeansConfig {
        KMeansConfig::new(self.n_clusters())
            .with_init(init)
            .with_n_init(n_init)
            .with_seed(seed)
            .with_max_iters(self.max_iters)
            .with_tol(self.tol)
    }

    /// Reject shapes that would leave the inertia matrix empty.
    pub fn validate(&self) -> Result<(), KMeansError> {
        if self.n_runs == 0 {
            return Err(KMeansError::InvalidParameter(
                "n_runs must be greater than 0".to_string(),
            ));
        }
        if self.n_init_range.is_empty() {
            return Err(KMeansError::InvalidParameter(
                "n_init_range must not be empty".to_string(),
            ));
        }
        if self.n_init_range.contains(&0) {
            return Err(KMeansError::InvalidParameter(
                "n_init_range entries must be greater than 0".to_string(),
            ));
        }
        if self.grid_size == 0 || self.n_samples_per_center == 0 {
            return Err(KMeansError::InvalidParameter(format!(
                "grid_size ({}) and n_samples_per_center ({}) must be greater than 0",
                self.grid_size, self.n_samples_per_center
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_experiment() {
        let config = ExperimentConfig::default();
        assert_eq!(config.n_runs, 5);
        assert_eq!(config.n_init_range, vec![1, 5, 10, 15]);
        assert_eq!(config.n_clusters(), 9);
        assert_eq!(config.n_samples(), 900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_kmeans_config_from_experiment() {
        let config = ExperimentConfig::default().with_grid_size(4).with_max_iters(50);
        let km = config.kmeans_config(InitStrategy::Random, 10, 3);

        assert_eq!(km.k, 16);
        assert_eq!(km.init, InitStrategy::Random);
        assert_eq!(km.n_init, 10);
        assert_eq!(km.seed, 3);
        assert_eq!(km.max_iters, 50);
    }

    #[test]
    fn test_validate_rejects_empty_shapes() {
        let zero_runs = ExperimentConfig::default().with_n_runs(0);
        assert!(matches!(zero_runs.validate(), Err(KMeansError::InvalidParameter(_))));

        let no_range = ExperimentConfig::default().with_n_init_range(vec![]);
        assert!(matches!(no_range.validate(), Err(KMeansError::InvalidParameter(_))));

        let zero_restarts = ExperimentConfig::default().with_n_init_range(vec![1, 0]);
        assert!(matches!(zero_restarts.validate(), Err(KMeansError::InvalidParameter(_))));

        let zero_grid = ExperimentConfig::default().with_grid_size(0);
        assert!(zero_grid.validate().is_err());
    }
}
