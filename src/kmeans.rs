use crate::algorithm::{kmeans_best_of, predict_labels};
use crate::config::KMeansConfig;
use crate::error::KMeansError;
use ndarray::{Array2, ArrayView2};

/// Fitted state kept by the estimator
#[derive(Debug, Clone)]
struct FittedModel {
    centroids: Array2<f32>,
    labels: Vec<usize>,
    inertia: f64,
    n_iterations: usize,
}

/// k-means estimator with selectable seeding and best-of-`n_init` restarts.
///
/// The API follows the scikit-learn shape: `fit()` stores centroids, the
/// training assignments and the inertia of the best restart.
///
/// # Example
///
/// ```
/// use kmeans_stability::{FastKMeans, InitStrategy, KMeansConfig};
/// use ndarray::array;
///
/// let data = array![[0.0f32, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]];
/// let config = KMeansConfig::new(2)
///     .with_init(InitStrategy::KMeansPlusPlus)
///     .with_n_init(3)
///     .with_seed(0);
///
/// let mut kmeans = FastKMeans::with_config(config);
/// kmeans.fit(&data.view()).unwrap();
///
/// assert!(kmeans.inertia().unwrap() < 0.1);
/// assert_eq!(kmeans.labels().unwrap().len(), 4);
/// ```
pub struct FastKMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Number of features (dimensions), 0 until the first fit
    d: usize,

    model: Option<FittedModel>,
}

impl FastKMeans {
    /// Create a new FastKMeans instance with default configuration.
    pub fn new(d: usize, k: usize) -> Self {
        Self {
            config: KMeansConfig::new(k),
            d,
            model: None,
        }
    }

    /// Create a new FastKMeans instance with custom configuration.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            d: 0,
            config,
            model: None,
        }
    }

    /// Train the model on `data` of shape (n_samples, n_features).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - k is 0
    /// - Number of samples is less than k
    /// - `n_init` or a chunk size is 0
    /// - Data dimensions don't match (for subsequent calls)
    pub fn train(&mut self, data: &ArrayView2<f32>) -> Result<(), KMeansError> {
        let n_features = data.ncols();

        if self.d == 0 {
            self.d = n_features;
        } else if n_features != self.d {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        let result = kmeans_best_of(data, &self.config)?;

        self.model = Some(FittedModel {
            centroids: result.centroids,
            labels: result.labels,
            inertia: result.inertia,
            n_iterations: result.n_iterations,
        });
        Ok(())
    }

    /// Equivalent to `train()`, returning `&mut Self` for chaining.
    pub fn fit(&mut self, data: &ArrayView2<f32>) -> Result<&mut Self, KMeansError> {
        self.train(data)?;
        Ok(self)
    }

    /// Predict cluster assignments for new data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has not been fitted yet
    /// - Data dimensions don't match the training data
    pub fn predict(&self, data: &ArrayView2<f32>) -> Result<Vec<usize>, KMeansError> {
        let model = self.model.as_ref().ok_or(KMeansError::NotFitted)?;

        let n_features = data.ncols();
        if n_features != self.d {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        Ok(predict_labels(data, &model.centroids.view(), &self.config))
    }

    /// Fit the model and return the training assignments.
    pub fn fit_predict(&mut self, data: &ArrayView2<f32>) -> Result<Vec<usize>, KMeansError> {
        self.train(data)?;
        self.labels().map(<[usize]>::to_vec).ok_or(KMeansError::NotFitted)
    }

    /// Centroids of the best restart, if fitted.
    pub fn centroids(&self) -> Option<&Array2<f32>> {
        self.model.as_ref().map(|m| &m.centroids)
    }

    /// Training-set assignments of the best restart, if fitted.
    pub fn labels(&self) -> Option<&[usize]> {
        self.model.as_ref().map(|m| m.labels.as_slice())
    }

    /// Sum of squared distances of training points to their centroid, if fitted.
    pub fn inertia(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.inertia)
    }

    /// Lloyd iterations run by the best restart, if fitted.
    pub fn n_iterations(&self) -> Option<usize> {
        self.model.as_ref().map(|m| m.n_iterations)
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the number of features (dimensions).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}
