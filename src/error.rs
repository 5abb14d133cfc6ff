use thiserror::Error;

/// Error types for the k-means engine
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call train() or fit() first.")]
    NotFitted,

    /// Dimension mismatch between data and model
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// Initialization strategy name is not one of the supported strategies
    #[error("Unknown init strategy '{0}' (expected 'k-means++' or 'random')")]
    UnknownInit(String),

    /// A numeric parameter is out of range (n_init = 0, empty n_init range, ...)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Error types for aggregation, export and chart rendering
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Inertia matrix is empty")]
    EmptyMatrix,

    /// A cell was never written by the experiment runner
    #[error("Inertia matrix cell [{row}, {col}] is not populated")]
    Unpopulated { row: usize, col: usize },

    #[error("Series mismatch: {0}")]
    SeriesMismatch(String),

    #[error("Plotting failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Npy(#[from] ndarray_npy::WriteNpyError),
}
