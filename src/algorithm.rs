use crate::config::KMeansConfig;
use crate::distance::{
    compute_centroid_shift, compute_inertia, compute_squared_norms, find_nearest_centroids_chunked,
};
use crate::error::KMeansError;
use crate::init::initialize_centroids;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use tracing::{debug, trace};

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansResult {
    pub centroids: Array2<f32>,
    pub labels: Vec<usize>,
    pub inertia: f64,
    pub n_iterations: usize,
}

/// Run `config.n_init` restarts and keep the one with the lowest inertia.
///
/// All restarts draw from a single RNG stream seeded with `config.seed`, so
/// restart `r` sees the same randomness whatever the total restart count is.
pub fn kmeans_best_of(
    data: &ArrayView2<f32>,
    config: &KMeansConfig,
) -> Result<KMeansResult, KMeansError> {
    let n_samples = data.nrows();
    let k = config.k;

    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }

    if n_samples < k {
        return Err(KMeansError::InsufficientData(format!(
            "Number of samples ({}) is less than k ({})",
            n_samples, k
        )));
    }

    if config.n_init == 0 {
        return Err(KMeansError::InvalidParameter(
            "n_init must be greater than 0".to_string(),
        ));
    }

    if config.chunk_size_data == 0 || config.chunk_size_centroids == 0 {
        return Err(KMeansError::InvalidParameter(format!(
            "chunk sizes must be greater than 0 (data: {}, centroids: {})",
            config.chunk_size_data, config.chunk_size_centroids
        )));
    }

    debug!(
        n_samples,
        n_features = data.ncols(),
        k,
        init = %config.init,
        n_init = config.n_init,
        seed = config.seed,
        "training k-means"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // Pre-compute data norms once for all restarts
    let data_norms = compute_squared_norms(data);

    let mut best: Option<KMeansResult> = None;
    for restart in 0..config.n_init {
        let result = lloyd(data, &data_norms.view(), config, &mut rng);
        debug!(
            restart,
            inertia = result.inertia,
            n_iterations = result.n_iterations,
            "restart finished"
        );

        let improves = best
            .as_ref()
            .map_or(true, |current| result.inertia < current.inertia);
        if improves {
            best = Some(result);
        }
    }

    best.ok_or_else(|| KMeansError::InvalidParameter("no restart was run".to_string()))
}

/// One restart: seed centroids, iterate until the shift drops below `tol`,
/// then assign every point to its final centroid.
fn lloyd(
    data: &ArrayView2<f32>,
    data_norms: &ArrayView1<f32>,
    config: &KMeansConfig,
    rng: &mut ChaCha8Rng,
) -> KMeansResult {
    let n_samples = data.nrows();
    let n_features = data.ncols();
    let k = config.k;

    let mut centroids = initialize_centroids(data, k, config.init, rng);
    let mut n_iterations = 0;

    for iteration in 0..config.max_iters {
        let iter_start = Instant::now();
        n_iterations = iteration + 1;

        let labels = assign_labels(data, data_norms, &centroids.view(), config);

        // Accumulators for new centroids
        let mut cluster_sums: Array2<f64> = Array2::zeros((k, n_features));
        let mut cluster_counts: Array1<f64> = Array1::zeros(k);

        for (i, &label) in labels.iter().enumerate() {
            cluster_counts[label] += 1.0;
            for j in 0..n_features {
                cluster_sums[[label, j]] += data[[i, j]] as f64;
            }
        }

        let prev_centroids = centroids.clone();
        let mut empty_clusters = Vec::new();

        for cluster_idx in 0..k {
            let count = cluster_counts[cluster_idx];
            if count > 0.0 {
                for j in 0..n_features {
                    centroids[[cluster_idx, j]] = (cluster_sums[[cluster_idx, j]] / count) as f32;
                }
            } else {
                empty_clusters.push(cluster_idx);
            }
        }

        // Reseed empty clusters from random points
        if !empty_clusters.is_empty() {
            let indices: Vec<usize> = (0..n_samples).collect();
            let random_indices: Vec<usize> = indices
                .choose_multiple(rng, empty_clusters.len())
                .cloned()
                .collect();

            for (&cluster_idx, &data_idx) in empty_clusters.iter().zip(random_indices.iter()) {
                centroids.row_mut(cluster_idx).assign(&data.row(data_idx));
            }

            debug!(count = empty_clusters.len(), "reinitialized empty clusters");
        }

        let shift = compute_centroid_shift(&prev_centroids.view(), &centroids.view());

        trace!(
            iteration = iteration + 1,
            max_iters = config.max_iters,
            shift,
            elapsed_s = iter_start.elapsed().as_secs_f64(),
            "lloyd iteration"
        );

        if config.tol >= 0.0 && shift < config.tol {
            debug!(
                iterations = iteration + 1,
                shift,
                tol = config.tol,
                "converged"
            );
            break;
        }
    }

    let labels = assign_labels(data, data_norms, &centroids.view(), config);
    let inertia = compute_inertia(data, &centroids.view(), &labels);

    KMeansResult {
        centroids,
        labels,
        inertia,
        n_iterations,
    }
}

/// Assign every point to its nearest centroid, processing the data in chunks
fn assign_labels(
    data: &ArrayView2<f32>,
    data_norms: &ArrayView1<f32>,
    centroids: &ArrayView2<f32>,
    config: &KMeansConfig,
) -> Vec<usize> {
    let n_samples = data.nrows();
    let centroid_norms = compute_squared_norms(centroids);
    let mut labels = Vec::with_capacity(n_samples);

    let mut start_idx = 0;
    while start_idx < n_samples {
        let end_idx = (start_idx + config.chunk_size_data).min(n_samples);
        let data_chunk = data.slice(ndarray::s![start_idx..end_idx, ..]);
        let data_chunk_norms = data_norms.slice(ndarray::s![start_idx..end_idx]);

        labels.extend(find_nearest_centroids_chunked(
            &data_chunk,
            &data_chunk_norms,
            centroids,
            &centroid_norms.view(),
            config.chunk_size_centroids,
        ));

        start_idx = end_idx;
    }

    labels
}

/// Predict cluster assignments for new data using trained centroids
pub fn predict_labels(
    data: &ArrayView2<f32>,
    centroids: &ArrayView2<f32>,
    config: &KMeansConfig,
) -> Vec<usize> {
    let data_norms = compute_squared_norms(data);
    assign_labels(data, &data_norms.view(), centroids, config)
}
