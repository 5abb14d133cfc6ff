use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// Compute squared L2 norms for each row of a 2D array
#[inline]
pub fn compute_squared_norms(data: &ArrayView2<f32>) -> Array1<f32> {
    let rows: Vec<f32> = (0..data.nrows())
        .into_par_iter()
        .map(|i| {
            let row = data.row(i);
            row.dot(&row)
        })
        .collect();

    Array1::from(rows)
}

/// Squared Euclidean distance between two points, accumulated in f64.
#[inline]
pub fn squared_distance(a: &ArrayView1<f32>, b: &ArrayView1<f32>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = (x - y) as f64;
            d * d
        })
        .sum()
}

/// Find the nearest centroid for each data point in a chunk using double-chunking
///
/// Uses the identity: ||x - c||^2 = ||x||^2 + ||c||^2 - 2*x.c
///
/// # Arguments
/// * `data_chunk` - Chunk of data points (n_data, n_features)
/// * `data_norms` - Squared norms of data points (n_data,)
/// * `centroids` - All centroids (k, n_features)
/// * `centroid_norms` - Squared norms of centroids (k,)
/// * `chunk_size_centroids` - Size of centroid chunks
///
/// # Returns
/// * `labels` - Cluster assignments for each data point (n_data,)
pub fn find_nearest_centroids_chunked(
    data_chunk: &ArrayView2<f32>,
    data_norms: &ArrayView1<f32>,
    centroids: &ArrayView2<f32>,
    centroid_norms: &ArrayView1<f32>,
    chunk_size_centroids: usize,
) -> Vec<usize> {
    let n_data = data_chunk.nrows();
    let k = centroids.nrows();

    let mut best_labels = vec![0usize; n_data];
    let mut best_dists = vec![f32::INFINITY; n_data];

    let mut c_start = 0;
    while c_start < k {
        let c_end = (c_start + chunk_size_centroids).min(k);
        let centroid_chunk = centroids.slice(ndarray::s![c_start..c_end, ..]);
        let centroid_chunk_norms = centroid_norms.slice(ndarray::s![c_start..c_end]);
        let n_centroids_chunk = c_end - c_start;

        // (n_data, n_features) x (n_features, n_centroids_chunk)
        let dot_products = data_chunk.dot(&centroid_chunk.t());

        best_labels
            .par_iter_mut()
            .zip(best_dists.par_iter_mut())
            .enumerate()
            .for_each(|(i, (label, best_dist))| {
                let x_norm = data_norms[i];

                for j in 0..n_centroids_chunk {
                    let dist = x_norm + centroid_chunk_norms[j] - 2.0 * dot_products[[i, j]];

                    if dist < *best_dist {
                        *best_dist = dist;
                        *label = c_start + j;
                    }
                }
            });

        c_start = c_end;
    }

    best_labels
}

/// Compute centroid shift (sum of L2 norms of centroid movements)
///
/// Summed serially so that convergence decisions are bit-reproducible.
pub fn compute_centroid_shift(
    old_centroids: &ArrayView2<f32>,
    new_centroids: &ArrayView2<f32>,
) -> f64 {
    old_centroids
        .outer_iter()
        .zip(new_centroids.outer_iter())
        .map(|(old_c, new_c)| squared_distance(&old_c, &new_c).sqrt())
        .sum()
}

/// Sum of squared distances from each point to its assigned centroid.
pub fn compute_inertia(
    data: &ArrayView2<f32>,
    centroids: &ArrayView2<f32>,
    labels: &[usize],
) -> f64 {
    data.outer_iter()
        .zip(labels.iter())
        .map(|(point, &label)| squared_distance(&point, &centroids.row(label)))
        .sum()
}
