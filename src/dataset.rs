//! Synthetic 2D grid of isotropic Gaussian blobs.

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Standard deviation of every blob, on both axes.
pub const NOISE_SCALE: f32 = 0.1;

/// Points and ground-truth cluster ids, shuffled jointly.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDataset {
    /// Shape (n_samples, 2)
    pub points: Array2<f32>,
    /// Index of the grid centre each point was drawn around
    pub labels: Array1<usize>,
}

impl GridDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Integer grid centres `(i, j)` for `0 <= i, j < grid_size`, row-major.
///
/// Centre `i * grid_size + j` is the one labelled with that index.
pub fn grid_centers(grid_size: usize) -> Array2<f32> {
    let mut centers = Array2::zeros((grid_size * grid_size, 2));
    for i in 0..grid_size {
        for j in 0..grid_size {
            let idx = i * grid_size + j;
            centers[[idx, 0]] = i as f32;
            centers[[idx, 1]] = j as f32;
        }
    }
    centers
}

/// Generate a grid dataset from a seed. Same seed, same dataset.
pub fn generate(seed: u64, n_samples_per_center: usize, grid_size: usize) -> GridDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with_rng(&mut rng, n_samples_per_center, grid_size)
}

/// Generate a grid dataset drawing from an already-initialised generator.
pub fn generate_with_rng<R: Rng>(
    rng: &mut R,
    n_samples_per_center: usize,
    grid_size: usize,
) -> GridDataset {
    let centers = grid_centers(grid_size);
    let n_clusters = centers.nrows();
    let n_samples = n_samples_per_center * n_clusters;

    let mut points = Array2::zeros((n_samples, 2));
    let mut labels = Array1::zeros(n_samples);

    for (cluster_idx, center) in centers.outer_iter().enumerate() {
        let noise: Array2<f32> =
            Array2::random_using((n_samples_per_center, 2), StandardNormal, rng);
        let start = cluster_idx * n_samples_per_center;
        let end = start + n_samples_per_center;

        let mut block = points.slice_mut(ndarray::s![start..end, ..]);
        block.assign(&(noise * NOISE_SCALE + &center));
        labels
            .slice_mut(ndarray::s![start..end])
            .fill(cluster_idx);
    }

    let mut permutation: Vec<usize> = (0..n_samples).collect();
    permutation.shuffle(rng);

    GridDataset {
        points: points.select(Axis(0), &permutation),
        labels: labels.select(Axis(0), &permutation),
    }
}
