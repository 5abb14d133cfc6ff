use crate::distance::squared_distance;
use crate::error::KMeansError;
use ndarray::{Array2, ArrayView2};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Centroid seeding scheme used before the Lloyd iterations.
///
/// The set is closed: strategy selection is a configuration value passed to
/// the estimator, not an extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InitStrategy {
    /// Greedy k-means++: spread the initial centres proportionally to D².
    #[default]
    KMeansPlusPlus,
    /// `k` distinct data points drawn uniformly.
    Random,
}

impl InitStrategy {
    /// All supported strategies, in the order they are usually reported.
    pub const ALL: [InitStrategy; 2] = [InitStrategy::KMeansPlusPlus, InitStrategy::Random];

    pub fn as_str(&self) -> &'static str {
        match self {
            InitStrategy::KMeansPlusPlus => "k-means++",
            InitStrategy::Random => "random",
        }
    }

    /// Name usable as a file stem (`k-means++` -> `kmeans_pp`).
    pub fn file_stem(&self) -> &'static str {
        match self {
            InitStrategy::KMeansPlusPlus => "kmeans_pp",
            InitStrategy::Random => "random",
        }
    }
}

impl fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitStrategy {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "k-means++" | "kmeans++" => Ok(InitStrategy::KMeansPlusPlus),
            "random" => Ok(InitStrategy::Random),
            other => Err(KMeansError::UnknownInit(other.to_string())),
        }
    }
}

/// Seed `k` centroids from `data` with the given strategy.
///
/// Callers guarantee `0 < k <= data.nrows()`.
pub fn initialize_centroids<R: Rng>(
    data: &ArrayView2<f32>,
    k: usize,
    strategy: InitStrategy,
    rng: &mut R,
) -> Array2<f32> {
    match strategy {
        InitStrategy::KMeansPlusPlus => kmeans_plusplus(data, k, rng),
        InitStrategy::Random => random_centroids(data, k, rng),
    }
}

/// Initialize centroids by randomly selecting k data points
fn random_centroids<R: Rng>(data: &ArrayView2<f32>, k: usize, rng: &mut R) -> Array2<f32> {
    let n_samples = data.nrows();

    let indices: Vec<usize> = (0..n_samples).collect();
    let selected: Vec<usize> = indices.choose_multiple(rng, k).cloned().collect();

    gather_rows(data, &selected)
}

/// Greedy k-means++ seeding.
///
/// Each new centre is the best of `2 + floor(ln k)` candidates sampled with
/// probability proportional to the squared distance to the closest centre
/// chosen so far; "best" means lowest resulting potential.
fn kmeans_plusplus<R: Rng>(data: &ArrayView2<f32>, k: usize, rng: &mut R) -> Array2<f32> {
    let n_samples = data.nrows();
    let n_local_trials = 2 + (k as f64).ln().floor() as usize;

    let mut selected = Vec::with_capacity(k);
    let first = rng.gen_range(0..n_samples);
    selected.push(first);

    let mut closest: Vec<f64> = (0..n_samples)
        .map(|i| squared_distance(&data.row(i), &data.row(first)))
        .collect();
    let mut potential: f64 = closest.iter().sum();

    while selected.len() < k {
        if potential <= 0.0 {
            // Every point sits on a chosen centre; any point will do.
            selected.push(rng.gen_range(0..n_samples));
            continue;
        }

        let mut best: Option<(usize, f64, Vec<f64>)> = None;
        for _ in 0..n_local_trials {
            let candidate = sample_proportional(&closest, potential, rng);
            let trial: Vec<f64> = closest
                .iter()
                .enumerate()
                .map(|(i, &d)| d.min(squared_distance(&data.row(i), &data.row(candidate))))
                .collect();
            let trial_potential: f64 = trial.iter().sum();

            let improves = best
                .as_ref()
                .map_or(true, |(_, best_potential, _)| trial_potential < *best_potential);
            if improves {
                best = Some((candidate, trial_potential, trial));
            }
        }

        if let Some((candidate, trial_potential, trial)) = best {
            selected.push(candidate);
            potential = trial_potential;
            closest = trial;
        }
    }

    gather_rows(data, &selected)
}

/// Draw an index with probability `weights[i] / total`.
fn sample_proportional<R: Rng>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let threshold = rng.gen::<f64>() * total;
    let mut cumsum = 0.0;

    for (i, &w) in weights.iter().enumerate() {
        cumsum += w;
        if cumsum > threshold {
            return i;
        }
    }

    // Rounding can leave the threshold just above the final cumulative sum.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

fn gather_rows(data: &ArrayView2<f32>, rows: &[usize]) -> Array2<f32> {
    let n_features = data.ncols();
    let mut centroids = Array2::zeros((rows.len(), n_features));
    for (centroid_idx, &data_idx) in rows.iter().enumerate() {
        centroids.row_mut(centroid_idx).assign(&data.row(data_idx));
    }
    centroids
}
