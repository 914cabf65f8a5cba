//! Seeded Lloyd's k-means with k-means++ initialization.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::features::{FEATURE_COUNT, FeatureVector};

/// Labels and centroids produced by one k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansOutcome {
    /// Cluster index in `0..k` for every input row.
    pub labels: Vec<usize>,
    /// One centroid per cluster.
    pub centroids: Vec<FeatureVector>,
    /// Sum of squared distances between rows and their centroids.
    pub compactness: f64,
}

/// A k-means solver. Implementations must be deterministic for a given
/// input so that cluster selection is reproducible.
pub trait KMeans {
    /// Partitions `data` into `k` clusters.
    ///
    /// Callers guarantee `1 <= k <= data.len()`.
    fn cluster(&self, data: &[FeatureVector], k: usize) -> KMeansOutcome;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Lloyd iterations per attempt.
    pub max_iterations: usize,
    /// Independent seeded attempts; the most compact one wins.
    pub attempts: usize,
    /// Iteration stops once no centroid moves farther than this.
    pub epsilon: f32,
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            attempts: 10,
            epsilon: 1e-3,
            seed: 314159,
        }
    }
}

impl KMeansConfig {
    pub fn validate(&self) {
        assert!(self.max_iterations > 0, "max_iterations must be positive");
        assert!(self.attempts > 0, "attempts must be positive");
        assert!(
            self.epsilon >= 0.0,
            "epsilon must be non-negative, got {}",
            self.epsilon
        );
    }
}

/// Default [`KMeans`] implementation.
#[derive(Debug, Clone, Default)]
pub struct LloydKMeans {
    config: KMeansConfig,
}

impl LloydKMeans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: KMeansConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    fn run_attempt(&self, rng: &mut impl Rng, data: &[FeatureVector], k: usize) -> KMeansOutcome {
        let mut centroids = plus_plus_init(rng, data, k);
        let mut labels = vec![0usize; data.len()];
        let shift_limit = self.config.epsilon * self.config.epsilon;

        for _ in 0..self.config.max_iterations {
            assign_labels(data, &centroids, &mut labels);
            let max_shift = update_centroids(data, &labels, &mut centroids);
            if max_shift <= shift_limit {
                break;
            }
        }

        // Labels must match the centroids that are returned.
        assign_labels(data, &centroids, &mut labels);
        let compactness = data
            .iter()
            .zip(&labels)
            .map(|(row, &label)| squared_distance(row, &centroids[label]) as f64)
            .sum();

        KMeansOutcome {
            labels,
            centroids,
            compactness,
        }
    }
}

impl KMeans for LloydKMeans {
    fn cluster(&self, data: &[FeatureVector], k: usize) -> KMeansOutcome {
        assert!(
            k >= 1 && k <= data.len(),
            "k must be in 1..={}, got {}",
            data.len(),
            k
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(k as u64));
        let mut best: Option<KMeansOutcome> = None;

        for _ in 0..self.config.attempts {
            let outcome = self.run_attempt(&mut rng, data, k);
            let better = best
                .as_ref()
                .is_none_or(|current| outcome.compactness < current.compactness);
            if better {
                best = Some(outcome);
            }
        }

        // attempts > 0 is checked by validate()
        best.unwrap_or_else(|| self.run_attempt(&mut rng, data, k))
    }
}

#[inline]
pub(crate) fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest_centroid(row: &FeatureVector, centroids: &[FeatureVector]) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(row, centroid);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn assign_labels(data: &[FeatureVector], centroids: &[FeatureVector], labels: &mut [usize]) {
    for (row, label) in data.iter().zip(labels.iter_mut()) {
        *label = nearest_centroid(row, centroids).0;
    }
}

/// Moves every centroid to the mean of its rows and returns the largest
/// squared shift. A centroid without rows stays where it is.
fn update_centroids(data: &[FeatureVector], labels: &[usize], centroids: &mut [FeatureVector]) -> f32 {
    let k = centroids.len();
    let mut sums = vec![[0.0f64; FEATURE_COUNT]; k];
    let mut counts = vec![0usize; k];

    for (row, &label) in data.iter().zip(labels) {
        counts[label] += 1;
        for (sum, &value) in sums[label].iter_mut().zip(row) {
            *sum += value as f64;
        }
    }

    let mut max_shift = 0.0f32;
    for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
        if count == 0 {
            continue;
        }
        let updated: FeatureVector = std::array::from_fn(|j| (sum[j] / count as f64) as f32);
        max_shift = max_shift.max(squared_distance(centroid, &updated));
        *centroid = updated;
    }

    max_shift
}

#[inline]
fn sample_by_distance(rng: &mut impl Rng, min_distances: &[f32], sum: f32) -> usize {
    let random_threshold = rng.random::<f32>() * sum;
    let mut cumsum = 0.0;

    for (i, &distance) in min_distances.iter().enumerate() {
        cumsum += distance;
        if cumsum > random_threshold {
            return i;
        }
    }

    min_distances.len() - 1
}

/// k-means++ seeding: the first centroid is uniform, each next one is drawn
/// with probability proportional to its squared distance from the nearest
/// centroid chosen so far.
fn plus_plus_init(rng: &mut impl Rng, data: &[FeatureVector], k: usize) -> Vec<FeatureVector> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    let first = data[rng.random_range(0..n)];
    centroids.push(first);

    let mut min_distances: Vec<f32> = data.iter().map(|row| squared_distance(row, &first)).collect();

    for _ in 1..k {
        let sum: f32 = min_distances.iter().sum();
        let chosen = data[sample_by_distance(rng, &min_distances, sum)];
        centroids.push(chosen);

        for (distance, row) in min_distances.iter_mut().zip(data) {
            *distance = distance.min(squared_distance(row, &chosen));
        }
    }

    centroids
}
