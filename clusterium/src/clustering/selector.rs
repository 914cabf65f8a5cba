//! Elbow-method selection of the cluster count.

use crate::error::{Error, Result};
use crate::features::FeatureVector;

use super::kmeans::{KMeans, KMeansConfig, KMeansOutcome, LloydKMeans, squared_distance};

/// Winning cluster count and one label in `0..cluster_count` per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterResult {
    pub cluster_count: usize,
    pub labels: Vec<usize>,
}

/// Runs k-means for `K = 1, 2, ...` and stops where the error curve bends.
///
/// With `ratio = previous_error / error`, a new `K` is accepted only while the
/// ratio keeps growing; the first `K` whose ratio does not exceed the last
/// accepted one ends the search. A zero error ends it immediately and that `K`
/// is reported.
#[derive(Debug, Clone, Default)]
pub struct ClusterSelector<K = LloydKMeans> {
    kmeans: K,
}

impl ClusterSelector<LloydKMeans> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: KMeansConfig) -> Self {
        Self::with_kmeans(LloydKMeans::from_config(config))
    }
}

impl<K: KMeans> ClusterSelector<K> {
    pub fn with_kmeans(kmeans: K) -> Self {
        Self { kmeans }
    }

    pub fn kmeans(&self) -> &K {
        &self.kmeans
    }

    pub fn select(&self, dataset: &[FeatureVector]) -> Result<ClusterResult> {
        if dataset.is_empty() {
            return Err(Error::InvalidInput {
                reason: "cannot select clusters for an empty dataset",
            });
        }

        let first = self.kmeans.cluster(dataset, 1);
        let mut previous_error = within_cluster_error(dataset, &first);
        tracing::trace!("k = 1: error {}", previous_error);

        let mut accepted = ClusterResult {
            cluster_count: 1,
            labels: first.labels,
        };
        if previous_error == 0.0 {
            return Ok(accepted);
        }

        let mut tracked_ratio = 1.0;
        for k in 2..=dataset.len() {
            let outcome = self.kmeans.cluster(dataset, k);
            let error = within_cluster_error(dataset, &outcome);

            if error == 0.0 {
                tracing::trace!("k = {}: zero error", k);
                return Ok(ClusterResult {
                    cluster_count: k,
                    labels: outcome.labels,
                });
            }

            let ratio = previous_error / error;
            tracing::trace!("k = {}: error {}, ratio {}", k, error, ratio);
            if ratio <= tracked_ratio {
                break;
            }

            tracked_ratio = ratio;
            previous_error = error;
            accepted = ClusterResult {
                cluster_count: k,
                labels: outcome.labels,
            };
        }

        tracing::debug!("Selected {} clusters for {} rows", accepted.cluster_count, dataset.len());
        Ok(accepted)
    }
}

/// Mean Euclidean distance between each row and the centroid it is
/// assigned to.
pub fn within_cluster_error(dataset: &[FeatureVector], outcome: &KMeansOutcome) -> f64 {
    assert_eq!(dataset.len(), outcome.labels.len(), "one label per row expected");
    if dataset.is_empty() {
        return 0.0;
    }

    let total: f64 = dataset
        .iter()
        .zip(&outcome.labels)
        .map(|(row, &label)| (squared_distance(row, &outcome.centroids[label]) as f64).sqrt())
        .sum();

    total / dataset.len() as f64
}
