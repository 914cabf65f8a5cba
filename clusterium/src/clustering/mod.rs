//! Grouping of detected regions without knowing the number of groups.
//!
//! [`KMeansClusterAlgorithm`] extracts a feature vector per region, scales
//! the features, then lets [`ClusterSelector`] pick the cluster count with
//! the elbow method. Each region receives the label of its row.

mod kmeans;
mod selector;


pub use kmeans::{KMeans, KMeansConfig, KMeansOutcome, LloydKMeans};
pub use selector::{ClusterResult, ClusterSelector, within_cluster_error};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::{extract_dataset, normalize_features};
use crate::region::LabeledRegion;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub kmeans: KMeansConfig,
}

impl ClusteringConfig {
    pub fn validate(&self) {
        self.kmeans.validate();
    }
}

/// Assigns every region to a group and reports how many groups exist.
pub trait ClusterAlgorithm {
    /// Human-readable name of the algorithm.
    fn name(&self) -> &str;

    /// Labels `regions` in place and returns the number of groups. Labels
    /// lie in `0..count`.
    fn assign_groups(&self, regions: &mut [LabeledRegion]) -> Result<usize>;
}

/// Feature-based k-means clustering with elbow-method model selection.
#[derive(Debug, Clone, Default)]
pub struct KMeansClusterAlgorithm<K = LloydKMeans> {
    selector: ClusterSelector<K>,
}

impl KMeansClusterAlgorithm<LloydKMeans> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ClusteringConfig) -> Self {
        config.validate();
        Self {
            selector: ClusterSelector::from_config(config.kmeans),
        }
    }
}

impl<K: KMeans> KMeansClusterAlgorithm<K> {
    pub fn with_selector(selector: ClusterSelector<K>) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &ClusterSelector<K> {
        &self.selector
    }
}

impl<K: KMeans> ClusterAlgorithm for KMeansClusterAlgorithm<K> {
    fn name(&self) -> &str {
        "k-means (elbow)"
    }

    fn assign_groups(&self, regions: &mut [LabeledRegion]) -> Result<usize> {
        if regions.is_empty() {
            return Err(Error::InvalidInput {
                reason: "cannot cluster an empty set of regions",
            });
        }

        let mut dataset = extract_dataset(regions.iter().map(LabeledRegion::region));
        normalize_features(&mut dataset)?;

        let result = self.selector.select(&dataset)?;
        for (region, &label) in regions.iter_mut().zip(&result.labels) {
            region.set_group(label);
        }

        tracing::info!(
            "{} grouped {} regions into {} clusters",
            self.name(),
            regions.len(),
            result.cluster_count
        );

        Ok(result.cluster_count)
    }
}
