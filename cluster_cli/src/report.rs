use clusterium::{LabeledRegion, Rect};
use serde::Serialize;

/// JSON document printed by the `cluster` command.
#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub cluster_count: usize,
    pub regions: Vec<RegionReport>,
}

#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub rect: Rect,
    pub group: Option<usize>,
}

impl ClusterReport {
    pub fn new(cluster_count: usize, regions: &[LabeledRegion]) -> Self {
        Self {
            cluster_count,
            regions: regions
                .iter()
                .map(|labeled| RegionReport {
                    rect: labeled.region().rect(),
                    group: labeled.group(),
                })
                .collect(),
        }
    }
}
