mod args;
mod init;
mod report;

use anyhow::{Context, Result};
use clusterium::prelude::*;

use crate::args::Args;
use crate::report::ClusterReport;

fn main() -> Result<()> {
    init::init_logging("info")?;

    let args = Args::parse(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let background = Image::read_file(&args.background)?;
    let scene = Image::read_file(&args.scene)?;

    let detector = RegionDetector::from_config(config.detector);
    let result = detector.detect_with_diagnostics(&scene, &background)?;
    tracing::debug!("Detection diagnostics: {:?}", result.diagnostics);

    let mut regions: Vec<LabeledRegion> = result.regions.into_iter().map(LabeledRegion::from).collect();

    let cluster_count = if regions.is_empty() {
        tracing::info!("No objects found in {}", args.scene.display());
        0
    } else {
        let algorithm = KMeansClusterAlgorithm::from_config(config.clustering);
        tracing::info!("Clustering {} regions with {}", regions.len(), algorithm.name());
        algorithm.assign_groups(&mut regions)?
    };

    let report = ClusterReport::new(cluster_count, &regions);
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
