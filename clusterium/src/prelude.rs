//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use clusterium::prelude::*;
//! ```

pub use crate::{Config, Error, Image, LabeledRegion, Rect, Region, Result};

pub use crate::{DetectionResult, DetectorConfig, RegionDetector};

pub use crate::{ClusterAlgorithm, ClusteringConfig, KMeansClusterAlgorithm};
