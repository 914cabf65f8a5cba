//! Clusterium - object detection and automatic grouping.
//!
//! Given a scene and a clean photo of the same background, the library finds
//! the objects in the scene and groups similar objects together without
//! being told how many groups there are.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use clusterium::prelude::*;
//!
//! let background = Image::read_file("background.png")?;
//! let scene = Image::read_file("scene.png")?;
//!
//! let regions = RegionDetector::new().detect(&scene, &background)?;
//! let mut regions: Vec<LabeledRegion> = regions.into_iter().map(Into::into).collect();
//!
//! if !regions.is_empty() {
//!     let count = KMeansClusterAlgorithm::new().assign_groups(&mut regions)?;
//!     println!("Found {} groups", count);
//! }
//! ```

pub mod clustering;
pub(crate) mod common;
mod config;
pub mod detection;
mod error;
pub mod features;
mod geometry;
mod image;
mod region;

pub mod prelude;

// ============================================================================
// Core types
// ============================================================================

pub use config::Config;
pub use error::{Error, Result};
pub use geometry::Rect;
pub use crate::image::Image;
pub use region::{LabeledRegion, Region};

// ============================================================================
// Detection
// ============================================================================

pub use detection::{
    AreaBounds, BackgroundSubtractor, DetectionDiagnostics, DetectionResult, DetectorConfig,
    GaussianMixtureModel, PixelClass, RegionDetector, SubtractorConfig,
};

// ============================================================================
// Features
// ============================================================================

pub use features::{FEATURE_COUNT, FeatureVector};

// ============================================================================
// Clustering
// ============================================================================

pub use clustering::{
    ClusterAlgorithm, ClusterResult, ClusterSelector, ClusteringConfig, KMeans,
    KMeansClusterAlgorithm, KMeansConfig, KMeansOutcome, LloydKMeans,
};
