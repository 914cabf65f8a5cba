//! Object detection against a clean background plate.
//!
//! # Pipeline
//!
//! 1. **Foreground mask**: a Gaussian mixture background model learns the
//!    background frame, then classifies the scene. Shadows count as background.
//!
//! 2. **Recolor**: foreground scene pixels become black, everything else
//!    white; the intensity image is box-blurred to suppress speckle.
//!
//! 3. **Threshold sweep**: every level `0..=255` is tried and the level that
//!    yields the most contours with area inside [`AreaBounds`] wins.
//!
//! 4. **Bounding**: winning contours are simplified with Douglas-Peucker and
//!    bounded by axis-aligned rectangles.
//!
//! 5. **De-duplication**: rectangles whose center lies inside a larger
//!    rectangle are dropped.
//!
//! 6. **Materialization**: each surviving rectangle is cropped from the scene.

mod background_model;
mod contours;
mod nesting;
mod preprocess;


pub use background_model::{BackgroundSubtractor, GaussianMixtureModel, PixelClass, SubtractorConfig};
pub use contours::AreaBounds;
pub use nesting::{center_inside_larger_rect, remove_nested};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::image::Image;
use crate::region::Region;

use contours::{candidate_rects, sweep_thresholds};
use preprocess::{binary_foreground, foreground_intensity};

/// Parameters of the detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Contour areas accepted as objects (exclusive on both ends).
    pub area: AreaBounds,
    /// Douglas-Peucker tolerance used before bounding contours.
    pub polygon_epsilon: f64,
    /// Radius of the box blur applied to the recolored mask.
    pub blur_radius: u32,
    pub subtractor: SubtractorConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            area: AreaBounds::default(),
            polygon_epsilon: 3.0,
            blur_radius: 1,
            subtractor: SubtractorConfig::default(),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) {
        assert!(
            self.area.min >= 0.0 && self.area.min < self.area.max,
            "area bounds must satisfy 0 <= min < max, got {} / {}",
            self.area.min,
            self.area.max
        );
        assert!(
            self.polygon_epsilon >= 0.0,
            "polygon_epsilon must be non-negative, got {}",
            self.polygon_epsilon
        );
        self.subtractor.validate();
    }
}

/// Counts collected while detecting, for debugging and tuning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionDiagnostics {
    /// Pixels classified as foreground after shadow removal.
    pub foreground_pixels: usize,
    /// Winning threshold level, if any level produced a contour.
    pub best_threshold: Option<u8>,
    /// Admissible contours at the winning level.
    pub contour_count: usize,
    /// Bounding rectangles before de-duplication.
    pub candidate_count: usize,
    /// Rectangles dropped because a larger one covers their center.
    pub nested_removed: usize,
}

/// Regions found in a scene plus pipeline diagnostics.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub regions: Vec<Region>,
    pub diagnostics: DetectionDiagnostics,
}

/// Finds object regions in a scene by comparing it with a background plate.
#[derive(Debug, Default)]
pub struct RegionDetector {
    config: DetectorConfig,
}

impl RegionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: DetectorConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detects object regions in `scene`. An empty result means no objects.
    pub fn detect(&self, scene: &Image, background: &Image) -> Result<Vec<Region>> {
        Ok(self.detect_with_diagnostics(scene, background)?.regions)
    }

    /// Like [`detect`](Self::detect), also returning pipeline counts.
    pub fn detect_with_diagnostics(&self, scene: &Image, background: &Image) -> Result<DetectionResult> {
        check_dimensions(scene, background)?;

        let mut subtractor = GaussianMixtureModel::new(
            scene.width(),
            scene.height(),
            self.config.subtractor.clone(),
        );
        self.detect_using(&mut subtractor, scene, background)
    }

    /// Runs the pipeline with a caller-supplied background model. The model
    /// is fed `background` first, then `scene`.
    pub fn detect_using<S: BackgroundSubtractor>(
        &self,
        subtractor: &mut S,
        scene: &Image,
        background: &Image,
    ) -> Result<DetectionResult> {
        check_dimensions(scene, background)?;

        subtractor.apply(background)?;
        let classes = subtractor.apply(scene)?;
        let foreground = binary_foreground(&classes);

        let mut diagnostics = DetectionDiagnostics {
            foreground_pixels: foreground.pixels().iter().filter(|&&f| f).count(),
            ..Default::default()
        };
        tracing::debug!("Foreground mask has {} pixels", diagnostics.foreground_pixels);

        let intensity = foreground_intensity(scene, &foreground, self.config.blur_radius);

        let best = sweep_thresholds(&intensity, self.config.area);
        diagnostics.best_threshold = best.threshold;
        diagnostics.contour_count = best.contours.len();
        tracing::debug!(
            "Threshold sweep picked level {:?} with {} contours",
            best.threshold,
            best.contours.len()
        );

        let candidates = candidate_rects(&best.contours, self.config.area, self.config.polygon_epsilon);
        diagnostics.candidate_count = candidates.len();

        let rects = remove_nested(&candidates);
        diagnostics.nested_removed = candidates.len() - rects.len();
        if diagnostics.nested_removed > 0 {
            tracing::debug!("Removed {} nested rects", diagnostics.nested_removed);
        }

        let regions: Vec<Region> = rects
            .into_iter()
            .map(|rect| Region::crop_from(scene, rect))
            .collect();

        tracing::info!("Detected {} regions", regions.len());

        Ok(DetectionResult {
            regions,
            diagnostics,
        })
    }
}

fn check_dimensions(scene: &Image, background: &Image) -> Result<()> {
    if scene.dimensions() != background.dimensions() {
        return Err(Error::DimensionMismatch {
            scene: scene.dimensions(),
            background: background.dimensions(),
        });
    }
    Ok(())
}
