//! Threshold sweep and contour measurements.
//!
//! A single fixed threshold is not robust across lighting conditions, so
//! every level `0..=255` is tried and the level that yields the most
//! contours of plausible object size wins.

use glam::IVec2;
use image::GrayImage;
use imageproc::contours::find_contours_with_threshold;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

pub(crate) type Contour = Vec<Point<i32>>;

/// Open interval of contour areas accepted as objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for AreaBounds {
    fn default() -> Self {
        Self {
            min: 2000.0,
            max: 50000.0,
        }
    }
}

impl AreaBounds {
    #[inline]
    pub fn admits(&self, area: f64) -> bool {
        area > self.min && area < self.max
    }
}

/// The threshold level that produced the most admissible contours.
#[derive(Debug, Clone, Default)]
pub(crate) struct BestLevel {
    pub threshold: Option<u8>,
    pub contours: Vec<Contour>,
}

/// Binarizes `gray` at every level (pixel > level is set), keeps contours
/// whose area `bounds` admits, and returns the level with the largest count.
/// The lowest level wins ties; a level with no admissible contour never wins.
pub(crate) fn sweep_thresholds(gray: &GrayImage, bounds: AreaBounds) -> BestLevel {
    let levels: Vec<Vec<Contour>> = (0u16..=255)
        .into_par_iter()
        .map(|level| admissible_contours(gray, level as u8, bounds))
        .collect();

    let mut best = BestLevel::default();
    for (level, contours) in levels.into_iter().enumerate() {
        if contours.len() > best.contours.len() {
            best = BestLevel {
                threshold: Some(level as u8),
                contours,
            };
        }
    }

    best
}

fn admissible_contours(gray: &GrayImage, level: u8, bounds: AreaBounds) -> Vec<Contour> {
    find_contours_with_threshold::<i32>(gray, level)
        .into_iter()
        .map(|contour| contour.points)
        .filter(|points| bounds.admits(contour_area(points)))
        .collect()
}

/// Area enclosed by a closed polygon (shoelace formula).
pub(crate) fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0i64;
    let mut prev = points[points.len() - 1];
    for &p in points {
        twice_area += prev.x as i64 * p.y as i64 - p.x as i64 * prev.y as i64;
        prev = p;
    }

    twice_area.abs() as f64 / 2.0
}

/// Simplifies the closed contour with Douglas-Peucker and returns the
/// bounding rectangle of the simplified polygon.
pub(crate) fn simplified_bounding_rect(points: &[Point<i32>], epsilon: f64) -> Option<Rect> {
    let polygon = approximate_polygon_dp(points, epsilon, true);
    Rect::bounding(polygon.iter().map(|p| IVec2::new(p.x, p.y)))
}

/// Bounding rectangles of the contours whose own area `bounds` admits.
pub(crate) fn candidate_rects(contours: &[Contour], bounds: AreaBounds, epsilon: f64) -> Vec<Rect> {
    contours
        .iter()
        .filter(|points| bounds.admits(contour_area(points)))
        .filter_map(|points| simplified_bounding_rect(points, epsilon))
        .collect()
}
