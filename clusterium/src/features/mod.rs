//! Feature extraction and scaling for region clustering.
//!
//! Every region is summarized by [`FEATURE_COUNT`] values, in this order:
//!
//! | index  | feature                                       |
//! |--------|-----------------------------------------------|
//! | 0      | width                                         |
//! | 1      | height                                        |
//! | 2..5   | mean color of the whole region                |
//! | 5..8   | mean color of the central 60% × 60% window    |
//! | 8..20  | mean colors of the four quadrants (TL, TR, BL, BR) |
//! | 20     | `|width - height|`                            |
//! | 21     | `width²`                                      |

mod normalize;

#[cfg(test)]
mod tests;

pub use normalize::{ZERO_MAX_SENTINEL, normalize_features};

use crate::geometry::Rect;
use crate::image::Image;
use crate::region::Region;

/// Length of every [`FeatureVector`].
pub const FEATURE_COUNT: usize = 22;

/// Fraction of each side trimmed on both ends to get the central window.
const CENTER_MARGIN: f32 = 0.2;

pub type FeatureVector = [f32; FEATURE_COUNT];

/// Feature vectors in region order.
pub type Dataset = Vec<FeatureVector>;

/// Extracts the feature vector of a single region.
pub fn extract_features(region: &Region) -> FeatureVector {
    extract_image_features(region.image())
}

/// Extracts one feature vector per region, preserving order.
pub fn extract_dataset<'a, I>(regions: I) -> Dataset
where
    I: IntoIterator<Item = &'a Region>,
{
    regions.into_iter().map(extract_features).collect()
}

pub(crate) fn extract_image_features(image: &Image) -> FeatureVector {
    let width = image.width() as f32;
    let height = image.height() as f32;

    let mut features = [0.0f32; FEATURE_COUNT];
    let mut cursor = 0;
    let mut push = |values: &[f32]| {
        features[cursor..cursor + values.len()].copy_from_slice(values);
        cursor += values.len();
    };

    push(&[width, height]);
    for rect in color_windows(image.width() as i32, image.height() as i32) {
        push(&image.mean_color(rect));
    }
    push(&[(width - height).abs(), width * width]);

    debug_assert_eq!(cursor, FEATURE_COUNT, "feature recipe out of sync with FEATURE_COUNT");
    features
}

/// The six windows whose mean colors enter the feature vector:
/// whole image, central window, then the four quadrants.
fn color_windows(width: i32, height: i32) -> [Rect; 6] {
    let margin_x = (width as f32 * CENTER_MARGIN) as i32;
    let margin_y = (height as f32 * CENTER_MARGIN) as i32;
    let center_width = (width - 2 * margin_x).max(1);
    let center_height = (height - 2 * margin_y).max(1);

    let half_w = width / 2;
    let half_h = height / 2;

    [
        Rect::new(0, 0, width, height),
        Rect::new(margin_x, margin_y, center_width, center_height),
        Rect::new(0, 0, half_w, half_h),
        Rect::new(half_w, 0, half_w, half_h),
        Rect::new(0, half_h, half_w, half_h),
        Rect::new(half_w, half_h, half_w, half_h),
    ]
}
