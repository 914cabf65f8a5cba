use crate::error::{Error, Result};

use super::{FEATURE_COUNT, FeatureVector};

/// Value assigned to every entry of a column whose maximum is zero.
pub const ZERO_MAX_SENTINEL: f32 = 0.99;

/// Scales each feature column to `(value - mean) / max` so that all features
/// carry comparable weight. Columns with a zero maximum are filled with
/// [`ZERO_MAX_SENTINEL`].
///
/// For non-negative features every result lies strictly inside `(-1, 1)`;
/// this is checked in debug builds.
pub fn normalize_features(dataset: &mut [FeatureVector]) -> Result<()> {
    if dataset.is_empty() {
        return Err(Error::InvalidInput {
            reason: "cannot normalize an empty dataset",
        });
    }

    let rows = dataset.len() as f64;
    let mut max = [f32::MIN; FEATURE_COUNT];
    let mut sum = [0.0f64; FEATURE_COUNT];
    for row in dataset.iter() {
        for (j, &value) in row.iter().enumerate() {
            max[j] = max[j].max(value);
            sum[j] += value as f64;
        }
    }
    let mean = sum.map(|s| (s / rows) as f32);

    for row in dataset.iter_mut() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = if max[j] == 0.0 {
                ZERO_MAX_SENTINEL
            } else {
                (*value - mean[j]) / max[j]
            };

            debug_assert!(
                *value > -1.0 && *value < 1.0,
                "normalized feature {} out of (-1, 1): {}",
                j,
                value
            );
        }
    }

    Ok(())
}
