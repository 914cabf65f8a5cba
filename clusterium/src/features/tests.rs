use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::error::Error;
use crate::image::Image;

fn region_from(image: Image) -> Region {
    let rect = image.bounds();
    Region::new(rect, image)
}

#[test]
fn test_uniform_region_features() {
    let region = region_from(Image::filled(30, 20, [10, 20, 30]));
    let features = extract_features(&region);

    assert_eq!(features[0], 30.0);
    assert_eq!(features[1], 20.0);
    for window in 0..6 {
        let start = 2 + window * 3;
        assert_eq!(&features[start..start + 3], &[10.0, 20.0, 30.0]);
    }
    assert_eq!(features[20], 10.0);
    assert_eq!(features[21], 900.0);
}

#[test]
fn test_quadrant_means_follow_layout() {
    // Each quadrant of a 10x10 image gets its own color.
    let image = Image::from_fn(10, 10, |x, y| match (x < 5, y < 5) {
        (true, true) => [100, 0, 0],
        (false, true) => [0, 100, 0],
        (true, false) => [0, 0, 100],
        (false, false) => [50, 50, 50],
    });
    let features = extract_features(&region_from(image));

    assert_eq!(&features[8..11], &[100.0, 0.0, 0.0]);
    assert_eq!(&features[11..14], &[0.0, 100.0, 0.0]);
    assert_eq!(&features[14..17], &[0.0, 0.0, 100.0]);
    assert_eq!(&features[17..20], &[50.0, 50.0, 50.0]);
}

#[test]
fn test_center_window_ignores_border() {
    // 10x10 with a 2px white frame around a black core: the central window
    // (offset 2, size 6) sees only the core.
    let image = Image::from_fn(10, 10, |x, y| {
        if (2..8).contains(&x) && (2..8).contains(&y) {
            [0, 0, 0]
        } else {
            [255, 255, 255]
        }
    });
    let features = extract_features(&region_from(image));

    assert_eq!(&features[5..8], &[0.0, 0.0, 0.0]);
    assert!(features[2] > 0.0);
}

#[test]
fn test_single_pixel_region() {
    let features = extract_features(&region_from(Image::filled(1, 1, [9, 8, 7])));

    assert_eq!(&features[0..2], &[1.0, 1.0]);
    assert_eq!(&features[2..5], &[9.0, 8.0, 7.0]);
    assert_eq!(&features[5..8], &[9.0, 8.0, 7.0]);
    // Quadrants of a 1x1 region are empty.
    assert!(features[8..20].iter().all(|&v| v == 0.0));
    assert_eq!(features[20], 0.0);
    assert_eq!(features[21], 1.0);
}

#[test]
fn test_extract_dataset_preserves_order() {
    let regions = [
        region_from(Image::filled(3, 5, [0, 0, 0])),
        region_from(Image::filled(7, 2, [0, 0, 0])),
    ];
    let dataset = extract_dataset(&regions);

    assert_eq!(dataset.len(), 2);
    assert_eq!(&dataset[0][0..2], &[3.0, 5.0]);
    assert_eq!(&dataset[1][0..2], &[7.0, 2.0]);
}

#[test]
fn test_normalize_empty_dataset_fails() {
    let mut dataset: Dataset = Vec::new();
    assert!(matches!(
        normalize_features(&mut dataset),
        Err(Error::InvalidInput { .. })
    ));
}

#[test]
fn test_normalize_zero_column_uses_sentinel() {
    let mut dataset = vec![[0.0; FEATURE_COUNT]; 4];
    for (i, row) in dataset.iter_mut().enumerate() {
        row[0] = i as f32 + 1.0;
    }

    normalize_features(&mut dataset).unwrap();

    for row in &dataset {
        for &value in &row[1..] {
            assert_eq!(value, ZERO_MAX_SENTINEL);
        }
    }
}

#[test]
fn test_normalize_subtracts_mean_and_divides_by_max() {
    let mut dataset = vec![[1.0; FEATURE_COUNT], [3.0; FEATURE_COUNT]];
    normalize_features(&mut dataset).unwrap();

    // mean 2, max 3
    assert!((dataset[0][0] - (-1.0 / 3.0)).abs() < 1e-6);
    assert!((dataset[1][0] - (1.0 / 3.0)).abs() < 1e-6);
}

#[test]
fn test_normalize_constant_column_is_zero() {
    let mut dataset = vec![[5.0; FEATURE_COUNT]; 3];
    normalize_features(&mut dataset).unwrap();

    assert!(dataset.iter().flatten().all(|&v| v == 0.0));
}

#[test]
fn test_normalized_values_stay_in_open_unit_interval() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let rows = rng.random_range(1..20);
        let mut dataset: Dataset = (0..rows)
            .map(|_| {
                let mut row = [0.0; FEATURE_COUNT];
                for value in row.iter_mut() {
                    // Mix of zero columns and wide value ranges.
                    *value = if rng.random_bool(0.1) {
                        0.0
                    } else {
                        rng.random_range(0.0..100_000.0)
                    };
                }
                row
            })
            .collect();

        normalize_features(&mut dataset).unwrap();

        for &value in dataset.iter().flatten() {
            assert!(value > -1.0 && value < 1.0, "value {} out of range", value);
        }
    }
}
