//! Removal of nested detections, such as the inner hole of a ring-shaped
//! object reported next to its outer border.

use crate::geometry::Rect;

/// Whether the center of `rects[index]` lies inside another rectangle of
/// strictly larger area. Equal areas never count as containment.
///
/// # Panics
///
/// Panics if `rects` is empty or `index` is out of range.
pub fn center_inside_larger_rect(index: usize, rects: &[Rect]) -> bool {
    assert!(!rects.is_empty(), "containment check needs at least one rect");
    assert!(
        index < rects.len(),
        "rect index {} out of range for {} rects",
        index,
        rects.len()
    );

    let current = rects[index];
    let center = current.center();

    rects
        .iter()
        .enumerate()
        .any(|(i, other)| i != index && other.contains(center) && current.area() < other.area())
}

/// Keeps the rectangles whose center is not covered by a larger one,
/// preserving order.
pub fn remove_nested(rects: &[Rect]) -> Vec<Rect> {
    (0..rects.len())
        .filter(|&i| !center_inside_larger_rect(i, rects))
        .map(|i| rects[i])
        .collect()
}
