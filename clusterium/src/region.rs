use glam::IVec2;

use crate::geometry::Rect;
use crate::image::Image;

/// A detected object: the pixels of a sub-rectangle of the scene together
/// with the rectangle's position in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    rect: Rect,
    image: Image,
}

impl Region {
    /// # Panics
    ///
    /// Panics if the rectangle is empty or its size differs from `image`.
    pub fn new(rect: Rect, image: Image) -> Self {
        assert!(!rect.is_empty(), "region rect must be non-empty, got {:?}", rect);
        assert_eq!(
            (rect.width as u32, rect.height as u32),
            image.dimensions(),
            "region rect size must match its pixel content"
        );
        Self { rect, image }
    }

    /// Cuts `rect` out of `source`.
    pub fn crop_from(source: &Image, rect: Rect) -> Self {
        Self::new(rect, source.crop(rect))
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Center of the region in source image coordinates.
    pub fn center(&self) -> IVec2 {
        self.rect.center()
    }
}

/// A region plus the group it was assigned to by a clustering algorithm.
///
/// The group starts unset; unset is distinct from group 0.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledRegion {
    region: Region,
    group: Option<usize>,
}

impl LabeledRegion {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            group: None,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn group(&self) -> Option<usize> {
        self.group
    }

    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }

    /// Assigns the region to `group`. A later clustering run may overwrite
    /// the group, but never clears it.
    pub fn set_group(&mut self, group: usize) {
        self.group = Some(group);
    }

    pub fn into_region(self) -> Region {
        self.region
    }
}

impl From<Region> for LabeledRegion {
    fn from(region: Region) -> Self {
        Self::new(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_from_records_position() {
        let scene = Image::from_fn(20, 10, |x, y| [x as u8, y as u8, 7]);
        let region = Region::crop_from(&scene, Rect::new(4, 2, 6, 4));

        assert_eq!(region.rect(), Rect::new(4, 2, 6, 4));
        assert_eq!((region.width(), region.height()), (6, 4));
        assert_eq!(region.image().pixel(0, 0), [4, 2, 7]);
        assert_eq!(region.center(), IVec2::new(7, 4));
    }

    #[test]
    fn test_group_starts_unset() {
        let region = Region::crop_from(&Image::filled(4, 4, [1, 2, 3]), Rect::new(0, 0, 2, 2));
        let mut labeled = LabeledRegion::from(region);

        assert!(!labeled.is_grouped());
        assert_eq!(labeled.group(), None);

        labeled.set_group(0);
        assert!(labeled.is_grouped());
        assert_eq!(labeled.group(), Some(0));
    }

    #[test]
    #[should_panic(expected = "must match its pixel content")]
    fn test_mismatched_content_panics() {
        Region::new(Rect::new(0, 0, 3, 3), Image::filled(2, 2, [0, 0, 0]));
    }
}
