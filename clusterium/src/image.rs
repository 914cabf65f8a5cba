//! RGB pixel buffer shared by the detector and the feature extractor.

use std::path::Path;

use image::{GenericImageView, Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::geometry::Rect;

/// An 8-bit RGB image.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pixels: RgbImage,
}

impl Image {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Image of the given size with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self::new(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        Self::new(RgbImage::from_fn(width, height, |x, y| Rgb(f(x, y))))
    }

    /// Decodes an image file into RGB, whatever its stored color type.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Image> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            "Loaded '{}' ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );

        Ok(Image::new(decoded.to_rgb8()))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// The rectangle covering the whole image.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_rgb(self) -> RgbImage {
        self.pixels
    }

    /// Copies the pixels under `rect` into a new image.
    ///
    /// # Panics
    ///
    /// Panics if `rect` is empty or not fully inside the image.
    pub fn crop(&self, rect: Rect) -> Image {
        assert!(!rect.is_empty(), "crop rect must be non-empty, got {:?}", rect);
        assert!(
            rect.is_within(&self.bounds()),
            "crop rect {:?} exceeds image bounds {:?}",
            rect,
            self.bounds()
        );

        let view = self.pixels.view(
            rect.x as u32,
            rect.y as u32,
            rect.width as u32,
            rect.height as u32,
        );
        Image::new(view.to_image())
    }

    /// Per-channel mean over `rect`. An empty rectangle has a mean of zero.
    ///
    /// # Panics
    ///
    /// Panics if a non-empty `rect` is not fully inside the image.
    pub fn mean_color(&self, rect: Rect) -> [f32; 3] {
        if rect.is_empty() {
            return [0.0; 3];
        }
        assert!(
            rect.is_within(&self.bounds()),
            "mean rect {:?} exceeds image bounds {:?}",
            rect,
            self.bounds()
        );

        let mut sum = [0u64; 3];
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                let p = self.pixels.get_pixel(x as u32, y as u32).0;
                sum[0] += p[0] as u64;
                sum[1] += p[1] as u64;
                sum[2] += p[2] as u64;
            }
        }

        let count = rect.area() as f64;
        sum.map(|s| (s as f64 / count) as f32)
    }
}

impl From<RgbImage> for Image {
    fn from(pixels: RgbImage) -> Self {
        Self::new(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_copies_sub_rectangle() {
        let image = Image::from_fn(8, 6, |x, y| [x as u8, y as u8, 0]);
        let cropped = image.crop(Rect::new(2, 1, 3, 4));

        assert_eq!(cropped.dimensions(), (3, 4));
        assert_eq!(cropped.pixel(0, 0), [2, 1, 0]);
        assert_eq!(cropped.pixel(2, 3), [4, 4, 0]);
    }

    #[test]
    #[should_panic(expected = "exceeds image bounds")]
    fn test_crop_outside_bounds_panics() {
        let image = Image::filled(4, 4, [0, 0, 0]);
        image.crop(Rect::new(2, 2, 3, 3));
    }

    #[test]
    fn test_mean_color() {
        // Left half red, right half blue.
        let image = Image::from_fn(4, 2, |x, _| if x < 2 { [200, 0, 0] } else { [0, 0, 100] });

        assert_eq!(image.mean_color(image.bounds()), [100.0, 0.0, 50.0]);
        assert_eq!(image.mean_color(Rect::new(0, 0, 2, 2)), [200.0, 0.0, 0.0]);
        assert_eq!(image.mean_color(Rect::new(0, 0, 0, 2)), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let result = Image::read_file("/nonexistent/scene.png");
        assert!(matches!(result, Err(Error::ImageLoad { .. })));
    }
}
