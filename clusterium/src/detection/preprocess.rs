//! Turns a background-subtraction mask into a blurred intensity image ready
//! for threshold sweeping.

use image::{GrayImage, Luma};
use imageproc::filter::box_filter;

use crate::common::Buffer2;
use crate::image::Image;

use super::background_model::PixelClass;

const BLACK: u8 = 0;
const WHITE: u8 = 255;

/// Collapses a tri-valued mask to foreground/not-foreground; shadows count
/// as background.
pub(crate) fn binary_foreground(classes: &Buffer2<PixelClass>) -> Buffer2<bool> {
    classes.map(|&class| class == PixelClass::Foreground)
}

/// Keeps scene pixels under the foreground mask, then inverts the polarity:
/// pixels that end up pure black (masked out, or black in the scene) become
/// white and everything else becomes black. The result is blurred with a
/// `(2r + 1)²` box filter.
pub(crate) fn foreground_intensity(scene: &Image, foreground: &Buffer2<bool>, blur_radius: u32) -> GrayImage {
    debug_assert_eq!(
        (foreground.width(), foreground.height()),
        (scene.width() as usize, scene.height() as usize)
    );

    let recolored = GrayImage::from_fn(scene.width(), scene.height(), |x, y| {
        let kept = *foreground.get(x as usize, y as usize) && scene.pixel(x, y) != [0, 0, 0];
        Luma([if kept { BLACK } else { WHITE }])
    });

    if blur_radius == 0 {
        recolored
    } else {
        box_filter(&recolored, blur_radius, blur_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_collapses_to_background() {
        let classes = Buffer2::new(
            3,
            1,
            vec![PixelClass::Background, PixelClass::Foreground, PixelClass::Shadow],
        );
        assert_eq!(binary_foreground(&classes).pixels(), &[false, true, false]);
    }

    #[test]
    fn test_foreground_becomes_black() {
        let scene = Image::from_fn(4, 1, |x, _| if x == 3 { [0, 0, 0] } else { [10, 200, 30] });
        let mask = Buffer2::new(4, 1, vec![true, false, true, true]);

        let gray = foreground_intensity(&scene, &mask, 0);

        // Foreground pixel, masked-out pixel, foreground pixel, black scene pixel.
        let values: Vec<u8> = gray.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, vec![BLACK, WHITE, BLACK, WHITE]);
    }

    #[test]
    fn test_blur_softens_isolated_pixel() {
        let scene = Image::filled(5, 5, [50, 50, 50]);
        let mut flags = vec![false; 25];
        flags[12] = true;
        let mask = Buffer2::new(5, 5, flags);

        let gray = foreground_intensity(&scene, &mask, 1);

        let center = gray.get_pixel(2, 2).0[0];
        assert!(center > BLACK && center < WHITE, "got {}", center);
        assert_eq!(gray.get_pixel(0, 0).0[0], WHITE);
    }
}
