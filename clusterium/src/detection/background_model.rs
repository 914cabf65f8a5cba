//! Per-pixel adaptive Gaussian mixture background model.
//!
//! Each pixel keeps up to `max_modes` Gaussian components (weight, RGB mean,
//! isotropic variance) sorted by weight. A new frame is classified against
//! the components that make up the dominant `background_ratio` of the
//! weight, and the model is updated with learning rate
//! `1 / min(2 * frames_seen, history)`. Pixels that fail the background test
//! but look like a darkened background color are reported as shadows.

use serde::{Deserialize, Serialize};

use crate::common::Buffer2;
use crate::error::{Error, Result};
use crate::image::Image;

/// Classification of a single pixel by a [`BackgroundSubtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelClass {
    #[default]
    Background,
    Foreground,
    Shadow,
}

/// A background-subtraction model fed frames in sequence.
pub trait BackgroundSubtractor {
    /// Updates the model with `frame` and classifies its pixels.
    fn apply(&mut self, frame: &Image) -> Result<Buffer2<PixelClass>>;
}

/// Parameters of [`GaussianMixtureModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtractorConfig {
    /// Frames that make up the learning window.
    pub history: u32,
    /// Squared Mahalanobis distance below which a pixel matches the background.
    pub var_threshold: f32,
    /// Squared Mahalanobis distance below which a pixel updates an existing mode.
    pub var_threshold_gen: f32,
    /// Variance assigned to new modes.
    pub var_init: f32,
    pub var_min: f32,
    pub var_max: f32,
    /// Share of the total weight that counts as background.
    pub background_ratio: f32,
    /// Weight decay pushing unsupported modes out of the mixture.
    pub complexity_reduction: f32,
    /// Minimum brightness ratio for a darker pixel to count as shadow.
    pub shadow_threshold: f32,
    pub detect_shadows: bool,
    pub max_modes: usize,
}

impl Default for SubtractorConfig {
    fn default() -> Self {
        Self {
            history: 2,
            var_threshold: 50.0,
            var_threshold_gen: 9.0,
            var_init: 100.0,
            var_min: 4.0,
            var_max: 75.0,
            background_ratio: 0.9,
            complexity_reduction: 0.05,
            shadow_threshold: 0.05,
            detect_shadows: true,
            max_modes: 5,
        }
    }
}

impl SubtractorConfig {
    pub fn validate(&self) {
        assert!(self.history > 0, "history must be positive");
        assert!(self.max_modes > 0, "max_modes must be positive");
        assert!(
            self.var_threshold > 0.0 && self.var_threshold_gen > 0.0,
            "variance thresholds must be positive"
        );
        assert!(self.var_init > 0.0, "var_init must be positive");
        assert!(
            self.var_min > 0.0 && self.var_min <= self.var_max,
            "var_min must be positive and not exceed var_max, got {} / {}",
            self.var_min,
            self.var_max
        );
        assert!(
            (0.0..=1.0).contains(&self.background_ratio),
            "background_ratio must be in [0, 1], got {}",
            self.background_ratio
        );
        assert!(
            (0.0..=1.0).contains(&self.shadow_threshold),
            "shadow_threshold must be in [0, 1], got {}",
            self.shadow_threshold
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Mode {
    weight: f32,
    mean: [f32; 3],
    variance: f32,
}

/// Gaussian mixture background model with shadow detection.
#[derive(Debug)]
pub struct GaussianMixtureModel {
    config: SubtractorConfig,
    width: u32,
    height: u32,
    frames_seen: u32,
    /// `max_modes` slots per pixel, row-major.
    modes: Vec<Mode>,
    mode_counts: Vec<usize>,
}

impl GaussianMixtureModel {
    pub fn new(width: u32, height: u32, config: SubtractorConfig) -> Self {
        config.validate();

        let pixel_count = width as usize * height as usize;
        Self {
            modes: vec![Mode::default(); pixel_count * config.max_modes],
            mode_counts: vec![0; pixel_count],
            config,
            width,
            height,
            frames_seen: 0,
        }
    }

    pub fn config(&self) -> &SubtractorConfig {
        &self.config
    }

    fn learning_rate(&self) -> f32 {
        1.0 / (2 * self.frames_seen).min(self.config.history) as f32
    }

    /// Updates one pixel's mixture with `data` and classifies it.
    ///
    /// Shadows are judged against the mixture as it stood before `data`
    /// spawned a new mode; otherwise every unmatched pixel would be a
    /// perfect scaled copy of its own fresh mode.
    fn update_pixel(&mut self, pixel: usize, data: [f32; 3], alpha: f32) -> PixelClass {
        let config = &self.config;
        let max_modes = config.max_modes;
        let modes = &mut self.modes[pixel * max_modes..(pixel + 1) * max_modes];
        let mut count = self.mode_counts[pixel];

        let one_minus_alpha = 1.0 - alpha;
        let prune = -alpha * config.complexity_reduction;

        let mut background = false;
        let mut fits = false;
        let mut total_weight = 0.0f32;

        let mut mode = 0;
        while mode < count {
            let mut weight = one_minus_alpha * modes[mode].weight + prune;
            let mut slot = mode;

            if !fits {
                let variance = modes[mode].variance;
                let diff = sub(modes[mode].mean, data);
                let dist2 = dot(diff, diff);

                if total_weight < config.background_ratio && dist2 < config.var_threshold * variance {
                    background = true;
                }

                if dist2 < config.var_threshold_gen * variance {
                    fits = true;
                    weight += alpha;

                    let k = alpha / weight;
                    let current = &mut modes[mode];
                    for c in 0..3 {
                        current.mean[c] -= k * diff[c];
                    }
                    current.variance = (variance + k * (dist2 - variance))
                        .clamp(config.var_min, config.var_max);

                    // Keep modes sorted by weight, heaviest first.
                    while slot > 0 && weight >= modes[slot - 1].weight {
                        modes.swap(slot, slot - 1);
                        slot -= 1;
                    }
                }
            }

            if weight < -prune {
                weight = 0.0;
                count -= 1;
            }

            modes[slot].weight = weight;
            total_weight += weight;
            mode += 1;
        }

        if total_weight > 0.0 {
            let scale = 1.0 / total_weight;
            for m in modes[..count].iter_mut() {
                m.weight *= scale;
            }
        }

        let shadow = !background
            && config.detect_shadows
            && is_shadow(&modes[..count], data, config);

        if !fits && alpha > 0.0 {
            let slot = if count == max_modes {
                max_modes - 1
            } else {
                count += 1;
                count - 1
            };

            if count == 1 {
                modes[slot].weight = 1.0;
            } else {
                modes[slot].weight = alpha;
                for m in modes[..count - 1].iter_mut() {
                    m.weight *= one_minus_alpha;
                }
            }
            modes[slot].mean = data;
            modes[slot].variance = config.var_init;

            let mut i = slot;
            while i > 0 && modes[i].weight >= modes[i - 1].weight {
                modes.swap(i, i - 1);
                i -= 1;
            }
        }

        self.mode_counts[pixel] = count;

        if background {
            PixelClass::Background
        } else if shadow {
            PixelClass::Shadow
        } else {
            PixelClass::Foreground
        }
    }
}

/// A pixel is a shadow when it is a scaled-down copy (ratio within
/// `[shadow_threshold, 1]`) of one of the background modes.
fn is_shadow(modes: &[Mode], data: [f32; 3], config: &SubtractorConfig) -> bool {
    let mut total_weight = 0.0f32;
    for mode in modes {
        let numerator = dot(mode.mean, data);
        let denominator = dot(mode.mean, mode.mean);
        if denominator == 0.0 {
            return false;
        }

        if numerator <= denominator && numerator >= config.shadow_threshold * denominator {
            let a = numerator / denominator;
            let scaled = mode.mean.map(|m| a * m);
            let diff = sub(scaled, data);
            if dot(diff, diff) < config.var_threshold * mode.variance * a * a {
                return true;
            }
        }

        total_weight += mode.weight;
        if total_weight > config.background_ratio {
            return false;
        }
    }

    false
}

impl BackgroundSubtractor for GaussianMixtureModel {
    fn apply(&mut self, frame: &Image) -> Result<Buffer2<PixelClass>> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(Error::DimensionMismatch {
                scene: frame.dimensions(),
                background: (self.width, self.height),
            });
        }

        self.frames_seen += 1;
        let alpha = self.learning_rate();

        let width = self.width as usize;
        let height = self.height as usize;
        let mut mask = Buffer2::new_default(width, height);

        for (x, y, pixel) in frame.as_rgb().enumerate_pixels() {
            let data = pixel.0.map(|c| c as f32);
            let index = y as usize * width + x as usize;
            mask[index] = self.update_pixel(index, data, alpha);
        }

        tracing::trace!("Background model updated with frame {}", self.frames_seen);

        Ok(mask)
    }
}

#[inline]
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(background: &Image, scene: &Image) -> Buffer2<PixelClass> {
        let mut model = GaussianMixtureModel::new(
            background.width(),
            background.height(),
            SubtractorConfig::default(),
        );
        model.apply(background).unwrap();
        model.apply(scene).unwrap()
    }

    #[test]
    fn test_learning_rate_follows_history() {
        let mut model = GaussianMixtureModel::new(1, 1, SubtractorConfig::default());
        model.frames_seen = 1;
        assert_eq!(model.learning_rate(), 0.5);
        model.frames_seen = 5;
        assert_eq!(model.learning_rate(), 0.5);
    }

    #[test]
    fn test_identical_frames_are_background() {
        let frame = Image::from_fn(16, 8, |x, y| [(x * 10) as u8, (y * 20) as u8, 90]);
        let mask = classify(&frame, &frame);
        assert!(mask.pixels().iter().all(|&c| c == PixelClass::Background));
    }

    #[test]
    fn test_small_noise_is_background() {
        let background = Image::filled(8, 8, [100, 100, 100]);
        let scene = Image::filled(8, 8, [110, 95, 104]);
        let mask = classify(&background, &scene);
        assert!(mask.pixels().iter().all(|&c| c == PixelClass::Background));
    }

    #[test]
    fn test_distinct_color_is_foreground() {
        let background = Image::filled(8, 8, [100, 100, 100]);
        let scene = Image::from_fn(8, 8, |x, _| if x < 4 { [200, 30, 30] } else { [100, 100, 100] });
        let mask = classify(&background, &scene);

        assert_eq!(*mask.get(0, 0), PixelClass::Foreground);
        assert_eq!(*mask.get(3, 7), PixelClass::Foreground);
        assert_eq!(*mask.get(4, 0), PixelClass::Background);
    }

    #[test]
    fn test_darkened_background_is_shadow() {
        let background = Image::filled(4, 4, [200, 200, 200]);
        let scene = Image::filled(4, 4, [100, 100, 100]);
        let mask = classify(&background, &scene);
        assert!(mask.pixels().iter().all(|&c| c == PixelClass::Shadow));
    }

    #[test]
    fn test_shadow_detection_can_be_disabled() {
        let background = Image::filled(4, 4, [200, 200, 200]);
        let scene = Image::filled(4, 4, [100, 100, 100]);
        let config = SubtractorConfig {
            detect_shadows: false,
            ..Default::default()
        };
        let mut model = GaussianMixtureModel::new(4, 4, config);
        model.apply(&background).unwrap();
        let mask = model.apply(&scene).unwrap();
        assert!(mask.pixels().iter().all(|&c| c == PixelClass::Foreground));
    }

    #[test]
    fn test_frame_size_mismatch() {
        let mut model = GaussianMixtureModel::new(4, 4, SubtractorConfig::default());
        let result = model.apply(&Image::filled(5, 4, [0, 0, 0]));
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
