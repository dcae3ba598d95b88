//! Dominant color extraction.

use std::collections::HashMap;

use palette::{FromColor, Hsv, Srgb};
use resvg::tiny_skia::Pixmap;

/// Pixels more transparent than this are ignored.
const MIN_SAMPLE_ALPHA: u8 = 0x80;

/// A representative color summarizing a finished icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DominantColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl DominantColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn as_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// `#rrggbbaa` notation.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Summarizes a finished raster into one color. Must be a pure function of
/// the pixel data.
pub trait ColorExtractor: Send {
    fn extract(&self, raster: &Pixmap) -> DominantColor;
}

/// Picks the most vivid hue, then the most vivid exact color of that hue.
///
/// Up to `samples_per_axis`² pixels are sampled on a regular grid. Every
/// sampled pixel votes for its integer hue with weight saturation × value;
/// the winning hue's best-scoring color is returned. Fully transparent
/// rasters yield transparent black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HueColorExtractor {
    samples_per_axis: u32,
}

impl Default for HueColorExtractor {
    fn default() -> Self {
        Self {
            samples_per_axis: 20,
        }
    }
}

impl HueColorExtractor {
    pub fn new(samples_per_axis: u32) -> Self {
        Self {
            samples_per_axis: samples_per_axis.max(1),
        }
    }
}

impl ColorExtractor for HueColorExtractor {
    fn extract(&self, raster: &Pixmap) -> DominantColor {
        let (width, height) = (raster.width(), raster.height());
        let step_x = width.div_ceil(self.samples_per_axis).max(1);
        let step_y = height.div_ceil(self.samples_per_axis).max(1);

        let mut histogram = [0f32; 360];
        let mut samples: Vec<(u16, DominantColor, f32)> = Vec::new();

        for y in (0..height).step_by(step_y as usize) {
            for x in (0..width).step_by(step_x as usize) {
                let Some(px) = raster.pixel(x, y) else {
                    continue;
                };
                if px.alpha() < MIN_SAMPLE_ALPHA {
                    continue;
                }
                let c = px.demultiply();
                let rgb = Srgb::new(c.red(), c.green(), c.blue()).into_format::<f32>();
                let hsv = Hsv::from_color(rgb);
                let hue = (hsv.hue.into_positive_degrees() as u16).min(359);
                let score = hsv.saturation * hsv.value;

                histogram[hue as usize] += score;
                samples.push((
                    hue,
                    DominantColor::new(c.red(), c.green(), c.blue(), c.alpha()),
                    score,
                ));
            }
        }

        if samples.is_empty() {
            return DominantColor::default();
        }

        let mut best_hue = 0u16;
        let mut high_score = -1.0f32;
        for (hue, &score) in histogram.iter().enumerate() {
            if score > high_score {
                high_score = score;
                best_hue = hue as u16;
            }
        }

        // Accumulate per exact color, keeping first-seen order for ties
        let mut order: Vec<DominantColor> = Vec::new();
        let mut scores: HashMap<DominantColor, f32> = HashMap::new();
        for (hue, color, score) in samples {
            if hue != best_hue {
                continue;
            }
            let entry = scores.entry(color).or_insert_with(|| {
                order.push(color);
                0.0
            });
            *entry += score;
        }

        let mut best = DominantColor::default();
        let mut best_score = -1.0f32;
        for color in order {
            let score = scores[&color];
            if score > best_score {
                best_score = score;
                best = color;
            }
        }
        best
    }
}
