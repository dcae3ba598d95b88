//! Visual-weight normalization.

use resvg::tiny_skia::{Pixmap, Rect};

use crate::canvas::Canvas;
use crate::icon::{IconSource, RectF};
use crate::raster::fit_to_canvas;

/// Pixels with less alpha than this are treated as empty space.
pub const MIN_VISIBLE_ALPHA: u8 = 40;

/// Largest share of the canvas an icon may cover before it is shrunk.
pub const MAX_SQUARE_AREA_FACTOR: f32 = 375.0 / 576.0;

/// Scale factor and visual bounds measured for one icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationResult {
    /// Multiplier in `(0, 1]` applied when rasterizing.
    pub scale: f32,
    /// Visible content as unit-space insets, when measured.
    pub bounds: Option<RectF>,
}

impl NormalizationResult {
    /// Creates a result, clamping `scale` into `(0, 1]`. Non-finite or
    /// non-positive scales become 1.
    pub fn new(scale: f32, bounds: Option<RectF>) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale.min(1.0)
        } else {
            1.0
        };
        Self { scale, bounds }
    }

    /// Full size, no measured bounds.
    pub fn unscaled() -> Self {
        Self::new(1.0, None)
    }
}

/// Computes the scale that makes icons of different ink density look the
/// same size.
pub trait ScaleNormalizer: Send {
    fn normalize(&self, icon: &IconSource<'_>) -> NormalizationResult;
}

// ============================================================================
// FixedScale
// ============================================================================

/// Reports the same result for every icon.
///
/// Useful when icons arrive pre-normalized, and in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScale {
    result: NormalizationResult,
}

impl FixedScale {
    pub fn new(scale: f32) -> Self {
        Self {
            result: NormalizationResult::new(scale, None),
        }
    }

    pub fn with_bounds(mut self, bounds: RectF) -> Self {
        self.result.bounds = Some(bounds);
        self
    }
}

impl ScaleNormalizer for FixedScale {
    fn normalize(&self, _icon: &IconSource<'_>) -> NormalizationResult {
        self.result
    }
}

// ============================================================================
// AlphaBoundsNormalizer
// ============================================================================

/// Measures visible coverage on a probe raster.
///
/// The icon is drawn the way the rasterizer would place it at scale 1 (full
/// square for adaptive icons, aspect-fitted otherwise). When the visible
/// pixels cover more than [`MAX_SQUARE_AREA_FACTOR`] of the probe, the icon
/// is scaled down so its covered area matches that factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaBoundsNormalizer {
    probe_size: u32,
}

impl AlphaBoundsNormalizer {
    pub fn new(probe_size: u32) -> Self {
        Self {
            probe_size: probe_size.max(1),
        }
    }

    pub fn probe_size(&self) -> u32 {
        self.probe_size
    }
}

impl ScaleNormalizer for AlphaBoundsNormalizer {
    fn normalize(&self, icon: &IconSource<'_>) -> NormalizationResult {
        let size = self.probe_size;
        let bounds = if icon.is_adaptive() {
            Rect::from_ltrb(0.0, 0.0, size as f32, size as f32)
        } else {
            fit_to_canvas(size, icon.intrinsic_size())
        };
        let (Some(bounds), Some(mut probe)) = (bounds, Pixmap::new(size, size)) else {
            return NormalizationResult::unscaled();
        };

        {
            let mut canvas = Canvas::new(&mut probe);
            icon.draw(&mut canvas, bounds);
        }

        let mut visible = 0u64;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (u32::MAX, u32::MAX, 0u32, 0u32);
        for (i, px) in probe.pixels().iter().enumerate() {
            if px.alpha() < MIN_VISIBLE_ALPHA {
                continue;
            }
            let (x, y) = (i as u32 % size, i as u32 / size);
            visible += 1;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if visible == 0 {
            return NormalizationResult::unscaled();
        }

        let side = size as f32;
        let coverage = visible as f32 / (side * side);
        let scale = if coverage > MAX_SQUARE_AREA_FACTOR {
            (MAX_SQUARE_AREA_FACTOR / coverage).sqrt()
        } else {
            1.0
        };
        let insets = RectF::new(
            min_x as f32 / side,
            min_y as f32 / side,
            1.0 - (max_x + 1) as f32 / side,
            1.0 - (max_y + 1) as f32 / side,
        );
        NormalizationResult::new(scale, Some(insets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::RasterIcon;
    use image::{Rgba, RgbaImage};

    #[test]
    fn result_scale_is_clamped() {
        assert_eq!(NormalizationResult::new(1.5, None).scale, 1.0);
        assert_eq!(NormalizationResult::new(0.0, None).scale, 1.0);
        assert_eq!(NormalizationResult::new(f32::NAN, None).scale, 1.0);
        assert_eq!(NormalizationResult::new(0.25, None).scale, 0.25);
    }

    #[test]
    fn fixed_scale_ignores_icon() {
        let icon = RasterIcon::new(RgbaImage::new(4, 4)).unwrap();
        let normalizer = FixedScale::new(0.7).with_bounds(RectF::default());
        let result = normalizer.normalize(&IconSource::Raster(&icon));
        assert_eq!(result.scale, 0.7);
        assert_eq!(result.bounds, Some(RectF::default()));
    }

    #[test]
    fn full_bleed_icon_is_shrunk() {
        let icon = RasterIcon::new(RgbaImage::from_pixel(48, 48, Rgba([0, 0, 0, 255]))).unwrap();
        let result = AlphaBoundsNormalizer::new(96).normalize(&IconSource::Raster(&icon));

        assert!((result.scale - MAX_SQUARE_AREA_FACTOR.sqrt()).abs() < 1e-3);
        assert_eq!(result.bounds, Some(RectF::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn small_icon_keeps_full_scale() {
        let mut img = RgbaImage::new(48, 48);
        for y in 18..30 {
            for x in 18..30 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let icon = RasterIcon::new(img).unwrap();
        let result = AlphaBoundsNormalizer::new(96).normalize(&IconSource::Raster(&icon));

        assert_eq!(result.scale, 1.0);
        let bounds = result.bounds.unwrap();
        assert!((bounds.left - 0.375).abs() < 0.02, "{bounds:?}");
        assert!((bounds.bottom - 0.375).abs() < 0.02, "{bounds:?}");
    }

    #[test]
    fn transparent_icon_is_unscaled() {
        let icon = RasterIcon::new(RgbaImage::new(8, 8)).unwrap();
        let result = AlphaBoundsNormalizer::new(32).normalize(&IconSource::Raster(&icon));
        assert_eq!(result, NormalizationResult::unscaled());
    }
}
