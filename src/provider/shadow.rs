//! Drop shadows for adaptive icons.

use resvg::tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::icon::RectF;

/// Default blur radius as a fraction of the icon side.
pub const BLUR_FACTOR: f32 = 0.5 / 48.0;

/// Default downward offset of the key shadow as a fraction of the icon side.
pub const KEY_SHADOW_DISTANCE: f32 = 1.0 / 48.0;

const KEY_SHADOW_ALPHA: u8 = 61;
const AMBIENT_SHADOW_ALPHA: u8 = 30;
const HALF_DISTANCE: f32 = 0.5;

/// Bakes a drop shadow into finished icon rasters.
pub trait ShadowCompositor: Send {
    /// Redraws `raster` with a shadow beneath its current content. The
    /// raster keeps its size.
    fn add_shadow(&self, raster: &mut Pixmap);

    /// Largest scale at which content with the given unit-space insets still
    /// leaves room for the shadow.
    fn scale_for_bounds(&self, bounds: &RectF) -> f32;
}

/// Two-part shadow: a soft ambient halo plus a key shadow cast downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowGenerator {
    blur_factor: f32,
    key_shadow_distance: f32,
}

impl Default for ShadowGenerator {
    fn default() -> Self {
        Self::new(BLUR_FACTOR, KEY_SHADOW_DISTANCE)
    }
}

impl ShadowGenerator {
    pub fn new(blur_factor: f32, key_shadow_distance: f32) -> Self {
        Self {
            blur_factor,
            key_shadow_distance,
        }
    }

    pub fn blur_factor(&self) -> f32 {
        self.blur_factor
    }

    /// A black pixmap the size of `source` whose alpha is the blurred source
    /// alpha scaled by `alpha`.
    fn shadow_layer(&self, source: &Pixmap, alpha: u8) -> Pixmap {
        let (width, height) = (source.width() as usize, source.height() as usize);
        let radius = (self.blur_factor * source.width() as f32).round() as usize;

        let mut mask: Vec<u8> = source.pixels().iter().map(|px| px.alpha()).collect();
        for _ in 0..3 {
            box_blur(&mut mask, width, height, radius);
        }

        let mut layer = source.clone();
        for (px, a) in layer.data_mut().chunks_exact_mut(4).zip(mask) {
            px[..3].fill(0);
            px[3] = ((a as u16 * alpha as u16 + 127) / 255) as u8;
        }
        layer
    }
}

impl ShadowCompositor for ShadowGenerator {
    fn add_shadow(&self, raster: &mut Pixmap) {
        let icon = raster.clone();
        let ambient = self.shadow_layer(&icon, AMBIENT_SHADOW_ALPHA);
        let key = self.shadow_layer(&icon, KEY_SHADOW_ALPHA);
        let key_offset = self.key_shadow_distance * raster.height() as f32;

        let paint = PixmapPaint::default();
        raster.fill(resvg::tiny_skia::Color::TRANSPARENT);
        raster.draw_pixmap(0, 0, ambient.as_ref(), &paint, Transform::identity(), None);
        raster.draw_pixmap(
            0,
            0,
            key.as_ref(),
            &paint,
            Transform::from_translate(0.0, key_offset),
            None,
        );
        raster.draw_pixmap(0, 0, icon.as_ref(), &paint, Transform::identity(), None);
    }

    fn scale_for_bounds(&self, bounds: &RectF) -> f32 {
        let mut scale = 1.0f32;

        // Left, top and right need the same room
        let min_side = bounds.left.min(bounds.right).min(bounds.top);
        if min_side < self.blur_factor {
            scale = (HALF_DISTANCE - self.blur_factor) / (HALF_DISTANCE - min_side);
        }

        let bottom_space = self.blur_factor + self.key_shadow_distance;
        if bounds.bottom < bottom_space {
            scale = scale.min((HALF_DISTANCE - bottom_space) / (HALF_DISTANCE - bounds.bottom));
        }
        scale
    }
}

/// One horizontal and one vertical running-sum pass with the given radius.
fn box_blur(values: &mut [u8], width: usize, height: usize, radius: usize) {
    if radius == 0 || width == 0 || height == 0 {
        return;
    }
    let window = (2 * radius + 1) as u32;
    let mut scratch = vec![0u8; values.len()];

    let blur_line = |src: &[u8], dst: &mut [u8], len: usize, stride: usize, start: usize| {
        let at = |i: isize| -> u32 {
            if i < 0 || i as usize >= len {
                0
            } else {
                src[start + i as usize * stride] as u32
            }
        };
        let mut sum: u32 = (-(radius as isize)..=radius as isize).map(at).sum();
        for i in 0..len {
            dst[start + i * stride] = ((sum + window / 2) / window) as u8;
            sum += at(i as isize + radius as isize + 1);
            sum -= at(i as isize - radius as isize);
        }
    };

    for y in 0..height {
        blur_line(values, &mut scratch, width, 1, y * width);
    }
    for x in 0..width {
        blur_line(&scratch, values, height, width, x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::{Color, Paint, Rect};

    fn icon_with_square(size: u32, inset: f32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(255, 0, 0, 255));
        let rect = Rect::from_ltrb(inset, inset, size as f32 - inset, size as f32 - inset).unwrap();
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        pixmap
    }

    #[test]
    fn full_bleed_bounds_reserve_shadow_room() {
        let shadow = ShadowGenerator::default();
        let scale = shadow.scale_for_bounds(&RectF::default());
        assert!((scale - (1.0 - 3.0 / 48.0)).abs() < 1e-5);
    }

    #[test]
    fn generous_bounds_need_no_scale() {
        let shadow = ShadowGenerator::default();
        assert_eq!(shadow.scale_for_bounds(&RectF::new(0.1, 0.1, 0.1, 0.1)), 1.0);
    }

    #[test]
    fn shadow_keeps_icon_and_adds_halo_below() {
        let mut raster = icon_with_square(96, 16.0);
        ShadowGenerator::default().add_shadow(&mut raster);

        assert_eq!(raster.width(), 96);
        let center = raster.pixel(48, 48).unwrap();
        assert_eq!((center.red(), center.alpha()), (255, 255));

        // Just below the icon the key shadow shows through
        let below = raster.pixel(48, 81).unwrap();
        assert!(below.alpha() > 0);
        assert_eq!(below.red(), 0);

        // Far corners stay clear
        assert_eq!(raster.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn box_blur_spreads_and_preserves_flat_regions() {
        let mut values = vec![0u8; 9 * 9];
        values[4 * 9 + 4] = 255;
        box_blur(&mut values, 9, 9, 1);
        assert!(values[4 * 9 + 4] < 255);
        assert!(values[4 * 9 + 5] > 0);

        let mut flat = vec![200u8; 16];
        box_blur(&mut flat, 4, 4, 0);
        assert!(flat.iter().all(|&v| v == 200));
    }
}
