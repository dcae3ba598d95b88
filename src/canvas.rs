//! Drawing surface used by the rasterizer, the badge compositor and every
//! [`Drawable`](crate::Drawable).
//!
//! A [`Canvas`] binds a target [`Pixmap`] for the duration of one draw. It
//! carries the current transform and a save/restore stack, and exposes the
//! handful of primitives icon sources need. Dropping the canvas releases the
//! target, so nothing outlives a single render.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    Color, FillRule, FilterQuality, IntSize, Mask, Paint, Path, Pixmap, PixmapMut, PixmapPaint,
    PixmapRef, Rect, Transform,
};
use resvg::usvg;

use crate::error::{Error, Result};

// ============================================================================
// Canvas
// ============================================================================

/// A drawing target bound to a pixmap.
pub struct Canvas<'a> {
    pixmap: PixmapMut<'a>,
    transform: Transform,
    saved: Vec<Transform>,
    quality: FilterQuality,
}

impl<'a> Canvas<'a> {
    /// Binds a canvas to `target`. Bitmaps are sampled bilinearly.
    pub fn new(target: &'a mut Pixmap) -> Self {
        Self {
            pixmap: target.as_mut(),
            transform: Transform::identity(),
            saved: Vec::new(),
            quality: FilterQuality::Bilinear,
        }
    }

    /// Width of the bound target in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height of the bound target in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The transform applied to every draw call.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Pushes the current transform so it can be restored later.
    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    /// Pops the most recently saved transform. Unbalanced calls reset to
    /// identity.
    pub fn restore(&mut self) {
        self.transform = self.saved.pop().unwrap_or_default();
    }

    /// Pre-concatenates a scale around the pivot `(px, py)`.
    pub fn scale(&mut self, sx: f32, sy: f32, px: f32, py: f32) {
        self.transform = self
            .transform
            .pre_translate(px, py)
            .pre_scale(sx, sy)
            .pre_translate(-px, -py);
    }

    /// Draws `src` stretched into `dst`.
    pub fn draw_pixmap(&mut self, src: PixmapRef<'_>, dst: Rect) {
        let sx = dst.width() / src.width() as f32;
        let sy = dst.height() / src.height() as f32;
        let transform = self
            .transform
            .pre_translate(dst.left(), dst.top())
            .pre_scale(sx, sy);
        let paint = PixmapPaint {
            quality: self.quality,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(0, 0, src, &paint, transform, None);
    }

    /// Fills `dst` with a solid color.
    pub fn fill_rect(&mut self, dst: Rect, color: Color) {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.pixmap.fill_rect(dst, &paint, self.transform, None);
    }

    /// Renders an SVG tree stretched into `dst`.
    pub fn render_svg(&mut self, tree: &usvg::Tree, dst: Rect) {
        let size = tree.size();
        let transform = self
            .transform
            .pre_translate(dst.left(), dst.top())
            .pre_scale(dst.width() / size.width(), dst.height() / size.height());
        resvg::render(tree, transform, &mut self.pixmap);
    }

    /// Runs `draw` on an offscreen layer and composites the result through
    /// `clip`, which is interpreted in the current coordinate space.
    pub fn draw_masked<F>(&mut self, clip: &Path, draw: F)
    where
        F: FnOnce(&mut Canvas<'_>),
    {
        let (width, height) = (self.width(), self.height());
        let (Some(mut layer), Some(mut mask)) = (Pixmap::new(width, height), Mask::new(width, height))
        else {
            return;
        };

        {
            let mut inner = Canvas::new(&mut layer);
            inner.transform = self.transform;
            inner.quality = self.quality;
            draw(&mut inner);
        }

        mask.fill_path(clip, FillRule::Winding, true, self.transform);
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            Some(&mask),
        );
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Converts a straight-alpha image into a premultiplied pixmap.
pub fn rgba_image_to_pixmap(image: RgbaImage) -> Result<Pixmap> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(Error::InvalidDimensions { width, height })?;

    let mut data = image.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }

    Pixmap::from_vec(data, size).ok_or(Error::InvalidDimensions { width, height })
}

/// Converts a premultiplied pixmap into a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::PathBuilder;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn scale_about_pivot_keeps_pivot_fixed() {
        let mut target = Pixmap::new(10, 10).unwrap();
        let mut canvas = Canvas::new(&mut target);
        canvas.scale(0.5, 0.5, 5.0, 5.0);

        let mut point = [resvg::tiny_skia::Point::from_xy(5.0, 5.0)];
        canvas.transform().map_points(&mut point);
        assert_eq!((point[0].x, point[0].y), (5.0, 5.0));
    }

    #[test]
    fn restore_pops_saved_transform() {
        let mut target = Pixmap::new(4, 4).unwrap();
        let mut canvas = Canvas::new(&mut target);
        canvas.save();
        canvas.scale(2.0, 2.0, 0.0, 0.0);
        assert_ne!(canvas.transform(), Transform::identity());
        canvas.restore();
        assert_eq!(canvas.transform(), Transform::identity());

        // Unbalanced restore falls back to identity
        canvas.scale(3.0, 3.0, 0.0, 0.0);
        canvas.restore();
        assert_eq!(canvas.transform(), Transform::identity());
    }

    #[test]
    fn fill_rect_respects_transform() {
        let mut target = Pixmap::new(10, 10).unwrap();
        {
            let mut canvas = Canvas::new(&mut target);
            canvas.scale(0.5, 0.5, 0.0, 0.0);
            canvas.fill_rect(Rect::from_ltrb(0.0, 0.0, 10.0, 10.0).unwrap(), Color::BLACK);
        }
        assert_eq!(alpha_at(&target, 2, 2), 255);
        assert_eq!(alpha_at(&target, 7, 7), 0);
    }

    #[test]
    fn draw_masked_clips_to_path() {
        let mut target = Pixmap::new(10, 10).unwrap();
        let clip = PathBuilder::from_rect(Rect::from_ltrb(0.0, 0.0, 5.0, 10.0).unwrap());
        {
            let mut canvas = Canvas::new(&mut target);
            canvas.draw_masked(&clip, |layer| {
                layer.fill_rect(Rect::from_ltrb(0.0, 0.0, 10.0, 10.0).unwrap(), Color::WHITE);
            });
        }
        assert_eq!(alpha_at(&target, 2, 5), 255);
        assert_eq!(alpha_at(&target, 7, 5), 0);
    }

    #[test]
    fn image_conversion_premultiplies() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 128]));
        let pixmap = rgba_image_to_pixmap(img).unwrap();
        let px = pixmap.pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 128);

        let back = pixmap_to_rgba_image(&pixmap);
        assert_eq!(back.get_pixel(1, 1).0, [255, 0, 0, 128]);
    }

    #[test]
    fn empty_image_is_rejected() {
        let result = rgba_image_to_pixmap(RgbaImage::new(0, 4));
        assert!(matches!(
            result,
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        ));
    }
}
