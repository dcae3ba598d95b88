//! Rasterizing icon sources onto the fixed-size canvas.

use resvg::tiny_skia::{Pixmap, Rect};

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::icon::{IconSource, SizePx};

/// Fits `intrinsic` into a `size`×`size` square, preserving aspect ratio and
/// centering the result.
///
/// The longer side spans the whole canvas; the shorter one is truncated to
/// whole pixels. Unknown intrinsic sizes fill the canvas.
pub fn fit_to_canvas(size: u32, intrinsic: Option<SizePx>) -> Option<Rect> {
    let (mut width, mut height) = (size, size);
    if let Some(SizePx { width: iw, height: ih }) = intrinsic.filter(|s| s.width > 0 && s.height > 0) {
        let ratio = iw as f32 / ih as f32;
        if iw > ih {
            height = (width as f32 / ratio) as u32;
        } else if ih > iw {
            width = (height as f32 * ratio) as u32;
        }
    }

    let left = (size - width) / 2;
    let top = (size - height) / 2;
    Rect::from_xywh(left as f32, top as f32, width as f32, height as f32)
}

/// Draws icon sources onto fresh `icon_bitmap_size`² transparent rasters.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    icon_bitmap_size: u32,
    blur_factor: f32,
    supports_adaptive_icons: bool,
    blank: Pixmap,
}

impl Rasterizer {
    pub fn new(icon_bitmap_size: u32, blur_factor: f32, supports_adaptive_icons: bool) -> Result<Self> {
        let blank = Pixmap::new(icon_bitmap_size, icon_bitmap_size).ok_or(Error::InvalidDimensions {
            width: icon_bitmap_size,
            height: icon_bitmap_size,
        })?;
        Ok(Self {
            icon_bitmap_size,
            blur_factor,
            supports_adaptive_icons,
            blank,
        })
    }

    pub fn icon_bitmap_size(&self) -> u32 {
        self.icon_bitmap_size
    }

    /// A fresh, fully transparent canvas.
    pub fn blank(&self) -> Pixmap {
        self.blank.clone()
    }

    /// Returns true when `icon` is drawn (and shadowed) as an adaptive icon
    /// on this host.
    pub fn treats_as_adaptive(&self, icon: &IconSource<'_>) -> bool {
        self.supports_adaptive_icons && icon.is_adaptive()
    }

    /// Inset of adaptive icons: wide enough for the shadow blur even at
    /// scale 1, and at least the margin the scale itself leaves.
    pub fn adaptive_offset(&self, scale: f32) -> u32 {
        let size = self.icon_bitmap_size as f32;
        let blur = (self.blur_factor * size).ceil() as u32;
        let scaled = (size * (1.0 - scale) / 2.0).round() as u32;
        blur.max(scaled)
    }

    /// Renders `icon` at `scale` onto a new raster.
    pub fn rasterize(&self, icon: &IconSource<'_>, scale: f32) -> Pixmap {
        let mut bitmap = self.blank();
        self.draw(icon, scale, &mut bitmap);
        bitmap
    }

    fn draw(&self, icon: &IconSource<'_>, scale: f32, target: &mut Pixmap) {
        let size = self.icon_bitmap_size;
        let mut canvas = Canvas::new(target);

        if self.treats_as_adaptive(icon) {
            let offset = self.adaptive_offset(scale);
            let far = size.saturating_sub(offset);
            if let Some(bounds) = Rect::from_ltrb(offset as f32, offset as f32, far as f32, far as f32) {
                icon.draw(&mut canvas, bounds);
            }
        } else if let Some(bounds) = fit_to_canvas(size, icon.intrinsic_size()) {
            let pivot = (size / 2) as f32;
            canvas.save();
            canvas.scale(scale, scale, pivot, pivot);
            icon.draw(&mut canvas, bounds);
            canvas.restore();
        }
    }
}
