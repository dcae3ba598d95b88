//! Icon source types.
//!
//! An icon handed to the factory is an [`IconSource`]: a borrowed view over
//! caller-owned data that is either a plain raster, a two-layer adaptive
//! icon, a legacy icon wrapped into the adaptive shape, or any other
//! [`Drawable`]. Sources carry no bounds of their own; the rasterizer passes
//! the target rectangle to every draw, so rendering never mutates the
//! caller's icon.

use std::fmt;
use std::path::Path;

use image::RgbaImage;
use palette::Srgba;
use resvg::tiny_skia::{Color, Pixmap, Rect};

use crate::canvas::{Canvas, rgba_image_to_pixmap};
use crate::error::Result;
use crate::mask::IconMask;
use crate::svg::SvgIcon;
use crate::wrapper::WrappedIcon;

/// Density that intrinsic sizes are expressed in.
pub const BASELINE_DENSITY: u32 = 160;

/// Fraction of the icon side that adaptive layers extend past the mask on
/// every edge.
pub const EXTRA_INSET_PERCENTAGE: f32 = 0.25;

// ============================================================================
// Geometry
// ============================================================================

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// A rectangle in unit icon space.
///
/// Normalizers report visual bounds as insets: each field is the fraction
/// of the icon side between that edge of the canvas and the visible
/// content. A full-bleed icon has all four insets at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

// ============================================================================
// Drawable
// ============================================================================

/// Anything that can report an intrinsic size and draw itself into a
/// rectangle.
pub trait Drawable: fmt::Debug + Send + Sync {
    /// Natural size of the content, or `None` when it has none.
    fn intrinsic_size(&self) -> Option<SizePx>;

    /// Draws the content stretched into `bounds`.
    fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect);
}

/// A flat color fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorLayer {
    pub color: Srgba<u8>,
}

impl ColorLayer {
    pub fn new(color: Srgba<u8>) -> Self {
        Self { color }
    }
}

impl Drawable for ColorLayer {
    fn intrinsic_size(&self) -> Option<SizePx> {
        None
    }

    fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect) {
        let c = self.color;
        canvas.fill_rect(bounds, Color::from_rgba8(c.red, c.green, c.blue, c.alpha));
    }
}

// ============================================================================
// RasterIcon
// ============================================================================

/// An existing pixel buffer, optionally tagged with the density it was
/// produced for.
#[derive(Debug, Clone)]
pub struct RasterIcon {
    pixmap: Pixmap,
    density: Option<u32>,
}

impl RasterIcon {
    /// Creates a raster icon from straight-alpha RGBA pixels.
    pub fn new(image: RgbaImage) -> Result<Self> {
        Ok(Self {
            pixmap: rgba_image_to_pixmap(image)?,
            density: None,
        })
    }

    /// Wraps an already premultiplied pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            density: None,
        }
    }

    /// Decodes an encoded image (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(image::load_from_memory(bytes)?.to_rgba8())
    }

    /// Decodes an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(image::open(path)?.to_rgba8())
    }

    /// Tags the raster with the density (dpi) it was authored for.
    pub fn with_density(mut self, density: u32) -> Self {
        self.density = (density > 0).then_some(density);
        self
    }

    pub fn density(&self) -> Option<u32> {
        self.density
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Pixel dimensions of the underlying buffer.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.pixmap.width(), self.pixmap.height())
    }
}

impl Drawable for RasterIcon {
    /// Pixel size rescaled from the source density to [`BASELINE_DENSITY`].
    /// Untagged rasters report their pixel size.
    fn intrinsic_size(&self) -> Option<SizePx> {
        let SizePx { width, height } = self.dimensions();
        let scale = |v: u32| match self.density {
            Some(d) => ((v as u64 * BASELINE_DENSITY as u64 + d as u64 / 2) / d as u64) as u32,
            None => v,
        };
        Some(SizePx::new(scale(width), scale(height)))
    }

    fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect) {
        canvas.draw_pixmap(self.pixmap.as_ref(), bounds);
    }
}

// ============================================================================
// AdaptiveIcon
// ============================================================================

/// A two-layer icon clipped by a mask shape.
#[derive(Debug)]
pub struct AdaptiveIcon {
    pub background: Box<dyn Drawable>,
    pub foreground: Box<dyn Drawable>,
    pub mask: IconMask,
}

impl AdaptiveIcon {
    pub fn new(background: impl Drawable + 'static, foreground: impl Drawable + 'static) -> Self {
        Self {
            background: Box::new(background),
            foreground: Box::new(foreground),
            mask: IconMask::default(),
        }
    }

    pub fn with_mask(mut self, mask: IconMask) -> Self {
        self.mask = mask;
        self
    }
}

impl Drawable for AdaptiveIcon {
    /// The foreground layer's size without the extra layer inset.
    fn intrinsic_size(&self) -> Option<SizePx> {
        let layer = self.foreground.intrinsic_size()?;
        let shrink = |v: u32| (v as f32 / (1.0 + 2.0 * EXTRA_INSET_PERCENTAGE)).round() as u32;
        Some(SizePx::new(shrink(layer.width), shrink(layer.height)))
    }

    fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect) {
        draw_adaptive_layers(canvas, bounds, self.mask, |layer, layer_bounds| {
            self.background.draw(layer, layer_bounds);
            self.foreground.draw(layer, layer_bounds);
        });
    }
}

/// Expands `bounds` by [`EXTRA_INSET_PERCENTAGE`] and draws the layers
/// through `mask` fitted to `bounds`.
pub(crate) fn draw_adaptive_layers<F>(canvas: &mut Canvas<'_>, bounds: Rect, mask: IconMask, draw: F)
where
    F: FnOnce(&mut Canvas<'_>, Rect),
{
    let Some(clip) = mask.path(bounds) else {
        return;
    };
    let dx = bounds.width() * EXTRA_INSET_PERCENTAGE;
    let dy = bounds.height() * EXTRA_INSET_PERCENTAGE;
    let Some(layer_bounds) = Rect::from_ltrb(
        bounds.left() - dx,
        bounds.top() - dy,
        bounds.right() + dx,
        bounds.bottom() + dy,
    ) else {
        return;
    };

    canvas.draw_masked(&clip, |layer| draw(layer, layer_bounds));
}

// ============================================================================
// IconSource
// ============================================================================

/// A borrowed icon handed to the factory for one render.
#[derive(Debug, Clone, Copy)]
pub enum IconSource<'a> {
    /// A plain pixel buffer.
    Raster(&'a RasterIcon),
    /// A two-layer adaptive icon.
    Adaptive(&'a AdaptiveIcon),
    /// A legacy icon embedded in the wrapper template.
    Wrapped(WrappedIcon<'a>),
    /// Anything else that can draw itself.
    Drawable(&'a dyn Drawable),
}

impl<'a> IconSource<'a> {
    /// Returns true for sources shaped by an adaptive mask.
    pub fn is_adaptive(&self) -> bool {
        match self {
            Self::Adaptive(_) | Self::Wrapped(_) => true,
            Self::Raster(_) | Self::Drawable(_) => false,
        }
    }

    /// Natural size of the source; sizes with a zero side count as unknown.
    pub fn intrinsic_size(&self) -> Option<SizePx> {
        let size = match self {
            Self::Raster(icon) => icon.intrinsic_size(),
            Self::Adaptive(icon) => icon.intrinsic_size(),
            Self::Wrapped(icon) => icon.intrinsic_size(),
            Self::Drawable(icon) => icon.intrinsic_size(),
        };
        size.filter(|size| size.width > 0 && size.height > 0)
    }

    pub fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect) {
        match self {
            Self::Raster(icon) => icon.draw(canvas, bounds),
            Self::Adaptive(icon) => icon.draw(canvas, bounds),
            Self::Wrapped(icon) => icon.draw(canvas, bounds),
            Self::Drawable(icon) => icon.draw(canvas, bounds),
        }
    }
}

impl<'a> From<&'a RasterIcon> for IconSource<'a> {
    fn from(icon: &'a RasterIcon) -> Self {
        Self::Raster(icon)
    }
}

impl<'a> From<&'a AdaptiveIcon> for IconSource<'a> {
    fn from(icon: &'a AdaptiveIcon) -> Self {
        Self::Adaptive(icon)
    }
}

impl<'a> From<&'a SvgIcon> for IconSource<'a> {
    fn from(icon: &'a SvgIcon) -> Self {
        Self::Drawable(icon)
    }
}

// ============================================================================
// OwnedIcon
// ============================================================================

/// An icon owned by the crate or a resolver, viewable as an [`IconSource`].
#[derive(Debug)]
pub enum OwnedIcon {
    Raster(RasterIcon),
    Adaptive(AdaptiveIcon),
    Svg(SvgIcon),
}

impl OwnedIcon {
    pub fn as_source(&self) -> IconSource<'_> {
        match self {
            Self::Raster(icon) => IconSource::Raster(icon),
            Self::Adaptive(icon) => IconSource::Adaptive(icon),
            Self::Svg(icon) => IconSource::Drawable(icon),
        }
    }
}

impl From<RasterIcon> for OwnedIcon {
    fn from(icon: RasterIcon) -> Self {
        Self::Raster(icon)
    }
}

impl From<AdaptiveIcon> for OwnedIcon {
    fn from(icon: AdaptiveIcon) -> Self {
        Self::Adaptive(icon)
    }
}

impl From<SvgIcon> for OwnedIcon {
    fn from(icon: SvgIcon) -> Self {
        Self::Svg(icon)
    }
}
