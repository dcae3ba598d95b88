//! Reshaping legacy icons into the adaptive mask.
//!
//! A non-adaptive icon is embedded, pre-scaled, as the foreground of a
//! two-layer template whose background is a flat fill. The template is built
//! once per factory and mutated in place for every icon it wraps, so a
//! [`WrappedIcon`] is only valid until the next wrap.

use palette::Srgba;
use resvg::tiny_skia::Rect;

use crate::canvas::Canvas;
use crate::icon::{ColorLayer, Drawable, IconSource, SizePx, draw_adaptive_layers};
use crate::mask::IconMask;
use crate::provider::{NormalizationResult, ScaleNormalizer};

/// Scale of a legacy icon inside the (inset-expanded) foreground layer.
pub const LEGACY_ICON_SCALE: f32 = 0.46;

/// Background used when no opaque wrapper color is configured.
pub const DEFAULT_WRAPPER_BACKGROUND: Srgba<u8> = Srgba::new(255, 255, 255, 255);

/// Returns `color` if fully opaque, the default white otherwise.
pub fn coerce_wrapper_background(color: Srgba<u8>) -> Srgba<u8> {
    if color.alpha < u8::MAX {
        DEFAULT_WRAPPER_BACKGROUND
    } else {
        color
    }
}

// ============================================================================
// WrapperTemplate
// ============================================================================

/// The reusable two-layer shape legacy icons are embedded into.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperTemplate {
    background: ColorLayer,
    scale_x: f32,
    scale_y: f32,
    mask: IconMask,
}

impl WrapperTemplate {
    pub fn new(mask: IconMask) -> Self {
        Self {
            background: ColorLayer::new(DEFAULT_WRAPPER_BACKGROUND),
            scale_x: LEGACY_ICON_SCALE,
            scale_y: LEGACY_ICON_SCALE,
            mask,
        }
    }

    /// Sets the foreground scale for an icon normalized to `scale`.
    ///
    /// The axis of the shorter side is reduced by the aspect ratio so the
    /// icon keeps its proportions inside the square layer.
    pub fn set_foreground_scale(&mut self, scale: f32, intrinsic: Option<SizePx>) {
        self.scale_x = scale * LEGACY_ICON_SCALE;
        self.scale_y = scale * LEGACY_ICON_SCALE;
        if let Some(SizePx { width, height }) = intrinsic {
            let (w, h) = (width as f32, height as f32);
            if h > w && w > 0.0 {
                self.scale_x *= w / h;
            } else if w > h && h > 0.0 {
                self.scale_y *= h / w;
            }
        }
    }

    pub fn set_background(&mut self, color: Srgba<u8>) {
        self.background.color = color;
    }

    pub fn background(&self) -> Srgba<u8> {
        self.background.color
    }

    pub fn foreground_scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    /// Views `foreground` through this template.
    pub fn wrap<'a>(&'a self, foreground: &'a IconSource<'a>) -> WrappedIcon<'a> {
        WrappedIcon {
            template: self,
            foreground,
        }
    }
}

// ============================================================================
// WrappedIcon
// ============================================================================

/// A legacy icon seen through the wrapper template.
#[derive(Debug, Clone, Copy)]
pub struct WrappedIcon<'a> {
    template: &'a WrapperTemplate,
    foreground: &'a IconSource<'a>,
}

impl<'a> WrappedIcon<'a> {
    pub fn template(&self) -> &'a WrapperTemplate {
        self.template
    }

    pub fn foreground(&self) -> &'a IconSource<'a> {
        self.foreground
    }

    pub fn intrinsic_size(&self) -> Option<SizePx> {
        self.foreground.intrinsic_size()
    }

    pub fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect) {
        let template = self.template;
        draw_adaptive_layers(canvas, bounds, template.mask, |layer, layer_bounds| {
            template.background.draw(layer, layer_bounds);

            let cx = layer_bounds.left() + layer_bounds.width() / 2.0;
            let cy = layer_bounds.top() + layer_bounds.height() / 2.0;
            layer.save();
            layer.scale(template.scale_x, template.scale_y, cx, cy);
            self.foreground.draw(layer, layer_bounds);
            layer.restore();
        });
    }
}

// ============================================================================
// LegacyIconWrapper
// ============================================================================

/// Owns the lazily built wrapper template of one factory.
#[derive(Debug, Clone)]
pub struct LegacyIconWrapper {
    template: Option<WrapperTemplate>,
    mask: IconMask,
    supported: bool,
}

impl LegacyIconWrapper {
    /// `supported` is false on hosts without adaptive icons, which turns
    /// wrapping into a pass-through.
    pub fn new(mask: IconMask, supported: bool) -> Self {
        Self {
            template: None,
            mask,
            supported,
        }
    }

    /// The template, once the first icon has been wrapped.
    pub fn template(&self) -> Option<&WrapperTemplate> {
        self.template.as_ref()
    }

    /// Normalizes `icon`, wrapping it into the adaptive shape first when
    /// `shrink_non_adaptive` is set and the icon is not adaptive already.
    ///
    /// A wrapped icon is normalized twice: once to size the foreground, and
    /// again because the wrapped shape has different visual bounds.
    pub fn normalize_and_wrap<'w>(
        &'w mut self,
        icon: &'w IconSource<'w>,
        shrink_non_adaptive: bool,
        background: Srgba<u8>,
        normalizer: &dyn ScaleNormalizer,
    ) -> (IconSource<'w>, NormalizationResult) {
        let normalized = normalizer.normalize(icon);
        if !shrink_non_adaptive || !self.supported || icon.is_adaptive() {
            return (*icon, normalized);
        }

        let mask = self.mask;
        let template = self.template.get_or_insert_with(|| {
            log::debug!("building legacy icon wrapper template ({mask:?})");
            WrapperTemplate::new(mask)
        });
        template.set_foreground_scale(normalized.scale, icon.intrinsic_size());
        template.set_background(background);

        let wrapped = IconSource::Wrapped(template.wrap(icon));
        let rewrapped = normalizer.normalize(&wrapped);
        log::trace!(
            "wrapped legacy icon: scale {:.3} -> {:.3}",
            normalized.scale,
            rewrapped.scale
        );
        (wrapped, rewrapped)
    }
}
