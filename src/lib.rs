//! icon-factory: renders app icons into uniform, fixed-size rasters
//!
//! Icons arrive in every shape: legacy square bitmaps, two-layer adaptive
//! icons, vector drawables. An [`IconFactory`] normalizes their visual
//! weight, optionally reshapes legacy icons into the adaptive mask, draws
//! them onto an `iconBitmapSize`² canvas, bakes in a drop shadow, applies
//! provenance badges and extracts a dominant color.
//!
//! # Example
//!
//! ```
//! use icon_factory::{
//!     AdaptiveIcon, ColorLayer, FactoryConfig, IconFactory, IconMask, IconSource, RenderFlags,
//!     SvgIcon,
//! };
//! use palette::Srgba;
//!
//! let config = FactoryConfig::new()
//!     .with_icon_bitmap_size(108)
//!     .with_icon_mask(IconMask::Squircle);
//! let mut factory = IconFactory::new(config).unwrap();
//!
//! let glyph = SvgIcon::from_svg(
//!     r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><circle cx="12" cy="12" r="6" fill="#fff"/></svg>"##,
//! ).unwrap();
//! let icon = AdaptiveIcon::new(ColorLayer::new(Srgba::new(0, 121, 107, 255)), glyph);
//!
//! let info = factory.render_badged_icon(&IconSource::from(&icon), &RenderFlags::new().instant_app(true));
//! assert_eq!(info.raster().width(), 108);
//! ```
//!
//! # Legacy Icons
//!
//! Plain bitmaps can be wrapped into the adaptive shape on a configurable
//! background:
//!
//! ```
//! use icon_factory::{FactoryConfig, IconFactory, IconSource, RasterIcon, RenderFlags};
//! use image::{Rgba, RgbaImage};
//! use palette::Srgba;
//!
//! let mut factory = IconFactory::new(FactoryConfig::default()).unwrap();
//! factory.set_wrapper_background_color(Srgba::new(250, 250, 250, 255));
//!
//! let legacy = RasterIcon::new(RgbaImage::from_pixel(48, 48, Rgba([255, 87, 34, 255]))).unwrap();
//! let info = factory.render_badged_icon(
//!     &IconSource::from(&legacy),
//!     &RenderFlags::new().shrink_non_adaptive(true),
//! );
//! assert_eq!(info.raster().height(), 192);
//!
//! // Start the next batch from the defaults
//! factory.clear();
//! ```

mod badge;
mod canvas;
mod config;
mod error;
mod factory;
mod icon;
mod mask;
pub mod provider;
mod raster;
mod svg;
mod wrapper;

pub use badge::{
    BadgeCompositor, BadgedIcon, FixedSizeRaster, INSTANT_APP_BADGE_SVG, NoUserBadge,
    OverlayBadger, UserBadger, UserHandle,
};
pub use canvas::{Canvas, pixmap_to_rgba_image, rgba_image_to_pixmap};
pub use config::FactoryConfig;
pub use error::{Error, Result};
pub use factory::{BitmapInfo, IconFactory, RenderFlags};
pub use icon::{
    AdaptiveIcon, BASELINE_DENSITY, ColorLayer, Drawable, EXTRA_INSET_PERCENTAGE, IconSource,
    OwnedIcon, RasterIcon, RectF, SizePx,
};
pub use mask::IconMask;
pub use provider::{
    AlphaBoundsNormalizer, ColorExtractor, DominantColor, FixedScale, HueColorExtractor,
    NormalizationResult, ResourceResolver, ResourceTable, ScaleNormalizer, ShadowCompositor,
    ShadowGenerator, ShortcutIconResource,
};
pub use raster::{Rasterizer, fit_to_canvas};
pub use svg::SvgIcon;
pub use wrapper::{
    DEFAULT_WRAPPER_BACKGROUND, LEGACY_ICON_SCALE, LegacyIconWrapper, WrappedIcon,
    WrapperTemplate, coerce_wrapper_background,
};

pub use palette;
pub use resvg::tiny_skia;
