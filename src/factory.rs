//! The render pipeline turning icon sources into finished rasters.

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use palette::Srgba;
use resvg::tiny_skia::Pixmap;

use crate::badge::{
    BadgeCompositor, BadgedIcon, FixedSizeRaster, INSTANT_APP_BADGE_SVG, NoUserBadge, UserBadger,
    UserHandle,
};
use crate::canvas::pixmap_to_rgba_image;
use crate::config::FactoryConfig;
use crate::error::Result;
use crate::icon::{IconSource, OwnedIcon, RasterIcon};
use crate::provider::{
    AlphaBoundsNormalizer, ColorExtractor, DominantColor, HueColorExtractor, ResourceResolver,
    ScaleNormalizer, ShadowCompositor, ShadowGenerator, ShortcutIconResource,
};
use crate::raster::Rasterizer;
use crate::svg::SvgIcon;
use crate::wrapper::{DEFAULT_WRAPPER_BACKGROUND, LegacyIconWrapper, coerce_wrapper_background};

// ============================================================================
// RenderFlags
// ============================================================================

/// Per-call options of [`IconFactory::render_badged_icon`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderFlags {
    /// Wrap non-adaptive icons into the adaptive mask.
    pub shrink_non_adaptive_icons: bool,

    /// Draw the instant-app badge (ignored when a user badge applies).
    pub is_instant_app: bool,

    /// User the icon is rendered for. `None` means the factory's own user.
    pub user: Option<UserHandle>,

    /// Wrapper background for this call only. Non-opaque colors fall back to
    /// white; `None` uses the factory's current color.
    pub wrapper_background: Option<Srgba<u8>>,
}

impl RenderFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shrink_non_adaptive(mut self, shrink: bool) -> Self {
        self.shrink_non_adaptive_icons = shrink;
        self
    }

    pub fn instant_app(mut self, instant: bool) -> Self {
        self.is_instant_app = instant;
        self
    }

    pub fn for_user(mut self, user: impl Into<UserHandle>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_wrapper_background(mut self, color: Srgba<u8>) -> Self {
        self.wrapper_background = Some(color);
        self
    }
}

// ============================================================================
// BitmapInfo
// ============================================================================

/// A finished icon: the canvas-sized raster plus its summary color.
#[derive(Debug, Clone)]
pub struct BitmapInfo {
    raster: Pixmap,
    color: Option<DominantColor>,
}

impl BitmapInfo {
    /// Wraps `raster`, summarizing it with `extractor` when one is given.
    pub fn from_raster(raster: Pixmap, extractor: Option<&dyn ColorExtractor>) -> Self {
        let color = extractor.map(|extractor| extractor.extract(&raster));
        Self { raster, color }
    }

    /// Premultiplied RGBA8 pixels.
    pub fn raster(&self) -> &Pixmap {
        &self.raster
    }

    pub fn color(&self) -> Option<DominantColor> {
        self.color
    }

    pub fn into_raster(self) -> Pixmap {
        self.raster
    }

    /// Straight-alpha copy of the raster.
    pub fn to_rgba_image(&self) -> RgbaImage {
        pixmap_to_rgba_image(&self.raster)
    }

    /// Encodes the raster as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rgba_image()
            .save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

// ============================================================================
// IconFactory
// ============================================================================

/// Renders icon sources into fixed-size, normalized, shadowed and badged
/// rasters.
///
/// A factory owns mutable scratch state (the wrapper template, the wrapper
/// color and the color-extraction switch), so rendering takes `&mut self`.
/// Use one factory per worker thread.
///
/// # Pipeline
///
/// 1. **Wrap** legacy icons into the adaptive mask when asked to
/// 2. **Normalize** the (possibly wrapped) icon to a scale
/// 3. **Rasterize** onto a fresh `iconBitmapSize`² canvas
/// 4. **Shadow** adaptive icons
/// 5. **Badge** for other users or instant apps
/// 6. **Extract** the dominant color
///
/// # Example
///
/// ```
/// use icon_factory::{FactoryConfig, IconFactory, IconSource, RasterIcon, RenderFlags};
/// use image::{Rgba, RgbaImage};
///
/// let mut factory = IconFactory::new(FactoryConfig::new().with_icon_bitmap_size(96)).unwrap();
/// let icon = RasterIcon::new(RgbaImage::from_pixel(48, 48, Rgba([200, 30, 30, 255]))).unwrap();
///
/// let info = factory.render_badged_icon(
///     &IconSource::from(&icon),
///     &RenderFlags::new().shrink_non_adaptive(true),
/// );
/// assert_eq!(info.raster().width(), 96);
/// assert!(info.color().is_some());
/// ```
pub struct IconFactory {
    config: FactoryConfig,
    rasterizer: Rasterizer,
    wrapper: LegacyIconWrapper,
    badges: BadgeCompositor,
    instant_app_badge: OwnedIcon,
    normalizer: Box<dyn ScaleNormalizer>,
    shadow: Box<dyn ShadowCompositor>,
    color_extractor: Box<dyn ColorExtractor>,
    user_badger: Box<dyn UserBadger>,
    wrapper_background: Srgba<u8>,
    color_extraction_disabled: bool,
}

impl IconFactory {
    /// Creates a factory with the default providers.
    pub fn new(config: FactoryConfig) -> Result<Self> {
        config.validate()?;
        let size = config.icon_bitmap_size;
        log::debug!(
            "creating icon factory: {size}px, badge {}px, mask {:?}",
            config.badge_size,
            config.icon_mask
        );

        Ok(Self {
            rasterizer: Rasterizer::new(size, config.blur_factor, config.supports_adaptive_icons)?,
            wrapper: LegacyIconWrapper::new(config.icon_mask, config.supports_adaptive_icons),
            badges: BadgeCompositor::new(size, config.badge_size),
            instant_app_badge: SvgIcon::from_svg(INSTANT_APP_BADGE_SVG)?.into(),
            normalizer: Box::new(AlphaBoundsNormalizer::new(size)),
            shadow: Box::new(ShadowGenerator::new(
                config.blur_factor,
                config.key_shadow_distance,
            )),
            color_extractor: Box::new(HueColorExtractor::default()),
            user_badger: Box::new(NoUserBadge),
            wrapper_background: DEFAULT_WRAPPER_BACKGROUND,
            color_extraction_disabled: false,
            config,
        })
    }

    pub fn with_normalizer(mut self, normalizer: impl ScaleNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_shadow_compositor(mut self, shadow: impl ShadowCompositor + 'static) -> Self {
        self.shadow = Box::new(shadow);
        self
    }

    pub fn with_color_extractor(mut self, extractor: impl ColorExtractor + 'static) -> Self {
        self.color_extractor = Box::new(extractor);
        self
    }

    pub fn with_user_badger(mut self, badger: impl UserBadger + 'static) -> Self {
        self.user_badger = Box::new(badger);
        self
    }

    /// Replaces the built-in instant-app badge.
    pub fn with_instant_app_badge(mut self, badge: impl Into<OwnedIcon>) -> Self {
        self.instant_app_badge = badge.into();
        self
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn icon_bitmap_size(&self) -> u32 {
        self.config.icon_bitmap_size
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Sets the background of wrapped legacy icons. Colors that are not
    /// fully opaque are replaced by white.
    pub fn set_wrapper_background_color(&mut self, color: Srgba<u8>) {
        self.wrapper_background = coerce_wrapper_background(color);
    }

    pub fn wrapper_background_color(&self) -> Srgba<u8> {
        self.wrapper_background
    }

    /// Stops color extraction until the next [`clear`](Self::clear).
    pub fn disable_color_extraction(&mut self) {
        self.color_extraction_disabled = true;
    }

    pub fn is_color_extraction_disabled(&self) -> bool {
        self.color_extraction_disabled
    }

    /// Resets the wrapper color and the color-extraction switch. Call before
    /// each batch of renders.
    pub fn clear(&mut self) {
        self.wrapper_background = DEFAULT_WRAPPER_BACKGROUND;
        self.color_extraction_disabled = false;
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Runs the full pipeline on `icon`.
    pub fn render_badged_icon(&mut self, icon: &IconSource<'_>, flags: &RenderFlags) -> BitmapInfo {
        self.render_badged_icon_with_scale(icon, flags).0
    }

    /// Like [`render_badged_icon`](Self::render_badged_icon), also returning
    /// the normalization scale the icon was drawn at.
    pub fn render_badged_icon_with_scale(
        &mut self,
        icon: &IconSource<'_>,
        flags: &RenderFlags,
    ) -> (BitmapInfo, f32) {
        let background = flags
            .wrapper_background
            .map(coerce_wrapper_background)
            .unwrap_or(self.wrapper_background);

        let (raster, scale) = {
            let (source, normalized) = self.wrapper.normalize_and_wrap(
                icon,
                flags.shrink_non_adaptive_icons,
                background,
                self.normalizer.as_ref(),
            );
            let mut raster = self.rasterizer.rasterize(&source, normalized.scale);
            if self.rasterizer.treats_as_adaptive(&source) {
                self.shadow.add_shadow(&mut raster);
            }
            (raster, normalized.scale)
        };
        log::debug!("rendered icon at scale {scale:.3}");

        let raster = match flags.user.filter(|user| *user != self.config.own_user) {
            Some(user) => self.apply_user_badge(raster, user),
            None if flags.is_instant_app => {
                let mut raster = raster;
                log::trace!("drawing instant-app badge");
                self.badges
                    .badge_with_drawable(&mut raster, &self.instant_app_badge.as_source());
                raster
            }
            None => raster,
        };

        (self.finish(raster), scale)
    }

    /// Resolves a legacy shortcut icon and renders it for the own user.
    ///
    /// Stale shortcuts routinely point at resources that no longer exist, so
    /// lookup failures yield `None` instead of an error.
    pub fn render_from_legacy_resource(
        &mut self,
        resolver: &dyn ResourceResolver,
        resource: &ShortcutIconResource,
    ) -> Option<BitmapInfo> {
        let icon = match resolver.resolve_icon(
            &resource.package_name,
            &resource.resource_name,
            self.config.fill_res_icon_dpi,
        ) {
            Ok(icon) => icon,
            Err(err) => {
                log::debug!("skipping legacy shortcut icon: {err}");
                return None;
            }
        };
        Some(self.render_badged_icon(&icon, &RenderFlags::default()))
    }

    /// Rasterizes `icon` without shadow or badge, leaving room for a shadow
    /// added later.
    pub fn render_scaled_without_shadow(
        &mut self,
        icon: &IconSource<'_>,
        shrink_non_adaptive_icons: bool,
    ) -> Pixmap {
        let background = self.wrapper_background;
        let (source, normalized) = self.wrapper.normalize_and_wrap(
            icon,
            shrink_non_adaptive_icons,
            background,
            self.normalizer.as_ref(),
        );
        let scale = normalized
            .scale
            .min(self.shadow.scale_for_bounds(&normalized.bounds.unwrap_or_default()));
        log::trace!("shadowless scale {scale:.3} (normalized {:.3})", normalized.scale);
        self.rasterizer.rasterize(&source, scale)
    }

    /// The scale [`render_scaled_without_shadow`](Self::render_scaled_without_shadow)
    /// would draw `icon` at.
    pub fn scale_without_shadow(&mut self, icon: &IconSource<'_>, shrink_non_adaptive_icons: bool) -> f32 {
        let background = self.wrapper_background;
        let (_, normalized) = self.wrapper.normalize_and_wrap(
            icon,
            shrink_non_adaptive_icons,
            background,
            self.normalizer.as_ref(),
        );
        normalized
            .scale
            .min(self.shadow.scale_for_bounds(&normalized.bounds.unwrap_or_default()))
    }

    /// Turns an existing raster into a result. Canvas-sized rasters are
    /// kept as-is; anything else is rasterized at full scale. No color is
    /// extracted.
    pub fn create_icon_bitmap(&self, icon: &RasterIcon) -> BitmapInfo {
        let size = self.config.icon_bitmap_size;
        let pixmap = icon.pixmap();
        let raster = if pixmap.width() == size && pixmap.height() == size {
            pixmap.clone()
        } else {
            self.rasterizer.rasterize(&IconSource::Raster(icon), 1.0)
        };
        BitmapInfo::from_raster(raster, None)
    }

    /// Draws `badge` into the bottom-right badge square of `raster`.
    pub fn badge_with_drawable(&self, raster: &mut Pixmap, badge: &IconSource<'_>) {
        self.badges.badge_with_drawable(raster, badge);
    }

    fn apply_user_badge(&self, raster: Pixmap, user: UserHandle) -> Pixmap {
        let size = self.config.icon_bitmap_size;
        log::debug!("applying user badge for user {}", user.id());

        match self.user_badger.apply_user_badge(FixedSizeRaster::new(raster), user) {
            BadgedIcon::Raster(pixmap) if pixmap.width() == size && pixmap.height() == size => pixmap,
            BadgedIcon::Raster(pixmap) => {
                log::trace!(
                    "user badge returned {}x{}, rasterizing again",
                    pixmap.width(),
                    pixmap.height()
                );
                let fixed = FixedSizeRaster::new(pixmap);
                self.rasterizer.rasterize(&IconSource::Drawable(&fixed), 1.0)
            }
            BadgedIcon::Drawable(drawable) => {
                self.rasterizer.rasterize(&IconSource::Drawable(drawable.as_ref()), 1.0)
            }
        }
    }

    fn finish(&self, raster: Pixmap) -> BitmapInfo {
        let extractor = if self.color_extraction_disabled {
            None
        } else {
            Some(self.color_extractor.as_ref())
        };
        BitmapInfo::from_raster(raster, extractor)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::OverlayBadger;
    use crate::icon::{AdaptiveIcon, ColorLayer};
    use crate::mask::IconMask;
    use crate::provider::{FixedScale, ResourceTable};
    use image::Rgba;

    const GREEN_BADGE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;

    fn config() -> FactoryConfig {
        FactoryConfig::new().with_icon_bitmap_size(108).with_badge_size(36)
    }

    fn factory() -> IconFactory {
        IconFactory::new(config()).unwrap()
    }

    fn legacy(width: u32, height: u32) -> RasterIcon {
        RasterIcon::new(RgbaImage::from_pixel(width, height, Rgba([220, 20, 60, 255]))).unwrap()
    }

    fn adaptive() -> AdaptiveIcon {
        AdaptiveIcon::new(
            ColorLayer::new(Srgba::new(30, 136, 229, 255)),
            ColorLayer::new(Srgba::new(0, 0, 0, 0)),
        )
    }

    fn rgb_at(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let px = pixmap.pixel(x, y).unwrap();
        (px.red(), px.green(), px.blue(), px.alpha())
    }

    fn outside_corner_matches(a: &Pixmap, b: &Pixmap, corner: u32) -> bool {
        let size = a.width();
        (0..size).all(|y| {
            (0..size).all(|x| (x >= corner && y >= corner) || a.pixel(x, y) == b.pixel(x, y))
        })
    }

    #[derive(Debug)]
    struct DrawableBadger;

    impl UserBadger for DrawableBadger {
        fn apply_user_badge(&self, _icon: FixedSizeRaster, _user: UserHandle) -> BadgedIcon {
            BadgedIcon::Drawable(Box::new(ColorLayer::new(Srgba::new(0, 255, 0, 255))))
        }
    }

    #[derive(Debug)]
    struct ShrinkingBadger;

    impl UserBadger for ShrinkingBadger {
        fn apply_user_badge(&self, _icon: FixedSizeRaster, _user: UserHandle) -> BadgedIcon {
            let mut pixmap = Pixmap::new(20, 20).unwrap();
            pixmap.fill(resvg::tiny_skia::Color::from_rgba8(0, 0, 255, 255));
            BadgedIcon::Raster(pixmap)
        }
    }

    #[test]
    fn every_output_has_canvas_size() {
        let mut factory = factory();
        let wide = legacy(96, 48);
        let tiny = legacy(3, 7);
        let adaptive = adaptive();
        let svg = SvgIcon::from_svg(GREEN_BADGE).unwrap();
        let sources = [
            IconSource::from(&wide),
            IconSource::from(&tiny),
            IconSource::from(&adaptive),
            IconSource::from(&svg),
        ];

        for source in &sources {
            for shrink in [false, true] {
                let flags = RenderFlags::new().shrink_non_adaptive(shrink).instant_app(true);
                let info = factory.render_badged_icon(source, &flags);
                assert_eq!((info.raster().width(), info.raster().height()), (108, 108));

                let raster = factory.render_scaled_without_shadow(source, shrink);
                assert_eq!((raster.width(), raster.height()), (108, 108));
            }
        }
    }

    #[test]
    fn wrapping_is_deterministic() {
        let mut factory = factory();
        let icon = legacy(48, 48);
        let flags = RenderFlags::new().shrink_non_adaptive(true);

        let (first, first_scale) = factory.render_badged_icon_with_scale(&IconSource::from(&icon), &flags);
        let (second, second_scale) = factory.render_badged_icon_with_scale(&IconSource::from(&icon), &flags);

        assert_eq!(first_scale, second_scale);
        assert_eq!(first.raster().data(), second.raster().data());
        assert_eq!(first.color(), second.color());
    }

    #[test]
    fn translucent_wrapper_background_falls_back_to_white() {
        let mut factory = IconFactory::new(config().with_icon_mask(IconMask::Circle))
            .unwrap()
            .with_normalizer(FixedScale::new(1.0));
        let icon = legacy(48, 48);
        let flags = RenderFlags::new().shrink_non_adaptive(true);

        factory.set_wrapper_background_color(Srgba::new(0, 0, 255, 128));
        assert_eq!(factory.wrapper_background_color(), DEFAULT_WRAPPER_BACKGROUND);
        let info = factory.render_badged_icon(&IconSource::from(&icon), &flags);
        assert_eq!(rgb_at(info.raster(), 54, 10), (255, 255, 255, 255));

        factory.set_wrapper_background_color(Srgba::new(0, 0, 255, 255));
        let info = factory.render_badged_icon(&IconSource::from(&icon), &flags);
        assert_eq!(rgb_at(info.raster(), 54, 10), (0, 0, 255, 255));

        // Per-call override follows the same rule
        let flags = flags.with_wrapper_background(Srgba::new(0, 255, 0, 10));
        let info = factory.render_badged_icon(&IconSource::from(&icon), &flags);
        assert_eq!(rgb_at(info.raster(), 54, 10), (255, 255, 255, 255));

        // Foreground sits in the middle
        assert_eq!(rgb_at(info.raster(), 54, 54), (220, 20, 60, 255));
    }

    #[test]
    fn shadowless_scale_never_exceeds_normalized() {
        let mut factory = factory();
        let full = legacy(48, 48);
        let wide = legacy(96, 40);
        let adaptive = adaptive();

        for source in [IconSource::from(&full), IconSource::from(&wide), IconSource::from(&adaptive)] {
            for shrink in [false, true] {
                let flags = RenderFlags::new().shrink_non_adaptive(shrink);
                let (_, normalized) = factory.render_badged_icon_with_scale(&source, &flags);
                let shadowless = factory.scale_without_shadow(&source, shrink);
                assert!(shadowless <= normalized, "{shadowless} > {normalized}");
            }
        }
    }

    #[test]
    fn user_badge_only_touches_corner() {
        let mut factory = factory().with_user_badger(OverlayBadger::new(
            SvgIcon::from_svg(GREEN_BADGE).unwrap(),
            36,
        ));
        let icon = legacy(48, 48);
        let source = IconSource::from(&icon);

        let own = factory.render_badged_icon(&source, &RenderFlags::new().for_user(0));
        let other = factory.render_badged_icon(&source, &RenderFlags::new().for_user(10));

        assert_ne!(own.raster().data(), other.raster().data());
        assert!(outside_corner_matches(own.raster(), other.raster(), 108 - 36));
        assert_eq!(rgb_at(other.raster(), 100, 100), (0, 255, 0, 255));
    }

    #[test]
    fn user_badge_wins_over_instant_app_badge() {
        let mut factory = factory();
        let icon = legacy(48, 48);
        let source = IconSource::from(&icon);

        let plain = factory.render_badged_icon(&source, &RenderFlags::new());
        let instant = factory.render_badged_icon(&source, &RenderFlags::new().instant_app(true));
        assert_ne!(plain.raster().data(), instant.raster().data());
        assert!(outside_corner_matches(plain.raster(), instant.raster(), 108 - 36));

        // The default badger leaves icons alone, and skips the instant badge
        let other_user = factory.render_badged_icon(
            &source,
            &RenderFlags::new().instant_app(true).for_user(10),
        );
        assert_eq!(plain.raster().data(), other_user.raster().data());
    }

    #[test]
    fn non_raster_badge_results_are_rasterized() {
        let icon = legacy(48, 48);
        let source = IconSource::from(&icon);
        let flags = RenderFlags::new().for_user(7);

        let mut drawable = factory().with_user_badger(DrawableBadger);
        let info = drawable.render_badged_icon(&source, &flags);
        assert_eq!(info.raster().width(), 108);
        assert_eq!(rgb_at(info.raster(), 0, 0), (0, 255, 0, 255));

        let mut shrinking = factory().with_user_badger(ShrinkingBadger);
        let info = shrinking.render_badged_icon(&source, &flags);
        assert_eq!(info.raster().width(), 108);
        assert_eq!(rgb_at(info.raster(), 54, 54), (0, 0, 255, 255));
    }

    #[test]
    fn color_extraction_switch_resets_on_clear() {
        let mut factory = factory();
        let icon = legacy(48, 48);
        let source = IconSource::from(&icon);

        assert_eq!(
            factory.render_badged_icon(&source, &RenderFlags::new()).color(),
            Some(DominantColor::new(220, 20, 60, 255))
        );

        factory.disable_color_extraction();
        assert!(factory.is_color_extraction_disabled());
        assert!(factory.render_badged_icon(&source, &RenderFlags::new()).color().is_none());
        assert!(factory.render_badged_icon(&source, &RenderFlags::new()).color().is_none());

        factory.set_wrapper_background_color(Srgba::new(1, 2, 3, 255));
        factory.clear();
        assert!(!factory.is_color_extraction_disabled());
        assert_eq!(factory.wrapper_background_color(), DEFAULT_WRAPPER_BACKGROUND);
        assert!(factory.render_badged_icon(&source, &RenderFlags::new()).color().is_some());
    }

    #[test]
    fn legacy_resource_lookup() {
        let mut factory = factory();
        let mut table = ResourceTable::new();
        table.insert("com.example", "ic_launcher", 480, legacy(144, 144));

        let found = factory
            .render_from_legacy_resource(&table, &ShortcutIconResource::new("com.example", "ic_launcher"))
            .unwrap();
        assert_eq!(found.raster().width(), 108);

        let missing = factory
            .render_from_legacy_resource(&table, &ShortcutIconResource::new("com.gone", "ic_launcher"));
        assert!(missing.is_none());
    }

    #[test]
    fn create_icon_bitmap_keeps_canvas_sized_rasters() {
        let factory = factory();

        let exact = legacy(108, 108);
        let info = factory.create_icon_bitmap(&exact);
        assert_eq!(info.raster().data(), exact.pixmap().data());
        assert!(info.color().is_none());

        let small = legacy(20, 10);
        let info = factory.create_icon_bitmap(&small);
        assert_eq!(info.raster().width(), 108);
        assert_eq!(rgb_at(info.raster(), 54, 10).3, 0);
        assert_eq!(rgb_at(info.raster(), 54, 54).3, 255);
    }

    #[test]
    fn adaptive_icons_fall_back_without_host_support() {
        let mut factory = IconFactory::new(config().with_adaptive_icons(false))
            .unwrap()
            .with_normalizer(FixedScale::new(1.0));
        let icon = adaptive().with_mask(IconMask::Square);
        let info = factory.render_badged_icon(&IconSource::from(&icon), &RenderFlags::new());
        // Drawn edge to edge, without the blur inset
        assert_eq!(rgb_at(info.raster(), 0, 54), (30, 136, 229, 255));

        let wrapped = factory.render_badged_icon(
            &IconSource::from(&legacy(48, 48)),
            &RenderFlags::new().shrink_non_adaptive(true),
        );
        assert_eq!(rgb_at(wrapped.raster(), 0, 0), (220, 20, 60, 255));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(IconFactory::new(FactoryConfig::new().with_icon_bitmap_size(0)).is_err());
        assert!(IconFactory::new(FactoryConfig::new().with_blur_factor(0.7)).is_err());
    }

    #[test]
    fn rgba_export_matches_raster() {
        let mut factory = factory();
        let icon = legacy(48, 48);
        let info = factory.render_badged_icon(&IconSource::from(&icon), &RenderFlags::new());
        let image = info.to_rgba_image();
        assert_eq!(image.dimensions(), (108, 108));
        assert_eq!(image.get_pixel(54, 54), &Rgba([220, 20, 60, 255]));
    }

    #[test]
    fn factory_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<IconFactory>();
    }
}
