//! Provenance badges drawn into the bottom-right corner of finished icons.
//!
//! Two badges exist. A user badge marks icons rendered for another user
//! (a work profile, say) and comes from a host decorator behind
//! [`UserBadger`]. The instant-app badge is drawn by the
//! [`BadgeCompositor`] itself.

use resvg::tiny_skia::{Pixmap, Rect};
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::icon::{Drawable, IconSource, OwnedIcon, SizePx};

/// Built-in instant-app badge: a white bolt on a dark disc.
pub const INSTANT_APP_BADGE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48"><circle cx="24" cy="24" r="22" fill="#ffffff"/><circle cx="24" cy="24" r="20" fill="#455a64"/><path d="M21 37l2-11h-7l12-15-2 11h7z" fill="#ffffff"/></svg>"##;

// ============================================================================
// UserHandle
// ============================================================================

/// Identity of the user an icon is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct UserHandle(pub u32);

impl UserHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl From<u32> for UserHandle {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ============================================================================
// FixedSizeRaster
// ============================================================================

/// A raster that reports its pixel size as its intrinsic size.
///
/// Handed to user badgers so badge geometry is computed against actual
/// pixels rather than a density-scaled size.
#[derive(Debug, Clone)]
pub struct FixedSizeRaster {
    pixmap: Pixmap,
}

impl FixedSizeRaster {
    pub fn new(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

impl Drawable for FixedSizeRaster {
    fn intrinsic_size(&self) -> Option<SizePx> {
        Some(SizePx::new(self.pixmap.width(), self.pixmap.height()))
    }

    fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect) {
        canvas.draw_pixmap(self.pixmap.as_ref(), bounds);
    }
}

// ============================================================================
// User badging
// ============================================================================

/// What a user badger hands back.
#[derive(Debug)]
pub enum BadgedIcon {
    /// A finished raster, used as-is when it has the canvas size.
    Raster(Pixmap),
    /// Anything else; the factory rasterizes it again.
    Drawable(Box<dyn Drawable>),
}

/// Host decorator that marks icons belonging to another user.
pub trait UserBadger: Send {
    fn apply_user_badge(&self, icon: FixedSizeRaster, user: UserHandle) -> BadgedIcon;
}

/// Leaves icons untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUserBadge;

impl UserBadger for NoUserBadge {
    fn apply_user_badge(&self, icon: FixedSizeRaster, _user: UserHandle) -> BadgedIcon {
        BadgedIcon::Raster(icon.into_pixmap())
    }
}

/// Draws one badge image into the bottom-right corner for every user.
#[derive(Debug)]
pub struct OverlayBadger {
    badge: OwnedIcon,
    badge_size: u32,
}

impl OverlayBadger {
    pub fn new(badge: impl Into<OwnedIcon>, badge_size: u32) -> Self {
        Self {
            badge: badge.into(),
            badge_size,
        }
    }
}

impl UserBadger for OverlayBadger {
    fn apply_user_badge(&self, icon: FixedSizeRaster, user: UserHandle) -> BadgedIcon {
        let size = icon.intrinsic_size().unwrap_or_default();
        let mut pixmap = icon.into_pixmap();
        let compositor = BadgeCompositor::new(size.width.min(size.height), self.badge_size);
        log::trace!("overlaying user badge for user {}", user.id());
        compositor.badge_with_drawable(&mut pixmap, &self.badge.as_source());
        BadgedIcon::Raster(pixmap)
    }
}

// ============================================================================
// BadgeCompositor
// ============================================================================

/// Places badges in the bottom-right `badge_size`² square of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeCompositor {
    icon_bitmap_size: u32,
    badge_size: u32,
}

impl BadgeCompositor {
    pub fn new(icon_bitmap_size: u32, badge_size: u32) -> Self {
        Self {
            icon_bitmap_size,
            badge_size: badge_size.min(icon_bitmap_size),
        }
    }

    pub fn badge_size(&self) -> u32 {
        self.badge_size
    }

    /// The badge square, or `None` for a zero badge size.
    pub fn badge_bounds(&self) -> Option<Rect> {
        let far = self.icon_bitmap_size as f32;
        let near = (self.icon_bitmap_size - self.badge_size) as f32;
        Rect::from_ltrb(near, near, far, far)
    }

    /// Draws `badge` over the corner of `raster`.
    pub fn badge_with_drawable(&self, raster: &mut Pixmap, badge: &IconSource<'_>) {
        let mut canvas = Canvas::new(raster);
        self.badge_canvas(&mut canvas, badge);
    }

    /// Draws `badge` over the corner of a canvas already bound to a target.
    pub fn badge_canvas(&self, canvas: &mut Canvas<'_>, badge: &IconSource<'_>) {
        if let Some(bounds) = self.badge_bounds() {
            badge.draw(canvas, bounds);
        }
    }
}
