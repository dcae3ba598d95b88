//! Vector icons parsed with resvg/usvg.
//!
//! An [`SvgIcon`] is the generic drawable the crate ships with: badge
//! images, adaptive layers and legacy vector icons all go through it.

use std::path::Path;
use std::sync::Arc;

use resvg::tiny_skia::Rect;
use resvg::usvg::{Options, Tree};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::icon::{Drawable, SizePx};

/// A parsed SVG document.
#[derive(Debug, Clone)]
pub struct SvgIcon {
    tree: Arc<Tree>,
}

impl SvgIcon {
    /// Parses SVG markup.
    ///
    /// # Example
    ///
    /// ```
    /// use icon_factory::SvgIcon;
    ///
    /// let icon = SvgIcon::from_svg(
    ///     r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"/>"#,
    /// ).unwrap();
    /// assert_eq!(icon.size().width, 24);
    /// ```
    pub fn from_svg(svg: &str) -> Result<Self> {
        let tree = Tree::from_str(svg, &Options::default())?;
        Ok(Self {
            tree: Arc::new(tree),
        })
    }

    /// Parses SVG (or SVGZ) bytes.
    pub fn from_data(data: &[u8]) -> Result<Self> {
        let tree = Tree::from_data(data, &Options::default())?;
        Ok(Self {
            tree: Arc::new(tree),
        })
    }

    /// Reads and parses an SVG file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_data(&std::fs::read(path)?)
    }

    /// Looks up an emoji in the Twemoji set.
    ///
    /// Only available when the `twemoji` feature is enabled.
    #[cfg(feature = "twemoji")]
    pub fn from_emoji(emoji: &str) -> Result<Self> {
        use twemoji_assets::svg::SvgTwemojiAsset;

        let asset = SvgTwemojiAsset::from_emoji(emoji)
            .ok_or_else(|| crate::Error::EmojiNotFound(emoji.to_string()))?;
        Self::from_svg(asset.as_ref())
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Document size, rounded up to whole pixels.
    pub fn size(&self) -> SizePx {
        let size = self.tree.size();
        SizePx::new(size.width().ceil() as u32, size.height().ceil() as u32)
    }
}

impl Drawable for SvgIcon {
    fn intrinsic_size(&self) -> Option<SizePx> {
        Some(self.size())
    }

    fn draw(&self, canvas: &mut Canvas<'_>, bounds: Rect) {
        canvas.render_svg(&self.tree, bounds);
    }
}
