//! Adaptive icon mask shapes.

use resvg::tiny_skia::{Path, PathBuilder, Rect};
use serde::{Deserialize, Serialize};

/// Cubic Bezier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// The shape that clips both layers of an adaptive icon.
///
/// Shapes are defined in unit space and stretched to the icon bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum IconMask {
    #[default]
    Circle,
    Square,
    Squircle,
    /// Square with corners rounded by `corner_radius` (fraction of the side,
    /// 0.0 to 0.5).
    #[serde(rename_all = "camelCase")]
    RoundedSquare { corner_radius: f32 },
}

impl IconMask {
    /// Builds the mask outline for `bounds`.
    pub fn path(&self, bounds: Rect) -> Option<Path> {
        match *self {
            Self::Circle => {
                let rx = bounds.width() / 2.0;
                let ry = bounds.height() / 2.0;
                ellipse(bounds.left() + rx, bounds.top() + ry, rx, ry)
            }
            Self::Square => Some(PathBuilder::from_rect(bounds)),
            Self::Squircle => squircle(bounds),
            Self::RoundedSquare { corner_radius } => rounded_rect(bounds, corner_radius),
        }
    }
}

fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    let mut pb = PathBuilder::new();
    pb.move_to(cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    pb.close();
    pb.finish()
}

/// `M50,0 C10,0 0,10 0,50 S10,100 50,100 S100,90 100,50 S90,0 50,0 Z` in a
/// 100x100 viewport.
fn squircle(bounds: Rect) -> Option<Path> {
    let x = |u: f32| bounds.left() + bounds.width() * u / 100.0;
    let y = |v: f32| bounds.top() + bounds.height() * v / 100.0;

    let mut pb = PathBuilder::new();
    pb.move_to(x(50.0), y(0.0));
    pb.cubic_to(x(10.0), y(0.0), x(0.0), y(10.0), x(0.0), y(50.0));
    pb.cubic_to(x(0.0), y(90.0), x(10.0), y(100.0), x(50.0), y(100.0));
    pb.cubic_to(x(90.0), y(100.0), x(100.0), y(90.0), x(100.0), y(50.0));
    pb.cubic_to(x(100.0), y(10.0), x(90.0), y(0.0), x(50.0), y(0.0));
    pb.close();
    pb.finish()
}

fn rounded_rect(bounds: Rect, corner_radius: f32) -> Option<Path> {
    let side = bounds.width().min(bounds.height());
    let r = side * corner_radius.clamp(0.0, 0.5);
    if r <= 0.0 {
        return Some(PathBuilder::from_rect(bounds));
    }

    let (l, t, rt, b) = (bounds.left(), bounds.top(), bounds.right(), bounds.bottom());
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}
