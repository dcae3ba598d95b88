//! Pluggable render stages.
//!
//! The factory delegates four concerns to collaborators it does not own the
//! algorithms of: measuring an icon's visual weight, baking a drop shadow,
//! summarizing a finished raster into one color, and resolving legacy icon
//! resources. Each is a trait with a default implementation so the crate
//! works standalone; hosts swap in their own through the
//! [`IconFactory`](crate::IconFactory) builder methods.

pub mod color;
pub mod normalizer;
pub mod resources;
pub mod shadow;

pub use color::{ColorExtractor, DominantColor, HueColorExtractor};
pub use normalizer::{AlphaBoundsNormalizer, FixedScale, NormalizationResult, ScaleNormalizer};
pub use resources::{ResourceResolver, ResourceTable, ShortcutIconResource};
pub use shadow::{ShadowCompositor, ShadowGenerator};
