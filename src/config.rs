//! Serializable factory configuration.
//!
//! A [`FactoryConfig`] holds the host constants a factory is built with. It
//! round-trips through JSON so a host can ship one file for every worker.
//!
//! # Example
//!
//! ```
//! use icon_factory::{FactoryConfig, IconMask};
//!
//! let config = FactoryConfig::new()
//!     .with_icon_bitmap_size(108)
//!     .with_icon_mask(IconMask::Squircle);
//!
//! let json = config.to_json().unwrap();
//! let restored = FactoryConfig::from_json(&json).unwrap();
//! assert_eq!(restored.icon_bitmap_size, 108);
//! ```

use serde::{Deserialize, Serialize};

use crate::badge::UserHandle;
use crate::error::{Error, Result};
use crate::mask::IconMask;
use crate::provider::shadow::{BLUR_FACTOR, KEY_SHADOW_DISTANCE};

/// Construction-time settings of an [`IconFactory`](crate::IconFactory).
///
/// # JSON Format
///
/// Every field is optional; missing ones take their defaults.
///
/// ```json
/// {
///   "iconBitmapSize": 192,
///   "fillResIconDpi": 480,
///   "badgeSize": 64,
///   "blurFactor": 0.010416667,
///   "keyShadowDistance": 0.020833334,
///   "supportsAdaptiveIcons": true,
///   "iconMask": "circle",
///   "ownUser": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct FactoryConfig {
    /// Side of every output raster in pixels.
    pub icon_bitmap_size: u32,

    /// Density requested when resolving legacy resource icons.
    pub fill_res_icon_dpi: u32,

    /// Side of the bottom-right badge square in pixels.
    pub badge_size: u32,

    /// Shadow blur radius as a fraction of the icon side. Also the minimum
    /// inset of adaptive icons.
    pub blur_factor: f32,

    /// Downward offset of the key shadow as a fraction of the icon side.
    pub key_shadow_distance: f32,

    /// Whether the host can shape adaptive icons. When false, legacy icons
    /// are never wrapped and adaptive icons are drawn like plain ones.
    pub supports_adaptive_icons: bool,

    /// Shape applied to adaptive and wrapped icons.
    pub icon_mask: IconMask,

    /// The user this factory renders for. Other users get a badge.
    pub own_user: UserHandle,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            icon_bitmap_size: 192,
            fill_res_icon_dpi: 480,
            badge_size: 64,
            blur_factor: BLUR_FACTOR,
            key_shadow_distance: KEY_SHADOW_DISTANCE,
            supports_adaptive_icons: true,
            icon_mask: IconMask::default(),
            own_user: UserHandle::default(),
        }
    }
}

impl FactoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon_bitmap_size(mut self, size: u32) -> Self {
        self.icon_bitmap_size = size;
        self
    }

    pub fn with_fill_res_icon_dpi(mut self, dpi: u32) -> Self {
        self.fill_res_icon_dpi = dpi;
        self
    }

    pub fn with_badge_size(mut self, size: u32) -> Self {
        self.badge_size = size;
        self
    }

    pub fn with_blur_factor(mut self, blur_factor: f32) -> Self {
        self.blur_factor = blur_factor;
        self
    }

    pub fn with_key_shadow_distance(mut self, distance: f32) -> Self {
        self.key_shadow_distance = distance;
        self
    }

    pub fn with_adaptive_icons(mut self, supported: bool) -> Self {
        self.supports_adaptive_icons = supported;
        self
    }

    pub fn with_icon_mask(mut self, mask: IconMask) -> Self {
        self.icon_mask = mask;
        self
    }

    pub fn with_own_user(mut self, user: UserHandle) -> Self {
        self.own_user = user;
        self
    }

    /// Checks that the settings describe a drawable canvas.
    pub fn validate(&self) -> Result<()> {
        if self.icon_bitmap_size == 0 {
            return Err(Error::InvalidConfig("iconBitmapSize must be positive".into()));
        }
        if self.badge_size > self.icon_bitmap_size {
            return Err(Error::InvalidConfig(format!(
                "badgeSize {} exceeds iconBitmapSize {}",
                self.badge_size, self.icon_bitmap_size
            )));
        }
        if !(0.0..0.5).contains(&self.blur_factor) {
            return Err(Error::InvalidConfig(format!(
                "blurFactor {} outside [0, 0.5)",
                self.blur_factor
            )));
        }
        if !(0.0..0.5).contains(&self.key_shadow_distance) {
            return Err(Error::InvalidConfig(format!(
                "keyShadowDistance {} outside [0, 0.5)",
                self.key_shadow_distance
            )));
        }
        if let IconMask::RoundedSquare { corner_radius } = self.icon_mask {
            if !(0.0..=0.5).contains(&corner_radius) {
                return Err(Error::InvalidConfig(format!(
                    "cornerRadius {corner_radius} outside [0, 0.5]"
                )));
            }
        }
        Ok(())
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes and validates a config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FactoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.icon_bitmap_size, 192);
        assert_eq!(config.fill_res_icon_dpi, 480);
        assert_eq!(config.own_user, UserHandle(0));
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config = FactoryConfig::from_json("{}").unwrap();
        assert_eq!(config, FactoryConfig::default());
    }

    #[test]
    fn json_format_is_camel_case() {
        let config = FactoryConfig::new()
            .with_badge_size(32)
            .with_icon_mask(IconMask::RoundedSquare { corner_radius: 0.2 });
        let json = config.to_json_pretty().unwrap();

        assert!(json.contains("\"iconBitmapSize\""));
        assert!(json.contains("\"supportsAdaptiveIcons\""));
        assert!(json.contains("\"rounded-square\""));

        let restored = FactoryConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = FactoryConfig::from_json(r#"{"iconBitmapSize": 96, "ownUser": 10}"#).unwrap();
        assert_eq!(config.icon_bitmap_size, 96);
        assert_eq!(config.own_user, UserHandle(10));
        assert_eq!(config.badge_size, 64);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let invalid = [
            FactoryConfig::new().with_icon_bitmap_size(0),
            FactoryConfig::new().with_icon_bitmap_size(48).with_badge_size(64),
            FactoryConfig::new().with_blur_factor(0.5),
            FactoryConfig::new().with_key_shadow_distance(-0.1),
            FactoryConfig::new().with_icon_mask(IconMask::RoundedSquare { corner_radius: 0.75 }),
        ];
        for config in invalid {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "{config:?}"
            );
        }

        let err = FactoryConfig::from_json(r#"{"iconBitmapSize": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
