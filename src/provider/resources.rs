//! Legacy shortcut icon resources.
//!
//! Old shortcuts reference their icon by package and resource name rather
//! than carrying pixels. The host resolves that reference; the factory only
//! needs the resulting icon source.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::icon::{IconSource, OwnedIcon};

/// A named icon inside another application's resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutIconResource {
    pub package_name: String,
    pub resource_name: String,
}

impl ShortcutIconResource {
    pub fn new(package_name: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            resource_name: resource_name.into(),
        }
    }
}

/// Looks up icon resources by package, resource name and display density.
pub trait ResourceResolver {
    fn resolve_icon(&self, package: &str, resource: &str, density: u32) -> Result<IconSource<'_>>;
}

/// An in-memory resource registry holding density variants per icon.
#[derive(Debug, Default)]
pub struct ResourceTable {
    entries: HashMap<(String, String), Vec<(u32, OwnedIcon)>>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `icon` as the `density` variant of `package`/`resource`,
    /// replacing an existing variant of the same density.
    pub fn insert(
        &mut self,
        package: impl Into<String>,
        resource: impl Into<String>,
        density: u32,
        icon: impl Into<OwnedIcon>,
    ) {
        let variants = self
            .entries
            .entry((package.into(), resource.into()))
            .or_default();
        variants.retain(|(d, _)| *d != density);
        variants.push((density, icon.into()));
        variants.sort_by_key(|(d, _)| *d);
    }

    /// Removes every variant of a resource, like an uninstalled app would.
    pub fn remove(&mut self, package: &str, resource: &str) -> bool {
        self.entries
            .remove(&(package.to_string(), resource.to_string()))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceResolver for ResourceTable {
    /// Picks the smallest variant at or above `density`, falling back to the
    /// densest one available.
    fn resolve_icon(&self, package: &str, resource: &str, density: u32) -> Result<IconSource<'_>> {
        let variants = self
            .entries
            .get(&(package.to_string(), resource.to_string()))
            .filter(|variants| !variants.is_empty())
            .ok_or_else(|| Error::ResourceNotFound {
                package: package.to_string(),
                resource: resource.to_string(),
            })?;

        let (_, icon) = variants
            .iter()
            .find(|(d, _)| *d >= density)
            .or_else(|| variants.last())
            .ok_or_else(|| Error::ResourceNotFound {
                package: package.to_string(),
                resource: resource.to_string(),
            })?;
        Ok(icon.as_source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{RasterIcon, SizePx};
    use image::RgbaImage;

    fn raster(size: u32) -> RasterIcon {
        RasterIcon::new(RgbaImage::new(size, size)).unwrap()
    }

    fn resolved_size(table: &ResourceTable, density: u32) -> Option<SizePx> {
        match table.resolve_icon("com.example", "ic_launcher", density).unwrap() {
            IconSource::Raster(icon) => Some(icon.dimensions()),
            _ => None,
        }
    }

    #[test]
    fn picks_closest_density_at_or_above() {
        let mut table = ResourceTable::new();
        table.insert("com.example", "ic_launcher", 160, raster(48));
        table.insert("com.example", "ic_launcher", 480, raster(144));
        table.insert("com.example", "ic_launcher", 320, raster(96));

        assert_eq!(resolved_size(&table, 120), Some(SizePx::new(48, 48)));
        assert_eq!(resolved_size(&table, 320), Some(SizePx::new(96, 96)));
        assert_eq!(resolved_size(&table, 400), Some(SizePx::new(144, 144)));
        // Nothing dense enough: fall back to the densest
        assert_eq!(resolved_size(&table, 640), Some(SizePx::new(144, 144)));
    }

    #[test]
    fn same_density_replaces_variant() {
        let mut table = ResourceTable::new();
        table.insert("com.example", "ic_launcher", 160, raster(48));
        table.insert("com.example", "ic_launcher", 160, raster(50));
        assert_eq!(table.len(), 1);
        assert_eq!(resolved_size(&table, 160), Some(SizePx::new(50, 50)));
    }

    #[test]
    fn missing_resource_is_an_error() {
        let mut table = ResourceTable::new();
        table.insert("com.example", "ic_launcher", 160, raster(48));
        assert!(table.remove("com.example", "ic_launcher"));
        assert!(table.is_empty());

        let err = table.resolve_icon("com.example", "ic_launcher", 160).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound { .. }));
    }
}
