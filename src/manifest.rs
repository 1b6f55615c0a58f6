//! `icons.json`: the icon entries of an extension's `manifest.json`
//!
//! The generator can emit this fragment next to the PNG files so it can be
//! pasted (or merged by a build step) into the extension manifest. Keys are
//! icon sizes, values are paths relative to the output directory.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};

pub const MANIFEST_FILE: &str = "icons.json";

/// Root of the fragment
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IconManifest {
    /// Extension icons, keyed by size
    pub icons: BTreeMap<u32, String>,

    /// Toolbar button icons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub default_icon: BTreeMap<u32, String>,
}

impl IconManifest {
    pub fn new() -> Self {
        Self {
            icons: BTreeMap::new(),
            action: None,
        }
    }

    pub fn add_icon(&mut self, size: u32, filename: String) {
        self.icons.insert(size, filename);
    }

    /// Use the same files for the toolbar action
    pub fn with_action(mut self) -> Self {
        self.action = Some(Action {
            default_icon: self.icons.clone(),
        });
        self
    }
}

impl Default for IconManifest {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `icons.json` with the provided entries
pub fn write_manifest(out_dir: &Path, entries: &[(u32, String)]) -> Result<()> {
    let mut manifest = IconManifest::new();
    for (size, filename) in entries {
        manifest.add_icon(*size, filename.clone());
    }
    let manifest = manifest.with_action();

    let manifest_path = out_dir.join(MANIFEST_FILE);
    let manifest_json =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize icons.json")?;

    std::fs::write(&manifest_path, manifest_json).context("Failed to write icons.json file")?;

    println!("  ✓ Generated {MANIFEST_FILE}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_sizes_as_sorted_keys() {
        let mut manifest = IconManifest::new();
        manifest.add_icon(128, "icon_128.png".to_string());
        manifest.add_icon(16, "icon_16.png".to_string());
        manifest.add_icon(48, "icon_48.png".to_string());

        let json: serde_json::Value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["icons"]["16"], "icon_16.png");
        assert_eq!(json["icons"]["128"], "icon_128.png");
        assert!(json.get("action").is_none());

        let text = serde_json::to_string(&manifest).unwrap();
        let pos_16 = text.find("\"16\"").unwrap();
        let pos_48 = text.find("\"48\"").unwrap();
        let pos_128 = text.find("\"128\"").unwrap();
        assert!(pos_16 < pos_48 && pos_48 < pos_128);
    }

    #[test]
    fn test_action_mirrors_icons() {
        let mut manifest = IconManifest::new();
        manifest.add_icon(16, "icon_16.png".to_string());
        let manifest = manifest.with_action();

        let json: serde_json::Value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["action"]["default_icon"]["16"], "icon_16.png");
    }

    #[test]
    fn test_write_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), &[(16, "icon_16.png".to_string())]).unwrap();

        let text = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(json["icons"].is_object());
        assert!(json["action"]["default_icon"].is_object());
    }
}
