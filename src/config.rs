//! Generation settings.
//!
//! `IconConfig` is built once, before any file is touched, and handed to the
//! generator by reference. Every field has a default, so a JSON config file
//! only needs the keys it wants to change.

use crate::manifest::MANIFEST_FILE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fmt, path::Path, str::FromStr};

/// Icon sizes written when nothing else is requested
pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    /// Sizes to generate, in order. Each one produces `<prefix>_<size>.png`
    pub sizes: Vec<u32>,

    /// The size that is duplicated as the canonical icon
    pub canonical_size: u32,

    /// File name of the canonical icon copy
    pub canonical_name: String,

    /// Prefix of the size-named files
    pub file_prefix: String,

    /// Drawing style of the rendered strategy
    pub style: Style,

    pub palette: Palette,

    /// Chunk framing of the raw strategy
    pub framing: Framing,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            canonical_size: 128,
            canonical_name: "icon.png".to_string(),
            file_prefix: "icon".to_string(),
            style: Style::default(),
            palette: Palette::default(),
            framing: Framing::default(),
        }
    }
}

impl IconConfig {
    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: IconConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that would fail halfway through a run
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            anyhow::bail!("At least one icon size is required");
        }
        if let Some(size) = self.sizes.iter().find(|&&size| size == 0) {
            anyhow::bail!("Icon size must be greater than zero, got {size}");
        }
        if self.file_prefix.is_empty() {
            anyhow::bail!("File prefix must not be empty");
        }
        if self.canonical_name.is_empty() {
            anyhow::bail!("Canonical icon name must not be empty");
        }
        let collides = self
            .sizes
            .iter()
            .any(|&size| self.file_name(size) == self.canonical_name);
        if collides || self.canonical_name == MANIFEST_FILE {
            anyhow::bail!(
                "Canonical icon name {} collides with a generated file",
                self.canonical_name
            );
        }
        Ok(())
    }

    pub fn file_name(&self, size: u32) -> String {
        format!("{}_{size}.png", self.file_prefix)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Gradient background, rounded border, glyph and glow ring
    #[default]
    Styled,
    /// Opaque glyph on a transparent canvas
    Plain,
}

/// How the raw strategy frames its chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// Uncompressed pixels and placeholder checksums. Strict readers reject it.
    #[default]
    Legacy,
    /// Filtered, zlib-compressed scanlines with computed checksums
    Conforming,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub gradient_top: Color,
    pub gradient_bottom: Color,
    pub border: Color,
    pub glyph: Color,
    pub glow: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            gradient_top: Color([0x1d, 0x9b, 0xf0, 255]),
            gradient_bottom: Color([0x2a, 0xaf, 0xf5, 255]),
            border: Color([255, 255, 255, 60]),
            glyph: Color([255, 255, 255, 245]),
            glow: Color([255, 255, 255, 50]),
        }
    }
}

/// Straight (non-premultiplied) RGBA colour
///
/// Deserialises from any CSS colour string, e.g. `"#1d9bf0"` or
/// `"rgba(255, 255, 255, 0.2)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub fn opaque(self) -> Self {
        let [r, g, b, _] = self.0;
        Color([r, g, b, 255])
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let color = css_color::Srgb::from_str(s)
            .map_err(|_| anyhow::anyhow!("Invalid CSS color: {s}"))?;
        Ok(Color([
            unit_to_byte(color.red),
            unit_to_byte(color.green),
            unit_to_byte(color.blue),
            unit_to_byte(color.alpha),
        ]))
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
