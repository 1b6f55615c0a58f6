use crate::{
    backend::IconEncoder,
    config::{Color, IconConfig, Style},
    draw::{rounded_ring, thick_line, vertical_gradient, Rect},
};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use std::io::Write;

/// Pixel measurements of one icon, derived from its size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub size: u32,
    pub border: u32,
    pub border_radius: u32,
    pub line_width: u32,
    pub margin: u32,
    pub glow_width: u32,
    pub glow_radius: u32,
}

impl Geometry {
    pub fn new(size: u32, style: Style) -> Self {
        let line_width = match style {
            Style::Styled => (size / 7).max(2),
            Style::Plain => (size / 8).max(2),
        };
        Self {
            size,
            border: (size / 24).max(1),
            border_radius: size / 6,
            line_width,
            margin: size / 4,
            glow_width: (line_width / 2).max(1),
            glow_radius: size / 5,
        }
    }

    /// End points of the two strokes that make up the "X"
    pub fn glyph_strokes(&self) -> [((f32, f32), (f32, f32)); 2] {
        let near = self.margin as f32;
        let far = (self.size - self.margin) as f32;
        [((near, near), (far, far)), ((far, near), (near, far))]
    }
}

/// Draw one icon
pub fn render_icon(size: u32, config: &IconConfig) -> RgbaImage {
    let geometry = Geometry::new(size, config.style);
    let palette = &config.palette;
    let mut img = RgbaImage::new(size, size);

    match config.style {
        Style::Styled => {
            vertical_gradient(
                &mut img,
                rgba(palette.gradient_top),
                rgba(palette.gradient_bottom),
            );

            let inset = geometry.border as f32;
            let outer = (size - geometry.border) as f32;
            rounded_ring(
                &mut img,
                Rect::new(inset, inset, outer, outer),
                geometry.border_radius as f32,
                geometry.border,
                rgba(palette.border),
            );

            for (from, to) in geometry.glyph_strokes() {
                thick_line(&mut img, from, to, geometry.line_width, rgba(palette.glyph));
            }

            let glow = geometry.glow_width as f32;
            let near = geometry.margin as f32 - glow;
            let far = (size - geometry.margin) as f32 + glow;
            rounded_ring(
                &mut img,
                Rect::new(near, near, far, far),
                geometry.glow_radius as f32,
                geometry.glow_width,
                rgba(palette.glow),
            );
        }
        Style::Plain => {
            for (from, to) in geometry.glyph_strokes() {
                thick_line(
                    &mut img,
                    from,
                    to,
                    geometry.line_width,
                    rgba(palette.glyph.opaque()),
                );
            }
        }
    }

    img
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgba8)?;
    Ok(())
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba(color.0)
}

/// Library-backed strategy behind the [`IconEncoder`] seam
pub struct RenderEncoder<'a> {
    config: &'a IconConfig,
}

impl<'a> RenderEncoder<'a> {
    pub fn new(config: &'a IconConfig) -> Self {
        Self { config }
    }
}

impl IconEncoder for RenderEncoder<'_> {
    fn name(&self) -> &'static str {
        "render"
    }

    fn encode(&self, size: u32) -> Result<Vec<u8>> {
        let img = render_icon(size, self.config);
        let mut buf = Vec::new();
        write_png(img.as_raw(), &mut buf, size)
            .with_context(|| format!("Failed to encode {size}x{size} icon"))?;
        Ok(buf)
    }
}
