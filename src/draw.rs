//! Pixel-level drawing on an `RgbaImage`.
//!
//! Coordinates are in pixel units with `(0, 0)` at the centre of the top-left
//! pixel. Shapes that fall partly or wholly outside the canvas are clipped.
//! Every shape writes its colour straight into the pixels it covers, alpha
//! included; nothing is composited with what was there before.

use image::{Rgba, RgbaImage};

/// Fill every row with a colour interpolated between `top` and `bottom`
pub fn vertical_gradient(img: &mut RgbaImage, top: Rgba<u8>, bottom: Rgba<u8>) {
    let height = img.height();
    let span = height.saturating_sub(1).max(1) as f32;

    for y in 0..height {
        let ratio = y as f32 / span;
        let mut row_color = top;
        for channel in 0..4 {
            let start = top[channel] as f32;
            let end = bottom[channel] as f32;
            row_color[channel] = (start + (end - start) * ratio) as u8;
        }
        for x in 0..img.width() {
            img.put_pixel(x, y, row_color);
        }
    }
}

/// Stroke the segment `from`-`to` with the given width
pub fn thick_line(
    img: &mut RgbaImage,
    from: (f32, f32),
    to: (f32, f32),
    width: u32,
    color: Rgba<u8>,
) {
    let half = width as f32 / 2.0;
    let (min_x, max_x) = (from.0.min(to.0) - half, from.0.max(to.0) + half);
    let (min_y, max_y) = (from.1.min(to.1) - half, from.1.max(to.1) + half);

    for (x, y) in clipped_pixels(img, min_x, min_y, max_x, max_y) {
        if within_stroke((x as f32, y as f32), from, to, half) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Corner points of an axis-aligned rectangle, both inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Signed distance from `point` to the rounded outline; negative inside
    fn rounded_distance(&self, point: (f32, f32), radius: f32) -> f32 {
        let half_w = ((self.right - self.left) / 2.0).max(0.0);
        let half_h = ((self.bottom - self.top) / 2.0).max(0.0);
        let radius = radius.clamp(0.0, half_w.min(half_h));
        let center = ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0);

        let qx = (point.0 - center.0).abs() - (half_w - radius);
        let qy = (point.1 - center.1).abs() - (half_h - radius);
        let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
        let inside = qx.max(qy).min(0.0);
        outside + inside - radius
    }
}

/// Stroke the inside edge of a rounded rectangle with a ring `width` pixels wide
pub fn rounded_ring(
    img: &mut RgbaImage,
    rect: Rect,
    radius: f32,
    width: u32,
    color: Rgba<u8>,
) {
    if width == 0 {
        return;
    }
    let width = width as f32;

    for (x, y) in clipped_pixels(img, rect.left, rect.top, rect.right, rect.bottom) {
        let distance = rect.rounded_distance((x as f32, y as f32), radius);
        if distance <= 0.0 && distance > -width {
            img.put_pixel(x, y, color);
        }
    }
}

// Butt-ended stroke: the point must project onto the segment itself
fn within_stroke(point: (f32, f32), from: (f32, f32), to: (f32, f32), half: f32) -> bool {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return false;
    }

    let (px, py) = (point.0 - from.0, point.1 - from.1);
    let t = (px * dx + py * dy) / length_sq;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }
    (px * dy - py * dx).abs() / length_sq.sqrt() <= half
}

// Integer pixel coordinates of the bounding box, limited to the canvas
fn clipped_pixels(
    img: &RgbaImage,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
) -> impl Iterator<Item = (u32, u32)> {
    let clamp_x = |v: f32| v.clamp(0.0, img.width() as f32) as u32;
    let clamp_y = |v: f32| v.clamp(0.0, img.height() as f32) as u32;

    let (x0, x1) = (clamp_x(min_x.floor()), clamp_x(max_x.ceil() + 1.0));
    let (y0, y1) = (clamp_y(min_y.floor()), clamp_y(max_y.ceil() + 1.0));

    (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
}
