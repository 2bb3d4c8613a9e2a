//! Pixel drawing primitives for annotation overlays.
//!
//! Everything clamps to the canvas, so callers can pass boxes that hang
//! off the frame edge without checking first.

use image::{Rgb, RgbImage};

use crate::bbox::{BBox, Ltrb};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);

/// Per-class overlay color, COCO ids.
pub fn class_color(class: i32) -> Rgb<u8> {
    match class {
        0 => Rgb([200, 0, 0]),     // person
        1 => Rgb([255, 255, 0]),   // bicycle
        2 => Rgb([0, 200, 200]),   // car
        3 => Rgb([200, 0, 200]),   // motorbike
        5 => Rgb([100, 100, 255]), // bus
        7 => Rgb([255, 128, 0]),   // truck
        _ => Rgb([160, 160, 160]),
    }
}

/// Band all coordinates are clamped into before offset arithmetic.
/// Points projected near the homography's vanishing line land at huge
/// magnitudes; without the clamp, `x + dx` overflows `i32`.
const COORD_LIMIT: i32 = 1 << 14;

/// Saturating cast from geometry space to canvas coordinates.
pub fn to_canvas(v: f32) -> i32 {
    v.clamp(-(COORD_LIMIT as f32), COORD_LIMIT as f32) as i32
}

#[inline]
fn clamp_coord(v: i32) -> i32 {
    v.clamp(-COORD_LIMIT, COORD_LIMIT)
}

#[inline]
fn put_pixel_clamped(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Hollow rectangle, two pixels thick.
pub fn draw_rect(img: &mut RgbImage, bbox: &BBox<Ltrb>, color: Rgb<u8>) {
    let (l, t) = (to_canvas(bbox.left()), to_canvas(bbox.top()));
    let (r, b) = (to_canvas(bbox.right()), to_canvas(bbox.bottom()));

    for thickness in 0..2 {
        for x in l..=r {
            put_pixel_clamped(img, x, t + thickness, color);
            put_pixel_clamped(img, x, b - thickness, color);
        }

        for y in t..=b {
            put_pixel_clamped(img, l + thickness, y, color);
            put_pixel_clamped(img, r - thickness, y, color);
        }
    }
}

/// Bresenham line segment.
pub fn draw_line(img: &mut RgbImage, from: (i32, i32), to: (i32, i32), color: Rgb<u8>) {
    let (mut x, mut y) = (clamp_coord(from.0), clamp_coord(from.1));
    let (x1, y1) = (clamp_coord(to.0), clamp_coord(to.1));

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel_clamped(img, x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Closed polygon outline.
pub fn draw_polygon(img: &mut RgbImage, points: &[(i32, i32)], color: Rgb<u8>) {
    for i in 0..points.len() {
        draw_line(img, points[i], points[(i + 1) % points.len()], color);
    }
}

/// Filled disc marker.
pub fn draw_marker(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    let (cx, cy) = (clamp_coord(cx), clamp_coord(cy));

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel_clamped(img, cx + dx, cy + dy, color);
            }
        }
    }
}

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
const GLYPH_SCALE: i32 = 2;

/// Advance per character at the current scale, including spacing.
pub const CHAR_ADVANCE: i32 = (GLYPH_WIDTH + 1) * GLYPH_SCALE;

/// Label line height at the current scale.
pub const TEXT_HEIGHT: i32 = GLYPH_HEIGHT * GLYPH_SCALE;

/// 5x7 bitmap glyphs, one row per byte, bit 4 leftmost. Lowercase is
/// folded to uppercase before lookup; anything else renders as blank.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        _ => [0x00; 7],
    }
}

/// Renders `text` with its top-left corner at `(x, y)`.
pub fn draw_text(img: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
    let mut pen_x = clamp_coord(x);
    let y = clamp_coord(y);

    for c in text.chars() {
        let rows = glyph(c);

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    for sy in 0..GLYPH_SCALE {
                        for sx in 0..GLYPH_SCALE {
                            put_pixel_clamped(
                                img,
                                pen_x + col * GLYPH_SCALE + sx,
                                y + row as i32 * GLYPH_SCALE + sy,
                                color,
                            );
                        }
                    }
                }
            }
        }

        pen_x += CHAR_ADVANCE;
    }
}
