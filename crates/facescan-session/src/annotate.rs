//! Drawing match boxes and captions onto a photo surface.

use crate::font::{self, ADVANCE, GLYPH_HEIGHT};
use crate::presenter::Annotation;
use facescan_core::BoundingBox;
use image::{Rgba, RgbaImage};

/// Outline width in pixels, centred on the box edge.
pub const LINE_WIDTH: u32 = 4;
/// Caption baseline distance above the box.
pub const CAPTION_OFFSET: i64 = 10;
/// Font scale: 7 px glyphs drawn 21 px tall.
pub const CAPTION_SCALE: u32 = 3;

/// Fill the half-open rectangle [x0, x1) × [y0, y1), clipped to the surface.
fn fill_rect(surface: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    let x0 = x0.max(0);
    let y0 = y0.max(0);
    let x1 = x1.min(surface.width() as i64);
    let y1 = y1.min(surface.height() as i64);

    for y in y0..y1 {
        for x in x0..x1 {
            surface.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Stroke the outline of `bbox` with a line `width` px wide.
pub fn stroke_rect(surface: &mut RgbaImage, bbox: &BoundingBox, width: u32, color: Rgba<u8>) {
    let half = (width / 2) as i64;
    let left = bbox.x.round() as i64;
    let top = bbox.y.round() as i64;
    let right = (bbox.x + bbox.width).round() as i64;
    let bottom = (bbox.y + bbox.height).round() as i64;

    let (outer_l, outer_t) = (left - half, top - half);
    let (outer_r, outer_b) = (right + half, bottom + half);
    let (inner_l, inner_t) = (left + half, top + half);
    let (inner_r, inner_b) = (right - half, bottom - half);

    fill_rect(surface, outer_l, outer_t, outer_r, inner_t, color);
    fill_rect(surface, outer_l, inner_b, outer_r, outer_b, color);
    fill_rect(surface, outer_l, inner_t, inner_l, inner_b, color);
    fill_rect(surface, inner_r, inner_t, outer_r, inner_b, color);
}

/// Draw `text` with its left edge at `x` and its baseline at `baseline`.
pub fn draw_text(surface: &mut RgbaImage, text: &str, x: i64, baseline: i64, scale: u32, color: Rgba<u8>) {
    let scale_i = scale as i64;
    let top = baseline - (GLYPH_HEIGHT * scale) as i64;

    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as i64 * (ADVANCE * scale) as i64;
        for col in 0..font::GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !font::is_set(ch, col, row) {
                    continue;
                }
                let px = origin_x + col as i64 * scale_i;
                let py = top + row as i64 * scale_i;
                fill_rect(surface, px, py, px + scale_i, py + scale_i, color);
            }
        }
    }
}

/// Draw one match: tier-colored outline with its caption above.
pub fn draw_annotation(surface: &mut RgbaImage, annotation: &Annotation) {
    let [r, g, b] = annotation.tier.color();
    let color = Rgba([r, g, b, 255]);
    let bbox = &annotation.bbox;

    stroke_rect(surface, bbox, LINE_WIDTH, color);
    draw_text(
        surface,
        &annotation.caption,
        bbox.x.round() as i64,
        bbox.y.round() as i64 - CAPTION_OFFSET,
        CAPTION_SCALE,
        color,
    );
}
