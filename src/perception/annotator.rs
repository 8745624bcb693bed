/// Draw review annotations onto a copy of the source frame: one box outline
/// per exported region plus its sequence index, so a human can match the
/// numbered crops back to their on-screen locations.
use image::{DynamicImage, RgbaImage};

use crate::perception::types::RegionArtifact;

const BOX_COLOUR: [u8; 4] = [255, 68, 68, 220];
const LABEL_COLOUR: [u8; 4] = [255, 255, 255, 230];

/// Annotate the frame with every artifact's bounding box and index.
///
/// On high-resolution frames (width > 1600) boxes and labels are drawn at 2x
/// scale so they stay readable.
pub fn annotate(source: &DynamicImage, artifacts: &[RegionArtifact]) -> RgbaImage {
    let mut canvas = source.to_rgba8();
    let (w, _) = canvas.dimensions();

    let label_scale: u32 = if w > 1600 { 2 } else { 1 };
    let box_thickness: i32 = if w > 1600 { 3 } else { 2 };

    for artifact in artifacts {
        let b = artifact.region.bbox;
        let x1 = b.x as i32;
        let y1 = b.y as i32;
        let x2 = (b.x + b.width) as i32 - 1;
        let y2 = (b.y + b.height) as i32 - 1;

        draw_rect(&mut canvas, x1, y1, x2, y2, BOX_COLOUR, box_thickness);

        let label = artifact.index.to_string();
        let label_h_px = (5 * label_scale + 4) as i32;
        draw_label_bg(
            &mut canvas,
            x1,
            (y1 - label_h_px).max(0),
            &label,
            LABEL_COLOUR,
            label_scale,
        );
    }

    canvas
}

// ── Drawing primitives ──────────────────────────────────────────────────────

fn draw_rect(
    canvas: &mut RgbaImage,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    col: [u8; 4],
    thickness: i32,
) {
    let (w, h) = canvas.dimensions();
    let (iw, ih) = (w as i32, h as i32);

    // Top & bottom edges
    for t in 0..thickness {
        let ty = y1 + t;
        let by = y2 - t;
        for x in x1..=x2 {
            if x >= 0 && x < iw {
                if ty >= 0 && ty < ih {
                    set_pixel(canvas, x as u32, ty as u32, col);
                }
                if by >= 0 && by < ih {
                    set_pixel(canvas, x as u32, by as u32, col);
                }
            }
        }
    }
    // Left & right edges
    for t in 0..thickness {
        let lx = x1 + t;
        let rx = x2 - t;
        for y in y1..=y2 {
            if y >= 0 && y < ih {
                if lx >= 0 && lx < iw {
                    set_pixel(canvas, lx as u32, y as u32, col);
                }
                if rx >= 0 && rx < iw {
                    set_pixel(canvas, rx as u32, y as u32, col);
                }
            }
        }
    }
}

fn draw_label_bg(canvas: &mut RgbaImage, x: i32, y: i32, text: &str, col: [u8; 4], scale: u32) {
    let (w, h) = canvas.dimensions();
    let x = x.max(0) as u32;
    let y = y.max(0) as u32;
    let char_w = 5 * scale + 1; // glyph width + 1px gap
    let char_h = 5 * scale;
    let pad = 2 * scale;
    let label_w = text.len() as u32 * char_w + pad * 2;
    let label_h = char_h + pad * 2;

    // Dark background so the index stays legible on any screenshot.
    for dy in 0..label_h {
        for dx in 0..label_w {
            let px = x + dx;
            let py = y + dy;
            if px < w && py < h {
                let p = canvas.get_pixel_mut(px, py);
                p[0] = (p[0] as f32 * 0.2) as u8;
                p[1] = (p[1] as f32 * 0.2) as u8;
                p[2] = (p[2] as f32 * 0.2) as u8;
                p[3] = 255;
            }
        }
    }

    let text_x = x + pad;
    let text_y = y + pad;
    let step = 5 * scale + 1;

    for (i, c) in text.chars().enumerate() {
        let gx = text_x + i as u32 * step;
        if gx + 5 * scale >= w {
            break;
        }
        draw_digit(canvas, c, gx, text_y, col, scale);
    }
}

/// Minimal 5x5 bitmap renderer for the digits used by sequence labels.
fn draw_digit(canvas: &mut RgbaImage, c: char, px: u32, py: u32, col: [u8; 4], scale: u32) {
    let glyph = match c {
        '0'..='9' => DIGIT_FONT[(c as u8 - b'0') as usize],
        _ => return,
    };
    let (w, h) = canvas.dimensions();
    for (row, &bits) in glyph.iter().enumerate() {
        for bit in 0..5u32 {
            if (bits >> (4 - bit)) & 1 == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    let x = px + bit * scale + sx;
                    let y = py + row as u32 * scale + sy;
                    if x < w && y < h {
                        set_pixel(canvas, x, y, col);
                    }
                }
            }
        }
    }
}

fn set_pixel(canvas: &mut RgbaImage, x: u32, y: u32, col: [u8; 4]) {
    let p = canvas.get_pixel_mut(x, y);
    let a = col[3] as f32 / 255.0;
    p[0] = (p[0] as f32 * (1.0 - a) + col[0] as f32 * a).round() as u8;
    p[1] = (p[1] as f32 * (1.0 - a) + col[1] as f32 * a).round() as u8;
    p[2] = (p[2] as f32 * (1.0 - a) + col[2] as f32 * a).round() as u8;
    p[3] = 255;
}

/// 5x5 bitmap glyphs for '0'-'9'.
const DIGIT_FONT: [[u8; 5]; 10] = [
    [0b01110, 0b10001, 0b10001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00110, 0b01000, 0b11111], // 2
    [0b11110, 0b00001, 0b00110, 0b00001, 0b11110], // 3
    [0b00110, 0b01010, 0b10010, 0b11111, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b11110], // 5
    [0b01110, 0b10000, 0b11110, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b00100], // 7
    [0b01110, 0b10001, 0b01110, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b01111, 0b00001, 0b01110], // 9
];
