//! Built-in 3x5 bitmap font for labels.
//!
//! Labels are short uppercase strings (emotion types, names, confidences), so a
//! tiny block font avoids shipping a font file. Lowercase letters are drawn
//! as uppercase; any other unsupported character is drawn as `?`.

use image::{Rgb, RgbImage};

use crate::instruction::Anchor;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

/// Default pixel scale: 10px tall glyphs.
pub const DEFAULT_SCALE: i32 = 2;

fn glyph(ch: char) -> [u8; 5] {
    match ch.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        ' ' => [0b000; 5],
        _ => [0b111, 0b001, 0b010, 0b000, 0b010],
    }
}

/// Draw `text` with its baseline at `anchor`. Pixels off the image are dropped.
pub fn draw_text(img: &mut RgbImage, text: &str, anchor: Anchor, color: Rgb<u8>, scale: i32) {
    let scale = i64::from(scale.max(1));
    let width = i64::from(img.width());
    let top = i64::from(anchor.y) - i64::from(GLYPH_HEIGHT) * scale;
    let mut cursor_x = i64::from(anchor.x);

    for ch in text.chars() {
        if cursor_x >= width {
            break;
        }
        draw_glyph(img, cursor_x, top, glyph(ch), scale, color);
        cursor_x += i64::from(GLYPH_WIDTH + 1) * scale;
    }
}

fn draw_glyph(img: &mut RgbImage, x: i64, y: i64, bitmap: [u8; 5], scale: i64, color: Rgb<u8>) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));

    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + i64::from(col) * scale + dx;
                    let py = y + row as i64 * scale + dy;
                    if px >= 0 && py >= 0 && px < w && py < h {
                        img.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_text_at_i32_limits() {
        let mut img = RgbImage::new(10, 10);
        let white = Rgb([255, 255, 255]);
        draw_text(&mut img, "HELLO", Anchor::new(i32::MAX - 3, i32::MAX), white, 2);
        draw_text(&mut img, "HELLO", Anchor::new(i32::MIN, i32::MIN), white, 2);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_draw_text_sits_on_baseline() {
        let mut img = RgbImage::new(40, 40);
        let red = Rgb([255, 0, 0]);
        draw_text(&mut img, "I", Anchor::new(0, 20), red, 2);

        // Top bar of "I" occupies rows 10..12
        assert_eq!(*img.get_pixel(0, 10), red);
        assert_eq!(*img.get_pixel(0, 9), Rgb([0, 0, 0]));
        // Nothing at or below the baseline
        assert!((0..40).all(|x| *img.get_pixel(x, 20) == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_draw_text_off_canvas_is_clipped() {
        let mut img = RgbImage::new(10, 10);
        draw_text(&mut img, "HELLO", Anchor::new(-20, 3), Rgb([255, 255, 255]), 2);
        draw_text(&mut img, "HELLO", Anchor::new(50, 50), Rgb([255, 255, 255]), 2);
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph('é'), glyph('?'));
    }
}
