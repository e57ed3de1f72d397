//! 5x7 bitmap font, the last resort when no TrueType face parses.
//!
//! Covers space through `_` (ASCII 32..=95). Lowercase letters are
//! drawn as capitals; anything else is drawn as `?`.

use crate::outline::Outline;

const GLYPH_COLUMNS: usize = 5;
const GLYPH_ROWS: usize = 7;
/// Advance per character in cells: glyph plus one blank column.
const ADVANCE_CELLS: f64 = 6.0;
/// Line box height in cells: seven rows plus one for descent.
const EM_CELLS: f64 = 8.0;

/// Row bitmaps, top row first, bit 4 = leftmost column.
const GLYPHS: [[u8; GLYPH_ROWS]; 64] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // Space (32)
    [0x04, 0x04, 0x04, 0x04, 0x00, 0x04, 0x00], // ! (33)
    [0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00], // " (34)
    [0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x00, 0x00], // # (35)
    [0x04, 0x0E, 0x14, 0x0E, 0x05, 0x0E, 0x04], // $ (36)
    [0x19, 0x1A, 0x04, 0x0B, 0x13, 0x00, 0x00], // % (37)
    [0x0C, 0x12, 0x0C, 0x12, 0x13, 0x0D, 0x00], // & (38)
    [0x04, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00], // ' (39)
    [0x04, 0x08, 0x08, 0x08, 0x08, 0x04, 0x00], // ( (40)
    [0x04, 0x02, 0x02, 0x02, 0x02, 0x04, 0x00], // ) (41)
    [0x00, 0x15, 0x0E, 0x15, 0x00, 0x00, 0x00], // * (42)
    [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00], // + (43)
    [0x00, 0x00, 0x00, 0x00, 0x04, 0x04, 0x08], // , (44)
    [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00], // - (45)
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00], // . (46)
    [0x01, 0x02, 0x04, 0x08, 0x10, 0x00, 0x00], // / (47)
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E], // 0 (48)
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E], // 1 (49)
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F], // 2 (50)
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E], // 3 (51)
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02], // 4 (52)
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E], // 5 (53)
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E], // 6 (54)
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08], // 7 (55)
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E], // 8 (56)
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C], // 9 (57)
    [0x00, 0x04, 0x00, 0x00, 0x04, 0x00, 0x00], // : (58)
    [0x00, 0x04, 0x00, 0x00, 0x04, 0x04, 0x08], // ; (59)
    [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02], // < (60)
    [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00], // = (61)
    [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08], // > (62)
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04], // ? (63)
    [0x0E, 0x11, 0x17, 0x15, 0x17, 0x10, 0x0E], // @ (64)
    [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // A (65)
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E], // B (66)
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E], // C (67)
    [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E], // D (68)
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F], // E (69)
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10], // F (70)
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F], // G (71)
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // H (72)
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // I (73)
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C], // J (74)
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11], // K (75)
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F], // L (76)
    [0x11, 0x1B, 0x15, 0x11, 0x11, 0x11, 0x11], // M (77)
    [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11], // N (78)
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // O (79)
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10], // P (80)
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D], // Q (81)
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11], // R (82)
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E], // S (83)
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // T (84)
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // U (85)
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04], // V (86)
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11], // W (87)
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11], // X (88)
    [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04], // Y (89)
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F], // Z (90)
    [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E], // [ (91)
    [0x10, 0x08, 0x04, 0x02, 0x01, 0x00, 0x00], // \ (92)
    [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E], // ] (93)
    [0x04, 0x0A, 0x11, 0x00, 0x00, 0x00, 0x00], // ^ (94)
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F], // _ (95)
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitmapFont;

impl BitmapFont {
    fn glyph(ch: char) -> &'static [u8; GLYPH_ROWS] {
        let ch = ch.to_ascii_uppercase();
        let index = match ch as u32 {
            cp @ 32..=95 => cp - 32,
            _ => '?' as u32 - 32,
        };
        &GLYPHS[index as usize]
    }

    fn cell(size: f64) -> f64 {
        size / EM_CELLS
    }

    /// Width of `text` at `size`; the spacing column after the last
    /// character is not counted.
    pub fn measure(&self, text: &str, size: f64) -> f64 {
        let count = text.chars().count();
        if count == 0 {
            return 0.0;
        }
        (count as f64 * ADVANCE_CELLS - 1.0) * Self::cell(size)
    }

    pub fn ascent(&self, size: f64) -> f64 {
        GLYPH_ROWS as f64 * Self::cell(size)
    }

    /// One rectangle per horizontal run of lit cells.
    pub fn outline(&self, text: &str, size: f64, x: f64, top: f64) -> Outline {
        let cell = Self::cell(size);
        let mut outline = Outline::new();
        for (i, ch) in text.chars().enumerate() {
            let left = x + i as f64 * ADVANCE_CELLS * cell;
            for (row, bits) in Self::glyph(ch).iter().enumerate() {
                let y = top + row as f64 * cell;
                let mut col = 0;
                while col < GLYPH_COLUMNS {
                    if !lit(*bits, col) {
                        col += 1;
                        continue;
                    }
                    let start = col;
                    while col < GLYPH_COLUMNS && lit(*bits, col) {
                        col += 1;
                    }
                    outline.rect(
                        left + start as f64 * cell,
                        y,
                        (col - start) as f64 * cell,
                        cell,
                    );
                }
            }
        }
        outline
    }
}

fn lit(bits: u8, col: usize) -> bool {
    bits & (1 << (GLYPH_COLUMNS - 1 - col)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_without_trailing_gap() {
        let font = BitmapFont;
        assert_eq!(font.measure("", 8.0), 0.0);
        assert_eq!(font.measure("A", 8.0), 5.0);
        assert_eq!(font.measure("AB", 16.0), 22.0);
    }

    #[test]
    fn letter_i_spans_full_height() {
        let outline = BitmapFont.outline("I", 8.0, 0.0, 0.0);
        let (x0, y0, x1, y1) = outline.bounds().unwrap();
        assert!(x0 >= 0.0 && x1 <= 5.0);
        assert_eq!(y0, 0.0);
        assert_eq!(y1, 7.0);
    }

    #[test]
    fn lowercase_draws_as_capitals() {
        let font = BitmapFont;
        assert_eq!(
            font.outline("abc", 10.0, 0.0, 0.0),
            font.outline("ABC", 10.0, 0.0, 0.0)
        );
    }

    #[test]
    fn unknown_characters_draw_question_mark() {
        let font = BitmapFont;
        assert_eq!(
            font.outline("é", 10.0, 0.0, 0.0),
            font.outline("?", 10.0, 0.0, 0.0)
        );
        assert!(font.outline(" ", 10.0, 0.0, 0.0).is_empty());
    }
}
