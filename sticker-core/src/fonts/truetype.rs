use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::FontLoadError;
use crate::outline::{Outline, PathSegment};

/// A loaded TrueType font with parsed metrics. Glyph outlines are
/// read from the raw data on demand.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    name: String,
    font_data: Vec<u8>,
    units_per_em: u16,
    ascent: i16,
    /// Unicode codepoint -> glyph ID
    cmap: BTreeMap<u32, u16>,
    /// Glyph ID -> advance width in font units
    glyph_widths: BTreeMap<u16, u16>,
    default_width: u16,
}

impl TrueTypeFont {
    /// Load and parse a .ttf/.otf file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FontLoadError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| FontLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data).map_err(|reason| FontLoadError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse a TrueType font from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, String> {
        let face =
            ttf_parser::Face::parse(&data, 0).map_err(|e| format!("Failed to parse TTF: {}", e))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err("Font reports zero units per em".to_string());
        }
        let ascent = face.ascender();
        let name = face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let mut cmap = BTreeMap::new();
        let subtables = face
            .tables()
            .cmap
            .ok_or("Font has no cmap table".to_string())?;
        for subtable in subtables.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|cp| {
                if let Some(gid) = subtable.glyph_index(cp) {
                    cmap.entry(cp).or_insert(gid.0);
                }
            });
        }

        let glyph_widths: BTreeMap<u16, u16> = (0..face.number_of_glyphs())
            .map(|gid| {
                let width = face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0);
                (gid, width)
            })
            .collect();
        // Default width = width of glyph 0 (notdef)
        let default_width = glyph_widths.get(&0).copied().unwrap_or(0);

        Ok(TrueTypeFont {
            name,
            font_data: data,
            units_per_em,
            ascent,
            cmap,
            glyph_widths,
            default_width,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn glyph(&self, ch: char) -> u16 {
        self.cmap.get(&(ch as u32)).copied().unwrap_or(0)
    }

    fn advance(&self, gid: u16) -> u16 {
        self.glyph_widths
            .get(&gid)
            .copied()
            .unwrap_or(self.default_width)
    }

    fn scale(&self, size: f64) -> f64 {
        size / self.units_per_em as f64
    }

    /// Measure text width at `size` (pixels or points, whichever unit
    /// `size` is in).
    pub fn measure(&self, text: &str, size: f64) -> f64 {
        let total: u32 = text
            .chars()
            .map(|ch| self.advance(self.glyph(ch)) as u32)
            .sum();
        total as f64 * self.scale(size)
    }

    /// Distance from the top of the line box to the baseline.
    pub fn ascent(&self, size: f64) -> f64 {
        self.ascent as f64 * self.scale(size)
    }

    /// Glyph outlines for `text` with the line box's top-left corner
    /// at (x, top).
    pub fn outline(&self, text: &str, size: f64, x: f64, top: f64) -> Outline {
        let mut outline = Outline::new();
        let face = match ttf_parser::Face::parse(&self.font_data, 0) {
            Ok(face) => face,
            // Parsed successfully at load time; nothing to draw otherwise.
            Err(_) => return outline,
        };
        let scale = self.scale(size);
        let baseline = top + self.ascent(size);
        let mut pen_x = x;
        for ch in text.chars() {
            let gid = self.glyph(ch);
            let mut pen = GlyphPen {
                outline: &mut outline,
                scale,
                origin_x: pen_x,
                baseline,
            };
            let _ = face.outline_glyph(ttf_parser::GlyphId(gid), &mut pen);
            pen_x += self.advance(gid) as f64 * scale;
        }
        outline
    }
}

/// Maps font units (y up, baseline origin) into label coordinates.
struct GlyphPen<'a> {
    outline: &'a mut Outline,
    scale: f64,
    origin_x: f64,
    baseline: f64,
}

impl GlyphPen<'_> {
    fn map(&self, x: f32, y: f32) -> (f64, f64) {
        (
            self.origin_x + x as f64 * self.scale,
            self.baseline - y as f64 * self.scale,
        )
    }
}

impl ttf_parser::OutlineBuilder for GlyphPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.outline.push(PathSegment::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.outline.push(PathSegment::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.outline.push(PathSegment::QuadTo(x1, y1, x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.outline.push(PathSegment::CubicTo(x1, y1, x2, y2, x, y));
    }

    fn close(&mut self) {
        self.outline.push(PathSegment::Close);
    }
}
