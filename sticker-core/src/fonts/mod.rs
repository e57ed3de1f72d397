//! Font resolution for label text.
//!
//! A run resolves its font once. A TrueType file is used when it loads;
//! otherwise the bundled DejaVu Sans face is used, so the same inputs
//! always render the same pixels regardless of what the host has
//! installed.

mod bitmap;
mod truetype;

use std::path::Path;

use log::{error, info, warn};

pub use bitmap::BitmapFont;
pub use truetype::TrueTypeFont;

use crate::outline::Outline;

/// DejaVu Sans, Bitstream Vera license (see `assets/fonts`).
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

#[derive(Debug, Clone)]
pub enum LabelFont {
    /// The face shipped with the crate.
    Bundled(TrueTypeFont),
    /// A face loaded from a user-supplied file.
    TrueType(TrueTypeFont),
    Bitmap(BitmapFont),
}

impl LabelFont {
    /// The bundled face, or the bitmap font if it cannot be parsed.
    pub fn builtin() -> Self {
        match TrueTypeFont::from_bytes(BUNDLED_FONT.to_vec()) {
            Ok(font) => LabelFont::Bundled(font),
            Err(reason) => {
                error!("bundled font unusable ({}); using bitmap font", reason);
                LabelFont::Bitmap(BitmapFont)
            }
        }
    }

    /// Load `path` if given, falling back to the bundled font when the
    /// file cannot be read or parsed.
    pub fn resolve(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("no font configured, using bundled font");
            return Self::builtin();
        };
        match TrueTypeFont::from_file(path) {
            Ok(font) => {
                info!("using font {} from {}", font.name(), path.display());
                LabelFont::TrueType(font)
            }
            Err(err) => {
                warn!("{}; falling back to bundled font", err);
                Self::builtin()
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, LabelFont::TrueType(_))
    }

    pub fn measure(&self, text: &str, size: f64) -> f64 {
        match self {
            LabelFont::Bundled(font) | LabelFont::TrueType(font) => font.measure(text, size),
            LabelFont::Bitmap(font) => font.measure(text, size),
        }
    }

    pub fn ascent(&self, size: f64) -> f64 {
        match self {
            LabelFont::Bundled(font) | LabelFont::TrueType(font) => font.ascent(size),
            LabelFont::Bitmap(font) => font.ascent(size),
        }
    }

    /// Outline of `text` with the line box's top-left corner at (x, top).
    pub fn outline(&self, text: &str, size: f64, x: f64, top: f64) -> Outline {
        match self {
            LabelFont::Bundled(font) | LabelFont::TrueType(font) => {
                font.outline(text, size, x, top)
            }
            LabelFont::Bitmap(font) => font.outline(text, size, x, top),
        }
    }
}

impl Default for LabelFont {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::FontLoadError;

    const SYSTEM_FONTS: [&str; 3] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
    ];

    #[test]
    fn no_path_gives_bundled_face() {
        let font = LabelFont::resolve(None);
        assert!(font.is_builtin());
        match font {
            LabelFont::Bundled(face) => assert_eq!(face.name(), "DejaVu Sans"),
            other => panic!("expected bundled face, got {:?}", other.is_builtin()),
        }
    }

    #[test]
    fn bundled_face_keeps_case_and_accents() {
        let font = LabelFont::builtin();
        assert_ne!(font.measure("Lab PC", 20.0), font.measure("LAB PC", 20.0));
        assert_ne!(
            font.outline("Lab PC", 20.0, 0.0, 0.0),
            font.outline("LAB PC", 20.0, 0.0, 0.0)
        );
        assert_ne!(
            font.outline("é", 20.0, 0.0, 0.0),
            font.outline("?", 20.0, 0.0, 0.0)
        );
        assert!(!font.outline("Zürich", 20.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn missing_file_falls_back() {
        let font = LabelFont::resolve(Some(Path::new("/nonexistent/arial.ttf")));
        assert!(font.is_builtin());
    }

    #[test]
    fn missing_file_reports_read_error() {
        match TrueTypeFont::from_file("/nonexistent/arial.ttf") {
            Err(FontLoadError::Read { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/arial.ttf"));
            }
            other => panic!("expected read error, got {:?}", other.map(|f| f.name().to_string())),
        }
    }

    #[test]
    fn garbage_bytes_do_not_parse() {
        assert!(TrueTypeFont::from_bytes(b"not a font at all".to_vec()).is_err());
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = LabelFont::resolve(None);
        let b = LabelFont::resolve(Some(Path::new("/nonexistent.ttf")));
        assert_eq!(a.outline("COM001", 20.0, 3.0, 4.0), b.outline("COM001", 20.0, 3.0, 4.0));
        assert_eq!(a.measure("COM001", 20.0), b.measure("COM001", 20.0));
    }

    #[test]
    fn system_truetype_measures_and_outlines() {
        let Some(path) = SYSTEM_FONTS.iter().map(Path::new).find(|p| p.exists()) else {
            return;
        };
        let font = LabelFont::resolve(Some(path));
        assert!(!font.is_builtin());
        let narrow = font.measure("il", 20.0);
        let wide = font.measure("WM", 20.0);
        assert!(wide > narrow);
        let outline = font.outline("H", 20.0, 0.0, 0.0);
        let (_, y0, _, y1) = outline.bounds().unwrap();
        assert!(y0 >= 0.0);
        assert!(y1 <= font.ascent(20.0) + 0.01);
    }
}
