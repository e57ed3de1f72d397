//! Run configuration.
//!
//! A [`StickerConfig`] is built once (from a preset or a JSON file) and
//! passed by reference to everything that needs it.

use serde::{Deserialize, Serialize};

use crate::barcode::BarcodeOptions;
use crate::error::ConfigurationError;
use crate::layout::LabelLayout;
use crate::spec::{LabelSpec, PageSpec};

pub const DEFAULT_DPI: f64 = 203.0;

/// What to do when a record's code cannot be encoded as Code128.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingPolicy {
    /// Fail the whole run before any output is produced.
    #[default]
    Abort,
    /// Leave the record out and report it with the artifact.
    Skip,
}

/// Which output a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// One record, one PNG.
    ManualSingle,
    /// A ZIP archive with one PNG per record.
    BatchImages,
    /// One PDF with all labels tiled onto pages.
    BatchPdf,
}

/// Thin rectangle stroked around each label cell on PDF sheets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutGuides {
    pub enabled: bool,
    /// Gray level, 0.0 black to 1.0 white.
    pub gray: f64,
    /// Line width in points.
    pub line_width: f64,
}

impl Default for CutGuides {
    fn default() -> Self {
        CutGuides {
            enabled: true,
            gray: 0.6,
            line_width: 0.5,
        }
    }
}

/// Built-in label configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 6 x 3 cm record label.
    Cm6x3,
    /// 5 x 3 cm record label; 36 fit on an A4 sheet.
    Cm5x3,
    /// 400 x 200 px computer sticker with a caption.
    Sticker,
}

impl Preset {
    pub fn config(self, dpi: f64) -> StickerConfig {
        let (label, layout) = match self {
            Preset::Cm6x3 => (LabelSpec::new(6.0, 3.0, dpi), LabelLayout::ThreeLine),
            Preset::Cm5x3 => (LabelSpec::new(5.0, 3.0, dpi), LabelLayout::ThreeLine),
            Preset::Sticker => {
                // Physical size is fixed by the 203 DPI pixel design.
                let base = LabelSpec::from_pixels(400, 200, DEFAULT_DPI);
                (
                    LabelSpec::new(base.width_cm, base.height_cm, dpi),
                    LabelLayout::captioned(),
                )
            }
        };
        StickerConfig {
            label,
            layout,
            ..StickerConfig::default()
        }
    }
}

/// Everything a run needs besides its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerConfig {
    pub label: LabelSpec,
    pub page: PageSpec,
    pub layout: LabelLayout,
    pub barcode: BarcodeOptions,
    pub on_invalid_barcode: EncodingPolicy,
    pub cut_guides: CutGuides,
}

impl Default for StickerConfig {
    fn default() -> Self {
        StickerConfig {
            label: LabelSpec::new(6.0, 3.0, DEFAULT_DPI),
            page: PageSpec::A4,
            layout: LabelLayout::ThreeLine,
            barcode: BarcodeOptions::default(),
            on_invalid_barcode: EncodingPolicy::Abort,
            cut_guides: CutGuides::default(),
        }
    }
}

impl StickerConfig {
    /// Check sizes and barcode geometry that every output mode
    /// depends on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.label.validate()?;
        self.page.validate()?;
        self.barcode.validate()
    }
}
