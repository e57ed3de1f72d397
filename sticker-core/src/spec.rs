//! Physical label and page sizes, and their conversion to pixels
//! and PDF points.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub const CM_PER_INCH: f64 = 2.54;
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert centimetres to raster pixels at `dpi`.
pub fn cm_to_px(cm: f64, dpi: f64) -> u32 {
    (cm / CM_PER_INCH * dpi).round() as u32
}

/// Convert centimetres to PDF points.
pub fn cm_to_pt(cm: f64) -> f64 {
    cm / CM_PER_INCH * POINTS_PER_INCH
}

/// Physical label size plus the raster resolution labels are
/// rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub width_cm: f64,
    pub height_cm: f64,
    pub dpi: f64,
}

impl LabelSpec {
    pub fn new(width_cm: f64, height_cm: f64, dpi: f64) -> Self {
        LabelSpec {
            width_cm,
            height_cm,
            dpi,
        }
    }

    /// Label defined by its pixel size at `dpi`, for layouts that were
    /// designed on a fixed pixel canvas.
    pub fn from_pixels(width_px: u32, height_px: u32, dpi: f64) -> Self {
        LabelSpec {
            width_cm: width_px as f64 / dpi * CM_PER_INCH,
            height_cm: height_px as f64 / dpi * CM_PER_INCH,
            dpi,
        }
    }

    pub fn width_px(&self) -> u32 {
        cm_to_px(self.width_cm, self.dpi)
    }

    pub fn height_px(&self) -> u32 {
        cm_to_px(self.height_cm, self.dpi)
    }

    pub fn width_pt(&self) -> f64 {
        cm_to_pt(self.width_cm)
    }

    pub fn height_pt(&self) -> f64 {
        cm_to_pt(self.height_cm)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        positive("label width", self.width_cm)?;
        positive("label height", self.height_cm)?;
        positive("dpi", self.dpi)?;
        if self.width_px() == 0 || self.height_px() == 0 {
            return Err(ConfigurationError::Canvas {
                width: self.width_px(),
                height: self.height_px(),
            });
        }
        Ok(())
    }
}

/// Page the labels are tiled onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PageSpec {
    pub const A4: PageSpec = PageSpec {
        width_cm: 21.0,
        height_cm: 29.7,
    };

    pub fn width_pt(&self) -> f64 {
        cm_to_pt(self.width_cm)
    }

    pub fn height_pt(&self) -> f64 {
        cm_to_pt(self.height_cm)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        positive("page width", self.width_cm)?;
        positive("page height", self.height_cm)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        PageSpec::A4
    }
}

fn positive(what: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidDimension { what, value })
    }
}

/// Render a centimetre value for file names: `6`, `5.5`.
pub fn format_cm(cm: f64) -> String {
    let s = format!("{:.2}", cm);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
