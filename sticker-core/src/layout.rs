//! Placement of logo, text lines and barcode inside one label.
//!
//! All geometry is label-local with a top-left origin and expressed in
//! whatever unit the label size is given in (pixels for raster output,
//! points for a PDF cell). Every box is a fixed fraction of the label
//! so the same layout scales across label sizes and resolutions.

use serde::{Deserialize, Serialize};

use crate::record::LabelRecord;

/// Caption printed above the name on computer stickers.
pub const DEFAULT_CAPTION: &str = "Computer No:";

/// Axis-aligned box, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Frame {
            x,
            y,
            width,
            height,
        }
    }

    /// Largest box with the aspect ratio of `content_width` x
    /// `content_height` that fits inside this one, centred.
    pub fn fit(&self, content_width: f64, content_height: f64) -> Frame {
        if content_width <= 0.0 || content_height <= 0.0 {
            return Frame::new(self.x, self.y, 0.0, 0.0);
        }
        let scale = (self.width / content_width).min(self.height / content_height);
        let width = content_width * scale;
        let height = content_height * scale;
        Frame {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Horizontal start of a run of text so that it is centred on the
/// canvas. Text wider than the canvas starts left of zero.
pub fn centered_x(canvas_width: f64, text_width: f64) -> f64 {
    (canvas_width - text_width) / 2.0
}

/// Fractions of the label size that position each element. Sizes
/// marked `_h` scale with the label height, `_w` with the width.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub logo_size_h: f64,
    pub logo_margin_h: f64,
    pub font_size_h: f64,
    pub line_tops_h: Vec<f64>,
    pub barcode_width_w: f64,
    pub barcode_height_h: f64,
    pub barcode_bottom_margin_h: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LabelLayout {
    /// Code, name and district stacked above the barcode.
    #[default]
    ThreeLine,
    /// A fixed caption and the record name beside a large logo.
    Captioned { caption: String },
}

impl LabelLayout {
    pub fn captioned() -> Self {
        LabelLayout::Captioned {
            caption: DEFAULT_CAPTION.to_string(),
        }
    }

    pub fn params(&self) -> LayoutParams {
        match self {
            LabelLayout::ThreeLine => LayoutParams {
                logo_size_h: 0.28,
                logo_margin_h: 0.05,
                font_size_h: 0.11,
                line_tops_h: vec![0.05, 0.19, 0.33],
                barcode_width_w: 0.85,
                barcode_height_h: 0.30,
                barcode_bottom_margin_h: 0.06,
            },
            LabelLayout::Captioned { .. } => LayoutParams {
                logo_size_h: 0.40,
                logo_margin_h: 0.05,
                font_size_h: 0.11,
                line_tops_h: vec![0.10, 0.25],
                barcode_width_w: 0.75,
                barcode_height_h: 0.30,
                barcode_bottom_margin_h: 0.10,
            },
        }
    }

    /// Text lines for `record`, top to bottom.
    pub fn lines<'a>(&'a self, record: &'a LabelRecord) -> Vec<&'a str> {
        match self {
            LabelLayout::ThreeLine => vec![record.code(), record.name(), record.district()],
            LabelLayout::Captioned { caption } => vec![caption.as_str(), record.name()],
        }
    }

    /// Whether the district line appears on the label.
    pub fn prints_district(&self) -> bool {
        matches!(self, LabelLayout::ThreeLine)
    }

    /// Suffix used in single-image file names.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            LabelLayout::ThreeLine => "label",
            LabelLayout::Captioned { .. } => "sticker",
        }
    }

    /// Resolve the layout for a label of `width` x `height`.
    pub fn plan(&self, width: f64, height: f64) -> Plan {
        let p = self.params();
        let logo_size = p.logo_size_h * height;
        let margin = p.logo_margin_h * height;
        let barcode_width = p.barcode_width_w * width;
        let barcode_height = p.barcode_height_h * height;
        Plan {
            width,
            margin,
            logo: Frame::new(margin, margin, logo_size, logo_size),
            font_size: p.font_size_h * height,
            line_tops: p.line_tops_h.iter().map(|t| t * height).collect(),
            barcode: Frame::new(
                centered_x(width, barcode_width),
                height - p.barcode_bottom_margin_h * height - barcode_height,
                barcode_width,
                barcode_height,
            ),
        }
    }
}

/// Concrete boxes for one label size.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub width: f64,
    pub margin: f64,
    pub logo: Frame,
    pub font_size: f64,
    pub line_tops: Vec<f64>,
    pub barcode: Frame,
}

/// Where one text line goes and how large it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlacement {
    pub x: f64,
    pub font_size: f64,
}

impl Plan {
    /// Place a line whose top is at `top` and whose width at
    /// [`Plan::font_size`] is `text_width`.
    ///
    /// Lines are centred on the label. When a logo is drawn, a line
    /// sharing rows with the logo box is kept right of it, and a line
    /// too wide for its span is scaled down to fit.
    pub fn place_line(&self, top: f64, text_width: f64, with_logo: bool) -> LinePlacement {
        let logo = &self.logo;
        let beside_logo =
            with_logo && top < logo.y + logo.height && top + self.font_size > logo.y;
        let (mut left, mut right) = (0.0, self.width);
        if beside_logo {
            let clear = logo.x + logo.width + self.margin;
            if clear < self.width - self.margin {
                left = clear;
                right = self.width - self.margin;
            }
        }
        let scale = if text_width > right - left {
            (right - left) / text_width
        } else {
            1.0
        };
        let width = text_width * scale;
        LinePlacement {
            x: centered_x(self.width, width).max(left),
            font_size: self.font_size * scale,
        }
    }
}
