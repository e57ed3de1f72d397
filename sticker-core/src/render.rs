//! Drawing one label: logo, centred text lines and barcode.
//!
//! Lines that share rows with the logo are kept clear of it.

use pdf_core::Color;

use crate::barcode::{BarcodeOptions, Code128};
use crate::error::{Result, StickerError};
use crate::fonts::LabelFont;
use crate::layout::{Frame, LabelLayout};
use crate::logo::Logo;
use crate::raster::{RasterCanvas, RenderedLabel};
use crate::record::LabelRecord;
use crate::spec::LabelSpec;
use crate::surface::LabelSurface;

pub const BACKGROUND: Color = Color::WHITE;
pub const INK: Color = Color::BLACK;

/// Encode the barcode payload of the record at `index`.
pub fn encode_record(index: usize, record: &LabelRecord) -> Result<Code128> {
    Code128::encode(record.code()).map_err(|source| StickerError::Encoding {
        index,
        code: record.code().to_string(),
        source,
    })
}

/// Draws labels with a fixed font, layout and barcode geometry.
#[derive(Debug, Clone)]
pub struct LabelRenderer {
    font: LabelFont,
    layout: LabelLayout,
    barcode: BarcodeOptions,
}

impl LabelRenderer {
    pub fn new(font: LabelFont, layout: LabelLayout, barcode: BarcodeOptions) -> Self {
        LabelRenderer {
            font,
            layout,
            barcode,
        }
    }

    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    /// Draw `record` onto `surface`, filling the whole label.
    pub fn render<S: LabelSurface>(
        &self,
        surface: &mut S,
        record: &LabelRecord,
        symbol: &Code128,
        logo: Option<&Logo>,
    ) -> Result<()> {
        self.barcode.validate()?;
        let (width, height) = surface.size();
        let plan = self.layout.plan(width, height);

        surface.fill_rect(Frame::new(0.0, 0.0, width, height), BACKGROUND)?;
        if let Some(logo) = logo {
            surface.draw_logo(logo, plan.logo)?;
        }
        for (line, &top) in self.layout.lines(record).into_iter().zip(&plan.line_tops) {
            let text_width = self.font.measure(line, plan.font_size);
            let placed = plan.place_line(top, text_width, logo.is_some());
            let outline = self.font.outline(line, placed.font_size, placed.x, top);
            surface.fill_outline(&outline, INK)?;
        }
        surface.draw_barcode(symbol, &self.barcode, plan.barcode)
    }

    /// Render `record` to a fresh pixel canvas sized by `spec`.
    pub fn render_raster(
        &self,
        record: &LabelRecord,
        logo: Option<&Logo>,
        spec: &LabelSpec,
    ) -> Result<RenderedLabel> {
        let symbol = encode_record(0, record)?;
        self.rasterize(record, &symbol, logo, spec)
    }

    /// Like [`render_raster`](Self::render_raster) with an already
    /// encoded symbol.
    pub fn rasterize(
        &self,
        record: &LabelRecord,
        symbol: &Code128,
        logo: Option<&Logo>,
        spec: &LabelSpec,
    ) -> Result<RenderedLabel> {
        spec.validate()?;
        let mut canvas =
            RasterCanvas::new(spec.width_px(), spec.height_px(), spec.dpi, BACKGROUND)?;
        self.render(&mut canvas, record, symbol, logo)?;
        Ok(canvas.finish())
    }
}

impl Default for LabelRenderer {
    fn default() -> Self {
        LabelRenderer::new(
            LabelFont::builtin(),
            LabelLayout::default(),
            BarcodeOptions::default(),
        )
    }
}
