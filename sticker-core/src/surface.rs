use pdf_core::Color;

use crate::barcode::{BarcodeOptions, Code128};
use crate::error::Result;
use crate::layout::Frame;
use crate::logo::Logo;
use crate::outline::Outline;

/// Something a label can be drawn onto.
///
/// Coordinates are label-local: origin at the label's top-left corner,
/// y growing downward, in the unit of [`LabelSurface::size`]. Each
/// implementation maps them to its own space.
pub trait LabelSurface {
    /// Label width and height in surface units.
    fn size(&self) -> (f64, f64);

    fn fill_rect(&mut self, frame: Frame, color: Color) -> Result<()>;

    /// Fill a closed outline with the nonzero winding rule.
    fn fill_outline(&mut self, outline: &Outline, color: Color) -> Result<()>;

    /// Draw `logo` scaled to `frame`, using its alpha channel as mask.
    fn draw_logo(&mut self, logo: &Logo, frame: Frame) -> Result<()>;

    /// Draw `symbol` including its quiet zones inside `frame`, centred.
    /// Surfaces may keep bar widths whole so the symbol stays scannable.
    fn draw_barcode(
        &mut self,
        symbol: &Code128,
        options: &BarcodeOptions,
        frame: Frame,
    ) -> Result<()>;
}
