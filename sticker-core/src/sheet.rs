//! One label cell on a PDF page.

use std::io::Write;

use pdf_core::{Color, ImageId, PathOp, PdfDocument};

use crate::barcode::{BarcodeOptions, Code128};
use crate::error::Result;
use crate::layout::Frame;
use crate::logo::Logo;
use crate::outline::{Outline, PathSegment};
use crate::surface::LabelSurface;

/// Label-local drawing mapped onto a rectangle of the current page.
///
/// Units are points. The cell's bottom-left corner sits at `origin`
/// in page space; label-local y is flipped so the label's top edge
/// lands at `origin.1 + height`.
pub struct PdfCell<'a, W: Write> {
    doc: &'a mut PdfDocument<W>,
    origin: (f64, f64),
    width: f64,
    height: f64,
    logo: Option<ImageId>,
}

impl<'a, W: Write> PdfCell<'a, W> {
    /// `logo` is the embedded copy of whatever logo is passed to
    /// [`LabelSurface::draw_logo`]; without it logos are skipped.
    pub fn new(
        doc: &'a mut PdfDocument<W>,
        origin: (f64, f64),
        width: f64,
        height: f64,
        logo: Option<ImageId>,
    ) -> Self {
        PdfCell {
            doc,
            origin,
            width,
            height,
            logo,
        }
    }

    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.origin.0 + x, self.origin.1 + (self.height - y))
    }

    /// Page-space rectangle (x, y, w, h) of a label-local frame.
    fn map_frame(&self, frame: Frame) -> (f64, f64, f64, f64) {
        let (x, y) = self.map(frame.x, frame.y + frame.height);
        (x, y, frame.width, frame.height)
    }

    /// Outline segments as page-space path ops; quadratics are
    /// raised to cubics.
    fn path_ops(&self, outline: &Outline) -> Vec<PathOp> {
        let mut ops = Vec::with_capacity(outline.segments().len());
        let mut current = (0.0, 0.0);
        let mut start = (0.0, 0.0);
        for seg in outline.segments() {
            match *seg {
                PathSegment::MoveTo(x, y) => {
                    current = (x, y);
                    start = current;
                    let (px, py) = self.map(x, y);
                    ops.push(PathOp::MoveTo(px, py));
                }
                PathSegment::LineTo(x, y) => {
                    current = (x, y);
                    let (px, py) = self.map(x, y);
                    ops.push(PathOp::LineTo(px, py));
                }
                PathSegment::QuadTo(qx, qy, x, y) => {
                    let (x0, y0) = current;
                    let c1 = (x0 + 2.0 / 3.0 * (qx - x0), y0 + 2.0 / 3.0 * (qy - y0));
                    let c2 = (x + 2.0 / 3.0 * (qx - x), y + 2.0 / 3.0 * (qy - y));
                    ops.push(self.curve(c1, c2, (x, y)));
                    current = (x, y);
                }
                PathSegment::CubicTo(x1, y1, x2, y2, x, y) => {
                    ops.push(self.curve((x1, y1), (x2, y2), (x, y)));
                    current = (x, y);
                }
                PathSegment::Close => {
                    current = start;
                    ops.push(PathOp::Close);
                }
            }
        }
        ops
    }

    fn curve(&self, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) -> PathOp {
        let (x1, y1) = self.map(c1.0, c1.1);
        let (x2, y2) = self.map(c2.0, c2.1);
        let (x, y) = self.map(end.0, end.1);
        PathOp::CurveTo(x1, y1, x2, y2, x, y)
    }
}

impl<W: Write> LabelSurface for PdfCell<'_, W> {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, frame: Frame, color: Color) -> Result<()> {
        let (x, y, w, h) = self.map_frame(frame);
        self.doc.set_fill_color(color).rect(x, y, w, h).fill();
        Ok(())
    }

    fn fill_outline(&mut self, outline: &Outline, color: Color) -> Result<()> {
        if outline.is_empty() {
            return Ok(());
        }
        let ops = self.path_ops(outline);
        self.doc.set_fill_color(color).append_path(&ops).fill();
        Ok(())
    }

    fn draw_logo(&mut self, logo: &Logo, frame: Frame) -> Result<()> {
        let Some(id) = self.logo else {
            return Ok(());
        };
        let fitted = frame.fit(logo.width() as f64, logo.height() as f64);
        if fitted.width <= 0.0 || fitted.height <= 0.0 {
            return Ok(());
        }
        let (x, y, w, h) = self.map_frame(fitted);
        self.doc.draw_image(id, x, y, w, h);
        Ok(())
    }

    fn draw_barcode(
        &mut self,
        symbol: &Code128,
        options: &BarcodeOptions,
        frame: Frame,
    ) -> Result<()> {
        let modules = symbol.total_modules(options)? as f64;
        let module = frame.width / modules;
        let (x0, y, _, h) = self.map_frame(frame);
        self.doc.set_fill_color(Color::BLACK);
        for (start, width) in symbol.bars() {
            let x = x0 + (options.quiet_zone + start) as f64 * module;
            self.doc.rect(x, y, width as f64 * module, h);
        }
        self.doc.fill();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_text(doc: PdfDocument<Vec<u8>>) -> String {
        String::from_utf8_lossy(&doc.end_document().unwrap()).into_owned()
    }

    fn new_doc() -> PdfDocument<Vec<u8>> {
        let mut doc = PdfDocument::new(Vec::new()).unwrap();
        doc.set_compression(false);
        doc.begin_page(200.0, 100.0).unwrap();
        doc
    }

    #[test]
    fn flips_label_local_y() {
        let mut doc = new_doc();
        let mut cell = PdfCell::new(&mut doc, (10.0, 20.0), 50.0, 30.0, None);
        cell.fill_rect(Frame::new(0.0, 0.0, 5.0, 4.0), Color::BLACK)
            .unwrap();
        doc.end_page().unwrap();
        let text = pdf_text(doc);
        // Top-left 5x4 box of a cell whose top edge is at y = 50.
        assert!(text.contains("10 46 5 4 re"), "{}", text);
    }

    #[test]
    fn quadratic_becomes_cubic() {
        let mut doc = new_doc();
        let cell = PdfCell::new(&mut doc, (0.0, 0.0), 30.0, 30.0, None);
        let mut outline = Outline::new();
        outline.push(PathSegment::MoveTo(0.0, 30.0));
        outline.push(PathSegment::QuadTo(15.0, 0.0, 30.0, 30.0));
        outline.push(PathSegment::Close);
        let ops = cell.path_ops(&outline);
        assert_eq!(ops[0], PathOp::MoveTo(0.0, 0.0));
        match ops[1] {
            PathOp::CurveTo(x1, y1, x2, y2, x, y) => {
                assert!((x1 - 10.0).abs() < 1e-9 && (y1 - 20.0).abs() < 1e-9);
                assert!((x2 - 20.0).abs() < 1e-9 && (y2 - 20.0).abs() < 1e-9);
                assert_eq!((x, y), (30.0, 0.0));
            }
            other => panic!("expected curve, got {:?}", other),
        }
        assert_eq!(ops[2], PathOp::Close);
    }

    #[test]
    fn barcode_bars_are_vector_rects() {
        let mut doc = new_doc();
        let symbol = Code128::encode("COM001").unwrap();
        let mut cell = PdfCell::new(&mut doc, (0.0, 0.0), 200.0, 100.0, None);
        cell.draw_barcode(
            &symbol,
            &BarcodeOptions::default(),
            Frame::new(0.0, 50.0, 200.0, 40.0),
        )
        .unwrap();
        doc.end_page().unwrap();
        let text = pdf_text(doc);
        assert_eq!(text.matches(" re\n").count(), symbol.bars().len());
    }

    #[test]
    fn logo_without_embedded_image_is_skipped() {
        let mut doc = new_doc();
        let logo = Logo::from_image(image::RgbaImage::new(4, 4));
        let mut cell = PdfCell::new(&mut doc, (0.0, 0.0), 200.0, 100.0, None);
        cell.draw_logo(&logo, Frame::new(0.0, 0.0, 20.0, 20.0))
            .unwrap();
        doc.end_page().unwrap();
        assert!(!pdf_text(doc).contains(" Do"));
    }
}
