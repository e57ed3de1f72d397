//! Pixel canvas backed by `tiny-skia`, and PNG encoding of the result.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use log::debug;
use pdf_core::Color;
use png::{BitDepth, ColorType, Encoder, PixelDimensions, Unit};
use tiny_skia::{
    FillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform,
};

use crate::barcode::{BarcodeOptions, Code128};
use crate::error::{ConfigurationError, Result};
use crate::layout::Frame;
use crate::logo::Logo;
use crate::outline::{Outline, PathSegment};
use crate::spec::CM_PER_INCH;
use crate::surface::LabelSurface;

/// A finished label: opaque RGBA pixels at a known resolution.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pixmap: Pixmap,
    dpi: f64,
}

impl RenderedLabel {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Straight (non-premultiplied) RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(self.width(), self.height(), data)
            .unwrap_or_else(|| RgbaImage::new(self.width(), self.height()))
    }

    /// Encode as an 8-bit RGB PNG with the resolution stored in pHYs.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let rgb: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect();
        let per_metre = (self.dpi / (CM_PER_INCH / 100.0)).round() as u32;

        let mut out = Vec::new();
        let mut enc = Encoder::new(&mut out, self.width(), self.height());
        enc.set_color(ColorType::Rgb);
        enc.set_depth(BitDepth::Eight);
        enc.set_pixel_dims(Some(PixelDimensions {
            xppu: per_metre,
            yppu: per_metre,
            unit: Unit::Meter,
        }));
        let mut writer = enc.write_header()?;
        writer.write_image_data(&rgb)?;
        writer.finish()?;
        debug!(
            "encoded {}x{} label ({} bytes)",
            self.width(),
            self.height(),
            out.len()
        );
        Ok(out)
    }
}

/// Drawing surface for one label in pixels.
pub struct RasterCanvas {
    pixmap: Pixmap,
    dpi: f64,
}

impl RasterCanvas {
    /// Allocate a canvas filled with `background`.
    pub fn new(width: u32, height: u32, dpi: f64, background: Color) -> Result<Self> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(ConfigurationError::Canvas { width, height })?;
        pixmap.fill(skia_color(background));
        Ok(RasterCanvas { pixmap, dpi })
    }

    pub fn finish(self) -> RenderedLabel {
        RenderedLabel {
            pixmap: self.pixmap,
            dpi: self.dpi,
        }
    }

    /// Composite straight-alpha `image` with its top-left at (x, y).
    fn blit(&mut self, image: &RgbaImage, x: i32, y: i32) -> Result<()> {
        let (width, height) = image.dimensions();
        let size = IntSize::from_wh(width, height)
            .ok_or(ConfigurationError::Canvas { width, height })?;
        let premultiplied = image
            .pixels()
            .flat_map(|p| {
                let [r, g, b, a] = p.0;
                let m = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
                [m(r), m(g), m(b), a]
            })
            .collect();
        let src = Pixmap::from_vec(premultiplied, size)
            .ok_or(ConfigurationError::Canvas { width, height })?;
        self.pixmap.draw_pixmap(
            x,
            y,
            src.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }
}

impl LabelSurface for RasterCanvas {
    fn size(&self) -> (f64, f64) {
        (self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    fn fill_rect(&mut self, frame: Frame, color: Color) -> Result<()> {
        if let Some(rect) = Rect::from_xywh(
            frame.x as f32,
            frame.y as f32,
            frame.width as f32,
            frame.height as f32,
        ) {
            self.pixmap
                .fill_rect(rect, &paint(color), Transform::identity(), None);
        }
        Ok(())
    }

    fn fill_outline(&mut self, outline: &Outline, color: Color) -> Result<()> {
        let mut pb = PathBuilder::new();
        for seg in outline.segments() {
            match *seg {
                PathSegment::MoveTo(x, y) => pb.move_to(x as f32, y as f32),
                PathSegment::LineTo(x, y) => pb.line_to(x as f32, y as f32),
                PathSegment::QuadTo(x1, y1, x, y) => {
                    pb.quad_to(x1 as f32, y1 as f32, x as f32, y as f32)
                }
                PathSegment::CubicTo(x1, y1, x2, y2, x, y) => pb.cubic_to(
                    x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
                ),
                PathSegment::Close => pb.close(),
            }
        }
        // Empty or degenerate outlines (e.g. a line of spaces) have no path.
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    fn draw_logo(&mut self, logo: &Logo, frame: Frame) -> Result<()> {
        let fitted = frame.fit(logo.width() as f64, logo.height() as f64);
        let width = fitted.width.round() as u32;
        let height = fitted.height.round() as u32;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let scaled = imageops::resize(logo.image(), width, height, FilterType::Triangle);
        self.blit(&scaled, fitted.x.round() as i32, fitted.y.round() as i32)
    }

    fn draw_barcode(
        &mut self,
        symbol: &Code128,
        options: &BarcodeOptions,
        frame: Frame,
    ) -> Result<()> {
        let width = frame.width.floor() as u32;
        let height = frame.height.round() as u32;
        if width == 0 || height == 0 {
            return Ok(());
        }
        // Largest whole number of pixels per module that fits. Bar
        // widths are never resampled; only the height is stretched.
        let modules = symbol.total_modules(options)?;
        let module_px = (width / modules).max(1);
        if width < modules {
            debug!(
                "barcode needs {} modules but the box is {} px wide",
                modules, width
            );
        }
        let bars = symbol.rasterize(options, module_px)?;
        let bars = imageops::resize(&bars, bars.width(), height, FilterType::Nearest);
        let rgba = DynamicImage::ImageLuma8(bars).to_rgba8();
        let x = frame.x + (frame.width - rgba.width() as f64) / 2.0;
        self.blit(&rgba, x.round() as i32, frame.y.round() as i32)
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b] = color.to_rgb8();
    tiny_skia::Color::from_rgba8(r, g, b, 255)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}
