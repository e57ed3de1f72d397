use std::io::{self, Write};

use crate::graphics::{Color, PathOp};
use crate::images::{ColorSpace, ImageData, ImageId};
use crate::objects::{ObjId, PdfObject};
use crate::writer::PdfWriter;

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FREE_OBJ_NUM: u32 = 3;

/// High-level API for building PDF documents out of vector paths
/// and embedded images.
///
/// Generic over `Write`; label sheets are built into a `Vec<u8>`.
///
/// Pages are written incrementally: `end_page()` flushes page data
/// to the writer and frees page content from memory. Images are
/// written once by `add_image()` and can be drawn on any page.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    images: Vec<EmbeddedImage>,
    current_page: Option<PageBuilder>,
    next_obj_num: u32,
    compress: bool,
}

struct PageBuilder {
    width: f64,
    height: f64,
    content_ops: Vec<u8>,
}

struct EmbeddedImage {
    obj_id: ObjId,
    resource_name: String,
}

impl<W: Write> PdfDocument<W> {
    /// Create a new PDF document that writes to the given writer.
    /// Writes the PDF header immediately.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;
        Ok(PdfDocument {
            writer: pdf_writer,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            images: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_FREE_OBJ_NUM,
            compress: true,
        })
    }

    /// Set a document info entry (e.g. "Creator", "Title").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Toggle Flate compression of content and image streams.
    /// Enabled by default.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    fn alloc_obj_id(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }

    fn make_stream(
        &self,
        dict: Vec<(&str, PdfObject)>,
        data: Vec<u8>,
    ) -> io::Result<PdfObject> {
        if self.compress {
            PdfObject::flate_stream(dict, &data)
        } else {
            Ok(PdfObject::stream(dict, data))
        }
    }

    /// Embed an image as an XObject. The image (and its soft mask,
    /// if any) is written immediately; the returned handle can be
    /// drawn on any later page.
    pub fn add_image(&mut self, image: &ImageData) -> io::Result<ImageId> {
        let smask_id = match &image.smask_data {
            Some(alpha) => {
                let id = self.alloc_obj_id();
                let smask = self.make_stream(
                    image_dict(image.width, image.height, ColorSpace::DeviceGray),
                    alpha.clone(),
                )?;
                self.writer.write_object(id, &smask)?;
                Some(id)
            }
            None => None,
        };

        let obj_id = self.alloc_obj_id();
        let mut dict =
            image_dict(image.width, image.height, image.color_space);
        if let Some(smask) = smask_id {
            dict.push(("SMask", PdfObject::Reference(smask)));
        }
        let xobject = self.make_stream(dict, image.data.clone())?;
        self.writer.write_object(obj_id, &xobject)?;

        let id = ImageId(self.images.len());
        self.images.push(EmbeddedImage {
            obj_id,
            resource_name: format!("Im{}", self.images.len() + 1),
        });
        Ok(id)
    }

    /// Begin a new page with the given dimensions in points.
    /// If a page is currently open, it is automatically closed.
    pub fn begin_page(&mut self, width: f64, height: f64) -> io::Result<&mut Self> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
        });
        Ok(self)
    }

    fn push_op(&mut self, op: &str) -> &mut Self {
        let page = self
            .current_page
            .as_mut()
            .expect("graphics operation called with no open page");
        page.content_ops.extend_from_slice(op.as_bytes());
        page.content_ops.push(b'\n');
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        let op = format!(
            "{} {} {} rg",
            format_coord(color.r),
            format_coord(color.g),
            format_coord(color.b)
        );
        self.push_op(&op)
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        let op = format!(
            "{} {} {} RG",
            format_coord(color.r),
            format_coord(color.g),
            format_coord(color.b)
        );
        self.push_op(&op)
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.push_op(&format!("{} w", format_coord(width)))
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push_op(&format!("{} {} m", format_coord(x), format_coord(y)))
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push_op(&format!("{} {} l", format_coord(x), format_coord(y)))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn curve_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    ) -> &mut Self {
        let op = format!(
            "{} {} {} {} {} {} c",
            format_coord(x1),
            format_coord(y1),
            format_coord(x2),
            format_coord(y2),
            format_coord(x),
            format_coord(y)
        );
        self.push_op(&op)
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.push_op("h")
    }

    /// Append a rectangle subpath; (x, y) is the bottom-left corner.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let op = format!(
            "{} {} {} {} re",
            format_coord(x),
            format_coord(y),
            format_coord(width),
            format_coord(height)
        );
        self.push_op(&op)
    }

    /// Fill the current path with the nonzero winding rule.
    pub fn fill(&mut self) -> &mut Self {
        self.push_op("f")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.push_op("S")
    }

    /// Append every op of a path to the current page. The path is
    /// left open; follow with `fill()` or `stroke()`.
    pub fn append_path(&mut self, ops: &[PathOp]) -> &mut Self {
        for op in ops {
            match *op {
                PathOp::MoveTo(x, y) => self.move_to(x, y),
                PathOp::LineTo(x, y) => self.line_to(x, y),
                PathOp::CurveTo(x1, y1, x2, y2, x, y) => {
                    self.curve_to(x1, y1, x2, y2, x, y)
                }
                PathOp::Close => self.close_path(),
            };
        }
        self
    }

    /// Draw an embedded image scaled into the rectangle whose
    /// bottom-left corner is (x, y). Unknown handles draw nothing.
    pub fn draw_image(
        &mut self,
        image: ImageId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> &mut Self {
        let name = match self.images.get(image.0) {
            Some(img) => img.resource_name.clone(),
            None => return self,
        };
        let op = format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ",
            format_coord(width),
            format_coord(height),
            format_coord(x),
            format_coord(y),
            name
        );
        self.push_op(&op)
    }

    /// End the current page. Writes page objects to the
    /// writer and frees page content from memory.
    pub fn end_page(&mut self) -> io::Result<()> {
        let page = self.current_page.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "end_page called with no open page")
        })?;

        let content_id = self.alloc_obj_id();
        let page_id = self.alloc_obj_id();

        let content_stream = self.make_stream(vec![], page.content_ops)?;
        self.writer.write_object(content_id, &content_stream)?;

        let xobjects: Vec<(&str, PdfObject)> = self
            .images
            .iter()
            .map(|img| {
                (img.resource_name.as_str(), PdfObject::Reference(img.obj_id))
            })
            .collect();
        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            (
                "MediaBox",
                PdfObject::array(vec![
                    PdfObject::Integer(0),
                    PdfObject::Integer(0),
                    PdfObject::Real(page.width),
                    PdfObject::Real(page.height),
                ]),
            ),
            ("Contents", PdfObject::Reference(content_id)),
            (
                "Resources",
                PdfObject::dict(vec![("XObject", PdfObject::dict(xobjects))]),
            ),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Finish the document. Writes the catalog, pages tree,
    /// info dictionary, xref table, and trailer.
    /// Consumes self; no further operations are possible.
    pub fn end_document(mut self) -> io::Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc_obj_id();
            let entries: Vec<(&str, PdfObject)> = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids: Vec<PdfObject> = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

fn image_dict(
    width: u32,
    height: u32,
    color_space: ColorSpace,
) -> Vec<(&'static str, PdfObject)> {
    vec![
        ("Type", PdfObject::name("XObject")),
        ("Subtype", PdfObject::name("Image")),
        ("Width", PdfObject::Integer(width as i64)),
        ("Height", PdfObject::Integer(height as i64)),
        ("ColorSpace", PdfObject::name(color_space.pdf_name())),
        ("BitsPerComponent", PdfObject::Integer(8)),
    ]
}

/// Format a coordinate value for PDF content streams.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
}
