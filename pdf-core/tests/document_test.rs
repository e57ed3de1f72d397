use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use pdf_core::{Color, PdfDocument};

fn uncompressed() -> PdfDocument<Vec<u8>> {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.set_compression(false);
    doc
}

fn finish(doc: PdfDocument<Vec<u8>>) -> String {
    String::from_utf8_lossy(&doc.end_document().unwrap()).into_owned()
}

#[test]
fn zero_page_document_is_well_formed() {
    let output = finish(uncompressed());
    assert!(output.starts_with("%PDF-1.7"));
    assert!(output.contains("/Type /Pages /Kids [] /Count 0"));
    assert!(output.contains("/Type /Catalog"));
    assert!(output.ends_with("%%EOF\n"));
}

#[test]
fn info_entries_are_written() {
    let mut doc = uncompressed();
    doc.set_info("Title", "Stickers 5x3 cm")
        .set_info("Creator", "sticker");
    doc.begin_page(595.0, 842.0).unwrap();
    let output = finish(doc);
    assert!(output.contains("<< /Title (Stickers 5x3 cm) /Creator (sticker) >>"));
    assert!(output.contains("/Info "));
}

#[test]
fn page_has_media_box_and_content() {
    let mut doc = uncompressed();
    doc.begin_page(595.5, 842.0)
        .unwrap()
        .set_fill_color(Color::BLACK)
        .rect(10.0, 20.0, 30.0, 40.0)
        .fill();
    doc.end_page().unwrap();
    let output = finish(doc);
    assert!(output.contains("/MediaBox [0 0 595.5 842.0]"));
    assert!(output.contains("0 0 0 rg\n10 20 30 40 re\nf\n"));
}

#[test]
fn end_page_flushes_to_writer() {
    struct CountingWriter {
        written: Rc<RefCell<usize>>,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            *self.written.borrow_mut() += buf.len();
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let written = Rc::new(RefCell::new(0usize));
    let mut doc = PdfDocument::new(CountingWriter {
        written: written.clone(),
    })
    .unwrap();
    let after_header = *written.borrow();

    doc.begin_page(595.0, 842.0)
        .unwrap()
        .rect(0.0, 0.0, 10.0, 10.0)
        .stroke();
    assert_eq!(*written.borrow(), after_header);

    doc.end_page().unwrap();
    assert!(*written.borrow() > after_header);
}

#[test]
fn begin_page_closes_the_open_page() {
    let mut doc = uncompressed();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    let output = finish(doc);
    assert!(output.contains("/Count 2"));
}

#[test]
fn end_document_closes_the_open_page() {
    let mut doc = uncompressed();
    doc.begin_page(595.0, 842.0)
        .unwrap()
        .set_stroke_color(Color::gray(0.6))
        .set_line_width(0.5)
        .rect(0.0, 0.0, 141.7323, 85.0394)
        .stroke();
    let output = finish(doc);
    assert!(output.contains("/Count 1"));
    assert!(output.contains("0.6 0.6 0.6 RG\n0.5 w\n0 0 141.7323 85.0394 re\nS"));
}

#[test]
fn compression_shrinks_repetitive_pages() {
    let build = |compress: bool| -> usize {
        let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
        doc.set_compression(compress);
        for page in 0..3 {
            doc.begin_page(595.0, 842.0).unwrap();
            for i in 0..200 {
                doc.rect(i as f64, page as f64, 2.0, 50.0);
            }
            doc.fill();
        }
        doc.end_document().unwrap().len()
    };
    let packed = build(true);
    let plain = build(false);
    assert!(packed < plain, "{} >= {}", packed, plain);
}

#[test]
fn end_page_without_open_page_is_an_error() {
    let mut doc = uncompressed();
    assert!(doc.end_page().is_err());
}
