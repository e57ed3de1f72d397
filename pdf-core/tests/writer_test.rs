use pdf_core::objects::{ObjId, PdfObject};
use pdf_core::writer::{escape_pdf_string, PdfWriter};

fn written(id: ObjId, obj: &PdfObject) -> String {
    let mut buf = Vec::new();
    let mut w = PdfWriter::new(&mut buf);
    w.write_object(id, obj).unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

#[test]
fn header_has_binary_comment() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::new(&mut buf);
    w.write_header().unwrap();
    assert!(buf.starts_with(b"%PDF-1.7\n%"));
    assert!(buf[10..14].iter().all(|&b| b >= 128));
}

#[test]
fn image_dictionary_layout() {
    let obj = PdfObject::dict(vec![
        ("Type", PdfObject::name("XObject")),
        ("Width", PdfObject::Integer(64)),
        ("SMask", PdfObject::Reference(ObjId(7, 0))),
    ]);
    let output = written(ObjId(8, 0), &obj);
    assert!(output.starts_with("8 0 obj\n"));
    assert!(output.contains("<< /Type /XObject /Width 64 /SMask 7 0 R >>"));
    assert!(output.ends_with("\nendobj\n"));
}

#[test]
fn media_box_array() {
    let obj = PdfObject::array(vec![
        PdfObject::Integer(0),
        PdfObject::Integer(0),
        PdfObject::Real(595.275591),
        PdfObject::Real(841.889764),
    ]);
    assert!(written(ObjId(1, 0), &obj).contains("[0 0 595.275591 841.889764]"));
}

#[test]
fn stream_gets_length() {
    let obj = PdfObject::stream(vec![], b"0 0 1 1 re\nf".to_vec());
    let output = written(ObjId(4, 0), &obj);
    assert!(output.contains("<< /Length 12 >>\nstream\n0 0 1 1 re\nf\nendstream"));
}

#[test]
fn info_strings_are_escaped() {
    let obj = PdfObject::literal_string("Stickers (5x3) \\ A4");
    assert!(written(ObjId(1, 0), &obj).contains("(Stickers \\(5x3\\) \\\\ A4)"));
    assert_eq!(escape_pdf_string("plain"), "plain");
}

#[test]
fn xref_entries_are_twenty_bytes() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::new(&mut buf);
    w.write_header().unwrap();
    w.write_object(ObjId(1, 0), &PdfObject::name("Catalog"))
        .unwrap();
    w.write_xref_and_trailer(ObjId(1, 0), None).unwrap();

    let marker = b"xref\n0 2\n";
    let start = buf
        .windows(marker.len())
        .position(|w| w == marker)
        .unwrap()
        + marker.len();
    let entries = &buf[start..start + 40];
    assert_eq!(&entries[18..20], b"\r\n");
    assert_eq!(&entries[38..40], b"\r\n");
    assert_eq!(&entries[..20], b"0000000000 65535 f\r\n");
}

#[test]
fn trailer_points_at_root_and_info() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::new(&mut buf);
    w.write_header().unwrap();
    w.write_object(ObjId(1, 0), &PdfObject::name("Catalog"))
        .unwrap();
    let info = PdfObject::dict(vec![("Creator", PdfObject::literal_string("sticker"))]);
    w.write_object(ObjId(2, 0), &info).unwrap();
    w.write_xref_and_trailer(ObjId(1, 0), Some(ObjId(2, 0)))
        .unwrap();

    let output = String::from_utf8_lossy(&buf);
    assert!(output.contains("trailer\n<< /Size 3 /Root 1 0 R /Info 2 0 R >>"));
    assert!(output.contains("startxref\n"));
    assert!(output.ends_with("%%EOF\n"));
}

#[test]
fn startxref_offset_points_at_table() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::new(&mut buf);
    w.write_header().unwrap();
    w.write_object(ObjId(1, 0), &PdfObject::Integer(1)).unwrap();
    w.write_xref_and_trailer(ObjId(1, 0), None).unwrap();

    let output = String::from_utf8_lossy(&buf).into_owned();
    let tail = output.rsplit("startxref\n").next().unwrap();
    let offset: usize = tail.trim_end_matches("\n%%EOF\n").parse().unwrap();
    assert!(output[offset..].starts_with("xref\n"));
}
