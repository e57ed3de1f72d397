use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Object identifier: (object_number, generation_number).
/// Generation is always 0 for new documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub u32, pub u16);

/// The subset of PDF object types (PDF 32000-1:2008 Section 7.3)
/// needed to describe label sheets.
#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// PDF name object (stored without the leading `/`).
    Name(String),
    /// PDF literal string (stored without the enclosing parens).
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Key-value pairs. Uses Vec for deterministic output order.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn literal_string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn array(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(owned_entries(entries))
    }

    /// Uncompressed stream; `/Length` is added by the writer.
    pub fn stream(
        dict_entries: Vec<(&str, PdfObject)>,
        data: Vec<u8>,
    ) -> Self {
        PdfObject::Stream {
            dict: owned_entries(dict_entries),
            data,
        }
    }

    /// Stream compressed with zlib and tagged `/Filter /FlateDecode`.
    pub fn flate_stream(
        mut dict_entries: Vec<(&str, PdfObject)>,
        data: &[u8],
    ) -> io::Result<Self> {
        let mut encoder =
            ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        dict_entries
            .push(("Filter", PdfObject::name("FlateDecode")));
        Ok(PdfObject::stream(dict_entries, compressed))
    }

    /// Look up a dictionary or stream-dictionary entry.
    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        let entries = match self {
            PdfObject::Dictionary(entries) => entries,
            PdfObject::Stream { dict, .. } => dict,
            _ => return None,
        };
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

fn owned_entries(
    entries: Vec<(&str, PdfObject)>,
) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::ZlibDecoder;

    use super::*;

    #[test]
    fn obj_id_equality() {
        assert_eq!(ObjId(1, 0), ObjId(1, 0));
        assert_ne!(ObjId(1, 0), ObjId(2, 0));
    }

    #[test]
    fn dict_lookup() {
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("XObject")),
            ("Width", PdfObject::Integer(80)),
        ]);
        match obj.get("Width") {
            Some(PdfObject::Integer(80)) => {}
            other => panic!("unexpected entry: {:?}", other),
        }
        assert!(obj.get("Height").is_none());
    }

    #[test]
    fn flate_stream_round_trips() {
        let data = b"0 0 0 rg\n10 10 50 20 re\nf\n".repeat(20);
        let obj =
            PdfObject::flate_stream(vec![], &data).unwrap();
        match &obj {
            PdfObject::Stream { data: compressed, .. } => {
                assert!(compressed.len() < data.len());
                let mut decoded = Vec::new();
                ZlibDecoder::new(compressed.as_slice())
                    .read_to_end(&mut decoded)
                    .unwrap();
                assert_eq!(decoded, data);
            }
            _ => panic!("expected Stream"),
        }
        match obj.get("Filter") {
            Some(PdfObject::Name(n)) => {
                assert_eq!(n, "FlateDecode")
            }
            other => panic!("missing filter: {:?}", other),
        }
    }
}
