//! Turning records into deliverable files: a single PNG, a ZIP of
//! PNGs or a tiled PDF sheet.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use log::{debug, info, warn};
use pdf_core::{Color, PdfDocument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::barcode::{BarcodeError, Code128};
use crate::config::{EncodingPolicy, LabelStyle, StickerConfig};
use crate::error::{Result, StickerError};
use crate::fonts::LabelFont;
use crate::logo::Logo;
use crate::record::LabelRecord;
use crate::render::{encode_record, LabelRenderer};
use crate::sheet::PdfCell;
use crate::spec::format_cm;
use crate::tiler::Grid;

pub const PNG_MEDIA_TYPE: &str = "image/png";
pub const ZIP_MEDIA_TYPE: &str = "application/zip";
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A finished output file, ready for the caller to deliver.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
    /// Records left out under [`EncodingPolicy::Skip`].
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub code: String,
    pub reason: BarcodeError,
}

/// Produces artifacts for one configuration, font and logo.
pub struct Assembler {
    config: StickerConfig,
    renderer: LabelRenderer,
    logo: Option<Logo>,
}

impl Assembler {
    pub fn new(config: StickerConfig, font: LabelFont, logo: Option<Logo>) -> Self {
        let renderer = LabelRenderer::new(font, config.layout.clone(), config.barcode);
        Assembler {
            config,
            renderer,
            logo,
        }
    }

    pub fn config(&self) -> &StickerConfig {
        &self.config
    }

    pub fn generate(&self, style: LabelStyle, records: &[LabelRecord]) -> Result<Artifact> {
        match style {
            LabelStyle::ManualSingle => match records {
                [record] => self.single(record),
                _ => Err(StickerError::RecordCount {
                    expected: 1,
                    found: records.len(),
                }),
            },
            LabelStyle::BatchImages => self.archive(records),
            LabelStyle::BatchPdf => self.document(records),
        }
    }

    /// One PNG named after the record's code.
    pub fn single(&self, record: &LabelRecord) -> Result<Artifact> {
        self.config.validate()?;
        let symbol = encode_record(0, record)?;
        let label =
            self.renderer
                .rasterize(record, &symbol, self.logo.as_ref(), &self.config.label)?;
        let file_name = format!(
            "{}_{}.png",
            safe_file_stem(record.code()),
            self.config.layout.file_suffix()
        );
        let bytes = label.encode_png()?;
        info!("rendered {} ({} bytes)", file_name, bytes.len());
        Ok(Artifact {
            file_name,
            media_type: PNG_MEDIA_TYPE,
            bytes,
            skipped: Vec::new(),
        })
    }

    /// A ZIP archive with one `{code}.png` per record.
    pub fn archive(&self, records: &[LabelRecord]) -> Result<Artifact> {
        self.config.validate()?;
        let (prepared, skipped) = self.prepare(records)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut names = HashSet::new();
        for (record, symbol) in &prepared {
            let label =
                self.renderer
                    .rasterize(record, symbol, self.logo.as_ref(), &self.config.label)?;
            let png = label.encode_png()?;
            let name = unique_name(&mut names, safe_file_stem(record.code()), "png");
            debug!("adding {}", name);
            zip.start_file(name, options)?;
            zip.write_all(&png)?;
        }
        let bytes = zip.finish()?.into_inner();

        let file_name = format!("{}.zip", self.batch_stem());
        info!(
            "archived {} labels into {} ({} skipped)",
            prepared.len(),
            file_name,
            skipped.len()
        );
        Ok(Artifact {
            file_name,
            media_type: ZIP_MEDIA_TYPE,
            bytes,
            skipped,
        })
    }

    /// One PDF with labels tiled across as many pages as needed.
    pub fn document(&self, records: &[LabelRecord]) -> Result<Artifact> {
        self.config.validate()?;
        let label = &self.config.label;
        let page = &self.config.page;
        let grid = Grid::new(label, page)?;
        let (prepared, skipped) = self.prepare(records)?;
        debug!(
            "{} columns x {} rows per page, {} pages",
            grid.columns(),
            grid.rows(),
            grid.page_count(prepared.len())
        );

        let mut doc = PdfDocument::new(Vec::new())?;
        doc.set_info(
            "Title",
            &format!("Stickers {}x{} cm", format_cm(label.width_cm), format_cm(label.height_cm)),
        );
        doc.set_info("Creator", concat!("sticker ", env!("CARGO_PKG_VERSION")));
        let logo_id = match &self.logo {
            Some(logo) => Some(doc.add_image(&logo.to_image_data()?)?),
            None => None,
        };

        let (cell_w, cell_h) = (label.width_pt(), label.height_pt());
        let guides = self.config.cut_guides;
        let mut open_page = None;
        for (pos, (record, symbol)) in grid.positions(prepared.len()).zip(&prepared) {
            if open_page != Some(pos.page_index) {
                doc.begin_page(page.width_pt(), page.height_pt())?;
                debug!("page {}", pos.page_index + 1);
                open_page = Some(pos.page_index);
            }
            let mut cell = PdfCell::new(
                &mut doc,
                (pos.x_origin, pos.y_origin),
                cell_w,
                cell_h,
                logo_id,
            );
            self.renderer
                .render(&mut cell, record, symbol, self.logo.as_ref())?;
            if guides.enabled {
                doc.set_stroke_color(Color::gray(guides.gray))
                    .set_line_width(guides.line_width)
                    .rect(pos.x_origin, pos.y_origin, cell_w, cell_h)
                    .stroke();
            }
        }
        let pages = grid.page_count(prepared.len());
        let bytes = doc.end_document()?;

        let file_name = format!("{}.pdf", self.batch_stem());
        info!(
            "tiled {} labels onto {} pages in {} ({} skipped)",
            prepared.len(),
            pages,
            file_name,
            skipped.len()
        );
        Ok(Artifact {
            file_name,
            media_type: PDF_MEDIA_TYPE,
            bytes,
            skipped,
        })
    }

    /// Encode every payload up front so nothing is written for a run
    /// that is going to fail.
    fn prepare<'r>(
        &self,
        records: &'r [LabelRecord],
    ) -> Result<(Vec<(&'r LabelRecord, Code128)>, Vec<SkippedRecord>)> {
        let mut prepared = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match encode_record(index, record) {
                Ok(symbol) => prepared.push((record, symbol)),
                Err(StickerError::Encoding { index, code, source })
                    if self.config.on_invalid_barcode == EncodingPolicy::Skip =>
                {
                    warn!("skipping record {} ({:?}): {}", index, code, source);
                    skipped.push(SkippedRecord {
                        index,
                        code,
                        reason: source,
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok((prepared, skipped))
    }

    fn batch_stem(&self) -> String {
        format!(
            "stickers_{}x{}cm",
            format_cm(self.config.label.width_cm),
            format_cm(self.config.label.height_cm)
        )
    }
}

/// File-name-safe version of a code: anything other than ASCII
/// letters, digits, `-`, `_` and `.` becomes `_`.
pub fn safe_file_stem(code: &str) -> String {
    let stem: String = code
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_start_matches('.');
    if stem.is_empty() {
        "label".to_string()
    } else {
        stem.to_string()
    }
}

/// `{stem}.{ext}`, or `{stem}_2.{ext}`, `{stem}_3.{ext}`... if taken.
fn unique_name(taken: &mut HashSet<String>, stem: String, ext: &str) -> String {
    let mut name = format!("{}.{}", stem, ext);
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("{}_{}.{}", stem, n, ext);
        n += 1;
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsafe_codes_become_safe_stems() {
        assert_eq!(safe_file_stem("COM001"), "COM001");
        assert_eq!(safe_file_stem("A/B C"), "A_B_C");
        assert_eq!(safe_file_stem("../etc"), "_etc");
        assert_eq!(safe_file_stem("..."), "label");
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let mut taken = HashSet::new();
        assert_eq!(unique_name(&mut taken, "A".into(), "png"), "A.png");
        assert_eq!(unique_name(&mut taken, "A".into(), "png"), "A_2.png");
        assert_eq!(unique_name(&mut taken, "A".into(), "png"), "A_3.png");
        assert_eq!(unique_name(&mut taken, "B".into(), "png"), "B.png");
    }

    #[test]
    fn single_mode_needs_exactly_one_record() {
        let assembler = Assembler::new(StickerConfig::default(), LabelFont::builtin(), None);
        let err = assembler
            .generate(LabelStyle::ManualSingle, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            StickerError::RecordCount {
                expected: 1,
                found: 0
            }
        ));
    }
}
