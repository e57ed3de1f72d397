//! Barcodes read back from pixels with a run-length decoder that knows
//! nothing about how they were drawn.

use sticker_core::{
    BarcodeOptions, Code128, LabelFont, LabelRecord, LabelRenderer, LabelSpec, Preset,
    RenderedLabel, StickerConfig,
};

/// Bar/space widths for symbol values 0..=105, bar first.
const PATTERNS: [[u32; 6]; 106] = [
    [2, 1, 2, 2, 2, 2], [2, 2, 2, 1, 2, 2], [2, 2, 2, 2, 2, 1], [1, 2, 1, 2, 2, 3],
    [1, 2, 1, 3, 2, 2], [1, 3, 1, 2, 2, 2], [1, 2, 2, 2, 1, 3], [1, 2, 2, 3, 1, 2],
    [1, 3, 2, 2, 1, 2], [2, 2, 1, 2, 1, 3], [2, 2, 1, 3, 1, 2], [2, 3, 1, 2, 1, 2],
    [1, 1, 2, 2, 3, 2], [1, 2, 2, 1, 3, 2], [1, 2, 2, 2, 3, 1], [1, 1, 3, 2, 2, 2],
    [1, 2, 3, 1, 2, 2], [1, 2, 3, 2, 2, 1], [2, 2, 3, 2, 1, 1], [2, 2, 1, 1, 3, 2],
    [2, 2, 1, 2, 3, 1], [2, 1, 3, 2, 1, 2], [2, 2, 3, 1, 1, 2], [3, 1, 2, 1, 3, 1],
    [3, 1, 1, 2, 2, 2], [3, 2, 1, 1, 2, 2], [3, 2, 1, 2, 2, 1], [3, 1, 2, 2, 1, 2],
    [3, 2, 2, 1, 1, 2], [3, 2, 2, 2, 1, 1], [2, 1, 2, 1, 2, 3], [2, 1, 2, 3, 2, 1],
    [2, 3, 2, 1, 2, 1], [1, 1, 1, 3, 2, 3], [1, 3, 1, 1, 2, 3], [1, 3, 1, 3, 2, 1],
    [1, 1, 2, 3, 1, 3], [1, 3, 2, 1, 1, 3], [1, 3, 2, 3, 1, 1], [2, 1, 1, 3, 1, 3],
    [2, 3, 1, 1, 1, 3], [2, 3, 1, 3, 1, 1], [1, 1, 2, 1, 3, 3], [1, 1, 2, 3, 3, 1],
    [1, 3, 2, 1, 3, 1], [1, 1, 3, 1, 2, 3], [1, 1, 3, 3, 2, 1], [1, 3, 3, 1, 2, 1],
    [3, 1, 3, 1, 2, 1], [2, 1, 1, 3, 3, 1], [2, 3, 1, 1, 3, 1], [2, 1, 3, 1, 1, 3],
    [2, 1, 3, 3, 1, 1], [2, 1, 3, 1, 3, 1], [3, 1, 1, 1, 2, 3], [3, 1, 1, 3, 2, 1],
    [3, 3, 1, 1, 2, 1], [3, 1, 2, 1, 1, 3], [3, 1, 2, 3, 1, 1], [3, 3, 2, 1, 1, 1],
    [3, 1, 4, 1, 1, 1], [2, 2, 1, 4, 1, 1], [4, 3, 1, 1, 1, 1], [1, 1, 1, 2, 2, 4],
    [1, 1, 1, 4, 2, 2], [1, 2, 1, 1, 2, 4], [1, 2, 1, 4, 2, 1], [1, 4, 1, 1, 2, 2],
    [1, 4, 1, 2, 2, 1], [1, 1, 2, 2, 1, 4], [1, 1, 2, 4, 1, 2], [1, 2, 2, 1, 1, 4],
    [1, 2, 2, 4, 1, 1], [1, 4, 2, 1, 1, 2], [1, 4, 2, 2, 1, 1], [2, 4, 1, 2, 1, 1],
    [2, 2, 1, 1, 1, 4], [4, 1, 3, 1, 1, 1], [2, 4, 1, 1, 1, 2], [1, 3, 4, 1, 1, 1],
    [1, 1, 1, 2, 4, 2], [1, 2, 1, 1, 4, 2], [1, 2, 1, 2, 4, 1], [1, 1, 4, 2, 1, 2],
    [1, 2, 4, 1, 1, 2], [1, 2, 4, 2, 1, 1], [4, 1, 1, 2, 1, 2], [4, 2, 1, 1, 1, 2],
    [4, 2, 1, 2, 1, 1], [2, 1, 2, 1, 4, 1], [2, 1, 4, 1, 2, 1], [4, 1, 2, 1, 2, 1],
    [1, 1, 1, 1, 4, 3], [1, 1, 1, 3, 4, 1], [1, 3, 1, 1, 4, 1], [1, 1, 4, 1, 1, 3],
    [1, 1, 4, 3, 1, 1], [4, 1, 1, 1, 1, 3], [4, 1, 1, 3, 1, 1], [1, 1, 3, 1, 4, 1],
    [1, 1, 4, 1, 3, 1], [3, 1, 1, 1, 4, 1], [4, 1, 1, 1, 3, 1], [2, 1, 1, 4, 1, 2],
    [2, 1, 1, 2, 1, 4], [2, 1, 1, 2, 3, 2],
];
const STOP: [u32; 7] = [2, 3, 3, 1, 1, 1, 2];
const START_B: usize = 104;
const START_C: usize = 105;
const CODE_B: usize = 100;
const CODE_C: usize = 99;

/// Decode one scan line given as dark/light pixel flags.
fn decode(row: &[bool]) -> Option<String> {
    let mut runs: Vec<(bool, u32)> = Vec::new();
    for &dark in row {
        match runs.last_mut() {
            Some((d, n)) if *d == dark => *n += 1,
            _ => runs.push((dark, 1)),
        }
    }
    while runs.first().is_some_and(|r| !r.0) {
        runs.remove(0);
    }
    while runs.last().is_some_and(|r| !r.0) {
        runs.pop();
    }
    // Every start code opens with a 2-module bar.
    let module = runs.first()?.1 / 2;
    if module == 0 {
        return None;
    }
    let widths: Vec<u32> = runs
        .iter()
        .map(|&(_, n)| (n % module == 0).then_some(n / module))
        .collect::<Option<_>>()?;
    if widths.len() < 13 || (widths.len() - 7) % 6 != 0 {
        return None;
    }
    let (data, stop) = widths.split_at(widths.len() - 7);
    if stop != STOP {
        return None;
    }
    let values: Vec<usize> = data
        .chunks(6)
        .map(|c| PATTERNS.iter().position(|p| p == c))
        .collect::<Option<_>>()?;
    let (&check, body) = values.split_last()?;
    let sum: usize = body.iter().enumerate().map(|(i, v)| i.max(1) * v).sum();
    if sum % 103 != check {
        return None;
    }
    let mut set_c = match body[0] {
        START_B => false,
        START_C => true,
        _ => return None,
    };
    let mut out = String::new();
    for &v in &body[1..] {
        match (set_c, v) {
            (true, CODE_B) => set_c = false,
            (false, CODE_C) => set_c = true,
            (true, v) => out.push_str(&format!("{:02}", v)),
            (false, v) => out.push((v as u8 + 32) as char),
        }
    }
    Some(out)
}

fn scan_label(label: &RenderedLabel, y: u32) -> Option<String> {
    let row: Vec<bool> = (0..label.width())
        .map(|x| label.pixel(x, y).is_some_and(|p| p[0] < 128))
        .collect();
    decode(&row)
}

fn render(config: &StickerConfig, code: &str) -> RenderedLabel {
    let renderer = LabelRenderer::new(LabelFont::builtin(), config.layout.clone(), config.barcode);
    let record = LabelRecord::new(code, "Lab PC", "North").unwrap();
    renderer.render_raster(&record, None, &config.label).unwrap()
}

#[test]
fn raster_symbols_decode() {
    for payload in ["COM001", "123456", "PC-12345", "A1234567B", "12345", "x", "Room 7 / Desk 3"] {
        let img = Code128::encode(payload)
            .unwrap()
            .rasterize(&BarcodeOptions::default(), 3)
            .unwrap();
        let row: Vec<bool> = (0..img.width())
            .map(|x| img.get_pixel(x, img.height() / 2).0[0] < 128)
            .collect();
        assert_eq!(decode(&row).as_deref(), Some(payload), "payload {}", payload);
    }
}

#[test]
fn long_code_scans_on_five_by_three_label() {
    let config = Preset::Cm5x3.config(203.0);
    assert_eq!(config.label, LabelSpec::new(5.0, 3.0, 203.0));
    let label = render(&config, "ASSET-2024-000123");
    assert_eq!((label.width(), label.height()), (400, 240));
    let y = label.height() * 8 / 10;
    assert_eq!(scan_label(&label, y).as_deref(), Some("ASSET-2024-000123"));
}

#[test]
fn short_code_scans_at_several_resolutions() {
    for dpi in [203.0, 300.0] {
        let config = Preset::Cm6x3.config(dpi);
        let label = render(&config, "COM001");
        let y = label.height() * 8 / 10;
        assert_eq!(scan_label(&label, y).as_deref(), Some("COM001"), "dpi {}", dpi);
    }
}

#[test]
fn captioned_sticker_scans() {
    let config = Preset::Sticker.config(203.0);
    let label = render(&config, "PC-0042");
    let y = label.height() * 3 / 4;
    assert_eq!(scan_label(&label, y).as_deref(), Some("PC-0042"));
}
