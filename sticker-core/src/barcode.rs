//! Code128 symbols for label barcodes.
//!
//! Symbol encoding is done by `barcoders`. This module picks the code
//! set for each stretch of the payload (set B for printable ASCII, set C
//! for digit runs long enough to pay for the switch) and turns the
//! resulting module sequence into bars or a raster.

use barcoders::sym::code128::Code128 as Symbology;
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigurationError;

/// Code set selectors understood by `barcoders`.
const SET_B: char = 'Ɓ';
const SET_C: char = 'Ć';

pub const MAX_QUIET_ZONE: u32 = 100;
pub const MAX_MODULE_HEIGHT: u32 = 2000;

/// Quiet zone and bar height of the rasterized symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeOptions {
    /// Blank margin on each side, in modules.
    pub quiet_zone: u32,
    /// Bar height of the intrinsic raster, in pixels.
    pub module_height: u32,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        BarcodeOptions {
            quiet_zone: 10,
            module_height: 50,
        }
    }
}

impl BarcodeOptions {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.quiet_zone > MAX_QUIET_ZONE {
            return Err(ConfigurationError::BarcodeOption {
                field: "quiet_zone",
                value: self.quiet_zone,
                min: 0,
                max: MAX_QUIET_ZONE,
            });
        }
        if !(1..=MAX_MODULE_HEIGHT).contains(&self.module_height) {
            return Err(ConfigurationError::BarcodeOption {
                field: "module_height",
                value: self.module_height,
                min: 1,
                max: MAX_MODULE_HEIGHT,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    #[error("empty barcode payload")]
    Empty,

    #[error("character {ch:?} at position {position} is not encodable in Code128 set B")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Code128 encoder rejected the payload: {0}")]
    Rejected(String),
}

/// An encoded Code128 symbol: start code, data, check value and stop
/// pattern as a sequence of modules (1 = bar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code128 {
    modules: Vec<u8>,
}

impl Code128 {
    pub fn encode(payload: &str) -> Result<Self, BarcodeError> {
        if payload.is_empty() {
            return Err(BarcodeError::Empty);
        }
        if let Some((position, ch)) = payload
            .chars()
            .enumerate()
            .find(|(_, c)| !(' '..='~').contains(c))
        {
            return Err(BarcodeError::InvalidCharacter { ch, position });
        }
        let symbol = Symbology::new(with_code_sets(payload))
            .map_err(|e| BarcodeError::Rejected(e.to_string()))?;
        Ok(Code128 {
            modules: symbol.encode(),
        })
    }

    pub fn modules(&self) -> &[u8] {
        &self.modules
    }

    /// Symbol width in modules, quiet zones excluded.
    pub fn width_modules(&self) -> u32 {
        self.modules.len() as u32
    }

    /// Symbol width in modules with a quiet zone on each side.
    pub fn total_modules(&self, options: &BarcodeOptions) -> Result<u32, ConfigurationError> {
        options
            .quiet_zone
            .checked_mul(2)
            .and_then(|q| q.checked_add(self.width_modules()))
            .ok_or(ConfigurationError::BarcodeOption {
                field: "quiet_zone",
                value: options.quiet_zone,
                min: 0,
                max: MAX_QUIET_ZONE,
            })
    }

    /// Dark bars as (start, width) in modules from the left edge of
    /// the symbol, quiet zone excluded.
    pub fn bars(&self) -> Vec<(u32, u32)> {
        let mut bars: Vec<(u32, u32)> = Vec::new();
        let mut previous = 0;
        for (x, &module) in self.modules.iter().enumerate() {
            if module == 1 {
                match bars.last_mut() {
                    Some((_, width)) if previous == 1 => *width += 1,
                    _ => bars.push((x as u32, 1)),
                }
            }
            previous = module;
        }
        bars
    }

    /// Rasterize at `module_px` pixels per module, black on white,
    /// with the configured quiet zone on both sides.
    pub fn rasterize(
        &self,
        options: &BarcodeOptions,
        module_px: u32,
    ) -> Result<GrayImage, ConfigurationError> {
        options.validate()?;
        let module_px = module_px.max(1);
        let height = options.module_height;
        let modules = self.total_modules(options)?;
        let width = modules
            .checked_mul(module_px)
            .ok_or(ConfigurationError::Canvas {
                width: modules.saturating_mul(module_px),
                height,
            })?;
        let mut img = GrayImage::from_pixel(width, height, Luma([255]));
        for (start, w) in self.bars() {
            let x0 = (options.quiet_zone + start) * module_px;
            for x in x0..x0 + w * module_px {
                for y in 0..height {
                    img.put_pixel(x, y, Luma([0]));
                }
            }
        }
        Ok(img)
    }
}

/// Prefix the payload with code set selectors: set C for a leading even
/// run of at least four digits, an inner run of at least six or a
/// trailing run of at least four; set B otherwise.
fn with_code_sets(payload: &str) -> String {
    let chars: Vec<char> = payload.chars().collect();
    let digit_run = |from: usize| {
        chars[from..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count()
    };

    let lead = digit_run(0);
    let mut in_set_c = lead >= 4 && lead % 2 == 0;
    let mut data = String::with_capacity(payload.len() + 6);
    data.push(if in_set_c { SET_C } else { SET_B });

    let mut i = 0;
    while i < chars.len() {
        if in_set_c {
            if digit_run(i) >= 2 {
                data.push(chars[i]);
                data.push(chars[i + 1]);
                i += 2;
            } else {
                data.push(SET_B);
                in_set_c = false;
            }
            continue;
        }

        let run = digit_run(i);
        if run >= 6 || (run >= 4 && i + run == chars.len()) {
            if run % 2 == 1 {
                data.push(chars[i]);
                i += 1;
            }
            data.push(SET_C);
            in_set_c = true;
            continue;
        }
        data.push(chars[i]);
        i += 1;
    }
    data
}
