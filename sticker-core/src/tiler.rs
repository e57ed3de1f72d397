//! Grid tiling of fixed-size labels onto pages.
//!
//! The grid is pure floor division of the page by the label size;
//! leftover space stays at the right and bottom edges. Origins are
//! in PDF points with a bottom-left page origin, so row 0 sits at the
//! top of the page.

use std::iter::FusedIterator;

use crate::error::ConfigurationError;
use crate::spec::{LabelSpec, PageSpec};

/// Tolerance for sizes that divide the page exactly but suffer from
/// float representation (e.g. 21.0 / 7.0).
const DIVISION_EPSILON: f64 = 1e-9;

/// Where one label lands on the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub page_index: usize,
    pub column: u32,
    pub row: u32,
    /// Left edge of the label cell in points.
    pub x_origin: f64,
    /// Bottom edge of the label cell in points.
    pub y_origin: f64,
}

/// Column/row layout of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    label_width_pt: f64,
    label_height_pt: f64,
    page_height_pt: f64,
}

impl Grid {
    /// Compute the grid for `label` on `page`. Fails when not even one
    /// label fits.
    pub fn new(label: &LabelSpec, page: &PageSpec) -> Result<Self, ConfigurationError> {
        label.validate()?;
        page.validate()?;
        let columns = fit_count(page.width_cm, label.width_cm);
        let rows = fit_count(page.height_cm, label.height_cm);
        if columns == 0 || rows == 0 {
            return Err(ConfigurationError::LabelLargerThanPage {
                label_width: label.width_cm,
                label_height: label.height_cm,
                page_width: page.width_cm,
                page_height: page.height_cm,
                columns,
                rows,
            });
        }
        Ok(Grid {
            columns,
            rows,
            label_width_pt: label.width_pt(),
            label_height_pt: label.height_pt(),
            page_height_pt: page.height_pt(),
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Labels per page.
    pub fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Pages needed for `n` labels; a partial last page counts.
    pub fn page_count(&self, n: usize) -> usize {
        n.div_ceil(self.cells())
    }

    /// Position of the label with the given index.
    pub fn position(&self, index: usize) -> GridPosition {
        let columns = self.columns as usize;
        let column = (index % columns) as u32;
        let row = ((index / columns) % self.rows as usize) as u32;
        GridPosition {
            page_index: index / self.cells(),
            column,
            row,
            x_origin: column as f64 * self.label_width_pt,
            y_origin: self.page_height_pt - (row as f64 + 1.0) * self.label_height_pt,
        }
    }

    /// Lazy sequence of the first `n` positions. A clone taken before
    /// iterating replays the same sequence.
    pub fn positions(&self, n: usize) -> Positions {
        Positions {
            grid: *self,
            next: 0,
            end: n,
        }
    }
}

/// Convenience wrapper: compute the grid and the first `n` positions.
pub fn positions(
    n: usize,
    label: &LabelSpec,
    page: &PageSpec,
) -> Result<Positions, ConfigurationError> {
    Ok(Grid::new(label, page)?.positions(n))
}

fn fit_count(available: f64, size: f64) -> u32 {
    (available / size + DIVISION_EPSILON).floor() as u32
}

/// Iterator over grid positions in label order.
#[derive(Debug, Clone)]
pub struct Positions {
    grid: Grid,
    next: usize,
    end: usize,
}

impl Iterator for Positions {
    type Item = GridPosition;

    fn next(&mut self) -> Option<GridPosition> {
        if self.next >= self.end {
            return None;
        }
        let pos = self.grid.position(self.next);
        self.next += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

impl FusedIterator for Positions {}
