//! The page grid panels are carved from.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::config::ExhibitConfig;
use crate::error::{ExhibitError, Result};
use crate::partition::{Partition, Region, form_partition};

/// Rows and columns a panel occupies (zero-based, end exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpan {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl GridSpan {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    /// A single cell.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row..row + 1, col..col + 1)
    }
}

/// Cell geometry in figure fractions (origin bottom-left).
///
/// The area inside the margins is partitioned into cells and the gaps
/// between them: a gap of `s` is `s` cell lengths wide.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGrid {
    rows: usize,
    cols: usize,
    area: Region,
    slots: Partition,
    row_gaps: bool,
    col_gaps: bool,
}

/// Weights for `n` cells interleaved with `n - 1` gaps of `space`.
fn slot_weights(n: usize, space: f64) -> Vec<f64> {
    if space == 0.0 {
        return vec![1.0; n];
    }
    let mut weights = Vec::with_capacity(2 * n - 1);
    for i in 0..n {
        if i > 0 {
            weights.push(space);
        }
        weights.push(1.0);
    }
    weights
}

impl PageGrid {
    pub fn from_config(config: &ExhibitConfig) -> Result<Self> {
        config.validate()?;
        let (w, h) = config.page_inches();
        let m = config.margins;
        let area = Region::new(m.left / w, (w - m.right) / w, m.bottom / h, (h - m.top) / h);
        let row_weights = slot_weights(config.rows, config.h_space);
        let col_weights = slot_weights(config.cols, config.w_space);
        let slots = form_partition(
            area,
            row_weights.len(),
            col_weights.len(),
            Some(row_weights.as_slice()),
            Some(col_weights.as_slice()),
        )?;
        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            area,
            slots,
            row_gaps: config.h_space != 0.0,
            col_gaps: config.w_space != 0.0,
        })
    }

    /// Region inside the margins.
    pub fn area(&self) -> Region {
        self.area
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Figure-fraction rectangle covered by `span`, gaps between its cells included.
    pub fn region(&self, span: &GridSpan) -> Result<Region> {
        let check = |r: &Range<usize>, n: usize, what: &str| {
            if r.start >= r.end || r.end > n {
                Err(ExhibitError::InvalidGrid(format!(
                    "{what} span {}..{} outside a grid of {n}",
                    r.start, r.end
                )))
            } else {
                Ok(())
            }
        };
        check(&span.rows, self.rows, "row")?;
        check(&span.cols, self.cols, "column")?;

        let slot = |cell: usize, gaps: bool| if gaps { 2 * cell } else { cell };
        let first_row = slot(span.rows.start, self.row_gaps);
        let last_row = slot(span.rows.end - 1, self.row_gaps);
        let first_col = slot(span.cols.start, self.col_gaps);
        let last_col = slot(span.cols.end - 1, self.col_gaps);
        Ok(Region::new(
            self.slots.cols[first_col],
            self.slots.cols[last_col + 1],
            self.slots.rows[last_row + 1],
            self.slots.rows[first_row],
        ))
    }
}
