//! Splitting a rectangle into weighted rows and columns, used to lay out
//! text and shading tables inside a panel.

use serde::{Deserialize, Serialize};

use crate::error::{ExhibitError, Result};

/// Axis-aligned rectangle; `left < right` and `bottom < top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Region {
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// The unit square.
    pub fn unit() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.bottom + self.top) / 2.0)
    }
}

/// Boundaries of a partitioned region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Top edge first, bottom edge last; `rows + 1` entries.
    pub rows: Vec<f64>,
    /// Left edge first, right edge last; `cols + 1` entries.
    pub cols: Vec<f64>,
}

impl Partition {
    pub fn row_count(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn col_count(&self) -> usize {
        self.cols.len() - 1
    }

    /// Cell at zero-based `row` (from the top) and `col` (from the left).
    pub fn cell(&self, row: usize, col: usize) -> Option<Region> {
        if row >= self.row_count() || col >= self.col_count() {
            return None;
        }
        Some(Region::new(
            self.cols[col],
            self.cols[col + 1],
            self.rows[row + 1],
            self.rows[row],
        ))
    }

    pub fn row_center(&self, row: usize) -> Option<f64> {
        (row < self.row_count()).then(|| (self.rows[row] + self.rows[row + 1]) / 2.0)
    }

    pub fn col_center(&self, col: usize) -> Option<f64> {
        (col < self.col_count()).then(|| (self.cols[col] + self.cols[col + 1]) / 2.0)
    }
}

fn resolve_weights(axis: &'static str, count: usize, weights: Option<&[f64]>) -> Result<Vec<f64>> {
    let Some(weights) = weights else {
        return Ok(vec![1.0; count]);
    };
    if weights.len() != count {
        return Err(ExhibitError::WeightCountMismatch {
            axis,
            expected: count,
            got: weights.len(),
        });
    }
    if weights.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
        return Err(ExhibitError::InvalidWeights { axis });
    }
    Ok(weights.to_vec())
}

/// Boundaries at the cumulative weight fractions, measured from `origin` toward `origin + length`.
fn boundaries(origin: f64, length: f64, weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(weights.len() + 1);
    for w in weights {
        out.push(origin + length * acc / total);
        acc += w;
    }
    out.push(origin + length);
    out
}

/// Split `region` into `rows` × `cols` cells.
///
/// Weights default to uniform. Row weights run top to bottom, column
/// weights left to right.
pub fn form_partition(
    region: Region,
    rows: usize,
    cols: usize,
    row_weights: Option<&[f64]>,
    col_weights: Option<&[f64]>,
) -> Result<Partition> {
    if rows == 0 || cols == 0 {
        return Err(ExhibitError::InvalidGrid(format!(
            "partition needs at least one row and one column, got {rows}x{cols}"
        )));
    }
    if !(region.left < region.right && region.bottom < region.top) {
        return Err(ExhibitError::InvalidGrid(format!(
            "partition region is empty: {region:?}"
        )));
    }
    let row_weights = resolve_weights("row", rows, row_weights)?;
    let col_weights = resolve_weights("column", cols, col_weights)?;
    Ok(Partition {
        rows: boundaries(region.top, -region.height(), &row_weights),
        cols: boundaries(region.left, region.width(), &col_weights),
    })
}
