//! Page-level configuration. Passed explicitly to [`Exhibit::new`](super::Exhibit::new);
//! nothing here is process-global.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ExhibitError, Result};
use crate::fonts::FontPaths;
use crate::style::Rgba;

/// Letter paper, portrait.
pub const PORTRAIT_PAGE: (f64, f64) = (8.5, 11.0);
/// Letter paper, landscape.
pub const LANDSCAPE_PAGE: (f64, f64) = (11.0, 8.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 1.0,
            bottom: 1.0,
            right: 1.0,
            top: 1.4,
        }
    }
}

/// Everything needed to lay out one exhibit page.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "rows": 2, "cols": 1, "orientation": "landscape", "dpi": 150 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhibitConfig {
    pub rows: usize,
    pub cols: usize,
    pub orientation: Orientation,
    /// Width and height in inches. Overrides `orientation` when set.
    pub page_size: Option<(f64, f64)>,
    pub margins: Margins,
    /// Vertical gap between grid rows, as a fraction of the average row height.
    pub h_space: f64,
    /// Horizontal gap between grid columns, as a fraction of the average column width.
    pub w_space: f64,
    pub dpi: u32,
    pub fonts: FontPaths,
    pub background: Rgba,
}

impl Default for ExhibitConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            orientation: Orientation::Portrait,
            page_size: None,
            margins: Margins::default(),
            h_space: 0.3,
            w_space: 0.25,
            dpi: 100,
            fonts: FontPaths::default(),
            background: Rgba::WHITE,
        }
    }
}

impl ExhibitConfig {
    /// Default page with a `rows` × `cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn landscape(mut self) -> Self {
        self.orientation = Orientation::Landscape;
        self
    }

    /// Read a config from a JSON file; missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: ExhibitConfig = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Page width and height in inches.
    pub fn page_inches(&self) -> (f64, f64) {
        match (self.page_size, self.orientation) {
            (Some(size), _) => size,
            (None, Orientation::Portrait) => PORTRAIT_PAGE,
            (None, Orientation::Landscape) => LANDSCAPE_PAGE,
        }
    }

    /// Orientation actually in effect: an explicit page size decides it.
    pub fn effective_orientation(&self) -> Orientation {
        match self.page_size {
            Some((w, h)) if h >= w => Orientation::Portrait,
            Some(_) => Orientation::Landscape,
            None => self.orientation,
        }
    }

    /// Page size in device pixels at the configured dpi.
    pub fn page_pixels(&self) -> (u32, u32) {
        let (w, h) = self.page_inches();
        let dpi = f64::from(self.dpi);
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ExhibitError::InvalidGrid(format!(
                "page grid needs at least one row and one column, got {}x{}",
                self.rows, self.cols
            )));
        }
        let (w, h) = self.page_inches();
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ExhibitError::InvalidGrid(format!("page size {w}x{h} in")));
        }
        let m = self.margins;
        if [m.left, m.bottom, m.right, m.top].iter().any(|v| !v.is_finite() || *v < 0.0)
            || m.left + m.right >= w
            || m.bottom + m.top >= h
        {
            return Err(ExhibitError::InvalidGrid(format!(
                "margins {m:?} leave no room on a {w}x{h} in page"
            )));
        }
        if !(self.h_space >= 0.0 && self.w_space >= 0.0) {
            return Err(ExhibitError::InvalidGrid("grid spacing must be non-negative".into()));
        }
        if self.dpi == 0 {
            return Err(ExhibitError::InvalidArgument("dpi must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_decides_orientation() {
        let mut cfg = ExhibitConfig::default().landscape();
        assert_eq!(cfg.page_inches(), LANDSCAPE_PAGE);
        cfg.page_size = Some((6.0, 9.0));
        assert_eq!(cfg.effective_orientation(), Orientation::Portrait);
        assert_eq!(cfg.page_pixels(), (600, 900));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ExhibitConfig = serde_json::from_str(r#"{"rows": 3, "margins": {"top": 2.0}}"#).unwrap();
        assert_eq!(cfg.rows, 3);
        assert_eq!(cfg.cols, 1);
        assert_eq!(cfg.margins.top, 2.0);
        assert_eq!(cfg.margins.left, 1.0);
        assert_eq!(cfg.dpi, 100);
    }

    #[test]
    fn oversized_margins_are_rejected() {
        let mut cfg = ExhibitConfig::default();
        cfg.margins.left = 5.0;
        cfg.margins.right = 4.0;
        assert!(matches!(cfg.validate(), Err(ExhibitError::InvalidGrid(_))));
    }
}
