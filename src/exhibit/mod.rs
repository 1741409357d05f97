//! The exhibit façade: one page, its grid and its panels.
//!
//! Every drawing operation takes a [`PanelKey`], resolves it to the panel's
//! state, runs the geometry helpers (centering, bar widths, coordinate
//! conversion, label placement) and records the resulting primitives. The
//! scene is rendered only on [`Exhibit::save`] or [`Exhibit::to_svg_string`],
//! so axis ranges set after plotting still apply to everything on the panel.
//!
//! ```no_run
//! use exhibit_rs::exhibit::{Exhibit, ExhibitConfig, GridSpan};
//! use exhibit_rs::coords::AxisRange;
//! use chrono::NaiveDate;
//!
//! # fn main() -> exhibit_rs::error::Result<()> {
//! let mut ex = Exhibit::new(ExhibitConfig::new(2, 1))?;
//! let x = AxisRange::from_coords(
//!     NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
//! );
//! ex.add_panel_ts("top", x, GridSpan::cell(0, 0), None)?;
//! ex.add_exhibit_title("Output and prices", &Default::default());
//! ex.save("exhibit.svg")?;
//! # Ok(())
//! # }
//! ```

pub mod annotate;
pub mod axes;
pub mod config;
pub mod grid;
pub mod panel;
pub mod plot;
pub mod scene;

pub use annotate::{
    ArrowOptions, CaptionOptions, FootnoteOptions, KeyBox, KeyDot, KeyLine, KeyOptions,
    PanelCaptionOptions, PanelTitleOptions, RefLineOptions, ShadingOptions, TextOptions,
    TitleOptions,
};
pub use axes::{CatAxisOptions, NumAxisOptions, NumberFormat, TsAxisOptions};
pub use config::{ExhibitConfig, Margins, Orientation};
pub use grid::{GridSpan, PageGrid};
pub use panel::{AxisState, Panel, PanelKey, PanelKind, Side, Spine, Spines, TickStyle};
pub use plot::{BarOptions, CsOrientation, CsPlotOptions, LineOptions, NumBarOptions, TsPlotOptions};
pub use scene::{FillStyle, MarkerStyle, Primitive, Space, Stroke, TextItem};

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::coords::{Axis, AxisRange};
use crate::error::{ExhibitError, Result};
use crate::fonts::FontSet;
use crate::scale::nice_bounds;

/// Default spine width for time-series and numeric panels, in points.
pub const DEFAULT_AXIS_WIDTH: f64 = 1.3;

/// Whether an annotation position is in data coordinates or panel fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Data,
    Fixed,
}

/// Export format, chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Bitmap,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" | "jpg" | "jpeg" | "bmp" => Ok(ExportFormat::Bitmap),
            _ => Err(ExhibitError::UnsupportedFormat(ext)),
        }
    }
}

/// One page of panels.
#[derive(Debug)]
pub struct Exhibit {
    config: ExhibitConfig,
    grid: PageGrid,
    fonts: FontSet,
    panels: IndexMap<PanelKey, Panel>,
    /// Page-level text, in figure fractions.
    texts: Vec<TextItem>,
}

impl Exhibit {
    /// Validate `config`, lay out the page grid and load the fonts.
    pub fn new(config: ExhibitConfig) -> Result<Self> {
        let grid = PageGrid::from_config(&config)?;
        let fonts = FontSet::load(&config.fonts)?;
        let (w, h) = config.page_inches();
        debug!(
            "exhibit {w}x{h} in, grid {}x{}, plot area {:?}",
            config.rows,
            config.cols,
            grid.area()
        );
        Ok(Self {
            config,
            grid,
            fonts,
            panels: IndexMap::new(),
            texts: Vec::new(),
        })
    }

    pub fn config(&self) -> &ExhibitConfig {
        &self.config
    }

    pub fn grid(&self) -> &PageGrid {
        &self.grid
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// Page-level text items.
    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }

    /// Panels in creation order.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.values()
    }

    pub fn panel(&self, key: impl Into<PanelKey>) -> Result<&Panel> {
        let key = key.into();
        self.panels
            .get(&key)
            .ok_or(ExhibitError::UnknownPanel(key))
    }

    pub(crate) fn panel_mut(&mut self, key: &PanelKey) -> Result<&mut Panel> {
        self.panels
            .get_mut(key)
            .ok_or_else(|| ExhibitError::UnknownPanel(key.clone()))
    }

    fn insert(&mut self, panel: Panel) -> Result<()> {
        if self.panels.contains_key(&panel.key) {
            return Err(ExhibitError::DuplicatePanel(panel.key));
        }
        debug!("panel `{}` ({:?}) at {:?}", panel.key, panel.kind, panel.region);
        self.panels.insert(panel.key.clone(), panel);
        Ok(())
    }

    /// Time-series panel: the x range is fixed to `x_range` (date ordinals),
    /// the top spine is hidden and x ticks sit on the bottom only.
    pub fn add_panel_ts(
        &mut self,
        key: impl Into<PanelKey>,
        x_range: AxisRange,
        span: GridSpan,
        axis_width: Option<f64>,
    ) -> Result<()> {
        x_range.validate()?;
        let width = axis_width.unwrap_or(DEFAULT_AXIS_WIDTH);
        let region = self.grid.region(&span)?;
        self.insert(Panel {
            key: key.into(),
            kind: PanelKind::TimeSeries,
            region,
            x: AxisState::new(Some(x_range), vec![Side::Bottom]),
            y: AxisState::new(None, vec![Side::Left, Side::Right]),
            spines: Spines::with_hidden(&[Side::Top], width),
            primitives: Vec::new(),
        })
    }

    /// Numeric panel. Ticks sit on every visible side; `hidden_spines`
    /// defaults to the top edge.
    pub fn add_panel_numeric(
        &mut self,
        key: impl Into<PanelKey>,
        span: GridSpan,
        hidden_spines: Option<&[Side]>,
        axis_width: Option<f64>,
    ) -> Result<()> {
        let hidden = hidden_spines.unwrap_or(&[Side::Top]);
        let width = axis_width.unwrap_or(DEFAULT_AXIS_WIDTH);
        let sides = |a: Axis| -> Vec<Side> {
            Side::ALL
                .into_iter()
                .filter(|s| s.axis() == a && !hidden.contains(s))
                .collect()
        };
        let region = self.grid.region(&span)?;
        self.insert(Panel {
            key: key.into(),
            kind: PanelKind::Numeric,
            region,
            x: AxisState::new(None, sides(Axis::X)),
            y: AxisState::new(None, sides(Axis::Y)),
            spines: Spines::with_hidden(hidden, width),
            primitives: Vec::new(),
        })
    }

    /// Table panel: both ranges are [0, 1], no spines and no ticks.
    pub fn add_panel_table(&mut self, key: impl Into<PanelKey>, span: GridSpan) -> Result<()> {
        let region = self.grid.region(&span)?;
        self.insert(Panel {
            key: key.into(),
            kind: PanelKind::Table,
            region,
            x: AxisState::new(Some(AxisRange::default()), Vec::new()),
            y: AxisState::new(Some(AxisRange::default()), Vec::new()),
            spines: Spines::with_hidden(&Side::ALL, 0.0),
            primitives: Vec::new(),
        })
    }

    /// Overlay `original` with an independent y axis; x is shared.
    pub fn add_secondary_y(
        &mut self,
        original: impl Into<PanelKey>,
        key: impl Into<PanelKey>,
    ) -> Result<()> {
        self.add_secondary(original.into(), key.into(), Axis::X)
    }

    /// Overlay `original` with an independent x axis; y is shared.
    pub fn add_secondary_x(
        &mut self,
        original: impl Into<PanelKey>,
        key: impl Into<PanelKey>,
    ) -> Result<()> {
        self.add_secondary(original.into(), key.into(), Axis::Y)
    }

    fn add_secondary(&mut self, original: PanelKey, key: PanelKey, shared: Axis) -> Result<()> {
        let owner = self.panel(&original)?;
        // Secondaries of secondaries share with the root owner.
        let root = owner
            .axis(shared)
            .shared_with
            .clone()
            .unwrap_or_else(|| original.clone());
        let region = owner.region;
        let spines = owner.spines;
        let (x, y, kind) = match shared {
            Axis::X => (
                AxisState::shared(root),
                AxisState::new(None, vec![Side::Right]),
                PanelKind::SecondaryY,
            ),
            Axis::Y => (
                AxisState::new(None, vec![Side::Top]),
                AxisState::shared(root),
                PanelKind::SecondaryX,
            ),
        };
        self.insert(Panel {
            key,
            kind,
            region,
            x,
            y,
            spines,
            primitives: Vec::new(),
        })
    }

    /// Key of the panel that owns `axis` of panel `key`.
    fn axis_owner(&self, key: &PanelKey, axis: Axis) -> Result<PanelKey> {
        let panel = self.panel(key)?;
        Ok(panel
            .axis(axis)
            .shared_with
            .clone()
            .unwrap_or_else(|| key.clone()))
    }

    /// Current limits of one axis of a panel.
    ///
    /// Shared axes resolve to their owner. An axis without explicit limits
    /// snaps nice bounds around everything plotted against it, or [0, 1]
    /// when nothing has been plotted yet.
    pub fn axis_range(&self, key: impl Into<PanelKey>, axis: Axis) -> Result<AxisRange> {
        let owner = self.axis_owner(&key.into(), axis)?;
        let state = self.panel(&owner)?.axis(axis);
        if let Some(range) = state.range {
            return Ok(range);
        }
        let extent = self
            .panels
            .values()
            .filter(|p| p.key == owner || p.axis(axis).shared_with.as_ref() == Some(&owner))
            .filter_map(|p| p.axis(axis).extent)
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
        Ok(match extent {
            Some((lo, hi)) => nice_bounds(lo, hi),
            None => AxisRange::default(),
        })
    }

    /// Fix the limits of one axis. `min > max` inverts the axis.
    pub fn set_axis_range(
        &mut self,
        key: impl Into<PanelKey>,
        axis: Axis,
        range: AxisRange,
    ) -> Result<()> {
        range.validate()?;
        let owner = self.axis_owner(&key.into(), axis)?;
        self.panel_mut(&owner)?.axis_mut(axis).range = Some(range);
        Ok(())
    }

    /// Both axis ranges of a panel.
    pub(crate) fn ranges(&self, key: &PanelKey) -> Result<(AxisRange, AxisRange)> {
        Ok((self.axis_range(key, Axis::X)?, self.axis_range(key, Axis::Y)?))
    }

    pub(crate) fn push_text(&mut self, item: TextItem) {
        self.texts.push(item);
    }

    /// Export by extension: `svg`, or `png`/`jpg`/`jpeg`/`bmp`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match ExportFormat::from_path(path)? {
            ExportFormat::Svg => std::fs::write(path, crate::render::render_svg(self)?)?,
            ExportFormat::Bitmap => crate::render::render_bitmap(self, path)?,
        }
        info!("exhibit written to {}", path.display());
        Ok(())
    }

    /// Render the page as an SVG document in memory.
    pub fn to_svg_string(&self) -> Result<String> {
        crate::render::render_svg(self)
    }
}
