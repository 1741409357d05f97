//! exhibit_rs
//!
//! A library for laying out publication-style chart pages: a grid of panels
//! holding time-series, cross-section and numeric plots, tables and
//! annotations, rendered through `plotters`. Pairs with the `exhibit` CLI.
//!
//! ### Features
//! - Date ↔ axis-fraction conversion and frequency-aware bar placement
//! - Stacked bars, lines and scatters for time series, categories and numbers
//! - Date, category and numeric axis formatting with centered labels
//! - Weighted table partitions, legends, reference lines, shading and arrows
//! - SVG/PNG/JPEG/BMP export and PostScript page concatenation
//!
//! ### Example
//! ```no_run
//! use exhibit_rs::coords::{Axis, AxisRange, parse_datetime};
//! use exhibit_rs::exhibit::{Exhibit, ExhibitConfig, GridSpan, NumAxisOptions};
//! use exhibit_rs::exhibit::{BarOptions, TsAxisOptions};
//! use exhibit_rs::series::{Period, TimeSeries};
//!
//! let mut ex = Exhibit::new(ExhibitConfig::new(1, 1))?;
//! let range = AxisRange::from_coords(parse_datetime("2020-01-01")?, parse_datetime("2020-12-31")?);
//! ex.add_panel_ts("gdp", range, GridSpan::cell(0, 0), None)?;
//! let periods = (1..=4).map(|q| Period::quarter(2020, q)).collect::<Result<Vec<_>, _>>()?;
//! let series = TimeSeries::from_periods(periods, vec![1.0, -2.5, 3.0, 0.5])?;
//! ex.plot_ts_barstack("gdp", &[series], &BarOptions::default())?;
//! ex.format_ts_xaxis("gdp", &TsAxisOptions { mark_years: true, ..Default::default() })?;
//! ex.format_numaxis("gdp", Axis::Y, &NumAxisOptions::default())?;
//! ex.save("gdp.svg")?;
//! # Ok::<(), exhibit_rs::ExhibitError>(())
//! ```

pub mod centering;
pub mod coords;
pub mod error;
pub mod exhibit;
pub mod fonts;
pub mod frequency;
pub mod merge;
pub mod partition;
mod render;
pub mod scale;
pub mod series;
pub mod stack;
pub mod storage;
pub mod style;
pub mod ticks;

pub use coords::{Axis, AxisRange, Coord};
pub use error::{ExhibitError, Result};
pub use exhibit::{Exhibit, ExhibitConfig, PanelKey};
pub use frequency::Frequency;
pub use series::TimeSeries;
