//! Series plotting: time series, cross sections and numeric pairs as lines,
//! scatters or stacked bars.

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::scene::{FillStyle, MarkerStyle, Primitive, Stroke};
use super::{Exhibit, PanelKey};
use crate::centering::{center_cs_obs, center_ts_obs};
use crate::coords::{Axis, Coord, date_to_num};
use crate::error::{ExhibitError, Result};
use crate::frequency::Frequency;
use crate::series::TimeSeries;
use crate::stack::{StackLayout, bar_width};
use crate::style::{LineDash, MarkerShape, Rgba};

/// Line appearance, with optional markers at each point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    pub color: Rgba,
    pub dash: LineDash,
    pub width: f64,
    pub marker: Option<MarkerShape>,
    pub marker_size: f64,
    pub alpha: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            dash: LineDash::Solid,
            width: 1.0,
            marker: None,
            marker_size: 5.0,
            alpha: 1.0,
        }
    }
}

impl LineOptions {
    fn stroke(&self) -> Stroke {
        Stroke {
            color: self.color,
            width: self.width,
            dash: self.dash,
            alpha: self.alpha,
        }
    }

    fn marker(&self) -> Option<MarkerStyle> {
        self.marker.map(|shape| MarkerStyle {
            shape,
            size: self.marker_size,
            color: self.color,
            alpha: self.alpha,
        })
    }
}

/// Frequency and stack placement for time-series lines and scatters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TsPlotOptions {
    /// Overrides the series' stored or inferred frequency.
    pub freq: Option<Frequency>,
    pub layout: StackLayout,
}

/// Cross-section direction: `Vertical` puts categories on x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsOrientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CsPlotOptions {
    pub layout: StackLayout,
    pub orientation: CsOrientation,
}

/// Stacked bars over time or categories.
///
/// `styles` is empty (white bars, black edges) or holds one style per series.
/// `freq` only applies to time series, `orientation` only to cross sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    pub freq: Option<Frequency>,
    pub layout: StackLayout,
    pub orientation: CsOrientation,
    pub styles: Vec<FillStyle>,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            freq: None,
            layout: StackLayout::default().with_width_coef(0.8),
            orientation: CsOrientation::Vertical,
            styles: Vec::new(),
        }
    }
}

/// Stacked bars against a numeric x axis. Without `bar_width`, bars are
/// as wide as the smallest gap between x values times `width_coef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumBarOptions {
    pub bar_width: Option<f64>,
    pub width_coef: f64,
    pub styles: Vec<FillStyle>,
}

impl Default for NumBarOptions {
    fn default() -> Self {
        Self {
            bar_width: None,
            width_coef: 1.0,
            styles: Vec::new(),
        }
    }
}

fn resolve_styles(styles: &[FillStyle], n: usize) -> Result<Vec<FillStyle>> {
    match styles.len() {
        0 => Ok(vec![FillStyle::default(); n]),
        len if len == n => Ok(styles.to_vec()),
        len => Err(ExhibitError::InvalidArgument(format!(
            "{n} series but {len} bar styles"
        ))),
    }
}

/// Running tallies for stacked bars: positive values stack upward from the
/// positive total, negative ones downward from the negative total.
struct Stacker {
    positive: Vec<f64>,
    negative: Vec<f64>,
}

impl Stacker {
    fn new(len: usize) -> Self {
        Self {
            positive: vec![0.0; len],
            negative: vec![0.0; len],
        }
    }

    /// Base of the next bar at slot `i`; missing values count as zero.
    fn stack(&mut self, i: usize, value: f64) -> (f64, f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        let tally = if value >= 0.0 {
            &mut self.positive[i]
        } else {
            &mut self.negative[i]
        };
        let base = *tally;
        *tally += value;
        (base, value)
    }
}

impl Exhibit {
    /// Restrict to the panel's x range, then center in the periods.
    fn prepare_ts(
        &self,
        key: &PanelKey,
        series: &TimeSeries,
        freq: Frequency,
        layout: &StackLayout,
    ) -> Result<TimeSeries> {
        let xr = self.axis_range(key, Axis::X)?;
        let within = series
            .to_end_instants()
            .impose_range(Coord::Numeric(xr.lower()), Coord::Numeric(xr.upper()))?;
        center_ts_obs(&within, Some(freq), layout)
    }

    fn ts_points(
        &self,
        key: &PanelKey,
        series: &TimeSeries,
        opts: &TsPlotOptions,
    ) -> Result<Vec<(f64, f64)>> {
        let freq = series.to_end_instants().resolve_freq(opts.freq)?;
        let centered = self.prepare_ts(key, series, freq, &opts.layout)?;
        Ok(centered.iter().map(|(t, v)| (date_to_num(t), v)).collect())
    }

    fn push_points(
        &mut self,
        key: &PanelKey,
        points: Vec<(f64, f64)>,
        primitive: impl FnOnce(Vec<(f64, f64)>) -> Primitive,
    ) -> Result<()> {
        let panel = self.panel_mut(key)?;
        panel.record_points(&points);
        debug!("panel `{key}`: {} points", points.len());
        panel.push(primitive(points));
        Ok(())
    }

    pub fn plot_ts_line(
        &mut self,
        key: impl Into<PanelKey>,
        series: &TimeSeries,
        opts: &TsPlotOptions,
        line: &LineOptions,
    ) -> Result<()> {
        let key = key.into();
        let points = self.ts_points(&key, series, opts)?;
        self.push_points(&key, points, |points| Primitive::Polyline {
            points,
            stroke: line.stroke(),
            marker: line.marker(),
        })
    }

    pub fn plot_ts_scatter(
        &mut self,
        key: impl Into<PanelKey>,
        series: &TimeSeries,
        opts: &TsPlotOptions,
        marker: &MarkerStyle,
    ) -> Result<()> {
        let key = key.into();
        let points = self.ts_points(&key, series, opts)?;
        self.push_points(&key, points, |points| Primitive::Markers {
            points,
            marker: *marker,
        })
    }

    /// Stacked bars for several time series sharing one panel slot.
    ///
    /// Frequency and bar width come from the first series. Observations are
    /// aligned on the union of every series' positions.
    pub fn plot_ts_barstack(
        &mut self,
        key: impl Into<PanelKey>,
        series: &[TimeSeries],
        opts: &BarOptions,
    ) -> Result<()> {
        let key = key.into();
        let first = series
            .first()
            .ok_or_else(|| ExhibitError::InvalidArgument("no series to stack".into()))?;
        let styles = resolve_styles(&opts.styles, series.len())?;
        let freq = first.to_end_instants().resolve_freq(opts.freq)?;
        let width = bar_width(freq, opts.layout.number_stacks, opts.layout.width_coef)?;
        let centered = series
            .iter()
            .map(|s| self.prepare_ts(&key, s, freq, &opts.layout))
            .collect::<Result<Vec<_>>>()?;

        let mut slots: Vec<NaiveDateTime> = centered.iter().flat_map(TimeSeries::instants).collect();
        slots.sort();
        slots.dedup();
        debug!(
            "panel `{key}`: {} series stacked over {} slots, bar width {width:.3} days",
            series.len(),
            slots.len()
        );

        let mut stacker = Stacker::new(slots.len());
        let panel = self.panel_mut(&key)?;
        for (s, fill) in centered.iter().zip(styles) {
            let values: HashMap<NaiveDateTime, f64> = s.iter().collect();
            for (i, t) in slots.iter().enumerate() {
                let raw = values.get(t).copied().unwrap_or(0.0);
                let (base, value) = stacker.stack(i, raw);
                let x = date_to_num(*t);
                let bar = (x - width / 2.0, x + width / 2.0, base, base + value);
                panel.record_points(&[(bar.0, bar.2), (bar.1, bar.3)]);
                panel.push(Primitive::Bar {
                    x0: bar.0,
                    x1: bar.1,
                    y0: bar.2,
                    y1: bar.3,
                    fill,
                });
            }
        }
        Ok(())
    }

    fn cs_points(values: &[f64], opts: &CsPlotOptions) -> Result<Vec<(f64, f64)>> {
        let positions = center_cs_obs(values.len(), &opts.layout)?;
        Ok(positions
            .into_iter()
            .zip(values.iter().copied())
            .map(|(p, v)| match opts.orientation {
                CsOrientation::Vertical => (p, v),
                CsOrientation::Horizontal => (v, p),
            })
            .collect())
    }

    pub fn plot_cs_line(
        &mut self,
        key: impl Into<PanelKey>,
        values: &[f64],
        opts: &CsPlotOptions,
        line: &LineOptions,
    ) -> Result<()> {
        let points = Self::cs_points(values, opts)?;
        self.push_points(&key.into(), points, |points| Primitive::Polyline {
            points,
            stroke: line.stroke(),
            marker: line.marker(),
        })
    }

    pub fn plot_cs_scatter(
        &mut self,
        key: impl Into<PanelKey>,
        values: &[f64],
        opts: &CsPlotOptions,
        marker: &MarkerStyle,
    ) -> Result<()> {
        let points = Self::cs_points(values, opts)?;
        self.push_points(&key.into(), points, |points| Primitive::Markers {
            points,
            marker: *marker,
        })
    }

    /// Stacked bars over categories; every series must be as long as the first.
    /// Bars are `width_coef / number_stacks` wide.
    pub fn plot_cs_barstack(
        &mut self,
        key: impl Into<PanelKey>,
        series: &[Vec<f64>],
        opts: &BarOptions,
    ) -> Result<()> {
        let key = key.into();
        let first = series
            .first()
            .ok_or_else(|| ExhibitError::InvalidArgument("no series to stack".into()))?;
        if let Some(bad) = series.iter().find(|s| s.len() != first.len()) {
            return Err(ExhibitError::InvalidArgument(format!(
                "cross-section series differ in length: {} vs {}",
                first.len(),
                bad.len()
            )));
        }
        let styles = resolve_styles(&opts.styles, series.len())?;
        let positions = center_cs_obs(first.len(), &opts.layout)?;
        let width = opts.layout.width_coef / f64::from(opts.layout.number_stacks);

        let mut stacker = Stacker::new(positions.len());
        let panel = self.panel_mut(&key)?;
        for (s, fill) in series.iter().zip(styles) {
            for (i, (&p, &raw)) in positions.iter().zip(s).enumerate() {
                let (base, value) = stacker.stack(i, raw);
                let (x0, x1, y0, y1) = match opts.orientation {
                    CsOrientation::Vertical => (p - width / 2.0, p + width / 2.0, base, base + value),
                    CsOrientation::Horizontal => (base, base + value, p - width / 2.0, p + width / 2.0),
                };
                panel.record_points(&[(x0, y0), (x1, y1)]);
                panel.push(Primitive::Bar { x0, x1, y0, y1, fill });
            }
        }
        Ok(())
    }

    fn num_points(x: &[f64], y: &[f64]) -> Result<Vec<(f64, f64)>> {
        if x.len() != y.len() {
            return Err(ExhibitError::InvalidArgument(format!(
                "{} x values but {} y values",
                x.len(),
                y.len()
            )));
        }
        Ok(x.iter().copied().zip(y.iter().copied()).collect())
    }

    pub fn plot_num_line(
        &mut self,
        key: impl Into<PanelKey>,
        x: &[f64],
        y: &[f64],
        line: &LineOptions,
    ) -> Result<()> {
        let points = Self::num_points(x, y)?;
        self.push_points(&key.into(), points, |points| Primitive::Polyline {
            points,
            stroke: line.stroke(),
            marker: line.marker(),
        })
    }

    pub fn plot_num_scatter(
        &mut self,
        key: impl Into<PanelKey>,
        x: &[f64],
        y: &[f64],
        marker: &MarkerStyle,
    ) -> Result<()> {
        let points = Self::num_points(x, y)?;
        self.push_points(&key.into(), points, |points| Primitive::Markers {
            points,
            marker: *marker,
        })
    }

    /// Stacked bars centered on each numeric `x`.
    pub fn plot_num_barstack(
        &mut self,
        key: impl Into<PanelKey>,
        x: &[f64],
        series: &[Vec<f64>],
        opts: &NumBarOptions,
    ) -> Result<()> {
        let key = key.into();
        if series.is_empty() {
            return Err(ExhibitError::InvalidArgument("no series to stack".into()));
        }
        if let Some(bad) = series.iter().find(|s| s.len() != x.len()) {
            return Err(ExhibitError::InvalidArgument(format!(
                "{} x values but a series of {}",
                x.len(),
                bad.len()
            )));
        }
        let styles = resolve_styles(&opts.styles, series.len())?;
        let width = match opts.bar_width {
            Some(w) => w,
            None => min_gap(x)? * opts.width_coef,
        };

        let mut stacker = Stacker::new(x.len());
        let panel = self.panel_mut(&key)?;
        for (s, fill) in series.iter().zip(styles) {
            for (i, (&xi, &raw)) in x.iter().zip(s).enumerate() {
                let (base, value) = stacker.stack(i, raw);
                let (x0, x1) = (xi - width / 2.0, xi + width / 2.0);
                panel.record_points(&[(x0, base), (x1, base + value)]);
                panel.push(Primitive::Bar {
                    x0,
                    x1,
                    y0: base,
                    y1: base + value,
                    fill,
                });
            }
        }
        Ok(())
    }
}

/// Smallest distance between neighboring distinct x values.
fn min_gap(x: &[f64]) -> Result<f64> {
    let mut sorted: Vec<f64> = x.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .reduce(f64::min)
        .ok_or_else(|| {
            ExhibitError::InsufficientData(
                "default bar width needs at least 2 distinct x values".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacker_keeps_signs_apart() {
        let mut s = Stacker::new(1);
        assert_eq!(s.stack(0, 2.0), (0.0, 2.0));
        assert_eq!(s.stack(0, -1.0), (0.0, -1.0));
        assert_eq!(s.stack(0, 3.0), (2.0, 3.0));
        assert_eq!(s.stack(0, f64::NAN), (5.0, 0.0));
        assert_eq!(s.stack(0, -2.0), (-1.0, -2.0));
    }

    #[test]
    fn min_gap_ignores_order() {
        assert_eq!(min_gap(&[4.0, 1.0, 2.0]).unwrap(), 1.0);
        assert!(min_gap(&[1.0]).is_err());
    }
}
