//! Axis formatting: numeric axes, date x axes and category axes.

use chrono::NaiveDateTime;
use log::debug;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::panel::{Side, TickStyle};
use super::scene::{Primitive, Space, TextItem};
use super::{Exhibit, PanelKey};
use crate::coords::{Axis, AxisRange, data_to_fixed, date_to_num, midnight, num_to_date};
use crate::error::{ExhibitError, Result};
use crate::scale::nice_ticks;
use crate::style::{FontVariant, HAlign, Rgba, VAlign};
use crate::ticks::{
    LabelCentering, PeriodUnit, format_month_irregular, generate_range, place_labels,
    resolve_label_units,
};

/// How numeric tick labels are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    /// Shortest form with six significant digits, like C's `%g`.
    #[default]
    General,
    /// Fixed number of decimals.
    Fixed(usize),
    /// Fixed decimals with thousands separators (`12,500.0`).
    Grouped(usize),
}

impl NumberFormat {
    pub fn format(&self, v: f64) -> String {
        match *self {
            NumberFormat::General => format_general(v),
            NumberFormat::Fixed(d) => format!("{v:.d$}"),
            NumberFormat::Grouped(d) => format_grouped(v, d),
        }
    }
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

fn format_general(v: f64) -> String {
    if v == 0.0 {
        return "0".into();
    }
    if !v.is_finite() {
        return v.to_string();
    }
    let sci = format!("{v:.5e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..6).contains(&exp) {
        let decimals = (5 - exp).max(0) as usize;
        trim_fraction(&format!("{v:.decimals$}"))
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    }
}

fn format_grouped(v: f64, decimals: usize) -> String {
    let digits = format!("{:.decimals$}", v.abs());
    let (int, frac) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };
    let int = int
        .parse::<u64>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int.to_string());
    let negative = v < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&int);
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Numeric axis formatting.
///
/// Fields left `None` take per-axis defaults: on y, the major tick sits at
/// the top end, 0 is skipped, labels go on the right (`[Right, Left]`) and
/// are offset 0.02 in both directions; on x, there is no end tick, nothing is
/// skipped, labels go on the bottom and are offset 0.05 downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumAxisOptions {
    /// Defaults to the current range.
    pub range: Option<AxisRange>,
    /// Defaults to nice ticks over the range.
    pub tick_pos: Option<Vec<f64>>,
    pub skip_ticks: Option<Vec<f64>>,
    pub invert: bool,
    pub color: Rgba,
    pub minor: TickStyle,
    pub major: TickStyle,
    pub major_at_end: Option<bool>,
    pub minor_labels: bool,
    pub major_label: bool,
    /// Label every n-th tick.
    pub label_skip: usize,
    pub number_format: NumberFormat,
    pub label_xoffset: Option<f64>,
    pub label_yoffset: Option<f64>,
    pub font_size: f64,
    /// Sides carrying ticks. With two sides only the right (y) or bottom (x) one is labeled.
    pub sides: Option<Vec<Side>>,
}

impl Default for NumAxisOptions {
    fn default() -> Self {
        Self {
            range: None,
            tick_pos: None,
            skip_ticks: None,
            invert: false,
            color: Rgba::BLACK,
            minor: TickStyle::MINOR,
            major: TickStyle::MAJOR,
            major_at_end: None,
            minor_labels: true,
            major_label: true,
            label_skip: 1,
            number_format: NumberFormat::General,
            label_xoffset: None,
            label_yoffset: None,
            font_size: 10.0,
            sides: None,
        }
    }
}

/// Date x-axis formatting for time-series panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsAxisOptions {
    pub minor_pos: Vec<NaiveDateTime>,
    /// Defaults to year starts when `mark_years` is set, else none.
    pub major_pos: Option<Vec<NaiveDateTime>>,
    pub mark_years: bool,
    pub label_dates: Vec<NaiveDateTime>,
    /// `strftime`-style label format; required unless `irregular_month` is set.
    pub label_format: Option<String>,
    pub irregular_month: bool,
    pub label_units: Option<Vec<PeriodUnit>>,
    pub infer_unit_from_format: bool,
    pub centering: LabelCentering,
    pub color: Rgba,
    pub minor: TickStyle,
    pub major: TickStyle,
    pub label_xoffset: f64,
    pub label_yoffset: f64,
    pub font_size: f64,
}

impl Default for TsAxisOptions {
    fn default() -> Self {
        Self {
            minor_pos: Vec::new(),
            major_pos: None,
            mark_years: false,
            label_dates: Vec::new(),
            label_format: None,
            irregular_month: false,
            label_units: None,
            infer_unit_from_format: true,
            centering: LabelCentering::TickAligned,
            color: Rgba::BLACK,
            minor: TickStyle::MINOR,
            major: TickStyle::MAJOR,
            label_xoffset: 0.0,
            label_yoffset: 0.07,
            font_size: 10.0,
        }
    }
}

/// Category axis formatting for cross-section panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatAxisOptions {
    pub axis: Axis,
    /// Defaults to half a category beyond the first and last.
    pub limits: Option<AxisRange>,
    pub color: Rgba,
    pub tick: TickStyle,
    /// Shift along the category axis, in panel fractions.
    pub label_catoffset: f64,
    /// Distance from the axis, in panel fractions.
    pub label_numoffset: f64,
    pub font_size: f64,
    /// Defaults to centered on x and right-aligned on y.
    pub h_align: Option<HAlign>,
    pub v_align: VAlign,
    pub rotation: f64,
}

impl Default for CatAxisOptions {
    fn default() -> Self {
        Self {
            axis: Axis::X,
            limits: None,
            color: Rgba::BLACK,
            tick: TickStyle {
                length: 3.5,
                width: 1.3,
            },
            label_catoffset: 0.0,
            label_numoffset: -0.06,
            font_size: 10.0,
            h_align: None,
            v_align: VAlign::Center,
            rotation: 0.0,
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn label(text: String, x: f64, y: f64, size: f64, h_align: HAlign, v_align: VAlign) -> TextItem {
    TextItem {
        text,
        x,
        y,
        space: Space::Axes,
        font: FontVariant::Normal,
        size,
        color: Rgba::BLACK,
        h_align,
        v_align,
        rotation: 0.0,
        offset_pt: 0.0,
    }
}

impl Exhibit {
    /// Fix an axis's range and ticks and write its tick labels.
    ///
    /// The tick at the low end of the range (the high end when inverted) is
    /// not marked, and neither are the `skip_ticks`. With `major_at_end`, the
    /// opposite end carries a major tick.
    pub fn format_numaxis(
        &mut self,
        key: impl Into<PanelKey>,
        axis: Axis,
        opts: &NumAxisOptions,
    ) -> Result<()> {
        let key = key.into();
        if opts.label_skip == 0 {
            return Err(ExhibitError::InvalidArgument("label_skip must be at least 1".into()));
        }
        let is_y = axis == Axis::Y;
        let sides = opts.sides.clone().unwrap_or_else(|| {
            if is_y {
                vec![Side::Right, Side::Left]
            } else {
                vec![Side::Bottom]
            }
        });
        if let Some(side) = sides.iter().find(|s| s.axis() != axis) {
            return Err(ExhibitError::InvalidArgument(format!(
                "side {side:?} does not belong to the {axis:?} axis"
            )));
        }

        let num_range = match opts.range {
            Some(r) => r,
            None => self.axis_range(&key, axis)?,
        };
        num_range.validate()?;
        let (r0, r1) = (num_range.min, num_range.max);
        let final_range = if opts.invert {
            num_range.inverted()
        } else {
            num_range
        };
        let ticks = opts.tick_pos.clone().unwrap_or_else(|| nice_ticks(num_range));
        let skip = opts
            .skip_ticks
            .clone()
            .unwrap_or_else(|| if is_y { vec![0.0] } else { Vec::new() });
        let major_at_end = opts.major_at_end.unwrap_or(is_y);
        let (hidden_end, major_pos) = if opts.invert { (r1, r0) } else { (r0, r1) };
        let minor: Vec<f64> = ticks
            .iter()
            .copied()
            .filter(|&t| !close(t, hidden_end) && !skip.iter().any(|&s| close(t, s)))
            .collect();

        let xoff = opts.label_xoffset.unwrap_or(if is_y { 0.02 } else { 0.0 });
        let yoff = opts.label_yoffset.unwrap_or(if is_y { 0.02 } else { 0.05 });
        let (xoff, yoff) = match (is_y, opts.invert) {
            (true, false) => (xoff, -yoff),
            (false, true) => (-xoff, yoff),
            _ => (xoff, yoff),
        };
        let primary = if is_y { Side::Right } else { Side::Bottom };
        let label_side = match sides.as_slice() {
            [] => None,
            [only] => Some(*only),
            many if many.contains(&primary) => Some(primary),
            many => Some(many[0]),
        };

        let mut positions: Vec<f64> = Vec::new();
        if opts.minor_labels {
            positions.extend(
                ticks
                    .iter()
                    .enumerate()
                    .filter(|(i, t)| i % opts.label_skip == 0 && !(major_at_end && close(**t, major_pos)))
                    .map(|(_, t)| *t),
            );
        }
        if major_at_end && opts.major_label {
            let cadence = ticks
                .iter()
                .position(|&t| close(t, major_pos))
                .unwrap_or(ticks.len());
            if cadence % opts.label_skip == 0 {
                positions.push(major_pos);
            }
        }

        let span = r1 - r0;
        let mut labels = Vec::with_capacity(positions.len());
        if let Some(side) = label_side {
            for t in positions {
                let text = opts.number_format.format(t);
                let item = match side {
                    Side::Right | Side::Left => {
                        let y = data_to_fixed(t + yoff * span, final_range)?;
                        let (x, h_align) = if side == Side::Right {
                            (1.0 + xoff, HAlign::Left)
                        } else {
                            (-xoff, HAlign::Right)
                        };
                        label(text, x, y, opts.font_size, h_align, VAlign::Bottom)
                    }
                    Side::Bottom | Side::Top => {
                        let x = data_to_fixed(t + xoff * span, final_range)?;
                        let (y, v_align) = if side == Side::Bottom {
                            (-yoff, VAlign::Top)
                        } else {
                            (1.0 + yoff, VAlign::Bottom)
                        };
                        label(text, x, y, opts.font_size, HAlign::Center, v_align)
                    }
                };
                labels.push(item);
            }
        }
        debug!(
            "panel `{key}` {axis:?} axis: range [{}, {}], {} minor ticks, {} labels",
            final_range.min,
            final_range.max,
            minor.len(),
            labels.len()
        );

        let owner = self.axis_owner(&key, axis)?;
        let state = self.panel_mut(&owner)?.axis_mut(axis);
        state.range = Some(final_range);
        state.minor_ticks = minor;
        state.major_ticks = if major_at_end { vec![major_pos] } else { Vec::new() };
        state.minor_style = opts.minor;
        state.major_style = opts.major;
        state.tick_sides = sides.clone();
        state.tick_color = opts.color;

        let panel = self.panel_mut(&key)?;
        for side in &sides {
            panel.spines.get_mut(*side).color = opts.color;
        }
        for item in labels {
            panel.push(Primitive::Text(item));
        }
        Ok(())
    }

    /// Date ticks and labels on the bottom of a time-series panel.
    pub fn format_ts_xaxis(&mut self, key: impl Into<PanelKey>, opts: &TsAxisOptions) -> Result<()> {
        let key = key.into();
        let xr = self.axis_range(&key, Axis::X)?;
        xr.validate()?;
        let minor: Vec<f64> = opts.minor_pos.iter().copied().map(date_to_num).collect();
        let major: Vec<f64> = match (&opts.major_pos, opts.mark_years) {
            (Some(pos), _) => pos.iter().copied().map(date_to_num).collect(),
            (None, true) => {
                let lo = midnight(num_to_date(xr.lower())?.date());
                let hi = num_to_date(xr.upper())?;
                generate_range(lo, hi, PeriodUnit::Year, 1)?
                    .iter()
                    .map(date_to_num)
                    .collect()
            }
            (None, false) => Vec::new(),
        };

        let mut labels = Vec::new();
        if !opts.label_dates.is_empty() {
            if opts.label_format.is_none() && !opts.irregular_month {
                return Err(ExhibitError::InvalidArgument(
                    "label dates need a label format or irregular month labels".into(),
                ));
            }
            let units = resolve_label_units(
                &opts.label_dates,
                opts.label_units.as_deref(),
                opts.label_format.as_deref(),
                opts.irregular_month,
                opts.infer_unit_from_format,
            )?;
            let mut significant = minor.clone();
            significant.extend(&major);
            let placements =
                place_labels(&opts.label_dates, &units, &significant, xr, opts.centering)?;
            for p in placements {
                let text = if opts.irregular_month {
                    format_month_irregular(p.date)
                } else {
                    format_date(p.date, opts.label_format.as_deref().unwrap_or_default())?
                };
                labels.push(label(
                    text,
                    p.fixed_x + opts.label_xoffset,
                    -opts.label_yoffset,
                    opts.font_size,
                    HAlign::Center,
                    VAlign::Bottom,
                ));
            }
        }
        debug!(
            "panel `{key}` date axis: {} minor, {} major ticks, {} labels",
            minor.len(),
            major.len(),
            labels.len()
        );

        let owner = self.axis_owner(&key, Axis::X)?;
        let state = self.panel_mut(&owner)?.axis_mut(Axis::X);
        state.minor_ticks = minor;
        state.major_ticks = major;
        state.minor_style = opts.minor;
        state.major_style = opts.major;
        state.tick_sides = vec![Side::Bottom];
        state.tick_color = opts.color;

        let panel = self.panel_mut(&key)?;
        panel.spines.bottom.color = opts.color;
        for item in labels {
            panel.push(Primitive::Text(item));
        }
        Ok(())
    }

    /// Category axis: ticks between categories, labels centered on each.
    pub fn format_cs_cataxis<S: AsRef<str>>(
        &mut self,
        key: impl Into<PanelKey>,
        labels: &[S],
        opts: &CatAxisOptions,
    ) -> Result<()> {
        let key = key.into();
        let n = labels.len();
        let range = opts
            .limits
            .unwrap_or_else(|| AxisRange::new(-0.5, n as f64 - 0.5));
        range.validate()?;
        let ticks: Vec<f64> = (1..=n).map(|i| i as f64 - 0.5).collect();
        let mut items = Vec::with_capacity(n);
        for (i, text) in labels.iter().enumerate() {
            let along = data_to_fixed(i as f64, range)? + opts.label_catoffset;
            let mut item = match opts.axis {
                Axis::X => label(
                    text.as_ref().to_string(),
                    along,
                    opts.label_numoffset,
                    opts.font_size,
                    opts.h_align.unwrap_or(HAlign::Center),
                    opts.v_align,
                ),
                Axis::Y => label(
                    text.as_ref().to_string(),
                    opts.label_numoffset,
                    along,
                    opts.font_size,
                    opts.h_align.unwrap_or(HAlign::Right),
                    opts.v_align,
                ),
            };
            item.rotation = opts.rotation;
            items.push(item);
        }

        self.set_axis_range(&key, opts.axis, range)?;
        let side = match opts.axis {
            Axis::X => Side::Bottom,
            Axis::Y => Side::Left,
        };
        let owner = self.axis_owner(&key, opts.axis)?;
        let state = self.panel_mut(&owner)?.axis_mut(opts.axis);
        state.minor_ticks = Vec::new();
        state.major_ticks = ticks;
        state.major_style = opts.tick;
        state.tick_sides = vec![side];
        state.tick_color = opts.color;

        let panel = self.panel_mut(&key)?;
        panel.spines.get_mut(side).color = opts.color;
        for item in items {
            panel.push(Primitive::Text(item));
        }
        Ok(())
    }
}

/// `strftime` formatting that reports bad specifiers instead of panicking.
fn format_date(date: NaiveDateTime, fmt: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(fmt))
        .map_err(|_| ExhibitError::InvalidArgument(format!("bad date format `{fmt}`")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_format_matches_printf_g() {
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(2.5), "2.5");
        assert_eq!(format_general(100.0), "100");
        assert_eq!(format_general(-0.25), "-0.25");
        assert_eq!(format_general(1234567.0), "1.23457e+06");
        assert_eq!(format_general(0.00001), "1e-05");
    }

    #[test]
    fn grouped_format_inserts_separators() {
        assert_eq!(NumberFormat::Grouped(0).format(12500.0), "12,500");
        assert_eq!(NumberFormat::Grouped(1).format(-1234.56), "-1,234.6");
        assert_eq!(NumberFormat::Grouped(0).format(-0.2), "0");
        assert_eq!(NumberFormat::Fixed(2).format(3.14159), "3.14");
    }

    #[test]
    fn bad_date_format_is_an_error() {
        let t = midnight(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(format_date(t, "%Y").unwrap(), "2020");
        assert!(format_date(t, "%Q").is_err());
    }
}
