//! Coordinate conversion between data space and fixed (normalized) axis space.
//!
//! Calendar inputs anywhere in the crate are turned into numbers by
//! [`date_to_num`], so positions computed through different entry points stay
//! comparable.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExhibitError, Result};

const MS_PER_DAY: f64 = 86_400_000.0;

fn epoch() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Days (fractional) elapsed since 1970-01-01T00:00.
pub fn date_to_num(t: NaiveDateTime) -> f64 {
    (t - epoch()).num_milliseconds() as f64 / MS_PER_DAY
}

/// Inverse of [`date_to_num`], at millisecond resolution.
///
/// Ordinals that are not finite or lie outside the calendar chrono can
/// represent are rejected.
pub fn num_to_date(x: f64) -> Result<NaiveDateTime> {
    let ms = (x * MS_PER_DAY).round();
    // `as` saturates, so bound the float before converting
    let delta = if ms.is_finite() && ms.abs() < i64::MAX as f64 {
        TimeDelta::try_milliseconds(ms as i64)
    } else {
        None
    };
    delta
        .and_then(|d| epoch().checked_add_signed(d))
        .ok_or_else(|| {
            ExhibitError::InvalidArgument(format!("date ordinal {x} is outside the calendar"))
        })
}

/// Midnight of the given date.
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// First day of the month lying `offset` months after `year`/`month`.
pub(crate) fn month_start(year: i32, month: u32, offset: i32) -> Option<NaiveDate> {
    let idx = year
        .checked_mul(12)?
        .checked_add(month as i32 - 1)?
        .checked_add(offset)?;
    NaiveDate::from_ymd_opt(idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1, 1)
}

/// Last day of `year`/`month`.
pub(crate) fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    month_start(year, month, 1)?.pred_opt()
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(midnight(d));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| ExhibitError::InvalidDate(s.to_string()))
}

/// A position that is either already numeric or a calendar instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Coord {
    Numeric(f64),
    Calendar(NaiveDateTime),
}

impl Coord {
    /// The one normalization step: calendar instants become date ordinals.
    pub fn to_num(self) -> f64 {
        match self {
            Coord::Numeric(x) => x,
            Coord::Calendar(t) => date_to_num(t),
        }
    }

    /// The calendar instant this coordinate designates.
    pub fn to_datetime(self) -> Result<NaiveDateTime> {
        match self {
            Coord::Numeric(x) => num_to_date(x),
            Coord::Calendar(t) => Ok(t),
        }
    }
}

impl From<f64> for Coord {
    fn from(x: f64) -> Self {
        Coord::Numeric(x)
    }
}

impl From<i32> for Coord {
    fn from(x: i32) -> Self {
        Coord::Numeric(f64::from(x))
    }
}

impl From<NaiveDate> for Coord {
    fn from(d: NaiveDate) -> Self {
        Coord::Calendar(midnight(d))
    }
}

impl From<NaiveDateTime> for Coord {
    fn from(t: NaiveDateTime) -> Self {
        Coord::Calendar(t)
    }
}

impl FromStr for Coord {
    type Err = ExhibitError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(x) = s.trim().parse::<f64>() {
            return Ok(Coord::Numeric(x));
        }
        parse_datetime(s).map(Coord::Calendar)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Numeric(x) => write!(f, "{x}"),
            Coord::Calendar(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Which axis of a panel a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Data-space limits of one axis. `min > max` denotes an inverted axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build from any pair of coordinates (dates resolve through [`date_to_num`]).
    pub fn from_coords(min: impl Into<Coord>, max: impl Into<Coord>) -> Self {
        Self::new(min.into().to_num(), max.into().to_num())
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn lower(&self) -> f64 {
        self.min.min(self.max)
    }

    pub fn upper(&self) -> f64 {
        self.min.max(self.max)
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// The same limits, swapped.
    pub fn inverted(&self) -> Self {
        Self::new(self.max, self.min)
    }

    /// Fails with [`ExhibitError::ZeroWidthRange`] for ranges no coordinate can be mapped through.
    pub fn validate(&self) -> Result<()> {
        let w = self.width();
        if !w.is_finite() || w == 0.0 {
            return Err(ExhibitError::ZeroWidthRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Data coordinate → fraction of the axis range.
pub fn data_to_fixed(coord: impl Into<Coord>, range: AxisRange) -> Result<f64> {
    range.validate()?;
    Ok((coord.into().to_num() - range.min) / range.width())
}

/// Fraction of the axis range → data coordinate.
pub fn fixed_to_data(coord: f64, range: AxisRange) -> Result<f64> {
    range.validate()?;
    Ok(coord * range.width() + range.min)
}
