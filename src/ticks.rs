//! Date tick ranges and centered date-label placement.
//!
//! A formatting call resolves one [`PeriodUnit`] per label date, computes the
//! boundary of the period that follows the label, then picks the window the
//! label is centered over (see [`LabelCentering`]). Nothing is carried between
//! calls.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::coords::{AxisRange, data_to_fixed, date_to_num, month_end, month_start};
use crate::error::{ExhibitError, Result};

/// Calendar unit used for tick ranges and label periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodUnit {
    Second,
    Minute,
    Hour,
    Day,
    BusinessDay,
    /// Weeks ending Sunday.
    Week,
    Month,
    /// Calendar quarters starting January, April, July and October.
    Quarter,
    Year,
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            PeriodUnit::Second => "s",
            PeriodUnit::Minute => "min",
            PeriodUnit::Hour => "h",
            PeriodUnit::Day => "d",
            PeriodUnit::BusinessDay => "b",
            PeriodUnit::Week => "w",
            PeriodUnit::Month => "m",
            PeriodUnit::Quarter => "q",
            PeriodUnit::Year => "y",
        };
        f.write_str(code)
    }
}

impl FromStr for PeriodUnit {
    type Err = ExhibitError;

    fn from_str(s: &str) -> Result<Self> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "s" => PeriodUnit::Second,
            "min" => PeriodUnit::Minute,
            "h" => PeriodUnit::Hour,
            "d" => PeriodUnit::Day,
            "b" => PeriodUnit::BusinessDay,
            "w" => PeriodUnit::Week,
            "m" => PeriodUnit::Month,
            "q" => PeriodUnit::Quarter,
            "a" | "y" => PeriodUnit::Year,
            _ => return Err(ExhibitError::UnrecognizedFrequency(s.to_string())),
        };
        Ok(unit)
    }
}

fn is_weekend(t: NaiveDateTime) -> bool {
    matches!(t.weekday(), Weekday::Sat | Weekday::Sun)
}

fn next_business_day(t: NaiveDateTime) -> NaiveDateTime {
    let mut next = t + Duration::days(1);
    while is_weekend(next) {
        next += Duration::days(1);
    }
    next
}

/// Same wall-clock time on the first of the month `offset` months away.
fn shift_months(t: NaiveDateTime, offset: i32) -> Option<NaiveDateTime> {
    month_start(t.year(), t.month(), offset).map(|d| d.and_time(t.time()))
}

/// First month-end strictly after `t` whose month is a multiple of `every` (1, 3 or 12).
fn next_month_end(t: NaiveDateTime, every: u32) -> Option<NaiveDateTime> {
    let mut offset = 0;
    loop {
        let first = month_start(t.year(), t.month(), offset)?;
        let end = month_end(first.year(), first.month())?;
        if first.month() % every == 0 && end > t.date() {
            return Some(end.and_time(t.time()));
        }
        offset += 1;
    }
}

impl PeriodUnit {
    /// Move `t` forward by `n` units without anchoring. `None` once the step
    /// leaves the representable calendar.
    fn advance(self, t: NaiveDateTime, n: u32) -> Option<NaiveDateTime> {
        let n64 = i64::from(n);
        let months = |per: i32| i32::try_from(n).ok()?.checked_mul(per);
        match self {
            PeriodUnit::Second => t.checked_add_signed(Duration::try_seconds(n64)?),
            PeriodUnit::Minute => t.checked_add_signed(Duration::try_minutes(n64)?),
            PeriodUnit::Hour => t.checked_add_signed(Duration::try_hours(n64)?),
            PeriodUnit::Day => t.checked_add_signed(Duration::try_days(n64)?),
            PeriodUnit::Week => t.checked_add_signed(Duration::try_weeks(n64)?),
            PeriodUnit::BusinessDay => {
                let (t, n) = if is_weekend(t) && n > 0 {
                    (next_business_day(t), n - 1)
                } else {
                    (t, n)
                };
                // five weekdays span exactly one calendar week
                let jumped = t.checked_add_signed(Duration::try_weeks(i64::from(n / 5))?)?;
                Some((0..n % 5).fold(jumped, |acc, _| next_business_day(acc)))
            }
            PeriodUnit::Month => shift_months(t, months(1)?),
            PeriodUnit::Quarter => shift_months(t, months(3)?),
            PeriodUnit::Year => shift_months(t, months(12)?),
        }
    }

    /// First anchor on or after `t`: weekdays, Sundays, or the first day of a
    /// month, quarter or year. Sub-daily and daily units are not anchored.
    fn roll_forward(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            PeriodUnit::Second | PeriodUnit::Minute | PeriodUnit::Hour | PeriodUnit::Day => Some(t),
            PeriodUnit::BusinessDay if is_weekend(t) => Some(next_business_day(t)),
            PeriodUnit::BusinessDay => Some(t),
            PeriodUnit::Week => {
                let ahead = 6 - t.weekday().num_days_from_monday();
                t.checked_add_signed(Duration::days(i64::from(ahead)))
            }
            PeriodUnit::Month | PeriodUnit::Quarter | PeriodUnit::Year => {
                let every = match self {
                    PeriodUnit::Month => 1,
                    PeriodUnit::Quarter => 3,
                    _ => 12,
                };
                let mut offset = i32::from(t.day() != 1);
                loop {
                    let candidate = shift_months(t, offset)?;
                    if (candidate.month() - 1) % every == 0 {
                        return Some(candidate);
                    }
                    offset += 1;
                }
            }
        }
    }

    /// Boundary of the period following a label dated `t`: the next period
    /// edge plus one step of a finer unit, so a tick sitting exactly on the
    /// edge still falls inside the label's window.
    pub fn next_boundary(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        let (edge, nudge) = match self {
            PeriodUnit::Second => (t.checked_add_signed(Duration::seconds(1))?, Duration::seconds(1)),
            PeriodUnit::Minute => (t.checked_add_signed(Duration::minutes(1))?, Duration::seconds(1)),
            PeriodUnit::Hour => (t.checked_add_signed(Duration::hours(1))?, Duration::minutes(1)),
            PeriodUnit::Day => (t.checked_add_signed(Duration::days(1))?, Duration::hours(1)),
            PeriodUnit::BusinessDay => (next_business_day(t), Duration::hours(1)),
            PeriodUnit::Week => {
                let ahead = match t.weekday() {
                    Weekday::Sun => 7,
                    w => 6 - w.num_days_from_monday(),
                };
                (
                    t.checked_add_signed(Duration::days(i64::from(ahead)))?,
                    Duration::days(1),
                )
            }
            PeriodUnit::Month => (next_month_end(t, 1)?, Duration::days(1)),
            PeriodUnit::Quarter => (next_month_end(t, 3)?, Duration::days(1)),
            PeriodUnit::Year => (next_month_end(t, 12)?, Duration::days(1)),
        };
        edge.checked_add_signed(nudge)
    }
}

/// Evenly spaced instants from `start` through `end` at `skip` × `unit`.
///
/// The value is restartable: every call to [`DateRange::iter`] starts over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    first: Option<NaiveDateTime>,
    end: NaiveDateTime,
    unit: PeriodUnit,
    skip: u32,
}

impl DateRange {
    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            next: self.first,
            end: self.end,
            unit: self.unit,
            skip: self.skip,
        }
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none_or(|t| t > self.end)
    }

    pub fn to_vec(&self) -> Vec<NaiveDateTime> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a DateRange {
    type Item = NaiveDateTime;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> DateRangeIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct DateRangeIter {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
    unit: PeriodUnit,
    skip: u32,
}

impl Iterator for DateRangeIter {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let current = self.next.filter(|t| *t <= self.end)?;
        self.next = self.unit.advance(current, self.skip);
        Some(current)
    }
}

/// Regular date sequence for ticks and labels.
///
/// Anchored units (business day, week, month, quarter, year) first roll
/// `start` forward to their next anchor; the other units step from `start`
/// as given.
pub fn generate_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    unit: PeriodUnit,
    skip: u32,
) -> Result<DateRange> {
    if skip == 0 {
        return Err(ExhibitError::InvalidArgument(
            "range skip must be at least 1".into(),
        ));
    }
    Ok(DateRange {
        first: unit.roll_forward(start),
        end,
        unit,
        skip,
    })
}

/// Finest calendar component a label format shows.
pub fn infer_unit_from_format(fmt: &str, irregular_month: bool) -> PeriodUnit {
    if irregular_month {
        PeriodUnit::Month
    } else if fmt.contains("%S") {
        PeriodUnit::Second
    } else if fmt.contains("%M") {
        PeriodUnit::Minute
    } else if fmt.contains("%H") {
        PeriodUnit::Hour
    } else if fmt.contains("%d") {
        PeriodUnit::Day
    } else if ["%m", "%b", "%B"].iter().any(|code| fmt.contains(code)) {
        PeriodUnit::Month
    } else {
        PeriodUnit::Year
    }
}

/// Unit of a sequence of label dates, from its spacing. Needs at least three dates.
pub fn infer_unit_from_dates(dates: &[NaiveDateTime]) -> Result<PeriodUnit> {
    if dates.len() < 3 {
        return Err(ExhibitError::InsufficientData(format!(
            "label unit detection needs at least 3 dates, got {}; pass units or a label format",
            dates.len()
        )));
    }
    let unrecognized = || ExhibitError::UnrecognizedFrequency("irregular label dates".into());

    let month_aligned = dates.iter().all(|d| {
        d.time() == chrono::NaiveTime::MIN
            && (d.day() == 1 || month_end(d.year(), d.month()).is_some_and(|e| e == d.date()))
    });
    if month_aligned {
        let gaps: Vec<i32> = dates
            .windows(2)
            .map(|w| (w[1].year() - w[0].year()) * 12 + w[1].month() as i32 - w[0].month() as i32)
            .collect();
        if gaps[0] > 0 && gaps.iter().all(|&g| g == gaps[0]) {
            return Ok(match gaps[0] {
                g if g % 12 == 0 => PeriodUnit::Year,
                g if g % 3 == 0 => PeriodUnit::Quarter,
                _ => PeriodUnit::Month,
            });
        }
    }

    let steps: Vec<i64> = dates.windows(2).map(|w| (w[1] - w[0]).num_seconds()).collect();
    let step = steps[0];
    if step > 0 && steps.iter().all(|&s| s == step) {
        return Ok(match step {
            s if s % (7 * 86_400) == 0 => PeriodUnit::Week,
            s if s % 86_400 == 0 => PeriodUnit::Day,
            s if s % 3600 == 0 => PeriodUnit::Hour,
            s if s % 60 == 0 => PeriodUnit::Minute,
            _ => PeriodUnit::Second,
        });
    }

    let business_daily = dates.iter().all(|d| !is_weekend(*d))
        && dates.windows(2).all(|w| next_business_day(w[0]) == w[1]);
    if business_daily {
        return Ok(PeriodUnit::BusinessDay);
    }
    Err(unrecognized())
}

/// One unit per label date.
///
/// Precedence: `explicit` (one entry for all labels, or one per label), then
/// the label format when `infer_from_format` is set, then the spacing of the
/// dates themselves.
pub fn resolve_label_units(
    label_dates: &[NaiveDateTime],
    explicit: Option<&[PeriodUnit]>,
    format: Option<&str>,
    irregular_month: bool,
    infer_from_format: bool,
) -> Result<Vec<PeriodUnit>> {
    let n = label_dates.len();
    if let Some(units) = explicit {
        return match units.len() {
            1 => Ok(vec![units[0]; n]),
            len if len == n => Ok(units.to_vec()),
            len => Err(ExhibitError::InvalidArgument(format!(
                "label units must have 1 or {n} entries, got {len}"
            ))),
        };
    }
    if infer_from_format && (irregular_month || format.is_some()) {
        let unit = infer_unit_from_format(format.unwrap_or(""), irregular_month);
        return Ok(vec![unit; n]);
    }
    Ok(vec![infer_unit_from_dates(label_dates)?; n])
}

/// How a date label is positioned along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelCentering {
    /// Midpoint of the first significant position at or after the label date and
    /// the last one at or before the next period boundary. Significant
    /// positions are the minor and major ticks plus both axis ends.
    #[default]
    TickAligned,
    /// Midpoint of [label date, next period boundary], clipped to the axis.
    Midpoint,
    /// The label date itself.
    Exact,
}

/// Where one date label goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub date: NaiveDateTime,
    /// Data-space (date ordinal) position.
    pub data_x: f64,
    /// Position as a fraction of the axis range.
    pub fixed_x: f64,
}

/// Horizontal position of each label date on an axis spanning `x_range`.
///
/// `ticks` holds the data-space positions of active minor and major ticks.
/// A tick-aligned window that collapses to a point is widened to the axis
/// maximum.
pub fn place_labels(
    label_dates: &[NaiveDateTime],
    units: &[PeriodUnit],
    ticks: &[f64],
    x_range: AxisRange,
    mode: LabelCentering,
) -> Result<Vec<LabelPlacement>> {
    if units.len() != label_dates.len() {
        return Err(ExhibitError::InvalidArgument(format!(
            "{} label dates but {} units",
            label_dates.len(),
            units.len()
        )));
    }
    x_range.validate()?;
    let (xlim0, xlim1) = (x_range.min, x_range.max);
    let mut significant: Vec<f64> = ticks.to_vec();
    significant.extend([xlim0, xlim1]);

    label_dates
        .iter()
        .zip(units)
        .map(|(&date, &unit)| -> Result<LabelPlacement> {
            let label = date_to_num(date);
            let next = unit
                .next_boundary(date)
                .map(date_to_num)
                .ok_or_else(|| ExhibitError::InvalidDate(date.to_string()))?;
            let (lo, hi) = match mode {
                LabelCentering::Exact => (label, label),
                LabelCentering::Midpoint => (xlim0.max(label), xlim1.min(next)),
                LabelCentering::TickAligned => {
                    let lo = significant
                        .iter()
                        .copied()
                        .filter(|&x| x >= label)
                        .reduce(f64::min)
                        .unwrap_or(label);
                    let hi = significant
                        .iter()
                        .copied()
                        .filter(|&x| x <= next)
                        .reduce(f64::max)
                        .unwrap_or(xlim1);
                    if hi == lo {
                        warn!(
                            "label window for {} collapsed at {lo}; widening to axis end {xlim1}",
                            date.format("%Y-%m-%d %H:%M:%S")
                        );
                        (lo, xlim1)
                    } else {
                        (lo, hi)
                    }
                }
            };
            let data_x = (lo + hi) / 2.0;
            let fixed_x = data_to_fixed(data_x, x_range)?;
            debug!("label {date} ({unit}): window [{lo}, {hi}] -> fixed {fixed_x:.4}");
            Ok(LabelPlacement {
                date,
                data_x,
                fixed_x,
            })
        })
        .collect()
}

/// Month abbreviation with a trailing period, except "May", "June", "July" and "Sept.".
pub fn format_month_irregular(date: impl Datelike) -> String {
    match date.month() {
        1 => "Jan.",
        2 => "Feb.",
        3 => "Mar.",
        4 => "Apr.",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "Aug.",
        9 => "Sept.",
        10 => "Oct.",
        11 => "Nov.",
        _ => "Dec.",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::parse_datetime;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn next_boundary_adds_finer_nudge() {
        assert_eq!(
            PeriodUnit::Month.next_boundary(dt("2020-01-01")),
            Some(dt("2020-02-01"))
        );
        assert_eq!(
            PeriodUnit::Month.next_boundary(dt("2020-01-31")),
            Some(dt("2020-03-01"))
        );
        assert_eq!(
            PeriodUnit::Year.next_boundary(dt("2020-01-01")),
            Some(dt("2021-01-01"))
        );
        assert_eq!(
            PeriodUnit::Day.next_boundary(dt("2020-01-01")),
            Some(dt("2020-01-02 01:00:00"))
        );
        assert_eq!(
            PeriodUnit::BusinessDay.next_boundary(dt("2020-01-03")),
            Some(dt("2020-01-06 01:00:00"))
        );
    }

    #[test]
    fn anchored_ranges_roll_forward() {
        let months = generate_range(dt("2020-01-15"), dt("2020-04-30"), PeriodUnit::Month, 1).unwrap();
        assert_eq!(
            months.to_vec(),
            vec![dt("2020-02-01"), dt("2020-03-01"), dt("2020-04-01")]
        );
        let weeks = generate_range(dt("2020-01-01"), dt("2020-01-20"), PeriodUnit::Week, 1).unwrap();
        assert_eq!(weeks.to_vec(), vec![dt("2020-01-05"), dt("2020-01-12"), dt("2020-01-19")]);
    }

    #[test]
    fn zero_skip_is_rejected() {
        assert!(generate_range(dt("2020-01-01"), dt("2020-12-31"), PeriodUnit::Year, 0).is_err());
    }
}
