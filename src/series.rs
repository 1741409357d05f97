//! Value types for time-indexed data.
//!
//! A [`TimeSeries`] is never modified by the operations below; each one
//! returns a new, independently owned series.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::coords::{Coord, midnight, month_end, month_start};
use crate::error::{ExhibitError, Result};
use crate::frequency::Frequency;

/// A calendar bucket such as "2021-03" or "2019Q4", identified by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub freq: Frequency,
}

impl Period {
    /// Periods are day-granular; intraday frequencies are rejected.
    pub fn new(start: NaiveDate, freq: Frequency) -> Result<Self> {
        if matches!(freq, Frequency::Minutes(_) | Frequency::Hours(_)) {
            return Err(ExhibitError::InvalidArgument(format!(
                "periods cannot have intraday frequency {freq}"
            )));
        }
        Ok(Self { start, freq })
    }

    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            freq: Frequency::Day,
        }
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ExhibitError::InvalidArgument(format!("no month {year}-{month}")))?;
        Ok(Self {
            start,
            freq: Frequency::MonthEnd,
        })
    }

    /// `quarter` is 1..=4.
    pub fn quarter(year: i32, quarter: u32) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(ExhibitError::InvalidArgument(format!(
                "quarter must be 1..=4, got {quarter}"
            )));
        }
        let mut p = Self::month(year, 3 * quarter - 2)?;
        p.freq = Frequency::QuarterEnd;
        Ok(p)
    }

    /// `half` is 1 (January to June) or 2 (July to December).
    pub fn half_year(year: i32, half: u32) -> Result<Self> {
        if !(1..=2).contains(&half) {
            return Err(ExhibitError::InvalidArgument(format!(
                "half must be 1 or 2, got {half}"
            )));
        }
        let mut p = Self::month(year, 6 * half - 5)?;
        p.freq = Frequency::TwoQuarterEnd;
        Ok(p)
    }

    pub fn year(year: i32) -> Result<Self> {
        let mut p = Self::month(year, 1)?;
        p.freq = Frequency::YearEnd;
        Ok(p)
    }

    pub fn start_instant(&self) -> NaiveDateTime {
        midnight(self.start)
    }

    /// Last calendar day covered by the period.
    pub fn end_date(&self) -> NaiveDate {
        let months_spanned = match self.freq {
            Frequency::MonthEnd => 1,
            Frequency::QuarterEnd => 3,
            Frequency::SixMonthEnd | Frequency::TwoQuarterEnd => 6,
            Frequency::YearEnd => 12,
            Frequency::Week(_) => return self.start + Days::new(6),
            _ => return self.start,
        };
        month_start(self.start.year(), self.start.month(), months_spanned - 1)
            .and_then(|m| month_end(m.year(), m.month()))
            .unwrap_or(self.start)
    }

    /// Midnight of [`Period::end_date`], the instant end-anchored frequencies refer to.
    pub fn end_instant(&self) -> NaiveDateTime {
        midnight(self.end_date())
    }
}

/// Positions of a series: concrete instants or abstract periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimeIndex {
    Instants(Vec<NaiveDateTime>),
    Periods(Vec<Period>),
}

impl TimeIndex {
    pub fn len(&self) -> usize {
        match self {
            TimeIndex::Instants(v) => v.len(),
            TimeIndex::Periods(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered mapping from time position to value. `NaN` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    index: TimeIndex,
    values: Vec<f64>,
    freq: Option<Frequency>,
}

fn check_lengths(index: usize, values: usize) -> Result<()> {
    if index != values {
        return Err(ExhibitError::InvalidArgument(format!(
            "series has {index} positions but {values} values"
        )));
    }
    Ok(())
}

impl TimeSeries {
    /// Series over instants; pairs are sorted by instant.
    pub fn new(instants: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        check_lengths(instants.len(), values.len())?;
        let mut pairs: Vec<(NaiveDateTime, f64)> = instants.into_iter().zip(values).collect();
        pairs.sort_by_key(|(t, _)| *t);
        let (instants, values) = pairs.into_iter().unzip();
        Ok(Self {
            index: TimeIndex::Instants(instants),
            values,
            freq: None,
        })
    }

    /// Series over periods. All periods must share one frequency, which becomes the stored one.
    pub fn from_periods(periods: Vec<Period>, values: Vec<f64>) -> Result<Self> {
        check_lengths(periods.len(), values.len())?;
        let freq = periods.first().map(|p| p.freq);
        if periods.iter().any(|p| Some(p.freq) != freq) {
            return Err(ExhibitError::InvalidArgument(
                "periods of one series must share a frequency".into(),
            ));
        }
        let mut pairs: Vec<(Period, f64)> = periods.into_iter().zip(values).collect();
        pairs.sort_by_key(|(p, _)| p.start);
        let (periods, values) = pairs.into_iter().unzip();
        Ok(Self {
            index: TimeIndex::Periods(periods),
            values,
            freq,
        })
    }

    /// Same data with a stored frequency.
    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = Some(freq);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn freq(&self) -> Option<Frequency> {
        self.freq
    }

    /// Positions as instants; periods contribute their start.
    pub fn instants(&self) -> Vec<NaiveDateTime> {
        match &self.index {
            TimeIndex::Instants(v) => v.clone(),
            TimeIndex::Periods(v) => v.iter().map(Period::start_instant).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.instants().into_iter().zip(self.values.iter().copied())
    }

    /// Period-index normalization: periods become their start instants.
    /// Already instant-indexed series come back unchanged.
    pub fn to_instants(&self) -> TimeSeries {
        TimeSeries {
            index: TimeIndex::Instants(self.instants()),
            values: self.values.clone(),
            freq: self.freq,
        }
    }

    /// Periods become the midnight of their last day, matching the end-anchored
    /// frequencies the centering shifts are defined against.
    pub fn to_end_instants(&self) -> TimeSeries {
        let instants = match &self.index {
            TimeIndex::Instants(v) => v.clone(),
            TimeIndex::Periods(v) => v.iter().map(Period::end_instant).collect(),
        };
        TimeSeries {
            index: TimeIndex::Instants(instants),
            values: self.values.clone(),
            freq: self.freq,
        }
    }

    /// Keep observations from the day of `lo` through the end of the day of `hi`.
    ///
    /// Numeric bounds are date ordinals and are truncated to their calendar day.
    /// Ordinals outside the representable calendar are an error.
    pub fn impose_range(&self, lo: impl Into<Coord>, hi: impl Into<Coord>) -> Result<TimeSeries> {
        let lo = midnight(lo.into().to_datetime()?.date());
        let hi_day = hi.into().to_datetime()?.date();
        let hi = hi_day
            .checked_add_days(Days::new(1))
            .map(midnight)
            .ok_or_else(|| ExhibitError::InvalidArgument(format!("no day follows {hi_day}")))?;
        let keep: Vec<bool> = self.instants().iter().map(|t| *t >= lo && *t < hi).collect();
        let values = self
            .values
            .iter()
            .zip(&keep)
            .filter_map(|(v, k)| k.then_some(*v))
            .collect();
        let index = match &self.index {
            TimeIndex::Instants(v) => TimeIndex::Instants(
                v.iter().zip(&keep).filter_map(|(t, k)| k.then_some(*t)).collect(),
            ),
            TimeIndex::Periods(v) => TimeIndex::Periods(
                v.iter().zip(&keep).filter_map(|(p, k)| k.then_some(*p)).collect(),
            ),
        };
        Ok(TimeSeries {
            index,
            values,
            freq: self.freq,
        })
    }

    /// Every position moved by `days` (fractional), as an instant-indexed series.
    ///
    /// Fails when a moved instant would leave the representable calendar.
    pub fn shifted(&self, days: f64) -> Result<TimeSeries> {
        let out_of_range =
            || ExhibitError::InvalidArgument(format!("shift of {days} days leaves the calendar"));
        let ms = (days * 86_400_000.0).round();
        if !(ms.is_finite() && ms.abs() < i64::MAX as f64) {
            return Err(out_of_range());
        }
        let delta = TimeDelta::try_milliseconds(ms as i64).ok_or_else(out_of_range)?;
        let instants = self
            .instants()
            .into_iter()
            .map(|t| t.checked_add_signed(delta).ok_or_else(out_of_range))
            .collect::<Result<Vec<_>>>()?;
        Ok(TimeSeries {
            index: TimeIndex::Instants(instants),
            values: self.values.clone(),
            freq: self.freq,
        })
    }

    /// Explicit frequency, else the stored one, else inferred from spacing.
    pub fn resolve_freq(&self, explicit: Option<Frequency>) -> Result<Frequency> {
        match explicit.or(self.freq) {
            Some(f) => Ok(f),
            None => Frequency::infer(&self.instants()),
        }
    }
}
