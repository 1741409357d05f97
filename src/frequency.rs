//! The closed set of series frequencies and their nominal period lengths.
//!
//! Every frequency-dependent computation (bar widths, centering shifts) goes
//! through [`Frequency::period_length_days`], so a frequency outside the table
//! fails once, here, with [`ExhibitError::UnrecognizedFrequency`].

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::coords::month_end;
use crate::error::{ExhibitError, Result};

const MINUTE_MULTIPLES: [u32; 6] = [1, 5, 10, 15, 20, 30];
const HOUR_MULTIPLES: [u32; 7] = [1, 2, 3, 4, 6, 8, 12];

static SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*)(min|h|d|b|w|m|q|a|y)$").expect("static regex"));
static CANONICAL_MULTIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(minute|hour)$").expect("static regex"));

/// Sampling interval of a time series.
///
/// `Minutes` and `Hours` carry their multiple; only the multiples listed in
/// the table resolve to a period length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Minutes(u32),
    Hours(u32),
    Day,
    BusinessDay,
    /// Weekly, anchored on the given weekday.
    Week(Weekday),
    MonthEnd,
    SixMonthEnd,
    /// Calendar quarters ending March, June, September and December.
    QuarterEnd,
    TwoQuarterEnd,
    /// Years ending in December.
    YearEnd,
}

impl Frequency {
    /// Nominal length of one period, in days.
    pub fn period_length_days(&self) -> Result<f64> {
        let days = match *self {
            Frequency::Minutes(n) if MINUTE_MULTIPLES.contains(&n) => f64::from(n) / 1440.0,
            Frequency::Hours(n) if HOUR_MULTIPLES.contains(&n) => f64::from(n) / 24.0,
            Frequency::Minutes(_) | Frequency::Hours(_) => {
                return Err(ExhibitError::UnrecognizedFrequency(self.to_string()));
            }
            Frequency::Day | Frequency::BusinessDay => 1.0,
            Frequency::Week(_) => 7.0,
            Frequency::MonthEnd => 30.0,
            Frequency::SixMonthEnd => 180.0,
            Frequency::QuarterEnd => 91.0,
            Frequency::TwoQuarterEnd => 182.0,
            Frequency::YearEnd => 365.0,
        };
        Ok(days)
    }

    /// Every entry of the table, in ascending period length.
    pub fn all() -> Vec<Frequency> {
        let mut out: Vec<Frequency> = MINUTE_MULTIPLES.iter().map(|&n| Frequency::Minutes(n)).collect();
        out.extend(HOUR_MULTIPLES.iter().map(|&n| Frequency::Hours(n)));
        out.extend([Frequency::Day, Frequency::BusinessDay]);
        out.extend(
            [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ]
            .map(Frequency::Week),
        );
        out.extend([
            Frequency::MonthEnd,
            Frequency::QuarterEnd,
            Frequency::SixMonthEnd,
            Frequency::TwoQuarterEnd,
            Frequency::YearEnd,
        ]);
        out
    }

    /// Detect the frequency of an ordered sequence of instants from its spacing.
    ///
    /// At least three observations are required.
    pub fn infer(dates: &[NaiveDateTime]) -> Result<Frequency> {
        if dates.len() < 3 {
            return Err(ExhibitError::InsufficientData(format!(
                "frequency detection needs at least 3 observations, got {}; pass a frequency explicitly",
                dates.len()
            )));
        }
        let unrecognized = || {
            ExhibitError::UnrecognizedFrequency(format!(
                "irregular spacing starting at {}",
                dates[0].format("%Y-%m-%d %H:%M:%S")
            ))
        };

        let steps: Vec<i64> = dates.windows(2).map(|w| (w[1] - w[0]).num_seconds()).collect();
        let first = steps[0];
        if steps.iter().all(|&s| s == first) && first > 0 {
            if first < 3600 && first % 60 == 0 {
                let n = (first / 60) as u32;
                return MINUTE_MULTIPLES
                    .contains(&n)
                    .then_some(Frequency::Minutes(n))
                    .ok_or_else(unrecognized);
            }
            if first < 86_400 && first % 3600 == 0 {
                let n = (first / 3600) as u32;
                return HOUR_MULTIPLES
                    .contains(&n)
                    .then_some(Frequency::Hours(n))
                    .ok_or_else(unrecognized);
            }
            if first == 86_400 {
                return Ok(Frequency::Day);
            }
            if first == 7 * 86_400 {
                return Ok(Frequency::Week(dates[0].weekday()));
            }
        }

        let midnight = dates.iter().all(|d| d.num_seconds_from_midnight() == 0);
        if !midnight {
            return Err(unrecognized());
        }

        if is_business_daily(dates, &steps) {
            return Ok(Frequency::BusinessDay);
        }

        let month_ends = dates
            .iter()
            .all(|d| month_end(d.year(), d.month()).is_some_and(|e| e == d.date()));
        if !month_ends {
            return Err(unrecognized());
        }
        let months: Vec<i32> = dates
            .windows(2)
            .map(|w| (w[1].year() - w[0].year()) * 12 + w[1].month() as i32 - w[0].month() as i32)
            .collect();
        let gap = months[0];
        if months.iter().any(|&m| m != gap) {
            return Err(unrecognized());
        }
        let quarter_aligned = dates[0].month() % 3 == 0;
        match gap {
            1 => Ok(Frequency::MonthEnd),
            3 if quarter_aligned => Ok(Frequency::QuarterEnd),
            6 if quarter_aligned => Ok(Frequency::TwoQuarterEnd),
            6 => Ok(Frequency::SixMonthEnd),
            12 if dates[0].month() == 12 => Ok(Frequency::YearEnd),
            _ => Err(unrecognized()),
        }
    }
}

fn is_business_daily(dates: &[NaiveDateTime], steps: &[i64]) -> bool {
    let weekdays_only = dates
        .iter()
        .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun));
    weekdays_only
        && steps.iter().zip(dates).all(|(&s, d)| {
            s == 86_400 || (s == 3 * 86_400 && d.weekday() == Weekday::Fri)
        })
}

fn weekday_code(w: Weekday) -> &'static str {
    match w {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Minutes(1) => f.write_str("minute"),
            Frequency::Minutes(n) => write!(f, "{n}-minute"),
            Frequency::Hours(1) => f.write_str("hour"),
            Frequency::Hours(n) => write!(f, "{n}-hour"),
            Frequency::Day => f.write_str("day"),
            Frequency::BusinessDay => f.write_str("business-day"),
            Frequency::Week(w) => write!(f, "week-{}", weekday_code(*w)),
            Frequency::MonthEnd => f.write_str("month-end"),
            Frequency::SixMonthEnd => f.write_str("6-month-end"),
            Frequency::QuarterEnd => f.write_str("quarter-end"),
            Frequency::TwoQuarterEnd => f.write_str("2-quarter-end"),
            Frequency::YearEnd => f.write_str("year-end"),
        }
    }
}

impl FromStr for Frequency {
    type Err = ExhibitError;

    /// Accepts the shorthand codes (`5min`, `2h`, `6m`, `2q`, `w`, `b`, `a`, ...)
    /// and the canonical names printed by `Display`, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        let unrecognized = || ExhibitError::UnrecognizedFrequency(s.to_string());

        if let Some(freq) = Frequency::all().into_iter().find(|f| f.to_string() == key) {
            return Ok(freq);
        }
        if let Some(caps) = CANONICAL_MULTIPLE.captures(&key) {
            let n: u32 = caps[1].parse().map_err(|_| unrecognized())?;
            let freq = match &caps[2] {
                "minute" => Frequency::Minutes(n),
                _ => Frequency::Hours(n),
            };
            freq.period_length_days().map_err(|_| unrecognized())?;
            return Ok(freq);
        }

        let caps = SHORTHAND.captures(&key).ok_or_else(unrecognized)?;
        let n: u32 = match &caps[1] {
            "" => 1,
            digits => digits.parse().map_err(|_| unrecognized())?,
        };
        let freq = match (&caps[2], n) {
            ("min", n) => Frequency::Minutes(n),
            ("h", n) => Frequency::Hours(n),
            ("d", 1) => Frequency::Day,
            ("b", 1) => Frequency::BusinessDay,
            ("w", 1) => Frequency::Week(Weekday::Sun),
            ("m", 1) => Frequency::MonthEnd,
            ("m", 6) => Frequency::SixMonthEnd,
            ("q", 1) => Frequency::QuarterEnd,
            ("q", 2) => Frequency::TwoQuarterEnd,
            ("a" | "y", 1) => Frequency::YearEnd,
            _ => return Err(unrecognized()),
        };
        freq.period_length_days().map_err(|_| unrecognized())?;
        Ok(freq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_from_str() {
        for freq in Frequency::all() {
            assert_eq!(freq.to_string().parse::<Frequency>().unwrap(), freq);
        }
    }

    #[test]
    fn off_table_multiples_fail() {
        assert!(Frequency::Minutes(7).period_length_days().is_err());
        assert!(Frequency::Hours(5).period_length_days().is_err());
        assert!("7min".parse::<Frequency>().is_err());
        assert!("3q".parse::<Frequency>().is_err());
    }
}
