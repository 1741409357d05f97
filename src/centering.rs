//! Observation centering: moves each observation to the middle of the slot
//! its period (or category) occupies, offset per stack for grouped bars.

use chrono::{Datelike, NaiveDateTime};
use log::debug;

use crate::error::Result;
use crate::frequency::Frequency;
use crate::series::TimeSeries;
use crate::stack::{StackLayout, bar_width};

/// Shift in days applied to every observation of a series of `freq` whose
/// first instant is `first`.
///
/// Semi-annual (`TwoQuarterEnd`) data whose first observation does not fall
/// in June or December is taken to be centered already; it is first moved
/// forward half a period before the regular shift.
pub fn ts_shift_days(freq: Frequency, first: NaiveDateTime, layout: &StackLayout) -> Result<f64> {
    layout.validate()?;
    let period = freq.period_length_days()?;
    let width = bar_width(freq, layout.number_stacks, layout.width_coef)?;
    let stack = f64::from(layout.current_stack);
    let shift = -((0.5 - layout.width_coef / 2.0) * period + (stack - 0.5) * width
        - layout.position_adjustment);
    let already_centered =
        freq == Frequency::TwoQuarterEnd && !matches!(first.month(), 6 | 12);
    Ok(if already_centered { shift + period / 2.0 } else { shift })
}

/// Center a time series inside its periods.
///
/// Period-indexed input is anchored at the last day of each period. The
/// frequency comes from `freq`, else the series' stored frequency, else its
/// spacing (three or more observations). The same shift applies to every
/// observation.
pub fn center_ts_obs(
    series: &TimeSeries,
    freq: Option<Frequency>,
    layout: &StackLayout,
) -> Result<TimeSeries> {
    let anchored = series.to_end_instants();
    let freq = anchored.resolve_freq(freq)?;
    let Some(first) = anchored.instants().first().copied() else {
        layout.validate()?;
        freq.period_length_days()?;
        return Ok(anchored.with_freq(freq));
    };
    let shift = ts_shift_days(freq, first, layout)?;
    debug!(
        "centering {} observations at {freq}: shift {shift:.4} days (stack {}/{})",
        anchored.len(),
        layout.current_stack,
        layout.number_stacks
    );
    Ok(anchored.shifted(shift)?.with_freq(freq))
}

/// Positions for `len` cross-section observations: `i + c·((stack − ½)/n − ½) + adj`.
pub fn center_cs_obs(len: usize, layout: &StackLayout) -> Result<Vec<f64>> {
    layout.validate()?;
    let n = f64::from(layout.number_stacks);
    let stack = f64::from(layout.current_stack);
    let offset = layout.width_coef * ((stack - 0.5) / n - 0.5) + layout.position_adjustment;
    Ok((0..len).map(|i| i as f64 + offset).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::parse_datetime;

    #[test]
    fn annual_value_lands_mid_year() {
        let first = parse_datetime("2017-12-31").unwrap();
        let shift = ts_shift_days(Frequency::YearEnd, first, &StackLayout::default()).unwrap();
        assert_eq!(shift, -182.5);
    }

    #[test]
    fn off_cycle_semiannual_skips_half_period() {
        let layout = StackLayout::default();
        let regular = ts_shift_days(
            Frequency::TwoQuarterEnd,
            parse_datetime("2020-06-30").unwrap(),
            &layout,
        )
        .unwrap();
        let off_cycle = ts_shift_days(
            Frequency::TwoQuarterEnd,
            parse_datetime("2020-03-31").unwrap(),
            &layout,
        )
        .unwrap();
        assert_eq!(regular, -91.0);
        assert_eq!(off_cycle, 0.0);
    }

    #[test]
    fn cross_section_stacks_split_the_slot() {
        let layout = StackLayout::new(2, 2).with_width_coef(0.8);
        let pos = center_cs_obs(3, &layout).unwrap();
        assert!((pos[0] - 0.2).abs() < 1e-12);
        assert!((pos[2] - 2.2).abs() < 1e-12);
    }
}
