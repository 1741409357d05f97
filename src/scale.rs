//! "Nice" bounds and tick positions for axes nobody has set explicitly.

use crate::coords::AxisRange;

/// Roughly how many intervals an autoscaled axis is split into.
const TARGET_INTERVALS: f64 = 5.0;

/// Smallest value of the form {1, 2, 5, 10} × 10ⁿ that is at least `raw`.
pub fn nice_step(raw: f64) -> f64 {
    let raw = raw.abs();
    if !raw.is_finite() || raw == 0.0 {
        return 1.0;
    }
    let base = 10_f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * base)
        .find(|&c| c >= raw * (1.0 - 1e-12))
        .unwrap_or(10.0 * base)
}

/// Bounds enclosing `[lo, hi]`, snapped outward to a nice step.
///
/// A degenerate extent is widened by one unit on each side first.
pub fn nice_bounds(lo: f64, hi: f64) -> AxisRange {
    if !(lo.is_finite() && hi.is_finite()) {
        return AxisRange::default();
    }
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if lo == hi {
        lo -= 1.0;
        hi += 1.0;
    }
    let step = nice_step((hi - lo) / TARGET_INTERVALS);
    AxisRange::new((lo / step).floor() * step, (hi / step).ceil() * step)
}

/// Most ticks [`nice_ticks`] will produce.
const MAX_TICKS: f64 = 1000.0;

/// Tick positions at a nice step covering `range` (ends included when they land on the step).
///
/// Empty for a degenerate or non-finite range, or one whose span overflows.
pub fn nice_ticks(range: AxisRange) -> Vec<f64> {
    let (lo, hi) = (range.lower(), range.upper());
    let span = hi - lo;
    if !(span.is_finite() && span > 0.0) {
        return Vec::new();
    }
    let step = nice_step(span / TARGET_INTERVALS);
    let first = (lo / step - 1e-9).ceil();
    let last = (hi / step + 1e-9).floor();
    let count = last - first;
    if !(count.is_finite() && count < MAX_TICKS) {
        return Vec::new();
    }
    let count = count.max(-1.0) as i64;
    (0..=count)
        .map(|i| {
            let v = (first + i as f64) * step;
            // Snap float noise like 0.30000000000000004.
            (v / step).round() * step
        })
        .map(|v| if v.abs() < step * 1e-9 { 0.0 } else { v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_follow_one_two_five() {
        assert_eq!(nice_step(0.7), 1.0);
        assert_eq!(nice_step(1.3), 2.0);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(20.0), 20.0);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn bounds_snap_outward() {
        let r = nice_bounds(0.3, 9.2);
        assert_eq!((r.min, r.max), (0.0, 10.0));
        let flat = nice_bounds(4.0, 4.0);
        assert!(flat.min < 4.0 && flat.max > 4.0);
    }

    #[test]
    fn unbounded_spans_give_no_ticks() {
        assert!(nice_ticks(AxisRange::new(-f64::MAX, f64::MAX)).is_empty());
        assert!(nice_ticks(AxisRange::new(0.0, f64::INFINITY)).is_empty());
        assert!(nice_ticks(AxisRange::new(f64::NAN, 1.0)).is_empty());
        assert!(nice_ticks(AxisRange::new(3.0, 3.0)).is_empty());
    }

    #[test]
    fn ticks_cover_range() {
        assert_eq!(nice_ticks(AxisRange::new(0.0, 10.0)), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }
}
