use approx::assert_relative_eq;
use exhibit_rs::coords::{data_to_fixed, date_to_num, fixed_to_data, num_to_date, parse_datetime};
use exhibit_rs::series::{Period, TimeSeries};
use exhibit_rs::{AxisRange, Coord, ExhibitError};
use proptest::prelude::*;

#[test]
fn ordinal_counts_days_since_epoch() {
    let t = parse_datetime("2000-01-01").unwrap();
    assert_eq!(date_to_num(t), 10957.0);
    let noon = parse_datetime("1970-01-02 12:00:00").unwrap();
    assert_eq!(date_to_num(noon), 1.5);
}

#[test]
fn fractions_follow_range_direction() {
    assert_eq!(data_to_fixed(5.0, AxisRange::new(0.0, 10.0)).unwrap(), 0.5);
    assert_eq!(data_to_fixed(2.5, AxisRange::new(10.0, 0.0)).unwrap(), 0.75);
    assert_eq!(fixed_to_data(0.25, AxisRange::new(10.0, 0.0)).unwrap(), 7.5);
}

#[test]
fn dates_map_onto_calendar_ranges() {
    let range = AxisRange::from_coords(
        parse_datetime("2020-01-01").unwrap(),
        parse_datetime("2021-01-01").unwrap(),
    );
    let mid = parse_datetime("2020-07-01").unwrap();
    assert_relative_eq!(data_to_fixed(mid, range).unwrap(), 182.0 / 366.0);
}

#[test]
fn zero_width_range_is_rejected() {
    let err = data_to_fixed(1.0, AxisRange::new(3.0, 3.0)).unwrap_err();
    assert!(matches!(err, ExhibitError::ZeroWidthRange { .. }));
    assert!(fixed_to_data(0.5, AxisRange::new(3.0, 3.0)).is_err());
}

#[test]
fn coords_parse_numbers_before_dates() {
    assert_eq!("2.5".parse::<Coord>().unwrap(), Coord::Numeric(2.5));
    let c: Coord = "2020-03-31".parse().unwrap();
    assert_eq!(c.to_datetime().unwrap(), parse_datetime("2020-03-31").unwrap());
    assert!("soon".parse::<Coord>().is_err());
}

#[test]
fn ordinals_beyond_the_calendar_are_errors() {
    for x in [1e9, -1e9, 1e300, f64::INFINITY, f64::NAN] {
        assert!(matches!(num_to_date(x), Err(ExhibitError::InvalidArgument(_))));
    }
    assert!(Coord::Numeric(2e9).to_datetime().is_err());
}

#[test]
fn range_outside_the_calendar_fails_cleanly() {
    let s = TimeSeries::from_periods(vec![Period::month(2020, 1).unwrap()], vec![1.0]).unwrap();
    let err = s
        .impose_range(Coord::Numeric(1e9), Coord::Numeric(2e9))
        .unwrap_err();
    assert!(matches!(err, ExhibitError::InvalidArgument(_)));
}

proptest! {
    #[test]
    fn fixed_and_data_are_inverse(min in -1e6f64..1e6, width in 1e-2f64..1e6, f in -2.0f64..2.0) {
        let range = AxisRange::new(min, min + width);
        let back = data_to_fixed(fixed_to_data(f, range).unwrap(), range).unwrap();
        prop_assert!((back - f).abs() < 1e-6);
    }

    #[test]
    fn ordinals_keep_millisecond_precision(ms in -2_000_000_000_000i64..4_000_000_000_000i64) {
        let t = num_to_date(ms as f64 / 86_400_000.0).unwrap();
        prop_assert_eq!(num_to_date(date_to_num(t)).unwrap(), t);
    }
}
