use approx::assert_relative_eq;
use exhibit_rs::centering::{center_cs_obs, center_ts_obs, ts_shift_days};
use exhibit_rs::coords::{date_to_num, parse_datetime};
use exhibit_rs::series::{Period, TimeSeries};
use exhibit_rs::stack::StackLayout;
use exhibit_rs::{ExhibitError, Frequency};

#[test]
fn monthly_period_centers_mid_month() {
    let s = TimeSeries::from_periods(vec![Period::month(2020, 1).unwrap()], vec![4.0]).unwrap();
    let centered = center_ts_obs(&s, None, &StackLayout::default()).unwrap();
    assert_eq!(centered.instants(), vec![parse_datetime("2020-01-16").unwrap()]);
    assert_eq!(centered.values(), &[4.0]);
    assert_eq!(centered.freq(), Some(Frequency::MonthEnd));
}

#[test]
fn stacks_sit_side_by_side() {
    let first = parse_datetime("2020-03-31").unwrap();
    let left = StackLayout::new(2, 1).with_width_coef(0.8);
    let right = StackLayout::new(2, 2).with_width_coef(0.8);
    let s1 = ts_shift_days(Frequency::QuarterEnd, first, &left).unwrap();
    let s2 = ts_shift_days(Frequency::QuarterEnd, first, &right).unwrap();
    assert_relative_eq!(s1, -27.3, epsilon = 1e-9);
    assert_relative_eq!(s2, -63.7, epsilon = 1e-9);
    // one bar width apart
    assert_relative_eq!(s1 - s2, 36.4, epsilon = 1e-9);
}

#[test]
fn adjustment_moves_every_observation() {
    let first = parse_datetime("2020-12-31").unwrap();
    let plain = ts_shift_days(Frequency::YearEnd, first, &StackLayout::default()).unwrap();
    let moved = ts_shift_days(
        Frequency::YearEnd,
        first,
        &StackLayout::default().with_adjustment(10.0),
    )
    .unwrap();
    assert_relative_eq!(moved - plain, 10.0);
}

#[test]
fn annual_instants_are_inferred_and_centered() {
    let instants = ["2018-12-31", "2019-12-31", "2020-12-31"]
        .iter()
        .map(|s| parse_datetime(s).unwrap())
        .collect();
    let s = TimeSeries::new(instants, vec![1.0, 2.0, 3.0]).unwrap();
    let centered = center_ts_obs(&s, None, &StackLayout::default()).unwrap();
    let last = centered.instants()[2];
    assert_eq!(last, parse_datetime("2020-07-01 12:00:00").unwrap());
    assert_relative_eq!(
        date_to_num(last),
        date_to_num(parse_datetime("2020-12-31").unwrap()) - 182.5
    );
}

#[test]
fn out_of_range_stack_is_rejected() {
    let s = TimeSeries::from_periods(vec![Period::month(2020, 1).unwrap()], vec![1.0]).unwrap();
    let err = center_ts_obs(&s, None, &StackLayout::new(2, 3)).unwrap_err();
    assert!(matches!(err, ExhibitError::InvalidStack(_)));
    assert!(center_cs_obs(3, &StackLayout::new(1, 0)).is_err());
}

#[test]
fn two_point_series_needs_a_frequency() {
    let instants = vec![
        parse_datetime("2020-01-31").unwrap(),
        parse_datetime("2020-02-29").unwrap(),
    ];
    let s = TimeSeries::new(instants, vec![1.0, 2.0]).unwrap();
    assert!(center_ts_obs(&s, None, &StackLayout::default()).is_err());
    let centered = center_ts_obs(&s, Some(Frequency::MonthEnd), &StackLayout::default()).unwrap();
    assert_eq!(centered.instants()[0], parse_datetime("2020-01-16").unwrap());
}

#[test]
fn categories_center_on_integers() {
    assert_eq!(
        center_cs_obs(3, &StackLayout::default()).unwrap(),
        vec![0.0, 1.0, 2.0]
    );
    let second = center_cs_obs(2, &StackLayout::new(2, 2).with_width_coef(0.8)).unwrap();
    assert_relative_eq!(second[0], 0.2);
    assert_relative_eq!(second[1], 1.2);
}

#[test]
fn range_keeps_the_whole_last_day() {
    let instants = (1..=5)
        .map(|d| parse_datetime(&format!("2020-01-0{d} 12:00:00")).unwrap())
        .collect();
    let s = TimeSeries::new(instants, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let kept = s.impose_range(
        parse_datetime("2020-01-01").unwrap(),
        parse_datetime("2020-01-03").unwrap(),
    )
    .unwrap();
    assert_eq!(kept.values(), &[1.0, 2.0, 3.0]);
}

#[test]
fn restricting_commutes_with_centering() {
    let instants = (1..=6)
        .map(|d| parse_datetime(&format!("2020-01-0{d}")).unwrap())
        .collect();
    let s = TimeSeries::new(instants, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let layout = StackLayout::new(2, 1).with_width_coef(0.8);
    let lo = parse_datetime("2020-01-02").unwrap();
    let hi = parse_datetime("2020-01-04").unwrap();
    let a = center_ts_obs(&s.impose_range(lo, hi).unwrap(), Some(Frequency::Day), &layout).unwrap();
    let b = center_ts_obs(&s, Some(Frequency::Day), &layout).unwrap();
    let b_values: Vec<f64> = b
        .iter()
        .zip(s.instants())
        .filter(|(_, t)| *t >= lo && *t <= hi)
        .map(|((_, v), _)| v)
        .collect();
    assert_eq!(a.values(), &b_values[..]);
}

#[test]
fn period_index_normalizes_to_period_starts() {
    let s = TimeSeries::from_periods(
        vec![Period::quarter(2020, 1).unwrap(), Period::quarter(2020, 2).unwrap()],
        vec![1.0, 2.0],
    )
    .unwrap();
    let starts = s.to_instants();
    assert_eq!(
        starts.instants(),
        vec![
            parse_datetime("2020-01-01").unwrap(),
            parse_datetime("2020-04-01").unwrap()
        ]
    );
    assert_eq!(starts.freq(), Some(Frequency::QuarterEnd));
    assert_eq!(starts.to_instants(), starts);
}

#[test]
fn adjustment_past_the_calendar_is_an_error() {
    let s = TimeSeries::from_periods(vec![Period::month(2020, 1).unwrap()], vec![1.0]).unwrap();
    let layout = StackLayout::default().with_adjustment(1e9);
    let err = center_ts_obs(&s, Some(Frequency::MonthEnd), &layout).unwrap_err();
    assert!(matches!(err, ExhibitError::InvalidArgument(_)));
}
