use chrono::NaiveDateTime;
use exhibit_rs::AxisRange;
use exhibit_rs::coords::{date_to_num, parse_datetime};
use exhibit_rs::ticks::{
    LabelCentering, PeriodUnit, format_month_irregular, generate_range, infer_unit_from_dates,
    infer_unit_from_format, place_labels, resolve_label_units,
};

fn dt(s: &str) -> NaiveDateTime {
    parse_datetime(s).unwrap()
}

#[test]
fn month_range_starts_at_next_month() {
    let r = generate_range(dt("2020-01-15"), dt("2020-06-30"), PeriodUnit::Month, 1).unwrap();
    let got = r.to_vec();
    assert_eq!(got.len(), 5);
    assert_eq!(got[0], dt("2020-02-01"));
    assert_eq!(got[4], dt("2020-06-01"));
    // restartable
    assert_eq!(r.iter().count(), 5);
}

#[test]
fn quarters_anchor_on_calendar_quarters() {
    let r = generate_range(dt("2020-02-10"), dt("2020-12-31"), PeriodUnit::Quarter, 1).unwrap();
    assert_eq!(
        r.to_vec(),
        vec![dt("2020-04-01"), dt("2020-07-01"), dt("2020-10-01")]
    );
}

#[test]
fn skip_thins_the_range() {
    let r = generate_range(dt("2010-01-01"), dt("2020-12-31"), PeriodUnit::Year, 5).unwrap();
    assert_eq!(
        r.to_vec(),
        vec![dt("2010-01-01"), dt("2015-01-01"), dt("2020-01-01")]
    );
}

#[test]
fn weeks_roll_to_sunday() {
    let r = generate_range(dt("2024-01-03"), dt("2024-01-10"), PeriodUnit::Week, 1).unwrap();
    assert_eq!(r.to_vec(), vec![dt("2024-01-07")]);
}

#[test]
fn empty_when_end_precedes_anchor() {
    let r = generate_range(dt("2020-01-02"), dt("2020-01-20"), PeriodUnit::Month, 1).unwrap();
    assert!(r.is_empty());
}

#[test]
fn format_reveals_the_finest_unit() {
    assert_eq!(infer_unit_from_format("%b %Y", false), PeriodUnit::Month);
    assert_eq!(infer_unit_from_format("%Y", false), PeriodUnit::Year);
    assert_eq!(infer_unit_from_format("%H:%M", false), PeriodUnit::Minute);
    assert_eq!(infer_unit_from_format("", true), PeriodUnit::Month);
}

#[test]
fn spacing_reveals_the_unit() {
    let years = [dt("2018-01-01"), dt("2019-01-01"), dt("2020-01-01")];
    assert_eq!(infer_unit_from_dates(&years).unwrap(), PeriodUnit::Year);
    let months = [dt("2020-01-01"), dt("2020-02-01"), dt("2020-03-01")];
    assert_eq!(infer_unit_from_dates(&months).unwrap(), PeriodUnit::Month);
}

#[test]
fn explicit_units_broadcast_or_match() {
    let labels = [dt("2020-01-01"), dt("2021-01-01")];
    let one = resolve_label_units(&labels, Some(&[PeriodUnit::Year]), None, false, true).unwrap();
    assert_eq!(one, vec![PeriodUnit::Year; 2]);
    let bad = resolve_label_units(
        &labels,
        Some(&[PeriodUnit::Year, PeriodUnit::Month, PeriodUnit::Day]),
        None,
        false,
        true,
    );
    assert!(bad.is_err());
    let from_fmt = resolve_label_units(&labels, None, Some("%Y-%m"), false, true).unwrap();
    assert_eq!(from_fmt, vec![PeriodUnit::Month; 2]);
}

#[test]
fn midpoint_labels_sit_mid_period() {
    let range = AxisRange::from_coords(dt("2019-07-01"), dt("2021-12-31"));
    let placed = place_labels(
        &[dt("2020-01-01")],
        &[PeriodUnit::Year],
        &[],
        range,
        LabelCentering::Midpoint,
    )
    .unwrap();
    assert_eq!(placed[0].data_x, date_to_num(dt("2020-07-02")));
}

#[test]
fn midpoint_is_clipped_to_the_axis() {
    let range = AxisRange::from_coords(dt("2020-01-01"), dt("2020-04-01"));
    let placed = place_labels(
        &[dt("2020-01-01")],
        &[PeriodUnit::Year],
        &[],
        range,
        LabelCentering::Midpoint,
    )
    .unwrap();
    assert_eq!(placed[0].fixed_x, 0.5);
}

#[test]
fn exact_labels_stay_put() {
    let range = AxisRange::from_coords(dt("2020-01-01"), dt("2020-12-31"));
    let placed = place_labels(
        &[dt("2020-01-01")],
        &[PeriodUnit::Month],
        &[],
        range,
        LabelCentering::Exact,
    )
    .unwrap();
    assert_eq!(placed[0].fixed_x, 0.0);
}

#[test]
fn tick_aligned_labels_center_between_ticks() {
    let range = AxisRange::from_coords(dt("2019-12-01"), dt("2021-02-01"));
    let ticks = [date_to_num(dt("2020-01-01")), date_to_num(dt("2021-01-01"))];
    let placed = place_labels(
        &[dt("2020-01-01")],
        &[PeriodUnit::Year],
        &ticks,
        range,
        LabelCentering::TickAligned,
    )
    .unwrap();
    assert_eq!(placed[0].data_x, (ticks[0] + ticks[1]) / 2.0);
}

#[test]
fn mismatched_units_are_rejected() {
    let range = AxisRange::new(0.0, 1.0);
    assert!(place_labels(&[dt("2020-01-01")], &[], &[], range, LabelCentering::Exact).is_err());
}

#[test]
fn irregular_month_names() {
    assert_eq!(format_month_irregular(dt("2020-06-01")), "June");
    assert_eq!(format_month_irregular(dt("2020-09-01")), "Sept.");
    assert_eq!(format_month_irregular(dt("2020-01-01")), "Jan.");
    assert_eq!(format_month_irregular(dt("2020-05-01")), "May");
}

#[test]
fn two_years_of_quarters() {
    let r = generate_range(dt("2019-01-01"), dt("2020-12-31"), PeriodUnit::Quarter, 1).unwrap();
    assert_eq!(r.to_vec().len(), 8);
    let y = generate_range(dt("2020-01-01"), dt("2020-12-31"), PeriodUnit::Year, 1).unwrap();
    assert_eq!(y.to_vec(), vec![dt("2020-01-01")]);
}

#[test]
fn huge_skip_stops_instead_of_wrapping() {
    let r = generate_range(dt("2020-01-01"), dt("2020-12-31"), PeriodUnit::Month, u32::MAX).unwrap();
    assert_eq!(r.to_vec(), vec![dt("2020-01-01")]);
    let q = generate_range(dt("2020-01-01"), dt("2020-12-31"), PeriodUnit::Quarter, 1_000_000_000)
        .unwrap();
    assert_eq!(q.to_vec(), vec![dt("2020-01-01")]);
    let y = generate_range(dt("2020-01-01"), dt("2020-12-31"), PeriodUnit::Year, 100_000_000)
        .unwrap();
    assert!(y.iter().all(|t| t >= dt("2020-01-01") && t <= dt("2020-12-31")));
}

#[test]
fn business_day_skip_jumps_weekends() {
    let r = generate_range(dt("2024-01-01"), dt("2024-01-20"), PeriodUnit::BusinessDay, 7).unwrap();
    assert_eq!(
        r.to_vec(),
        vec![dt("2024-01-01"), dt("2024-01-10"), dt("2024-01-19")]
    );
}

#[test]
fn collapsed_tick_window_widens_to_axis_end() {
    let range = AxisRange::from_coords(dt("2020-01-01"), dt("2021-06-30"));
    let tick = date_to_num(dt("2020-12-15"));
    let placed = place_labels(
        &[dt("2020-12-01")],
        &[PeriodUnit::Month],
        &[tick],
        range,
        LabelCentering::TickAligned,
    )
    .unwrap();
    assert_eq!(placed[0].data_x, (tick + range.max) / 2.0);
}
