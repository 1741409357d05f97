use approx::assert_relative_eq;
use exhibit_rs::coords::{date_to_num, parse_datetime};
use exhibit_rs::exhibit::scene::Primitive;
use exhibit_rs::exhibit::{
    BarOptions, GridSpan, LineOptions, NumAxisOptions, RefLineOptions, Scale, ShadingOptions,
    TsAxisOptions, TsPlotOptions,
};
use exhibit_rs::series::{Period, TimeSeries};
use exhibit_rs::{Axis, AxisRange, Coord, Exhibit, ExhibitConfig, ExhibitError, Frequency, PanelKey};

fn page() -> Exhibit {
    Exhibit::new(ExhibitConfig::new(2, 2)).unwrap()
}

fn year_2020() -> AxisRange {
    AxisRange::from_coords(
        parse_datetime("2020-01-01").unwrap(),
        parse_datetime("2020-12-31").unwrap(),
    )
}

#[test]
fn panel_keys_are_unique() {
    let mut ex = page();
    ex.add_panel_numeric("a", GridSpan::cell(0, 0), None, None).unwrap();
    let err = ex
        .add_panel_table("a", GridSpan::cell(0, 1))
        .unwrap_err();
    assert!(matches!(err, ExhibitError::DuplicatePanel(PanelKey::Name(ref k)) if k == "a"));
    // numeric keys live alongside names
    ex.add_panel_table(7u32, GridSpan::cell(1, 1)).unwrap();
    assert!(ex.panel(7u32).is_ok());
}

#[test]
fn span_outside_grid_is_rejected() {
    let mut ex = page();
    assert!(ex.add_panel_table("t", GridSpan::new(0..3, 0..1)).is_err());
}

#[test]
fn table_panels_use_unit_ranges() {
    let mut ex = page();
    ex.add_panel_table("t", GridSpan::new(1..2, 0..2)).unwrap();
    assert_eq!(ex.axis_range("t", Axis::X).unwrap(), AxisRange::new(0.0, 1.0));
    assert_eq!(ex.axis_range("t", Axis::Y).unwrap(), AxisRange::new(0.0, 1.0));
}

#[test]
fn numeric_axes_autoscale_to_nice_bounds() {
    let mut ex = page();
    ex.add_panel_numeric("n", GridSpan::cell(0, 0), None, None).unwrap();
    assert_eq!(ex.axis_range("n", Axis::Y).unwrap(), AxisRange::new(0.0, 1.0));
    ex.plot_num_line(
        "n",
        &[0.0, 1.0, 2.0, 3.0],
        &[0.5, 3.7, 2.0, 1.0],
        &LineOptions::default(),
    )
    .unwrap();
    assert_eq!(ex.axis_range("n", Axis::X).unwrap(), AxisRange::new(0.0, 3.0));
    assert_eq!(ex.axis_range("n", Axis::Y).unwrap(), AxisRange::new(0.0, 4.0));
}

#[test]
fn secondary_panels_share_one_axis() {
    let mut ex = page();
    ex.add_panel_numeric("main", GridSpan::cell(0, 0), None, None).unwrap();
    ex.add_secondary_y("main", "right").unwrap();
    ex.add_secondary_y("right", "right2").unwrap();

    ex.set_axis_range("right", Axis::X, AxisRange::new(0.0, 10.0)).unwrap();
    assert_eq!(ex.axis_range("main", Axis::X).unwrap(), AxisRange::new(0.0, 10.0));
    assert_eq!(ex.axis_range("right2", Axis::X).unwrap(), AxisRange::new(0.0, 10.0));

    ex.set_axis_range("right", Axis::Y, AxisRange::new(0.0, 100.0)).unwrap();
    assert_eq!(ex.axis_range("main", Axis::Y).unwrap(), AxisRange::new(0.0, 1.0));
    assert_eq!(ex.panel("right").unwrap().region(), ex.panel("main").unwrap().region());
}

#[test]
fn shared_axis_autoscales_over_every_panel() {
    let mut ex = page();
    ex.add_panel_numeric("main", GridSpan::cell(0, 0), None, None).unwrap();
    ex.add_secondary_y("main", "right").unwrap();
    let line = LineOptions::default();
    ex.plot_num_line("main", &[0.0, 4.0], &[1.0, 2.0], &line).unwrap();
    ex.plot_num_line("right", &[0.0, 9.0], &[50.0, 60.0], &line).unwrap();
    assert_eq!(ex.axis_range("main", Axis::X).unwrap(), AxisRange::new(0.0, 10.0));
    assert_eq!(ex.axis_range("right", Axis::Y).unwrap(), AxisRange::new(50.0, 60.0));
}

#[test]
fn secondary_of_unknown_panel_fails() {
    let mut ex = page();
    let err = ex.add_secondary_x("nope", "x2").unwrap_err();
    assert!(matches!(err, ExhibitError::UnknownPanel(_)));
}

#[test]
fn ts_bars_stack_by_sign() {
    let mut ex = page();
    ex.add_panel_ts("bars", year_2020(), GridSpan::cell(0, 0), None).unwrap();
    let periods: Vec<Period> = (1..=3).map(|m| Period::month(2020, m).unwrap()).collect();
    let a = TimeSeries::from_periods(periods.clone(), vec![1.0, f64::NAN, -2.0]).unwrap();
    let b = TimeSeries::from_periods(periods, vec![2.0, 3.0, 1.0]).unwrap();
    ex.plot_ts_barstack("bars", &[a, b], &BarOptions::default()).unwrap();

    let bars: Vec<(f64, f64, f64, f64)> = ex
        .panel("bars")
        .unwrap()
        .primitives()
        .iter()
        .filter_map(|p| match p {
            Primitive::Bar { x0, x1, y0, y1, .. } => Some((*x0, *x1, *y0, *y1)),
            _ => None,
        })
        .collect();
    assert_eq!(bars.len(), 6);
    let (x0, x1, _, _) = bars[0];
    assert_relative_eq!(x1 - x0, 24.0, epsilon = 1e-9);
    assert_relative_eq!(
        (x0 + x1) / 2.0,
        date_to_num(parse_datetime("2020-01-16").unwrap()),
        epsilon = 1e-6
    );
    // missing value is an empty bar
    assert_eq!((bars[1].2, bars[1].3), (0.0, 0.0));
    assert_eq!((bars[2].2, bars[2].3), (0.0, -2.0));
    // second series stacks on the positive tally
    assert_eq!((bars[3].2, bars[3].3), (1.0, 3.0));
    assert_eq!((bars[5].2, bars[5].3), (0.0, 1.0));
    assert_eq!(ex.axis_range("bars", Axis::Y).unwrap(), AxisRange::new(-2.0, 3.0));
}

#[test]
fn observations_outside_the_x_range_are_dropped() {
    let mut ex = page();
    ex.add_panel_ts("ts", year_2020(), GridSpan::cell(0, 0), None).unwrap();
    let periods = vec![
        Period::month(2019, 12).unwrap(),
        Period::month(2020, 1).unwrap(),
        Period::month(2020, 2).unwrap(),
    ];
    let s = TimeSeries::from_periods(periods, vec![9.0, 1.0, 2.0]).unwrap();
    ex.plot_ts_line("ts", &s, &Default::default(), &LineOptions::default())
        .unwrap();
    match &ex.panel("ts").unwrap().primitives()[0] {
        Primitive::Polyline { points, .. } => {
            assert_eq!(points.len(), 2);
            assert_eq!(points[0].1, 1.0);
        }
        other => panic!("unexpected primitive {other:?}"),
    }
}

#[test]
fn numaxis_skips_zero_and_marks_the_top() {
    let mut ex = page();
    ex.add_panel_numeric("n", GridSpan::cell(0, 0), None, None).unwrap();
    ex.plot_num_line("n", &[0.0, 3.0], &[0.5, 3.7], &LineOptions::default())
        .unwrap();
    ex.format_numaxis("n", Axis::Y, &NumAxisOptions::default()).unwrap();
    let y = ex.panel("n").unwrap().axis(Axis::Y).clone();
    assert_eq!(y.range, Some(AxisRange::new(0.0, 4.0)));
    assert_eq!(y.major_ticks, vec![4.0]);
    assert!(!y.minor_ticks.contains(&0.0));
    assert!(y.minor_ticks.contains(&1.0));
}

#[test]
fn inverted_numaxis_flips_the_range() {
    let mut ex = page();
    ex.add_panel_numeric("n", GridSpan::cell(0, 0), None, None).unwrap();
    let opts = NumAxisOptions {
        range: Some(AxisRange::new(0.0, 10.0)),
        invert: true,
        ..Default::default()
    };
    ex.format_numaxis("n", Axis::Y, &opts).unwrap();
    assert_eq!(ex.axis_range("n", Axis::Y).unwrap(), AxisRange::new(10.0, 0.0));
}

#[test]
fn fixed_hline_maps_through_the_range() {
    let mut ex = page();
    ex.add_panel_numeric("n", GridSpan::cell(0, 0), None, None).unwrap();
    ex.set_axis_range("n", Axis::Y, AxisRange::new(0.0, 10.0)).unwrap();
    let opts = RefLineOptions {
        scale: Scale::Fixed,
        ..Default::default()
    };
    ex.add_panel_hline("n", 0.5, &opts).unwrap();
    match ex.panel("n").unwrap().primitives().last() {
        Some(Primitive::HLine { y, x0, x1, .. }) => assert_eq!((*y, *x0, *x1), (5.0, 0.0, 1.0)),
        other => panic!("unexpected primitive {other:?}"),
    }
}

#[test]
fn shading_bounds_broadcast_and_default_to_the_frame() {
    let mut ex = page();
    ex.add_panel_numeric("n", GridSpan::cell(0, 0), None, None).unwrap();
    ex.set_axis_range("n", Axis::Y, AxisRange::new(-1.0, 1.0)).unwrap();
    let opts = ShadingOptions {
        y_high: Some(vec![0.5]),
        ..Default::default()
    };
    let xs = [Coord::Numeric(0.0), Coord::Numeric(0.5), Coord::Numeric(1.0)];
    ex.add_panel_shading("n", &xs, &opts).unwrap();
    match ex.panel("n").unwrap().primitives().last() {
        Some(Primitive::Band { lower, upper, .. }) => {
            assert_eq!(lower, &vec![-1.0; 3]);
            assert_eq!(upper, &vec![0.5; 3]);
        }
        other => panic!("unexpected primitive {other:?}"),
    }
    assert!(ex.add_panel_shading("n", &xs[..1], &opts).is_err());
}

#[test]
fn ts_plot_on_a_non_calendar_range_fails_cleanly() {
    let mut ex = page();
    ex.add_panel_numeric("n", GridSpan::cell(0, 0), None, None).unwrap();
    ex.plot_num_line("n", &[1e10, 2e10], &[1.0, 2.0], &LineOptions::default())
        .unwrap();
    let s = TimeSeries::from_periods(vec![Period::month(2020, 1).unwrap()], vec![1.0]).unwrap();
    let opts = TsPlotOptions {
        freq: Some(Frequency::MonthEnd),
        ..Default::default()
    };
    let err = ex
        .plot_ts_line("n", &s, &opts, &LineOptions::default())
        .unwrap_err();
    assert!(matches!(err, ExhibitError::InvalidArgument(_)));
}

#[test]
fn date_ticks_land_on_the_shared_axis_owner() {
    let mut ex = page();
    let range = AxisRange::from_coords(
        parse_datetime("2019-01-01").unwrap(),
        parse_datetime("2020-12-31").unwrap(),
    );
    ex.add_panel_ts("main", range, GridSpan::cell(0, 0), None).unwrap();
    ex.add_secondary_y("main", "right").unwrap();
    let opts = TsAxisOptions {
        mark_years: true,
        ..Default::default()
    };
    ex.format_ts_xaxis("right", &opts).unwrap();
    let years = vec![
        date_to_num(parse_datetime("2019-01-01").unwrap()),
        date_to_num(parse_datetime("2020-01-01").unwrap()),
    ];
    assert_eq!(ex.panel("main").unwrap().axis(Axis::X).major_ticks, years);
    assert!(ex.panel("right").unwrap().axis(Axis::X).major_ticks.is_empty());
}
