use exhibit_rs::coords::parse_datetime;
use exhibit_rs::exhibit::{
    ArrowOptions, BarOptions, CatAxisOptions, CsPlotOptions, FillStyle, GridSpan, KeyBox,
    KeyOptions, LineOptions, NumAxisOptions, ShadingOptions, TsAxisOptions,
};
use exhibit_rs::series::{Period, TimeSeries};
use exhibit_rs::style::{Hatch, Rgba};
use exhibit_rs::{Axis, AxisRange, Coord, Exhibit, ExhibitConfig, ExhibitError};
use tempfile::tempdir;

fn sample() -> Exhibit {
    let mut ex = Exhibit::new(ExhibitConfig::new(2, 1)).unwrap();
    let range = AxisRange::from_coords(
        parse_datetime("2019-01-01").unwrap(),
        parse_datetime("2020-12-31").unwrap(),
    );
    ex.add_panel_ts("ts", range, GridSpan::cell(0, 0), None).unwrap();
    let periods: Vec<Period> = (2019..=2020)
        .flat_map(|y| (1..=4).map(move |q| Period::quarter(y, q).unwrap()))
        .collect();
    let s = TimeSeries::from_periods(periods, vec![1.0, -0.5, 2.0, 1.5, -1.0, 0.5, 3.0, 2.0])
        .unwrap();
    let hatched = FillStyle {
        face: Rgba::DODGER_BLUE,
        hatch: Hatch::parse("//").unwrap(),
        ..Default::default()
    };
    let opts = BarOptions {
        styles: vec![hatched],
        ..Default::default()
    };
    ex.plot_ts_barstack("ts", &[s], &opts).unwrap();
    ex.format_ts_xaxis(
        "ts",
        &TsAxisOptions {
            mark_years: true,
            label_dates: vec![
                parse_datetime("2019-01-01").unwrap(),
                parse_datetime("2020-01-01").unwrap(),
            ],
            label_format: Some("%Y".into()),
            ..Default::default()
        },
    )
    .unwrap();
    ex.format_numaxis("ts", Axis::Y, &NumAxisOptions::default()).unwrap();
    ex.add_panel_keyboxes(
        "ts",
        0.05,
        0.9,
        &[KeyBox::new("Output").with_fill(hatched)],
        &KeyOptions::for_boxes().with_scale(exhibit_rs::exhibit::Scale::Fixed),
    )
    .unwrap();

    ex.add_panel_numeric("cs", GridSpan::cell(1, 0), None, None).unwrap();
    ex.plot_cs_line("cs", &[1.0, 3.0, 2.0], &CsPlotOptions::default(), &LineOptions::default())
        .unwrap();
    ex.format_cs_cataxis("cs", &["A", "B", "C"], &CatAxisOptions::default())
        .unwrap();
    ex.add_panel_shading(
        "cs",
        &[Coord::Numeric(0.0), Coord::Numeric(1.0)],
        &ShadingOptions::default(),
    )
    .unwrap();
    ex.add_panel_arrow(
        "cs",
        [Coord::Numeric(0.0), Coord::Numeric(1.0)],
        [1.5, 2.8],
        &ArrowOptions::default(),
    )
    .unwrap();
    ex.add_exhibit_title("Sample", &Default::default());
    ex
}

#[test]
fn svg_contains_the_drawn_shapes() {
    let svg = sample().to_svg_string().unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<polygon"));
    assert!(svg.contains("<polyline") || svg.contains("<path"));
}

#[test]
fn save_writes_svg_and_png() {
    let dir = tempdir().unwrap();
    let ex = sample();
    let svg = dir.path().join("page.svg");
    ex.save(&svg).unwrap();
    assert!(std::fs::read_to_string(&svg).unwrap().contains("<svg"));
    let png = dir.path().join("page.png");
    ex.save(&png).unwrap();
    assert!(std::fs::metadata(&png).unwrap().len() > 0);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let err = sample().save(dir.path().join("page.pdf")).unwrap_err();
    assert!(matches!(err, ExhibitError::UnsupportedFormat(ref ext) if ext == "pdf"));
}

#[test]
fn label_dates_need_a_format() {
    let mut ex = Exhibit::new(ExhibitConfig::new(1, 1)).unwrap();
    let range = AxisRange::from_coords(
        parse_datetime("2019-01-01").unwrap(),
        parse_datetime("2020-12-31").unwrap(),
    );
    ex.add_panel_ts("ts", range, GridSpan::cell(0, 0), None).unwrap();
    let opts = TsAxisOptions {
        label_dates: vec![parse_datetime("2019-01-01").unwrap()],
        ..Default::default()
    };
    assert!(ex.format_ts_xaxis("ts", &opts).is_err());
}

#[test]
fn empty_page_still_renders() {
    let ex = Exhibit::new(ExhibitConfig::new(1, 1)).unwrap();
    assert!(ex.to_svg_string().unwrap().contains("<svg"));
}
