use exhibit_rs::coords::parse_datetime;
use exhibit_rs::partition::{Region, form_partition};
use exhibit_rs::storage;
use exhibit_rs::{ExhibitConfig, TimeSeries};
use std::fs;
use tempfile::tempdir;

#[test]
fn series_csv_round_trip_keeps_gaps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("s.csv");
    let dates = ["2020-01-31", "2020-02-29", "2020-03-31"]
        .iter()
        .map(|d| parse_datetime(d).unwrap())
        .collect();
    let s = TimeSeries::new(dates, vec![1.5, f64::NAN, -2.0]).unwrap();
    storage::save_series_csv(&s, &path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "date,value\n2020-01-31,1.5\n2020-02-29,\n2020-03-31,-2\n"
    );
    let back = storage::load_series_csv(&path).unwrap();
    assert_eq!(back.instants(), s.instants());
    assert!(back.values()[1].is_nan());
    assert_eq!(back.values()[2], -2.0);
}

#[test]
fn unparseable_dates_fail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "date,value\nlast tuesday,1\n").unwrap();
    assert!(storage::load_series_csv(&path).is_err());
}

#[test]
fn partitions_save_as_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("p.json");
    let p = form_partition(Region::unit(), 2, 2, None, None).unwrap();
    storage::save_json(&p, &path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["cols"], serde_json::json!([0.0, 0.5, 1.0]));
}

#[test]
fn config_json_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("page.json");
    fs::write(&path, r#"{ "rows": 3, "cols": 2, "dpi": 150 }"#).unwrap();
    let cfg = ExhibitConfig::from_json_file(&path).unwrap();
    assert_eq!((cfg.rows, cfg.cols, cfg.dpi), (3, 2, 150));
    assert_eq!(cfg.h_space, ExhibitConfig::default().h_space);

    fs::write(&path, r#"{ "rows": 0 }"#).unwrap();
    assert!(ExhibitConfig::from_json_file(&path).is_err());
}
