use crate::coords::parse_datetime;
use crate::error::{ExhibitError, Result};
use crate::series::TimeSeries;
use chrono::{NaiveDateTime, Timelike};
use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Load a series from a CSV file with `date,value` columns and a header row.
/// An empty value is a missing observation (NaN).
pub fn load_series_csv<P: AsRef<Path>>(path: P) -> Result<TimeSeries> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let date = record.get(0).ok_or_else(|| {
            ExhibitError::InvalidArgument(format!("{}:{line}: missing date", path.display()))
        })?;
        dates.push(parse_datetime(date)?);
        let value = match record.get(1).unwrap_or("") {
            "" => f64::NAN,
            v => v.parse::<f64>().map_err(|_| {
                ExhibitError::InvalidArgument(format!(
                    "{}:{line}: `{v}` is not a number",
                    path.display()
                ))
            })?,
        };
        values.push(value);
    }
    debug!("loaded {} observations from {}", dates.len(), path.display());
    TimeSeries::new(dates, values)
}

fn format_instant(t: NaiveDateTime) -> String {
    if t.num_seconds_from_midnight() == 0 {
        t.format("%Y-%m-%d").to_string()
    } else {
        t.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Save a series as `date,value` CSV; missing values are written empty.
pub fn save_series_csv<P: AsRef<Path>>(series: &TimeSeries, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["date", "value"])?;
    for (t, v) in series.iter() {
        let value = if v.is_nan() { String::new() } else { v.to_string() };
        wtr.write_record([format_instant(t), value])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable value (layouts, centered series, configs) as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
