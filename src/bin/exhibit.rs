use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use exhibit_rs::centering::center_ts_obs;
use exhibit_rs::coords::{Axis, AxisRange, parse_datetime};
use exhibit_rs::exhibit::{
    BarOptions, CatAxisOptions, Exhibit, ExhibitConfig, FillStyle, FootnoteOptions, GridSpan,
    KeyBox, KeyLine, KeyOptions, LineOptions, NumAxisOptions, PanelTitleOptions, RefLineOptions,
    Scale, Stroke, TextOptions, TitleOptions, TsAxisOptions, TsPlotOptions,
};
use exhibit_rs::frequency::Frequency;
use exhibit_rs::partition::{Region, form_partition};
use exhibit_rs::series::{Period, TimeSeries};
use exhibit_rs::stack::StackLayout;
use exhibit_rs::style::{HAlign, Hatch, LineDash, Rgba, VAlign};
use exhibit_rs::ticks::{LabelCentering, PeriodUnit, format_month_irregular, generate_range};
use exhibit_rs::{merge, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "exhibit",
    version,
    about = "Lay out chart pages and inspect the geometry behind them"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a region into weighted rows and columns and print the boundaries as JSON.
    Partition(PartitionArgs),
    /// Print the dates of a tick range, one per line.
    Ticks(TicksArgs),
    /// Shift a `date,value` CSV series to where its bars or points are drawn.
    Center(CenterArgs),
    /// Concatenate PostScript pages into one file.
    Merge(MergeArgs),
    /// Render a sample multi-panel page.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct PartitionArgs {
    #[arg(long, default_value_t = 1)]
    rows: usize,
    #[arg(long, default_value_t = 1)]
    cols: usize,
    /// Row weights separated by comma (top to bottom).
    #[arg(long)]
    row_weights: Option<String>,
    /// Column weights separated by comma (left to right).
    #[arg(long)]
    col_weights: Option<String>,
    /// Region as left,right,bottom,top (default: the unit square).
    #[arg(long)]
    region: Option<String>,
    /// Write the JSON to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TicksArgs {
    /// First date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS).
    #[arg(long)]
    start: String,
    #[arg(long)]
    end: String,
    /// Unit shorthand: s, min, h, d, b, w, m, q, a.
    #[arg(long, default_value = "m")]
    unit: String,
    #[arg(long, default_value_t = 1)]
    skip: u32,
    /// strftime-style output format.
    #[arg(long, default_value = "%Y-%m-%d")]
    format: String,
    /// Print irregular month abbreviations instead of `--format`.
    #[arg(long, default_value_t = false)]
    irregular_month: bool,
}

#[derive(Args, Debug)]
struct CenterArgs {
    /// Input CSV with `date,value` columns.
    input: PathBuf,
    /// Frequency shorthand (e.g. m, q, a); inferred from the dates when omitted.
    #[arg(long)]
    freq: Option<String>,
    #[arg(long, default_value_t = 1)]
    stacks: u32,
    #[arg(long, default_value_t = 1)]
    stack: u32,
    #[arg(long, default_value_t = 1.0)]
    width_coef: f64,
    /// Extra shift in days.
    #[arg(long, default_value_t = 0.0)]
    adjust: f64,
    /// Output CSV (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Combined output file.
    #[arg(short, long)]
    out: PathBuf,
    /// Pages, in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Output path (.svg, .png, .jpg, .jpeg or .bmp).
    #[arg(long, default_value = "exhibit.svg")]
    out: PathBuf,
    /// JSON page configuration; fields left out keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_weights(s: &str) -> Result<Vec<f64>> {
    s.split([',', ';'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| x.parse::<f64>().with_context(|| format!("invalid weight `{x}`")))
        .collect()
}

fn parse_region(s: &str) -> Result<Region> {
    let v = parse_weights(s)?;
    match v.as_slice() {
        [l, r, b, t] => Ok(Region::new(*l, *r, *b, *t)),
        _ => anyhow::bail!("--region expects left,right,bottom,top"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Partition(args) => cmd_partition(args),
        Command::Ticks(args) => cmd_ticks(args),
        Command::Center(args) => cmd_center(args),
        Command::Merge(args) => cmd_merge(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn cmd_partition(args: PartitionArgs) -> Result<()> {
    let region = match &args.region {
        Some(s) => parse_region(s)?,
        None => Region::unit(),
    };
    let row_weights = args.row_weights.as_deref().map(parse_weights).transpose()?;
    let col_weights = args.col_weights.as_deref().map(parse_weights).transpose()?;
    let partition = form_partition(
        region,
        args.rows,
        args.cols,
        row_weights.as_deref(),
        col_weights.as_deref(),
    )?;
    match &args.out {
        Some(path) => {
            storage::save_json(&partition, path)?;
            eprintln!("Wrote partition to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&partition)?),
    }
    Ok(())
}

fn cmd_ticks(args: TicksArgs) -> Result<()> {
    let start = parse_datetime(&args.start)?;
    let end = parse_datetime(&args.end)?;
    let unit: PeriodUnit = args.unit.parse()?;
    let range = generate_range(start, end, unit, args.skip)?;
    for t in range.iter() {
        if args.irregular_month {
            println!("{}", format_month_irregular(t));
        } else {
            println!("{}", format_checked(t, &args.format)?);
        }
    }
    Ok(())
}

fn format_checked(t: NaiveDateTime, fmt: &str) -> Result<String> {
    use std::fmt::Write;
    let mut s = String::new();
    write!(s, "{}", t.format(fmt)).map_err(|_| anyhow::anyhow!("invalid --format `{fmt}`"))?;
    Ok(s)
}

fn cmd_center(args: CenterArgs) -> Result<()> {
    let series = storage::load_series_csv(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let freq = args
        .freq
        .as_deref()
        .map(str::parse::<Frequency>)
        .transpose()?;
    let layout = StackLayout {
        number_stacks: args.stacks,
        current_stack: args.stack,
        width_coef: args.width_coef,
        position_adjustment: args.adjust,
    };
    let centered = center_ts_obs(&series, freq, &layout)?;
    match &args.out {
        Some(path) => {
            storage::save_series_csv(&centered, path)?;
            eprintln!("Saved {} rows to {}", centered.len(), path.display());
        }
        None => {
            println!("date,value");
            for (t, v) in centered.iter() {
                let v = if v.is_nan() { String::new() } else { v.to_string() };
                println!("{},{v}", t.format("%Y-%m-%dT%H:%M:%S"));
            }
        }
    }
    Ok(())
}

fn cmd_merge(args: MergeArgs) -> Result<()> {
    merge::concat_ps(&args.inputs, &args.out)?;
    eprintln!("Merged {} pages into {}", args.inputs.len(), args.out.display());
    Ok(())
}

/// Quarterly sample data: a smooth cycle plus a trend.
fn sample_quarters(phase: f64, scale: f64) -> Result<TimeSeries> {
    let mut periods = Vec::new();
    let mut values = Vec::new();
    for year in 2016..=2020 {
        for q in 1..=4 {
            let i = f64::from((year - 2016) * 4 + q as i32);
            periods.push(Period::quarter(year, q)?);
            values.push(scale * ((i / 2.0 + phase).sin() + 0.05 * i));
        }
    }
    Ok(TimeSeries::from_periods(periods, values)?)
}

fn cmd_demo(args: DemoArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExhibitConfig::from_json_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => ExhibitConfig::new(2, 2),
    };
    if config.rows < 2 || config.cols < 2 {
        config.rows = 2;
        config.cols = 2;
    }
    let mut ex = Exhibit::new(config)?;
    ex.add_exhibit_title("Sample exhibit", &TitleOptions::default());

    // Stacked quarterly bars with a total line.
    let a = sample_quarters(0.0, 1.0)?;
    let b = sample_quarters(1.3, 0.6)?;
    let total = TimeSeries::from_periods(
        (2016..=2020)
            .flat_map(|y| (1..=4).map(move |q| (y, q)))
            .map(|(y, q)| Period::quarter(y, q))
            .collect::<exhibit_rs::error::Result<Vec<_>>>()?,
        a.values().iter().zip(b.values()).map(|(x, y)| x + y).collect(),
    )?;
    let start = parse_datetime("2016-01-01")?;
    let end = parse_datetime("2020-12-31")?;
    ex.add_panel_ts("bars", AxisRange::from_coords(start, end), GridSpan::cell(0, 0), None)?;
    let bars = BarOptions {
        styles: vec![
            FillStyle {
                face: Rgba::DODGER_BLUE,
                ..FillStyle::default()
            },
            FillStyle {
                hatch: Hatch::parse("//")?,
                ..FillStyle::default()
            },
        ],
        ..BarOptions::default()
    };
    ex.plot_ts_barstack("bars", &[a, b], &bars)?;
    ex.plot_ts_line("bars", &total, &TsPlotOptions::default(), &LineOptions::default())?;
    ex.add_panel_hline("bars", 0.0, &RefLineOptions::default())?;
    let years: Vec<NaiveDateTime> = generate_range(start, end, PeriodUnit::Year, 1)?
        .iter()
        .collect();
    ex.format_ts_xaxis(
        "bars",
        &TsAxisOptions {
            mark_years: true,
            label_dates: years,
            label_format: Some("%Y".into()),
            centering: LabelCentering::Midpoint,
            ..TsAxisOptions::default()
        },
    )?;
    ex.format_numaxis("bars", Axis::Y, &NumAxisOptions::default())?;
    ex.add_panel_title("bars", "Quarterly components", &PanelTitleOptions::default())?;
    ex.add_panel_keyboxes(
        "bars",
        0.05,
        0.95,
        &[
            KeyBox::new("Component A").with_fill(bars.styles[0]),
            KeyBox::new("Component B").with_fill(bars.styles[1]),
        ],
        &KeyOptions::for_boxes().with_scale(Scale::Fixed),
    )?;
    ex.add_panel_footnotes("bars", &["Source: synthetic data."], &FootnoteOptions::default())?;

    // Category bars.
    ex.add_panel_numeric("regions", GridSpan::cell(0, 1), None, None)?;
    ex.plot_cs_barstack(
        "regions",
        &[vec![3.0, 1.5, 2.2, 4.1]],
        &BarOptions::default(),
    )?;
    ex.format_cs_cataxis(
        "regions",
        &["North", "South", "East", "West"],
        &CatAxisOptions::default(),
    )?;
    ex.format_numaxis("regions", Axis::Y, &NumAxisOptions::default())?;
    ex.add_panel_title("regions", "By region", &PanelTitleOptions::default())?;

    // A numeric curve.
    ex.add_panel_numeric("curve", GridSpan::cell(1, 0), None, None)?;
    let xs: Vec<f64> = (0..=40).map(|i| f64::from(i) / 4.0).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (x / 2.0).cos() * 2.0).collect();
    ex.plot_num_line(
        "curve",
        &xs,
        &ys,
        &LineOptions {
            color: Rgba::rgb(178, 34, 34),
            dash: LineDash::Dash,
            width: 1.5,
            ..LineOptions::default()
        },
    )?;
    ex.format_numaxis("curve", Axis::X, &NumAxisOptions::default())?;
    ex.format_numaxis("curve", Axis::Y, &NumAxisOptions::default())?;
    ex.add_panel_keylines(
        "curve",
        0.6,
        0.9,
        &[KeyLine::new("Cosine").with_stroke(Stroke {
            color: Rgba::rgb(178, 34, 34),
            dash: LineDash::Dash,
            width: 1.5,
            alpha: 1.0,
        })],
        &KeyOptions::for_lines().with_scale(Scale::Fixed),
    )?;

    // A table laid out with the partitioner.
    ex.add_panel_table("table", GridSpan::cell(1, 1))?;
    let rows = [["", "2019", "2020"], ["A", "1.2", "0.8"], ["B", "0.4", "0.9"]];
    let grid = form_partition(Region::unit(), rows.len(), 3, None, Some(&[2.0, 1.0, 1.0][..]))?;
    for (r, cells) in rows.iter().enumerate() {
        for (c, text) in cells.iter().enumerate() {
            let (Some(x), Some(y)) = (grid.col_center(c), grid.row_center(r)) else {
                continue;
            };
            ex.add_panel_text(
                "table",
                x,
                y,
                text,
                Scale::Fixed,
                &TextOptions {
                    h_align: HAlign::Center,
                    v_align: VAlign::Center,
                    ..TextOptions::default()
                },
            )?;
        }
    }

    ex.save(&args.out)?;
    eprintln!("Wrote exhibit to {}", args.out.display());
    Ok(())
}
