//! Text, legends, reference lines, shading and arrows.
//!
//! Positions given with [`Scale::Fixed`] are panel fractions and go through
//! [`fixed_to_data`] against the panel's current ranges; [`Scale::Data`]
//! positions are used as they are (dates resolve to ordinals).

use serde::{Deserialize, Serialize};

use super::scene::{FillStyle, MarkerStyle, Primitive, Space, Stroke, TextItem};
use super::{Exhibit, PanelKey, Scale};
use crate::coords::{AxisRange, Coord, data_to_fixed, fixed_to_data};
use crate::error::{ExhibitError, Result};
use crate::style::{FontVariant, HAlign, Hatch, LineDash, Rgba, VAlign};

/// Free text appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub font: FontVariant,
    pub size: f64,
    pub color: Rgba,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub rotation: f64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            font: FontVariant::Normal,
            size: 10.0,
            color: Rgba::BLACK,
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
            rotation: 0.0,
        }
    }
}

impl TextOptions {
    fn item(&self, text: &str, x: f64, y: f64, space: Space) -> TextItem {
        TextItem {
            text: text.to_string(),
            x,
            y,
            space,
            font: self.font,
            size: self.size,
            color: self.color,
            h_align: self.h_align,
            v_align: self.v_align,
            rotation: self.rotation,
            offset_pt: 0.0,
        }
    }
}

/// Exhibit title, centered `dist_from_top` inches below the page top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleOptions {
    pub dist_from_top: f64,
    pub font: FontVariant,
    pub size: f64,
    pub color: Rgba,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            dist_from_top: 0.8,
            font: FontVariant::Bold,
            size: 14.0,
            color: Rgba::BLACK,
        }
    }
}

/// Exhibit captions; distances in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionOptions {
    pub dist_from_top: f64,
    pub dist_from_side: f64,
    pub font: FontVariant,
    pub size: f64,
    pub color: Rgba,
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self {
            dist_from_top: 0.6,
            dist_from_side: 0.8,
            font: FontVariant::Normal,
            size: 10.0,
            color: Rgba::BLACK,
        }
    }
}

/// Panel title; position in panel fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelTitleOptions {
    pub x: f64,
    pub y: f64,
    pub font: FontVariant,
    pub size: f64,
    pub color: Rgba,
}

impl Default for PanelTitleOptions {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 1.08,
            font: FontVariant::Bold,
            size: 12.0,
            color: Rgba::BLACK,
        }
    }
}

/// Captions above the panel's top corners; `padding` in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelCaptionOptions {
    pub padding: f64,
    pub font: FontVariant,
    pub size: f64,
    pub color: Rgba,
}

impl Default for PanelCaptionOptions {
    fn default() -> Self {
        Self {
            padding: 3.0,
            font: FontVariant::Normal,
            size: 10.0,
            color: Rgba::BLACK,
        }
    }
}

/// Footnotes below a panel. Each note moves down by `y_delta` per line it spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootnoteOptions {
    pub x: f64,
    pub y: f64,
    pub y_delta: f64,
    pub font: FontVariant,
    pub size: f64,
    pub color: Rgba,
}

impl Default for FootnoteOptions {
    fn default() -> Self {
        Self {
            x: 0.01,
            y: -0.07,
            y_delta: -0.058,
            font: FontVariant::Normal,
            size: 9.0,
            color: Rgba::BLACK,
        }
    }
}

/// Legend geometry shared by keylines, keydots and keyboxes.
///
/// `length`, `box_width` and the offsets are fractions of the panel's axis
/// ranges. The three legend kinds have their own defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyOptions {
    pub scale: Scale,
    pub font_size: f64,
    /// Line or box length.
    pub length: f64,
    /// Box height; keyboxes only.
    pub box_width: f64,
    pub text_xoffset: f64,
    pub text_yoffset: f64,
    pub y_delta: f64,
}

impl KeyOptions {
    pub fn for_lines() -> Self {
        Self {
            scale: Scale::Data,
            font_size: 9.0,
            length: 0.08,
            box_width: 0.0,
            text_xoffset: 0.015,
            text_yoffset: -0.019,
            y_delta: -0.06,
        }
    }

    pub fn for_dots() -> Self {
        Self {
            length: 0.0,
            text_xoffset: 0.03,
            ..Self::for_lines()
        }
    }

    pub fn for_boxes() -> Self {
        Self {
            length: 0.05,
            box_width: 0.04,
            text_xoffset: 0.065,
            text_yoffset: -0.018,
            ..Self::for_lines()
        }
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }
}

/// One keyline entry. The label is drawn in the line color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLine {
    pub label: String,
    pub stroke: Stroke,
}

impl KeyLine {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stroke: Stroke::default(),
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }
}

/// One keydot entry. The label is drawn in the marker color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDot {
    pub label: String,
    pub marker: MarkerStyle,
}

impl KeyDot {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            marker: MarkerStyle::default(),
        }
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = marker;
        self
    }
}

/// One keybox entry. The label is always black.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBox {
    pub label: String,
    pub fill: FillStyle,
}

impl KeyBox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fill: FillStyle::default(),
        }
    }

    pub fn with_fill(mut self, fill: FillStyle) -> Self {
        self.fill = fill;
        self
    }
}

/// Horizontal or vertical reference line.
///
/// `start`/`end` bound the line along its length: data coordinates with
/// [`Scale::Data`] (default: the axis limits), panel fractions with
/// [`Scale::Fixed`] (default: 0 and 1). `width` defaults to 1.3 pt for
/// horizontal and 1 pt for vertical lines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RefLineOptions {
    pub start: Option<Coord>,
    pub end: Option<Coord>,
    pub scale: Scale,
    pub color: Rgba,
    pub dash: LineDash,
    pub width: Option<f64>,
    pub alpha: Option<f64>,
}

/// Shaded band over an x interval. `y_low`/`y_high` hold one value for the
/// whole band or one per x position; they default to the panel's bottom and
/// top. `edge` defaults to `face`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingOptions {
    pub y_low: Option<Vec<f64>>,
    pub y_high: Option<Vec<f64>>,
    pub scale: Scale,
    pub face: Rgba,
    pub edge: Option<Rgba>,
    pub edge_width: f64,
    pub hatch: Option<Hatch>,
    pub alpha: f64,
}

impl Default for ShadingOptions {
    fn default() -> Self {
        Self {
            y_low: None,
            y_high: None,
            scale: Scale::Data,
            face: Rgba::DODGER_BLUE,
            edge: None,
            edge_width: 1.0,
            hatch: None,
            alpha: 0.3,
        }
    }
}

/// Arrow heads are sized in units of 10 pt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowOptions {
    pub scale: Scale,
    pub color: Rgba,
    pub head_length: f64,
    pub head_width: f64,
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self {
            scale: Scale::Data,
            color: Rgba::BLACK,
            head_length: 0.5,
            head_width: 0.35,
        }
    }
}

/// Arrow head unit in points.
const ARROW_UNIT_PT: f64 = 10.0;

fn to_data(coord: Coord, scale: Scale, range: AxisRange) -> Result<f64> {
    match scale {
        Scale::Data => Ok(coord.to_num()),
        Scale::Fixed => fixed_to_data(coord.to_num(), range),
    }
}

/// Repeat a single bound across `n` positions, or check it has `n` entries.
fn broadcast(bound: Vec<f64>, n: usize, what: &str) -> Result<Vec<f64>> {
    match bound.len() {
        1 => Ok(vec![bound[0]; n]),
        len if len == n => Ok(bound),
        len => Err(ExhibitError::InvalidArgument(format!(
            "{what} needs 1 or {n} values, got {len}"
        ))),
    }
}

impl Exhibit {
    /// Centered title `dist_from_top` inches below the top of the page.
    pub fn add_exhibit_title(&mut self, text: &str, opts: &TitleOptions) {
        let (_, h) = self.config().page_inches();
        let style = TextOptions {
            font: opts.font,
            size: opts.size,
            color: opts.color,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            rotation: 0.0,
        };
        let y = (h - opts.dist_from_top) / h;
        self.push_text(style.item(text, 0.5, y, Space::Figure));
    }

    /// Captions in the top-left and top-right corners of the page.
    pub fn add_exhibit_captions(
        &mut self,
        left: Option<&str>,
        right: Option<&str>,
        opts: &CaptionOptions,
    ) {
        let (w, h) = self.config().page_inches();
        let y = (h - opts.dist_from_top) / h;
        let style = |h_align| TextOptions {
            font: opts.font,
            size: opts.size,
            color: opts.color,
            h_align,
            v_align: VAlign::Bottom,
            rotation: 0.0,
        };
        if let Some(text) = left {
            let item = style(HAlign::Left).item(text, opts.dist_from_side / w, y, Space::Figure);
            self.push_text(item);
        }
        if let Some(text) = right {
            let x = (w - opts.dist_from_side) / w;
            self.push_text(style(HAlign::Right).item(text, x, y, Space::Figure));
        }
    }

    /// Text at page fractions `(x, y)`.
    pub fn add_exhibit_text(&mut self, x: f64, y: f64, text: &str, opts: &TextOptions) {
        self.push_text(opts.item(text, x, y, Space::Figure));
    }

    pub fn add_panel_title(
        &mut self,
        key: impl Into<PanelKey>,
        text: &str,
        opts: &PanelTitleOptions,
    ) -> Result<()> {
        let style = TextOptions {
            font: opts.font,
            size: opts.size,
            color: opts.color,
            ..TextOptions::default()
        };
        let item = style.item(text, opts.x, opts.y, Space::Axes);
        self.panel_mut(&key.into())?.push(Primitive::Text(item));
        Ok(())
    }

    /// Captions sitting `padding` points above the panel's top-left and top-right corners.
    pub fn add_panel_captions(
        &mut self,
        key: impl Into<PanelKey>,
        left: Option<&str>,
        right: Option<&str>,
        opts: &PanelCaptionOptions,
    ) -> Result<()> {
        let panel = self.panel_mut(&key.into())?;
        let style = |h_align| TextOptions {
            font: opts.font,
            size: opts.size,
            color: opts.color,
            h_align,
            v_align: VAlign::Bottom,
            rotation: 0.0,
        };
        for (text, h_align, x) in [(left, HAlign::Left, 0.0), (right, HAlign::Right, 1.0)] {
            if let Some(text) = text {
                let mut item = style(h_align).item(text, x, 1.0, Space::Axes);
                item.offset_pt = opts.padding;
                panel.push(Primitive::Text(item));
            }
        }
        Ok(())
    }

    /// Notes stacked below the panel, top-aligned.
    pub fn add_panel_footnotes<S: AsRef<str>>(
        &mut self,
        key: impl Into<PanelKey>,
        notes: &[S],
        opts: &FootnoteOptions,
    ) -> Result<()> {
        let panel = self.panel_mut(&key.into())?;
        let style = TextOptions {
            font: opts.font,
            size: opts.size,
            color: opts.color,
            v_align: VAlign::Top,
            ..TextOptions::default()
        };
        let mut y = opts.y;
        for note in notes {
            let note = note.as_ref();
            panel.push(Primitive::Text(style.item(note, opts.x, y, Space::Axes)));
            y += opts.y_delta * (note.matches('\n').count() + 1) as f64;
        }
        Ok(())
    }

    /// Text at `(x, y)` in data coordinates or panel fractions.
    pub fn add_panel_text(
        &mut self,
        key: impl Into<PanelKey>,
        x: impl Into<Coord>,
        y: f64,
        text: &str,
        scale: Scale,
        opts: &TextOptions,
    ) -> Result<()> {
        let key = key.into();
        let (xr, yr) = self.ranges(&key)?;
        let x = to_data(x.into(), scale, xr)?;
        let y = to_data(Coord::Numeric(y), scale, yr)?;
        let item = opts.item(text, x, y, Space::Data);
        self.panel_mut(&key)?.push(Primitive::Text(item));
        Ok(())
    }

    /// Line legend starting at `(x, y)`; entries stack downward.
    pub fn add_panel_keylines(
        &mut self,
        key: impl Into<PanelKey>,
        x: impl Into<Coord>,
        y: f64,
        entries: &[KeyLine],
        opts: &KeyOptions,
    ) -> Result<()> {
        let key = key.into();
        let (xr, yr) = self.ranges(&key)?;
        let x = to_data(x.into(), opts.scale, xr)?;
        let mut y = to_data(Coord::Numeric(y), opts.scale, yr)?;
        let x0 = data_to_fixed(x, xr)?;
        let panel = self.panel_mut(&key)?;
        for entry in entries {
            panel.push(Primitive::HLine {
                y,
                x0,
                x1: x0 + opts.length,
                stroke: entry.stroke,
            });
            let style = TextOptions {
                size: opts.font_size,
                color: entry.stroke.color,
                ..TextOptions::default()
            };
            panel.push(Primitive::Text(style.item(
                &entry.label,
                x + (opts.length + opts.text_xoffset) * xr.width(),
                y + opts.text_yoffset * yr.width(),
                Space::Data,
            )));
            y += opts.y_delta * yr.width();
        }
        Ok(())
    }

    /// Marker legend starting at `(x, y)`; entries stack downward.
    pub fn add_panel_keydots(
        &mut self,
        key: impl Into<PanelKey>,
        x: impl Into<Coord>,
        y: f64,
        entries: &[KeyDot],
        opts: &KeyOptions,
    ) -> Result<()> {
        let key = key.into();
        let (xr, yr) = self.ranges(&key)?;
        let x = to_data(x.into(), opts.scale, xr)?;
        let mut y = to_data(Coord::Numeric(y), opts.scale, yr)?;
        let panel = self.panel_mut(&key)?;
        for entry in entries {
            panel.push(Primitive::Markers {
                points: vec![(x, y)],
                marker: entry.marker,
            });
            let style = TextOptions {
                size: opts.font_size,
                color: entry.marker.color,
                ..TextOptions::default()
            };
            panel.push(Primitive::Text(style.item(
                &entry.label,
                x + opts.text_xoffset * xr.width(),
                y + opts.text_yoffset * yr.width(),
                Space::Data,
            )));
            y += opts.y_delta * yr.width();
        }
        Ok(())
    }

    /// Filled-box legend starting at `(x, y)`; each box is vertically centered on its row.
    pub fn add_panel_keyboxes(
        &mut self,
        key: impl Into<PanelKey>,
        x: impl Into<Coord>,
        y: f64,
        entries: &[KeyBox],
        opts: &KeyOptions,
    ) -> Result<()> {
        let key = key.into();
        let (xr, yr) = self.ranges(&key)?;
        let x = to_data(x.into(), opts.scale, xr)?;
        let mut y = to_data(Coord::Numeric(y), opts.scale, yr)?;
        let half = opts.box_width / 2.0 * yr.width();
        let panel = self.panel_mut(&key)?;
        for entry in entries {
            panel.push(Primitive::Band {
                xs: vec![x, x + opts.length * xr.width()],
                lower: vec![y - half; 2],
                upper: vec![y + half; 2],
                fill: entry.fill,
            });
            let style = TextOptions {
                size: opts.font_size,
                ..TextOptions::default()
            };
            panel.push(Primitive::Text(style.item(
                &entry.label,
                x + opts.text_xoffset * xr.width(),
                y + opts.text_yoffset * yr.width(),
                Space::Data,
            )));
            y += opts.y_delta * yr.width();
        }
        Ok(())
    }

    /// Horizontal line at height `y`.
    pub fn add_panel_hline(
        &mut self,
        key: impl Into<PanelKey>,
        y: f64,
        opts: &RefLineOptions,
    ) -> Result<()> {
        let key = key.into();
        let (xr, yr) = self.ranges(&key)?;
        let (y, x0, x1) = match opts.scale {
            Scale::Data => (
                y,
                data_to_fixed(opts.start.unwrap_or(Coord::Numeric(xr.min)), xr)?,
                data_to_fixed(opts.end.unwrap_or(Coord::Numeric(xr.max)), xr)?,
            ),
            Scale::Fixed => (
                fixed_to_data(y, yr)?,
                opts.start.map_or(0.0, Coord::to_num),
                opts.end.map_or(1.0, Coord::to_num),
            ),
        };
        let stroke = ref_stroke(opts, 1.3);
        self.panel_mut(&key)?
            .push(Primitive::HLine { y, x0, x1, stroke });
        Ok(())
    }

    /// Vertical line at `x`.
    pub fn add_panel_vline(
        &mut self,
        key: impl Into<PanelKey>,
        x: impl Into<Coord>,
        opts: &RefLineOptions,
    ) -> Result<()> {
        let key = key.into();
        let x: Coord = x.into();
        let (xr, yr) = self.ranges(&key)?;
        let (x, y0, y1) = match opts.scale {
            Scale::Data => (
                x.to_num(),
                data_to_fixed(opts.start.unwrap_or(Coord::Numeric(yr.min)), yr)?,
                data_to_fixed(opts.end.unwrap_or(Coord::Numeric(yr.max)), yr)?,
            ),
            Scale::Fixed => (
                fixed_to_data(x.to_num(), xr)?,
                opts.start.map_or(0.0, Coord::to_num),
                opts.end.map_or(1.0, Coord::to_num),
            ),
        };
        let stroke = ref_stroke(opts, 1.0);
        self.panel_mut(&key)?
            .push(Primitive::VLine { x, y0, y1, stroke });
        Ok(())
    }

    /// Shade the band over `x_range` (two or more positions).
    pub fn add_panel_shading(
        &mut self,
        key: impl Into<PanelKey>,
        x_range: &[Coord],
        opts: &ShadingOptions,
    ) -> Result<()> {
        if x_range.len() < 2 {
            return Err(ExhibitError::InvalidArgument(format!(
                "shading needs at least 2 x positions, got {}",
                x_range.len()
            )));
        }
        let key = key.into();
        let (xr, yr) = self.ranges(&key)?;
        let n = x_range.len();
        let xs = x_range
            .iter()
            .map(|&x| to_data(x, opts.scale, xr))
            .collect::<Result<Vec<_>>>()?;
        let bound = |given: &Option<Vec<f64>>, default: f64, what: &str| -> Result<Vec<f64>> {
            let values = match (given, opts.scale) {
                (Some(v), Scale::Data) => v.clone(),
                (Some(v), Scale::Fixed) => v
                    .iter()
                    .map(|&y| fixed_to_data(y, yr))
                    .collect::<Result<_>>()?,
                (None, _) => vec![fixed_to_data(default, yr)?],
            };
            broadcast(values, n, what)
        };
        let lower = bound(&opts.y_low, 0.0, "y_low")?;
        let upper = bound(&opts.y_high, 1.0, "y_high")?;
        let fill = FillStyle {
            face: opts.face,
            edge: opts.edge.unwrap_or(opts.face),
            edge_width: opts.edge_width,
            hatch: opts.hatch,
            alpha: opts.alpha,
        };
        self.panel_mut(&key)?.push(Primitive::Band {
            xs,
            lower,
            upper,
            fill,
        });
        Ok(())
    }

    /// Arrow from `(x[0], y[0])` to `(x[1], y[1])` with its head at the second point.
    pub fn add_panel_arrow(
        &mut self,
        key: impl Into<PanelKey>,
        x: [Coord; 2],
        y: [f64; 2],
        opts: &ArrowOptions,
    ) -> Result<()> {
        let key = key.into();
        let (xr, yr) = self.ranges(&key)?;
        let point = |i: usize| -> Result<(f64, f64)> {
            Ok((
                to_data(x[i], opts.scale, xr)?,
                to_data(Coord::Numeric(y[i]), opts.scale, yr)?,
            ))
        };
        let (from, to) = (point(0)?, point(1)?);
        self.panel_mut(&key)?.push(Primitive::Arrow {
            from,
            to,
            color: opts.color,
            head_length: opts.head_length * ARROW_UNIT_PT,
            head_width: opts.head_width * ARROW_UNIT_PT,
        });
        Ok(())
    }
}

fn ref_stroke(opts: &RefLineOptions, default_width: f64) -> Stroke {
    Stroke {
        color: opts.color,
        width: opts.width.unwrap_or(default_width),
        dash: opts.dash,
        alpha: opts.alpha.unwrap_or(1.0),
    }
}
