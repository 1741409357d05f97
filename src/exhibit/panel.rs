//! Panel identity and per-panel state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::scene::Primitive;
use crate::coords::{Axis, AxisRange};
use crate::partition::Region;
use crate::style::Rgba;

/// Caller-chosen panel identifier, unique within an exhibit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PanelKey {
    Name(String),
    Index(u32),
}

impl fmt::Display for PanelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelKey::Name(s) => f.write_str(s),
            PanelKey::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PanelKey {
    fn from(s: &str) -> Self {
        PanelKey::Name(s.to_string())
    }
}

impl From<String> for PanelKey {
    fn from(s: String) -> Self {
        PanelKey::Name(s)
    }
}

impl From<u32> for PanelKey {
    fn from(i: u32) -> Self {
        PanelKey::Index(i)
    }
}

impl From<&PanelKey> for PanelKey {
    fn from(k: &PanelKey) -> Self {
        k.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelKind {
    TimeSeries,
    Numeric,
    Table,
    /// Overlays another panel and shares its x axis.
    SecondaryY,
    /// Overlays another panel and shares its y axis.
    SecondaryX,
}

/// Edge of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Bottom, Side::Top];

    /// Axis whose ticks sit on this side.
    pub fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Y,
            Side::Bottom | Side::Top => Axis::X,
        }
    }
}

/// Tick mark geometry in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickStyle {
    pub length: f64,
    pub width: f64,
}

impl TickStyle {
    pub const MINOR: TickStyle = TickStyle {
        length: 3.5,
        width: 1.0,
    };
    pub const MAJOR: TickStyle = TickStyle {
        length: 7.0,
        width: 1.3,
    };
}

/// State of one panel axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    /// Explicit limits; `None` autoscales around plotted data.
    pub range: Option<AxisRange>,
    /// Panel that owns this axis when it is shared.
    pub shared_with: Option<PanelKey>,
    /// Bounds of everything plotted against this axis.
    pub extent: Option<(f64, f64)>,
    pub minor_ticks: Vec<f64>,
    pub major_ticks: Vec<f64>,
    pub minor_style: TickStyle,
    pub major_style: TickStyle,
    pub tick_sides: Vec<Side>,
    pub tick_color: Rgba,
}

impl AxisState {
    pub(crate) fn new(range: Option<AxisRange>, tick_sides: Vec<Side>) -> Self {
        Self {
            range,
            shared_with: None,
            extent: None,
            minor_ticks: Vec::new(),
            major_ticks: Vec::new(),
            minor_style: TickStyle::MINOR,
            major_style: TickStyle::MAJOR,
            tick_sides,
            tick_color: Rgba::BLACK,
        }
    }

    pub(crate) fn shared(owner: PanelKey) -> Self {
        Self {
            shared_with: Some(owner),
            ..Self::new(None, Vec::new())
        }
    }

    /// Widen the extent to cover `values`; non-finite values are ignored.
    pub(crate) fn record(&mut self, values: impl IntoIterator<Item = f64>) {
        for v in values.into_iter().filter(|v| v.is_finite()) {
            self.extent = Some(match self.extent {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spine {
    pub visible: bool,
    pub color: Rgba,
    /// Points.
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spines {
    pub left: Spine,
    pub right: Spine,
    pub bottom: Spine,
    pub top: Spine,
}

impl Spines {
    /// All four sides visible except `hidden`.
    pub fn with_hidden(hidden: &[Side], width: f64) -> Self {
        let spine = |side: Side| Spine {
            visible: !hidden.contains(&side),
            color: Rgba::BLACK,
            width,
        };
        Self {
            left: spine(Side::Left),
            right: spine(Side::Right),
            bottom: spine(Side::Bottom),
            top: spine(Side::Top),
        }
    }

    pub fn get(&self, side: Side) -> &Spine {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Top => &self.top,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut Spine {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Top => &mut self.top,
        }
    }
}

/// One chart or table region of an exhibit.
#[derive(Debug, Clone)]
pub struct Panel {
    pub(crate) key: PanelKey,
    pub(crate) kind: PanelKind,
    pub(crate) region: Region,
    pub(crate) x: AxisState,
    pub(crate) y: AxisState,
    pub(crate) spines: Spines,
    pub(crate) primitives: Vec<Primitive>,
}

impl Panel {
    pub fn key(&self) -> &PanelKey {
        &self.key
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// Page-fraction rectangle the panel covers.
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    pub(crate) fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    pub fn spines(&self) -> &Spines {
        &self.spines
    }

    /// Everything drawn on this panel, in call order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub(crate) fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Record plotted points on both axes.
    pub(crate) fn record_points(&mut self, points: &[(f64, f64)]) {
        self.x.record(points.iter().map(|p| p.0));
        self.y.record(points.iter().map(|p| p.1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_display_plainly() {
        assert_eq!(PanelKey::from("gdp").to_string(), "gdp");
        assert_eq!(PanelKey::from(3).to_string(), "3");
    }

    #[test]
    fn extent_skips_missing_values() {
        let mut axis = AxisState::new(None, vec![Side::Left]);
        axis.record([2.0, f64::NAN, -1.0, 5.0]);
        assert_eq!(axis.extent, Some((-1.0, 5.0)));
    }
}
