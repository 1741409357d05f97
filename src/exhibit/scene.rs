//! What a panel has been asked to draw. The façade records primitives; the
//! renderer turns them into backend calls against the final axis ranges.

use serde::{Deserialize, Serialize};

use crate::style::{FontVariant, HAlign, Hatch, LineDash, MarkerShape, Rgba, VAlign};

/// Coordinate space of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Space {
    /// The panel's data coordinates.
    Data,
    /// Fractions of the panel (0..1 on both axes).
    Axes,
    /// Fractions of the page.
    Figure,
}

/// Line appearance. Widths are in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    pub dash: LineDash,
    pub alpha: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            width: 1.0,
            dash: LineDash::Solid,
            alpha: 1.0,
        }
    }
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }
}

/// Marker appearance; `size` is the marker diameter in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub size: f64,
    pub color: Rgba,
    pub alpha: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            size: 5.0,
            color: Rgba::BLACK,
            alpha: 1.0,
        }
    }
}

/// Face, edge and hatch of a filled shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillStyle {
    pub face: Rgba,
    pub edge: Rgba,
    pub edge_width: f64,
    pub hatch: Option<Hatch>,
    /// Applied to face, edge and hatch alike.
    pub alpha: f64,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            face: Rgba::WHITE,
            edge: Rgba::BLACK,
            edge_width: 1.0,
            hatch: None,
            alpha: 1.0,
        }
    }
}

/// A text draw call. `size` is in points; `rotation` in degrees counter-clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub space: Space,
    pub font: FontVariant,
    pub size: f64,
    pub color: Rgba,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub rotation: f64,
    /// Extra upward offset in points.
    pub offset_pt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Connected points in data space; NaN coordinates break the line.
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
        marker: Option<MarkerStyle>,
    },
    Markers {
        points: Vec<(f64, f64)>,
        marker: MarkerStyle,
    },
    /// Data-space rectangle.
    Bar {
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
        fill: FillStyle,
    },
    /// Region between `lower` and `upper` over `xs`, all in data space.
    Band {
        xs: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        fill: FillStyle,
    },
    /// Horizontal line at data `y` spanning panel fractions `x0..x1`.
    HLine { y: f64, x0: f64, x1: f64, stroke: Stroke },
    /// Vertical line at data `x` spanning panel fractions `y0..y1`.
    VLine { x: f64, y0: f64, y1: f64, stroke: Stroke },
    /// Data-space arrow with its head at `to`. Head sizes in points.
    Arrow {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgba,
        head_length: f64,
        head_width: f64,
    },
    Text(TextItem),
}
