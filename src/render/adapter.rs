//! Helpers turning exhibit styles into plotters styles and elements.
//!
//! Usage inside a draw routine:
//! ```ignore
//!     let style = stroke_style(stroke.color, stroke.alpha, px(stroke.width));
//!     area.draw(&PathElement::new(points, style))?;
//!     draw_marker(&area, (x, y), radius, fill_style(marker.color, marker.alpha), marker.shape)?;
//! ```

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::error::{ExhibitError, Result};
use crate::style::{HAlign, MarkerShape, Rgba, VAlign};

pub fn backend_err<E: std::fmt::Debug>(e: E) -> ExhibitError {
    ExhibitError::Render(format!("{e:?}"))
}

pub fn rgba_color(color: Rgba, alpha: f64) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.alpha() * alpha.clamp(0.0, 1.0))
}

/// Stroke of `width` pixels; plotters widths are whole pixels, never below one.
pub fn stroke_style(color: Rgba, alpha: f64, width: f64) -> ShapeStyle {
    ShapeStyle {
        color: rgba_color(color, alpha),
        filled: false,
        stroke_width: width.round().max(1.0) as u32,
    }
}

pub fn fill_style(color: Rgba, alpha: f64) -> ShapeStyle {
    rgba_color(color, alpha).filled()
}

pub fn to_px(p: (f64, f64)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

/// Draw a marker of half-size `s` pixels centred on `c`.
pub fn draw_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    c: (i32, i32),
    s: i32,
    st: ShapeStyle,
    marker: MarkerShape,
) -> Result<()> {
    let (x, y) = c;
    let line = |from: (i32, i32), to: (i32, i32)| {
        area.draw(&PathElement::new(vec![from, to], st.stroke_width(2)))
            .map_err(backend_err)
    };
    match marker {
        MarkerShape::Circle => area
            .draw(&Circle::new(c, s, st.filled()))
            .map_err(backend_err),
        MarkerShape::Square => area
            .draw(&Rectangle::new([(x - s, y - s), (x + s, y + s)], st.filled()))
            .map_err(backend_err),
        MarkerShape::Triangle => area
            .draw(&Polygon::new(
                vec![(x, y - s), (x - s, y + s), (x + s, y + s)],
                st.filled(),
            ))
            .map_err(backend_err),
        MarkerShape::Diamond => area
            .draw(&Polygon::new(
                vec![(x, y - s), (x - s, y), (x, y + s), (x + s, y)],
                st.filled(),
            ))
            .map_err(backend_err),
        MarkerShape::Cross => {
            line((x - s, y), (x + s, y))?;
            line((x, y - s), (x, y + s))
        }
        MarkerShape::X => {
            line((x - s, y - s), (x + s, y + s))?;
            line((x - s, y + s), (x + s, y - s))
        }
    }
}

/// Rotation snapped to the quarter turns plotters can draw; degrees counter-clockwise.
pub fn quarter_turns(rotation: f64) -> u8 {
    ((rotation / 90.0).round().rem_euclid(4.0)) as u8
}

fn transform(turns: u8) -> FontTransform {
    // plotters rotates clockwise on screen.
    match turns {
        1 => FontTransform::Rotate270,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}

pub fn text_style<'a>(
    family: &'a str,
    size: f64,
    color: RGBAColor,
    h_align: HAlign,
    v_align: VAlign,
    turns: u8,
) -> TextStyle<'a> {
    let h = match h_align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    };
    let v = match v_align {
        VAlign::Bottom => VPos::Bottom,
        VAlign::Center => VPos::Center,
        VAlign::Top => VPos::Top,
    };
    (family, size)
        .into_font()
        .transform(transform(turns))
        .color(&color)
        .pos(Pos::new(h, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_multiplies() {
        let c = rgba_color(Rgba::new(10, 20, 30, 255), 0.5);
        assert_eq!((c.0, c.1, c.2), (10, 20, 30));
        assert!((c.3 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn thin_strokes_stay_visible() {
        assert_eq!(stroke_style(Rgba::BLACK, 1.0, 0.2).stroke_width, 1);
        assert_eq!(stroke_style(Rgba::BLACK, 1.0, 2.6).stroke_width, 3);
    }

    #[test]
    fn rotations_snap_to_quarter_turns() {
        assert_eq!(quarter_turns(0.0), 0);
        assert_eq!(quarter_turns(88.0), 1);
        assert_eq!(quarter_turns(-90.0), 3);
        assert_eq!(quarter_turns(360.0), 0);
    }
}
