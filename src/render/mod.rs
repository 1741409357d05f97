//! Rendering an [`Exhibit`] through plotters.
//!
//! Panels keep data-space primitives; ranges are resolved here, once, so
//! autoscaled axes see everything plotted on them. Each primitive is mapped to
//! page pixels, clipped to its panel and drawn with plain plotters elements.

mod adapter;
pub mod geometry;

use std::path::Path;

use log::{debug, warn};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use crate::coords::{Axis, AxisRange};
use crate::error::Result;
use crate::exhibit::{
    AxisState, Exhibit, FillStyle, MarkerStyle, Panel, Primitive, Side, Space, Spines, Stroke,
    TextItem,
};
use crate::fonts::FontSet;
use crate::style::{FontVariant, Rgba, VAlign};

use adapter::{
    backend_err, draw_marker, fill_style, quarter_turns, rgba_color, stroke_style, text_style,
    to_px,
};
use geometry::{
    Px, PixelRect, arrow_head, clip_polygon, clip_polyline, dash_polyline, hatch_segments,
    split_at_gaps,
};

/// Hatch strokes per inch for a single hatch code.
const HATCH_LINES_PER_INCH: f64 = 6.0;
/// Distance between baselines of multi-line text, in font sizes.
const LINE_SPACING: f64 = 1.2;
/// Ticks this far (pixels) outside a panel are still drawn.
const TICK_TOLERANCE: f64 = 0.5;

pub(crate) fn render_svg(exhibit: &Exhibit) -> Result<String> {
    let size = exhibit.config().page_pixels();
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw_exhibit(exhibit, &root, true)?;
        root.present().map_err(backend_err)?;
    }
    Ok(buf)
}

pub(crate) fn render_bitmap(exhibit: &Exhibit, path: &Path) -> Result<()> {
    let size = exhibit.config().page_pixels();
    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw_exhibit(exhibit, &root, false)?;
    root.present().map_err(backend_err)?;
    Ok(())
}

fn draw_exhibit<DB: DrawingBackend>(
    exhibit: &Exhibit,
    root: &DrawingArea<DB, Shift>,
    vector: bool,
) -> Result<()> {
    let config = exhibit.config();
    let (w, h) = config.page_pixels();
    let painter = Painter {
        root,
        fonts: exhibit.fonts(),
        dpi: f64::from(config.dpi),
        page: (f64::from(w), f64::from(h)),
        vector,
    };
    if !vector && FontVariant::ALL.iter().any(|v| !exhibit.fonts().get(*v).loaded) {
        warn!("bitmap output skips text set in a font without a configured file");
    }

    root.fill(&rgba_color(config.background, 1.0))
        .map_err(backend_err)?;

    for panel in exhibit.panels() {
        let (xr, yr) = exhibit.ranges(panel.key())?;
        xr.validate()?;
        yr.validate()?;
        let view = View {
            frame: PixelRect::from_region(panel.region(), painter.page),
            xr,
            yr,
        };
        debug!("drawing panel {} ({} primitives)", panel.key(), panel.primitives().len());
        painter.panel(&view, panel)?;
    }

    for item in exhibit.texts() {
        let at = painter.figure_point(item.x, item.y);
        painter.text(at, item)?;
    }
    Ok(())
}

/// A panel's pixel frame and resolved ranges.
struct View {
    frame: PixelRect,
    xr: AxisRange,
    yr: AxisRange,
}

impl View {
    fn fx(&self, x: f64) -> f64 {
        (x - self.xr.min) / self.xr.width()
    }

    fn fy(&self, y: f64) -> f64 {
        (y - self.yr.min) / self.yr.width()
    }

    fn point(&self, p: (f64, f64)) -> Px {
        self.frame.at_fraction(self.fx(p.0), self.fy(p.1))
    }

    fn x_px(&self, x: f64) -> f64 {
        self.frame.left + self.fx(x) * self.frame.width()
    }

    fn y_px(&self, y: f64) -> f64 {
        self.frame.bottom - self.fy(y) * self.frame.height()
    }
}

struct Painter<'a, DB: DrawingBackend> {
    root: &'a DrawingArea<DB, Shift>,
    fonts: &'a FontSet,
    dpi: f64,
    page: (f64, f64),
    vector: bool,
}

impl<DB: DrawingBackend> Painter<'_, DB> {
    /// Points to pixels.
    fn pt(&self, v: f64) -> f64 {
        v * self.dpi / 72.0
    }

    fn figure_point(&self, x: f64, y: f64) -> Px {
        (x * self.page.0, (1.0 - y) * self.page.1)
    }

    fn panel(&self, view: &View, panel: &Panel) -> Result<()> {
        for primitive in panel.primitives() {
            self.primitive(view, primitive)?;
        }
        self.spines(&view.frame, panel.spines())?;
        self.ticks(view, panel.axis(Axis::X), Axis::X)?;
        self.ticks(view, panel.axis(Axis::Y), Axis::Y)
    }

    fn primitive(&self, view: &View, primitive: &Primitive) -> Result<()> {
        match primitive {
            Primitive::Polyline {
                points,
                stroke,
                marker,
            } => {
                let px: Vec<Px> = points.iter().map(|&p| view.point(p)).collect();
                for run in split_at_gaps(&px) {
                    self.clipped_line(&run, stroke, &view.frame)?;
                }
                if let Some(marker) = marker {
                    self.markers(&px, marker, &view.frame)?;
                }
                Ok(())
            }
            Primitive::Markers { points, marker } => {
                let px: Vec<Px> = points.iter().map(|&p| view.point(p)).collect();
                self.markers(&px, marker, &view.frame)
            }
            Primitive::Bar {
                x0,
                x1,
                y0,
                y1,
                fill,
            } => {
                let (a, b) = (view.point((*x0, *y0)), view.point((*x1, *y1)));
                let rect = PixelRect {
                    left: a.0.min(b.0),
                    top: a.1.min(b.1),
                    right: a.0.max(b.0),
                    bottom: a.1.max(b.1),
                };
                match rect.intersect(&view.frame) {
                    Some(visible) => self.filled(&visible.corners(), fill),
                    None => Ok(()),
                }
            }
            Primitive::Band {
                xs,
                lower,
                upper,
                fill,
            } => {
                let mut polygon: Vec<Px> = xs
                    .iter()
                    .zip(upper)
                    .map(|(&x, &y)| view.point((x, y)))
                    .collect();
                polygon.extend(xs.iter().zip(lower).rev().map(|(&x, &y)| view.point((x, y))));
                if polygon.iter().any(|p| !(p.0.is_finite() && p.1.is_finite())) {
                    warn!("shading with non-finite bounds skipped");
                    return Ok(());
                }
                let clipped = clip_polygon(&polygon, &view.frame);
                if clipped.len() < 3 {
                    return Ok(());
                }
                self.filled(&clipped, fill)
            }
            Primitive::HLine { y, x0, x1, stroke } => {
                let y = view.y_px(*y);
                let from = view.frame.at_fraction(*x0, 0.0).0;
                let to = view.frame.at_fraction(*x1, 0.0).0;
                self.clipped_line(&[(from, y), (to, y)], stroke, &view.frame)
            }
            Primitive::VLine { x, y0, y1, stroke } => {
                let x = view.x_px(*x);
                let from = view.frame.at_fraction(0.0, *y0).1;
                let to = view.frame.at_fraction(0.0, *y1).1;
                self.clipped_line(&[(x, from), (x, to)], stroke, &view.frame)
            }
            Primitive::Arrow {
                from,
                to,
                color,
                head_length,
                head_width,
            } => self.arrow(
                view.point(*from),
                view.point(*to),
                *color,
                self.pt(*head_length),
                self.pt(*head_width),
            ),
            Primitive::Text(item) => {
                let at = match item.space {
                    Space::Data => view.point((item.x, item.y)),
                    Space::Axes => view.frame.at_fraction(item.x, item.y),
                    Space::Figure => self.figure_point(item.x, item.y),
                };
                self.text(at, item)
            }
        }
    }

    fn path(&self, points: &[Px], stroke: &Stroke) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        let style = stroke_style(stroke.color, stroke.alpha, self.pt(stroke.width));
        let pieces = match stroke.dash.pattern() {
            Some(pattern) => {
                let scaled: Vec<f64> = pattern.iter().map(|p| self.pt(p * stroke.width)).collect();
                dash_polyline(points, &scaled)
            }
            None => vec![points.to_vec()],
        };
        for piece in pieces.iter().filter(|p| p.len() >= 2) {
            let px: Vec<(i32, i32)> = piece.iter().map(|&p| to_px(p)).collect();
            self.root
                .draw(&PathElement::new(px, style))
                .map_err(backend_err)?;
        }
        Ok(())
    }

    fn clipped_line(&self, points: &[Px], stroke: &Stroke, frame: &PixelRect) -> Result<()> {
        for run in clip_polyline(points, frame) {
            self.path(&run, stroke)?;
        }
        Ok(())
    }

    fn markers(&self, points: &[Px], marker: &MarkerStyle, frame: &PixelRect) -> Result<()> {
        let style = fill_style(marker.color, marker.alpha);
        let half = (self.pt(marker.size) / 2.0).round().max(1.0) as i32;
        for &p in points
            .iter()
            .filter(|p| p.0.is_finite() && p.1.is_finite() && frame.contains(**p, TICK_TOLERANCE))
        {
            draw_marker(self.root, to_px(p), half, style, marker.shape)?;
        }
        Ok(())
    }

    /// Fill, hatch and outline a polygon that is already clipped.
    fn filled(&self, polygon: &[Px], fill: &FillStyle) -> Result<()> {
        let px: Vec<(i32, i32)> = polygon.iter().map(|&p| to_px(p)).collect();
        self.root
            .draw(&Polygon::new(px, fill_style(fill.face, fill.alpha)))
            .map_err(backend_err)?;

        if let Some(hatch) = fill.hatch {
            let spacing = self.dpi / (HATCH_LINES_PER_INCH * f64::from(hatch.density.max(1)));
            let stroke = Stroke {
                alpha: fill.alpha,
                ..Stroke::solid(fill.edge, 1.0)
            };
            for (a, b) in hatch_segments(polygon, hatch.directions(), spacing) {
                self.path(&[a, b], &stroke)?;
            }
        }

        if fill.edge_width > 0.0 {
            let mut outline = polygon.to_vec();
            outline.push(polygon[0]);
            let stroke = Stroke {
                alpha: fill.alpha,
                ..Stroke::solid(fill.edge, fill.edge_width)
            };
            self.path(&outline, &stroke)?;
        }
        Ok(())
    }

    fn arrow(&self, from: Px, to: Px, color: Rgba, head_length: f64, head_width: f64) -> Result<()> {
        let Some((head, shaft_end)) = arrow_head(from, to, head_length, head_width) else {
            debug!("zero-length arrow skipped");
            return Ok(());
        };
        self.path(&[from, shaft_end], &Stroke::solid(color, 1.0))?;
        let px: Vec<(i32, i32)> = head.iter().map(|&p| to_px(p)).collect();
        self.root
            .draw(&Polygon::new(px, fill_style(color, 1.0)))
            .map_err(backend_err)
    }

    fn spines(&self, frame: &PixelRect, spines: &Spines) -> Result<()> {
        for side in Side::ALL {
            let spine = spines.get(side);
            if !spine.visible {
                continue;
            }
            let (a, b) = match side {
                Side::Left => ((frame.left, frame.top), (frame.left, frame.bottom)),
                Side::Right => ((frame.right, frame.top), (frame.right, frame.bottom)),
                Side::Bottom => ((frame.left, frame.bottom), (frame.right, frame.bottom)),
                Side::Top => ((frame.left, frame.top), (frame.right, frame.top)),
            };
            self.path(&[a, b], &Stroke::solid(spine.color, spine.width))?;
        }
        Ok(())
    }

    /// Inward ticks on every side the axis is marked on.
    fn ticks(&self, view: &View, state: &AxisState, axis: Axis) -> Result<()> {
        let frame = &view.frame;
        for &side in state.tick_sides.iter().filter(|s| s.axis() == axis) {
            for (ticks, style) in [
                (&state.minor_ticks, state.minor_style),
                (&state.major_ticks, state.major_style),
            ] {
                let len = self.pt(style.length);
                let stroke = Stroke::solid(state.tick_color, style.width);
                for &t in ticks {
                    let (a, b) = match side {
                        Side::Bottom => {
                            let x = view.x_px(t);
                            ((x, frame.bottom), (x, frame.bottom - len))
                        }
                        Side::Top => {
                            let x = view.x_px(t);
                            ((x, frame.top), (x, frame.top + len))
                        }
                        Side::Left => {
                            let y = view.y_px(t);
                            ((frame.left, y), (frame.left + len, y))
                        }
                        Side::Right => {
                            let y = view.y_px(t);
                            ((frame.right, y), (frame.right - len, y))
                        }
                    };
                    if frame.contains(a, TICK_TOLERANCE) {
                        self.path(&[a, b], &stroke)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Draw a text item anchored at pixel `at`. Lines stack away from the anchor
    /// according to the vertical alignment.
    fn text(&self, at: Px, item: &TextItem) -> Result<()> {
        if item.text.is_empty() || !(at.0.is_finite() && at.1.is_finite()) {
            return Ok(());
        }
        let handle = self.fonts.get(item.font);
        if !handle.loaded && !self.vector {
            debug!("skipping `{}`: no glyph data for {:?}", item.text, item.font);
            return Ok(());
        }
        let size = self.pt(item.size);
        let turns = quarter_turns(item.rotation);
        // Direction in which following lines go, on screen.
        let down = match turns {
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            3 => (-1.0, 0.0),
            _ => (0.0, 1.0),
        };
        let anchor = (at.0, at.1 - self.pt(item.offset_pt));
        let lines: Vec<&str> = item.text.split('\n').collect();
        let n = lines.len() as f64;
        let gap = size * LINE_SPACING;
        let color = rgba_color(item.color, 1.0);
        for (i, line) in lines.iter().enumerate() {
            let i = i as f64;
            let shift = gap
                * match item.v_align {
                    VAlign::Top => i,
                    VAlign::Center => i - (n - 1.0) / 2.0,
                    VAlign::Bottom => i - (n - 1.0),
                };
            let pos = to_px((anchor.0 + shift * down.0, anchor.1 + shift * down.1));
            let style = text_style(
                &handle.family,
                size,
                color,
                item.h_align,
                item.v_align,
                turns,
            );
            if let Err(e) = self.root.draw(&Text::new(line.to_string(), pos, style)) {
                warn!("could not draw text `{line}`: {e:?}");
            }
        }
        Ok(())
    }
}
