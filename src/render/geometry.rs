//! Pixel-space geometry: frames, clipping, dash patterns, hatching and arrow heads.
//!
//! Pixel coordinates have their origin at the top-left corner with y growing
//! downward, as the plotters backends expect.

use crate::partition::Region;

pub type Px = (f64, f64);

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    /// Pixel rectangle of a page-fraction region on a `page` pixels page.
    pub fn from_region(region: Region, page: (f64, f64)) -> Self {
        Self {
            left: region.left * page.0,
            top: (1.0 - region.top) * page.1,
            right: region.right * page.0,
            bottom: (1.0 - region.bottom) * page.1,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Pixel position of panel fractions `(fx, fy)`, `fy` measured upward.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Px {
        (
            self.left + fx * self.width(),
            self.bottom - fy * self.height(),
        )
    }

    pub fn contains(&self, p: Px, tolerance: f64) -> bool {
        p.0 >= self.left - tolerance
            && p.0 <= self.right + tolerance
            && p.1 >= self.top - tolerance
            && p.1 <= self.bottom + tolerance
    }

    pub fn corners(&self) -> Vec<Px> {
        vec![
            (self.left, self.top),
            (self.right, self.top),
            (self.right, self.bottom),
            (self.left, self.bottom),
        ]
    }

    /// Overlap of two rectangles.
    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let r = PixelRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (r.left <= r.right && r.top <= r.bottom).then_some(r)
    }
}

fn lerp(a: Px, b: Px, t: f64) -> Px {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

fn dist(a: Px, b: Px) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Runs of consecutive finite points; non-finite points break the line.
pub fn split_at_gaps(points: &[Px]) -> Vec<Vec<Px>> {
    points
        .split(|p| !(p.0.is_finite() && p.1.is_finite()))
        .filter(|run| !run.is_empty())
        .map(<[Px]>::to_vec)
        .collect()
}

/// Liang–Barsky segment clipping.
pub fn clip_segment(a: Px, b: Px, rect: &PixelRect) -> Option<(Px, Px)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.0 - rect.left),
        (dx, rect.right - a.0),
        (-dy, a.1 - rect.top),
        (dy, rect.bottom - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((lerp(a, b, t0), lerp(a, b, t1)))
}

/// Clip a polyline to `rect`, splitting it where it leaves the rectangle.
pub fn clip_polyline(points: &[Px], rect: &PixelRect) -> Vec<Vec<Px>> {
    let mut runs: Vec<Vec<Px>> = Vec::new();
    if points.len() == 1 {
        if rect.contains(points[0], 0.0) {
            runs.push(points.to_vec());
        }
        return runs;
    }
    for w in points.windows(2) {
        let Some((p, q)) = clip_segment(w[0], w[1], rect) else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if run.last() == Some(&p) => run.push(q),
            _ => runs.push(vec![p, q]),
        }
    }
    runs
}

/// Cut a polyline into the "on" pieces of a repeating dash `pattern` (pixel lengths).
pub fn dash_polyline(points: &[Px], pattern: &[f64]) -> Vec<Vec<Px>> {
    if points.len() < 2 || !pattern.iter().any(|&p| p > 0.0) {
        return vec![points.to_vec()];
    }
    let mut out = Vec::new();
    let mut idx = 0;
    let mut remaining = pattern[0];
    let mut on = true;
    let mut current = vec![points[0]];
    for w in points.windows(2) {
        let (mut a, b) = (w[0], w[1]);
        let mut left = dist(a, b);
        while left > remaining {
            let p = lerp(a, b, remaining / left);
            if on {
                current.push(p);
                out.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            on = !on;
            idx = (idx + 1) % pattern.len();
            remaining = pattern[idx];
            a = p;
            left = dist(a, b);
        }
        remaining -= left;
        if on {
            current.push(b);
        }
    }
    if on && current.len() >= 2 {
        out.push(current);
    }
    out
}

/// Sutherland–Hodgman clipping of a polygon against a rectangle.
pub fn clip_polygon(polygon: &[Px], rect: &PixelRect) -> Vec<Px> {
    type Inside = fn(Px, &PixelRect) -> bool;
    type Cross = fn(Px, Px, &PixelRect) -> Px;
    let edges: [(Inside, Cross); 4] = [
        (|p, r| p.0 >= r.left, |a, b, r| lerp(a, b, (r.left - a.0) / (b.0 - a.0))),
        (|p, r| p.0 <= r.right, |a, b, r| lerp(a, b, (r.right - a.0) / (b.0 - a.0))),
        (|p, r| p.1 >= r.top, |a, b, r| lerp(a, b, (r.top - a.1) / (b.1 - a.1))),
        (|p, r| p.1 <= r.bottom, |a, b, r| lerp(a, b, (r.bottom - a.1) / (b.1 - a.1))),
    ];
    let mut output = polygon.to_vec();
    for (inside, cross) in edges {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let mut prev = input[input.len() - 1];
        for &cur in &input {
            match (inside(cur, rect), inside(prev, rect)) {
                (true, true) => output.push(cur),
                (true, false) => {
                    output.push(cross(prev, cur, rect));
                    output.push(cur);
                }
                (false, true) => output.push(cross(prev, cur, rect)),
                (false, false) => {}
            }
            prev = cur;
        }
    }
    output
}

/// Hatch strokes filling `polygon`.
///
/// `directions` are unit vectors with y pointing up; lines of each direction
/// are `spacing` pixels apart. Works for any simple polygon (even-odd rule).
pub fn hatch_segments(polygon: &[Px], directions: &[(f64, f64)], spacing: f64) -> Vec<(Px, Px)> {
    let mut out = Vec::new();
    if polygon.len() < 3 || !(spacing > 0.0) {
        return out;
    }
    for &(dx, dy_up) in directions {
        let d = (dx, -dy_up);
        let n = (-d.1, d.0);
        let proj = |p: Px| p.0 * n.0 + p.1 * n.1;
        let along = |p: Px| p.0 * d.0 + p.1 * d.1;
        let (lo, hi) = polygon
            .iter()
            .map(|&p| proj(p))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
        let mut s = (lo / spacing).ceil() * spacing;
        while s <= hi {
            let mut hits: Vec<f64> = Vec::new();
            for i in 0..polygon.len() {
                let a = polygon[i];
                let b = polygon[(i + 1) % polygon.len()];
                let (pa, pb) = (proj(a), proj(b));
                if (pa <= s && pb > s) || (pb <= s && pa > s) {
                    hits.push(along(lerp(a, b, (s - pa) / (pb - pa))));
                }
            }
            hits.sort_by(f64::total_cmp);
            for pair in hits.chunks_exact(2) {
                let point = |u: f64| (n.0 * s + d.0 * u, n.1 * s + d.1 * u);
                out.push((point(pair[0]), point(pair[1])));
            }
            s += spacing;
        }
    }
    out
}

/// Triangle of an arrow head whose tip is at `to`, or `None` for a zero-length arrow.
/// Also returns where the shaft should end.
pub fn arrow_head(from: Px, to: Px, length: f64, width: f64) -> Option<([Px; 3], Px)> {
    let len = dist(from, to);
    if len == 0.0 {
        return None;
    }
    let u = ((to.0 - from.0) / len, (to.1 - from.1) / len);
    let base = (to.0 - u.0 * length, to.1 - u.1 * length);
    let half = width / 2.0;
    let n = (-u.1 * half, u.0 * half);
    Some((
        [to, (base.0 + n.0, base.1 + n.1), (base.0 - n.0, base.1 - n.1)],
        base,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> PixelRect {
        PixelRect {
            left: 0.0,
            top: 0.0,
            right: 10.0,
            bottom: 10.0,
        }
    }

    #[test]
    fn region_maps_with_y_flipped() {
        let r = PixelRect::from_region(Region::new(0.1, 0.9, 0.2, 0.8), (100.0, 200.0));
        assert_relative_eq!(r.left, 10.0);
        assert_relative_eq!(r.top, 40.0);
        assert_relative_eq!(r.bottom, 160.0);
        assert_eq!(r.at_fraction(0.0, 0.0), (r.left, r.bottom));
    }

    #[test]
    fn gaps_split_lines() {
        let runs = split_at_gaps(&[(0.0, 0.0), (1.0, 1.0), (2.0, f64::NAN), (3.0, 3.0)]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1], vec![(3.0, 3.0)]);
    }

    #[test]
    fn segment_is_cut_at_the_border() {
        let (p, q) = clip_segment((-5.0, 5.0), (5.0, 5.0), &unit_box()).unwrap();
        assert_eq!(p, (0.0, 5.0));
        assert_eq!(q, (5.0, 5.0));
        assert!(clip_segment((-5.0, -5.0), (-1.0, 20.0), &unit_box()).is_none());
    }

    #[test]
    fn polyline_leaving_and_reentering_splits() {
        let runs = clip_polyline(&[(1.0, 1.0), (1.0, 20.0), (2.0, 1.0)], &unit_box());
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn dashes_alternate() {
        let pieces = dash_polyline(&[(0.0, 0.0), (10.0, 0.0)], &[2.0, 3.0]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], vec![(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(pieces[1], vec![(5.0, 0.0), (7.0, 0.0)]);
    }

    #[test]
    fn polygon_clip_trims_overhang() {
        let square = vec![(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)];
        let clipped = clip_polygon(&square, &unit_box());
        assert_eq!(clipped.len(), 4);
        assert!(clipped.iter().all(|p| unit_box().contains(*p, 1e-9)));
    }

    #[test]
    fn vertical_hatch_spans_the_box() {
        let lines = hatch_segments(&unit_box().corners(), &[(0.0, 1.0)], 2.5);
        assert!(!lines.is_empty());
        for (a, b) in lines {
            assert_relative_eq!(a.0, b.0, epsilon = 1e-9);
            assert_relative_eq!((a.1 - b.1).abs(), 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn arrow_head_points_at_target() {
        let (tri, shaft_end) = arrow_head((0.0, 0.0), (10.0, 0.0), 4.0, 2.0).unwrap();
        assert_eq!(tri[0], (10.0, 0.0));
        assert_eq!(shaft_end, (6.0, 0.0));
        assert!(arrow_head((1.0, 1.0), (1.0, 1.0), 4.0, 2.0).is_none());
    }
}
