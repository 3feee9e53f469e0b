use crate::foundation::core::{BezPath, Point};

/// Closed path through `points` with every corner replaced by a quadratic
/// blend between two edge-offset points.
///
/// `inset(edge_len)` gives how far along each adjacent edge the blend starts;
/// it is clamped to half the edge so neighbouring rounds never overlap.
pub fn blend_corners(points: &[Point], inset: impl Fn(f64) -> f64) -> BezPath {
    let mut path = BezPath::new();
    let n = points.len();
    if n < 3 {
        return path;
    }

    let corner = |i: usize| -> (Point, Point, Point) {
        let v = points[i];
        let prev = points[(i + n - 1) % n];
        let next = points[(i + 1) % n];
        let to_prev = prev - v;
        let to_next = next - v;
        let lp = to_prev.hypot();
        let ln = to_next.hypot();
        let dp = if lp > 0.0 {
            inset(lp).clamp(0.0, lp / 2.0)
        } else {
            0.0
        };
        let dn = if ln > 0.0 {
            inset(ln).clamp(0.0, ln / 2.0)
        } else {
            0.0
        };
        let a = if lp > 0.0 { v + to_prev * (dp / lp) } else { v };
        let b = if ln > 0.0 { v + to_next * (dn / ln) } else { v };
        (a, v, b)
    };

    let (a0, v0, b0) = corner(0);
    path.move_to(a0);
    emit_corner(&mut path, a0, v0, b0);
    for i in 1..n {
        let (a, v, b) = corner(i);
        path.line_to(a);
        emit_corner(&mut path, a, v, b);
    }
    path.line_to(a0);
    path.close_path();
    path
}

fn emit_corner(path: &mut BezPath, a: Point, v: Point, b: Point) {
    if a == v && v == b {
        return;
    }
    path.quad_to(v, b);
}

#[cfg(test)]
#[path = "../../tests/unit/shapes/corners.rs"]
mod tests;
