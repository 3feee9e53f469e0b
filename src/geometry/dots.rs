use std::f64::consts::TAU;

use kurbo::Shape;

use crate::{
    bubble::model::{Bubble, TailStyle},
    foundation::{
        core::{BezPath, Point, Vec2},
        math::{SeedFamily, SeededRng},
    },
    geometry::tail::resolved_tail_tip,
    shapes::generate::{Frame, closed_polyline},
};

/// (radius, distance from the start point) of the three thought dots.
const DOTS: [(f64, f64); 3] = [(8.0, 12.0), (6.0, 26.0), (4.0, 38.0)];
/// Gap between the ellipse and the first dot's reference point.
const DOTS_START_GAP: f64 = 5.0;
const HANDWRITTEN_SEGMENTS: u32 = 12;

#[derive(Clone, Debug, PartialEq)]
pub struct Dot {
    pub center: Point,
    pub radius: f64,
    pub outline: BezPath,
}

/// Three shrinking dots from the body toward the tail tip. Empty unless the
/// bubble uses a dotted tail.
pub fn tail_dots(bubble: &Bubble) -> Vec<Dot> {
    let handwritten = match bubble.tail_style {
        TailStyle::DotsHandwritten => true,
        TailStyle::DotsLinedrawing => false,
        _ => return Vec::new(),
    };
    let frame = Frame::new(bubble.rect());
    let tip = resolved_tail_tip(bubble);
    let angle = (tip.y - frame.center.y).atan2(tip.x - frame.center.x);
    let dir = Vec2::new(angle.cos(), angle.sin());
    let start = frame.at(angle, 1.0, 1.0) + dir * DOTS_START_GAP;

    let scale = bubble.dots_scale();
    let spacing = bubble.dots_spacing();
    let js = bubble.tail_jitter();
    let mut rng = SeededRng::for_family(bubble.seed, SeedFamily::Dots);

    DOTS.iter()
        .map(|&(size, dist)| {
            let radius = size * scale;
            let mut center = start + dir * (dist * spacing);
            let outline = if handwritten {
                center.x += rng.jitter(4.0 * js);
                center.y += rng.jitter(4.0 * js);
                let points: Vec<Point> = (0..=HANDWRITTEN_SEGMENTS)
                    .map(|i| {
                        let a = f64::from(i) / f64::from(HANDWRITTEN_SEGMENTS) * TAU;
                        let jx = rng.jitter(2.0 * js);
                        let jy = rng.jitter(2.0 * js);
                        center + Vec2::new(a.cos() * radius + jx, a.sin() * radius + jy)
                    })
                    .collect();
                closed_polyline(points)
            } else {
                kurbo::Circle::new(center, radius).to_path(0.1)
            };
            Dot {
                center,
                radius,
                outline,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/dots.rs"]
mod tests;
