use crate::{
    bubble::model::{Bubble, TailDirection},
    foundation::{
        core::{BezPath, Point, Vec2},
        math::{SeedFamily, SeededRng},
    },
    shapes::generate::Frame,
};

/// Lateral offset of the default tip from the bubble's center line.
const TIP_LATERAL_OFFSET: f64 = 10.0;
/// How far the erase wedge reaches past the ellipse, as a radius multiple.
const WEDGE_REACH: f64 = 3.0;
const WEDGE_STEPS: usize = 16;
const TIP_PULL: f64 = 0.3;

/// Where the tail tip sits when the bubble does not set one.
pub fn default_tail_tip(bubble: &Bubble) -> Point {
    let len = bubble
        .tail_length
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| bubble.tail_style.default_length());
    let c = bubble.center();
    match bubble.tail_direction {
        TailDirection::Bottom => {
            Point::new(c.x + TIP_LATERAL_OFFSET, bubble.y + bubble.height + len)
        }
        TailDirection::Top => Point::new(c.x + TIP_LATERAL_OFFSET, bubble.y - len),
        TailDirection::Left => Point::new(bubble.x - len, c.y + TIP_LATERAL_OFFSET),
        TailDirection::Right => Point::new(bubble.x + bubble.width + len, c.y + TIP_LATERAL_OFFSET),
    }
}

/// The explicit tip or, failing that, [`default_tail_tip`].
pub fn resolved_tail_tip(bubble: &Bubble) -> Point {
    bubble.tail_tip().unwrap_or_else(|| default_tail_tip(bubble))
}

/// Solved tail attachment and curve control points.
///
/// The A side leaves the body at `angle_a` (the smaller angle) and the B side
/// at `angle_b`. With a sharp tip `tip_a == tip_b == tip`.
#[derive(Clone, Debug, PartialEq)]
pub struct TailGeometry {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub tip: Point,
    pub tip_a: Point,
    pub tip_b: Point,
    pub base_a: Point,
    pub base_b: Point,
    pub main_angle: f64,
    pub angle_a: f64,
    pub angle_b: f64,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub ctrl1_b: Point,
    pub ctrl2_b: Point,
}

pub fn tail_geometry(bubble: &Bubble) -> TailGeometry {
    let frame = Frame::new(bubble.rect());
    let center = frame.center;
    let tip = resolved_tail_tip(bubble);

    let main_angle = (tip.y - center.y).atan2(tip.x - center.x);
    let avg_radius = (frame.rx + frame.ry) / 2.0;
    let spread = bubble.tail_base_spread().atan2(avg_radius);
    let angle_a = main_angle - spread;
    let angle_b = main_angle + spread;
    let base_a = frame.at(angle_a, 1.0, 1.0);
    let base_b = frame.at(angle_b, 1.0, 1.0);
    let base_mid = base_a.midpoint(base_b);

    let axis = tip - center;
    let axis_len = axis.hypot();
    let dir = if axis_len > 1e-9 {
        axis / axis_len
    } else {
        Vec2::new(main_angle.cos(), main_angle.sin())
    };
    // Unit normal pointing to the A side.
    let perp_a = Vec2::new(dir.y, -dir.x);
    let half_tip = bubble.tail_tip_spread() / 2.0;
    let tip_a = tip + perp_a * half_tip;
    let tip_b = tip - perp_a * half_tip;

    let pull = 0.5 + bubble.tail_curve() * 0.45;
    let mut rng = SeededRng::for_family(bubble.seed, SeedFamily::TailJitter);
    let amp = 4.0 * bubble.tail_jitter();
    let mut jitter = |p: Point| Point::new(p.x + rng.jitter(amp), p.y + rng.jitter(amp));

    let derived1_a = jitter(base_a + (base_mid - base_a) * pull);
    let derived2_a = jitter(tip_a + (base_mid - tip_a) * TIP_PULL);
    let derived1_b = jitter(base_b + (base_mid - base_b) * pull);
    let derived2_b = jitter(tip_b + (base_mid - tip_b) * TIP_PULL);

    let mirror = |p: Point| reflect(p, center, dir);
    let (ctrl1, ctrl1_b) = match bubble.tail_ctrl1() {
        Some(p) => (p, mirror(p)),
        None => (derived1_a, derived1_b),
    };
    let (ctrl2, ctrl2_b) = match bubble.tail_ctrl2() {
        Some(p) => (p, mirror(p)),
        None => (derived2_a, derived2_b),
    };

    TailGeometry {
        center,
        rx: frame.rx,
        ry: frame.ry,
        tip,
        tip_a,
        tip_b,
        base_a,
        base_b,
        main_angle,
        angle_a,
        angle_b,
        ctrl1,
        ctrl2,
        ctrl1_b,
        ctrl2_b,
    }
}

/// Reflect `p` across the line through `origin` along the unit vector `dir`.
fn reflect(p: Point, origin: Point, dir: Vec2) -> Point {
    let v = p - origin;
    let along = dir * v.dot(dir);
    origin + along * 2.0 - v
}

impl TailGeometry {
    /// Closed tail shape, filled with the body color.
    pub fn outline(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.base_a);
        path.curve_to(self.ctrl1, self.ctrl2, self.tip_a);
        if self.tip_a != self.tip_b {
            path.line_to(self.tip_b);
        }
        path.curve_to(self.ctrl2_b, self.ctrl1_b, self.base_b);
        path.close_path();
        path
    }

    /// The two tail sides (and the blunt tip cap) as one open path.
    pub fn sides(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.base_a);
        path.curve_to(self.ctrl1, self.ctrl2, self.tip_a);
        if self.tip_a != self.tip_b {
            path.line_to(self.tip_b);
        }
        path.curve_to(self.ctrl2_b, self.ctrl1_b, self.base_b);
        path
    }

    /// Wedge from the center through the attachment arc, reaching well past
    /// the outline. Erasing it removes the body stroke between the bases.
    pub fn erase_wedge(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.center);
        for i in 0..=WEDGE_STEPS {
            let t = self.angle_a + (self.angle_b - self.angle_a) * i as f64 / WEDGE_STEPS as f64;
            let on_ellipse = Vec2::new(t.cos() * self.rx, t.sin() * self.ry);
            path.line_to(self.center + on_ellipse * WEDGE_REACH);
        }
        path.close_path();
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/tail.rs"]
mod tests;
