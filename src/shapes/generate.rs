use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{Join, Shape};

use crate::{
    foundation::{
        core::{BezPath, Point, Rect, Vec2},
        math::{SeedFamily, SeededRng, clamp_extent, finite_or},
    },
    shapes::{
        corners::blend_corners,
        flash::flash_geometry,
        params::{BubbleStyle, ShapeParams},
    },
};

const CURVE_TOLERANCE: f64 = 0.1;

/// Which side of the body an accent paints on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccentLayer {
    /// Before the body fill.
    Under,
    /// After the body stroke.
    Over,
}

/// Which bubble color an accent uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccentInk {
    Fill,
    Stroke,
}

/// Decoration that belongs to a shape but is not part of its outline:
/// flash rays and halos, inner rings, sticker die-cuts.
#[derive(Clone, Debug, PartialEq)]
pub struct Accent {
    pub path: BezPath,
    pub layer: AccentLayer,
    pub ink: AccentInk,
    /// `None` fills the path, `Some(w)` strokes it at width `w`.
    pub stroke_width: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BodyStroke {
    Solid,
    Dashed(Vec<f64>),
    Hidden,
}

/// Output of a shape generator.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeGeometry {
    /// Closed body outline; filled with the bubble fill color.
    pub outline: BezPath,
    pub accents: Vec<Accent>,
    pub body_stroke: BodyStroke,
    pub join: Join,
    /// False for template-image bubbles, whose body is the template raster.
    pub fill_body: bool,
}

impl ShapeGeometry {
    fn plain(outline: BezPath) -> Self {
        Self {
            outline,
            accents: Vec::new(),
            body_stroke: BodyStroke::Solid,
            join: Join::Round,
            fill_body: true,
        }
    }

    fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }
}

/// Everything about a bubble a generator reads besides its box and seed.
#[derive(Clone, Copy, Debug)]
pub struct ShapeSpec<'a> {
    pub style: BubbleStyle,
    pub stroke_width: f64,
    pub wobble: f64,
    pub params: &'a ShapeParams,
}

/// Box clamped to at least 1px on each side, plus its inscribed ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Frame {
    pub rect: Rect,
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

impl Frame {
    pub(crate) fn new(bbox: Rect) -> Self {
        let r = bbox.abs();
        let x0 = finite_or(r.x0, 0.0);
        let y0 = finite_or(r.y0, 0.0);
        let w = clamp_extent(r.width());
        let h = clamp_extent(r.height());
        let rect = Rect::new(x0, y0, x0 + w, y0 + h);
        Self {
            rect,
            center: rect.center(),
            rx: w / 2.0,
            ry: h / 2.0,
        }
    }

    /// Point at parametric angle `angle`, radii scaled by `sx`/`sy`.
    pub(crate) fn at(&self, angle: f64, sx: f64, sy: f64) -> Point {
        self.center + Vec2::new(angle.cos() * self.rx * sx, angle.sin() * self.ry * sy)
    }
}

/// Build the outline (and accents) for `spec` inside `bbox`.
///
/// Pure: the same box, spec and seed always yield the same vertices.
pub fn generate_path(bbox: Rect, spec: &ShapeSpec<'_>, seed: u32) -> ShapeGeometry {
    let f = Frame::new(bbox);
    let sw = finite_or(spec.stroke_width, 2.0).max(0.0);
    let p = spec.params;

    match spec.style {
        BubbleStyle::Handwritten => handwritten(&f, sw, seed),
        BubbleStyle::LineDrawing => ShapeGeometry::plain(ellipse(f.center, f.rx, f.ry)),
        BubbleStyle::Wobbly => wobbly(&f, finite_or(spec.wobble, 0.0)),
        BubbleStyle::Thought => thought(&f, p, seed),
        BubbleStyle::Shout => shout(&f, p, seed).with_join(Join::Miter),
        BubbleStyle::Rectangle => ShapeGeometry::plain(rectangle(f.rect)).with_join(Join::Miter),
        BubbleStyle::Rounded => rounded(&f, p),
        BubbleStyle::DoubleLine => double_line(&f, sw),
        BubbleStyle::Wavy => wavy(&f),
        BubbleStyle::Cloud => cloud(&f, p, seed),
        BubbleStyle::Electric => electric(&f, p, seed).with_join(Join::Miter),
        BubbleStyle::Sticker => sticker(&f, sw, seed),
        BubbleStyle::Polygon => polygon(&f, p, seed),
        BubbleStyle::Spiky => spiky(&f, p, seed),
        BubbleStyle::Dashed => {
            let mut g = ShapeGeometry::plain(ellipse(f.center, f.rx, f.ry));
            let unit = sw.max(1.0);
            g.body_stroke = BodyStroke::Dashed(vec![unit * 4.0, unit * 2.5]);
            g
        }
        BubbleStyle::FlashBlack | BubbleStyle::FlashDense | BubbleStyle::FlashEyelash => {
            flash_geometry(spec.style, &f, sw, p, seed)
        }
        BubbleStyle::Image => ShapeGeometry {
            body_stroke: BodyStroke::Hidden,
            fill_body: false,
            ..ShapeGeometry::plain(rectangle(f.rect))
        },
    }
}

/// Fraction of the box width text may occupy before wrapping.
pub fn text_width_fraction(style: BubbleStyle, params: &ShapeParams) -> f64 {
    if style.is_flash() {
        params.flash_inner_radius()
    } else {
        1.0
    }
}

pub(crate) fn ellipse(center: Point, rx: f64, ry: f64) -> BezPath {
    kurbo::Ellipse::new(center, (rx, ry), 0.0).to_path(CURVE_TOLERANCE)
}

pub(crate) fn closed_polyline(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    if !path.elements().is_empty() {
        path.close_path();
    }
    path
}

fn rectangle(r: Rect) -> BezPath {
    closed_polyline([
        Point::new(r.x0, r.y0),
        Point::new(r.x1, r.y0),
        Point::new(r.x1, r.y1),
        Point::new(r.x0, r.y1),
    ])
}

fn handwritten(f: &Frame, sw: f64, seed: u32) -> ShapeGeometry {
    const SEGMENTS: u32 = 60;
    let mut rng = SeededRng::for_family(seed, SeedFamily::Outline);
    let points = (0..=SEGMENTS).map(|i| {
        let angle = f64::from(i) / f64::from(SEGMENTS) * TAU;
        let jx = rng.jitter(sw * 1.5);
        let jy = rng.jitter(sw * 1.5);
        f.at(angle, 1.0, 1.0) + Vec2::new(jx, jy)
    });
    ShapeGeometry::plain(closed_polyline(points.collect::<Vec<_>>()))
}

fn wobbly(f: &Frame, wobble: f64) -> ShapeGeometry {
    const SEGMENTS: u32 = 80;
    let points = (0..=SEGMENTS).map(|i| {
        let angle = f64::from(i) / f64::from(SEGMENTS) * TAU;
        let wx = (angle * 6.0).sin() * wobble;
        let wy = (angle * 8.0).cos() * wobble * 0.7;
        f.center + Vec2::new(angle.cos() * (f.rx + wx), angle.sin() * (f.ry + wy))
    });
    ShapeGeometry::plain(closed_polyline(points))
}

fn thought(f: &Frame, p: &ShapeParams, seed: u32) -> ShapeGeometry {
    let bumps = p.shape_bump_count(16);
    let bump_size = f.rx.min(f.ry) * p.shape_bump_size(0.18);
    let mut rng = SeededRng::for_family(seed, SeedFamily::Outline);
    let steps = bumps * 4;
    let points = (0..=steps).map(|i| {
        let angle = f64::from(i) / f64::from(steps) * TAU;
        let bump =
            (angle * f64::from(bumps)).cos().abs() * bump_size + rng.jitter(bump_size * 0.3);
        f.center + Vec2::new(angle.cos() * (f.rx + bump), angle.sin() * (f.ry + bump))
    });
    ShapeGeometry::plain(closed_polyline(points.collect::<Vec<_>>()))
}

fn shout(f: &Frame, p: &ShapeParams, seed: u32) -> ShapeGeometry {
    let spikes = p.shape_spike_count(12);
    let mut rng = SeededRng::for_family(seed, SeedFamily::Outline);
    let steps = spikes * 2;
    let points = (0..=steps).map(|i| {
        let angle = f64::from(i) / f64::from(steps) * TAU;
        let r = if i % 2 == 0 {
            1.0 + 0.25 + rng.next_f64() * 0.15
        } else {
            0.82
        };
        f.at(angle, r, r)
    });
    ShapeGeometry::plain(closed_polyline(points.collect::<Vec<_>>()))
}

fn rounded(f: &Frame, p: &ShapeParams) -> ShapeGeometry {
    let short = f.rect.width().min(f.rect.height());
    let radius = p.shape_corner_radius(short * 0.2).min(short / 2.0);
    let path = kurbo::RoundedRect::from_rect(f.rect, radius).to_path(CURVE_TOLERANCE);
    ShapeGeometry::plain(path)
}

fn double_line(f: &Frame, sw: f64) -> ShapeGeometry {
    let mut g = ShapeGeometry::plain(ellipse(f.center, f.rx, f.ry));
    let gap = sw * 2.5;
    let (irx, iry) = (f.rx - gap, f.ry - gap);
    if irx >= 0.5 && iry >= 0.5 {
        g.accents.push(Accent {
            path: ellipse(f.center, irx, iry),
            layer: AccentLayer::Over,
            ink: AccentInk::Stroke,
            stroke_width: Some(sw),
        });
    }
    g
}

fn wavy(f: &Frame) -> ShapeGeometry {
    const WAVES: f64 = 10.0;
    const SEGMENTS: u32 = 120;
    let amp = f.rx.min(f.ry) * 0.08;
    let points = (0..=SEGMENTS).map(|i| {
        let angle = f64::from(i) / f64::from(SEGMENTS) * TAU;
        let wave = (angle * WAVES).sin() * amp;
        f.center + Vec2::new(angle.cos() * (f.rx + wave), angle.sin() * (f.ry + wave))
    });
    ShapeGeometry::plain(closed_polyline(points))
}

fn cloud(f: &Frame, p: &ShapeParams, seed: u32) -> ShapeGeometry {
    let n = p.shape_bump_count(10);
    let size = p.shape_bump_size(0.2);
    let roundness = p.shape_bump_roundness();
    let mut rng = SeededRng::for_family(seed, SeedFamily::Cloud);

    let step = TAU / f64::from(n);
    let shrink = 1.0 - size * 0.5;
    let base: Vec<Point> = (0..n)
        .map(|i| {
            let angle = -FRAC_PI_2 + f64::from(i) * step + rng.jitter(step * 0.3);
            f.at(angle, shrink, shrink)
        })
        .collect();

    let mut path = BezPath::new();
    path.move_to(base[0]);
    for i in 0..base.len() {
        let a = base[i];
        let b = base[(i + 1) % base.len()];
        let chord = b - a;
        let out = outward_normal(f.center, a, b);
        let h = chord.hypot() * 0.5 * roundness * (0.85 + rng.next_f64() * 0.3);
        path.curve_to(a + out * h, b + out * h, b);
    }
    path.close_path();
    ShapeGeometry::plain(path)
}

fn electric(f: &Frame, p: &ShapeParams, seed: u32) -> ShapeGeometry {
    let n = p.shape_spike_count(18) * 2;
    let mut rng = SeededRng::for_family(seed, SeedFamily::Electric);
    let step = TAU / f64::from(n);

    let corners: Vec<Point> = (0..n)
        .map(|i| {
            let angle = f64::from(i) * step + rng.jitter(step * 0.4);
            let r = if i % 2 == 0 {
                1.0 + rng.next_f64() * 0.14
            } else {
                0.86 - rng.next_f64() * 0.1
            };
            f.at(angle, r, r)
        })
        .collect();

    // Each edge gets one sideways kink.
    let mut points = Vec::with_capacity(corners.len() * 2);
    for i in 0..corners.len() {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        let d = b - a;
        let len = d.hypot();
        points.push(a);
        if len > 0.0 {
            let normal = Vec2::new(-d.y, d.x) / len;
            points.push(a.midpoint(b) + normal * rng.jitter(len * 0.5));
        }
    }
    ShapeGeometry::plain(closed_polyline(points))
}

fn sticker(f: &Frame, sw: f64, seed: u32) -> ShapeGeometry {
    const SAMPLES: u32 = 48;
    let mut rng = SeededRng::for_family(seed, SeedFamily::Sticker);
    let phase = rng.next_f64() * TAU;
    let blob: Vec<Point> = (0..SAMPLES)
        .map(|i| {
            let angle = f64::from(i) / f64::from(SAMPLES) * TAU;
            let r = 1.0 + (angle * 3.0 + phase).sin() * 0.04 + rng.jitter(0.03);
            f.at(angle, r, r)
        })
        .collect();

    let margin = (sw * 3.0).max(6.0);
    let die_cut: Vec<Point> = blob
        .iter()
        .map(|&q| {
            let d = q - f.center;
            let len = d.hypot();
            if len > 0.0 { q + d * (margin / len) } else { q }
        })
        .collect();

    let smooth = |len: f64| len * 0.5;
    let outer = blend_corners(&die_cut, smooth);
    let mut g = ShapeGeometry::plain(blend_corners(&blob, smooth));
    g.accents.push(Accent {
        path: outer.clone(),
        layer: AccentLayer::Under,
        ink: AccentInk::Fill,
        stroke_width: None,
    });
    g.accents.push(Accent {
        path: outer,
        layer: AccentLayer::Under,
        ink: AccentInk::Stroke,
        stroke_width: Some((sw * 0.5).max(1.0)),
    });
    g
}

fn polygon(f: &Frame, p: &ShapeParams, seed: u32) -> ShapeGeometry {
    let sides = p.shape_sides();
    let radius = p.shape_corner_radius(8.0);
    let wobble = p.shape_wobble();
    let mut rng = SeededRng::for_family(seed, SeedFamily::Polygon);
    let vertices: Vec<Point> = (0..sides)
        .map(|i| {
            let angle = -FRAC_PI_2 + f64::from(i) * TAU / f64::from(sides);
            f.at(angle, 1.0, 1.0) + Vec2::new(rng.jitter(wobble * 2.0), rng.jitter(wobble * 2.0))
        })
        .collect();
    ShapeGeometry::plain(blend_corners(&vertices, |_| radius))
}

fn spiky(f: &Frame, p: &ShapeParams, seed: u32) -> ShapeGeometry {
    let n = p.shape_spike_count(14);
    let height = p.shape_spike_height();
    let sharpness = p.shape_spike_sharpness();
    let mut rng = SeededRng::for_family(seed, SeedFamily::Spiky);
    let steps = n * 2;

    let points: Vec<Point> = (0..steps)
        .map(|i| {
            let angle = -FRAC_PI_2 + f64::from(i) / f64::from(steps) * TAU;
            let r = if i % 2 == 0 {
                1.0 + height * 0.5 * (0.7 + rng.next_f64() * 0.6)
            } else {
                1.0 - height * 0.5
            };
            f.at(angle, r, r)
        })
        .collect();

    let outline = if sharpness > 0.5 {
        closed_polyline(points)
    } else {
        let t = (1.0 - sharpness) * 0.5;
        blend_corners(&points, |len| len * t)
    };
    ShapeGeometry::plain(outline).with_join(if sharpness > 0.5 {
        Join::Miter
    } else {
        Join::Round
    })
}

/// Unit normal of chord `a -> b` pointing away from `center`.
pub(crate) fn outward_normal(center: Point, a: Point, b: Point) -> Vec2 {
    let d = b - a;
    let len = d.hypot();
    if len == 0.0 {
        let radial = a - center;
        let rl = radial.hypot();
        return if rl > 0.0 { radial / rl } else { Vec2::ZERO };
    }
    let n = Vec2::new(d.y, -d.x) / len;
    if n.dot(a.midpoint(b) - center) < 0.0 {
        -n
    } else {
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shapes/generate.rs"]
mod tests;
