use std::f64::consts::TAU;

use crate::{
    foundation::{
        core::{BezPath, Vec2},
        math::{SeedFamily, SeededRng},
    },
    shapes::{
        generate::{
            Accent, AccentInk, AccentLayer, BodyStroke, Frame, ShapeGeometry, closed_polyline,
            ellipse,
        },
        params::{BubbleStyle, ShapeParams},
    },
};

/// Radial "flash" bubbles: a clean inner ellipse for the text framed by
/// `lineCount` tapered rays reaching out to the box edge.
pub(crate) fn flash_geometry(
    style: BubbleStyle,
    f: &Frame,
    sw: f64,
    p: &ShapeParams,
    seed: u32,
) -> ShapeGeometry {
    let inner = p.flash_inner_radius();
    let (irx, iry) = (f.rx * inner, f.ry * inner);
    let mut rng = SeededRng::for_family(seed, SeedFamily::Flash);
    let mut accents = Vec::new();

    // Radii below are relative to the inner ellipse; 1/inner reaches the box edge.
    let edge = 1.0 / inner;

    if style == BubbleStyle::FlashBlack && p.flash_filled() {
        let teeth = p.flash_bump_count();
        let height = p.flash_bump_height();
        let halo = (0..teeth * 2).map(|i| {
            let angle = f64::from(i) / f64::from(teeth * 2) * TAU;
            let r = if i % 2 == 0 {
                1.0 + height * (1.0 + rng.next_f64() * 0.5)
            } else {
                1.0 + height * 0.25
            };
            f.center + Vec2::new(angle.cos() * irx * r, angle.sin() * iry * r)
        });
        accents.push(Accent {
            path: closed_polyline(halo.collect::<Vec<_>>()),
            layer: AccentLayer::Under,
            ink: AccentInk::Stroke,
            stroke_width: None,
        });
    }

    let count = p.flash_line_count(style);
    let step = TAU / f64::from(count);
    let spacing = p.flash_line_spacing();
    let length = p.flash_line_length();
    let thickness = p.flash_line_thickness(sw);

    for i in 0..count {
        let angle = f64::from(i) * step + rng.jitter(step * spacing);
        let (start, reach, width, bend) = match style {
            BubbleStyle::FlashDense => (1.02, 0.3 + rng.next_f64() * 0.7, thickness * 0.6, 0.0),
            BubbleStyle::FlashEyelash => (
                1.0,
                0.35 + rng.next_f64() * 0.3,
                thickness * 1.2,
                rng.jitter(0.5),
            ),
            _ => (1.04, 0.45 + rng.next_f64() * 0.55, thickness, 0.0),
        };
        let end = start + (edge - start) * (length * reach).min(1.0);
        let dir = Vec2::new(angle.cos() * irx, angle.sin() * iry);
        let p0 = f.center + dir * start;
        let p1 = f.center + dir * end;
        accents.push(Accent {
            path: tapered_ray(p0, p1, width, bend),
            layer: AccentLayer::Under,
            ink: AccentInk::Stroke,
            stroke_width: None,
        });
    }

    ShapeGeometry {
        outline: ellipse(f.center, irx, iry),
        accents,
        body_stroke: BodyStroke::Hidden,
        join: kurbo::Join::Round,
        fill_body: true,
    }
}

/// Needle from `p0` (sharp) to `p1` (`width` wide). A non-zero `bend` curves
/// the needle sideways by that fraction of its length.
fn tapered_ray(p0: kurbo::Point, p1: kurbo::Point, width: f64, bend: f64) -> BezPath {
    let d = p1 - p0;
    let len = d.hypot();
    let mut path = BezPath::new();
    if len == 0.0 {
        return path;
    }
    let normal = Vec2::new(-d.y, d.x) / len;
    let half = normal * (width / 2.0);
    path.move_to(p0);
    if bend == 0.0 {
        path.line_to(p1 + half);
        path.line_to(p1 - half);
    } else {
        let ctrl = p0.midpoint(p1) + normal * (len * bend);
        path.quad_to(ctrl + half * 0.5, p1 + half);
        path.line_to(p1 - half);
        path.quad_to(ctrl - half * 0.5, p0);
    }
    path.close_path();
    path
}
