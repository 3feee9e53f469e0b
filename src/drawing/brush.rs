use crate::{
    foundation::core::{BezPath, Point},
    raster::{
        blend::Blend,
        painter::{Cap, Join, StrokeStyle},
    },
};

/// Freehand brush models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushKind {
    #[default]
    Ballpoint,
    Calligraphy,
    Highlighter,
    Pencil,
    Marker,
    Watercolor,
}

/// Stroke parameters one brush produces for a single input sample.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushDab {
    pub width: f64,
    pub alpha: f32,
    pub cap: Cap,
    /// How the finished layer composites over the layers below it.
    pub blend: Blend,
}

impl BrushDab {
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::round(self.width)
            .with_cap(self.cap)
            .with_join(Join::Round)
    }
}

impl BrushKind {
    /// Width, alpha, cap and blend for base `size`, base `opacity` and stylus
    /// `pressure` (0..=1; mouse input reports 0.5).
    pub fn dab(self, size: f64, opacity: f32, pressure: f64) -> BrushDab {
        let p = pressure.clamp(0.0, 1.0);
        let pf = p as f32;
        let (width, alpha) = match self {
            Self::Ballpoint => (size * (0.6 + 0.4 * p), opacity * (0.7 + 0.3 * pf)),
            Self::Calligraphy => (size * (0.2 + 1.6 * p), opacity * (0.7 + 0.3 * pf)),
            Self::Highlighter => (size * 4.0, opacity * 0.35),
            Self::Pencil => (size * (0.5 + 0.3 * p), opacity * (0.4 + 0.4 * pf)),
            Self::Marker => (size * (0.8 + 0.4 * p), opacity * (0.7 + 0.3 * pf)),
            Self::Watercolor => (size * (1.0 + 0.8 * p), opacity * (0.15 + 0.25 * pf)),
        };
        let cap = match self {
            Self::Calligraphy => Cap::Butt,
            Self::Highlighter => Cap::Square,
            _ => Cap::Round,
        };
        let blend = if self == Self::Highlighter {
            Blend::Multiply
        } else {
            Blend::Over
        };
        BrushDab {
            width: width.max(0.0),
            alpha: alpha.clamp(0.0, 1.0),
            cap,
            blend,
        }
    }
}

/// One pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StylusPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
}

fn default_pressure() -> f64 {
    0.5
}

impl StylusPoint {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    /// A mouse sample, which has no pressure.
    pub fn mouse(p: Point) -> Self {
        Self::new(p.x, p.y, default_pressure())
    }

    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Segment to draw after `points` gained its last sample.
///
/// With two samples this is a straight line; from three on it is a quadratic
/// from the midpoint of the previous pair, through the middle sample, to the
/// midpoint of the newest pair.
pub fn next_segment(points: &[StylusPoint]) -> Option<BezPath> {
    let mut path = BezPath::new();
    match points {
        [] | [_] => return None,
        [a, b] => {
            path.move_to(a.point());
            path.line_to(b.point());
        }
        [.., a, b, c] => {
            path.move_to(a.point().midpoint(b.point()));
            path.quad_to(b.point(), b.point().midpoint(c.point()));
        }
    }
    Some(path)
}

#[cfg(test)]
#[path = "../../tests/unit/drawing/brush.rs"]
mod tests;
