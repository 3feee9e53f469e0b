use kurbo::Shape;

use crate::{
    bubble::{model::Bubble, overlay::CharacterOverlay},
    foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Vec2},
    geometry::tail::{TailGeometry, tail_geometry},
    raster::painter::{Painter, StrokeStyle},
};

/// Distance between an element's box and its selection rectangle.
pub const SELECTION_INSET: f64 = 4.0;
pub const HANDLE_RADIUS: f64 = 4.5;
pub const TIP_HANDLE_RADIUS: f64 = 7.0;
pub const CONTROL_HANDLE_SIZE: f64 = 6.0;
pub const CORNER_HANDLE_SIZE: f64 = 10.0;
pub const ROTATE_HANDLE_RADIUS: f64 = 6.0;
const SELECTION_DASHES: [f64; 2] = [4.0, 3.0];

/// The currently selected element of each kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub bubble: Option<String>,
    pub character: Option<String>,
}

impl Selection {
    pub fn bubble(id: impl Into<String>) -> Self {
        Self {
            bubble: Some(id.into()),
            character: None,
        }
    }

    pub fn character(id: impl Into<String>) -> Self {
        Self {
            bubble: None,
            character: Some(id.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bubble.is_none() && self.character.is_none()
    }
}

/// One of the eight bubble resize handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Tl,
    T,
    Tr,
    R,
    Br,
    B,
    Bl,
    L,
}

impl ResizeHandle {
    pub const ALL: [Self; 8] = [
        Self::Tl,
        Self::T,
        Self::Tr,
        Self::R,
        Self::Br,
        Self::B,
        Self::Bl,
        Self::L,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Self::Tl | Self::L | Self::Bl)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::Tr | Self::R | Self::Br)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::Tl | Self::T | Self::Tr)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bl | Self::B | Self::Br)
    }

    /// Handle center on the selection rectangle around `r`.
    pub fn position(self, r: Rect) -> Point {
        let sel = r.inflate(SELECTION_INSET, SELECTION_INSET);
        let c = sel.center();
        match self {
            Self::Tl => Point::new(sel.x0, sel.y0),
            Self::T => Point::new(c.x, sel.y0),
            Self::Tr => Point::new(sel.x1, sel.y0),
            Self::R => Point::new(sel.x1, c.y),
            Self::Br => Point::new(sel.x1, sel.y1),
            Self::B => Point::new(c.x, sel.y1),
            Self::Bl => Point::new(sel.x0, sel.y1),
            Self::L => Point::new(sel.x0, c.y),
        }
    }
}

/// One of the four overlay corner handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Tl,
    Tr,
    Br,
    Bl,
}

impl Corner {
    /// Same order as [`CharacterOverlay::corners`].
    pub const ALL: [Self; 4] = [Self::Tl, Self::Tr, Self::Br, Self::Bl];

    pub fn opposite(self) -> Self {
        match self {
            Self::Tl => Self::Br,
            Self::Tr => Self::Bl,
            Self::Br => Self::Tl,
            Self::Bl => Self::Tr,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Tl => 0,
            Self::Tr => 1,
            Self::Br => 2,
            Self::Bl => 3,
        }
    }
}

fn dashed(width: f64) -> StrokeStyle {
    StrokeStyle::round(width).with_dashes(&SELECTION_DASHES)
}

fn circle(center: Point, r: f64) -> BezPath {
    kurbo::Circle::new(center, r).to_path(0.1)
}

fn diamond(center: Point, half: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(center + Vec2::new(0.0, -half));
    p.line_to(center + Vec2::new(half, 0.0));
    p.line_to(center + Vec2::new(0.0, half));
    p.line_to(center + Vec2::new(-half, 0.0));
    p.close_path();
    p
}

fn handle(painter: &mut Painter, path: &BezPath, fill: Rgba8, ink: Rgba8, width: f64) {
    painter.fill_path(path, fill);
    painter.stroke_path(path, &StrokeStyle::round(width), ink);
}

/// Dashed selection rectangle, resize handles and, for tailed bubbles, the
/// tip and control handles with their guide lines.
pub fn draw_bubble_selection(painter: &mut Painter, bubble: &Bubble, ink: Rgba8, fill: Rgba8) {
    painter.set_transform(Affine::IDENTITY);
    let r = bubble.rect();
    let sel = r.inflate(SELECTION_INSET, SELECTION_INSET);
    painter.stroke_path(&sel.to_path(0.1), &dashed(2.0), ink);
    for h in ResizeHandle::ALL {
        handle(painter, &circle(h.position(r), HANDLE_RADIUS), fill, ink, 1.8);
    }
    if bubble.has_tail() {
        let g = tail_geometry(bubble);
        if bubble.tail_style.is_pointed() {
            draw_control_guides(painter, &g, ink, fill);
        }
        handle(painter, &circle(g.tip, TIP_HANDLE_RADIUS), fill, ink, 2.0);
    }
}

fn draw_control_guides(painter: &mut Painter, g: &TailGeometry, ink: Rgba8, fill: Rgba8) {
    let guide = dashed(1.0);
    let mut lines = BezPath::new();
    lines.move_to(g.base_a);
    lines.line_to(g.ctrl1);
    lines.move_to(g.tip_a);
    lines.line_to(g.ctrl2);
    painter.stroke_path(&lines, &guide, ink.with_opacity(0.7));
    for p in [g.ctrl1, g.ctrl2] {
        handle(painter, &diamond(p, CONTROL_HANDLE_SIZE), fill, ink, 1.5);
    }
}

/// Rotated dashed box, square corner handles and the rotate handle above the
/// top edge.
pub fn draw_character_selection(
    painter: &mut Painter,
    overlay: &CharacterOverlay,
    rotate_offset: f64,
    ink: Rgba8,
    fill: Rgba8,
) {
    painter.set_transform(Affine::IDENTITY);
    let corners = overlay.corners();
    let mut outline = BezPath::new();
    outline.move_to(corners[0]);
    for &c in &corners[1..] {
        outline.line_to(c);
    }
    outline.close_path();
    painter.stroke_path(&outline, &dashed(2.0), ink);

    let half = CORNER_HANDLE_SIZE / 2.0;
    let spin = Affine::rotate(overlay.rotation);
    for c in corners {
        let square = Rect::new(-half, -half, half, half).to_path(0.1);
        let placed = Affine::translate(c.to_vec2()) * spin * square;
        handle(painter, &placed, fill, ink, 1.5);
    }

    let top_mid = corners[0].midpoint(corners[1]);
    let knob = overlay.rotate_handle(rotate_offset);
    let mut stem = BezPath::new();
    stem.move_to(top_mid);
    stem.line_to(knob);
    painter.stroke_path(&stem, &StrokeStyle::round(1.5), ink);
    handle(painter, &circle(knob, ROTATE_HANDLE_RADIUS), fill, ink, 1.5);
}

#[cfg(test)]
#[path = "../../tests/unit/bubble/chrome.rs"]
mod tests;
