use crate::{
    bubble::{
        chrome::{Corner, ResizeHandle},
        model::Bubble,
        overlay::CharacterOverlay,
    },
    foundation::core::Point,
    geometry::tail::tail_geometry,
    interaction::config::EditorConfig,
};

/// What a pointer press grabbed, and so what the following moves edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    None,
    Move,
    Resize(ResizeHandle),
    MoveTail,
    TailCtrl1,
    TailCtrl2,
    CharMove,
    CharResize(Corner),
    CharRotate,
}

/// Pointer cursor the host should show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Crosshair,
    Grab,
    NResize,
    SResize,
    EResize,
    WResize,
    NwResize,
    NeResize,
    SwResize,
    SeResize,
}

impl Cursor {
    /// CSS cursor keyword.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Crosshair => "crosshair",
            Self::Grab => "grab",
            Self::NResize => "n-resize",
            Self::SResize => "s-resize",
            Self::EResize => "e-resize",
            Self::WResize => "w-resize",
            Self::NwResize => "nw-resize",
            Self::NeResize => "ne-resize",
            Self::SwResize => "sw-resize",
            Self::SeResize => "se-resize",
        }
    }

    pub fn for_resize(handle: ResizeHandle) -> Self {
        match handle {
            ResizeHandle::Tl => Self::NwResize,
            ResizeHandle::T => Self::NResize,
            ResizeHandle::Tr => Self::NeResize,
            ResizeHandle::R => Self::EResize,
            ResizeHandle::Br => Self::SeResize,
            ResizeHandle::B => Self::SResize,
            ResizeHandle::Bl => Self::SwResize,
            ResizeHandle::L => Self::WResize,
        }
    }

    pub fn for_drag(mode: DragMode) -> Self {
        match mode {
            DragMode::None => Self::Default,
            DragMode::Move | DragMode::CharMove => Self::Move,
            DragMode::Resize(h) => Self::for_resize(h),
            DragMode::MoveTail | DragMode::TailCtrl1 | DragMode::TailCtrl2 => Self::Crosshair,
            DragMode::CharResize(c) => match c {
                Corner::Tl => Self::NwResize,
                Corner::Tr => Self::NeResize,
                Corner::Br => Self::SeResize,
                Corner::Bl => Self::SwResize,
            },
            DragMode::CharRotate => Self::Grab,
        }
    }
}

fn within_square(p: Point, center: Point, tolerance: f64) -> bool {
    (p.x - center.x).abs() <= tolerance && (p.y - center.y).abs() <= tolerance
}

/// Handle of a selected bubble under `p`.
///
/// The tail tip wins over the control handles, which win over the resize
/// handles.
pub fn bubble_handle_at(bubble: &Bubble, p: Point, cfg: &EditorConfig) -> Option<DragMode> {
    if bubble.has_tail() {
        let g = tail_geometry(bubble);
        if within_square(p, g.tip, cfg.handle_tolerance) {
            return Some(DragMode::MoveTail);
        }
        if bubble.tail_style.is_pointed() {
            if p.distance(g.ctrl1) <= cfg.control_hit_radius {
                return Some(DragMode::TailCtrl1);
            }
            if p.distance(g.ctrl2) <= cfg.control_hit_radius {
                return Some(DragMode::TailCtrl2);
            }
        }
    }
    let r = bubble.rect();
    ResizeHandle::ALL
        .into_iter()
        .find(|h| within_square(p, h.position(r), cfg.handle_tolerance))
        .map(DragMode::Resize)
}

/// Handle of a selected character overlay under `p`: a rotated corner or the
/// rotate knob.
pub fn character_handle_at(
    overlay: &CharacterOverlay,
    p: Point,
    cfg: &EditorConfig,
) -> Option<DragMode> {
    let corners = overlay.corners();
    if let Some(c) = Corner::ALL
        .into_iter()
        .find(|c| within_square(p, corners[c.index()], cfg.corner_tolerance))
    {
        return Some(DragMode::CharResize(c));
    }
    let knob = overlay.rotate_handle(cfg.rotate_handle_offset);
    (p.distance(knob) <= cfg.rotate_handle_radius).then_some(DragMode::CharRotate)
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/hit.rs"]
mod tests;
