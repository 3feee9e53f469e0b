use crate::{
    bubble::{
        chrome::{Corner, ResizeHandle, Selection},
        model::{Bubble, BubblePatch},
        overlay::{CharacterOverlay, CharacterPatch},
        page::{Arrange, ElementKey, Page},
    },
    foundation::core::{Point, Rect, Vec2},
    geometry::tail::resolved_tail_tip,
    interaction::{
        config::EditorConfig,
        hit::{Cursor, DragMode, bubble_handle_at, character_handle_at},
    },
};

/// Rotation applied by one [`EditorCommand::Rotate`] step.
pub const ROTATE_STEP: f64 = std::f64::consts::PI / 12.0;

/// Input to [`EditorSession::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum EditorCommand {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    PointerLeave,
    DoubleClick(Point),
    /// Abort the active drag, restoring the element to its drag-start state.
    Cancel,
    /// Host-driven selection, e.g. from a layer list.
    Select(Option<ElementKey>),
    Delete,
    Duplicate,
    Arrange(Arrange),
    ToggleLock,
    /// Rotate the selected overlay by [`ROTATE_STEP`].
    Rotate { clockwise: bool },
    /// Mirror the selected bubble's tail across its vertical center line.
    FlipTail,
    /// Drop explicit tail control points back to the derived curve.
    ResetTailControls,
}

/// Change notifications produced by [`EditorSession::apply`].
///
/// Updates have already been applied to the page when they are returned.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    UpdateBubble(String, BubblePatch),
    UpdateCharacter(String, CharacterPatch),
    SelectBubble(Option<String>),
    SelectCharacter(Option<String>),
    /// The host should open a text editor for this bubble.
    EditBubble(String),
    CursorChanged(Cursor),
    Removed(ElementKey),
    Inserted(ElementKey),
}

#[derive(Clone, Debug)]
enum Snapshot {
    Bubble(Bubble),
    Character(CharacterOverlay),
}

#[derive(Clone, Debug)]
struct Drag {
    mode: DragMode,
    origin: Point,
    start: Snapshot,
}

/// Direct-manipulation controller for one page view.
///
/// Holds only the selection ids, the cursor and the active drag's start
/// snapshot. Elements are looked up by id on every command.
#[derive(Clone, Debug, Default)]
pub struct EditorSession {
    config: EditorConfig,
    selection: Selection,
    cursor: Cursor,
    drag: Option<Drag>,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag.as_ref().map_or(DragMode::None, |d| d.mode)
    }

    /// Applies one command to `page` and reports what changed.
    pub fn apply(&mut self, page: &mut Page, cmd: EditorCommand) -> Vec<EditorEvent> {
        let mut out = Vec::new();
        self.forget_missing(page);
        match cmd {
            EditorCommand::PointerDown(p) => self.pointer_down(page, p, &mut out),
            EditorCommand::PointerMove(p) => self.pointer_move(page, p, &mut out),
            EditorCommand::PointerUp(p) => {
                self.drag = None;
                let cursor = self.hover_cursor(page, p);
                self.set_cursor(cursor, &mut out);
            }
            EditorCommand::PointerLeave => {
                self.drag = None;
                self.set_cursor(Cursor::Default, &mut out);
            }
            EditorCommand::DoubleClick(p) => self.double_click(page, p, &mut out),
            EditorCommand::Cancel => self.cancel(page, &mut out),
            EditorCommand::Select(key) => {
                let key = key.filter(|k| page.contains(k));
                self.select(key.as_ref(), &mut out);
            }
            EditorCommand::Delete => self.delete(page, &mut out),
            EditorCommand::Duplicate => self.duplicate(page, &mut out),
            EditorCommand::Arrange(op) => self.arrange(page, op, &mut out),
            EditorCommand::ToggleLock => self.toggle_lock(page, &mut out),
            EditorCommand::Rotate { clockwise } => self.rotate_step(page, clockwise, &mut out),
            EditorCommand::FlipTail => self.flip_tail(page, &mut out),
            EditorCommand::ResetTailControls => self.reset_tail_controls(page, &mut out),
        }
        out
    }

    /// Drops selection ids the host removed behind our back.
    fn forget_missing(&mut self, page: &Page) {
        if let Some(id) = &self.selection.bubble
            && page.bubble(id).is_none()
        {
            self.selection.bubble = None;
        }
        if let Some(id) = &self.selection.character
            && page.character(id).is_none()
        {
            self.selection.character = None;
        }
        let gone = match self.drag.as_ref().map(|d| &d.start) {
            Some(Snapshot::Bubble(b)) => page.bubble(&b.id).is_none(),
            Some(Snapshot::Character(c)) => page.character(&c.id).is_none(),
            None => false,
        };
        if gone {
            tracing::debug!("drag target removed, ending drag");
            self.drag = None;
        }
    }

    fn selected_key(&self) -> Option<ElementKey> {
        self.selection
            .bubble
            .clone()
            .map(ElementKey::Bubble)
            .or_else(|| self.selection.character.clone().map(ElementKey::Character))
    }

    fn select(&mut self, key: Option<&ElementKey>, out: &mut Vec<EditorEvent>) {
        let next = match key {
            Some(ElementKey::Bubble(id)) => Selection::bubble(id.clone()),
            Some(ElementKey::Character(id)) => Selection::character(id.clone()),
            None => Selection::default(),
        };
        if next.bubble != self.selection.bubble {
            out.push(EditorEvent::SelectBubble(next.bubble.clone()));
        }
        if next.character != self.selection.character {
            out.push(EditorEvent::SelectCharacter(next.character.clone()));
        }
        self.selection = next;
    }

    fn set_cursor(&mut self, cursor: Cursor, out: &mut Vec<EditorEvent>) {
        if cursor != self.cursor {
            self.cursor = cursor;
            out.push(EditorEvent::CursorChanged(cursor));
        }
    }

    fn begin(
        &mut self,
        mode: DragMode,
        origin: Point,
        start: Snapshot,
        out: &mut Vec<EditorEvent>,
    ) {
        self.drag = Some(Drag {
            mode,
            origin,
            start,
        });
        self.set_cursor(Cursor::for_drag(mode), out);
    }

    /// Handle of the selected, unlocked element under `p`.
    fn handle_at(&self, page: &Page, p: Point) -> Option<(DragMode, Snapshot)> {
        if let Some(b) = self.selection.bubble.as_deref().and_then(|id| page.bubble(id))
            && !b.locked
            && let Some(mode) = bubble_handle_at(b, p, &self.config)
        {
            return Some((mode, Snapshot::Bubble(b.clone())));
        }
        if let Some(c) = self
            .selection
            .character
            .as_deref()
            .and_then(|id| page.character(id))
            && !c.locked
            && let Some(mode) = character_handle_at(c, p, &self.config)
        {
            return Some((mode, Snapshot::Character(c.clone())));
        }
        None
    }

    fn pointer_down(&mut self, page: &Page, p: Point, out: &mut Vec<EditorEvent>) {
        self.drag = None;
        if let Some((mode, start)) = self.handle_at(page, p) {
            self.begin(mode, p, start, out);
            return;
        }
        let hit = page.hit(p);
        self.select(hit.as_ref(), out);
        match hit {
            Some(ElementKey::Bubble(id)) => {
                if let Some(b) = page.bubble(&id).filter(|b| !b.locked) {
                    self.begin(DragMode::Move, p, Snapshot::Bubble(b.clone()), out);
                }
            }
            Some(ElementKey::Character(id)) => {
                if let Some(c) = page.character(&id).filter(|c| !c.locked) {
                    self.begin(DragMode::CharMove, p, Snapshot::Character(c.clone()), out);
                }
            }
            None => {}
        }
    }

    fn pointer_move(&mut self, page: &mut Page, p: Point, out: &mut Vec<EditorEvent>) {
        let Some(drag) = &self.drag else {
            let cursor = self.hover_cursor(page, p);
            self.set_cursor(cursor, out);
            return;
        };
        match &drag.start {
            Snapshot::Bubble(start) => {
                let patch = bubble_drag_patch(drag.mode, start, drag.origin, p, &self.config);
                if !patch.is_empty() && page.update_bubble(&start.id, &patch) {
                    out.push(EditorEvent::UpdateBubble(start.id.clone(), patch));
                }
            }
            Snapshot::Character(start) => {
                let patch = character_drag_patch(drag.mode, start, drag.origin, p, &self.config);
                if !patch.is_empty() && page.update_character(&start.id, &patch) {
                    out.push(EditorEvent::UpdateCharacter(start.id.clone(), patch));
                }
            }
        }
    }

    fn hover_cursor(&self, page: &Page, p: Point) -> Cursor {
        if let Some((mode, _)) = self.handle_at(page, p) {
            return Cursor::for_drag(mode);
        }
        match page.hit(p) {
            Some(key) if !page.is_locked(&key) => Cursor::Move,
            _ => Cursor::Default,
        }
    }

    fn double_click(&mut self, page: &Page, p: Point, out: &mut Vec<EditorEvent>) {
        self.drag = None;
        let Some(key) = page.hit(p) else {
            return;
        };
        self.select(Some(&key), out);
        if let ElementKey::Bubble(id) = key {
            out.push(EditorEvent::EditBubble(id));
        }
    }

    fn cancel(&mut self, page: &mut Page, out: &mut Vec<EditorEvent>) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        match drag.start {
            Snapshot::Bubble(b) => {
                let patch = BubblePatch {
                    tail_tip: Some(b.tail_tip()),
                    tail_ctrl1: Some(b.tail_ctrl1()),
                    tail_ctrl2: Some(b.tail_ctrl2()),
                    ..BubblePatch::rect(b.rect())
                };
                if page.update_bubble(&b.id, &patch) {
                    out.push(EditorEvent::UpdateBubble(b.id, patch));
                }
            }
            Snapshot::Character(c) => {
                let patch = CharacterPatch {
                    x: Some(c.x),
                    y: Some(c.y),
                    width: Some(c.width),
                    height: Some(c.height),
                    rotation: Some(c.rotation),
                    ..CharacterPatch::default()
                };
                if page.update_character(&c.id, &patch) {
                    out.push(EditorEvent::UpdateCharacter(c.id, patch));
                }
            }
        }
    }

    fn delete(&mut self, page: &mut Page, out: &mut Vec<EditorEvent>) {
        let Some(key) = self.selected_key() else {
            tracing::debug!("delete without selection ignored");
            return;
        };
        self.drag = None;
        if page.remove(&key) {
            self.select(None, out);
            out.push(EditorEvent::Removed(key));
        }
    }

    fn duplicate(&mut self, page: &mut Page, out: &mut Vec<EditorEvent>) {
        let Some(key) = self.selected_key() else {
            tracing::debug!("duplicate without selection ignored");
            return;
        };
        if let Some(copy) = page.duplicate(&key) {
            out.push(EditorEvent::Inserted(copy.clone()));
            self.select(Some(&copy), out);
        }
    }

    fn arrange(&mut self, page: &mut Page, op: Arrange, out: &mut Vec<EditorEvent>) {
        let Some(key) = self.selected_key() else {
            return;
        };
        for (moved, z) in page.arrange(&key, op) {
            out.push(match moved {
                ElementKey::Bubble(id) => EditorEvent::UpdateBubble(
                    id,
                    BubblePatch {
                        z_index: Some(z),
                        ..BubblePatch::default()
                    },
                ),
                ElementKey::Character(id) => EditorEvent::UpdateCharacter(
                    id,
                    CharacterPatch {
                        z_index: Some(z),
                        ..CharacterPatch::default()
                    },
                ),
            });
        }
    }

    fn toggle_lock(&mut self, page: &mut Page, out: &mut Vec<EditorEvent>) {
        let Some(key) = self.selected_key() else {
            return;
        };
        let Some(locked) = page.toggle_lock(&key) else {
            return;
        };
        if locked {
            self.drag = None;
        }
        out.push(match key {
            ElementKey::Bubble(id) => EditorEvent::UpdateBubble(
                id,
                BubblePatch {
                    locked: Some(locked),
                    ..BubblePatch::default()
                },
            ),
            ElementKey::Character(id) => EditorEvent::UpdateCharacter(
                id,
                CharacterPatch {
                    locked: Some(locked),
                    ..CharacterPatch::default()
                },
            ),
        });
    }

    fn rotate_step(&mut self, page: &mut Page, clockwise: bool, out: &mut Vec<EditorEvent>) {
        let Some(c) = self
            .selection
            .character
            .as_deref()
            .and_then(|id| page.character(id))
        else {
            return;
        };
        let step = if clockwise { ROTATE_STEP } else { -ROTATE_STEP };
        let id = c.id.clone();
        let patch = CharacterPatch {
            rotation: Some(c.rotation + step),
            ..CharacterPatch::default()
        };
        if page.update_character(&id, &patch) {
            out.push(EditorEvent::UpdateCharacter(id, patch));
        }
    }

    fn flip_tail(&mut self, page: &mut Page, out: &mut Vec<EditorEvent>) {
        let Some(b) = self
            .selection
            .bubble
            .as_deref()
            .and_then(|id| page.bubble(id))
            .filter(|b| b.has_tail())
        else {
            return;
        };
        let cx = b.center().x;
        let mirror = |p: Point| Point::new(2.0 * cx - p.x, p.y);
        let id = b.id.clone();
        let patch = BubblePatch {
            tail_tip: Some(Some(mirror(resolved_tail_tip(b)))),
            tail_ctrl1: b.tail_ctrl1().map(|p| Some(mirror(p))),
            tail_ctrl2: b.tail_ctrl2().map(|p| Some(mirror(p))),
            ..BubblePatch::default()
        };
        if page.update_bubble(&id, &patch) {
            out.push(EditorEvent::UpdateBubble(id, patch));
        }
    }

    fn reset_tail_controls(&mut self, page: &mut Page, out: &mut Vec<EditorEvent>) {
        let Some(id) = self.selection.bubble.clone() else {
            return;
        };
        let patch = BubblePatch {
            tail_ctrl1: Some(None),
            tail_ctrl2: Some(None),
            ..BubblePatch::default()
        };
        if page.update_bubble(&id, &patch) {
            out.push(EditorEvent::UpdateBubble(id, patch));
        }
    }
}

/// Box of `start` resized by dragging `handle` by `d`, the opposite side
/// anchored and both dimensions kept at least `min`.
pub fn resize_rect(start: Rect, handle: ResizeHandle, d: Vec2, min: f64) -> Rect {
    let (mut x0, mut y0, mut x1, mut y1) = (start.x0, start.y0, start.x1, start.y1);
    let (w, h) = (start.width(), start.height());
    if handle.moves_left() {
        x0 = x1 - (w - d.x).max(min);
    } else if handle.moves_right() {
        x1 = x0 + (w + d.x).max(min);
    }
    if handle.moves_top() {
        y0 = y1 - (h - d.y).max(min);
    } else if handle.moves_bottom() {
        y1 = y0 + (h + d.y).max(min);
    }
    Rect::new(x0, y0, x1, y1)
}

fn bubble_drag_patch(
    mode: DragMode,
    start: &Bubble,
    origin: Point,
    p: Point,
    cfg: &EditorConfig,
) -> BubblePatch {
    let d = p - origin;
    match mode {
        DragMode::Move => BubblePatch {
            x: Some(start.x + d.x),
            y: Some(start.y + d.y),
            ..BubblePatch::default()
        },
        DragMode::Resize(handle) => {
            BubblePatch::rect(resize_rect(start.rect(), handle, d, cfg.min_size))
        }
        DragMode::MoveTail => BubblePatch {
            tail_tip: Some(Some(p)),
            ..BubblePatch::default()
        },
        DragMode::TailCtrl1 => BubblePatch {
            tail_ctrl1: Some(Some(p)),
            ..BubblePatch::default()
        },
        DragMode::TailCtrl2 => BubblePatch {
            tail_ctrl2: Some(Some(p)),
            ..BubblePatch::default()
        },
        _ => BubblePatch::default(),
    }
}

fn character_drag_patch(
    mode: DragMode,
    start: &CharacterOverlay,
    origin: Point,
    p: Point,
    cfg: &EditorConfig,
) -> CharacterPatch {
    let d = p - origin;
    match mode {
        DragMode::CharMove => CharacterPatch {
            x: Some(start.x + d.x),
            y: Some(start.y + d.y),
            ..CharacterPatch::default()
        },
        DragMode::CharResize(corner) => {
            let r = resize_keep_aspect(start.rect(), corner, d.x, cfg.min_size);
            CharacterPatch {
                x: Some(r.x0),
                y: Some(r.y0),
                width: Some(r.width()),
                height: Some(r.height()),
                ..CharacterPatch::default()
            }
        }
        DragMode::CharRotate => {
            let c = start.center();
            let begin = (origin.y - c.y).atan2(origin.x - c.x);
            let now = (p.y - c.y).atan2(p.x - c.x);
            CharacterPatch {
                rotation: Some(start.rotation + (now - begin)),
                ..CharacterPatch::default()
            }
        }
        _ => CharacterPatch::default(),
    }
}

/// Corner resize of an overlay box. Width follows the horizontal drag, height
/// follows the start box's aspect ratio and the opposite corner stays put.
pub fn resize_keep_aspect(start: Rect, corner: Corner, dx: f64, min: f64) -> Rect {
    let (w, h) = (start.width().max(1.0), start.height().max(1.0));
    let aspect = w / h;
    let min_w = min.max(min * aspect);
    let grow = match corner {
        Corner::Br | Corner::Tr => dx,
        Corner::Bl | Corner::Tl => -dx,
    };
    let new_w = (w + grow).max(min_w);
    let new_h = new_w / aspect;
    let x0 = match corner {
        Corner::Bl | Corner::Tl => start.x1 - new_w,
        Corner::Br | Corner::Tr => start.x0,
    };
    let y0 = match corner {
        Corner::Tl | Corner::Tr => start.y1 - new_h,
        Corner::Bl | Corner::Br => start.y0,
    };
    Rect::new(x0, y0, x0 + new_w, y0 + new_h)
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/session.rs"]
mod tests;
