use super::*;
use crate::{bubble::model::TailStyle, foundation::core::Canvas};
use std::f64::consts::FRAC_PI_2;

fn page() -> Page {
    let mut page = Page::new("p", Canvas::new(600, 600).unwrap());
    page.bubbles.push(Bubble {
        id: "a".to_string(),
        x: 50.0,
        y: 50.0,
        width: 100.0,
        height: 80.0,
        tail_style: TailStyle::None,
        ..Bubble::default()
    });
    page.characters.push(CharacterOverlay {
        id: "hero".to_string(),
        image_url: "hero.png".to_string(),
        x: 300.0,
        y: 300.0,
        width: 100.0,
        height: 50.0,
        ..CharacterOverlay::default()
    });
    page
}

fn down(s: &mut EditorSession, page: &mut Page, x: f64, y: f64) -> Vec<EditorEvent> {
    s.apply(page, EditorCommand::PointerDown(Point::new(x, y)))
}

fn drag(s: &mut EditorSession, page: &mut Page, x: f64, y: f64) -> Vec<EditorEvent> {
    s.apply(page, EditorCommand::PointerMove(Point::new(x, y)))
}

fn up(s: &mut EditorSession, page: &mut Page) {
    s.apply(page, EditorCommand::PointerUp(Point::ZERO));
}

fn select_a(s: &mut EditorSession, page: &mut Page) {
    down(s, page, 75.0, 75.0);
    up(s, page);
}

#[test]
fn click_selects_and_starts_move() {
    let mut p = page();
    let mut s = EditorSession::default();
    let ev = down(&mut s, &mut p, 75.0, 75.0);
    assert_eq!(
        ev,
        [
            EditorEvent::SelectBubble(Some("a".to_string())),
            EditorEvent::CursorChanged(Cursor::Move),
        ]
    );
    assert_eq!(s.drag_mode(), DragMode::Move);
    let ev = drag(&mut s, &mut p, 85.0, 70.0);
    assert_eq!(
        ev,
        [EditorEvent::UpdateBubble(
            "a".to_string(),
            BubblePatch {
                x: Some(60.0),
                y: Some(45.0),
                ..BubblePatch::default()
            }
        )]
    );
    assert_eq!((p.bubbles[0].x, p.bubbles[0].y), (60.0, 45.0));

    up(&mut s, &mut p);
    assert_eq!(s.drag_mode(), DragMode::None);
    let ev = drag(&mut s, &mut p, 300.0, 90.0);
    assert!(!ev.iter().any(|e| matches!(e, EditorEvent::UpdateBubble(..))));
}

#[test]
fn bottom_left_resize_keeps_the_top_right_anchor() {
    let mut p = page();
    let mut s = EditorSession::default();
    select_a(&mut s, &mut p);
    // bl handle sits 4 px outside the corner.
    down(&mut s, &mut p, 46.0, 134.0);
    assert_eq!(s.drag_mode(), DragMode::Resize(ResizeHandle::Bl));
    drag(&mut s, &mut p, 16.0, 154.0);
    let b = &p.bubbles[0];
    assert_eq!((b.x, b.y, b.width, b.height), (20.0, 50.0, 130.0, 100.0));
}

#[test]
fn resize_never_goes_below_min_size() {
    let start = Rect::new(50.0, 50.0, 150.0, 130.0);
    for handle in ResizeHandle::ALL {
        for d in [Vec2::new(-500.0, -500.0), Vec2::new(500.0, 500.0), Vec2::new(90.0, -75.0)] {
            let r = resize_rect(start, handle, d, 20.0);
            assert!(r.width() >= 20.0 && r.height() >= 20.0, "{handle:?} {d:?}");
        }
    }
    let r = resize_rect(start, ResizeHandle::Tl, Vec2::new(500.0, 500.0), 20.0);
    assert_eq!(r, Rect::new(130.0, 110.0, 150.0, 130.0));
    let r = resize_rect(start, ResizeHandle::R, Vec2::new(10.0, 99.0), 20.0);
    assert_eq!(r, Rect::new(50.0, 50.0, 160.0, 130.0));
}

#[test]
fn locked_elements_select_but_never_drag() {
    let mut p = page();
    p.bubbles[0].locked = true;
    let mut s = EditorSession::default();
    let ev = down(&mut s, &mut p, 75.0, 75.0);
    assert_eq!(ev, [EditorEvent::SelectBubble(Some("a".to_string()))]);
    assert_eq!(s.drag_mode(), DragMode::None);
    assert!(drag(&mut s, &mut p, 95.0, 95.0).is_empty());
    // Handles are not offered either.
    down(&mut s, &mut p, 46.0, 134.0);
    assert_eq!(s.drag_mode(), DragMode::None);
    assert_eq!(p.bubbles[0].x, 50.0);
}

#[test]
fn selecting_one_kind_clears_the_other() {
    let mut p = page();
    let mut s = EditorSession::default();
    select_a(&mut s, &mut p);
    let ev = down(&mut s, &mut p, 350.0, 320.0);
    assert_eq!(
        &ev[..2],
        [
            EditorEvent::SelectBubble(None),
            EditorEvent::SelectCharacter(Some("hero".to_string())),
        ]
    );
    assert_eq!(s.drag_mode(), DragMode::CharMove);
    up(&mut s, &mut p);

    let ev = down(&mut s, &mut p, 590.0, 10.0);
    assert_eq!(ev, [EditorEvent::SelectCharacter(None)]);
    assert!(s.selection().is_empty());
}

#[test]
fn cancel_restores_drag_start() {
    let mut p = page();
    let mut s = EditorSession::default();
    select_a(&mut s, &mut p);
    down(&mut s, &mut p, 154.0, 134.0);
    drag(&mut s, &mut p, 300.0, 300.0);
    assert_eq!(p.bubbles[0].width, 246.0);
    let ev = s.apply(&mut p, EditorCommand::Cancel);
    assert_eq!(ev.len(), 1);
    assert_eq!(p.bubbles[0].rect(), Rect::new(50.0, 50.0, 150.0, 130.0));
    assert_eq!(s.drag_mode(), DragMode::None);
    // Nothing to cancel now.
    assert!(s.apply(&mut p, EditorCommand::Cancel).is_empty());
}

#[test]
fn tail_handles_set_explicit_points() {
    let mut p = page();
    p.bubbles[0].tail_style = TailStyle::Long;
    p.bubbles[0].set_tail_tip(Some(Point::new(100.0, 250.0)));
    let mut s = EditorSession::default();
    select_a(&mut s, &mut p);
    down(&mut s, &mut p, 102.0, 248.0);
    assert_eq!(s.drag_mode(), DragMode::MoveTail);
    drag(&mut s, &mut p, 180.0, 260.0);
    assert_eq!(p.bubbles[0].tail_tip(), Some(Point::new(180.0, 260.0)));
    up(&mut s, &mut p);

    p.bubbles[0].set_tail_ctrl1(Some(Point::new(20.0, 200.0)));
    down(&mut s, &mut p, 22.0, 203.0);
    assert_eq!(s.drag_mode(), DragMode::TailCtrl1);
    drag(&mut s, &mut p, 10.0, 190.0);
    assert_eq!(p.bubbles[0].tail_ctrl1(), Some(Point::new(10.0, 190.0)));
}

#[test]
fn rotate_handle_turns_about_the_center() {
    let mut p = page();
    let c = &mut p.characters[0];
    (c.x, c.y, c.width, c.height) = (0.0, 0.0, 100.0, 100.0);
    c.rotation = 0.25;
    let mut s = EditorSession::default();
    s.apply(&mut p, EditorCommand::Select(Some(ElementKey::Character("hero".to_string()))));
    let knob = p.characters[0].rotate_handle(16.0);
    down(&mut s, &mut p, knob.x, knob.y);
    assert_eq!(s.drag_mode(), DragMode::CharRotate);
    let start = (knob.y - 50.0).atan2(knob.x - 50.0);
    let end = start + FRAC_PI_2;
    drag(&mut s, &mut p, 50.0 + 66.0 * end.cos(), 50.0 + 66.0 * end.sin());
    assert!((p.characters[0].rotation - (0.25 + FRAC_PI_2)).abs() < 1e-9);
}

#[test]
fn corner_resize_keeps_start_aspect() {
    let start = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(
        resize_keep_aspect(start, Corner::Br, 50.0, 20.0),
        Rect::new(0.0, 0.0, 150.0, 75.0)
    );
    // Shrinking stops once the short side hits the minimum.
    assert_eq!(
        resize_keep_aspect(start, Corner::Tl, 200.0, 20.0),
        Rect::new(60.0, 30.0, 100.0, 50.0)
    );
    let r = resize_keep_aspect(start, Corner::Bl, -20.0, 20.0);
    assert_eq!(r, Rect::new(-20.0, 0.0, 100.0, 60.0));
}

#[test]
fn corner_drag_updates_the_overlay() {
    let mut p = page();
    let mut s = EditorSession::default();
    down(&mut s, &mut p, 350.0, 320.0);
    up(&mut s, &mut p);
    down(&mut s, &mut p, 400.0, 350.0);
    assert_eq!(s.drag_mode(), DragMode::CharResize(Corner::Br));
    drag(&mut s, &mut p, 500.0, 350.0);
    let c = &p.characters[0];
    assert_eq!((c.width, c.height), (200.0, 100.0));
}

#[test]
fn double_click_requests_text_edit() {
    let mut p = page();
    let mut s = EditorSession::default();
    let ev = s.apply(&mut p, EditorCommand::DoubleClick(Point::new(60.0, 60.0)));
    assert_eq!(
        ev,
        [
            EditorEvent::SelectBubble(Some("a".to_string())),
            EditorEvent::EditBubble("a".to_string()),
        ]
    );
    assert!(s.apply(&mut p, EditorCommand::DoubleClick(Point::new(550.0, 550.0))).is_empty());
}

#[test]
fn double_click_on_character_above_bubble_selects_it() {
    let mut p = page();
    let hero = &mut p.characters[0];
    hero.x = 40.0;
    hero.y = 40.0;
    hero.z_index = p.bubbles[0].z_index + 1;
    let mut s = EditorSession::default();
    let ev = s.apply(&mut p, EditorCommand::DoubleClick(Point::new(60.0, 60.0)));
    assert_eq!(ev, [EditorEvent::SelectCharacter(Some("hero".to_string()))]);
}

#[test]
fn release_restores_hover_cursor() {
    let mut p = page();
    let mut s = EditorSession::default();
    down(&mut s, &mut p, 75.0, 75.0);
    drag(&mut s, &mut p, 95.0, 75.0);
    assert_eq!(s.cursor(), Cursor::Move);
    let ev = s.apply(&mut p, EditorCommand::PointerUp(Point::new(590.0, 590.0)));
    assert_eq!(ev, [EditorEvent::CursorChanged(Cursor::Default)]);
    assert_eq!(s.drag_mode(), DragMode::None);
}

#[test]
fn hover_reports_cursor_changes_once() {
    let mut p = page();
    let mut s = EditorSession::default();
    assert_eq!(drag(&mut s, &mut p, 75.0, 75.0), [EditorEvent::CursorChanged(Cursor::Move)]);
    assert!(drag(&mut s, &mut p, 76.0, 75.0).is_empty());
    select_a(&mut s, &mut p);
    assert_eq!(
        drag(&mut s, &mut p, 46.0, 134.0),
        [EditorEvent::CursorChanged(Cursor::SwResize)]
    );
    assert_eq!(
        drag(&mut s, &mut p, 590.0, 590.0),
        [EditorEvent::CursorChanged(Cursor::Default)]
    );
}

#[test]
fn arrange_reports_every_moved_element() {
    let mut p = page();
    let mut b = p.bubbles[0].clone();
    b.id = "b".to_string();
    b.x = 400.0;
    b.z_index = 11;
    p.bubbles.push(b);
    let mut s = EditorSession::default();
    select_a(&mut s, &mut p);
    let ev = s.apply(&mut p, EditorCommand::Arrange(Arrange::BringForward));
    assert_eq!(ev.len(), 2);
    assert_eq!(p.bubble("a").unwrap().z_index, 11);
    assert_eq!(p.bubble("b").unwrap().z_index, 10);
}

#[test]
fn duplicate_then_delete() {
    let mut p = page();
    let mut s = EditorSession::default();
    select_a(&mut s, &mut p);
    let ev = s.apply(&mut p, EditorCommand::Duplicate);
    let EditorEvent::Inserted(ElementKey::Bubble(copy)) = &ev[0] else {
        panic!("expected insert, got {ev:?}");
    };
    assert_eq!(ev[1], EditorEvent::SelectBubble(Some(copy.clone())));
    assert_eq!(p.bubble(copy).unwrap().x, 74.0);

    let ev = s.apply(&mut p, EditorCommand::Delete);
    assert_eq!(
        ev,
        [
            EditorEvent::SelectBubble(None),
            EditorEvent::Removed(ElementKey::Bubble(copy.clone())),
        ]
    );
    assert_eq!(p.bubbles.len(), 1);
}

#[test]
fn flip_and_reset_tail() {
    let mut p = page();
    let b = &mut p.bubbles[0];
    b.tail_style = TailStyle::Long;
    b.set_tail_tip(Some(Point::new(60.0, 150.0)));
    b.set_tail_ctrl1(Some(Point::new(70.0, 120.0)));
    let mut s = EditorSession::default();
    select_a(&mut s, &mut p);
    s.apply(&mut p, EditorCommand::FlipTail);
    let b = &p.bubbles[0];
    assert_eq!(b.tail_tip(), Some(Point::new(140.0, 150.0)));
    assert_eq!(b.tail_ctrl1(), Some(Point::new(130.0, 120.0)));
    assert_eq!(b.tail_ctrl2(), None);

    s.apply(&mut p, EditorCommand::ResetTailControls);
    assert_eq!(p.bubbles[0].tail_ctrl1(), None);
    assert_eq!(p.bubbles[0].tail_tip(), Some(Point::new(140.0, 150.0)));
}

#[test]
fn lock_and_rotate_step() {
    let mut p = page();
    let mut s = EditorSession::default();
    s.apply(&mut p, EditorCommand::Select(Some(ElementKey::Character("hero".to_string()))));
    s.apply(&mut p, EditorCommand::Rotate { clockwise: false });
    assert!((p.characters[0].rotation + ROTATE_STEP).abs() < 1e-12);
    let ev = s.apply(&mut p, EditorCommand::ToggleLock);
    assert_eq!(
        ev,
        [EditorEvent::UpdateCharacter(
            "hero".to_string(),
            CharacterPatch {
                locked: Some(true),
                ..CharacterPatch::default()
            }
        )]
    );
    assert!(p.characters[0].locked);
}

#[test]
fn removed_drag_target_ends_the_drag() {
    let mut p = page();
    let mut s = EditorSession::default();
    down(&mut s, &mut p, 75.0, 75.0);
    p.bubbles.clear();
    assert!(
        drag(&mut s, &mut p, 90.0, 90.0)
            .iter()
            .all(|e| matches!(e, EditorEvent::CursorChanged(_)))
    );
    assert_eq!(s.drag_mode(), DragMode::None);
    assert_eq!(s.selection().bubble, None);
}
