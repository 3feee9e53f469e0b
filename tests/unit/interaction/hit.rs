use super::*;
use crate::bubble::model::TailStyle;

fn bubble(tail: TailStyle) -> Bubble {
    Bubble {
        id: "b".to_string(),
        x: 100.0,
        y: 100.0,
        width: 200.0,
        height: 100.0,
        tail_style: tail,
        ..Bubble::default()
    }
}

#[test]
fn resize_handles_use_a_square_zone() {
    let b = bubble(TailStyle::None);
    let cfg = EditorConfig::default();
    // br handle sits at (304, 204).
    assert_eq!(
        bubble_handle_at(&b, Point::new(313.0, 195.0), &cfg),
        Some(DragMode::Resize(ResizeHandle::Br))
    );
    assert_eq!(bubble_handle_at(&b, Point::new(315.0, 204.0), &cfg), None);
    assert_eq!(
        bubble_handle_at(&b, Point::new(96.0, 150.0), &cfg),
        Some(DragMode::Resize(ResizeHandle::L))
    );
    assert_eq!(bubble_handle_at(&b, Point::new(200.0, 150.0), &cfg), None);
}

#[test]
fn tip_beats_everything_else() {
    let mut b = bubble(TailStyle::Long);
    b.set_tail_tip(Some(Point::new(300.0, 210.0)));
    let cfg = EditorConfig::default();
    // Also inside the br resize zone.
    assert_eq!(
        bubble_handle_at(&b, Point::new(302.0, 206.0), &cfg),
        Some(DragMode::MoveTail)
    );
}

#[test]
fn control_handles_only_for_pointed_tails() {
    let mut b = bubble(TailStyle::Long);
    b.set_tail_tip(Some(Point::new(150.0, 320.0)));
    b.set_tail_ctrl1(Some(Point::new(60.0, 260.0)));
    b.set_tail_ctrl2(Some(Point::new(260.0, 280.0)));
    let cfg = EditorConfig::default();
    assert_eq!(
        bubble_handle_at(&b, Point::new(68.0, 268.0), &cfg),
        Some(DragMode::TailCtrl1)
    );
    assert_eq!(
        bubble_handle_at(&b, Point::new(260.0, 291.0), &cfg),
        Some(DragMode::TailCtrl2)
    );
    // Radius, not square: (9, 9) is farther than 12.
    assert_eq!(bubble_handle_at(&b, Point::new(69.0, 269.0), &cfg), None);

    b.tail_style = TailStyle::DotsHandwritten;
    assert_eq!(bubble_handle_at(&b, Point::new(60.0, 260.0), &cfg), None);
    assert_eq!(
        bubble_handle_at(&b, Point::new(150.0, 320.0), &cfg),
        Some(DragMode::MoveTail)
    );
}

#[test]
fn character_corners_follow_rotation() {
    let mut c = CharacterOverlay {
        id: "c".to_string(),
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        ..CharacterOverlay::default()
    };
    let cfg = EditorConfig::default();
    assert_eq!(
        character_handle_at(&c, Point::new(105.0, 95.0), &cfg),
        Some(DragMode::CharResize(Corner::Br))
    );
    c.rotation = std::f64::consts::FRAC_PI_4;
    // br rotates down onto the vertical through the center.
    let br = Point::new(50.0, 50.0 + 50.0 * std::f64::consts::SQRT_2);
    assert_eq!(
        character_handle_at(&c, br, &cfg),
        Some(DragMode::CharResize(Corner::Br))
    );
    assert_eq!(character_handle_at(&c, Point::new(105.0, 95.0), &cfg), None);
}

#[test]
fn rotate_knob_sits_above_the_top_edge() {
    let c = CharacterOverlay {
        id: "c".to_string(),
        x: 0.0,
        y: 50.0,
        width: 100.0,
        height: 60.0,
        ..CharacterOverlay::default()
    };
    let cfg = EditorConfig::default();
    assert_eq!(
        character_handle_at(&c, Point::new(52.0, 36.0), &cfg),
        Some(DragMode::CharRotate)
    );
    assert_eq!(character_handle_at(&c, Point::new(50.0, 20.0), &cfg), None);
}

#[test]
fn cursor_names() {
    assert_eq!(Cursor::for_drag(DragMode::Resize(ResizeHandle::Tl)).css_name(), "nw-resize");
    assert_eq!(Cursor::for_drag(DragMode::Resize(ResizeHandle::B)).css_name(), "s-resize");
    assert_eq!(Cursor::for_drag(DragMode::TailCtrl2), Cursor::Crosshair);
    assert_eq!(Cursor::for_drag(DragMode::Move), Cursor::Move);
    assert_eq!(Cursor::for_drag(DragMode::None).css_name(), "default");
}
