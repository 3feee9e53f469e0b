use super::*;

#[test]
fn editor_json_shape_round_trips() {
    let json = r##"{
        "id": "b1",
        "seed": 42,
        "x": 10, "y": 20, "width": 200, "height": 100,
        "text": "hi",
        "style": "flash_dense",
        "tailStyle": "dots_handwritten",
        "tailDirection": "left",
        "tailTipX": 1.5, "tailTipY": 2.5,
        "tailCtrl1X": 3, "tailCtrl1Y": 4,
        "fillColor": "#ffeeaa",
        "drawMode": "stroke_only",
        "flashLineCount": 80,
        "shapeSides": 5,
        "zIndex": 3,
        "groupId": "g",
        "locked": true
    }"##;
    let b: Bubble = serde_json::from_str(json).unwrap();
    assert_eq!(b.style, BubbleStyle::FlashDense);
    assert_eq!(b.tail_style, TailStyle::DotsHandwritten);
    assert_eq!(b.tail_direction, TailDirection::Left);
    assert_eq!(b.tail_tip(), Some(Point::new(1.5, 2.5)));
    assert_eq!(b.tail_ctrl1(), Some(Point::new(3.0, 4.0)));
    assert_eq!(b.tail_ctrl2(), None);
    assert_eq!(b.fill_color, Rgba8::rgb(0xff, 0xee, 0xaa));
    assert_eq!(b.draw_mode, DrawMode::StrokeOnly);
    assert_eq!(b.shape.flash_line_count, Some(80));
    assert_eq!(b.shape.shape_sides, Some(5));
    assert_eq!(b.z_index, 3);
    assert!(b.locked);

    let again: Bubble = serde_json::from_value(serde_json::to_value(&b).unwrap()).unwrap();
    assert_eq!(again, b);
}

#[test]
fn missing_fields_take_editor_defaults() {
    let b: Bubble = serde_json::from_str(r#"{"id":"a","x":0,"y":0}"#).unwrap();
    assert_eq!((b.width, b.height), (140.0, 60.0));
    assert_eq!(b.tail_style, TailStyle::Short);
    assert_eq!(b.z_index, DEFAULT_BUBBLE_Z);
    assert_eq!(b.stroke_width, 2.0);
    assert_eq!(b.tail_base_spread(), 8.0);
    assert_eq!(b.tail_curve(), 0.5);
    assert_eq!(b.tail_jitter(), 1.0);
    assert_eq!(b.fill_color, Rgba8::WHITE);
}

#[test]
fn half_set_tail_point_counts_as_unset() {
    let b = Bubble {
        tail_tip_x: Some(5.0),
        ..Bubble::default()
    };
    assert_eq!(b.tail_tip(), None);
}

#[test]
fn patch_applies_only_present_fields() {
    let mut b = Bubble::new("a", Point::new(100.0, 100.0), 1);
    b.set_tail_ctrl1(Some(Point::new(1.0, 1.0)));
    let patch = BubblePatch {
        width: Some(300.0),
        tail_ctrl1: Some(None),
        ..BubblePatch::default()
    };
    patch.apply_to(&mut b);
    assert_eq!(b.width, 300.0);
    assert_eq!(b.x, 30.0);
    assert_eq!(b.tail_ctrl1(), None);
    assert!(BubblePatch::default().is_empty());
}

#[test]
fn validate_rejects_bad_bubbles() {
    assert!(Bubble::default().validate().is_err());
    let ok = Bubble::new("a", Point::ZERO, 0);
    assert!(ok.validate().is_ok());
    let nan = Bubble {
        width: f64::NAN,
        ..ok.clone()
    };
    assert!(nan.validate().is_err());
    let image = Bubble {
        style: BubbleStyle::Image,
        ..ok
    };
    assert!(image.validate().is_err());
}

#[test]
fn draw_mode_flags() {
    assert!(DrawMode::Both.fills() && DrawMode::Both.strokes());
    assert!(!DrawMode::StrokeOnly.fills());
    assert!(!DrawMode::FillOnly.strokes());
}
