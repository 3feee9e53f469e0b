use super::*;

fn sp(x: f64, y: f64) -> StylusPoint {
    StylusPoint::new(x, y, 0.5)
}

#[test]
fn tool_settings_json_shape() {
    let s: ToolSettings =
        serde_json::from_str(r##"{"tool":"brush","brush":"highlighter","color":"#ff0","size":6}"##)
            .unwrap();
    assert_eq!(
        s.tool,
        Tool::Brush {
            brush: BrushKind::Highlighter
        }
    );
    assert_eq!(s.color, Rgba8::rgb(255, 255, 0));
    assert_eq!(s.opacity, 1.0);
    assert_eq!(s.layer_blend(), Blend::Multiply);

    let e: ToolSettings = serde_json::from_str(r#"{"tool":"eraser","size":20}"#).unwrap();
    assert_eq!(e.tool, Tool::Eraser);
    assert_eq!(e.layer_blend(), Blend::DestOut);
}

#[test]
fn a_tap_leaves_a_dot() {
    let s = ToolSettings::brush(BrushKind::Marker, Rgba8::BLACK, 10.0, 1.0);
    let g = Gesture::begin_stroke(&s, sp(10.0, 10.0));
    let r = rasterize(&g.final_marks(&s), 20, 20).unwrap();
    assert!(r.pixel(10, 10).unwrap()[3] > 0);
    assert_eq!(r.pixel(0, 0).unwrap()[3], 0);
}

#[test]
fn strokes_add_one_mark_per_sample() {
    let s = ToolSettings::brush(BrushKind::Ballpoint, Rgba8::BLACK, 4.0, 1.0);
    let mut g = Gesture::begin_stroke(&s, sp(0.0, 0.0));
    g.extend_stroke(&s, sp(10.0, 0.0));
    g.extend_stroke(&s, sp(20.0, 5.0));
    let Gesture::Stroke { points, marks } = &g else {
        panic!("not a stroke");
    };
    assert_eq!(points.len(), 3);
    assert_eq!(marks.len(), 3);
    assert_eq!(g.last_sample(), Some(Point::new(20.0, 5.0)));
    assert_eq!(g.layer_kind(&s), LayerKind::Freehand);
}

#[test]
fn curve_guide_is_preview_only() {
    let s = ToolSettings::line(LineTool::Curve, Rgba8::BLACK, 3.0, 1.0);
    let g = Gesture::CurveStart {
        start: Point::new(0.0, 0.0),
        cursor: Some(Point::new(10.0, 10.0)),
    };
    assert_eq!(g.preview_marks(&s).len(), 1);
    assert!(g.final_marks(&s).is_empty());
    assert_eq!(g.layer_kind(&s), LayerKind::Curve);
}

#[test]
fn polyline_needs_two_vertices() {
    let s = ToolSettings::line(LineTool::Polyline, Rgba8::BLACK, 3.0, 1.0);
    let mut points = Vec::new();
    Gesture::push_vertex(&mut points, Point::new(5.0, 5.0));
    Gesture::push_vertex(&mut points, Point::new(5.2, 5.0));
    assert_eq!(points.len(), 1);
    let g = Gesture::Polyline {
        points: points.clone(),
        cursor: Some(Point::new(30.0, 5.0)),
    };
    assert_eq!(g.preview_marks(&s).len(), 1);
    assert!(g.final_marks(&s).is_empty());

    Gesture::push_vertex(&mut points, Point::new(30.0, 5.0));
    let g = Gesture::Polyline {
        points,
        cursor: None,
    };
    assert_eq!(g.final_marks(&s).len(), 1);
}

#[test]
fn eraser_gestures_make_eraser_layers() {
    let s = ToolSettings::eraser(8.0);
    let mut g = Gesture::begin_stroke(&s, sp(5.0, 5.0));
    g.extend_stroke(&s, sp(15.0, 5.0));
    assert_eq!(g.layer_kind(&s), LayerKind::Eraser);
    let r = rasterize(&g.final_marks(&s), 20, 10).unwrap();
    assert_eq!(r.pixel(10, 5).unwrap()[3], 255);
}
