use super::*;
use crate::drawing::layer::LayerKind;

const DOC: &str = r##"{
  "width": 40,
  "height": 20,
  "ops": [
    { "op": "tool", "tool": "brush", "brush": "marker", "size": 8 },
    { "op": "stroke", "points": [ { "x": 2, "y": 10 }, { "x": 20, "y": 10 }, { "x": 38, "y": 10 } ] },
    { "op": "tool", "tool": "line", "line": "straight", "color": "#f00", "size": 3 },
    { "op": "down", "x": 20, "y": 1 },
    { "op": "move", "x": 20, "y": 19 },
    { "op": "up", "x": 20, "y": 19 },
    { "op": "undo" },
    { "op": "redo" },
    { "op": "text", "x": 1, "y": 1, "text": "skipped without fonts" }
  ]
}"##;

#[test]
fn parses_ops_with_defaults() {
    let doc = DrawingDocument::from_json(DOC).unwrap();
    assert_eq!((doc.width, doc.height), (40, 20));
    assert!(doc.background.is_none());
    assert_eq!(doc.ops.len(), 9);
    match &doc.ops[1] {
        DrawOp::Stroke { points } => assert_eq!(points[0].pressure, 0.5),
        other => panic!("unexpected {other:?}"),
    }
    match &doc.ops[8] {
        DrawOp::Text { size, color, .. } => {
            assert_eq!(*size, 24.0);
            assert_eq!(*color, Rgba8::BLACK);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn replay_drives_the_engine() {
    let doc = DrawingDocument::from_json(DOC).unwrap();
    let mut engine = DrawingEngine::default();
    assert_eq!(doc.replay(&mut engine).unwrap(), 2);
    let kinds: Vec<LayerKind> = engine.layers().layers().iter().map(|l| l.kind).collect();
    assert_eq!(kinds, [LayerKind::Freehand, LayerKind::Straight]);
    let mask = engine.mask().unwrap().unwrap();
    assert_eq!(mask.pixel(10, 10).unwrap(), [255, 255, 255, 255]);
    assert_eq!(mask.pixel(20, 2).unwrap(), [255, 255, 255, 255]);
    assert_eq!(mask.pixel(5, 2).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn rejects_unknown_ops() {
    let err = DrawingDocument::from_json(r#"{"width":1,"height":1,"ops":[{"op":"smudge"}]}"#)
        .unwrap_err();
    assert!(matches!(err, InkError::Serde(_)));
}
