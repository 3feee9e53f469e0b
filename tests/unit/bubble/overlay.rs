use super::*;
use std::f64::consts::FRAC_PI_2;

fn overlay() -> CharacterOverlay {
    CharacterOverlay {
        id: "c1".to_string(),
        image_url: "hero.png".to_string(),
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 50.0,
        original_width: 200.0,
        original_height: 100.0,
        ..CharacterOverlay::default()
    }
}

#[test]
fn rotate_handle_follows_rotation() {
    let mut c = overlay();
    let h = c.rotate_handle(16.0);
    assert!((h.x - 50.0).abs() < 1e-9 && (h.y + 16.0).abs() < 1e-9);
    c.rotation = FRAC_PI_2;
    let h = c.rotate_handle(16.0);
    // Top edge now faces +x.
    assert!((h.x - 91.0).abs() < 1e-9 && (h.y - 25.0).abs() < 1e-9);
}

#[test]
fn aspect_prefers_original_size() {
    let mut c = overlay();
    assert_eq!(c.aspect(), 2.0);
    c.original_width = 0.0;
    c.width = 30.0;
    c.height = 60.0;
    assert_eq!(c.aspect(), 0.5);
}

#[test]
fn json_uses_editor_field_names() {
    let c: CharacterOverlay = serde_json::from_str(
        r#"{"id":"c","imageUrl":"k","x":1,"y":2,"width":3,"height":4,
            "originalWidth":6,"originalHeight":8,"rotation":0.5,"label":"Hero"}"#,
    )
    .unwrap();
    assert_eq!(c.image_url, "k");
    assert_eq!(c.original_height, 8.0);
    assert_eq!(c.z_index, 0);
    assert_eq!(c.label, "Hero");
    assert!(c.validate().is_ok());
}

#[test]
fn patch_sets_rotation() {
    let mut c = overlay();
    CharacterPatch {
        rotation: Some(1.25),
        ..CharacterPatch::default()
    }
    .apply_to(&mut c);
    assert_eq!(c.rotation, 1.25);
    assert_eq!(c.width, 100.0);
}
