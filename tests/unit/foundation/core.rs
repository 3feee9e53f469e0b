use super::*;

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 70_000).is_err());
    let c = Canvas::new(640, 480).unwrap();
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 640.0, 480.0));
}

#[test]
fn hex_colors_parse_in_all_forms() {
    assert_eq!(Rgba8::parse_hex("#222").unwrap(), Rgba8::INK);
    assert_eq!(Rgba8::parse_hex("#ffffff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::parse_hex("#10203040").unwrap(),
        Rgba8::rgba(0x10, 0x20, 0x30, 0x40)
    );
    assert!(Rgba8::parse_hex("222222").is_err());
    assert!(Rgba8::parse_hex("#12345").is_err());
    assert!(Rgba8::parse_hex("#zzzzzz").is_err());
}

#[test]
fn hex_serde_shape_is_a_string() {
    let c = Rgba8::rgba(1, 2, 3, 4);
    let s = serde_json::to_string(&c).unwrap();
    assert_eq!(s, "\"#01020304\"");
    let back: Rgba8 = serde_json::from_str(&s).unwrap();
    assert_eq!(back, c);
    assert_eq!(
        serde_json::to_string(&Rgba8::WHITE).unwrap(),
        "\"#ffffff\""
    );
}

#[test]
fn with_opacity_scales_alpha_only() {
    let c = Rgba8::rgb(10, 20, 30).with_opacity(0.5);
    assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 128));
    assert_eq!(Rgba8::WHITE.with_opacity(f32::NAN).a, 255);
}

#[test]
fn premul_matches_straight_when_opaque() {
    let p = Rgba8::rgb(200, 100, 50).premul();
    assert_eq!(p.to_array(), [200, 100, 50, 255]);
    assert_eq!(Rgba8::TRANSPARENT.premul(), Rgba8Premul::transparent());
}
