use super::*;

#[test]
fn empty_book_measures_with_fallback_advance() {
    let mut book = FontBook::new();
    assert!(!book.has_fonts());
    assert!((book.advance("any", "ab", 10.0) - 11.0).abs() < 1e-9);
    assert!((book.advance("any", "가나", 10.0) - 20.0).abs() < 1e-9);
    assert!(book.shape_line("any", "ab", 10.0, Rgba8::INK).unwrap().is_none());
}

#[test]
fn invalid_font_bytes_are_rejected() {
    let mut book = FontBook::new();
    assert!(book.register("broken", b"not a font".to_vec()).is_err());
    assert!(!book.has_fonts());
}

#[test]
fn non_positive_size_is_rejected() {
    let mut book = FontBook::new();
    assert!(book.shape_line("k", "x", 0.0, Rgba8::INK).is_err());
}

#[test]
fn brush_from_color_copies_channels() {
    let b = TextBrush::from(Rgba8::rgba(1, 2, 3, 4));
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}

#[test]
fn unknown_key_without_default_resolves_to_none() {
    let book = FontBook::new();
    let key = String::from("missing");
    assert_eq!(book.resolve_key(&key), None);
}
