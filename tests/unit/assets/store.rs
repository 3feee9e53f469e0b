use super::*;

fn one_pixel_png() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, vec![255, 255, 255, 255]).unwrap();
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn request_then_complete_signals_one_rerender() {
    let mut store = ImageStore::new();
    assert!(store.request("bg"));
    assert!(!store.request("bg"));
    assert!(store.get("bg").is_none());
    assert_eq!(store.pending_keys().collect::<Vec<_>>(), vec!["bg"]);

    let png = one_pixel_png();
    assert!(store.complete("bg", Ok(&png)));
    assert!(store.get("bg").is_some());
    // A duplicate completion does not trigger a second re-render.
    assert!(!store.complete("bg", Ok(&png)));
    assert_eq!(store.pending_keys().count(), 0);
}

#[test]
fn decode_failure_parks_slot_without_retry() {
    let mut store = ImageStore::new();
    store.request("char");
    assert!(store.complete("char", Ok(b"garbage")));
    assert!(matches!(store.slot("char"), Some(ImageSlot::Failed(_))));
    assert!(store.get("char").is_none());
    assert!(!store.request("char"));
}

#[test]
fn fetch_error_is_recorded() {
    let mut store = ImageStore::new();
    store.request("tpl");
    assert!(store.complete("tpl", Err("404".to_string())));
    match store.slot("tpl") {
        Some(ImageSlot::Failed(reason)) => assert_eq!(reason, "404"),
        other => panic!("unexpected slot {other:?}"),
    }
}
