use super::*;

#[test]
fn new_raster_is_blank() {
    let r = Raster::new(4, 3).unwrap();
    assert!(r.is_blank());
    assert_eq!(r.data().len(), 4 * 3 * 4);
    assert!(Raster::new(0, 3).is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(Raster::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Raster::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn one_visible_pixel_is_not_blank() {
    let mut r = Raster::new(2, 2).unwrap();
    r.data_mut()[7] = 1;
    assert!(!r.is_blank());
    assert_eq!(r.pixel(1, 0), Some([0, 0, 0, 1]));
    assert_eq!(r.pixel(2, 0), None);
}

#[test]
fn mask_binarizes_any_coverage() {
    let mut r = Raster::new(3, 1).unwrap();
    r.data_mut()[3] = 1;
    r.data_mut()[7] = 255;
    let m = r.to_mask();
    assert_eq!(m.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(m.pixel(1, 0), Some([255, 255, 255, 255]));
    assert_eq!(m.pixel(2, 0), Some([0, 0, 0, 255]));
}

#[test]
fn composite_rejects_size_mismatch() {
    let mut a = Raster::new(2, 2).unwrap();
    let b = Raster::new(3, 2).unwrap();
    assert!(a.composite(&b, Blend::Over, 1.0).is_err());
}

#[test]
fn straight_conversion_undoes_premultiplication() {
    let r = Raster::from_premul(1, 1, vec![64, 32, 0, 128]).unwrap();
    let s = r.to_straight_rgba8();
    assert_eq!(s[3], 128);
    assert!((i32::from(s[0]) - 128).abs() <= 1);
    assert!((i32::from(s[1]) - 64).abs() <= 1);
}
