use super::*;

#[test]
fn png_round_trips_through_image_crate() {
    let raster = Raster::from_premul(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
    let bytes = encode_raster(&raster, ExportFormat::Png).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
}

#[test]
fn jpeg_flattens_transparency_onto_white() {
    let raster = Raster::new(8, 8).unwrap();
    let bytes = encode_raster(&raster, ExportFormat::Jpeg).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert!(decoded.get_pixel(4, 4).0.iter().all(|&c| c > 245));
}

#[test]
fn format_from_extension() {
    assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
    assert_eq!(ExportFormat::from_extension("jpg"), Some(ExportFormat::Jpeg));
    assert_eq!(ExportFormat::from_extension("gif"), None);
}
