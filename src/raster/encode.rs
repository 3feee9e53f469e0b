use std::io::Cursor;

use anyhow::Context;

use crate::{foundation::error::InkResult, raster::surface::Raster};

/// Encoded output format for exported rasters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    /// Flattened onto white; JPEG has no alpha channel.
    Jpeg,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

pub fn encode_raster(raster: &Raster, format: ExportFormat) -> InkResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ExportFormat::Png => {
            let img = image::RgbaImage::from_raw(
                raster.width(),
                raster.height(),
                raster.to_straight_rgba8(),
            )
            .context("wrap raster as rgba image")?;
            img.write_to(&mut out, image::ImageFormat::Png)
                .context("encode png")?;
        }
        ExportFormat::Jpeg => {
            let mut rgb =
                Vec::with_capacity(raster.width() as usize * raster.height() as usize * 3);
            for px in raster.data().chunks_exact(4) {
                // Premultiplied source over white.
                let inv = 255 - u16::from(px[3]);
                for &c in &px[..3] {
                    rgb.push((u16::from(c) + inv).min(255) as u8);
                }
            }
            let img = image::RgbImage::from_raw(raster.width(), raster.height(), rgb)
                .context("wrap raster as rgb image")?;
            img.write_to(&mut out, image::ImageFormat::Jpeg)
                .context("encode jpeg")?;
        }
    }
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/encode.rs"]
mod tests;
