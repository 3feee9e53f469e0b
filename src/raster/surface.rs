use crate::{
    foundation::{
        core::Rgba8Premul,
        error::{InkError, InkResult},
    },
    raster::blend::{Blend, blend_in_place},
};

/// Premultiplied RGBA8 pixel buffer, row-major, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Raster {
    /// Fully transparent raster.
    pub fn new(width: u32, height: u32) -> InkResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> InkResult<Self> {
        check_dims(width, height)?;
        if data.len() != width as usize * height as usize * 4 {
            return Err(InkError::render("raster byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// True when every alpha byte is zero.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    pub fn same_size(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Draw `src` onto this raster with `blend` at `opacity`.
    pub fn composite(&mut self, src: &Raster, blend: Blend, opacity: f32) -> InkResult<()> {
        if !self.same_size(src) {
            return Err(InkError::render(format!(
                "composite size mismatch: {}x{} onto {}x{}",
                src.width, src.height, self.width, self.height
            )));
        }
        blend_in_place(&mut self.data, &src.data, blend, opacity)
    }

    /// Binarize coverage: any alpha > 0 becomes opaque white, the rest opaque black.
    pub fn to_mask(&self) -> Raster {
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let v = if px[3] > 0 { 255 } else { 0 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
        Raster {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

fn check_dims(width: u32, height: u32) -> InkResult<()> {
    if width == 0 || height == 0 {
        return Err(InkError::render("raster width/height must be > 0"));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(InkError::render("raster width/height exceed u16"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
