use crate::foundation::{
    error::{InkError, InkResult},
    math::mul_div255,
};

pub type PremulRgba8 = [u8; 4];

/// Pixel compositing operator applied when one raster is drawn onto another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blend {
    /// Source-over.
    #[default]
    Over,
    /// Destination-out: source alpha removes coverage from the destination.
    DestOut,
    /// Multiply, used by the highlighter brush.
    Multiply,
}

pub fn blend_pixel(dst: PremulRgba8, src: PremulRgba8, blend: Blend, opacity: f32) -> PremulRgba8 {
    match blend {
        Blend::Over => over(dst, src, opacity),
        Blend::DestOut => dest_out(dst, src, opacity),
        Blend::Multiply => multiply(dst, src, opacity),
    }
}

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let Some((op, sa)) = effective_alpha(src, opacity) else {
        return dst;
    };
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn dest_out(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let Some((_, sa)) = effective_alpha(src, opacity) else {
        return dst;
    };
    let keep = 255u16 - u16::from(sa);
    dst.map(|c| mul_div255(u16::from(c), keep))
}

pub fn multiply(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let Some((op, sa)) = effective_alpha(src, opacity) else {
        return dst;
    };
    let da = u16::from(dst[3]);
    let inv_sa = 255u16 - u16::from(sa);
    let inv_da = 255u16 - da;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = u16::from(mul_div255(u16::from(src[i]), op));
        let dc = u16::from(dst[i]);
        let v = u32::from(mul_div255(sc, inv_da))
            + u32::from(mul_div255(dc, inv_sa))
            + u32::from(mul_div255(sc, dc));
        out[i] = v.min(255) as u8;
    }
    out[3] = add_sat_u8(sa, mul_div255(da, inv_sa));
    out
}

/// Blend `src` onto `dst` pixel by pixel. Both buffers must be the same size.
pub fn blend_in_place(dst: &mut [u8], src: &[u8], blend: Blend, opacity: f32) -> InkResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(InkError::render(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend_pixel([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], blend, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn effective_alpha(src: PremulRgba8, opacity: f32) -> Option<(u16, u8)> {
    let opacity = if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        1.0
    };
    if opacity <= 0.0 || src[3] == 0 {
        return None;
    }
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    (sa != 0).then_some((op, sa))
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
