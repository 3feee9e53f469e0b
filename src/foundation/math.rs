const LCG_MODULUS: u64 = 2_147_483_647;
const LCG_MULTIPLIER: u64 = 16_807;

/// Park-Miller minimal standard generator.
///
/// Every procedural jitter in the crate draws from this generator so that the
/// same seed always reproduces the same geometry.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        let mut state = seed % LCG_MODULUS;
        if state == 0 {
            state = 1;
        }
        Self { state }
    }

    /// Seed a generator for one shape family, see [`SeedFamily`].
    pub fn for_family(seed: u32, family: SeedFamily) -> Self {
        Self::new(u64::from(seed) + family.offset())
    }

    /// Next sample in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER) % LCG_MODULUS;
        (self.state - 1) as f64 / (LCG_MODULUS - 1) as f64
    }

    /// Centered sample in `[-scale/2, scale/2)`.
    pub fn jitter(&mut self, scale: f64) -> f64 {
        (self.next_f64() - 0.5) * scale
    }
}

/// Fixed re-seed offsets, one per procedural family.
///
/// Families that sample the same bubble seed never share a sequence. Offsets
/// are part of the persisted look of a page: changing one changes every
/// existing bubble of that family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeedFamily {
    /// Handwritten, thought and shout outlines.
    Outline,
    Cloud,
    Electric,
    Sticker,
    Polygon,
    Spiky,
    Flash,
    TailJitter,
    Dots,
}

impl SeedFamily {
    pub const fn offset(self) -> u64 {
        match self {
            Self::Outline => 0,
            Self::Cloud => 200,
            Self::Electric => 300,
            Self::Sticker => 400,
            Self::Polygon => 500,
            Self::Spiky => 600,
            Self::Flash => 700,
            Self::TailJitter => 900,
            Self::Dots => 1000,
        }
    }
}

/// Smallest extent any geometry is allowed to collapse to.
pub const MIN_EXTENT: f64 = 1.0;

/// Clamp a length to a finite value of at least [`MIN_EXTENT`].
pub fn clamp_extent(v: f64) -> f64 {
    if v.is_finite() { v.max(MIN_EXTENT) } else { MIN_EXTENT }
}

/// Replace non-finite values with `fallback`.
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
