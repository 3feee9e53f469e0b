/// Outline family of a bubble. One generator per variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleStyle {
    #[default]
    Handwritten,
    LineDrawing,
    Wobbly,
    Thought,
    Shout,
    Rectangle,
    Rounded,
    DoubleLine,
    Wavy,
    Cloud,
    Electric,
    Sticker,
    Polygon,
    Spiky,
    Dashed,
    #[serde(rename = "flash_black")]
    FlashBlack,
    #[serde(rename = "flash_dense")]
    FlashDense,
    #[serde(rename = "flash_eyelash")]
    FlashEyelash,
    /// Template raster stretched into the box.
    Image,
}

impl BubbleStyle {
    pub const ALL: [BubbleStyle; 19] = [
        Self::Handwritten,
        Self::LineDrawing,
        Self::Wobbly,
        Self::Thought,
        Self::Shout,
        Self::Rectangle,
        Self::Rounded,
        Self::DoubleLine,
        Self::Wavy,
        Self::Cloud,
        Self::Electric,
        Self::Sticker,
        Self::Polygon,
        Self::Spiky,
        Self::Dashed,
        Self::FlashBlack,
        Self::FlashDense,
        Self::FlashEyelash,
        Self::Image,
    ];

    pub fn is_flash(self) -> bool {
        matches!(self, Self::FlashBlack | Self::FlashDense | Self::FlashEyelash)
    }
}

/// Per-style tuning knobs. Every field is optional; the accessors document
/// and apply the defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_line_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_line_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_line_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_line_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_bump_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_bump_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_inner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_filled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_sides: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_wobble: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_spike_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_spike_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_spike_sharpness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_bump_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_bump_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_bump_roundness: Option<f64>,
}

fn positive(v: Option<f64>, default: f64) -> f64 {
    v.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(default)
}

impl ShapeParams {
    /// Ray count: 60 for `flash_black`, 120 for `flash_dense`, 44 for `flash_eyelash`.
    pub fn flash_line_count(&self, style: BubbleStyle) -> u32 {
        let default = match style {
            BubbleStyle::FlashDense => 120,
            BubbleStyle::FlashEyelash => 44,
            _ => 60,
        };
        self.flash_line_count.unwrap_or(default).clamp(3, 720)
    }

    /// Share of the band between inner ellipse and box edge a ray may span. Default 1.0.
    pub fn flash_line_length(&self) -> f64 {
        positive(self.flash_line_length, 1.0).min(1.5)
    }

    /// Angular jitter of ray placement as a fraction of the even spacing. Default 0.5.
    pub fn flash_line_spacing(&self) -> f64 {
        positive(self.flash_line_spacing, 0.5).min(1.0)
    }

    /// Ray base thickness in px. Default `stroke_width * 0.75`.
    pub fn flash_line_thickness(&self, stroke_width: f64) -> f64 {
        positive(self.flash_line_thickness, stroke_width * 0.75).max(0.25)
    }

    /// Halo teeth for `flash_black`. Default 28.
    pub fn flash_bump_count(&self) -> u32 {
        self.flash_bump_count.unwrap_or(28).clamp(3, 360)
    }

    /// Halo tooth height as a fraction of the inner radius. Default 0.12.
    pub fn flash_bump_height(&self) -> f64 {
        positive(self.flash_bump_height, 0.12).min(1.0)
    }

    /// Inner (text) ellipse as a fraction of the box half extents. Default 0.62.
    pub fn flash_inner_radius(&self) -> f64 {
        positive(self.flash_inner_radius, 0.62).clamp(0.1, 0.95)
    }

    /// Whether `flash_black` draws its filled halo. Default true.
    pub fn flash_filled(&self) -> bool {
        self.flash_filled.unwrap_or(true)
    }

    /// Polygon side count. Default 6, at least 3.
    pub fn shape_sides(&self) -> u32 {
        self.shape_sides.unwrap_or(6).clamp(3, 64)
    }

    /// Corner radius in px; `default` is style specific.
    pub fn shape_corner_radius(&self, default: f64) -> f64 {
        positive(self.shape_corner_radius, default)
    }

    /// Vertex jitter in px. Default 0.
    pub fn shape_wobble(&self) -> f64 {
        positive(self.shape_wobble, 0.0)
    }

    /// Spike count; `default` is style specific.
    pub fn shape_spike_count(&self, default: u32) -> u32 {
        self.shape_spike_count.unwrap_or(default).clamp(3, 128)
    }

    /// Spike height as a fraction of the radius. Default 0.3.
    pub fn shape_spike_height(&self) -> f64 {
        positive(self.shape_spike_height, 0.3).min(2.0)
    }

    /// 0 = fully rounded, 1 = needle tips. Default 0.8.
    pub fn shape_spike_sharpness(&self) -> f64 {
        positive(self.shape_spike_sharpness, 0.8).min(1.0)
    }

    /// Bump count; `default` is style specific.
    pub fn shape_bump_count(&self, default: u32) -> u32 {
        self.shape_bump_count.unwrap_or(default).clamp(3, 128)
    }

    /// Bump size as a fraction of the smaller radius; `default` is style specific.
    pub fn shape_bump_size(&self, default: f64) -> f64 {
        positive(self.shape_bump_size, default).min(1.0)
    }

    /// Bulge of cloud scallops. Default 1.0.
    pub fn shape_bump_roundness(&self) -> f64 {
        positive(self.shape_bump_roundness, 1.0).min(2.0)
    }
}
