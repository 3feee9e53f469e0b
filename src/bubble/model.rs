use crate::{
    foundation::{
        core::{Point, Rect, Rgba8},
        error::{InkError, InkResult},
    },
    shapes::{
        generate::ShapeSpec,
        params::{BubbleStyle, ShapeParams},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailStyle {
    None,
    Long,
    #[default]
    Short,
    DotsHandwritten,
    DotsLinedrawing,
}

impl TailStyle {
    /// Long or short pointed tail.
    pub fn is_pointed(self) -> bool {
        matches!(self, Self::Long | Self::Short)
    }

    pub fn is_dotted(self) -> bool {
        matches!(self, Self::DotsHandwritten | Self::DotsLinedrawing)
    }

    /// Tip distance from the box edge when the bubble sets no `tailLength`.
    pub fn default_length(self) -> f64 {
        match self {
            Self::Short => 25.0,
            _ => 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailDirection {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    #[default]
    Both,
    FillOnly,
    StrokeOnly,
}

impl DrawMode {
    pub fn fills(self) -> bool {
        !matches!(self, Self::StrokeOnly)
    }

    pub fn strokes(self) -> bool {
        !matches!(self, Self::FillOnly)
    }
}

/// Default z-index of bubbles; overlays default to 0 so bubbles paint above them.
pub const DEFAULT_BUBBLE_Z: i32 = 10;

/// A styled speech bubble with optional tail and text.
///
/// Field names serialize in the editor's camelCase JSON shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bubble {
    pub id: String,
    pub seed: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub style: BubbleStyle,
    pub tail_style: TailStyle,
    pub tail_direction: TailDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_tip_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_tip_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_base_spread: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_curve: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_jitter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_tip_spread: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_ctrl1_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_ctrl1_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_ctrl2_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_ctrl2_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dots_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dots_spacing: Option<f64>,
    pub draw_mode: DrawMode,
    pub fill_color: Rgba8,
    pub stroke_color: Rgba8,
    pub fill_opacity: f32,
    #[serde(flatten)]
    pub shape: ShapeParams,
    pub stroke_width: f64,
    pub wobble: f64,
    pub font_size: f64,
    pub font_key: String,
    /// Image key of the template raster for [`BubbleStyle::Image`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_src: Option<String>,
    pub z_index: i32,
    /// Bubbles sharing a group id render as one seamless shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub locked: bool,
}

impl Default for Bubble {
    fn default() -> Self {
        Self {
            id: String::new(),
            seed: 0,
            x: 0.0,
            y: 0.0,
            width: 140.0,
            height: 60.0,
            text: String::new(),
            style: BubbleStyle::default(),
            tail_style: TailStyle::default(),
            tail_direction: TailDirection::default(),
            tail_tip_x: None,
            tail_tip_y: None,
            tail_base_spread: None,
            tail_length: None,
            tail_curve: None,
            tail_jitter: None,
            tail_tip_spread: None,
            tail_ctrl1_x: None,
            tail_ctrl1_y: None,
            tail_ctrl2_x: None,
            tail_ctrl2_y: None,
            dots_scale: None,
            dots_spacing: None,
            draw_mode: DrawMode::default(),
            fill_color: Rgba8::WHITE,
            stroke_color: Rgba8::INK,
            fill_opacity: 1.0,
            shape: ShapeParams::default(),
            stroke_width: 2.0,
            wobble: 5.0,
            font_size: 15.0,
            font_key: "default".to_string(),
            template_src: None,
            z_index: DEFAULT_BUBBLE_Z,
            group_id: None,
            locked: false,
        }
    }
}

fn pair(x: Option<f64>, y: Option<f64>) -> Option<Point> {
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point::new(x, y)),
        _ => None,
    }
}

fn or_default(v: Option<f64>, default: f64) -> f64 {
    v.filter(|v| v.is_finite()).unwrap_or(default)
}

impl Bubble {
    /// A bubble of the editor's default size centered on `center`.
    pub fn new(id: impl Into<String>, center: Point, seed: u32) -> Self {
        let d = Self::default();
        Self {
            id: id.into(),
            seed,
            x: center.x - d.width / 2.0,
            y: center.y - d.height / 2.0,
            ..d
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn set_rect(&mut self, r: Rect) {
        self.x = r.x0;
        self.y = r.y0;
        self.width = r.width();
        self.height = r.height();
    }

    pub fn has_tail(&self) -> bool {
        self.tail_style != TailStyle::None
    }

    /// Explicit tip, if both coordinates are set.
    pub fn tail_tip(&self) -> Option<Point> {
        pair(self.tail_tip_x, self.tail_tip_y)
    }

    pub fn tail_ctrl1(&self) -> Option<Point> {
        pair(self.tail_ctrl1_x, self.tail_ctrl1_y)
    }

    pub fn tail_ctrl2(&self) -> Option<Point> {
        pair(self.tail_ctrl2_x, self.tail_ctrl2_y)
    }

    pub fn set_tail_tip(&mut self, p: Option<Point>) {
        self.tail_tip_x = p.map(|p| p.x);
        self.tail_tip_y = p.map(|p| p.y);
    }

    pub fn set_tail_ctrl1(&mut self, p: Option<Point>) {
        self.tail_ctrl1_x = p.map(|p| p.x);
        self.tail_ctrl1_y = p.map(|p| p.y);
    }

    pub fn set_tail_ctrl2(&mut self, p: Option<Point>) {
        self.tail_ctrl2_x = p.map(|p| p.x);
        self.tail_ctrl2_y = p.map(|p| p.y);
    }

    /// Base half-width of the tail in px. Default 8.
    pub fn tail_base_spread(&self) -> f64 {
        or_default(self.tail_base_spread, 8.0).max(0.0)
    }

    /// 0 = straight sides, 1 = strongly bowed. Default 0.5.
    pub fn tail_curve(&self) -> f64 {
        or_default(self.tail_curve, 0.5)
    }

    /// Scale of the tail and dot jitter. Default 1.
    pub fn tail_jitter(&self) -> f64 {
        or_default(self.tail_jitter, 1.0).max(0.0)
    }

    /// Tip width in px; 0 is a sharp point.
    pub fn tail_tip_spread(&self) -> f64 {
        or_default(self.tail_tip_spread, 0.0).max(0.0)
    }

    pub fn dots_scale(&self) -> f64 {
        or_default(self.dots_scale, 1.0).max(0.0)
    }

    pub fn dots_spacing(&self) -> f64 {
        or_default(self.dots_spacing, 1.0).max(0.0)
    }

    pub fn shape_spec(&self) -> ShapeSpec<'_> {
        ShapeSpec {
            style: self.style,
            stroke_width: self.stroke_width,
            wobble: self.wobble,
            params: &self.shape,
        }
    }

    pub fn validate(&self) -> InkResult<()> {
        if self.id.trim().is_empty() {
            return Err(InkError::validation("bubble id must be non-empty"));
        }
        for (name, v) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("strokeWidth", self.stroke_width),
            ("fontSize", self.font_size),
        ] {
            if !v.is_finite() {
                return Err(InkError::validation(format!(
                    "bubble '{}' {name} must be finite",
                    self.id
                )));
            }
        }
        if self.style == BubbleStyle::Image && self.template_src.is_none() {
            return Err(InkError::validation(format!(
                "bubble '{}' uses the image style without templateSrc",
                self.id
            )));
        }
        Ok(())
    }
}

/// Partial bubble update produced by the interaction controller.
///
/// `None` leaves a field untouched. The nested options on tail points allow
/// clearing an explicit point back to its derived default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BubblePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub tail_tip: Option<Option<Point>>,
    pub tail_ctrl1: Option<Option<Point>>,
    pub tail_ctrl2: Option<Option<Point>>,
    pub z_index: Option<i32>,
    pub locked: Option<bool>,
}

impl BubblePatch {
    pub fn rect(r: Rect) -> Self {
        Self {
            x: Some(r.x0),
            y: Some(r.y0),
            width: Some(r.width()),
            height: Some(r.height()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, b: &mut Bubble) {
        if let Some(v) = self.x {
            b.x = v;
        }
        if let Some(v) = self.y {
            b.y = v;
        }
        if let Some(v) = self.width {
            b.width = v;
        }
        if let Some(v) = self.height {
            b.height = v;
        }
        if let Some(p) = self.tail_tip {
            b.set_tail_tip(p);
        }
        if let Some(p) = self.tail_ctrl1 {
            b.set_tail_ctrl1(p);
        }
        if let Some(p) = self.tail_ctrl2 {
            b.set_tail_ctrl2(p);
        }
        if let Some(z) = self.z_index {
            b.z_index = z;
        }
        if let Some(l) = self.locked {
            b.locked = l;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bubble/model.rs"]
mod tests;
