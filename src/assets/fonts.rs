use std::collections::BTreeMap;

use crate::{
    bubble::text::TextMeasure,
    foundation::{
        core::Rgba8,
        error::{InkError, InkResult},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct FontFace {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// One shaped line ready for [`crate::Painter::fill_layout`].
pub struct ShapedLine {
    pub layout: parley::Layout<TextBrush>,
    pub font: vello_cpu::peniko::FontData,
}

/// Registry of font faces keyed by the font keys bubbles reference.
///
/// The first registered face is the fallback for unknown keys. Without any
/// registered face, measurement falls back to a fixed per-character advance
/// and text is not drawn.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    faces: BTreeMap<String, FontFace>,
    default_key: Option<String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("keys", &self.faces.keys().collect::<Vec<_>>())
            .field("default_key", &self.default_key)
            .finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: BTreeMap::new(),
            default_key: None,
        }
    }

    /// Register TTF/OTF bytes under `key`.
    pub fn register(&mut self, key: &str, font_bytes: Vec<u8>) -> InkResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| InkError::validation(format!("no font families in font '{key}'")))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| InkError::validation("registered font family has no name"))?
            .to_string();

        tracing::debug!(key, family = %family, "registered font");
        self.faces.insert(
            key.to_string(),
            FontFace {
                family,
                data: vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font_bytes),
                    0,
                ),
            },
        );
        if self.default_key.is_none() {
            self.default_key = Some(key.to_string());
        }
        Ok(())
    }

    pub fn has_fonts(&self) -> bool {
        !self.faces.is_empty()
    }

    fn resolve_key<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.faces.contains_key(key) {
            return Some(key);
        }
        self.default_key.as_deref()
    }

    /// Shape a single unwrapped line. `None` when no face is registered.
    pub fn shape_line(
        &mut self,
        font_key: &str,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> InkResult<Option<ShapedLine>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(InkError::validation("font size must be finite and > 0"));
        }
        let Some(key) = self.resolve_key(font_key).map(str::to_string) else {
            return Ok(None);
        };
        let Some(face) = self.faces.get(&key) else {
            return Ok(None);
        };
        let family = face.family.clone();
        let font = face.data.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(color)));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(Some(ShapedLine { layout, font }))
    }
}

impl TextMeasure for FontBook {
    fn advance(&mut self, font_key: &str, text: &str, size_px: f64) -> f64 {
        match self.shape_line(font_key, text, size_px as f32, Rgba8::INK) {
            Ok(Some(line)) => f64::from(line.layout.width()),
            _ => approx_advance(text, size_px),
        }
    }
}

/// Font-less advance estimate: full em for wide (CJK) characters, a bit over
/// half an em for everything else.
pub fn approx_advance(text: &str, size_px: f64) -> f64 {
    text.chars()
        .map(|c| if is_wide(c) { size_px } else { size_px * 0.55 })
        .sum()
}

fn is_wide(c: char) -> bool {
    matches!(u32::from(c),
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
