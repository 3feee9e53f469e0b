use crate::{
    assets::fonts::approx_advance,
    bubble::model::Bubble,
    foundation::core::{Point, Rect},
    shapes::generate::text_width_fraction,
};

/// Horizontal padding on each side of bubble text.
pub const TEXT_PADDING: f64 = 10.0;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.3;

/// Measures the advance width of a run of text.
pub trait TextMeasure {
    fn advance(&mut self, font_key: &str, text: &str, size_px: f64) -> f64;
}

/// Font-less measurement used when no faces are registered.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn advance(&mut self, _font_key: &str, text: &str, size_px: f64) -> f64 {
        approx_advance(text, size_px)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Center of the line box (horizontal center, vertical middle).
    pub center: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    pub line_height: f64,
    pub font_size: f64,
}

/// Wraps `text` character by character so that no line wider than
/// `max_width` is produced, except a line holding a single character.
///
/// Explicit newlines always break; empty source lines are kept.
pub fn wrap_text(
    measure: &mut dyn TextMeasure,
    font_key: &str,
    text: &str,
    size_px: f64,
    max_width: f64,
) -> Vec<String> {
    let mut out = Vec::new();
    for raw in text.split('\n') {
        if raw.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut current = String::new();
        for ch in raw.chars() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if !current.is_empty() && measure.advance(font_key, &candidate, size_px) > max_width {
                out.push(std::mem::take(&mut current));
                current.push(ch);
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

/// Lays out a bubble's text inside `body`, the box of its shape.
///
/// Lines are centered horizontally and the block is centered vertically.
pub fn layout_bubble_text(bubble: &Bubble, body: Rect, measure: &mut dyn TextMeasure) -> TextBlock {
    let font_size = if bubble.font_size.is_finite() && bubble.font_size > 0.0 {
        bubble.font_size
    } else {
        15.0
    };
    let line_height = font_size * LINE_HEIGHT_FACTOR;
    if bubble.text.is_empty() {
        return TextBlock {
            lines: Vec::new(),
            line_height,
            font_size,
        };
    }

    let fraction = text_width_fraction(bubble.style, &bubble.shape);
    let max_width = body.width() * fraction - TEXT_PADDING * 2.0;
    let wrapped = wrap_text(measure, &bubble.font_key, &bubble.text, font_size, max_width);

    let center = body.center();
    let total = wrapped.len() as f64 * line_height;
    let first = center.y - total / 2.0 + line_height / 2.0;
    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            text,
            center: Point::new(center.x, first + i as f64 * line_height),
        })
        .collect();
    TextBlock {
        lines,
        line_height,
        font_size,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bubble/text.rs"]
mod tests;
