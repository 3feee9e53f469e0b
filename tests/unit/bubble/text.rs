use super::*;
use crate::shapes::params::{BubbleStyle, ShapeParams};

/// Every character is exactly 10 px wide.
struct Fixed;

impl TextMeasure for Fixed {
    fn advance(&mut self, _font_key: &str, text: &str, _size_px: f64) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

#[test]
fn wraps_by_character() {
    let lines = wrap_text(&mut Fixed, "k", "abcdefg", 15.0, 30.0);
    assert_eq!(lines, ["abc", "def", "g"]);
}

#[test]
fn cjk_wraps_without_spaces() {
    let lines = wrap_text(&mut Fixed, "k", "가나다라마", 15.0, 20.0);
    assert_eq!(lines, ["가나", "다라", "마"]);
}

#[test]
fn newlines_and_empty_lines_are_kept() {
    let lines = wrap_text(&mut Fixed, "k", "ab\n\ncd", 15.0, 100.0);
    assert_eq!(lines, ["ab", "", "cd"]);
}

#[test]
fn narrow_width_still_places_one_char_per_line() {
    let lines = wrap_text(&mut Fixed, "k", "xyz", 15.0, -5.0);
    assert_eq!(lines, ["x", "y", "z"]);
}

#[test]
fn block_is_centered() {
    let bubble = Bubble {
        id: "b".to_string(),
        text: "abcdef".to_string(),
        font_size: 10.0,
        ..Bubble::default()
    };
    // 60 px box minus 20 px padding leaves room for 4 characters.
    let body = Rect::new(0.0, 0.0, 60.0, 100.0);
    let block = layout_bubble_text(&bubble, body, &mut Fixed);
    assert_eq!(block.line_height, 13.0);
    assert_eq!(block.lines.len(), 2);
    assert_eq!(block.lines[0].text, "abcd");
    assert!((block.lines[0].center.y - 43.5).abs() < 1e-9);
    assert!((block.lines[1].center.y - 56.5).abs() < 1e-9);
    assert_eq!(block.lines[0].center.x, 30.0);
}

#[test]
fn flash_styles_wrap_inside_the_inner_ellipse() {
    let bubble = Bubble {
        id: "b".to_string(),
        text: "abcdefghij".to_string(),
        style: BubbleStyle::FlashDense,
        shape: ShapeParams {
            flash_inner_radius: Some(0.5),
            ..ShapeParams::default()
        },
        ..Bubble::default()
    };
    // 200 * 0.5 - 20 = 80 px -> 8 chars per line.
    let block = layout_bubble_text(&bubble, Rect::new(0.0, 0.0, 200.0, 100.0), &mut Fixed);
    assert_eq!(block.lines[0].text, "abcdefgh");
}

#[test]
fn approx_measure_counts_wide_chars_as_one_em() {
    let w = ApproxMeasure.advance("k", "가a", 10.0);
    assert!((w - 15.5).abs() < 1e-9);
}
