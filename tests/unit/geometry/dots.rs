use super::*;

fn bubble(style: TailStyle) -> Bubble {
    Bubble {
        id: "b".to_string(),
        seed: 5,
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        tail_style: style,
        ..Bubble::default()
    }
}

#[test]
fn pointed_tails_have_no_dots() {
    assert!(tail_dots(&bubble(TailStyle::Short)).is_empty());
    assert!(tail_dots(&bubble(TailStyle::None)).is_empty());
}

#[test]
fn linedrawing_dots_shrink_outward_on_exact_spacing() {
    let mut b = bubble(TailStyle::DotsLinedrawing);
    b.set_tail_tip(Some(Point::new(50.0, 200.0)));
    let dots = tail_dots(&b);
    let radii: Vec<f64> = dots.iter().map(|d| d.radius).collect();
    assert_eq!(radii, [8.0, 6.0, 4.0]);
    // Straight down: ellipse bottom at y=100, plus the 5 px gap.
    let ys: Vec<f64> = dots.iter().map(|d| d.center.y).collect();
    for (y, want) in ys.iter().zip([117.0, 131.0, 143.0]) {
        assert!((y - want).abs() < 1e-9);
    }
}

#[test]
fn scale_and_spacing_multiply() {
    let mut b = bubble(TailStyle::DotsLinedrawing);
    b.set_tail_tip(Some(Point::new(50.0, 200.0)));
    b.dots_scale = Some(2.0);
    b.dots_spacing = Some(0.5);
    let dots = tail_dots(&b);
    assert_eq!(dots[0].radius, 16.0);
    assert!((dots[2].center.y - 124.0).abs() < 1e-9);
}

#[test]
fn handwritten_dots_jitter_deterministically() {
    let b = bubble(TailStyle::DotsHandwritten);
    let a = tail_dots(&b);
    assert_eq!(a, tail_dots(&b));
    let calm = Bubble {
        tail_jitter: Some(0.0),
        ..b.clone()
    };
    let still = tail_dots(&calm);
    let line = tail_dots(&Bubble {
        tail_style: TailStyle::DotsLinedrawing,
        ..calm
    });
    assert_eq!(still[1].center, line[1].center);
    assert!(a.iter().zip(&still).any(|(x, y)| x.center != y.center));
}
