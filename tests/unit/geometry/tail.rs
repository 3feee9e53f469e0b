use super::*;
use crate::bubble::model::TailStyle;

fn bubble() -> Bubble {
    Bubble {
        id: "b".to_string(),
        seed: 77,
        x: 100.0,
        y: 100.0,
        width: 200.0,
        height: 100.0,
        ..Bubble::default()
    }
}

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn default_short_tip_sits_below_with_lateral_offset() {
    let b = bubble();
    assert_eq!(default_tail_tip(&b), Point::new(210.0, 225.0));
}

#[test]
fn default_tip_per_direction_and_length() {
    let mut b = bubble();
    b.tail_style = TailStyle::Long;
    b.tail_direction = TailDirection::Top;
    assert_eq!(default_tail_tip(&b), Point::new(210.0, 50.0));
    b.tail_direction = TailDirection::Left;
    assert_eq!(default_tail_tip(&b), Point::new(50.0, 160.0));
    b.tail_style = TailStyle::DotsLinedrawing;
    b.tail_direction = TailDirection::Right;
    b.tail_length = Some(5.0);
    assert_eq!(default_tail_tip(&b), Point::new(305.0, 160.0));
}

#[test]
fn explicit_default_tip_changes_nothing() {
    let b = bubble();
    let mut explicit = b.clone();
    explicit.set_tail_tip(Some(default_tail_tip(&b)));
    assert_eq!(tail_geometry(&b), tail_geometry(&explicit));
}

#[test]
fn bases_lie_on_the_ellipse_around_the_tip_angle() {
    let g = tail_geometry(&bubble());
    for (p, angle) in [(g.base_a, g.angle_a), (g.base_b, g.angle_b)] {
        let u = (p.x - g.center.x) / g.rx;
        let v = (p.y - g.center.y) / g.ry;
        assert!((u * u + v * v - 1.0).abs() < 1e-9);
        assert!((p.x - (g.center.x + angle.cos() * g.rx)).abs() < 1e-9);
    }
    assert!(g.angle_a < g.main_angle && g.main_angle < g.angle_b);
    let spread = 8.0_f64.atan2(75.0);
    assert!((g.angle_b - g.angle_a - 2.0 * spread).abs() < 1e-9);
}

#[test]
fn geometry_is_deterministic_and_seeded() {
    let b = bubble();
    assert_eq!(tail_geometry(&b), tail_geometry(&b));
    let other = Bubble { seed: 78, ..b.clone() };
    assert_ne!(tail_geometry(&b).ctrl1, tail_geometry(&other).ctrl1);
}

#[test]
fn zero_jitter_gives_the_plain_pull_formula() {
    let mut b = bubble();
    b.tail_jitter = Some(0.0);
    b.tail_curve = Some(1.0);
    let g = tail_geometry(&b);
    let mid = g.base_a.midpoint(g.base_b);
    assert!(close(g.ctrl1, g.base_a + (mid - g.base_a) * 0.95));
    assert!(close(g.ctrl2, g.tip + (mid - g.tip) * 0.3));
    assert!(close(g.ctrl1_b, g.base_b + (mid - g.base_b) * 0.95));
}

#[test]
fn explicit_controls_win_and_mirror_across_the_axis() {
    let mut b = bubble();
    b.set_tail_tip(Some(Point::new(200.0, 300.0)));
    b.set_tail_ctrl1(Some(Point::new(180.0, 220.0)));
    let g = tail_geometry(&b);
    assert_eq!(g.ctrl1, Point::new(180.0, 220.0));
    // The axis is the vertical line x = 200.
    assert!(close(g.ctrl1_b, Point::new(220.0, 220.0)));
}

#[test]
fn blunt_tip_splits_perpendicular_to_the_axis() {
    let mut b = bubble();
    b.set_tail_tip(Some(Point::new(200.0, 300.0)));
    b.tail_tip_spread = Some(6.0);
    let g = tail_geometry(&b);
    assert!(((g.tip_a - g.tip_b).hypot() - 6.0).abs() < 1e-9);
    assert!((g.tip_a.y - 300.0).abs() < 1e-9);
    assert!(g.outline().elements().len() == 5);
}

#[test]
fn tip_on_the_center_stays_finite() {
    let mut b = bubble();
    b.set_tail_tip(Some(b.center()));
    b.set_tail_ctrl2(Some(Point::new(1.0, 2.0)));
    let g = tail_geometry(&b);
    for p in [g.base_a, g.base_b, g.ctrl1, g.ctrl2, g.ctrl1_b, g.ctrl2_b, g.tip_a] {
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}

#[test]
fn wedge_covers_the_attachment_arc_only() {
    use kurbo::Shape;
    let g = tail_geometry(&bubble());
    let wedge = g.erase_wedge();
    let mid_angle = g.main_angle;
    let on_arc = Point::new(
        g.center.x + mid_angle.cos() * g.rx,
        g.center.y + mid_angle.sin() * g.ry,
    );
    assert!(wedge.contains(on_arc));
    let opposite = Point::new(g.center.x, g.center.y - g.ry);
    assert!(!wedge.contains(opposite));
}
