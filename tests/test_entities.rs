use bubble_trouble::entities::*;

fn shooter() -> Shooter {
    Shooter {
        x: 250.0,
        y: 410.0,
        body_width: 18.0,
        body_height: 30.0,
        head_radius: 8.0,
        speed: 400.0,
        hit: false,
    }
}

#[test]
fn head_sits_on_top_of_body() {
    let s = shooter();
    let (hx, hy) = s.head_center();
    assert_eq!(hx, 250.0);
    // body top = 410 - 15 = 395, head centre one radius above that
    assert_eq!(hy, 387.0);
}

#[test]
fn body_range_is_top_then_bottom() {
    let (top, bottom) = shooter().body_y_range();
    assert_eq!(top, 395.0);
    assert_eq!(bottom, 425.0);
}

#[test]
fn bullet_range_spans_its_height() {
    let b = Bullet {
        x: 100.0,
        y: 200.0,
        width: 10.0,
        height: 12.0,
        speed: 200.0,
    };
    assert_eq!(b.y_range(), (194.0, 206.0));
}

#[test]
fn shooter_colour_follows_hit_flag() {
    let mut s = shooter();
    assert_eq!(s.color(), SHOOTER_SAFE);
    s.hit = true;
    assert_eq!(s.color(), SHOOTER_HIT);
}

#[test]
fn rgb_from_array() {
    assert_eq!(Rgb::from([1, 2, 3]), Rgb::new(1, 2, 3));
}

#[test]
fn enums_compare() {
    assert_eq!(Phase::LevelIntro, Phase::LevelIntro);
    assert_ne!(Phase::Victory, Phase::Defeat);
    assert_ne!(RoundStatus::Won, RoundStatus::Lost);
    assert_ne!(InputAction::Fire, InputAction::Unknown);
}

#[test]
fn bubble_clone_is_independent() {
    let original = Bubble {
        x: 10.0,
        y: 20.0,
        radius: 5.0,
        vx: 1.0,
        vy: 0.0,
        color: Rgb::new(0, 0, 255),
    };
    let mut cloned = original.clone();
    cloned.x = 99.0;
    cloned.radius = 1.0;

    assert_eq!(original.x, 10.0);
    assert_eq!(original.radius, 5.0);
    assert_ne!(cloned, original);
}
