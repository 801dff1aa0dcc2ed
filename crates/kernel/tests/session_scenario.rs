use gallery_common::PLAYER_CLAMP_BOUNDS;
use gallery_input::{Binding, Control, Handled, InputEvent};
use gallery_kernel::{GalleryConfig, Session};
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);

fn press(code: &str) -> InputEvent {
    InputEvent::key(code, true).unwrap()
}

#[test]
fn walk_into_the_corner_and_stop() {
    let mut s = Session::new(GalleryConfig::default()).unwrap();
    s.handle(InputEvent::PointerLockChanged(true));
    s.handle(press("ArrowDown"));
    s.handle(press("KeyA"));

    for _ in 0..400 {
        s.frame(FRAME);
        let p = s.pose().position;
        assert!(PLAYER_CLAMP_BOUNDS.contains(p.x, p.z));
    }
    let p = s.pose().position;
    assert_eq!((p.x, p.z), (-9.0, 29.0));
    assert_eq!(p.y, 2.0);
}

#[test]
fn holding_space_fires_twice_per_second() {
    let mut s = Session::new(GalleryConfig::default()).unwrap();
    s.handle(InputEvent::PointerLockChanged(true));

    let mut accepted = 0;
    // One simulated second, re-pressing shoot every frame.
    for _ in 0..60 {
        if s.handle(InputEvent::Pressed(Binding::Shoot)) == Handled::ShotAccepted {
            accepted += 1;
        }
        s.frame(FRAME);
    }
    assert_eq!(accepted, 2);
}

#[test]
fn losing_lock_mid_walk_stops_the_player() {
    let mut s = Session::new(GalleryConfig::default()).unwrap();
    s.handle(InputEvent::PointerLockChanged(true));
    s.handle(InputEvent::Pressed(Binding::Hold(Control::Forward)));
    for _ in 0..5 {
        s.frame(FRAME);
    }
    s.handle(InputEvent::PointerLockChanged(false));
    s.handle(InputEvent::PointerLockChanged(true));
    let held_at = s.pose().position;
    for _ in 0..5 {
        s.frame(FRAME);
    }
    assert_eq!(s.pose().position, held_at);
    assert!(!s.intents().any_held());
}

#[test]
fn walking_while_looking_up_climbs() {
    let mut s = Session::new(GalleryConfig::default()).unwrap();
    s.handle(InputEvent::PointerLockChanged(true));
    s.handle(InputEvent::PointerMoved { dx: 0.0, dy: -250.0 });
    s.handle(press("ArrowUp"));
    for _ in 0..10 {
        s.frame(FRAME);
    }
    let p = s.pose().position;
    assert!((p.y - (2.0 + 1.5 * 0.5f32.sin())).abs() < 1e-4);
    assert!((p.z - -1.5 * 0.5f32.cos()).abs() < 1e-4);
    assert_eq!(p.x, 0.0);
}
