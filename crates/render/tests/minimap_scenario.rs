use gallery_common::MINIMAP_WORLD_BOUNDS;
use gallery_input::{Binding, Control, InputEvent};
use gallery_kernel::{GalleryConfig, LevelConfig, Session};
use gallery_render::{DrawCommand, MinimapRenderer, Renderer, project};
use glam::Vec2;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);

fn circles(commands: &[DrawCommand]) -> Vec<(Vec2, f32)> {
    commands
        .iter()
        .filter_map(|c| match *c {
            DrawCommand::FillCircle { center, radius, .. } => Some((center, radius)),
            _ => None,
        })
        .collect()
}

#[test]
fn standard_layout_minimap() {
    let session = Session::new(GalleryConfig::default()).unwrap();
    let list = MinimapRenderer::default().render(&session);

    // background + 4 * (stroke, fill) + 4 * (glow, marker) + glow, heading, dot
    assert_eq!(list.len(), 1 + 8 + 8 + 3);

    let marks = circles(list.commands());
    let door = marks[0];
    assert_eq!(door, (Vec2::new(100.0, 140.0), 6.0));
    assert_eq!(marks[1], (Vec2::new(100.0, 140.0), 3.0));

    // player at the origin sits on the first room's center
    let (player, _) = marks[marks.len() - 1];
    assert_eq!(player, Vec2::new(60.0, 140.0));
}

#[test]
fn empty_level_draws_background_and_player_only() {
    let config = GalleryConfig {
        level: Some(LevelConfig::default()),
        ..GalleryConfig::default()
    };
    let mut session = Session::new(config).unwrap();
    session.handle(InputEvent::PointerLockChanged(true));
    session.handle(InputEvent::Pressed(Binding::Shoot));
    for _ in 0..10 {
        session.frame(FRAME);
    }

    let list = MinimapRenderer::default().render(&session);
    assert_eq!(list.len(), 4);
    assert!(matches!(list.commands()[0], DrawCommand::FillRect { .. }));
    let (player, _) = *circles(list.commands()).last().unwrap();
    assert_eq!(player, Vec2::new(60.0, 140.0));
}

#[test]
fn free_projection_matches_renderer() {
    let p = project(10.0, 10.0, Vec2::splat(200.0), 20.0, &MINIMAP_WORLD_BOUNDS);
    assert_eq!(p, Vec2::new(100.0, 100.0));
    let q = project(20.0, 20.0, Vec2::splat(200.0), 20.0, &MINIMAP_WORLD_BOUNDS);
    assert_eq!(q, Vec2::new(140.0, 60.0));
}

#[test]
fn marker_tracks_player_through_frames() {
    let mut session = Session::new(GalleryConfig::default()).unwrap();
    session.handle(InputEvent::PointerLockChanged(true));
    session.handle(InputEvent::Pressed(Binding::Hold(Control::StrafeRight)));
    for _ in 0..20 {
        session.frame(FRAME);
    }

    let renderer = MinimapRenderer::default();
    let list = renderer.render(&session);
    let (marker, radius) = *circles(list.commands()).last().unwrap();
    assert_eq!(radius, 4.0);

    let pos = session.pose().position;
    let expected = renderer
        .geometry(Vec2::splat(200.0))
        .project(pos.x, pos.z);
    assert!((marker - expected).length() < 1e-4);
    // three units of strafe = twelve overlay pixels to the right
    assert!((marker.x - 72.0).abs() < 1e-3);
}
