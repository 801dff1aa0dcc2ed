use gallery_common::PlayerPose;
use gallery_kernel::{GUN_OFFSET, Session};
use glam::{Mat4, Quat, Vec3};

/// Sky clear color (`#87ceeb`).
pub const SKY_COLOR: [f32; 4] = [0.529, 0.808, 0.922, 1.0];

const WALL_COLOR: [f32; 4] = [0.62, 0.32, 0.24, 1.0];
const FLOOR_COLOR: [f32; 4] = [0.55, 0.38, 0.22, 1.0];
const CRATE_COLOR: [f32; 4] = [0.545, 0.271, 0.075, 1.0];
const BARREL_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
const BARREL_HOT_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const HANDLE_COLOR: [f32; 4] = [0.545, 0.271, 0.075, 1.0];
const BULLET_COLOR: [f32; 4] = [1.0, 0.533, 0.0, 1.0];
const SPARK_COLOR: [f32; 3] = [1.0, 0.267, 0.0];

const FLOOR_THICKNESS: f32 = 0.02;
const BULLET_SIZE: f32 = 0.1;
const SPARK_SIZE: f32 = 0.04;
const BARREL_SIZE: Vec3 = Vec3::new(0.1, 0.1, 0.5);
const HANDLE_SIZE: Vec3 = Vec3::new(0.1, 0.2, 0.1);
const HANDLE_OFFSET: Vec3 = Vec3::new(0.0, -0.1, 0.1);

/// How a scene item is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Seen from inside: back faces drawn, normals flipped.
    Interior,
    /// Ordinary lit solid.
    Lit,
    /// Unlit, full-bright (tracers, sparks, hot barrel).
    Emissive,
}

/// One unit cube instance to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneItem {
    pub model: Mat4,
    pub color: [f32; 4],
    pub shading: Shading,
}

impl SceneItem {
    fn cube(center: Vec3, size: Vec3, color: [f32; 4], shading: Shading) -> Self {
        Self {
            model: Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, center),
            color,
            shading,
        }
    }

    /// A cube placed in camera space and carried by the pose.
    fn attached(pose: &PlayerPose, local: Vec3, size: Vec3, color: [f32; 4], shading: Shading) -> Self {
        let camera = Mat4::from_rotation_translation(pose.orientation(), pose.position);
        Self {
            model: camera * Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, local),
            color,
            shading,
        }
    }
}

/// Flatten the session into cube instances: rooms, floors, crates, gun, tracers, sparks.
///
/// Read-only; the renderer never mutates the session.
pub fn extract_scene(session: &Session) -> Vec<SceneItem> {
    let layout = session.layout();
    let pose = session.pose();
    let effects = session.effects();
    let mut items = Vec::new();

    for room in layout.rooms() {
        items.push(SceneItem::cube(
            Vec3::new(room.x, 0.0, room.z),
            Vec3::new(room.width, room.height, room.depth),
            WALL_COLOR,
            Shading::Interior,
        ));
        items.push(SceneItem::cube(
            Vec3::new(room.x, room.floor_y() + FLOOR_THICKNESS, room.z),
            Vec3::new(room.width, FLOOR_THICKNESS, room.depth),
            FLOOR_COLOR,
            Shading::Lit,
        ));
    }

    for &crate_pos in layout.obstacles() {
        items.push(SceneItem::cube(
            crate_pos,
            Vec3::splat(gallery_kernel::layout::OBSTACLE_SIZE),
            CRATE_COLOR,
            Shading::Lit,
        ));
    }

    let (barrel_color, barrel_shading) = if effects.gun_flash_active() {
        (BARREL_HOT_COLOR, Shading::Emissive)
    } else {
        (BARREL_COLOR, Shading::Lit)
    };
    items.push(SceneItem::attached(
        pose,
        GUN_OFFSET,
        BARREL_SIZE,
        barrel_color,
        barrel_shading,
    ));
    items.push(SceneItem::attached(
        pose,
        GUN_OFFSET + HANDLE_OFFSET,
        HANDLE_SIZE,
        HANDLE_COLOR,
        Shading::Lit,
    ));

    for bullet in effects.bullets() {
        items.push(SceneItem::cube(
            bullet.position,
            Vec3::splat(BULLET_SIZE),
            BULLET_COLOR,
            Shading::Emissive,
        ));
    }

    for flash in effects.muzzle_flashes() {
        let [r, g, b] = SPARK_COLOR;
        for spark in &flash.particles {
            items.push(SceneItem::attached(
                pose,
                spark.offset,
                Vec3::splat(SPARK_SIZE),
                [r, g, b, flash.opacity],
                Shading::Emissive,
            ));
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_input::{Binding, InputEvent};
    use gallery_kernel::GalleryConfig;

    fn session() -> Session {
        Session::new(GalleryConfig::default()).unwrap()
    }

    fn count(items: &[SceneItem], shading: Shading) -> usize {
        items.iter().filter(|i| i.shading == shading).count()
    }

    #[test]
    fn idle_scene_contents() {
        let items = extract_scene(&session());
        // 4 shells + 4 floors + 12 crates + barrel + handle
        assert_eq!(items.len(), 22);
        assert_eq!(count(&items, Shading::Interior), 4);
        assert_eq!(count(&items, Shading::Emissive), 0);
    }

    #[test]
    fn shot_adds_tracer_sparks_and_hot_barrel() {
        let mut s = session();
        s.handle(InputEvent::PointerLockChanged(true));
        s.handle(InputEvent::Pressed(Binding::Shoot));
        let items = extract_scene(&s);
        // hot barrel + tracer + 20 sparks
        assert_eq!(count(&items, Shading::Emissive), 22);
        assert_eq!(items.len(), 22 + 21);
    }

    #[test]
    fn gun_follows_the_camera() {
        let s = session();
        let items = extract_scene(&s);
        let barrel = items
            .iter()
            .find(|i| i.color == BARREL_COLOR)
            .expect("barrel present");
        let center = barrel.model.transform_point3(Vec3::ZERO);
        let expected = s.pose().to_world(GUN_OFFSET);
        assert!((center - expected).length() < 1e-5);
    }

    #[test]
    fn room_shell_matches_room_box() {
        let items = extract_scene(&session());
        let shell = items[0];
        let corner = shell.model.transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(10.0, 5.0, 10.0)).length() < 1e-5);
    }
}
