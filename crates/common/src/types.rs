use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A static room: center on the XZ plane plus its box dimensions.
///
/// Rooms are created once at startup and never mutated. Identity is positional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Room {
    pub const fn new(x: f32, z: f32, width: f32, height: f32, depth: f32) -> Self {
        Self {
            x,
            z,
            width,
            height,
            depth,
        }
    }

    /// Minimum (x, z) corner of the room footprint.
    pub fn min_corner(&self) -> (f32, f32) {
        (self.x - self.width / 2.0, self.z - self.depth / 2.0)
    }

    /// Maximum (x, z) corner of the room footprint.
    pub fn max_corner(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.z + self.depth / 2.0)
    }

    /// Y coordinate of the floor (rooms are centered on y = 0).
    pub fn floor_y(&self) -> f32 {
        -self.height / 2.0
    }
}

/// A doorway marker between two rooms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Doorway {
    pub x: f32,
    pub z: f32,
}

impl Doorway {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

/// Player/camera pose: eye position plus yaw and pitch in radians.
///
/// Yaw rotates about +Y; yaw 0 looks down -Z and positive yaw turns left.
/// Pitch is clamped by the owner, never here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for PlayerPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl PlayerPose {
    /// Full camera orientation (yaw, then pitch about the local X axis).
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// View direction including pitch.
    pub fn view_direction(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// Camera-local +X in world space; strafing moves along it.
    pub fn right_direction(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    /// Transform a camera-space point into world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation() * local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_pose_is_spawn_point() {
        let p = PlayerPose::default();
        assert_eq!(p.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(p.yaw, 0.0);
        assert_eq!(p.pitch, 0.0);
    }

    #[test]
    fn yaw_zero_looks_down_negative_z() {
        let p = PlayerPose::default();
        assert!(close(p.view_direction(), Vec3::NEG_Z));
        assert!(close(p.right_direction(), Vec3::X));
    }

    #[test]
    fn positive_yaw_turns_left() {
        let p = PlayerPose {
            yaw: FRAC_PI_2,
            ..PlayerPose::default()
        };
        assert!(close(p.view_direction(), Vec3::NEG_X));
        assert!(close(p.right_direction(), Vec3::NEG_Z));
    }

    #[test]
    fn pitch_tilts_view_but_not_right_axis() {
        let p = PlayerPose {
            pitch: 0.5,
            ..PlayerPose::default()
        };
        let expected = Vec3::new(0.0, 0.5f32.sin(), -0.5f32.cos());
        assert!(close(p.view_direction(), expected));
        assert!(close(p.right_direction(), Vec3::X));
    }

    #[test]
    fn room_corners() {
        let r = Room::new(20.0, 0.0, 20.0, 10.0, 20.0);
        assert_eq!(r.min_corner(), (10.0, -10.0));
        assert_eq!(r.max_corner(), (30.0, 10.0));
        assert_eq!(r.floor_y(), -5.0);
    }

    #[test]
    fn to_world_applies_yaw() {
        let p = PlayerPose {
            yaw: FRAC_PI_2,
            ..PlayerPose::default()
        };
        // Camera-local right (+X) maps to world -Z after a quarter turn left.
        assert!(close(p.to_world(Vec3::X), Vec3::new(0.0, 2.0, -1.0)));
    }
}
