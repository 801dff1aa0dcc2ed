use crate::config::GalleryConfig;
use gallery_common::{PLAYER_CLAMP_BOUNDS, PlayerPose, WorldBounds};
use gallery_input::{Control, InputIntents};
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

/// The player's pose and the per-frame rules that move it.
///
/// Movement is per frame and unnormalized: holding forward and a strafe key
/// moves `move_speed` along each axis, so diagonal speed is `move_speed * √2`.
/// Forward and back follow the full view direction, so walking while looking
/// up or down changes height and shortens the ground step to
/// `move_speed * cos(pitch)`. Only x and z are clamped.
#[derive(Debug, Clone)]
pub struct Player {
    pose: PlayerPose,
    clamp: WorldBounds,
    move_speed: f32,
    turn_speed: f32,
    look_sensitivity: f32,
}

impl Player {
    /// Spawn at the origin at eye height, facing -Z.
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            pose: PlayerPose {
                position: Vec3::new(0.0, config.eye_height, 0.0),
                ..PlayerPose::default()
            },
            clamp: PLAYER_CLAMP_BOUNDS,
            move_speed: config.move_speed,
            turn_speed: config.turn_speed,
            look_sensitivity: config.look_sensitivity,
        }
    }

    /// Eye position and orientation after the last update.
    pub fn pose(&self) -> &PlayerPose {
        &self.pose
    }

    /// Place the player directly (spawn, teleport, tests). Not clamped.
    pub fn set_pose(&mut self, pose: PlayerPose) {
        self.pose = pose;
    }

    /// Apply one frame of held intents, then clamp to the movement rectangle.
    pub fn update(&mut self, intents: &InputIntents) {
        let forward = self.pose.view_direction();
        let right = self.pose.right_direction();
        let step = self.move_speed;

        if intents.is_held(Control::Forward) {
            self.pose.position += forward * step;
        }
        if intents.is_held(Control::Backward) {
            self.pose.position -= forward * step;
        }
        if intents.is_held(Control::StrafeLeft) {
            self.pose.position -= right * step;
        }
        if intents.is_held(Control::StrafeRight) {
            self.pose.position += right * step;
        }
        if intents.is_held(Control::TurnLeft) {
            self.pose.yaw += self.turn_speed;
        }
        if intents.is_held(Control::TurnRight) {
            self.pose.yaw -= self.turn_speed;
        }

        self.clamp_position();
    }

    /// Pointer look: right/down motion turns right/looks down.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.pose.yaw -= dx * self.look_sensitivity;
        self.pose.pitch -= dy * self.look_sensitivity;
        self.pose.pitch = self.pose.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    fn clamp_position(&mut self) {
        let (x, z) = self.clamp.clamp(self.pose.position.x, self.pose.position.z);
        self.pose.position.x = x;
        self.pose.position.z = z;
    }
}
