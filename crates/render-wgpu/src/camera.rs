use gallery_common::PlayerPose;
use glam::{Mat4, Vec3};

/// Perspective projection attached to the player's eye.
///
/// Holds only lens parameters; position and orientation come from the
/// session's pose every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonCamera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl FirstPersonCamera {
    /// Update the aspect ratio after a surface resize. Zero-sized surfaces are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World to camera, looking along the pose's view direction.
    pub fn view_matrix(&self, pose: &PlayerPose) -> Mat4 {
        let up = pose.orientation() * Vec3::Y;
        Mat4::look_to_rh(pose.position, pose.view_direction(), up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Projection times view, ready for the uniform buffer.
    pub fn view_projection(&self, pose: &PlayerPose) -> Mat4 {
        self.projection_matrix() * self.view_matrix(pose)
    }
}
