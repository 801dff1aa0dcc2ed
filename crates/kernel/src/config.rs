use gallery_common::{Doorway, Room};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading or validating tuning values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Layout(#[from] gallery_common::LayoutError),
}

/// Explicit rooms and doorways that replace the standard four-room grid.
///
/// Both lists may be empty; the session then runs with nothing to walk past
/// and the minimap shows only its background and the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub rooms: Vec<Room>,
    pub doorways: Vec<Doorway>,
}

/// Gameplay tuning. Speeds are per frame, not per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Translation per frame for each held movement control.
    pub move_speed: f32,
    /// Yaw change per frame for each held turn control (radians).
    pub turn_speed: f32,
    /// Radians of yaw/pitch per unit of pointer motion.
    pub look_sensitivity: f32,
    pub shoot_cooldown_ms: u64,
    pub eye_height: f32,
    /// Bullet travel per frame.
    pub bullet_speed: f32,
    /// Bullets are removed beyond this distance from the player.
    pub bullet_range: f32,
    pub particle_count: usize,
    /// Opacity multiplier applied to a muzzle flash each frame.
    pub particle_fade: f32,
    /// A muzzle flash is removed once its opacity is at or below this.
    pub particle_cutoff: f32,
    pub gun_flash_ms: u64,
    pub obstacles_per_room: usize,
    /// Seed for obstacle placement and particle spread.
    pub seed: u64,
    /// Custom level; the standard grid is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelConfig>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.15,
            turn_speed: 0.03,
            look_sensitivity: 0.002,
            shoot_cooldown_ms: 500,
            eye_height: 2.0,
            bullet_speed: 1.0,
            bullet_range: 50.0,
            particle_count: 20,
            particle_fade: 0.95,
            particle_cutoff: 0.01,
            gun_flash_ms: 50,
            obstacles_per_room: 3,
            seed: 42,
            level: None,
        }
    }
}

impl GalleryConfig {
    /// Load from a JSON file; missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "loaded gallery config");
        Ok(config)
    }

    /// Check every tuning value. Rooms are checked when the layout is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive and finite",
                })
            }
        };
        positive("move_speed", self.move_speed)?;
        positive("turn_speed", self.turn_speed)?;
        positive("look_sensitivity", self.look_sensitivity)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("bullet_range", self.bullet_range)?;
        positive("particle_cutoff", self.particle_cutoff)?;
        if !(self.particle_fade > 0.0 && self.particle_fade < 1.0) {
            return Err(ConfigError::Invalid {
                field: "particle_fade",
                reason: "must be strictly between 0 and 1",
            });
        }
        if !self.eye_height.is_finite() {
            return Err(ConfigError::Invalid {
                field: "eye_height",
                reason: "must be finite",
            });
        }
        Ok(())
    }

    /// Delay between accepted shots.
    pub fn shoot_cooldown(&self) -> Duration {
        Duration::from_millis(self.shoot_cooldown_ms)
    }

    /// How long the barrel stays lit after a shot.
    pub fn gun_flash(&self) -> Duration {
        Duration::from_millis(self.gun_flash_ms)
    }
}
