//! Gallery kernel: session state, per-frame player update, layout and effects.
//!
//! # Invariants
//! - All mutable state lives in `Session`; nothing is global.
//! - The player position never leaves the clamp rectangle after a frame.
//! - Effects terminate by their own rule and are never revived.

pub mod config;
pub mod effects;
pub mod layout;
pub mod player;
pub mod rng;
pub mod session;

pub use config::{ConfigError, GalleryConfig, LevelConfig};
pub use effects::{Bullet, Effect, EffectList, GUN_OFFSET, GunFlash, MuzzleFlash, Particle};
pub use layout::Layout;
pub use player::Player;
pub use session::{FrameStats, Session};

pub fn crate_info() -> &'static str {
    "gallery-kernel v0.1.0"
}
