//! Shared geometry for the shooting gallery.
//!
//! # Invariants
//! - `WorldBounds` always has positive, finite extent on both axes.
//! - Minimap bounds and the player clamp rectangle are separate values.

mod bounds;
mod types;

pub use bounds::{LayoutError, MINIMAP_WORLD_BOUNDS, PLAYER_CLAMP_BOUNDS, WorldBounds};
pub use types::{Doorway, PlayerPose, Room};
