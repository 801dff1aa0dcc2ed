use crate::rng::SplitMix64;
use gallery_common::{Doorway, LayoutError, Room};
use glam::Vec3;

/// Edge length of the decorative crates.
pub const OBSTACLE_SIZE: f32 = 2.0;
/// Crates sit on the floor: floor at -5 plus half their height.
pub const OBSTACLE_Y: f32 = -4.0;
/// Crates are scattered within this half-extent of the room center.
const OBSTACLE_SPREAD: f32 = 8.0;

/// The static level: rooms, doorway markers and decorative crates.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    rooms: Vec<Room>,
    doorways: Vec<Doorway>,
    obstacles: Vec<Vec3>,
}

impl Layout {
    /// Build a layout from explicit rooms and doorways (no crates).
    pub fn new(rooms: Vec<Room>, doorways: Vec<Doorway>) -> Result<Self, LayoutError> {
        for room in &rooms {
            let dims = [room.width, room.height, room.depth];
            if !dims.iter().all(|d| d.is_finite() && *d > 0.0) {
                return Err(LayoutError::InvalidRoom {
                    x: room.x,
                    z: room.z,
                });
            }
        }
        Ok(Self {
            rooms,
            doorways,
            obstacles: Vec::new(),
        })
    }

    /// The 2x2 grid of 20x10x20 rooms with a doorway between each adjacent
    /// pair. No crates until [`Layout::scatter_obstacles`] runs.
    pub fn standard() -> Self {
        let rooms = vec![
            Room::new(0.0, 0.0, 20.0, 10.0, 20.0),
            Room::new(20.0, 0.0, 20.0, 10.0, 20.0),
            Room::new(0.0, 20.0, 20.0, 10.0, 20.0),
            Room::new(20.0, 20.0, 20.0, 10.0, 20.0),
        ];
        let doorways = vec![
            Doorway::new(10.0, 0.0),
            Doorway::new(0.0, 10.0),
            Doorway::new(20.0, 10.0),
            Doorway::new(10.0, 20.0),
        ];
        Self {
            rooms,
            doorways,
            obstacles: Vec::new(),
        }
    }

    /// Replace the crates with `per_room` fresh ones per room.
    pub fn scatter_obstacles(&mut self, rng: &mut SplitMix64, per_room: usize) {
        self.obstacles.clear();
        for room in &self.rooms {
            for _ in 0..per_room {
                let x = room.x + (rng.next_f32() * 2.0 * OBSTACLE_SPREAD - OBSTACLE_SPREAD);
                let z = room.z + (rng.next_f32() * 2.0 * OBSTACLE_SPREAD - OBSTACLE_SPREAD);
                self.obstacles.push(Vec3::new(x, OBSTACLE_Y, z));
            }
        }
        tracing::debug!(count = self.obstacles.len(), "scattered obstacles");
    }

    /// Room boxes, in build order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Doorway markers drawn on the minimap.
    pub fn doorways(&self) -> &[Doorway] {
        &self.doorways
    }

    /// Crate centers in world space.
    pub fn obstacles(&self) -> &[Vec3] {
        &self.obstacles
    }
}
