use serde::{Deserialize, Serialize};

/// Errors from constructing layout geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("bounds must have positive extent on both axes (x: {min_x}..{max_x}, z: {min_z}..{max_z})")]
    DegenerateBounds {
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
    },
    #[error("bounds contain a non-finite value")]
    NonFiniteBounds,
    #[error("room at ({x}, {z}) has a non-positive dimension")]
    InvalidRoom { x: f32, z: f32 },
}

/// Axis-aligned rectangle on the XZ plane.
///
/// Extents are strictly positive on both axes; `new` rejects anything else so
/// projections never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct WorldBounds {
    min_x: f32,
    max_x: f32,
    min_z: f32,
    max_z: f32,
}

#[derive(Deserialize)]
struct RawBounds {
    min_x: f32,
    max_x: f32,
    min_z: f32,
    max_z: f32,
}

impl TryFrom<RawBounds> for WorldBounds {
    type Error = LayoutError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(raw.min_x, raw.max_x, raw.min_z, raw.max_z)
    }
}

/// Extent of the world as scaled onto the minimap.
pub const MINIMAP_WORLD_BOUNDS: WorldBounds = WorldBounds {
    min_x: -10.0,
    max_x: 30.0,
    min_z: -10.0,
    max_z: 30.0,
};

/// Rectangle the player position is clamped to every frame.
///
/// Maintained separately from [`MINIMAP_WORLD_BOUNDS`]; the two are not kept in
/// sync and changing one does not move the other.
pub const PLAYER_CLAMP_BOUNDS: WorldBounds = WorldBounds {
    min_x: -9.0,
    max_x: 29.0,
    min_z: -9.0,
    max_z: 29.0,
};

impl WorldBounds {
    /// Validated rectangle; fails on non-finite values or an empty extent.
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Result<Self, LayoutError> {
        if ![min_x, max_x, min_z, max_z].iter().all(|v| v.is_finite()) {
            return Err(LayoutError::NonFiniteBounds);
        }
        if max_x <= min_x || max_z <= min_z {
            return Err(LayoutError::DegenerateBounds {
                min_x,
                max_x,
                min_z,
                max_z,
            });
        }
        Ok(Self {
            min_x,
            max_x,
            min_z,
            max_z,
        })
    }

    /// Smallest x inside the rectangle.
    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Largest x inside the rectangle.
    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Smallest z inside the rectangle.
    pub fn min_z(&self) -> f32 {
        self.min_z
    }

    /// Largest z inside the rectangle.
    pub fn max_z(&self) -> f32 {
        self.max_z
    }

    /// Extent along x, always positive.
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Extent along z, always positive.
    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Midpoint as (x, z).
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Inclusive containment test on both axes.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    /// Clamp each axis independently into the rectangle.
    pub fn clamp(&self, x: f32, z: f32) -> (f32, f32) {
        (x.clamp(self.min_x, self.max_x), z.clamp(self.min_z, self.max_z))
    }
}
