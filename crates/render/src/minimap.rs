//! Top-down minimap: world XZ projected onto a fixed-size overlay.
//!
//! Overlay Y grows downward while world Z grows "up" the map, so the
//! projection flips Z. The scale is uniform (the smaller of the per-axis
//! scales) so the world's aspect ratio is preserved and everything fits
//! inside the padded area.

use crate::renderer::Renderer;
use crate::surface::{CommandList, DrawSurface, OverlayRect, Rgba, Stroke};
use gallery_common::{Doorway, MINIMAP_WORLD_BOUNDS, PlayerPose, Room, WorldBounds};
use gallery_kernel::Session;
use glam::Vec2;

const BACKGROUND: Rgba = Rgba::from_rgba8(0, 0, 0, 0.7);
const ROOM_STROKE: Stroke = Stroke::new(2.0, Rgba::from_rgba8(255, 255, 255, 0.7));
const ROOM_FILL: Rgba = Rgba::from_rgba8(255, 255, 255, 0.1);
const DOOR_GLOW: Rgba = Rgba::from_rgba8(255, 255, 255, 0.2);
const DOOR_GLOW_RADIUS: f32 = 6.0;
const DOOR_MARKER: Rgba = Rgba::from_rgba8(255, 255, 255, 0.8);
const DOOR_MARKER_RADIUS: f32 = 3.0;
const PLAYER_GLOW: Rgba = Rgba::from_rgba8(255, 153, 0, 0.2);
const PLAYER_GLOW_RADIUS: f32 = 8.0;
const PLAYER_COLOR: Rgba = Rgba::from_rgba8(255, 153, 0, 1.0);
const PLAYER_DOT_RADIUS: f32 = 4.0;
const HEADING_LENGTH: f32 = 10.0;
const HEADING_WIDTH: f32 = 2.0;

/// Overlay size and padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapConfig {
    pub size: Vec2,
    pub padding: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(200.0, 200.0),
            padding: 20.0,
        }
    }
}

/// Uniform scale and centering offsets for one overlay size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapGeometry {
    pub scale: f32,
    /// Horizontal (x) and vertical (z) centering offsets.
    pub offset: Vec2,
    size: Vec2,
    bounds: WorldBounds,
}

impl MinimapGeometry {
    /// Precompute scale and offset for `bounds` on a `size` overlay inset by `padding`.
    pub fn new(bounds: WorldBounds, size: Vec2, padding: f32) -> Self {
        let scale_x = (size.x - 2.0 * padding) / bounds.width();
        let scale_z = (size.y - 2.0 * padding) / bounds.depth();
        let scale = scale_x.min(scale_z);
        let offset = Vec2::new(
            (size.x - bounds.width() * scale) / 2.0,
            (size.y - bounds.depth() * scale) / 2.0,
        );
        Self {
            scale,
            offset,
            size,
            bounds,
        }
    }

    /// Project a world XZ point to overlay coordinates.
    pub fn project(&self, x: f32, z: f32) -> Vec2 {
        let u = self.offset.x + (x - self.bounds.min_x()) * self.scale;
        let v = self.size.y - (self.offset.y + (z - self.bounds.min_z()) * self.scale);
        Vec2::new(u, v)
    }

    /// Overlay rectangle covering a room footprint.
    pub fn project_room(&self, room: &Room) -> OverlayRect {
        let (min_x, min_z) = room.min_corner();
        let (max_x, max_z) = room.max_corner();
        OverlayRect::from_corners(self.project(min_x, min_z), self.project(max_x, max_z))
    }
}

/// Project `(x, z)` onto an overlay of `size` with `padding`, scaled to `bounds`.
pub fn project(x: f32, z: f32, size: Vec2, padding: f32, bounds: &WorldBounds) -> Vec2 {
    MinimapGeometry::new(*bounds, size, padding).project(x, z)
}

/// Draws the full minimap once per frame: background, rooms, doorways, player.
#[derive(Debug, Clone)]
pub struct MinimapRenderer {
    config: MinimapConfig,
    bounds: WorldBounds,
}

impl Default for MinimapRenderer {
    fn default() -> Self {
        Self::new(MinimapConfig::default(), MINIMAP_WORLD_BOUNDS)
    }
}

impl MinimapRenderer {
    /// Renderer for `bounds` drawn with the given overlay settings.
    pub fn new(config: MinimapConfig, bounds: WorldBounds) -> Self {
        let geo = MinimapGeometry::new(bounds, config.size, config.padding);
        tracing::debug!(scale = geo.scale, offset = ?geo.offset, "minimap geometry");
        Self { config, bounds }
    }

    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Geometry for the surface's current size.
    pub fn geometry(&self, size: Vec2) -> MinimapGeometry {
        MinimapGeometry::new(self.bounds, size, self.config.padding)
    }

    /// Issue one complete redraw. Later commands occlude earlier ones.
    pub fn draw(
        &self,
        surface: &mut impl DrawSurface,
        pose: &PlayerPose,
        rooms: &[Room],
        doorways: &[Doorway],
    ) {
        let size = surface.size();
        let geo = self.geometry(size);

        surface.fill_rect(OverlayRect::from_size(size), BACKGROUND);

        for room in rooms {
            let rect = geo.project_room(room);
            surface.stroke_rect(rect, ROOM_STROKE);
            surface.fill_rect(rect, ROOM_FILL);
        }

        for door in doorways {
            let p = geo.project(door.x, door.z);
            surface.fill_circle(p, DOOR_GLOW_RADIUS, DOOR_GLOW);
            surface.fill_circle(p, DOOR_MARKER_RADIUS, DOOR_MARKER);
        }

        let p = geo.project(pose.position.x, pose.position.z);
        surface.fill_circle(p, PLAYER_GLOW_RADIUS, PLAYER_GLOW);
        let heading = p - Vec2::new(pose.yaw.sin(), pose.yaw.cos()) * HEADING_LENGTH;
        surface.stroke_line(p, heading, Stroke::new(HEADING_WIDTH, PLAYER_COLOR));
        surface.fill_circle(p, PLAYER_DOT_RADIUS, PLAYER_COLOR);
    }
}

impl Renderer for MinimapRenderer {
    type Output = CommandList;

    fn render(&self, session: &Session) -> CommandList {
        let mut list = CommandList::new(self.config.size);
        let layout = session.layout();
        self.draw(&mut list, session.pose(), layout.rooms(), layout.doorways());
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawCommand;
    use glam::Vec3;

    fn geo() -> MinimapGeometry {
        MinimapGeometry::new(MINIMAP_WORLD_BOUNDS, Vec2::splat(200.0), 20.0)
    }

    fn pose_at(x: f32, z: f32, yaw: f32) -> PlayerPose {
        PlayerPose {
            position: Vec3::new(x, 2.0, z),
            yaw,
            pitch: 0.0,
        }
    }

    #[test]
    fn square_bounds_scale_exactly_four() {
        let g = geo();
        assert_eq!(g.scale, 4.0);
        assert_eq!(g.offset, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn center_projects_to_center() {
        assert_eq!(geo().project(10.0, 10.0), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn corners_land_on_padding() {
        let g = geo();
        assert_eq!(g.project(-10.0, -10.0), Vec2::new(20.0, 180.0));
        assert_eq!(g.project(30.0, 30.0), Vec2::new(180.0, 20.0));
    }

    #[test]
    fn projection_is_deterministic() {
        let bounds = MINIMAP_WORLD_BOUNDS;
        let a = project(3.3, -7.1, Vec2::splat(200.0), 20.0, &bounds);
        let b = project(3.3, -7.1, Vec2::splat(200.0), 20.0, &bounds);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    #[test]
    fn increasing_z_moves_marker_up() {
        let g = geo();
        let mut last = f32::INFINITY;
        for i in 0..=40 {
            let v = g.project(5.0, -10.0 + i as f32).y;
            assert!(v < last);
            last = v;
        }
    }

    #[test]
    fn wide_bounds_use_smaller_scale_and_center_vertically() {
        let bounds = WorldBounds::new(0.0, 80.0, 0.0, 40.0).unwrap();
        let g = MinimapGeometry::new(bounds, Vec2::splat(200.0), 20.0);
        // scale_x = 160/80 = 2, scale_z = 160/40 = 4
        assert_eq!(g.scale, 2.0);
        assert_eq!(g.offset, Vec2::new(20.0, 60.0));
        assert_eq!(g.project(40.0, 20.0), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn room_rect_is_normalized() {
        let rect = geo().project_room(&Room::new(0.0, 0.0, 20.0, 10.0, 20.0));
        assert_eq!(rect.min, Vec2::new(20.0, 100.0));
        assert_eq!(rect.max, Vec2::new(100.0, 180.0));
    }

    #[test]
    fn draw_order_and_counts() {
        let rooms = [Room::new(0.0, 0.0, 20.0, 10.0, 20.0)];
        let doors = [Doorway::new(10.0, 0.0)];
        let mut list = CommandList::new(Vec2::splat(200.0));
        MinimapRenderer::default().draw(&mut list, &pose_at(0.0, 0.0, 0.0), &rooms, &doors);

        let cmds = list.commands();
        // background + room(2) + door(2) + player(3)
        assert_eq!(cmds.len(), 8);
        assert!(matches!(cmds[0], DrawCommand::FillRect { rect, .. } if rect.size() == Vec2::splat(200.0)));
        assert!(matches!(cmds[1], DrawCommand::StrokeRect { .. }));
        assert!(matches!(cmds[2], DrawCommand::FillRect { .. }));
        assert!(matches!(cmds[3], DrawCommand::FillCircle { radius, .. } if radius == 6.0));
        assert!(matches!(cmds[4], DrawCommand::FillCircle { radius, .. } if radius == 3.0));
        assert!(matches!(cmds[5], DrawCommand::FillCircle { radius, .. } if radius == 8.0));
        assert!(matches!(cmds[6], DrawCommand::StrokeLine { .. }));
        assert!(matches!(cmds[7], DrawCommand::FillCircle { radius, .. } if radius == 4.0));
    }

    #[test]
    fn empty_lists_draw_only_background_and_player() {
        let mut list = CommandList::new(Vec2::splat(200.0));
        MinimapRenderer::default().draw(&mut list, &pose_at(0.0, 0.0, 0.0), &[], &[]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn heading_line_rotates_with_yaw() {
        let heading_end = |yaw: f32| {
            let mut list = CommandList::new(Vec2::splat(200.0));
            MinimapRenderer::default().draw(&mut list, &pose_at(10.0, 10.0, yaw), &[], &[]);
            match list.commands()[2] {
                DrawCommand::StrokeLine { from, to, .. } => (from, to),
                other => panic!("expected heading line, got {other:?}"),
            }
        };

        let (from, to) = heading_end(0.0);
        assert_eq!(from, Vec2::new(100.0, 100.0));
        assert!((to - Vec2::new(100.0, 90.0)).length() < 1e-4);

        let (_, to) = heading_end(std::f32::consts::FRAC_PI_2);
        assert!((to - Vec2::new(90.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn redraw_is_complete_every_frame() {
        let r = MinimapRenderer::default();
        let rooms = [Room::new(0.0, 0.0, 20.0, 10.0, 20.0)];
        let mut a = CommandList::new(Vec2::splat(200.0));
        let mut b = CommandList::new(Vec2::splat(200.0));
        r.draw(&mut a, &pose_at(1.0, 1.0, 0.3), &rooms, &[]);
        r.draw(&mut b, &pose_at(1.0, 1.0, 0.3), &rooms, &[]);
        assert_eq!(a, b);
    }
}
