use glam::Vec2;
use serde::Serialize;

/// Straight (non-premultiplied) color with components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// CSS-style `rgba(r, g, b, a)` with 8-bit channels and float alpha.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Line color and width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgba,
}

impl Stroke {
    pub const fn new(width: f32, color: Rgba) -> Self {
        Self { width, color }
    }
}

/// Axis-aligned rectangle in overlay space with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl OverlayRect {
    /// Rectangle spanning two arbitrary opposite corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// A fixed-size 2D drawing surface in overlay coordinates (origin top-left, Y down).
pub trait DrawSurface {
    /// Logical size of the surface.
    fn size(&self) -> Vec2;

    fn fill_rect(&mut self, rect: OverlayRect, color: Rgba);

    fn stroke_rect(&mut self, rect: OverlayRect, stroke: Stroke);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect { rect: OverlayRect, color: Rgba },
    StrokeRect { rect: OverlayRect, stroke: Stroke },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeLine { from: Vec2, to: Vec2, stroke: Stroke },
}

/// A surface that records commands instead of drawing them.
///
/// Used by headless tools and tests; a real backend replays the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replay every recorded command onto another surface, in order.
    pub fn replay(&self, target: &mut impl DrawSurface) {
        for cmd in &self.commands {
            match *cmd {
                DrawCommand::FillRect { rect, color } => target.fill_rect(rect, color),
                DrawCommand::StrokeRect { rect, stroke } => target.stroke_rect(rect, stroke),
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => target.fill_circle(center, radius, color),
                DrawCommand::StrokeLine { from, to, stroke } => {
                    target.stroke_line(from, to, stroke)
                }
            }
        }
    }
}

impl DrawSurface for CommandList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: OverlayRect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: OverlayRect, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeRect { rect, stroke });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeLine { from, to, stroke });
    }
}
