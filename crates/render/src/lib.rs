//! Rendering adapter: renderer-agnostic scene extraction and the minimap.
//!
//! # Invariants
//! - Renderers cannot mutate the session.
//! - The minimap is fully redrawn every frame; no drawing state persists.
//! - Minimap bounds are independent of the player clamp rectangle.

mod minimap;
mod renderer;
mod scene;
mod surface;

pub use minimap::{MinimapConfig, MinimapGeometry, MinimapRenderer, project};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{SKY_COLOR, SceneItem, Shading, extract_scene};
pub use surface::{CommandList, DrawCommand, DrawSurface, OverlayRect, Rgba, Stroke};

pub fn crate_info() -> &'static str {
    "gallery-render v0.1.0"
}
