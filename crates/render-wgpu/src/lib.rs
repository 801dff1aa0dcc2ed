//! wgpu render backend for the shooting gallery.
//!
//! Draws the cube instances produced by `gallery_render::extract_scene`:
//! room shells from the inside, floors, crates, the gun, tracers and sparks.
//!
//! # Invariants
//! - Renderer never mutates session state.
//! - The camera is derived from the player pose each frame.

mod camera;
mod gpu;
mod shaders;

pub use camera::FirstPersonCamera;
pub use gpu::{DrawBatches, WgpuRenderer};
