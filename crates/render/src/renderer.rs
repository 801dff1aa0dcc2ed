use crate::scene::extract_scene;
use gallery_input::Control;
use gallery_kernel::{Effect, Session};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads session state and produces output. It never mutates
/// the session; the frame loop owns all game state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given session.
    fn render(&self, session: &Session) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable dump of the session: pose, held intents, shoot
/// state and live effects. Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &Session) -> String {
        let mut out = String::new();
        let pose = session.pose();
        let intents = session.intents();

        let _ = writeln!(
            out,
            "=== Gallery (frame={}, t={}ms) ===",
            session.frame_count(),
            session.clock().as_millis()
        );
        let _ = writeln!(
            out,
            "Pose: pos=({:.2}, {:.2}, {:.2}) yaw={:.3} pitch={:.3}",
            pose.position.x, pose.position.y, pose.position.z, pose.yaw, pose.pitch
        );
        let held: Vec<&str> = Control::ALL
            .into_iter()
            .filter(|c| intents.is_held(*c))
            .map(Control::name)
            .collect();
        let _ = writeln!(
            out,
            "Input: locked={} shoot_ready={} held=[{}]",
            intents.pointer_locked(),
            intents.shoot_ready(),
            held.join(", ")
        );
        let _ = writeln!(
            out,
            "Scene: {} items, {} effects",
            extract_scene(session).len(),
            session.effects().len()
        );

        for effect in session.effects().iter() {
            let _ = match effect {
                Effect::Bullet(b) => writeln!(
                    out,
                    "  bullet pos=({:.2}, {:.2}, {:.2})",
                    b.position.x, b.position.y, b.position.z
                ),
                Effect::MuzzleFlash(m) => writeln!(
                    out,
                    "  muzzle_flash sparks={} opacity={:.3}",
                    m.particles.len(),
                    m.opacity
                ),
                Effect::GunFlash(g) => {
                    writeln!(out, "  gun_flash until={}ms", g.ends_at.as_millis())
                }
            };
        }

        out
    }
}
