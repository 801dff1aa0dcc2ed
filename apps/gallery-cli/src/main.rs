use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use gallery_common::MINIMAP_WORLD_BOUNDS;
use gallery_input::{Binding, Handled, InputEvent};
use gallery_kernel::{GalleryConfig, Session};
use gallery_render::{DebugTextRenderer, MinimapRenderer, Renderer, project};
use glam::Vec2;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-cli", about = "Headless tool for the shooting gallery")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tuning file (JSON); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the active tuning
    Info,
    /// Project a world point onto the minimap overlay
    Project {
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, allow_negative_numbers = true)]
        z: f32,
        /// Overlay width and height
        #[arg(long, default_value = "200")]
        size: f32,
        #[arg(long, default_value = "20")]
        padding: f32,
    },
    /// Run a scripted session with the pointer locked
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Key codes held for the whole run, comma separated (e.g. ArrowUp,KeyD)
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Starting yaw in radians
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        yaw: f32,
        /// Try to shoot every N frames
        #[arg(long)]
        shoot_every: Option<u64>,
        /// Frame duration in milliseconds
        #[arg(long, default_value = "16.667")]
        frame_ms: f64,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GalleryConfig> {
    match path {
        Some(p) => GalleryConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(GalleryConfig::default()),
    }
}

/// Convert a `--frame-ms` value into a frame duration.
fn frame_duration(frame_ms: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(frame_ms / 1000.0)
        .with_context(|| format!("frame duration {frame_ms} ms is not a usable duration"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("gallery-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", gallery_kernel::crate_info());
            println!("input: {}", gallery_input::crate_info());
            println!("render: {}", gallery_render::crate_info());
            println!("config: {}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Project {
            x,
            z,
            size,
            padding,
        } => {
            if size <= 2.0 * padding {
                bail!("overlay size {size} leaves no room inside padding {padding}");
            }
            let p = project(x, z, Vec2::splat(size), padding, &MINIMAP_WORLD_BOUNDS);
            println!("({x}, {z}) -> ({:.2}, {:.2})", p.x, p.y);
        }
        Commands::Simulate {
            frames,
            hold,
            yaw,
            shoot_every,
            frame_ms,
            json,
        } => {
            let dt = frame_duration(frame_ms)?;

            let mut session = Session::new(config)?;
            let mut pose = *session.pose();
            pose.yaw = yaw;
            session.player_mut().set_pose(pose);
            session.handle(InputEvent::PointerLockChanged(true));

            for code in &hold {
                let event = InputEvent::key(code, true)
                    .with_context(|| format!("no binding for key code {code:?}"))?;
                session.handle(event);
            }

            let (mut accepted, mut rejected) = (0u64, 0u64);
            for i in 0..frames {
                if shoot_every.is_some_and(|n| n > 0 && i % n == 0) {
                    match session.handle(InputEvent::Pressed(Binding::Shoot)) {
                        Handled::ShotAccepted => accepted += 1,
                        Handled::ShotRejected => rejected += 1,
                        _ => {}
                    }
                    session.handle(InputEvent::Released(Binding::Shoot));
                }
                session.frame(dt);
            }
            tracing::info!(frames, accepted, rejected, "simulation finished");

            let minimap = MinimapRenderer::default().render(&session);
            if json {
                let report = serde_json::json!({
                    "frames": session.frame_count(),
                    "clock_ms": session.clock().as_secs_f64() * 1000.0,
                    "pose": session.pose(),
                    "shots": { "accepted": accepted, "rejected": rejected },
                    "live_effects": session.effects().len(),
                    "minimap": minimap,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", DebugTextRenderer::new().render(&session));
                println!("Shots: accepted={accepted} rejected={rejected}");
                println!("Minimap: {} draw commands", minimap.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_frame_is_sixty_hertz() {
        let dt = frame_duration(16.667).unwrap();
        assert!((dt.as_secs_f64() - 0.016_667).abs() < 1e-9);
        assert_eq!(frame_duration(0.0).unwrap(), Duration::ZERO);
    }

    #[test]
    fn unusable_frame_durations_are_errors() {
        for ms in [-1.0, f64::NAN, f64::INFINITY, 1e300, f64::MAX] {
            assert!(frame_duration(ms).is_err(), "{ms} ms accepted");
        }
    }

    #[test]
    fn simulate_flags_parse() {
        let cli = Cli::try_parse_from([
            "gallery-cli",
            "simulate",
            "--frames",
            "10",
            "--hold",
            "ArrowUp,KeyD",
            "--frame-ms",
            "1e300",
        ])
        .unwrap();
        let Commands::Simulate { hold, frame_ms, .. } = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(hold, ["ArrowUp", "KeyD"]);
        assert!(frame_duration(frame_ms).is_err());
    }
}
