use crate::config::{ConfigError, GalleryConfig};
use crate::effects::{Bullet, Effect, EffectList, FrameContext, GunFlash, MuzzleFlash};
use crate::layout::Layout;
use crate::player::Player;
use crate::rng::SplitMix64;
use gallery_common::PlayerPose;
use gallery_input::{Handled, InputEvent, InputIntents};
use std::time::Duration;

/// Counters from one call to [`Session::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub frame: u64,
    pub live_effects: usize,
    pub expired_effects: usize,
}

/// All mutable game state, owned by the frame loop.
///
/// Input events are applied as they arrive through [`Session::handle`];
/// [`Session::frame`] then advances the clock, scheduled transitions, the
/// player pose and the active effects exactly once per rendered frame.
#[derive(Debug, Clone)]
pub struct Session {
    config: GalleryConfig,
    layout: Layout,
    player: Player,
    intents: InputIntents,
    effects: EffectList,
    rng: SplitMix64,
    clock: Duration,
    frame: u64,
}

impl Session {
    /// Start a session on the configured level, or the standard four-room
    /// layout when the config names none.
    pub fn new(config: GalleryConfig) -> Result<Self, ConfigError> {
        let layout = match &config.level {
            Some(level) => Layout::new(level.rooms.clone(), level.doorways.clone())?,
            None => Layout::standard(),
        };
        Self::with_layout(config, layout)
    }

    /// Start a session on `layout`, replacing its crates with
    /// `obstacles_per_room` seeded ones per room.
    pub fn with_layout(config: GalleryConfig, mut layout: Layout) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SplitMix64::new(config.seed);
        layout.scatter_obstacles(&mut rng, config.obstacles_per_room);
        Ok(Self::assemble(config, layout, rng))
    }

    fn assemble(config: GalleryConfig, layout: Layout, rng: SplitMix64) -> Self {
        tracing::info!(
            rooms = layout.rooms().len(),
            doorways = layout.doorways().len(),
            seed = config.seed,
            "session started"
        );
        Self {
            player: Player::new(&config),
            intents: InputIntents::with_cooldown(config.shoot_cooldown()),
            effects: EffectList::new(),
            clock: Duration::ZERO,
            frame: 0,
            config,
            layout,
            rng,
        }
    }

    /// Tuning the session was started with.
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Static level geometry.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current player pose.
    pub fn pose(&self) -> &PlayerPose {
        self.player.pose()
    }

    /// Direct player access for spawning and scripted runs.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Held controls, pointer lock and shoot readiness.
    pub fn intents(&self) -> &InputIntents {
        &self.intents
    }

    /// Live bullets, muzzle flashes and the gun flash.
    pub fn effects(&self) -> &EffectList {
        &self.effects
    }

    /// Time since the session started, advanced only by [`Session::frame`].
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Apply one input event immediately.
    pub fn handle(&mut self, event: InputEvent) -> Handled {
        if let InputEvent::PointerMoved { dx, dy } = event {
            if !self.intents.pointer_locked() {
                return Handled::Ignored;
            }
            self.player.look(dx, dy);
            return Handled::Updated;
        }

        let handled = self.intents.handle(&event, self.clock);
        if handled == Handled::ShotAccepted {
            self.spawn_shot();
        }
        handled
    }

    fn spawn_shot(&mut self) {
        let pose = *self.player.pose();
        let c = &self.config;
        self.effects.push(Effect::Bullet(Bullet::from_pose(
            &pose,
            c.bullet_speed,
            c.bullet_range,
        )));
        self.effects.push(Effect::MuzzleFlash(MuzzleFlash::spawn(
            &mut self.rng,
            c.particle_count,
            c.particle_fade,
            c.particle_cutoff,
        )));
        self.effects.push(Effect::GunFlash(GunFlash {
            ends_at: self.clock + c.gun_flash(),
        }));
    }

    /// Advance one rendered frame that took `dt` of wall time.
    pub fn frame(&mut self, dt: Duration) -> FrameStats {
        let _span = tracing::trace_span!("session_frame", frame = self.frame).entered();

        self.clock += dt;
        self.intents.advance(self.clock);

        if self.intents.pointer_locked() {
            self.player.update(&self.intents);
        }

        let ctx = FrameContext {
            now: self.clock,
            player_position: self.player.pose().position,
        };
        let expired = self.effects.advance(&ctx);
        self.frame += 1;

        FrameStats {
            frame: self.frame,
            live_effects: self.effects.len(),
            expired_effects: expired,
        }
    }
}
