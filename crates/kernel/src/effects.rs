//! Cosmetic shot effects.
//!
//! Each effect owns its termination rule and is advanced once per frame by
//! the session; an effect that reports itself finished is dropped and never
//! revived.

use crate::rng::SplitMix64;
use gallery_common::PlayerPose;
use glam::Vec3;
use std::time::Duration;

/// Gun muzzle position in camera space.
pub const GUN_OFFSET: Vec3 = Vec3::new(0.3, -0.2, -0.5);

/// Per-frame inputs every effect may read.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Session clock after this frame's advance.
    pub now: Duration,
    pub player_position: Vec3,
}

/// A tracer flying in a straight line from the eye.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub position: Vec3,
    /// Unit travel direction.
    pub direction: Vec3,
    pub speed: f32,
    pub range: f32,
}

impl Bullet {
    /// Spawn at the eye, travelling along the current view direction.
    pub fn from_pose(pose: &PlayerPose, speed: f32, range: f32) -> Self {
        Self {
            position: pose.position,
            direction: pose.view_direction(),
            speed,
            range,
        }
    }

    /// Range is measured from where the player is now, not where it fired.
    fn advance(&mut self, ctx: &FrameContext) -> bool {
        self.position += self.direction * self.speed;
        self.position.distance(ctx.player_position) <= self.range
    }
}

/// One spark of a muzzle flash, in camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub offset: Vec3,
    pub velocity: Vec3,
}

/// A burst of sparks that drift and fade together.
#[derive(Debug, Clone, PartialEq)]
pub struct MuzzleFlash {
    pub particles: Vec<Particle>,
    pub opacity: f32,
    fade: f32,
    cutoff: f32,
}

impl MuzzleFlash {
    /// `count` sparks with seeded spread, fully opaque.
    pub fn spawn(rng: &mut SplitMix64, count: usize, fade: f32, cutoff: f32) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                offset: GUN_OFFSET,
                velocity: Vec3::new(
                    (rng.next_f32() - 0.5) * 0.2,
                    (rng.next_f32() - 0.5) * 0.2,
                    -rng.next_f32() * 0.5,
                ),
            })
            .collect();
        Self {
            particles,
            opacity: 1.0,
            fade,
            cutoff,
        }
    }

    fn advance(&mut self) -> bool {
        for p in &mut self.particles {
            p.offset += p.velocity;
        }
        self.opacity *= self.fade;
        self.opacity > self.cutoff
    }
}

/// The barrel glow that lasts a fixed time after a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GunFlash {
    pub ends_at: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Bullet(Bullet),
    MuzzleFlash(MuzzleFlash),
    GunFlash(GunFlash),
}

impl Effect {
    /// Advance one frame. Returns `false` once the effect is finished.
    pub fn advance(&mut self, ctx: &FrameContext) -> bool {
        match self {
            Self::Bullet(b) => b.advance(ctx),
            Self::MuzzleFlash(m) => m.advance(),
            Self::GunFlash(g) => ctx.now < g.ends_at,
        }
    }
}

/// Active effects, drained by the frame loop.
#[derive(Debug, Clone, Default)]
pub struct EffectList {
    effects: Vec<Effect>,
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Advance every effect and drop the finished ones. Returns how many were dropped.
    pub fn advance(&mut self, ctx: &FrameContext) -> usize {
        let before = self.effects.len();
        self.effects.retain_mut(|e| e.advance(ctx));
        let expired = before - self.effects.len();
        if expired > 0 {
            tracing::trace!(expired, live = self.effects.len(), "effects expired");
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Live bullets, oldest first.
    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.effects.iter().filter_map(|e| match e {
            Effect::Bullet(b) => Some(b),
            _ => None,
        })
    }

    /// Live muzzle flash bursts, oldest first.
    pub fn muzzle_flashes(&self) -> impl Iterator<Item = &MuzzleFlash> {
        self.effects.iter().filter_map(|e| match e {
            Effect::MuzzleFlash(m) => Some(m),
            _ => None,
        })
    }

    /// Whether the barrel should be drawn lit this frame.
    pub fn gun_flash_active(&self) -> bool {
        self.effects.iter().any(|e| matches!(e, Effect::GunFlash(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(now_ms: u64, player: Vec3) -> FrameContext {
        FrameContext {
            now: Duration::from_millis(now_ms),
            player_position: player,
        }
    }

    #[test]
    fn bullet_travels_along_view() {
        let pose = PlayerPose::default();
        let mut b = Bullet::from_pose(&pose, 1.0, 50.0);
        assert!(b.advance(&ctx(0, pose.position)));
        assert!((b.position - Vec3::new(0.0, 2.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn bullet_expires_past_range() {
        let pose = PlayerPose::default();
        let mut effect = Effect::Bullet(Bullet::from_pose(&pose, 1.0, 50.0));
        let mut frames = 0;
        while effect.advance(&ctx(0, pose.position)) {
            frames += 1;
            assert!(frames < 1000);
        }
        // Alive through 50 units, removed on the 51st step.
        assert_eq!(frames, 50);
    }

    #[test]
    fn bullet_range_follows_the_player() {
        let pose = PlayerPose::default();
        let mut b = Bullet::from_pose(&pose, 1.0, 50.0);
        // Player keeps pace with the bullet, so it never leaves range.
        for i in 1..200 {
            let chase = pose.position + Vec3::NEG_Z * i as f32;
            assert!(b.advance(&ctx(0, chase)));
        }
    }

    #[test]
    fn muzzle_flash_fades_out() {
        let mut rng = SplitMix64::new(3);
        let mut effect = Effect::MuzzleFlash(MuzzleFlash::spawn(&mut rng, 20, 0.95, 0.01));
        let mut frames = 0;
        while effect.advance(&ctx(0, Vec3::ZERO)) {
            frames += 1;
        }
        // 0.95^89 > 0.01 >= 0.95^90
        assert_eq!(frames, 89);
    }

    #[test]
    fn muzzle_flash_particles_start_at_gun() {
        let mut rng = SplitMix64::new(3);
        let m = MuzzleFlash::spawn(&mut rng, 20, 0.95, 0.01);
        assert_eq!(m.particles.len(), 20);
        for p in &m.particles {
            assert_eq!(p.offset, GUN_OFFSET);
            assert!(p.velocity.x.abs() <= 0.1);
            assert!(p.velocity.y.abs() <= 0.1);
            assert!(p.velocity.z <= 0.0 && p.velocity.z >= -0.5);
        }
    }

    #[test]
    fn gun_flash_ends_on_time() {
        let mut e = Effect::GunFlash(GunFlash {
            ends_at: Duration::from_millis(50),
        });
        assert!(e.advance(&ctx(49, Vec3::ZERO)));
        assert!(!e.advance(&ctx(50, Vec3::ZERO)));
    }

    #[test]
    fn list_drops_finished_effects() {
        let mut list = EffectList::new();
        list.push(Effect::GunFlash(GunFlash {
            ends_at: Duration::from_millis(10),
        }));
        list.push(Effect::Bullet(Bullet::from_pose(
            &PlayerPose::default(),
            1.0,
            50.0,
        )));
        assert_eq!(list.len(), 2);
        assert!(list.gun_flash_active());
        assert_eq!(list.advance(&ctx(16, Vec3::new(0.0, 2.0, 0.0))), 1);
        assert_eq!(list.len(), 1);
        assert!(!list.gun_flash_active());
        assert_eq!(list.bullets().count(), 1);
    }
}
