use std::time::Duration;

/// Default delay between accepted shots.
pub const SHOOT_COOLDOWN: Duration = Duration::from_millis(500);

/// Shoot readiness with a one-shot scheduled re-arm.
///
/// Time is the session clock (elapsed since start), passed in by the caller.
/// An accepted shot schedules the re-arm at `accepted_at + cooldown`; the
/// transition fires on the first [`ShootGate::advance`] at or past that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShootGate {
    ready: bool,
    rearm_at: Option<Duration>,
    cooldown: Duration,
}

impl Default for ShootGate {
    fn default() -> Self {
        Self::new(SHOOT_COOLDOWN)
    }
}

impl ShootGate {
    /// A ready gate that stays closed for `cooldown` after each accepted shot.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            ready: true,
            rearm_at: None,
            cooldown,
        }
    }

    /// Whether a shot would be accepted now.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Instant at which the gate re-arms, if a re-arm is pending.
    pub fn rearm_at(&self) -> Option<Duration> {
        self.rearm_at
    }

    /// Try to accept a shot at `now`. Returns `false` while cooling down.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        self.advance(now);
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.rearm_at = Some(now + self.cooldown);
        true
    }

    /// Fire the pending re-arm if its instant has been reached.
    pub fn advance(&mut self, now: Duration) {
        if let Some(at) = self.rearm_at {
            if now >= at {
                self.ready = true;
                self.rearm_at = None;
                tracing::trace!(?now, "shoot gate re-armed");
            }
        }
    }
}
