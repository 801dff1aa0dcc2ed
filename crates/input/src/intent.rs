use crate::action::{Binding, Control, InputEvent};
use crate::gate::ShootGate;
use std::time::Duration;

/// What happened when an event was applied to the intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event had no effect (unlocked, unbound, or pointer motion).
    Ignored,
    /// A held flag or the lock state changed.
    Updated,
    /// A shot was accepted; the caller spawns its effects.
    ShotAccepted,
    /// Shoot pressed while cooling down.
    ShotRejected,
}

/// Held-control flags plus pointer lock and shoot readiness.
///
/// Flags are set on press and cleared on release. Presses are ignored while
/// the pointer is unlocked, and losing the lock clears every held flag.
#[derive(Debug, Clone, Default)]
pub struct InputIntents {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    turn_left: bool,
    turn_right: bool,
    pointer_locked: bool,
    shoot: ShootGate,
}

impl InputIntents {
    /// Nothing held, pointer unlocked, shoot ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents with a non-default shoot cooldown.
    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            shoot: ShootGate::new(cooldown),
            ..Self::default()
        }
    }

    /// Whether the platform currently holds pointer lock.
    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Whether the next shoot press would be accepted.
    pub fn shoot_ready(&self) -> bool {
        self.shoot.is_ready()
    }

    /// Whether `control` is currently held down.
    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Backward => self.backward,
            Control::StrafeLeft => self.left,
            Control::StrafeRight => self.right,
            Control::TurnLeft => self.turn_left,
            Control::TurnRight => self.turn_right,
        }
    }

    fn set_held(&mut self, control: Control, held: bool) {
        let flag = match control {
            Control::Forward => &mut self.forward,
            Control::Backward => &mut self.backward,
            Control::StrafeLeft => &mut self.left,
            Control::StrafeRight => &mut self.right,
            Control::TurnLeft => &mut self.turn_left,
            Control::TurnRight => &mut self.turn_right,
        };
        *flag = held;
    }

    fn clear_held(&mut self) {
        for control in Control::ALL {
            self.set_held(control, false);
        }
    }

    /// True while at least one movement or turn control is held.
    pub fn any_held(&self) -> bool {
        Control::ALL.iter().any(|c| self.is_held(*c))
    }

    /// Run scheduled transitions (shoot re-arm) up to `now`.
    pub fn advance(&mut self, now: Duration) {
        self.shoot.advance(now);
    }

    /// Apply one event at session time `now`.
    pub fn handle(&mut self, event: &InputEvent, now: Duration) -> Handled {
        match *event {
            InputEvent::PointerLockChanged(locked) => {
                if locked == self.pointer_locked {
                    return Handled::Ignored;
                }
                self.pointer_locked = locked;
                if !locked {
                    self.clear_held();
                }
                tracing::info!(locked, "pointer lock changed");
                Handled::Updated
            }
            InputEvent::Pressed(_) if !self.pointer_locked => Handled::Ignored,
            InputEvent::Pressed(Binding::Hold(control)) => {
                self.set_held(control, true);
                Handled::Updated
            }
            InputEvent::Pressed(Binding::Shoot) => {
                if self.shoot.try_fire(now) {
                    tracing::debug!(?now, "shot accepted");
                    Handled::ShotAccepted
                } else {
                    Handled::ShotRejected
                }
            }
            InputEvent::Released(Binding::Hold(control)) => {
                if !self.is_held(control) {
                    return Handled::Ignored;
                }
                self.set_held(control, false);
                Handled::Updated
            }
            InputEvent::Released(Binding::Shoot) | InputEvent::PointerMoved { .. } => {
                Handled::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Duration = Duration::ZERO;

    fn locked() -> InputIntents {
        let mut i = InputIntents::new();
        i.handle(&InputEvent::PointerLockChanged(true), T0);
        i
    }

    fn press(c: Control) -> InputEvent {
        InputEvent::Pressed(Binding::Hold(c))
    }

    fn release(c: Control) -> InputEvent {
        InputEvent::Released(Binding::Hold(c))
    }

    #[test]
    fn defaults_all_false_and_ready() {
        let i = InputIntents::new();
        assert!(!i.any_held());
        assert!(!i.pointer_locked());
        assert!(i.shoot_ready());
    }

    #[test]
    fn press_and_release_toggle_flag() {
        let mut i = locked();
        for c in Control::ALL {
            assert_eq!(i.handle(&press(c), T0), Handled::Updated);
            assert!(i.is_held(c));
            assert_eq!(i.handle(&release(c), T0), Handled::Updated);
            assert!(!i.is_held(c));
        }
    }

    #[test]
    fn flags_are_independent() {
        let mut i = locked();
        i.handle(&press(Control::Forward), T0);
        i.handle(&press(Control::StrafeLeft), T0);
        let held: Vec<Control> = Control::ALL.into_iter().filter(|c| i.is_held(*c)).collect();
        assert_eq!(held, [Control::Forward, Control::StrafeLeft]);
    }

    #[test]
    fn presses_ignored_while_unlocked() {
        let mut i = InputIntents::new();
        assert_eq!(i.handle(&press(Control::Forward), T0), Handled::Ignored);
        assert!(!i.is_held(Control::Forward));
        let shoot = InputEvent::Pressed(Binding::Shoot);
        assert_eq!(i.handle(&shoot, T0), Handled::Ignored);
        assert!(i.shoot_ready());
    }

    #[test]
    fn unlocking_clears_held_flags() {
        let mut i = locked();
        i.handle(&press(Control::Forward), T0);
        i.handle(&press(Control::TurnRight), T0);
        i.handle(&InputEvent::PointerLockChanged(false), T0);
        assert!(!i.any_held());
        assert!(!i.pointer_locked());
    }

    #[test]
    fn repeated_lock_notification_is_ignored() {
        let mut i = locked();
        assert_eq!(
            i.handle(&InputEvent::PointerLockChanged(true), T0),
            Handled::Ignored
        );
    }

    #[test]
    fn shoot_goes_through_cooldown() {
        let mut i = locked();
        let shoot = InputEvent::Pressed(Binding::Shoot);
        assert_eq!(i.handle(&shoot, T0), Handled::ShotAccepted);
        assert!(!i.shoot_ready());
        assert_eq!(
            i.handle(&shoot, Duration::from_millis(200)),
            Handled::ShotRejected
        );
        i.advance(Duration::from_millis(499));
        assert!(!i.shoot_ready());
        i.advance(Duration::from_millis(500));
        assert!(i.shoot_ready());
    }

    #[test]
    fn pointer_motion_does_not_touch_intents() {
        let mut i = locked();
        let ev = InputEvent::PointerMoved { dx: 10.0, dy: 3.0 };
        assert_eq!(i.handle(&ev, T0), Handled::Ignored);
    }
}
