//! Input: key and pointer events mapped to held intents and the shoot gate.
//!
//! # Invariants
//! - Held flags and the lock state change only through `InputIntents::handle`;
//!   the shoot gate also re-arms through `InputIntents::advance`.
//! - The shoot gate re-arms no earlier than one cooldown after an accepted shot.

pub mod action;
mod gate;
mod intent;

pub use action::{Binding, Control, InputEvent};
pub use gate::{SHOOT_COOLDOWN, ShootGate};
pub use intent::{Handled, InputIntents};

pub fn crate_info() -> &'static str {
    "gallery-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
