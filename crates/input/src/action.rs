use serde::{Deserialize, Serialize};

/// A held control. Each one maps to exactly one boolean intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::Forward,
        Control::Backward,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::TurnLeft,
        Control::TurnRight,
    ];

    /// Short lowercase label for logs and debug dumps.
    pub fn name(self) -> &'static str {
        match self {
            Control::Forward => "forward",
            Control::Backward => "backward",
            Control::StrafeLeft => "left",
            Control::StrafeRight => "right",
            Control::TurnLeft => "turn_left",
            Control::TurnRight => "turn_right",
        }
    }
}

/// What a physical key is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Binding {
    Hold(Control),
    Shoot,
}

impl Binding {
    /// Look up the binding for a DOM-style key code (`"ArrowUp"`, `"KeyA"`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        let binding = match code {
            "ArrowUp" => Self::Hold(Control::Forward),
            "ArrowDown" => Self::Hold(Control::Backward),
            "ArrowLeft" => Self::Hold(Control::TurnLeft),
            "ArrowRight" => Self::Hold(Control::TurnRight),
            "KeyA" => Self::Hold(Control::StrafeLeft),
            "KeyD" => Self::Hold(Control::StrafeRight),
            "Space" => Self::Shoot,
            _ => return None,
        };
        Some(binding)
    }
}

/// A platform input event, already translated out of the windowing layer.
///
/// The session consumes these, never raw key codes, so the desktop app and
/// the headless CLI drive identical logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A bound key went down.
    Pressed(Binding),
    /// A bound key came up.
    Released(Binding),
    /// The platform granted or revoked pointer lock.
    PointerLockChanged(bool),
    /// Relative pointer motion in device units.
    PointerMoved { dx: f32, dy: f32 },
}

impl InputEvent {
    /// Translate a key transition by code. Unbound keys yield `None`.
    pub fn key(code: &str, pressed: bool) -> Option<Self> {
        let binding = Binding::from_code(code)?;
        Some(if pressed {
            Self::Pressed(binding)
        } else {
            Self::Released(binding)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_move_and_turn() {
        assert_eq!(
            Binding::from_code("ArrowUp"),
            Some(Binding::Hold(Control::Forward))
        );
        assert_eq!(
            Binding::from_code("ArrowDown"),
            Some(Binding::Hold(Control::Backward))
        );
        assert_eq!(
            Binding::from_code("ArrowLeft"),
            Some(Binding::Hold(Control::TurnLeft))
        );
        assert_eq!(
            Binding::from_code("ArrowRight"),
            Some(Binding::Hold(Control::TurnRight))
        );
    }

    #[test]
    fn a_and_d_strafe() {
        assert_eq!(
            Binding::from_code("KeyA"),
            Some(Binding::Hold(Control::StrafeLeft))
        );
        assert_eq!(
            Binding::from_code("KeyD"),
            Some(Binding::Hold(Control::StrafeRight))
        );
    }

    #[test]
    fn space_shoots_and_unbound_is_none() {
        assert_eq!(Binding::from_code("Space"), Some(Binding::Shoot));
        assert_eq!(Binding::from_code("KeyW"), None);
        assert_eq!(InputEvent::key("KeyQ", true), None);
    }

    #[test]
    fn key_event_direction() {
        assert!(matches!(
            InputEvent::key("ArrowUp", true),
            Some(InputEvent::Pressed(Binding::Hold(Control::Forward)))
        ));
        assert!(matches!(
            InputEvent::key("Space", false),
            Some(InputEvent::Released(Binding::Shoot))
        ));
    }
}
