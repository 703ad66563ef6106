use stardrift_engine::core::AppControl;
use stardrift_engine::input::{Key, KeyState};

/// Held-key flags driving the simulation.
///
/// Each flag mirrors its key: set on press, cleared on release. Opposite pairs
/// may both be held; [`crate::state::ApplicationState::update`] decides which wins.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ControlFlags {
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub accelerate: bool,
    pub decelerate: bool,
}

/// A flag a key can drive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    RotateLeft,
    RotateRight,
    Accelerate,
    Decelerate,
}

/// Key bindings. Escape is handled separately and always quits.
pub fn binding(key: Key) -> Option<Control> {
    match key {
        Key::ArrowUp => Some(Control::ZoomIn),
        Key::ArrowDown => Some(Control::ZoomOut),
        Key::A => Some(Control::RotateLeft),
        Key::D => Some(Control::RotateRight),
        Key::W => Some(Control::Accelerate),
        Key::S => Some(Control::Decelerate),
        _ => None,
    }
}

impl ControlFlags {
    pub fn flag_mut(&mut self, control: Control) -> &mut bool {
        match control {
            Control::ZoomIn => &mut self.zoom_in,
            Control::ZoomOut => &mut self.zoom_out,
            Control::RotateLeft => &mut self.rotate_left,
            Control::RotateRight => &mut self.rotate_right,
            Control::Accelerate => &mut self.accelerate,
            Control::Decelerate => &mut self.decelerate,
        }
    }

    /// Applies one key transition. Returns `Exit` when Escape is pressed.
    pub fn apply_key(&mut self, key: Key, state: KeyState) -> AppControl {
        if key == Key::Escape {
            return match state {
                KeyState::Pressed => AppControl::Exit,
                KeyState::Released => AppControl::Continue,
            };
        }

        if let Some(control) = binding(key) {
            *self.flag_mut(control) = state == KeyState::Pressed;
        }

        AppControl::Continue
    }

    /// Releases every flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
