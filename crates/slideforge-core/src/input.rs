//! Input events consumed by the viewport controller and the coordinate picker.
//!
//! Hosts translate their native events into these types. Conversions from
//! winit are provided.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Pixels scrolled per wheel line for line-based wheel deltas.
pub const PIXELS_PER_WHEEL_LINE: f64 = 20.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// The zoom modifier: Ctrl, or Cmd on macOS.
    pub fn zoom(&self) -> bool {
        self.ctrl || self.meta
    }
}

impl From<winit::keyboard::ModifiersState> for Modifiers {
    fn from(state: winit::keyboard::ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        }
    }
}

/// Keys the viewport reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Character(char),
    Other,
}

impl From<&winit::keyboard::Key> for Key {
    fn from(key: &winit::keyboard::Key) -> Self {
        use winit::keyboard::{Key as WinitKey, NamedKey};
        match key {
            WinitKey::Named(NamedKey::ArrowLeft) => Key::ArrowLeft,
            WinitKey::Named(NamedKey::ArrowRight) => Key::ArrowRight,
            WinitKey::Named(NamedKey::ArrowUp) => Key::ArrowUp,
            WinitKey::Named(NamedKey::ArrowDown) => Key::ArrowDown,
            WinitKey::Named(NamedKey::Space) => Key::Space,
            WinitKey::Character(text) => match text.chars().next() {
                Some(' ') => Key::Space,
                Some(c) => Key::Character(c),
                None => Key::Other,
            },
            _ => Key::Other,
        }
    }
}

/// Keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed { key: Key, modifiers: Modifiers },
    Released { key: Key, modifiers: Modifiers },
}

impl KeyEvent {
    pub fn pressed(key: Key, modifiers: Modifiers) -> Self {
        KeyEvent::Pressed { key, modifiers }
    }

    pub fn released(key: Key) -> Self {
        KeyEvent::Released {
            key,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Wheel event.
///
/// `delta` is in pixels and follows the DOM convention: positive `y` means
/// the user scrolled down, positive `x` means right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn new(delta: Vec2, modifiers: Modifiers) -> Self {
        Self {
            position: Point::ZERO,
            delta,
            modifiers,
        }
    }

    /// Convert a winit scroll delta. Winit reports positive `y` for scrolling
    /// up, so the sign is flipped.
    pub fn from_winit(
        delta: winit::event::MouseScrollDelta,
        position: Point,
        modifiers: Modifiers,
    ) -> Self {
        let delta = match delta {
            winit::event::MouseScrollDelta::LineDelta(x, y) => Vec2::new(
                -(x as f64) * PIXELS_PER_WHEEL_LINE,
                -(y as f64) * PIXELS_PER_WHEEL_LINE,
            ),
            winit::event::MouseScrollDelta::PixelDelta(pos) => Vec2::new(-pos.x, -pos.y),
        };
        Self {
            position,
            delta,
            modifiers,
        }
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_modifier() {
        assert!(Modifiers::ctrl().zoom());
        assert!(
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            }
            .zoom()
        );
        assert!(!Modifiers::shift().zoom());
    }

    #[test]
    fn test_winit_line_delta_flipped() {
        let event = WheelEvent::from_winit(
            winit::event::MouseScrollDelta::LineDelta(0.0, 1.0),
            Point::ZERO,
            Modifiers::NONE,
        );
        assert_eq!(event.delta, Vec2::new(0.0, -PIXELS_PER_WHEEL_LINE));
    }

    #[test]
    fn test_winit_keys() {
        use winit::keyboard::{Key as WinitKey, NamedKey};
        assert_eq!(Key::from(&WinitKey::Named(NamedKey::ArrowUp)), Key::ArrowUp);
        assert_eq!(Key::from(&WinitKey::Named(NamedKey::Space)), Key::Space);
        assert_eq!(Key::from(&WinitKey::Character("0".into())), Key::Character('0'));
        assert_eq!(Key::from(&WinitKey::Named(NamedKey::Enter)), Key::Other);
    }

    #[test]
    fn test_winit_buttons() {
        assert_eq!(MouseButton::from(winit::event::MouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(winit::event::MouseButton::Back), MouseButton::Other);
    }
}
