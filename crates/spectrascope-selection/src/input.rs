//! Pointer input for selection gestures
//!
//! Platform pointer events arrive with the full modifier state. Selection only
//! distinguishes `shift` (add) and `ctrl` (toggle); on macOS the command key
//! plays the role of ctrl.

use serde::{Deserialize, Serialize};
use spectrascope_core::Point2;

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on macOS
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// The two flags selection cares about
    pub fn selection(&self) -> SelectionModifiers {
        SelectionModifiers {
            shift: self.shift,
            ctrl: self.ctrl || self.meta,
        }
    }
}

/// Modifier flags as seen by the action resolver
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionModifiers {
    pub shift: bool,
    /// Literal Ctrl or the Mac meta key
    pub ctrl: bool,
}

impl SelectionModifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };
}

impl From<Modifiers> for SelectionModifiers {
    fn from(modifiers: Modifiers) -> Self {
        modifiers.selection()
    }
}

/// Mouse button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Pointer event in chart screen coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Button pressed
    Press {
        button: MouseButton,
        position: Point2,
        modifiers: Modifiers,
    },

    /// Pointer moved, with or without a button held
    Move { position: Point2, modifiers: Modifiers },

    /// Button released; the position may lie outside the canvas
    Release {
        button: MouseButton,
        position: Point2,
        modifiers: Modifiers,
    },

    /// Pointer left the canvas
    Leave,
}

impl PointerEvent {
    pub fn press(position: impl Into<Point2>, modifiers: Modifiers) -> Self {
        PointerEvent::Press {
            button: MouseButton::Left,
            position: position.into(),
            modifiers,
        }
    }

    pub fn move_to(position: impl Into<Point2>, modifiers: Modifiers) -> Self {
        PointerEvent::Move {
            position: position.into(),
            modifiers,
        }
    }

    pub fn release(position: impl Into<Point2>, modifiers: Modifiers) -> Self {
        PointerEvent::Release {
            button: MouseButton::Left,
            position: position.into(),
            modifiers,
        }
    }

    /// Get position for events that have one
    pub fn position(&self) -> Option<Point2> {
        match self {
            PointerEvent::Press { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Release { position, .. } => Some(*position),
            PointerEvent::Leave => None,
        }
    }

    /// Get modifiers for events that have them
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            PointerEvent::Press { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Release { modifiers, .. } => Some(*modifiers),
            PointerEvent::Leave => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_counts_as_ctrl() {
        let mods = Modifiers::new().with_meta().selection();
        assert_eq!(mods, SelectionModifiers::CTRL);
    }

    #[test]
    fn test_alt_is_ignored_by_selection() {
        let mods = Modifiers::new().with_alt();
        assert!(mods.any());
        assert_eq!(mods.selection(), SelectionModifiers::NONE);
    }

    #[test]
    fn test_event_accessors() {
        let e = PointerEvent::press((3.0, 4.0), Modifiers::new().with_shift());
        assert_eq!(e.position(), Some(Point2::new(3.0, 4.0)));
        assert_eq!(e.modifiers().map(|m| m.shift), Some(true));
        assert_eq!(PointerEvent::Leave.position(), None);
    }
}
