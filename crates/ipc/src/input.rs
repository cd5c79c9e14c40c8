//! Pointer and keyboard input as delivered by the input source.

use serde::{Deserialize, Serialize};

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// A pointer press or release in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub button: PointerButton,
    /// Viewport-relative x in pixels (0 = left edge)
    pub x: f32,
    /// Viewport-relative y in pixels (0 = top edge)
    pub y: f32,
    /// Monotonic timestamp in milliseconds
    pub timestamp_ms: u64,
}

impl PointerInput {
    pub fn primary(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            button: PointerButton::Primary,
            x,
            y,
            timestamp_ms,
        }
    }
}

/// What a key means to the sticker controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Mode(crate::commands::TransformMode),
    RemoveSelected,
    CancelPlacement,
}

impl KeyAction {
    /// Interpret a key identity, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(mode) = crate::commands::TransformMode::from_shortcut(key) {
            return Some(KeyAction::Mode(mode));
        }
        match key.to_ascii_lowercase().as_str() {
            "delete" | "backspace" => Some(KeyAction::RemoveSelected),
            "escape" | "esc" => Some(KeyAction::CancelPlacement),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TransformMode;

    #[test]
    fn test_key_actions() {
        assert_eq!(KeyAction::from_key("G"), Some(KeyAction::Mode(TransformMode::Translate)));
        assert_eq!(KeyAction::from_key("Delete"), Some(KeyAction::RemoveSelected));
        assert_eq!(KeyAction::from_key("Backspace"), Some(KeyAction::RemoveSelected));
        assert_eq!(KeyAction::from_key("Escape"), Some(KeyAction::CancelPlacement));
        assert_eq!(KeyAction::from_key("q"), None);
    }
}
