//! Manipulator mode shared by the keyboard shortcuts and the sidebar.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which transform the manipulator applies to the selected sticker's proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Drag along axes/planes (G)
    #[default]
    Translate,
    /// Rotate about axes (R)
    Rotate,
    /// Scale (S)
    Scale,
}

impl TransformMode {
    /// Map a keyboard shortcut to a mode.
    ///
    /// Matching is case-insensitive; unrelated keys return `None`.
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "g" => Some(TransformMode::Translate),
            "r" => Some(TransformMode::Rotate),
            "s" => Some(TransformMode::Scale),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformMode::Translate => "translate",
            TransformMode::Rotate => "rotate",
            TransformMode::Scale => "scale",
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
