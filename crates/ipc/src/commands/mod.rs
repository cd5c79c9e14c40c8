//! Command types issued by the sidebar/UI.

mod mode;

pub use mode::*;

use serde::{Deserialize, Serialize};

use crate::numeric::LooseNumber;
use crate::types::DecalId;

/// The five sticker entry points the UI may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecalCommand {
    /// Arm placement mode with an image; the next surface click places it
    PlaceWithImage { url: String, name: String },
    /// Switch the manipulator mode of the current selection
    SetMode(TransformMode),
    /// Rotation about the surface normal, in degrees (stored unbounded)
    SetRotation {
        id: DecalId,
        #[serde(default)]
        degrees: LooseNumber,
    },
    /// Multiplier of the base projection size
    SetScale {
        id: DecalId,
        #[serde(default)]
        factor: LooseNumber,
    },
    /// Delete a sticker and release its resources
    Remove { id: DecalId },
}

/// Model appearance commands (kept apart from the sticker surface).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppearanceCommand {
    /// Recolor every model mesh; CSS hex string such as "#ff8800"
    SetBaseColor { color: String },
}
