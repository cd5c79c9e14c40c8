//! Top-level message enums for communication between the sticker core and UI.

use serde::{Deserialize, Serialize};

use crate::commands::{AppearanceCommand, DecalCommand};
use crate::types::DecalInfo;

/// Notifications from the core to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CoreToUi {
    /// A sticker finished loading and was placed (it is also selected)
    DecalCreated(DecalInfo),

    /// Selection changed; `None` means nothing is selected
    SelectionChanged { decal: Option<DecalInfo> },

    /// Something the user asked for could not be done
    Error { code: String, message: String },
}

/// Commands from the UI to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToCore {
    Decal(DecalCommand),
    Appearance(AppearanceCommand),
}

/// Machine-readable codes carried by [`CoreToUi::Error`].
pub mod error_codes {
    pub const IMAGE_LOAD_FAILED: &str = "image_load_failed";
    pub const NO_SURFACE: &str = "no_surface";
    pub const RESOURCE_FAILED: &str = "resource_failed";
    pub const UNKNOWN_DECAL: &str = "unknown_decal";
    pub const INVALID_COLOR: &str = "invalid_color";
}
