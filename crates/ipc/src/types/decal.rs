//! Sticker identity and summaries shown in the sidebar.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a placed sticker. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecalId(pub u64);

impl fmt::Display for DecalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decal-{}", self.0)
    }
}

/// Snapshot of a sticker for listing and selection display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecalInfo {
    pub id: DecalId,
    /// Display name of the source image (usually the file name)
    pub name: String,
    /// Image URL or handle the sticker was created from
    pub url: String,
    /// Rotation about the surface normal in degrees
    pub rotation_degrees: f32,
    /// Multiplier of the base projection size
    pub scale: f32,
}
