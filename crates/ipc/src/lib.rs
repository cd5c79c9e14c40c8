//! Message protocol for Atelier
//!
//! Defines the typed commands the sidebar sends to the sticker core and the
//! notifications the core sends back. Everything is serde-serializable so a
//! webview or native UI can sit on the other side of a JSON bridge.

pub mod commands;
pub mod error;
pub mod input;
pub mod messages;
pub mod numeric;
pub mod types;

pub use commands::*;
pub use error::IpcError;
pub use input::*;
pub use messages::*;
pub use numeric::LooseNumber;
pub use types::*;

impl CoreToUi {
    /// Serialize to JSON for sending to the UI.
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a notification (used by UI-side tests and tooling).
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl UiToCore {
    /// Deserialize a command received from the UI.
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        if json.trim().is_empty() {
            return Err(IpcError::InvalidFormat("empty message".to_string()));
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}
