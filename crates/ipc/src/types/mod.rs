//! Type definitions for bridge messages.

mod color;
mod decal;

pub use color::*;
pub use decal::*;
