//! Shared configuration for Atelier
//!
//! This crate provides the single source of truth for sticker sizing, click
//! disambiguation thresholds, selection outline styling, and decal material
//! parameters. Every struct has a `Default` matching the shipped behaviour and
//! can be partially overridden from JSON.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Edge length of a decal projection box at scale 1.0, in world units
pub const BASE_DECAL_SIZE: f32 = 0.3;

/// Edge length of the invisible manipulator proxy, in world units
pub const PROXY_SIZE: f32 = 0.1;

/// A pointer press held this long or longer is a drag, not a click
pub const CLICK_MAX_DURATION_MS: u64 = 300;

/// A pointer that travels this far or farther is a drag, not a click
pub const CLICK_MAX_DISTANCE_PX: f32 = 5.0;

/// Selection outline color (bright green)
pub const OUTLINE_COLOR: u32 = 0x00ff00;

/// Faces meeting at more than this angle produce an outline edge
pub const OUTLINE_CREASE_DEGREES: f32 = 1.0;

/// Initial backpack color
pub const DEFAULT_MODEL_COLOR: &str = "#ffffff";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Pointer click disambiguation thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    /// Maximum press duration in milliseconds (exclusive)
    pub max_duration_ms: u64,
    /// Maximum pointer travel in pixels (exclusive)
    pub max_distance_px: f32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: CLICK_MAX_DURATION_MS,
            max_distance_px: CLICK_MAX_DISTANCE_PX,
        }
    }
}

/// Selection outline styling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// 0xRRGGBB
    pub color: u32,
    pub line_width: f32,
    /// Crease angle in degrees above which interior edges are drawn
    pub crease_degrees: f32,
    /// Outlines draw over everything when depth testing is off
    pub depth_test: bool,
    pub render_order: i32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            color: OUTLINE_COLOR,
            line_width: 2.0,
            crease_degrees: OUTLINE_CREASE_DEGREES,
            depth_test: false,
            render_order: 2,
        }
    }
}

/// Decal surface material parameters (Phong shading)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalMaterialConfig {
    pub transparent: bool,
    pub depth_test: bool,
    pub depth_write: bool,
    /// Negative values pull the decal toward the camera to avoid z-fighting
    pub polygon_offset_factor: f32,
    pub shininess: f32,
    /// 0xRRGGBB
    pub specular: u32,
    pub render_order: i32,
}

impl Default for DecalMaterialConfig {
    fn default() -> Self {
        Self {
            transparent: true,
            depth_test: true,
            depth_write: false,
            polygon_offset_factor: -4.0,
            shininess: 30.0,
            specular: 0x111111,
            render_order: 1,
        }
    }
}

/// Top-level configuration for the sticker editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct DecalConfig {
    /// Projection box edge length at scale 1.0
    pub base_size: f32,
    /// Manipulator proxy edge length
    pub proxy_size: f32,
    /// Normal used when a hit face has no usable normal
    pub fallback_normal: [f32; 3],
    /// Initial model color as a CSS hex string
    pub model_color: String,
    pub click: ClickConfig,
    pub outline: OutlineConfig,
    pub material: DecalMaterialConfig,
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self {
            base_size: BASE_DECAL_SIZE,
            proxy_size: PROXY_SIZE,
            fallback_normal: [0.0, 1.0, 0.0],
            model_color: DEFAULT_MODEL_COLOR.to_string(),
            click: ClickConfig::default(),
            outline: OutlineConfig::default(),
            material: DecalMaterialConfig::default(),
        }
    }
}

impl DecalConfig {
    /// Parse a config from JSON, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_size.is_finite() && self.base_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "base_size",
                reason: format!("must be a positive number, got {}", self.base_size),
            });
        }
        if !(self.proxy_size.is_finite() && self.proxy_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "proxy_size",
                reason: format!("must be a positive number, got {}", self.proxy_size),
            });
        }
        let [x, y, z] = self.fallback_normal;
        let length_sq = x * x + y * y + z * z;
        if !length_sq.is_finite() || length_sq < 1e-12 {
            return Err(ConfigError::Invalid {
                field: "fallback_normal",
                reason: "must be a non-zero finite vector".to_string(),
            });
        }
        Ok(())
    }
}

/// Split 0xRRGGBB into linear-agnostic RGBA floats (alpha = 1)
pub fn rgb_hex_to_rgba(color: u32) -> [f32; 4] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
        1.0,
    ]
}
