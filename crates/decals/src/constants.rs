/// Epsilon for floating point comparisons in geometry code.
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// Clipped polygons shorter than this (in box units) are treated as collapsed.
pub const CLIP_EPSILON: f32 = 1e-7;

/// Scale applied when a scale input is absent or unusable.
pub const DEFAULT_SCALE: f32 = 1.0;

/// Rotation applied when a rotation input is absent or unusable.
pub const DEFAULT_ROTATION_DEGREES: f32 = 0.0;

/// Quantization for welding positions when deriving outline edges (1e-5 units).
pub const WELD_QUANTUM: f32 = 1e5;
