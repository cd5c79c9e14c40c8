//! Numeric guards applied before values are committed to a decal.

use glam::Vec3;

use crate::constants::{DEFAULT_ROTATION_DEGREES, DEFAULT_SCALE, GEOMETRY_EPSILON};

/// True when every component is finite (no NaN or infinity).
pub fn is_finite_vec3(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Normalize a direction, returning `None` for zero-length or non-finite input.
pub fn checked_normal(v: Vec3) -> Option<Vec3> {
    if !is_finite_vec3(v) {
        return None;
    }
    let length = v.length();
    if length < GEOMETRY_EPSILON || !length.is_finite() {
        return None;
    }
    Some(v / length)
}

/// Rotation input resolved to degrees. Unusable input becomes 0.
///
/// Values are not wrapped into [0, 360); 450 stays 450.
pub fn sanitize_rotation(degrees: Option<f32>) -> f32 {
    match degrees {
        Some(d) if d.is_finite() => d,
        _ => DEFAULT_ROTATION_DEGREES,
    }
}

/// Scale input resolved to a positive multiplier. Unusable input becomes 1.
pub fn sanitize_scale(factor: Option<f32>) -> f32 {
    match factor {
        Some(f) if f.is_finite() && f > 0.0 => f,
        _ => DEFAULT_SCALE,
    }
}
