use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use atelier_ipc::{DecalId, TransformMode};

/// Identity of a model mesh registered with a session (decal targets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Handle to a renderable or GPU resource owned by the scene host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub u64);

/// Tag correlating an image load request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

/// Where a sticker's pixels come from, plus the name shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    pub url: String,
    pub name: String,
}

impl ImageSource {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// A single decal vertex, laid out for direct GPU upload.
///
/// Field order is position, normal, uv to match the usual
/// `Float32x3, Float32x3, Float32x2` vertex buffer layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct DecalVertex {
    /// World-space position
    pub position: [f32; 3],
    /// World-space unit normal
    pub normal: [f32; 3],
    /// Texture coordinate in the projection box frame (0-1 inside the box)
    pub uv: [f32; 2],
}

/// Translation/rotation/scale of the invisible manipulator proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for ProxyTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A surface point struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit<K> {
    /// Whatever the caller used to identify the struck candidate
    pub target: K,
    /// World-space hit position
    pub point: Vec3,
    /// World-space unit normal of the struck face
    pub normal: Vec3,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// Index of the struck triangle within the candidate
    pub face_index: usize,
}
