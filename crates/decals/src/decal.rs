//! A placed sticker and the host resources backing it.

use glam::Vec3;

use atelier_ipc::DecalInfo;

use crate::projection::{decal_orientation, DecalGeometry, ProjectionParams};
use crate::types::{DecalId, ImageSource, MeshId, ProxyTransform, ResourceId};

/// Host handles owned by one decal.
///
/// Texture, material, and geometry live as long as the decal. The outline
/// exists only while selected; the proxy is created on first selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalResources {
    pub texture: ResourceId,
    pub material: ResourceId,
    pub geometry: ResourceId,
    pub outline: Option<ResourceId>,
    pub proxy: Option<ResourceId>,
}

/// A sticker projected onto a model mesh.
#[derive(Debug, Clone)]
pub struct Decal {
    pub(crate) id: DecalId,
    pub(crate) image: ImageSource,
    pub(crate) target: MeshId,
    pub(crate) anchor_position: Vec3,
    pub(crate) anchor_normal: Vec3,
    pub(crate) rotation_degrees: f32,
    pub(crate) scale: f32,
    pub(crate) geometry: DecalGeometry,
    pub(crate) resources: DecalResources,
}

impl Decal {
    pub fn id(&self) -> DecalId {
        self.id
    }

    pub fn image(&self) -> &ImageSource {
        &self.image
    }

    pub fn target(&self) -> MeshId {
        self.target
    }

    pub fn anchor_position(&self) -> Vec3 {
        self.anchor_position
    }

    pub fn anchor_normal(&self) -> Vec3 {
        self.anchor_normal
    }

    /// Unbounded; 450 is kept as 450
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn geometry(&self) -> &DecalGeometry {
        &self.geometry
    }

    pub fn resources(&self) -> &DecalResources {
        &self.resources
    }

    /// Inputs to the next projection
    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            position: self.anchor_position,
            normal: self.anchor_normal,
            size_scalar: self.scale,
            rotation_degrees: self.rotation_degrees,
        }
    }

    /// Where the manipulator proxy should sit to mirror this decal.
    pub fn proxy_transform(&self) -> ProxyTransform {
        ProxyTransform {
            translation: self.anchor_position,
            rotation: decal_orientation(self.anchor_normal, self.rotation_degrees),
            scale: Vec3::splat(self.scale),
        }
    }

    /// Sidebar summary
    pub fn info(&self) -> DecalInfo {
        DecalInfo {
            id: self.id,
            name: self.image.name.clone(),
            url: self.image.url.clone(),
            rotation_degrees: self.rotation_degrees,
            scale: self.scale,
        }
    }
}
