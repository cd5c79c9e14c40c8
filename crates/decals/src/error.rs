//! Error types for the decal subsystem.

use thiserror::Error;

use crate::types::{DecalId, MeshId};

/// Why a projection could not produce geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("Non-finite projection position ({x}, {y}, {z})")]
    NonFinitePosition { x: f32, y: f32, z: f32 },
    #[error("Degenerate projection normal ({x}, {y}, {z})")]
    DegenerateNormal { x: f32, y: f32, z: f32 },
    #[error("Invalid projection size: {0}")]
    InvalidSize(f32),
    #[error("Non-finite projection rotation: {0}")]
    NonFiniteRotation(f32),
}

/// Problems with source triangle data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("Mesh has no position attribute")]
    NoPositions,
    #[error("Mesh has no index buffer")]
    NoIndices,
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),
}

/// Failures reported by the scene host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("Failed to allocate {kind}: {reason}")]
    Allocation { kind: &'static str, reason: String },
}

/// Failures decoding sticker image data.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has zero size")]
    Empty,
    #[error("Image source unavailable: {0}")]
    Unavailable(String),
}

/// Errors from session operations on decals.
#[derive(Debug, Error)]
pub enum DecalError {
    #[error("No decal with id {0}")]
    UnknownDecal(DecalId),
    #[error("No registered mesh with id {0:?}")]
    UnknownMesh(MeshId),
    #[error("Projection produced no surface to attach to")]
    EmptyProjection,
    #[error("Non-finite anchor position ({x}, {y}, {z})")]
    NonFinitePosition { x: f32, y: f32, z: f32 },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Texture(#[from] TextureError),
}
