//! Atelier sticker system - surface-projected decals on 3D models
//!
//! This crate provides the core of sticker placement and editing:
//! - [`projection`] - Clips an oriented box against a mesh to build decal geometry
//! - [`raycast`] - Screen-space hit testing against explicit candidate meshes
//! - [`session`] - Decal lifecycle plus the selection and transform controller
//! - [`host`] - Traits for the scene, manipulator, orbit camera, and image loader
//! - [`outline`] - Selection wireframe derived from decal geometry
//! - [`texture`] - Decoded sticker images
//!
//! Nothing here renders or owns a window. An embedding application (a Bevy
//! app, a web bridge, a test) implements [`host::Collaborators`] and feeds
//! input and UI commands into a [`session::SceneEditingSession`].

pub mod constants;
pub mod decal;
pub mod error;
pub mod host;
pub mod mesh;
pub mod outline;
pub mod projection;
pub mod raycast;
pub mod session;
pub mod texture;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use decal::{Decal, DecalResources};
pub use error::*;
pub use host::{
    Collaborators, DecalMaterial, ImageLoader, Manipulator, OrbitControl, ResourceDesc, SceneHost,
};
pub use mesh::{TargetMesh, TriangleMesh, TriangleSource};
pub use outline::{OutlineGeometry, OutlineStyle};
pub use projection::{project, DecalGeometry, DecalProjector, ProjectionParams};
pub use raycast::{cast_ray, Camera, Candidate, Projection, Ray, Viewport};
pub use session::{ControllerState, SceneEditingSession};
pub use texture::TextureData;
pub use types::*;
