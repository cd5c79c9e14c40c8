//! Collaborators the editing session drives but does not own.
//!
//! The session never renders. Everything visible goes through a
//! [`SceneHost`]; the transform gizmo, camera orbit, and image fetching are
//! likewise behind traits so that a Bevy app, a web bridge, or a test double
//! can stand in.

use atelier_config::{rgb_hex_to_rgba, DecalMaterialConfig};

use crate::error::HostError;
use crate::outline::{OutlineGeometry, OutlineStyle};
use crate::projection::DecalGeometry;
use crate::texture::TextureData;
use crate::types::{ImageSource, LoadTicket, MeshId, ProxyTransform, ResourceId, TransformMode};

/// Surface material of a decal (Phong shaded, alpha blended).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalMaterial {
    /// Texture resource sampled for base color
    pub texture: ResourceId,
    pub transparent: bool,
    pub depth_test: bool,
    pub depth_write: bool,
    pub polygon_offset_factor: f32,
    pub shininess: f32,
    /// Linear RGBA
    pub specular: [f32; 4],
    pub render_order: i32,
}

impl DecalMaterial {
    pub fn new(texture: ResourceId, config: &DecalMaterialConfig) -> Self {
        Self {
            texture,
            transparent: config.transparent,
            depth_test: config.depth_test,
            depth_write: config.depth_write,
            polygon_offset_factor: config.polygon_offset_factor,
            shininess: config.shininess,
            specular: rgb_hex_to_rgba(config.specular),
            render_order: config.render_order,
        }
    }
}

/// What the host is asked to allocate.
#[derive(Debug, Clone, Copy)]
pub enum ResourceDesc<'a> {
    Texture(&'a TextureData),
    Material(&'a DecalMaterial),
    /// Decal surface drawn with an existing material
    Geometry {
        geometry: &'a DecalGeometry,
        material: ResourceId,
    },
    Outline {
        geometry: &'a OutlineGeometry,
        style: &'a OutlineStyle,
    },
    /// Invisible helper the manipulator grabs
    Proxy { transform: &'a ProxyTransform, size: f32 },
}

impl ResourceDesc<'_> {
    /// Short name used in logs and allocation errors
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceDesc::Texture(_) => "texture",
            ResourceDesc::Material(_) => "material",
            ResourceDesc::Geometry { .. } => "geometry",
            ResourceDesc::Outline { .. } => "outline",
            ResourceDesc::Proxy { .. } => "proxy",
        }
    }
}

/// Renderable scene the session writes into.
pub trait SceneHost {
    /// Allocate a resource. Nothing is visible until [`SceneHost::add`].
    fn create(&mut self, desc: ResourceDesc<'_>) -> Result<ResourceId, HostError>;

    /// Attach a created resource to the scene.
    fn add(&mut self, id: ResourceId);

    /// Detach from the scene without freeing.
    fn remove(&mut self, id: ResourceId);

    /// Free a resource. Detached resources only.
    fn dispose(&mut self, id: ResourceId);

    fn set_transform(&mut self, id: ResourceId, transform: &ProxyTransform);

    /// Recolor a model mesh (linear RGBA)
    fn set_base_color(&mut self, mesh: MeshId, color: [f32; 4]);
}

/// Transform gizmo bound to at most one object at a time.
pub trait Manipulator {
    fn attach(&mut self, proxy: ResourceId);
    fn detach(&mut self);
    fn set_mode(&mut self, mode: TransformMode);
}

/// Camera orbit navigation, suspended while placing or dragging.
pub trait OrbitControl {
    fn set_enabled(&mut self, enabled: bool);
}

/// Starts asynchronous image loads.
///
/// Completion is reported back through
/// [`SceneEditingSession::on_image_loaded`](crate::session::SceneEditingSession::on_image_loaded)
/// with the same ticket.
pub trait ImageLoader {
    fn request_image(&mut self, ticket: LoadTicket, source: &ImageSource);
}

/// Everything a session needs from its embedder.
pub trait Collaborators: SceneHost + Manipulator + OrbitControl + ImageLoader {}

impl<T: SceneHost + Manipulator + OrbitControl + ImageLoader> Collaborators for T {}
