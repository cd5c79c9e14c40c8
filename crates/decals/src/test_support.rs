//! Recording collaborators and fixtures shared by session tests.

use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec2, Vec3};

use atelier_ipc::PointerInput;

use crate::error::HostError;
use crate::host::{ImageLoader, Manipulator, OrbitControl, ResourceDesc, SceneHost};
use crate::mesh::{TargetMesh, TriangleMesh};
use crate::raycast::{Camera, Viewport};
use crate::session::{PendingPlacement, SceneEditingSession};
use crate::texture::TextureData;
use crate::types::{
    DecalId, ImageSource, LoadTicket, MeshId, ProxyTransform, ResourceId, SurfaceHit,
    TransformMode,
};

/// The flat test model
pub const PLANE: MeshId = MeshId(1);

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create(ResourceId, &'static str),
    Add(ResourceId),
    Remove(ResourceId),
    Dispose(ResourceId),
    SetTransform(ResourceId),
    SetBaseColor(MeshId, [f32; 4]),
    Attach(ResourceId),
    Detach,
    SetMode(TransformMode),
    SetOrbit(bool),
    RequestImage(LoadTicket, String),
}

/// Scene host double that tracks live and attached resources.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    next_id: u64,
    live: HashMap<ResourceId, &'static str>,
    attached: HashSet<ResourceId>,
    transforms: HashMap<ResourceId, ProxyTransform>,
    pub manipulator_target: Option<ResourceId>,
    pub orbit_enabled: Option<bool>,
    /// Fail every allocation of this kind
    pub fail_kind: Option<&'static str>,
}

impl RecordingHost {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn is_attached(&self, id: ResourceId) -> bool {
        self.attached.contains(&id)
    }

    pub fn attached_outlines(&self) -> usize {
        self.attached
            .iter()
            .filter(|id| self.live.get(id) == Some(&"outline"))
            .count()
    }

    pub fn transform_of(&self, id: ResourceId) -> Option<ProxyTransform> {
        self.transforms.get(&id).copied()
    }
}

impl SceneHost for RecordingHost {
    fn create(&mut self, desc: ResourceDesc<'_>) -> Result<ResourceId, HostError> {
        let kind = desc.kind();
        if self.fail_kind == Some(kind) {
            return Err(HostError::Allocation {
                kind,
                reason: "injected failure".to_string(),
            });
        }
        self.next_id += 1;
        let id = ResourceId(self.next_id);
        if let ResourceDesc::Proxy { transform, .. } = desc {
            self.transforms.insert(id, *transform);
        }
        self.live.insert(id, kind);
        self.calls.push(HostCall::Create(id, kind));
        Ok(id)
    }

    fn add(&mut self, id: ResourceId) {
        assert!(self.live.contains_key(&id), "add of unknown resource {id:?}");
        self.attached.insert(id);
        self.calls.push(HostCall::Add(id));
    }

    fn remove(&mut self, id: ResourceId) {
        self.attached.remove(&id);
        self.calls.push(HostCall::Remove(id));
    }

    fn dispose(&mut self, id: ResourceId) {
        assert!(!self.attached.contains(&id), "dispose of attached resource {id:?}");
        self.live.remove(&id);
        self.transforms.remove(&id);
        self.calls.push(HostCall::Dispose(id));
    }

    fn set_transform(&mut self, id: ResourceId, transform: &ProxyTransform) {
        self.transforms.insert(id, *transform);
        self.calls.push(HostCall::SetTransform(id));
    }

    fn set_base_color(&mut self, mesh: MeshId, color: [f32; 4]) {
        self.calls.push(HostCall::SetBaseColor(mesh, color));
    }
}

impl Manipulator for RecordingHost {
    fn attach(&mut self, proxy: ResourceId) {
        self.manipulator_target = Some(proxy);
        self.calls.push(HostCall::Attach(proxy));
    }

    fn detach(&mut self) {
        self.manipulator_target = None;
        self.calls.push(HostCall::Detach);
    }

    fn set_mode(&mut self, mode: TransformMode) {
        self.calls.push(HostCall::SetMode(mode));
    }
}

impl OrbitControl for RecordingHost {
    fn set_enabled(&mut self, enabled: bool) {
        self.orbit_enabled = Some(enabled);
        self.calls.push(HostCall::SetOrbit(enabled));
    }
}

impl ImageLoader for RecordingHost {
    fn request_image(&mut self, ticket: LoadTicket, source: &ImageSource) {
        self.calls
            .push(HostCall::RequestImage(ticket, source.url.clone()));
    }
}

pub fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0)
}

/// Perspective camera above and in front of the plane, looking at the origin
pub fn camera() -> Camera {
    Camera::looking_at(
        Vec3::new(0.0, 3.0, 3.0),
        Vec3::ZERO,
        60f32.to_radians(),
        800.0 / 600.0,
    )
}

/// Pixel where `world` appears through [`camera`] in [`viewport`]
pub fn screen_point(world: Vec3) -> Vec2 {
    let camera = camera();
    let viewport = viewport();
    let view = Mat4::from(camera.transform).inverse();
    let ndc = (camera.projection.matrix() * view).project_point3(world);
    Vec2::new(
        (ndc.x + 1.0) / 2.0 * viewport.width,
        (1.0 - ndc.y) / 2.0 * viewport.height,
    )
}

/// Press and release at the same pixel, well inside the click limits
pub fn click(session: &mut SceneEditingSession<RecordingHost>, screen: Vec2) {
    session.on_pointer_down(PointerInput::primary(screen.x, screen.y, 1_000));
    session.on_pointer_up(
        PointerInput::primary(screen.x, screen.y, 1_050),
        &viewport(),
        &camera(),
    );
}

pub fn test_texture() -> TextureData {
    TextureData::solid([255, 255, 255, 255])
}

/// Session with a 2x2 plane (facing +Y, centered at the origin) registered
pub fn flat_session() -> SceneEditingSession<RecordingHost> {
    let mut session = SceneEditingSession::new(RecordingHost::default());
    session.register_mesh(
        PLANE,
        TargetMesh::new(TriangleMesh::plane(2.0, 2), Mat4::IDENTITY),
    );
    session
}

/// Complete a placement at `position` on the plane without going through a click
pub fn place_more(session: &mut SceneEditingSession<RecordingHost>, position: Vec3) -> DecalId {
    let ticket = LoadTicket(session.next_ticket);
    session.next_ticket += 1;
    let name = format!("sticker-{}.png", ticket.0);
    session.pending = Some(PendingPlacement {
        ticket,
        hit: SurfaceHit {
            target: PLANE,
            point: position,
            normal: Vec3::Y,
            distance: 1.0,
            face_index: 0,
        },
        image: ImageSource::new(format!("blob:{}", name), name),
    });
    session.on_image_loaded(ticket, Ok(test_texture()));
    session
        .decals()
        .last()
        .map(|d| d.id())
        .expect("placement should create a decal")
}

pub fn place_decal(position: Vec3) -> (SceneEditingSession<RecordingHost>, DecalId) {
    let mut session = flat_session();
    let id = place_more(&mut session, position);
    (session, id)
}
