//! Sticker editing session
//!
//! [`SceneEditingSession`] owns every decal placed on a model and the
//! controller state that decides what pointer, keyboard, manipulator, and UI
//! events mean:
//! - Placement (arm with an image, click a surface, wait for the image)
//! - Lifecycle (create, recompute after edits, remove with all resources)
//! - Selection (outline, manipulator binding, transform mode)
//!
//! It does not render and holds no globals. Everything visible goes through
//! the [`Collaborators`] it was built with; several sessions can coexist.

mod commands;
mod input;
mod lifecycle;
mod placement;
mod selection;

use std::collections::BTreeMap;

use glam::{Mat4, Vec3};
use tracing::{debug, warn};

use atelier_config::DecalConfig;
use atelier_ipc::{error_codes, CoreToUi, HexColor};

use crate::decal::Decal;
use crate::error::DecalError;
use crate::host::Collaborators;
use crate::mesh::TargetMesh;
use crate::outline::OutlineStyle;
use crate::projection::DecalProjector;
use crate::raycast::Candidate;
use crate::types::{DecalId, ImageSource, MeshId, SurfaceHit, TransformMode};

pub use input::PointerTracker;
pub use placement::PendingPlacement;

/// What user input currently means.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ControllerState {
    /// Clicks select decals or clear the selection
    #[default]
    Idle,
    /// The next surface click places this image
    Placing(ImageSource),
    /// One decal is selected and bound to the manipulator
    Selected { decal: DecalId, mode: TransformMode },
}

/// All decals on one model plus the controller driving them.
pub struct SceneEditingSession<H: Collaborators> {
    pub(crate) config: DecalConfig,
    pub(crate) projector: DecalProjector,
    pub(crate) outline_style: OutlineStyle,
    pub(crate) fallback_normal: Vec3,
    pub(crate) host: H,
    /// Model meshes decals may be placed on
    pub(crate) meshes: BTreeMap<MeshId, TargetMesh>,
    /// Decals in creation order
    pub(crate) decals: Vec<Decal>,
    pub(crate) next_decal_id: u64,
    pub(crate) next_ticket: u64,
    pub(crate) state: ControllerState,
    /// Image load in flight (at most one)
    pub(crate) pending: Option<PendingPlacement>,
    pub(crate) pointer: PointerTracker,
    /// Manipulator drag in progress
    pub(crate) dragging: bool,
    pub(crate) model_color: [f32; 4],
    /// Notifications not yet taken by the UI bridge
    pub(crate) outbox: Vec<CoreToUi>,
}

impl<H: Collaborators> SceneEditingSession<H> {
    /// Create a session with default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, DecalConfig::default())
    }

    /// Create a session with explicit configuration.
    ///
    /// A configuration that fails validation is replaced by the defaults.
    pub fn with_config(host: H, config: DecalConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!("Invalid decal config, using defaults: {}", err);
                DecalConfig::default()
            }
        };
        let fallback_normal = Vec3::from_array(config.fallback_normal)
            .try_normalize()
            .unwrap_or(Vec3::Y);
        let model_color = match config.model_color.parse::<HexColor>() {
            Ok(color) => color.to_rgba(),
            Err(err) => {
                warn!("Ignoring configured model color: {}", err);
                [1.0, 1.0, 1.0, 1.0]
            }
        };

        Self {
            projector: DecalProjector::new(config.base_size),
            outline_style: OutlineStyle::from(&config.outline),
            fallback_normal,
            host,
            meshes: BTreeMap::new(),
            decals: Vec::new(),
            next_decal_id: 1,
            next_ticket: 1,
            state: ControllerState::Idle,
            pending: None,
            pointer: PointerTracker::default(),
            dragging: false,
            model_color,
            outbox: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &DecalConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Currently selected decal, if any
    pub fn selected(&self) -> Option<DecalId> {
        match self.state {
            ControllerState::Selected { decal, .. } => Some(decal),
            _ => None,
        }
    }

    pub fn is_placing(&self) -> bool {
        matches!(self.state, ControllerState::Placing(_))
    }

    /// Register a model mesh as a placement target.
    ///
    /// Replacing a mesh under an existing id leaves placed decals as they
    /// are until their next recompute.
    pub fn register_mesh(&mut self, id: MeshId, mesh: TargetMesh) {
        debug!("Registered target mesh {:?}", id);
        self.host.set_base_color(id, self.model_color);
        self.meshes.insert(id, mesh);
    }

    pub fn unregister_mesh(&mut self, id: MeshId) -> Option<TargetMesh> {
        self.meshes.remove(&id)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&TargetMesh> {
        self.meshes.get(&id)
    }

    /// Decals in creation order
    pub fn decals(&self) -> impl Iterator<Item = &Decal> {
        self.decals.iter()
    }

    pub fn decal(&self, id: DecalId) -> Option<&Decal> {
        self.decals.iter().find(|d| d.id == id)
    }

    pub fn decal_count(&self) -> usize {
        self.decals.len()
    }

    /// Drain queued notifications in emission order
    pub fn take_notifications(&mut self) -> Vec<CoreToUi> {
        std::mem::take(&mut self.outbox)
    }

    /// Current model color (linear RGBA)
    pub fn model_color(&self) -> [f32; 4] {
        self.model_color
    }

    /// Recolor every registered model mesh from a CSS hex string.
    pub fn set_model_color(&mut self, hex: &str) -> Result<(), atelier_ipc::IpcError> {
        let color = hex.parse::<HexColor>()?.to_rgba();
        self.model_color = color;
        for id in self.meshes.keys() {
            self.host.set_base_color(*id, color);
        }
        debug!("Model color set to {}", hex);
        Ok(())
    }

    pub(crate) fn index_of(&self, id: DecalId) -> Result<usize, DecalError> {
        self.decals
            .iter()
            .position(|d| d.id == id)
            .ok_or(DecalError::UnknownDecal(id))
    }

    pub(crate) fn notify(&mut self, notification: CoreToUi) {
        self.outbox.push(notification);
    }

    pub(crate) fn notify_error(&mut self, code: &str, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {}", code, message);
        self.outbox.push(CoreToUi::Error {
            code: code.to_string(),
            message,
        });
    }

    /// Report a failed operation with the matching error code.
    pub(crate) fn report(&mut self, err: &DecalError) {
        let code = match err {
            DecalError::UnknownDecal(_) => error_codes::UNKNOWN_DECAL,
            DecalError::EmptyProjection | DecalError::UnknownMesh(_) => error_codes::NO_SURFACE,
            DecalError::Texture(_) => error_codes::IMAGE_LOAD_FAILED,
            DecalError::Host(_) | DecalError::NonFinitePosition { .. } => error_codes::RESOURCE_FAILED,
        };
        self.notify_error(code, err.to_string());
    }

    /// Registered model meshes as hit-test candidates
    pub(crate) fn model_candidates(&self) -> Vec<Candidate<'_, MeshId>> {
        self.meshes
            .iter()
            .map(|(id, target)| Candidate {
                key: *id,
                source: &target.mesh,
                world: target.world,
            })
            .collect()
    }

    /// Placed decals as hit-test candidates (geometry is already in world space)
    pub(crate) fn decal_candidates(&self) -> Vec<Candidate<'_, DecalId>> {
        self.decals
            .iter()
            .filter(|d| !d.geometry.is_empty())
            .map(|d| Candidate {
                key: d.id,
                source: &d.geometry,
                world: Mat4::IDENTITY,
            })
            .collect()
    }

    /// Orbit stays off while placing or dragging
    pub(crate) fn sync_orbit(&mut self) {
        let enabled = !self.dragging && !self.is_placing();
        self.host.set_enabled(enabled);
    }
}

/// A surface hit on a registered model mesh
pub type ModelHit = SurfaceHit<MeshId>;
