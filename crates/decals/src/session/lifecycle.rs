//! Creating, recomputing, and removing decals

use tracing::{debug, info, warn};

use atelier_ipc::CoreToUi;

use crate::decal::{Decal, DecalResources};
use crate::error::{DecalError, HostError};
use crate::host::{Collaborators, DecalMaterial, ResourceDesc};
use crate::mesh::TriangleSource;
use crate::outline::OutlineGeometry;
use crate::projection::{DecalGeometry, ProjectionParams};
use crate::texture::TextureData;
use crate::types::{DecalId, ImageSource, ResourceId};
use crate::validation::{checked_normal, is_finite_vec3, sanitize_rotation, sanitize_scale};

use super::{ControllerState, ModelHit, SceneEditingSession};

impl<H: Collaborators> SceneEditingSession<H> {
    /// Build a decal at `hit` from a loaded image and attach it to the scene.
    ///
    /// Nothing is left allocated when this fails.
    pub(crate) fn create_decal(
        &mut self,
        hit: &ModelHit,
        image: ImageSource,
        texture: &TextureData,
    ) -> Result<DecalId, DecalError> {
        if !is_finite_vec3(hit.point) {
            return Err(DecalError::NonFinitePosition {
                x: hit.point.x,
                y: hit.point.y,
                z: hit.point.z,
            });
        }
        let target = self
            .meshes
            .get(&hit.target)
            .ok_or(DecalError::UnknownMesh(hit.target))?;
        let normal = checked_normal(hit.normal).unwrap_or(self.fallback_normal);

        let params = ProjectionParams {
            position: hit.point,
            normal,
            size_scalar: sanitize_scale(None),
            rotation_degrees: sanitize_rotation(None),
        };
        let geometry = self.projector.project(target, &params);
        if geometry.is_empty() {
            return Err(DecalError::EmptyProjection);
        }

        let resources = self.allocate_decal(texture, &geometry)?;

        let id = DecalId(self.next_decal_id);
        self.next_decal_id += 1;

        info!(
            "Placed decal {} ({}) with {} triangles",
            id,
            image.name,
            geometry.triangle_count()
        );

        self.decals.push(Decal {
            id,
            image,
            target: hit.target,
            anchor_position: params.position,
            anchor_normal: normal,
            rotation_degrees: params.rotation_degrees,
            scale: params.size_scalar,
            geometry,
            resources,
        });

        Ok(id)
    }

    /// Allocate texture, material, and geometry, rolling back on failure.
    fn allocate_decal(
        &mut self,
        texture: &TextureData,
        geometry: &DecalGeometry,
    ) -> Result<DecalResources, HostError> {
        let texture_id = self.host.create(ResourceDesc::Texture(texture))?;

        let material = DecalMaterial::new(texture_id, &self.config.material);
        let material_id = match self.host.create(ResourceDesc::Material(&material)) {
            Ok(id) => id,
            Err(err) => {
                self.host.dispose(texture_id);
                return Err(err);
            }
        };

        let geometry_id = match self.host.create(ResourceDesc::Geometry {
            geometry,
            material: material_id,
        }) {
            Ok(id) => id,
            Err(err) => {
                self.host.dispose(material_id);
                self.host.dispose(texture_id);
                return Err(err);
            }
        };
        self.host.add(geometry_id);

        Ok(DecalResources {
            texture: texture_id,
            material: material_id,
            geometry: geometry_id,
            outline: None,
            proxy: None,
        })
    }

    /// Regenerate a decal's geometry from its current parameters.
    ///
    /// A non-finite anchor aborts and keeps the old geometry. An empty
    /// projection is still swapped in so geometry always matches the
    /// parameters. The outline (when selected) and proxy follow.
    pub fn recompute(&mut self, id: DecalId) -> Result<(), DecalError> {
        let index = self.index_of(id)?;
        let decal = &self.decals[index];

        let position = decal.anchor_position;
        if !is_finite_vec3(position) {
            warn!("Decal {} has a non-finite anchor; keeping previous geometry", id);
            return Err(DecalError::NonFinitePosition {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }

        let target = self
            .meshes
            .get(&decal.target)
            .ok_or(DecalError::UnknownMesh(decal.target))?;
        let geometry = self.projector.project(target, &decal.projection_params());
        if geometry.is_empty() {
            debug!("Decal {} projects onto nothing at {:?}", id, position);
        }

        // Allocate before releasing so a failure leaves the old geometry intact
        let new_geometry = self.host.create(ResourceDesc::Geometry {
            geometry: &geometry,
            material: decal.resources.material,
        })?;
        let old_geometry = decal.resources.geometry;
        self.host.remove(old_geometry);
        self.host.dispose(old_geometry);
        self.host.add(new_geometry);

        let decal = &mut self.decals[index];
        decal.resources.geometry = new_geometry;
        decal.geometry = geometry;

        self.sync_proxy(index);
        if self.selected() == Some(id) {
            if let Err(err) = self.refresh_outline(index) {
                // A selection without an outline is not kept
                self.deselect();
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Delete a decal and release every resource it holds.
    ///
    /// Removing the selected decal returns the controller to idle and emits
    /// exactly one `SelectionChanged(None)`.
    pub fn remove(&mut self, id: DecalId) -> Result<(), DecalError> {
        let index = self.index_of(id)?;
        let was_selected = self.selected() == Some(id);
        if was_selected {
            self.host.detach();
            self.state = ControllerState::Idle;
        }

        let decal = self.decals.remove(index);
        let DecalResources {
            texture,
            material,
            geometry,
            outline,
            proxy,
        } = decal.resources;

        self.host.remove(geometry);
        self.host.dispose(geometry);
        self.host.dispose(material);
        self.host.dispose(texture);
        if let Some(outline) = outline {
            self.host.remove(outline);
            self.host.dispose(outline);
        }
        if let Some(proxy) = proxy {
            self.host.remove(proxy);
            self.host.dispose(proxy);
        }

        info!("Removed decal {} ({})", id, decal.image.name);

        if was_selected {
            self.notify(CoreToUi::SelectionChanged { decal: None });
        }
        Ok(())
    }

    /// Set rotation about the surface normal (degrees, stored unbounded).
    ///
    /// `None` or non-finite input resets to 0.
    pub fn update_rotation(&mut self, id: DecalId, degrees: Option<f32>) -> Result<(), DecalError> {
        let index = self.index_of(id)?;
        self.decals[index].rotation_degrees = sanitize_rotation(degrees);
        self.recompute(id)
    }

    /// Set the size multiplier. `None`, non-finite, or non-positive input
    /// resets to 1.
    pub fn update_scale(&mut self, id: DecalId, factor: Option<f32>) -> Result<(), DecalError> {
        let index = self.index_of(id)?;
        self.decals[index].scale = sanitize_scale(factor);
        self.recompute(id)
    }

    /// Replace the outline of the decal at `index` with one matching its geometry.
    ///
    /// On failure the decal is left without an outline.
    pub(crate) fn refresh_outline(&mut self, index: usize) -> Result<(), HostError> {
        self.release_outline(index);

        let decal = &self.decals[index];
        let outline = OutlineGeometry::from_decal(&decal.geometry, self.config.outline.crease_degrees);
        let outline_id = self
            .host
            .create(ResourceDesc::Outline {
                geometry: &outline,
                style: &self.outline_style,
            })
            .inspect_err(|err| warn!("Failed to create outline for decal {}: {}", decal.id, err))?;
        self.host.add(outline_id);
        self.decals[index].resources.outline = Some(outline_id);
        Ok(())
    }

    pub(crate) fn release_outline(&mut self, index: usize) {
        if let Some(outline_id) = self.decals[index].resources.outline.take() {
            self.host.remove(outline_id);
            self.host.dispose(outline_id);
        }
    }

    /// Move the proxy (if any) to mirror the decal's anchor, orientation, and scale.
    pub(crate) fn sync_proxy(&mut self, index: usize) {
        let decal = &self.decals[index];
        if let Some(proxy) = decal.resources.proxy {
            self.host.set_transform(proxy, &decal.proxy_transform());
        }
    }

    /// Create the proxy on first use and return its handle.
    pub(crate) fn ensure_proxy(&mut self, index: usize) -> Result<ResourceId, HostError> {
        let decal = &self.decals[index];
        if let Some(proxy) = decal.resources.proxy {
            return Ok(proxy);
        }
        let transform = decal.proxy_transform();
        let proxy = self.host.create(ResourceDesc::Proxy {
            transform: &transform,
            size: self.config.proxy_size,
        })?;
        self.host.add(proxy);
        self.decals[index].resources.proxy = Some(proxy);
        Ok(proxy)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::test_support::{flat_session, place_decal, HostCall, PLANE};
    use crate::types::SurfaceHit;

    #[test]
    fn test_placement_on_flat_face() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        let decal = session.decal(id).unwrap();

        assert!((decal.anchor_normal() - Vec3::Y).length() < 1e-5);
        assert_eq!(decal.rotation_degrees(), 0.0);
        assert_eq!(decal.scale(), 1.0);
        assert!(!decal.geometry().is_empty());
        assert_eq!(decal.target(), PLANE);

        // Texture, material, geometry, outline, proxy
        assert_eq!(session.host().live_count(), 5);
        assert!(session.host().is_attached(decal.resources().geometry));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        session.recompute(id).unwrap();
        let first = session.decal(id).unwrap().geometry().clone();
        let live = session.host().live_count();

        session.recompute(id).unwrap();
        assert_eq!(session.decal(id).unwrap().geometry(), &first);
        assert_eq!(session.host().live_count(), live);
    }

    #[test]
    fn test_rotation_450_is_stored_literally() {
        let (mut session, id) = place_decal(Vec3::new(0.05, 0.0, 0.0));
        session.update_rotation(id, Some(450.0)).unwrap();
        let at_450 = session.decal(id).unwrap().geometry().clone();
        assert_eq!(session.decal(id).unwrap().rotation_degrees(), 450.0);

        session.update_rotation(id, Some(90.0)).unwrap();
        let at_90 = session.decal(id).unwrap().geometry();
        assert_eq!(at_450.vertices().len(), at_90.vertices().len());
        for (a, b) in at_450.vertices().iter().zip(at_90.vertices()) {
            let d = Vec3::from_array(a.position) - Vec3::from_array(b.position);
            assert!(d.length() < 1e-5);
        }
    }

    #[test]
    fn test_loose_inputs_fall_back() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        session.update_scale(id, Some(2.0)).unwrap();
        assert_eq!(session.decal(id).unwrap().scale(), 2.0);

        session.update_scale(id, Some(0.0)).unwrap();
        assert_eq!(session.decal(id).unwrap().scale(), 1.0);
        session.update_scale(id, Some(-3.0)).unwrap();
        assert_eq!(session.decal(id).unwrap().scale(), 1.0);
        session.update_scale(id, None).unwrap();
        assert_eq!(session.decal(id).unwrap().scale(), 1.0);

        session.update_rotation(id, None).unwrap();
        assert_eq!(session.decal(id).unwrap().rotation_degrees(), 0.0);
    }

    #[test]
    fn test_scale_syncs_proxy() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        session.update_scale(id, Some(2.0)).unwrap();
        let proxy = session.decal(id).unwrap().resources().proxy.unwrap();
        let transform = session.host().transform_of(proxy).unwrap();
        assert_eq!(transform.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_empty_recompute_keeps_geometry_consistent() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        let index = session.index_of(id).unwrap();
        session.decals[index].anchor_position = Vec3::new(50.0, 0.0, 0.0);
        session.recompute(id).unwrap();

        let decal = session.decal(id).unwrap();
        assert!(decal.geometry().is_empty());
        assert!(session.host().is_attached(decal.resources().geometry));
    }

    #[test]
    fn test_non_finite_anchor_keeps_old_geometry() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        let before = session.decal(id).unwrap().geometry().clone();
        let index = session.index_of(id).unwrap();
        session.decals[index].anchor_position = Vec3::new(f32::NAN, 0.0, 0.0);

        assert!(matches!(
            session.recompute(id),
            Err(DecalError::NonFinitePosition { .. })
        ));
        assert_eq!(session.decal(id).unwrap().geometry(), &before);
    }

    #[test]
    fn test_remove_selected_releases_everything() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        let _ = session.take_notifications();

        session.remove(id).unwrap();
        assert_eq!(session.state(), &ControllerState::Idle);
        assert_eq!(session.decal_count(), 0);
        assert_eq!(session.host().live_count(), 0);
        assert_eq!(session.host().attached_count(), 0);
        assert_eq!(
            session.take_notifications(),
            vec![CoreToUi::SelectionChanged { decal: None }]
        );
        assert!(session.host().calls.contains(&HostCall::Detach));
    }

    #[test]
    fn test_remove_disposes_in_order() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        let resources = *session.decal(id).unwrap().resources();
        let start = session.host().calls.len();

        session.remove(id).unwrap();
        let disposed: Vec<ResourceId> = session.host().calls[start..]
            .iter()
            .filter_map(|call| match call {
                HostCall::Dispose(resource) => Some(*resource),
                _ => None,
            })
            .collect();
        assert_eq!(
            disposed,
            vec![
                resources.geometry,
                resources.material,
                resources.texture,
                resources.outline.unwrap(),
                resources.proxy.unwrap(),
            ]
        );
    }

    #[test]
    fn test_outline_failure_on_recompute_deselects() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        let _ = session.take_notifications();
        session.host_mut().fail_kind = Some("outline");

        assert!(matches!(
            session.update_scale(id, Some(2.0)),
            Err(DecalError::Host(_))
        ));
        assert_eq!(session.selected(), None);
        assert_eq!(session.decal(id).unwrap().scale(), 2.0);
        assert!(session.decal(id).unwrap().resources().outline.is_none());
        assert_eq!(session.host().attached_outlines(), 0);
        assert_eq!(session.host().manipulator_target, None);
        assert_eq!(
            session.take_notifications(),
            vec![CoreToUi::SelectionChanged { decal: None }]
        );
    }

    #[test]
    fn test_remove_unselected_keeps_selection() {
        let (mut session, first) = place_decal(Vec3::ZERO);
        let second = crate::test_support::place_more(&mut session, Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(session.selected(), Some(second));
        let _ = session.take_notifications();

        session.remove(first).unwrap();
        assert_eq!(session.selected(), Some(second));
        assert!(session.take_notifications().is_empty());
    }

    #[test]
    fn test_unknown_decal() {
        let mut session = flat_session();
        assert!(matches!(
            session.remove(DecalId(99)),
            Err(DecalError::UnknownDecal(DecalId(99)))
        ));
        assert!(matches!(
            session.update_scale(DecalId(99), Some(2.0)),
            Err(DecalError::UnknownDecal(_))
        ));
    }

    #[test]
    fn test_allocation_failure_rolls_back() {
        let mut session = flat_session();
        session.host_mut().fail_kind = Some("geometry");
        let hit = SurfaceHit {
            target: PLANE,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            distance: 1.0,
            face_index: 0,
        };
        let result = session.create_decal(
            &hit,
            ImageSource::new("blob:x", "x.png"),
            &TextureData::solid([255, 255, 255, 255]),
        );
        assert!(matches!(result, Err(DecalError::Host(_))));
        assert_eq!(session.host().live_count(), 0);
        assert_eq!(session.decal_count(), 0);
    }

    #[test]
    fn test_placement_off_mesh_is_empty_projection() {
        let mut session = flat_session();
        let hit = SurfaceHit {
            target: PLANE,
            point: Vec3::new(40.0, 0.0, 0.0),
            normal: Vec3::Y,
            distance: 1.0,
            face_index: 0,
        };
        let result = session.create_decal(
            &hit,
            ImageSource::new("blob:x", "x.png"),
            &TextureData::solid([255, 255, 255, 255]),
        );
        assert!(matches!(result, Err(DecalError::EmptyProjection)));
        assert_eq!(session.host().live_count(), 0);
    }
}
