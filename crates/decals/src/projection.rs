//! Surface projection of sticker images onto arbitrary triangle meshes.
//!
//! A decal is an oriented cube (the projection box) sitting on the surface:
//! its local +Y follows the surface normal, it is spun about that normal by
//! the sticker's rotation, and its edge length is the base size times the
//! sticker's scale. Every target triangle is clipped against the six faces of
//! the box; what survives becomes the decal's own triangle list, with UVs
//! taken from the box's tangent plane (local X and Z).

use glam::{Affine3A, Mat3, Mat4, Quat, Vec2, Vec3};
use tracing::{debug, warn};

use atelier_config::BASE_DECAL_SIZE;

use crate::constants::CLIP_EPSILON;
use crate::error::ProjectionError;
use crate::mesh::{face_normal, normal_matrix, TargetMesh, TriangleSource};
use crate::types::DecalVertex;
use crate::validation::{checked_normal, is_finite_vec3};

/// Triangle list produced by projecting a decal, in world space.
///
/// Non-indexed: every three vertices form one triangle. An empty geometry is a
/// valid value meaning "no surface inside the projection box".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecalGeometry {
    vertices: Vec<DecalVertex>,
}

impl DecalGeometry {
    /// Geometry with no triangles.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: Vec<DecalVertex>) -> Self {
        debug_assert!(vertices.len() % 3 == 0);
        Self { vertices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[DecalVertex] {
        &self.vertices
    }

    /// Raw vertex buffer bytes for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Centroid of all vertices, if any.
    pub fn centroid(&self) -> Option<Vec3> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum: Vec3 = self
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .sum();
        Some(sum / self.vertices.len() as f32)
    }
}

impl TriangleSource for DecalGeometry {
    fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    fn triangle(&self, index: usize) -> [Vec3; 3] {
        let base = index * 3;
        [
            Vec3::from_array(self.vertices[base].position),
            Vec3::from_array(self.vertices[base + 1].position),
            Vec3::from_array(self.vertices[base + 2].position),
        ]
    }

    fn triangle_normals(&self, index: usize) -> Option<[Vec3; 3]> {
        let base = index * 3;
        Some([
            Vec3::from_array(self.vertices[base].normal),
            Vec3::from_array(self.vertices[base + 1].normal),
            Vec3::from_array(self.vertices[base + 2].normal),
        ])
    }
}

/// Orientation of a decal's projection box.
///
/// The minimal rotation taking world +Y onto `normal`, followed by a spin of
/// `rotation_degrees` about the box's own +Y (which by then is the normal).
/// Degrees are not wrapped, so 450 and 90 give the same orientation.
pub fn decal_orientation(normal: Vec3, rotation_degrees: f32) -> Quat {
    let align = Quat::from_rotation_arc(Vec3::Y, normal);
    let spin = Quat::from_rotation_y(rotation_degrees.to_radians());
    (align * spin).normalize()
}

/// Inputs to a single projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// World-space box center (a point on the surface)
    pub position: Vec3,
    /// World-space surface normal (normalized internally)
    pub normal: Vec3,
    /// Multiplier of the projector's base size
    pub size_scalar: f32,
    pub rotation_degrees: f32,
}

/// The oriented cube decals are clipped against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBox {
    pub center: Vec3,
    pub orientation: Quat,
    /// Full edge length; each face sits at half this distance from the center
    pub size: f32,
}

impl ProjectionBox {
    /// Validate parameters and build the box.
    pub fn new(params: &ProjectionParams, base_size: f32) -> Result<Self, ProjectionError> {
        let ProjectionParams {
            position,
            normal,
            size_scalar,
            rotation_degrees,
        } = *params;

        if !is_finite_vec3(position) {
            return Err(ProjectionError::NonFinitePosition {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }
        let Some(normal) = checked_normal(normal) else {
            return Err(ProjectionError::DegenerateNormal {
                x: normal.x,
                y: normal.y,
                z: normal.z,
            });
        };
        if !rotation_degrees.is_finite() {
            return Err(ProjectionError::NonFiniteRotation(rotation_degrees));
        }
        let size = base_size * size_scalar;
        if !(size.is_finite() && size > 0.0) {
            return Err(ProjectionError::InvalidSize(size));
        }

        Ok(Self {
            center: position,
            orientation: decal_orientation(normal, rotation_degrees),
            size,
        })
    }

    /// Box-to-world transform without scale.
    pub fn to_world(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.orientation, self.center)
    }

    /// Map a world point into unit box space, where the box spans [-0.5, 0.5]³.
    pub fn to_unit(&self, world_to_box: &Affine3A, point: Vec3) -> Vec3 {
        world_to_box.transform_point3(point) / self.size
    }
}

/// Clips meshes against projection boxes of a fixed base size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalProjector {
    /// Box edge length at `size_scalar == 1`
    pub base_size: f32,
}

impl Default for DecalProjector {
    fn default() -> Self {
        Self {
            base_size: BASE_DECAL_SIZE,
        }
    }
}

impl DecalProjector {
    pub fn new(base_size: f32) -> Self {
        Self { base_size }
    }

    /// Project onto a placed target mesh, degrading failures to empty geometry.
    ///
    /// Invalid input is logged and yields [`DecalGeometry::empty`]; callers
    /// check [`DecalGeometry::is_empty`] to detect "nothing to project onto".
    pub fn project(&self, target: &TargetMesh, params: &ProjectionParams) -> DecalGeometry {
        match self.try_project(&target.mesh, &target.world, params) {
            Ok(geometry) => geometry,
            Err(err) => {
                warn!("Decal projection failed: {}", err);
                DecalGeometry::empty()
            }
        }
    }

    /// Project onto any triangle source with an explicit world transform.
    pub fn try_project(
        &self,
        source: &dyn TriangleSource,
        world: &Mat4,
        params: &ProjectionParams,
    ) -> Result<DecalGeometry, ProjectionError> {
        let projection_box = ProjectionBox::new(params, self.base_size)?;
        let box_to_world = projection_box.to_world();
        let world_to_box = box_to_world.inverse();
        let normals_to_world = normal_matrix(world);

        let mut vertices = Vec::new();
        let mut polygon = Vec::with_capacity(9);
        let mut scratch = Vec::with_capacity(9);

        for tri_idx in 0..source.triangle_count() {
            let corners = source.triangle(tri_idx).map(|v| world.transform_point3(v));
            let normals = world_normals(source, tri_idx, &corners, &normals_to_world);

            polygon.clear();
            for (corner, normal) in corners.iter().zip(normals) {
                polygon.push(ClipVertex {
                    position: projection_box.to_unit(&world_to_box, *corner),
                    normal,
                });
            }

            if !clip_to_unit_box(&mut polygon, &mut scratch) {
                continue;
            }

            // Fan triangulation of the convex clipped polygon
            for i in 1..polygon.len() - 1 {
                let (a, b, c) = (polygon[0], polygon[i], polygon[i + 1]);
                if (b.position - a.position)
                    .cross(c.position - a.position)
                    .length_squared()
                    < CLIP_EPSILON * CLIP_EPSILON
                {
                    continue;
                }
                for v in [a, b, c] {
                    vertices.push(emit_vertex(&v, &box_to_world, projection_box.size));
                }
            }
        }

        if vertices.is_empty() {
            debug!(
                "Decal projection at {:?} found no surface inside the box",
                projection_box.center
            );
        }

        Ok(DecalGeometry { vertices })
    }
}

/// Project with the default base size (0.3 world units).
pub fn project(target: &TargetMesh, params: &ProjectionParams) -> DecalGeometry {
    DecalProjector::default().project(target, params)
}

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    /// Unit box space
    position: Vec3,
    /// World space
    normal: Vec3,
}

impl ClipVertex {
    fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        ClipVertex {
            position: self.position.lerp(other.position, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }
}

fn world_normals(
    source: &dyn TriangleSource,
    tri_idx: usize,
    corners: &[Vec3; 3],
    normals_to_world: &Mat3,
) -> [Vec3; 3] {
    let flat = face_normal(corners[0], corners[1], corners[2]).unwrap_or(Vec3::Y);
    match source.triangle_normals(tri_idx) {
        Some(normals) => normals.map(|n| checked_normal(*normals_to_world * n).unwrap_or(flat)),
        None => [flat; 3],
    }
}

/// Sutherland-Hodgman against the six faces of the unit box.
///
/// Returns false when fewer than three vertices survive.
fn clip_to_unit_box(polygon: &mut Vec<ClipVertex>, scratch: &mut Vec<ClipVertex>) -> bool {
    for axis in 0..3 {
        for sign in [1.0f32, -1.0] {
            clip_against_plane(polygon, scratch, axis, sign);
            std::mem::swap(polygon, scratch);
            if polygon.len() < 3 {
                return false;
            }
        }
    }
    true
}

/// Keep the part of `input` where `sign * position[axis] <= 0.5`.
fn clip_against_plane(input: &[ClipVertex], output: &mut Vec<ClipVertex>, axis: usize, sign: f32) {
    output.clear();
    let distance = |v: &ClipVertex| 0.5 - sign * v.position[axis];

    for (i, current) in input.iter().enumerate() {
        let next = &input[(i + 1) % input.len()];
        let d_current = distance(current);
        let d_next = distance(next);

        if d_current >= 0.0 {
            output.push(*current);
        }
        // Edge crosses the plane
        if (d_current >= 0.0) != (d_next >= 0.0) {
            let t = d_current / (d_current - d_next);
            output.push(current.lerp(next, t));
        }
    }
}

fn emit_vertex(v: &ClipVertex, box_to_world: &Affine3A, size: f32) -> DecalVertex {
    let position = box_to_world.transform_point3(v.position * size);
    let normal = v.normal.try_normalize().unwrap_or(Vec3::Y);
    let uv = Vec2::new(0.5 + v.position.x, 0.5 - v.position.z);
    DecalVertex {
        position: position.to_array(),
        normal: normal.to_array(),
        uv: uv.to_array(),
    }
}

#[cfg(feature = "bevy")]
mod bevy_conversion {
    use bevy::asset::RenderAssetUsages;
    use bevy::mesh::PrimitiveTopology;
    use bevy::prelude::Mesh;

    use super::DecalGeometry;

    impl DecalGeometry {
        /// Convert to a non-indexed Bevy triangle-list mesh
        pub fn to_bevy_mesh(&self) -> Mesh {
            let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.position).collect();
            let normals: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.normal).collect();
            let uvs: Vec<[f32; 2]> = self.vertices.iter().map(|v| v.uv).collect();

            let mut mesh = Mesh::new(
                PrimitiveTopology::TriangleList,
                RenderAssetUsages::default(),
            );
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
            mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
            mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
            mesh
        }
    }
}
