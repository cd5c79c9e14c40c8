//! Triangle meshes that decals are projected onto and hit-tested against.

use glam::{Mat3, Mat4, Vec3};

use crate::error::MeshError;

/// Anything that can hand out triangles by index.
///
/// Implemented by source meshes and by generated decal geometry, so the hit
/// tester can treat model surfaces and placed stickers the same way.
pub trait TriangleSource {
    /// Number of triangles
    fn triangle_count(&self) -> usize;

    /// Vertex positions of a triangle, in the source's local space
    fn triangle(&self, index: usize) -> [Vec3; 3];

    /// Per-vertex normals of a triangle, if the source carries them
    fn triangle_normals(&self, _index: usize) -> Option<[Vec3; 3]> {
        None
    }
}

/// Indexed triangle mesh in local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    /// Same length as positions, or empty
    normals: Vec<Vec3>,
    /// Triangle indices (3 per triangle)
    indices: Vec<u32>,
}

impl TriangleMesh {
    /// Build a mesh, validating that indices form whole triangles in range.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        Self::with_normals(positions, Vec::new(), indices)
    }

    /// Build a mesh with per-vertex normals (`normals` may be empty).
    pub fn with_normals(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::InvalidTopology(
                "Index count not divisible by 3".to_string(),
            ));
        }
        if !normals.is_empty() && normals.len() != positions.len() {
            return Err(MeshError::InvalidTopology(format!(
                "{} normals for {} positions",
                normals.len(),
                positions.len()
            )));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }

        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    /// Axis-aligned square in the XZ plane facing +Y, centered at the origin.
    ///
    /// Split into `subdivisions`² quads so decals clip against interior edges.
    pub fn plane(size: f32, subdivisions: u32) -> Self {
        let cells = subdivisions.max(1);
        let stride = cells + 1;
        let step = size / cells as f32;
        let half = size / 2.0;

        let mut positions = Vec::with_capacity((stride * stride) as usize);
        for row in 0..stride {
            for col in 0..stride {
                positions.push(Vec3::new(
                    -half + col as f32 * step,
                    0.0,
                    -half + row as f32 * step,
                ));
            }
        }

        let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
        for row in 0..cells {
            for col in 0..cells {
                let i0 = row * stride + col;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                // Counter-clockwise seen from +Y
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        let normals = vec![Vec3::Y; positions.len()];
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Get the vertex indices for a triangle
    pub fn triangle_indices(&self, tri_index: usize) -> (u32, u32, u32) {
        let base = tri_index * 3;
        (
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        )
    }
}

impl TriangleSource for TriangleMesh {
    fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn triangle(&self, index: usize) -> [Vec3; 3] {
        let (i0, i1, i2) = self.triangle_indices(index);
        [
            self.positions[i0 as usize],
            self.positions[i1 as usize],
            self.positions[i2 as usize],
        ]
    }

    fn triangle_normals(&self, index: usize) -> Option<[Vec3; 3]> {
        if self.normals.is_empty() {
            return None;
        }
        let (i0, i1, i2) = self.triangle_indices(index);
        Some([
            self.normals[i0 as usize],
            self.normals[i1 as usize],
            self.normals[i2 as usize],
        ])
    }
}

/// A model mesh placed in the world: local triangles plus world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetMesh {
    pub mesh: TriangleMesh,
    /// Local-to-world transform
    pub world: Mat4,
}

impl TargetMesh {
    pub fn new(mesh: TriangleMesh, world: Mat4) -> Self {
        Self { mesh, world }
    }

    /// Matrix that carries local normals into world space.
    pub fn normal_matrix(&self) -> Mat3 {
        normal_matrix(&self.world)
    }
}

/// Inverse transpose of the upper 3x3, or the plain 3x3 if singular.
pub fn normal_matrix(world: &Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(*world);
    if linear.determinant().abs() < f32::EPSILON {
        linear
    } else {
        linear.inverse().transpose()
    }
}

/// Face normal from winding order, or `None` for a degenerate triangle.
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Option<Vec3> {
    (v1 - v0).cross(v2 - v0).try_normalize()
}

#[cfg(feature = "bevy")]
mod bevy_conversion {
    use bevy::mesh::{Indices, VertexAttributeValues};
    use bevy::prelude::Mesh;
    use glam::Vec3;

    use super::TriangleMesh;
    use crate::error::MeshError;

    impl TriangleMesh {
        /// Extract triangles from a Bevy mesh
        ///
        /// The mesh must have position attributes and triangle indices.
        pub fn from_bevy_mesh(mesh: &Mesh) -> Result<Self, MeshError> {
            let positions: Vec<Vec3> = mesh
                .attribute(Mesh::ATTRIBUTE_POSITION)
                .and_then(|attr| attr.as_float3())
                .ok_or(MeshError::NoPositions)?
                .iter()
                .map(|p| Vec3::from_array(*p))
                .collect();

            let normals: Vec<Vec3> = match mesh.attribute(Mesh::ATTRIBUTE_NORMAL) {
                Some(VertexAttributeValues::Float32x3(n)) => {
                    n.iter().map(|n| Vec3::from_array(*n)).collect()
                }
                _ => Vec::new(),
            };

            let indices: Vec<u32> = match mesh.indices() {
                Some(Indices::U16(idx)) => idx.iter().map(|&i| i as u32).collect(),
                Some(Indices::U32(idx)) => idx.to_vec(),
                None => return Err(MeshError::NoIndices),
            };

            TriangleMesh::with_normals(positions, normals, indices)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_topology() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        assert!(matches!(
            TriangleMesh::new(positions.clone(), vec![0, 1]),
            Err(MeshError::InvalidTopology(_))
        ));
        assert!(matches!(
            TriangleMesh::new(positions, vec![0, 1, 3]),
            Err(MeshError::IndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_plane_faces_up() {
        let plane = TriangleMesh::plane(2.0, 2);
        assert_eq!(plane.triangle_count(), 8);
        for i in 0..plane.triangle_count() {
            let [v0, v1, v2] = plane.triangle(i);
            let n = face_normal(v0, v1, v2).unwrap();
            assert!((n - Vec3::Y).length() < 1e-6, "triangle {i} normal {n:?}");
        }
    }

    #[test]
    fn test_normal_matrix_handles_non_uniform_scale() {
        let world = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        // A 45° slope normal stays perpendicular to the scaled surface
        let normal = (normal_matrix(&world) * Vec3::new(1.0, 1.0, 0.0)).normalize();
        let tangent = world.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(normal.dot(tangent).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_face_normal() {
        assert!(face_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0).is_none());
    }
}
