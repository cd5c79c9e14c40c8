//! Hit testing: screen coordinates to surface points.
//!
//! Rays are built from a viewport position through the active camera and
//! intersected with an explicit list of candidate meshes using the
//! Moller-Trumbore algorithm. Only the candidates handed in are tested, so
//! manipulator and outline helpers never shadow the surface underneath.

use glam::{Affine3A, Mat4, Vec2, Vec3};

use crate::constants::GEOMETRY_EPSILON;
use crate::mesh::{face_normal, normal_matrix, TriangleSource};
use crate::types::SurfaceHit;
use crate::validation::{checked_normal, is_finite_vec3};

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection algorithm.
///
/// Both faces are hit; the returned `t` is in units of `ray_dir`.
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray parallel to the triangle plane
    if det.abs() < GEOMETRY_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray_origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < GEOMETRY_EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert a pixel position to normalized device coordinates.
    ///
    /// Returns `None` for an empty viewport.
    pub fn to_ndc(&self, screen: Vec2) -> Option<Vec2> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        Some(Vec2::new(
            screen.x / self.width * 2.0 - 1.0,
            -(screen.y / self.height * 2.0 - 1.0),
        ))
    }
}

/// Camera lens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        /// Half extents of the view volume
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y, aspect, near, far),
            Projection::Orthographic {
                half_width,
                half_height,
                near,
                far,
            } => Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                near,
                far,
            ),
        }
    }
}

/// The active camera as supplied by the input source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera-to-world transform (the camera looks down its local -Z)
    pub transform: Affine3A,
    pub projection: Projection,
}

impl Camera {
    /// Perspective camera at `eye` looking at `target`, +Y up.
    pub fn looking_at(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        Self {
            transform: Affine3A::from_mat4(view.inverse()),
            projection: Projection::Perspective {
                fov_y,
                aspect,
                near: 0.1,
                far: 100.0,
            },
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation.into()
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.transform_vector3(Vec3::NEG_Z).normalize()
    }

    /// Build the world-space ray through an NDC point.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let view_to_world = Mat4::from(self.transform);
        let clip_to_world = view_to_world * self.projection.matrix().inverse();

        let (origin, direction) = match self.projection {
            Projection::Perspective { .. } => {
                let origin = self.position();
                let through = clip_to_world.project_point3(ndc.extend(0.5));
                (origin, through - origin)
            }
            Projection::Orthographic { .. } => {
                // Depth 0 is the near plane for the right-handed 0..1 convention
                let origin = clip_to_world.project_point3(ndc.extend(0.0));
                (origin, self.forward())
            }
        };

        let direction = checked_normal(direction)?;
        is_finite_vec3(origin).then_some(Ray { origin, direction })
    }

    /// Build the world-space ray through a viewport pixel.
    pub fn ray_from_screen(&self, screen: Vec2, viewport: &Viewport) -> Option<Ray> {
        self.ray_from_ndc(viewport.to_ndc(screen)?)
    }
}

/// One mesh the hit tester may strike.
pub struct Candidate<'a, K> {
    /// Returned in the hit so the caller knows what was struck
    pub key: K,
    pub source: &'a dyn TriangleSource,
    /// Local-to-world transform of `source`
    pub world: Mat4,
}

/// Intersect a world-space ray with the candidates and return the nearest hit.
///
/// Each candidate is tested in its local space; hits are compared by world
/// distance. The reported normal is the struck face's geometric normal carried
/// into world space; a degenerate face reports `fallback_normal` instead.
pub fn raycast_candidates<K: Copy>(
    ray: &Ray,
    candidates: &[Candidate<'_, K>],
    fallback_normal: Vec3,
) -> Option<SurfaceHit<K>> {
    let mut closest: Option<SurfaceHit<K>> = None;

    for candidate in candidates {
        let world_to_local = candidate.world.inverse();
        if !world_to_local.is_finite() {
            tracing::debug!("raycast: skipping candidate with singular transform");
            continue;
        }

        let local_origin = world_to_local.transform_point3(ray.origin);
        let local_dir = world_to_local.transform_vector3(ray.direction);
        let normals_to_world = normal_matrix(&candidate.world);

        // Test all triangles (brute force - consider BVH for large meshes)
        for tri_idx in 0..candidate.source.triangle_count() {
            let [v0, v1, v2] = candidate.source.triangle(tri_idx);
            let Some(hit) = ray_triangle_intersection(local_origin, local_dir, v0, v1, v2) else {
                continue;
            };

            let point = candidate.world.transform_point3(local_origin + local_dir * hit.t);
            let distance = (point - ray.origin).length();
            let dominated = match &closest {
                Some(prev) => distance >= prev.distance,
                None => false,
            };
            if dominated {
                continue;
            }

            let normal = face_normal(v0, v1, v2)
                .and_then(|n| checked_normal(normals_to_world * n))
                .unwrap_or(fallback_normal);

            closest = Some(SurfaceHit {
                target: candidate.key,
                point,
                normal,
                distance,
                face_index: tri_idx,
            });
        }
    }

    closest
}

/// Cast from a viewport pixel through `camera` against `candidates`.
///
/// Returns `None` when nothing is struck, the candidate list is empty, or the
/// viewport is empty. A miss is an ordinary result, not an error.
pub fn cast_ray<K: Copy>(
    screen: Vec2,
    viewport: &Viewport,
    camera: &Camera,
    candidates: &[Candidate<'_, K>],
    fallback_normal: Vec3,
) -> Option<SurfaceHit<K>> {
    if candidates.is_empty() {
        return None;
    }
    let ray = camera.ray_from_screen(screen, viewport)?;
    raycast_candidates(&ray, candidates, fallback_normal)
}
