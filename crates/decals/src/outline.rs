//! Selection outline derived from a decal's geometry.
//!
//! Projection emits a non-indexed triangle list, so vertices are welded by
//! quantized position first. An edge is drawn when it bounds a single
//! triangle or when its two triangles meet at more than the crease angle.

use std::collections::HashMap;

use glam::Vec3;

use atelier_config::{rgb_hex_to_rgba, OutlineConfig};

use crate::constants::WELD_QUANTUM;
use crate::mesh::{face_normal, TriangleSource};
use crate::projection::DecalGeometry;

/// Line-segment list outlining a decal, in world space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineGeometry {
    /// Pairs of endpoints
    segments: Vec<[Vec3; 2]>,
}

impl OutlineGeometry {
    /// Derive outline edges, drawing interior edges sharper than `crease_degrees`.
    pub fn from_decal(geometry: &DecalGeometry, crease_degrees: f32) -> Self {
        let crease_cos = crease_degrees.to_radians().cos();
        let mut welder = Welder::default();
        let mut edges: Vec<EdgeFaces> = Vec::new();
        let mut edge_lookup: HashMap<(u32, u32), usize> = HashMap::new();

        for tri_idx in 0..geometry.triangle_count() {
            let corners = geometry.triangle(tri_idx);
            let Some(normal) = face_normal(corners[0], corners[1], corners[2]) else {
                continue;
            };
            let ids = corners.map(|p| welder.weld(p));

            for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                let (ia, ib) = (ids[a], ids[b]);
                if ia == ib {
                    continue;
                }
                let key = (ia.min(ib), ia.max(ib));
                let slot = *edge_lookup.entry(key).or_insert_with(|| {
                    edges.push(EdgeFaces {
                        endpoints: [corners[a], corners[b]],
                        normals: Vec::with_capacity(2),
                    });
                    edges.len() - 1
                });
                edges[slot].normals.push(normal);
            }
        }

        let segments = edges
            .into_iter()
            .filter(|edge| edge.is_visible(crease_cos))
            .map(|edge| edge.endpoints)
            .collect();

        Self { segments }
    }

    pub fn segments(&self) -> &[[Vec3; 2]] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flattened endpoints for a line-list vertex buffer
    pub fn line_list(&self) -> Vec<[f32; 3]> {
        self.segments
            .iter()
            .flat_map(|[a, b]| [a.to_array(), b.to_array()])
            .collect()
    }
}

/// How the outline is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineStyle {
    /// Linear RGBA
    pub color: [f32; 4],
    pub line_width: f32,
    /// When false the outline stays visible through other geometry
    pub depth_test: bool,
    pub render_order: i32,
}

impl From<&OutlineConfig> for OutlineStyle {
    fn from(config: &OutlineConfig) -> Self {
        Self {
            color: rgb_hex_to_rgba(config.color),
            line_width: config.line_width,
            depth_test: config.depth_test,
            render_order: config.render_order,
        }
    }
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self::from(&OutlineConfig::default())
    }
}

struct EdgeFaces {
    endpoints: [Vec3; 2],
    normals: Vec<Vec3>,
}

impl EdgeFaces {
    fn is_visible(&self, crease_cos: f32) -> bool {
        match self.normals.as_slice() {
            [_] => true,
            [a, b] => a.dot(*b) < crease_cos,
            // Non-manifold
            _ => true,
        }
    }
}

#[derive(Default)]
struct Welder {
    ids: HashMap<(i64, i64, i64), u32>,
}

impl Welder {
    fn weld(&mut self, p: Vec3) -> u32 {
        let key = (
            (p.x * WELD_QUANTUM).round() as i64,
            (p.y * WELD_QUANTUM).round() as i64,
            (p.z * WELD_QUANTUM).round() as i64,
        );
        let next = self.ids.len() as u32;
        *self.ids.entry(key).or_insert(next)
    }
}
