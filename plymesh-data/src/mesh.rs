//! Renderable mesh produced by a PLY load.

use crate::ply::ColorChannel;
use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;

/// How an index list maps to drawable geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveMode {
    Triangles,
    Quads,
}

impl PrimitiveMode {
    pub fn vertices_per_primitive(&self) -> usize {
        match self {
            PrimitiveMode::Triangles => 3,
            PrimitiveMode::Quads => 4,
        }
    }
}

/// A borrowed index list tagged with its primitive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveSet<'a> {
    pub mode: PrimitiveMode,
    pub indices: &'a [u32],
}

impl PrimitiveSet<'_> {
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.mode.vertices_per_primitive()
    }
}

/// Interleaved vertex record for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub texcoord: [f32; 2],
}

/// Flat vertex attributes plus triangle and quad index lists.
///
/// Every present optional attribute has exactly one entry per position.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub colors: Option<Vec<Vec4>>,
    /// Source channel of `colors`.
    pub color_channel: Option<ColorChannel>,
    pub texcoords: Option<Vec<Vec2>>,
    pub triangles: Vec<u32>,
    pub quads: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len() / 4
    }

    /// Non-empty index lists, triangles first.
    pub fn primitive_sets(&self) -> Vec<PrimitiveSet<'_>> {
        [
            (PrimitiveMode::Triangles, self.triangles.as_slice()),
            (PrimitiveMode::Quads, self.quads.as_slice()),
        ]
        .into_iter()
        .filter(|(_, indices)| !indices.is_empty())
        .map(|(mode, indices)| PrimitiveSet { mode, indices })
        .collect()
    }

    /// Triangle indices with every quad split along its 0-2 diagonal.
    pub fn triangulated_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.triangles.len() + self.quad_count() * 6);
        indices.extend_from_slice(&self.triangles);
        for quad in self.quads.chunks_exact(4) {
            indices.extend_from_slice(&[quad[0], quad[1], quad[2], quad[0], quad[2], quad[3]]);
        }
        indices
    }

    /// Axis-aligned bounds of all positions, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }

    /// Interleave attributes, filling absent ones with zero normals, white and zero texcoords.
    pub fn interleaved_vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, position)| MeshVertex {
                position: position.to_array(),
                normal: self
                    .normals
                    .as_ref()
                    .map_or([0.0; 3], |n| n[i].to_array()),
                color: self
                    .colors
                    .as_ref()
                    .map_or([1.0; 4], |c| c[i].to_array()),
                texcoord: self
                    .texcoords
                    .as_ref()
                    .map_or([0.0; 2], |t| t[i].to_array()),
            })
            .collect()
    }

    pub fn summary(&self) -> MeshSummary {
        let bounds = self.bounds();
        MeshSummary {
            vertices: self.vertex_count(),
            triangles: self.triangle_count(),
            quads: self.quad_count(),
            has_normals: self.normals.is_some(),
            color_channel: self.color_channel,
            has_texcoords: self.texcoords.is_some(),
            bounds_min: bounds.map(|(min, _)| min.to_array()),
            bounds_max: bounds.map(|(_, max)| max.to_array()),
        }
    }
}

/// Serializable overview of a loaded mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub vertices: usize,
    pub triangles: usize,
    pub quads: usize,
    pub has_normals: bool,
    pub color_channel: Option<ColorChannel>,
    pub has_texcoords: bool,
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> Mesh {
        Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 2.0),
                Vec3::new(-1.0, 0.5, 0.0),
            ],
            normals: None,
            colors: Some(vec![Vec4::new(1.0, 0.0, 0.0, 1.0); 5]),
            color_channel: Some(ColorChannel::Rgb),
            texcoords: None,
            triangles: vec![0, 3, 4],
            quads: vec![0, 1, 2, 3],
        }
    }

    #[test]
    fn test_counts_and_primitive_sets() {
        let mesh = quad_mesh();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.quad_count(), 1);

        let sets = mesh.primitive_sets();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].mode, PrimitiveMode::Triangles);
        assert_eq!(sets[1].mode, PrimitiveMode::Quads);
        assert_eq!(sets[1].primitive_count(), 1);
    }

    #[test]
    fn test_primitive_sets_skip_empty_lists() {
        let mut mesh = quad_mesh();
        mesh.triangles.clear();
        let sets = mesh.primitive_sets();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].mode, PrimitiveMode::Quads);
    }

    #[test]
    fn test_triangulated_indices() {
        let mesh = quad_mesh();
        assert_eq!(mesh.triangulated_indices(), vec![0, 3, 4, 0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_bounds() {
        let (min, max) = quad_mesh().bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_interleaved_defaults() {
        let vertices = quad_mesh().interleaved_vertices();
        assert_eq!(vertices.len(), 5);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0; 3]);
        assert_eq!(vertices[1].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].texcoord, [0.0; 2]);

        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 5 * std::mem::size_of::<MeshVertex>());
    }

    #[test]
    fn test_summary() {
        let summary = quad_mesh().summary();
        assert_eq!(summary.vertices, 5);
        assert_eq!(summary.color_channel, Some(ColorChannel::Rgb));
        assert!(!summary.has_normals);
        assert_eq!(summary.bounds_max, Some([1.0, 1.0, 2.0]));
    }
}
