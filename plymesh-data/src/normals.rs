//! Smooth vertex normal generation for meshes loaded without normals.

use glam::Vec3;

/// Area-weighted vertex normals from triangle and quad index lists.
///
/// Quads contribute as two triangles split along their 0-2 diagonal. Vertices
/// not referenced by any face get a zero normal.
pub fn smooth_normals(positions: &[Vec3], triangles: &[u32], quads: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    let mut accumulate = |a: u32, b: u32, c: u32| {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        // Unnormalized cross product weights by face area
        let face_normal = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    };

    for tri in triangles.chunks_exact(3) {
        accumulate(tri[0], tri[1], tri[2]);
    }
    for quad in quads.chunks_exact(4) {
        accumulate(quad[0], quad[1], quad[2]);
        accumulate(quad[0], quad[2], quad[3]);
    }

    normals.iter_mut().for_each(|n| *n = n.normalize_or_zero());
    normals
}
