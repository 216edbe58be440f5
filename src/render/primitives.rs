//! Built-in primitive meshes.

use crate::foundation::math::constants::{PI, TAU};
use crate::foundation::math::{Vec2, Vec3};
use crate::render::mesh::MeshData;

/// Square quad in the XY plane, centered on the origin, facing +Z.
pub fn quad(size: f32) -> MeshData {
    let h = size * 0.5;
    let mut data = MeshData {
        positions: vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ],
        uvs: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        normals: vec![Vec3::new(0.0, 0.0, 1.0); 4],
        tangents: vec![],
        bitangents: vec![],
        indices: vec![0, 1, 2, 0, 2, 3],
    };
    data.generate_tangents();
    data
}

/// Axis-aligned cube centered on the origin, 24 vertices so each face has
/// flat normals and its own UV square. Faces wind counter-clockwise from
/// outside.
pub fn cube(size: f32) -> MeshData {
    // (normal, right, up) per face; corners are derived from those.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), // front
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), // back
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]), // right
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]), // left
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]), // top
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]), // bottom
    ];

    let h = size * 0.5;
    let mut data = MeshData::default();
    for (normal, right, up) in FACES {
        let normal = Vec3::from(normal);
        let right = Vec3::from(right);
        let up = Vec3::from(up);
        let base = data.positions.len() as u32;
        let center = normal * h;

        for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            data.positions
                .push(center + right * ((u - 0.5) * size) + up * ((v - 0.5) * size));
            data.uvs.push(Vec2::new(u, v));
            data.normals.push(normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data.generate_tangents();
    data
}

/// UV sphere centered on the origin. `segments` counts longitudinal slices;
/// latitudinal rings are half that, minimum 2 each way.
pub fn sphere(radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = (segments / 2).max(2);

    let mut data = MeshData::default();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let polar = v * PI;
        let (sin_polar, cos_polar) = polar.sin_cos();

        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let azimuth = u * TAU;
            let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

            let normal = Vec3::new(sin_polar * cos_azimuth, cos_polar, sin_polar * sin_azimuth);
            data.positions.push(normal * radius);
            data.normals.push(normal);
            data.uvs.push(Vec2::new(u, 1.0 - v));
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            data.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    data.generate_tangents();
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quad_has_four_vertices_and_tangents() {
        let data = quad(1.0);
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.triangle_count(), 2);
        assert_eq!(data.tangents.len(), 4);
    }

    #[test]
    fn cube_faces_are_flat_and_outward() {
        let data = cube(2.0);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);

        for i in 0..data.vertex_count() {
            // Each vertex normal points away from the center, through the
            // face its position lies on.
            assert_relative_eq!(data.positions[i].dot(&data.normals[i]), 1.0, epsilon = 1e-6);
            assert_relative_eq!(data.normals[i].norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn cube_corners_are_on_the_cube_surface() {
        let data = cube(1.0);
        for position in &data.positions {
            assert_relative_eq!(position.x.abs(), 0.5, epsilon = 1e-6);
            assert_relative_eq!(position.y.abs(), 0.5, epsilon = 1e-6);
            assert_relative_eq!(position.z.abs(), 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let data = sphere(3.0, 16);
        assert!(!data.indices.is_empty());
        for (position, normal) in data.positions.iter().zip(&data.normals) {
            assert_relative_eq!(position.norm(), 3.0, epsilon = 1e-4);
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
        }
        // Every index is in range.
        let count = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
    }
}
