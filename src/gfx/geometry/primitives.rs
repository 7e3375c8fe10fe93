//! # Primitive Shape Generation
//!
//! All shapes are centered at the origin with outward normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit cube centered at the origin
///
/// Vertices span -0.5..0.5 on all axes. Each face has its own four vertices
/// so normals stay flat, giving 24 vertices and 36 indices.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    // (normal, tangent u, tangent v) per face; u × v == normal keeps CCW winding.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];

    for (normal, u, v) in faces {
        let base = data.vertices.len() as u32;
        for (cu, cv) in corners {
            data.vertices.push([
                normal[0] * 0.5 + u[0] * cu + v[0] * cv,
                normal[1] * 0.5 + u[1] * cu + v[1] * cv,
                normal[2] * 0.5 + u[2] * cu + v[2] * cv,
            ]);
            data.normals.push(normal);
            data.tex_coords.push([cu + 0.5, cv + 0.5]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate the editor's triangle primitive, facing +Z.
pub fn generate_triangle() -> GeometryData {
    GeometryData {
        vertices: vec![[-0.6, -0.6, 0.0], [0.6, -0.6, 0.0], [0.0, 0.6, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]],
        indices: vec![0, 1, 2],
    }
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `stacks` - Number of horizontal bands (latitude)
/// * `sectors` - Number of vertical slices (longitude)
pub fn generate_sphere(radius: f32, stacks: u32, sectors: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let stacks = stacks.max(2);
    let sectors = sectors.max(3);

    for i in 0..=stacks {
        let stack_angle = PI / 2.0 - i as f32 * PI / stacks as f32; // PI/2 to -PI/2
        let xz = stack_angle.cos();
        let y = stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * 2.0 * PI / sectors as f32;
            let normal = [xz * sector_angle.cos(), y, xz * sector_angle.sin()];

            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
            data.tex_coords
                .push([j as f32 / sectors as f32, i as f32 / stacks as f32]);
        }
    }

    for i in 0..stacks {
        let k1 = i * (sectors + 1);
        let k2 = k1 + sectors + 1;
        for j in 0..sectors {
            if i != 0 {
                data.indices
                    .extend_from_slice(&[k1 + j, k1 + j + 1, k2 + j]);
            }
            if i != stacks - 1 {
                data.indices
                    .extend_from_slice(&[k1 + j + 1, k2 + j + 1, k2 + j]);
            }
        }
    }

    data
}

/// Generate a square floor quad of side `size` on the `y = 0` plane, facing up.
pub fn generate_floor(size: f32) -> GeometryData {
    let h = size * 0.5;
    GeometryData {
        vertices: vec![[-h, 0.0, -h], [h, 0.0, -h], [h, 0.0, h], [-h, 0.0, h]],
        normals: vec![[0.0, 1.0, 0.0]; 4],
        tex_coords: vec![[0.0, 0.0], [size, 0.0], [size, size], [0.0, size]],
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn assert_outward_winding(data: &GeometryData) {
        for tri in data.indices.chunks(3) {
            let [a, b, c] = [
                data.vertices[tri[0] as usize],
                data.vertices[tri[1] as usize],
                data.vertices[tri[2] as usize],
            ];
            let face = cross(sub(b, a), sub(c, a));
            let n = data.normals[tri[0] as usize];
            let facing = face[0] * n[0] + face[1] * n[1] + face[2] * n[2];
            assert!(facing > 0.0, "triangle {:?} winds inward", tri);
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        for v in &cube.vertices {
            assert!(v.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
        }
        assert_outward_winding(&cube);
    }

    #[test]
    fn test_floor_faces_up() {
        let floor = generate_floor(10.0);
        assert_eq!(floor.vertex_count(), 4);
        assert!(floor.vertices.iter().all(|v| v[1] == 0.0));
        assert_outward_winding(&floor);
    }

    #[test]
    fn test_sphere_radius_and_counts() {
        let sphere = generate_sphere(0.3, 10, 16);
        assert_eq!(sphere.vertex_count(), 11 * 17);
        assert_eq!(sphere.triangle_count(), (10 - 1) * 16 * 2);
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 0.3).abs() < 1e-5);
        }
    }

    #[test]
    fn test_triangle_shape() {
        let tri = generate_triangle();
        assert_eq!(tri.vertices[2], [0.0, 0.6, 0.0]);
        assert_outward_winding(&tri);
    }
}
