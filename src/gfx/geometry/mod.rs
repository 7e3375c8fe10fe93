//! # Procedural Geometry Generation
//!
//! Built-in shapes used by the editor's primitives and static scenery, so
//! none of them need an external model file.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube centered at the origin
//! - **Triangle**: flat triangle facing +Z
//! - **Sphere**: UV sphere used as the light marker
//! - **Floor**: square quad on the `y = 0` plane
//!
//! ## Usage
//!
//! ```rust
//! use roost::gfx::geometry::{generate_cube, generate_sphere};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.indices.len(), 36);
//!
//! let orb = generate_sphere(0.3, 10, 16);
//! assert!(orb.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Flattens to position + normal + uv, 8 floats per vertex.
    ///
    /// Missing normals default to +Y and missing UVs to zero.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertices.len() * 8);
        for (i, position) in self.vertices.iter().enumerate() {
            let normal = self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            let uv = self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]);
            data.extend_from_slice(position);
            data.extend_from_slice(&normal);
            data.extend_from_slice(&uv);
        }
        data
    }

    /// Flattens positions only, 3 floats per vertex.
    pub fn positions(&self) -> Vec<f32> {
        self.vertices.iter().flatten().copied().collect()
    }
}
