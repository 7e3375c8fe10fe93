//! # Meshes
//!
//! A [`Mesh`] is one drawable piece of geometry with its own transform,
//! color and alpha. The variant set is closed ([`MeshKind`]): built-in cube,
//! triangle and light marker, plus meshes imported from model files.
//!
//! Every mesh keeps its CPU-side vertex data. GPU buffers are created lazily
//! by the renderer and released synchronously by [`Mesh::destroy`].

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::assets::{MeshData, TextureSource};
use crate::gfx::{
    camera::camera_utils::convert_matrix4_to_array,
    geometry::{generate_cube, generate_floor, generate_sphere, generate_triangle, GeometryData},
    transform::Transform,
};
use crate::wgpu_utils::UniformBuffer;

use super::vertex::VertexLayout;

/// Radius of the light marker sphere.
pub const LIGHT_ORB_RADIUS: f32 = 0.3;
const LIGHT_ORB_STACKS: u32 = 10;
const LIGHT_ORB_SECTORS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    Cube,
    Triangle,
    LightOrb,
    Model,
}

/// CPU copy of a mesh's vertex and index data.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    pub layout: VertexLayout,
    /// Interleaved floats, `layout.stride()` per vertex.
    pub data: Vec<f32>,
    pub indices: Option<Vec<u32>>,
}

impl MeshGeometry {
    pub fn interleaved(geometry: &GeometryData) -> Self {
        Self {
            layout: VertexLayout::PositionNormalUv,
            data: geometry.interleaved(),
            indices: Some(geometry.indices.clone()),
        }
    }

    pub fn position_only(geometry: &GeometryData) -> Self {
        Self {
            layout: VertexLayout::PositionOnly,
            data: geometry.positions(),
            indices: Some(geometry.indices.clone()),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.layout.stride()
    }

    /// Number of vertices the draw call submits.
    pub fn draw_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertex_count() as u32,
        }
    }
}

/// Per-mesh uniform block, bound at group 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix's upper 3x3, padded to 4x4.
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb + alpha
    pub color: [f32; 4],
    pub highlight_color: [f32; 4],
    /// x: sample texture, y: unlit
    pub flags: [u32; 4],
}

/// GPU side of a mesh. Owned exclusively by the mesh.
pub struct MeshGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub draw_count: u32,
    pub uniform: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
    pub texture_bind_group: Option<wgpu::BindGroup>,
}

impl MeshGpuResources {
    fn release(self) {
        self.vertex_buffer.destroy();
        if let Some(index_buffer) = &self.index_buffer {
            index_buffer.destroy();
        }
        self.uniform.destroy();
    }
}

pub struct Mesh {
    kind: MeshKind,
    pub transform: Transform,
    pub color: Vector3<f32>,
    pub alpha: f32,
    geometry: MeshGeometry,
    texture: Option<TextureSource>,
    gpu: Option<MeshGpuResources>,
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("kind", &self.kind)
            .field("transform", &self.transform)
            .field("color", &self.color)
            .field("alpha", &self.alpha)
            .field("vertices", &self.geometry.vertex_count())
            .field("uploaded", &self.gpu.is_some())
            .finish()
    }
}

impl Mesh {
    fn with_geometry(kind: MeshKind, geometry: MeshGeometry, color: Vector3<f32>) -> Self {
        Self {
            kind,
            transform: Transform::default(),
            color,
            alpha: 1.0,
            geometry,
            texture: None,
            gpu: None,
        }
    }

    pub fn cube(color: Vector3<f32>) -> Self {
        Self::with_geometry(
            MeshKind::Cube,
            MeshGeometry::interleaved(&generate_cube()),
            color,
        )
    }

    pub fn triangle(color: Vector3<f32>) -> Self {
        Self::with_geometry(
            MeshKind::Triangle,
            MeshGeometry::interleaved(&generate_triangle()),
            color,
        )
    }

    /// Emissive marker sphere drawn at a light's position.
    pub fn light_orb(color: Vector3<f32>) -> Self {
        let sphere = generate_sphere(LIGHT_ORB_RADIUS, LIGHT_ORB_STACKS, LIGHT_ORB_SECTORS);
        Self::with_geometry(MeshKind::LightOrb, MeshGeometry::position_only(&sphere), color)
    }

    /// Static floor quad. Not part of any scene object.
    pub fn floor(size: f32, color: Vector3<f32>) -> Self {
        Self::with_geometry(
            MeshKind::Model,
            MeshGeometry::interleaved(&generate_floor(size)),
            color,
        )
    }

    pub fn model(data: MeshData) -> Self {
        let geometry = MeshGeometry {
            layout: VertexLayout::PositionNormalUv,
            data: data.vertices,
            indices: data.indices,
        };
        let mut mesh = Self::with_geometry(MeshKind::Model, geometry, Vector3::from(data.color));
        mesh.texture = data.texture;
        mesh
    }

    pub fn kind(&self) -> MeshKind {
        self.kind
    }

    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    pub fn texture(&self) -> Option<&TextureSource> {
        self.texture.as_ref()
    }

    pub fn is_unlit(&self) -> bool {
        self.kind == MeshKind::LightOrb
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }

    pub fn gpu(&self) -> Option<&MeshGpuResources> {
        self.gpu.as_ref()
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Uniform contents for the current transform, color and alpha.
    pub fn uniform(&self, highlight_color: Vector3<f32>) -> ObjectUniform {
        let model = self.transform.model_matrix();
        let textured = self
            .gpu
            .as_ref()
            .map_or(false, |gpu| gpu.texture_bind_group.is_some());
        ObjectUniform {
            model: convert_matrix4_to_array(model),
            normal_matrix: convert_matrix4_to_array(Matrix4::from(normal_matrix(&model))),
            color: [self.color.x, self.color.y, self.color.z, self.alpha],
            highlight_color: [highlight_color.x, highlight_color.y, highlight_color.z, 1.0],
            flags: [textured as u32, self.is_unlit() as u32, 0, 0],
        }
    }

    /// Per-frame hook. Built-in meshes are static.
    pub fn update(&mut self, _dt: f32) {}

    /// Creates GPU buffers and bind groups if they do not exist yet.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        texture_bind_group: Option<wgpu::BindGroup>,
    ) {
        if self.gpu.is_some() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.geometry.data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = self.geometry.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let uniform = UniformBuffer::new_with_data(device, &self.uniform(Vector3::new(0.0, 0.0, 0.0)));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.binding_resource(),
            }],
        });

        self.gpu = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            draw_count: self.geometry.draw_count(),
            uniform,
            bind_group,
            texture_bind_group,
        });
    }

    /// Writes the current uniform contents to the GPU.
    pub fn write_uniform(&mut self, queue: &wgpu::Queue, highlight_color: Vector3<f32>) {
        let content = self.uniform(highlight_color);
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.uniform.update_content(queue, content);
        }
    }

    /// Releases GPU resources immediately. Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.release();
        }
    }
}

/// Inverse-transpose of the upper 3x3 of `model`, identity when singular.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(
        model.x.truncate(),
        model.y.truncate(),
        model.z.truncate(),
    );
    upper
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix3::identity)
}
