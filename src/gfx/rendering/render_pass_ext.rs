//! Render pass extensions for drawing uploaded meshes

use wgpu::RenderPass;

use crate::gfx::scene::mesh::MeshGpuResources;

/// Extension trait for RenderPass to draw a mesh's GPU buffers
pub trait DrawMesh {
    /// Binds the mesh's object uniform at `object_slot`, its buffers, and draws.
    fn draw_mesh(&mut self, gpu: &MeshGpuResources, object_slot: u32);
}

impl DrawMesh for RenderPass<'_> {
    fn draw_mesh(&mut self, gpu: &MeshGpuResources, object_slot: u32) {
        self.set_bind_group(object_slot, &gpu.bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        match &gpu.index_buffer {
            Some(index_buffer) => {
                self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                self.draw_indexed(0..gpu.draw_count, 0, 0..1);
            }
            None => self.draw(0..gpu.draw_count, 0..1),
        }
    }
}
