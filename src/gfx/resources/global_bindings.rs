//! Global uniform bindings for camera and light data
//!
//! Manages the uniform buffer and bind group shared by every draw in a frame.
//! Bound to slot 0 in all scene pipelines.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, rendering::lights::PointLight},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Upper bound on lights passed to the shaders.
pub const MAX_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// xyz position, w unused
    pub position: [f32; 4],
    /// rgb color already scaled by intensity, w unused
    pub color: [f32; 4],
}

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the WGSL shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    lights: [GpuLight; MAX_LIGHTS],
    /// x: number of valid entries in `lights`
    light_count: [u32; 4],
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Lights beyond [`MAX_LIGHTS`] are dropped.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &[PointLight],
) {
    let mut gpu_lights = [GpuLight::default(); MAX_LIGHTS];
    for (slot, light) in gpu_lights.iter_mut().zip(lights) {
        *slot = GpuLight {
            position: [light.position.x, light.position.y, light.position.z, 1.0],
            color: [light.color.x, light.color.y, light.color.z, 1.0],
        };
    }

    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        lights: gpu_lights,
        light_count: [lights.len().min(MAX_LIGHTS) as u32, 0, 0, 0],
    };

    ubo.update_content(queue, content);
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[binding_types::layout_entry(0, binding_types::uniform())],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        GlobalBindings { layout, bind_group }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
        assert_eq!(std::mem::size_of::<GpuLight>(), 32);
    }
}
