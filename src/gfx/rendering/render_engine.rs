//! WGPU-based rendering engine for the editor viewport
//!
//! Owns the surface, device and pipelines. Each frame it uploads whatever
//! meshes are new, writes the global and per-mesh uniforms, then draws opaque
//! meshes, alpha-blended meshes, the wireframe highlight and finally the UI.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use cgmath::Vector3;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    camera::camera_utils::CameraUniform,
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
        texture_cache::{create_texture_bind_group, TextureCache},
        texture_resource::TextureResource,
    },
    scene::{Mesh, Scene, VertexLayout},
};
use crate::wgpu_utils::binding_types;

use super::lights::PointLight;
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::render_pass_ext::DrawMesh;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.08,
    b: 0.12,
    a: 1.0,
};

/// Wireframe color of the selected object.
pub const HIGHLIGHT_COLOR: Vector3<f32> = Vector3::new(0.0, 1.0, 0.4);

const GLOBAL_SLOT: u32 = 0;
const OBJECT_SLOT: u32 = 1;
const TEXTURE_SLOT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawStage {
    Opaque,
    Blend,
    Wireframe,
}

impl DrawStage {
    fn pipeline_name(self, layout: VertexLayout) -> &'static str {
        match (self, layout) {
            (DrawStage::Opaque, VertexLayout::PositionNormalUv) => "lit",
            (DrawStage::Blend, VertexLayout::PositionNormalUv) => "lit_blend",
            (DrawStage::Wireframe, VertexLayout::PositionNormalUv) => "lit_wire",
            (DrawStage::Opaque, VertexLayout::PositionOnly) => "emissive",
            (DrawStage::Blend, VertexLayout::PositionOnly) => "emissive_blend",
            (DrawStage::Wireframe, VertexLayout::PositionOnly) => "emissive_wire",
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    white_texture: TextureResource,
    white_bind_group: wgpu::BindGroup,
    texture_cache: TextureCache,
    wireframe_supported: bool,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Fails when no adapter or device is available; the caller treats that
    /// as fatal.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;

        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if wireframe_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            log::warn!("Adapter lacks line polygon mode; selection highlight disabled");
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features,
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[binding_types::layout_entry(0, binding_types::uniform())],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                binding_types::layout_entry(0, binding_types::texture_2d()),
                binding_types::layout_entry(
                    1,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        let white_texture = TextureResource::create_white(&device, &queue);
        let white_bind_group =
            create_texture_bind_group(&device, &texture_layout, &white_texture, "White Texture");

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("lit", include_str!("lit.wgsl"));
        pipeline_manager.load_shader("emissive", include_str!("emissive.wgsl"));

        let lit_layouts = vec![
            global_bindings.layout().clone(),
            object_layout.clone(),
            texture_layout.clone(),
        ];
        let emissive_layouts = vec![global_bindings.layout().clone(), object_layout.clone()];

        for (stage, blend) in [
            (DrawStage::Opaque, wgpu::BlendState::REPLACE),
            (DrawStage::Blend, wgpu::BlendState::ALPHA_BLENDING),
        ] {
            for (layout, shader, layouts) in [
                (VertexLayout::PositionNormalUv, "lit", &lit_layouts),
                (VertexLayout::PositionOnly, "emissive", &emissive_layouts),
            ] {
                let name = stage.pipeline_name(layout);
                pipeline_manager.register_pipeline(
                    name,
                    PipelineConfig::default()
                        .with_label(name)
                        .with_shader(shader)
                        .with_vertex_layout(layout)
                        .with_bind_group_layouts(layouts.clone())
                        .with_depth(TextureResource::DEPTH_FORMAT, true, wgpu::CompareFunction::Less)
                        .with_color_target(format, Some(blend)),
                );
            }
        }

        if wireframe_supported {
            for (layout, shader, layouts) in [
                (VertexLayout::PositionNormalUv, "lit", &lit_layouts),
                (VertexLayout::PositionOnly, "emissive", &emissive_layouts),
            ] {
                let name = DrawStage::Wireframe.pipeline_name(layout);
                pipeline_manager.register_pipeline(
                    name,
                    PipelineConfig::default()
                        .with_label(name)
                        .with_shader(shader)
                        .with_fragment_entry("fs_highlight")
                        .with_vertex_layout(layout)
                        .with_bind_group_layouts(layouts.clone())
                        .with_polygon_mode(wgpu::PolygonMode::Line)
                        .with_depth(
                            TextureResource::DEPTH_FORMAT,
                            false,
                            wgpu::CompareFunction::LessEqual,
                        )
                        .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
                );
            }
        }

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in &errors {
                log::error!("{}", error);
            }
            return Err(anyhow!("{} render pipeline(s) failed to build", errors.len()));
        }
        log::debug!("Pipelines ready: {:?}", pipeline_manager.get_stats());

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            texture_layout,
            white_texture,
            white_bind_group,
            texture_cache: TextureCache::new(),
            wireframe_supported,
        })
    }

    /// Uploads new meshes and refreshes every uniform for this frame.
    pub fn prepare(
        &mut self,
        scene: &mut Scene,
        scenery: &mut [Mesh],
        camera_uniform: CameraUniform,
        lights: &[PointLight],
    ) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lights);

        let meshes = scenery.iter_mut().chain(
            scene
                .objects_mut()
                .flat_map(|object| object.meshes_mut().iter_mut()),
        );
        for mesh in meshes {
            if !mesh.is_uploaded() {
                let texture_bind_group = mesh.texture().cloned().and_then(|source| {
                    self.texture_cache.bind_group(
                        &self.device,
                        &self.queue,
                        &self.texture_layout,
                        &source,
                    )
                });
                mesh.upload(&self.device, &self.object_layout, texture_bind_group);
            }
            mesh.write_uniform(&self.queue, HIGHLIGHT_COLOR);
        }
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// # Arguments
    /// * `scene` - Scene objects, drawn after the scenery
    /// * `scenery` - Meshes that are not scene objects
    /// * `highlight` - Index of the object to outline in wireframe
    /// * `ui_callback` - Optional function that renders UI elements
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        scenery: &[Mesh],
        highlight: Option<usize>,
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let meshes: Vec<&Mesh> = scenery
            .iter()
            .chain(scene.render_list().iter().filter_map(|item| {
                scene
                    .get_object(item.object)
                    .and_then(|object| object.meshes().get(item.mesh))
            }))
            .collect();

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(GLOBAL_SLOT, self.global_bindings.bind_group(), &[]);

            for mesh in meshes.iter().filter(|mesh| !mesh.is_transparent()) {
                self.draw(&mut render_pass, mesh, DrawStage::Opaque);
            }
            for mesh in meshes.iter().filter(|mesh| mesh.is_transparent()) {
                self.draw(&mut render_pass, mesh, DrawStage::Blend);
            }

            if self.wireframe_supported {
                if let Some(object) = highlight.and_then(|index| scene.get_object(index)) {
                    for mesh in object.meshes() {
                        self.draw(&mut render_pass, mesh, DrawStage::Wireframe);
                    }
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, mesh: &Mesh, stage: DrawStage) {
        let Some(gpu) = mesh.gpu() else {
            return;
        };
        let layout = mesh.geometry().layout;
        let Some(pipeline) = self.pipeline_manager.pipeline(stage.pipeline_name(layout)) else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        if layout == VertexLayout::PositionNormalUv {
            let texture = gpu
                .texture_bind_group
                .as_ref()
                .unwrap_or(&self.white_bind_group);
            render_pass.set_bind_group(TEXTURE_SLOT, texture, &[]);
        }
        render_pass.draw_mesh(gpu, OBJECT_SLOT);
    }

    /// Reconfigures the surface after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format, used when creating the UI renderer.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Releases cached textures. Called on shutdown and before a scene reload.
    pub fn release_textures(&mut self) {
        self.texture_cache.release_gpu();
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        self.texture_cache.release_gpu();
        self.white_texture.texture.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_only_meshes_use_emissive_pipelines() {
        assert_eq!(DrawStage::Opaque.pipeline_name(VertexLayout::PositionOnly), "emissive");
        assert_eq!(DrawStage::Blend.pipeline_name(VertexLayout::PositionNormalUv), "lit_blend");
        assert_eq!(
            DrawStage::Wireframe.pipeline_name(VertexLayout::PositionOnly),
            "emissive_wire"
        );
    }
}
