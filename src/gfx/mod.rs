//! # Graphics Module
//!
//! Everything the viewport needs: the fly camera, transforms, procedural
//! geometry, the scene model, picking, GPU resources and the render engine.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - first-person fly camera with mouse look
//! - **Scene Management** ([`scene`]) - objects, meshes, folders and the render list
//! - **Picking** ([`picking`]) - screen and camera rays, floor projection, object picking
//! - **Rendering Pipeline** ([`rendering`]) - Blinn-Phong and unlit pipelines, wireframe highlight
//! - **Resource Management** ([`resources`]) - global uniforms, textures and the texture cache
//!
//! ## Usage
//!
//! ```no_run
//! use roost::gfx::{camera::FlyCamera, picking, scene::Scene, viewport::Viewport};
//!
//! let camera = FlyCamera::default();
//! let scene = Scene::new();
//! let hit = picking::pick_object_from_screen(&camera, Viewport::new(800.0, 600.0), 400.0, 300.0, &scene);
//! assert!(hit.is_none());
//! ```

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
pub use transform::Transform;
pub use viewport::Viewport;
