// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, light collection, static scenery and frame
//! rendering.

pub mod lights;
pub mod pipeline_manager;
pub mod render_engine;
pub mod render_pass_ext;
pub mod scenery;

// Re-export main types
pub use lights::{collect_lights, OrbitLight, PointLight};
pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineManager, PipelineStats};
pub use render_engine::{RenderEngine, CLEAR_COLOR, HIGHLIGHT_COLOR};
pub use scenery::Scenery;
