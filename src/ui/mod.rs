//! # User Interface Module
//!
//! Dear ImGui-based overlay for the editor. ImGui only draws here: the
//! editor panels lay themselves out and hit-test their own clicks, then
//! hand the resulting widgets to [`overlay::draw_overlay`].
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui context, winit glue and the wgpu renderer
//! - [`overlay`] - crosshair, status lines, the controls panel and panel widgets

pub mod manager;
pub mod overlay;

pub use manager::UiManager;
pub use overlay::draw_overlay;
