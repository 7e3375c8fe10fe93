// src/lib.rs
//! Roost Scene Editor
//!
//! An interactive 3D scene editor built on wgpu and winit: fly around a
//! scene, pick and place primitives or models, group them into folders,
//! save the scene as JSON and export folders as OBJ.
//!
//! The [`editor`] module holds all editing state and runs without a GPU;
//! [`app`] wires it to a window, the [`gfx`] renderer and the [`ui`] overlay.

pub mod app;
pub mod assets;
pub mod config;
pub mod editor;
pub mod gfx;
pub mod logging;
pub mod persistence;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{run, EditorApp};
pub use config::EditorConfig;
pub use editor::EditorSession;
