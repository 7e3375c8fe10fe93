//! # Editor Module
//!
//! Everything between raw input and the scene: logical input types, the
//! side panels, the dev operations and the session state machine tying them
//! together. Nothing in here touches the GPU, so the whole module is tested
//! without a device.

pub mod dev_ops;
pub mod hierarchy;
pub mod input;
pub mod layout;
pub mod property_panel;
pub mod session;
pub mod text_field;

pub use dev_ops::{Axis, DevTools, PropertyValues};
pub use hierarchy::{HierarchyAction, SceneHierarchy};
pub use input::{HeldKeys, InputEvent, Key, KeyPress, MouseButton};
pub use layout::{Rect, Rgba, Widget};
pub use property_panel::{PanelAction, PanelBinding, PropertyField, PropertyPanel};
pub use session::{Autosave, EditorSession, HudState};
pub use text_field::{FieldEvent, TextField};
