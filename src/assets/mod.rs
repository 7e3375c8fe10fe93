//! Model and texture inputs coming from disk.

pub mod model_loader;

pub use model_loader::{MeshData, ModelError, ModelLoader, ModelSource, TextureSource};
