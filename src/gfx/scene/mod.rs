//! # Scene Management Module
//!
//! The editable scene: objects built from meshes, their folders, and the
//! vertex formats the renderer consumes.
//!
//! ## Key Components
//!
//! - [`Scene`] - ordered object list plus folder set and render list
//! - [`SceneObject`] - named group of meshes sharing one transform
//! - [`Mesh`] - one drawable, with CPU geometry and lazily created GPU buffers
//! - [`Vertex3D`] - interleaved position, normal and texture coordinates
//!
//! ## Usage
//!
//! ```no_run
//! use roost::gfx::scene::{PrimitiveKind, Scene, SceneObject};
//!
//! let mut scene = Scene::new();
//! let index = scene.push_object(SceneObject::primitive("cube_1", PrimitiveKind::Cube, None));
//! assert_eq!(scene.objects()[index].name, "cube_1");
//! ```

pub mod folders;
pub mod mesh;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use folders::{FolderSet, FolderState};
pub use mesh::{Mesh, MeshGeometry, MeshKind, ObjectUniform};
pub use object::{ObjectFormat, ObjectId, PrimitiveKind, SceneObject, DEFAULT_FOLDER};
pub use scene::{RenderItem, Scene, SceneStatistics};
pub use vertex::{Vertex3D, VertexLayout};
