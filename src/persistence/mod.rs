//! Scene persistence: JSON scene files and OBJ export of folders.

pub mod obj_export;
pub mod scene_file;

pub use obj_export::{export_folder, folder_to_obj, ExportError};
pub use scene_file::{load_scene, parse_scene, save_scene, LoadedScene, ObjectEntry, SceneDocument, SceneFileError};
