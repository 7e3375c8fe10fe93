//! # OBJ Export
//!
//! Writes every non-light object of one folder into a single Wavefront OBJ
//! file, one `o <name>` group per object. Geometry is baked into world space
//! from the meshes' CPU copies, so export never touches GPU buffers.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cgmath::{InnerSpace, Vector3, Vector4};
use thiserror::Error;

use crate::gfx::scene::{mesh::normal_matrix, Mesh, Scene, VertexLayout};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File name used for a folder's export.
pub fn export_file_name(folder: &str) -> String {
    format!("{}.obj", folder.replace([' ', '/'], "_"))
}

/// Builds the OBJ text for a folder. `None` when the folder holds nothing
/// exportable (it is empty or contains only lights).
pub fn folder_to_obj(folder: &str, scene: &Scene) -> Option<String> {
    let objects: Vec<_> = scene
        .objects()
        .iter()
        .filter(|object| object.folder() == folder && !object.is_light())
        .collect();

    if objects.is_empty() {
        return None;
    }

    let mut out = String::new();
    let _ = writeln!(out, "# Roost export of folder \"{}\"", folder);
    let _ = writeln!(out, "# Objects: {}", objects.len());
    out.push('\n');

    // OBJ indices are 1-based and shared across groups.
    let mut offset = 1u32;

    for object in objects {
        let _ = writeln!(out, "o {}", object.name);
        for mesh in object.meshes() {
            if mesh.geometry().layout != VertexLayout::PositionNormalUv {
                log::warn!(
                    "Skipping mesh of '{}' during export: {:?} layout has no normals or UVs",
                    object.name,
                    mesh.geometry().layout
                );
                continue;
            }
            offset += write_mesh(&mut out, mesh, offset);
        }
        out.push('\n');
    }

    Some(out)
}

/// Appends one mesh's vertices and faces; returns its vertex count.
fn write_mesh(out: &mut String, mesh: &Mesh, offset: u32) -> u32 {
    let geometry = mesh.geometry();
    let stride = geometry.layout.stride();
    let model = mesh.transform.model_matrix();
    let normal_model = normal_matrix(&model);
    let vertex_count = geometry.vertex_count();

    let vertices = || geometry.data.chunks_exact(stride);

    for v in vertices() {
        let world = model * Vector4::new(v[0], v[1], v[2], 1.0);
        let _ = writeln!(out, "v {:.6} {:.6} {:.6}", world.x, world.y, world.z);
    }
    for v in vertices() {
        let normal = normal_model * Vector3::new(v[3], v[4], v[5]);
        let normal = if normal.magnitude2() > 0.0 {
            normal.normalize()
        } else {
            normal
        };
        let _ = writeln!(out, "vn {:.6} {:.6} {:.6}", normal.x, normal.y, normal.z);
    }
    // Meshes store v top-down; OBJ counts it from the bottom.
    for v in vertices() {
        let _ = writeln!(out, "vt {:.6} {:.6}", v[6], 1.0 - v[7]);
    }

    let sequential: Vec<u32>;
    let faces: &[u32] = match &geometry.indices {
        Some(indices) => indices,
        None => {
            sequential = (0..vertex_count as u32).collect();
            &sequential
        }
    };

    for tri in faces.chunks_exact(3) {
        let [a, b, c] = [tri[0] + offset, tri[1] + offset, tri[2] + offset];
        let _ = writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}");
    }

    vertex_count as u32
}

/// Exports a folder to `<export_dir>/<folder>.obj`.
///
/// Returns the absolute path written, or `Ok(None)` when there was nothing to
/// export.
pub fn export_folder(folder: &str, scene: &Scene, export_dir: &Path) -> Result<Option<PathBuf>, ExportError> {
    let Some(contents) = folder_to_obj(folder, scene) else {
        log::info!("No exportable objects in folder '{}'", folder);
        return Ok(None);
    };

    let path = export_dir.join(export_file_name(folder));
    let io_error = |source| ExportError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(export_dir).map_err(io_error)?;
    fs::write(&path, contents).map_err(io_error)?;

    let path = std::path::absolute(&path).unwrap_or(path);
    log::info!("Exported folder '{}' to {}", folder, path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{PrimitiveKind, SceneObject};

    fn count_prefix(text: &str, prefix: &str) -> usize {
        text.lines().filter(|line| line.starts_with(prefix)).count()
    }

    #[test]
    fn test_file_name_is_sanitized() {
        assert_eq!(export_file_name("My Props/Set 1"), "My_Props_Set_1.obj");
    }

    #[test]
    fn test_lights_are_excluded() {
        let mut scene = Scene::new();
        scene.push_object(SceneObject::primitive("cube_1", PrimitiveKind::Cube, None).with_folder("Lights"));
        scene.push_object(
            SceneObject::light("light_1", Vector3::new(1.0, 1.0, 0.9), 1.0).with_folder("Lights"),
        );

        let obj = folder_to_obj("Lights", &scene).unwrap();
        assert_eq!(count_prefix(&obj, "o "), 1);
        assert!(obj.contains("o cube_1"));
        assert!(!obj.contains("light_1"));
        assert_eq!(count_prefix(&obj, "v "), 24);
        assert_eq!(count_prefix(&obj, "f "), 12);
    }

    #[test]
    fn test_only_lights_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = Scene::new();
        scene.push_object(
            SceneObject::light("light_1", Vector3::new(1.0, 1.0, 0.9), 1.0).with_folder("Lights"),
        );

        assert!(folder_to_obj("Lights", &scene).is_none());
        assert!(export_folder("Lights", &scene, dir.path()).unwrap().is_none());
        assert!(export_folder("Nowhere", &scene, dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_indices_are_cumulative_and_world_space() {
        let mut scene = Scene::new();
        scene.push_object(SceneObject::primitive("tri_1", PrimitiveKind::Triangle, None));
        let mut second = SceneObject::primitive("tri_2", PrimitiveKind::Triangle, None);
        second.set_position(Vector3::new(10.0, 0.0, 0.0));
        scene.push_object(second);

        let obj = folder_to_obj("Scene", &scene).unwrap();
        let faces: Vec<_> = obj.lines().filter(|line| line.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1/1/1 2/2/2 3/3/3", "f 4/4/4 5/5/5 6/6/6"]);
        assert!(obj.contains("v 9.400000 -0.600000 0.000000"));
    }

    #[test]
    fn test_normals_use_inverse_transpose() {
        let mut scene = Scene::new();
        let mut tri = SceneObject::primitive("tri_1", PrimitiveKind::Triangle, None);
        tri.set_scale(Vector3::new(4.0, 1.0, 1.0));
        scene.push_object(tri);

        let obj = folder_to_obj("Scene", &scene).unwrap();
        assert_eq!(count_prefix(&obj, "vn 0.000000 0.000000 1.000000"), 3);
    }

    #[test]
    fn test_texture_coordinates_match_source_obj() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tri.obj");
        fs::write(
            &source,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0.25 0.1\nvt 0.5 0.2\nvt 0.75 0.3\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1\n",
        )
        .unwrap();

        let meshes = crate::assets::model_loader::load_obj(&source)
            .unwrap()
            .into_iter()
            .map(Mesh::model)
            .collect();
        let mut scene = Scene::new();
        scene.push_object(SceneObject::model(
            "tri",
            crate::gfx::scene::ObjectFormat::ModelObj,
            source.to_string_lossy(),
            meshes,
        ));

        let obj = folder_to_obj("Scene", &scene).unwrap();
        let uvs: Vec<_> = obj.lines().filter(|line| line.starts_with("vt ")).collect();
        assert_eq!(
            uvs,
            vec!["vt 0.250000 0.100000", "vt 0.500000 0.200000", "vt 0.750000 0.300000"]
        );
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = Scene::new();
        scene.push_object(SceneObject::primitive("cube_1", PrimitiveKind::Cube, None).with_folder("Set A"));

        let path = export_folder("Set A", &scene, dir.path()).unwrap().unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.file_name().unwrap(), "Set_A.obj");
        let text = fs::read_to_string(path).unwrap();
        assert!(text.starts_with("# Roost export of folder \"Set A\""));
    }
}
