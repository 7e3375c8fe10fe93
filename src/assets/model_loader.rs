//! # Model Loading
//!
//! Reads OBJ files through `tobj` and glTF/GLB files through `gltf`, producing
//! one [`MeshData`] per material group (OBJ) or per primitive (glTF). Vertex
//! data is interleaved position + normal + uv, matching
//! [`crate::gfx::scene::Vertex3D`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::gfx::scene::ObjectFormat;

/// Color used when a model has no material.
pub const DEFAULT_MATERIAL_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("failed to load glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("'{0}' is not a model format")]
    Unsupported(String),
    #[error("model '{0}' contains no triangles")]
    Empty(PathBuf),
}

/// Where a mesh's diffuse texture comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// Image file on disk.
    File(PathBuf),
    /// Image decoded from inside a model file, already RGBA8.
    Embedded {
        key: String,
        width: u32,
        height: u32,
        rgba: Arc<Vec<u8>>,
    },
}

impl TextureSource {
    /// Identity used by the texture cache.
    pub fn key(&self) -> String {
        match self {
            TextureSource::File(path) => std::path::absolute(path)
                .unwrap_or_else(|_| path.clone())
                .to_string_lossy()
                .into_owned(),
            TextureSource::Embedded { key, .. } => key.clone(),
        }
    }
}

/// One primitive or material group of a loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    /// Interleaved position (3) + normal (3) + uv (2).
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u32>>,
    pub color: [f32; 3],
    pub texture: Option<TextureSource>,
}

/// Anything that can turn a model file into meshes. The scene loader only
/// depends on this, so tests can substitute an in-memory source.
pub trait ModelSource {
    fn load_model(&mut self, path: &Path, format: ObjectFormat) -> Result<Vec<MeshData>, ModelError>;
}

/// File-backed loader for OBJ and glTF/GLB.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelLoader;

impl ModelSource for ModelLoader {
    fn load_model(&mut self, path: &Path, format: ObjectFormat) -> Result<Vec<MeshData>, ModelError> {
        let meshes = match format {
            ObjectFormat::ModelGltf => load_gltf(path)?,
            ObjectFormat::ModelObj => load_obj(path)?,
            other => return Err(ModelError::Unsupported(other.to_string())),
        };
        if meshes.is_empty() {
            return Err(ModelError::Empty(path.to_path_buf()));
        }
        log::debug!("Loaded {} mesh(es) from {}", meshes.len(), path.display());
        Ok(meshes)
    }
}

/// Loads an OBJ file, one mesh per `tobj` model (tobj splits by material).
pub fn load_obj(path: &Path) -> Result<Vec<MeshData>, ModelError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No usable MTL for {}: {}", path.display(), err);
        Vec::new()
    });
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let meshes = models
        .into_iter()
        .filter(|model| !model.mesh.indices.is_empty())
        .map(|model| {
            let mesh = model.mesh;
            let vertex_count = mesh.positions.len() / 3;
            let mut vertices = Vec::with_capacity(vertex_count * 8);

            for i in 0..vertex_count {
                vertices.extend_from_slice(&mesh.positions[i * 3..i * 3 + 3]);
                match mesh.normals.get(i * 3..i * 3 + 3) {
                    Some(normal) => vertices.extend_from_slice(normal),
                    None => vertices.extend_from_slice(&[0.0, 1.0, 0.0]),
                }
                match mesh.texcoords.get(i * 2..i * 2 + 2) {
                    // OBJ puts v = 0 at the bottom; wgpu samples top-down.
                    Some(uv) => vertices.extend_from_slice(&[uv[0], 1.0 - uv[1]]),
                    None => vertices.extend_from_slice(&[0.0, 0.0]),
                }
            }

            let material = mesh.material_id.and_then(|id| materials.get(id));
            let color = material
                .and_then(|m| m.diffuse)
                .unwrap_or(DEFAULT_MATERIAL_COLOR);
            let texture = material
                .and_then(|m| m.diffuse_texture.as_ref())
                .map(|texture| TextureSource::File(base_dir.join(texture)));

            MeshData {
                name: model.name,
                vertices,
                indices: Some(mesh.indices),
                color,
                texture,
            }
        })
        .collect();

    Ok(meshes)
}

/// Loads a glTF or GLB file, one mesh per primitive.
pub fn load_gltf(path: &Path) -> Result<Vec<MeshData>, ModelError> {
    let (document, buffers, images) = gltf::import(path)?;
    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        for (prim_index, primitive) in mesh.primitives().enumerate() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| b.0.as_slice()));

            let Some(positions) = reader.read_positions() else {
                log::warn!(
                    "Skipping primitive {} of '{}' without positions",
                    prim_index,
                    mesh.name().unwrap_or("unnamed")
                );
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|normals| normals.collect())
                .unwrap_or_default();
            let tex_coords: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|uvs| uvs.into_f32().collect())
                .unwrap_or_default();

            let mut vertices = Vec::with_capacity(positions.len() * 8);
            for (i, position) in positions.iter().enumerate() {
                vertices.extend_from_slice(position);
                vertices.extend_from_slice(&normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]));
                vertices.extend_from_slice(&tex_coords.get(i).copied().unwrap_or([0.0, 0.0]));
            }

            let indices = reader.read_indices().map(|indices| {
                use gltf::mesh::util::ReadIndices;
                match indices {
                    ReadIndices::U8(iter) => iter.map(|i| i as u32).collect(),
                    ReadIndices::U16(iter) => iter.map(|i| i as u32).collect(),
                    ReadIndices::U32(iter) => iter.collect(),
                }
            });

            let pbr = primitive.material().pbr_metallic_roughness();
            let [r, g, b, _] = pbr.base_color_factor();
            let texture = pbr.base_color_texture().and_then(|info| {
                let image_index = info.texture().source().index();
                embedded_texture(path, image_index, images.get(image_index)?)
            });

            meshes.push(MeshData {
                name: format!("{}_{}", mesh.name().unwrap_or("mesh"), prim_index),
                vertices,
                indices,
                color: [r, g, b],
                texture,
            });
        }
    }

    Ok(meshes)
}

fn embedded_texture(path: &Path, index: usize, image: &gltf::image::Data) -> Option<TextureSource> {
    use gltf::image::Format;

    let rgba = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        other => {
            log::warn!("Unsupported texture format {:?} in {}", other, path.display());
            return None;
        }
    };

    Some(TextureSource::Embedded {
        key: format!("{}#{}", path.display(), index),
        width: image.width,
        height: image.height,
        rgba: Arc::new(rgba),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_obj_with_material() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("quad.mtl"),
            "newmtl red\nKd 1.0 0.0 0.0\nmap_Kd red.png\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("quad.obj"),
            "mtllib quad.mtl\n\
             v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             vn 0 0 1\n\
             usemtl red\n\
             f 1/1/1 2/2/1 3/3/1 4/4/1\n",
        )
        .unwrap();

        let meshes = load_obj(&dir.path().join("quad.obj")).unwrap();
        assert_eq!(meshes.len(), 1);

        let mesh = &meshes[0];
        assert_eq!(mesh.color, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.indices.as_ref().map(Vec::len), Some(6));
        assert_eq!(mesh.vertices.len() % 8, 0);
        assert_eq!(
            mesh.texture,
            Some(TextureSource::File(dir.path().join("red.png")))
        );
    }

    #[test]
    fn test_obj_without_normals_defaults_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let meshes = load_obj(&path).unwrap();
        assert_eq!(&meshes[0].vertices[3..6], &[0.0, 1.0, 0.0]);
        assert_eq!(meshes[0].color, DEFAULT_MATERIAL_COLOR);
    }

    #[test]
    fn test_loader_rejects_primitive_formats() {
        let result = ModelLoader.load_model(Path::new("cube.obj"), ObjectFormat::Cube);
        assert!(matches!(result, Err(ModelError::Unsupported(_))));
    }

    #[test]
    fn test_missing_obj_is_an_error() {
        let result = ModelLoader.load_model(Path::new("does/not/exist.obj"), ObjectFormat::ModelObj);
        assert!(matches!(result, Err(ModelError::Obj(_))));
    }
}
