//! # Scene Files
//!
//! JSON scene documents: `{ "objects": [ ... ] }`, one entry per scene object.
//!
//! Loading is forgiving. Each entry is decoded on its own, so a malformed
//! entry or a missing model file only drops that entry. Saving writes the
//! whole document to a sibling temp file and renames it into place.
//!
//! Rotation is written as `[0, 0, 0]` on every save. Orientation set in the
//! editor does not survive a save/load cycle; rotations present in a
//! hand-written file are applied on load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cgmath::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::{ModelError, ModelSource};
use crate::gfx::scene::{
    Mesh, ObjectFormat, PrimitiveKind, Scene, SceneObject, DEFAULT_FOLDER,
};

#[derive(Debug, Error)]
pub enum SceneFileError {
    #[error("failed to access scene file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("scene file '{path}' is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize scene: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_format() -> String {
    "obj".to_string()
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// One object as stored in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// Degrees: pitch, yaw, roll.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub objects: Vec<ObjectEntry>,
}

/// Outcome of a load: the scene plus how many entries were dropped.
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: Scene,
    pub skipped: usize,
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}

fn round_vec(v: Vector3<f32>, decimals: i32) -> [f32; 3] {
    [
        round_to(v.x, decimals),
        round_to(v.y, decimals),
        round_to(v.z, decimals),
    ]
}

impl ObjectEntry {
    pub fn from_object(object: &SceneObject) -> Self {
        let format = object.format();
        let has_color = matches!(
            format,
            ObjectFormat::Cube | ObjectFormat::Triangle | ObjectFormat::Light
        );

        Self {
            name: object.name.clone(),
            format: format.as_str().to_string(),
            position: round_vec(object.position(), 3),
            rotation: [0.0, 0.0, 0.0],
            scale: round_vec(object.scale(), 4),
            model: if format.is_primitive() {
                None
            } else {
                Some(object.model_path.clone().unwrap_or_default())
            },
            color: has_color.then(|| round_vec(object.color(), 3)),
            intensity: object.is_light().then(|| object.light_intensity()),
            alpha: Some(round_to(object.alpha(), 3)).filter(|alpha| *alpha < 1.0),
            folder: (object.folder() != DEFAULT_FOLDER).then(|| object.folder().to_string()),
        }
    }

    fn folder_name(&self) -> &str {
        match self.folder.as_deref().map(str::trim) {
            Some(folder) if !folder.is_empty() => folder,
            _ => DEFAULT_FOLDER,
        }
    }

    /// Builds the object this entry describes. `Ok(None)` means the entry
    /// references a model file that does not exist.
    pub fn build(&self, models: &mut dyn ModelSource) -> Result<Option<SceneObject>, ModelError> {
        let color = self.color.map(Vector3::from);

        let mut object = match self.format.parse::<PrimitiveKind>() {
            Ok(PrimitiveKind::Light) => SceneObject::light(
                self.name.clone(),
                color.unwrap_or_else(|| PrimitiveKind::Light.default_color()),
                self.intensity.unwrap_or(1.0),
            ),
            Ok(kind) => SceneObject::primitive(self.name.clone(), kind, color),
            Err(_) => {
                let model_path = self.model.clone().unwrap_or_default();
                let path = Path::new(&model_path);
                if model_path.is_empty() || !path.exists() {
                    log::warn!("Model not found for '{}': '{}'", self.name, model_path);
                    return Ok(None);
                }

                let format = ObjectFormat::from_scene_format(&self.format);
                let meshes = models
                    .load_model(path, format)?
                    .into_iter()
                    .map(Mesh::model)
                    .collect();
                log::info!("Loaded '{}' from {}", self.name, model_path);
                SceneObject::model(self.name.clone(), format, model_path.clone(), meshes)
            }
        };

        object.set_position(Vector3::from(self.position));
        object.set_scale(Vector3::from(self.scale));
        if let Some(alpha) = self.alpha {
            object.set_alpha(alpha);
        }
        let [pitch, yaw, roll] = self.rotation;
        if self.rotation.iter().any(|r| *r != 0.0) {
            object.set_rotation_euler(pitch, yaw, roll);
        }

        Ok(Some(object.with_folder(self.folder_name())))
    }
}

impl SceneDocument {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            objects: scene.objects().iter().map(ObjectEntry::from_object).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SceneFileError> {
        serde_json::to_string_pretty(self).map_err(SceneFileError::Serialize)
    }
}

/// Parses scene JSON, decoding entries one at a time.
///
/// Entries that fail to decode, reference missing models, or whose model
/// fails to load are skipped with a warning.
pub fn parse_scene(json: &str, path: &Path, models: &mut dyn ModelSource) -> Result<LoadedScene, SceneFileError> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|source| SceneFileError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let entries = document
        .get("objects")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut scene = Scene::new();
    let mut skipped = 0;

    for (index, value) in entries.into_iter().enumerate() {
        let entry: ObjectEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping scene entry {}: {}", index, err);
                skipped += 1;
                continue;
            }
        };

        match entry.build(models) {
            Ok(Some(object)) => {
                scene.push_object(object);
            }
            Ok(None) => skipped += 1,
            Err(err) => {
                log::warn!("Skipping '{}': {}", entry.name, err);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Loaded {} object(s) from {} ({} skipped)",
        scene.len(),
        path.display(),
        skipped
    );
    Ok(LoadedScene { scene, skipped })
}

/// Reads and parses a scene file.
pub fn load_scene(path: &Path, models: &mut dyn ModelSource) -> Result<LoadedScene, SceneFileError> {
    let json = fs::read_to_string(path).map_err(|source| SceneFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene(&json, path, models)
}

/// Writes the scene to `path` through a temp file and rename, creating the
/// parent directory when needed.
pub fn save_scene(path: &Path, scene: &Scene) -> Result<(), SceneFileError> {
    let json = SceneDocument::from_scene(scene).to_json()?;
    let io_error = |source| SceneFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, json).map_err(io_error)?;
    fs::rename(&tmp_path, path).map_err(io_error)?;

    log::info!("Scene saved to {}", path.display());
    Ok(())
}
