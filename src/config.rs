//! Editor configuration
//!
//! Read from `roost.toml` next to the working directory when present. Every
//! section and field is optional; anything missing falls back to the default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gfx::camera::{fly_camera::PITCH_LIMIT, FlyCamera};

/// File looked up when no `--config` flag is given.
pub const DEFAULT_CONFIG_FILE: &str = "roost.toml";

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Roost Scene Editor".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            speed: 5.0,
            sensitivity: 0.1,
        }
    }
}

impl CameraConfig {
    /// Builds the camera, limiting pitch the same way mouse-look does.
    pub fn build(&self) -> FlyCamera {
        let pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let mut camera = FlyCamera::new(self.position.into(), self.yaw, pitch);
        camera.fov = self.fov;
        camera.near = self.near;
        camera.far = self.far;
        camera.speed = self.speed;
        camera.sensitivity = self.sensitivity;
        camera
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// World units per second for arrow/Q/E movement.
    pub move_speed: f32,
    /// Fractional scale change per second for +/-.
    pub scale_speed: f32,
    pub autosave_enabled: bool,
    pub autosave_interval_secs: f32,
    pub target_fps: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            scale_speed: 1.5,
            autosave_enabled: false,
            autosave_interval_secs: 30.0,
            target_fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub scene_file: PathBuf,
    pub scenes_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            scene_file: PathBuf::from("scenes/default.json"),
            scenes_dir: PathBuf::from("scenes"),
            export_dir: PathBuf::from("exports"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub editor: EditorSettings,
    pub paths: PathsConfig,
}

impl EditorConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::load_from_file(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
