//! # Scene Objects
//!
//! A [`SceneObject`] is a named group of meshes that move as one rigid unit.
//! Position and scale are proxied: reads come from the first mesh, writes are
//! broadcast to every mesh, so multi-primitive imports never drift apart.

use std::fmt;
use std::str::FromStr;

use cgmath::{Quaternion, Vector3, Zero};

use super::mesh::Mesh;

/// Folder every object starts in. It always exists and cannot be deleted.
pub const DEFAULT_FOLDER: &str = "Scene";

pub const CUBE_COLOR: Vector3<f32> = Vector3::new(0.49, 0.48, 1.0);
pub const TRIANGLE_COLOR: Vector3<f32> = Vector3::new(1.0, 0.4, 0.2);
pub const LIGHT_COLOR: Vector3<f32> = Vector3::new(1.0, 1.0, 0.9);
pub const LIGHT_INTENSITY: f32 = 1.0;

/// Stable identity of an object within one scene, independent of its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectId(pub u64);

/// How an object was built, and therefore how it is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFormat {
    Cube,
    Triangle,
    Light,
    ModelObj,
    ModelGltf,
}

impl ObjectFormat {
    /// Format string used in scene files.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectFormat::Cube => "cube",
            ObjectFormat::Triangle => "triangle",
            ObjectFormat::Light => "light",
            ObjectFormat::ModelObj => "obj",
            ObjectFormat::ModelGltf => "gltf",
        }
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ObjectFormat::Cube | ObjectFormat::Triangle | ObjectFormat::Light
        )
    }

    /// Maps a scene-file format string. Anything that is not a primitive is a
    /// model; `glb`/`gltf` select the glTF loader, the rest go to OBJ.
    pub fn from_scene_format(format: &str) -> Self {
        match format.to_ascii_lowercase().as_str() {
            "cube" => ObjectFormat::Cube,
            "triangle" => ObjectFormat::Triangle,
            "light" => ObjectFormat::Light,
            "glb" | "gltf" => ObjectFormat::ModelGltf,
            _ => ObjectFormat::ModelObj,
        }
    }
}

impl fmt::Display for ObjectFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in object types the editor can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Cube,
    Triangle,
    Light,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 3] = [
        PrimitiveKind::Cube,
        PrimitiveKind::Triangle,
        PrimitiveKind::Light,
    ];

    /// Prefix for auto-generated names (`cube_1`, `tri_1`, `light_1`).
    pub fn name_prefix(self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "cube",
            PrimitiveKind::Triangle => "tri",
            PrimitiveKind::Light => "light",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "Cube",
            PrimitiveKind::Triangle => "Triangle",
            PrimitiveKind::Light => "Light",
        }
    }

    pub fn default_color(self) -> Vector3<f32> {
        match self {
            PrimitiveKind::Cube => CUBE_COLOR,
            PrimitiveKind::Triangle => TRIANGLE_COLOR,
            PrimitiveKind::Light => LIGHT_COLOR,
        }
    }

    pub fn format(self) -> ObjectFormat {
        match self {
            PrimitiveKind::Cube => ObjectFormat::Cube,
            PrimitiveKind::Triangle => ObjectFormat::Triangle,
            PrimitiveKind::Light => ObjectFormat::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPrimitive(pub String);

impl fmt::Display for UnknownPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown primitive type '{}'", self.0)
    }
}

impl std::error::Error for UnknownPrimitive {}

impl FromStr for PrimitiveKind {
    type Err = UnknownPrimitive;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(PrimitiveKind::Cube),
            "triangle" | "tri" => Ok(PrimitiveKind::Triangle),
            "light" => Ok(PrimitiveKind::Light),
            other => Err(UnknownPrimitive(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct SceneObject {
    id: ObjectId,
    pub name: String,
    pub model_path: Option<String>,
    format: ObjectFormat,
    meshes: Vec<Mesh>,
    light_intensity: f32,
    light_color: Vector3<f32>,
    alpha: f32,
    folder: String,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, format: ObjectFormat, meshes: Vec<Mesh>) -> Self {
        Self {
            id: ObjectId::default(),
            name: name.into(),
            model_path: None,
            format,
            meshes,
            light_intensity: LIGHT_INTENSITY,
            light_color: LIGHT_COLOR,
            alpha: 1.0,
            folder: DEFAULT_FOLDER.to_string(),
        }
    }

    /// Builds a single-mesh primitive, using the type's default color when
    /// `color` is `None`.
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind, color: Option<Vector3<f32>>) -> Self {
        let color = color.unwrap_or_else(|| kind.default_color());
        let mesh = match kind {
            PrimitiveKind::Cube => Mesh::cube(color),
            PrimitiveKind::Triangle => Mesh::triangle(color),
            PrimitiveKind::Light => Mesh::light_orb(color),
        };
        let mut object = Self::new(name, kind.format(), vec![mesh]);
        if kind == PrimitiveKind::Light {
            object.light_color = color;
        }
        object
    }

    pub fn light(name: impl Into<String>, color: Vector3<f32>, intensity: f32) -> Self {
        let mut object = Self::primitive(name, PrimitiveKind::Light, Some(color));
        object.set_light_intensity(intensity);
        object
    }

    pub fn model(
        name: impl Into<String>,
        format: ObjectFormat,
        model_path: impl Into<String>,
        meshes: Vec<Mesh>,
    ) -> Self {
        let mut object = Self::new(name, format, meshes);
        object.model_path = Some(model_path.into());
        object
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(super) fn assign_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    pub fn format(&self) -> ObjectFormat {
        self.format
    }

    pub fn is_light(&self) -> bool {
        self.format == ObjectFormat::Light
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn position(&self) -> Vector3<f32> {
        self.meshes
            .first()
            .map_or(Vector3::zero(), |mesh| mesh.transform.position)
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        for mesh in &mut self.meshes {
            mesh.transform.position = position;
        }
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.meshes
            .first()
            .map_or(Vector3::new(1.0, 1.0, 1.0), |mesh| mesh.transform.scale)
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        for mesh in &mut self.meshes {
            mesh.transform.scale = scale;
        }
    }

    pub fn rotation(&self) -> Option<Quaternion<f32>> {
        self.meshes.first().map(|mesh| mesh.transform.rotation)
    }

    /// Sets an absolute rotation (degrees) on every mesh.
    pub fn set_rotation_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        for mesh in &mut self.meshes {
            mesh.transform.set_rotation_euler(pitch, yaw, roll);
        }
    }

    pub fn rotate_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        for mesh in &mut self.meshes {
            mesh.transform.rotate_euler(pitch, yaw, roll);
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Clamps to `[0, 1]` and applies to every mesh.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
        for mesh in &mut self.meshes {
            mesh.alpha = self.alpha;
        }
    }

    /// Lights report their light color; everything else its first mesh color.
    pub fn color(&self) -> Vector3<f32> {
        if self.is_light() {
            return self.light_color;
        }
        self.meshes
            .first()
            .map_or(Vector3::new(1.0, 1.0, 1.0), |mesh| mesh.color)
    }

    pub fn set_color(&mut self, color: Vector3<f32>) {
        for mesh in &mut self.meshes {
            mesh.color = color;
        }
        if self.is_light() {
            self.light_color = color;
        }
    }

    pub fn light_color(&self) -> Vector3<f32> {
        self.light_color
    }

    pub fn light_intensity(&self) -> f32 {
        self.light_intensity
    }

    pub fn set_light_intensity(&mut self, intensity: f32) {
        self.light_intensity = intensity.max(0.0);
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub(super) fn assign_folder(&mut self, folder: String) {
        self.folder = folder;
    }

    pub fn update(&mut self, dt: f32) {
        for mesh in &mut self.meshes {
            mesh.update(dt);
        }
    }

    /// Releases every mesh's GPU resources.
    pub fn destroy(&mut self) {
        for mesh in &mut self.meshes {
            mesh.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MeshData;

    fn two_mesh_model() -> SceneObject {
        let part = || {
            Mesh::model(MeshData {
                name: "part".into(),
                vertices: vec![0.0; 8 * 3],
                indices: None,
                color: [1.0, 1.0, 1.0],
                texture: None,
            })
        };
        SceneObject::model("chair", ObjectFormat::ModelObj, "models/chair.obj", vec![part(), part()])
    }

    #[test]
    fn test_position_and_scale_broadcast_to_all_meshes() {
        let mut object = two_mesh_model();
        object.set_position(Vector3::new(1.0, 2.0, 3.0));
        object.set_scale(Vector3::new(2.0, 0.5, 1.0));

        for mesh in object.meshes() {
            assert_eq!(mesh.transform.position, Vector3::new(1.0, 2.0, 3.0));
            assert_eq!(mesh.transform.scale, Vector3::new(2.0, 0.5, 1.0));
        }
        assert_eq!(object.position(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_alpha_is_clamped_and_broadcast() {
        let mut object = two_mesh_model();
        object.set_alpha(1.7);
        assert_eq!(object.alpha(), 1.0);
        object.set_alpha(-0.2);
        assert_eq!(object.alpha(), 0.0);
        assert!(object.meshes().iter().all(|m| m.alpha == 0.0));
    }

    #[test]
    fn test_light_color_and_intensity() {
        let mut light = SceneObject::light("light_1", LIGHT_COLOR, -3.0);
        assert!(light.is_light());
        assert_eq!(light.light_intensity(), 0.0);

        light.set_color(Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(light.light_color(), Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(light.meshes()[0].color, Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_primitive_kind_from_str() {
        assert_eq!("cube".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Cube));
        assert_eq!("light".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Light));
        assert!("sphere".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn test_scene_format_dispatch() {
        assert_eq!(ObjectFormat::from_scene_format("glb"), ObjectFormat::ModelGltf);
        assert_eq!(ObjectFormat::from_scene_format("GLTF"), ObjectFormat::ModelGltf);
        assert_eq!(ObjectFormat::from_scene_format("fbx"), ObjectFormat::ModelObj);
        assert!(ObjectFormat::from_scene_format("cube").is_primitive());
    }
}
