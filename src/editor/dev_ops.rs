//! # Dev Operations
//!
//! Mutations the editor performs on the scene: spawning primitives, deleting
//! objects, nudging the selection with held keys, and applying the property
//! panel's text fields.

use std::str::FromStr;

use cgmath::Vector3;

use super::input::{HeldKeys, Key};
use crate::gfx::camera::FlyCamera;
use crate::gfx::scene::{PrimitiveKind, Scene, SceneObject};

/// Spawned objects sit this far above the requested point.
pub const SPAWN_LIFT: f32 = 0.5;

/// Distance in front of the camera used when there is no floor hit.
pub const SPAWN_DISTANCE: f32 = 5.0;

/// Scaling down never goes below this factor.
pub const MIN_SCALE: f32 = 0.01;

/// Axis restricted by holding 1, 2 or 3 while scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Axis selected by the held digit keys. Lower digits win.
pub fn stretch_axis(held: &HeldKeys) -> Option<Axis> {
    if held.contains(Key::Digit1) {
        Some(Axis::X)
    } else if held.contains(Key::Digit2) {
        Some(Axis::Y)
    } else if held.contains(Key::Digit3) {
        Some(Axis::Z)
    } else {
        None
    }
}

/// Raw text of the property fields, as read from the panel.
///
/// `None` means the field is absent for this object (intensity on non-lights)
/// or must not be applied right now (folder while it is being typed into).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValues {
    pub position: [String; 3],
    pub scale: [String; 3],
    pub color: Option<String>,
    pub intensity: Option<String>,
    pub alpha: String,
    pub folder: Option<String>,
}

/// Parses `#RGB`, `RGB`, `#RRGGBB` or `RRGGBB` into 0..1 components.
pub fn parse_hex_color(text: &str) -> Option<Vector3<f32>> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let [r, g, b] = match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, slot) in out.iter_mut().enumerate() {
                let digit = channel(&hex[i..i + 1])?;
                *slot = digit * 17;
            }
            out
        }
        6 => [
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ],
        _ => return None,
    };
    Some(Vector3::new(r as f32, g as f32, b as f32) / 255.0)
}

/// Formats a 0..1 color as `#RRGGBB`.
pub fn format_hex_color(color: Vector3<f32>) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    format!("#{:02X}{:02X}{:02X}", byte(color.x), byte(color.y), byte(color.z))
}

fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Editor-side tools: spawn counters and edit speeds.
#[derive(Debug, Clone)]
pub struct DevTools {
    cube_count: u32,
    triangle_count: u32,
    light_count: u32,
    pub move_speed: f32,
    pub scale_speed: f32,
}

impl Default for DevTools {
    fn default() -> Self {
        Self::new(2.0, 1.5)
    }
}

impl DevTools {
    pub fn new(move_speed: f32, scale_speed: f32) -> Self {
        Self {
            cube_count: 0,
            triangle_count: 0,
            light_count: 0,
            move_speed,
            scale_speed,
        }
    }

    fn counter(&mut self, kind: PrimitiveKind) -> &mut u32 {
        match kind {
            PrimitiveKind::Cube => &mut self.cube_count,
            PrimitiveKind::Triangle => &mut self.triangle_count,
            PrimitiveKind::Light => &mut self.light_count,
        }
    }

    /// Next free `<prefix>_<n>` name. Numbers are never reused, and names
    /// already present in the scene (e.g. loaded from a file) are skipped.
    fn next_name(&mut self, kind: PrimitiveKind, scene: &Scene) -> String {
        loop {
            let counter = self.counter(kind);
            *counter += 1;
            let name = format!("{}_{}", kind.name_prefix(), *counter);
            if !scene.contains_name(&name) {
                return name;
            }
        }
    }

    /// Spawns a primitive resting on `point` and returns its index.
    pub fn spawn_at(&mut self, kind: PrimitiveKind, point: Vector3<f32>, scene: &mut Scene) -> usize {
        let name = self.next_name(kind, scene);
        let mut object = SceneObject::primitive(name, kind, None);
        let position = point + Vector3::new(0.0, SPAWN_LIFT, 0.0);
        object.set_position(position);
        object.set_scale(Vector3::new(1.0, 1.0, 1.0));

        log::info!(
            "Spawned {} '{}' at ({:.2}, {:.2}, {:.2})",
            kind.label(),
            object.name,
            position.x,
            position.y,
            position.z
        );
        scene.push_object(object)
    }

    /// Spawns a primitive [`SPAWN_DISTANCE`] units in front of the camera.
    pub fn spawn_in_front(&mut self, kind: PrimitiveKind, camera: &FlyCamera, scene: &mut Scene) -> usize {
        let point = camera.position + camera.front() * SPAWN_DISTANCE;
        self.spawn_at(kind, point, scene)
    }

    /// Spawns by type name. Unknown names create nothing and return `None`.
    pub fn spawn_named(&mut self, type_name: &str, point: Vector3<f32>, scene: &mut Scene) -> Option<usize> {
        match PrimitiveKind::from_str(type_name) {
            Ok(kind) => Some(self.spawn_at(kind, point, scene)),
            Err(err) => {
                log::warn!("Cannot spawn: {}", err);
                None
            }
        }
    }

    /// Deletes the object at `index`, releasing its GPU resources.
    /// Returns false when there was nothing to delete.
    pub fn delete(&mut self, index: Option<usize>, scene: &mut Scene) -> bool {
        let Some(object) = index.and_then(|index| scene.remove_object(index)) else {
            return false;
        };
        log::info!("Deleted '{}'", object.name);
        true
    }

    /// Moves and scales `object` from the held keys. Returns true if anything
    /// changed.
    pub fn apply_held_keys(&self, dt: f32, object: &mut SceneObject, held: &HeldKeys) -> bool {
        let step = self.move_speed * dt;
        let mut offset = Vector3::new(0.0, 0.0, 0.0);
        let mut moved = false;

        for (key, delta) in [
            (Key::ArrowUp, Vector3::new(0.0, 0.0, -step)),
            (Key::ArrowDown, Vector3::new(0.0, 0.0, step)),
            (Key::ArrowLeft, Vector3::new(-step, 0.0, 0.0)),
            (Key::ArrowRight, Vector3::new(step, 0.0, 0.0)),
            (Key::Q, Vector3::new(0.0, -step, 0.0)),
            (Key::E, Vector3::new(0.0, step, 0.0)),
        ] {
            if held.contains(key) {
                offset += delta;
                moved = true;
            }
        }
        if moved {
            object.set_position(object.position() + offset);
        }

        let factor = if held.contains(Key::Plus) {
            Some(1.0 + self.scale_speed * dt)
        } else if held.contains(Key::Minus) {
            Some((1.0 - self.scale_speed * dt).max(MIN_SCALE))
        } else {
            None
        };

        let Some(factor) = factor else {
            return moved;
        };

        let mut scale = object.scale();
        match stretch_axis(held) {
            Some(Axis::X) => scale.x *= factor,
            Some(Axis::Y) => scale.y *= factor,
            Some(Axis::Z) => scale.z *= factor,
            None => scale *= factor,
        }
        object.set_scale(scale);
        true
    }

    /// Applies the panel's field text to the object at `index`.
    ///
    /// Every field is parsed on its own; text that does not parse leaves the
    /// previous value in place.
    pub fn apply_property_values(&self, index: usize, values: &PropertyValues, scene: &mut Scene) {
        let Some(object) = scene.get_object_mut(index) else {
            return;
        };

        let mut position = object.position();
        for (axis, text) in values.position.iter().enumerate() {
            if let Some(v) = parse_number(text) {
                position[axis] = v;
            }
        }
        object.set_position(position);

        let mut scale = object.scale();
        for (axis, text) in values.scale.iter().enumerate() {
            if let Some(v) = parse_number(text) {
                scale[axis] = v;
            }
        }
        object.set_scale(scale);

        if let Some(color) = values.color.as_deref().and_then(parse_hex_color) {
            if !object.meshes().is_empty() {
                object.set_color(color);
            }
        }

        if object.is_light() {
            if let Some(intensity) = values.intensity.as_deref().and_then(parse_number) {
                object.set_light_intensity(intensity);
            }
        }

        if let Some(alpha) = parse_number(&values.alpha) {
            object.set_alpha(alpha);
        }

        if let Some(folder) = values.folder.as_deref() {
            if scene.set_object_folder(index, folder) {
                log::info!("Moved '{}' to folder '{}'", scene.objects()[index].name, folder.trim());
            }
        }
    }
}

/// Logs a summary of every object (the save-and-report shortcut).
pub fn log_scene_info(scene_file: &std::path::Path, scene: &Scene, selected: Option<usize>) {
    let stats = scene.get_statistics();
    log::info!(
        "Scene {}: {} objects ({} lights) in {} folders, {} triangles",
        scene_file.display(),
        stats.object_count,
        stats.light_count,
        stats.folder_count,
        stats.total_triangles
    );
    for (i, object) in scene.objects().iter().enumerate() {
        let p = object.position();
        let s = object.scale();
        log::info!(
            "  [{}] {} ({}){}{} folder={}{} pos=({:.2}, {:.2}, {:.2}) scale=({:.4}, {:.4}, {:.4})",
            i,
            object.name,
            object.format(),
            if object.is_light() { " (light)" } else { "" },
            if selected == Some(i) { " [SELECTED]" } else { "" },
            object.folder(),
            object
                .model_path
                .as_deref()
                .map(|path| format!(" model={}", path))
                .unwrap_or_default(),
            p.x,
            p.y,
            p.z,
            s.x,
            s.y,
            s.z
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn held(keys: &[Key]) -> HeldKeys {
        let mut held = HeldKeys::default();
        for key in keys {
            held.press(*key);
        }
        held
    }

    #[test]
    fn test_counter_never_reuses_numbers() {
        let mut tools = DevTools::default();
        let mut scene = Scene::new();

        let first = tools.spawn_at(PrimitiveKind::Cube, Vector3::new(0.0, 0.0, 0.0), &mut scene);
        assert!(tools.delete(Some(first), &mut scene));
        let second = tools.spawn_at(PrimitiveKind::Cube, Vector3::new(0.0, 0.0, 0.0), &mut scene);
        assert!(tools.delete(Some(second), &mut scene));
        let third = tools.spawn_at(PrimitiveKind::Cube, Vector3::new(0.0, 0.0, 0.0), &mut scene);

        assert_eq!(scene.objects()[third].name, "cube_3");
    }

    #[test]
    fn test_counters_are_per_type_and_skip_taken_names() {
        let mut tools = DevTools::default();
        let mut scene = Scene::new();
        scene.push_object(SceneObject::primitive("tri_1", PrimitiveKind::Triangle, None));

        let cube = tools.spawn_at(PrimitiveKind::Cube, Vector3::new(0.0, 0.0, 0.0), &mut scene);
        let tri = tools.spawn_at(PrimitiveKind::Triangle, Vector3::new(0.0, 0.0, 0.0), &mut scene);
        let light = tools.spawn_at(PrimitiveKind::Light, Vector3::new(0.0, 0.0, 0.0), &mut scene);

        assert_eq!(scene.objects()[cube].name, "cube_1");
        assert_eq!(scene.objects()[tri].name, "tri_2");
        assert_eq!(scene.objects()[light].name, "light_1");
        assert!(scene.objects()[light].is_light());
    }

    #[test]
    fn test_spawn_is_lifted() {
        let mut tools = DevTools::default();
        let mut scene = Scene::new();
        let index = tools.spawn_at(PrimitiveKind::Cube, Vector3::new(1.0, 0.0, 2.0), &mut scene);
        assert_eq!(scene.objects()[index].position(), Vector3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_spawn_in_front_of_camera() {
        let mut tools = DevTools::default();
        let mut scene = Scene::new();
        let camera = FlyCamera::new(Vector3::new(0.0, 1.0, 3.0), -90.0, 0.0);

        let index = tools.spawn_in_front(PrimitiveKind::Cube, &camera, &mut scene);
        let p = scene.objects()[index].position();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.5, epsilon = 1e-5);
        assert_relative_eq!(p.z, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_unknown_type_spawns_nothing() {
        let mut tools = DevTools::default();
        let mut scene = Scene::new();
        assert!(tools
            .spawn_named("sphere", Vector3::new(0.0, 0.0, 0.0), &mut scene)
            .is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut tools = DevTools::default();
        let mut scene = Scene::new();
        scene.push_object(SceneObject::primitive("cube_1", PrimitiveKind::Cube, None));

        assert!(!tools.delete(None, &mut scene));
        assert!(!tools.delete(Some(4), &mut scene));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_minus_with_axis_two_scales_y_only() {
        let tools = DevTools::new(2.0, 1.5);
        let mut object = SceneObject::primitive("cube_1", PrimitiveKind::Cube, None);

        tools.apply_held_keys(0.1, &mut object, &held(&[Key::Minus, Key::Digit2]));
        let scale = object.scale();
        assert_relative_eq!(scale.y, 0.85, epsilon = 1e-5);
        assert_eq!(scale.x, 1.0);
        assert_eq!(scale.z, 1.0);

        // A huge step is floored rather than flipping the sign.
        tools.apply_held_keys(10.0, &mut object, &held(&[Key::Minus, Key::Digit2]));
        assert_relative_eq!(object.scale().y, 0.85 * MIN_SCALE, epsilon = 1e-6);
        assert_eq!(object.scale().x, 1.0);
    }

    #[test]
    fn test_plus_without_digit_is_uniform() {
        let tools = DevTools::new(2.0, 1.0);
        let mut object = SceneObject::primitive("cube_1", PrimitiveKind::Cube, None);

        assert!(tools.apply_held_keys(0.5, &mut object, &held(&[Key::Plus])));
        assert_eq!(object.scale(), Vector3::new(1.5, 1.5, 1.5));
    }

    #[test]
    fn test_arrow_and_vertical_movement() {
        let tools = DevTools::new(2.0, 1.5);
        let mut object = SceneObject::primitive("cube_1", PrimitiveKind::Cube, None);

        tools.apply_held_keys(0.5, &mut object, &held(&[Key::ArrowUp, Key::ArrowRight, Key::E]));
        assert_eq!(object.position(), Vector3::new(1.0, 1.0, -1.0));
        assert!(!tools.apply_held_keys(0.5, &mut object, &HeldKeys::default()));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(parse_hex_color("#FF0000"), Some(Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(parse_hex_color("0f0"), Some(Vector3::new(0.0, 1.0, 0.0)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(format_hex_color(Vector3::new(1.0, 0.5, 0.0)), "#FF7F00");
    }

    #[test]
    fn test_malformed_fields_keep_previous_values() {
        let tools = DevTools::default();
        let mut scene = Scene::new();
        let mut cube = SceneObject::primitive("cube_1", PrimitiveKind::Cube, None);
        cube.set_position(Vector3::new(1.0, 2.0, 3.0));
        let index = scene.push_object(cube);

        let values = PropertyValues {
            position: ["5".into(), "abc".into(), " 7.5 ".into()],
            scale: ["".into(), "2".into(), "".into()],
            color: Some("#zzz".into()),
            intensity: Some("4".into()),
            alpha: "half".into(),
            folder: Some("   ".into()),
        };
        tools.apply_property_values(index, &values, &mut scene);

        let object = &scene.objects()[index];
        assert_eq!(object.position(), Vector3::new(5.0, 2.0, 7.5));
        assert_eq!(object.scale(), Vector3::new(1.0, 2.0, 1.0));
        assert_eq!(object.color(), PrimitiveKind::Cube.default_color());
        assert_eq!(object.alpha(), 1.0);
        assert_eq!(object.light_intensity(), 1.0);
        assert_eq!(object.folder(), "Scene");
    }

    #[test]
    fn test_light_fields_and_folder() {
        let tools = DevTools::default();
        let mut scene = Scene::new();
        let index = scene.push_object(SceneObject::light(
            "light_1",
            PrimitiveKind::Light.default_color(),
            1.0,
        ));

        let values = PropertyValues {
            color: Some("#00F".into()),
            intensity: Some("-2".into()),
            alpha: "0.5".into(),
            folder: Some(" Lights ".into()),
            ..Default::default()
        };
        tools.apply_property_values(index, &values, &mut scene);

        let light = &scene.objects()[index];
        assert_eq!(light.light_color(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(light.light_intensity(), 0.0);
        assert_eq!(light.alpha(), 0.5);
        assert_eq!(light.folder(), "Lights");
        assert!(scene.folders().contains("Lights"));
    }
}
