//! Point lights fed to the shaders each frame.

use cgmath::Vector3;

use crate::gfx::scene::Scene;

use super::super::resources::MAX_LIGHTS;

/// A point light as the shaders see it. `color` already includes intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
}

/// The scenery light that circles the origin. Not a scene object.
#[derive(Debug, Clone, Copy)]
pub struct OrbitLight {
    pub radius: f32,
    pub height: f32,
    /// Radians per second.
    pub speed: f32,
    pub color: Vector3<f32>,
    angle: f32,
}

impl Default for OrbitLight {
    fn default() -> Self {
        Self {
            radius: 3.0,
            height: 2.0,
            speed: 1.0,
            color: Vector3::new(1.0, 1.0, 1.0),
            angle: 0.0,
        }
    }
}

impl OrbitLight {
    pub fn update(&mut self, dt: f32) {
        self.angle = (self.angle + self.speed * dt) % std::f32::consts::TAU;
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(
            self.angle.cos() * self.radius,
            self.height,
            self.angle.sin() * self.radius,
        )
    }

    pub fn light(&self) -> PointLight {
        PointLight {
            position: self.position(),
            color: self.color,
        }
    }
}

/// Orbit light first, then every scene light in scene order, capped at
/// [`MAX_LIGHTS`].
pub fn collect_lights(scene: &Scene, orbit: &OrbitLight) -> Vec<PointLight> {
    std::iter::once(orbit.light())
        .chain(
            scene
                .objects()
                .iter()
                .filter(|object| object.is_light())
                .map(|object| PointLight {
                    position: object.position(),
                    color: object.light_color() * object.light_intensity(),
                }),
        )
        .take(MAX_LIGHTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{PrimitiveKind, SceneObject};
    use approx::assert_relative_eq;

    #[test]
    fn test_orbit_starts_on_x_axis() {
        let orbit = OrbitLight::default();
        let position = orbit.position();
        assert_relative_eq!(position.x, 3.0);
        assert_relative_eq!(position.y, 2.0);
        assert_relative_eq!(position.z, 0.0);
    }

    #[test]
    fn test_orbit_advances_by_speed() {
        let mut orbit = OrbitLight::default();
        orbit.update(std::f32::consts::FRAC_PI_2);
        let position = orbit.position();
        assert_relative_eq!(position.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(position.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_scene_lights_follow_orbit_light() {
        let mut scene = Scene::default();
        scene.push_object(SceneObject::primitive("cube_1", PrimitiveKind::Cube, None));
        let mut light = SceneObject::light("light_1", Vector3::new(1.0, 0.5, 0.0), 2.0);
        light.set_position(Vector3::new(1.0, 2.0, 3.0));
        scene.push_object(light);

        let lights = collect_lights(&scene, &OrbitLight::default());
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].color, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(lights[1].position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(lights[1].color, Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_lights_are_capped() {
        let mut scene = Scene::default();
        for i in 0..12 {
            scene.push_object(SceneObject::light(
                format!("light_{}", i),
                Vector3::new(1.0, 1.0, 1.0),
                1.0,
            ));
        }
        assert_eq!(collect_lights(&scene, &OrbitLight::default()).len(), MAX_LIGHTS);
    }
}
