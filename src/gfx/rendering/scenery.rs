//! Static renderables that are not scene objects: the floor and the
//! orbiting default light with its marker.

use cgmath::Vector3;

use crate::gfx::scene::Mesh;

use super::lights::OrbitLight;

pub const FLOOR_SIZE: f32 = 10.0;
pub const FLOOR_COLOR: Vector3<f32> = Vector3::new(0.35, 0.35, 0.4);

#[derive(Debug)]
pub struct Scenery {
    pub orbit: OrbitLight,
    meshes: Vec<Mesh>,
}

impl Default for Scenery {
    fn default() -> Self {
        let orbit = OrbitLight::default();
        let mut marker = Mesh::light_orb(orbit.color);
        marker.transform.position = orbit.position();
        Self {
            orbit,
            meshes: vec![Mesh::floor(FLOOR_SIZE, FLOOR_COLOR), marker],
        }
    }
}

impl Scenery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the orbit and keeps the marker on the light.
    pub fn update(&mut self, dt: f32) {
        self.orbit.update(dt);
        if let Some(marker) = self.meshes.get_mut(1) {
            marker.transform.position = self.orbit.position();
        }
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn destroy(&mut self) {
        for mesh in &mut self.meshes {
            mesh.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_follows_orbit() {
        let mut scenery = Scenery::new();
        scenery.update(0.5);
        assert_eq!(scenery.meshes()[1].transform.position, scenery.orbit.position());
        assert_eq!(scenery.meshes()[0].transform.position, Vector3::new(0.0, 0.0, 0.0));
    }
}
