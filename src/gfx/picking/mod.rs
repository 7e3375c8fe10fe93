//! # Object Picking System
//!
//! Screen-space clicks are turned into world-space rays and tested against the
//! scene. Objects are approximated by generous bounding spheres rather than
//! their geometry, and the floor is the plane `y = 0`.
//!
//! ## How it works
//!
//! 1. **Mouse to Ray**: pixel → NDC → inverse projection → inverse view
//! 2. **Ray-Sphere Intersection**: every object is a sphere around its position
//! 3. **Selection**: the hit with the smallest positive `t` wins
//!
//! ## Usage
//!
//! ```no_run
//! use roost::gfx::{picking, camera::FlyCamera, scene::Scene, viewport::Viewport};
//!
//! let camera = FlyCamera::default();
//! let scene = Scene::new();
//! let viewport = Viewport::new(1280.0, 720.0);
//! if let Some(index) = picking::pick_object_from_screen(&camera, viewport, 640.0, 360.0, &scene) {
//!     log::info!("Selected object: {}", index);
//! }
//! ```

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::{camera::FlyCamera, scene::Scene, viewport::Viewport};

/// Rays closer to parallel with the floor than this never hit it.
pub const FLOOR_PARALLEL_EPSILON: f32 = 1e-6;

/// Multiplier from an object's largest scale component to its pick radius.
pub const PICK_RADIUS_SCALE: f32 = 50.0;

/// Smallest pick radius regardless of scale.
pub const MIN_PICK_RADIUS: f32 = 5.0;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Ray from the camera position along its view direction.
    pub fn from_camera(camera: &FlyCamera) -> Self {
        Self::new(camera.position, camera.front())
    }
}

/// Result of an object picking operation
#[derive(Debug, Clone, Copy)]
pub struct PickResult {
    /// Index of the picked object in the scene
    pub object_index: usize,
    /// Distance along the ray to the intersection point
    pub distance: f32,
}

/// Convert screen coordinates to a world-space ray
///
/// The ray starts at the camera position. Its direction is the pixel
/// unprojected at the near plane (clip z = -1) with w = 0.
pub fn screen_ray(camera: &FlyCamera, viewport: Viewport, px: f32, py: f32) -> Ray {
    let ndc_x = (2.0 * px) / viewport.width - 1.0;
    let ndc_y = 1.0 - (2.0 * py) / viewport.height; // Flip Y axis

    let inv_proj = camera
        .projection_matrix(viewport.aspect())
        .invert()
        .unwrap_or(Matrix4::identity());
    let inv_view = camera.view_matrix().invert().unwrap_or(Matrix4::identity());

    let ray_clip = Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
    let ray_eye = inv_proj * ray_clip;
    let ray_eye = Vector4::new(ray_eye.x, ray_eye.y, -1.0, 0.0);
    let ray_world = (inv_view * ray_eye).truncate();

    Ray::new(camera.position, ray_world)
}

/// Intersects a ray with the floor plane `y = 0`.
///
/// Returns `None` when the ray is (nearly) parallel to the floor or when the
/// intersection lies behind the ray origin.
pub fn ray_floor(ray: &Ray) -> Option<Vector3<f32>> {
    if ray.direction.y.abs() < FLOOR_PARALLEL_EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return None;
    }
    Some(ray.point_at(t))
}

/// World-space point on the floor under a screen pixel.
pub fn screen_to_floor(
    camera: &FlyCamera,
    viewport: Viewport,
    px: f32,
    py: f32,
) -> Option<Vector3<f32>> {
    ray_floor(&screen_ray(camera, viewport, px, py))
}

/// Nearest positive intersection distance of a ray with a sphere.
pub fn ray_sphere(ray: &Ray, center: Vector3<f32>, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);
    let t = if t1 > 0.0 { t1 } else { t2 };
    (t > 0.0).then_some(t)
}

/// Bounding-sphere radius used to pick an object with the given scale.
pub fn pick_radius(scale: Vector3<f32>) -> f32 {
    (scale.x.max(scale.y).max(scale.z) * PICK_RADIUS_SCALE).max(MIN_PICK_RADIUS)
}

/// Closest object hit by the ray, if any.
pub fn pick_from_ray(ray: &Ray, scene: &Scene) -> Option<PickResult> {
    let mut closest: Option<PickResult> = None;

    for (i, object) in scene.objects().iter().enumerate() {
        let Some(distance) = ray_sphere(ray, object.position(), pick_radius(object.scale())) else {
            continue;
        };

        if closest.map_or(true, |result| distance < result.distance) {
            closest = Some(PickResult {
                object_index: i,
                distance,
            });
        }
    }

    closest
}

/// Picks along the camera's forward direction (crosshair picking).
pub fn pick_object(camera: &FlyCamera, scene: &Scene) -> Option<usize> {
    pick_from_ray(&Ray::from_camera(camera), scene).map(|result| result.object_index)
}

/// Picks under a screen pixel.
pub fn pick_object_from_screen(
    camera: &FlyCamera,
    viewport: Viewport,
    px: f32,
    py: f32,
    scene: &Scene,
) -> Option<usize> {
    pick_from_ray(&screen_ray(camera, viewport, px, py), scene).map(|result| result.object_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{PrimitiveKind, SceneObject};
    use approx::assert_relative_eq;

    fn scene_with_cube_at(position: Vector3<f32>) -> Scene {
        let mut scene = Scene::new();
        let mut cube = SceneObject::primitive("cube_1", PrimitiveKind::Cube, None);
        cube.set_position(position);
        scene.push_object(cube);
        scene
    }

    #[test]
    fn test_pick_radius_formula() {
        assert_eq!(pick_radius(Vector3::new(1.0, 1.0, 1.0)), 50.0);
        assert_eq!(pick_radius(Vector3::new(0.01, 0.02, 0.05)), 5.0);
        assert_eq!(pick_radius(Vector3::new(0.5, 2.0, 1.0)), 100.0);
    }

    #[test]
    fn test_pick_hits_object_on_ray() {
        let positions = [
            Vector3::new(0.0, 0.0, -20.0),
            Vector3::new(30.0, 4.0, 12.0),
            Vector3::new(-7.5, 100.0, 0.25),
        ];
        for p in positions {
            let scene = scene_with_cube_at(p);
            let origin = Vector3::new(1.0, 2.0, 3.0);
            let ray = Ray::new(origin, p - origin);
            let hit = pick_from_ray(&ray, &scene).map(|r| r.object_index);
            assert_eq!(hit, Some(0), "object at {:?}", p);
        }
    }

    #[test]
    fn test_pick_misses_perpendicular_ray_beyond_radius() {
        let p = Vector3::new(0.0, 0.0, 0.0);
        let scene = scene_with_cube_at(p);
        let radius = pick_radius(Vector3::new(1.0, 1.0, 1.0));

        // Travels along +X, offset in Z by more than the radius.
        let ray = Ray::new(
            Vector3::new(-200.0, 0.0, radius + 1.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        assert!(pick_from_ray(&ray, &scene).is_none());
    }

    #[test]
    fn test_pick_ignores_objects_behind_ray() {
        let scene = scene_with_cube_at(Vector3::new(0.0, 0.0, 100.0));
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(pick_from_ray(&ray, &scene).is_none());
    }

    #[test]
    fn test_pick_prefers_nearest() {
        let mut scene = scene_with_cube_at(Vector3::new(0.0, 0.0, -300.0));
        let mut near = SceneObject::primitive("cube_2", PrimitiveKind::Cube, None);
        near.set_position(Vector3::new(0.0, 0.0, -120.0));
        scene.push_object(near);

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let result = pick_from_ray(&ray, &scene).map(|r| r.object_index);
        assert_eq!(result, Some(1));
    }

    #[test]
    fn test_pick_from_inside_sphere_uses_far_root() {
        let scene = scene_with_cube_at(Vector3::new(0.0, 0.0, -1.0));
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let result = pick_from_ray(&ray, &scene).expect("inside hit");
        assert_relative_eq!(result.distance, 51.0, epsilon = 1e-3);
    }

    #[test]
    fn test_screen_to_floor_center_looking_down() {
        let camera = FlyCamera::new(Vector3::new(0.0, 10.0, 0.0), -90.0, -90.0);
        let viewport = Viewport::new(800.0, 600.0);
        let (cx, cy) = viewport.center();

        let hit = screen_to_floor(&camera, viewport, cx, cy).expect("floor hit");
        assert_relative_eq!(hit.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(hit.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(hit.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_screen_to_floor_horizontal_is_none() {
        let camera = FlyCamera::new(Vector3::new(0.0, 1.0, 3.0), -90.0, 0.0);
        let viewport = Viewport::new(800.0, 600.0);
        let (cx, cy) = viewport.center();

        assert!(screen_to_floor(&camera, viewport, cx, cy).is_none());
    }

    #[test]
    fn test_screen_to_floor_behind_origin_is_none() {
        let camera = FlyCamera::new(Vector3::new(0.0, 2.0, 0.0), -90.0, 45.0);
        let viewport = Viewport::new(800.0, 600.0);
        let (cx, cy) = viewport.center();

        assert!(screen_to_floor(&camera, viewport, cx, cy).is_none());
    }

    #[test]
    fn test_center_pixel_matches_camera_front() {
        let mut camera = FlyCamera::default();
        camera.process_mouse(30.0, 40.0);
        let viewport = Viewport::new(1024.0, 768.0);
        let (cx, cy) = viewport.center();

        let ray = screen_ray(&camera, viewport, cx, cy);
        assert_relative_eq!(ray.direction.dot(camera.front()), 1.0, epsilon = 1e-4);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn test_camera_forward_pick() {
        let scene = scene_with_cube_at(Vector3::new(0.0, 1.0, -60.0));
        let camera = FlyCamera::new(Vector3::new(0.0, 1.0, 3.0), -90.0, 0.0);
        assert_eq!(pick_object(&camera, &scene), Some(0));
    }
}
