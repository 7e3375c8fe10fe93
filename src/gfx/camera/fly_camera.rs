use cgmath::*;

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::editor::input::{HeldKeys, Key};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub const PITCH_LIMIT: f32 = 89.0;

const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// First-person camera driven by mouse-look and held movement keys.
///
/// Angles are stored in degrees. `front`, `right` and `up` are recomputed
/// every time yaw or pitch changes, so they are never stale.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sensitivity: f32,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    pub uniform: CameraUniform,
}

impl Camera for FlyCamera {
    fn build_view_projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 1.0, 3.0), -90.0, 0.0)
    }
}

impl FlyCamera {
    /// Creates a camera at `position` looking along yaw/pitch (degrees).
    ///
    /// The constructor does not clamp pitch, so a camera can be set up looking
    /// straight down. Mouse-look clamps to ±89°.
    pub fn new(position: Vector3<f32>, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch,
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            speed: 5.0,
            sensitivity: 0.1,
            front: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::unit_x(),
            up: WORLD_UP,
            uniform: CameraUniform::default(),
        };
        camera.update_vectors();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        Matrix4::look_at_rh(eye, eye + self.front, self.up)
    }

    /// OpenGL-convention perspective projection; the caller owns the aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        perspective(Deg(self.fov), aspect, self.near, self.far)
    }

    /// Mouse-look. Moving the mouse up looks up.
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Moves along front/right/world-up for each held key.
    ///
    /// Keys compose additively, so diagonal movement is faster than movement
    /// along a single axis.
    pub fn process_keyboard(&mut self, dt: f32, held: &HeldKeys) {
        let velocity = self.speed * dt;
        if held.contains(Key::W) {
            self.position += self.front * velocity;
        }
        if held.contains(Key::S) {
            self.position -= self.front * velocity;
        }
        if held.contains(Key::A) {
            self.position -= self.right * velocity;
        }
        if held.contains(Key::D) {
            self.position += self.right * velocity;
        }
        if held.contains(Key::Space) {
            self.position += WORLD_UP * velocity;
        }
        if held.contains(Key::ShiftLeft) {
            self.position -= WORLD_UP * velocity;
        }
    }

    pub fn update_view_proj(&mut self, aspect: f32) {
        self.uniform.view_position = [self.position.x, self.position.y, self.position.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix(aspect));
    }

    fn update_vectors(&mut self) {
        let yaw = Rad::from(Deg(self.yaw)).0;
        let pitch = Rad::from(Deg(self.pitch)).0;
        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
