//! # Object Transform
//!
//! Position, rotation and scale of a single mesh. The model matrix is
//! composed as `T * R * S`, so scale is applied in the mesh's local frame.

use cgmath::{Deg, Matrix4, One, Quaternion, Rotation3, Vector3};

/// Translation, rotation and (possibly non-uniform) scale of one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(position: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Returns `T(position) * R(rotation) * S(scale)`.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Composes an incremental rotation onto the current one.
    ///
    /// The new rotation is left-multiplied, so repeated calls accumulate and
    /// the order of calls matters. Angles are in degrees.
    pub fn rotate_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.rotation = euler_quaternion(pitch, yaw, roll) * self.rotation;
    }

    /// Replaces the rotation with one built from Euler angles in degrees.
    pub fn set_rotation_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.rotation = euler_quaternion(pitch, yaw, roll);
    }
}

/// Quaternion for pitch (X), yaw (Y) and roll (Z), applied X first then Y then Z.
pub fn euler_quaternion(pitch: f32, yaw: f32, roll: f32) -> Quaternion<f32> {
    Quaternion::from_angle_z(Deg(roll))
        * Quaternion::from_angle_y(Deg(yaw))
        * Quaternion::from_angle_x(Deg(pitch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Rotation, SquareMatrix, Vector4};

    #[test]
    fn test_default_model_matrix_is_identity() {
        let transform = Transform::default();
        assert_eq!(transform.model_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_scale_is_applied_before_translation() {
        let transform = Transform::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 1.0, 4.0));
        let corner = transform.model_matrix() * Vector4::new(1.0, 1.0, 1.0, 1.0);

        assert_relative_eq!(corner.x, 3.0);
        assert_relative_eq!(corner.y, 3.0);
        assert_relative_eq!(corner.z, 7.0);
    }

    #[test]
    fn test_rotate_euler_accumulates() {
        let mut transform = Transform::default();
        transform.rotate_euler(0.0, 45.0, 0.0);
        transform.rotate_euler(0.0, 45.0, 0.0);

        let forward = transform.rotation.rotate_vector(Vector3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(forward.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_euler_is_order_dependent() {
        let mut a = Transform::default();
        a.rotate_euler(90.0, 0.0, 0.0);
        a.rotate_euler(0.0, 90.0, 0.0);

        let mut b = Transform::default();
        b.rotate_euler(0.0, 90.0, 0.0);
        b.rotate_euler(90.0, 0.0, 0.0);

        let probe = Vector3::new(0.0, 0.0, 1.0);
        let ra = a.rotation.rotate_vector(probe);
        let rb = b.rotation.rotate_vector(probe);
        assert!((ra.x - rb.x).abs() > 0.5 || (ra.y - rb.y).abs() > 0.5);
    }

    #[test]
    fn test_set_rotation_euler_replaces() {
        let mut transform = Transform::default();
        transform.rotate_euler(30.0, 10.0, 5.0);
        transform.set_rotation_euler(0.0, 0.0, 0.0);
        assert_relative_eq!(transform.rotation.s, 1.0, epsilon = 1e-6);
    }
}
