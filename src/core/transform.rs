//! Spatial transform with a cached model matrix.
//!
//! Rotation is a unit quaternion internally; callers supplying Euler radians
//! are converted once at the API boundary. Every mutator recomputes the model
//! matrix, so the matrix (and the axis getters that read it) are always in
//! step with the position/rotation/scale fields.

use crate::foundation::math::{Mat4, Quat, Vec3};

/// Position, rotation, and scale of an entity, plus the derived model matrix.
///
/// The model matrix composes translation, rotation, and scale (`T * R * S`),
/// which places the rotated local axes in columns 0..2. Local axis queries
/// read those columns directly rather than re-deriving them from the
/// quaternion, so they are only meaningful after `update_model_matrix` has
/// run. Every mutator guarantees that.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    model_matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Identity transform at the origin with unit scale.
    pub fn new() -> Self {
        let mut transform = Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            model_matrix: Mat4::identity(),
        };
        transform.update_model_matrix();
        transform
    }

    /// Current world-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current rotation quaternion.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Current scale factors.
    pub fn local_scale(&self) -> Vec3 {
        self.scale
    }

    /// The cached model matrix.
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    /// Set the absolute position.
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
        self.update_model_matrix();
    }

    /// Set the absolute rotation from Euler angles in radians (X, then Y,
    /// then Z).
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler_angles(x, y, z);
        self.update_model_matrix();
    }

    /// Set the absolute rotation from a quaternion.
    pub fn set_rotation_quat(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.update_model_matrix();
    }

    /// Set the absolute scale. A zero component degenerates the matrix but is
    /// not rejected.
    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Vec3::new(x, y, z);
        self.update_model_matrix();
    }

    /// Move by a delta in world space.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vec3::new(dx, dy, dz);
        self.update_model_matrix();
    }

    /// Rotate by incremental Euler angles in radians.
    ///
    /// The increment is converted to a quaternion and composed by
    /// multiplication; accumulating raw Euler angles instead would reintroduce
    /// gimbal error on combined-axis rotations.
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation = self.rotation * Quat::from_euler_angles(dx, dy, dz);
        self.update_model_matrix();
    }

    /// Multiply the scale componentwise.
    pub fn scale_by(&mut self, sx: f32, sy: f32, sz: f32) {
        self.scale.component_mul_assign(&Vec3::new(sx, sy, sz));
        self.update_model_matrix();
    }

    /// Recompute the model matrix from the current position, rotation, and
    /// scale. Called by every mutator; exposed for completeness.
    pub fn update_model_matrix(&mut self) {
        self.model_matrix = Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale);
    }

    /// Local +X axis.
    pub fn right(&self) -> Vec3 {
        self.axis(0)
    }

    /// Local -X axis.
    pub fn left(&self) -> Vec3 {
        -self.axis(0)
    }

    /// Local +Y axis.
    pub fn up(&self) -> Vec3 {
        self.axis(1)
    }

    /// Local -Y axis.
    pub fn down(&self) -> Vec3 {
        -self.axis(1)
    }

    /// Local forward axis (-Z, pointing away from the viewer).
    pub fn forward(&self) -> Vec3 {
        -self.axis(2)
    }

    /// Local backward axis (+Z).
    pub fn back(&self) -> Vec3 {
        self.axis(2)
    }

    fn axis(&self, column: usize) -> Vec3 {
        let v = Vec3::new(
            self.model_matrix[(0, column)],
            self.model_matrix[(1, column)],
            self.model_matrix[(2, column)],
        );
        v.try_normalize(1.0e-12).unwrap_or(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn matrix_from(position: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
        Mat4::new_translation(&position)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&scale)
    }

    #[test]
    fn new_transform_is_identity() {
        let transform = Transform::new();
        assert_relative_eq!(*transform.model_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn incremental_ops_match_direct_construction() {
        // Whatever sequence of relative ops runs, the matrix must equal the
        // one built directly from the final absolute state.
        let mut transform = Transform::new();
        transform.translate(1.0, 0.0, 0.0);
        transform.rotate(0.0, PI / 4.0, 0.0);
        transform.translate(0.0, 2.0, -1.0);
        transform.rotate(0.3, 0.0, 0.0);
        transform.scale_by(2.0, 2.0, 2.0);
        transform.scale_by(1.0, 0.5, 1.0);

        let expected = matrix_from(
            transform.position(),
            transform.rotation(),
            transform.local_scale(),
        );
        assert_relative_eq!(*transform.model_matrix(), expected, epsilon = EPSILON);
    }

    #[test]
    fn absolute_setters_override_incremental_state() {
        let mut transform = Transform::new();
        transform.translate(5.0, 5.0, 5.0);
        transform.set_position(1.0, 2.0, 3.0);
        assert_relative_eq!(transform.position(), Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);

        let expected = matrix_from(
            transform.position(),
            transform.rotation(),
            transform.local_scale(),
        );
        assert_relative_eq!(*transform.model_matrix(), expected, epsilon = EPSILON);
    }

    #[test]
    fn axes_are_orthonormal_for_any_rotation() {
        let rotations = [
            Quat::identity(),
            Quat::from_euler_angles(0.3, -1.2, 2.5),
            Quat::from_euler_angles(PI / 2.0, 0.0, 0.0),
            Quat::from_euler_angles(-0.7, 0.1, -3.0),
        ];
        for rotation in rotations {
            let mut transform = Transform::new();
            transform.set_rotation_quat(rotation);

            let (right, up, forward) = (transform.right(), transform.up(), transform.forward());
            assert_relative_eq!(right.norm(), 1.0, epsilon = EPSILON);
            assert_relative_eq!(up.norm(), 1.0, epsilon = EPSILON);
            assert_relative_eq!(forward.norm(), 1.0, epsilon = EPSILON);
            assert_relative_eq!(right.dot(&up), 0.0, epsilon = EPSILON);
            assert_relative_eq!(right.dot(&forward), 0.0, epsilon = EPSILON);
            assert_relative_eq!(up.dot(&forward), 0.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn forward_is_negative_z_column() {
        let transform = Transform::new();
        assert_relative_eq!(transform.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(transform.back(), Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(transform.left(), -transform.right(), epsilon = EPSILON);
        assert_relative_eq!(transform.down(), -transform.up(), epsilon = EPSILON);
    }

    #[test]
    fn yaw_rotates_forward_axis() {
        let mut transform = Transform::new();
        transform.rotate(0.0, PI / 2.0, 0.0);
        // Yawing 90 degrees turns -Z forward into -X.
        assert_relative_eq!(transform.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn rotation_composes_by_multiplication() {
        let mut incremental = Transform::new();
        incremental.rotate(0.0, PI / 2.0, 0.0);
        incremental.rotate(PI / 2.0, 0.0, 0.0);

        let expected = Quat::from_euler_angles(0.0, PI / 2.0, 0.0)
            * Quat::from_euler_angles(PI / 2.0, 0.0, 0.0);
        let dot = incremental
            .rotation()
            .coords
            .dot(&expected.coords)
            .abs();
        assert!(dot > 0.9999, "quaternion mismatch: |dot| = {dot}");
    }

    #[test]
    fn zero_scale_is_accepted() {
        let mut transform = Transform::new();
        transform.set_scale(0.0, 1.0, 1.0);
        assert_eq!(transform.model_matrix()[(0, 0)], 0.0);
    }
}
