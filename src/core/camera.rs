//! Scene camera.
//!
//! The camera is an entity like any other, so behaviours (fly controls,
//! rails, shake) move it through the same transform API. The view matrix is
//! derived on demand from the entity transform; the projection matrix is
//! cached and recomputed explicitly when a frustum field or the aspect
//! ratio changes.

use crate::core::entity::Entity;
use crate::foundation::math::{perspective, utils, Mat4};

/// Default vertical field of view, degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
/// Default near clip distance.
pub const DEFAULT_NEAR: f32 = 0.1;
/// Default far clip distance.
pub const DEFAULT_FAR: f32 = 100.0;

/// Perspective camera backed by an entity.
///
/// After writing to `fov_y`, `near`, or `far`, call
/// [`update_projection_matrix`](Self::update_projection_matrix); resizes go
/// through [`set_aspect`](Self::set_aspect), which recomputes on change.
pub struct Camera {
    /// Underlying entity; attach behaviours here to move the camera.
    pub entity: Entity,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    aspect: f32,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera at (0, 0, 10) looking down -Z with the default frustum.
    pub fn new() -> Self {
        let mut entity = Entity::new("camera");
        entity.state.transform.set_position(0.0, 0.0, 10.0);
        let mut camera = Self {
            entity,
            fov_y: utils::deg_to_rad(DEFAULT_FOV_DEGREES),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: 1.0,
            projection: Mat4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Viewport aspect ratio (width / height) the projection was built for.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Set the viewport aspect ratio, recomputing the projection on change.
    /// Non-positive values are clamped so the projection stays well-formed.
    pub fn set_aspect(&mut self, aspect: f32) {
        let aspect = aspect.max(f32::EPSILON);
        if (aspect - self.aspect).abs() > f32::EPSILON {
            self.aspect = aspect;
            self.update_projection_matrix();
        }
    }

    /// Rebuild the cached projection from the current frustum fields.
    pub fn update_projection_matrix(&mut self) {
        self.projection = perspective(self.fov_y, self.aspect, self.near, self.far);
    }

    /// View matrix: the inverse of the camera entity's model matrix.
    ///
    /// Falls back to identity if the model matrix is singular (zero scale on
    /// the camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        self.entity
            .state
            .transform
            .model_matrix()
            .try_inverse()
            .unwrap_or_else(Mat4::identity)
    }

    /// The cached projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}
