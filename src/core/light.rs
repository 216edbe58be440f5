//! Light descriptions.
//!
//! One `Light` record with a variant payload instead of a subclass tree; the
//! mesh renderer selects per-variant uniforms by matching on `LightKind` at
//! aggregation time.

use crate::foundation::math::{Vec3, Vec4};

/// Distance falloff coefficients for point and spot lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    /// Constant term.
    pub constant: f32,
    /// Linear term.
    pub linear: f32,
    /// Quadratic term.
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

/// Spot light cone, inner and outer half-angles in radians.
///
/// Angles stay in radians on the CPU side; they are converted to cosines
/// immediately before upload because the shader compares against `dot`
/// products, never against raw angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeAngles {
    /// Full-intensity half-angle.
    pub inner: f32,
    /// Cutoff half-angle.
    pub outer: f32,
}

/// Variant-specific light parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Uniform scene-wide illumination.
    Ambient,
    /// Parallel rays along a direction (sunlight).
    Directional {
        /// World-space direction the light travels in. Not required to be
        /// normalized; the renderer re-normalizes at upload.
        direction: Vec3,
    },
    /// Omnidirectional light at the entity's position.
    Point {
        /// Distance falloff.
        attenuation: Attenuation,
    },
    /// Cone of light at the entity's position.
    Spot {
        /// World-space direction the cone points in.
        direction: Vec3,
        /// Distance falloff.
        attenuation: Attenuation,
        /// Cone angles in radians.
        cone: ConeAngles,
    },
}

/// A light source attached to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// RGBA light color.
    pub color: Vec4,
    /// Variant payload.
    pub kind: LightKind,
}

impl Light {
    /// White ambient light.
    pub fn ambient(color: Vec4) -> Self {
        Self {
            color,
            kind: LightKind::Ambient,
        }
    }

    /// Directional light travelling along `direction`.
    pub fn directional(color: Vec4, direction: Vec3) -> Self {
        Self {
            color,
            kind: LightKind::Directional { direction },
        }
    }

    /// Point light with the given falloff.
    pub fn point(color: Vec4, attenuation: Attenuation) -> Self {
        Self {
            color,
            kind: LightKind::Point { attenuation },
        }
    }

    /// Spot light pointing along `direction` with the given cone.
    pub fn spot(color: Vec4, direction: Vec3, attenuation: Attenuation, cone: ConeAngles) -> Self {
        Self {
            color,
            kind: LightKind::Spot {
                direction,
                attenuation,
                cone,
            },
        }
    }
}
