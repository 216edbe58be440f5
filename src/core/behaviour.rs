//! Attachable entity logic.
//!
//! Behaviours are the unit of pluggable logic on an entity: the scene calls
//! `initialize` once, then `update` and `draw` every frame while the entity is
//! active, and `destroy` when the entity is torn down. Everything a behaviour
//! needs from the outside world (device, input, camera matrices, lights,
//! frame time) arrives through the context arguments instead of globals, so
//! hosts own and reset that state explicitly.

use crate::core::entity::{Entity, EntityState};
use crate::foundation::math::Mat4;
use crate::input::Input;
use crate::render::device::RenderDevice;

/// Context for one-time setup. Available once the scene's device is bound.
pub struct InitContext<'a> {
    /// Graphics device for resource creation.
    pub device: &'a dyn RenderDevice,
}

/// Context for per-frame simulation.
pub struct UpdateContext<'a> {
    /// Host-owned input state for this frame.
    pub input: &'a Input,
    /// Seconds since the last executed frame.
    pub delta: f32,
}

/// Context for per-frame drawing.
pub struct DrawContext<'a> {
    /// Graphics device to issue commands against.
    pub device: &'a dyn RenderDevice,
    /// Camera view matrix for this frame.
    pub view: Mat4,
    /// Camera projection matrix for this frame.
    pub projection: Mat4,
    /// Every light entity in the scene, in insertion order.
    pub lights: &'a [Entity],
    /// Seconds of scene time accumulated so far.
    pub time: f32,
    /// Viewport resolution in pixels.
    pub resolution: (u32, u32),
}

/// Polymorphic capability attached to an entity.
///
/// All methods default to no-ops so concrete behaviours implement only the
/// hooks they care about.
pub trait Behaviour {
    /// One-time setup; may create GPU resources through the context device.
    fn initialize(&mut self, state: &mut EntityState, ctx: &InitContext<'_>) {
        let _ = (state, ctx);
    }

    /// Per-frame simulation step.
    fn update(&mut self, state: &mut EntityState, ctx: &UpdateContext<'_>) {
        let _ = (state, ctx);
    }

    /// Per-frame draw step.
    fn draw(&mut self, state: &EntityState, ctx: &DrawContext<'_>) {
        let _ = (state, ctx);
    }

    /// Release any GPU resources this behaviour created. Must be safe to call
    /// more than once.
    fn destroy(&mut self, device: &dyn RenderDevice) {
        let _ = device;
    }
}

/// WASD fly movement for the entity it is attached to, usually the camera.
pub struct CameraFlyBehaviour {
    /// Movement speed in world units per second.
    pub move_speed: f32,
}

impl Default for CameraFlyBehaviour {
    fn default() -> Self {
        Self { move_speed: 10.0 }
    }
}

impl Behaviour for CameraFlyBehaviour {
    fn update(&mut self, state: &mut EntityState, ctx: &UpdateContext<'_>) {
        let mut forward = 0.0;
        let mut strafe = 0.0;

        if ctx.input.key_down("w") {
            forward = 1.0;
        } else if ctx.input.key_down("s") {
            forward = -1.0;
        }
        if ctx.input.key_down("a") {
            strafe = -1.0;
        } else if ctx.input.key_down("d") {
            strafe = 1.0;
        }

        if forward == 0.0 && strafe == 0.0 {
            return;
        }

        let step = (state.transform.forward() * forward + state.transform.right() * strafe)
            * self.move_speed
            * ctx.delta;
        state.transform.translate(step.x, step.y, step.z);
    }
}

/// Light animator: orbits its entity around the world Y axis.
pub struct LightOrbitBehaviour {
    /// Orbit radius in world units.
    pub radius: f32,
    /// Angular speed in radians per second.
    pub angular_speed: f32,
    angle: f32,
}

impl LightOrbitBehaviour {
    /// Create an orbit starting at angle zero.
    pub fn new(radius: f32, angular_speed: f32) -> Self {
        Self {
            radius,
            angular_speed,
            angle: 0.0,
        }
    }
}

impl Behaviour for LightOrbitBehaviour {
    fn update(&mut self, state: &mut EntityState, ctx: &UpdateContext<'_>) {
        self.angle += self.angular_speed * ctx.delta;
        let y = state.transform.position().y;
        state.transform.set_position(
            self.radius * self.angle.cos(),
            y,
            self.radius * self.angle.sin(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn fly_behaviour_moves_along_local_axes() {
        let mut state = EntityState::object("camera");
        let mut input = Input::new();
        input.press_key("W");

        let mut behaviour = CameraFlyBehaviour::default();
        let ctx = UpdateContext {
            input: &input,
            delta: 0.5,
        };
        behaviour.update(&mut state, &ctx);

        // Default forward is -Z, 10 units/s for half a second.
        assert_relative_eq!(
            state.transform.position(),
            Vec3::new(0.0, 0.0, -5.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn fly_behaviour_idles_without_input() {
        let mut state = EntityState::object("camera");
        let input = Input::new();
        let mut behaviour = CameraFlyBehaviour::default();
        behaviour.update(
            &mut state,
            &UpdateContext {
                input: &input,
                delta: 1.0,
            },
        );
        assert_eq!(state.transform.position(), Vec3::zeros());
    }

    #[test]
    fn orbit_behaviour_keeps_height_and_radius() {
        let mut state = EntityState::object("lamp");
        state.transform.set_position(0.0, 3.0, 0.0);

        let input = Input::new();
        let mut behaviour = LightOrbitBehaviour::new(2.0, 1.0);
        behaviour.update(
            &mut state,
            &UpdateContext {
                input: &input,
                delta: 0.25,
            },
        );

        let position = state.transform.position();
        assert_relative_eq!(position.y, 3.0, epsilon = 1e-6);
        let radius = (position.x * position.x + position.z * position.z).sqrt();
        assert_relative_eq!(radius, 2.0, epsilon = 1e-5);
    }
}
