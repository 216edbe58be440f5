//! Scene orchestration.
//!
//! The scene owns the camera, the light and object collections, and the
//! frame lifecycle: initialize once a device is bound, update in a fixed
//! order (camera, then objects, then lights), draw objects against the full
//! light list, and tear everything down exactly once.

use std::rc::Rc;

use log::{debug, warn};

use crate::config::EngineConfig;
use crate::core::behaviour::{CameraFlyBehaviour, DrawContext, InitContext, UpdateContext};
use crate::core::camera::Camera;
use crate::core::entity::{Entity, EntityKind};
use crate::foundation::math::utils;
use crate::input::Input;
use crate::render::device::{ClearFlags, RenderDevice};

/// A renderable world: camera, lights, objects.
pub struct Scene {
    camera: Camera,
    lights: Vec<Entity>,
    objects: Vec<Entity>,
    device: Option<Rc<dyn RenderDevice>>,
    initialized: bool,
    clear_color: [f32; 4],
    time: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Scene with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Scene configured from engine settings. The camera gets the standard
    /// fly behaviour, as interactive hosts expect to steer it.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut camera = Camera::new();
        camera.fov_y = utils::deg_to_rad(config.camera.fov_degrees);
        camera.near = config.camera.near;
        camera.far = config.camera.far;
        camera
            .entity
            .state
            .transform
            .set_position(0.0, 0.0, config.camera.z_offset);
        camera
            .entity
            .add_behaviour(Box::new(CameraFlyBehaviour::default()));
        camera.update_projection_matrix();

        Self {
            camera,
            lights: Vec::new(),
            objects: Vec::new(),
            device: None,
            initialized: false,
            clear_color: config.clear_color,
            time: 0.0,
        }
    }

    /// Bind the graphics device. Must happen before `initialize`.
    pub fn bind_device(&mut self, device: Rc<dyn RenderDevice>) {
        self.device = Some(device);
    }

    /// Add an entity, routed to the light or object collection by its kind.
    ///
    /// Once the scene is running, late additions are initialized on the spot
    /// so they never miss a frame's draw pass.
    pub fn add_entity(&mut self, mut entity: Entity) {
        if self.initialized {
            if let Some(device) = &self.device {
                entity.initialize(&InitContext { device: &**device });
            }
        }
        match entity.state.kind {
            EntityKind::Light(_) => self.lights.push(entity),
            EntityKind::Object => self.objects.push(entity),
        }
    }

    /// Initialize the camera and every entity. Idempotent; a scene with no
    /// bound device stays uninitialized and warns.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        let Some(device) = &self.device else {
            warn!("scene initialize skipped: no device bound");
            return;
        };
        let ctx = InitContext { device: &**device };
        self.camera.entity.initialize(&ctx);
        for entity in self.objects.iter_mut().chain(self.lights.iter_mut()) {
            entity.initialize(&ctx);
        }
        self.initialized = true;
        debug!(
            "scene initialized: {} objects, {} lights",
            self.objects.len(),
            self.lights.len()
        );
    }

    /// Advance the scene by `delta` seconds. Camera first so object
    /// behaviours observe this frame's camera state, then objects, then
    /// lights (animated lights update like any other entity).
    pub fn update(&mut self, input: &Input, delta: f32) {
        self.initialize();
        // Behaviours attached to live entities are initialized here, before
        // their first update; entities skip behaviours that already ran.
        if self.initialized {
            if let Some(device) = &self.device {
                let ctx = InitContext { device: &**device };
                self.camera.entity.initialize(&ctx);
                for entity in self.objects.iter_mut().chain(self.lights.iter_mut()) {
                    entity.initialize(&ctx);
                }
            }
        }
        self.time += delta;

        let ctx = UpdateContext { input, delta };
        self.camera.entity.update(&ctx);
        for entity in &mut self.objects {
            entity.update(&ctx);
        }
        for entity in &mut self.lights {
            entity.update(&ctx);
        }
    }

    /// Draw all active objects. A scene without a device draws nothing.
    pub fn draw(&mut self) {
        let Some(device) = &self.device else {
            return;
        };
        if !self.initialized {
            return;
        }
        let device: &dyn RenderDevice = &**device;
        device.clear(ClearFlags::COLOR | ClearFlags::DEPTH, self.clear_color);

        let resolution = device.viewport_size();
        let aspect = resolution.0.max(1) as f32 / resolution.1.max(1) as f32;
        self.camera.set_aspect(aspect);
        let ctx = DrawContext {
            device,
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            lights: &self.lights,
            time: self.time,
            resolution,
        };
        for entity in &mut self.objects {
            entity.draw(&ctx);
        }
    }

    /// Tear down objects, lights, and the camera. Safe to call repeatedly;
    /// entity teardown empties the behaviour lists, so repeats are no-ops.
    pub fn destroy(&mut self) {
        let Some(device) = &self.device else {
            return;
        };
        let device: &dyn RenderDevice = &**device;
        for entity in self.objects.iter_mut().chain(self.lights.iter_mut()) {
            entity.destroy(device);
        }
        self.camera.entity.destroy(device);
        self.objects.clear();
        self.lights.clear();
        self.initialized = false;
        debug!("scene destroyed");
    }

    /// Find an object entity by name.
    pub fn find_object(&self, name: &str) -> Option<&Entity> {
        self.objects.iter().find(|e| e.state.name == name)
    }

    /// Find an object entity by name, mutably.
    pub fn find_object_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.objects.iter_mut().find(|e| e.state.name == name)
    }

    /// The scene camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The scene camera, mutably.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Accumulated scene time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Change the clear color.
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }
}
