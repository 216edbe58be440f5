//! Scene entities.
//!
//! An entity is a named transform plus a list of behaviours. The data the
//! behaviours act on (`EntityState`) is split from the behaviour list itself
//! so a behaviour can mutate its entity's transform while the entity iterates
//! the list.

use crate::core::behaviour::{Behaviour, DrawContext, InitContext, UpdateContext};
use crate::core::light::Light;
use crate::core::transform::Transform;
use crate::render::device::RenderDevice;

/// What an entity represents in the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// A plain object; anything it draws comes from its behaviours.
    Object,
    /// A light source. The scene routes these to every mesh draw.
    Light(Light),
}

/// The data side of an entity, visible to its behaviours.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    /// Display name, also used for lookup.
    pub name: String,
    /// Free-form grouping tag.
    pub tag: String,
    /// Inactive entities are skipped by update and draw but still destroyed.
    pub active: bool,
    /// World transform.
    pub transform: Transform,
    /// Object or light payload.
    pub kind: EntityKind,
}

impl EntityState {
    /// Plain object state with default transform.
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: String::new(),
            active: true,
            transform: Transform::new(),
            kind: EntityKind::Object,
        }
    }

    /// Light state with default transform.
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self {
            name: name.into(),
            tag: String::new(),
            active: true,
            transform: Transform::new(),
            kind: EntityKind::Light(light),
        }
    }

    /// The light payload, if this entity is one.
    pub fn light_data(&self) -> Option<&Light> {
        match &self.kind {
            EntityKind::Light(light) => Some(light),
            EntityKind::Object => None,
        }
    }
}

/// A named scene object with pluggable behaviours.
pub struct Entity {
    /// Shared entity data.
    pub state: EntityState,
    behaviours: Vec<Box<dyn Behaviour>>,
    // Behaviours below this index have run their initialize pass.
    initialized_count: usize,
}

impl Entity {
    /// Create a plain object entity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: EntityState::object(name),
            behaviours: Vec::new(),
            initialized_count: 0,
        }
    }

    /// Create a light entity.
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self {
            state: EntityState::light(name, light),
            behaviours: Vec::new(),
            initialized_count: 0,
        }
    }

    /// Attach a behaviour. If the entity is already initialized the behaviour
    /// will be initialized on the next scene pass.
    pub fn add_behaviour(&mut self, behaviour: Box<dyn Behaviour>) {
        self.behaviours.push(behaviour);
    }

    /// Builder-style variant of [`add_behaviour`](Self::add_behaviour).
    pub fn with_behaviour(mut self, behaviour: Box<dyn Behaviour>) -> Self {
        self.add_behaviour(behaviour);
        self
    }

    /// Whether every attached behaviour has run its initialize pass.
    pub fn is_initialized(&self) -> bool {
        self.initialized_count == self.behaviours.len()
    }

    /// Run initialize on behaviours that have not had it yet. A behaviour is
    /// initialized exactly once, no matter how often this runs; behaviours
    /// attached after a pass are picked up by the next one. Device resources a
    /// behaviour created in a previous pass are therefore never re-created.
    pub fn initialize(&mut self, ctx: &InitContext<'_>) {
        for behaviour in &mut self.behaviours[self.initialized_count..] {
            behaviour.initialize(&mut self.state, ctx);
        }
        self.initialized_count = self.behaviours.len();
    }

    /// Run update on every behaviour. No-op while inactive.
    pub fn update(&mut self, ctx: &UpdateContext<'_>) {
        if !self.state.active {
            return;
        }
        for behaviour in &mut self.behaviours {
            behaviour.update(&mut self.state, ctx);
        }
    }

    /// Run draw on every behaviour. No-op while inactive.
    pub fn draw(&mut self, ctx: &DrawContext<'_>) {
        if !self.state.active {
            return;
        }
        for behaviour in &mut self.behaviours {
            behaviour.draw(&self.state, ctx);
        }
    }

    /// Tear down every behaviour, active or not, and clear the list.
    pub fn destroy(&mut self, device: &dyn RenderDevice) {
        for behaviour in &mut self.behaviours {
            behaviour.destroy(device);
        }
        self.behaviours.clear();
        self.initialized_count = 0;
    }
}
