//! # Lumen Engine
//!
//! A small real-time 3D engine built around a scene of entities with
//! pluggable behaviours.
//!
//! ## Features
//!
//! - **Scene Graph**: Named entities carrying transforms and behaviours
//! - **Lit Mesh Pipeline**: Directional, point, spot, and ambient lights
//!   flattened into shader uniform arrays per draw
//! - **Asset Loading**: Wavefront OBJ/MTL parsing with vertex deduplication
//!   and tangent generation, behind a shared resource cache
//! - **Backend-Agnostic**: All drawing goes through the [`RenderDevice`]
//!   trait; a recording headless backend ships for tests and CI
//!
//! ## Quick Start
//!
//! ```rust
//! use lumen_engine::prelude::*;
//! use std::rc::Rc;
//!
//! let device = Rc::new(HeadlessDevice::new(640, 480));
//! let mut scene = Scene::from_config(&EngineConfig::default());
//! scene.bind_device(device);
//!
//! let mesh = Rc::new(primitives::cube(1.0));
//! let mut crate_entity = Entity::new("crate");
//! crate_entity.add_behaviour(Box::new(MeshRenderBehaviour::new(
//!     mesh,
//!     Material::default(),
//! )));
//! scene.add_entity(crate_entity);
//! scene.add_entity(Entity::light(
//!     "sun",
//!     Light::directional(Vec4::new(1.0, 1.0, 0.9, 1.0), Vec3::new(0.0, -1.0, 0.0)),
//! ));
//!
//! let input = Input::new();
//! scene.update(&input, 1.0 / 60.0);
//! scene.draw();
//! scene.destroy();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod assets;
pub mod config;
pub mod core;
pub mod foundation;
pub mod input;
pub mod render;

pub use render::device::RenderDevice;

/// Common imports for engine users.
pub mod prelude {
    pub use crate::{
        assets::{cache::ResourceCache, mesh_from_obj, AssetError},
        config::{ConfigError, EngineConfig},
        core::{
            behaviour::{Behaviour, DrawContext, InitContext, UpdateContext},
            camera::Camera,
            entity::{Entity, EntityKind, EntityState},
            light::{Attenuation, ConeAngles, Light, LightKind},
            scene::Scene,
            transform::Transform,
        },
        foundation::{
            math::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4},
            time::FrameClock,
        },
        input::Input,
        render::{
            device::{DeviceError, RenderDevice, UniformValue},
            headless::HeadlessDevice,
            material::Material,
            mesh::{Mesh, MeshData},
            mesh_renderer::MeshRenderBehaviour,
            primitives,
            shader::ShaderProgram,
            texture::Texture,
        },
    };
}
