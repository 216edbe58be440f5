//! Core scene model: transforms, entities, behaviours, lights, camera, scene.

pub mod behaviour;
pub mod camera;
pub mod entity;
pub mod light;
pub mod scene;
pub mod transform;
