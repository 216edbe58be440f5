//! Rendering: device abstraction, shaders, meshes, materials, and the mesh
//! render behaviour.

pub mod device;
pub mod headless;
pub mod material;
pub mod mesh;
pub mod mesh_renderer;
pub mod primitives;
pub mod shader;
pub mod texture;
pub mod uniforms;
