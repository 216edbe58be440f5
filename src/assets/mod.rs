//! Asset loading: OBJ/MTL parsing and the shared resource cache.
//!
//! Parsers recover from malformed lines instead of failing (a bad asset
//! renders partially); `AssetError` covers the failures that do abort a
//! load, like unreadable files and undecodable images.

pub mod cache;
pub mod mtl;
pub mod obj;

use std::path::Path;

use thiserror::Error;

use crate::render::mesh::MeshData;
use crate::render::texture::TextureError;

/// Any error raised while loading an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Texture decode or upload failed.
    #[error("texture: {0}")]
    Texture(#[from] TextureError),

    /// The asset bytes could not be read.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse OBJ text into render-ready mesh data, tangent frames included.
pub fn mesh_from_obj(source: &str) -> MeshData {
    let mut mesh = obj::parse(source).mesh;
    mesh.generate_tangents();
    mesh
}

/// Read and parse an OBJ file from disk.
pub fn mesh_from_obj_file(path: impl AsRef<Path>) -> Result<MeshData, AssetError> {
    let source = std::fs::read_to_string(path)?;
    Ok(mesh_from_obj(&source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_text_yields_tangent_frames() {
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";
        let mesh = mesh_from_obj(source);
        assert_eq!(mesh.tangents.len(), mesh.vertex_count());
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let result = mesh_from_obj_file("does/not/exist.obj");
        assert!(matches!(result, Err(AssetError::Io(_))));
    }
}
