//! Shared resource cache.
//!
//! Keyed by the caller's asset path (or any stable string), the cache hands
//! out `Rc` clones of decoded assets so the same mesh or texture is loaded
//! and uploaded once no matter how many entities reference it.
//!
//! The loader closure only runs on a miss, and its result is recorded only on
//! success: a failed load leaves no entry behind, so the next request retries
//! instead of serving a cached error forever.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace};

use crate::assets::AssetError;
use crate::render::mesh::MeshData;
use crate::render::texture::Texture;

/// Cache of decoded meshes and textures.
#[derive(Default)]
pub struct ResourceCache {
    meshes: HashMap<String, Rc<MeshData>>,
    textures: HashMap<String, Rc<Texture>>,
}

impl ResourceCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the mesh for `key`, running `load` only if it is not cached.
    pub fn mesh<F>(&mut self, key: &str, load: F) -> Result<Rc<MeshData>, AssetError>
    where
        F: FnOnce() -> Result<MeshData, AssetError>,
    {
        if let Some(mesh) = self.meshes.get(key) {
            trace!("mesh cache hit: {key}");
            return Ok(Rc::clone(mesh));
        }
        debug!("mesh cache miss: {key}");
        let mesh = Rc::new(load()?);
        self.meshes.insert(key.to_string(), Rc::clone(&mesh));
        Ok(mesh)
    }

    /// Get the texture for `key`, running `load` only if it is not cached.
    pub fn texture<F>(&mut self, key: &str, load: F) -> Result<Rc<Texture>, AssetError>
    where
        F: FnOnce() -> Result<Texture, AssetError>,
    {
        if let Some(texture) = self.textures.get(key) {
            trace!("texture cache hit: {key}");
            return Ok(Rc::clone(texture));
        }
        debug!("texture cache miss: {key}");
        let texture = Rc::new(load()?);
        self.textures.insert(key.to_string(), Rc::clone(&texture));
        Ok(texture)
    }

    /// Whether a mesh is cached under `key`.
    pub fn contains_mesh(&self, key: &str) -> bool {
        self.meshes.contains_key(key)
    }

    /// Whether a texture is cached under `key`.
    pub fn contains_texture(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    /// Number of cached entries of both kinds.
    pub fn len(&self) -> usize {
        self.meshes.len() + self.textures.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Outstanding `Rc`s keep their assets alive.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trivial_mesh() -> MeshData {
        use crate::foundation::math::{Vec2, Vec3};
        MeshData {
            positions: vec![Vec3::zeros(); 3],
            uvs: vec![Vec2::zeros(); 3],
            normals: vec![Vec3::zeros(); 3],
            tangents: vec![],
            bitangents: vec![],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn second_request_shares_the_first_load() {
        let mut cache = ResourceCache::new();
        let mut loads = 0;

        let first = cache
            .mesh("meshes/tri.obj", || {
                loads += 1;
                Ok(trivial_mesh())
            })
            .unwrap();
        let second = cache
            .mesh("meshes/tri.obj", || {
                loads += 1;
                Ok(trivial_mesh())
            })
            .unwrap();

        assert_eq!(loads, 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache = ResourceCache::new();

        let result = cache.mesh("meshes/broken.obj", || {
            Err(AssetError::from(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "fetch failed",
            )))
        });
        assert!(result.is_err());
        assert!(!cache.contains_mesh("meshes/broken.obj"));

        // The retry runs the loader again and caches its success.
        let mesh = cache.mesh("meshes/broken.obj", || Ok(trivial_mesh())).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert!(cache.contains_mesh("meshes/broken.obj"));
    }

    #[test]
    fn keys_are_namespaced_per_kind() {
        let mut cache = ResourceCache::new();
        cache.mesh("shared", || Ok(trivial_mesh())).unwrap();
        // A texture under the same key is a separate entry.
        assert!(!cache.contains_texture("shared"));
    }

    #[test]
    fn clear_keeps_outstanding_references_alive() {
        let mut cache = ResourceCache::new();
        let mesh = cache.mesh("m", || Ok(trivial_mesh())).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(mesh.vertex_count(), 3);
    }
}
