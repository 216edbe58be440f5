//! Material parameters for the mesh pipeline.

use std::rc::Rc;

use crate::assets::mtl::MtlMaterial;
use crate::foundation::math::{Vec2, Vec4};
use crate::render::texture::Texture;

/// Surface parameters consumed by the mesh renderer.
///
/// Textures are shared (`Rc`) because the resource cache hands the same
/// decoded texture to every material that references it; the cache, not the
/// material, owns destruction. The `*_texture_uri` fields carry the asset
/// path a texture should be resolved from; the host loads it through the
/// cache and fills in the matching handle.
#[derive(Clone)]
pub struct Material {
    /// Base color, multiplied with the main texture sample.
    pub color: Vec4,
    /// UV tiling factor.
    pub uv_scale: Vec2,
    /// UV offset.
    pub uv_offset: Vec2,
    /// Asset path of the base color map, if the material references one.
    pub main_texture_uri: Option<String>,
    /// Asset path of the normal map, if the material references one.
    pub normal_texture_uri: Option<String>,
    /// Base color map. `None` binds the 1x1 white fallback.
    pub main_texture: Option<Rc<Texture>>,
    /// Tangent-space normal map. `None` binds the flat-normal fallback.
    pub normal_texture: Option<Rc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            uv_scale: Vec2::new(1.0, 1.0),
            uv_offset: Vec2::new(0.0, 0.0),
            main_texture_uri: None,
            normal_texture_uri: None,
            main_texture: None,
            normal_texture: None,
        }
    }
}

impl Material {
    /// Untextured material with the given base color.
    pub fn colored(color: Vec4) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Material showing a texture unmodulated.
    pub fn textured(texture: Rc<Texture>) -> Self {
        Self {
            main_texture: Some(texture),
            ..Self::default()
        }
    }

    /// Material from a parsed MTL definition: diffuse color and opacity
    /// become the base color, `map_Kd` becomes the main texture URI. The
    /// texture itself is loaded by the host and assigned afterwards.
    pub fn from_mtl(mtl: &MtlMaterial) -> Self {
        Self {
            color: mtl.base_color(),
            main_texture_uri: mtl.diffuse_map.clone(),
            ..Self::default()
        }
    }
}
