//! Mesh rendering behaviour.
//!
//! Attach a `MeshRenderBehaviour` to an entity and the scene's draw pass will
//! render its mesh with the built-in lit shader. All scene lights are
//! flattened into per-variant uniform arrays here, once per draw; shaders
//! that do not declare some of those uniforms simply never receive them.

use std::rc::Rc;

use log::error;

use crate::core::behaviour::{Behaviour, DrawContext, InitContext};
use crate::core::entity::EntityState;
use crate::core::light::LightKind;
use crate::foundation::math::{Mat3, Mat4, Vec3};
use crate::render::device::{RenderDevice, RenderStateFlags, UniformValue};
use crate::render::material::Material;
use crate::render::mesh::{Mesh, MeshData};
use crate::render::shader::ShaderProgram;
use crate::render::texture::Texture;
use crate::render::uniforms::{uniform, MAX_LIGHTS_PER_KIND};

/// Ambient color used when the scene has no active ambient light.
pub const DEFAULT_AMBIENT: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

/// Flattened per-variant light data, ready for upload.
#[derive(Debug, Clone, PartialEq)]
struct LightArrays {
    ambient: [f32; 4],
    dir_directions: Vec<[f32; 3]>,
    dir_colors: Vec<[f32; 3]>,
    point_positions: Vec<[f32; 3]>,
    point_colors: Vec<[f32; 3]>,
    point_attenuations: Vec<[f32; 3]>,
    spot_positions: Vec<[f32; 3]>,
    spot_directions: Vec<[f32; 3]>,
    spot_colors: Vec<[f32; 3]>,
    spot_attenuations: Vec<[f32; 3]>,
    spot_cone_cosines: Vec<[f32; 2]>,
}

impl LightArrays {
    /// Walk the scene's light entities and bucket them by variant.
    ///
    /// Inactive lights are skipped. The first active ambient wins; with none,
    /// [`DEFAULT_AMBIENT`] applies. Each variant is capped at
    /// [`MAX_LIGHTS_PER_KIND`], matching the shader's array capacity.
    fn gather(lights: &[crate::core::entity::Entity]) -> Self {
        let mut arrays = LightArrays {
            ambient: DEFAULT_AMBIENT,
            dir_directions: Vec::new(),
            dir_colors: Vec::new(),
            point_positions: Vec::new(),
            point_colors: Vec::new(),
            point_attenuations: Vec::new(),
            spot_positions: Vec::new(),
            spot_directions: Vec::new(),
            spot_colors: Vec::new(),
            spot_attenuations: Vec::new(),
            spot_cone_cosines: Vec::new(),
        };
        let mut ambient_found = false;

        for entity in lights {
            if !entity.state.active {
                continue;
            }
            let Some(light) = entity.state.light_data() else {
                continue;
            };
            let color: [f32; 3] = light.color.xyz().into();

            match &light.kind {
                LightKind::Ambient => {
                    if !ambient_found {
                        arrays.ambient = light.color.into();
                        ambient_found = true;
                    }
                }
                LightKind::Directional { direction } => {
                    if arrays.dir_directions.len() >= MAX_LIGHTS_PER_KIND {
                        continue;
                    }
                    arrays.dir_directions.push(normalized(*direction));
                    arrays.dir_colors.push(color);
                }
                LightKind::Point { attenuation } => {
                    if arrays.point_positions.len() >= MAX_LIGHTS_PER_KIND {
                        continue;
                    }
                    arrays
                        .point_positions
                        .push(entity.state.transform.position().into());
                    arrays.point_colors.push(color);
                    arrays.point_attenuations.push([
                        attenuation.constant,
                        attenuation.linear,
                        attenuation.quadratic,
                    ]);
                }
                LightKind::Spot {
                    direction,
                    attenuation,
                    cone,
                } => {
                    if arrays.spot_positions.len() >= MAX_LIGHTS_PER_KIND {
                        continue;
                    }
                    arrays
                        .spot_positions
                        .push(entity.state.transform.position().into());
                    arrays.spot_directions.push(normalized(*direction));
                    arrays.spot_colors.push(color);
                    arrays.spot_attenuations.push([
                        attenuation.constant,
                        attenuation.linear,
                        attenuation.quadratic,
                    ]);
                    arrays
                        .spot_cone_cosines
                        .push([cone.inner.cos(), cone.outer.cos()]);
                }
            }
        }
        arrays
    }

    /// Upload everything. Count uniforms are always written, even at zero, so
    /// a shader never reads stale array lengths from a previous frame; the
    /// arrays themselves are only uploaded when non-empty.
    fn upload(&self, device: &dyn RenderDevice, shader: &ShaderProgram) {
        shader.set_uniform(
            device,
            uniform::AMBIENT_COLOR,
            UniformValue::Vec4(self.ambient),
        );

        shader.set_uniform(
            device,
            uniform::DIR_LIGHT_COUNT,
            UniformValue::Int(self.dir_directions.len() as i32),
        );
        if !self.dir_directions.is_empty() {
            shader.set_uniform(
                device,
                uniform::DIR_LIGHT_DIRECTIONS,
                UniformValue::Vec3Array(self.dir_directions.clone()),
            );
            shader.set_uniform(
                device,
                uniform::DIR_LIGHT_COLORS,
                UniformValue::Vec3Array(self.dir_colors.clone()),
            );
        }

        shader.set_uniform(
            device,
            uniform::POINT_LIGHT_COUNT,
            UniformValue::Int(self.point_positions.len() as i32),
        );
        if !self.point_positions.is_empty() {
            shader.set_uniform(
                device,
                uniform::POINT_LIGHT_POSITIONS,
                UniformValue::Vec3Array(self.point_positions.clone()),
            );
            shader.set_uniform(
                device,
                uniform::POINT_LIGHT_COLORS,
                UniformValue::Vec3Array(self.point_colors.clone()),
            );
            shader.set_uniform(
                device,
                uniform::POINT_LIGHT_ATTENUATIONS,
                UniformValue::Vec3Array(self.point_attenuations.clone()),
            );
        }

        shader.set_uniform(
            device,
            uniform::SPOT_LIGHT_COUNT,
            UniformValue::Int(self.spot_positions.len() as i32),
        );
        if !self.spot_positions.is_empty() {
            shader.set_uniform(
                device,
                uniform::SPOT_LIGHT_POSITIONS,
                UniformValue::Vec3Array(self.spot_positions.clone()),
            );
            shader.set_uniform(
                device,
                uniform::SPOT_LIGHT_DIRECTIONS,
                UniformValue::Vec3Array(self.spot_directions.clone()),
            );
            shader.set_uniform(
                device,
                uniform::SPOT_LIGHT_COLORS,
                UniformValue::Vec3Array(self.spot_colors.clone()),
            );
            shader.set_uniform(
                device,
                uniform::SPOT_LIGHT_ATTENUATIONS,
                UniformValue::Vec3Array(self.spot_attenuations.clone()),
            );
            shader.set_uniform(
                device,
                uniform::SPOT_LIGHT_CONE_COSINES,
                UniformValue::Vec2Array(self.spot_cone_cosines.clone()),
            );
        }
    }
}

fn normalized(v: Vec3) -> [f32; 3] {
    v.try_normalize(1.0e-12).unwrap_or(v).into()
}

fn mat4_array(m: &Mat4) -> [f32; 16] {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

fn mat3_array(m: &Mat3) -> [f32; 9] {
    let mut out = [0.0; 9];
    out.copy_from_slice(m.as_slice());
    out
}

/// Draws the entity's mesh with the lit pipeline.
pub struct MeshRenderBehaviour {
    data: Rc<MeshData>,
    material: Material,
    custom_shader: Option<(String, String)>,
    mesh: Option<Mesh>,
    shader: Option<ShaderProgram>,
    fallback_white: Option<Texture>,
    fallback_normal: Option<Texture>,
}

impl MeshRenderBehaviour {
    /// Render `data` with `material` using the built-in mesh shader.
    pub fn new(data: Rc<MeshData>, material: Material) -> Self {
        Self {
            data,
            material,
            custom_shader: None,
            mesh: None,
            shader: None,
            fallback_white: None,
            fallback_normal: None,
        }
    }

    /// Replace the built-in shader sources.
    pub fn with_shader(mut self, vertex_src: String, fragment_src: String) -> Self {
        self.custom_shader = Some((vertex_src, fragment_src));
        self
    }

    /// The material, mutable so hosts can animate it.
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    fn try_initialize(&mut self, device: &dyn RenderDevice) -> Result<(), String> {
        // Repeated initialize must not re-upload; the first set of device
        // resources would leak.
        if self.mesh.is_some() {
            return Ok(());
        }
        device.set_render_state(RenderStateFlags::default());
        let mesh = Mesh::upload(device, &self.data).map_err(|e| e.to_string())?;
        let shader = match &self.custom_shader {
            Some((vs, fs)) => ShaderProgram::compile(device, vs, fs),
            None => ShaderProgram::mesh_default(device),
        };
        let shader = match shader {
            Ok(shader) => shader,
            Err(e) => {
                // Release the uploaded buffers before reporting the failure.
                mesh.destroy(device);
                return Err(e.to_string());
            }
        };

        if self.material.main_texture.is_none() {
            self.fallback_white = Some(Texture::white(device).map_err(|e| e.to_string())?);
        }
        if self.material.normal_texture.is_none() {
            self.fallback_normal = Some(Texture::flat_normal(device).map_err(|e| e.to_string())?);
        }

        self.mesh = Some(mesh);
        self.shader = Some(shader);
        Ok(())
    }
}

impl Behaviour for MeshRenderBehaviour {
    fn initialize(&mut self, state: &mut EntityState, ctx: &InitContext<'_>) {
        if let Err(message) = self.try_initialize(ctx.device) {
            // A failed upload leaves the behaviour inert; draw checks for the
            // missing resources and skips.
            error!("mesh renderer init failed for '{}': {message}", state.name);
        }
    }

    fn draw(&mut self, state: &EntityState, ctx: &DrawContext<'_>) {
        let (Some(mesh), Some(shader)) = (&self.mesh, &self.shader) else {
            return;
        };
        let device = ctx.device;

        let model = *state.transform.model_matrix();
        let mvp = ctx.projection * ctx.view * model;
        let normal_matrix = model
            .try_inverse()
            .map(|inv| inv.transpose().fixed_view::<3, 3>(0, 0).into_owned())
            .unwrap_or_else(Mat3::identity);

        shader.set_uniform(device, uniform::TIME, UniformValue::Float(ctx.time));
        shader.set_uniform(
            device,
            uniform::SCREEN_RESOLUTION,
            UniformValue::Vec2([ctx.resolution.0 as f32, ctx.resolution.1 as f32]),
        );
        shader.set_uniform(device, uniform::MVP_MATRIX, UniformValue::Mat4(mat4_array(&mvp)));
        shader.set_uniform(
            device,
            uniform::MODEL_MATRIX,
            UniformValue::Mat4(mat4_array(&model)),
        );
        shader.set_uniform(
            device,
            uniform::NORMAL_MATRIX,
            UniformValue::Mat3(mat3_array(&normal_matrix)),
        );
        shader.set_uniform(
            device,
            uniform::MAT_COLOR,
            UniformValue::Vec4(self.material.color.into()),
        );
        shader.set_uniform(
            device,
            uniform::UV_SCALE,
            UniformValue::Vec2(self.material.uv_scale.into()),
        );
        shader.set_uniform(
            device,
            uniform::UV_OFFSET,
            UniformValue::Vec2(self.material.uv_offset.into()),
        );

        let main_handle = self
            .material
            .main_texture
            .as_ref()
            .map(|t| t.handle())
            .or_else(|| self.fallback_white.as_ref().map(|t| t.handle()));
        if let Some(handle) = main_handle {
            device.bind_texture(0, handle);
            shader.set_uniform(device, uniform::MAIN_TEX, UniformValue::Int(0));
        }
        let normal_handle = self
            .material
            .normal_texture
            .as_ref()
            .map(|t| t.handle())
            .or_else(|| self.fallback_normal.as_ref().map(|t| t.handle()));
        if let Some(handle) = normal_handle {
            device.bind_texture(1, handle);
            shader.set_uniform(device, uniform::NORMAL_TEX, UniformValue::Int(1));
        }

        LightArrays::gather(ctx.lights).upload(device, shader);

        if let Err(e) = device.draw_indexed(
            shader.handle(),
            mesh.vertex_buffer(),
            mesh.index_buffer(),
            mesh.index_count(),
            mesh.layout(),
        ) {
            error!("draw failed for '{}': {e}", state.name);
        }
    }

    fn destroy(&mut self, device: &dyn RenderDevice) {
        if let Some(mesh) = self.mesh.take() {
            mesh.destroy(device);
        }
        if let Some(shader) = self.shader.take() {
            shader.destroy(device);
        }
        if let Some(texture) = self.fallback_white.take() {
            texture.destroy(device);
        }
        if let Some(texture) = self.fallback_normal.take() {
            texture.destroy(device);
        }
    }
}
