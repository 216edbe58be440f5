//! Shader program wrapper and the built-in mesh shader.
//!
//! `ShaderProgram` owns a compiled device program and memoizes uniform
//! lookups, since name-based lookup is the slow path on every backend.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::render::device::{
    DeviceError, ProgramHandle, RenderDevice, UniformLocation, UniformValue,
};

/// Built-in vertex shader for the lit mesh pipeline.
pub const MESH_VERTEX_SHADER: &str = r#"
attribute vec3 a_position;
attribute vec2 a_uv;
attribute vec3 a_normal;
attribute vec3 a_tangent;
attribute vec3 a_bitangent;

uniform mat4 u_mvpMatrix;
uniform mat4 u_modelMatrix;
uniform mat3 u_normalMatrix;
uniform vec2 u_uvScale;
uniform vec2 u_uvOffset;

varying vec2 v_uv;
varying vec3 v_worldPos;
varying vec3 v_normal;
varying vec3 v_tangent;
varying vec3 v_bitangent;

void main() {
    v_uv = a_uv * u_uvScale + u_uvOffset;
    v_worldPos = (u_modelMatrix * vec4(a_position, 1.0)).xyz;
    v_normal = u_normalMatrix * a_normal;
    v_tangent = u_normalMatrix * a_tangent;
    v_bitangent = u_normalMatrix * a_bitangent;
    gl_Position = u_mvpMatrix * vec4(a_position, 1.0);
}
"#;

/// Built-in fragment shader for the lit mesh pipeline.
///
/// Light arrays are fixed-capacity; the `u_*Count` uniforms gate how many
/// entries the loops read.
pub const MESH_FRAGMENT_SHADER: &str = r#"
precision mediump float;

uniform float u_time;
uniform vec2 u_screenResolution;
uniform vec4 u_matColor;
uniform sampler2D u_mainTex;
uniform sampler2D u_normalTex;

uniform vec4 u_ambientColor;
uniform int u_dirLightCount;
uniform vec3 u_dirLightDirections[8];
uniform vec3 u_dirLightColors[8];
uniform int u_pointLightCount;
uniform vec3 u_pointLightPositions[8];
uniform vec3 u_pointLightColors[8];
uniform vec3 u_pointLightAttenuations[8];
uniform int u_spotLightCount;
uniform vec3 u_spotLightPositions[8];
uniform vec3 u_spotLightDirections[8];
uniform vec3 u_spotLightColors[8];
uniform vec3 u_spotLightAttenuations[8];
uniform vec2 u_spotLightConeCosines[8];

varying vec2 v_uv;
varying vec3 v_worldPos;
varying vec3 v_normal;
varying vec3 v_tangent;
varying vec3 v_bitangent;

vec3 shadingNormal() {
    vec3 n = normalize(v_normal);
    vec3 t = v_tangent;
    if (dot(t, t) < 1.0e-6) {
        return n;
    }
    mat3 tbn = mat3(normalize(t), normalize(v_bitangent), n);
    vec3 sampled = texture2D(u_normalTex, v_uv).xyz * 2.0 - 1.0;
    return normalize(tbn * sampled);
}

float attenuate(vec3 coeffs, float distance) {
    return 1.0 / (coeffs.x + coeffs.y * distance + coeffs.z * distance * distance);
}

void main() {
    vec3 normal = shadingNormal();
    vec4 base = u_matColor * texture2D(u_mainTex, v_uv);
    vec3 lit = u_ambientColor.rgb;

    for (int i = 0; i < 8; i++) {
        if (i >= u_dirLightCount) { break; }
        float n_dot_l = max(dot(normal, -u_dirLightDirections[i]), 0.0);
        lit += u_dirLightColors[i] * n_dot_l;
    }

    for (int i = 0; i < 8; i++) {
        if (i >= u_pointLightCount) { break; }
        vec3 to_light = u_pointLightPositions[i] - v_worldPos;
        float distance = length(to_light);
        float n_dot_l = max(dot(normal, to_light / distance), 0.0);
        lit += u_pointLightColors[i] * n_dot_l
            * attenuate(u_pointLightAttenuations[i], distance);
    }

    for (int i = 0; i < 8; i++) {
        if (i >= u_spotLightCount) { break; }
        vec3 to_light = u_spotLightPositions[i] - v_worldPos;
        float distance = length(to_light);
        vec3 light_dir = to_light / distance;
        float cone = dot(-light_dir, normalize(u_spotLightDirections[i]));
        float falloff = smoothstep(
            u_spotLightConeCosines[i].y, u_spotLightConeCosines[i].x, cone);
        float n_dot_l = max(dot(normal, light_dir), 0.0);
        lit += u_spotLightColors[i] * n_dot_l * falloff
            * attenuate(u_spotLightAttenuations[i], distance);
    }

    gl_FragColor = vec4(base.rgb * lit, base.a);
}
"#;

/// A compiled program plus a uniform-location cache.
pub struct ShaderProgram {
    handle: ProgramHandle,
    locations: RefCell<HashMap<String, Option<UniformLocation>>>,
}

impl ShaderProgram {
    /// Compile a program from the given sources.
    pub fn compile(
        device: &dyn RenderDevice,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, DeviceError> {
        let handle = device.compile_program(vertex_src, fragment_src)?;
        Ok(Self {
            handle,
            locations: RefCell::new(HashMap::new()),
        })
    }

    /// Compile the built-in lit mesh shader.
    pub fn mesh_default(device: &dyn RenderDevice) -> Result<Self, DeviceError> {
        Self::compile(device, MESH_VERTEX_SHADER, MESH_FRAGMENT_SHADER)
    }

    /// The underlying device handle.
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Cached uniform lookup. A `None` result is cached too, so repeatedly
    /// missing uniforms stay cheap.
    pub fn uniform(&self, device: &dyn RenderDevice, name: &str) -> Option<UniformLocation> {
        if let Some(cached) = self.locations.borrow().get(name) {
            return *cached;
        }
        let location = device.uniform_location(self.handle, name);
        self.locations
            .borrow_mut()
            .insert(name.to_string(), location);
        location
    }

    /// Upload a uniform if the program declares it; silently skip otherwise.
    pub fn set_uniform(&self, device: &dyn RenderDevice, name: &str, value: UniformValue) {
        if let Some(location) = self.uniform(device, name) {
            device.set_uniform(location, value);
        }
    }

    /// Release the device program.
    pub fn destroy(&self, device: &dyn RenderDevice) {
        device.destroy_program(self.handle);
        self.locations.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::HeadlessDevice;
    use crate::render::uniforms::uniform;

    #[test]
    fn default_mesh_shader_declares_the_light_interface() {
        let device = HeadlessDevice::new(4, 4);
        let shader = ShaderProgram::mesh_default(&device).unwrap();

        for name in [
            uniform::MVP_MATRIX,
            uniform::MODEL_MATRIX,
            uniform::NORMAL_MATRIX,
            uniform::MAT_COLOR,
            uniform::AMBIENT_COLOR,
            uniform::DIR_LIGHT_COUNT,
            uniform::POINT_LIGHT_ATTENUATIONS,
            uniform::SPOT_LIGHT_CONE_COSINES,
        ] {
            assert!(shader.uniform(&device, name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn missing_uniforms_are_skipped_not_errors() {
        let device = HeadlessDevice::new(4, 4);
        let shader = ShaderProgram::compile(
            &device,
            "attribute vec3 a_position; void main() { gl_Position = vec4(a_position, 1.0); }",
            "void main() { gl_FragColor = vec4(1.0); }",
        )
        .unwrap();

        assert!(shader.uniform(&device, uniform::MAT_COLOR).is_none());
        // Setting a missing uniform is a no-op, looked up from cache the
        // second time around.
        shader.set_uniform(&device, uniform::MAT_COLOR, UniformValue::Float(1.0));
        shader.set_uniform(&device, uniform::MAT_COLOR, UniformValue::Float(1.0));
    }
}
