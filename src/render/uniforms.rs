//! Shader interface names.
//!
//! Shared between the renderer and the shader sources so a rename cannot
//! silently desynchronize the two sides. Shaders that omit a name simply
//! never receive that upload.

/// Uniform names.
pub mod uniform {
    /// Scene time in seconds, f32.
    pub const TIME: &str = "u_time";
    /// Viewport resolution in pixels, vec2.
    pub const SCREEN_RESOLUTION: &str = "u_screenResolution";

    /// Combined model-view-projection matrix, mat4.
    pub const MVP_MATRIX: &str = "u_mvpMatrix";
    /// Model matrix, mat4.
    pub const MODEL_MATRIX: &str = "u_modelMatrix";
    /// Inverse-transpose of the model matrix's upper 3x3, mat3.
    pub const NORMAL_MATRIX: &str = "u_normalMatrix";

    /// Material base color, vec4.
    pub const MAT_COLOR: &str = "u_matColor";
    /// UV tiling factor, vec2.
    pub const UV_SCALE: &str = "u_uvScale";
    /// UV offset, vec2.
    pub const UV_OFFSET: &str = "u_uvOffset";
    /// Base color sampler.
    pub const MAIN_TEX: &str = "u_mainTex";
    /// Normal map sampler.
    pub const NORMAL_TEX: &str = "u_normalTex";

    /// Ambient light color, vec4.
    pub const AMBIENT_COLOR: &str = "u_ambientColor";

    /// Number of active directional lights, int.
    pub const DIR_LIGHT_COUNT: &str = "u_dirLightCount";
    /// Directional light directions, vec3 array.
    pub const DIR_LIGHT_DIRECTIONS: &str = "u_dirLightDirections";
    /// Directional light colors, vec3 array.
    pub const DIR_LIGHT_COLORS: &str = "u_dirLightColors";

    /// Number of active point lights, int.
    pub const POINT_LIGHT_COUNT: &str = "u_pointLightCount";
    /// Point light world positions, vec3 array.
    pub const POINT_LIGHT_POSITIONS: &str = "u_pointLightPositions";
    /// Point light colors, vec3 array.
    pub const POINT_LIGHT_COLORS: &str = "u_pointLightColors";
    /// Point light (constant, linear, quadratic) triples, vec3 array.
    pub const POINT_LIGHT_ATTENUATIONS: &str = "u_pointLightAttenuations";

    /// Number of active spot lights, int.
    pub const SPOT_LIGHT_COUNT: &str = "u_spotLightCount";
    /// Spot light world positions, vec3 array.
    pub const SPOT_LIGHT_POSITIONS: &str = "u_spotLightPositions";
    /// Spot light directions, vec3 array.
    pub const SPOT_LIGHT_DIRECTIONS: &str = "u_spotLightDirections";
    /// Spot light colors, vec3 array.
    pub const SPOT_LIGHT_COLORS: &str = "u_spotLightColors";
    /// Spot light attenuation triples, vec3 array.
    pub const SPOT_LIGHT_ATTENUATIONS: &str = "u_spotLightAttenuations";
    /// Spot light (cos inner, cos outer) pairs, vec2 array.
    pub const SPOT_LIGHT_CONE_COSINES: &str = "u_spotLightConeCosines";
}

/// Vertex attribute names.
pub mod attribute {
    /// Object-space position, vec3.
    pub const POSITION: &str = "a_position";
    /// Object-space normal, vec3.
    pub const NORMAL: &str = "a_normal";
    /// Texture coordinate, vec2.
    pub const UV: &str = "a_uv";
    /// Object-space tangent, vec3.
    pub const TANGENT: &str = "a_tangent";
    /// Object-space bitangent, vec3.
    pub const BITANGENT: &str = "a_bitangent";
}

/// Maximum lights of each variant a shader is expected to declare.
pub const MAX_LIGHTS_PER_KIND: usize = 8;
