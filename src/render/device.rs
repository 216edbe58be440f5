//! Graphics device abstraction.
//!
//! Everything above this trait is backend-agnostic: scenes and behaviours
//! talk to a `RenderDevice` and never see what sits behind it. Handles are
//! opaque slotmap keys, so a stale handle after `destroy_*` is detected
//! instead of aliasing a recycled resource.
//!
//! Methods take `&self`; backends keep their mutable state behind interior
//! mutability so draw code can hold the device alongside mutable scene
//! borrows.

use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Opaque handle to a device buffer.
    pub struct BufferHandle;
    /// Opaque handle to a compiled shader program.
    pub struct ProgramHandle;
    /// Opaque handle to a device texture.
    pub struct TextureHandle;
}

/// Location of a uniform within a specific program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    pub(crate) program: ProgramHandle,
    pub(crate) index: u32,
}

/// Typed uniform payloads.
///
/// Array variants carry however many elements the caller aggregated; the
/// backend uploads them to the array uniform starting at element zero.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat3([f32; 9]),
    Mat4([f32; 16]),
    Vec2Array(Vec<[f32; 2]>),
    Vec3Array(Vec<[f32; 3]>),
    Vec4Array(Vec<[f32; 4]>),
}

bitflags::bitflags! {
    /// Fixed-function state toggles applied before a draw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderStateFlags: u32 {
        /// Depth testing with less-or-equal compare.
        const DEPTH_TEST = 1 << 0;
        /// Back-face culling, counter-clockwise front faces.
        const CULL_FACE = 1 << 1;
        /// Standard alpha blending.
        const BLEND = 1 << 2;
    }
}

impl Default for RenderStateFlags {
    fn default() -> Self {
        Self::DEPTH_TEST | Self::CULL_FACE | Self::BLEND
    }
}

bitflags::bitflags! {
    /// Which framebuffer planes `clear` wipes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Color planes.
        const COLOR = 1 << 0;
        /// Depth plane.
        const DEPTH = 1 << 1;
    }
}

/// One vertex attribute within an interleaved layout.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    /// Attribute name as declared in the vertex shader.
    pub name: &'static str,
    /// Number of f32 components.
    pub components: u32,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

/// Interleaved vertex buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    /// Bytes per vertex.
    pub stride: u32,
    /// Attributes in buffer order.
    pub attributes: Vec<VertexAttribute>,
}

/// Pixel formats supported for texture uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit RGBA, the format image assets are decoded to.
    Rgba8,
}

impl TextureFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// Description of a texture to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Errors surfaced by device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Shader source failed to compile.
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    /// Compiled stages failed to link into a program.
    #[error("program link failed: {0}")]
    ProgramLink(String),

    /// A handle referred to a destroyed or foreign resource.
    #[error("invalid {kind} handle")]
    InvalidHandle {
        /// Resource kind, for the log line.
        kind: &'static str,
    },

    /// A resource was created with no data.
    #[error("cannot create {kind} from empty data")]
    EmptyData {
        /// Resource kind, for the log line.
        kind: &'static str,
    },

    /// Texture pixel data did not match its descriptor.
    #[error("texture data is {actual} bytes, expected {expected}")]
    TextureSizeMismatch { expected: usize, actual: usize },
}

/// Backend capability trait.
///
/// Lookup methods (`uniform_location`, `attribute_location`) return `Option`
/// rather than an error: a missing uniform usually means the shader variant
/// does not use it, and callers skip the upload.
pub trait RenderDevice {
    /// Upload an immutable vertex buffer.
    fn create_vertex_buffer(&self, data: &[u8]) -> Result<BufferHandle, DeviceError>;

    /// Upload an immutable 32-bit index buffer.
    fn create_index_buffer(&self, data: &[u8]) -> Result<BufferHandle, DeviceError>;

    /// Release a buffer. Unknown handles are ignored.
    fn destroy_buffer(&self, handle: BufferHandle);

    /// Compile and link a program from vertex and fragment source.
    fn compile_program(
        &self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramHandle, DeviceError>;

    /// Release a program. Unknown handles are ignored.
    fn destroy_program(&self, handle: ProgramHandle);

    /// Look up a uniform by name. `None` if the program does not declare it.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Look up a vertex attribute by name.
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;

    /// Upload a uniform value. The location's program is bound implicitly.
    fn set_uniform(&self, location: UniformLocation, value: UniformValue);

    /// Create an immutable texture from raw pixels.
    fn create_texture(&self, desc: &TextureDesc, pixels: &[u8])
        -> Result<TextureHandle, DeviceError>;

    /// Release a texture. Unknown handles are ignored.
    fn destroy_texture(&self, handle: TextureHandle);

    /// Bind a texture to a sampler unit for the next draw.
    fn bind_texture(&self, unit: u32, handle: TextureHandle);

    /// Apply fixed-function state for subsequent draws.
    fn set_render_state(&self, flags: RenderStateFlags);

    /// Clear the selected framebuffer planes.
    fn clear(&self, flags: ClearFlags, color: [f32; 4]);

    /// Draw `index_count` indices from the bound buffers as triangles.
    fn draw_indexed(
        &self,
        program: ProgramHandle,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        index_count: u32,
        layout: &VertexLayout,
    ) -> Result<(), DeviceError>;

    /// Current viewport size in pixels.
    fn viewport_size(&self) -> (u32, u32);
}
