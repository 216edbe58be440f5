//! CPU-only device backend.
//!
//! Implements [`RenderDevice`] with plain in-memory records instead of a GPU.
//! Every upload, state change, and draw is retained for inspection, which is
//! what the test suite runs against; it is also handy for running scene logic
//! on CI machines with no display.
//!
//! Program "compilation" parses the GLSL source just far enough to collect
//! declared uniform and attribute names, so lookups behave like a real
//! compiler-backed device: undeclared names resolve to `None` and the
//! renderer skips them.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::render::device::{
    BufferHandle, ClearFlags, DeviceError, ProgramHandle, RenderDevice, RenderStateFlags,
    TextureDesc, TextureHandle, UniformLocation, UniformValue, VertexLayout,
};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct DrawRecord {
    pub program: ProgramHandle,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub index_count: u32,
    pub stride: u32,
    /// Texture bindings at draw time, by unit.
    pub textures: Vec<(u32, TextureHandle)>,
}

#[derive(Debug)]
struct BufferRecord {
    data: Vec<u8>,
}

#[derive(Debug)]
struct ProgramRecord {
    uniforms: Vec<String>,
    attributes: Vec<String>,
    uniform_values: HashMap<String, UniformValue>,
}

#[derive(Debug)]
struct TextureRecord {
    desc: TextureDesc,
}

#[derive(Debug, Default)]
struct Inner {
    buffers: SlotMap<BufferHandle, BufferRecord>,
    programs: SlotMap<ProgramHandle, ProgramRecord>,
    textures: SlotMap<TextureHandle, TextureRecord>,
    bound_textures: HashMap<u32, TextureHandle>,
    render_state: RenderStateFlags,
    clears: Vec<(ClearFlags, [f32; 4])>,
    draws: Vec<DrawRecord>,
}

/// Recording, GPU-free render device.
pub struct HeadlessDevice {
    width: u32,
    height: u32,
    inner: RefCell<Inner>,
}

impl HeadlessDevice {
    /// Device with a fixed viewport size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            inner: RefCell::new(Inner {
                render_state: RenderStateFlags::empty(),
                ..Inner::default()
            }),
        }
    }

    /// Last value uploaded to a named uniform, if any.
    pub fn uniform_value(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
        self.inner
            .borrow()
            .programs
            .get(program)?
            .uniform_values
            .get(name)
            .cloned()
    }

    /// All draw calls recorded so far.
    pub fn draws(&self) -> Vec<DrawRecord> {
        self.inner.borrow().draws.clone()
    }

    /// Number of draw calls recorded so far.
    pub fn draw_count(&self) -> usize {
        self.inner.borrow().draws.len()
    }

    /// All clears recorded so far.
    pub fn clears(&self) -> Vec<(ClearFlags, [f32; 4])> {
        self.inner.borrow().clears.clone()
    }

    /// Byte length of a live buffer.
    pub fn buffer_len(&self, handle: BufferHandle) -> Option<usize> {
        self.inner.borrow().buffers.get(handle).map(|b| b.data.len())
    }

    /// Number of buffers not yet destroyed.
    pub fn live_buffer_count(&self) -> usize {
        self.inner.borrow().buffers.len()
    }

    /// Number of programs not yet destroyed.
    pub fn live_program_count(&self) -> usize {
        self.inner.borrow().programs.len()
    }

    /// Number of textures not yet destroyed.
    pub fn live_texture_count(&self) -> usize {
        self.inner.borrow().textures.len()
    }

    /// Current fixed-function state.
    pub fn render_state(&self) -> RenderStateFlags {
        self.inner.borrow().render_state
    }

    fn create_buffer(&self, data: &[u8], kind: &'static str) -> Result<BufferHandle, DeviceError> {
        if data.is_empty() {
            return Err(DeviceError::EmptyData { kind });
        }
        let handle = self.inner.borrow_mut().buffers.insert(BufferRecord {
            data: data.to_vec(),
        });
        trace!("created {} buffer ({} bytes)", kind, data.len());
        Ok(handle)
    }
}

/// Validate one shader stage and harvest its interface declarations.
fn parse_stage(
    source: &str,
    stage: &'static str,
    uniforms: &mut Vec<String>,
    attributes: &mut Vec<String>,
) -> Result<(), DeviceError> {
    if source.trim().is_empty() {
        return Err(DeviceError::ShaderCompile(format!("{stage}: empty source")));
    }
    if !source.contains("main(") {
        return Err(DeviceError::ShaderCompile(format!(
            "{stage}: no main() entry point"
        )));
    }

    for line in source.lines() {
        let line = line.trim();
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("");
        let list = match keyword {
            "uniform" => &mut *uniforms,
            "attribute" => &mut *attributes,
            _ => continue,
        };
        // `uniform vec3 u_name;` or `uniform vec3 u_name[8];`
        let Some(raw) = tokens.nth(1) else { continue };
        let name = raw
            .trim_end_matches(';')
            .split('[')
            .next()
            .unwrap_or("")
            .to_string();
        if !name.is_empty() && !list.contains(&name) {
            list.push(name);
        }
    }
    Ok(())
}

impl RenderDevice for HeadlessDevice {
    fn create_vertex_buffer(&self, data: &[u8]) -> Result<BufferHandle, DeviceError> {
        self.create_buffer(data, "vertex")
    }

    fn create_index_buffer(&self, data: &[u8]) -> Result<BufferHandle, DeviceError> {
        self.create_buffer(data, "index")
    }

    fn destroy_buffer(&self, handle: BufferHandle) {
        if self.inner.borrow_mut().buffers.remove(handle).is_none() {
            warn!("destroy_buffer: stale handle {handle:?}");
        }
    }

    fn compile_program(
        &self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramHandle, DeviceError> {
        let mut uniforms = Vec::new();
        let mut attributes = Vec::new();
        parse_stage(vertex_src, "vertex", &mut uniforms, &mut attributes)?;
        parse_stage(fragment_src, "fragment", &mut uniforms, &mut attributes)?;

        let handle = self.inner.borrow_mut().programs.insert(ProgramRecord {
            uniforms,
            attributes,
            uniform_values: HashMap::new(),
        });
        debug!("compiled program {handle:?}");
        Ok(handle)
    }

    fn destroy_program(&self, handle: ProgramHandle) {
        if self.inner.borrow_mut().programs.remove(handle).is_none() {
            warn!("destroy_program: stale handle {handle:?}");
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let inner = self.inner.borrow();
        let record = inner.programs.get(program)?;
        let index = record.uniforms.iter().position(|u| u == name)?;
        Some(UniformLocation {
            program,
            index: index as u32,
        })
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        let inner = self.inner.borrow();
        let record = inner.programs.get(program)?;
        record
            .attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue) {
        let mut inner = self.inner.borrow_mut();
        let Some(record) = inner.programs.get_mut(location.program) else {
            warn!("set_uniform: stale program handle {:?}", location.program);
            return;
        };
        let Some(name) = record.uniforms.get(location.index as usize).cloned() else {
            warn!("set_uniform: stale location index {}", location.index);
            return;
        };
        record.uniform_values.insert(name, value);
    }

    fn create_texture(
        &self,
        desc: &TextureDesc,
        pixels: &[u8],
    ) -> Result<TextureHandle, DeviceError> {
        let expected =
            desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(DeviceError::TextureSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        let handle = self
            .inner
            .borrow_mut()
            .textures
            .insert(TextureRecord { desc: *desc });
        trace!("created texture {}x{}", desc.width, desc.height);
        Ok(handle)
    }

    fn destroy_texture(&self, handle: TextureHandle) {
        if self.inner.borrow_mut().textures.remove(handle).is_none() {
            warn!("destroy_texture: stale handle {handle:?}");
        }
    }

    fn bind_texture(&self, unit: u32, handle: TextureHandle) {
        self.inner.borrow_mut().bound_textures.insert(unit, handle);
    }

    fn set_render_state(&self, flags: RenderStateFlags) {
        self.inner.borrow_mut().render_state = flags;
    }

    fn clear(&self, flags: ClearFlags, color: [f32; 4]) {
        self.inner.borrow_mut().clears.push((flags, color));
    }

    fn draw_indexed(
        &self,
        program: ProgramHandle,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        index_count: u32,
        layout: &VertexLayout,
    ) -> Result<(), DeviceError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.programs.contains_key(program) {
            return Err(DeviceError::InvalidHandle { kind: "program" });
        }
        if !inner.buffers.contains_key(vertex_buffer) {
            return Err(DeviceError::InvalidHandle { kind: "vertex buffer" });
        }
        let Some(indices) = inner.buffers.get(index_buffer) else {
            return Err(DeviceError::InvalidHandle { kind: "index buffer" });
        };
        debug_assert!(indices.data.len() >= index_count as usize * 4);

        let mut textures: Vec<(u32, TextureHandle)> = inner
            .bound_textures
            .iter()
            .map(|(&unit, &handle)| (unit, handle))
            .collect();
        textures.sort_by_key(|&(unit, _)| unit);

        inner.draws.push(DrawRecord {
            program,
            vertex_buffer,
            index_buffer,
            index_count,
            stride: layout.stride,
            textures,
        });
        trace!("draw_indexed: {} indices", index_count);
        Ok(())
    }

    fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
