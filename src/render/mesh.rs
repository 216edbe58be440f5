//! Mesh geometry, CPU and GPU side.
//!
//! [`MeshData`] is the CPU representation produced by the asset loaders and
//! primitive builders; [`Mesh`] is the uploaded pair of device buffers. The
//! interleaved vertex format is fixed (position, uv, normal, tangent,
//! bitangent) so every shader in the engine shares one layout.

use bytemuck::{Pod, Zeroable};
use log::{debug, warn};

use crate::foundation::math::{Vec2, Vec3};
use crate::render::device::{
    BufferHandle, DeviceError, RenderDevice, VertexAttribute, VertexLayout,
};
use crate::render::uniforms::attribute;

/// UV-area threshold below which a triangle contributes no tangent.
const TANGENT_DET_EPSILON: f32 = 1.0e-6;

/// One interleaved vertex as uploaded to the device.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[allow(missing_docs)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// CPU-side indexed triangle mesh.
///
/// Attribute arrays are parallel: index `i` in each array describes vertex
/// `i`. `tangents`/`bitangents` are empty until
/// [`generate_tangents`](Self::generate_tangents) runs.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of unique vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles described by the index list.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Derive per-vertex tangent frames from positions, UVs, and normals.
    ///
    /// Per triangle, the tangent is the solution of the 2x2 system mapping UV
    /// deltas onto edge vectors; triangles whose UV determinant is near zero
    /// (degenerate or unmapped UVs) contribute nothing. Per-triangle tangents
    /// are accumulated on each corner vertex, then Gram-Schmidt
    /// orthogonalized against the vertex normal. The bitangent is
    /// `cross(normal, tangent)`, so the frame stays right-handed even where
    /// accumulated tangents from adjacent triangles disagree.
    ///
    /// A vertex touched only by degenerate-UV triangles ends up with a zero
    /// tangent frame, which shades as unperturbed in a normal-mapping shader.
    ///
    /// Calling this on a mesh whose uv/normal arrays do not cover every
    /// vertex, or which has no indices, is reported and leaves the mesh
    /// unchanged.
    pub fn generate_tangents(&mut self) {
        let n = self.vertex_count();
        if self.indices.is_empty() || self.uvs.len() < n || self.normals.len() < n {
            warn!(
                "tangent generation skipped: {} vertices, {} uvs, {} normals, {} indices",
                n,
                self.uvs.len(),
                self.normals.len(),
                self.indices.len()
            );
            return;
        }
        let mut accumulated = vec![Vec3::zeros(); n];

        for triangle in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );

            let e1 = self.positions[i1] - self.positions[i0];
            let e2 = self.positions[i2] - self.positions[i0];
            let duv1 = self.uvs[i1] - self.uvs[i0];
            let duv2 = self.uvs[i2] - self.uvs[i0];

            let det = duv1.x * duv2.y - duv2.x * duv1.y;
            if det.abs() < TANGENT_DET_EPSILON {
                continue;
            }
            let f = 1.0 / det;
            let tangent = (e1 * duv2.y - e2 * duv1.y) * f;

            accumulated[i0] += tangent;
            accumulated[i1] += tangent;
            accumulated[i2] += tangent;
        }

        self.tangents = Vec::with_capacity(n);
        self.bitangents = Vec::with_capacity(n);
        for i in 0..n {
            let normal = self.normals[i];
            let raw = accumulated[i];
            let orthogonal = raw - normal * normal.dot(&raw);
            let tangent = orthogonal.try_normalize(TANGENT_DET_EPSILON).unwrap_or_else(Vec3::zeros);
            self.tangents.push(tangent);
            self.bitangents.push(normal.cross(&tangent));
        }
    }

    /// Build the interleaved vertex array. Missing tangent data interleaves
    /// as zeros.
    pub fn interleave(&self) -> Vec<Vertex> {
        let zero = Vec3::zeros();
        (0..self.vertex_count())
            .map(|i| Vertex {
                position: self.positions[i].into(),
                uv: self.uvs[i].into(),
                normal: self.normals[i].into(),
                tangent: (*self.tangents.get(i).unwrap_or(&zero)).into(),
                bitangent: (*self.bitangents.get(i).unwrap_or(&zero)).into(),
            })
            .collect()
    }

    /// The vertex layout matching [`interleave`](Self::interleave).
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Vertex>() as u32,
            attributes: vec![
                VertexAttribute {
                    name: attribute::POSITION,
                    components: 3,
                    offset: 0,
                },
                VertexAttribute {
                    name: attribute::UV,
                    components: 2,
                    offset: 12,
                },
                VertexAttribute {
                    name: attribute::NORMAL,
                    components: 3,
                    offset: 20,
                },
                VertexAttribute {
                    name: attribute::TANGENT,
                    components: 3,
                    offset: 32,
                },
                VertexAttribute {
                    name: attribute::BITANGENT,
                    components: 3,
                    offset: 44,
                },
            ],
        }
    }
}

/// GPU-resident mesh: vertex and index buffers plus draw metadata.
pub struct Mesh {
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    index_count: u32,
    layout: VertexLayout,
}

impl Mesh {
    /// Interleave and upload mesh data to the device.
    pub fn upload(device: &dyn RenderDevice, data: &MeshData) -> Result<Self, DeviceError> {
        let vertices = data.interleave();
        let vertex_buffer = device.create_vertex_buffer(bytemuck::cast_slice(&vertices))?;
        let index_buffer = device.create_index_buffer(bytemuck::cast_slice(&data.indices))?;
        debug!(
            "uploaded mesh: {} vertices, {} triangles",
            data.vertex_count(),
            data.triangle_count()
        );
        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            layout: MeshData::layout(),
        })
    }

    /// Handle of the interleaved vertex buffer.
    pub fn vertex_buffer(&self) -> BufferHandle {
        self.vertex_buffer
    }

    /// Handle of the 32-bit index buffer.
    pub fn index_buffer(&self) -> BufferHandle {
        self.index_buffer
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// The vertex layout the buffers were packed with.
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Release both buffers.
    pub fn destroy(&self, device: &dyn RenderDevice) {
        device.destroy_buffer(self.vertex_buffer);
        device.destroy_buffer(self.index_buffer);
    }
}
