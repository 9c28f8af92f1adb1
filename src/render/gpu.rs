//! Explicit GPU context.
//!
//! OpenGL-style APIs keep a hidden "currently bound" object per binding point.
//! Instead of touching that global state from anywhere, every operation that
//! talks to the GPU takes a `&mut impl GpuContext`. The context owns the
//! binding state; callers only hold plain ids.
//!
//! Binding state is *not* restored after an operation. A caller must never
//! assume any object is still bound after handing the context to someone else.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

/// Vertex array object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub u32);

/// Vertex or element buffer object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Linked shading program id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Driver-side texture id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A texture living on the GPU together with its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuTexture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Float vertex attribute layout, expressed in floats rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader attribute location.
    pub location: u32,
    /// Number of floats in this attribute.
    pub components: u32,
    /// Distance between consecutive vertices, in floats.
    pub stride: u32,
    /// Offset of the attribute inside a vertex, in floats.
    pub offset: u32,
}

/// A value that can be written to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Mat4(Mat4),
}

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no current GPU context")]
    NoContext,
    #[error("vertex array objects are not supported by this context")]
    VertexArrayUnsupported,
    #[error("failed to create GPU buffer")]
    BufferCreation,
    #[error("vertex data of {len} floats does not fit the attribute layout")]
    InvalidVertexData { len: usize },
    #[error("shader program failed to compile or link: {0}")]
    ShaderCompile(String),
    #[error("failed to load texture {path:?}: {reason}")]
    TextureLoad { path: PathBuf, reason: String },
}

/// Operations the sprite pipeline needs from a graphics driver.
pub trait GpuContext {
    fn create_vertex_array(&mut self) -> Result<VertexArrayId, GpuError>;
    /// Upload static float vertex data. Leaves the new buffer bound.
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId, GpuError>;
    /// Upload static 16-bit indices. Leaves the new buffer bound to the current vertex array.
    fn create_element_buffer(&mut self, indices: &[u16]) -> Result<BufferId, GpuError>;

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>);
    fn bind_vertex_buffer(&mut self, vbo: Option<BufferId>);
    /// Configure and enable a float attribute sourced from the bound vertex buffer.
    fn enable_vertex_attribute(&mut self, attribute: VertexAttribute);

    /// Whether `vao` is still in the driver's live-object set.
    fn is_vertex_array(&self, vao: VertexArrayId) -> bool;
    fn delete_vertex_array(&mut self, vao: VertexArrayId);
    fn delete_buffer(&mut self, buffer: BufferId);

    fn create_program(&mut self, vertex_src: &str, fragment_src: &str)
    -> Result<ProgramId, GpuError>;
    fn delete_program(&mut self, program: ProgramId);
    fn use_program(&mut self, program: ProgramId);
    /// Set a uniform on `program` by name. Unknown names are ignored.
    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue);

    fn active_texture_unit(&mut self, unit: u32);
    fn bind_texture(&mut self, texture: TextureId);
    fn load_texture(&mut self, path: &Path) -> Result<GpuTexture, GpuError>;

    /// Draw `count` vertices of the bound vertex array as a triangle list.
    fn draw_triangles(&mut self, first: u32, count: u32);
    /// Draw `count` indices of the bound element buffer as a triangle list.
    fn draw_indexed_triangles(&mut self, count: u32);
}
