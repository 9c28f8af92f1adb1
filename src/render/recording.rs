//! Driverless [`GpuContext`] that records what would have been sent to the GPU.
//!
//! Used by the test-suite and by `--headless` runs. Ids are handed out from a
//! single counter, the live vertex-array set mirrors what a driver would track,
//! and each draw captures the state it would have used.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};

use super::gpu::{
    BufferId, GpuContext, GpuError, GpuTexture, ProgramId, TextureId, UniformValue,
    VertexArrayId, VertexAttribute,
};

/// One call as received by the recording context.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateVertexArray(VertexArrayId),
    CreateVertexBuffer { id: BufferId, floats: usize },
    CreateElementBuffer { id: BufferId, indices: usize },
    BindVertexArray(Option<VertexArrayId>),
    BindVertexBuffer(Option<BufferId>),
    EnableVertexAttribute(VertexAttribute),
    DeleteVertexArray(VertexArrayId),
    DeleteBuffer(BufferId),
    CreateProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(ProgramId),
    SetUniform { program: ProgramId, name: String, value: UniformValue },
    ActiveTextureUnit(u32),
    BindTexture(TextureId),
    LoadTexture { id: TextureId, path: String },
    DrawTriangles { first: u32, count: u32 },
    DrawIndexedTriangles { count: u32 },
}

/// State in effect when a draw was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSnapshot {
    pub vertex_array: Option<VertexArrayId>,
    pub program: Option<ProgramId>,
    pub texture_unit: u32,
    pub texture: Option<TextureId>,
    pub count: u32,
    pub indexed: bool,
    /// Uniforms of the active program at draw time.
    pub uniforms: BTreeMap<String, UniformValue>,
}

impl DrawSnapshot {
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

#[derive(Debug)]
pub struct RecordingGpu {
    calls: Vec<GpuCall>,
    draws: Vec<DrawSnapshot>,
    next_id: u32,
    live_vertex_arrays: FxHashSet<VertexArrayId>,
    live_buffers: FxHashSet<BufferId>,
    uniforms: FxHashMap<ProgramId, BTreeMap<String, UniformValue>>,
    bound_vertex_array: Option<VertexArrayId>,
    bound_program: Option<ProgramId>,
    texture_unit: u32,
    bound_texture: Option<TextureId>,
    /// Size reported for every loaded texture.
    pub texture_size: (u32, u32),
    /// When set, every creation fails as if no context were current.
    pub lost_context: bool,
}

impl Default for RecordingGpu {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            draws: Vec::new(),
            next_id: 1,
            live_vertex_arrays: FxHashSet::default(),
            live_buffers: FxHashSet::default(),
            uniforms: FxHashMap::default(),
            bound_vertex_array: None,
            bound_program: None,
            texture_unit: 0,
            bound_texture: None,
            texture_size: (64, 64),
            lost_context: false,
        }
    }

    /// A context that behaves as if no GPU context were current.
    pub fn without_context() -> Self {
        Self {
            lost_context: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    pub fn draws(&self) -> &[DrawSnapshot] {
        &self.draws
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.bound_vertex_array
    }

    pub fn live_vertex_array_count(&self) -> usize {
        self.live_vertex_arrays.len()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.len()
    }

    /// Drop recorded calls and draws, keeping object and binding state.
    pub fn clear_log(&mut self) {
        self.calls.clear();
        self.draws.clear();
    }

    fn next(&mut self) -> Result<u32, GpuError> {
        if self.lost_context {
            return Err(GpuError::NoContext);
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    fn snapshot(&self, count: u32, indexed: bool) -> DrawSnapshot {
        let uniforms = self
            .bound_program
            .and_then(|p| self.uniforms.get(&p))
            .cloned()
            .unwrap_or_default();
        DrawSnapshot {
            vertex_array: self.bound_vertex_array,
            program: self.bound_program,
            texture_unit: self.texture_unit,
            texture: self.bound_texture,
            count,
            indexed,
            uniforms,
        }
    }
}

impl GpuContext for RecordingGpu {
    fn create_vertex_array(&mut self) -> Result<VertexArrayId, GpuError> {
        let id = VertexArrayId(self.next()?);
        self.live_vertex_arrays.insert(id);
        self.calls.push(GpuCall::CreateVertexArray(id));
        Ok(id)
    }

    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId, GpuError> {
        let id = BufferId(self.next()?);
        self.live_buffers.insert(id);
        self.calls.push(GpuCall::CreateVertexBuffer {
            id,
            floats: data.len(),
        });
        Ok(id)
    }

    fn create_element_buffer(&mut self, indices: &[u16]) -> Result<BufferId, GpuError> {
        let id = BufferId(self.next()?);
        self.live_buffers.insert(id);
        self.calls.push(GpuCall::CreateElementBuffer {
            id,
            indices: indices.len(),
        });
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        self.bound_vertex_array = vao;
        self.calls.push(GpuCall::BindVertexArray(vao));
    }

    fn bind_vertex_buffer(&mut self, vbo: Option<BufferId>) {
        self.calls.push(GpuCall::BindVertexBuffer(vbo));
    }

    fn enable_vertex_attribute(&mut self, attribute: VertexAttribute) {
        self.calls.push(GpuCall::EnableVertexAttribute(attribute));
    }

    fn is_vertex_array(&self, vao: VertexArrayId) -> bool {
        self.live_vertex_arrays.contains(&vao)
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        self.live_vertex_arrays.remove(&vao);
        if self.bound_vertex_array == Some(vao) {
            self.bound_vertex_array = None;
        }
        self.calls.push(GpuCall::DeleteVertexArray(vao));
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.live_buffers.remove(&buffer);
        self.calls.push(GpuCall::DeleteBuffer(buffer));
    }

    fn create_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, GpuError> {
        if vertex_src.trim().is_empty() || fragment_src.trim().is_empty() {
            return Err(GpuError::ShaderCompile("empty shader source".to_string()));
        }
        let id = ProgramId(self.next()?);
        self.uniforms.insert(id, BTreeMap::new());
        self.calls.push(GpuCall::CreateProgram(id));
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.uniforms.remove(&program);
        if self.bound_program == Some(program) {
            self.bound_program = None;
        }
        self.calls.push(GpuCall::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.bound_program = Some(program);
        self.calls.push(GpuCall::UseProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) {
        if let Some(uniforms) = self.uniforms.get_mut(&program) {
            uniforms.insert(name.to_string(), value);
        }
        self.calls.push(GpuCall::SetUniform {
            program,
            name: name.to_string(),
            value,
        });
    }

    fn active_texture_unit(&mut self, unit: u32) {
        self.texture_unit = unit;
        self.calls.push(GpuCall::ActiveTextureUnit(unit));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.bound_texture = Some(texture);
        self.calls.push(GpuCall::BindTexture(texture));
    }

    fn load_texture(&mut self, path: &Path) -> Result<GpuTexture, GpuError> {
        let id = TextureId(self.next()?);
        self.calls.push(GpuCall::LoadTexture {
            id,
            path: path.display().to_string(),
        });
        Ok(GpuTexture {
            id,
            width: self.texture_size.0,
            height: self.texture_size.1,
        })
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        self.calls.push(GpuCall::DrawTriangles { first, count });
        self.draws.push(self.snapshot(count, false));
    }

    fn draw_indexed_triangles(&mut self, count: u32) {
        self.calls.push(GpuCall::DrawIndexedTriangles { count });
        self.draws.push(self.snapshot(count, true));
    }
}
