//! [`GpuContext`] backed by raylib's rlgl layer.
//!
//! rlgl is raylib's thin OpenGL abstraction. Raylib batches its own 2D draws,
//! so the batch must be flushed with [`RaylibGpu::flush_batch`] before any of
//! our direct vertex-array draws inside a drawing scope.
//!
//! # Note
//! Only valid on the thread that created the raylib window, after the window
//! exists. All objects created here are released when the context is dropped,
//! so it must be dropped before the raylib handle.

use std::ffi::{CString, c_void};
use std::path::Path;

use glam::Mat4;
use log::{debug, warn};
use raylib::ffi;
use rustc_hash::{FxHashMap, FxHashSet};

use super::gpu::{
    BufferId, GpuContext, GpuError, GpuTexture, ProgramId, TextureId, UniformValue,
    VertexArrayId, VertexAttribute,
};

const RL_FLOAT: i32 = 0x1406;
const FLOAT_SIZE: i32 = std::mem::size_of::<f32>() as i32;

// rlShaderUniformDataType
const UNIFORM_VEC2: i32 = 1;
const UNIFORM_VEC3: i32 = 2;
const UNIFORM_INT: i32 = 4;

pub struct RaylibGpu {
    live_vertex_arrays: FxHashSet<VertexArrayId>,
    live_buffers: FxHashSet<BufferId>,
    programs: FxHashMap<ProgramId, FxHashMap<String, i32>>,
    textures: Vec<ffi::Texture2D>,
}

impl Default for RaylibGpu {
    fn default() -> Self {
        Self::new()
    }
}

impl RaylibGpu {
    pub fn new() -> Self {
        Self {
            live_vertex_arrays: FxHashSet::default(),
            live_buffers: FxHashSet::default(),
            programs: FxHashMap::default(),
            textures: Vec::new(),
        }
    }

    /// Submit raylib's pending internal batch so our draws land after it.
    pub fn flush_batch(&mut self) {
        unsafe {
            ffi::rlDrawRenderBatchActive();
        }
    }

    fn location(&mut self, program: ProgramId, name: &str) -> Option<i32> {
        let locations = self.programs.get_mut(&program)?;
        if let Some(loc) = locations.get(name) {
            return (*loc >= 0).then_some(*loc);
        }
        let c_name = CString::new(name).ok()?;
        let loc = unsafe { ffi::rlGetLocationUniform(program.0, c_name.as_ptr()) };
        if loc < 0 {
            debug!("uniform '{}' not found in program {}", name, program.0);
        }
        locations.insert(name.to_string(), loc);
        (loc >= 0).then_some(loc)
    }
}

fn to_rl_matrix(m: &Mat4) -> ffi::Matrix {
    // rlgl uploads m0..m15 in order as a column-major array
    let a = m.to_cols_array();
    ffi::Matrix {
        m0: a[0],
        m1: a[1],
        m2: a[2],
        m3: a[3],
        m4: a[4],
        m5: a[5],
        m6: a[6],
        m7: a[7],
        m8: a[8],
        m9: a[9],
        m10: a[10],
        m11: a[11],
        m12: a[12],
        m13: a[13],
        m14: a[14],
        m15: a[15],
    }
}

impl GpuContext for RaylibGpu {
    fn create_vertex_array(&mut self) -> Result<VertexArrayId, GpuError> {
        let id = unsafe { ffi::rlLoadVertexArray() };
        if id == 0 {
            return Err(GpuError::VertexArrayUnsupported);
        }
        let vao = VertexArrayId(id);
        self.live_vertex_arrays.insert(vao);
        Ok(vao)
    }

    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId, GpuError> {
        let size = std::mem::size_of_val(data) as i32;
        let id = unsafe { ffi::rlLoadVertexBuffer(data.as_ptr() as *const c_void, size, false) };
        if id == 0 {
            return Err(GpuError::BufferCreation);
        }
        let buffer = BufferId(id);
        self.live_buffers.insert(buffer);
        Ok(buffer)
    }

    fn create_element_buffer(&mut self, indices: &[u16]) -> Result<BufferId, GpuError> {
        let size = std::mem::size_of_val(indices) as i32;
        let id = unsafe {
            ffi::rlLoadVertexBufferElement(indices.as_ptr() as *const c_void, size, false)
        };
        if id == 0 {
            return Err(GpuError::BufferCreation);
        }
        let buffer = BufferId(id);
        self.live_buffers.insert(buffer);
        Ok(buffer)
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        unsafe {
            match vao {
                Some(vao) => {
                    ffi::rlEnableVertexArray(vao.0);
                }
                None => ffi::rlDisableVertexArray(),
            }
        }
    }

    fn bind_vertex_buffer(&mut self, vbo: Option<BufferId>) {
        unsafe {
            match vbo {
                Some(vbo) => ffi::rlEnableVertexBuffer(vbo.0),
                None => ffi::rlDisableVertexBuffer(),
            }
        }
    }

    fn enable_vertex_attribute(&mut self, attribute: VertexAttribute) {
        unsafe {
            ffi::rlSetVertexAttribute(
                attribute.location,
                attribute.components as i32,
                RL_FLOAT,
                false,
                attribute.stride as i32 * FLOAT_SIZE,
                attribute.offset as i32 * FLOAT_SIZE,
            );
            ffi::rlEnableVertexAttribute(attribute.location);
        }
    }

    fn is_vertex_array(&self, vao: VertexArrayId) -> bool {
        self.live_vertex_arrays.contains(&vao)
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        if self.live_vertex_arrays.remove(&vao) {
            unsafe { ffi::rlUnloadVertexArray(vao.0) };
        }
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if self.live_buffers.remove(&buffer) {
            unsafe { ffi::rlUnloadVertexBuffer(buffer.0) };
        }
    }

    fn create_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, GpuError> {
        let vs = CString::new(vertex_src)
            .map_err(|e| GpuError::ShaderCompile(format!("vertex source: {}", e)))?;
        let fs = CString::new(fragment_src)
            .map_err(|e| GpuError::ShaderCompile(format!("fragment source: {}", e)))?;
        let id = unsafe { ffi::rlLoadShaderCode(vs.as_ptr(), fs.as_ptr()) };
        if id == 0 {
            return Err(GpuError::ShaderCompile(
                "see the raylib log for the driver message".to_string(),
            ));
        }
        let program = ProgramId(id);
        self.programs.insert(program, FxHashMap::default());
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.programs.remove(&program).is_some() {
            unsafe { ffi::rlUnloadShaderProgram(program.0) };
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        unsafe { ffi::rlEnableShader(program.0) };
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) {
        let Some(loc) = self.location(program, name) else {
            return;
        };
        unsafe {
            match value {
                UniformValue::Int(v) => {
                    ffi::rlSetUniform(loc, &v as *const i32 as *const c_void, UNIFORM_INT, 1)
                }
                UniformValue::Vec2(v) => {
                    let data = v.to_array();
                    ffi::rlSetUniform(loc, data.as_ptr() as *const c_void, UNIFORM_VEC2, 1)
                }
                UniformValue::Vec3(v) => {
                    let data = v.to_array();
                    ffi::rlSetUniform(loc, data.as_ptr() as *const c_void, UNIFORM_VEC3, 1)
                }
                UniformValue::Mat4(m) => ffi::rlSetUniformMatrix(loc, to_rl_matrix(&m)),
            }
        }
    }

    fn active_texture_unit(&mut self, unit: u32) {
        unsafe {
            ffi::rlActiveTextureSlot(unit as i32);
        }
    }

    fn bind_texture(&mut self, texture: TextureId) {
        unsafe { ffi::rlEnableTexture(texture.0) };
    }

    fn load_texture(&mut self, path: &Path) -> Result<GpuTexture, GpuError> {
        let c_path = CString::new(path.to_string_lossy().as_bytes()).map_err(|e| {
            GpuError::TextureLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let texture = unsafe { ffi::LoadTexture(c_path.as_ptr()) };
        if texture.id == 0 {
            return Err(GpuError::TextureLoad {
                path: path.to_path_buf(),
                reason: "raylib could not decode or upload the image".to_string(),
            });
        }
        self.textures.push(texture);
        Ok(GpuTexture {
            id: TextureId(texture.id),
            width: texture.width.max(0) as u32,
            height: texture.height.max(0) as u32,
        })
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        unsafe { ffi::rlDrawVertexArray(first as i32, count as i32) };
    }

    fn draw_indexed_triangles(&mut self, count: u32) {
        unsafe { ffi::rlDrawVertexArrayElements(0, count as i32, std::ptr::null()) };
    }
}

impl Drop for RaylibGpu {
    fn drop(&mut self) {
        if !self.live_vertex_arrays.is_empty() || !self.live_buffers.is_empty() {
            warn!(
                "releasing {} vertex arrays and {} buffers still alive at shutdown",
                self.live_vertex_arrays.len(),
                self.live_buffers.len()
            );
        }
        unsafe {
            for vao in self.live_vertex_arrays.drain() {
                ffi::rlUnloadVertexArray(vao.0);
            }
            for buffer in self.live_buffers.drain() {
                ffi::rlUnloadVertexBuffer(buffer.0);
            }
            for (program, _) in self.programs.drain() {
                ffi::rlUnloadShaderProgram(program.0);
            }
            for texture in self.textures.drain(..) {
                ffi::UnloadTexture(texture);
            }
        }
    }
}
