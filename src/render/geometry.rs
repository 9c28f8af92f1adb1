//! GPU geometry owned by a single vertex array.
//!
//! A [`GeometryBuffer`] owns one vertex array, the vertex buffer feeding it
//! and optionally an element buffer. The sprite pipeline uses exactly one of
//! these, holding the unit quad in [`QUAD_VERTICES`].

use log::{debug, warn};

use super::gpu::{BufferId, GpuContext, GpuError, VertexArrayId, VertexAttribute};

/// Floats per sprite vertex: `xy` position followed by `uv` texcoord.
pub const QUAD_FLOATS_PER_VERTEX: u32 = 4;

/// Unit quad spanning `[0,1]×[0,1]` as two triangles, `(x, y, u, v)` per vertex.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 24] = [
    0.0, 1.0, 0.0, 1.0,
    1.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 0.0,

    0.0, 1.0, 0.0, 1.0,
    1.0, 1.0, 1.0, 1.0,
    1.0, 0.0, 1.0, 0.0,
];

/// Attribute layout of [`QUAD_VERTICES`]: one `vec4` at location 0.
pub const QUAD_LAYOUT: [VertexAttribute; 1] = [VertexAttribute {
    location: 0,
    components: QUAD_FLOATS_PER_VERTEX,
    stride: QUAD_FLOATS_PER_VERTEX,
    offset: 0,
}];

#[derive(Debug)]
pub struct GeometryBuffer {
    vertex_array: Option<VertexArrayId>,
    vertex_buffer: Option<BufferId>,
    element_buffer: Option<BufferId>,
    vertex_count: u32,
    index_count: u32,
}

impl GeometryBuffer {
    /// Upload `vertices` once and describe them with `layout`.
    ///
    /// Fails if the context cannot create objects or if `vertices` is not a
    /// whole number of vertices for the layout's stride.
    pub fn new(
        gpu: &mut impl GpuContext,
        vertices: &[f32],
        layout: &[VertexAttribute],
    ) -> Result<Self, GpuError> {
        Self::build(gpu, vertices, layout, None)
    }

    /// Like [`GeometryBuffer::new`] with an element buffer for indexed draws.
    pub fn with_indices(
        gpu: &mut impl GpuContext,
        vertices: &[f32],
        layout: &[VertexAttribute],
        indices: &[u16],
    ) -> Result<Self, GpuError> {
        Self::build(gpu, vertices, layout, Some(indices))
    }

    /// The sprite unit quad.
    pub fn unit_quad(gpu: &mut impl GpuContext) -> Result<Self, GpuError> {
        Self::new(gpu, &QUAD_VERTICES, &QUAD_LAYOUT)
    }

    fn build(
        gpu: &mut impl GpuContext,
        vertices: &[f32],
        layout: &[VertexAttribute],
        indices: Option<&[u16]>,
    ) -> Result<Self, GpuError> {
        let stride = layout.first().map(|a| a.stride).unwrap_or(0) as usize;
        if stride == 0 || vertices.is_empty() || vertices.len() % stride != 0 {
            return Err(GpuError::InvalidVertexData {
                len: vertices.len(),
            });
        }

        let vertex_array = gpu.create_vertex_array()?;
        gpu.bind_vertex_array(Some(vertex_array));

        let vertex_buffer = match gpu.create_vertex_buffer(vertices) {
            Ok(buffer) => buffer,
            Err(e) => {
                gpu.bind_vertex_array(None);
                gpu.delete_vertex_array(vertex_array);
                return Err(e);
            }
        };
        for attribute in layout {
            gpu.enable_vertex_attribute(*attribute);
        }

        let element_buffer = match indices {
            Some(indices) => match gpu.create_element_buffer(indices) {
                Ok(buffer) => Some(buffer),
                Err(e) => {
                    gpu.bind_vertex_array(None);
                    gpu.delete_buffer(vertex_buffer);
                    gpu.delete_vertex_array(vertex_array);
                    return Err(e);
                }
            },
            None => None,
        };

        gpu.bind_vertex_array(None);
        gpu.bind_vertex_buffer(None);

        let vertex_count = (vertices.len() / stride) as u32;
        debug!(
            "geometry buffer {:?}: {} vertices, {} indices",
            vertex_array,
            vertex_count,
            indices.map_or(0, |i| i.len())
        );

        Ok(Self {
            vertex_array: Some(vertex_array),
            vertex_buffer: Some(vertex_buffer),
            element_buffer,
            vertex_count,
            index_count: indices.map_or(0, |i| i.len() as u32),
        })
    }

    /// Make this geometry's vertex array current. Must precede any draw.
    pub fn bind(&self, gpu: &mut impl GpuContext) {
        gpu.bind_vertex_array(self.vertex_array);
    }

    pub fn unbind(&self, gpu: &mut impl GpuContext) {
        gpu.bind_vertex_array(None);
    }

    pub fn vertex_array(&self) -> Option<VertexArrayId> {
        self.vertex_array
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_released(&self) -> bool {
        self.vertex_array.is_none()
    }

    /// Release the GPU objects.
    ///
    /// The vertex array is only deleted if the context still reports it live,
    /// and a second call is a no-op.
    pub fn release(&mut self, gpu: &mut impl GpuContext) {
        if let Some(vao) = self.vertex_array.take() {
            if gpu.is_vertex_array(vao) {
                gpu.delete_vertex_array(vao);
            } else {
                debug!("vertex array {:?} already gone, skipping delete", vao);
            }
        }
        if let Some(vbo) = self.vertex_buffer.take() {
            gpu.delete_buffer(vbo);
        }
        if let Some(ebo) = self.element_buffer.take() {
            gpu.delete_buffer(ebo);
        }
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        if let Some(vao) = self.vertex_array {
            warn!("geometry buffer {:?} dropped without release", vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{GpuCall, RecordingGpu};

    #[test]
    fn test_unit_quad_has_six_vertices() {
        let mut gpu = RecordingGpu::new();
        let mut quad = GeometryBuffer::unit_quad(&mut gpu).unwrap();
        assert_eq!(quad.vertex_count(), 6);
        assert_eq!(quad.index_count(), 0);
        assert_eq!(gpu.live_vertex_array_count(), 1);
        // init leaves nothing bound
        assert_eq!(gpu.bound_vertex_array(), None);
        quad.release(&mut gpu);
    }

    #[test]
    fn test_layout_is_vec4_stride_four() {
        let mut gpu = RecordingGpu::new();
        let mut quad = GeometryBuffer::unit_quad(&mut gpu).unwrap();
        let attr = gpu.calls().iter().find_map(|c| match c {
            GpuCall::EnableVertexAttribute(a) => Some(*a),
            _ => None,
        });
        assert_eq!(
            attr,
            Some(VertexAttribute {
                location: 0,
                components: 4,
                stride: 4,
                offset: 0
            })
        );
        quad.release(&mut gpu);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut gpu = RecordingGpu::new();
        let mut quad = GeometryBuffer::unit_quad(&mut gpu).unwrap();
        quad.release(&mut gpu);
        quad.release(&mut gpu);
        assert!(quad.is_released());
        assert_eq!(gpu.live_vertex_array_count(), 0);
        assert_eq!(gpu.live_buffer_count(), 0);
        let deletes = gpu
            .calls()
            .iter()
            .filter(|c| matches!(c, GpuCall::DeleteVertexArray(_)))
            .count();
        assert_eq!(deletes, 1);
    }

    #[test]
    fn test_release_skips_vertex_array_already_deleted() {
        let mut gpu = RecordingGpu::new();
        let mut quad = GeometryBuffer::unit_quad(&mut gpu).unwrap();
        let vao = quad.vertex_array().unwrap();
        gpu.delete_vertex_array(vao);
        gpu.clear_log();

        quad.release(&mut gpu);
        assert!(
            !gpu.calls()
                .iter()
                .any(|c| matches!(c, GpuCall::DeleteVertexArray(_)))
        );
    }

    #[test]
    fn test_rejects_partial_vertex() {
        let mut gpu = RecordingGpu::new();
        let err = GeometryBuffer::new(&mut gpu, &[0.0; 10], &QUAD_LAYOUT).unwrap_err();
        assert!(matches!(err, GpuError::InvalidVertexData { len: 10 }));
        assert_eq!(gpu.live_vertex_array_count(), 0);
    }

    #[test]
    fn test_without_context_fails() {
        let mut gpu = RecordingGpu::without_context();
        let err = GeometryBuffer::unit_quad(&mut gpu).unwrap_err();
        assert!(matches!(err, GpuError::NoContext));
    }

    #[test]
    fn test_indexed_geometry() {
        let mut gpu = RecordingGpu::new();
        let layout = [VertexAttribute {
            location: 0,
            components: 3,
            stride: 3,
            offset: 0,
        }];
        let mut rect =
            GeometryBuffer::with_indices(&mut gpu, &[0.0; 12], &layout, &[0, 1, 3, 1, 2, 3])
                .unwrap();
        assert_eq!(rect.vertex_count(), 4);
        assert_eq!(rect.index_count(), 6);
        assert_eq!(gpu.live_buffer_count(), 2);
        rect.release(&mut gpu);
        assert_eq!(gpu.live_buffer_count(), 0);
    }
}
