//! Triangle test harness.
//!
//! Opens a window and draws an indexed rectangle (two triangles sharing four
//! vertices) with a flat-colour program until the window is closed or Escape
//! is pressed. Useful to check the geometry buffer and element buffer path on
//! a new machine before anything textured is involved.

use glam::Vec3;
use log::info;
use raylib::prelude::*;

use crate::render::geometry::GeometryBuffer;
use crate::render::gpu::{GpuContext, GpuError, ProgramId, UniformValue, VertexAttribute};
use crate::render::raylibgpu::RaylibGpu;
use crate::resources::gameconfig::GameConfig;

pub const FLAT_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

pub const FLAT_FRAGMENT_SHADER: &str = r#"#version 330 core
uniform vec3 flatColor;
out vec4 FragColor;
void main()
{
    FragColor = vec4(flatColor, 1.0);
}
"#;

/// Rectangle corners in clip space: top right, bottom right, bottom left, top left.
#[rustfmt::skip]
pub const RECT_VERTICES: [f32; 12] = [
     0.5,  0.5, 0.0,
     0.5, -0.5, 0.0,
    -0.5, -0.5, 0.0,
    -0.5,  0.5, 0.0,
];

pub const RECT_INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];

pub const RECT_COLOR: Vec3 = Vec3::new(1.0, 0.05, 0.9);

const RECT_LAYOUT: [VertexAttribute; 1] = [VertexAttribute {
    location: 0,
    components: 3,
    stride: 3,
    offset: 0,
}];

/// GPU objects of the harness scene.
#[derive(Debug)]
pub struct TriangleScene {
    geometry: GeometryBuffer,
    program: ProgramId,
}

impl TriangleScene {
    pub fn new(gpu: &mut impl GpuContext) -> Result<Self, GpuError> {
        let program = gpu.create_program(FLAT_VERTEX_SHADER, FLAT_FRAGMENT_SHADER)?;
        let geometry =
            match GeometryBuffer::with_indices(gpu, &RECT_VERTICES, &RECT_LAYOUT, &RECT_INDICES) {
                Ok(geometry) => geometry,
                Err(e) => {
                    gpu.delete_program(program);
                    return Err(e);
                }
            };
        Ok(Self { geometry, program })
    }

    pub fn geometry(&self) -> &GeometryBuffer {
        &self.geometry
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn draw(&self, gpu: &mut impl GpuContext) {
        gpu.use_program(self.program);
        gpu.set_uniform(self.program, "flatColor", UniformValue::Vec3(RECT_COLOR));
        self.geometry.bind(gpu);
        gpu.draw_indexed_triangles(self.geometry.index_count());
        self.geometry.unbind(gpu);
    }

    pub fn destroy(mut self, gpu: &mut impl GpuContext) {
        self.geometry.release(gpu);
        gpu.delete_program(self.program);
    }
}

/// Run the harness window until it is closed.
pub fn run_triangle_test(config: &GameConfig) -> Result<(), GpuError> {
    let (width, height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("Triangle test")
        .build();
    rl.set_target_fps(config.target_fps);
    rl.set_exit_key(Some(KeyboardKey::KEY_ESCAPE));

    let mut gpu = RaylibGpu::new();
    let scene = TriangleScene::new(&mut gpu)?;
    info!("triangle test running, press Escape to quit");

    while !rl.window_should_close() {
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::new(0, 25, 51, 255));
        gpu.flush_batch();
        scene.draw(&mut gpu);
    }

    scene.destroy(&mut gpu);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingGpu;

    #[test]
    fn test_scene_draws_six_indices() {
        let mut gpu = RecordingGpu::new();
        let scene = TriangleScene::new(&mut gpu).unwrap();
        assert_eq!(scene.geometry().vertex_count(), 4);
        assert_eq!(scene.geometry().index_count(), 6);

        scene.draw(&mut gpu);
        let draw = &gpu.draws()[0];
        assert!(draw.indexed);
        assert_eq!(draw.count, 6);
        assert_eq!(draw.program, Some(scene.program()));
        assert_eq!(draw.vertex_array, scene.geometry().vertex_array());
        assert_eq!(draw.uniform("flatColor"), Some(UniformValue::Vec3(RECT_COLOR)));
        assert_eq!(gpu.bound_vertex_array(), None);

        scene.destroy(&mut gpu);
        assert_eq!(gpu.live_vertex_array_count(), 0);
        assert_eq!(gpu.live_buffer_count(), 0);
    }

    #[test]
    fn test_scene_fails_without_context() {
        let mut gpu = RecordingGpu::without_context();
        assert!(TriangleScene::new(&mut gpu).is_err());
    }
}
