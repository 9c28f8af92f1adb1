//! Sprite shading program.
//!
//! The vertex stage reads one `vec4` per vertex (`xy` position in the unit
//! quad, `zw` texcoord), remaps the texcoord into the atlas sub-rectangle and
//! applies `projection * view * model`. The fragment stage tints the sampled
//! texel with `spriteColor`.
//!
//! Per-draw inputs: `model`, `view`, `textureOffset`, `textureSize`,
//! `spriteColor`. `projection` and the `image` sampler are set once.

use glam::Mat4;

use super::gpu::{GpuContext, GpuError, ProgramId, UniformValue};

pub const SPRITE_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec4 vertex;

out vec2 TexCoords;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;
uniform vec2 textureOffset;
uniform vec2 textureSize;

void main()
{
    TexCoords = textureOffset + vertex.zw * textureSize;
    gl_Position = projection * view * model * vec4(vertex.xy, 0.0, 1.0);
}
"#;

pub const SPRITE_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 TexCoords;
out vec4 color;

uniform sampler2D image;
uniform vec3 spriteColor;

void main()
{
    color = vec4(spriteColor, 1.0) * texture(image, TexCoords);
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteShader {
    program: ProgramId,
}

impl SpriteShader {
    /// Compile the built-in sprite program.
    pub fn new(gpu: &mut impl GpuContext) -> Result<Self, GpuError> {
        Self::from_sources(gpu, SPRITE_VERTEX_SHADER, SPRITE_FRAGMENT_SHADER)
    }

    pub fn from_sources(
        gpu: &mut impl GpuContext,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, GpuError> {
        let program = gpu.create_program(vertex_src, fragment_src)?;
        gpu.use_program(program);
        gpu.set_uniform(program, "image", UniformValue::Int(0));
        Ok(Self { program })
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn activate(&self, gpu: &mut impl GpuContext) {
        gpu.use_program(self.program);
    }

    pub fn set(&self, gpu: &mut impl GpuContext, name: &str, value: UniformValue) {
        gpu.set_uniform(self.program, name, value);
    }

    /// Screen-space orthographic projection with the origin at the top-left.
    pub fn set_screen_projection(&self, gpu: &mut impl GpuContext, width: f32, height: f32) {
        let projection = Mat4::orthographic_rh_gl(0.0, width, height, 0.0, -1.0, 1.0);
        gpu.use_program(self.program);
        self.set(gpu, "projection", UniformValue::Mat4(projection));
    }

    pub fn delete(self, gpu: &mut impl GpuContext) {
        gpu.delete_program(self.program);
    }
}
