//! Sprite renderer.
//!
//! Draws one textured, tinted and optionally mirrored unit quad per call. The
//! renderer owns the single quad [`GeometryBuffer`] and the sprite program;
//! both are released by [`SpriteRenderer::destroy`].
//!
//! Each draw binds the quad, activates the program, uploads `model`, `view`,
//! `textureOffset`, `textureSize` and `spriteColor`, binds the texture to unit
//! 0 and issues a single triangle-list draw. Nothing is restored afterwards.
//! UV values are passed through untouched; values outside `[0,1]` sample
//! according to the texture's wrap mode.

use bevy_ecs::prelude::Resource;
use glam::{Mat4, Vec2, Vec3};
use log::info;

use super::geometry::GeometryBuffer;
use super::gpu::{GpuContext, GpuError, TextureId, UniformValue, VertexAttribute};
use super::shader::SpriteShader;
use crate::math::sprite_transform_mirrored;

/// Normalized texture sub-rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub offset: Vec2,
    pub size: Vec2,
}

impl UvRect {
    /// The whole texture.
    pub const FULL: Self = Self {
        offset: Vec2::ZERO,
        size: Vec2::ONE,
    };

    pub fn new(offset: Vec2, size: Vec2) -> Self {
        Self { offset, size }
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// Placement and look of one sprite draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub position: Vec2,
    pub size: Vec2,
    /// Degrees about the sprite's centre.
    pub rotation: f32,
    pub color: Vec3,
    pub uv: UvRect,
    pub mirror: bool,
}

impl SpriteDraw {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
            color: Vec3::ONE,
            uv: UvRect::FULL,
            mirror: false,
        }
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn uv(mut self, uv: UvRect) -> Self {
        self.uv = uv;
        self
    }

    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn model(&self) -> Mat4 {
        sprite_transform_mirrored(self.position, self.size, self.rotation, self.mirror)
    }
}

#[derive(Resource, Debug)]
pub struct SpriteRenderer {
    shader: SpriteShader,
    quad: GeometryBuffer,
}

impl SpriteRenderer {
    /// Create a renderer drawing `vertices` (4 floats per vertex, `xy` + `uv`).
    pub fn new(
        gpu: &mut impl GpuContext,
        shader: SpriteShader,
        vertices: &[f32],
    ) -> Result<Self, GpuError> {
        let layout = [VertexAttribute {
            location: 0,
            components: 4,
            stride: 4,
            offset: 0,
        }];
        let quad = GeometryBuffer::new(gpu, vertices, &layout)?;
        info!(
            "sprite renderer ready (program {:?}, {} vertices)",
            shader.program(),
            quad.vertex_count()
        );
        Ok(Self { shader, quad })
    }

    /// Create a renderer using the built-in program and unit quad.
    pub fn with_default_quad(gpu: &mut impl GpuContext) -> Result<Self, GpuError> {
        let shader = SpriteShader::new(gpu)?;
        Self::new(gpu, shader, &super::geometry::QUAD_VERTICES)
    }

    pub fn shader(&self) -> &SpriteShader {
        &self.shader
    }

    pub fn geometry(&self) -> &GeometryBuffer {
        &self.quad
    }

    /// Draw with an explicit model matrix.
    pub fn draw_model(
        &self,
        gpu: &mut impl GpuContext,
        texture: TextureId,
        model: Mat4,
        color: Vec3,
        uv: UvRect,
        view: &Mat4,
    ) {
        self.quad.bind(gpu);
        self.shader.activate(gpu);
        self.shader.set(gpu, "model", UniformValue::Mat4(model));
        self.shader.set(gpu, "view", UniformValue::Mat4(*view));
        self.shader
            .set(gpu, "textureOffset", UniformValue::Vec2(uv.offset));
        self.shader.set(gpu, "textureSize", UniformValue::Vec2(uv.size));
        self.shader.set(gpu, "spriteColor", UniformValue::Vec3(color));

        gpu.active_texture_unit(0);
        gpu.bind_texture(texture);

        gpu.draw_triangles(0, self.quad.vertex_count());
    }

    /// Draw a sprite placed by position, size and rotation.
    pub fn draw(
        &self,
        gpu: &mut impl GpuContext,
        texture: TextureId,
        sprite: &SpriteDraw,
        view: &Mat4,
    ) {
        self.draw_model(gpu, texture, sprite.model(), sprite.color, sprite.uv, view);
    }

    /// Release the quad geometry and the program.
    pub fn destroy(mut self, gpu: &mut impl GpuContext) {
        self.quad.release(gpu);
        self.shader.delete(gpu);
        info!("sprite renderer destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gpu::GpuContext;
    use crate::render::recording::RecordingGpu;

    fn renderer(gpu: &mut RecordingGpu) -> SpriteRenderer {
        SpriteRenderer::with_default_quad(gpu).unwrap()
    }

    #[test]
    fn test_draw_model_sets_every_input() {
        let mut gpu = RecordingGpu::new();
        let r = renderer(&mut gpu);
        let model = Mat4::from_translation(Vec3::new(5.0, 6.0, 0.0));
        let view = Mat4::from_scale(Vec3::splat(2.0));
        let uv = UvRect::new(Vec2::new(0.25, 0.5), Vec2::new(0.25, 0.5));
        let color = Vec3::new(1.0, 0.5, 0.25);

        r.draw_model(&mut gpu, TextureId(77), model, color, uv, &view);

        let draw = &gpu.draws()[0];
        assert_eq!(draw.count, 6);
        assert!(!draw.indexed);
        assert_eq!(draw.texture, Some(TextureId(77)));
        assert_eq!(draw.texture_unit, 0);
        assert_eq!(draw.vertex_array, r.geometry().vertex_array());
        assert_eq!(draw.program, Some(r.shader().program()));
        assert_eq!(draw.uniform("model"), Some(UniformValue::Mat4(model)));
        assert_eq!(draw.uniform("view"), Some(UniformValue::Mat4(view)));
        assert_eq!(
            draw.uniform("textureOffset"),
            Some(UniformValue::Vec2(uv.offset))
        );
        assert_eq!(draw.uniform("textureSize"), Some(UniformValue::Vec2(uv.size)));
        assert_eq!(draw.uniform("spriteColor"), Some(UniformValue::Vec3(color)));
        r.destroy(&mut gpu);
    }

    #[test]
    fn test_uv_out_of_range_passes_through() {
        let mut gpu = RecordingGpu::new();
        let r = renderer(&mut gpu);
        let uv = UvRect::new(Vec2::new(-1.0, 3.0), Vec2::new(2.0, 2.0));
        let sprite = SpriteDraw::new(Vec2::ZERO, Vec2::ONE).uv(uv);
        r.draw(&mut gpu, TextureId(1), &sprite, &Mat4::IDENTITY);
        assert_eq!(
            gpu.draws()[0].uniform("textureOffset"),
            Some(UniformValue::Vec2(Vec2::new(-1.0, 3.0)))
        );
        r.destroy(&mut gpu);
    }

    #[test]
    fn test_draw_leaves_quad_bound() {
        let mut gpu = RecordingGpu::new();
        let r = renderer(&mut gpu);
        r.draw(
            &mut gpu,
            TextureId(1),
            &SpriteDraw::new(Vec2::ZERO, Vec2::ONE),
            &Mat4::IDENTITY,
        );
        assert_eq!(gpu.bound_vertex_array(), r.geometry().vertex_array());
        r.destroy(&mut gpu);
    }

    #[test]
    fn test_destroy_releases_geometry() {
        let mut gpu = RecordingGpu::new();
        let r = renderer(&mut gpu);
        assert_eq!(gpu.live_vertex_array_count(), 1);
        r.destroy(&mut gpu);
        assert_eq!(gpu.live_vertex_array_count(), 0);
    }

    #[test]
    fn test_new_fails_without_context() {
        let mut gpu = RecordingGpu::without_context();
        assert!(matches!(
            SpriteRenderer::with_default_quad(&mut gpu),
            Err(GpuError::NoContext)
        ));
    }

    #[test]
    fn test_vertex_array_deleted_elsewhere_is_not_deleted_twice() {
        let mut gpu = RecordingGpu::new();
        let r = renderer(&mut gpu);
        let vao = r.geometry().vertex_array().unwrap();
        gpu.delete_vertex_array(vao);
        r.destroy(&mut gpu);
        assert_eq!(gpu.live_vertex_array_count(), 0);
    }
}
