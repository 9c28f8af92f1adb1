//! 2D camera resource.
//!
//! Supplies the view matrix that every draw call receives explicitly. Update
//! this resource to pan or zoom the view.

use bevy_ecs::prelude::Resource;
use glam::{Mat4, Vec2};

/// `target` is the world point shown at screen-space `offset`.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub target: Vec2,
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset.extend(0.0))
            * Mat4::from_scale(glam::Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation((-self.target).extend(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_default_view_is_identity() {
        assert_eq!(Camera2D::default().view_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_target_maps_to_offset() {
        let cam = Camera2D {
            target: Vec2::new(100.0, 50.0),
            offset: Vec2::new(400.0, 300.0),
            zoom: 2.0,
        };
        let p = cam
            .view_matrix()
            .transform_point3(Vec3::new(100.0, 50.0, 0.0));
        assert!((p - Vec3::new(400.0, 300.0, 0.0)).length() < 1e-4);
        let q = cam
            .view_matrix()
            .transform_point3(Vec3::new(110.0, 50.0, 0.0));
        assert!((q.x - 420.0).abs() < 1e-4);
    }
}
