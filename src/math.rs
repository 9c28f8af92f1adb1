//! Sprite transforms and small float helpers.
//!
//! Every sprite is drawn from the same unit quad spanning `[0,1]×[0,1]`. The
//! model matrix built here places that quad in world space:
//!
//! ```text
//! translate(position) · translate(size/2) · rotate_z(deg) · translate(-size/2) · scale(size)
//! ```
//!
//! Read right to left: the quad is scaled to `size`, moved so its centre sits
//! on the origin, rotated, moved back and finally placed at `position`. The
//! rotation pivot is therefore always the sprite's own centre.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Build the model matrix for a sprite at `position` with `size`, rotated
/// `rotation_degrees` about its own centre.
pub fn sprite_transform(position: Vec2, size: Vec2, rotation_degrees: f32) -> Mat4 {
    let half = 0.5 * size;
    Mat4::from_translation(position.extend(0.0))
        * Mat4::from_translation(half.extend(0.0))
        * Mat4::from_rotation_z(rotation_degrees.to_radians())
        * Mat4::from_translation((-half).extend(0.0))
        * Mat4::from_scale(size.extend(1.0))
}

/// Horizontal flip of the unit quad about its vertical centre line (`x -> 1 - x`).
///
/// Post-multiplied onto a model matrix it mirrors the sampled texture while the
/// quad keeps covering the same world rectangle.
pub fn unit_quad_mirror() -> Mat4 {
    Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0))
}

/// Model matrix with optional mirroring applied in the quad's local space.
pub fn sprite_transform_mirrored(
    position: Vec2,
    size: Vec2,
    rotation_degrees: f32,
    mirror: bool,
) -> Mat4 {
    let model = sprite_transform(position, size, rotation_degrees);
    if mirror {
        model * unit_quad_mirror()
    } else {
        model
    }
}

/// Tolerant float comparison.
///
/// NaN is never equal to anything. Values that are both within `epsilon` of
/// zero compare by absolute difference, everything else by difference relative
/// to the sum of magnitudes.
pub fn nearly_equal(a: f32, b: f32, epsilon: f32) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a == b {
        return true;
    }

    let abs_a = a.abs();
    let abs_b = b.abs();
    let diff = (a - b).abs();

    if abs_a < epsilon && abs_b < epsilon {
        return diff < epsilon;
    }

    diff / (abs_a + abs_b) < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn apply(m: Mat4, x: f32, y: f32) -> Vec2 {
        m.transform_point3(Vec3::new(x, y, 0.0)).truncate()
    }

    fn vec_close(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn test_corners_without_rotation() {
        let p = Vec2::new(10.0, 20.0);
        let s = Vec2::new(30.0, 40.0);
        let m = sprite_transform(p, s, 0.0);
        assert!(vec_close(apply(m, 0.0, 0.0), p));
        assert!(vec_close(apply(m, 1.0, 1.0), p + s));
    }

    #[test]
    fn test_rotation_pivots_on_centre() {
        let p = Vec2::new(100.0, -50.0);
        let s = Vec2::new(20.0, 10.0);
        let centre = p + 0.5 * s;
        for deg in [0.0, 45.0, 90.0, 180.0, 270.0, 720.0, -33.0] {
            let m = sprite_transform(p, s, deg);
            assert!(vec_close(apply(m, 0.5, 0.5), centre), "deg={deg}");
        }
    }

    #[test]
    fn test_rotation_180_swaps_corners() {
        let p = Vec2::new(0.0, 0.0);
        let s = Vec2::new(4.0, 2.0);
        let m = sprite_transform(p, s, 180.0);
        assert!(vec_close(apply(m, 0.0, 0.0), Vec2::new(4.0, 2.0)));
        assert!(vec_close(apply(m, 1.0, 1.0), Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_rotation_wraps_at_360() {
        let p = Vec2::new(3.0, 7.0);
        let s = Vec2::new(5.0, 9.0);
        let a = sprite_transform(p, s, 30.0);
        let b = sprite_transform(p, s, 390.0);
        assert!(vec_close(apply(a, 1.0, 0.0), apply(b, 1.0, 0.0)));
    }

    #[test]
    fn test_mirror_keeps_bounds_and_swaps_sides() {
        let p = Vec2::new(10.0, 10.0);
        let s = Vec2::new(16.0, 8.0);
        let plain = sprite_transform_mirrored(p, s, 0.0, false);
        let flipped = sprite_transform_mirrored(p, s, 0.0, true);

        assert!(vec_close(apply(plain, 0.0, 0.0), apply(flipped, 1.0, 0.0)));
        assert!(vec_close(apply(plain, 1.0, 0.0), apply(flipped, 0.0, 0.0)));
        assert!(vec_close(apply(flipped, 0.0, 1.0), Vec2::new(26.0, 18.0)));
        assert!(vec_close(apply(flipped, 1.0, 1.0), Vec2::new(10.0, 18.0)));
    }

    #[test]
    fn test_nearly_equal() {
        assert!(nearly_equal(1.0, 1.0, 1e-6));
        assert!(nearly_equal(0.0, 1e-9, 1e-6));
        assert!(nearly_equal(1000.0, 1000.0001, 1e-6));
        assert!(!nearly_equal(1.0, 1.1, 1e-6));
        assert!(!nearly_equal(f32::NAN, f32::NAN, 1.0));
        assert!(nearly_equal(f32::INFINITY, f32::INFINITY, 1e-6));
    }
}
