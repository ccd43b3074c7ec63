//! Planar offset and rotation applied to loaded vertex positions.

use glam::Vec3;

/// 2D transform in the XY plane. Rotation uses the negated angle, matching the
/// convention of the tools that write offset/rotation metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    offset_x: f64,
    offset_y: f64,
    alpha: f64,
    cos_alpha: f64,
    sin_alpha: f64,
}

impl Transformation {
    pub fn new(offset_x: f64, offset_y: f64, alpha: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            alpha,
            cos_alpha: (-alpha).cos(),
            sin_alpha: (-alpha).sin(),
        }
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Rotate then translate `position` in XY; z is left untouched.
    pub fn apply(&self, position: Vec3) -> Vec3 {
        let x = position.x as f64;
        let y = position.y as f64;
        Vec3::new(
            (x * self.cos_alpha - y * self.sin_alpha + self.offset_x) as f32,
            (x * self.sin_alpha + y * self.cos_alpha + self.offset_y) as f32,
            position.z,
        )
    }

    pub fn apply_all(&self, positions: &mut [Vec3]) {
        for position in positions {
            *position = self.apply(*position);
        }
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translation_only() {
        let t = Transformation::new(5.0, -3.0, 0.0);
        assert_eq!(t.apply(Vec3::new(1.0, 2.0, 7.0)), Vec3::new(6.0, -1.0, 7.0));
    }

    #[test]
    fn test_rotation_uses_negated_angle() {
        let t = Transformation::new(0.0, 0.0, FRAC_PI_2);
        let p = t.apply(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_rotation_then_offset() {
        let t = Transformation::new(10.0, 20.0, FRAC_PI_2);
        let p = t.apply(Vec3::new(0.0, 1.0, 3.0));
        assert!((p - Vec3::new(11.0, 20.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_identity_default() {
        let t = Transformation::default();
        let mut positions = vec![Vec3::new(1.5, -2.5, 0.25), Vec3::ZERO];
        t.apply_all(&mut positions);
        assert_eq!(positions, vec![Vec3::new(1.5, -2.5, 0.25), Vec3::ZERO]);
    }
}
