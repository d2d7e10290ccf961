//! Core types shared by the physics, animation and controller crates

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space pose: position and rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Transform a point from local space into world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Interpolate position and rotation independently.
    ///
    /// `position_t` and `rotation_t` are clamped to `[0, 1]`; this is how IK
    /// goal weights blend an animated pose towards a target pose.
    pub fn blend(a: &Transform, b: &Transform, position_t: f32, rotation_t: f32) -> Transform {
        Transform {
            position: a.position.lerp(b.position, position_t.clamp(0.0, 1.0)),
            rotation: a.rotation.slerp(b.rotation, rotation_t.clamp(0.0, 1.0)),
        }
    }
}

/// RGBA color with floating point components (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);

    /// Create a color from RGB values (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA values
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to an array [r, g, b, a]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point() {
        let transform = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let world = transform.transform_point(Vec3::new(0.0, 0.1, 1.0));
        assert!((world - Vec3::new(2.0, 0.1, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_blend_weights() {
        let a = Transform::from_position(Vec3::ZERO);
        let b = Transform::from_position_rotation(
            Vec3::new(0.0, 2.0, 0.0),
            Quat::from_rotation_x(1.0),
        );

        let none = Transform::blend(&a, &b, 0.0, 0.0);
        assert_eq!(none, a);

        let full = Transform::blend(&a, &b, 1.0, 1.0);
        assert!((full.position - b.position).length() < 1e-6);
        assert!(full.rotation.angle_between(b.rotation) < 1e-4);

        let half = Transform::blend(&a, &b, 0.5, 0.0);
        assert!((half.position.y - 1.0).abs() < 1e-6);
        assert_eq!(half.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_color_array() {
        assert_eq!(Color::GREEN.to_array(), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(Color::rgba(0.1, 0.2, 0.3, 0.4).a, 0.4);
    }
}
