//! Ground sensor: sphere overlap under the character's feet

use glam::Vec3;
use marionette_core::{Color, Transform};
use marionette_physics::{LayerMask, PhysicsQueries};

use crate::config::ControllerConfig;
use crate::gizmo::GizmoSink;

/// Sphere test at a point attached to the character root
#[derive(Debug, Clone, PartialEq)]
pub struct GroundSensor {
    /// Check point relative to the character root
    pub offset: Vec3,
    pub radius: f32,
    pub mask: LayerMask,
}

impl GroundSensor {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            offset: config.ground_check_offset,
            radius: config.ground_check_radius,
            mask: config.ground_mask,
        }
    }

    /// World-space check point for a character root pose
    pub fn check_point(&self, root: &Transform) -> Vec3 {
        root.transform_point(self.offset)
    }

    pub fn is_grounded(&self, physics: &impl PhysicsQueries, root: &Transform) -> bool {
        physics.check_sphere(self.check_point(root), self.radius, self.mask)
    }

    /// Draw the check sphere: green when grounded, red otherwise
    pub fn draw(&self, physics: &impl PhysicsQueries, root: &Transform, sink: &mut impl GizmoSink) {
        let color = if self.is_grounded(physics, root) {
            Color::GREEN
        } else {
            Color::RED
        };
        sink.draw_sphere(self.check_point(root), self.radius, color);
    }
}
