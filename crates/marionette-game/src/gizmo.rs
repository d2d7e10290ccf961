//! Debug gizmo drawing

use glam::Vec3;
use marionette_core::Color;

/// Receives debug shapes from the controller
pub trait GizmoSink {
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Color);
}

/// A recorded debug shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GizmoShape {
    Sphere { center: Vec3, radius: f32, color: Color },
}

/// Collects shapes for a frame so the driver can log or render them
#[derive(Debug, Default)]
pub struct GizmoBuffer {
    pub shapes: Vec<GizmoShape>,
}

impl GizmoBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded shapes, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<GizmoShape> {
        std::mem::take(&mut self.shapes)
    }
}

impl GizmoSink for GizmoBuffer {
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        self.shapes.push(GizmoShape::Sphere { center, radius, color });
    }
}
