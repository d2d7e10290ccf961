//! Input to locomotion speed mapping

use glam::{Vec2, Vec3};

use crate::config::ControllerConfig;

/// Planar input vector `(h, 0, v)`, normalized (zero stays zero)
pub fn planar_input(axes: Vec2) -> Vec3 {
    Vec3::new(axes.x, 0.0, axes.y).normalize_or_zero()
}

/// Target value for the locomotion speed parameter
pub fn target_speed(input: Vec3, running: bool, config: &ControllerConfig) -> f32 {
    if input.length() > config.input_dead_zone {
        if running {
            config.run_speed_param
        } else {
            config.walk_speed_param
        }
    } else {
        0.0
    }
}
