//! Controller configuration and tuning constants
//!
//! Loaded from TOML; any field left out falls back to its default.

use std::fs;
use std::path::Path;

use glam::Vec3;
use marionette_physics::LayerMask;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// What a foot does on a frame where its ground ray misses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootMissPolicy {
    /// Drop the foot's IK weights to 0 so the animated pose plays untouched
    #[default]
    Release,
    /// Leave weights as the previous frame set them
    Hold,
}

/// Names of the animator parameters and states the controller drives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorNames {
    /// Float fed to the locomotion blend tree
    pub speed: String,
    /// Bool raised on jump, cleared by the jump-ended clip event
    pub is_jumping: String,
    /// One-shot trigger for attacks
    pub attack: String,
    /// State played after standing up from ragdoll
    pub idle_state: String,
    /// Layer the idle state lives on
    pub idle_layer: usize,
}

impl Default for AnimatorNames {
    fn default() -> Self {
        Self {
            speed: "Speed".to_string(),
            is_jumping: "IsJumping".to_string(),
            attack: "Attack".to_string(),
            idle_state: "Idle".to_string(),
            idle_layer: 0,
        }
    }
}

/// Tuning for the character animation controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Speed parameter while walking
    pub walk_speed_param: f32,
    /// Speed parameter while running
    pub run_speed_param: f32,
    /// Input magnitude at or below this counts as no input
    pub input_dead_zone: f32,
    /// Damping time for the speed parameter in seconds
    pub speed_damp_time: f32,
    /// Upward impulse applied on jump
    pub jump_impulse: f32,
    /// Radius of the ground check sphere
    pub ground_check_radius: f32,
    /// Ground check point relative to the character root
    pub ground_check_offset: Vec3,
    /// Layers that count as ground
    pub ground_mask: LayerMask,
    /// How far above the animated foot the ground ray starts
    pub foot_ray_lift: f32,
    /// Ground ray length
    pub foot_ray_length: f32,
    pub foot_miss_policy: FootMissPolicy,
    /// Whether IK starts enabled
    pub ik_enabled: bool,
    pub animator: AnimatorNames,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed_param: 0.5,
            run_speed_param: 1.0,
            input_dead_zone: 0.1,
            speed_damp_time: 0.1,
            jump_impulse: 5.5,
            ground_check_radius: 0.2,
            ground_check_offset: Vec3::new(0.0, 0.1, 0.0),
            ground_mask: LayerMask::GROUND,
            foot_ray_lift: 0.5,
            foot_ray_length: 1.0,
            foot_miss_policy: FootMissPolicy::Release,
            ik_enabled: true,
            animator: AnimatorNames::default(),
        }
    }
}

impl ControllerConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a config file, or return defaults if missing or invalid
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No controller config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded controller config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
