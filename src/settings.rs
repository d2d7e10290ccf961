//! Driver settings with persistence
//!
//! Settings live in `~/.config/marionette/`: `settings.toml` for the driver
//! loop and `controller.toml` for controller tuning.

use std::fs;
use std::path::{Path, PathBuf};

use marionette_core::TimeConfig;
use marionette_game::ControllerConfig;
use marionette_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All driver settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub time: TimeConfig,
    pub run: RunSettings,
}

/// How long and how fast the headless run goes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Number of frames to simulate
    pub frames: u64,
    /// Simulated frame delta in seconds
    pub frame_delta: f32,
    /// Log a state summary every N frames (0 = never)
    pub summary_interval: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            frames: 320,
            frame_delta: 1.0 / 60.0,
            summary_interval: 30,
        }
    }
}

impl DriverSettings {
    /// Physics world configuration stepping at the driver's fixed timestep
    pub fn physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            timestep: self.time.fixed_timestep,
            ..PhysicsConfig::default()
        }
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("marionette"))
    }

    /// Load settings from a file, or return defaults if not found
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load from the default config directory
    pub fn load_default() -> Self {
        let Some(dir) = Self::config_dir() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load(&dir.join("settings.toml"))
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let path = dir.join("settings.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Load controller tuning from an explicit path, or the config directory
pub fn load_controller_config(path: Option<&Path>) -> ControllerConfig {
    match path {
        Some(path) => ControllerConfig::load(path),
        None => match DriverSettings::config_dir() {
            Some(dir) => ControllerConfig::load(&dir.join("controller.toml")),
            None => {
                warn!("Could not determine config directory");
                ControllerConfig::default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_time_table_keeps_other_defaults() {
        let settings: DriverSettings = toml::from_str("[time]\nfixed_timestep = 0.02\n").unwrap();
        assert_eq!(settings.time.fixed_timestep, 0.02);
        assert_eq!(settings.time.time_scale, 1.0);
        assert_eq!(settings.time.max_delta_time, TimeConfig::default().max_delta_time);
        assert_eq!(settings.run.frames, RunSettings::default().frames);
    }

    #[test]
    fn test_physics_steps_at_fixed_timestep() {
        let mut settings = DriverSettings::default();
        settings.time.fixed_timestep = 0.01;
        assert_eq!(settings.physics_config().timestep, 0.01);
    }
}
