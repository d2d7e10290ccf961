use marionette_physics::PhysicsError;
use thiserror::Error;

/// Errors raised by controller commands
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    #[error("Ragdoll rig has no root bone to stand up from")]
    MissingRootBone,

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
}

/// Errors raised while loading controller configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
