//! Marionette Game - Character animation controller
//!
//! Provides input mapping, the character animation controller (locomotion,
//! jump, attack, ragdoll and procedural IK), its configuration and debug
//! gizmos.

pub mod config;
pub mod controller;
pub mod error;
pub mod gizmo;
pub mod input;

#[cfg(test)]
mod testing;

pub use config::{AnimatorNames, ControllerConfig, FootMissPolicy};
pub use controller::{
    CharacterAnimationController, CharacterState, ControllerEvent, GroundSensor, IkAdjuster,
    IkTargets, RagdollCause, RagdollMode, RagdollSwitch,
};
pub use error::{ConfigError, ControllerError};
pub use gizmo::{GizmoBuffer, GizmoShape, GizmoSink};
pub use input::{InputAction, InputBindings, InputHandler, InputState};
