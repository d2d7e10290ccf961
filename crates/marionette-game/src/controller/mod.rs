//! Character animation controller module
//!
//! Drives animation parameters, jump, ragdoll and procedural IK for one
//! character from per-frame input.

mod character;
mod events;
mod ground;
mod ik;
mod locomotion;
mod ragdoll;

pub use character::{CharacterAnimationController, CharacterState};
pub use events::ControllerEvent;
pub use ground::GroundSensor;
pub use ik::{IkAdjuster, IkTargets};
pub use locomotion::{planar_input, target_speed};
pub use ragdoll::{RagdollCause, RagdollMode, RagdollSwitch};
