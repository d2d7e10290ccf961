//! Marionette Anim - Animator parameters, playback state and IK goals
//!
//! The controller talks to animation through the [`Animator`] trait: it sets
//! blend tree parameters, fires triggers, restarts states and writes IK goal
//! poses. [`AnimatorState`] is the in-process implementation used by the
//! driver binary and by tests.

mod animator;
mod goals;
mod params;

pub use animator::{Animator, AnimatorState, PlaybackState};
pub use goals::{IkGoal, IkGoalState, LookAtState};
pub use params::{smooth_damp, FloatParam};
