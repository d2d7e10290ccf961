//! Marionette Core - Core types and utilities for the character runtime
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Transform for character roots, bones and IK goal poses
//! - Frame timing for the driver loop

pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{FrameTime, TimeConfig};
pub use types::{Color, Transform};
