//! Capability traits the character controller drives physics through
//!
//! The controller never touches rapier directly. `PhysicsWorld` and
//! `RapierCharacter` implement these traits; tests implement them with mocks.

use glam::Vec3;
use marionette_core::Transform;

use crate::{LayerMask, PhysicsError};

/// Ray hit against a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
}

/// Read-only scene queries
pub trait PhysicsQueries {
    /// True if a sphere overlaps any collider on a layer in `mask`
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// First hit of a ray against colliders on a layer in `mask`
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;
}

/// Physics state owned by one character: its body and its ragdoll rig
pub trait CharacterPhysics: PhysicsQueries {
    /// Current pose of the character body, if it exists
    fn body_pose(&self) -> Option<Transform>;

    /// Apply an instantaneous impulse to the character body
    fn apply_impulse(&mut self, impulse: Vec3) -> Result<(), PhysicsError>;

    /// Move the character body to a pose and clear its velocity
    fn teleport(&mut self, pose: Transform) -> Result<(), PhysicsError>;

    /// Switch every ragdoll body between dynamic (true) and kinematic (false),
    /// enabling or disabling the ragdoll colliders to match
    fn set_ragdoll_simulated(&mut self, simulated: bool) -> Result<(), PhysicsError>;

    /// World pose of the ragdoll root bone, `None` if the rig has no root
    fn ragdoll_root_pose(&self) -> Option<Transform>;
}
