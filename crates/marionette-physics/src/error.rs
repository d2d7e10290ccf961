use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
use thiserror::Error;

/// Errors raised when a handle no longer refers to a live physics object
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("Rigid body {0:?} not found in the physics world")]
    BodyNotFound(RigidBodyHandle),

    #[error("Collider {0:?} not found in the physics world")]
    ColliderNotFound(ColliderHandle),
}
