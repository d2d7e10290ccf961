//! Character body: a dynamic capsule that receives jump impulses

use glam::Vec3;
use marionette_core::Transform;
use rapier3d::prelude::*;

use crate::{isometry_from_pose, LayerMask, PhysicsError, PhysicsWorld};

/// Character body configuration
#[derive(Debug, Clone)]
pub struct CharacterBodyConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.3m)
    pub radius: f32,
    /// Body mass in kilograms (default: 1.0, so impulses map to velocity)
    pub mass: f32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.3,
            mass: 1.0,
        }
    }
}

/// The character's rigid body and capsule collider.
///
/// The body position is the character root (feet), the capsule is offset
/// upwards by half its height. Rotations are locked so the capsule never tips.
pub struct CharacterBody {
    /// Configuration
    pub config: CharacterBodyConfig,
    /// Rigid body handle
    pub body_handle: RigidBodyHandle,
    /// Capsule collider handle
    pub collider_handle: ColliderHandle,
}

impl CharacterBody {
    /// Spawn a character body with default config
    pub fn spawn(physics: &mut PhysicsWorld, pose: Transform) -> Self {
        Self::spawn_with_config(physics, pose, CharacterBodyConfig::default())
    }

    /// Spawn a character body in the physics world
    pub fn spawn_with_config(
        physics: &mut PhysicsWorld,
        pose: Transform,
        config: CharacterBodyConfig,
    ) -> Self {
        let rigid_body = RigidBodyBuilder::dynamic()
            .position(isometry_from_pose(&pose))
            .lock_rotations()
            .build();

        let half_height = (config.height - 2.0 * config.radius) / 2.0;
        let collider = ColliderBuilder::capsule_y(half_height.max(0.01), config.radius)
            .translation(vector![0.0, config.height / 2.0, 0.0])
            .collision_groups(LayerMask::CHARACTER.membership())
            .mass(config.mass)
            .friction(0.0) // Smooth sliding against walls
            .restitution(0.0)
            .build();

        let (body_handle, collider_handle) = physics.add_body(rigid_body, collider);

        Self {
            config,
            body_handle,
            collider_handle,
        }
    }

    /// Current pose of the character root
    pub fn pose(&self, physics: &PhysicsWorld) -> Option<Transform> {
        physics.body_pose(self.body_handle)
    }

    /// Apply an instantaneous impulse to the body
    pub fn apply_impulse(&self, physics: &mut PhysicsWorld, impulse: Vec3) -> Result<(), PhysicsError> {
        let body = physics
            .get_rigid_body_mut(self.body_handle)
            .ok_or(PhysicsError::BodyNotFound(self.body_handle))?;
        body.apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
        Ok(())
    }

    /// Set the body's pose directly and clear its velocity
    pub fn teleport(&self, physics: &mut PhysicsWorld, pose: Transform) -> Result<(), PhysicsError> {
        let body = physics
            .get_rigid_body_mut(self.body_handle)
            .ok_or(PhysicsError::BodyNotFound(self.body_handle))?;
        body.set_position(isometry_from_pose(&pose), true);
        body.set_linvel(vector![0.0, 0.0, 0.0], true);
        body.set_angvel(vector![0.0, 0.0, 0.0], true);
        Ok(())
    }

    /// Linear velocity of the body
    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let v = body.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }
}
