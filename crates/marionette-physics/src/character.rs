//! Rapier-backed implementation of the character physics capability

use glam::Vec3;
use marionette_core::Transform;

use crate::{
    CharacterBody, CharacterPhysics, LayerMask, PhysicsError, PhysicsQueries, PhysicsWorld,
    RagdollRig, SurfaceHit,
};

/// Borrows the world together with one character's body and rig for the
/// duration of a controller callback
pub struct RapierCharacter<'w> {
    pub world: &'w mut PhysicsWorld,
    pub body: &'w CharacterBody,
    pub rig: &'w RagdollRig,
}

impl<'w> RapierCharacter<'w> {
    pub fn new(world: &'w mut PhysicsWorld, body: &'w CharacterBody, rig: &'w RagdollRig) -> Self {
        Self { world, body, rig }
    }
}

impl PhysicsQueries for RapierCharacter<'_> {
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        self.world.check_sphere(center, radius, mask)
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.world.cast_ray(origin, direction, max_distance, mask)
    }
}

impl CharacterPhysics for RapierCharacter<'_> {
    fn body_pose(&self) -> Option<Transform> {
        self.body.pose(&*self.world)
    }

    fn apply_impulse(&mut self, impulse: Vec3) -> Result<(), PhysicsError> {
        self.body.apply_impulse(&mut *self.world, impulse)
    }

    fn teleport(&mut self, pose: Transform) -> Result<(), PhysicsError> {
        self.body.teleport(&mut *self.world, pose)?;
        self.world.refresh_queries();
        Ok(())
    }

    fn set_ragdoll_simulated(&mut self, simulated: bool) -> Result<(), PhysicsError> {
        self.rig.set_simulated(&mut *self.world, simulated)
    }

    fn ragdoll_root_pose(&self) -> Option<Transform> {
        self.rig.root_pose(&*self.world)
    }
}
