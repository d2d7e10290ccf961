//! Test doubles for the physics capability

use glam::Vec3;
use marionette_core::Transform;
use marionette_physics::{CharacterPhysics, LayerMask, PhysicsError, PhysicsQueries, SurfaceHit};

/// Flat ground at `ground_height` (reporting `ground_normal` on hits), a
/// character body and a ragdoll rig that only record what was asked of them
pub(crate) struct MockPhysics {
    pub ground_height: Option<f32>,
    pub ground_normal: Vec3,
    pub body: Option<Transform>,
    pub impulses: Vec<Vec3>,
    pub teleports: Vec<Transform>,
    pub ragdoll_simulated: bool,
    pub ragdoll_switches: usize,
    pub root_bone: Option<Transform>,
}

impl MockPhysics {
    pub fn on_ground() -> Self {
        Self {
            ground_height: Some(0.0),
            ground_normal: Vec3::Y,
            body: Some(Transform::default()),
            impulses: Vec::new(),
            teleports: Vec::new(),
            ragdoll_simulated: false,
            ragdoll_switches: 0,
            root_bone: Some(Transform::from_position(Vec3::new(0.0, 1.0, 0.0))),
        }
    }

    pub fn in_air() -> Self {
        Self {
            ground_height: None,
            ..Self::on_ground()
        }
    }
}

impl PhysicsQueries for MockPhysics {
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        mask.intersects(LayerMask::GROUND)
            && self
                .ground_height
                .is_some_and(|height| center.y - radius <= height)
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        if !mask.intersects(LayerMask::GROUND) || direction.y >= 0.0 {
            return None;
        }
        let height = self.ground_height?;
        let distance = (origin.y - height) / -direction.y;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }
        Some(SurfaceHit {
            distance,
            point: origin + direction * distance,
            normal: self.ground_normal,
        })
    }
}

impl CharacterPhysics for MockPhysics {
    fn body_pose(&self) -> Option<Transform> {
        self.body
    }

    fn apply_impulse(&mut self, impulse: Vec3) -> Result<(), PhysicsError> {
        self.impulses.push(impulse);
        Ok(())
    }

    fn teleport(&mut self, pose: Transform) -> Result<(), PhysicsError> {
        self.teleports.push(pose);
        self.body = Some(pose);
        Ok(())
    }

    fn set_ragdoll_simulated(&mut self, simulated: bool) -> Result<(), PhysicsError> {
        self.ragdoll_simulated = simulated;
        self.ragdoll_switches += 1;
        Ok(())
    }

    fn ragdoll_root_pose(&self) -> Option<Transform> {
        self.root_bone
    }
}
