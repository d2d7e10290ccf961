//! Ragdoll rig: bone bodies that are kinematic while animated and dynamic
//! while ragdolled

use glam::Vec3;
use marionette_core::Transform;
use rapier3d::prelude::*;
use tracing::debug;

use crate::{isometry_from_pose, LayerMask, PhysicsError, PhysicsWorld};

/// One simulated bone: a body and the collider attached to it
#[derive(Debug, Clone)]
pub struct RagdollBone {
    pub name: String,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    /// Bind position relative to the character root
    pub local_offset: Vec3,
}

/// Set of ragdoll bones plus the designated root bone (hips)
#[derive(Debug, Clone, Default)]
pub struct RagdollRig {
    pub bones: Vec<RagdollBone>,
    /// Index into `bones` of the root bone
    pub root: Option<usize>,
}

/// (name, parent index, offset from parent or root, capsule half height, radius)
const HUMANOID_BONES: &[(&str, Option<usize>, [f32; 3], f32, f32)] = &[
    ("hips", None, [0.0, 1.0, 0.0], 0.08, 0.14),
    ("spine", Some(0), [0.0, 0.3, 0.0], 0.12, 0.14),
    ("head", Some(1), [0.0, 0.4, 0.0], 0.02, 0.11),
    ("upper_arm_l", Some(1), [-0.25, 0.2, 0.0], 0.12, 0.05),
    ("upper_arm_r", Some(1), [0.25, 0.2, 0.0], 0.12, 0.05),
    ("thigh_l", Some(0), [-0.1, -0.3, 0.0], 0.18, 0.07),
    ("thigh_r", Some(0), [0.1, -0.3, 0.0], 0.18, 0.07),
    ("shin_l", Some(5), [0.0, -0.45, 0.0], 0.18, 0.05),
    ("shin_r", Some(6), [0.0, -0.45, 0.0], 0.18, 0.05),
];

impl RagdollRig {
    /// Create an empty rig
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a simple humanoid rig rooted at `pose`, starting kinematic with
    /// colliders disabled (animated state)
    pub fn spawn_humanoid(physics: &mut PhysicsWorld, pose: Transform) -> Self {
        let mut rig = Self::new();
        let mut local_positions: Vec<Vec3> = Vec::with_capacity(HUMANOID_BONES.len());

        for (name, parent, offset, half_height, radius) in HUMANOID_BONES {
            let offset = Vec3::from_array(*offset);
            let local = match parent {
                Some(index) => local_positions[*index] + offset,
                None => offset,
            };
            local_positions.push(local);

            let bone_pose = Transform::from_position_rotation(pose.transform_point(local), pose.rotation);
            let body = RigidBodyBuilder::kinematic_position_based()
                .position(isometry_from_pose(&bone_pose))
                .build();
            let collider = ColliderBuilder::capsule_y(*half_height, *radius)
                .collision_groups(LayerMask::RAGDOLL.membership())
                .enabled(false)
                .build();
            let (body_handle, collider_handle) = physics.add_body(body, collider);

            if let Some(index) = parent {
                physics.add_spherical_joint(rig.bones[*index].body, body_handle, offset, Vec3::ZERO);
            } else {
                rig.root = Some(rig.bones.len());
            }

            rig.bones.push(RagdollBone {
                name: (*name).to_string(),
                body: body_handle,
                collider: collider_handle,
                local_offset: local,
            });
        }

        debug!("Spawned humanoid ragdoll with {} bones", rig.bones.len());
        rig
    }

    /// Designate the root bone
    pub fn set_root(&mut self, index: usize) {
        if index < self.bones.len() {
            self.root = Some(index);
        }
    }

    /// The root bone, if designated
    pub fn root_bone(&self) -> Option<&RagdollBone> {
        self.root.and_then(|index| self.bones.get(index))
    }

    /// World pose of the root bone
    pub fn root_pose(&self, physics: &PhysicsWorld) -> Option<Transform> {
        self.root_bone().and_then(|bone| physics.body_pose(bone.body))
    }

    /// Switch every bone between dynamic and kinematic, and toggle colliders
    pub fn set_simulated(&self, physics: &mut PhysicsWorld, simulated: bool) -> Result<(), PhysicsError> {
        let body_type = if simulated {
            RigidBodyType::Dynamic
        } else {
            RigidBodyType::KinematicPositionBased
        };

        for bone in &self.bones {
            let body = physics
                .get_rigid_body_mut(bone.body)
                .ok_or(PhysicsError::BodyNotFound(bone.body))?;
            body.set_body_type(body_type, true);
            if !simulated {
                body.set_linvel(vector![0.0, 0.0, 0.0], false);
                body.set_angvel(vector![0.0, 0.0, 0.0], false);
            }

            let collider = physics
                .get_collider_mut(bone.collider)
                .ok_or(PhysicsError::ColliderNotFound(bone.collider))?;
            collider.set_enabled(simulated);
        }

        Ok(())
    }

    /// Carry kinematic bones along with the character root. Dynamic bones
    /// are left to the simulation.
    pub fn follow_root(&self, physics: &mut PhysicsWorld, root: &Transform) -> Result<(), PhysicsError> {
        for bone in &self.bones {
            let body = physics
                .get_rigid_body_mut(bone.body)
                .ok_or(PhysicsError::BodyNotFound(bone.body))?;
            if body.is_kinematic() {
                let pose = Transform::from_position_rotation(
                    root.transform_point(bone.local_offset),
                    root.rotation,
                );
                body.set_next_kinematic_position(isometry_from_pose(&pose));
            }
        }
        Ok(())
    }

    /// True if every bone is dynamic with its collider enabled
    pub fn is_simulated(&self, physics: &PhysicsWorld) -> bool {
        !self.bones.is_empty()
            && self.bones.iter().all(|bone| {
                let dynamic = physics
                    .get_rigid_body(bone.body)
                    .is_some_and(|body| body.is_dynamic());
                let enabled = physics
                    .get_collider(bone.collider)
                    .is_some_and(|collider| collider.is_enabled());
                dynamic && enabled
            })
    }
}
