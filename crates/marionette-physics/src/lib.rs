//! Marionette Physics - Physics queries, character body and ragdoll rig using rapier3d
//!
//! Provides the ground/foot queries the controller runs each frame, the
//! character's rigid body, and a ragdoll rig that can be switched between
//! kinematic (animation-driven) and dynamic (physics-driven) bones.

mod body;
mod character;
mod error;
mod layers;
mod queries;
mod ragdoll;

pub use body::{CharacterBody, CharacterBodyConfig};
pub use character::RapierCharacter;
pub use error::PhysicsError;
pub use layers::LayerMask;
pub use queries::{CharacterPhysics, PhysicsQueries, SurfaceHit};
pub use ragdoll::{RagdollBone, RagdollRig};

use glam::{Quat, Vec3};
use marionette_core::Transform;
use nalgebra::{Quaternion, Translation3, Unit, UnitQuaternion};
use rapier3d::prelude::*;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts and shape tests
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // Update query pipeline after physics step
        self.query_pipeline.update(&self.collider_set);
    }

    #[cfg(test)]
    pub(crate) fn in_contact(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.narrow_phase
            .contact_pair(a, b)
            .is_some_and(|pair| pair.has_any_active_contact)
    }

    /// Rebuild the query pipeline without stepping (after spawning or teleporting)
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a rigid body with an attached collider
    pub fn add_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Connect two bodies with a ball-and-socket joint
    pub fn add_spherical_joint(
        &mut self,
        parent: RigidBodyHandle,
        child: RigidBodyHandle,
        parent_anchor: Vec3,
        child_anchor: Vec3,
    ) -> ImpulseJointHandle {
        let joint = SphericalJointBuilder::new()
            .local_anchor1(point![parent_anchor.x, parent_anchor.y, parent_anchor.z])
            .local_anchor2(point![child_anchor.x, child_anchor.y, child_anchor.z]);
        self.impulse_joint_set.insert(parent, child, joint, true)
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable rigid body by handle
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Get a mutable collider by handle
    pub fn get_collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.collider_set.get_mut(handle)
    }

    /// World pose of a rigid body
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set
            .get(handle)
            .map(|body| pose_from_isometry(body.position()))
    }

    /// Cast a ray and get detailed hit information
    pub fn raycast_detailed(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<SurfaceHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
            .map(|(_, intersection)| SurfaceHit {
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                ),
            })
    }

    /// Create a ground plane collider on the ground layer
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .collision_groups(LayerMask::GROUND.membership())
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider on the ground layer, optionally rotated
    /// (ramps, steps)
    pub fn create_static_box(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        rotation: Quat,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(isometry_from_pose(&Transform::from_position_rotation(position, rotation)))
            .collision_groups(LayerMask::GROUND.membership())
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsQueries for PhysicsWorld {
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);
        let filter = QueryFilter::default().groups(mask.query_groups());

        self.query_pipeline
            .intersection_with_shape(&self.rigid_body_set, &self.collider_set, &shape_pos, &shape, filter)
            .is_some()
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        let filter = QueryFilter::default().groups(mask.query_groups());
        self.raycast_detailed(origin, direction, max_distance, filter)
    }
}

pub(crate) fn pose_from_isometry(iso: &Isometry<Real>) -> Transform {
    let t = iso.translation.vector;
    let q = iso.rotation;
    Transform::from_position_rotation(Vec3::new(t.x, t.y, t.z), Quat::from_xyzw(q.i, q.j, q.k, q.w))
}

pub(crate) fn isometry_from_pose(pose: &Transform) -> Isometry<Real> {
    let p = pose.position;
    let r = pose.rotation.normalize();
    Isometry::from_parts(
        Translation3::new(p.x, p.y, p.z),
        UnitQuaternion::from_quaternion(Quaternion::new(r.w, r.x, r.y, r.z)),
    )
}
