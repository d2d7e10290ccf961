//! Procedural IK layered over the animated pose: look-at, right hand and
//! foot placement against the ground

use glam::{Quat, Vec3};
use marionette_anim::{Animator, IkGoal};
use marionette_core::Transform;
use marionette_physics::{LayerMask, PhysicsQueries};

use crate::config::{ControllerConfig, FootMissPolicy};

/// External poses IK reaches for. The owner updates them each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IkTargets {
    pub look_at: Option<Vec3>,
    pub right_hand: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IkAdjuster {
    pub foot_ray_lift: f32,
    pub foot_ray_length: f32,
    pub ground_mask: LayerMask,
    pub foot_miss_policy: FootMissPolicy,
    /// Last ground placement per foot (left, right), replayed on a miss
    /// under [`FootMissPolicy::Hold`]
    held_feet: [Option<Transform>; 2],
}

impl IkAdjuster {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            foot_ray_lift: config.foot_ray_lift,
            foot_ray_length: config.foot_ray_length,
            ground_mask: config.ground_mask,
            foot_miss_policy: config.foot_miss_policy,
            held_feet: [None; 2],
        }
    }

    /// Write every IK goal for one animation pass. Goals without a target
    /// get zero weight so the animated pose shows through.
    pub fn solve(
        &mut self,
        targets: &IkTargets,
        root_rotation: Quat,
        physics: &impl PhysicsQueries,
        animator: &mut impl Animator,
    ) {
        match targets.look_at {
            Some(look_at) => {
                animator.set_look_at_weight(1.0);
                animator.set_look_at_position(look_at);
            }
            None => animator.set_look_at_weight(0.0),
        }

        match targets.right_hand {
            Some(hand) => {
                animator.set_ik_position_weight(IkGoal::RightHand, 1.0);
                animator.set_ik_rotation_weight(IkGoal::RightHand, 1.0);
                animator.set_ik_position(IkGoal::RightHand, hand.position);
                animator.set_ik_rotation(IkGoal::RightHand, hand.rotation);
            }
            None => set_goal_weight(animator, IkGoal::RightHand, 0.0),
        }

        self.adjust_foot(IkGoal::LeftFoot, root_rotation, physics, animator);
        self.adjust_foot(IkGoal::RightFoot, root_rotation, physics, animator);
    }

    /// Drop every IK correction and forget held foot placements
    pub fn release(&mut self, animator: &mut impl Animator) {
        for goal in [IkGoal::LeftFoot, IkGoal::RightFoot, IkGoal::RightHand] {
            set_goal_weight(animator, goal, 0.0);
        }
        animator.set_look_at_weight(0.0);
        self.held_feet = [None; 2];
    }

    /// Pin a foot to the ground under its animated position. Returns whether
    /// the ground ray hit.
    pub fn adjust_foot(
        &mut self,
        foot: IkGoal,
        root_rotation: Quat,
        physics: &impl PhysicsQueries,
        animator: &mut impl Animator,
    ) -> bool {
        let slot = if foot == IkGoal::LeftFoot { 0 } else { 1 };
        let foot_position = animator.ik_position(foot);
        let origin = foot_position + Vec3::Y * self.foot_ray_lift;

        let hit = physics.cast_ray(origin, Vec3::NEG_Y, self.foot_ray_length, self.ground_mask);
        let placement = match (&hit, self.foot_miss_policy) {
            (Some(hit), _) => {
                let align = Quat::from_rotation_arc(Vec3::Y, hit.normal.normalize());
                let pose = Transform::from_position_rotation(hit.point, align * root_rotation);
                self.held_feet[slot] = Some(pose);
                Some(pose)
            }
            (None, FootMissPolicy::Hold) => self.held_feet[slot],
            (None, FootMissPolicy::Release) => {
                self.held_feet[slot] = None;
                None
            }
        };

        match placement {
            Some(pose) => {
                animator.set_ik_position(foot, pose.position);
                animator.set_ik_rotation(foot, pose.rotation);
                set_goal_weight(animator, foot, 1.0);
            }
            None => set_goal_weight(animator, foot, 0.0),
        }
        hit.is_some()
    }
}

fn set_goal_weight(animator: &mut impl Animator, goal: IkGoal, weight: f32) {
    animator.set_ik_position_weight(goal, weight);
    animator.set_ik_rotation_weight(goal, weight);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPhysics;
    use marionette_anim::AnimatorState;

    fn animator_with_feet(height: f32) -> AnimatorState {
        let mut animator = AnimatorState::new();
        animator.begin_ik_pass([
            (IkGoal::LeftFoot, Transform::from_position(Vec3::new(-0.1, height, 0.0))),
            (IkGoal::RightFoot, Transform::from_position(Vec3::new(0.1, height, 0.0))),
        ]);
        animator
    }

    #[test]
    fn test_foot_snaps_to_ground() {
        let mut adjuster = IkAdjuster::from_config(&ControllerConfig::default());
        let physics = MockPhysics::on_ground();
        let mut animator = animator_with_feet(0.2);

        assert!(adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &physics, &mut animator));

        let goal = animator.goal(IkGoal::LeftFoot);
        assert!((goal.target.position - Vec3::new(-0.1, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(goal.position_weight, 1.0);
        assert_eq!(goal.rotation_weight, 1.0);
    }

    #[test]
    fn test_foot_rotation_up_matches_slope_normal() {
        let mut adjuster = IkAdjuster::from_config(&ControllerConfig::default());
        let mut physics = MockPhysics::on_ground();
        physics.ground_normal = Quat::from_rotation_z(0.4) * Vec3::Y;
        let mut animator = animator_with_feet(0.0);
        let facing = Quat::from_rotation_y(1.2);

        adjuster.adjust_foot(IkGoal::RightFoot, facing, &physics, &mut animator);

        let up = animator.ik_rotation(IkGoal::RightFoot) * Vec3::Y;
        assert!((up - physics.ground_normal).length() < 1e-5);
    }

    #[test]
    fn test_ray_range_is_lift_plus_reach() {
        let mut adjuster = IkAdjuster::from_config(&ControllerConfig::default());
        let physics = MockPhysics::on_ground();

        // Ray starts 0.5 above the foot and reaches 1.0, so ground up to 0.5
        // below the animated foot is found
        let mut near = animator_with_feet(0.45);
        assert!(adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &physics, &mut near));

        let mut far = animator_with_feet(0.6);
        assert!(!adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &physics, &mut far));
    }

    #[test]
    fn test_miss_releases_stale_weights() {
        let mut adjuster = IkAdjuster::from_config(&ControllerConfig::default());
        let mut animator = animator_with_feet(0.0);
        adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &MockPhysics::on_ground(), &mut animator);
        assert_eq!(animator.goal(IkGoal::LeftFoot).position_weight, 1.0);

        let animated = animator.goal(IkGoal::LeftFoot).animated;
        animator.begin_ik_pass([(IkGoal::LeftFoot, animated)]);
        adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &MockPhysics::in_air(), &mut animator);

        let goal = animator.goal(IkGoal::LeftFoot);
        assert_eq!(goal.position_weight, 0.0);
        assert_eq!(goal.rotation_weight, 0.0);
        assert_eq!(animator.resolved_goal(IkGoal::LeftFoot), animated);
    }

    #[test]
    fn test_miss_can_hold_previous_placement() {
        let mut adjuster = IkAdjuster {
            foot_miss_policy: FootMissPolicy::Hold,
            ..IkAdjuster::from_config(&ControllerConfig::default())
        };
        let mut animator = animator_with_feet(0.1);
        adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &MockPhysics::on_ground(), &mut animator);

        let animated = animator.goal(IkGoal::LeftFoot).animated;
        animator.begin_ik_pass([(IkGoal::LeftFoot, animated)]);
        assert_eq!(animator.goal(IkGoal::LeftFoot).position_weight, 0.0);
        adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &MockPhysics::in_air(), &mut animator);

        let goal = animator.goal(IkGoal::LeftFoot);
        assert_eq!(goal.position_weight, 1.0);
        assert!((goal.target.position - Vec3::new(-0.1, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_release_forgets_held_placement() {
        let mut adjuster = IkAdjuster {
            foot_miss_policy: FootMissPolicy::Hold,
            ..IkAdjuster::from_config(&ControllerConfig::default())
        };
        let mut animator = animator_with_feet(0.1);
        adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &MockPhysics::on_ground(), &mut animator);

        adjuster.release(&mut animator);
        assert_eq!(animator.goal(IkGoal::LeftFoot).position_weight, 0.0);

        adjuster.adjust_foot(IkGoal::LeftFoot, Quat::IDENTITY, &MockPhysics::in_air(), &mut animator);
        assert_eq!(animator.goal(IkGoal::LeftFoot).position_weight, 0.0);
    }

    #[test]
    fn test_targets_pin_hand_and_head() {
        let mut adjuster = IkAdjuster::from_config(&ControllerConfig::default());
        let mut animator = animator_with_feet(0.0);
        let hand = Transform::from_position_rotation(Vec3::new(0.4, 1.2, 0.3), Quat::from_rotation_x(0.5));
        let targets = IkTargets {
            look_at: Some(Vec3::new(0.0, 1.7, 5.0)),
            right_hand: Some(hand),
        };

        adjuster.solve(&targets, Quat::IDENTITY, &MockPhysics::on_ground(), &mut animator);

        assert_eq!(animator.look_at().weight, 1.0);
        assert_eq!(animator.look_at().position, Vec3::new(0.0, 1.7, 5.0));
        let goal = animator.goal(IkGoal::RightHand);
        assert_eq!(goal.target, hand);
        assert_eq!(goal.position_weight, 1.0);
        assert_eq!(goal.rotation_weight, 1.0);
    }

    #[test]
    fn test_cleared_targets_release_hand_and_head() {
        let mut adjuster = IkAdjuster::from_config(&ControllerConfig::default());
        let mut animator = animator_with_feet(0.0);
        let hand = Transform::from_position(Vec3::new(0.4, 1.2, 0.3));
        let targets = IkTargets {
            look_at: Some(Vec3::new(0.0, 1.7, 5.0)),
            right_hand: Some(hand),
        };
        adjuster.solve(&targets, Quat::IDENTITY, &MockPhysics::on_ground(), &mut animator);

        // Same pass, targets gone: weights written back to zero
        adjuster.solve(&IkTargets::default(), Quat::IDENTITY, &MockPhysics::on_ground(), &mut animator);

        let goal = animator.goal(IkGoal::RightHand);
        assert_eq!(goal.position_weight, 0.0);
        assert_eq!(goal.rotation_weight, 0.0);
        assert_eq!(animator.look_at().weight, 0.0);
        assert_eq!(animator.resolved_goal(IkGoal::RightHand), goal.animated);
    }
}
