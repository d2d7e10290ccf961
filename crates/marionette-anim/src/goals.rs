//! IK goals and look-at state

use glam::Vec3;
use marionette_core::Transform;
use serde::{Deserialize, Serialize};

/// Limb end effectors that accept IK goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IkGoal {
    LeftFoot,
    RightFoot,
    LeftHand,
    RightHand,
}

impl IkGoal {
    pub(crate) fn index(self) -> usize {
        match self {
            IkGoal::LeftFoot => 0,
            IkGoal::RightFoot => 1,
            IkGoal::LeftHand => 2,
            IkGoal::RightHand => 3,
        }
    }
}

/// Animated pose, IK target pose and blend weights for one goal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IkGoalState {
    /// Pose authored by the current animation
    pub animated: Transform,
    /// Pose requested by IK
    pub target: Transform,
    pub position_weight: f32,
    pub rotation_weight: f32,
}

impl IkGoalState {
    /// Final effector pose after weighting animation against IK
    pub fn resolved(&self) -> Transform {
        Transform::blend(
            &self.animated,
            &self.target,
            self.position_weight,
            self.rotation_weight,
        )
    }
}

/// Head/spine look-at request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookAtState {
    pub weight: f32,
    pub position: Vec3,
}
