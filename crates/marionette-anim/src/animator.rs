//! Animator capability and the in-process parameter store

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};
use marionette_core::Transform;
use tracing::debug;

use crate::{FloatParam, IkGoal, IkGoalState, LookAtState};

/// Everything the controller asks of an animation system
pub trait Animator {
    /// Set a float parameter immediately
    fn set_float(&mut self, name: &str, value: f32);

    /// Move a float parameter towards `value` with damping
    fn set_float_damped(&mut self, name: &str, value: f32, damp_time: f32, dt: f32);

    fn set_bool(&mut self, name: &str, value: bool);

    /// Fire a one-shot trigger; the animation graph consumes it
    fn set_trigger(&mut self, name: &str);

    fn is_enabled(&self) -> bool;

    /// Enable or disable pose evaluation entirely
    fn set_enabled(&mut self, enabled: bool);

    /// Jump straight to a state on a layer at a normalized time
    fn play(&mut self, state: &str, layer: usize, normalized_time: f32);

    /// Current IK goal position (the animated pose until overridden)
    fn ik_position(&self, goal: IkGoal) -> Vec3;

    /// Current IK goal rotation (the animated pose until overridden)
    fn ik_rotation(&self, goal: IkGoal) -> Quat;

    fn set_ik_position(&mut self, goal: IkGoal, position: Vec3);
    fn set_ik_rotation(&mut self, goal: IkGoal, rotation: Quat);
    fn set_ik_position_weight(&mut self, goal: IkGoal, weight: f32);
    fn set_ik_rotation_weight(&mut self, goal: IkGoal, weight: f32);

    fn set_look_at_weight(&mut self, weight: f32);
    fn set_look_at_position(&mut self, position: Vec3);
}

/// Current state of a layer
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub state: String,
    pub layer: usize,
    pub normalized_time: f32,
}

/// Parameter store with damped floats, triggers, playback and IK goals.
///
/// Pose evaluation itself happens elsewhere; the driver feeds the animated
/// effector poses in with [`AnimatorState::begin_ik_pass`] before each IK pass
/// and reads the results back with [`AnimatorState::resolved_goal`].
#[derive(Debug, Clone)]
pub struct AnimatorState {
    enabled: bool,
    floats: HashMap<String, FloatParam>,
    bools: HashMap<String, bool>,
    triggers: HashSet<String>,
    playback: Option<PlaybackState>,
    goals: [IkGoalState; 4],
    look_at: LookAtState,
}

impl Default for AnimatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatorState {
    /// Create an enabled animator with no parameters
    pub fn new() -> Self {
        Self {
            enabled: true,
            floats: HashMap::new(),
            bools: HashMap::new(),
            triggers: HashSet::new(),
            playback: None,
            goals: [IkGoalState::default(); 4],
            look_at: LookAtState::default(),
        }
    }

    /// Float parameter value, 0.0 if never set
    pub fn float(&self, name: &str) -> f32 {
        self.floats.get(name).map_or(0.0, |param| param.value)
    }

    /// Bool parameter value, false if never set
    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    /// Whether a trigger is pending
    pub fn is_triggered(&self, name: &str) -> bool {
        self.triggers.contains(name)
    }

    /// Consume a pending trigger, returning whether it was set
    pub fn consume_trigger(&mut self, name: &str) -> bool {
        self.triggers.remove(name)
    }

    pub fn playback(&self) -> Option<&PlaybackState> {
        self.playback.as_ref()
    }

    pub fn goal(&self, goal: IkGoal) -> &IkGoalState {
        &self.goals[goal.index()]
    }

    pub fn look_at(&self) -> &LookAtState {
        &self.look_at
    }

    /// Load the animation-authored effector poses for this evaluation.
    ///
    /// Every goal target resets to its animated pose and every weight,
    /// look-at included, drops to zero until the IK callback writes it.
    pub fn begin_ik_pass(&mut self, animated: impl IntoIterator<Item = (IkGoal, Transform)>) {
        for (goal, pose) in animated {
            self.goals[goal.index()].animated = pose;
        }
        for state in &mut self.goals {
            state.target = state.animated;
            state.position_weight = 0.0;
            state.rotation_weight = 0.0;
        }
        self.look_at.weight = 0.0;
    }

    /// Effector pose after IK weighting
    pub fn resolved_goal(&self, goal: IkGoal) -> Transform {
        self.goal(goal).resolved()
    }

    fn goal_mut(&mut self, goal: IkGoal) -> &mut IkGoalState {
        &mut self.goals[goal.index()]
    }
}

impl Animator for AnimatorState {
    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.entry(name.to_string()).or_default().set(value);
    }

    fn set_float_damped(&mut self, name: &str, value: f32, damp_time: f32, dt: f32) {
        self.floats
            .entry(name.to_string())
            .or_default()
            .damp_towards(value, damp_time, dt);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    fn set_trigger(&mut self, name: &str) {
        self.triggers.insert(name.to_string());
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn play(&mut self, state: &str, layer: usize, normalized_time: f32) {
        debug!("Playing state '{}' on layer {} at {}", state, layer, normalized_time);
        self.playback = Some(PlaybackState {
            state: state.to_string(),
            layer,
            normalized_time,
        });
    }

    fn ik_position(&self, goal: IkGoal) -> Vec3 {
        self.goal(goal).target.position
    }

    fn ik_rotation(&self, goal: IkGoal) -> Quat {
        self.goal(goal).target.rotation
    }

    fn set_ik_position(&mut self, goal: IkGoal, position: Vec3) {
        self.goal_mut(goal).target.position = position;
    }

    fn set_ik_rotation(&mut self, goal: IkGoal, rotation: Quat) {
        self.goal_mut(goal).target.rotation = rotation;
    }

    fn set_ik_position_weight(&mut self, goal: IkGoal, weight: f32) {
        self.goal_mut(goal).position_weight = weight.clamp(0.0, 1.0);
    }

    fn set_ik_rotation_weight(&mut self, goal: IkGoal, weight: f32) {
        self.goal_mut(goal).rotation_weight = weight.clamp(0.0, 1.0);
    }

    fn set_look_at_weight(&mut self, weight: f32) {
        self.look_at.weight = weight.clamp(0.0, 1.0);
    }

    fn set_look_at_position(&mut self, position: Vec3) {
        self.look_at.position = position;
    }
}
