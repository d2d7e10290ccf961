//! The character animation controller

use glam::{Quat, Vec3};
use marionette_anim::Animator;
use marionette_core::Transform;
use marionette_physics::{CharacterPhysics, PhysicsQueries};
use tracing::{debug, info};

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::gizmo::GizmoSink;
use crate::input::{InputAction, InputState};

use super::{
    planar_input, target_speed, ControllerEvent, GroundSensor, IkAdjuster, IkTargets,
    RagdollCause, RagdollSwitch,
};

/// Per-character state, mutated once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterState {
    pub position: Vec3,
    pub rotation: Quat,
    pub grounded: bool,
    /// Target of the locomotion speed parameter this frame
    pub speed_param: f32,
    pub jumping: bool,
    pub ragdoll_active: bool,
    pub ik_enabled: bool,
    /// Between the attack clip's damage-on and damage-off markers
    pub damage_window_open: bool,
}

impl CharacterState {
    fn new(pose: Transform, ik_enabled: bool) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            grounded: false,
            speed_param: 0.0,
            jumping: false,
            ragdoll_active: false,
            ik_enabled,
            damage_window_open: false,
        }
    }

    pub fn root(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }
}

/// Reads input, drives animation parameters, jump and ragdoll, and layers IK
/// over the animated pose.
///
/// The controller owns no engine objects. The driver lends it physics and
/// animation for each callback: [`on_frame`](Self::on_frame) once per frame,
/// [`on_solve_ik`](Self::on_solve_ik) once per animation evaluation.
pub struct CharacterAnimationController {
    /// Configuration
    pub config: ControllerConfig,
    state: CharacterState,
    ground: GroundSensor,
    ragdoll: RagdollSwitch,
    ik: IkAdjuster,
    targets: IkTargets,
    events: Vec<ControllerEvent>,
}

impl CharacterAnimationController {
    /// Activate a controller at a root pose with default config
    pub fn new(pose: Transform) -> Self {
        Self::with_config(pose, ControllerConfig::default())
    }

    /// Activate a controller at a root pose
    pub fn with_config(pose: Transform, config: ControllerConfig) -> Self {
        Self {
            state: CharacterState::new(pose, config.ik_enabled),
            ground: GroundSensor::from_config(&config),
            ragdoll: RagdollSwitch::new(),
            ik: IkAdjuster::from_config(&config),
            targets: IkTargets::default(),
            events: Vec::new(),
            config,
        }
    }

    /// Use an explicit ground check point instead of the configured offset
    pub fn with_ground_check_point(mut self, offset: Vec3) -> Self {
        self.ground.offset = offset;
        self
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn ground_sensor(&self) -> &GroundSensor {
        &self.ground
    }

    pub fn targets(&self) -> &IkTargets {
        &self.targets
    }

    pub fn set_look_at_target(&mut self, target: Option<Vec3>) {
        self.targets.look_at = target;
    }

    pub fn set_right_hand_target(&mut self, target: Option<Transform>) {
        self.targets.right_hand = target;
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Per-frame update
    pub fn on_frame(
        &mut self,
        input: &InputState,
        dt: f32,
        physics: &mut impl CharacterPhysics,
        animator: &mut impl Animator,
    ) -> Result<(), ControllerError> {
        if let Some(pose) = physics.body_pose() {
            self.state.position = pose.position;
            self.state.rotation = pose.rotation;
        }
        self.state.grounded = self.ground.is_grounded(&*physics, &self.state.root());

        // Locomotion
        let movement = planar_input(input.movement_axes());
        let running = input.is_held(InputAction::Sprint);
        self.state.speed_param = target_speed(movement, running, &self.config);
        animator.set_float_damped(
            &self.config.animator.speed,
            self.state.speed_param,
            self.config.speed_damp_time,
            dt,
        );

        if input.is_just_pressed(InputAction::Jump) && self.state.grounded {
            animator.set_bool(&self.config.animator.is_jumping, true);
            physics.apply_impulse(Vec3::Y * self.config.jump_impulse)?;
            self.state.jumping = true;
            self.events.push(ControllerEvent::JumpStarted);
        }

        if input.is_just_pressed(InputAction::Attack) {
            animator.set_trigger(&self.config.animator.attack);
            self.events.push(ControllerEvent::Attack);
        }

        if input.is_just_pressed(InputAction::EnterRagdoll) {
            self.enter_ragdoll(RagdollCause::Debug, physics, animator)?;
        }
        if input.is_just_pressed(InputAction::ExitRagdoll) {
            self.exit_ragdoll(physics, animator)?;
        }

        if input.is_just_pressed(InputAction::ToggleIk) {
            self.toggle_ik();
        }

        Ok(())
    }

    /// IK pass, once per animation evaluation. While IK is off or the
    /// animator is disabled (ragdoll) every correction is released instead.
    pub fn on_solve_ik(
        &mut self,
        layer: usize,
        physics: &impl PhysicsQueries,
        animator: &mut impl Animator,
    ) {
        if !self.state.ik_enabled || !animator.is_enabled() {
            self.ik.release(animator);
            return;
        }
        debug!("Solving IK for layer {}", layer);
        self.ik.solve(&self.targets, self.state.rotation, physics, animator);
    }

    /// Editor/debug visualisation of the ground check
    pub fn draw_gizmos(&self, physics: &impl PhysicsQueries, sink: &mut impl GizmoSink) {
        self.ground.draw(physics, &self.state.root(), sink);
    }

    /// Hand the skeleton to physics. Returns `false` if already ragdolled.
    pub fn enter_ragdoll(
        &mut self,
        cause: RagdollCause,
        physics: &mut impl CharacterPhysics,
        animator: &mut impl Animator,
    ) -> Result<bool, ControllerError> {
        let entered = self.ragdoll.enter(cause, physics, animator)?;
        if entered {
            self.state.ragdoll_active = true;
            self.events.push(ControllerEvent::RagdollEntered { cause });
        }
        Ok(entered)
    }

    /// Stand back up where the root bone settled. Returns `false` if the
    /// character was not ragdolled.
    pub fn exit_ragdoll(
        &mut self,
        physics: &mut impl CharacterPhysics,
        animator: &mut impl Animator,
    ) -> Result<bool, ControllerError> {
        let Some(root) = self.ragdoll.exit(physics, animator, &self.config.animator)? else {
            return Ok(false);
        };

        self.state.position = root.position;
        self.state.rotation = root.rotation;
        self.state.ragdoll_active = false;
        self.events.push(ControllerEvent::RagdollExited {
            position: root.position,
        });
        Ok(true)
    }

    /// Flip procedural IK on or off
    pub fn toggle_ik(&mut self) {
        self.state.ik_enabled = !self.state.ik_enabled;
        info!("IK {}", if self.state.ik_enabled { "enabled" } else { "disabled" });
        self.events.push(ControllerEvent::IkToggled {
            enabled: self.state.ik_enabled,
        });
    }

    // Animation clip events

    /// End of the jump clip
    pub fn jump_ended(&mut self, animator: &mut impl Animator) {
        animator.set_bool(&self.config.animator.is_jumping, false);
        self.state.jumping = false;
        self.events.push(ControllerEvent::JumpEnded);
    }

    /// Foot contact marker in a locomotion clip
    pub fn play_footstep(&mut self) {
        debug!("Footstep");
        self.events.push(ControllerEvent::Footstep {
            position: self.state.position,
        });
    }

    /// Attack clip opens its damage window
    pub fn enable_damage(&mut self) {
        debug!("Damage ON");
        self.state.damage_window_open = true;
        self.events.push(ControllerEvent::DamageWindowOpened);
    }

    /// Attack clip closes its damage window
    pub fn disable_damage(&mut self) {
        debug!("Damage OFF");
        self.state.damage_window_open = false;
        self.events.push(ControllerEvent::DamageWindowClosed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gizmo::{GizmoBuffer, GizmoShape};
    use crate::testing::MockPhysics;
    use marionette_anim::{AnimatorState, IkGoal};
    use marionette_core::Color;

    const DT: f32 = 1.0 / 60.0;

    fn pressed(actions: &[InputAction]) -> InputState {
        let mut input = InputState::new();
        for action in actions {
            input.press(*action);
        }
        input
    }

    fn held(actions: &[InputAction]) -> InputState {
        let mut input = pressed(actions);
        input.clear_frame();
        input
    }

    fn setup() -> (CharacterAnimationController, MockPhysics, AnimatorState) {
        (
            CharacterAnimationController::new(Transform::default()),
            MockPhysics::on_ground(),
            AnimatorState::new(),
        )
    }

    #[test]
    fn test_speed_param_targets() {
        let (mut controller, mut physics, mut animator) = setup();

        controller.on_frame(&InputState::new(), DT, &mut physics, &mut animator).unwrap();
        assert_eq!(controller.state().speed_param, 0.0);

        controller
            .on_frame(&held(&[InputAction::MoveForward]), DT, &mut physics, &mut animator)
            .unwrap();
        assert_eq!(controller.state().speed_param, 0.5);

        controller
            .on_frame(
                &held(&[InputAction::MoveForward, InputAction::Sprint]),
                DT,
                &mut physics,
                &mut animator,
            )
            .unwrap();
        assert_eq!(controller.state().speed_param, 1.0);

        // Sprint alone is not movement
        controller
            .on_frame(&held(&[InputAction::Sprint]), DT, &mut physics, &mut animator)
            .unwrap();
        assert_eq!(controller.state().speed_param, 0.0);
    }

    #[test]
    fn test_speed_parameter_is_smoothed() {
        let (mut controller, mut physics, mut animator) = setup();
        let input = held(&[InputAction::MoveForward, InputAction::Sprint]);

        controller.on_frame(&input, DT, &mut physics, &mut animator).unwrap();
        let first = animator.float("Speed");
        assert!(first > 0.0 && first < 1.0);

        for _ in 0..120 {
            controller.on_frame(&input, DT, &mut physics, &mut animator).unwrap();
        }
        assert!((animator.float("Speed") - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_jump_requires_ground_and_fresh_press() {
        let (mut controller, mut physics, mut animator) = setup();

        // Held from a previous frame: no edge
        controller
            .on_frame(&held(&[InputAction::Jump]), DT, &mut physics, &mut animator)
            .unwrap();
        assert!(physics.impulses.is_empty());

        controller
            .on_frame(&pressed(&[InputAction::Jump]), DT, &mut physics, &mut animator)
            .unwrap();
        assert_eq!(physics.impulses, vec![Vec3::new(0.0, 5.5, 0.0)]);
        assert!(animator.bool("IsJumping"));
        assert!(controller.state().jumping);

        let mut airborne = MockPhysics::in_air();
        controller
            .on_frame(&pressed(&[InputAction::Jump]), DT, &mut airborne, &mut animator)
            .unwrap();
        assert!(airborne.impulses.is_empty());
        assert!(!controller.state().grounded);
    }

    #[test]
    fn test_jump_ended_clears_flag() {
        let (mut controller, mut physics, mut animator) = setup();
        controller
            .on_frame(&pressed(&[InputAction::Jump]), DT, &mut physics, &mut animator)
            .unwrap();

        controller.jump_ended(&mut animator);
        assert!(!animator.bool("IsJumping"));
        assert!(!controller.state().jumping);
        assert_eq!(
            controller.drain_events(),
            vec![ControllerEvent::JumpStarted, ControllerEvent::JumpEnded]
        );
    }

    #[test]
    fn test_attack_fires_trigger() {
        let (mut controller, mut physics, mut animator) = setup();
        controller
            .on_frame(&pressed(&[InputAction::Attack]), DT, &mut physics, &mut animator)
            .unwrap();
        assert!(animator.consume_trigger("Attack"));

        controller
            .on_frame(&held(&[InputAction::Attack]), DT, &mut physics, &mut animator)
            .unwrap();
        assert!(!animator.is_triggered("Attack"));
    }

    #[test]
    fn test_state_follows_body() {
        let (mut controller, mut physics, mut animator) = setup();
        physics.body = Some(Transform::from_position(Vec3::new(4.0, 0.0, -2.0)));

        controller.on_frame(&InputState::new(), DT, &mut physics, &mut animator).unwrap();
        assert_eq!(controller.state().position, Vec3::new(4.0, 0.0, -2.0));
        assert!(controller.state().grounded);
    }

    #[test]
    fn test_ragdoll_keys_drive_state_machine() {
        let (mut controller, mut physics, mut animator) = setup();

        controller
            .on_frame(&pressed(&[InputAction::EnterRagdoll]), DT, &mut physics, &mut animator)
            .unwrap();
        assert!(controller.state().ragdoll_active);
        assert!(physics.ragdoll_simulated);
        assert!(!animator.is_enabled());

        let settled = Transform::from_position_rotation(
            Vec3::new(2.0, 0.3, 1.0),
            Quat::from_rotation_y(0.8),
        );
        physics.root_bone = Some(settled);

        controller
            .on_frame(&pressed(&[InputAction::ExitRagdoll]), DT, &mut physics, &mut animator)
            .unwrap();
        assert!(!controller.state().ragdoll_active);
        assert_eq!(controller.state().position, settled.position);
        assert_eq!(controller.state().rotation, settled.rotation);
        assert!(animator.is_enabled());
        assert_eq!(animator.playback().unwrap().state, "Idle");

        let events = controller.drain_events();
        assert!(events.contains(&ControllerEvent::RagdollEntered {
            cause: RagdollCause::Debug
        }));
        assert!(events.contains(&ControllerEvent::RagdollExited {
            position: settled.position
        }));
    }

    #[test]
    fn test_ragdoll_commands_are_idempotent() {
        let (mut controller, mut physics, mut animator) = setup();

        assert!(!controller.exit_ragdoll(&mut physics, &mut animator).unwrap());
        assert!(controller
            .enter_ragdoll(RagdollCause::Death, &mut physics, &mut animator)
            .unwrap());
        assert!(!controller
            .enter_ragdoll(RagdollCause::HitReaction, &mut physics, &mut animator)
            .unwrap());
        assert_eq!(physics.ragdoll_switches, 1);
    }

    #[test]
    fn test_missing_root_bone_is_reported() {
        let (mut controller, mut physics, mut animator) = setup();
        physics.root_bone = None;
        controller
            .enter_ragdoll(RagdollCause::Death, &mut physics, &mut animator)
            .unwrap();

        let result = controller.on_frame(
            &pressed(&[InputAction::ExitRagdoll]),
            DT,
            &mut physics,
            &mut animator,
        );
        assert_eq!(result, Err(ControllerError::MissingRootBone));
        assert!(controller.state().ragdoll_active);
    }

    #[test]
    fn test_ik_pass_places_feet() {
        let (mut controller, physics, mut animator) = setup();
        animator.begin_ik_pass([
            (IkGoal::LeftFoot, Transform::from_position(Vec3::new(-0.1, 0.15, 0.0))),
            (IkGoal::RightFoot, Transform::from_position(Vec3::new(0.1, 0.15, 0.0))),
        ]);

        controller.on_solve_ik(0, &physics, &mut animator);

        for foot in [IkGoal::LeftFoot, IkGoal::RightFoot] {
            assert!(animator.resolved_goal(foot).position.y.abs() < 1e-5);
        }
    }

    #[test]
    fn test_ik_toggle_disables_pass() {
        let (mut controller, mut physics, mut animator) = setup();
        controller
            .on_frame(&pressed(&[InputAction::ToggleIk]), DT, &mut physics, &mut animator)
            .unwrap();
        assert!(!controller.state().ik_enabled);

        animator.begin_ik_pass([(IkGoal::LeftFoot, Transform::from_position(Vec3::new(0.0, 0.2, 0.0)))]);
        controller.on_solve_ik(0, &physics, &mut animator);
        assert_eq!(animator.goal(IkGoal::LeftFoot).position_weight, 0.0);

        controller.toggle_ik();
        assert!(controller.state().ik_enabled);
    }

    #[test]
    fn test_toggling_ik_without_targets_leaves_hand_and_head() {
        let (mut controller, physics, mut animator) = setup();
        let hand_before = *animator.goal(IkGoal::RightHand);
        let look_before = *animator.look_at();

        controller.toggle_ik();
        controller.on_solve_ik(0, &physics, &mut animator);
        controller.toggle_ik();
        controller.on_solve_ik(0, &physics, &mut animator);

        assert_eq!(*animator.goal(IkGoal::RightHand), hand_before);
        assert_eq!(*animator.look_at(), look_before);
    }

    #[test]
    fn test_clearing_targets_releases_hand_and_head() {
        let (mut controller, physics, mut animator) = setup();
        controller.set_look_at_target(Some(Vec3::new(0.0, 1.6, 3.0)));
        controller.set_right_hand_target(Some(Transform::from_position(Vec3::new(0.4, 1.2, 0.3))));
        controller.on_solve_ik(0, &physics, &mut animator);
        assert_eq!(animator.goal(IkGoal::RightHand).position_weight, 1.0);
        assert_eq!(animator.look_at().weight, 1.0);

        controller.set_look_at_target(None);
        controller.set_right_hand_target(None);
        animator.begin_ik_pass([(IkGoal::RightHand, Transform::default())]);
        controller.on_solve_ik(0, &physics, &mut animator);

        assert_eq!(animator.goal(IkGoal::RightHand).position_weight, 0.0);
        assert_eq!(animator.goal(IkGoal::RightHand).rotation_weight, 0.0);
        assert_eq!(animator.look_at().weight, 0.0);
    }

    #[test]
    fn test_disabling_ik_restores_animated_hand() {
        let (mut controller, physics, mut animator) = setup();
        let animated = Transform::from_position(Vec3::new(0.3, 1.0, 0.1));
        animator.begin_ik_pass([(IkGoal::RightHand, animated)]);
        controller.set_look_at_target(Some(Vec3::new(0.0, 1.6, 3.0)));
        controller.set_right_hand_target(Some(Transform::from_position(Vec3::new(0.4, 1.2, 0.3))));
        controller.on_solve_ik(0, &physics, &mut animator);
        assert_ne!(animator.resolved_goal(IkGoal::RightHand), animated);

        controller.toggle_ik();
        // No new pass from the driver: turning IK off alone drops the pin
        controller.on_solve_ik(0, &physics, &mut animator);

        assert_eq!(animator.resolved_goal(IkGoal::RightHand), animated);
        assert_eq!(animator.look_at().weight, 0.0);
    }

    #[test]
    fn test_ik_skipped_while_ragdolled() {
        let (mut controller, mut physics, mut animator) = setup();
        controller.set_look_at_target(Some(Vec3::new(0.0, 1.6, 3.0)));
        controller
            .enter_ragdoll(RagdollCause::Stagger, &mut physics, &mut animator)
            .unwrap();

        controller.on_solve_ik(0, &physics, &mut animator);
        assert_eq!(animator.look_at().weight, 0.0);
    }

    #[test]
    fn test_animation_events() {
        let (mut controller, _, _) = setup();

        controller.enable_damage();
        assert!(controller.state().damage_window_open);
        controller.play_footstep();
        controller.disable_damage();
        assert!(!controller.state().damage_window_open);

        assert_eq!(
            controller.drain_events(),
            vec![
                ControllerEvent::DamageWindowOpened,
                ControllerEvent::Footstep { position: Vec3::ZERO },
                ControllerEvent::DamageWindowClosed,
            ]
        );
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_custom_ground_check_point() {
        let controller = CharacterAnimationController::new(Transform::default())
            .with_ground_check_point(Vec3::new(0.0, 1.0, 0.0));
        let mut gizmos = GizmoBuffer::new();

        controller.draw_gizmos(&MockPhysics::on_ground(), &mut gizmos);

        assert_eq!(
            gizmos.drain(),
            vec![GizmoShape::Sphere {
                center: Vec3::new(0.0, 1.0, 0.0),
                radius: 0.2,
                color: Color::RED,
            }]
        );
    }
}
