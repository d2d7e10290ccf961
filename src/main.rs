//! Marionette - headless driver for the character animation controller
//!
//! Builds a small physics scene, spawns one character with a ragdoll rig and
//! replays a scripted input timeline through the controller, logging what the
//! controller does each frame.

mod scenario;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use marionette_anim::{AnimatorState, IkGoal};
use marionette_core::{FrameTime, Transform};
use marionette_game::{CharacterAnimationController, GizmoBuffer, InputState};
use marionette_physics::{CharacterBody, PhysicsWorld, RagdollRig, RapierCharacter};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use scenario::{ClipEvent, Scenario};
use settings::DriverSettings;

/// Stride frequency of the stand-in walk cycle (radians per second)
const STRIDE_RATE: f32 = 8.0;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Marionette driver...");

    let mut controller_path = None;
    let mut save_settings = false;
    for arg in std::env::args().skip(1) {
        if arg == "--save-settings" {
            save_settings = true;
        } else {
            controller_path = Some(PathBuf::from(arg));
        }
    }

    let settings = DriverSettings::load_default();
    if save_settings {
        settings.save()?;
    }
    let config = settings::load_controller_config(controller_path.as_deref());

    // Scene: flat ground plus a ramp in front of the character
    let mut physics = PhysicsWorld::with_config(settings.physics_config());
    physics.create_ground(0.0);
    physics.create_static_box(
        Vec3::new(1.0, 0.5, 1.0),
        Vec3::new(0.0, -0.35, 3.0),
        Quat::from_rotation_x(0.25),
    );

    let spawn = Transform::default();
    let body = CharacterBody::spawn(&mut physics, spawn);
    let rig = RagdollRig::spawn_humanoid(&mut physics, spawn);
    physics.refresh_queries();

    let mut controller = CharacterAnimationController::with_config(spawn, config);
    controller.set_look_at_target(Some(Vec3::new(0.0, 1.6, 5.0)));

    let mut animator = AnimatorState::new();
    let mut input = InputState::new();
    let mut time = FrameTime::new(settings.time.clone());
    let mut gizmos = GizmoBuffer::new();
    let scenario = Scenario::showcase();

    for frame in 0..settings.run.frames {
        time.update(settings.run.frame_delta);
        for _ in 0..time.fixed_steps() {
            if !controller.state().ragdoll_active {
                rig.follow_root(&mut physics, &controller.state().root())?;
            }
            physics.step();
        }

        scenario.apply(frame, &mut input);
        {
            let mut character = RapierCharacter::new(&mut physics, &body, &rig);
            controller.on_frame(&input, time.delta_time, &mut character, &mut animator)?;
        }

        for event in scenario.clip_events_at(frame) {
            match event {
                ClipEvent::JumpEnded => controller.jump_ended(&mut animator),
                ClipEvent::Footstep => controller.play_footstep(),
                ClipEvent::DamageOn => controller.enable_damage(),
                ClipEvent::DamageOff => controller.disable_damage(),
            }
        }

        // Animation evaluation: the graph consumes triggers and authors foot poses
        if animator.consume_trigger(&controller.config.animator.attack) {
            debug!("Attack trigger consumed");
        }
        let speed = animator.float(&controller.config.animator.speed);
        animator.begin_ik_pass(animated_feet(&controller.state().root(), time.total_time as f32, speed));
        controller.on_solve_ik(0, &physics, &mut animator);

        controller.draw_gizmos(&physics, &mut gizmos);
        for shape in gizmos.drain() {
            debug!(?shape, "Gizmo");
        }

        for event in controller.drain_events() {
            info!(frame, ?event, "Controller event");
        }

        if settings.run.summary_interval > 0 && frame % settings.run.summary_interval == 0 {
            log_summary(frame, &controller, &animator);
        }

        input.clear_frame();
    }

    info!(
        "Run complete after {} frames ({:.2}s simulated)",
        time.frame_count, time.total_time
    );
    Ok(())
}

/// Stand-in for the walk cycle: feet alternate lifting in proportion to the
/// locomotion speed parameter
fn animated_feet(root: &Transform, time: f32, speed: f32) -> [(IkGoal, Transform); 2] {
    let phase = (time * STRIDE_RATE).sin();
    let lift = |side: f32| (side * phase).max(0.0) * 0.08 * speed;

    let foot = |x: f32, side: f32| {
        Transform::from_position_rotation(
            root.transform_point(Vec3::new(x, lift(side), 0.0)),
            root.rotation,
        )
    };

    [
        (IkGoal::LeftFoot, foot(-0.12, 1.0)),
        (IkGoal::RightFoot, foot(0.12, -1.0)),
    ]
}

fn log_summary(frame: u64, controller: &CharacterAnimationController, animator: &AnimatorState) {
    let state = controller.state();
    let left = animator.resolved_goal(IkGoal::LeftFoot);
    let right = animator.resolved_goal(IkGoal::RightFoot);
    info!(
        frame,
        position = ?state.position,
        grounded = state.grounded,
        speed = animator.float(&controller.config.animator.speed),
        jumping = state.jumping,
        ragdoll = state.ragdoll_active,
        ik = state.ik_enabled,
        left_foot_y = left.position.y,
        right_foot_y = right.position.y,
        "State"
    );
}
