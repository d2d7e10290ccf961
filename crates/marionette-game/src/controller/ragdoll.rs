//! Animated/ragdoll state machine
//!
//! Exactly one of animation or physics drives the skeleton. Entering ragdoll
//! hands the bones to physics; exiting snaps the character root to where the
//! root bone settled and restarts the idle state.

use marionette_anim::Animator;
use marionette_core::Transform;
use marionette_physics::CharacterPhysics;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnimatorNames;
use crate::error::ControllerError;

/// Who drives the skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RagdollMode {
    #[default]
    Animated,
    Ragdoll,
}

/// Why the character went limp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RagdollCause {
    Death,
    Stagger,
    HitReaction,
    /// Debug key binding
    Debug,
}

#[derive(Debug, Clone, Default)]
pub struct RagdollSwitch {
    mode: RagdollMode,
}

impl RagdollSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RagdollMode {
        self.mode
    }

    pub fn is_ragdoll(&self) -> bool {
        self.mode == RagdollMode::Ragdoll
    }

    /// Hand the skeleton to physics. Returns `false` if already ragdolled.
    pub fn enter(
        &mut self,
        cause: RagdollCause,
        physics: &mut impl CharacterPhysics,
        animator: &mut impl Animator,
    ) -> Result<bool, ControllerError> {
        if self.is_ragdoll() {
            return Ok(false);
        }

        physics.set_ragdoll_simulated(true)?;
        animator.set_enabled(false);
        self.mode = RagdollMode::Ragdoll;

        info!("Entered ragdoll ({:?})", cause);
        Ok(true)
    }

    /// Hand the skeleton back to animation.
    ///
    /// Returns the root bone pose the character should now stand at, or
    /// `None` if already animated. Nothing changes when the rig has no root.
    pub fn exit(
        &mut self,
        physics: &mut impl CharacterPhysics,
        animator: &mut impl Animator,
        names: &AnimatorNames,
    ) -> Result<Option<Transform>, ControllerError> {
        if !self.is_ragdoll() {
            return Ok(None);
        }

        let root = physics
            .ragdoll_root_pose()
            .ok_or(ControllerError::MissingRootBone)?;

        physics.teleport(root)?;
        physics.set_ragdoll_simulated(false)?;
        animator.set_enabled(true);
        animator.play(&names.idle_state, names.idle_layer, 0.0);
        self.mode = RagdollMode::Animated;

        info!("Exited ragdoll at {:?}", root.position);
        Ok(Some(root))
    }
}
