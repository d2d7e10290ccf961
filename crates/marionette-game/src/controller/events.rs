//! Events the controller emits for other systems (audio, combat, UI)

use glam::Vec3;

use super::RagdollCause;

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Jump impulse applied
    JumpStarted,
    /// Jump clip reported its end
    JumpEnded,
    /// Attack trigger fired
    Attack,
    /// Physics took over the skeleton
    RagdollEntered { cause: RagdollCause },
    /// Animation took back over; the root now stands at `position`
    RagdollExited { position: Vec3 },
    /// Foot contact marker in a locomotion clip
    Footstep { position: Vec3 },
    /// Attack clip opened its damage window
    DamageWindowOpened,
    /// Attack clip closed its damage window
    DamageWindowClosed,
    IkToggled { enabled: bool },
}
