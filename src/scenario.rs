//! Scripted input and animation clip events for the headless driver

use std::collections::HashSet;

use marionette_game::{InputAction, InputState};

/// An action held over a frame range `[start, end)`
#[derive(Debug, Clone, Copy)]
pub struct HeldInput {
    pub action: InputAction,
    pub start: u64,
    pub end: u64,
}

/// Markers an animation clip would fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEvent {
    JumpEnded,
    Footstep,
    DamageOn,
    DamageOff,
}

#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub inputs: Vec<HeldInput>,
    pub clip_events: Vec<(u64, ClipEvent)>,
}

impl Scenario {
    /// Walk, run, jump, attack, fall into ragdoll, stand up, toggle IK
    pub fn showcase() -> Self {
        let mut scenario = Self::default();
        scenario
            .hold(InputAction::MoveForward, 30, 120)
            .hold(InputAction::Sprint, 60, 120)
            .hold(InputAction::Jump, 90, 92)
            .hold(InputAction::Attack, 140, 142)
            .hold(InputAction::EnterRagdoll, 170, 171)
            .hold(InputAction::ExitRagdoll, 260, 261)
            .hold(InputAction::ToggleIk, 280, 281)
            .hold(InputAction::ToggleIk, 300, 301);

        for frame in (40..120).step_by(20) {
            scenario.clip_events.push((frame, ClipEvent::Footstep));
        }
        scenario.clip_events.push((130, ClipEvent::JumpEnded));
        scenario.clip_events.push((145, ClipEvent::DamageOn));
        scenario.clip_events.push((155, ClipEvent::DamageOff));
        scenario
    }

    pub fn hold(&mut self, action: InputAction, start: u64, end: u64) -> &mut Self {
        self.inputs.push(HeldInput { action, start, end });
        self
    }

    /// Update `input` so exactly the actions scripted for `frame` are held,
    /// producing press/release edges against the previous frame
    pub fn apply(&self, frame: u64, input: &mut InputState) {
        let wanted: HashSet<InputAction> = self
            .inputs
            .iter()
            .filter(|held| (held.start..held.end).contains(&frame))
            .map(|held| held.action)
            .collect();

        let current: Vec<InputAction> = input.held.iter().copied().collect();
        for action in current {
            if !wanted.contains(&action) {
                input.release(action);
            }
        }
        for action in wanted {
            input.press(action);
        }
    }

    /// Clip events firing on `frame`
    pub fn clip_events_at(&self, frame: u64) -> impl Iterator<Item = ClipEvent> + '_ {
        self.clip_events
            .iter()
            .filter(move |(at, _)| *at == frame)
            .map(|(_, event)| *event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_produces_edges() {
        let mut scenario = Scenario::default();
        scenario.hold(InputAction::Jump, 1, 3);
        let mut input = InputState::new();

        scenario.apply(0, &mut input);
        assert!(!input.is_held(InputAction::Jump));

        input.clear_frame();
        scenario.apply(1, &mut input);
        assert!(input.is_just_pressed(InputAction::Jump));

        input.clear_frame();
        scenario.apply(2, &mut input);
        assert!(input.is_held(InputAction::Jump));
        assert!(!input.is_just_pressed(InputAction::Jump));

        input.clear_frame();
        scenario.apply(3, &mut input);
        assert!(input.is_just_released(InputAction::Jump));
    }

    #[test]
    fn test_showcase_clip_events() {
        let scenario = Scenario::showcase();
        assert_eq!(scenario.clip_events_at(130).collect::<Vec<_>>(), vec![ClipEvent::JumpEnded]);
        assert_eq!(scenario.clip_events_at(40).collect::<Vec<_>>(), vec![ClipEvent::Footstep]);
        assert_eq!(scenario.clip_events_at(41).count(), 0);
    }
}
