//! Input system with action-based mapping
//!
//! Provides an abstraction layer between raw input events and controller
//! actions. The controller only ever sees [`InputState`].

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Actions the character controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Run modifier (Shift by default)
    Sprint,
    /// Jump (Space by default)
    Jump,
    /// Attack (Left mouse button by default)
    Attack,
    /// Debug: switch to ragdoll (K by default)
    EnterRagdoll,
    /// Debug: stand back up from ragdoll (L by default)
    ExitRagdoll,
    /// Toggle procedural IK (I by default)
    ToggleIk,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Record a press: held, and just pressed if it was not already held
    pub fn press(&mut self, action: InputAction) {
        if !self.held.contains(&action) {
            self.just_pressed.insert(action);
        }
        self.held.insert(action);
    }

    /// Record a release
    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Raw movement axes, x = horizontal (right positive), y = vertical
    /// (forward positive), each in `[-1, 1]`
    pub fn movement_axes(&self) -> Vec2 {
        let axis = |positive: InputAction, negative: InputAction| {
            let mut value = 0.0;
            if self.is_held(positive) {
                value += 1.0;
            }
            if self.is_held(negative) {
                value -= 1.0;
            }
            value
        };

        Vec2::new(
            axis(InputAction::MoveRight, InputAction::MoveLeft),
            axis(InputAction::MoveForward, InputAction::MoveBackward),
        )
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.clear_frame();
    }
}

/// Binding of a physical key to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

/// Maps physical inputs to actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key/button to action mappings
    bindings: HashMap<InputBinding, InputAction>,
    /// Reverse lookup: action to all bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        };

        // Default WASD bindings
        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);

        // Actions
        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Sprint);
        bindings.bind(KeyCode::ShiftRight, InputAction::Sprint);
        bindings.bind_mouse(0, InputAction::Attack); // Left mouse button
        bindings.bind(KeyCode::KeyI, InputAction::ToggleIk);

        // Ragdoll test harness
        bindings.bind(KeyCode::KeyK, InputAction::EnterRagdoll);
        bindings.bind(KeyCode::KeyL, InputAction::ExitRagdoll);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.insert(InputBinding::Key(key), action);
    }

    /// Bind a mouse button to an action
    pub fn bind_mouse(&mut self, button: u32, action: InputAction) {
        self.insert(InputBinding::Mouse(button), action);
    }

    fn insert(&mut self, binding: InputBinding, action: InputAction) {
        if let Some(previous) = self.bindings.insert(binding, action) {
            if let Some(bindings) = self.reverse.get_mut(&previous) {
                bindings.retain(|b| *b != binding);
            }
        }
        self.reverse.entry(action).or_default().push(binding);
    }

    /// Unbind a key
    pub fn unbind(&mut self, key: KeyCode) {
        let binding = InputBinding::Key(key);
        if let Some(action) = self.bindings.remove(&binding) {
            if let Some(bindings) = self.reverse.get_mut(&action) {
                bindings.retain(|b| *b != binding);
            }
        }
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<InputAction> {
        self.bindings.get(binding).copied()
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.get_action(&InputBinding::Key(key))
    }

    /// All bindings for an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Input handler that processes raw events and updates state
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            if let Some(action) = self.bindings.get_key_action(key_code) {
                self.apply(action, element_state);
            }
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let button_id = match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        };

        if let Some(action) = self.bindings.get_action(&InputBinding::Mouse(button_id)) {
            self.apply(action, state);
        }
    }

    fn apply(&mut self, action: InputAction, element_state: ElementState) {
        match element_state {
            ElementState::Pressed => self.state.press(action),
            ElementState::Released => self.state.release(action),
        }
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }
}
