//! Keyboard input
//!
//! Key events update held-state flags; the simulation reads one
//! [`InputSnapshot`] per frame. Nothing is queued.

/// Player actions held down this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub forward: bool,
    pub fire: bool,
    pub start: bool,
}

/// A named action a key can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Forward,
    Fire,
    Start,
}

impl Action {
    /// Map a `KeyboardEvent.code` to an action
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Action::Forward),
            "ArrowLeft" | "KeyA" => Some(Action::Left),
            "ArrowRight" | "KeyD" => Some(Action::Right),
            "Space" => Some(Action::Fire),
            "Enter" | "NumpadEnter" => Some(Action::Start),
            _ => None,
        }
    }
}

/// Held-key tracker fed by key-down/key-up events
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    actions: InputSnapshot,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is bound (caller may suppress the browser default)
    pub fn key_down(&mut self, code: &str) -> bool {
        self.set(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.set(code, false)
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.actions = InputSnapshot::default();
    }

    pub fn snapshot(&self) -> InputSnapshot {
        self.actions
    }

    fn set(&mut self, code: &str, held: bool) -> bool {
        let Some(action) = Action::from_key_code(code) else {
            return false;
        };
        let flag = match action {
            Action::Left => &mut self.actions.left,
            Action::Right => &mut self.actions.right,
            Action::Forward => &mut self.actions.forward,
            Action::Fire => &mut self.actions.fire,
            Action::Start => &mut self.actions.start,
        };
        *flag = held;
        true
    }
}
