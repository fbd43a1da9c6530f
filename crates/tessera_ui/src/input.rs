//! Per-frame input snapshot.
//!
//! The platform layer fills an [`InputState`] each frame; the router reads
//! it to resolve focus and emit events. Edges (just pressed, released) are
//! cleared by [`InputState::begin_frame`], held state persists.

use crate::layout::Vec2;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button. Drives focus and clicks.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

impl MouseButton {
    /// Every button, in mask order.
    pub const ALL: [Self; 3] = [Self::Left, Self::Right, Self::Middle];

    const fn mask(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
            Self::Middle => 4,
        }
    }
}

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Space bar.
    Space,
    /// A letter key, uppercase.
    Letter(char),
    /// A digit key, 0 to 9.
    Digit(u8),
    /// A function key, F1 to F12.
    Function(u8),
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
}

/// Input state for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    mouse: Vec2,
    prev_mouse: Vec2,
    buttons_pressed: u8,
    buttons_released: u8,
    buttons_down: u8,
    keys_pressed: Vec<Key>,
    keys_released: Vec<Key>,
    keys_down: Vec<Key>,
    text_input: String,
    /// Modifier keys state.
    pub modifiers: Modifiers,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new frame, clearing per-frame edges.
    pub fn begin_frame(&mut self) {
        self.prev_mouse = self.mouse;
        self.buttons_pressed = 0;
        self.buttons_released = 0;
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.text_input.clear();
    }

    /// Updates mouse position.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse = Vec2::new(x, y);
    }

    /// Records a mouse button press.
    pub fn mouse_button_down(&mut self, button: MouseButton) {
        if self.buttons_down & button.mask() == 0 {
            self.buttons_pressed |= button.mask();
        }
        self.buttons_down |= button.mask();
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        self.buttons_released |= button.mask();
        self.buttons_down &= !button.mask();
    }

    /// Records a key press.
    pub fn key_down(&mut self, key: Key) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.push(key);
            self.keys_down.push(key);
        }
    }

    /// Records a key release.
    pub fn key_up(&mut self, key: Key) {
        self.keys_released.push(key);
        self.keys_down.retain(|&k| k != key);
    }

    /// Records text input.
    pub fn text(&mut self, text: &str) {
        self.text_input.push_str(text);
    }

    /// Current cursor position.
    #[must_use]
    pub const fn mouse_position(&self) -> Vec2 {
        self.mouse
    }

    /// Returns true if the cursor moved since the previous frame.
    #[must_use]
    pub fn mouse_moved(&self) -> bool {
        self.mouse != self.prev_mouse
    }

    /// Returns true if the button went down this frame.
    #[must_use]
    pub fn mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed & button.mask() != 0
    }

    /// Returns true if the button was released this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.buttons_released & button.mask() != 0
    }

    /// Returns true if the button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.buttons_down & button.mask() != 0
    }

    /// Keys that went down this frame, in press order.
    #[must_use]
    pub fn keys_just_pressed(&self) -> &[Key] {
        &self.keys_pressed
    }

    /// Keys currently held.
    #[must_use]
    pub fn keys_held(&self) -> &[Key] {
        &self.keys_down
    }

    /// Keys released this frame.
    #[must_use]
    pub fn keys_released(&self) -> &[Key] {
        &self.keys_released
    }

    /// Text typed this frame.
    #[must_use]
    pub fn text_input(&self) -> &str {
        &self.text_input
    }
}
