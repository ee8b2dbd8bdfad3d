//! Input snapshot consumed by the engine.
//!
//! The embedding's polling layer fills an [`InputState`] once per frame: call
//! [`InputState::begin_frame`], then record what the devices reported. The
//! engine only ever reads it. Pointer positions are physical pixels.

use tandem_shared::constants::MAX_POINTERS;
use tandem_shared::{Vec2, Vec2i};

/// What kind of device drives a pointer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerKind {
    /// Mouse (or a gamepad emulating one). Produces hover.
    #[default]
    Mouse,
    /// Touch screen finger. Never produces hover.
    Touch,
}

/// One pointer slot (mouse, or one finger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerSample {
    /// Current position in physical pixels.
    pub position: Vec2i,
    /// Position at the start of the frame.
    pub previous: Vec2i,
    /// Device kind.
    pub kind: PointerKind,
    /// Button/finger is currently held.
    pub is_down: bool,
    /// Button/finger went down this frame.
    pub went_down: bool,
    /// Button/finger went up this frame.
    pub went_up: bool,
}

impl PointerSample {
    /// Motion since the start of the frame, in physical pixels.
    #[must_use]
    pub fn delta(&self) -> Vec2i {
        self.position - self.previous
    }
}

/// Keyboard and gamepad buttons the engine reacts to.
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
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Space bar.
    Space,
    /// Either shift key.
    Shift,
    /// Gamepad d-pad up.
    DpadUp,
    /// Gamepad d-pad down.
    DpadDown,
    /// Gamepad d-pad left.
    DpadLeft,
    /// Gamepad d-pad right.
    DpadRight,
    /// Gamepad confirm button.
    GamepadA,
    /// Gamepad back button.
    GamepadB,
}

impl Key {
    /// Keys that activate the focused element.
    pub const ACTIVATE: [Self; 3] = [Self::Enter, Self::Space, Self::GamepadA];
}

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Next element in traversal order.
    Next,
    /// Previous element in traversal order.
    Previous,
}

/// Input state for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Pointer slots (index 0 is the mouse or first finger).
    pointers: Vec<PointerSample>,
    /// Mouse wheel delta (x, y), in notches.
    pub wheel_delta: Vec2,
    /// Gamepad analog scroll axis, each component in [-1, 1].
    pub gamepad_axis: Vec2,
    /// Keys pressed this frame.
    keys_pressed: Vec<Key>,
    /// Keys released this frame.
    keys_released: Vec<Key>,
    /// Keys currently held.
    keys_down: Vec<Key>,
    /// Text input this frame.
    pub text_input: String,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new frame, clearing per-frame state.
    pub fn begin_frame(&mut self) {
        for pointer in &mut self.pointers {
            pointer.previous = pointer.position;
            pointer.went_down = false;
            pointer.went_up = false;
        }
        self.wheel_delta = Vec2::ZERO;
        self.gamepad_axis = Vec2::ZERO;
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.text_input.clear();
    }

    /// Updates a pointer slot position, creating the slot if needed.
    ///
    /// Slots beyond [`MAX_POINTERS`] are ignored.
    pub fn set_pointer(&mut self, index: usize, position: Vec2i, kind: PointerKind) {
        let created = index >= self.pointers.len();
        if let Some(pointer) = self.slot_mut(index) {
            if created {
                pointer.previous = position;
            }
            pointer.position = position;
            pointer.kind = kind;
        }
    }

    /// Records a press on a pointer slot.
    pub fn pointer_down(&mut self, index: usize) {
        if let Some(pointer) = self.slot_mut(index) {
            if !pointer.is_down {
                pointer.went_down = true;
                pointer.is_down = true;
            }
        }
    }

    /// Records a release on a pointer slot.
    pub fn pointer_up(&mut self, index: usize) {
        if let Some(pointer) = self.slot_mut(index) {
            if pointer.is_down {
                pointer.went_up = true;
                pointer.is_down = false;
            }
        }
    }

    /// Records scroll input.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.wheel_delta.x += dx;
        self.wheel_delta.y += dy;
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
        if self.keys_down.contains(&key) {
            self.keys_released.push(key);
            self.keys_down.retain(|&k| k != key);
        }
    }

    /// Records text input.
    pub fn text(&mut self, text: &str) {
        self.text_input.push_str(text);
    }

    /// All pointer slots.
    #[must_use]
    pub fn pointers(&self) -> &[PointerSample] {
        &self.pointers
    }

    /// A single pointer slot.
    #[must_use]
    pub fn pointer(&self, index: usize) -> Option<&PointerSample> {
        self.pointers.get(index)
    }

    /// Returns true if the key was pressed this frame.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    #[must_use]
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    /// Returns true if the key is currently held.
    #[must_use]
    pub fn key_held(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if any pointer went down this frame.
    #[must_use]
    pub fn any_pointer_went_down(&self) -> bool {
        self.pointers.iter().any(|p| p.went_down)
    }

    /// Focus moves requested this frame, in press order.
    #[must_use]
    pub fn navigation(&self) -> Vec<Navigation> {
        let shift = self.key_held(Key::Shift);
        self.keys_pressed
            .iter()
            .filter_map(|key| match key {
                Key::Down | Key::Right | Key::DpadDown | Key::DpadRight => Some(Navigation::Next),
                Key::Up | Key::Left | Key::DpadUp | Key::DpadLeft => Some(Navigation::Previous),
                Key::Tab if shift => Some(Navigation::Previous),
                Key::Tab => Some(Navigation::Next),
                _ => None,
            })
            .collect()
    }

    /// The activate button went down this frame.
    #[must_use]
    pub fn activate_went_down(&self) -> bool {
        Key::ACTIVATE.iter().any(|&k| self.key_pressed(k))
    }

    /// The activate button is held.
    #[must_use]
    pub fn activate_held(&self) -> bool {
        Key::ACTIVATE.iter().any(|&k| self.key_held(k))
    }

    /// The activate button went up this frame.
    #[must_use]
    pub fn activate_went_up(&self) -> bool {
        Key::ACTIVATE.iter().any(|&k| self.key_released(k))
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut PointerSample> {
        if index >= MAX_POINTERS {
            return None;
        }
        if self.pointers.len() <= index {
            self.pointers.resize(index + 1, PointerSample::default());
        }
        self.pointers.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_click() {
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(10, 10), PointerKind::Mouse);

        input.pointer_down(0);
        let p = input.pointer(0).copied().unwrap_or_default();
        assert!(p.went_down && p.is_down);

        input.begin_frame();
        let p = input.pointer(0).copied().unwrap_or_default();
        assert!(!p.went_down && p.is_down);

        input.pointer_up(0);
        let p = input.pointer(0).copied().unwrap_or_default();
        assert!(p.went_up && !p.is_down);
    }

    #[test]
    fn test_press_and_release_same_frame() {
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(1, 1), PointerKind::Touch);
        input.pointer_down(0);
        input.pointer_up(0);

        let p = input.pointer(0).copied().unwrap_or_default();
        assert!(p.went_down && p.went_up && !p.is_down);
    }

    #[test]
    fn test_pointer_delta() {
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(10, 10), PointerKind::Mouse);
        input.begin_frame();
        input.set_pointer(0, Vec2i::new(14, 7), PointerKind::Mouse);
        assert_eq!(input.pointer(0).map(PointerSample::delta), Some(Vec2i::new(4, -3)));
    }

    #[test]
    fn test_navigation_keys() {
        let mut input = InputState::new();
        input.key_down(Key::Down);
        input.key_down(Key::Shift);
        input.key_down(Key::Tab);
        assert_eq!(input.navigation(), vec![Navigation::Next, Navigation::Previous]);

        input.begin_frame();
        assert!(input.navigation().is_empty());
        input.key_down(Key::GamepadA);
        assert!(input.activate_went_down());
        assert!(input.activate_held());
    }

    #[test]
    fn test_slots_beyond_limit_are_ignored() {
        let mut input = InputState::new();
        input.set_pointer(MAX_POINTERS, Vec2i::ZERO, PointerKind::Touch);
        assert!(input.pointers().is_empty());
    }
}
