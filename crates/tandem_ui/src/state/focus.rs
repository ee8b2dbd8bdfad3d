//! Keyboard/gamepad focus.

use crate::event::Event;
use crate::id::ElementId;
use crate::input::{InputState, Navigation};

/// Focus owner, this frame's traversal order and last-device tracking.
#[derive(Debug, Clone)]
pub struct FocusNavigator {
    focus: Option<ElementId>,
    order: Vec<ElementId>,
    last_event_pointer: bool,
}

impl Default for FocusNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusNavigator {
    /// Creates a navigator with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self {
            focus: None,
            order: Vec::with_capacity(64),
            last_event_pointer: true,
        }
    }

    /// Starts collecting a new traversal order and notes which device class
    /// drove the latest press.
    pub fn begin_frame(&mut self, input: &InputState) {
        self.order.clear();
        if input.any_pointer_went_down() {
            self.last_event_pointer = true;
        } else if input.activate_went_down() || !input.navigation().is_empty() {
            self.last_event_pointer = false;
        }
    }

    /// Adds an element to this frame's traversal order.
    pub fn register(&mut self, id: ElementId) {
        if !self.order.contains(&id) {
            self.order.push(id);
        }
    }

    /// Focused element.
    #[must_use]
    pub const fn focus(&self) -> Option<ElementId> {
        self.focus
    }

    /// Moves focus to `id`.
    pub fn set_focus(&mut self, id: ElementId) {
        self.focus = Some(id);
    }

    /// Focuses `id` if nothing is focused.
    pub fn set_default(&mut self, id: ElementId) {
        if self.focus.is_none() {
            self.focus = Some(id);
        }
    }

    /// Returns true if `id` has focus.
    #[must_use]
    pub fn is_focused(&self, id: ElementId) -> bool {
        self.focus == Some(id)
    }

    /// Returns true if the latest press came from a pointer.
    #[must_use]
    pub const fn is_last_event_pointer_type(&self) -> bool {
        self.last_event_pointer
    }

    /// This frame's traversal order.
    #[must_use]
    pub fn order(&self) -> &[ElementId] {
        &self.order
    }

    /// Event flags the focused element gets from the activate button.
    #[must_use]
    pub fn focus_event(&self, id: ElementId, input: &InputState) -> Event {
        if !self.is_focused(id) {
            return Event::NONE;
        }
        let mut event = Event::NONE;
        if input.activate_went_down() {
            event |= Event::WENT_DOWN;
        } else if input.activate_held() {
            event |= Event::IS_DOWN;
        }
        if input.activate_went_up() {
            event |= Event::WENT_UP;
        }
        if !self.last_event_pointer {
            event |= Event::HOVER;
        }
        event
    }

    /// Applies navigation moves along this frame's order, wrapping at both ends.
    pub fn navigate(&mut self, moves: &[Navigation]) {
        if self.order.is_empty() {
            return;
        }
        let last = self.order.len() - 1;
        for step in moves {
            let current = self
                .focus
                .and_then(|id| self.order.iter().position(|&o| o == id));
            let next = match (current, step) {
                (None, Navigation::Next) => 0,
                (None, Navigation::Previous) => last,
                (Some(i), Navigation::Next) => if i == last { 0 } else { i + 1 },
                (Some(i), Navigation::Previous) => if i == 0 { last } else { i - 1 },
            };
            self.focus = Some(self.order[next]);
        }
        if !moves.is_empty() {
            tracing::debug!("focus moved to {:?}", self.focus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    fn navigator(names: &[&str]) -> FocusNavigator {
        let mut nav = FocusNavigator::new();
        for name in names {
            nav.register(ElementId::new(name));
        }
        nav
    }

    #[test]
    fn test_wraparound() {
        let mut nav = navigator(&["a", "b", "c"]);
        nav.set_focus(ElementId::new("c"));
        nav.navigate(&[Navigation::Next]);
        assert_eq!(nav.focus(), Some(ElementId::new("a")));
        nav.navigate(&[Navigation::Previous]);
        assert_eq!(nav.focus(), Some(ElementId::new("c")));
    }

    #[test]
    fn test_stale_focus_moves_to_ends() {
        let mut nav = navigator(&["a", "b", "c"]);
        nav.set_focus(ElementId::new("gone"));
        nav.navigate(&[Navigation::Previous]);
        assert_eq!(nav.focus(), Some(ElementId::new("c")));

        nav.set_focus(ElementId::new("gone"));
        nav.navigate(&[Navigation::Next]);
        assert_eq!(nav.focus(), Some(ElementId::new("a")));
    }

    #[test]
    fn test_default_focus_only_when_empty() {
        let mut nav = FocusNavigator::new();
        nav.set_default(ElementId::new("a"));
        nav.set_default(ElementId::new("b"));
        assert_eq!(nav.focus(), Some(ElementId::new("a")));
    }

    #[test]
    fn test_activate_button_and_device_class() {
        let mut nav = FocusNavigator::new();
        let id = ElementId::new("a");
        nav.set_focus(id);

        let mut input = InputState::new();
        input.key_down(Key::Enter);
        nav.begin_frame(&input);
        assert!(!nav.is_last_event_pointer_type());
        assert_eq!(nav.focus_event(id, &input), Event::WENT_DOWN | Event::HOVER);
        assert!(nav.focus_event(ElementId::new("b"), &input).is_none());

        input.begin_frame();
        input.key_up(Key::Enter);
        assert!(nav.focus_event(id, &input).went_up);
    }
}
