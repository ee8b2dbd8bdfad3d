//! Persistent per-element interaction state.

use std::collections::HashMap;

use tandem_shared::Vec2i;

use crate::event::Event;
use crate::id::ElementId;

/// Element state flags (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateFlags(u32);

impl StateFlags {
    /// Element owns a pointer capture.
    pub const CAPTURED: u32 = 1 << 0;
    /// Element owns an active drag.
    pub const DRAGGING: u32 = 1 << 1;
    /// Element has keyboard/gamepad focus.
    pub const FOCUSED: u32 = 1 << 2;
    /// Element is an edit box in edit mode.
    pub const EDITING: u32 = 1 << 3;

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

/// Cross-frame state of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    /// Element identity.
    pub id: ElementId,
    /// Event flags resolved for the element in its last frame.
    pub last_event: Event,
    /// State flags.
    pub flags: StateFlags,
    /// Physical press origin of the drag this element owns.
    pub drag_origin: Option<Vec2i>,
    /// Frame number the element was last declared in.
    pub last_seen_frame: u64,
}

impl ElementState {
    fn new(id: ElementId, frame: u64) -> Self {
        Self {
            id,
            last_event: Event::NONE,
            flags: StateFlags::default(),
            drag_origin: None,
            last_seen_frame: frame,
        }
    }

    /// Returns true if the element owns a capture.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.flags.has(StateFlags::CAPTURED)
    }

    /// Returns true if the element owns a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.flags.has(StateFlags::DRAGGING)
    }

    /// Returns true if the element has focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.flags.has(StateFlags::FOCUSED)
    }

    /// Returns true if the element is in edit mode.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.flags.has(StateFlags::EDITING)
    }
}

/// Table of [`ElementState`] keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    states: HashMap<ElementId, ElementState>,
}

impl ElementStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: HashMap::with_capacity(256),
        }
    }

    /// Records that `id` was declared in `frame` with `event`, creating the
    /// entry on first observation.
    pub fn observe(&mut self, id: ElementId, frame: u64, event: Event) -> &mut ElementState {
        let state = self
            .states
            .entry(id)
            .or_insert_with(|| ElementState::new(id, frame));
        state.last_seen_frame = frame;
        state.last_event = event;
        state
    }

    /// Gets an element's state.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&ElementState> {
        self.states.get(&id)
    }

    /// Gets mutable access to an element's state.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementState> {
        self.states.get_mut(&id)
    }

    /// Number of tracked elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Clears `flag` on every element except `keep`, and sets it on `keep`.
    pub fn set_exclusive(&mut self, flag: u32, keep: Option<ElementId>) {
        for state in self.states.values_mut() {
            state.flags.assign(flag, Some(state.id) == keep);
        }
    }

    /// Marks exactly the listed elements as dragging, with their press origins.
    pub fn sync_drags(&mut self, drags: &[(ElementId, Vec2i)]) {
        for state in self.states.values_mut() {
            let origin = drags.iter().find(|(id, _)| *id == state.id).map(|&(_, o)| o);
            state.flags.assign(StateFlags::DRAGGING, origin.is_some());
            state.drag_origin = origin;
        }
    }

    /// Drops entries not seen within the last `max_age` frames.
    /// Returns the number removed.
    pub fn prune(&mut self, frame: u64, max_age: u64) -> usize {
        let before = self.states.len();
        self.states
            .retain(|_, state| frame.saturating_sub(state.last_seen_frame) < max_age);
        before - self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_creates_and_updates() {
        let mut store = ElementStore::new();
        let id = ElementId::new("ok");

        store.observe(id, 1, Event::HOVER);
        store.observe(id, 2, Event::WENT_DOWN);

        let state = store.get(id).unwrap();
        assert_eq!(state.last_seen_frame, 2);
        assert_eq!(state.last_event, Event::WENT_DOWN);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_exclusive_flag() {
        let mut store = ElementStore::new();
        let a = ElementId::new("a");
        let b = ElementId::new("b");
        store.observe(a, 0, Event::NONE);
        store.observe(b, 0, Event::NONE);

        store.set_exclusive(StateFlags::FOCUSED, Some(a));
        assert!(store.get(a).unwrap().has_focus());
        assert!(!store.get(b).unwrap().has_focus());

        store.set_exclusive(StateFlags::FOCUSED, Some(b));
        assert!(!store.get(a).unwrap().has_focus());
        assert!(store.get(b).unwrap().has_focus());
    }

    #[test]
    fn test_prune_stale_entries() {
        let mut store = ElementStore::new();
        store.observe(ElementId::new("old"), 1, Event::NONE);
        store.observe(ElementId::new("new"), 10, Event::NONE);

        assert_eq!(store.prune(10, 5), 1);
        assert!(store.get(ElementId::new("old")).is_none());
        assert!(store.get(ElementId::new("new")).is_some());
    }
}
