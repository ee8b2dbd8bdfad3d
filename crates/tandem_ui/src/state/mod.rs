//! Interaction state that survives between frames.
//!
//! Everything here is read and written only during pass 2 and the bookkeeping
//! that follows it. [`Interaction`] is cloned before pass 2 so a failing frame
//! can be rolled back.

mod focus;
mod pointer;
mod store;

pub use focus::FocusNavigator;
pub use pointer::{Capture, HitQuery, PointerResolver, Press};
pub use store::{ElementState, ElementStore, StateFlags};

use crate::id::ElementId;
use crate::input::InputState;

/// All persistent interaction state of a session.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    /// Per-element state.
    pub store: ElementStore,
    /// Press, drag and capture ownership.
    pub pointers: PointerResolver,
    /// Focus owner and traversal order.
    pub focus: FocusNavigator,
    /// Edit box currently in edit mode.
    pub editing: Option<ElementId>,
}

impl Interaction {
    /// Creates empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares per-frame bookkeeping before pass 2.
    pub fn begin_frame(&mut self, input: &InputState, frame: u64) {
        self.pointers.begin_frame(input, frame);
        self.focus.begin_frame(input);
    }

    /// Post-pass bookkeeping: navigation, stale captures, closed presses, and
    /// mirroring ownership into the element store.
    pub fn end_frame(&mut self, input: &InputState, frame: u64, prune_after: Option<u64>) {
        self.focus.navigate(&input.navigation());

        if let Some(released) = self.pointers.end_frame(input) {
            if let Some(state) = self.store.get_mut(released) {
                state.flags.assign(StateFlags::CAPTURED, false);
            }
        }

        if let Some(editing) = self.editing {
            let seen = self.store.get(editing).is_some_and(|s| s.last_seen_frame == frame);
            if !seen {
                self.editing = None;
            }
        }

        let capture = self.pointers.capture_state().map(|c| c.id);
        self.store.set_exclusive(StateFlags::CAPTURED, capture);
        self.store.set_exclusive(StateFlags::FOCUSED, self.focus.focus());
        self.store.set_exclusive(StateFlags::EDITING, self.editing);

        let drags: Vec<_> = self
            .pointers
            .drag_owners()
            .into_iter()
            .filter_map(|id| {
                let slot = self.pointers.slot_owned_by(id)?;
                self.pointers.press(slot).map(|press| (id, press.origin))
            })
            .collect();
        self.store.sync_drags(&drags);

        if let Some(max_age) = prune_after {
            let removed = self.store.prune(frame, max_age);
            if removed > 0 {
                tracing::debug!("pruned {} stale element state(s)", removed);
            }
        }
    }
}
