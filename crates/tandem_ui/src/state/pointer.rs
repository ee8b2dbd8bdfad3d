//! Pointer/drag resolver.
//!
//! Turns raw pointer samples into per-element [`Event`] flag sets. Ownership
//! is tracked per pointer slot in a [`Press`]: the first element in traversal
//! order that sees a pointer go down over it owns the press, and at most one
//! element owns the drag that follows.

use tandem_shared::constants::{MAX_POINTERS, NO_CAPTURED_POINTER};
use tandem_shared::Vec2i;

use crate::coords::Coordinates;
use crate::event::Event;
use crate::id::ElementId;
use crate::input::{InputState, PointerKind};
use crate::layout::Rect;

/// One press in progress on a pointer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    /// Physical position the pointer went down at.
    pub origin: Vec2i,
    /// Frame the pointer went down in.
    pub frame: u64,
    /// Element that received `WENT_DOWN`.
    pub owner: Option<ElementId>,
    /// Element that received `START_DRAG`.
    pub drag_owner: Option<ElementId>,
    /// Frame the drag started in.
    pub drag_frame: u64,
}

impl Press {
    const fn new(origin: Vec2i, frame: u64) -> Self {
        Self {
            origin,
            frame,
            owner: None,
            drag_owner: None,
            drag_frame: 0,
        }
    }

    /// Returns true once some element has started dragging this press.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag_owner.is_some()
    }
}

/// The single pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// Owning element.
    pub id: ElementId,
    /// Captured pointer slot.
    pub pointer: usize,
}

/// What an element exposes to the resolver for one check.
#[derive(Debug, Clone, Copy)]
pub struct HitQuery {
    /// Element identity.
    pub id: ElementId,
    /// Hit-testable rectangle in virtual units, already clipped.
    /// `None` when the element is fully clipped away.
    pub rect: Option<Rect>,
    /// Only report drag and hover flags; never claim a press.
    pub drag_only: bool,
    /// Drag start threshold in physical pixels.
    pub drag_threshold: i32,
}

/// Press, drag and capture ownership across frames.
#[derive(Debug, Clone)]
pub struct PointerResolver {
    presses: [Option<Press>; MAX_POINTERS],
    capture: Option<Capture>,
    capture_seen: bool,
    frame: u64,
}

impl Default for PointerResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerResolver {
    /// Creates a resolver with no presses and no capture.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            presses: [None; MAX_POINTERS],
            capture: None,
            capture_seen: false,
            frame: 0,
        }
    }

    /// Opens presses for pointers that went down this frame.
    pub fn begin_frame(&mut self, input: &InputState, frame: u64) {
        self.frame = frame;
        self.capture_seen = false;
        for (slot, sample) in input.pointers().iter().enumerate().take(MAX_POINTERS) {
            if sample.went_down {
                self.presses[slot] = Some(Press::new(sample.position, frame));
            }
        }
    }

    /// Releases a capture whose owner was not declared this frame and closes
    /// presses whose pointer is no longer held. Returns the released owner.
    pub fn end_frame(&mut self, input: &InputState) -> Option<ElementId> {
        let mut released = None;
        if let Some(capture) = self.capture {
            if !self.capture_seen {
                tracing::warn!("releasing pointer {} captured by undeclared {}", capture.pointer, capture.id);
                self.capture = None;
                released = Some(capture.id);
            }
        }

        for (slot, press) in self.presses.iter_mut().enumerate() {
            let held = input.pointer(slot).is_some_and(|p| p.is_down);
            if !held {
                *press = None;
            }
        }
        released
    }

    /// Resolves the event flags for one element.
    pub fn resolve(&mut self, query: &HitQuery, input: &InputState, coords: &Coordinates) -> Event {
        let mut event = Event::NONE;
        let frame = self.frame;

        if self.capture.is_some_and(|c| c.id == query.id) {
            self.capture_seen = true;
        }

        for (slot, sample) in input.pointers().iter().enumerate().take(MAX_POINTERS) {
            let captured_here = match self.capture {
                Some(c) if c.pointer == slot => {
                    if c.id != query.id {
                        continue;
                    }
                    true
                }
                _ => false,
            };

            let position = coords.physical_to_virtual(sample.position);
            let inside = query.rect.is_some_and(|r| r.contains(position));
            let over = captured_here || inside;

            if inside && sample.kind == PointerKind::Mouse && !sample.is_down && !sample.went_up {
                event |= Event::HOVER;
            }

            let Some(press) = self.presses[slot].as_mut() else {
                continue;
            };

            if !query.drag_only && sample.went_down && over && press.frame == frame && press.owner.is_none() {
                press.owner = Some(query.id);
                event |= Event::WENT_DOWN;
            }

            if press.drag_owner == Some(query.id) {
                if sample.went_up {
                    event |= Event::END_DRAG;
                } else if sample.is_down && press.drag_frame != frame {
                    event |= Event::IS_DRAGGING;
                }
            } else if press.drag_owner.is_none() && sample.is_down {
                let eligible = press.owner == Some(query.id) || captured_here || (query.drag_only && inside);
                let threshold = i64::from(query.drag_threshold.max(0));
                if eligible && sample.position.distance_squared(press.origin) > threshold * threshold {
                    press.drag_owner = Some(query.id);
                    press.drag_frame = frame;
                    event |= Event::START_DRAG;
                }
            }

            if !query.drag_only && press.owner == Some(query.id) && !press.is_dragging() && over {
                if sample.is_down && press.frame != frame {
                    event |= Event::IS_DOWN;
                }
                if sample.went_up {
                    event |= Event::WENT_UP;
                }
            }
        }

        if !event.is_none() {
            tracing::trace!("{} -> {:?}", query.id, event.names());
        }
        event
    }

    /// Captures the pointer pressing on `id`, or the first held pointer.
    /// Returns the captured slot.
    pub fn capture(&mut self, id: ElementId, input: &InputState) -> Option<usize> {
        let owned = self.presses.iter().position(|p| {
            p.is_some_and(|p| p.owner == Some(id) || p.drag_owner == Some(id))
        });
        let slot = owned.or_else(|| input.pointers().iter().position(|p| p.is_down || p.went_down))?;
        self.capture = Some(Capture { id, pointer: slot });
        self.capture_seen = true;
        Some(slot)
    }

    /// Releases the capture if `id` owns it.
    pub fn release(&mut self, id: ElementId) -> bool {
        if self.capture.is_some_and(|c| c.id == id) {
            self.capture = None;
            return true;
        }
        false
    }

    /// The current capture.
    #[must_use]
    pub const fn capture_state(&self) -> Option<Capture> {
        self.capture
    }

    /// Captured slot, or [`NO_CAPTURED_POINTER`].
    #[must_use]
    pub fn captured_pointer_index(&self) -> isize {
        self.capture
            .and_then(|c| isize::try_from(c.pointer).ok())
            .unwrap_or(NO_CAPTURED_POINTER)
    }

    /// The press on a slot.
    #[must_use]
    pub fn press(&self, slot: usize) -> Option<&Press> {
        self.presses.get(slot).and_then(Option::as_ref)
    }

    /// Slot whose press `id` owns or drags.
    #[must_use]
    pub fn slot_owned_by(&self, id: ElementId) -> Option<usize> {
        self.presses
            .iter()
            .position(|p| p.is_some_and(|p| p.owner == Some(id) || p.drag_owner == Some(id)))
    }

    /// Element dragging on any slot.
    #[must_use]
    pub fn drag_owners(&self) -> Vec<ElementId> {
        self.presses.iter().flatten().filter_map(|p| p.drag_owner).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: &str, rect: Rect) -> HitQuery {
        HitQuery {
            id: ElementId::new(name),
            rect: Some(rect),
            drag_only: false,
            drag_threshold: 8,
        }
    }

    fn coords() -> Coordinates {
        Coordinates::new(100.0, Vec2i::new(100, 100))
    }

    #[test]
    fn test_first_claim_wins() {
        let mut resolver = PointerResolver::new();
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(5, 5), PointerKind::Mouse);
        input.pointer_down(0);
        resolver.begin_frame(&input, 1);

        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let outer = resolver.resolve(&query("outer", rect), &input, &coords());
        let inner = resolver.resolve(&query("inner", rect), &input, &coords());

        assert!(outer.went_down);
        assert!(!inner.went_down);
        assert_eq!(resolver.press(0).and_then(|p| p.owner), Some(ElementId::new("outer")));
    }

    #[test]
    fn test_drag_only_does_not_claim_press() {
        let mut resolver = PointerResolver::new();
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(5, 5), PointerKind::Touch);
        input.pointer_down(0);
        resolver.begin_frame(&input, 1);

        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let mut listener = query("scroll", rect);
        listener.drag_only = true;

        assert!(resolver.resolve(&listener, &input, &coords()).is_none());
        assert!(resolver.resolve(&query("button", rect), &input, &coords()).went_down);

        // Move past the threshold: the listener resolves first and takes the drag.
        resolver.end_frame(&input);
        input.begin_frame();
        input.set_pointer(0, Vec2i::new(5, 20), PointerKind::Touch);
        resolver.begin_frame(&input, 2);
        assert!(resolver.resolve(&listener, &input, &coords()).start_drag);
        let button = resolver.resolve(&query("button", rect), &input, &coords());
        assert!(!button.is_down && !button.start_drag);
    }

    #[test]
    fn test_capture_routes_outside_rect() {
        let mut resolver = PointerResolver::new();
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(5, 5), PointerKind::Mouse);
        input.pointer_down(0);
        resolver.begin_frame(&input, 1);

        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let q = query("knob", rect);
        assert!(resolver.resolve(&q, &input, &coords()).went_down);
        assert_eq!(resolver.capture(q.id, &input), Some(0));
        assert_eq!(resolver.captured_pointer_index(), 0);

        resolver.end_frame(&input);
        input.begin_frame();
        input.set_pointer(0, Vec2i::new(90, 90), PointerKind::Mouse);
        resolver.begin_frame(&input, 2);

        // Another element under the pointer sees nothing.
        let other = query("other", Rect::new(80.0, 80.0, 20.0, 20.0));
        assert!(resolver.resolve(&other, &input, &coords()).is_none());
        assert!(resolver.resolve(&q, &input, &coords()).contains(Event::START_DRAG));

        assert!(resolver.release(q.id));
        assert_eq!(resolver.captured_pointer_index(), NO_CAPTURED_POINTER);
    }

    #[test]
    fn test_undeclared_capture_released() {
        let mut resolver = PointerResolver::new();
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(5, 5), PointerKind::Mouse);
        input.pointer_down(0);
        resolver.begin_frame(&input, 1);
        resolver.capture(ElementId::new("gone"), &input);
        resolver.end_frame(&input);

        input.begin_frame();
        resolver.begin_frame(&input, 2);
        assert_eq!(resolver.end_frame(&input), Some(ElementId::new("gone")));
        assert!(resolver.capture_state().is_none());
    }

    #[test]
    fn test_touch_never_hovers() {
        let mut resolver = PointerResolver::new();
        let mut input = InputState::new();
        input.set_pointer(0, Vec2i::new(5, 5), PointerKind::Touch);
        resolver.begin_frame(&input, 1);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(resolver.resolve(&query("a", rect), &input, &coords()).is_none());

        input.set_pointer(0, Vec2i::new(5, 5), PointerKind::Mouse);
        assert_eq!(resolver.resolve(&query("a", rect), &input, &coords()), Event::HOVER);
    }
}
