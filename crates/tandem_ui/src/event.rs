//! Per-element event flags.
//!
//! Several events can happen to one element within a single frame: a click
//! faster than the frame time yields both `went_down` and `went_up`. Flags are
//! therefore independent booleans, combined with `|`.
//!
//! A typical drag produces, over several frames:
//! `went_down` → `is_down`… → `start_drag` → `is_dragging`… → `end_drag`.

/// The set of events an element received this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Event {
    /// Pointer (or activate button) was released over the element this frame.
    /// Only fires for the element that received the matching `went_down`.
    pub went_up: bool,
    /// Pointer (or activate button) was pressed over the element this frame.
    pub went_down: bool,
    /// Press is still held on the element, on frames after `went_down`.
    pub is_down: bool,
    /// Pointer motion since the press crossed the drag threshold this frame.
    pub start_drag: bool,
    /// The drag owned by this element ended this frame.
    pub end_drag: bool,
    /// The drag owned by this element is ongoing.
    pub is_dragging: bool,
    /// Mouse-class pointer is over the element and not pressed.
    pub hover: bool,
}

impl Event {
    /// No event. Also what every query returns during the measure pass.
    pub const NONE: Self = Self {
        went_up: false,
        went_down: false,
        is_down: false,
        start_drag: false,
        end_drag: false,
        is_dragging: false,
        hover: false,
    };

    /// Only `went_up`.
    pub const WENT_UP: Self = Self { went_up: true, ..Self::NONE };
    /// Only `went_down`.
    pub const WENT_DOWN: Self = Self { went_down: true, ..Self::NONE };
    /// Only `is_down`.
    pub const IS_DOWN: Self = Self { is_down: true, ..Self::NONE };
    /// Only `start_drag`.
    pub const START_DRAG: Self = Self { start_drag: true, ..Self::NONE };
    /// Only `end_drag`.
    pub const END_DRAG: Self = Self { end_drag: true, ..Self::NONE };
    /// Only `is_dragging`.
    pub const IS_DRAGGING: Self = Self { is_dragging: true, ..Self::NONE };
    /// Only `hover`.
    pub const HOVER: Self = Self { hover: true, ..Self::NONE };

    /// Returns true if no flag is set.
    #[must_use]
    pub const fn is_none(self) -> bool {
        !(self.went_up
            || self.went_down
            || self.is_down
            || self.start_drag
            || self.end_drag
            || self.is_dragging
            || self.hover)
    }

    /// Returns true if every flag set in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.went_up || !other.went_up)
            && (self.went_down || !other.went_down)
            && (self.is_down || !other.is_down)
            && (self.start_drag || !other.start_drag)
            && (self.end_drag || !other.end_drag)
            && (self.is_dragging || !other.is_dragging)
            && (self.hover || !other.hover)
    }

    /// Returns true if any drag-related flag is set.
    #[must_use]
    pub const fn is_drag(self) -> bool {
        self.start_drag || self.is_dragging || self.end_drag
    }

    /// Names of the set flags, for logging.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        [
            (self.went_up, "went_up"),
            (self.went_down, "went_down"),
            (self.is_down, "is_down"),
            (self.start_drag, "start_drag"),
            (self.end_drag, "end_drag"),
            (self.is_dragging, "is_dragging"),
            (self.hover, "hover"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

impl std::ops::BitOr for Event {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            went_up: self.went_up || rhs.went_up,
            went_down: self.went_down || rhs.went_down,
            is_down: self.is_down || rhs.is_down,
            start_drag: self.start_drag || rhs.start_drag,
            end_drag: self.end_drag || rhs.end_drag,
            is_dragging: self.is_dragging || rhs.is_dragging,
            hover: self.hover || rhs.hover,
        }
    }
}

impl std::ops::BitOrAssign for Event {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_within_one_frame() {
        let click = Event::WENT_DOWN | Event::WENT_UP;
        assert!(click.contains(Event::WENT_DOWN));
        assert!(click.contains(Event::WENT_UP));
        assert!(!click.contains(Event::IS_DOWN));
        assert_eq!(click.names(), vec!["went_up", "went_down"]);
    }

    #[test]
    fn test_none() {
        assert!(Event::NONE.is_none());
        assert!(Event::default().is_none());
        assert!(!Event::HOVER.is_none());
        assert!(Event::IS_DRAGGING.is_drag());
    }
}
