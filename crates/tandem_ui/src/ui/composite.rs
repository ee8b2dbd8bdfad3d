//! Group composites: modal barrier, scroll view and slider.

use tandem_shared::Vec2;

use super::Ui;
use crate::error::{Pass, UiError};
use crate::layout::Direction;
use crate::tree::NodeKind;

impl Ui<'_> {
    /// Makes the current group an input barrier. Interactive elements declared
    /// before it stop receiving pointer events and drop out of the focus order,
    /// but still render. When several groups are modal, the last one wins.
    pub fn modal_group(&mut self) {
        if self.error.is_some() {
            return;
        }
        let Some(index) = self.stack.last().map(|g| g.index) else {
            self.fail(UiError::NoOpenGroup { call: "modal_group" });
            return;
        };
        if self.pass == Pass::Measure {
            self.measured.set_modal_barrier(index);
        }
    }

    /// Turns the current group into a scroll view with a fixed `size` viewport.
    ///
    /// `offset` is owned by the caller and updated from drags, the mouse wheel
    /// (while hovered) and the gamepad axis (while focused), then clamped to the
    /// scrollable range. Children are laid out over the full content extent,
    /// shifted by `-offset`, and clipped to the viewport.
    pub fn start_scroll(&mut self, size: Vec2, offset: &mut Vec2) {
        let Some(index) = self.start_composite(NodeKind::Scroll, "start_scroll") else {
            return;
        };

        if self.pass == Pass::Measure {
            if let Some(group) = self.stack.last_mut() {
                group.viewport = Some(size);
            }
            return;
        }

        let event = self.check_group_event(true, "start_scroll");
        let Some(group) = self.stack.last() else {
            return;
        };
        let (id, viewport, speed) = (group.id, group.rect.size(), group.scroll_speed);
        let input = self.input;

        if event.start_drag {
            self.interaction.pointers.capture(id, input);
        }
        if event.start_drag || event.is_dragging {
            if let Some(sample) = self
                .interaction
                .pointers
                .slot_owned_by(id)
                .and_then(|slot| input.pointer(slot))
            {
                *offset -= self.coords.physical_to_virtual(sample.delta()) * speed.drag;
            }
        }
        if event.end_drag {
            self.interaction.pointers.release(id);
        }
        if event.hover {
            *offset -= input.wheel_delta * speed.wheel;
        }
        if self.interaction.focus.is_focused(id) {
            offset.x += input.gamepad_axis.x * viewport.x * speed.gamepad;
            offset.y += input.gamepad_axis.y * viewport.y * speed.gamepad;
        }

        let content = self.measured.get(index).map_or(viewport, |n| n.content_size);
        let max = (content - viewport).max(Vec2::ZERO);
        *offset = offset.max(Vec2::ZERO).min(max);

        if let Some(group) = self.stack.last_mut() {
            group.scroll_offset = Some(*offset);
        }
    }

    /// Closes the scroll view opened on the current group.
    pub fn end_scroll(&mut self) {
        if !self.end_composite(NodeKind::Scroll, "end_scroll") {
            return;
        }
        self.begin_content();
        if let Some(group) = self.stack.last_mut() {
            if group.clip_pushed {
                group.clip_pushed = false;
                self.renderer.pop_clip();
            }
        }
    }

    /// Turns the current group into a slider along `direction`.
    ///
    /// Pressing the group captures the pointer; while captured, the pointer
    /// position inside the group, less `scroll_margin` at both ends, is mapped
    /// to `value` in `[0, 1]`. Releasing the pointer releases the capture. The
    /// gamepad axis nudges `value` while the slider has focus.
    pub fn start_slider(&mut self, direction: Direction, scroll_margin: f32, value: &mut f32) {
        if self.start_composite(NodeKind::Slider, "start_slider").is_none() || self.pass == Pass::Measure {
            return;
        }

        let event = self.check_group_event(false, "start_slider");
        let Some(group) = self.stack.last() else {
            return;
        };
        let (id, rect, gamepad_speed) = (group.id, group.rect, group.scroll_speed.gamepad);
        let input = self.input;

        if event.went_down {
            self.interaction.pointers.capture(id, input);
        }

        let captured = self
            .interaction
            .pointers
            .capture_state()
            .filter(|c| c.id == id)
            .and_then(|c| input.pointer(c.pointer));
        if let Some(sample) = captured {
            let pointer = self.coords.physical_to_virtual(sample.position);
            let (start, extent, along) = match direction {
                Direction::Vertical => (rect.y, rect.height, pointer.y),
                Direction::Horizontal | Direction::Overlay => (rect.x, rect.width, pointer.x),
            };
            let span = extent - 2.0 * scroll_margin;
            if span > 0.0 {
                *value = ((along - start - scroll_margin) / span).clamp(0.0, 1.0);
            }
            if !sample.is_down {
                self.interaction.pointers.release(id);
            }
        }

        if self.interaction.focus.is_focused(id) {
            let axis = match direction {
                Direction::Vertical => input.gamepad_axis.y,
                Direction::Horizontal | Direction::Overlay => input.gamepad_axis.x,
            };
            *value = (*value + axis * gamepad_speed).clamp(0.0, 1.0);
        }
    }

    /// Closes the slider opened on the current group.
    pub fn end_slider(&mut self) {
        self.end_composite(NodeKind::Slider, "end_slider");
    }

    /// Marks the current group as a composite. Returns its node index.
    fn start_composite(&mut self, kind: NodeKind, call: &'static str) -> Option<usize> {
        let group = self.group_setting(call)?;
        group.kind = kind;
        let index = group.index;

        match self.pass {
            Pass::Measure => {
                if let Some(node) = self.measured.get_mut(index) {
                    node.kind = kind;
                }
            }
            Pass::Place => {
                if self.measured.get(index).map(|n| n.kind) != Some(kind) {
                    self.fail(UiError::MismatchedComposite { call });
                    return None;
                }
                if let Some(placed) = self.stack.last().and_then(|g| self.placed.get_mut(g.placed)) {
                    placed.kind = kind;
                }
            }
        }
        Some(index)
    }

    fn end_composite(&mut self, kind: NodeKind, call: &'static str) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.stack.last() {
            None => {
                self.fail(UiError::NoOpenGroup { call });
                false
            }
            Some(group) if group.kind != kind => {
                self.fail(UiError::MismatchedComposite { call });
                false
            }
            Some(_) => true,
        }
    }
}
