//! The declaration context.
//!
//! A [`Ui`] is handed to the caller's declaration closure once per pass. Every
//! call consults the current [`Pass`]: in the measure pass leaves report their
//! sizes and groups aggregate them when they close; in the place pass groups
//! hand out rectangles top-down, render commands are recorded and input is
//! resolved.
//!
//! The closure cannot be unwound halfway, so contract violations are latched:
//! the first error is stored, later calls do nothing, and the session returns
//! the error once the pass ends.

mod composite;
mod widgets;

use std::collections::HashMap;

use tandem_shared::{Vec2, Vec2i};

use crate::config::EngineConfig;
use crate::coords::Coordinates;
use crate::error::{Pass, UiError};
use crate::event::Event;
use crate::id::ElementId;
use crate::input::InputState;
use crate::layout::{Alignment, GroupLayout, Layout, Margin, Rect};
use crate::render::{RenderCommand, TextureHandle, UIRenderer};
use crate::state::{HitQuery, Interaction};
use crate::style::{Background, Color, TextDirection, TextStyle};
use crate::text::TextShaper;
use crate::tree::{LayoutTree, NodeKind};

/// Per-group scroll speeds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollSpeed {
    drag: f32,
    wheel: f32,
    gamepad: f32,
}

/// A group between `start_group` and `end_group`.
#[derive(Debug, Clone)]
struct OpenGroup {
    index: usize,
    id: ElementId,
    kind: NodeKind,
    layout: GroupLayout,
    /// Assigned rectangle (place pass).
    rect: Rect,
    /// Index into the frame's placed nodes.
    placed: usize,
    background: Option<Background>,
    /// The first child has been declared; group settings are frozen.
    content_begun: bool,
    child_rects: Vec<Rect>,
    next_child: usize,
    /// Scroll offset applied to the arrangement.
    scroll_offset: Option<Vec2>,
    /// Viewport requested by `start_scroll` (measure pass).
    viewport: Option<Vec2>,
    clip_pushed: bool,
    drag_threshold: i32,
    scroll_speed: ScrollSpeed,
    /// Last resolved event and whether it was drag-only.
    event: Option<(bool, Event)>,
}

/// A node as placed in pass 2.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    /// Node kind.
    pub kind: NodeKind,
    /// Identity.
    pub id: ElementId,
    /// Top-left corner, virtual units.
    pub position: Vec2,
    /// Size, virtual units.
    pub size: Vec2,
    /// Nesting depth.
    pub depth: usize,
}

/// What a finished pass hands back to the session.
#[derive(Debug, Default)]
pub(crate) struct PassOutput {
    pub nodes: Vec<PlacedNode>,
    pub events: Vec<(ElementId, Event)>,
    pub keep_projection: bool,
}

/// Declaration context for one pass.
pub struct Ui<'f> {
    pass: Pass,
    frame: u64,
    config: &'f EngineConfig,
    coords: &'f mut Coordinates,
    input: &'f InputState,
    shaper: &'f mut dyn TextShaper,
    measured: &'f mut LayoutTree,
    interaction: &'f mut Interaction,
    renderer: &'f mut UIRenderer,
    error: Option<UiError>,
    stack: Vec<OpenGroup>,
    /// Nodes declared so far this pass.
    cursor: usize,
    /// A group has started; the coordinate system is frozen.
    locked: bool,
    keep_projection: bool,
    text_style: TextStyle,
    placed: Vec<PlacedNode>,
    events: Vec<(ElementId, Event)>,
    resolved: HashMap<ElementId, usize>,
}

impl<'f> Ui<'f> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        pass: Pass,
        frame: u64,
        config: &'f EngineConfig,
        coords: &'f mut Coordinates,
        input: &'f InputState,
        shaper: &'f mut dyn TextShaper,
        measured: &'f mut LayoutTree,
        interaction: &'f mut Interaction,
        renderer: &'f mut UIRenderer,
    ) -> Self {
        Self {
            pass,
            frame,
            config,
            coords,
            input,
            shaper,
            measured,
            interaction,
            renderer,
            error: None,
            stack: Vec::with_capacity(16),
            cursor: 0,
            locked: false,
            keep_projection: false,
            text_style: TextStyle::default(),
            placed: Vec::new(),
            events: Vec::new(),
            resolved: HashMap::new(),
        }
    }

    /// Validates the end of the pass and hands back what it produced.
    pub(crate) fn finish(self) -> Result<PassOutput, UiError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.stack.is_empty() {
            return Err(UiError::UnbalancedGroups {
                pass: self.pass,
                open: self.stack.len(),
            });
        }
        if self.pass == Pass::Place && self.cursor != self.measured.len() {
            return Err(UiError::NodeCountMismatch {
                measured: self.measured.len(),
                placed: self.cursor,
            });
        }
        Ok(PassOutput {
            nodes: self.placed,
            events: self.events,
            keep_projection: self.keep_projection,
        })
    }

    /// The pass being run.
    #[must_use]
    pub const fn pass(&self) -> Pass {
        self.pass
    }

    /// Returns true once a contract violation was latched this pass.
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Opens a group. Pass [`ElementId::DEFAULT_GROUP`] for groups that never
    /// check events.
    pub fn start_group(&mut self, layout: Layout, spacing: f32, id: impl Into<ElementId>) {
        self.open_group(NodeKind::Group, GroupLayout::new(layout, spacing), id.into());
    }

    /// Closes the innermost group.
    pub fn end_group(&mut self) {
        if self.error.is_some() {
            return;
        }
        if self.stack.is_empty() {
            self.fail(UiError::EndGroupWithoutStart { pass: self.pass });
            return;
        }
        self.begin_content();

        let Some(group) = self.stack.pop() else {
            return;
        };
        match self.pass {
            Pass::Measure => {
                let sizes = self.measured.child_sizes(group.index);
                let content = group.layout.measure(&sizes);
                if let Some(node) = self.measured.get_mut(group.index) {
                    node.layout = group.layout;
                    node.content_size = content;
                    node.size = group.viewport.unwrap_or(content);
                }
            }
            Pass::Place => {
                if group.clip_pushed {
                    self.renderer.pop_clip();
                }
            }
        }
    }

    /// Declares a balanced group around `body`.
    pub fn group(&mut self, layout: Layout, spacing: f32, id: impl Into<ElementId>, body: impl FnOnce(&mut Self)) {
        self.start_group(layout, spacing, id);
        body(self);
        self.end_group();
    }

    /// Sets the current group's margin. Must precede the group's first child.
    pub fn set_margin(&mut self, margin: impl Into<Margin>) {
        let margin = margin.into();
        if let Some(group) = self.group_setting("set_margin") {
            group.layout.margin = margin;
        }
    }

    /// Fills the current group with a solid color.
    pub fn color_background(&mut self, color: Color) {
        if let Some(group) = self.group_setting("color_background") {
            group.background = Some(Background::Color(color));
        }
    }

    /// Stretches a texture over the current group.
    pub fn image_background(&mut self, texture: &TextureHandle) {
        let texture = *texture;
        if let Some(group) = self.group_setting("image_background") {
            group.background = Some(Background::Image(texture));
        }
    }

    /// Draws a nine-patch texture behind the current group. `patch` holds the
    /// stretchable interior `(x0, y0, x1, y1)` in UV space.
    pub fn image_background_nine_patch(&mut self, texture: &TextureHandle, patch: tandem_shared::Vec4) {
        let texture = *texture;
        if let Some(group) = self.group_setting("image_background_nine_patch") {
            group.background = Some(Background::NinePatch { texture, patch });
        }
    }

    /// Aligns the current group inside the virtual canvas (root groups) or
    /// inside its parent's content area, then shifts it by `offset`.
    pub fn position_group(&mut self, horizontal: Alignment, vertical: Alignment, offset: Vec2) {
        if self.pass == Pass::Measure {
            self.group_setting("position_group");
            return;
        }

        let parent_area = match self.stack.len() {
            0 | 1 => Rect::from_pos_size(Vec2::ZERO, self.coords.virtual_canvas()),
            n => {
                let parent = &self.stack[n - 2];
                parent.rect.inset(parent.layout.margin)
            }
        };
        let Some(group) = self.group_setting("position_group") else {
            return;
        };

        let size = group.rect.size();
        group.rect.x = parent_area.x + horizontal.offset(parent_area.width, size.x) + offset.x;
        group.rect.y = parent_area.y + vertical.offset(parent_area.height, size.y) + offset.y;
        let (placed, position) = (group.placed, group.rect.position());
        if let Some(node) = self.placed.get_mut(placed) {
            node.position = position;
        }
    }

    /// Position of the current group, virtual units. Zero in the measure pass.
    #[must_use]
    pub fn group_position(&self) -> Vec2 {
        self.stack.last().map_or(Vec2::ZERO, |g| g.rect.position())
    }

    /// Size of the current group, virtual units. Zero in the measure pass.
    #[must_use]
    pub fn group_size(&self) -> Vec2 {
        self.stack.last().map_or(Vec2::ZERO, |g| g.rect.size())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Resolves pointer and focus events for the current group.
    ///
    /// Also enrolls the group in this frame's focus order. Always
    /// [`Event::NONE`] in the measure pass.
    pub fn check_event(&mut self) -> Event {
        self.check_group_event(false, "check_event")
    }

    /// Like [`Ui::check_event`], but only reports drag and hover flags and never
    /// claims a press, so elements inside the group still get clicks.
    pub fn check_drag_event(&mut self) -> Event {
        self.check_group_event(true, "check_drag_event")
    }

    /// Sets the scroll speeds for the current group.
    pub fn set_scroll_speed(&mut self, drag: f32, wheel: f32, gamepad: f32) {
        if let Some(group) = self.group_setting("set_scroll_speed") {
            group.scroll_speed = ScrollSpeed { drag, wheel, gamepad };
        }
    }

    /// Sets the drag start threshold for the current group, physical pixels.
    pub fn set_drag_start_threshold(&mut self, pixels: i32) {
        if let Some(group) = self.group_setting("set_drag_start_threshold") {
            group.drag_threshold = pixels.max(0);
        }
    }

    /// Routes every event of the pointer pressing on `id` to `id` until released.
    pub fn capture_pointer(&mut self, id: impl Into<ElementId>) {
        if self.pass == Pass::Place && self.error.is_none() {
            let id = id.into();
            if self.interaction.pointers.capture(id, self.input).is_some() {
                tracing::trace!("pointer captured by {}", id);
            }
        }
    }

    /// Releases the current capture, whoever owns it.
    pub fn release_pointer(&mut self) {
        if self.pass == Pass::Place && self.error.is_none() {
            if let Some(capture) = self.interaction.pointers.capture_state() {
                self.interaction.pointers.release(capture.id);
            }
        }
    }

    /// Captured pointer slot, or `-1`.
    #[must_use]
    pub fn captured_pointer_index(&self) -> isize {
        self.interaction.pointers.captured_pointer_index()
    }

    /// Focuses the current group if nothing has focus.
    pub fn set_default_focus(&mut self) {
        if self.pass != Pass::Place || self.error.is_some() {
            return;
        }
        match self.stack.last() {
            Some(group) => self.interaction.focus.set_default(group.id),
            None => self.fail(UiError::NoOpenGroup {
                call: "set_default_focus",
            }),
        }
    }

    /// Focused element, if any.
    #[must_use]
    pub fn focus(&self) -> Option<ElementId> {
        self.interaction.focus.focus()
    }

    /// Returns true if the latest press came from a pointer rather than a
    /// keyboard or gamepad.
    #[must_use]
    pub fn is_last_event_pointer_type(&self) -> bool {
        self.interaction.focus.is_last_event_pointer_type()
    }

    /// The input snapshot of this frame.
    #[must_use]
    pub const fn input(&self) -> &InputState {
        self.input
    }

    // ------------------------------------------------------------------
    // Coordinates
    // ------------------------------------------------------------------

    /// Changes the virtual resolution. Only allowed before the first group.
    pub fn set_virtual_resolution(&mut self, virtual_resolution: f32) {
        if self.error.is_some() {
            return;
        }
        if self.locked {
            self.fail(UiError::ResolutionLocked);
            return;
        }
        if let Err(err) = self.coords.set_virtual_resolution(virtual_resolution) {
            self.fail(err);
        }
    }

    /// Virtual size of the smallest canvas dimension.
    #[must_use]
    pub fn virtual_resolution(&self) -> f32 {
        self.coords.virtual_resolution()
    }

    /// Lays out against `canvas` and leaves the projection set up by the
    /// embedding untouched. Only allowed before the first group.
    pub fn use_existing_projection(&mut self, canvas: Vec2i) {
        if self.error.is_some() {
            return;
        }
        if self.locked {
            self.fail(UiError::ResolutionLocked);
            return;
        }
        self.coords.set_canvas(canvas);
        self.keep_projection = true;
    }

    /// Physical pixels per virtual unit.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.coords.scale()
    }

    /// Converts virtual units to physical pixels.
    #[must_use]
    pub fn virtual_to_physical(&self, v: Vec2) -> Vec2i {
        self.coords.virtual_to_physical(v)
    }

    /// Converts physical pixels to virtual units.
    #[must_use]
    pub fn physical_to_virtual(&self, v: Vec2i) -> Vec2 {
        self.coords.physical_to_virtual(v)
    }

    // ------------------------------------------------------------------
    // Text settings
    // ------------------------------------------------------------------

    /// Color of following text.
    pub fn set_text_color(&mut self, color: Color) {
        self.text_style.color = color;
    }

    /// Font of following text.
    pub fn set_text_font(&mut self, font: &str) {
        font.clone_into(&mut self.text_style.font);
    }

    /// Locale of following text.
    pub fn set_text_locale(&mut self, locale: &str) {
        locale.clone_into(&mut self.text_style.locale);
    }

    /// Layout direction of following text.
    pub fn set_text_direction(&mut self, direction: TextDirection) {
        self.text_style.direction = direction;
    }

    // ------------------------------------------------------------------
    // Internals shared with widgets and composites
    // ------------------------------------------------------------------

    fn fail(&mut self, err: UiError) {
        if self.error.is_none() {
            tracing::error!("{} pass: {}", self.pass, err);
            self.error = Some(err);
        }
    }

    /// Records a node, checking it against pass 1 in the place pass.
    fn declare(&mut self, kind: NodeKind, id: ElementId) -> Option<usize> {
        if self.error.is_some() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;

        match self.pass {
            Pass::Measure => {
                let parent = self.stack.last().map(|g| g.index);
                Some(self.measured.push(kind, id, parent))
            }
            Pass::Place => {
                let Some(node) = self.measured.get(index) else {
                    self.fail(UiError::NodeCountMismatch {
                        measured: self.measured.len(),
                        placed: self.cursor,
                    });
                    return None;
                };
                let matches = node.id == id
                    && (node.kind == kind || (kind == NodeKind::Group && node.kind.is_group()));
                if !matches {
                    let err = UiError::StructuralMismatch {
                        index,
                        measured: node.kind,
                        measured_id: node.id,
                        placed: kind,
                        placed_id: id,
                    };
                    self.fail(err);
                    return None;
                }
                Some(index)
            }
        }
    }

    fn open_group(&mut self, kind: NodeKind, layout: GroupLayout, id: ElementId) {
        let Some(index) = self.declare(kind, id) else {
            return;
        };
        self.locked = true;

        let rect = match self.pass {
            Pass::Measure => {
                self.begin_content();
                Rect::ZERO
            }
            Pass::Place if self.stack.is_empty() => {
                let size = self.measured.get(index).map_or(Vec2::ZERO, |n| n.size);
                Rect::from_pos_size(Vec2::ZERO, size)
            }
            Pass::Place => self.next_child_rect(),
        };

        let placed = self.placed.len();
        if self.pass == Pass::Place {
            self.placed.push(PlacedNode {
                kind,
                id,
                position: rect.position(),
                size: rect.size(),
                depth: self.stack.len(),
            });
        }

        self.stack.push(OpenGroup {
            index,
            id,
            kind,
            layout,
            rect,
            placed,
            background: None,
            content_begun: false,
            child_rects: Vec::new(),
            next_child: 0,
            scroll_offset: None,
            viewport: None,
            clip_pushed: false,
            drag_threshold: self.config.drag_start_threshold,
            scroll_speed: ScrollSpeed {
                drag: self.config.scroll_speed_drag,
                wheel: self.config.scroll_speed_wheel,
                gamepad: self.config.scroll_speed_gamepad,
            },
            event: None,
        });
    }

    /// The current group, if a group-scoped setting is still allowed on it.
    fn group_setting(&mut self, call: &'static str) -> Option<&mut OpenGroup> {
        if self.error.is_some() {
            return None;
        }
        let late = match self.stack.last() {
            None => Some(UiError::NoOpenGroup { call }),
            Some(group) if group.content_begun => Some(UiError::LateGroupSetting { setting: call }),
            Some(_) => None,
        };
        if let Some(err) = late {
            self.fail(err);
            return None;
        }
        self.stack.last_mut()
    }

    /// Freezes the current group's settings. In the place pass this checks
    /// the group kind against pass 1, arranges its children, draws its
    /// background and opens its clip.
    fn begin_content(&mut self) {
        let Some(group) = self.stack.last_mut() else {
            return;
        };
        if group.content_begun {
            return;
        }
        group.content_begun = true;
        if self.pass == Pass::Measure {
            return;
        }

        // A scroll or slider in pass 1 must be one again in pass 2.
        let (index, kind, id) = (group.index, group.kind, group.id);
        let mismatch = self
            .measured
            .get(index)
            .filter(|node| node.kind != kind)
            .map(|node| UiError::StructuralMismatch {
                index,
                measured: node.kind,
                measured_id: node.id,
                placed: kind,
                placed_id: id,
            });
        if let Some(err) = mismatch {
            self.fail(err);
            return;
        }
        let Some(group) = self.stack.last_mut() else {
            return;
        };

        let sizes = self.measured.child_sizes(group.index);
        let bounds = match group.scroll_offset {
            Some(offset) => {
                let content = self.measured.get(group.index).map_or(Vec2::ZERO, |n| n.content_size);
                Rect::from_pos_size(group.rect.position() - offset, content)
            }
            None => group.rect,
        };
        group.child_rects = group.layout.arrange(bounds, &sizes);

        let rect = group.rect;
        let background = group.background;
        let clip = group.scroll_offset.is_some();
        if clip {
            group.clip_pushed = true;
        }

        if let Some(background) = background {
            self.draw_background(rect, background);
        }
        if clip {
            let physical = self.to_physical(rect);
            self.renderer.push_clip(rect, physical);
        }
    }

    fn draw_background(&mut self, rect: Rect, background: Background) {
        let (position, size) = self.to_physical(rect);
        let command = match background {
            Background::Color(color) => RenderCommand::Rect { position, size, color },
            Background::Image(texture) => RenderCommand::Texture {
                texture,
                position,
                size,
                color: Color::WHITE,
            },
            Background::NinePatch { texture, patch } => RenderCommand::NinePatch {
                texture,
                patch,
                position,
                size,
            },
        };
        self.renderer.push(command);
    }

    /// Next child rectangle of the current group (place pass).
    fn next_child_rect(&mut self) -> Rect {
        self.begin_content();
        let Some(group) = self.stack.last_mut() else {
            return Rect::ZERO;
        };
        let rect = group.child_rects.get(group.next_child).copied().unwrap_or(Rect::ZERO);
        group.next_child += 1;
        rect
    }

    /// Declares a leaf. Returns its node index and, in the place pass, its
    /// rectangle.
    fn leaf(&mut self, kind: NodeKind, id: ElementId, size: Vec2) -> Option<(usize, Rect)> {
        if self.error.is_some() {
            return None;
        }
        if self.stack.is_empty() {
            self.fail(UiError::ElementOutsideGroup { pass: self.pass, kind });
            return None;
        }
        let index = self.declare(kind, id)?;

        match self.pass {
            Pass::Measure => {
                self.begin_content();
                if let Some(node) = self.measured.get_mut(index) {
                    node.size = size;
                    node.content_size = size;
                }
                Some((index, Rect::ZERO))
            }
            Pass::Place => {
                let rect = self.next_child_rect();
                self.placed.push(PlacedNode {
                    kind,
                    id,
                    position: rect.position(),
                    size: rect.size(),
                    depth: self.stack.len(),
                });
                Some((index, rect))
            }
        }
    }

    /// Rect in physical pixels as `(position, size)`.
    fn to_physical(&self, rect: Rect) -> (Vec2i, Vec2i) {
        let position = self.coords.virtual_to_physical(rect.position());
        let end = self.coords.virtual_to_physical(Vec2::new(rect.right(), rect.bottom()));
        (position, end - position)
    }

    /// Hit-testable part of `rect` under the current clip.
    fn hit_rect(&self, rect: Rect) -> Option<Rect> {
        match self.renderer.current_clip() {
            Some(clip) => clip.intersection(&rect),
            None => Some(rect),
        }
    }

    fn check_group_event(&mut self, drag_only: bool, call: &'static str) -> Event {
        if self.error.is_some() {
            return Event::NONE;
        }
        let Some(group) = self.stack.last() else {
            self.fail(UiError::NoOpenGroup { call });
            return Event::NONE;
        };
        if self.pass == Pass::Measure {
            return Event::NONE;
        }
        if let Some((cached_drag_only, event)) = group.event {
            if cached_drag_only == drag_only {
                return event;
            }
        }

        let (index, id, rect) = (group.index, group.id, group.rect);
        let event = self.resolve(index, id, rect, drag_only);
        if let Some(group) = self.stack.last_mut() {
            group.event = Some((drag_only, event));
        }
        event
    }

    /// Resolves the events of one element in the place pass.
    fn resolve(&mut self, index: usize, id: ElementId, rect: Rect, drag_only: bool) -> Event {
        if self.pass != Pass::Place || self.error.is_some() {
            return Event::NONE;
        }
        if self.measured.is_behind_barrier(index) {
            return Event::NONE;
        }

        match self.resolved.get(&id) {
            Some(&seen) if seen != index => {
                if self.config.strict_identities {
                    self.fail(UiError::DuplicateIdentity(id));
                    return Event::NONE;
                }
                tracing::warn!("interactive identity {} declared more than once", id);
            }
            _ => {
                self.resolved.insert(id, index);
            }
        }

        let query = HitQuery {
            id,
            rect: self.hit_rect(rect),
            drag_only,
            drag_threshold: self.stack.last().map_or(self.config.drag_start_threshold, |g| g.drag_threshold),
        };
        let mut event = self.interaction.pointers.resolve(&query, self.input, self.coords);

        if event.went_down {
            self.interaction.focus.set_focus(id);
        }
        if !drag_only {
            event |= self.interaction.focus.focus_event(id, self.input);
        }
        self.interaction.focus.register(id);
        self.interaction.store.observe(id, self.frame, event);

        if !event.is_none() {
            self.events.push((id, event));
        }
        event
    }
}
