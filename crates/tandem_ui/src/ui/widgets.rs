//! Leaf elements: images, labels, edit boxes and custom elements.

use tandem_shared::constants::EDIT_CARET_WIDTH;
use tandem_shared::{Vec2, Vec2i};

use super::Ui;
use crate::error::Pass;
use crate::id::ElementId;
use crate::input::Key;
use crate::render::{Canvas, RenderCommand, TextureHandle};
use crate::style::Color;
use crate::text::TextRequest;
use crate::tree::NodeKind;

impl Ui<'_> {
    /// Renders a texture `ysize` units tall, keeping its aspect ratio.
    pub fn image(&mut self, texture: &TextureHandle, ysize: f32) {
        let size = Vec2::new(ysize * texture.aspect_ratio(), ysize);
        let Some((_, rect)) = self.leaf(NodeKind::Image, ElementId::from_texture(texture.id), size) else {
            return;
        };
        if self.pass == Pass::Place {
            let (position, size) = self.to_physical(rect);
            self.renderer.push(RenderCommand::Texture {
                texture: *texture,
                position,
                size,
                color: Color::WHITE,
            });
        }
    }

    /// Renders a single line of text with a line height of `ysize`.
    pub fn label(&mut self, text: &str, ysize: f32) {
        self.text_leaf(NodeKind::Label, text, ysize, None);
    }

    /// Renders text wrapped at `max_size.x`. A zero `max_size.x` disables
    /// wrapping. A zero `max_size.y` leaves the height unrestricted; otherwise
    /// text beyond it is cut off.
    pub fn label_wrapped(&mut self, text: &str, ysize: f32, max_size: Vec2) {
        self.text_leaf(NodeKind::MultiLineLabel, text, ysize, Some(max_size));
    }

    /// Editable text box.
    ///
    /// A zero `size.x` grows the box with its text; a zero `size.y` makes it a
    /// single line `ysize` tall. Clicking (or activating) the box enters edit
    /// mode; Enter, Escape or a press elsewhere leaves it. Returns whether the
    /// box is in edit mode.
    pub fn edit(&mut self, ysize: f32, size: Vec2, id: impl Into<ElementId>, text: &mut String) -> bool {
        if self.error.is_some() {
            return false;
        }
        let id = id.into();
        let max_size = (size.y > 0.0).then_some(size);

        let measured = if self.pass == Pass::Measure {
            let request = self.text_request(text, ysize, max_size);
            let shaped = self.shape(&request);
            Vec2::new(
                if size.x > 0.0 { size.x } else { shaped.x + EDIT_CARET_WIDTH },
                if size.y > 0.0 { size.y } else { ysize },
            )
        } else {
            Vec2::ZERO
        };

        let Some((index, rect)) = self.leaf(NodeKind::Edit, id, measured) else {
            return false;
        };
        if self.pass == Pass::Measure {
            return self.interaction.editing == Some(id);
        }

        let event = self.resolve(index, id, rect, false);
        let input = self.input;
        let mut editing = self.interaction.editing == Some(id);
        let mut entered = false;

        if event.went_down && !editing {
            editing = true;
            entered = true;
        } else if editing && input.any_pointer_went_down() && !event.went_down {
            editing = false;
        }

        if editing && !entered {
            if input.key_pressed(Key::Backspace) {
                text.pop();
            }
            text.push_str(&input.text_input);
            if input.key_pressed(Key::Enter) || input.key_pressed(Key::Escape) {
                editing = false;
            }
        }

        if editing {
            self.interaction.editing = Some(id);
        } else if self.interaction.editing == Some(id) {
            self.interaction.editing = None;
        }

        let physical = self.to_physical(rect);
        self.renderer.push_clip(rect, physical);
        let request = self.text_request(text, ysize, max_size);
        if editing {
            let shaped = self.shaper.measure(&request).unwrap_or(Vec2i::ZERO);
            let caret = Vec2i::new(
                self.coords.length_to_physical(EDIT_CARET_WIDTH).max(1),
                request.pixel_height,
            );
            let offset = Vec2i::new(
                shaped.x.min(physical.1.x - caret.x).max(0),
                (shaped.y - request.pixel_height).max(0),
            );
            let color = self.text_style.color;
            self.renderer.push(RenderCommand::Text {
                request,
                position: physical.0,
                color,
            });
            self.renderer.push(RenderCommand::Rect {
                position: physical.0 + offset,
                size: caret,
                color,
            });
        } else {
            self.renderer.push(RenderCommand::Text {
                request,
                position: physical.0,
                color: self.text_style.color,
            });
        }
        self.renderer.pop_clip();

        editing
    }

    /// A leaf rendered by the caller. `render` runs in the place pass only,
    /// with the element's physical position and size.
    pub fn custom_element(
        &mut self,
        size: Vec2,
        id: impl Into<ElementId>,
        render: impl FnOnce(&mut Canvas<'_>, Vec2i, Vec2i),
    ) {
        let Some((_, rect)) = self.leaf(NodeKind::Custom, id.into(), size) else {
            return;
        };
        if self.pass == Pass::Place {
            let (position, size) = self.to_physical(rect);
            let mut canvas = Canvas::new(&mut *self.renderer);
            render(&mut canvas, position, size);
        }
    }

    fn text_leaf(&mut self, kind: NodeKind, text: &str, ysize: f32, max_size: Option<Vec2>) {
        if self.error.is_some() {
            return;
        }
        let request = self.text_request(text, ysize, max_size);

        let size = if self.pass == Pass::Measure {
            let mut shaped = self.shape(&request);
            if let Some(max) = max_size {
                if max.x > 0.0 {
                    shaped.x = shaped.x.min(max.x);
                }
                if max.y > 0.0 {
                    shaped.y = shaped.y.min(max.y);
                }
            }
            shaped
        } else {
            Vec2::ZERO
        };

        let Some((_, rect)) = self.leaf(kind, ElementId::from_content(text), size) else {
            return;
        };
        if self.pass == Pass::Place {
            let position = self.coords.virtual_to_physical(rect.position());
            self.renderer.push(RenderCommand::Text {
                request,
                position,
                color: self.text_style.color,
            });
        }
    }

    fn text_request(&self, text: &str, ysize: f32, max_size: Option<Vec2>) -> TextRequest {
        TextRequest {
            text: text.to_owned(),
            pixel_height: self.coords.length_to_physical(ysize),
            max_size: max_size.map(|m| self.coords.virtual_to_physical(m)),
            font: self.text_style.font.clone(),
            locale: self.text_style.locale.clone(),
            direction: self.text_style.direction,
        }
    }

    /// Shaped size in virtual units. A failing shaper yields zero.
    fn shape(&mut self, request: &TextRequest) -> Vec2 {
        match self.shaper.measure(request) {
            Ok(size) => self.coords.physical_to_virtual(size),
            Err(err) => {
                tracing::warn!("cannot measure {:?}: {}", request.text, err);
                Vec2::ZERO
            }
        }
    }
}
