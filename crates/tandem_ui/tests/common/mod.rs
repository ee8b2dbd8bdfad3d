//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use tandem_ui::{
    BackendError, Color, EngineConfig, FrameReport, InputState, RenderBackend, Session, TextRequest,
    TextShaper, TextureHandle, Ui, UiResult, Vec2i, Vec4,
};

/// A draw call as the backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Rect { position: Vec2i, size: Vec2i, color: Color },
    Texture { id: u32, position: Vec2i, size: Vec2i },
    NinePatch { id: u32, position: Vec2i, size: Vec2i },
    PushClip { position: Vec2i, size: Vec2i },
    PopClip,
}

/// Records every call; textures listed in `missing` fail to draw.
pub struct MockBackend {
    pub window: Vec2i,
    pub calls: Vec<DrawCall>,
    pub projections: Vec<Vec2i>,
    pub missing: Vec<u32>,
}

impl MockBackend {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            window: Vec2i::new(width, height),
            calls: Vec::new(),
            projections: Vec::new(),
            missing: Vec::new(),
        }
    }
}

impl RenderBackend for MockBackend {
    fn window_size(&self) -> Vec2i {
        self.window
    }

    fn set_ortho_projection(&mut self, canvas: Vec2i) {
        self.projections.push(canvas);
    }

    fn draw_rect(&mut self, position: Vec2i, size: Vec2i, color: Color) -> Result<(), BackendError> {
        self.calls.push(DrawCall::Rect { position, size, color });
        Ok(())
    }

    fn draw_texture(
        &mut self,
        texture: &TextureHandle,
        position: Vec2i,
        size: Vec2i,
        _color: Color,
    ) -> Result<(), BackendError> {
        if self.missing.contains(&texture.id) {
            return Err(BackendError::MissingTexture(texture.id));
        }
        self.calls.push(DrawCall::Texture {
            id: texture.id,
            position,
            size,
        });
        Ok(())
    }

    fn draw_nine_patch(
        &mut self,
        texture: &TextureHandle,
        _patch: Vec4,
        position: Vec2i,
        size: Vec2i,
    ) -> Result<(), BackendError> {
        if self.missing.contains(&texture.id) {
            return Err(BackendError::MissingTexture(texture.id));
        }
        self.calls.push(DrawCall::NinePatch {
            id: texture.id,
            position,
            size,
        });
        Ok(())
    }

    fn push_clip(&mut self, position: Vec2i, size: Vec2i) {
        self.calls.push(DrawCall::PushClip { position, size });
    }

    fn pop_clip(&mut self) {
        self.calls.push(DrawCall::PopClip);
    }
}

/// Monospace shaper: every glyph is half as wide as the line is tall.
/// Wraps at `max_size.x`; the font named `missing` does not exist.
#[derive(Default)]
pub struct MockShaper {
    pub drawn: Vec<(String, Vec2i, Color)>,
}

impl TextShaper for MockShaper {
    fn measure(&mut self, request: &TextRequest) -> Result<Vec2i, BackendError> {
        if request.font == "missing" {
            return Err(BackendError::MissingFont(request.font.clone()));
        }
        let glyphs = request.text.chars().count() as i32;
        let width = glyphs * request.pixel_height / 2;
        match request.max_size {
            Some(max) if max.x > 0 && width > max.x => {
                let lines = (width + max.x - 1) / max.x;
                let mut height = lines * request.pixel_height;
                if max.y > 0 {
                    height = height.min(max.y);
                }
                Ok(Vec2i::new(max.x, height))
            }
            _ => Ok(Vec2i::new(width, request.pixel_height)),
        }
    }

    fn draw(&mut self, request: &TextRequest, position: Vec2i, color: Color) -> Result<(), BackendError> {
        if request.font == "missing" {
            return Err(BackendError::MissingFont(request.font.clone()));
        }
        self.drawn.push((request.text.clone(), position, color));
        Ok(())
    }
}

/// A session with mock collaborators. The default window is 1000x1000 and
/// the virtual resolution 1000, so virtual units equal pixels.
pub struct Harness {
    pub session: Session,
    pub backend: MockBackend,
    pub shaper: MockShaper,
    pub input: InputState,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            session: Session::new(config).expect("valid config"),
            backend: MockBackend::new(1000, 1000),
            shaper: MockShaper::default(),
            input: InputState::new(),
        }
    }

    /// Runs one frame, then starts the next input frame.
    pub fn frame(&mut self, declaration: impl FnMut(&mut Ui<'_>)) -> UiResult<FrameReport> {
        self.backend.calls.clear();
        self.shaper.drawn.clear();
        let result = self
            .session
            .run(&mut self.backend, &mut self.shaper, &self.input, declaration);
        self.input.begin_frame();
        result
    }

    /// Runs one frame that must succeed.
    pub fn ok(&mut self, declaration: impl FnMut(&mut Ui<'_>)) -> FrameReport {
        self.frame(declaration).expect("frame should succeed")
    }

    /// Moves mouse pointer 0.
    pub fn mouse(&mut self, x: i32, y: i32) {
        self.input
            .set_pointer(0, Vec2i::new(x, y), tandem_ui::PointerKind::Mouse);
    }

    /// Moves touch pointer 0.
    pub fn touch(&mut self, x: i32, y: i32) {
        self.input
            .set_pointer(0, Vec2i::new(x, y), tandem_ui::PointerKind::Touch);
    }

    /// Presses and releases a key within the coming frame.
    pub fn tap(&mut self, key: tandem_ui::Key) {
        self.input.key_down(key);
        self.input.key_up(key);
    }
}

/// A clickable square: a group that checks events around a custom element.
pub fn button(ui: &mut Ui<'_>, id: &str, side: f32) {
    ui.start_group(tandem_ui::Layout::Overlay, 0.0, id);
    ui.check_event();
    ui.custom_element(tandem_ui::Vec2::new(side, side), id, |_, _, _| {});
    ui.end_group();
}
