//! UI rendering system.
//!
//! Pass 2 records [`RenderCommand`]s into a [`UIRenderer`] instead of drawing
//! straight away. The commands are submitted to the [`RenderBackend`] only once
//! the frame has completed both passes, so a frame that violates the caller
//! contract leaves nothing half-drawn.
//!
//! Commands are in physical pixels.

use tandem_shared::{Vec2i, Vec4};

use crate::error::BackendError;
use crate::layout::Rect;
use crate::style::Color;
use crate::text::{TextRequest, TextShaper};

/// A texture owned by the asset collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    /// Backend-specific id.
    pub id: u32,
    /// Pixel dimensions, used for aspect-ratio sizing.
    pub size: Vec2i,
}

impl TextureHandle {
    /// Creates a new handle.
    #[must_use]
    pub const fn new(id: u32, size: Vec2i) -> Self {
        Self { id, size }
    }

    /// Width / height, or 1.0 for a degenerate texture.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.size.y > 0 {
            self.size.x as f32 / self.size.y as f32
        } else {
            1.0
        }
    }
}

/// A render command for the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled rectangle.
    Rect {
        /// Top-left corner.
        position: Vec2i,
        /// Size.
        size: Vec2i,
        /// Fill color.
        color: Color,
    },
    /// Textured quad.
    Texture {
        /// Texture to draw.
        texture: TextureHandle,
        /// Top-left corner.
        position: Vec2i,
        /// Size.
        size: Vec2i,
        /// Tint color.
        color: Color,
    },
    /// Nine-patch textured quad.
    NinePatch {
        /// Texture to draw.
        texture: TextureHandle,
        /// Stretchable region `(x0, y0, x1, y1)` in UV space.
        patch: Vec4,
        /// Top-left corner.
        position: Vec2i,
        /// Size.
        size: Vec2i,
    },
    /// Shaped text.
    Text {
        /// What to shape.
        request: TextRequest,
        /// Top-left corner.
        position: Vec2i,
        /// Glyph color.
        color: Color,
    },
    /// Scissor rect (clip children).
    PushClip {
        /// Top-left corner.
        position: Vec2i,
        /// Size.
        size: Vec2i,
    },
    /// Pop scissor rect.
    PopClip,
}

/// Asset/render collaborator: owns the GPU and draws what the engine recorded.
pub trait RenderBackend {
    /// Current window size in physical pixels.
    fn window_size(&self) -> Vec2i;

    /// Sets up a 2D projection covering `canvas`. Not called when the
    /// declaration asked to keep the existing projection.
    fn set_ortho_projection(&mut self, canvas: Vec2i);

    /// Draws a solid rectangle.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the draw could not be issued.
    fn draw_rect(&mut self, position: Vec2i, size: Vec2i, color: Color) -> Result<(), BackendError>;

    /// Draws a texture stretched over a rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingTexture`] for unknown handles.
    fn draw_texture(
        &mut self,
        texture: &TextureHandle,
        position: Vec2i,
        size: Vec2i,
        color: Color,
    ) -> Result<(), BackendError>;

    /// Draws a nine-patch texture over a rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingTexture`] for unknown handles.
    fn draw_nine_patch(
        &mut self,
        texture: &TextureHandle,
        patch: Vec4,
        position: Vec2i,
        size: Vec2i,
    ) -> Result<(), BackendError>;

    /// Restricts following draws to a rectangle (intersected with the current one).
    fn push_clip(&mut self, position: Vec2i, size: Vec2i);

    /// Restores the previous clip rectangle.
    fn pop_clip(&mut self);
}

/// Collects render commands during pass 2.
pub struct UIRenderer {
    /// All commands from the frame.
    commands: Vec<RenderCommand>,
    /// Clip stack in virtual units, used for hit-testing as well as drawing.
    clip_stack: Vec<Rect>,
}

impl UIRenderer {
    /// Creates a new UI renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
            clip_stack: Vec::with_capacity(16),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
    }

    /// Adds a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Pushes a clip rect. `bounds` is virtual; `physical` is the same rect in
    /// pixels, as `(position, size)`.
    pub fn push_clip(&mut self, bounds: Rect, physical: (Vec2i, Vec2i)) {
        // Intersect with current clip if any
        let actual_clip = if let Some(current) = self.clip_stack.last() {
            current.intersection(&bounds).unwrap_or(Rect::ZERO)
        } else {
            bounds
        };

        self.clip_stack.push(actual_clip);
        self.commands.push(RenderCommand::PushClip {
            position: physical.0,
            size: physical.1,
        });
    }

    /// Pops the current clip rect.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_some() {
            self.commands.push(RenderCommand::PopClip);
        }
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Ends the frame and hands over the recorded commands.
    pub fn end_frame(&mut self) -> Vec<RenderCommand> {
        self.clip_stack.clear();
        std::mem::take(&mut self.commands)
    }

    /// Returns the total command count.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drawing surface handed to custom elements during pass 2.
pub struct Canvas<'a> {
    renderer: &'a mut UIRenderer,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(renderer: &'a mut UIRenderer) -> Self {
        Self { renderer }
    }

    /// Renders a texture at a physical position and size.
    pub fn render_texture(&mut self, texture: &TextureHandle, position: Vec2i, size: Vec2i) {
        self.render_texture_colored(texture, position, size, Color::WHITE);
    }

    /// Renders a tinted texture at a physical position and size.
    pub fn render_texture_colored(
        &mut self,
        texture: &TextureHandle,
        position: Vec2i,
        size: Vec2i,
        color: Color,
    ) {
        self.renderer.push(RenderCommand::Texture {
            texture: *texture,
            position,
            size,
            color,
        });
    }

    /// Renders a nine-patch texture at a physical position and size.
    pub fn render_texture_nine_patch(
        &mut self,
        texture: &TextureHandle,
        patch: Vec4,
        position: Vec2i,
        size: Vec2i,
    ) {
        self.renderer.push(RenderCommand::NinePatch {
            texture: *texture,
            patch,
            position,
            size,
        });
    }

    /// Fills a physical rectangle.
    pub fn fill_rect(&mut self, position: Vec2i, size: Vec2i, color: Color) {
        self.renderer.push(RenderCommand::Rect { position, size, color });
    }
}

/// Outcome of submitting one frame's commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitStats {
    /// Commands the collaborators accepted.
    pub drawn: usize,
    /// Commands that failed and left a gap on screen.
    pub gaps: usize,
}

/// Hands recorded commands to the collaborators.
///
/// A failing draw is logged and skipped; it never aborts the frame.
pub fn submit(
    commands: &[RenderCommand],
    backend: &mut dyn RenderBackend,
    shaper: &mut dyn TextShaper,
) -> SubmitStats {
    let mut stats = SubmitStats::default();

    for command in commands {
        let result = match command {
            RenderCommand::Rect { position, size, color } => backend.draw_rect(*position, *size, *color),
            RenderCommand::Texture {
                texture,
                position,
                size,
                color,
            } => backend.draw_texture(texture, *position, *size, *color),
            RenderCommand::NinePatch {
                texture,
                patch,
                position,
                size,
            } => backend.draw_nine_patch(texture, *patch, *position, *size),
            RenderCommand::Text { request, position, color } => shaper.draw(request, *position, *color),
            RenderCommand::PushClip { position, size } => {
                backend.push_clip(*position, *size);
                Ok(())
            }
            RenderCommand::PopClip => {
                backend.pop_clip();
                Ok(())
            }
        };

        match result {
            Ok(()) => stats.drawn += 1,
            Err(err) => {
                tracing::warn!("render gap: {}", err);
                stats.gaps += 1;
            }
        }
    }

    stats
}

/// Vertex for UI rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UIVertex {
    /// Position (x, y) in physical pixels.
    pub position: [f32; 2],
    /// UV coordinates.
    pub uv: [f32; 2],
}

impl UIVertex {
    /// Creates a new vertex.
    #[must_use]
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

/// Builds the 9 quads (54 vertices, two triangles each) of a nine-patch.
///
/// Corners keep their texel size; edges stretch along one axis; the interior
/// stretches along both. When the target is smaller than the fixed borders,
/// the borders shrink proportionally. Backends that draw nine-patches
/// themselves can upload the result with `bytemuck::cast_slice`.
#[must_use]
pub fn nine_patch_vertices(
    texture: &TextureHandle,
    patch: Vec4,
    position: Vec2i,
    size: Vec2i,
) -> Vec<UIVertex> {
    let tex_w = texture.size.x.max(1) as f32;
    let tex_h = texture.size.y.max(1) as f32;
    let (w, h) = (size.x as f32, size.y as f32);

    let mut left = patch.x * tex_w;
    let mut right = (1.0 - patch.z) * tex_w;
    let mut top = patch.y * tex_h;
    let mut bottom = (1.0 - patch.w) * tex_h;

    if left + right > w && left + right > 0.0 {
        let shrink = w / (left + right);
        left *= shrink;
        right *= shrink;
    }
    if top + bottom > h && top + bottom > 0.0 {
        let shrink = h / (top + bottom);
        top *= shrink;
        bottom *= shrink;
    }

    let (x0, y0) = (position.x as f32, position.y as f32);
    let xs = [x0, x0 + left, x0 + w - right, x0 + w];
    let ys = [y0, y0 + top, y0 + h - bottom, y0 + h];
    let us = [0.0, patch.x, patch.z, 1.0];
    let vs = [0.0, patch.y, patch.w, 1.0];

    let mut vertices = Vec::with_capacity(54);
    for row in 0..3 {
        for col in 0..3 {
            let tl = UIVertex::new(xs[col], ys[row], us[col], vs[row]);
            let tr = UIVertex::new(xs[col + 1], ys[row], us[col + 1], vs[row]);
            let bl = UIVertex::new(xs[col], ys[row + 1], us[col], vs[row + 1]);
            let br = UIVertex::new(xs[col + 1], ys[row + 1], us[col + 1], vs[row + 1]);
            vertices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_frame() {
        let mut renderer = UIRenderer::new();

        renderer.begin_frame();
        renderer.push(RenderCommand::Rect {
            position: Vec2i::ZERO,
            size: Vec2i::new(100, 50),
            color: Color::WHITE,
        });

        let commands = renderer.end_frame();
        assert_eq!(commands.len(), 1);
        assert_eq!(renderer.command_count(), 0);
    }

    #[test]
    fn test_clip_stack() {
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();

        renderer.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0), (Vec2i::ZERO, Vec2i::new(100, 100)));
        renderer.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0), (Vec2i::new(50, 50), Vec2i::new(100, 100)));
        assert_eq!(renderer.current_clip(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        renderer.pop_clip();
        renderer.pop_clip();
        assert!(renderer.current_clip().is_none());

        // Unbalanced pop does not emit a stray command.
        renderer.pop_clip();
        assert_eq!(renderer.command_count(), 4);
    }

    #[test]
    fn test_nine_patch_keeps_corners() {
        let texture = TextureHandle::new(1, Vec2i::new(32, 32));
        let patch = Vec4::new(0.25, 0.25, 0.75, 0.75);
        let vertices = nine_patch_vertices(&texture, patch, Vec2i::new(10, 10), Vec2i::new(200, 100));

        assert_eq!(vertices.len(), 54);
        // Top-left corner quad spans exactly the 8px border.
        assert_eq!(vertices[0], UIVertex::new(10.0, 10.0, 0.0, 0.0));
        assert_eq!(vertices[5], UIVertex::new(18.0, 18.0, 0.25, 0.25));
        // Bottom-right vertex sits on the target corner.
        assert_eq!(vertices[53], UIVertex::new(210.0, 110.0, 1.0, 1.0));
        assert_eq!(bytemuck::cast_slice::<UIVertex, u8>(&vertices).len(), 54 * 16);
    }

    #[test]
    fn test_nine_patch_shrinks_borders() {
        let texture = TextureHandle::new(1, Vec2i::new(40, 40));
        let patch = Vec4::new(0.5, 0.5, 0.5, 0.5);
        let vertices = nine_patch_vertices(&texture, patch, Vec2i::ZERO, Vec2i::new(10, 10));
        assert!(vertices.iter().all(|v| v.position[0] <= 10.0 && v.position[1] <= 10.0));
    }
}
