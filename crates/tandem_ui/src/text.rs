//! Font collaborator interface.
//!
//! Shaping and glyph rendering live outside the engine. The engine asks for a
//! shaped size during the measure pass and for glyph rendering when the frame
//! is submitted. Sizes cross this boundary in physical pixels.

use tandem_shared::Vec2i;

use crate::error::BackendError;
use crate::style::{Color, TextDirection};

/// Everything a shaper needs to lay out one run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    /// UTF-8 text.
    pub text: String,
    /// Line height in physical pixels.
    pub pixel_height: i32,
    /// Wrap/clip box in physical pixels. `None` means a single unbounded line.
    /// A zero `x` means no wrapping; a zero `y` means no height restriction.
    pub max_size: Option<Vec2i>,
    /// Font name.
    pub font: String,
    /// Locale, e.g. `en-US`.
    pub locale: String,
    /// Layout direction.
    pub direction: TextDirection,
}

/// Shapes and renders text on behalf of the engine.
pub trait TextShaper {
    /// Returns the shaped size of `request` in physical pixels.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] when the font cannot be resolved or shaping fails.
    fn measure(&mut self, request: &TextRequest) -> Result<Vec2i, BackendError>;

    /// Renders `request` with its top-left corner at `position`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] when the font cannot be resolved or drawing fails.
    fn draw(&mut self, request: &TextRequest, position: Vec2i, color: Color) -> Result<(), BackendError>;
}
