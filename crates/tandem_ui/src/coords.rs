//! Virtual/physical coordinate conversion.
//!
//! All layout math happens in virtual units, where the smallest canvas
//! dimension spans `virtual_resolution` units. Collaborators receive integer
//! physical pixels: `scale = min(canvas.x, canvas.y) / virtual_resolution`.

use tandem_shared::{Vec2, Vec2i, DEFAULT_VIRTUAL_RESOLUTION};

use crate::error::{UiError, UiResult};

/// Coordinate service for one frame. Read-only once the first group starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    virtual_resolution: f32,
    canvas: Vec2i,
    scale: f32,
}

impl Coordinates {
    /// Creates the conversion for a canvas in physical pixels.
    #[must_use]
    pub fn new(virtual_resolution: f32, canvas: Vec2i) -> Self {
        let mut coords = Self {
            virtual_resolution,
            canvas,
            scale: 1.0,
        };
        coords.recompute();
        coords
    }

    /// Virtual size of the smallest canvas dimension.
    #[must_use]
    pub const fn virtual_resolution(&self) -> f32 {
        self.virtual_resolution
    }

    /// Canvas size in physical pixels.
    #[must_use]
    pub const fn canvas(&self) -> Vec2i {
        self.canvas
    }

    /// Physical pixels per virtual unit.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Canvas size in virtual units.
    #[must_use]
    pub fn virtual_canvas(&self) -> Vec2 {
        self.canvas.as_vec2() / self.scale
    }

    /// Changes the virtual resolution.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidResolution`] for non-finite or non-positive values.
    pub fn set_virtual_resolution(&mut self, virtual_resolution: f32) -> UiResult<()> {
        if !virtual_resolution.is_finite() || virtual_resolution <= 0.0 {
            return Err(UiError::InvalidResolution(virtual_resolution));
        }
        self.virtual_resolution = virtual_resolution;
        self.recompute();
        Ok(())
    }

    /// Changes the canvas size.
    pub fn set_canvas(&mut self, canvas: Vec2i) {
        self.canvas = canvas;
        self.recompute();
    }

    /// Converts a virtual coordinate to physical pixels.
    #[must_use]
    pub fn virtual_to_physical(&self, v: Vec2) -> Vec2i {
        Vec2i::new(
            (v.x * self.scale).round() as i32,
            (v.y * self.scale).round() as i32,
        )
    }

    /// Converts a physical pixel coordinate to virtual units.
    #[must_use]
    pub fn physical_to_virtual(&self, v: Vec2i) -> Vec2 {
        v.as_vec2() / self.scale
    }

    /// Converts a single virtual length to physical pixels.
    #[must_use]
    pub fn length_to_physical(&self, length: f32) -> i32 {
        (length * self.scale).round() as i32
    }

    fn recompute(&mut self) {
        let min = self.canvas.min_element();
        // A degenerate canvas (minimised window) keeps a usable 1:1 scale.
        self.scale = if min > 0 && self.virtual_resolution > 0.0 {
            min as f32 / self.virtual_resolution
        } else {
            1.0
        };
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_RESOLUTION, Vec2i::ZERO)
    }
}
