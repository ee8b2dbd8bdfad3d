//! # Engine Defaults
//!
//! Values the engine falls back to when a group or the configuration does not
//! override them. Group-scoped values (scroll speeds, drag threshold) reset to
//! these at every group start.

// =============================================================================
// COORDINATES
// =============================================================================

/// Virtual size of the smallest screen dimension, if none is set.
pub const DEFAULT_VIRTUAL_RESOLUTION: f32 = 1000.0;

// =============================================================================
// POINTER
// =============================================================================

/// Pointer displacement (physical pixels) that turns a press into a drag.
pub const DEFAULT_DRAG_START_THRESHOLD: i32 = 8;

/// Multiplier applied to pointer motion while dragging a scroll view.
pub const DEFAULT_SCROLL_SPEED_DRAG: f32 = 2.0;

/// Virtual units scrolled per wheel notch.
pub const DEFAULT_SCROLL_SPEED_WHEEL: f32 = 16.0;

/// Virtual units scrolled per frame at full gamepad stick deflection.
pub const DEFAULT_SCROLL_SPEED_GAMEPAD: f32 = 0.1;

/// Maximum simultaneous pointers (mouse + touch fingers) tracked per frame.
pub const MAX_POINTERS: usize = 10;

/// Returned by pointer-index queries when no pointer is captured.
pub const NO_CAPTURED_POINTER: isize = -1;

// =============================================================================
// TEXT
// =============================================================================

/// Font used when the declaration never calls `set_text_font`.
pub const DEFAULT_FONT: &str = "default";

/// Locale used when the declaration never calls `set_text_locale`.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Width of the edit caret, in virtual units.
pub const EDIT_CARET_WIDTH: f32 = 2.0;
