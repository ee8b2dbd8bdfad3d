//! # TANDEM Shared
//!
//! Plain-data types used by the engine and by its collaborators.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a GPU API
//! - a windowing crate
//! - a font shaping library
//!
//! Render backends, text shapers and input pollers depend on this crate so
//! they can speak the engine's vocabulary without linking the engine itself.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    DEFAULT_DRAG_START_THRESHOLD, DEFAULT_SCROLL_SPEED_DRAG, DEFAULT_SCROLL_SPEED_GAMEPAD,
    DEFAULT_SCROLL_SPEED_WHEEL, DEFAULT_VIRTUAL_RESOLUTION, MAX_POINTERS, NO_CAPTURED_POINTER,
};
pub use math::{Vec2, Vec2i, Vec4};
