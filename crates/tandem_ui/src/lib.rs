//! # TANDEM UI
//!
//! Immediate-mode UI engine. The caller declares the entire tree every frame
//! from one closure; the engine keeps no widget objects, only the interaction
//! state (focus, capture, press and drag ownership, edit mode) keyed by
//! stable element identities.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      FRAME PIPELINE                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  declaration ──► MEASURE ──► declaration ──► PLACE ──► commit│
//! │                    │                           │             │
//! │              leaf sizes,                 rects top-down,     │
//! │              groups sum                  events, commands    │
//! │              bottom-up                   (buffered)          │
//! │                                                │             │
//! │                          focus nav, capture ◄──┘             │
//! │                          cleanup, submit                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let report = session.run(&mut backend, &mut shaper, &input, |ui| {
//!     ui.start_group(Layout::VerticalCenter, 10.0, "menu");
//!     ui.label("Hello", 40.0);
//!     ui.start_group(Layout::HorizontalCenter, 0.0, "ok");
//!     if ui.check_event().went_up {
//!         // clicked
//!     }
//!     ui.label("OK", 30.0);
//!     ui.end_group();
//!     ui.end_group();
//! })?;
//! ```
//!
//! A frame that breaks the caller contract (unbalanced groups, a different
//! structure in the second pass, duplicate interactive ids) is discarded as a
//! whole and reported as a [`UiError`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod coords;
pub mod error;
pub mod event;
pub mod id;
pub mod input;
pub mod layout;
pub mod render;
pub mod session;
pub mod state;
pub mod style;
pub mod text;
pub mod tree;
pub mod ui;

pub use config::EngineConfig;
pub use coords::Coordinates;
pub use error::{BackendError, ConfigError, Pass, UiError, UiResult};
pub use event::Event;
pub use id::ElementId;
pub use input::{InputState, Key, Navigation, PointerKind, PointerSample};
pub use layout::{Alignment, Direction, GroupLayout, Layout, Margin, Rect};
pub use render::{Canvas, RenderBackend, RenderCommand, TextureHandle, UIRenderer};
pub use session::{FrameReport, Session, SharedSession};
pub use style::{Background, Color, TextDirection, TextStyle};
pub use text::{TextRequest, TextShaper};
pub use tree::NodeKind;
pub use ui::{PlacedNode, Ui};

pub use tandem_shared::{Vec2, Vec2i, Vec4};
