//! Frame orchestration.
//!
//! A [`Session`] owns everything that outlives a frame. [`Session::run`] runs
//! the caller's declaration twice and either commits the whole frame or none
//! of it.

use std::sync::Arc;

use parking_lot::Mutex;
use tandem_shared::Vec2i;

use crate::config::EngineConfig;
use crate::coords::Coordinates;
use crate::error::{ConfigError, Pass, UiResult};
use crate::event::Event;
use crate::id::ElementId;
use crate::input::InputState;
use crate::render::{submit, RenderBackend, UIRenderer};
use crate::state::{ElementState, Interaction};
use crate::text::TextShaper;
use crate::tree::LayoutTree;
use crate::ui::{PlacedNode, Ui};

/// A session shared between threads. Every entry point locks it.
pub type SharedSession = Arc<Mutex<Session>>;

/// What a committed frame produced.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Canvas the frame was laid out against, physical pixels.
    pub canvas: Vec2i,
    /// Every node in declaration order, with its assigned rectangle.
    pub nodes: Vec<PlacedNode>,
    /// Non-empty event sets, in resolution order.
    pub events: Vec<(ElementId, Event)>,
    /// Focus owner after navigation.
    pub focus: Option<ElementId>,
    /// Render commands submitted.
    pub commands: usize,
    /// Commands the collaborators failed to draw.
    pub render_gaps: usize,
}

impl FrameReport {
    /// All events `id` received this frame.
    #[must_use]
    pub fn event(&self, id: impl Into<ElementId>) -> Event {
        let id = id.into();
        self.events
            .iter()
            .filter(|(e, _)| *e == id)
            .fold(Event::NONE, |acc, (_, event)| acc | *event)
    }

    /// First placed node with identity `id`.
    #[must_use]
    pub fn node(&self, id: impl Into<ElementId>) -> Option<&PlacedNode> {
        let id = id.into();
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Interaction state and configuration of one UI.
pub struct Session {
    config: EngineConfig,
    coords: Coordinates,
    interaction: Interaction,
    measured: LayoutTree,
    renderer: UIRenderer,
    frame: u64,
}

impl Session {
    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            coords: Coordinates::new(config.virtual_resolution, Vec2i::ZERO),
            config,
            interaction: Interaction::new(),
            measured: LayoutTree::new(),
            renderer: UIRenderer::new(),
            frame: 0,
        })
    }

    /// Wraps the session for use from several threads.
    #[must_use]
    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Runs one frame.
    ///
    /// The declaration is called twice, first to measure and then to place,
    /// render and resolve input. It must declare the same structure both times.
    ///
    /// # Errors
    ///
    /// Returns the first caller-contract violation. The frame is then
    /// discarded: interaction state and coordinate changes are rolled back
    /// and nothing is drawn.
    pub fn run<F>(
        &mut self,
        backend: &mut dyn RenderBackend,
        shaper: &mut dyn TextShaper,
        input: &InputState,
        mut declaration: F,
    ) -> UiResult<FrameReport>
    where
        F: FnMut(&mut Ui<'_>),
    {
        self.frame += 1;
        let frame = self.frame;
        let coords = self.coords;
        self.coords.set_canvas(backend.window_size());

        // Pass 1: measure.
        self.measured.clear();
        let mut ui = Ui::new(
            Pass::Measure,
            frame,
            &self.config,
            &mut self.coords,
            input,
            shaper,
            &mut self.measured,
            &mut self.interaction,
            &mut self.renderer,
        );
        declaration(&mut ui);
        let measure = match ui.finish() {
            Ok(output) => output,
            Err(err) => {
                tracing::error!("frame {} discarded: {}", frame, err);
                self.coords = coords;
                return Err(err);
            }
        };

        // Pass 2: place, render, resolve.
        let snapshot = self.interaction.clone();
        self.interaction.begin_frame(input, frame);
        self.renderer.begin_frame();

        let mut ui = Ui::new(
            Pass::Place,
            frame,
            &self.config,
            &mut self.coords,
            input,
            shaper,
            &mut self.measured,
            &mut self.interaction,
            &mut self.renderer,
        );
        declaration(&mut ui);
        let placed = match ui.finish() {
            Ok(output) => output,
            Err(err) => {
                tracing::error!("frame {} discarded: {}", frame, err);
                self.interaction = snapshot;
                self.coords = coords;
                self.renderer.end_frame();
                return Err(err);
            }
        };

        self.interaction
            .end_frame(input, frame, self.config.prune_after_frames);

        if !(measure.keep_projection || placed.keep_projection) {
            backend.set_ortho_projection(self.coords.canvas());
        }
        let commands = self.renderer.end_frame();
        let stats = submit(&commands, backend, shaper);

        tracing::debug!(
            "frame {}: {} nodes, {} events, {} commands, {} gaps",
            frame,
            placed.nodes.len(),
            placed.events.len(),
            commands.len(),
            stats.gaps
        );

        Ok(FrameReport {
            frame,
            canvas: self.coords.canvas(),
            nodes: placed.nodes,
            events: placed.events,
            focus: self.interaction.focus.focus(),
            commands: commands.len(),
            render_gaps: stats.gaps,
        })
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of frames committed or attempted.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Changes the virtual resolution for following frames.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::InvalidResolution`] for non-positive values.
    pub fn set_virtual_resolution(&mut self, virtual_resolution: f32) -> UiResult<()> {
        self.coords.set_virtual_resolution(virtual_resolution)
    }

    /// Coordinate conversion of the last frame.
    #[must_use]
    pub const fn coordinates(&self) -> &Coordinates {
        &self.coords
    }

    /// Persistent state of one element.
    #[must_use]
    pub fn element_state(&self, id: impl Into<ElementId>) -> Option<&ElementState> {
        self.interaction.store.get(id.into())
    }

    /// Number of elements with persistent state.
    #[must_use]
    pub fn tracked_elements(&self) -> usize {
        self.interaction.store.len()
    }

    /// Focused element.
    #[must_use]
    pub fn focus(&self) -> Option<ElementId> {
        self.interaction.focus.focus()
    }

    /// Captured pointer slot, or `-1`.
    #[must_use]
    pub fn captured_pointer_index(&self) -> isize {
        self.interaction.pointers.captured_pointer_index()
    }

    /// Edit box in edit mode.
    #[must_use]
    pub fn editing(&self) -> Option<ElementId> {
        self.interaction.editing
    }
}
